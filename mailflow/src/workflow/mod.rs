//! Email-assistant pipeline assembled on the workflow graph executor.
//!
//! [`build_email_workflow`] wires the pipeline nodes into a compiled graph:
//! load inbox, gate on remaining work, categorize, retrieve knowledge for
//! product questions, draft, proofread with a bounded rewrite loop, then file
//! or discard and loop back for the next email. The rewrite retry policy
//! lives entirely in the topology (Proofread → WriteDraft cycle); the
//! executor itself never retries.

mod clients;
mod nodes;
mod state;

use std::collections::HashMap;
use std::sync::Arc;

use crate::graph::{CompiledWorkflowGraph, GraphBuildError, WorkflowGraph, END};

pub use clients::{Assistant, KnowledgeBase, MailClient};
pub use nodes::{
    CategorizeEmail, CheckInbox, ConstructRagQueries, DiscardEmail, LoadInboxEmails, Proofread,
    RetrieveFromRag, SendEmail, WriteDraft, DECISION_EMPTY, DECISION_NOT_PRODUCT_RELATED,
    DECISION_PROCESS, DECISION_PRODUCT_RELATED, DECISION_REWRITE, DECISION_SEND, DECISION_STOP,
    DECISION_UNRELATED, MAX_WRITER_TRIALS,
};
pub use state::{EmailCategory, EmailMessage, EmailState, ProofreadVerdict};

/// Registered node names, also useful to callers inspecting run outcomes.
pub const NODE_LOAD_INBOX: &str = "LoadInboxEmails";
pub const NODE_CHECK_INBOX: &str = "CheckInbox";
pub const NODE_CATEGORIZE: &str = "CategorizeEmail";
pub const NODE_CONSTRUCT_RAG_QUERIES: &str = "ConstructRagQueries";
pub const NODE_RETRIEVE_FROM_RAG: &str = "RetrieveFromRag";
pub const NODE_WRITE_DRAFT: &str = "WriteDraft";
pub const NODE_PROOFREAD: &str = "Proofread";
pub const NODE_SEND_EMAIL: &str = "SendEmail";
pub const NODE_DISCARD_EMAIL: &str = "DiscardEmail";

/// Iteration budget that comfortably covers a full inbox sweep. Callers with
/// larger inboxes should size their own budget.
pub const DEFAULT_MAX_STEPS: usize = 70;

/// External collaborators the pipeline nodes delegate to.
#[derive(Clone)]
pub struct WorkflowClients {
    pub mail: Arc<dyn MailClient>,
    pub assistant: Arc<dyn Assistant>,
    pub knowledge: Arc<dyn KnowledgeBase>,
}

/// Builds and compiles the email workflow graph.
///
/// Topology: `LoadInboxEmails → CheckInbox`; `CheckInbox` routes `process` to
/// `CategorizeEmail` or `empty` to the end marker. Categories route to the
/// retrieval chain, straight to the writer, or to `DiscardEmail`. After
/// proofreading: `send` files the reply, `rewrite` loops back to the writer,
/// `stop` discards after [`MAX_WRITER_TRIALS`]. `SendEmail` and
/// `DiscardEmail` both return to `CheckInbox` for the next email.
pub fn build_email_workflow(
    clients: WorkflowClients,
) -> Result<CompiledWorkflowGraph<EmailState>, GraphBuildError> {
    let mut graph = WorkflowGraph::new();

    graph
        .add_node(NODE_LOAD_INBOX, Arc::new(LoadInboxEmails::new(clients.mail.clone())))?
        .add_node(NODE_CHECK_INBOX, Arc::new(CheckInbox))?
        .add_node(NODE_CATEGORIZE, Arc::new(CategorizeEmail::new(clients.assistant.clone())))?
        .add_node(
            NODE_CONSTRUCT_RAG_QUERIES,
            Arc::new(ConstructRagQueries::new(clients.assistant.clone())),
        )?
        .add_node(
            NODE_RETRIEVE_FROM_RAG,
            Arc::new(RetrieveFromRag::new(clients.knowledge.clone())),
        )?
        .add_node(NODE_WRITE_DRAFT, Arc::new(WriteDraft::new(clients.assistant.clone())))?
        .add_node(NODE_PROOFREAD, Arc::new(Proofread::new(clients.assistant.clone())))?
        .add_node(NODE_SEND_EMAIL, Arc::new(SendEmail::new(clients.mail.clone())))?
        .add_node(NODE_DISCARD_EMAIL, Arc::new(DiscardEmail))?
        .set_entry_point(NODE_LOAD_INBOX)?
        .add_edge(NODE_LOAD_INBOX, NODE_CHECK_INBOX)?
        .add_conditional_edges(
            NODE_CHECK_INBOX,
            NODE_CHECK_INBOX,
            HashMap::from([
                (DECISION_PROCESS.to_string(), NODE_CATEGORIZE.to_string()),
                (DECISION_EMPTY.to_string(), END.to_string()),
            ]),
        )?
        .add_conditional_edges(
            NODE_CATEGORIZE,
            NODE_CATEGORIZE,
            HashMap::from([
                (
                    DECISION_PRODUCT_RELATED.to_string(),
                    NODE_CONSTRUCT_RAG_QUERIES.to_string(),
                ),
                (
                    DECISION_NOT_PRODUCT_RELATED.to_string(),
                    NODE_WRITE_DRAFT.to_string(),
                ),
                (DECISION_UNRELATED.to_string(), NODE_DISCARD_EMAIL.to_string()),
            ]),
        )?
        .add_edge(NODE_CONSTRUCT_RAG_QUERIES, NODE_RETRIEVE_FROM_RAG)?
        .add_edge(NODE_RETRIEVE_FROM_RAG, NODE_WRITE_DRAFT)?
        .add_edge(NODE_WRITE_DRAFT, NODE_PROOFREAD)?
        .add_conditional_edges(
            NODE_PROOFREAD,
            NODE_PROOFREAD,
            HashMap::from([
                (DECISION_SEND.to_string(), NODE_SEND_EMAIL.to_string()),
                (DECISION_REWRITE.to_string(), NODE_WRITE_DRAFT.to_string()),
                (DECISION_STOP.to_string(), NODE_DISCARD_EMAIL.to_string()),
            ]),
        )?
        .add_edge(NODE_SEND_EMAIL, NODE_CHECK_INBOX)?
        .add_edge(NODE_DISCARD_EMAIL, NODE_CHECK_INBOX)?;

    graph.compile()
}
