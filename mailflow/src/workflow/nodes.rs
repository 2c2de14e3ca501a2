//! Pipeline nodes for the email workflow.
//!
//! Each node delegates its business step to a collaborator trait and mutates
//! the shared [`EmailState`]. Three of them are their own routers: the
//! decision keys they return drive the conditional edges wired up in
//! [`build_email_workflow`](super::build_email_workflow).

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::NodeError;
use crate::graph::{Node, NodeFailure, Router, RunContext};

use super::clients::{Assistant, KnowledgeBase, MailClient};
use super::state::{EmailCategory, EmailState};

/// Decision keys returned by the pipeline routers.
pub const DECISION_PROCESS: &str = "process";
pub const DECISION_EMPTY: &str = "empty";
pub const DECISION_PRODUCT_RELATED: &str = "product related";
pub const DECISION_NOT_PRODUCT_RELATED: &str = "not product related";
pub const DECISION_UNRELATED: &str = "unrelated";
pub const DECISION_SEND: &str = "send";
pub const DECISION_REWRITE: &str = "rewrite";
pub const DECISION_STOP: &str = "stop";

/// Drafts are abandoned after this many writer attempts for one email.
pub const MAX_WRITER_TRIALS: u32 = 3;

/// How many unanswered emails one run pulls from the inbox.
const FETCH_LIMIT: usize = 50;

/// Fills the inbox with unanswered emails from the mail provider.
pub struct LoadInboxEmails {
    mail: Arc<dyn MailClient>,
}

impl LoadInboxEmails {
    pub fn new(mail: Arc<dyn MailClient>) -> Self {
        Self { mail }
    }
}

#[async_trait]
impl Node<EmailState> for LoadInboxEmails {
    async fn run(
        &self,
        mut state: EmailState,
        _ctx: &RunContext,
    ) -> Result<EmailState, NodeFailure<EmailState>> {
        tracing::info!("loading new emails");
        let fetched = self.mail.fetch_unanswered(FETCH_LIMIT).await;
        match fetched {
            Ok(emails) => {
                tracing::info!(count = emails.len(), "fetched unanswered emails");
                state.inbox = emails;
                Ok(state)
            }
            Err(error) => Err(NodeFailure::new(state, error)),
        }
    }
}

/// Marks the check-for-work point in the graph; the routing decision is its
/// router half, which looks at whether the inbox still holds emails.
pub struct CheckInbox;

#[async_trait]
impl Node<EmailState> for CheckInbox {
    async fn run(
        &self,
        state: EmailState,
        _ctx: &RunContext,
    ) -> Result<EmailState, NodeFailure<EmailState>> {
        Ok(state)
    }

    fn as_router(&self) -> Option<&dyn Router<EmailState>> {
        Some(self)
    }
}

#[async_trait]
impl Router<EmailState> for CheckInbox {
    async fn route(&self, state: &EmailState, _ctx: &RunContext) -> Result<String, NodeError> {
        if state.inbox.is_empty() {
            tracing::info!("no new emails");
            Ok(DECISION_EMPTY.to_string())
        } else {
            tracing::info!(remaining = state.inbox.len(), "emails to process");
            Ok(DECISION_PROCESS.to_string())
        }
    }
}

/// Classifies the email at the back of the inbox and routes on its category.
pub struct CategorizeEmail {
    assistant: Arc<dyn Assistant>,
}

impl CategorizeEmail {
    pub fn new(assistant: Arc<dyn Assistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Node<EmailState> for CategorizeEmail {
    async fn run(
        &self,
        mut state: EmailState,
        _ctx: &RunContext,
    ) -> Result<EmailState, NodeFailure<EmailState>> {
        tracing::info!("categorizing email");
        let Some(email) = state.inbox.last().cloned() else {
            return Err(NodeFailure::new(state, "no emails in state to categorize"));
        };
        let categorized = self.assistant.categorize(&email.body).await;
        match categorized {
            Ok(category) => {
                tracing::info!(category = category.as_str(), sender = %email.sender, "email categorized");
                state.category = Some(category);
                state.current_email = Some(email);
                Ok(state)
            }
            Err(error) => Err(NodeFailure::new(state, error)),
        }
    }

    fn as_router(&self) -> Option<&dyn Router<EmailState>> {
        Some(self)
    }
}

#[async_trait]
impl Router<EmailState> for CategorizeEmail {
    async fn route(&self, state: &EmailState, _ctx: &RunContext) -> Result<String, NodeError> {
        let Some(category) = state.category else {
            return Err("email has not been categorized".into());
        };
        let decision = match category {
            EmailCategory::ProductEnquiry => DECISION_PRODUCT_RELATED,
            EmailCategory::Unrelated => DECISION_UNRELATED,
            EmailCategory::CustomerComplaint | EmailCategory::CustomerFeedback => {
                DECISION_NOT_PRODUCT_RELATED
            }
        };
        Ok(decision.to_string())
    }
}

/// Designs the retrieval queries used to answer a product-related email.
pub struct ConstructRagQueries {
    assistant: Arc<dyn Assistant>,
}

impl ConstructRagQueries {
    pub fn new(assistant: Arc<dyn Assistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Node<EmailState> for ConstructRagQueries {
    async fn run(
        &self,
        mut state: EmailState,
        _ctx: &RunContext,
    ) -> Result<EmailState, NodeFailure<EmailState>> {
        tracing::info!("designing retrieval queries");
        let Some(body) = state.current_email.as_ref().map(|e| e.body.clone()) else {
            return Err(NodeFailure::new(state, "no email selected for retrieval"));
        };
        let designed = self.assistant.design_rag_queries(&body).await;
        match designed {
            Ok(queries) => {
                state.rag_queries = queries;
                Ok(state)
            }
            Err(error) => Err(NodeFailure::new(state, error)),
        }
    }
}

/// Answers each designed query from internal knowledge and collects the
/// results into the retrieved context handed to the writer.
pub struct RetrieveFromRag {
    knowledge: Arc<dyn KnowledgeBase>,
}

impl RetrieveFromRag {
    pub fn new(knowledge: Arc<dyn KnowledgeBase>) -> Self {
        Self { knowledge }
    }
}

#[async_trait]
impl Node<EmailState> for RetrieveFromRag {
    async fn run(
        &self,
        mut state: EmailState,
        _ctx: &RunContext,
    ) -> Result<EmailState, NodeFailure<EmailState>> {
        tracing::info!(queries = state.rag_queries.len(), "retrieving from internal knowledge");
        let queries = state.rag_queries.clone();
        let mut context = String::new();
        for query in &queries {
            let answered = self.knowledge.answer(query).await;
            match answered {
                Ok(answer) => {
                    context.push_str(query);
                    context.push('\n');
                    context.push_str(&answer);
                    context.push_str("\n\n");
                }
                Err(error) => return Err(NodeFailure::new(state, error)),
            }
        }
        state.retrieved_context = context;
        Ok(state)
    }
}

/// Writes (or rewrites) the draft reply, keeping the draft history so the
/// writer sees earlier attempts and proofreader feedback.
pub struct WriteDraft {
    assistant: Arc<dyn Assistant>,
}

impl WriteDraft {
    pub fn new(assistant: Arc<dyn Assistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Node<EmailState> for WriteDraft {
    async fn run(
        &self,
        mut state: EmailState,
        _ctx: &RunContext,
    ) -> Result<EmailState, NodeFailure<EmailState>> {
        tracing::info!(trial = state.trials + 1, "writing draft email");
        let Some(email) = state.current_email.clone() else {
            return Err(NodeFailure::new(state, "no email selected to draft a reply for"));
        };
        let category = state
            .category
            .map(|c| c.as_str())
            .unwrap_or("UNCATEGORIZED");
        let inputs = format!(
            "# **EMAIL CATEGORY:** {category}\n\n# **EMAIL CONTENT:**\n{body}\n\n# **INFORMATION:**\n{context}",
            body = email.body,
            context = state.retrieved_context,
        );
        let history = state.writer_messages.clone();
        let written = self.assistant.write_draft(&inputs, &history).await;
        match written {
            Ok(draft) => {
                state.trials += 1;
                state
                    .writer_messages
                    .push(format!("**Draft {}:**\n{}", state.trials, draft));
                state.generated_email = draft;
                Ok(state)
            }
            Err(error) => Err(NodeFailure::new(state, error)),
        }
    }
}

/// Reviews the generated draft; its router half decides between sending,
/// rewriting, and giving up after [`MAX_WRITER_TRIALS`] attempts.
pub struct Proofread {
    assistant: Arc<dyn Assistant>,
}

impl Proofread {
    pub fn new(assistant: Arc<dyn Assistant>) -> Self {
        Self { assistant }
    }
}

#[async_trait]
impl Node<EmailState> for Proofread {
    async fn run(
        &self,
        mut state: EmailState,
        _ctx: &RunContext,
    ) -> Result<EmailState, NodeFailure<EmailState>> {
        tracing::info!("verifying generated email");
        let Some(body) = state.current_email.as_ref().map(|e| e.body.clone()) else {
            return Err(NodeFailure::new(state, "no email selected to proofread against"));
        };
        let draft = state.generated_email.clone();
        let reviewed = self.assistant.proofread(&body, &draft).await;
        match reviewed {
            Ok(verdict) => {
                state
                    .writer_messages
                    .push(format!("**Proofreader Feedback:**\n{}", verdict.feedback));
                state.sendable = verdict.send;
                Ok(state)
            }
            Err(error) => Err(NodeFailure::new(state, error)),
        }
    }

    fn as_router(&self) -> Option<&dyn Router<EmailState>> {
        Some(self)
    }
}

#[async_trait]
impl Router<EmailState> for Proofread {
    async fn route(&self, state: &EmailState, _ctx: &RunContext) -> Result<String, NodeError> {
        if state.sendable {
            tracing::info!("draft approved, ready to send");
            Ok(DECISION_SEND.to_string())
        } else if state.trials >= MAX_WRITER_TRIALS {
            tracing::warn!(trials = state.trials, "draft rejected at max trials, giving up");
            Ok(DECISION_STOP.to_string())
        } else {
            tracing::info!(trials = state.trials, "draft rejected, rewriting");
            Ok(DECISION_REWRITE.to_string())
        }
    }
}

/// Files the approved draft as a reply and clears the per-email state.
pub struct SendEmail {
    mail: Arc<dyn MailClient>,
}

impl SendEmail {
    pub fn new(mail: Arc<dyn MailClient>) -> Self {
        Self { mail }
    }
}

#[async_trait]
impl Node<EmailState> for SendEmail {
    async fn run(
        &self,
        mut state: EmailState,
        _ctx: &RunContext,
    ) -> Result<EmailState, NodeFailure<EmailState>> {
        tracing::info!("creating draft reply");
        let Some(email) = state.current_email.clone() else {
            return Err(NodeFailure::new(state, "no email selected to reply to"));
        };
        let draft = state.generated_email.clone();
        let created = self.mail.create_draft_reply(&email, &draft).await;
        match created {
            Ok(()) => {
                state.finish_current_email();
                Ok(state)
            }
            Err(error) => Err(NodeFailure::new(state, error)),
        }
    }
}

/// Drops the current email without replying: either it was unrelated, or the
/// writer ran out of trials.
pub struct DiscardEmail;

#[async_trait]
impl Node<EmailState> for DiscardEmail {
    async fn run(
        &self,
        mut state: EmailState,
        _ctx: &RunContext,
    ) -> Result<EmailState, NodeFailure<EmailState>> {
        tracing::info!("discarding email without reply");
        state.finish_current_email();
        Ok(state)
    }
}
