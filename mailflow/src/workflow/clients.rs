//! Collaborator interfaces consumed by the pipeline nodes.
//!
//! The workflow owns no external service itself: nodes hold these traits and
//! the application wires in real implementations (a mail provider client, a
//! generative-AI client, a retrieval pipeline). Tests use small mocks.

use async_trait::async_trait;

use crate::error::NodeError;

use super::state::{EmailCategory, EmailMessage, ProofreadVerdict};

/// Mail provider surface: read unanswered mail, file draft replies.
#[async_trait]
pub trait MailClient: Send + Sync {
    /// Fetches up to `max_results` emails that have not been answered yet.
    async fn fetch_unanswered(&self, max_results: usize) -> Result<Vec<EmailMessage>, NodeError>;

    /// Creates a draft reply to `email` with the given body.
    async fn create_draft_reply(&self, email: &EmailMessage, body: &str) -> Result<(), NodeError>;
}

/// Generative-AI surface used for categorization, drafting, and proofreading.
#[async_trait]
pub trait Assistant: Send + Sync {
    /// Classifies an email body into an [`EmailCategory`].
    async fn categorize(&self, email_body: &str) -> Result<EmailCategory, NodeError>;

    /// Produces retrieval queries for answering a product-related email.
    async fn design_rag_queries(&self, email_body: &str) -> Result<Vec<String>, NodeError>;

    /// Writes (or rewrites) a draft reply. `history` carries earlier drafts
    /// and proofreader feedback for the same email.
    async fn write_draft(&self, inputs: &str, history: &[String]) -> Result<String, NodeError>;

    /// Reviews a draft against the original email.
    async fn proofread(&self, email_body: &str, draft: &str)
        -> Result<ProofreadVerdict, NodeError>;
}

/// Retrieval pipeline surface: answer one query from internal knowledge.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn answer(&self, query: &str) -> Result<String, NodeError>;
}
