//! Shared state threaded through the email pipeline.
//!
//! One [`EmailState`] value flows through every node of the workflow; the
//! graph executor never looks inside it.

use serde::{Deserialize, Serialize};

/// One email pulled from the inbox.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    pub id: String,
    #[serde(rename = "threadId")]
    pub thread_id: String,
    #[serde(rename = "messageId")]
    pub message_id: String,
    #[serde(default)]
    pub references: String,
    pub sender: String,
    pub subject: String,
    pub body: String,
}

/// Category assigned to an email by the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmailCategory {
    ProductEnquiry,
    CustomerComplaint,
    CustomerFeedback,
    Unrelated,
}

impl EmailCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailCategory::ProductEnquiry => "PRODUCT_ENQUIRY",
            EmailCategory::CustomerComplaint => "CUSTOMER_COMPLAINT",
            EmailCategory::CustomerFeedback => "CUSTOMER_FEEDBACK",
            EmailCategory::Unrelated => "UNRELATED",
        }
    }
}

/// Proofreader verdict over a generated draft.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProofreadVerdict {
    pub feedback: String,
    pub send: bool,
}

/// Mutable workflow state for one pipeline run.
///
/// `inbox` is consumed back to front: the email under processing is the last
/// element, copied into `current_email` by the categorizer and popped by
/// `SendEmail` / `DiscardEmail` once handled. `trials` and `writer_messages`
/// carry the draft/rewrite history for the current email only.
#[derive(Debug, Clone, Default)]
pub struct EmailState {
    pub inbox: Vec<EmailMessage>,
    pub current_email: Option<EmailMessage>,
    pub category: Option<EmailCategory>,
    pub rag_queries: Vec<String>,
    pub retrieved_context: String,
    pub generated_email: String,
    pub writer_messages: Vec<String>,
    pub sendable: bool,
    pub trials: u32,
}

impl EmailState {
    /// Fresh state seeded with the emails to process.
    pub fn with_inbox(inbox: Vec<EmailMessage>) -> Self {
        Self {
            inbox,
            ..Self::default()
        }
    }

    /// Drops the email under processing and resets all per-email fields.
    pub(crate) fn finish_current_email(&mut self) {
        self.inbox.pop();
        self.current_email = None;
        self.category = None;
        self.rag_queries.clear();
        self.retrieved_context.clear();
        self.generated_email.clear();
        self.writer_messages.clear();
        self.sendable = false;
        self.trials = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_from_screaming_snake_case() {
        let cat: EmailCategory = serde_json::from_str("\"PRODUCT_ENQUIRY\"").unwrap();
        assert_eq!(cat, EmailCategory::ProductEnquiry);
        assert_eq!(
            serde_json::to_string(&EmailCategory::Unrelated).unwrap(),
            "\"UNRELATED\""
        );
    }

    #[test]
    fn finish_current_email_pops_and_resets() {
        let mut state = EmailState::with_inbox(vec![
            EmailMessage {
                id: "1".into(),
                ..Default::default()
            },
            EmailMessage {
                id: "2".into(),
                ..Default::default()
            },
        ]);
        state.trials = 2;
        state.generated_email = "draft".into();
        state.finish_current_email();
        assert_eq!(state.inbox.len(), 1);
        assert_eq!(state.trials, 0);
        assert!(state.generated_email.is_empty());
    }
}
