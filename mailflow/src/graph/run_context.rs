//! Per-run context: run identifier, iteration budget, cancellation.
//!
//! Created by the caller for each `execute` call and passed by reference to
//! every node and router invocation in that run.

use tokio_util::sync::CancellationToken;

/// Workflow-scoped context for one run.
///
/// The iteration budget bounds the number of node visits, guaranteeing
/// termination in cyclic graphs. The cancellation token is observed by the
/// executor at step boundaries only; a node already in flight must honor it
/// itself for fast abort.
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: String,
    max_steps: usize,
    cancellation: CancellationToken,
}

impl RunContext {
    /// Creates a context with a fresh, never-cancelled token.
    pub fn new(run_id: impl Into<String>, max_steps: usize) -> Self {
        Self {
            run_id: run_id.into(),
            max_steps,
            cancellation: CancellationToken::new(),
        }
    }

    /// Replaces the cancellation token, e.g. with a child of a server-wide
    /// shutdown token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancellation
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }
}
