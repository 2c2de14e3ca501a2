//! Run results: the final state is always handed back.
//!
//! A run ends in one of three non-error outcomes ([`RunOutcome`]) or with an
//! error ([`RunFailure`]); both carry the last valid state and the number of
//! node visits, so a caller can inspect a truncated or failed run.

use std::fmt;

use crate::error::ExecuteError;

/// How a run terminated when no error occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run reached the end marker.
    Completed,
    /// The named node had no outgoing edge; the run ended implicitly. Usually
    /// a forgotten edge, so it is logged and distinguishable from
    /// `Completed`.
    ImplicitEnd { node: String },
    /// The iteration budget ran out before the end marker. The run is
    /// abandoned but the state is still returned; a non-fatal truncation, not
    /// a failure.
    BudgetExhausted,
}

/// Successful (or truncated) run: final state, visit count, and outcome.
#[derive(Debug)]
pub struct RunReport<S> {
    pub state: S,
    pub steps: usize,
    pub outcome: RunOutcome,
}

/// Failed run: the last valid state together with the error that stopped it.
///
/// The state reflects every node visit that completed before the failure; the
/// failing node identifies itself through [`ExecuteError`].
#[derive(Debug)]
pub struct RunFailure<S> {
    pub state: S,
    pub steps: usize,
    pub error: ExecuteError,
}

impl<S> RunFailure<S> {
    /// Splits the failure into the recovered state and the error.
    pub fn into_parts(self) -> (S, ExecuteError) {
        (self.state, self.error)
    }
}

impl<S> fmt::Display for RunFailure<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} after {} step(s)", self.error, self.steps)
    }
}

impl<S: fmt::Debug> std::error::Error for RunFailure<S> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
