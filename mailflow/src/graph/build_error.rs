//! Build-time graph errors.
//!
//! Returned by the `WorkflowGraph` builder methods and by `compile`. Every
//! invariant is checked at registration time; `compile` re-validates them
//! exhaustively before producing a runnable graph.

use thiserror::Error;

/// Error while assembling or compiling a workflow graph.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphBuildError {
    /// A node with this name is already registered; the first registration
    /// is left untouched.
    #[error("node '{0}' is already registered")]
    DuplicateNode(String),

    /// An edge, router, or entry point referenced an unregistered node name.
    #[error("node '{0}' is not registered")]
    UnknownNode(String),

    /// The exact direct (from, to) pair is already registered.
    #[error("edge from '{from}' to '{to}' is already registered")]
    DuplicateEdge { from: String, to: String },

    /// A conditional edge named a node that does not expose the router
    /// capability.
    #[error("node '{0}' does not implement the router capability")]
    NotARouter(String),

    /// The end marker is a sentinel, never a registerable node name.
    #[error("'{0}' is a reserved name and cannot be registered as a node")]
    ReservedName(String),

    /// `compile` was called before `set_entry_point`.
    #[error("no entry point set for the graph")]
    MissingEntryPoint,
}
