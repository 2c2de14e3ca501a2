//! Run-time errors for workflow graph execution.
//!
//! Returned by `CompiledWorkflowGraph::execute` inside a
//! [`RunFailure`](crate::graph::RunFailure), which pairs the error with the
//! last valid state so the caller can inspect what had already changed.

use thiserror::Error;

/// Domain error produced by a node or router implementation.
///
/// The executor never inspects these; it wraps them with the failing node's
/// name and propagates them unchanged. Retries, if desired, are expressed in
/// the graph topology, never here.
pub type NodeError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error aborting a workflow run.
///
/// Configuration-shaped variants (`NodeNotFound`, `NotARouter`,
/// `UnmappedDecision`) indicate a graph that is inconsistent with its nodes;
/// they are never retried or defaulted. `Node` and `Router` wrap the step's
/// own failure. `Cancelled` is distinct from both.
#[derive(Debug, Error)]
pub enum ExecuteError {
    /// A node's execute operation failed; the underlying cause is attached.
    #[error("node '{node}' failed")]
    Node {
        node: String,
        #[source]
        source: NodeError,
    },

    /// A router's decision operation failed.
    #[error("router '{node}' failed")]
    Router {
        node: String,
        #[source]
        source: NodeError,
    },

    /// The current node name has no registered node. Compile-time validation
    /// makes this unreachable for graphs built through the builder.
    #[error("node '{node}' not found during execution of run '{run_id}'")]
    NodeNotFound { node: String, run_id: String },

    /// A conditional edge named a router node without the router capability.
    /// Registration checks this already; the executor re-checks on each hop.
    #[error("node '{node}' has conditional edges but no router capability")]
    NotARouter { node: String },

    /// A router returned a decision key absent from its decision map.
    #[error("no successor mapped for decision '{decision}' from node '{node}'")]
    UnmappedDecision { node: String, decision: String },

    /// The run's cancellation token fired at a step boundary, before `node`
    /// was invoked.
    #[error("run '{run_id}' cancelled before node '{node}'")]
    Cancelled { run_id: String, node: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_error_display_names_failing_node() {
        let err = ExecuteError::Node {
            node: "CategorizeEmail".into(),
            source: "llm call failed".into(),
        };
        assert_eq!(err.to_string(), "node 'CategorizeEmail' failed");
        let source = std::error::Error::source(&err).expect("source attached");
        assert_eq!(source.to_string(), "llm call failed");
    }

    #[test]
    fn unmapped_decision_display_names_node_and_key() {
        let err = ExecuteError::UnmappedDecision {
            node: "Proofread".into(),
            decision: "maybe".into(),
        };
        let s = err.to_string();
        assert!(s.contains("Proofread"), "{}", s);
        assert!(s.contains("'maybe'"), "{}", s);
    }
}
