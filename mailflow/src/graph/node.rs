//! Node and router traits: the units of work in a workflow graph.
//!
//! A node receives the shared state by value and returns the next version of
//! it; ownership transfers fully at each step. A router is a node that
//! additionally classifies the current state into a decision key used by
//! conditional edges.

use async_trait::async_trait;

use crate::error::NodeError;

use super::run_context::RunContext;

/// A failed node invocation.
///
/// Rust move semantics mean a failing node must hand the state back itself,
/// so the executor can return the partially updated state alongside the
/// error. `state` is whatever the node considers current at the point of
/// failure (usually the state it received, untouched).
#[derive(Debug)]
pub struct NodeFailure<S> {
    pub state: S,
    pub error: NodeError,
}

impl<S> NodeFailure<S> {
    pub fn new(state: S, error: impl Into<NodeError>) -> Self {
        Self {
            state,
            error: error.into(),
        }
    }
}

/// A unit of work in the workflow graph.
///
/// Implementations own whatever external collaborators they need (mail
/// client, LLM, retrieval); the executor only ever calls `run` and, for
/// router-capable nodes, `route`.
#[async_trait]
pub trait Node<S>: Send + Sync {
    /// Executes this node's step: consume the current state, return the next.
    ///
    /// `ctx` carries the run id and the cancellation token; long-running
    /// steps should observe the token themselves, since the executor only
    /// checks it between steps.
    async fn run(&self, state: S, ctx: &RunContext) -> Result<S, NodeFailure<S>>;

    /// Capability query: returns the router view of this node, if it has one.
    ///
    /// Queried when conditional edges are registered (fail fast) and again on
    /// each conditional hop. Router-capable implementations return
    /// `Some(self)`.
    fn as_router(&self) -> Option<&dyn Router<S>> {
        None
    }
}

/// A node that additionally produces a routing decision.
///
/// `route` is invoked as a second, independent call after `run`, on the
/// post-step state. It must not mutate: it borrows the state and returns only
/// the decision key, which must be present in the decision map configured for
/// the node's conditional edge.
#[async_trait]
pub trait Router<S>: Node<S> {
    async fn route(&self, state: &S, ctx: &RunContext) -> Result<String, NodeError>;
}
