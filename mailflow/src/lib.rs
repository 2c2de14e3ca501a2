//! # mailflow
//!
//! A stateful directed workflow graph executor, plus the email-assistant
//! pipeline built on it. One caller-defined state value flows through a graph
//! of named nodes with **state-in, state-out** semantics: each node consumes
//! the current state and returns the next, and conditional edges pick the
//! successor from a router's decision key.
//!
//! ## Design principles
//!
//! - **Build, then run**: assemble a [`WorkflowGraph`], `compile()` it into an
//!   immutable [`CompiledWorkflowGraph`], then drive runs with `execute`.
//!   Every wiring mistake (duplicate node, unknown edge target, non-router on
//!   a conditional edge, missing entry point) fails at build time.
//! - **Deterministic termination**: runs end at the [`END`] marker, at a node
//!   with no outgoing edge, or when the per-run iteration budget is spent.
//!   Cycles are legal; the budget bounds them.
//! - **Errors carry state**: every failure hands the last valid state back
//!   ([`RunFailure`]), so the caller can inspect a partially completed run.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use mailflow::{Node, NodeFailure, RunContext, WorkflowGraph, END};
//!
//! struct Increment;
//!
//! #[async_trait]
//! impl Node<i32> for Increment {
//!     async fn run(&self, state: i32, _ctx: &RunContext) -> Result<i32, NodeFailure<i32>> {
//!         Ok(state + 1)
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut graph = WorkflowGraph::new();
//! graph
//!     .add_node("increment", Arc::new(Increment)).unwrap()
//!     .add_edge("increment", END).unwrap()
//!     .set_entry_point("increment").unwrap();
//! let compiled = graph.compile().unwrap();
//! let report = compiled.execute(0, &RunContext::new("run-1", 10)).await.unwrap();
//! assert_eq!(report.state, 1);
//! # }
//! ```
//!
//! ## Main modules
//!
//! - [`graph`]: the executor — `WorkflowGraph`, `CompiledWorkflowGraph`,
//!   `Node`, `Router`, run outcomes and errors.
//! - [`workflow`]: the email pipeline — state, collaborator traits, nodes,
//!   and [`workflow::build_email_workflow`].

pub mod error;
pub mod graph;
pub mod workflow;

pub use error::{ExecuteError, NodeError};
pub use graph::{
    CompiledWorkflowGraph, GraphBuildError, Node, NodeFailure, Router, RunContext, RunFailure,
    RunOutcome, RunReport, WorkflowGraph, END,
};
