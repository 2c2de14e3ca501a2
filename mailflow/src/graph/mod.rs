//! Workflow graph: named nodes, direct and conditional edges, execute.
//!
//! Build with [`WorkflowGraph`] (`add_node` / `add_edge` /
//! `add_conditional_edges` / `set_entry_point`), then [`compile`] into a
//! [`CompiledWorkflowGraph`] and drive runs with `execute`.
//!
//! [`compile`]: WorkflowGraph::compile

mod build_error;
mod builder;
mod compiled;
mod edge;
mod node;
mod outcome;
mod run_context;

pub use build_error::GraphBuildError;
pub use builder::WorkflowGraph;
pub use compiled::CompiledWorkflowGraph;
pub use node::{Node, NodeFailure, Router};
pub use outcome::{RunFailure, RunOutcome, RunReport};
pub use run_context::RunContext;

/// Sentinel marking successful termination of a run. Never a real node:
/// registering it as a node name is rejected at build time.
pub const END: &str = "__end__";
