//! Compiled workflow graph: immutable, supports execute only.
//!
//! Built by `WorkflowGraph::compile`. Holds the node table, the per-source
//! edge rules, and the entry node. The structure is read-only, so concurrent
//! `execute` calls on the same graph are safe and independent; each run owns
//! its state and step counter.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ExecuteError;

use super::edge::{EdgeRule, Transition};
use super::node::{Node, NodeFailure};
use super::outcome::{RunFailure, RunOutcome, RunReport};
use super::run_context::RunContext;
use super::END;

/// Runnable workflow graph produced by `WorkflowGraph::compile`.
pub struct CompiledWorkflowGraph<S> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    edges: HashMap<String, EdgeRule>,
    entry: String,
}

impl<S> std::fmt::Debug for CompiledWorkflowGraph<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledWorkflowGraph")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("edges", &self.edges)
            .field("entry", &self.entry)
            .finish()
    }
}

impl<S> CompiledWorkflowGraph<S> {
    pub(crate) fn new(
        nodes: HashMap<String, Arc<dyn Node<S>>>,
        edges: HashMap<String, EdgeRule>,
        entry: String,
    ) -> Self {
        Self {
            nodes,
            edges,
            entry,
        }
    }

    /// Name of the node where every run starts.
    pub fn entry_point(&self) -> &str {
        &self.entry
    }
}

impl<S: Send> CompiledWorkflowGraph<S> {
    /// Drives one run of the graph to termination.
    ///
    /// Threads `initial` through successive node invocations, following the
    /// edge rule of each visited node, until the end marker is reached
    /// (`Completed`), a node has no outgoing edge (`ImplicitEnd`), or the
    /// iteration budget from `run` is exhausted (`BudgetExhausted`). All
    /// three hand the final state back in the [`RunReport`].
    ///
    /// Node invocations are strictly sequential; re-entering a node visited
    /// earlier in the same run is legal and cycles are bounded only by the
    /// budget. Cancellation is observed at step boundaries: once the token
    /// fires, no further node executes.
    ///
    /// # Errors
    ///
    /// Returns [`RunFailure`] carrying the last valid state when a node or
    /// router fails, a router's decision has no mapping, or the run is
    /// cancelled. The executor never retries; retry loops belong in the
    /// graph topology.
    pub async fn execute(&self, initial: S, run: &RunContext) -> Result<RunReport<S>, RunFailure<S>> {
        let mut state = initial;
        let mut current = self.entry.clone();
        let mut steps: usize = 0;

        tracing::info!(
            run_id = run.run_id(),
            entry = %current,
            max_steps = run.max_steps(),
            "starting workflow run"
        );

        loop {
            if run.is_cancelled() {
                tracing::info!(run_id = run.run_id(), node = %current, steps, "run cancelled at step boundary");
                let error = ExecuteError::Cancelled {
                    run_id: run.run_id().to_string(),
                    node: current,
                };
                return Err(RunFailure { state, steps, error });
            }
            if current == END {
                tracing::info!(run_id = run.run_id(), steps, "run reached the end marker");
                return Ok(RunReport {
                    state,
                    steps,
                    outcome: RunOutcome::Completed,
                });
            }
            if steps >= run.max_steps() {
                tracing::warn!(
                    run_id = run.run_id(),
                    node = %current,
                    steps,
                    "iteration budget exhausted before the end marker; truncating run"
                );
                return Ok(RunReport {
                    state,
                    steps,
                    outcome: RunOutcome::BudgetExhausted,
                });
            }

            let Some(node) = self.nodes.get(&current) else {
                let error = ExecuteError::NodeNotFound {
                    node: current,
                    run_id: run.run_id().to_string(),
                };
                return Err(RunFailure { state, steps, error });
            };

            tracing::debug!(run_id = run.run_id(), node = %current, "executing node");
            let stepped = node.run(state, run).await;
            state = match stepped {
                Ok(next_state) => next_state,
                Err(NodeFailure { state, error }) => {
                    tracing::error!(run_id = run.run_id(), node = %current, %error, "node failed");
                    let error = ExecuteError::Node {
                        node: current,
                        source: error,
                    };
                    return Err(RunFailure { state, steps, error });
                }
            };
            steps += 1;

            // The returned state is authoritative from here on; routing always
            // sees the post-step state through a second, independent call.
            let next = match self.edges.get(&current) {
                None => {
                    tracing::warn!(run_id = run.run_id(), node = %current, "node has no outgoing edge; ending run implicitly");
                    return Ok(RunReport {
                        state,
                        steps,
                        outcome: RunOutcome::ImplicitEnd { node: current },
                    });
                }
                Some(EdgeRule::Direct(transition)) => transition.clone(),
                Some(EdgeRule::Conditional { router, routes }) => {
                    let routed = self.route(router, &state, run).await;
                    let decision = match routed {
                        Ok(decision) => decision,
                        Err(error) => return Err(RunFailure { state, steps, error }),
                    };
                    match routes.get(&decision) {
                        Some(transition) => {
                            tracing::debug!(run_id = run.run_id(), from = %current, %decision, "conditional route taken");
                            transition.clone()
                        }
                        None => {
                            let error = ExecuteError::UnmappedDecision {
                                node: current,
                                decision,
                            };
                            return Err(RunFailure { state, steps, error });
                        }
                    }
                }
            };

            current = match next {
                Transition::End => END.to_string(),
                Transition::To(name) => name,
            };
        }
    }

    async fn route(&self, router: &str, state: &S, run: &RunContext) -> Result<String, ExecuteError> {
        let node = self.nodes.get(router).ok_or_else(|| ExecuteError::NodeNotFound {
            node: router.to_string(),
            run_id: run.run_id().to_string(),
        })?;
        let router_view = node
            .as_router()
            .ok_or_else(|| ExecuteError::NotARouter {
                node: router.to_string(),
            })?;
        router_view
            .route(state, run)
            .await
            .map_err(|source| ExecuteError::Router {
                node: router.to_string(),
                source,
            })
    }
}
