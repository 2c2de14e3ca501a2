//! Mutable workflow graph builder.
//!
//! Register nodes, edges, and an entry point, then [`compile`] into an
//! immutable [`CompiledWorkflowGraph`]. Every invariant is checked at
//! registration time so misconfiguration fails fast; `compile` re-validates
//! exhaustively and is the seam between "graph under construction" and "graph
//! ready to run". Builder methods take `&mut self` and `compile` consumes the
//! builder, so construction and execution can never interleave.
//!
//! [`compile`]: WorkflowGraph::compile

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::build_error::GraphBuildError;
use super::compiled::CompiledWorkflowGraph;
use super::edge::{EdgeRule, Transition};
use super::node::Node;
use super::END;

/// Workflow graph under construction: named nodes, per-source edge rules, and
/// an entry node.
///
/// Generic over the caller-defined state type `S`, which the graph never
/// inspects. Methods return `Result<&mut Self, _>` for chaining with `?`.
pub struct WorkflowGraph<S> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    edges: HashMap<String, EdgeRule>,
    entry: Option<String>,
}

impl<S> std::fmt::Debug for WorkflowGraph<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowGraph")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("edges", &self.edges)
            .field("entry", &self.entry)
            .finish()
    }
}

impl<S> Default for WorkflowGraph<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> WorkflowGraph<S> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            entry: None,
        }
    }

    /// Registers a node under a unique name.
    ///
    /// Fails with `DuplicateNode` if the name is taken (the first
    /// registration is untouched) and `ReservedName` for the end marker,
    /// which is never an executable node.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        node: Arc<dyn Node<S>>,
    ) -> Result<&mut Self, GraphBuildError> {
        let name = name.into();
        if name == END {
            return Err(GraphBuildError::ReservedName(name));
        }
        if self.nodes.contains_key(&name) {
            return Err(GraphBuildError::DuplicateNode(name));
        }
        tracing::debug!(node = %name, "registered node");
        self.nodes.insert(name, node);
        Ok(self)
    }

    /// Registers a direct transition from `from` to `to` (a node name or
    /// [`END`]).
    ///
    /// Fails with `UnknownNode` if either endpoint is unregistered and
    /// `DuplicateEdge` if the identical direct pair already exists. Any other
    /// existing rule for `from` (a different direct target or a conditional
    /// rule) is replaced: last registration wins.
    pub fn add_edge(
        &mut self,
        from: impl Into<String>,
        to: impl Into<String>,
    ) -> Result<&mut Self, GraphBuildError> {
        let from = from.into();
        let to = to.into();
        if !self.nodes.contains_key(&from) {
            return Err(GraphBuildError::UnknownNode(from));
        }
        if to != END && !self.nodes.contains_key(&to) {
            return Err(GraphBuildError::UnknownNode(to));
        }
        let transition = Transition::from_name(to.clone());
        if let Some(EdgeRule::Direct(existing)) = self.edges.get(&from) {
            if *existing == transition {
                return Err(GraphBuildError::DuplicateEdge { from, to });
            }
        }
        tracing::debug!(from = %from, to = %to, "registered direct edge");
        self.edges.insert(from, EdgeRule::Direct(transition));
        Ok(self)
    }

    /// Registers a conditional transition from `from`, dispatched through the
    /// decision of the registered node named `router`.
    ///
    /// `routes` maps each decision key to a node name or [`END`]. Fails with
    /// `UnknownNode` for an unregistered `from`, `router`, or route target,
    /// and `NotARouter` if the router node's capability query comes back
    /// empty. A node may be its own router (`router == from`), which is the
    /// common case. Any existing rule for `from` is replaced: last
    /// registration wins.
    pub fn add_conditional_edges(
        &mut self,
        from: impl Into<String>,
        router: impl Into<String>,
        routes: HashMap<String, String>,
    ) -> Result<&mut Self, GraphBuildError> {
        let from = from.into();
        let router = router.into();
        if !self.nodes.contains_key(&from) {
            return Err(GraphBuildError::UnknownNode(from));
        }
        let router_node = self
            .nodes
            .get(&router)
            .ok_or_else(|| GraphBuildError::UnknownNode(router.clone()))?;
        if router_node.as_router().is_none() {
            return Err(GraphBuildError::NotARouter(router));
        }
        let mut mapped = HashMap::with_capacity(routes.len());
        for (decision, target) in routes {
            if target != END && !self.nodes.contains_key(&target) {
                return Err(GraphBuildError::UnknownNode(target));
            }
            mapped.insert(decision, Transition::from_name(target));
        }
        tracing::debug!(from = %from, router = %router, routes = mapped.len(), "registered conditional edges");
        self.edges.insert(
            from,
            EdgeRule::Conditional {
                router,
                routes: mapped,
            },
        );
        Ok(self)
    }

    /// Designates the node where every run starts.
    pub fn set_entry_point(&mut self, name: impl Into<String>) -> Result<&mut Self, GraphBuildError> {
        let name = name.into();
        if !self.nodes.contains_key(&name) {
            return Err(GraphBuildError::UnknownNode(name));
        }
        tracing::debug!(node = %name, "set entry point");
        self.entry = Some(name);
        Ok(self)
    }

    /// Consumes the builder and produces the immutable, runnable graph.
    ///
    /// Re-validates every invariant exhaustively (entry point set and
    /// registered, all edge endpoints and routers valid and router-capable),
    /// rejecting on the first violation. Nodes unreachable from the entry
    /// point are only logged; they usually indicate a wiring mistake but do
    /// not make the graph unrunnable.
    pub fn compile(self) -> Result<CompiledWorkflowGraph<S>, GraphBuildError> {
        let entry = self.entry.clone().ok_or(GraphBuildError::MissingEntryPoint)?;
        if !self.nodes.contains_key(&entry) {
            return Err(GraphBuildError::UnknownNode(entry));
        }
        self.validate_edges()?;
        self.warn_unreachable(&entry);
        tracing::debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            entry = %entry,
            "compiled workflow graph"
        );
        Ok(CompiledWorkflowGraph::new(self.nodes, self.edges, entry))
    }

    fn validate_edges(&self) -> Result<(), GraphBuildError> {
        for (from, rule) in &self.edges {
            if !self.nodes.contains_key(from) {
                return Err(GraphBuildError::UnknownNode(from.clone()));
            }
            match rule {
                EdgeRule::Direct(transition) => self.validate_transition(transition)?,
                EdgeRule::Conditional { router, routes } => {
                    let router_node = self
                        .nodes
                        .get(router)
                        .ok_or_else(|| GraphBuildError::UnknownNode(router.clone()))?;
                    if router_node.as_router().is_none() {
                        return Err(GraphBuildError::NotARouter(router.clone()));
                    }
                    for transition in routes.values() {
                        self.validate_transition(transition)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn validate_transition(&self, transition: &Transition) -> Result<(), GraphBuildError> {
        match transition {
            Transition::End => Ok(()),
            Transition::To(name) if self.nodes.contains_key(name) => Ok(()),
            Transition::To(name) => Err(GraphBuildError::UnknownNode(name.clone())),
        }
    }

    fn warn_unreachable(&self, entry: &str) {
        let mut reachable = HashSet::new();
        let mut pending = vec![entry.to_string()];
        while let Some(name) = pending.pop() {
            if !reachable.insert(name.clone()) {
                continue;
            }
            let Some(rule) = self.edges.get(&name) else {
                continue;
            };
            let targets: Vec<&Transition> = match rule {
                EdgeRule::Direct(t) => vec![t],
                EdgeRule::Conditional { routes, .. } => routes.values().collect(),
            };
            for target in targets {
                if let Transition::To(next) = target {
                    if !reachable.contains(next) {
                        pending.push(next.clone());
                    }
                }
            }
        }
        for name in self.nodes.keys() {
            if !reachable.contains(name) {
                tracing::warn!(node = %name, "node is unreachable from the entry point");
            }
        }
    }
}
