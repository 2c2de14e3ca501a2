//! Shared test nodes over a plain counter state.

use async_trait::async_trait;
use mailflow::{Node, NodeError, NodeFailure, Router, RunContext};

/// Adds a fixed delta to the counter.
pub struct Step {
    pub delta: i32,
}

#[async_trait]
impl Node<i32> for Step {
    async fn run(&self, state: i32, _ctx: &RunContext) -> Result<i32, NodeFailure<i32>> {
        Ok(state + self.delta)
    }
}

/// Router-capable node returning a fixed decision key.
pub struct Decide {
    pub delta: i32,
    pub decision: &'static str,
}

#[async_trait]
impl Node<i32> for Decide {
    async fn run(&self, state: i32, _ctx: &RunContext) -> Result<i32, NodeFailure<i32>> {
        Ok(state + self.delta)
    }

    fn as_router(&self) -> Option<&dyn Router<i32>> {
        Some(self)
    }
}

#[async_trait]
impl Router<i32> for Decide {
    async fn route(&self, _state: &i32, _ctx: &RunContext) -> Result<String, NodeError> {
        Ok(self.decision.to_string())
    }
}

/// Router whose decision operation itself fails.
pub struct BrokenRouter;

#[async_trait]
impl Node<i32> for BrokenRouter {
    async fn run(&self, state: i32, _ctx: &RunContext) -> Result<i32, NodeFailure<i32>> {
        Ok(state + 1)
    }

    fn as_router(&self) -> Option<&dyn Router<i32>> {
        Some(self)
    }
}

#[async_trait]
impl Router<i32> for BrokenRouter {
    async fn route(&self, _state: &i32, _ctx: &RunContext) -> Result<String, NodeError> {
        Err("decision backend offline".into())
    }
}
