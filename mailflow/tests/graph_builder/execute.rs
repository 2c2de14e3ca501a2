//! Execution behavior through the public API: last-registration-wins rules,
//! router failure propagation, budget handling on cyclic graphs.

use std::collections::HashMap;
use std::sync::Arc;

use mailflow::{ExecuteError, RunContext, RunOutcome, WorkflowGraph, END};

use crate::common::{BrokenRouter, Decide, Step};

#[tokio::test]
async fn later_direct_edge_replaces_earlier_one() {
    let mut graph = WorkflowGraph::new();
    graph
        .add_node("a", Arc::new(Step { delta: 1 }))
        .unwrap()
        .add_node("b", Arc::new(Step { delta: 100 }))
        .unwrap()
        .add_edge("a", "b")
        .unwrap()
        .add_edge("a", END)
        .unwrap()
        .set_entry_point("a")
        .unwrap();
    let compiled = graph.compile().unwrap();

    let report = compiled.execute(0, &RunContext::new("t", 10)).await.unwrap();
    // The second registration won: "b" was never visited.
    assert_eq!(report.state, 1);
    assert_eq!(report.outcome, RunOutcome::Completed);
}

#[tokio::test]
async fn conditional_edges_replace_a_direct_edge() {
    let mut graph = WorkflowGraph::new();
    graph
        .add_node(
            "a",
            Arc::new(Decide {
                delta: 1,
                decision: "finish",
            }),
        )
        .unwrap()
        .add_node("b", Arc::new(Step { delta: 100 }))
        .unwrap()
        .add_edge("a", "b")
        .unwrap()
        .add_conditional_edges(
            "a",
            "a",
            HashMap::from([("finish".to_string(), END.to_string())]),
        )
        .unwrap()
        .set_entry_point("a")
        .unwrap();
    let compiled = graph.compile().unwrap();

    let report = compiled.execute(0, &RunContext::new("t", 10)).await.unwrap();
    assert_eq!(report.state, 1);
    assert_eq!(report.steps, 1);
}

#[tokio::test]
async fn router_failure_propagates_with_post_step_state() {
    let mut graph = WorkflowGraph::new();
    graph
        .add_node("a", Arc::new(BrokenRouter))
        .unwrap()
        .add_conditional_edges("a", "a", HashMap::from([("x".to_string(), END.to_string())]))
        .unwrap()
        .set_entry_point("a")
        .unwrap();
    let compiled = graph.compile().unwrap();

    let failure = compiled
        .execute(0, &RunContext::new("t", 10))
        .await
        .unwrap_err();
    // The step itself succeeded before the router failed.
    assert_eq!(failure.state, 1);
    match &failure.error {
        ExecuteError::Router { node, source } => {
            assert_eq!(node, "a");
            assert_eq!(source.to_string(), "decision backend offline");
        }
        other => panic!("expected Router, got {other:?}"),
    }
}

#[tokio::test]
async fn conditional_self_loop_is_bounded_by_the_budget() {
    let mut graph = WorkflowGraph::new();
    graph
        .add_node(
            "a",
            Arc::new(Decide {
                delta: 1,
                decision: "again",
            }),
        )
        .unwrap()
        .add_conditional_edges(
            "a",
            "a",
            HashMap::from([("again".to_string(), "a".to_string())]),
        )
        .unwrap()
        .set_entry_point("a")
        .unwrap();
    let compiled = graph.compile().unwrap();

    let report = compiled.execute(0, &RunContext::new("t", 7)).await.unwrap();
    assert_eq!(report.state, 7);
    assert_eq!(report.steps, 7);
    assert_eq!(report.outcome, RunOutcome::BudgetExhausted);
}
