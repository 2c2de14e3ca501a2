//! Builder error cases: duplicate nodes, unknown references, reserved name,
//! non-router on conditional edges, missing entry point.

use std::collections::HashMap;
use std::sync::Arc;

use mailflow::{GraphBuildError, RunContext, WorkflowGraph, END};

use crate::common::{Decide, Step};

#[tokio::test]
async fn duplicate_node_is_rejected_and_first_registration_kept() {
    let mut graph = WorkflowGraph::new();
    graph.add_node("a", Arc::new(Step { delta: 1 })).unwrap();

    let err = graph
        .add_node("a", Arc::new(Step { delta: 100 }))
        .unwrap_err();
    assert_eq!(err, GraphBuildError::DuplicateNode("a".to_string()));

    // The first registration still runs.
    graph.add_edge("a", END).unwrap();
    graph.set_entry_point("a").unwrap();
    let compiled = graph.compile().unwrap();
    let report = compiled.execute(0, &RunContext::new("t", 10)).await.unwrap();
    assert_eq!(report.state, 1);
}

#[test]
fn end_marker_cannot_be_registered_as_a_node() {
    let mut graph = WorkflowGraph::<i32>::new();
    let err = graph.add_node(END, Arc::new(Step { delta: 1 })).unwrap_err();
    assert_eq!(err, GraphBuildError::ReservedName(END.to_string()));
}

#[test]
fn edge_from_unknown_node_is_rejected() {
    let mut graph = WorkflowGraph::<i32>::new();
    graph.add_node("a", Arc::new(Step { delta: 1 })).unwrap();
    let err = graph.add_edge("missing", "a").unwrap_err();
    assert_eq!(err, GraphBuildError::UnknownNode("missing".to_string()));
}

#[test]
fn edge_to_unknown_node_is_rejected() {
    let mut graph = WorkflowGraph::<i32>::new();
    graph.add_node("a", Arc::new(Step { delta: 1 })).unwrap();
    let err = graph.add_edge("a", "missing").unwrap_err();
    assert_eq!(err, GraphBuildError::UnknownNode("missing".to_string()));
}

#[test]
fn identical_direct_edge_is_rejected_as_duplicate() {
    let mut graph = WorkflowGraph::<i32>::new();
    graph.add_node("a", Arc::new(Step { delta: 1 })).unwrap();
    graph.add_node("b", Arc::new(Step { delta: 1 })).unwrap();
    graph.add_edge("a", "b").unwrap();
    let err = graph.add_edge("a", "b").unwrap_err();
    assert_eq!(
        err,
        GraphBuildError::DuplicateEdge {
            from: "a".to_string(),
            to: "b".to_string()
        }
    );
}

#[test]
fn conditional_edges_on_non_router_are_rejected() {
    let mut graph = WorkflowGraph::<i32>::new();
    graph.add_node("a", Arc::new(Step { delta: 1 })).unwrap();
    let err = graph
        .add_conditional_edges("a", "a", HashMap::from([("x".to_string(), END.to_string())]))
        .unwrap_err();
    assert_eq!(err, GraphBuildError::NotARouter("a".to_string()));
}

#[test]
fn conditional_route_to_unknown_node_is_rejected() {
    let mut graph = WorkflowGraph::<i32>::new();
    graph
        .add_node(
            "a",
            Arc::new(Decide {
                delta: 1,
                decision: "x",
            }),
        )
        .unwrap();
    let err = graph
        .add_conditional_edges(
            "a",
            "a",
            HashMap::from([("x".to_string(), "missing".to_string())]),
        )
        .unwrap_err();
    assert_eq!(err, GraphBuildError::UnknownNode("missing".to_string()));
}

#[test]
fn unknown_entry_point_is_rejected() {
    let mut graph = WorkflowGraph::<i32>::new();
    let err = graph.set_entry_point("missing").unwrap_err();
    assert_eq!(err, GraphBuildError::UnknownNode("missing".to_string()));
}

#[test]
fn compile_without_entry_point_fails_before_any_execution() {
    let mut graph = WorkflowGraph::<i32>::new();
    graph.add_node("a", Arc::new(Step { delta: 1 })).unwrap();
    graph.add_edge("a", END).unwrap();
    let err = graph.compile().unwrap_err();
    assert_eq!(err, GraphBuildError::MissingEntryPoint);
}
