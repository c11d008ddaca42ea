//! End-to-end tests for the streaming traversal generators.
//!
//! The central property: replaying a generator's events reproduces the
//! distance map of the materialized run on the same inputs.

#![cfg(feature = "generator")]

use graph_search::{
    astar_generator, bfs_generator, dijkstra_generator, run_astar, run_dijkstra, AdjacencyGraph,
    AstarParams, Error, Event, Key, SearchOutcome, TerminationPolicy, VectorPropertyMap,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

/// 3x3 grid, edges right and down, unit weights. Vertex `r * 3 + c`.
fn grid() -> (AdjacencyGraph, VectorPropertyMap<f64>) {
    let mut edges = Vec::new();
    for r in 0..3 {
        for c in 0..3 {
            let v = r * 3 + c;
            if c < 2 {
                edges.push((v, v + 1));
            }
            if r < 2 {
                edges.push((v, v + 3));
            }
        }
    }
    let w = VectorPropertyMap::from_vec(Key::Edge, vec![1.0; edges.len()]);
    (AdjacencyGraph::from_edges(true, 9, edges).unwrap(), w)
}

fn manhattan_to_corner(v: usize) -> f64 {
    ((2 - v / 3) + (2 - v % 3)) as f64
}

fn replay(n: usize, source: usize, events: &[Event<f64>]) -> Vec<f64> {
    let mut dist = vec![f64::INFINITY; n];
    dist[source] = 0.0;
    for e in events {
        dist[e.target] = e.distance;
    }
    dist
}

// ============================================================================
// 1. Streaming
// ============================================================================

#[test]
fn test_generator_events_carry_edge_handles() {
    let (g, w) = grid();
    let dist = VectorPropertyMap::<f64>::new(Key::Vertex, 0);

    let first = astar_generator(&g, 0, &dist, &w, AstarParams::uninformed())
        .unwrap()
        .next()
        .unwrap()
        .unwrap();

    assert_eq!((first.source, first.target, first.distance), (0, 1, 1.0));
    assert!(first.edge.is_valid());
    assert_eq!(first.edge.to_string(), "(0, 1)");
    assert_eq!(first.edge.target().unwrap().index().unwrap(), 1);
}

#[test]
fn test_generator_replay_matches_materialized() {
    let (g, w) = grid();
    let params = || AstarParams::new(|v| Ok(manhattan_to_corner(v)));

    let dist = VectorPropertyMap::<f64>::new(Key::Vertex, 0);
    let pred = VectorPropertyMap::<i64>::new(Key::Vertex, 0);
    run_astar(&g, 0, &dist, &pred, &w, params()).unwrap();

    let scratch = VectorPropertyMap::<f64>::new(Key::Vertex, 0);
    let events: Vec<_> = astar_generator(&g, 0, &scratch, &w, params())
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();

    assert_eq!(replay(9, 0, &events), dist.to_vec());
    assert_eq!(scratch.to_vec(), dist.to_vec());
}

#[test]
fn test_consumer_stops_early() {
    let (g, w) = grid();
    let dist = VectorPropertyMap::<f64>::new(Key::Vertex, 0);

    let mut generator = dijkstra_generator(&g, 0, TerminationPolicy::unbounded(), &dist, &w).unwrap();
    let reached_far_corner = generator.by_ref().any(|e| e.map(|e| e.target == 8).unwrap_or(true));

    assert!(reached_far_corner);
    assert!(!generator.is_finished());
    drop(generator);
    assert_eq!(dist.get(8).unwrap(), 4.0);
}

#[test]
fn test_bfs_generator_with_policy() {
    let (g, _) = grid();
    let dist = VectorPropertyMap::<i32>::new(Key::Vertex, 0);

    let mut generator = bfs_generator(&g, 0, TerminationPolicy::new(&[4], 0.0), &dist).unwrap();
    let targets: Vec<usize> = generator.by_ref().map(|e| e.unwrap().target).collect();

    assert_eq!(targets, vec![1, 3, 2, 4]);
    assert_eq!(generator.outcome(), Some(SearchOutcome::TerminatedEarly));
}

#[test]
fn test_generator_invalid_source() {
    let (g, w) = grid();
    let dist = VectorPropertyMap::<f64>::new(Key::Vertex, 0);
    let result = astar_generator(&g, 42, &dist, &w, AstarParams::uninformed());
    assert!(matches!(result, Err(Error::InvalidHandle(_))));
}

// ============================================================================
// 2. Properties
// ============================================================================

fn weighted_graph() -> impl Strategy<Value = (usize, Vec<(usize, usize, u8)>)> {
    (1usize..10).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n, 0u8..8), 0..25)))
}

proptest! {
    #[test]
    fn prop_generator_equivalence((n, edges) in weighted_graph(), salt in 0usize..5) {
        let g = AdjacencyGraph::from_edges(true, n, edges.iter().map(|&(s, t, _)| (s, t))).unwrap();
        let w = VectorPropertyMap::from_vec(Key::Edge, edges.iter().map(|&(_, _, w)| f64::from(w)).collect());
        // Arbitrary, possibly inadmissible: re-opening keeps the result exact.
        let h = move |v: usize| Ok(((v * 7 + salt) % 5) as f64);

        let dist = VectorPropertyMap::<f64>::new(Key::Vertex, 0);
        let pred = VectorPropertyMap::<i64>::new(Key::Vertex, 0);
        run_astar(&g, 0, &dist, &pred, &w, AstarParams::new(h)).unwrap();

        let scratch = VectorPropertyMap::<f64>::new(Key::Vertex, 0);
        let events: Vec<_> = astar_generator(&g, 0, &scratch, &w, AstarParams::new(h))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        prop_assert_eq!(replay(n, 0, &events), dist.to_vec());

        let reference = VectorPropertyMap::<f64>::new(Key::Vertex, 0);
        let ref_pred = VectorPropertyMap::<i64>::new(Key::Vertex, 0);
        run_dijkstra(&g, 0, &[], 0.0, &reference, &ref_pred, &w).unwrap();
        prop_assert_eq!(dist.to_vec(), reference.to_vec());
    }
}
