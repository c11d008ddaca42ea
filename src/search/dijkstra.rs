//! Dijkstra's algorithm without a color map.
//!
//! The frontier is a `BinaryHeap` with lazy deletion: a decrease pushes a
//! fresh entry and stale ones are skipped when popped. The cutoff and the
//! target set are both checked when a vertex is examined.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use smallvec::SmallVec;

use crate::config::EngineConfig;
use crate::graph::{EdgeRef, GraphView};
use crate::model::Distance;
use crate::property::{PropertySource, VectorPropertyMap};
use crate::Result;
use super::{check_weight_map, edge_weight, lock, prepare, Control, Cursor, Phase, Step, TerminationPolicy};

/// Frontier entry. Reversed ordering turns `BinaryHeap` into a min-heap.
#[derive(Debug, Clone, Copy)]
struct HeapEntry<D> {
    dist: D,
    vertex: usize,
}

impl<D: PartialOrd> PartialEq for HeapEntry<D> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<D: PartialOrd> Eq for HeapEntry<D> {}

impl<D: PartialOrd> PartialOrd for HeapEntry<D> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<D: PartialOrd> Ord for HeapEntry<D> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .dist
            .partial_cmp(&self.dist)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.vertex.cmp(&self.vertex))
    }
}

pub struct DijkstraCursor<'a, G, D, W, S> {
    graph: &'a G,
    n: usize,
    policy: TerminationPolicy<D>,
    dist: &'a VectorPropertyMap<D>,
    pred: Option<&'a VectorPropertyMap<i64>>,
    weight: &'a S,
    heap: BinaryHeap<HeapEntry<D>>,
    current: Option<usize>,
    pending: SmallVec<[EdgeRef; 8]>,
    next_edge: usize,
    phase: Phase,
    _weight: std::marker::PhantomData<W>,
}

impl<'a, G, D, W, S> DijkstraCursor<'a, G, D, W, S>
where
    G: GraphView,
    D: Distance,
    W: Distance,
    S: PropertySource<W>,
{
    pub fn new(
        graph: &'a G,
        source: usize,
        policy: TerminationPolicy<D>,
        dist: &'a VectorPropertyMap<D>,
        pred: Option<&'a VectorPropertyMap<i64>>,
        weight: &'a S,
        config: &EngineConfig,
    ) -> Result<Self> {
        check_weight_map(weight)?;
        let n = graph.num_vertices();
        prepare(n, source, D::infinity(), D::zero(), dist, pred, config)?;

        let mut heap = BinaryHeap::new();
        heap.push(HeapEntry { dist: D::zero(), vertex: source });

        Ok(Self {
            graph,
            n,
            policy,
            dist,
            pred,
            weight,
            heap,
            current: None,
            pending: SmallVec::with_capacity(config.generator_edge_buffer),
            next_edge: 0,
            phase: Phase::Running,
            _weight: std::marker::PhantomData,
        })
    }

    fn step(&mut self) -> Result<Option<Step<D>>> {
        let weights = self.weight.reader();
        let mut dist = lock(self.dist, self.n)?;
        let mut pred = self.pred.map(|p| lock(p, self.n)).transpose()?;
        let inf = D::infinity();

        loop {
            if let Some(u) = self.current {
                while let Some(&e) = self.pending.get(self.next_edge) {
                    self.next_edge += 1;
                    let w: D = edge_weight(&weights, &e)?;
                    let candidate = dist[u].closed_add(w, inf);
                    if candidate < dist[e.target] {
                        dist[e.target] = candidate;
                        if let Some(pred) = pred.as_deref_mut() {
                            pred[e.target] = u as i64;
                        }
                        self.heap.push(HeapEntry { dist: candidate, vertex: e.target });
                        return Ok(Some(Step::Relaxed(e, candidate)));
                    }
                }
                self.current = None;
            }

            let Some(HeapEntry { dist: d, vertex: u }) = self.heap.pop() else {
                return Ok(None);
            };
            if d > dist[u] {
                continue;
            }
            // Everything left is unreachable.
            if d == inf {
                return Ok(None);
            }
            if self.policy.cutoff(u, d) == Control::Stop || self.policy.reach(u) == Control::Stop {
                return Ok(Some(Step::Stopped));
            }
            self.pending.clear();
            self.pending.extend(self.graph.out_edges(u));
            self.next_edge = 0;
            self.current = Some(u);
            return Ok(Some(Step::Examined(u)));
        }
    }
}

impl<G, D, W, S> Cursor<D> for DijkstraCursor<'_, G, D, W, S>
where
    G: GraphView,
    D: Distance,
    W: Distance,
    S: PropertySource<W>,
{
    fn advance(&mut self) -> Result<Option<Step<D>>> {
        if self.phase == Phase::Done {
            return Ok(None);
        }
        let step = self.step();
        if !matches!(step, Ok(Some(Step::Relaxed(..)) | Some(Step::Examined(_)))) {
            self.phase = Phase::Done;
        }
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyGraph;
    use crate::property::{ConstantPropertyMap, Key};
    use crate::search::{drive, SearchOutcome};

    fn diamond() -> (AdjacencyGraph, VectorPropertyMap<f64>) {
        // 0 -> 1 (1), 0 -> 2 (4), 1 -> 2 (2), 2 -> 3 (1), 1 -> 3 (5)
        let g = AdjacencyGraph::from_edges(true, 5, [(0, 1), (0, 2), (1, 2), (2, 3), (1, 3)]).unwrap();
        let w = VectorPropertyMap::from_vec(Key::Edge, vec![1.0, 4.0, 2.0, 1.0, 5.0]);
        (g, w)
    }

    fn run<S: PropertySource<f64>>(
        g: &AdjacencyGraph,
        w: &S,
        targets: &[usize],
        max: f64,
    ) -> (SearchOutcome, Vec<f64>, Vec<i64>) {
        let dist = VectorPropertyMap::<f64>::new(Key::Vertex, 0);
        let pred = VectorPropertyMap::<i64>::new(Key::Vertex, 0);
        let policy = TerminationPolicy::new(targets, max);
        let mut cursor =
            DijkstraCursor::new(g, 0, policy, &dist, Some(&pred), w, &EngineConfig::default()).unwrap();
        let outcome = drive(&mut cursor).unwrap();
        (outcome, dist.to_vec(), pred.to_vec())
    }

    #[test]
    fn test_weighted_distances() {
        let (g, w) = diamond();
        let (outcome, dist, pred) = run(&g, &w, &[], 0.0);

        assert_eq!(outcome, SearchOutcome::Completed);
        assert_eq!(dist, vec![0.0, 1.0, 3.0, 4.0, f64::INFINITY]);
        assert_eq!(pred, vec![0, 0, 1, 2, 4]);
    }

    #[test]
    fn test_single_target_stops_at_examine() {
        let (g, w) = diamond();
        let (outcome, dist, _) = run(&g, &w, &[2], 0.0);
        assert_eq!(outcome, SearchOutcome::TerminatedEarly);
        assert_eq!(dist[2], 3.0);
    }

    #[test]
    fn test_cutoff() {
        let (g, w) = diamond();
        let (outcome, dist, _) = run(&g, &w, &[], 2.0);
        assert_eq!(outcome, SearchOutcome::TerminatedEarly);
        assert_eq!(dist[1], 1.0);
        assert_eq!(dist[4], f64::INFINITY);
    }

    #[test]
    fn test_constant_weights_match_hops() {
        let (g, _) = diamond();
        let w = ConstantPropertyMap::new(Key::Edge, 1.0);
        let (_, dist, _) = run(&g, &w, &[], 0.0);
        assert_eq!(dist, vec![0.0, 1.0, 1.0, 2.0, f64::INFINITY]);
    }

    #[test]
    fn test_vertex_keyed_weight_rejected() {
        let (g, _) = diamond();
        let w = VectorPropertyMap::<f64>::new(Key::Vertex, 5);
        let dist = VectorPropertyMap::<f64>::new(Key::Vertex, 0);
        let result = DijkstraCursor::new(
            &g,
            0,
            TerminationPolicy::unbounded(),
            &dist,
            None,
            &w,
            &EngineConfig::default(),
        );
        assert!(matches!(result, Err(crate::Error::TypeError { .. })));
    }
}
