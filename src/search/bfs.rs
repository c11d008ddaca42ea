//! Breadth-first search with unit edge lengths.
//!
//! Distances grow by one per tree edge. The cutoff is checked when a vertex
//! is examined, targets when a vertex is discovered; the source counts as
//! discovered before the first step.

use std::collections::VecDeque;

use smallvec::SmallVec;

use crate::config::EngineConfig;
use crate::graph::{EdgeRef, GraphView};
use crate::model::Distance;
use crate::property::VectorPropertyMap;
use crate::Result;
use super::{lock, prepare, Control, Cursor, Phase, Step, TerminationPolicy};

pub struct BfsCursor<'a, G, D> {
    graph: &'a G,
    n: usize,
    policy: TerminationPolicy<D>,
    dist: &'a VectorPropertyMap<D>,
    pred: Option<&'a VectorPropertyMap<i64>>,
    discovered: Vec<bool>,
    queue: VecDeque<usize>,
    current: Option<usize>,
    pending: SmallVec<[EdgeRef; 8]>,
    next_edge: usize,
    phase: Phase,
}

impl<'a, G: GraphView, D: Distance> BfsCursor<'a, G, D> {
    pub fn new(
        graph: &'a G,
        source: usize,
        mut policy: TerminationPolicy<D>,
        dist: &'a VectorPropertyMap<D>,
        pred: Option<&'a VectorPropertyMap<i64>>,
        config: &EngineConfig,
    ) -> Result<Self> {
        let n = graph.num_vertices();
        prepare(n, source, D::infinity(), D::zero(), dist, pred, config)?;

        let mut discovered = vec![false; n];
        discovered[source] = true;
        let phase = match policy.reach(source) {
            Control::Stop => Phase::Halting,
            Control::Continue => Phase::Running,
        };

        Ok(Self {
            graph,
            n,
            policy,
            dist,
            pred,
            discovered,
            queue: VecDeque::from([source]),
            current: None,
            pending: SmallVec::with_capacity(config.generator_edge_buffer),
            next_edge: 0,
            phase,
        })
    }
}

impl<G: GraphView, D: Distance> Cursor<D> for BfsCursor<'_, G, D> {
    fn advance(&mut self) -> Result<Option<Step<D>>> {
        match self.phase {
            Phase::Done => return Ok(None),
            Phase::Halting => {
                self.phase = Phase::Done;
                return Ok(Some(Step::Stopped));
            }
            Phase::Running => {}
        }

        let step = self.step();
        if !matches!(step, Ok(Some(Step::Relaxed(..)) | Some(Step::Examined(_)))) {
            self.phase = Phase::Done;
        }
        step
    }
}

impl<G: GraphView, D: Distance> BfsCursor<'_, G, D> {
    fn step(&mut self) -> Result<Option<Step<D>>> {
        let mut dist = lock(self.dist, self.n)?;
        let mut pred = self.pred.map(|p| lock(p, self.n)).transpose()?;

        loop {
            if let Some(u) = self.current {
                while let Some(&e) = self.pending.get(self.next_edge) {
                    self.next_edge += 1;
                    let v = e.target;
                    if self.discovered[v] {
                        continue;
                    }
                    self.discovered[v] = true;
                    let d = dist[u].closed_add(D::one(), D::infinity());
                    dist[v] = d;
                    if let Some(pred) = pred.as_deref_mut() {
                        pred[v] = u as i64;
                    }
                    self.queue.push_back(v);
                    if self.policy.reach(v) == Control::Stop {
                        self.phase = Phase::Halting;
                    }
                    return Ok(Some(Step::Relaxed(e, d)));
                }
                self.current = None;
            }

            let Some(u) = self.queue.pop_front() else {
                return Ok(None);
            };
            if self.policy.cutoff(u, dist[u]) == Control::Stop {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyGraph;
    use crate::search::{drive, SearchOutcome};

    fn run(g: &AdjacencyGraph, targets: &[usize], max: f64) -> (SearchOutcome, Vec<i32>, Vec<i64>) {
        let dist = VectorPropertyMap::<i32>::new(crate::property::Key::Vertex, 0);
        let pred = VectorPropertyMap::<i64>::new(crate::property::Key::Vertex, 0);
        let policy = TerminationPolicy::new(targets, max);
        let mut cursor =
            BfsCursor::new(g, 0, policy, &dist, Some(&pred), &EngineConfig::default()).unwrap();
        let outcome = drive(&mut cursor).unwrap();
        drop(cursor);
        (outcome, dist.to_vec(), pred.to_vec())
    }

    #[test]
    fn test_levels_and_predecessors() {
        let g = AdjacencyGraph::from_edges(true, 5, [(0, 1), (0, 2), (1, 3), (2, 3)]).unwrap();
        let (outcome, dist, pred) = run(&g, &[], 0.0);

        assert_eq!(outcome, SearchOutcome::Completed);
        assert_eq!(dist, vec![0, 1, 1, 2, i32::MAX]);
        assert_eq!(pred, vec![0, 0, 0, 1, 4]);
    }

    #[test]
    fn test_stops_at_target_discovery() {
        let g = AdjacencyGraph::from_edges(true, 4, [(0, 1), (1, 2), (2, 3)]).unwrap();
        let (outcome, dist, _) = run(&g, &[2], 0.0);

        assert_eq!(outcome, SearchOutcome::TerminatedEarly);
        assert_eq!(dist[2], 2);
        assert_eq!(dist[3], i32::MAX);
    }

    #[test]
    fn test_cutoff_at_examine() {
        let g = AdjacencyGraph::from_edges(true, 4, [(0, 1), (1, 2), (2, 3)]).unwrap();
        let (outcome, dist, _) = run(&g, &[], 1.0);

        // Vertex 2 is discovered while expanding 1, then examined and rejected.
        assert_eq!(outcome, SearchOutcome::TerminatedEarly);
        assert_eq!(dist, vec![0, 1, 2, i32::MAX]);
    }

    #[test]
    fn test_source_as_target() {
        let g = AdjacencyGraph::from_edges(true, 2, [(0, 1)]).unwrap();
        let (outcome, dist, _) = run(&g, &[0], 0.0);
        assert_eq!(outcome, SearchOutcome::TerminatedEarly);
        assert_eq!(dist, vec![0, i32::MAX]);
    }
}
