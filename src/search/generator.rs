//! Pull-based traversal: one relaxation event per `next()`.
//!
//! The generator owns a search cursor and advances it only when the consumer
//! asks for the next event, so nothing is accumulated and no thread runs in
//! the background. Dropping the iterator is the cancellation.
//!
//! Distances are written into the caller's map as the search proceeds. The
//! map is locked only while a step runs, so it can be read between events.

use std::iter::FusedIterator;

use tracing::debug;

use crate::graph::{Edge, GraphToken, GraphView};
use crate::model::Distance;
use crate::property::{PropertySource, VectorPropertyMap};
use crate::{Error, Result};
use super::astar::{AstarCursor, AstarParams};
use super::bfs::BfsCursor;
use super::dijkstra::DijkstraCursor;
use super::{Cursor, SearchEngine, SearchOutcome, Step, TerminationPolicy};

/// An edge relaxation: `target` was reached through `edge` at `distance`.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<D> {
    pub edge: Edge,
    pub source: usize,
    pub target: usize,
    pub distance: D,
}

pub struct TraversalGenerator<'a, D> {
    cursor: Box<dyn Cursor<D> + 'a>,
    token: GraphToken,
    outcome: Option<SearchOutcome>,
    failed: bool,
}

impl<'a, D: Distance> TraversalGenerator<'a, D> {
    fn new(cursor: Box<dyn Cursor<D> + 'a>, token: GraphToken) -> Self {
        Self { cursor, token, outcome: None, failed: false }
    }

    /// How the underlying search ended, once it has.
    pub fn outcome(&self) -> Option<SearchOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.failed || self.outcome.is_some()
    }
}

impl<D: Distance> Iterator for TraversalGenerator<'_, D> {
    type Item = Result<Event<D>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_finished() {
            return None;
        }
        loop {
            match self.cursor.advance() {
                Ok(Some(Step::Examined(_))) => continue,
                Ok(Some(Step::Relaxed(e, distance))) => {
                    return Some(Ok(Event {
                        edge: Edge::new(self.token.clone(), e),
                        source: e.source,
                        target: e.target,
                        distance,
                    }));
                }
                Ok(Some(Step::Stopped)) => {
                    self.outcome = Some(SearchOutcome::TerminatedEarly);
                    return None;
                }
                Ok(None) => {
                    self.outcome = Some(SearchOutcome::Completed);
                    return None;
                }
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err));
                }
            }
        }
    }
}

impl<D: Distance> FusedIterator for TraversalGenerator<'_, D> {}

fn ensure_supported() -> Result<()> {
    if cfg!(feature = "generator") {
        Ok(())
    } else {
        Err(Error::Unsupported("traversal generators are not available in this build".into()))
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl SearchEngine {
    /// Lazily run A*, yielding each relaxed edge. No predecessor map is kept.
    pub fn astar_generator<'a, G, D, W, S>(
        &self,
        g: &'a G,
        source: usize,
        dist: &'a VectorPropertyMap<D>,
        weight: &'a S,
        params: AstarParams<'a, D>,
    ) -> Result<TraversalGenerator<'a, D>>
    where
        G: GraphView,
        D: Distance,
        W: Distance + 'a,
        S: PropertySource<W>,
    {
        ensure_supported()?;
        debug!(source, vertices = g.num_vertices(), "astar generator");
        let cursor = AstarCursor::new(g, source, dist, None, weight, params, self.config())?;
        Ok(TraversalGenerator::new(Box::new(cursor), g.token().clone()))
    }

    pub fn dijkstra_generator<'a, G, D, W, S>(
        &self,
        g: &'a G,
        source: usize,
        policy: TerminationPolicy<D>,
        dist: &'a VectorPropertyMap<D>,
        weight: &'a S,
    ) -> Result<TraversalGenerator<'a, D>>
    where
        G: GraphView,
        D: Distance,
        W: Distance + 'a,
        S: PropertySource<W>,
    {
        ensure_supported()?;
        debug!(source, vertices = g.num_vertices(), "dijkstra generator");
        let cursor = DijkstraCursor::new(g, source, policy, dist, None, weight, self.config())?;
        Ok(TraversalGenerator::new(Box::new(cursor), g.token().clone()))
    }

    pub fn bfs_generator<'a, G, D>(
        &self,
        g: &'a G,
        source: usize,
        policy: TerminationPolicy<D>,
        dist: &'a VectorPropertyMap<D>,
    ) -> Result<TraversalGenerator<'a, D>>
    where
        G: GraphView,
        D: Distance,
    {
        ensure_supported()?;
        debug!(source, vertices = g.num_vertices(), "bfs generator");
        let cursor = BfsCursor::new(g, source, policy, dist, None, self.config())?;
        Ok(TraversalGenerator::new(Box::new(cursor), g.token().clone()))
    }
}

pub fn astar_generator<'a, G, D, W, S>(
    g: &'a G,
    source: usize,
    dist: &'a VectorPropertyMap<D>,
    weight: &'a S,
    params: AstarParams<'a, D>,
) -> Result<TraversalGenerator<'a, D>>
where
    G: GraphView,
    D: Distance,
    W: Distance + 'a,
    S: PropertySource<W>,
{
    SearchEngine::new().astar_generator(g, source, dist, weight, params)
}

pub fn dijkstra_generator<'a, G, D, W, S>(
    g: &'a G,
    source: usize,
    policy: TerminationPolicy<D>,
    dist: &'a VectorPropertyMap<D>,
    weight: &'a S,
) -> Result<TraversalGenerator<'a, D>>
where
    G: GraphView,
    D: Distance,
    W: Distance + 'a,
    S: PropertySource<W>,
{
    SearchEngine::new().dijkstra_generator(g, source, policy, dist, weight)
}

pub fn bfs_generator<'a, G: GraphView, D: Distance>(
    g: &'a G,
    source: usize,
    policy: TerminationPolicy<D>,
    dist: &'a VectorPropertyMap<D>,
) -> Result<TraversalGenerator<'a, D>> {
    SearchEngine::new().bfs_generator(g, source, policy, dist)
}


#[cfg(all(test, not(feature = "generator")))]
mod unsupported_tests {
    use super::*;
    use crate::graph::AdjacencyGraph;
    use crate::property::Key;

    #[test]
    fn test_constructors_report_unsupported() {
        let g = AdjacencyGraph::from_edges(true, 2, [(0, 1)]).unwrap();
        let dist = VectorPropertyMap::<f64>::new(Key::Vertex, 0);
        let w = VectorPropertyMap::from_vec(Key::Edge, vec![1.0]);

        let result = dijkstra_generator(&g, 0, TerminationPolicy::unbounded(), &dist, &w);
        assert!(matches!(result, Err(Error::Unsupported(_))));
        // Rejected before the maps are touched.
        assert!(dist.is_empty());
    }
}
