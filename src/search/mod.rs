//! # Search Engine
//!
//! Shortest-path drivers over any [`GraphView`], writing into caller-owned
//! property maps.
//!
//! | Driver | Module | Weights | Early termination |
//! |--------|--------|---------|-------------------|
//! | BFS | `bfs` | unit | cutoff at examine, targets at discovery |
//! | Dijkstra | `dijkstra` | non-negative | cutoff and targets at examine |
//! | Bellman-Ford | `bellman_ford` | any | none; fails on negative cycles |
//! | A* | `astar` | any `combine` | optional, at examine |
//!
//! BFS, Dijkstra and A* run as step-able cursors. [`drive`] runs a cursor
//! to the end for the materialized entry points; [`TraversalGenerator`]
//! hands its relaxation steps to the caller one at a time.
//!
//! Every run resizes the distance and predecessor maps to the live vertex
//! count and initializes them: distances to the kind's unreachable
//! sentinel (zero at the source), predecessors to the vertex itself.

pub mod astar;
pub mod bellman_ford;
pub mod bfs;
pub mod dijkstra;
pub mod dispatch;
pub mod generator;
mod init;
pub mod path;
pub mod policy;
mod queue;

use parking_lot::RwLockWriteGuard;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::graph::{EdgeRef, GraphView};
use crate::model::Distance;
use crate::property::map::read_only_error;
use crate::property::{Key, PropertySource, Reader, VectorPropertyMap};
use crate::{Error, Result};

pub use astar::AstarParams;
pub use dispatch::{astar_search_dyn, get_dists, DynAstarParams};
pub use generator::{astar_generator, bfs_generator, dijkstra_generator, Event, TraversalGenerator};
pub use path::shortest_path;
pub use policy::{Targets, TerminationPolicy};

// ============================================================================
// Outcomes and steps
// ============================================================================

/// How a search that did not fail ended.
///
/// `TerminatedEarly` is a normal outcome: whatever the maps hold is the
/// answer for everything the search reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchOutcome {
    Completed,
    TerminatedEarly,
}

/// Verdict of a termination check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Stop,
}

/// One unit of progress of a running search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step<D> {
    /// A vertex was taken off the frontier and its edges are next.
    Examined(usize),
    /// An edge improved the distance of its target to the given value.
    Relaxed(EdgeRef, D),
    /// The termination policy fired. Nothing follows.
    Stopped,
}

/// A search that can be advanced one step at a time.
///
/// `Ok(None)` means the frontier is exhausted. After `Stopped`, `None` or
/// an error the cursor keeps returning `Ok(None)`.
pub trait Cursor<D> {
    fn advance(&mut self) -> Result<Option<Step<D>>>;
}

/// Run a cursor to the end.
pub fn drive<D, C: Cursor<D> + ?Sized>(cursor: &mut C) -> Result<SearchOutcome> {
    loop {
        match cursor.advance()? {
            Some(Step::Stopped) => return Ok(SearchOutcome::TerminatedEarly),
            Some(_) => {}
            None => return Ok(SearchOutcome::Completed),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    Running,
    /// Stop is decided; report it on the next step.
    Halting,
    Done,
}

// ============================================================================
// Shared helpers
// ============================================================================

pub(crate) fn check_source(source: usize, n: usize) -> Result<()> {
    if source < n {
        Ok(())
    } else {
        Err(Error::InvalidHandle(format!("invalid vertex descriptor: {source}")))
    }
}

pub(crate) fn check_vertex_map(key: Key, what: &str) -> Result<()> {
    if key == Key::Vertex {
        Ok(())
    } else {
        Err(Error::TypeError {
            expected: format!("vertex {what} map"),
            got: format!("{key} property"),
        })
    }
}

pub(crate) fn check_weight_map<W, S: PropertySource<W>>(weight: &S) -> Result<()> {
    if weight.key() == Key::Edge {
        Ok(())
    } else {
        Err(Error::TypeError {
            expected: "edge weight map".into(),
            got: format!("{} property", weight.key()),
        })
    }
}

/// Lock a map for one step and make sure nobody shrank it since the run began.
pub(crate) fn lock<V: crate::model::Scalar>(
    map: &VectorPropertyMap<V>,
    n: usize,
) -> Result<RwLockWriteGuard<'_, Vec<V>>> {
    let guard = map.try_write()?;
    if guard.len() < n {
        return Err(Error::IndexOutOfRange { index: n - 1, len: guard.len() });
    }
    Ok(guard)
}

/// Weight of `e` converted to the distance kind.
pub(crate) fn edge_weight<W: Distance, D: Distance>(weights: &Reader<'_, W>, e: &EdgeRef) -> Result<D> {
    Ok(D::from_weight(weights.get(e.index)?))
}

/// Size and initialize the distance and predecessor maps for a run.
pub(crate) fn prepare<D: Distance>(
    n: usize,
    source: usize,
    unreachable: D,
    zero: D,
    dist: &VectorPropertyMap<D>,
    pred: Option<&VectorPropertyMap<i64>>,
    config: &EngineConfig,
) -> Result<()> {
    check_source(source, n)?;
    check_vertex_map(dist.key(), "distance")?;
    if !dist.is_writable() || pred.is_some_and(|p| !p.is_writable()) {
        return Err(read_only_error());
    }
    dist.resize(n)?;
    {
        let mut buf = dist.try_write()?;
        init::fill(&mut buf, unreachable, config.parallel_init_threshold);
        buf[source] = zero;
    }
    if let Some(pred) = pred {
        check_vertex_map(pred.key(), "predecessor")?;
        pred.resize(n)?;
        let mut buf = pred.try_write()?;
        init::fill_identity(&mut buf, config.parallel_init_threshold);
    }
    Ok(())
}

// ============================================================================
// SearchEngine
// ============================================================================

/// Entry point carrying an [`EngineConfig`].
///
/// The free `run_*` functions use the default configuration.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    config: EngineConfig,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Unweighted shortest paths from `source`.
    pub fn bfs<G, D>(
        &self,
        g: &G,
        source: usize,
        targets: &[usize],
        max_distance: f64,
        dist: &VectorPropertyMap<D>,
        pred: &VectorPropertyMap<i64>,
    ) -> Result<SearchOutcome>
    where
        G: GraphView,
        D: Distance,
    {
        debug!(source, vertices = g.num_vertices(), targets = targets.len(), max_distance, "bfs start");
        let policy = TerminationPolicy::new(targets, max_distance);
        let mut cursor = bfs::BfsCursor::new(g, source, policy, dist, Some(pred), &self.config)?;
        let outcome = drive(&mut cursor)?;
        debug!(?outcome, "bfs finished");
        Ok(outcome)
    }

    /// Shortest paths with non-negative weights. Negative weights are not
    /// checked and give unspecified distances.
    #[allow(clippy::too_many_arguments)]
    pub fn dijkstra<G, D, W, S>(
        &self,
        g: &G,
        source: usize,
        targets: &[usize],
        max_distance: f64,
        dist: &VectorPropertyMap<D>,
        pred: &VectorPropertyMap<i64>,
        weight: &S,
    ) -> Result<SearchOutcome>
    where
        G: GraphView,
        D: Distance,
        W: Distance,
        S: PropertySource<W>,
    {
        debug!(source, vertices = g.num_vertices(), targets = targets.len(), max_distance, "dijkstra start");
        let policy = TerminationPolicy::new(targets, max_distance);
        let mut cursor =
            dijkstra::DijkstraCursor::new(g, source, policy, dist, Some(pred), weight, &self.config)?;
        let outcome = drive(&mut cursor)?;
        debug!(?outcome, "dijkstra finished");
        Ok(outcome)
    }

    /// Shortest paths with arbitrary weights. Fails with `NegativeCycle`.
    pub fn bellman_ford<G, D, W, S>(
        &self,
        g: &G,
        source: usize,
        dist: &VectorPropertyMap<D>,
        pred: &VectorPropertyMap<i64>,
        weight: &S,
    ) -> Result<SearchOutcome>
    where
        G: GraphView,
        D: Distance,
        W: Distance,
        S: PropertySource<W>,
    {
        debug!(source, vertices = g.num_vertices(), edges = g.num_edges(), "bellman-ford start");
        let outcome = bellman_ford::run(g, source, dist, pred, weight, &self.config)?;
        debug!(?outcome, "bellman-ford finished");
        Ok(outcome)
    }

    /// Heuristic-guided search. Callback errors propagate unchanged.
    pub fn astar<G, D, W, S>(
        &self,
        g: &G,
        source: usize,
        dist: &VectorPropertyMap<D>,
        pred: &VectorPropertyMap<i64>,
        weight: &S,
        params: AstarParams<'_, D>,
    ) -> Result<SearchOutcome>
    where
        G: GraphView,
        D: Distance,
        W: Distance,
        S: PropertySource<W>,
    {
        debug!(source, vertices = g.num_vertices(), "astar start");
        let mut cursor =
            astar::AstarCursor::new(g, source, dist, Some(pred), weight, params, &self.config)?;
        let outcome = drive(&mut cursor)?;
        debug!(?outcome, "astar finished");
        Ok(outcome)
    }
}

// ============================================================================
// Default-config entry points
// ============================================================================

pub fn run_bfs<G: GraphView, D: Distance>(
    g: &G,
    source: usize,
    targets: &[usize],
    max_distance: f64,
    dist: &VectorPropertyMap<D>,
    pred: &VectorPropertyMap<i64>,
) -> Result<SearchOutcome> {
    SearchEngine::new().bfs(g, source, targets, max_distance, dist, pred)
}

#[allow(clippy::too_many_arguments)]
pub fn run_dijkstra<G, D, W, S>(
    g: &G,
    source: usize,
    targets: &[usize],
    max_distance: f64,
    dist: &VectorPropertyMap<D>,
    pred: &VectorPropertyMap<i64>,
    weight: &S,
) -> Result<SearchOutcome>
where
    G: GraphView,
    D: Distance,
    W: Distance,
    S: PropertySource<W>,
{
    SearchEngine::new().dijkstra(g, source, targets, max_distance, dist, pred, weight)
}

pub fn run_bellman_ford<G, D, W, S>(
    g: &G,
    source: usize,
    dist: &VectorPropertyMap<D>,
    pred: &VectorPropertyMap<i64>,
    weight: &S,
) -> Result<SearchOutcome>
where
    G: GraphView,
    D: Distance,
    W: Distance,
    S: PropertySource<W>,
{
    SearchEngine::new().bellman_ford(g, source, dist, pred, weight)
}

pub fn run_astar<G, D, W, S>(
    g: &G,
    source: usize,
    dist: &VectorPropertyMap<D>,
    pred: &VectorPropertyMap<i64>,
    weight: &S,
    params: AstarParams<'_, D>,
) -> Result<SearchOutcome>
where
    G: GraphView,
    D: Distance,
    W: Distance,
    S: PropertySource<W>,
{
    SearchEngine::new().astar(g, source, dist, pred, weight, params)
}
