//! A* search with caller-supplied heuristic, comparator and combiner.
//!
//! The frontier is ordered by `cost = combine(dist, h(v))` under `compare`.
//! A vertex that is already closed is re-opened when a cheaper path to it
//! turns up, so an inconsistent heuristic still yields correct distances.
//! Callback errors abort the search and are returned as they are.

use smallvec::SmallVec;
use tracing::trace;

use crate::config::EngineConfig;
use crate::graph::{EdgeRef, GraphView};
use crate::model::Distance;
use crate::property::{PropertySource, VectorPropertyMap};
use crate::Result;
use super::queue::{CostQueue, Entry};
use super::{check_weight_map, edge_weight, lock, prepare, Control, Cursor, Phase, Step, TerminationPolicy};

pub type Heuristic<'f, D> = Box<dyn FnMut(usize) -> Result<D> + 'f>;
pub type Compare<'f, D> = Box<dyn FnMut(D, D) -> Result<bool> + 'f>;
pub type Combine<'f, D> = Box<dyn FnMut(D, D) -> Result<D> + 'f>;

// ============================================================================
// AstarParams
// ============================================================================

/// Callbacks and sentinels for one A* run.
///
/// Defaults: `compare` is `<`, `combine` is addition with `infinity`
/// absorbing, `zero` and `infinity` are the kind's own.
pub struct AstarParams<'f, D> {
    heuristic: Heuristic<'f, D>,
    compare: Option<Compare<'f, D>>,
    combine: Option<Combine<'f, D>>,
    zero: D,
    infinity: D,
    policy: TerminationPolicy<D>,
}

impl<'f, D: Distance> AstarParams<'f, D> {
    pub fn new(heuristic: impl FnMut(usize) -> Result<D> + 'f) -> Self {
        Self {
            heuristic: Box::new(heuristic),
            compare: None,
            combine: None,
            zero: D::zero(),
            infinity: D::infinity(),
            policy: TerminationPolicy::unbounded(),
        }
    }

    /// `h(v) = 0` everywhere: plain Dijkstra order.
    pub fn uninformed() -> Self {
        Self::new(|_| Ok(D::zero()))
    }

    pub fn compare(mut self, compare: impl FnMut(D, D) -> Result<bool> + 'f) -> Self {
        self.compare = Some(Box::new(compare));
        self
    }

    pub fn combine(mut self, combine: impl FnMut(D, D) -> Result<D> + 'f) -> Self {
        self.combine = Some(Box::new(combine));
        self
    }

    pub fn zero(mut self, zero: D) -> Self {
        self.zero = zero;
        self
    }

    pub fn infinity(mut self, infinity: D) -> Self {
        self.infinity = infinity;
        self
    }

    pub fn policy(mut self, policy: TerminationPolicy<D>) -> Self {
        self.policy = policy;
        self
    }

    fn h(&mut self, v: usize) -> Result<D> {
        (self.heuristic)(v)
    }

    fn less(&mut self, a: D, b: D) -> Result<bool> {
        match self.compare.as_mut() {
            Some(compare) => compare(a, b),
            None => Ok(a < b),
        }
    }

    fn add(&mut self, a: D, b: D) -> Result<D> {
        match self.combine.as_mut() {
            Some(combine) => combine(a, b),
            None => Ok(a.closed_add(b, self.infinity)),
        }
    }
}

// ============================================================================
// AstarCursor
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

pub struct AstarCursor<'a, 'f, G, D, W, S> {
    graph: &'a G,
    n: usize,
    params: AstarParams<'f, D>,
    dist: &'a VectorPropertyMap<D>,
    pred: Option<&'a VectorPropertyMap<i64>>,
    weight: &'a S,
    cost: Vec<D>,
    color: Vec<Color>,
    version: Vec<u32>,
    queue: CostQueue<D>,
    current: Option<usize>,
    pending: SmallVec<[EdgeRef; 8]>,
    next_edge: usize,
    phase: Phase,
    _weight: std::marker::PhantomData<W>,
}

impl<'a, 'f, G, D, W, S> AstarCursor<'a, 'f, G, D, W, S>
where
    G: GraphView,
    D: Distance,
    W: Distance,
    S: PropertySource<W>,
{
    pub fn new(
        graph: &'a G,
        source: usize,
        dist: &'a VectorPropertyMap<D>,
        pred: Option<&'a VectorPropertyMap<i64>>,
        weight: &'a S,
        mut params: AstarParams<'f, D>,
        config: &EngineConfig,
    ) -> Result<Self> {
        check_weight_map(weight)?;
        let n = graph.num_vertices();
        prepare(n, source, params.infinity, params.zero, dist, pred, config)?;

        let mut cost = vec![params.infinity; n];
        let mut color = vec![Color::White; n];
        let h = params.h(source)?;
        cost[source] = params.add(params.zero, h)?;
        color[source] = Color::Gray;

        let mut queue = CostQueue::new();
        let mut less = |a, b| params.less(a, b);
        queue.push(Entry { cost: cost[source], vertex: source, version: 0 }, &mut less)?;

        Ok(Self {
            graph,
            n,
            params,
            dist,
            pred,
            weight,
            cost,
            color,
            version: vec![0; n],
            queue,
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

        loop {
            if let Some(u) = self.current {
                while let Some(&e) = self.pending.get(self.next_edge) {
                    self.next_edge += 1;
                    let v = e.target;
                    let w: D = edge_weight(&weights, &e)?;
                    let candidate = self.params.add(dist[u], w)?;
                    if !self.params.less(candidate, dist[v])? {
                        continue;
                    }
                    dist[v] = candidate;
                    if let Some(pred) = pred.as_deref_mut() {
                        pred[v] = u as i64;
                    }
                    let h = self.params.h(v)?;
                    self.cost[v] = self.params.add(candidate, h)?;
                    if self.color[v] == Color::Black {
                        trace!(vertex = v, "re-opening closed vertex");
                    }
                    self.color[v] = Color::Gray;
                    self.version[v] = self.version[v].wrapping_add(1);

                    let entry = Entry { cost: self.cost[v], vertex: v, version: self.version[v] };
                    let params = &mut self.params;
                    self.queue.push(entry, &mut |a, b| params.less(a, b))?;
                    return Ok(Some(Step::Relaxed(e, candidate)));
                }
                self.color[u] = Color::Black;
                self.current = None;
            }

            let params = &mut self.params;
            let Some(entry) = self.queue.pop(&mut |a, b| params.less(a, b))? else {
                return Ok(None);
            };
            let u = entry.vertex;
            if entry.version != self.version[u] || self.color[u] == Color::Black {
                continue;
            }
            if self.params.policy.cutoff(u, dist[u]) == Control::Stop
                || self.params.policy.reach(u) == Control::Stop
            {
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

impl<G, D, W, S> Cursor<D> for AstarCursor<'_, '_, G, D, W, S>
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
