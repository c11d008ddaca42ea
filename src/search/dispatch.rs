//! Entry points for callers that hold only type-erased properties.
//!
//! The concrete distance and weight kinds are picked by matching the
//! [`AnyProperty`] variants. Every numeric distance kind is paired with
//! every numeric weight kind; anything else is a `TypeError`.

use tracing::debug;

use crate::graph::GraphView;
use crate::model::{Distance, ScalarValue};
use crate::property::map::read_only_error;
use crate::property::{AnyProperty, Key, PropertyStore, VectorPropertyMap};
use crate::{Error, Result};
use super::{AstarParams, SearchEngine, SearchOutcome};

/// Bind `$d` to the writable vector map behind a numeric distance property.
macro_rules! with_dist {
    ($prop:expr, |$d:ident| $body:expr) => {
        match $prop {
            AnyProperty::Int16(PropertyStore::Vector($d)) => $body,
            AnyProperty::Int32(PropertyStore::Vector($d)) => $body,
            AnyProperty::Int64(PropertyStore::Vector($d)) => $body,
            AnyProperty::Double(PropertyStore::Vector($d)) => $body,
            other => return Err(mismatch("numeric vertex distance map", other)),
        }
    };
}

/// Bind `$w` to the store behind a numeric edge weight property.
macro_rules! with_weight {
    ($prop:expr, |$w:ident| $body:expr) => {
        match $prop {
            AnyProperty::Int16($w) => $body,
            AnyProperty::Int32($w) => $body,
            AnyProperty::Int64($w) => $body,
            AnyProperty::Double($w) => $body,
            other => return Err(mismatch("numeric edge weight map", other)),
        }
    };
}

fn mismatch(expected: &str, got: &AnyProperty) -> Error {
    let what = if got.is_index_map() { "index map" } else { "property" };
    Error::TypeError {
        expected: expected.into(),
        got: format!("{} {} {what}", got.key(), got.type_name()),
    }
}

fn writable(prop: &AnyProperty) -> Result<()> {
    if prop.is_writable() { Ok(()) } else { Err(read_only_error()) }
}

fn predecessor_map(pred: &AnyProperty) -> Result<&VectorPropertyMap<i64>> {
    match pred {
        AnyProperty::Int64(PropertyStore::Vector(m)) if m.key() == Key::Vertex => {
            writable(pred)?;
            Ok(m)
        }
        other => Err(mismatch("int64_t vertex predecessor map", other)),
    }
}

// ============================================================================
// DynAstarParams
// ============================================================================

pub type DynHeuristic<'f> = Box<dyn FnMut(usize) -> Result<ScalarValue> + 'f>;
pub type DynCompare<'f> = Box<dyn FnMut(ScalarValue, ScalarValue) -> Result<bool> + 'f>;
pub type DynCombine<'f> = Box<dyn FnMut(ScalarValue, ScalarValue) -> Result<ScalarValue> + 'f>;

/// [`AstarParams`] with callbacks over [`ScalarValue`].
///
/// Callback results and the sentinels are converted to the distance kind
/// with the usual lossless coercions; a value that does not convert fails
/// the search with `TypeError`.
pub struct DynAstarParams<'f> {
    heuristic: DynHeuristic<'f>,
    compare: Option<DynCompare<'f>>,
    combine: Option<DynCombine<'f>>,
    zero: Option<ScalarValue>,
    infinity: Option<ScalarValue>,
}

impl<'f> DynAstarParams<'f> {
    pub fn new(heuristic: impl FnMut(usize) -> Result<ScalarValue> + 'f) -> Self {
        Self { heuristic: Box::new(heuristic), compare: None, combine: None, zero: None, infinity: None }
    }

    pub fn compare(mut self, compare: impl FnMut(ScalarValue, ScalarValue) -> Result<bool> + 'f) -> Self {
        self.compare = Some(Box::new(compare));
        self
    }

    pub fn combine(
        mut self,
        combine: impl FnMut(ScalarValue, ScalarValue) -> Result<ScalarValue> + 'f,
    ) -> Self {
        self.combine = Some(Box::new(combine));
        self
    }

    pub fn zero(mut self, zero: ScalarValue) -> Self {
        self.zero = Some(zero);
        self
    }

    pub fn infinity(mut self, infinity: ScalarValue) -> Self {
        self.infinity = Some(infinity);
        self
    }

    fn into_typed<D: Distance>(self) -> Result<AstarParams<'f, D>> {
        let mut heuristic = self.heuristic;
        let mut params = AstarParams::new(move |v| D::from_value(heuristic(v)?));
        if let Some(mut compare) = self.compare {
            params = params.compare(move |a: D, b: D| compare(a.into_value(), b.into_value()));
        }
        if let Some(mut combine) = self.combine {
            params = params.combine(move |a: D, b: D| D::from_value(combine(a.into_value(), b.into_value())?));
        }
        if let Some(zero) = self.zero {
            params = params.zero(D::from_value(zero)?);
        }
        if let Some(infinity) = self.infinity {
            params = params.infinity(D::from_value(infinity)?);
        }
        Ok(params)
    }
}

// ============================================================================
// Entry points
// ============================================================================

impl SearchEngine {
    /// Distances from `source` through erased maps.
    ///
    /// Without a weight this is BFS; with one it is Dijkstra, or
    /// Bellman-Ford when `bellman_ford` is set.
    #[allow(clippy::too_many_arguments)]
    pub fn get_dists<G: GraphView>(
        &self,
        g: &G,
        source: usize,
        targets: &[usize],
        dist: &AnyProperty,
        weight: Option<&AnyProperty>,
        pred: &AnyProperty,
        max_dist: f64,
        bellman_ford: bool,
    ) -> Result<SearchOutcome> {
        debug!(dist = dist.type_name(), weighted = weight.is_some(), bellman_ford, "get_dists");
        writable(dist)?;
        let pred = predecessor_map(pred)?;
        let Some(weight) = weight else {
            return with_dist!(dist, |d| self.bfs(g, source, targets, max_dist, d, pred));
        };
        with_dist!(dist, |d| with_weight!(weight, |w| {
            if bellman_ford {
                self.bellman_ford(g, source, d, pred, w)
            } else {
                self.dijkstra(g, source, targets, max_dist, d, pred, w)
            }
        }))
    }

    /// A* through erased maps.
    pub fn astar_search_dyn<G: GraphView>(
        &self,
        g: &G,
        source: usize,
        dist: &AnyProperty,
        pred: &AnyProperty,
        weight: &AnyProperty,
        params: DynAstarParams<'_>,
    ) -> Result<SearchOutcome> {
        debug!(dist = dist.type_name(), weight = weight.type_name(), "astar_search_dyn");
        writable(dist)?;
        let pred = predecessor_map(pred)?;
        with_dist!(dist, |d| with_weight!(weight, |w| {
            let params = params.into_typed()?;
            self.astar(g, source, d, pred, w, params)
        }))
    }
}

#[allow(clippy::too_many_arguments)]
pub fn get_dists<G: GraphView>(
    g: &G,
    source: usize,
    targets: &[usize],
    dist: &AnyProperty,
    weight: Option<&AnyProperty>,
    pred: &AnyProperty,
    max_dist: f64,
    bellman_ford: bool,
) -> Result<SearchOutcome> {
    SearchEngine::new().get_dists(g, source, targets, dist, weight, pred, max_dist, bellman_ford)
}

pub fn astar_search_dyn<G: GraphView>(
    g: &G,
    source: usize,
    dist: &AnyProperty,
    pred: &AnyProperty,
    weight: &AnyProperty,
    params: DynAstarParams<'_>,
) -> Result<SearchOutcome> {
    SearchEngine::new().astar_search_dyn(g, source, dist, pred, weight, params)
}
