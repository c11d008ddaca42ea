//! Bellman-Ford shortest paths for arbitrary edge weights.
//!
//! Distances start at the kind's `MAX` rather than the canonical sentinel so
//! the relaxation arithmetic is the same for every kind; floating kinds are
//! normalized from `MAX` to `+inf` afterwards.

use tracing::{trace, warn};

use crate::config::EngineConfig;
use crate::graph::{EdgeRef, GraphView};
use crate::model::Distance;
use crate::property::{PropertySource, VectorPropertyMap};
use crate::{Error, Result};
use super::{check_weight_map, edge_weight, lock, prepare, SearchOutcome};

pub(crate) fn run<G, D, W, S>(
    g: &G,
    source: usize,
    dist: &VectorPropertyMap<D>,
    pred: &VectorPropertyMap<i64>,
    weight: &S,
    config: &EngineConfig,
) -> Result<SearchOutcome>
where
    G: GraphView,
    D: Distance,
    W: Distance,
    S: PropertySource<W>,
{
    check_weight_map(weight)?;
    let n = g.num_vertices();
    let inf = D::max_value();
    prepare(n, source, inf, D::zero(), dist, Some(pred), config)?;

    let edges: Vec<EdgeRef> = g.edges().collect();
    let weights: Vec<D> = {
        let reader = weight.reader();
        edges.iter().map(|e| edge_weight(&reader, e)).collect::<Result<_>>()?
    };
    let undirected = !g.is_directed();

    let mut dist = lock(dist, n)?;
    let mut pred = lock(pred, n)?;

    for round in 0..n {
        let mut changed = false;
        for (e, &w) in edges.iter().zip(&weights) {
            changed |= relax(&mut dist, &mut pred, e.source, e.target, w, inf);
            if undirected {
                changed |= relax(&mut dist, &mut pred, e.target, e.source, w, inf);
            }
        }
        if !changed {
            trace!(rounds = round + 1, "bellman-ford converged");
            break;
        }
    }

    let improvable = |u: usize, v: usize, w: D| dist[u].closed_add(w, inf) < dist[v];
    let cycle = edges.iter().zip(&weights).any(|(e, &w)| {
        improvable(e.source, e.target, w) || (undirected && improvable(e.target, e.source, w))
    });
    if cycle {
        warn!(source, "negative cycle reachable from source");
        return Err(Error::NegativeCycle);
    }

    dist.iter_mut().for_each(|d| *d = d.normalize_unreachable());
    Ok(SearchOutcome::Completed)
}

fn relax<D: Distance>(dist: &mut [D], pred: &mut [i64], u: usize, v: usize, w: D, inf: D) -> bool {
    let candidate = dist[u].closed_add(w, inf);
    if candidate < dist[v] {
        dist[v] = candidate;
        pred[v] = u as i64;
        true
    } else {
        false
    }
}
