//! Liveness token shared between a graph and the handles it hands out.
//!
//! Handles never point at the graph itself. They hold a clone of the
//! graph's token, and the graph keeps the token's view of its vertex count
//! and live edge slots current. Dropping the graph kills the token, so a
//! handle that outlives its graph reports itself invalid instead of
//! dereferencing freed storage.

use std::sync::Arc;

use parking_lot::RwLock;

#[derive(Debug)]
struct LiveState {
    alive: bool,
    generation: u64,
    num_vertices: usize,
    /// Indexed by stable edge index.
    live_edges: Vec<bool>,
    num_edges: usize,
}

/// Shared liveness state for one graph.
///
/// Graph implementations own one token, update it on every mutation, and
/// call [`GraphToken::invalidate`] when torn down.
#[derive(Debug, Clone)]
pub struct GraphToken {
    inner: Arc<RwLock<LiveState>>,
}

impl GraphToken {
    pub fn new(num_vertices: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(LiveState {
                alive: true,
                generation: 0,
                num_vertices,
                live_edges: Vec::new(),
                num_edges: 0,
            })),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.inner.read().alive
    }

    /// Bumped on every structural change.
    pub fn generation(&self) -> u64 {
        self.inner.read().generation
    }

    /// Whether two tokens belong to the same graph.
    pub fn same_graph(&self, other: &GraphToken) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn num_vertices(&self) -> usize {
        let state = self.inner.read();
        if state.alive { state.num_vertices } else { 0 }
    }

    pub fn num_edges(&self) -> usize {
        let state = self.inner.read();
        if state.alive { state.num_edges } else { 0 }
    }

    /// One past the largest edge index ever handed out.
    pub fn edge_index_range(&self) -> usize {
        let state = self.inner.read();
        if state.alive { state.live_edges.len() } else { 0 }
    }

    pub fn contains_vertex(&self, v: usize) -> bool {
        let state = self.inner.read();
        state.alive && v < state.num_vertices
    }

    pub fn contains_edge(&self, index: usize) -> bool {
        let state = self.inner.read();
        state.alive && state.live_edges.get(index).copied().unwrap_or(false)
    }

    // ========================================================================
    // Mutation side (graph implementations only)
    // ========================================================================

    pub fn set_vertex_count(&self, n: usize) {
        let mut state = self.inner.write();
        state.num_vertices = n;
        state.generation += 1;
    }

    pub fn insert_edge(&self, index: usize) {
        let mut state = self.inner.write();
        if index >= state.live_edges.len() {
            state.live_edges.resize(index + 1, false);
        }
        if !state.live_edges[index] {
            state.live_edges[index] = true;
            state.num_edges += 1;
        }
        state.generation += 1;
    }

    pub fn remove_edge(&self, index: usize) {
        let mut state = self.inner.write();
        if let Some(slot) = state.live_edges.get_mut(index) {
            if *slot {
                *slot = false;
                state.num_edges -= 1;
            }
        }
        state.generation += 1;
    }

    /// Drop every vertex and edge. Edge indices stay reserved.
    pub fn clear(&self) {
        let mut state = self.inner.write();
        state.num_vertices = 0;
        state.live_edges.iter_mut().for_each(|slot| *slot = false);
        state.num_edges = 0;
        state.generation += 1;
    }

    /// Mark the graph as destroyed. Irreversible.
    pub fn invalidate(&self) {
        let mut state = self.inner.write();
        state.alive = false;
        state.generation += 1;
    }
}
