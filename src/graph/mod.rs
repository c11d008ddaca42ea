//! # Graph View Contract
//!
//! The search engine never owns graph storage. It reads a graph through
//! [`GraphView`]: vertex iteration, out/in-edge iteration, stable vertex and
//! edge indices, and live counts.
//!
//! ## Implementations
//!
//! | Type | Module | Description |
//! |------|--------|-------------|
//! | `AdjacencyGraph` | `adjacency` | In-memory reference storage |
//! | `Reversed` | `view` | Swaps out- and in-edges of another view |
//! | `Undirected` | `view` | Follows edges in both directions |

pub mod adjacency;
pub mod handle;
pub mod token;
pub mod view;

pub use adjacency::AdjacencyGraph;
pub use handle::{Edge, Vertex};
pub use token::GraphToken;
pub use view::{Reversed, Undirected};

/// An edge as seen while expanding `source`.
///
/// For undirected views `source` is always the vertex being expanded, so
/// the same stored edge can appear with either orientation. `index` is the
/// stable edge index and never changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeRef {
    pub source: usize,
    pub target: usize,
    pub index: usize,
}

impl EdgeRef {
    pub fn new(source: usize, target: usize, index: usize) -> Self {
        Self { source, target, index }
    }

    /// Same edge, opposite orientation.
    pub fn reversed(self) -> Self {
        Self { source: self.target, target: self.source, index: self.index }
    }

    pub fn is_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Read-only access to a graph, as consumed by property maps and searches.
///
/// Vertices are the dense range `0..num_vertices()`. Edge indices are
/// stable and lie in `0..edge_index_range()`; removed edges leave holes.
pub trait GraphView {
    fn num_vertices(&self) -> usize;

    fn num_edges(&self) -> usize;

    /// One past the largest edge index in use. Edge property maps are sized to this.
    fn edge_index_range(&self) -> usize;

    fn is_directed(&self) -> bool;

    fn vertices(&self) -> impl Iterator<Item = usize> + '_ {
        0..self.num_vertices()
    }

    /// Edges leaving `v`, oriented with `source == v`.
    fn out_edges(&self, v: usize) -> impl Iterator<Item = EdgeRef> + '_;

    /// Edges entering `v`, oriented with `target == v`.
    fn in_edges(&self, v: usize) -> impl Iterator<Item = EdgeRef> + '_;

    /// Every edge exactly once, in its stored orientation.
    fn edges(&self) -> impl Iterator<Item = EdgeRef> + '_;

    /// The liveness token handles are checked against.
    fn token(&self) -> &GraphToken;

    /// Handle for vertex `v`. Not validated until used.
    fn vertex(&self, v: usize) -> Vertex {
        Vertex::new(self.token().clone(), v)
    }

    /// Handle for an edge produced by this view.
    fn edge(&self, e: EdgeRef) -> Edge {
        Edge::new(self.token().clone(), e)
    }
}
