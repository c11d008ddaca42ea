//! In-memory adjacency-list graph.
//!
//! This is the reference implementation of `GraphView`. Graph storage is
//! normally supplied by the embedding application; this type exists so the
//! engine can be embedded without one and exercised in tests.
//!
//! ## Limitations
//!
//! - **Append-only vertices**: vertices are the dense range `0..n`. Only
//!   `clear()` removes them.
//! - **No index reuse**: a removed edge leaves a hole in the edge index
//!   range. Edge property maps keep their slot for it.
//! - **Single writer**: mutation takes `&mut self`; share it behind your own
//!   lock if several threads need to write.

use crate::{Error, Result};
use super::{EdgeRef, GraphToken, GraphView};

// ============================================================================
// AdjacencyGraph
// ============================================================================

/// Adjacency-list graph with stable edge indices.
#[derive(Debug)]
pub struct AdjacencyGraph {
    directed: bool,
    /// vertex → (target, edge index)
    out: Vec<Vec<(usize, usize)>>,
    /// vertex → (source, edge index)
    inc: Vec<Vec<(usize, usize)>>,
    /// edge index → endpoints, `None` once removed
    edges: Vec<Option<(usize, usize)>>,
    num_edges: usize,
    token: GraphToken,
}

impl AdjacencyGraph {
    pub fn new(directed: bool) -> Self {
        Self::with_vertices(directed, 0)
    }

    pub fn with_vertices(directed: bool, n: usize) -> Self {
        Self {
            directed,
            out: vec![Vec::new(); n],
            inc: vec![Vec::new(); n],
            edges: Vec::new(),
            num_edges: 0,
            token: GraphToken::new(n),
        }
    }

    /// Build from an edge list. Vertices are created up to the largest endpoint.
    pub fn from_edges<I>(directed: bool, n: usize, edges: I) -> Result<Self>
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut g = Self::with_vertices(directed, n);
        for (s, t) in edges {
            let needed = s.max(t) + 1;
            while g.out.len() < needed {
                g.add_vertex();
            }
            g.add_edge(s, t)?;
        }
        Ok(g)
    }

    pub fn add_vertex(&mut self) -> usize {
        let v = self.out.len();
        self.out.push(Vec::new());
        self.inc.push(Vec::new());
        self.token.set_vertex_count(self.out.len());
        v
    }

    /// Add an edge and return its stable index.
    pub fn add_edge(&mut self, source: usize, target: usize) -> Result<usize> {
        let n = self.out.len();
        if source >= n || target >= n {
            return Err(Error::InvalidHandle(format!(
                "invalid vertex descriptor: {}",
                if source >= n { source } else { target }
            )));
        }

        let index = self.edges.len();
        self.edges.push(Some((source, target)));
        self.out[source].push((target, index));
        self.inc[target].push((source, index));
        self.num_edges += 1;
        self.token.insert_edge(index);
        Ok(index)
    }

    /// Remove an edge by index. Returns true if it existed.
    pub fn remove_edge(&mut self, index: usize) -> bool {
        let Some((s, t)) = self.edges.get_mut(index).and_then(Option::take) else {
            return false;
        };
        self.out[s].retain(|&(_, idx)| idx != index);
        self.inc[t].retain(|&(_, idx)| idx != index);
        self.num_edges -= 1;
        self.token.remove_edge(index);
        true
    }

    /// Remove every vertex and edge. Handles issued so far become invalid.
    pub fn clear(&mut self) {
        self.out.clear();
        self.inc.clear();
        self.edges.iter_mut().for_each(|e| *e = None);
        self.num_edges = 0;
        self.token.clear();
    }

    pub fn endpoints(&self, index: usize) -> Option<(usize, usize)> {
        self.edges.get(index).copied().flatten()
    }
}

impl Drop for AdjacencyGraph {
    fn drop(&mut self) {
        self.token.invalidate();
    }
}

// ============================================================================
// GraphView impl
// ============================================================================

impl GraphView for AdjacencyGraph {
    fn num_vertices(&self) -> usize {
        self.out.len()
    }

    fn num_edges(&self) -> usize {
        self.num_edges
    }

    fn edge_index_range(&self) -> usize {
        self.edges.len()
    }

    fn is_directed(&self) -> bool {
        self.directed
    }

    /// For undirected graphs the incoming list is folded in, flipped, with
    /// self-loops reported once.
    fn out_edges(&self, v: usize) -> impl Iterator<Item = EdgeRef> + '_ {
        let undirected = !self.directed;
        let forward = self
            .out
            .get(v)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(move |&(t, index)| EdgeRef::new(v, t, index));
        let backward = self
            .inc
            .get(v)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter(move |&&(s, _)| undirected && s != v)
            .map(move |&(s, index)| EdgeRef::new(v, s, index));
        forward.chain(backward)
    }

    fn in_edges(&self, v: usize) -> impl Iterator<Item = EdgeRef> + '_ {
        let undirected = !self.directed;
        let forward = self
            .inc
            .get(v)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .map(move |&(s, index)| EdgeRef::new(s, v, index));
        let backward = self
            .out
            .get(v)
            .map(Vec::as_slice)
            .unwrap_or(&[])
            .iter()
            .filter(move |&&(t, _)| undirected && t != v)
            .map(move |&(t, index)| EdgeRef::new(t, v, index));
        forward.chain(backward)
    }

    fn edges(&self) -> impl Iterator<Item = EdgeRef> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(index, e)| e.map(|(s, t)| EdgeRef::new(s, t, index)))
    }

    fn token(&self) -> &GraphToken {
        &self.token
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_edges_and_iterate() {
        let mut g = AdjacencyGraph::with_vertices(true, 3);
        let e0 = g.add_edge(0, 1).unwrap();
        let e1 = g.add_edge(1, 2).unwrap();

        assert_eq!((e0, e1), (0, 1));
        assert_eq!(g.num_edges(), 2);
        let out: Vec<_> = g.out_edges(1).collect();
        assert_eq!(out, vec![EdgeRef::new(1, 2, 1)]);
        let inc: Vec<_> = g.in_edges(1).collect();
        assert_eq!(inc, vec![EdgeRef::new(0, 1, 0)]);
    }

    #[test]
    fn test_undirected_orientation() {
        let g = AdjacencyGraph::from_edges(false, 3, [(0, 1), (2, 1), (1, 1)]).unwrap();
        let out: Vec<_> = g.out_edges(1).collect();

        // Forward list first, then the flipped incoming entries; the self-loop once.
        assert_eq!(
            out,
            vec![EdgeRef::new(1, 1, 2), EdgeRef::new(1, 0, 0), EdgeRef::new(1, 2, 1)]
        );
        assert!(out.iter().all(|e| e.source == 1));
    }

    #[test]
    fn test_edge_out_of_range() {
        let mut g = AdjacencyGraph::with_vertices(true, 2);
        assert!(matches!(g.add_edge(0, 5), Err(Error::InvalidHandle(_))));
    }

    #[test]
    fn test_remove_edge_leaves_hole() {
        let mut g = AdjacencyGraph::from_edges(true, 3, [(0, 1), (1, 2), (0, 2)]).unwrap();
        assert!(g.remove_edge(1));
        assert!(!g.remove_edge(1));

        assert_eq!(g.num_edges(), 2);
        assert_eq!(g.edge_index_range(), 3);
        let indices: Vec<_> = g.edges().map(|e| e.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert!(!g.token().contains_edge(1));
    }

    #[test]
    fn test_from_edges_grows_vertices() {
        let g = AdjacencyGraph::from_edges(true, 0, [(0, 4)]).unwrap();
        assert_eq!(g.num_vertices(), 5);
        assert_eq!(g.token().num_vertices(), 5);
    }
}
