//! Vertex and edge handles.
//!
//! A handle is a graph token plus a local descriptor. It does not keep the
//! graph alive; every dereferencing accessor re-checks the token first, so
//! a handle that outlived its graph, or whose vertex or edge was removed,
//! fails with `InvalidHandle` instead of reading stale storage.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::model::ScalarValue;
use crate::property::{AnyProperty, Key};
use crate::{Error, Result};
use super::{EdgeRef, GraphToken, GraphView};

fn foreign_handle(what: &str) -> Error {
    Error::InvalidHandle(format!("{what} does not belong to this graph"))
}

// ============================================================================
// Vertex
// ============================================================================

/// Handle to a vertex by dense index.
#[derive(Debug, Clone)]
pub struct Vertex {
    token: GraphToken,
    index: usize,
}

impl Vertex {
    pub fn new(token: GraphToken, index: usize) -> Self {
        Self { token, index }
    }

    pub fn is_valid(&self) -> bool {
        self.token.contains_vertex(self.index)
    }

    pub fn check_valid(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::InvalidHandle(format!("invalid vertex descriptor: {}", self.index)))
        }
    }

    /// The raw descriptor, unchecked.
    pub fn descriptor(&self) -> usize {
        self.index
    }

    /// Liveness token of the graph this handle was taken from.
    pub fn token(&self) -> &GraphToken {
        &self.token
    }

    pub fn index(&self) -> Result<usize> {
        self.check_valid()?;
        Ok(self.index)
    }

    fn check_graph<G: GraphView>(&self, g: &G) -> Result<()> {
        self.check_valid()?;
        if !self.token.same_graph(g.token()) {
            return Err(foreign_handle("vertex"));
        }
        Ok(())
    }

    pub fn out_degree<G: GraphView>(&self, g: &G) -> Result<usize> {
        self.check_graph(g)?;
        Ok(g.out_edges(self.index).count())
    }

    pub fn in_degree<G: GraphView>(&self, g: &G) -> Result<usize> {
        self.check_graph(g)?;
        Ok(g.in_edges(self.index).count())
    }

    pub fn out_edges<'g, G: GraphView>(&self, g: &'g G) -> Result<impl Iterator<Item = Edge> + 'g> {
        self.check_graph(g)?;
        Ok(g.out_edges(self.index).map(move |e| g.edge(e)))
    }

    pub fn in_edges<'g, G: GraphView>(&self, g: &'g G) -> Result<impl Iterator<Item = Edge> + 'g> {
        self.check_graph(g)?;
        Ok(g.in_edges(self.index).map(move |e| g.edge(e)))
    }

    /// Sum of `weight` over out-edges. `weight` must be a numeric edge property.
    pub fn weighted_out_degree<G: GraphView>(&self, g: &G, weight: &AnyProperty) -> Result<ScalarValue> {
        self.check_graph(g)?;
        check_edge_weight(weight)?;
        weight.sum_over(g.out_edges(self.index).map(|e| e.index))
    }

    /// Sum of `weight` over in-edges. `weight` must be a numeric edge property.
    pub fn weighted_in_degree<G: GraphView>(&self, g: &G, weight: &AnyProperty) -> Result<ScalarValue> {
        self.check_graph(g)?;
        check_edge_weight(weight)?;
        weight.sum_over(g.in_edges(self.index).map(|e| e.index))
    }
}

fn check_edge_weight(weight: &AnyProperty) -> Result<()> {
    if weight.key() != Key::Edge || !weight.kind().is_distance() {
        return Err(Error::TypeError {
            expected: "numeric edge property".into(),
            got: format!("{} {} property", weight.type_name(), weight.key()),
        });
    }
    Ok(())
}

impl PartialEq for Vertex {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl Eq for Vertex {}

impl Hash for Vertex {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.index.hash(state);
    }
}

impl PartialOrd for Vertex {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Vertex {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl fmt::Display for Vertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index)
    }
}

// ============================================================================
// Edge
// ============================================================================

/// Handle to an edge. Identity and ordering follow the stable edge index.
#[derive(Debug, Clone)]
pub struct Edge {
    token: GraphToken,
    descriptor: EdgeRef,
}

impl Edge {
    pub fn new(token: GraphToken, descriptor: EdgeRef) -> Self {
        Self { token, descriptor }
    }

    pub fn is_valid(&self) -> bool {
        let EdgeRef { source, target, index } = self.descriptor;
        self.token.contains_edge(index)
            && self.token.contains_vertex(source)
            && self.token.contains_vertex(target)
    }

    pub fn check_valid(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::InvalidHandle(format!("invalid edge descriptor: {}", self.descriptor.index)))
        }
    }

    /// The raw descriptor, unchecked.
    pub fn descriptor(&self) -> EdgeRef {
        self.descriptor
    }

    pub fn token(&self) -> &GraphToken {
        &self.token
    }

    pub fn edge_index(&self) -> Result<usize> {
        self.check_valid()?;
        Ok(self.descriptor.index)
    }

    pub fn source(&self) -> Result<Vertex> {
        self.check_valid()?;
        Ok(Vertex::new(self.token.clone(), self.descriptor.source))
    }

    pub fn target(&self) -> Result<Vertex> {
        self.check_valid()?;
        Ok(Vertex::new(self.token.clone(), self.descriptor.target))
    }
}

impl PartialEq for Edge {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.index == other.descriptor.index
    }
}

impl Eq for Edge {}

impl Hash for Edge {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.descriptor.index.hash(state);
    }
}

impl PartialOrd for Edge {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Edge {
    fn cmp(&self, other: &Self) -> Ordering {
        self.descriptor.index.cmp(&other.descriptor.index)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.descriptor.source, self.descriptor.target)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::AdjacencyGraph;

    #[test]
    fn test_vertex_accessors() {
        let g = AdjacencyGraph::from_edges(true, 3, [(0, 1), (0, 2), (2, 0)]).unwrap();
        let v = g.vertex(0);

        assert_eq!(v.index().unwrap(), 0);
        assert_eq!(v.out_degree(&g).unwrap(), 2);
        assert_eq!(v.in_degree(&g).unwrap(), 1);
        let targets: Vec<String> = v.out_edges(&g).unwrap().map(|e| e.to_string()).collect();
        assert_eq!(targets, vec!["(0, 1)", "(0, 2)"]);
    }

    #[test]
    fn test_stale_after_clear() {
        let mut g = AdjacencyGraph::from_edges(true, 2, [(0, 1)]).unwrap();
        let v = g.vertex(1);
        let e = g.edge(g.out_edges(0).next().unwrap());
        g.clear();

        assert!(!v.is_valid());
        assert!(!e.is_valid());
        assert!(matches!(v.index(), Err(Error::InvalidHandle(_))));
        assert!(matches!(e.source(), Err(Error::InvalidHandle(_))));
    }

    #[test]
    fn test_removed_edge_is_invalid() {
        let mut g = AdjacencyGraph::from_edges(true, 2, [(0, 1), (1, 0)]).unwrap();
        let e = g.edge(EdgeRef::new(0, 1, 0));
        assert!(e.is_valid());
        g.remove_edge(0);
        assert!(matches!(e.edge_index(), Err(Error::InvalidHandle(_))));
    }

    #[test]
    fn test_foreign_graph_rejected() {
        let a = AdjacencyGraph::with_vertices(true, 2);
        let b = AdjacencyGraph::with_vertices(true, 2);
        let v = a.vertex(0);
        assert!(matches!(v.out_degree(&b), Err(Error::InvalidHandle(_))));
    }

    #[test]
    fn test_edge_order_by_index() {
        let g = AdjacencyGraph::from_edges(true, 3, [(2, 1), (0, 1)]).unwrap();
        let mut edges: Vec<Edge> = g.edges().map(|e| g.edge(e)).collect();
        edges.reverse();
        edges.sort();
        let indices: Vec<usize> = edges.iter().map(|e| e.edge_index().unwrap()).collect();
        assert_eq!(indices, vec![0, 1]);
    }
}
