//! Adapters that present another view with different edge semantics.
//!
//! Views borrow the underlying graph and share its token, so handles taken
//! through a view are checked against the same liveness state.

use super::{EdgeRef, GraphToken, GraphView};

/// The underlying view with every edge reversed.
#[derive(Debug, Clone, Copy)]
pub struct Reversed<'g, G> {
    graph: &'g G,
}

impl<'g, G: GraphView> Reversed<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }
}

impl<G: GraphView> GraphView for Reversed<'_, G> {
    fn num_vertices(&self) -> usize {
        self.graph.num_vertices()
    }

    fn num_edges(&self) -> usize {
        self.graph.num_edges()
    }

    fn edge_index_range(&self) -> usize {
        self.graph.edge_index_range()
    }

    fn is_directed(&self) -> bool {
        self.graph.is_directed()
    }

    fn out_edges(&self, v: usize) -> impl Iterator<Item = EdgeRef> + '_ {
        self.graph.in_edges(v).map(EdgeRef::reversed)
    }

    fn in_edges(&self, v: usize) -> impl Iterator<Item = EdgeRef> + '_ {
        self.graph.out_edges(v).map(EdgeRef::reversed)
    }

    fn edges(&self) -> impl Iterator<Item = EdgeRef> + '_ {
        self.graph.edges().map(EdgeRef::reversed)
    }

    fn token(&self) -> &GraphToken {
        self.graph.token()
    }
}

/// The underlying view with edge direction ignored.
#[derive(Debug, Clone, Copy)]
pub struct Undirected<'g, G> {
    graph: &'g G,
}

impl<'g, G: GraphView> Undirected<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        Self { graph }
    }
}

impl<G: GraphView> GraphView for Undirected<'_, G> {
    fn num_vertices(&self) -> usize {
        self.graph.num_vertices()
    }

    fn num_edges(&self) -> usize {
        self.graph.num_edges()
    }

    fn edge_index_range(&self) -> usize {
        self.graph.edge_index_range()
    }

    fn is_directed(&self) -> bool {
        false
    }

    fn out_edges(&self, v: usize) -> impl Iterator<Item = EdgeRef> + '_ {
        // An already-undirected base reports both directions itself.
        let fold = self.graph.is_directed();
        self.graph.out_edges(v).chain(
            self.graph
                .in_edges(v)
                .filter(move |e| fold && !e.is_loop())
                .map(EdgeRef::reversed),
        )
    }

    fn in_edges(&self, v: usize) -> impl Iterator<Item = EdgeRef> + '_ {
        let fold = self.graph.is_directed();
        self.graph.in_edges(v).chain(
            self.graph
                .out_edges(v)
                .filter(move |e| fold && !e.is_loop())
                .map(EdgeRef::reversed),
        )
    }

    fn edges(&self) -> impl Iterator<Item = EdgeRef> + '_ {
        self.graph.edges()
    }

    fn token(&self) -> &GraphToken {
        self.graph.token()
    }
}
