//! # graph-search-rs: Typed Property Maps and Shortest-Path Search
//!
//! A graph-query engine that runs BFS, Dijkstra, Bellman-Ford and A* over
//! any [`GraphView`], writing distances and predecessors into typed property
//! maps. Searches either run to completion or stream one relaxation event at
//! a time through a [`TraversalGenerator`].
//!
//! ## Design Principles
//!
//! 1. **Storage-agnostic**: `GraphView` is the contract between search and storage
//! 2. **Closed value registry**: every property kind has a stable name and a Rust type
//! 3. **Early termination is an outcome**: `SearchOutcome::TerminatedEarly`, never an error
//! 4. **Handles check liveness**: a vertex or edge handle outliving its graph fails cleanly
//!
//! ## Quick Start
//!
//! ```rust
//! use graph_search::{run_dijkstra, AdjacencyGraph, Key, SearchOutcome, VectorPropertyMap};
//!
//! # fn example() -> graph_search::Result<()> {
//! let g = AdjacencyGraph::from_edges(true, 3, [(0, 1), (1, 2), (0, 2)])?;
//! let weight = VectorPropertyMap::from_vec(Key::Edge, vec![1.0, 1.0, 5.0]);
//! let dist = VectorPropertyMap::<f64>::new(Key::Vertex, 0);
//! let pred = VectorPropertyMap::<i64>::new(Key::Vertex, 0);
//!
//! let outcome = run_dijkstra(&g, 0, &[], 0.0, &dist, &pred, &weight)?;
//! assert_eq!(outcome, SearchOutcome::Completed);
//! assert_eq!(dist.to_vec(), vec![0.0, 1.0, 2.0]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `parallel` | yes | rayon fan-out for bulk sentinel initialization |
//! | `generator` | yes | Pull-based traversal generators |

// ============================================================================
// Modules
// ============================================================================

pub mod config;
pub mod graph;
pub mod model;
pub mod property;
pub mod search;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{Distance, Scalar, ScalarKind, ScalarValue};

// ============================================================================
// Re-exports: Graph
// ============================================================================

pub use graph::{AdjacencyGraph, Edge, EdgeRef, GraphToken, GraphView, Reversed, Undirected, Vertex};

// ============================================================================
// Re-exports: Properties
// ============================================================================

pub use property::{
    create_property, AnyProperty, ConstantPropertyMap, IndexMap, Key, NumericArray,
    PropertySource, PropertyStore, VectorPropertyMap,
};

// ============================================================================
// Re-exports: Search
// ============================================================================

pub use config::EngineConfig;
pub use search::{
    astar_generator, astar_search_dyn, bfs_generator, dijkstra_generator, get_dists,
    run_astar, run_bellman_ford, run_bfs, run_dijkstra, shortest_path, AstarParams,
    DynAstarParams, Event, SearchEngine, SearchOutcome, Targets, TerminationPolicy,
    TraversalGenerator,
};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid handle: {0}")]
    InvalidHandle(String),

    #[error("Unknown property type: {0}")]
    UnknownType(String),

    #[error("Read-only: {0}")]
    ReadOnly(String),

    #[error("Graph contains negative loops")]
    NegativeCycle,

    #[error("Unsupported: {0}")]
    Unsupported(String),

    #[error("Type error: expected {expected}, got {got}")]
    TypeError { expected: String, got: String },

    #[error("Index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Callback failed: {0}")]
    Callback(Box<dyn std::error::Error + Send + Sync>),

    #[error("Busy: {0}")]
    Busy(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Wrap a failure raised inside a user callback.
    pub fn callback(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Callback(err.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
