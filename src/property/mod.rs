//! # Property Maps
//!
//! Dense per-vertex or per-edge storage keyed by vertex index or stable
//! edge index.
//!
//! | Type | Module | Storage |
//! |------|--------|---------|
//! | `VectorPropertyMap<V>` | `map` | Shared growable buffer |
//! | `ConstantPropertyMap<V>` | `map` | One value for every index, read-only |
//! | `IndexMap` | `map` | Identity map derived from the live graph |
//! | `AnyProperty` | `erased` | Any of the above, value kind chosen at run time |
//!
//! Search drivers are generic over the value kind and read weights through
//! [`PropertySource`]. Callers that only know the kind by name go through
//! [`create_property`] and [`AnyProperty`].

pub mod erased;
pub mod map;

use std::fmt;

use parking_lot::RwLockReadGuard;
use serde::{Deserialize, Serialize};

use crate::graph::{Edge, GraphToken, Vertex};
use crate::{Error, Result};

pub use erased::{create_property, AnyProperty, Erasable, NumericArray};
pub use map::{ConstantPropertyMap, IndexMap, PropertyStore, VectorPropertyMap};

/// Which entity a property is keyed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Vertex,
    Edge,
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Vertex => f.write_str("vertex"),
            Key::Edge => f.write_str("edge"),
        }
    }
}

/// A handle that can address a property map slot.
pub trait Descriptor {
    const KEY: Key;

    /// The slot index, after validating the handle.
    fn checked_index(&self) -> Result<usize>;

    fn graph_token(&self) -> &GraphToken;
}

impl Descriptor for Vertex {
    const KEY: Key = Key::Vertex;

    fn checked_index(&self) -> Result<usize> {
        self.index()
    }

    fn graph_token(&self) -> &GraphToken {
        self.token()
    }
}

impl Descriptor for Edge {
    const KEY: Key = Key::Edge;

    fn checked_index(&self) -> Result<usize> {
        self.edge_index()
    }

    fn graph_token(&self) -> &GraphToken {
        self.token()
    }
}

// ============================================================================
// PropertySource: read side used by the search drivers
// ============================================================================

/// Borrowed read access for the duration of a search.
pub enum Reader<'a, V> {
    Buffer(RwLockReadGuard<'a, Vec<V>>),
    Constant(&'a V),
}

impl<V: Clone> Reader<'_, V> {
    pub fn get(&self, index: usize) -> Result<V> {
        match self {
            Reader::Buffer(buf) => buf
                .get(index)
                .cloned()
                .ok_or(Error::IndexOutOfRange { index, len: buf.len() }),
            Reader::Constant(v) => Ok((*v).clone()),
        }
    }
}

/// Something a search can read per-entity values from.
pub trait PropertySource<V> {
    fn key(&self) -> Key;

    fn reader(&self) -> Reader<'_, V>;
}
