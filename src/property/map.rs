//! Concrete property maps.
//!
//! `VectorPropertyMap` is a handle: clones share one buffer, so binding the
//! same storage to a search and to the caller costs nothing. A read-only
//! alias sees every write made through a writable one and can neither write
//! nor resize the buffer.
//!
//! Maps made by `create_property` are bound to the graph of their index
//! map; handles from any other graph are rejected with `InvalidHandle`.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::graph::{GraphToken, GraphView};
use crate::model::Scalar;
use crate::{Error, Result};
use super::{Key, PropertySource, Reader};

pub(crate) fn read_only_error() -> Error {
    Error::ReadOnly("property is read-only".into())
}

/// Fails when `handle` comes from a graph other than `owner`.
pub(crate) fn check_owner(owner: Option<&GraphToken>, handle: &GraphToken) -> Result<()> {
    match owner {
        Some(owner) if !owner.same_graph(handle) => Err(Error::InvalidHandle(
            "descriptor belongs to a different graph".into(),
        )),
        _ => Ok(()),
    }
}

// ============================================================================
// VectorPropertyMap
// ============================================================================

/// Dense buffer of `V`, one slot per vertex or edge index.
#[derive(Debug, Clone)]
pub struct VectorPropertyMap<V> {
    key: Key,
    data: Arc<RwLock<Vec<V>>>,
    writable: bool,
    graph: Option<GraphToken>,
}

impl<V: Scalar> VectorPropertyMap<V> {
    /// `len` slots, each holding the kind's default.
    pub fn new(key: Key, len: usize) -> Self {
        Self::from_vec(key, vec![V::default(); len])
    }

    pub fn from_vec(key: Key, values: Vec<V>) -> Self {
        Self { key, data: Arc::new(RwLock::new(values)), writable: true, graph: None }
    }

    /// A read-only alias of the same buffer.
    pub fn read_only(&self) -> Self {
        Self {
            key: self.key,
            data: Arc::clone(&self.data),
            writable: false,
            graph: self.graph.clone(),
        }
    }

    /// Restrict erased access to handles of the graph behind `token`.
    pub fn bind(mut self, token: GraphToken) -> Self {
        self.graph = Some(token);
        self
    }

    /// The graph this map is bound to, if any.
    pub fn graph(&self) -> Option<&GraphToken> {
        self.graph.as_ref()
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn get(&self, index: usize) -> Result<V> {
        let data = self.data.read();
        data.get(index)
            .cloned()
            .ok_or(Error::IndexOutOfRange { index, len: data.len() })
    }

    /// Fails with `ReadOnly` on a read-only alias; the buffer is untouched.
    pub fn set(&self, index: usize, value: V) -> Result<()> {
        if !self.writable {
            return Err(read_only_error());
        }
        let mut data = self.data.write();
        let len = data.len();
        let slot = data.get_mut(index).ok_or(Error::IndexOutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Set the length to exactly `n`. The first `min(len, n)` entries are
    /// kept; new slots hold the default.
    pub fn resize(&self, n: usize) -> Result<()> {
        self.write()?.resize(n, V::default());
        Ok(())
    }

    /// Grow to at least `n` slots. Never shrinks.
    pub fn reserve(&self, n: usize) -> Result<()> {
        let mut data = self.write()?;
        if data.len() < n {
            data.resize(n, V::default());
        }
        Ok(())
    }

    pub fn shrink_to_fit(&self) -> Result<()> {
        self.write()?.shrink_to_fit();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.data.read().capacity()
    }

    /// Bulk read access.
    pub fn read(&self) -> RwLockReadGuard<'_, Vec<V>> {
        self.data.read()
    }

    /// Bulk write access.
    pub fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<V>>> {
        if !self.writable {
            return Err(read_only_error());
        }
        Ok(self.data.write())
    }

    /// Like `write`, but fails with `Busy` instead of blocking when the
    /// buffer is already borrowed. Searches lock through this so aliased
    /// maps error out instead of deadlocking.
    pub fn try_write(&self) -> Result<RwLockWriteGuard<'_, Vec<V>>> {
        if !self.writable {
            return Err(read_only_error());
        }
        self.data
            .try_write()
            .ok_or_else(|| Error::Busy(format!("{} {} property is in use", V::KIND, self.key)))
    }

    pub fn to_vec(&self) -> Vec<V> {
        self.data.read().clone()
    }

    /// Whether both handles share one buffer.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl<V: Scalar> PropertySource<V> for VectorPropertyMap<V> {
    fn key(&self) -> Key {
        self.key
    }

    fn reader(&self) -> Reader<'_, V> {
        Reader::Buffer(self.data.read())
    }
}

// ============================================================================
// ConstantPropertyMap
// ============================================================================

/// The same value at every index. Always read-only.
#[derive(Debug, Clone)]
pub struct ConstantPropertyMap<V> {
    key: Key,
    value: V,
    graph: Option<GraphToken>,
}

impl<V: Scalar> ConstantPropertyMap<V> {
    pub fn new(key: Key, value: V) -> Self {
        Self { key, value, graph: None }
    }

    pub fn bind(mut self, token: GraphToken) -> Self {
        self.graph = Some(token);
        self
    }

    pub fn graph(&self) -> Option<&GraphToken> {
        self.graph.as_ref()
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }
}

impl<V: Scalar> PropertySource<V> for ConstantPropertyMap<V> {
    fn key(&self) -> Key {
        self.key
    }

    fn reader(&self) -> Reader<'_, V> {
        Reader::Constant(&self.value)
    }
}

// ============================================================================
// IndexMap
// ============================================================================

/// Identity map from a vertex or edge to its own index.
///
/// Derived from the graph's token, so its length always tracks the live
/// graph and there is nothing to resize.
#[derive(Debug, Clone)]
pub struct IndexMap {
    key: Key,
    token: GraphToken,
}

impl IndexMap {
    pub fn vertex<G: GraphView>(g: &G) -> Self {
        Self { key: Key::Vertex, token: g.token().clone() }
    }

    pub fn edge<G: GraphView>(g: &G) -> Self {
        Self { key: Key::Edge, token: g.token().clone() }
    }

    pub fn key(&self) -> Key {
        self.key
    }

    pub fn token(&self) -> &GraphToken {
        &self.token
    }

    /// Live vertex count, or the edge index range for edge maps.
    pub fn len(&self) -> usize {
        match self.key {
            Key::Vertex => self.token.num_vertices(),
            Key::Edge => self.token.edge_index_range(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// PropertyStore
// ============================================================================

/// Stored maps of one value kind: what `AnyProperty` wraps per kind.
#[derive(Debug, Clone)]
pub enum PropertyStore<V> {
    Vector(VectorPropertyMap<V>),
    Constant(ConstantPropertyMap<V>),
}

impl<V: Scalar> PropertyStore<V> {
    pub fn key(&self) -> Key {
        match self {
            PropertyStore::Vector(m) => m.key(),
            PropertyStore::Constant(m) => m.key(),
        }
    }

    pub fn is_writable(&self) -> bool {
        match self {
            PropertyStore::Vector(m) => m.is_writable(),
            PropertyStore::Constant(_) => false,
        }
    }

    pub fn graph(&self) -> Option<&GraphToken> {
        match self {
            PropertyStore::Vector(m) => m.graph(),
            PropertyStore::Constant(m) => m.graph(),
        }
    }

    pub fn bind(self, token: GraphToken) -> Self {
        match self {
            PropertyStore::Vector(m) => PropertyStore::Vector(m.bind(token)),
            PropertyStore::Constant(m) => PropertyStore::Constant(m.bind(token)),
        }
    }

    pub fn get(&self, index: usize) -> Result<V> {
        match self {
            PropertyStore::Vector(m) => m.get(index),
            PropertyStore::Constant(m) => Ok(m.value().clone()),
        }
    }

    pub fn set(&self, index: usize, value: V) -> Result<()> {
        match self {
            PropertyStore::Vector(m) => m.set(index, value),
            PropertyStore::Constant(_) => Err(read_only_error()),
        }
    }

    /// No-op for constant maps.
    pub fn resize(&self, n: usize) -> Result<()> {
        match self {
            PropertyStore::Vector(m) => m.resize(n),
            PropertyStore::Constant(_) => Ok(()),
        }
    }

    pub fn reserve(&self, n: usize) -> Result<()> {
        match self {
            PropertyStore::Vector(m) => m.reserve(n),
            PropertyStore::Constant(_) => Ok(()),
        }
    }

    pub fn shrink_to_fit(&self) -> Result<()> {
        match self {
            PropertyStore::Vector(m) => m.shrink_to_fit(),
            PropertyStore::Constant(_) => Ok(()),
        }
    }

    pub fn as_vector(&self) -> Option<&VectorPropertyMap<V>> {
        match self {
            PropertyStore::Vector(m) => Some(m),
            PropertyStore::Constant(_) => None,
        }
    }
}

impl<V: Scalar> PropertySource<V> for PropertyStore<V> {
    fn key(&self) -> Key {
        PropertyStore::key(self)
    }

    fn reader(&self) -> Reader<'_, V> {
        match self {
            PropertyStore::Vector(m) => m.reader(),
            PropertyStore::Constant(m) => m.reader(),
        }
    }
}

impl<V> From<VectorPropertyMap<V>> for PropertyStore<V> {
    fn from(m: VectorPropertyMap<V>) -> Self {
        PropertyStore::Vector(m)
    }
}

impl<V> From<ConstantPropertyMap<V>> for PropertyStore<V> {
    fn from(m: ConstantPropertyMap<V>) -> Self {
        PropertyStore::Constant(m)
    }
}

// ============================================================================
// Tests
// ============================================================================
