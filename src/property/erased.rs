//! Type-erased property maps.
//!
//! [`AnyProperty`] holds exactly one concrete map and remembers its value
//! kind as the enum variant. [`create_property`] is the only place a kind
//! name becomes a concrete `V`: it resolves the name against the registry
//! and matches exhaustively over [`ScalarKind`].
//!
//! Opaque storage crosses the boundary as `Box<dyn Any + Send + Sync>`
//! holding a `PropertyStore<V>`, `VectorPropertyMap<V>`,
//! `ConstantPropertyMap<V>` or `IndexMap`. [`AnyProperty::into_any`]
//! produces one; `create_property` accepts one back.

use std::any::Any;

use tracing::trace;

use crate::graph::{GraphToken, GraphView};
use crate::model::{Distance, Scalar, ScalarKind, ScalarValue};
use crate::{Error, Result};
use super::map::{check_owner, read_only_error};
use super::{ConstantPropertyMap, Descriptor, IndexMap, Key, PropertyStore, VectorPropertyMap};

/// Run `$body` with `$V` bound to the Rust type backing `$kind`.
macro_rules! with_kind {
    ($kind:expr, |$V:ident| $body:expr) => {
        match $kind {
            ScalarKind::Bool => { type $V = bool; $body }
            ScalarKind::Int16 => { type $V = i16; $body }
            ScalarKind::Int32 => { type $V = i32; $body }
            ScalarKind::Int64 => { type $V = i64; $body }
            ScalarKind::Double => { type $V = f64; $body }
            ScalarKind::String => { type $V = String; $body }
            ScalarKind::VecBool => { type $V = Vec<bool>; $body }
            ScalarKind::VecInt16 => { type $V = Vec<i16>; $body }
            ScalarKind::VecInt32 => { type $V = Vec<i32>; $body }
            ScalarKind::VecInt64 => { type $V = Vec<i64>; $body }
            ScalarKind::VecDouble => { type $V = Vec<f64>; $body }
            ScalarKind::VecString => { type $V = Vec<String>; $body }
        }
    };
}

/// Apply `$body` to the stored map of any kind, or `$ibody` to an index map.
macro_rules! dispatch {
    ($self:expr, $s:ident => $body:expr, $i:ident => $ibody:expr) => {
        match $self {
            AnyProperty::Bool($s) => $body,
            AnyProperty::Int16($s) => $body,
            AnyProperty::Int32($s) => $body,
            AnyProperty::Int64($s) => $body,
            AnyProperty::Double($s) => $body,
            AnyProperty::String($s) => $body,
            AnyProperty::VecBool($s) => $body,
            AnyProperty::VecInt16($s) => $body,
            AnyProperty::VecInt32($s) => $body,
            AnyProperty::VecInt64($s) => $body,
            AnyProperty::VecDouble($s) => $body,
            AnyProperty::VecString($s) => $body,
            AnyProperty::VertexIndex($i) | AnyProperty::EdgeIndex($i) => $ibody,
        }
    };
}

// ============================================================================
// AnyProperty
// ============================================================================

/// A property map whose value kind is only known at run time.
#[derive(Debug, Clone)]
pub enum AnyProperty {
    Bool(PropertyStore<bool>),
    Int16(PropertyStore<i16>),
    Int32(PropertyStore<i32>),
    Int64(PropertyStore<i64>),
    Double(PropertyStore<f64>),
    String(PropertyStore<String>),
    VecBool(PropertyStore<Vec<bool>>),
    VecInt16(PropertyStore<Vec<i16>>),
    VecInt32(PropertyStore<Vec<i32>>),
    VecInt64(PropertyStore<Vec<i64>>),
    VecDouble(PropertyStore<Vec<f64>>),
    VecString(PropertyStore<Vec<String>>),
    /// Vertex → its own index. Reported as `int64_t`.
    VertexIndex(IndexMap),
    /// Edge → its own stable index. Reported as `int64_t`.
    EdgeIndex(IndexMap),
}

fn kind_of<V: Scalar>(_: &PropertyStore<V>) -> ScalarKind {
    V::KIND
}

impl AnyProperty {
    /// The identity map over `g`'s vertices.
    pub fn vertex_index<G: GraphView>(g: &G) -> Self {
        AnyProperty::VertexIndex(IndexMap::vertex(g))
    }

    /// The identity map over `g`'s edges.
    pub fn edge_index<G: GraphView>(g: &G) -> Self {
        AnyProperty::EdgeIndex(IndexMap::edge(g))
    }

    pub fn kind(&self) -> ScalarKind {
        dispatch!(self, s => kind_of(s), _i => ScalarKind::Int64)
    }

    /// Registry name of the value kind.
    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn key(&self) -> Key {
        dispatch!(self, s => s.key(), i => i.key())
    }

    pub fn is_index_map(&self) -> bool {
        matches!(self, AnyProperty::VertexIndex(_) | AnyProperty::EdgeIndex(_))
    }

    /// Whether `set` can succeed, independent of any handle.
    pub fn is_writable(&self) -> bool {
        dispatch!(self, s => s.is_writable(), _i => false)
    }

    /// The graph whose handles this property accepts. `None` accepts any.
    pub fn graph(&self) -> Option<&GraphToken> {
        dispatch!(self, s => s.graph(), i => Some(i.token()))
    }

    /// Bind the stored map to `token`'s graph. Index maps keep their own.
    pub fn bind(self, token: GraphToken) -> Self {
        dispatch!(self, s => AnyProperty::from(s.bind(token)), i => AnyProperty::from(i))
    }

    fn check_key(&self, key: Key) -> Result<()> {
        if self.key() == key {
            return Ok(());
        }
        Err(Error::TypeError {
            expected: format!("{} descriptor", self.key()),
            got: format!("{key} descriptor"),
        })
    }

    /// Read the value for a vertex or edge. The handle is validated first.
    pub fn get<H: Descriptor>(&self, handle: &H) -> Result<ScalarValue> {
        let index = handle.checked_index()?;
        check_owner(self.graph(), handle.graph_token())?;
        self.check_key(H::KEY)?;
        dispatch!(
            self,
            s => s.get(index).map(Scalar::into_value),
            _i => Ok(ScalarValue::Int64(index as i64))
        )
    }

    /// Write the value for a vertex or edge.
    ///
    /// Checks, in order: handle validity and ownership, writability, value
    /// conversion.
    pub fn set<H: Descriptor>(&self, handle: &H, value: ScalarValue) -> Result<()> {
        let index = handle.checked_index()?;
        check_owner(self.graph(), handle.graph_token())?;
        self.check_key(H::KEY)?;
        if !self.is_writable() {
            return Err(read_only_error());
        }
        dispatch!(
            self,
            s => s.set(index, Scalar::from_value(value)?),
            _i => Err(read_only_error())
        )
    }

    /// A live numeric view of the backing buffer, resized to exactly
    /// `count` entries.
    ///
    /// `None` for non-numeric kinds, constant maps and index maps: there is
    /// no stored buffer to expose. `None` for read-only aliases too, since
    /// the resize would write through to the shared buffer.
    pub fn as_array(&self, count: usize) -> Option<NumericArray> {
        if !self.is_writable() {
            return None;
        }
        let array = match self {
            AnyProperty::Bool(PropertyStore::Vector(m)) => NumericArray::Bool(m.clone()),
            AnyProperty::Int16(PropertyStore::Vector(m)) => NumericArray::Int16(m.clone()),
            AnyProperty::Int32(PropertyStore::Vector(m)) => NumericArray::Int32(m.clone()),
            AnyProperty::Int64(PropertyStore::Vector(m)) => NumericArray::Int64(m.clone()),
            AnyProperty::Double(PropertyStore::Vector(m)) => NumericArray::Double(m.clone()),
            _ => return None,
        };
        array.resize(count).ok()?;
        Some(array)
    }

    /// Grow to at least `n` entries. No-op for index and constant maps;
    /// `ReadOnly` on a read-only alias.
    pub fn reserve(&self, n: usize) -> Result<()> {
        dispatch!(self, s => s.reserve(n), _i => Ok(()))
    }

    /// Set the length to `n`, keeping the prefix. No-op for index and constant maps.
    pub fn resize(&self, n: usize) -> Result<()> {
        dispatch!(self, s => s.resize(n), _i => Ok(()))
    }

    pub fn shrink_to_fit(&self) -> Result<()> {
        dispatch!(self, s => s.shrink_to_fit(), _i => Ok(()))
    }

    /// Hand the concrete map back as opaque storage.
    pub fn into_any(self) -> Box<dyn Any + Send + Sync> {
        type Opaque = Box<dyn Any + Send + Sync>;
        dispatch!(self, s => Box::new(s) as Opaque, i => Box::new(i) as Opaque)
    }

    /// The concrete store, if this property holds kind `V`.
    pub fn downcast<V: Erasable>(&self) -> Option<&PropertyStore<V>> {
        V::unerase(self)
    }

    /// Sum of this property over `indices`, in the property's own kind.
    ///
    /// Integer sums saturate at the kind's bounds.
    pub fn sum_over<I: IntoIterator<Item = usize>>(&self, indices: I) -> Result<ScalarValue> {
        match self {
            AnyProperty::Int16(s) => sum_store(s, indices),
            AnyProperty::Int32(s) => sum_store(s, indices),
            AnyProperty::Int64(s) => sum_store(s, indices),
            AnyProperty::Double(s) => sum_store(s, indices),
            AnyProperty::VertexIndex(_) | AnyProperty::EdgeIndex(_) => Ok(ScalarValue::Int64(
                indices.into_iter().fold(0i64, |acc, i| acc.saturating_add(i as i64)),
            )),
            other => Err(Error::TypeError {
                expected: "numeric property".into(),
                got: other.type_name().into(),
            }),
        }
    }
}

fn sum_store<V: Distance, I: IntoIterator<Item = usize>>(
    store: &PropertyStore<V>,
    indices: I,
) -> Result<ScalarValue> {
    let mut total = V::zero().to_numeric();
    for index in indices {
        total = total.saturating_add(store.get(index)?.to_numeric());
    }
    Ok(V::from_numeric(total).into_value())
}

// ============================================================================
// Erasable: moving between PropertyStore<V> and AnyProperty
// ============================================================================

/// A scalar kind with an `AnyProperty` variant.
pub trait Erasable: Scalar {
    fn erase(store: PropertyStore<Self>) -> AnyProperty;

    fn unerase(property: &AnyProperty) -> Option<&PropertyStore<Self>>;
}

macro_rules! erasable {
    ($t:ty, $variant:ident) => {
        impl Erasable for $t {
            fn erase(store: PropertyStore<Self>) -> AnyProperty {
                AnyProperty::$variant(store)
            }

            fn unerase(property: &AnyProperty) -> Option<&PropertyStore<Self>> {
                match property {
                    AnyProperty::$variant(s) => Some(s),
                    _ => None,
                }
            }
        }
    };
}

erasable!(bool, Bool);
erasable!(i16, Int16);
erasable!(i32, Int32);
erasable!(i64, Int64);
erasable!(f64, Double);
erasable!(String, String);
erasable!(Vec<bool>, VecBool);
erasable!(Vec<i16>, VecInt16);
erasable!(Vec<i32>, VecInt32);
erasable!(Vec<i64>, VecInt64);
erasable!(Vec<f64>, VecDouble);
erasable!(Vec<String>, VecString);

impl<V: Erasable> From<PropertyStore<V>> for AnyProperty {
    fn from(store: PropertyStore<V>) -> Self {
        V::erase(store)
    }
}

impl<V: Erasable> From<VectorPropertyMap<V>> for AnyProperty {
    fn from(map: VectorPropertyMap<V>) -> Self {
        V::erase(PropertyStore::Vector(map))
    }
}

impl<V: Erasable> From<ConstantPropertyMap<V>> for AnyProperty {
    fn from(map: ConstantPropertyMap<V>) -> Self {
        V::erase(PropertyStore::Constant(map))
    }
}

impl From<IndexMap> for AnyProperty {
    fn from(map: IndexMap) -> Self {
        match map.key() {
            Key::Vertex => AnyProperty::VertexIndex(map),
            Key::Edge => AnyProperty::EdgeIndex(map),
        }
    }
}

// ============================================================================
// NumericArray
// ============================================================================

/// Live flat view over a numeric property's buffer.
///
/// Shares the buffer with the property it came from: writes through
/// either are visible to both.
#[derive(Debug, Clone)]
pub enum NumericArray {
    Bool(VectorPropertyMap<bool>),
    Int16(VectorPropertyMap<i16>),
    Int32(VectorPropertyMap<i32>),
    Int64(VectorPropertyMap<i64>),
    Double(VectorPropertyMap<f64>),
}

impl NumericArray {
    pub fn kind(&self) -> ScalarKind {
        match self {
            NumericArray::Bool(_) => ScalarKind::Bool,
            NumericArray::Int16(_) => ScalarKind::Int16,
            NumericArray::Int32(_) => ScalarKind::Int32,
            NumericArray::Int64(_) => ScalarKind::Int64,
            NumericArray::Double(_) => ScalarKind::Double,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            NumericArray::Bool(m) => m.len(),
            NumericArray::Int16(m) => m.len(),
            NumericArray::Int32(m) => m.len(),
            NumericArray::Int64(m) => m.len(),
            NumericArray::Double(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn resize(&self, n: usize) -> Result<()> {
        match self {
            NumericArray::Bool(m) => m.resize(n),
            NumericArray::Int16(m) => m.resize(n),
            NumericArray::Int32(m) => m.resize(n),
            NumericArray::Int64(m) => m.resize(n),
            NumericArray::Double(m) => m.resize(n),
        }
    }

    /// Snapshot widened to `f64`; `bool` becomes 0.0 or 1.0.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        match self {
            NumericArray::Bool(m) => m.read().iter().map(|&b| if b { 1.0 } else { 0.0 }).collect(),
            NumericArray::Int16(m) => m.read().iter().map(|&v| f64::from(v)).collect(),
            NumericArray::Int32(m) => m.read().iter().map(|&v| f64::from(v)).collect(),
            NumericArray::Int64(m) => m.read().iter().map(|&v| v as f64).collect(),
            NumericArray::Double(m) => m.to_vec(),
        }
    }
}

// ============================================================================
// create_property
// ============================================================================

/// Bind a property of kind `type_name` for the entities `index_map` covers.
///
/// With no `existing` storage a fresh vector map sized to `index_map` is
/// created. Otherwise `existing` must hold a map of exactly that kind and
/// the same key; anything else is a `TypeError`. Unknown names fail with
/// `UnknownType`.
///
/// The result is bound to `index_map`'s graph: handles from another graph
/// fail with `InvalidHandle`.
pub fn create_property(
    type_name: &str,
    index_map: &IndexMap,
    existing: Option<Box<dyn Any + Send + Sync>>,
) -> Result<AnyProperty> {
    let kind = ScalarKind::from_name(type_name)?;

    let Some(existing) = existing else {
        trace!(type_name, key = %index_map.key(), len = index_map.len(), "creating property");
        let token = index_map.token().clone();
        return Ok(with_kind!(kind, |V| {
            let map = VectorPropertyMap::<V>::new(index_map.key(), index_map.len());
            AnyProperty::from(map.bind(token))
        }));
    };

    let property = match existing.downcast::<IndexMap>() {
        Ok(index) if kind == ScalarKind::Int64 => {
            if !index.token().same_graph(index_map.token()) {
                return Err(Error::InvalidHandle("index map belongs to a different graph".into()));
            }
            AnyProperty::from(*index)
        }
        Ok(_) => {
            return Err(Error::TypeError {
                expected: kind.name().into(),
                got: ScalarKind::Int64.name().into(),
            });
        }
        Err(existing) => with_kind!(kind, |V| rehydrate::<V>(existing)?),
    };

    if property.key() != index_map.key() {
        return Err(Error::TypeError {
            expected: format!("{} property", index_map.key()),
            got: format!("{} property", property.key()),
        });
    }
    Ok(property.bind(index_map.token().clone()))
}

fn rehydrate<V: Erasable>(existing: Box<dyn Any + Send + Sync>) -> Result<AnyProperty> {
    let existing = match existing.downcast::<PropertyStore<V>>() {
        Ok(store) => return Ok(AnyProperty::from(*store)),
        Err(other) => other,
    };
    let existing = match existing.downcast::<VectorPropertyMap<V>>() {
        Ok(map) => return Ok(AnyProperty::from(*map)),
        Err(other) => other,
    };
    match existing.downcast::<ConstantPropertyMap<V>>() {
        Ok(map) => Ok(AnyProperty::from(*map)),
        Err(other) => Err(Error::TypeError {
            expected: V::KIND.name().into(),
            got: opaque_kind_name(&*other).into(),
        }),
    }
}

/// Registry scan for the kind of an opaque map, for error messages.
fn opaque_kind_name(object: &(dyn Any + Send + Sync)) -> &'static str {
    for kind in ScalarKind::ALL {
        let found = with_kind!(kind, |V| {
            object.is::<PropertyStore<V>>()
                || object.is::<VectorPropertyMap<V>>()
                || object.is::<ConstantPropertyMap<V>>()
        });
        if found {
            return kind.name();
        }
    }
    "unknown"
}

// ============================================================================
// Tests
// ============================================================================
