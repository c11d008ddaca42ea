//! End-to-end tests for property maps and their type-erased boundary.
//!
//! Exercises the registry names, binding opaque storage back to a typed
//! map, live array views, and resize/reserve behaviour.

use std::any::Any;

use graph_search::{
    create_property, AdjacencyGraph, AnyProperty, ConstantPropertyMap, Error, GraphView, IndexMap,
    Key, NumericArray, PropertyStore, ScalarKind, ScalarValue, VectorPropertyMap,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ============================================================================
// Helpers
// ============================================================================

fn triangle() -> AdjacencyGraph {
    AdjacencyGraph::from_edges(true, 3, [(0, 1), (1, 2), (2, 0)]).unwrap()
}

// ============================================================================
// 1. Registry
// ============================================================================

#[test]
fn test_registry_names_are_stable() {
    let names: Vec<&str> = ScalarKind::ALL.iter().map(|k| k.name()).collect();
    assert_eq!(
        names,
        vec![
            "bool",
            "int16_t",
            "int32_t",
            "int64_t",
            "double",
            "string",
            "vector<bool>",
            "vector<int16_t>",
            "vector<int32_t>",
            "vector<int64_t>",
            "vector<double>",
            "vector<string>",
        ]
    );
    for kind in ScalarKind::ALL {
        assert_eq!(ScalarKind::from_name(kind.name()).unwrap(), kind);
    }
}

#[test]
fn test_unknown_type_name() {
    let g = triangle();
    let err = create_property("long double", &IndexMap::vertex(&g), None).unwrap_err();
    assert!(matches!(err, Error::UnknownType(_)));
}

// ============================================================================
// 2. Erased get / set
// ============================================================================

#[test]
fn test_edge_property_through_handles() {
    let g = triangle();
    let label = create_property("string", &IndexMap::edge(&g), None).unwrap();

    for e in g.edges() {
        let edge = g.edge(e);
        label.set(&edge, ScalarValue::from(format!("{}->{}", e.source, e.target))).unwrap();
    }

    let edge = g.edge(g.out_edges(2).next().unwrap());
    assert_eq!(label.get(&edge).unwrap(), ScalarValue::from("2->0"));
}

#[test]
fn test_vector_valued_property() {
    let g = triangle();
    let coords = create_property("vector<double>", &IndexMap::vertex(&g), None).unwrap();

    coords.set(&g.vertex(1), ScalarValue::from(vec![1.5, -2.0])).unwrap();

    assert_eq!(coords.get(&g.vertex(1)).unwrap().to_string(), "[1.5, -2]");
    assert_eq!(coords.get(&g.vertex(0)).unwrap(), ScalarValue::VecDouble(vec![]));
    assert!(coords.as_array(3).is_none());
}

#[test]
fn test_set_failure_order() {
    let mut g = triangle();
    let v = g.vertex(2);
    let constant = AnyProperty::from(ConstantPropertyMap::new(Key::Vertex, 1i32));

    // Valid handle, read-only map.
    assert!(matches!(constant.set(&v, ScalarValue::Int32(0)), Err(Error::ReadOnly(_))));

    // Stale handle wins over read-only.
    g.clear();
    assert!(matches!(constant.set(&v, ScalarValue::Int32(0)), Err(Error::InvalidHandle(_))));
}

#[test]
fn test_handle_from_another_graph() {
    let a = triangle();
    let b = triangle();
    let prop = create_property("int32_t", &IndexMap::vertex(&a), None).unwrap();

    let err = prop.set(&b.vertex(2), ScalarValue::Int32(99)).unwrap_err();
    assert!(matches!(err, Error::InvalidHandle(_)));
    assert!(matches!(prop.get(&b.vertex(2)), Err(Error::InvalidHandle(_))));
    assert_eq!(prop.get(&a.vertex(2)).unwrap(), ScalarValue::Int32(0));

    let edges = create_property("double", &IndexMap::edge(&a), None).unwrap();
    let foreign_edge = b.edge(b.out_edges(0).next().unwrap());
    assert!(matches!(edges.get(&foreign_edge), Err(Error::InvalidHandle(_))));
}

#[test]
fn test_handle_outliving_graph() {
    let prop;
    let v;
    {
        let g = triangle();
        prop = create_property("int64_t", &IndexMap::vertex(&g), None).unwrap();
        v = g.vertex(0);
        prop.set(&v, ScalarValue::Int64(3)).unwrap();
    }
    assert!(!v.is_valid());
    assert!(matches!(prop.get(&v), Err(Error::InvalidHandle(_))));
}

// ============================================================================
// 3. Opaque storage
// ============================================================================

#[test]
fn test_opaque_storage_roundtrip_shares_buffer() {
    let g = triangle();
    let original = VectorPropertyMap::<i32>::new(Key::Vertex, 3);
    let opaque: Box<dyn Any + Send + Sync> = Box::new(original.clone());

    let prop = create_property("int32_t", &IndexMap::vertex(&g), Some(opaque)).unwrap();
    prop.set(&g.vertex(2), ScalarValue::Int32(11)).unwrap();

    assert_eq!(original.get(2).unwrap(), 11);
    match prop.downcast::<i32>() {
        Some(PropertyStore::Vector(m)) => assert!(m.ptr_eq(&original)),
        other => panic!("unexpected store: {other:?}"),
    }
}

#[test]
fn test_opaque_storage_kind_and_key_checked() {
    let g = triangle();
    let edge_map: Box<dyn Any + Send + Sync> = Box::new(VectorPropertyMap::<f64>::new(Key::Edge, 3));
    let err = create_property("double", &IndexMap::vertex(&g), Some(edge_map)).unwrap_err();
    assert!(matches!(err, Error::TypeError { .. }));

    let foreign: Box<dyn Any + Send + Sync> = Box::new(String::from("not a map"));
    let err = create_property("double", &IndexMap::vertex(&g), Some(foreign)).unwrap_err();
    match err {
        Error::TypeError { expected, got } => {
            assert_eq!(expected, "double");
            assert_eq!(got, "unknown");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_index_map_as_storage() {
    let mut g = triangle();
    let index = IndexMap::vertex(&g);
    let opaque: Box<dyn Any + Send + Sync> = Box::new(index.clone());

    let prop = create_property("int64_t", &index, Some(opaque)).unwrap();
    assert!(prop.is_index_map());

    let v = g.add_vertex();
    assert_eq!(prop.get(&g.vertex(v)).unwrap(), ScalarValue::Int64(3));
    assert_eq!(index.len(), 4);
}

// ============================================================================
// 4. Array views and sizing
// ============================================================================

#[test]
fn test_array_view_is_live() {
    let g = triangle();
    let prop = create_property("double", &IndexMap::vertex(&g), None).unwrap();

    let Some(NumericArray::Double(array)) = prop.as_array(3) else {
        panic!("double properties expose a double array");
    };
    array.set(1, 0.5).unwrap();

    assert_eq!(prop.get(&g.vertex(1)).unwrap(), ScalarValue::Double(0.5));
}

#[test]
fn test_bool_array_view() {
    let g = triangle();
    let prop = create_property("bool", &IndexMap::vertex(&g), None).unwrap();
    prop.set(&g.vertex(0), ScalarValue::Bool(true)).unwrap();

    let array = prop.as_array(2).unwrap();
    assert_eq!(array.kind(), ScalarKind::Bool);
    assert_eq!(array.to_f64_vec(), vec![1.0, 0.0]);
}

#[test]
fn test_reserve_never_shrinks() {
    let map = VectorPropertyMap::<i16>::from_vec(Key::Vertex, vec![1, 2, 3, 4]);
    map.reserve(2).unwrap();
    assert_eq!(map.to_vec(), vec![1, 2, 3, 4]);
    map.reserve(6).unwrap();
    assert_eq!(map.to_vec(), vec![1, 2, 3, 4, 0, 0]);
}

#[test]
fn test_read_only_alias() {
    let map = VectorPropertyMap::<f64>::new(Key::Edge, 2);
    let alias = map.read_only();
    map.set(0, 4.0).unwrap();

    assert_eq!(alias.get(0).unwrap(), 4.0);
    assert!(matches!(alias.set(0, 1.0), Err(Error::ReadOnly(_))));
}

#[test]
fn test_read_only_alias_leaves_buffer_alone() {
    let map = VectorPropertyMap::<i64>::from_vec(Key::Vertex, vec![1, 2, 3]);
    let alias = map.read_only();

    assert!(matches!(alias.resize(0), Err(Error::ReadOnly(_))));
    assert!(matches!(alias.reserve(10), Err(Error::ReadOnly(_))));

    let erased = AnyProperty::from(alias);
    assert!(!erased.is_writable());
    assert!(erased.as_array(1).is_none());
    assert_eq!(map.to_vec(), vec![1, 2, 3]);
}

proptest! {
    #[test]
    fn prop_resize_preserves_prefix(values in prop::collection::vec(any::<i32>(), 0..64), n in 0usize..96) {
        let map = VectorPropertyMap::from_vec(Key::Vertex, values.clone());
        map.resize(n).unwrap();

        let after = map.to_vec();
        prop_assert_eq!(after.len(), n);
        let kept = n.min(values.len());
        prop_assert_eq!(&after[..kept], &values[..kept]);
        prop_assert!(after[kept..].iter().all(|&v| v == 0));
    }

    #[test]
    fn prop_erased_get_matches_typed(values in prop::collection::vec(-1e6f64..1e6, 1..16)) {
        let n = values.len();
        let g = AdjacencyGraph::with_vertices(true, n);
        let typed = VectorPropertyMap::from_vec(Key::Vertex, values.clone());
        let erased = AnyProperty::from(typed);

        for (i, &expected) in values.iter().enumerate() {
            prop_assert_eq!(erased.get(&g.vertex(i)).unwrap(), ScalarValue::Double(expected));
        }
    }
}
