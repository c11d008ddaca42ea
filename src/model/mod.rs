//! # Value Model
//!
//! The closed registry of property value kinds and the values that cross the
//! property-map boundary.
//!
//! Design rule: pure data. No graph access, no locking, no I/O.

pub mod kind;
pub mod value;

pub use kind::ScalarKind;
pub use value::{Distance, Numeric, Scalar, ScalarValue};
