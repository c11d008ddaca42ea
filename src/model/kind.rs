//! Scalar kind registry: the closed set of value types a property map can hold.
//!
//! Names are stable and are what callers pass to
//! [`create_property`](crate::property::create_property). Lookup walks
//! [`ScalarKind::ALL`] in declaration order; the first match wins.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Supported property value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScalarKind {
    Bool,
    Int16,
    Int32,
    Int64,
    Double,
    String,
    VecBool,
    VecInt16,
    VecInt32,
    VecInt64,
    VecDouble,
    VecString,
}

impl ScalarKind {
    /// Every kind, in registry (declaration) order.
    pub const ALL: [ScalarKind; 12] = [
        ScalarKind::Bool,
        ScalarKind::Int16,
        ScalarKind::Int32,
        ScalarKind::Int64,
        ScalarKind::Double,
        ScalarKind::String,
        ScalarKind::VecBool,
        ScalarKind::VecInt16,
        ScalarKind::VecInt32,
        ScalarKind::VecInt64,
        ScalarKind::VecDouble,
        ScalarKind::VecString,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Int16 => "int16_t",
            ScalarKind::Int32 => "int32_t",
            ScalarKind::Int64 => "int64_t",
            ScalarKind::Double => "double",
            ScalarKind::String => "string",
            ScalarKind::VecBool => "vector<bool>",
            ScalarKind::VecInt16 => "vector<int16_t>",
            ScalarKind::VecInt32 => "vector<int32_t>",
            ScalarKind::VecInt64 => "vector<int64_t>",
            ScalarKind::VecDouble => "vector<double>",
            ScalarKind::VecString => "vector<string>",
        }
    }

    /// Resolve a registry name. Fails with `UnknownType` when nothing matches.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name() == name)
            .ok_or_else(|| Error::UnknownType(name.to_string()))
    }

    /// Whether a map of this kind can be exposed as a flat numeric buffer.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            ScalarKind::Bool
                | ScalarKind::Int16
                | ScalarKind::Int32
                | ScalarKind::Int64
                | ScalarKind::Double
        )
    }

    /// Numeric kinds that can serve as path costs (bool excluded).
    pub fn is_distance(self) -> bool {
        self.is_numeric() && self != ScalarKind::Bool
    }

    pub fn is_floating(self) -> bool {
        self == ScalarKind::Double
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in ScalarKind::ALL {
            assert_eq!(ScalarKind::from_name(kind.name()).unwrap(), kind);
        }
    }

    #[test]
    fn test_unknown_name() {
        let err = ScalarKind::from_name("long double").unwrap_err();
        assert!(matches!(err, Error::UnknownType(ref n) if n == "long double"));
    }

    #[test]
    fn test_numeric_classification() {
        assert!(ScalarKind::Bool.is_numeric());
        assert!(!ScalarKind::Bool.is_distance());
        assert!(ScalarKind::Int32.is_distance());
        assert!(!ScalarKind::String.is_numeric());
        assert!(!ScalarKind::VecDouble.is_numeric());
    }
}
