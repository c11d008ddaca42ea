//! Scalar values read out of, and written into, property maps.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ScalarKind;
use crate::{Error, Result};

/// A value of one of the registry kinds.
///
/// Always an owned copy: reading a property produces a fresh value, and
/// writing one consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ScalarValue {
    Bool(bool),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Double(f64),
    String(String),
    VecBool(Vec<bool>),
    VecInt16(Vec<i16>),
    VecInt32(Vec<i32>),
    VecInt64(Vec<i64>),
    VecDouble(Vec<f64>),
    VecString(Vec<String>),
}

// ============================================================================
// Type checking
// ============================================================================

impl ScalarValue {
    pub fn kind(&self) -> ScalarKind {
        match self {
            ScalarValue::Bool(_) => ScalarKind::Bool,
            ScalarValue::Int16(_) => ScalarKind::Int16,
            ScalarValue::Int32(_) => ScalarKind::Int32,
            ScalarValue::Int64(_) => ScalarKind::Int64,
            ScalarValue::Double(_) => ScalarKind::Double,
            ScalarValue::String(_) => ScalarKind::String,
            ScalarValue::VecBool(_) => ScalarKind::VecBool,
            ScalarValue::VecInt16(_) => ScalarKind::VecInt16,
            ScalarValue::VecInt32(_) => ScalarKind::VecInt32,
            ScalarValue::VecInt64(_) => ScalarKind::VecInt64,
            ScalarValue::VecDouble(_) => ScalarKind::VecDouble,
            ScalarValue::VecString(_) => ScalarKind::VecString,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().name()
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ScalarValue::Int16(_) | ScalarValue::Int32(_) | ScalarValue::Int64(_) | ScalarValue::Double(_)
        )
    }

    /// Attempt to extract as i64
    pub fn as_int(&self) -> Option<i64> {
        match self {
            ScalarValue::Int16(i) => Some(i64::from(*i)),
            ScalarValue::Int32(i) => Some(i64::from(*i)),
            ScalarValue::Int64(i) => Some(*i),
            ScalarValue::Double(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }

    /// Attempt to extract as f64
    pub fn as_float(&self) -> Option<f64> {
        match self {
            ScalarValue::Double(f) => Some(*f),
            ScalarValue::Int16(i) => Some(f64::from(*i)),
            ScalarValue::Int32(i) => Some(f64::from(*i)),
            ScalarValue::Int64(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ScalarValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::String(s) => Some(s),
            _ => None,
        }
    }
}

fn type_error(expected: ScalarKind, got: &ScalarValue) -> Error {
    Error::TypeError {
        expected: expected.name().into(),
        got: got.type_name().into(),
    }
}

// ============================================================================
// Scalar: compile-time side of the registry
// ============================================================================

mod sealed {
    pub trait Sealed {}
}

/// A Rust type that backs one registry kind.
///
/// Sealed: the registry is closed, so the set of implementors is too.
pub trait Scalar: sealed::Sealed + Clone + Default + fmt::Debug + Send + Sync + 'static {
    const KIND: ScalarKind;

    fn into_value(self) -> ScalarValue;

    /// Convert a value back. Integer kinds accept any integer (or integral
    /// double) that fits; `double` accepts any number; everything else must
    /// match exactly.
    fn from_value(value: ScalarValue) -> Result<Self>;
}

macro_rules! int_scalar {
    ($t:ty, $kind:ident) => {
        impl sealed::Sealed for $t {}

        impl Scalar for $t {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn into_value(self) -> ScalarValue {
                ScalarValue::$kind(self)
            }

            fn from_value(value: ScalarValue) -> Result<Self> {
                value
                    .as_int()
                    .and_then(|i| <$t>::try_from(i).ok())
                    .ok_or_else(|| type_error(Self::KIND, &value))
            }
        }
    };
}

int_scalar!(i16, Int16);
int_scalar!(i32, Int32);
int_scalar!(i64, Int64);

macro_rules! exact_scalar {
    ($t:ty, $kind:ident) => {
        impl sealed::Sealed for $t {}

        impl Scalar for $t {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn into_value(self) -> ScalarValue {
                ScalarValue::$kind(self)
            }

            fn from_value(value: ScalarValue) -> Result<Self> {
                match value {
                    ScalarValue::$kind(v) => Ok(v),
                    other => Err(type_error(Self::KIND, &other)),
                }
            }
        }
    };
}

exact_scalar!(bool, Bool);
exact_scalar!(String, String);
exact_scalar!(Vec<bool>, VecBool);
exact_scalar!(Vec<i16>, VecInt16);
exact_scalar!(Vec<i32>, VecInt32);
exact_scalar!(Vec<i64>, VecInt64);
exact_scalar!(Vec<f64>, VecDouble);
exact_scalar!(Vec<String>, VecString);

impl sealed::Sealed for f64 {}

impl Scalar for f64 {
    const KIND: ScalarKind = ScalarKind::Double;

    fn into_value(self) -> ScalarValue {
        ScalarValue::Double(self)
    }

    fn from_value(value: ScalarValue) -> Result<Self> {
        value.as_float().ok_or_else(|| type_error(Self::KIND, &value))
    }
}

// ============================================================================
// Distance: numeric kinds usable as path costs
// ============================================================================

/// Widened numeric used to move costs between distance kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub fn as_f64(self) -> f64 {
        match self {
            Numeric::Int(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }

    /// Integer sums saturate; mixing in a float widens to float.
    pub fn saturating_add(self, rhs: Numeric) -> Numeric {
        match (self, rhs) {
            (Numeric::Int(a), Numeric::Int(b)) => Numeric::Int(a.saturating_add(b)),
            (a, b) => Numeric::Float(a.as_f64() + b.as_f64()),
        }
    }
}

/// A scalar kind that can hold path costs.
///
/// Unreachable is `MAX` for integer kinds and `+inf` for `double`.
pub trait Distance: Scalar + Copy + PartialOrd {
    fn zero() -> Self;
    fn one() -> Self;
    /// Canonical unreachable sentinel.
    fn infinity() -> Self;
    fn max_value() -> Self;
    /// `a + b`, except that `inf` absorbs and integer overflow saturates.
    fn closed_add(self, rhs: Self, inf: Self) -> Self;
    fn to_numeric(self) -> Numeric;
    /// Saturating conversion from the widened form.
    fn from_numeric(n: Numeric) -> Self;

    fn from_weight<W: Distance>(w: W) -> Self {
        Self::from_numeric(w.to_numeric())
    }

    /// Map a raw `MAX` left behind by a relaxation pass to the canonical sentinel.
    fn normalize_unreachable(self) -> Self {
        self
    }
}

macro_rules! int_distance {
    ($t:ty) => {
        impl Distance for $t {
            fn zero() -> Self {
                0
            }

            fn one() -> Self {
                1
            }

            fn infinity() -> Self {
                <$t>::MAX
            }

            fn max_value() -> Self {
                <$t>::MAX
            }

            fn closed_add(self, rhs: Self, inf: Self) -> Self {
                if self == inf || rhs == inf {
                    return inf;
                }
                self.saturating_add(rhs)
            }

            fn to_numeric(self) -> Numeric {
                Numeric::Int(i64::from(self))
            }

            fn from_numeric(n: Numeric) -> Self {
                match n {
                    Numeric::Int(i) => <$t>::try_from(i)
                        .unwrap_or(if i < 0 { <$t>::MIN } else { <$t>::MAX }),
                    // `as` saturates and maps NaN to zero.
                    Numeric::Float(f) => f as $t,
                }
            }
        }
    };
}

int_distance!(i16);
int_distance!(i32);
int_distance!(i64);

impl Distance for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }

    fn infinity() -> Self {
        f64::INFINITY
    }

    fn max_value() -> Self {
        f64::MAX
    }

    fn closed_add(self, rhs: Self, inf: Self) -> Self {
        if self == inf || rhs == inf {
            return inf;
        }
        self + rhs
    }

    fn to_numeric(self) -> Numeric {
        Numeric::Float(self)
    }

    fn from_numeric(n: Numeric) -> Self {
        match n {
            Numeric::Int(i) => i as f64,
            Numeric::Float(f) => f,
        }
    }

    fn normalize_unreachable(self) -> Self {
        if self == f64::MAX { f64::INFINITY } else { self }
    }
}

// ============================================================================
// Conversions (From impls)
// ============================================================================

impl From<bool> for ScalarValue { fn from(v: bool) -> Self { ScalarValue::Bool(v) } }
impl From<i16> for ScalarValue { fn from(v: i16) -> Self { ScalarValue::Int16(v) } }
impl From<i32> for ScalarValue { fn from(v: i32) -> Self { ScalarValue::Int32(v) } }
impl From<i64> for ScalarValue { fn from(v: i64) -> Self { ScalarValue::Int64(v) } }
impl From<f64> for ScalarValue { fn from(v: f64) -> Self { ScalarValue::Double(v) } }
impl From<String> for ScalarValue { fn from(v: String) -> Self { ScalarValue::String(v) } }
impl From<&str> for ScalarValue { fn from(v: &str) -> Self { ScalarValue::String(v.to_owned()) } }
impl From<Vec<f64>> for ScalarValue { fn from(v: Vec<f64>) -> Self { ScalarValue::VecDouble(v) } }
impl From<Vec<i64>> for ScalarValue { fn from(v: Vec<i64>) -> Self { ScalarValue::VecInt64(v) } }

// ============================================================================
// Display
// ============================================================================

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    write!(f, "[")?;
    for (i, v) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{v}")?;
    }
    write!(f, "]")
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Bool(b) => write!(f, "{b}"),
            ScalarValue::Int16(i) => write!(f, "{i}"),
            ScalarValue::Int32(i) => write!(f, "{i}"),
            ScalarValue::Int64(i) => write!(f, "{i}"),
            ScalarValue::Double(v) => write!(f, "{v}"),
            ScalarValue::String(s) => write!(f, "\"{}\"", s.replace('"', "\\\"")),
            ScalarValue::VecBool(v) => write_list(f, v),
            ScalarValue::VecInt16(v) => write_list(f, v),
            ScalarValue::VecInt32(v) => write_list(f, v),
            ScalarValue::VecInt64(v) => write_list(f, v),
            ScalarValue::VecDouble(v) => write_list(f, v),
            ScalarValue::VecString(v) => write_list(f, v),
        }
    }
}
