//! Scalar values carried by requests and filters
//!
//! Every field of an incoming list request, and every filter derived from it,
//! holds a [`QueryValue`]. Values pass through unmodified: a string stays a
//! string, a number stays a number.
//!
//! # Example
//!
//! ```rust
//! use query_spec::QueryValue;
//!
//! let status: QueryValue = "active".into();
//! let owner: QueryValue = 7_i64.into();
//! let archived: QueryValue = false.into();
//!
//! assert_eq!(status.as_str(), Some("active"));
//! assert_eq!(owner.as_integer(), Some(7));
//! assert!(!archived.is_blank());
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Serialize, Serializer};

/// A scalar request or filter value
///
/// Dates are only produced by callers (for example enforced constraints);
/// decoding never turns a string into a date.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    /// Absent value (JSON `null`)
    Null,
    /// String value
    String(String),
    /// 64-bit integer value
    Integer(i64),
    /// 64-bit floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// UTC timestamp
    Date(DateTime<Utc>),
}

impl QueryValue {
    /// Whether the value is absent or an empty string
    ///
    /// Blank values never become filters. `0` and `false` are not blank.
    ///
    /// # Example
    ///
    /// ```rust
    /// use query_spec::QueryValue;
    ///
    /// assert!(QueryValue::Null.is_blank());
    /// assert!(QueryValue::from("").is_blank());
    /// assert!(!QueryValue::from(0_i64).is_blank());
    /// assert!(!QueryValue::from(false).is_blank());
    /// ```
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Borrow the value as a string slice, if it is a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Read the value as an integer
    ///
    /// Integers are returned as-is, floats only when they have no fractional
    /// part, and strings only when they parse as a base-10 integer. Anything
    /// else yields `None`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use query_spec::QueryValue;
    ///
    /// assert_eq!(QueryValue::from(3_i64).as_integer(), Some(3));
    /// assert_eq!(QueryValue::from(3.0_f64).as_integer(), Some(3));
    /// assert_eq!(QueryValue::from(" 12 ").as_integer(), Some(12));
    /// assert_eq!(QueryValue::from(2.5_f64).as_integer(), None);
    /// assert_eq!(QueryValue::from("two").as_integer(), None);
    /// ```
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::Float(f) if f.fract() == 0.0 && f.is_finite() => {
                if *f >= i64::MIN as f64 && *f <= i64::MAX as f64 {
                    Some(*f as i64)
                } else {
                    None
                }
            }
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Name of the variant, used in diagnostics
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::String(_) => "string",
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Boolean(_) => "boolean",
            Self::Date(_) => "date",
        }
    }
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::String(s) => write!(f, "{s}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{}", d.to_rfc3339()),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for QueryValue {
    fn from(n: i64) -> Self {
        Self::Integer(n)
    }
}

impl From<i32> for QueryValue {
    fn from(n: i32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<u32> for QueryValue {
    fn from(n: u32) -> Self {
        Self::Integer(i64::from(n))
    }
}

impl From<f64> for QueryValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<DateTime<Utc>> for QueryValue {
    fn from(d: DateTime<Utc>) -> Self {
        Self::Date(d)
    }
}

impl<T: Into<QueryValue>> From<Option<T>> for QueryValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl Serialize for QueryValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::String(s) => serializer.serialize_str(s),
            Self::Integer(n) => serializer.serialize_i64(*n),
            Self::Float(n) => serializer.serialize_f64(*n),
            Self::Boolean(b) => serializer.serialize_bool(*b),
            Self::Date(d) => d.serialize(serializer),
        }
    }
}

struct QueryValueVisitor;

impl<'de> Visitor<'de> for QueryValueVisitor {
    type Value = QueryValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a string, number, boolean or null")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<QueryValue, E> {
        Ok(QueryValue::Boolean(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<QueryValue, E> {
        Ok(QueryValue::Integer(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<QueryValue, E> {
        Ok(i64::try_from(v).map_or(QueryValue::Float(v as f64), QueryValue::Integer))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<QueryValue, E> {
        Ok(QueryValue::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<QueryValue, E> {
        Ok(QueryValue::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<QueryValue, E> {
        Ok(QueryValue::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<QueryValue, E> {
        Ok(QueryValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<QueryValue, E> {
        Ok(QueryValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<QueryValue, D::Error> {
        deserializer.deserialize_any(self)
    }
}

impl<'de> Deserialize<'de> for QueryValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(QueryValueVisitor)
    }
}
