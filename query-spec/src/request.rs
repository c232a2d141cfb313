//! Raw list requests
//!
//! A [`QueryRequest`] is the flat, untyped bag of fields a client sends to a
//! list endpoint: `page`, `pageSize`, `sort`, plus any number of named
//! fields that become filters. Field order is kept as received.
//!
//! # Example
//!
//! ```rust
//! use query_spec::QueryRequest;
//!
//! let request = QueryRequest::from_query_string("page=2&pageSize=5&sort=name:asc&status=active")
//!     .unwrap();
//!
//! assert_eq!(request.page(), Some(2));
//! assert_eq!(request.page_size(), Some(5));
//! assert_eq!(request.sort(), Some("name:asc"));
//! assert_eq!(request.get("status").and_then(|v| v.as_str()), Some("active"));
//! ```

use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Error, Result};
use crate::value::QueryValue;

/// Field holding the requested page number
pub const PAGE_FIELD: &str = "page";

/// Field holding the requested page size
pub const PAGE_SIZE_FIELD: &str = "pageSize";

/// Field holding the sort string
pub const SORT_FIELD: &str = "sort";

/// Fields that are never treated as filters by [`crate::filter::extract_filters`]
pub const RESERVED_FIELDS: [&str; 3] = [PAGE_FIELD, PAGE_SIZE_FIELD, SORT_FIELD];

/// Whether `name` is one of the reserved pagination/sort fields
#[must_use]
pub fn is_reserved(name: &str) -> bool {
    RESERVED_FIELDS.contains(&name)
}

/// An ordered, open mapping of field names to scalar values
///
/// Inserting a name that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryRequest {
    fields: Vec<(String, QueryValue)>,
}

impl QueryRequest {
    /// Create an empty request
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, builder style
    ///
    /// # Example
    ///
    /// ```rust
    /// use query_spec::QueryRequest;
    ///
    /// let request = QueryRequest::new()
    ///     .with("page", 1)
    ///     .with("status", "active");
    /// assert_eq!(request.len(), 2);
    /// ```
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Set a field, replacing any previous value for the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<QueryValue>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Look up a field by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// Whether the request carries a field with this name
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate over fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the request has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Requested page, if present and readable as an integer
    #[must_use]
    pub fn page(&self) -> Option<i64> {
        self.get(PAGE_FIELD).and_then(QueryValue::as_integer)
    }

    /// Requested page size, if present and readable as an integer
    #[must_use]
    pub fn page_size(&self) -> Option<i64> {
        self.get(PAGE_SIZE_FIELD).and_then(QueryValue::as_integer)
    }

    /// Raw sort string, if present and a string
    #[must_use]
    pub fn sort(&self) -> Option<&str> {
        self.get(SORT_FIELD).and_then(QueryValue::as_str)
    }

    /// Decode an `application/x-www-form-urlencoded` query string
    ///
    /// `page` and `pageSize` become integers when they are numeric; every
    /// other value stays a string. A repeated name keeps its last value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidQueryString`] if the input is not valid
    /// form-urlencoded data.
    pub fn from_query_string(query: &str) -> Result<Self> {
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query)
            .map_err(|e| Error::InvalidQueryString(e.to_string()))?;

        let mut request = Self::new();
        for (name, raw) in pairs {
            let value = if name == PAGE_FIELD || name == PAGE_SIZE_FIELD {
                raw.trim()
                    .parse::<i64>()
                    .map_or_else(|_| QueryValue::String(raw), QueryValue::Integer)
            } else {
                QueryValue::String(raw)
            };
            request.insert(name, value);
        }

        Ok(request)
    }
}

impl<K, V> FromIterator<(K, V)> for QueryRequest
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut request = Self::new();
        for (name, value) in iter {
            request.insert(name, value);
        }
        request
    }
}

impl IntoIterator for QueryRequest {
    type Item = (String, QueryValue);
    type IntoIter = std::vec::IntoIter<(String, QueryValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl Serialize for QueryRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct QueryRequestVisitor;

impl<'de> Visitor<'de> for QueryRequestVisitor {
    type Value = QueryRequest;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of field names to scalar values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<QueryRequest, A::Error> {
        let mut request = QueryRequest::new();
        while let Some((name, value)) = access.next_entry::<String, QueryValue>()? {
            request.insert(name, value);
        }
        Ok(request)
    }
}

impl<'de> Deserialize<'de> for QueryRequest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(QueryRequestVisitor)
    }
}
