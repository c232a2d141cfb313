//! Filter extraction from raw requests
//!
//! Two extraction stages share one drop rule: values that are absent or an
//! empty string are discarded, everything else (including `0` and `false`)
//! is kept exactly as given.
//!
//! - [`extract_filters`] skips the reserved `page`, `pageSize` and `sort`
//!   fields. Use it for list endpoints.
//! - [`extract_filters_only`] skips nothing. Use it for endpoints with no
//!   pagination or sorting, such as summaries; a `page` field sent to such an
//!   endpoint is kept as a filter.
//!
//! # Example
//!
//! ```rust
//! use query_spec::{extract_filters, extract_filters_only, QueryRequest};
//!
//! let request = QueryRequest::new()
//!     .with("page", 1)
//!     .with("status", "")
//!     .with("type", "bot");
//!
//! let full = extract_filters(&request);
//! assert_eq!(full.len(), 1);
//!
//! let only = extract_filters_only(&request);
//! assert_eq!(only.len(), 2);
//! assert!(only.get("page").is_some());
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Error, Result};
use crate::request::{is_reserved, QueryRequest};
use crate::value::QueryValue;

/// Ordered mapping of field names to equality constraints
///
/// Setting a field that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterMap {
    entries: Vec<(String, QueryValue)>,
}

impl FilterMap {
    /// Create an empty filter map
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a constraint, builder style
    ///
    /// # Example
    ///
    /// ```rust
    /// use query_spec::FilterMap;
    ///
    /// let enforced = FilterMap::new().with("ownerId", 7_i64);
    /// assert_eq!(enforced.get("ownerId").and_then(|v| v.as_integer()), Some(7));
    /// ```
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Set a constraint, replacing any previous value for the same field
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<QueryValue>) {
        let field = field.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == field) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((field, value)),
        }
    }

    /// Value constrained for a field
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&QueryValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == field)
            .map(|(_, value)| value)
    }

    /// Iterate over `(field, value)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &QueryValue)> {
        self.entries.iter().map(|(field, value)| (field.as_str(), value))
    }

    /// Field names in insertion order
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(field, _)| field.as_str())
    }

    /// Number of constraints
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no constraints
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Overlay `enforced` on top of these filters
    ///
    /// Every field in `enforced` replaces a same-named client filter, so a
    /// client can never loosen a constraint imposed by the caller.
    ///
    /// # Example
    ///
    /// ```rust
    /// use query_spec::FilterMap;
    ///
    /// let client = FilterMap::new().with("ownerId", 99_i64).with("status", "active");
    /// let enforced = FilterMap::new().with("ownerId", 7_i64);
    ///
    /// let merged = client.overlay(&enforced);
    /// assert_eq!(merged.get("ownerId").and_then(|v| v.as_integer()), Some(7));
    /// assert_eq!(merged.len(), 2);
    /// ```
    #[must_use]
    pub fn overlay(&self, enforced: &FilterMap) -> FilterMap {
        let mut merged = self.clone();
        for (field, value) in &enforced.entries {
            if let Some(client) = self.get(field).filter(|client| *client != value) {
                tracing::debug!(
                    field = %field,
                    client = %client,
                    enforced = %value,
                    "Enforced constraint overrides client filter"
                );
            }
            merged.insert(field.clone(), value.clone());
        }
        merged
    }
}

impl<K, V> FromIterator<(K, V)> for FilterMap
where
    K: Into<String>,
    V: Into<QueryValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filters = Self::new();
        for (field, value) in iter {
            filters.insert(field, value);
        }
        filters
    }
}

impl Serialize for FilterMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, value) in &self.entries {
            map.serialize_entry(field, value)?;
        }
        map.end()
    }
}

/// Derive filters from a list request, skipping reserved fields
#[must_use]
pub fn extract_filters(query: &QueryRequest) -> FilterMap {
    collect(query, |name| !is_reserved(name))
}

/// Derive filters from a request without skipping any field
///
/// Intended for endpoints that have no pagination or sort concept.
#[must_use]
pub fn extract_filters_only(query: &QueryRequest) -> FilterMap {
    collect(query, |_| true)
}

fn collect(query: &QueryRequest, include: impl Fn(&str) -> bool) -> FilterMap {
    query
        .iter()
        .filter(|(name, value)| include(name) && !value.is_blank())
        .map(|(name, value)| (name, value.clone()))
        .collect()
}

/// Filter names an endpoint accepts from clients
///
/// Enforced constraints are not subject to the allow-list; only fields that
/// arrive in the client request are checked.
///
/// # Example
///
/// ```rust
/// use query_spec::{FilterAllowList, FilterMap};
///
/// let allowed = FilterAllowList::new(["status", "type"]);
///
/// assert!(allowed.check(&FilterMap::new().with("status", "active")).is_ok());
/// assert!(allowed.check(&FilterMap::new().with("ownerId", 1_i64)).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterAllowList {
    fields: Vec<String>,
}

impl FilterAllowList {
    /// Create an allow-list from field names
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::default();
        for field in fields {
            let field = field.into();
            if !list.fields.contains(&field) {
                list.fields.push(field);
            }
        }
        list
    }

    /// Whether `field` may be used as a client filter
    #[must_use]
    pub fn permits(&self, field: &str) -> bool {
        self.fields.iter().any(|allowed| allowed == field)
    }

    /// Permitted field names
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Verify every filter name is permitted
    ///
    /// # Errors
    ///
    /// Returns [`Error::FilterNotAllowed`] for the first filter whose name is
    /// not in the list.
    pub fn check(&self, filters: &FilterMap) -> Result<()> {
        match filters.fields().find(|field| !self.permits(field)) {
            Some(field) => {
                tracing::warn!(field, allowed = ?self.fields, "Rejected filter outside allow-list");
                Err(Error::FilterNotAllowed {
                    field: field.to_string(),
                    allowed: self.fields.clone(),
                })
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(filters: &FilterMap) -> Vec<(&str, &QueryValue)> {
        filters.iter().collect()
    }

    #[test]
    fn test_extract_filters_skips_reserved() {
        let request = QueryRequest::new()
            .with("page", 1)
            .with("pageSize", 10)
            .with("sort", "name:asc")
            .with("status", "active");
        let filters = extract_filters(&request);
        assert_eq!(
            fields(&filters),
            vec![("status", &QueryValue::String("active".to_string()))]
        );
    }

    #[test]
    fn test_extract_filters_drop_rule() {
        let request = QueryRequest::new()
            .with("a", QueryValue::Null)
            .with("b", "")
            .with("c", 0_i64)
            .with("d", false)
            .with("e", " ");
        let filters = extract_filters(&request);
        assert_eq!(
            fields(&filters),
            vec![
                ("c", &QueryValue::Integer(0)),
                ("d", &QueryValue::Boolean(false)),
                ("e", &QueryValue::String(" ".to_string())),
            ]
        );
    }

    #[test]
    fn test_extract_filters_preserves_types() {
        let request = QueryRequest::new()
            .with("count", "5")
            .with("ratio", 0.5)
            .with("ok", true);
        let filters = extract_filters(&request);
        assert_eq!(filters.get("count"), Some(&QueryValue::String("5".to_string())));
        assert_eq!(filters.get("ratio"), Some(&QueryValue::Float(0.5)));
        assert_eq!(filters.get("ok"), Some(&QueryValue::Boolean(true)));
    }

    #[test]
    fn test_extract_filters_only_keeps_reserved_names() {
        let request = QueryRequest::new()
            .with("status", "")
            .with("type", "bot")
            .with("page", 1);
        let filters = extract_filters_only(&request);
        assert_eq!(
            fields(&filters),
            vec![
                ("type", &QueryValue::String("bot".to_string())),
                ("page", &QueryValue::Integer(1)),
            ]
        );
    }

    #[test]
    fn test_extract_filters_only_still_drops_blank() {
        let request = QueryRequest::new()
            .with("sort", "")
            .with("pageSize", QueryValue::Null);
        assert!(extract_filters_only(&request).is_empty());
    }

    #[test]
    fn test_overlay_enforced_wins() {
        let client = FilterMap::new().with("ownerId", 99_i64).with("status", "active");
        let enforced = FilterMap::new().with("ownerId", 7_i64);
        let merged = client.overlay(&enforced);
        assert_eq!(merged.get("ownerId"), Some(&QueryValue::Integer(7)));
        assert_eq!(
            merged.get("status"),
            Some(&QueryValue::String("active".to_string()))
        );
    }

    #[test]
    fn test_overlay_adds_missing_fields() {
        let merged = FilterMap::new().overlay(&FilterMap::new().with("tenant", "acme"));
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_overlay_keeps_enforced_null() {
        let client = FilterMap::new().with("deletedAt", "2024-01-01");
        let enforced = FilterMap::new().with("deletedAt", QueryValue::Null);
        let merged = client.overlay(&enforced);
        assert_eq!(merged.get("deletedAt"), Some(&QueryValue::Null));
    }

    #[test]
    fn test_filter_map_serializes_as_object() {
        let filters = FilterMap::new().with("status", "active").with("ownerId", 7_i64);
        let json = serde_json::to_string(&filters).unwrap();
        assert_eq!(json, r#"{"status":"active","ownerId":7}"#);
    }

    #[test]
    fn test_allow_list() {
        let allowed = FilterAllowList::new(["status", "type", "status"]);
        assert_eq!(allowed.fields().len(), 2);
        assert!(allowed.permits("type"));
        assert!(!allowed.permits("ownerId"));
    }

    #[test]
    fn test_allow_list_check_reports_field() {
        let allowed = FilterAllowList::new(["status"]);
        let filters = FilterMap::new().with("status", "a").with("ownerId", 99_i64);
        match allowed.check(&filters) {
            Err(Error::FilterNotAllowed { field, allowed }) => {
                assert_eq!(field, "ownerId");
                assert_eq!(allowed, vec!["status".to_string()]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
