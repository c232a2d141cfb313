//! Paginated response envelopes
//!
//! A [`PaginatedResult`] pairs one page of rows with `{total, page, limit}`
//! metadata taken from the [`QuerySpec`] that produced the page. The rows are
//! serialized under `data`, or under a caller-chosen key so responses read
//! naturally (`bots`, `transactions`, ...).
//!
//! # Example
//!
//! ```rust
//! use query_spec::{wrap, QueryRequest, QuerySpecBuilder};
//!
//! let spec = QuerySpecBuilder::default()
//!     .build(&QueryRequest::new().with("page", 2).with("pageSize", 2))
//!     .unwrap();
//!
//! let result = wrap(vec!["x", "y"], 5, &spec, Some("bots")).unwrap();
//! assert_eq!(
//!     serde_json::to_value(&result).unwrap(),
//!     serde_json::json!({"meta": {"total": 5, "page": 2, "limit": 2}, "bots": ["x", "y"]})
//! );
//! ```

#[cfg(feature = "axum")]
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::query::QuerySpec;

/// Key used for the rows when no entity key is given
pub const DEFAULT_DATA_KEY: &str = "data";

/// Key holding the pagination metadata
pub const META_KEY: &str = "meta";

/// Pagination metadata for list responses
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, Deserialize)]
pub struct PageMeta {
    /// Total number of items across all pages
    pub total: u64,
    /// Current page number (1-indexed)
    pub page: u64,
    /// Requested page size (not the number of rows returned)
    pub limit: u64,
}

impl PageMeta {
    /// Metadata for a page of `spec` with `total` matching items
    #[must_use]
    pub fn from_spec(spec: &QuerySpec, total: u64) -> Self {
        Self {
            total,
            page: spec.pagination().page(),
            limit: spec.pagination().page_size(),
        }
    }

    /// Total number of pages, rounding up
    ///
    /// # Example
    ///
    /// ```rust
    /// use query_spec::PageMeta;
    ///
    /// let meta = PageMeta { total: 45, page: 1, limit: 20 };
    /// assert_eq!(meta.total_pages(), 3);
    /// ```
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        let limit = self.limit.max(1);
        self.total.div_ceil(limit)
    }
}

/// One page of results plus metadata
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedResult<T> {
    meta: PageMeta,
    data: Vec<T>,
    key: Option<String>,
}

impl<T> PaginatedResult<T> {
    /// Create a result under the generic `data` key
    pub fn new(data: Vec<T>, meta: PageMeta) -> Self {
        Self {
            meta,
            data,
            key: None,
        }
    }

    /// Serialize the rows under `key` instead of `data`
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEntityKey`] if `key` is empty or `meta`.
    pub fn with_entity_key(mut self, key: impl Into<String>) -> Result<Self> {
        let key = key.into();
        if key.is_empty() || key == META_KEY {
            return Err(Error::InvalidEntityKey(key));
        }
        self.key = Some(key);
        Ok(self)
    }

    /// Pagination metadata
    #[must_use]
    pub const fn meta(&self) -> &PageMeta {
        &self.meta
    }

    /// Rows of the current page
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Key the rows are serialized under
    #[must_use]
    pub fn entity_key(&self) -> &str {
        self.key.as_deref().unwrap_or(DEFAULT_DATA_KEY)
    }

    /// Take the rows out of the envelope
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Map each row to a new type, keeping metadata and key
    ///
    /// # Example
    ///
    /// ```rust
    /// use query_spec::{PageMeta, PaginatedResult};
    ///
    /// let result = PaginatedResult::new(vec![1, 2], PageMeta { total: 2, page: 1, limit: 10 });
    /// let mapped = result.map(|n| n.to_string());
    /// assert_eq!(mapped.data(), ["1", "2"]);
    /// ```
    pub fn map<U, F>(self, f: F) -> PaginatedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PaginatedResult {
            meta: self.meta,
            data: self.data.into_iter().map(f).collect(),
            key: self.key,
        }
    }

    /// Number of rows in the current page
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the current page has no rows
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T: Serialize> Serialize for PaginatedResult<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(META_KEY, &self.meta)?;
        map.serialize_entry(self.entity_key(), &self.data)?;
        map.end()
    }
}

#[cfg(feature = "axum")]
impl<T: Serialize> IntoResponse for PaginatedResult<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Wrap a page of rows and the total count into a response envelope
///
/// `limit` is the page size requested in `spec`, not `data.len()`.
///
/// # Errors
///
/// Returns [`Error::InvalidEntityKey`] if `entity_key` is empty or `meta`.
pub fn wrap<T>(
    data: Vec<T>,
    total: u64,
    spec: &QuerySpec,
    entity_key: Option<&str>,
) -> Result<PaginatedResult<T>> {
    let result = PaginatedResult::new(data, PageMeta::from_spec(spec, total));
    match entity_key {
        Some(key) => result.with_entity_key(key),
        None => Ok(result),
    }
}
