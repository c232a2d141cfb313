//! Query specifications and find options
//!
//! [`QuerySpecBuilder`] composes the three independent stages (pagination,
//! sorting, filter extraction) into one immutable [`QuerySpec`] per request.
//! Endpoints without pagination use [`QuerySpecBuilder::build_filters_only`]
//! instead and receive a [`FilterSpec`].
//!
//! Both specs turn into the neutral structure handed to persistence, merging
//! caller-enforced constraints last so they always win over client filters.
//!
//! # Example
//!
//! ```rust
//! use query_spec::{FilterMap, QueryRequest, QuerySpecBuilder, SortDirection};
//!
//! let builder = QuerySpecBuilder::default();
//! let request = QueryRequest::new()
//!     .with("page", 2)
//!     .with("pageSize", 5)
//!     .with("sort", "name:asc")
//!     .with("ownerId", 99);
//!
//! let spec = builder.build(&request).unwrap();
//! let options = spec.find_options(Some(&FilterMap::new().with("ownerId", 7)));
//!
//! assert_eq!(options.skip, 5);
//! assert_eq!(options.take, 5);
//! assert_eq!(options.order.get("name"), Some(SortDirection::Ascending));
//! assert_eq!(options.conditions.get("ownerId").and_then(|v| v.as_integer()), Some(7));
//! ```

use serde::Serialize;

use crate::config::QueryConfig;
use crate::error::Result;
use crate::filter::{extract_filters, extract_filters_only, FilterAllowList, FilterMap};
use crate::pagination::{Pagination, PaginationResolver};
use crate::request::QueryRequest;
use crate::sort::{SortOrder, SortParser};

/// Store-agnostic description of one list query
///
/// Built once per request by [`QuerySpecBuilder::build`] and read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySpec {
    pagination: Pagination,
    order: SortOrder,
    filters: FilterMap,
}

impl QuerySpec {
    /// Resolved pagination window
    #[must_use]
    pub const fn pagination(&self) -> &Pagination {
        &self.pagination
    }

    /// Sort order; never empty
    #[must_use]
    pub const fn order(&self) -> &SortOrder {
        &self.order
    }

    /// Client-supplied filters
    #[must_use]
    pub const fn filters(&self) -> &FilterMap {
        &self.filters
    }

    /// Find options for the persistence layer
    ///
    /// `enforced` is applied after the client filters and replaces any
    /// same-named key in them.
    #[must_use]
    pub fn find_options(&self, enforced: Option<&FilterMap>) -> FindOptions {
        FindOptions {
            skip: self.pagination.skip(),
            take: self.pagination.take(),
            order: self.order.clone(),
            conditions: merge(&self.filters, enforced),
        }
    }
}

/// Filter-only specification for endpoints without pagination or sorting
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSpec {
    filters: FilterMap,
}

impl FilterSpec {
    /// Client-supplied filters
    #[must_use]
    pub const fn filters(&self) -> &FilterMap {
        &self.filters
    }

    /// Equality conditions for the persistence layer, enforced constraints last
    #[must_use]
    pub fn conditions(&self, enforced: Option<&FilterMap>) -> FilterMap {
        merge(&self.filters, enforced)
    }
}

fn merge(filters: &FilterMap, enforced: Option<&FilterMap>) -> FilterMap {
    match enforced {
        Some(enforced) => filters.overlay(enforced),
        None => filters.clone(),
    }
}

/// Neutral find options handed to the persistence collaborator
///
/// Serializes as `{"skip", "take", "order", "where"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FindOptions {
    /// Number of rows to skip
    pub skip: u64,
    /// Number of rows to take
    pub take: u64,
    /// Field to direction mapping, in order of precedence
    pub order: SortOrder,
    /// Equality conditions
    #[serde(rename = "where")]
    pub conditions: FilterMap,
}

/// Builds [`QuerySpec`]s from raw requests
///
/// Holds its own defaults and an optional filter allow-list; share one per
/// endpoint.
///
/// # Example
///
/// ```rust
/// use query_spec::{FilterAllowList, QueryConfig, QueryRequest, QuerySpecBuilder};
///
/// let builder = QuerySpecBuilder::new(&QueryConfig::default().with_default_sort_field("id"))
///     .with_allowed_filters(FilterAllowList::new(["status"]));
///
/// let spec = builder.build(&QueryRequest::new().with("status", "active")).unwrap();
/// assert_eq!(spec.order().iter().next().map(|(field, _)| field), Some("id"));
///
/// assert!(builder.build(&QueryRequest::new().with("ownerId", 1)).is_err());
/// ```
#[derive(Debug, Clone)]
pub struct QuerySpecBuilder {
    sort: SortParser,
    pagination: PaginationResolver,
    allowed: Option<FilterAllowList>,
}

impl QuerySpecBuilder {
    /// Create a builder from configuration
    #[must_use]
    pub fn new(config: &QueryConfig) -> Self {
        Self {
            sort: SortParser::new(config.default_sort_field.clone()),
            pagination: PaginationResolver::new(config.default_page_size),
            allowed: None,
        }
    }

    /// Restrict client filters to the given names
    #[must_use]
    pub fn with_allowed_filters(mut self, allowed: FilterAllowList) -> Self {
        self.allowed = Some(allowed);
        self
    }

    /// The sort stage
    #[must_use]
    pub const fn sort_parser(&self) -> &SortParser {
        &self.sort
    }

    /// The pagination stage
    #[must_use]
    pub const fn pagination_resolver(&self) -> &PaginationResolver {
        &self.pagination
    }

    /// Build the full specification for a list request
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::FilterNotAllowed`] when an allow-list is set
    /// and the request carries a filter outside it. Without an allow-list
    /// this never fails.
    pub fn build(&self, query: &QueryRequest) -> Result<QuerySpec> {
        let filters = extract_filters(query);
        self.check(&filters)?;

        let spec = QuerySpec {
            pagination: self.pagination.resolve(query.page(), query.page_size()),
            order: self.sort.parse(query.sort()),
            filters,
        };

        tracing::trace!(
            page = spec.pagination.page(),
            page_size = spec.pagination.page_size(),
            order_fields = spec.order.len(),
            filters = spec.filters.len(),
            "Built query spec"
        );

        Ok(spec)
    }

    /// Build a filter-only specification
    ///
    /// No field is reserved here, so `page`, `pageSize` and `sort` sent to a
    /// filter-only endpoint are treated as filters.
    ///
    /// # Errors
    ///
    /// Same conditions as [`QuerySpecBuilder::build`].
    pub fn build_filters_only(&self, query: &QueryRequest) -> Result<FilterSpec> {
        let filters = extract_filters_only(query);
        self.check(&filters)?;

        tracing::trace!(filters = filters.len(), "Built filter spec");
        Ok(FilterSpec { filters })
    }

    fn check(&self, filters: &FilterMap) -> Result<()> {
        match &self.allowed {
            Some(allowed) => allowed.check(filters),
            None => Ok(()),
        }
    }
}

impl Default for QuerySpecBuilder {
    fn default() -> Self {
        Self::new(&QueryConfig::default())
    }
}
