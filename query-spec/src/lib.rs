//! # query-spec
//!
//! Store-agnostic list queries for REST endpoints. Turns a flat client request
//! (`page`, `pageSize`, `sort`, plus arbitrary named fields) into an immutable
//! query specification, and turns a page of rows plus a total count back into
//! a paginated response envelope.
//!
//! ## Features
//!
//! - **Pagination**: defaulting page / page size resolution with consistent skip and take
//! - **Sorting**: multi-field `"field:dir,field:dir"` parsing, last duplicate wins
//! - **Filtering**: reserved-field exclusion, blank-value dropping, per-endpoint allow-lists
//! - **Enforced constraints**: caller-imposed conditions always override client filters
//! - **Envelopes**: `{meta, data}` or `{meta, <entity key>}` responses
//! - **Axum**: `QueryRequest` extractor and `IntoResponse` for results and errors (feature `axum`)
//!
//! Nothing here performs I/O besides [`QueryConfig::load`]; every stage is a pure
//! function of its input and safe to call from any number of threads.
//!
//! ## Example
//!
//! ```rust
//! use query_spec::prelude::*;
//!
//! let builder = QuerySpecBuilder::new(&QueryConfig::default());
//! let request = QueryRequest::from_query_string(
//!     "page=1&pageSize=10&sort=incomeReceived:asc,status:asc&status=active",
//! )
//! .unwrap();
//!
//! let spec = builder.build(&request).unwrap();
//! let options = spec.find_options(Some(&FilterMap::new().with("ownerId", 7)));
//! assert_eq!(options.skip, 0);
//! assert_eq!(options.take, 10);
//!
//! // ... run `options` against the data store ...
//! let rows = vec!["bot-a", "bot-b"];
//!
//! let response = wrap(rows, 2, &spec, Some("bots")).unwrap();
//! assert_eq!(response.meta().limit, 10);
//! ```

pub mod config;
pub mod error;
pub mod filter;
pub mod observability;
pub mod pagination;
pub mod query;
pub mod request;
pub mod response;
pub mod sort;
pub mod value;

#[cfg(feature = "axum")]
mod extract;

pub use config::QueryConfig;
pub use error::{Error, Result};
pub use filter::{extract_filters, extract_filters_only, FilterAllowList, FilterMap};
pub use pagination::{Pagination, PaginationResolver};
pub use query::{FilterSpec, FindOptions, QuerySpec, QuerySpecBuilder};
pub use request::{QueryRequest, RESERVED_FIELDS};
pub use response::{wrap, PageMeta, PaginatedResult};
pub use sort::{SortDirection, SortOrder, SortParser};
pub use value::QueryValue;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::QueryConfig;
    pub use crate::error::{Error, Result};
    pub use crate::filter::{FilterAllowList, FilterMap};
    pub use crate::observability::init_tracing;
    pub use crate::query::{FilterSpec, FindOptions, QuerySpec, QuerySpecBuilder};
    pub use crate::request::QueryRequest;
    pub use crate::response::{wrap, PageMeta, PaginatedResult};
    pub use crate::sort::{SortDirection, SortOrder};
    pub use crate::value::QueryValue;
}
