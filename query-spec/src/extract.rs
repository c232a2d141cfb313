//! Axum integration
//!
//! [`QueryRequest`] can be taken directly as a handler argument; it decodes
//! the URI query string. Decoding failures reject with [`Error`], which
//! renders as a 400 JSON body.
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{extract::State, routing::get, Router};
//! use query_spec::{wrap, Error, FilterMap, PaginatedResult, QueryRequest, QuerySpecBuilder};
//!
//! async fn list_bots(
//!     State(builder): State<QuerySpecBuilder>,
//!     request: QueryRequest,
//! ) -> Result<PaginatedResult<Bot>, Error> {
//!     let spec = builder.build(&request)?;
//!     let options = spec.find_options(Some(&FilterMap::new().with("ownerId", current_user())));
//!     let (rows, total) = bots_repository().find_and_count(options).await;
//!     wrap(rows, total, &spec, Some("bots"))
//! }
//! ```

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::Error;
use crate::request::QueryRequest;

impl<S> FromRequestParts<S> for QueryRequest
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        QueryRequest::from_query_string(parts.uri.query().unwrap_or(""))
    }
}
