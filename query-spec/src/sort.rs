//! Multi-field sort parsing
//!
//! Sort strings have the form `"field:dir,field:dir,..."`. Parsing is
//! lenient: malformed tokens are skipped, and an empty result falls back to
//! the parser's default field in descending order.
//!
//! # Example
//!
//! ```rust
//! use query_spec::{SortDirection, SortParser};
//!
//! let parser = SortParser::new("createdAt");
//!
//! let order = parser.parse(Some("name:asc, age"));
//! assert_eq!(order.get("name"), Some(SortDirection::Ascending));
//! assert_eq!(order.get("age"), Some(SortDirection::Descending));
//!
//! let fallback = parser.parse(None);
//! assert_eq!(fallback.get("createdAt"), Some(SortDirection::Descending));
//! ```

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde::Deserialize;

/// Fallback sort field when none is configured
pub const DEFAULT_SORT_FIELD: &str = "createdAt";

/// Direction for ordering results
///
/// Serialized as `"ASC"` / `"DESC"` for the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, Deserialize)]
pub enum SortDirection {
    /// Sort in ascending order (A-Z, 0-9, oldest first)
    #[serde(rename = "ASC")]
    Ascending,
    /// Sort in descending order (Z-A, 9-0, newest first)
    #[serde(rename = "DESC")]
    Descending,
}

impl SortDirection {
    /// Normalize a direction token
    ///
    /// Only `asc` (any case, surrounding whitespace ignored) is ascending.
    /// Any other text, or no text at all, is descending.
    ///
    /// # Example
    ///
    /// ```rust
    /// use query_spec::SortDirection;
    ///
    /// assert_eq!(SortDirection::from_token(Some("ASC")), SortDirection::Ascending);
    /// assert_eq!(SortDirection::from_token(Some("up")), SortDirection::Descending);
    /// assert_eq!(SortDirection::from_token(None), SortDirection::Descending);
    /// ```
    #[must_use]
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some(dir) if dir.trim().eq_ignore_ascii_case("asc") => Self::Ascending,
            _ => Self::Descending,
        }
    }

    /// Wire form used in find options
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered mapping of field names to sort directions
///
/// Keyed by field name: setting a field that is already present overwrites
/// its direction and keeps its original position, so for repeated fields the
/// last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortOrder {
    entries: Vec<(String, SortDirection)>,
}

impl SortOrder {
    /// Create an empty order
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Order by a single field
    #[must_use]
    pub fn single(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            entries: vec![(field.into(), direction)],
        }
    }

    /// Set the direction for a field
    pub fn insert(&mut self, field: impl Into<String>, direction: SortDirection) {
        let field = field.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == field) {
            Some((_, slot)) => *slot = direction,
            None => self.entries.push((field, direction)),
        }
    }

    /// Direction for a field, if the field is part of the order
    #[must_use]
    pub fn get(&self, field: &str) -> Option<SortDirection> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == field)
            .map(|(_, direction)| *direction)
    }

    /// Iterate over `(field, direction)` pairs in order of precedence
    pub fn iter(&self) -> impl Iterator<Item = (&str, SortDirection)> {
        self.entries.iter().map(|(field, direction)| (field.as_str(), *direction))
    }

    /// Number of fields in the order
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the order has no fields
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for SortOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, direction) in &self.entries {
            map.serialize_entry(field, direction)?;
        }
        map.end()
    }
}

/// Parser for delimited sort strings
///
/// Carries its own fallback field; nothing about the default is global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortParser {
    default_field: String,
}

impl SortParser {
    /// Create a parser falling back to `default_field` in descending order
    ///
    /// A blank field name is replaced with [`DEFAULT_SORT_FIELD`].
    #[must_use]
    pub fn new(default_field: impl Into<String>) -> Self {
        let default_field: String = default_field.into();
        let default_field = default_field.trim().to_string();
        if default_field.is_empty() {
            tracing::warn!(
                fallback = DEFAULT_SORT_FIELD,
                "Blank default sort field, using fallback"
            );
            return Self {
                default_field: DEFAULT_SORT_FIELD.to_string(),
            };
        }
        Self { default_field }
    }

    /// The fallback sort field
    #[must_use]
    pub fn default_field(&self) -> &str {
        &self.default_field
    }

    /// The order used when nothing usable was supplied
    #[must_use]
    pub fn default_order(&self) -> SortOrder {
        SortOrder::single(self.default_field.clone(), SortDirection::Descending)
    }

    /// Parse a sort string into a [`SortOrder`]
    ///
    /// The result is never empty.
    #[must_use]
    pub fn parse(&self, sort: Option<&str>) -> SortOrder {
        let Some(sort) = sort.filter(|s| !s.trim().is_empty()) else {
            tracing::debug!(field = %self.default_field, "No sort supplied, using default order");
            return self.default_order();
        };

        let mut order = SortOrder::new();
        for token in sort.split(',').map(str::trim) {
            let (field, direction) = match token.split_once(':') {
                Some((field, direction)) => (field.trim(), Some(direction)),
                None => (token, None),
            };

            if field.is_empty() {
                if !token.is_empty() {
                    tracing::debug!(token, "Discarding sort token without a field name");
                }
                continue;
            }

            order.insert(field, SortDirection::from_token(direction));
        }

        if order.is_empty() {
            tracing::debug!(sort, field = %self.default_field, "No usable sort tokens, using default order");
            return self.default_order();
        }

        order
    }
}
