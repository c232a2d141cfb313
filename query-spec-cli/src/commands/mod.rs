pub mod build;
pub mod wrap;

use anyhow::{Context, Result};
use query_spec::{FilterMap, QueryConfig, QueryValue};

/// Load configuration from `path`, or from ./query-spec.toml when absent
pub fn load_config(path: Option<&str>) -> Result<QueryConfig> {
    let config = match path {
        Some(path) => QueryConfig::load_from(path)
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        None => QueryConfig::load().context("Failed to load configuration")?,
    };

    tracing::debug!(
        path = path.unwrap_or(query_spec::config::CONFIG_FILE),
        default_sort_field = %config.default_sort_field,
        default_page_size = config.default_page_size,
        "Configuration loaded"
    );

    Ok(config)
}

/// Parse a `KEY=VALUE` pair
///
/// The value is read as JSON when possible (`7`, `true`, `"x"`), otherwise as
/// a plain string.
pub fn parse_pair(pair: &str) -> Result<(String, QueryValue)> {
    let (key, value) = pair
        .split_once('=')
        .with_context(|| format!("Expected KEY=VALUE, got '{pair}'"))?;

    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("Empty key in '{pair}'");
    }

    let value = serde_json::from_str::<QueryValue>(value)
        .unwrap_or_else(|_| QueryValue::from(value));
    Ok((key.to_string(), value))
}

/// Collect `KEY=VALUE` pairs into enforced conditions
pub fn parse_enforced(pairs: &[String]) -> Result<Option<FilterMap>> {
    if pairs.is_empty() {
        return Ok(None);
    }
    let enforced = pairs
        .iter()
        .map(|pair| parse_pair(pair))
        .collect::<Result<FilterMap>>()?;
    Ok(Some(enforced))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair_json_values() {
        assert_eq!(
            parse_pair("ownerId=7").unwrap(),
            ("ownerId".to_string(), QueryValue::Integer(7))
        );
        assert_eq!(
            parse_pair("active=true").unwrap(),
            ("active".to_string(), QueryValue::Boolean(true))
        );
        assert_eq!(
            parse_pair("name=\"7\"").unwrap(),
            ("name".to_string(), QueryValue::from("7"))
        );
    }

    #[test]
    fn test_parse_pair_plain_string() {
        assert_eq!(
            parse_pair("status=active").unwrap(),
            ("status".to_string(), QueryValue::from("active"))
        );
        assert_eq!(
            parse_pair("note=a=b").unwrap(),
            ("note".to_string(), QueryValue::from("a=b"))
        );
    }

    #[test]
    fn test_parse_pair_invalid() {
        assert!(parse_pair("missing").is_err());
        assert!(parse_pair("=7").is_err());
    }

    #[test]
    fn test_load_config_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query-spec.toml");
        std::fs::write(&path, "default_page_size = 42\n").unwrap();

        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.default_page_size, 42);

        std::fs::write(&path, "default_sort_field = \"\"\n").unwrap();
        let err = load_config(path.to_str()).unwrap_err();
        assert!(err.to_string().contains("Failed to load configuration"));
    }

    #[test]
    fn test_parse_enforced() {
        assert!(parse_enforced(&[]).unwrap().is_none());

        let enforced = parse_enforced(&["ownerId=7".to_string(), "ownerId=8".to_string()])
            .unwrap()
            .unwrap();
        assert_eq!(enforced.len(), 1);
        assert_eq!(enforced.get("ownerId"), Some(&QueryValue::Integer(8)));
    }
}
