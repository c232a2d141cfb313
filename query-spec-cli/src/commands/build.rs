use anyhow::{Context, Result};
use clap::Args;
use query_spec::{FilterAllowList, QueryRequest, QuerySpecBuilder};
use serde_json::{json, Value};

use super::{load_config, parse_enforced};

#[derive(Args)]
pub struct BuildArgs {
    /// Query string, e.g. "page=2&pageSize=20&sort=name:asc&status=active"
    pub query: String,

    /// Field clients may filter on (repeatable; omit to accept any field)
    #[arg(long = "allow", value_name = "FIELD")]
    pub allow: Vec<String>,

    /// Enforced condition that overrides client filters (repeatable)
    #[arg(long = "enforce", value_name = "KEY=VALUE")]
    pub enforce: Vec<String>,

    /// Default sort field (overrides configuration)
    #[arg(long, value_name = "FIELD")]
    pub default_sort: Option<String>,

    /// Path to a configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,

    /// Treat every field as a filter and print only the conditions
    #[arg(long)]
    pub filters_only: bool,
}

pub fn execute(args: BuildArgs) -> Result<()> {
    let output = render(&args)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn render(args: &BuildArgs) -> Result<Value> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(field) = &args.default_sort {
        config = config.with_default_sort_field(field.clone());
    }

    let mut builder = QuerySpecBuilder::new(&config);
    if !args.allow.is_empty() {
        builder = builder.with_allowed_filters(FilterAllowList::new(&args.allow));
    }

    let request = QueryRequest::from_query_string(&args.query)?;
    let enforced = parse_enforced(&args.enforce)?;

    tracing::debug!(
        fields = request.len(),
        allowed = args.allow.len(),
        enforced = args.enforce.len(),
        filters_only = args.filters_only,
        "Building find options"
    );

    let output = if args.filters_only {
        let spec = builder.build_filters_only(&request)?;
        json!({ "where": spec.conditions(enforced.as_ref()) })
    } else {
        let spec = builder.build(&request)?;
        serde_json::to_value(spec.find_options(enforced.as_ref()))
            .context("Failed to serialize find options")?
    };

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(query: &str) -> BuildArgs {
        BuildArgs {
            query: query.to_string(),
            allow: Vec::new(),
            enforce: Vec::new(),
            default_sort: None,
            config: Some("does-not-exist.toml".to_string()),
            filters_only: false,
        }
    }

    #[test]
    fn test_render_find_options() {
        let mut args = args("page=2&pageSize=5&sort=name:asc&status=active&ownerId=1");
        args.enforce = vec!["ownerId=7".to_string()];

        let output = render(&args).unwrap();
        assert_eq!(
            output,
            json!({
                "skip": 5,
                "take": 5,
                "order": {"name": "ASC"},
                "where": {"status": "active", "ownerId": 7}
            })
        );
    }

    #[test]
    fn test_render_default_sort_override() {
        let mut args = args("");
        args.default_sort = Some("updatedAt".to_string());

        let output = render(&args).unwrap();
        assert_eq!(output["order"], json!({"updatedAt": "DESC"}));
    }

    #[test]
    fn test_render_filters_only() {
        let mut args = args("page=3&status=active");
        args.filters_only = true;

        let output = render(&args).unwrap();
        assert_eq!(output, json!({"where": {"page": 3, "status": "active"}}));
    }

    #[test]
    fn test_render_rejects_unlisted_filter() {
        let mut args = args("secret=1");
        args.allow = vec!["status".to_string()];

        let err = render(&args).unwrap_err();
        assert!(err.to_string().contains("secret"));
    }
}
