use anyhow::{Context, Result};
use clap::Args;
use query_spec::{wrap, QueryRequest, QuerySpecBuilder};
use serde_json::Value;

use super::load_config;

#[derive(Args)]
pub struct WrapArgs {
    /// Query string the page was fetched with
    pub query: String,

    /// Total number of matching items across all pages
    #[arg(long)]
    pub total: u64,

    /// Key to place the rows under instead of "data"
    #[arg(long, value_name = "KEY")]
    pub key: Option<String>,

    /// Rows of the current page as a JSON array
    #[arg(long, value_name = "JSON", default_value = "[]")]
    pub data: String,

    /// Path to a configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<String>,
}

pub fn execute(args: WrapArgs) -> Result<()> {
    let output = render(&args)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn render(args: &WrapArgs) -> Result<Value> {
    let config = load_config(args.config.as_deref())?;
    let builder = QuerySpecBuilder::new(&config);

    let request = QueryRequest::from_query_string(&args.query)?;
    let spec = builder.build(&request)?;

    let rows: Vec<Value> =
        serde_json::from_str(&args.data).context("--data must be a JSON array")?;

    tracing::debug!(
        rows = rows.len(),
        total = args.total,
        page = spec.pagination().page(),
        "Wrapping rows"
    );

    let result = wrap(rows, args.total, &spec, args.key.as_deref())?;
    serde_json::to_value(&result).context("Failed to serialize response")
}
