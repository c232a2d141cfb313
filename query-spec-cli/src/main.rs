use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;

use commands::build::BuildArgs;
use commands::wrap::WrapArgs;

/// qspec - Inspect list query specifications from the command line
#[derive(Parser)]
#[command(name = "qspec")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "QUERY_SPEC_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build find options from a query string
    Build(BuildArgs),
    /// Wrap rows into a paginated response envelope
    Wrap(WrapArgs),
}

fn main() {
    let cli = Cli::parse();

    if let Some(level) = &cli.log_level {
        let config = query_spec::QueryConfig {
            log_level: level.clone(),
            ..Default::default()
        };
        query_spec::observability::init_tracing(&config);
    }

    let result = match cli.command {
        Commands::Build(args) => commands::build::execute(args),
        Commands::Wrap(args) => commands::wrap::execute(args),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);

            if let Some(source) = e.source() {
                eprintln!("\n{} {}", "Caused by:".yellow(), source);
            }

            std::process::exit(1);
        }
    }
}
