mod commands;
mod config;

use std::future::Future;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use geofacet_engine::BreakMethod;
use tracing_subscriber::EnvFilter;

use commands::{
    breaks::cmd_breaks, catalog::cmd_catalog, catalog::cmd_options, datasets::cmd_datasets,
    layer::cmd_layer, search::cmd_search, validate::cmd_validate,
};

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Faceted data catalog and thematic map classification.
#[derive(Parser)]
#[command(
    name = "geofacet",
    version,
    about = "Faceted data catalog and thematic map classification"
)]
struct Cli {
    /// Config file (default: ./geofacet.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data root directory, overriding the config
    #[arg(long, global = true)]
    data_root: Option<String>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog entries matching the selected facets, one page at a time
    Catalog {
        /// Facet selection as FACET=VALUE; repeatable
        #[arg(long = "select", value_name = "FACET=VALUE", value_parser = parse_selection)]
        selections: Vec<(String, String)>,
        /// Page to show (clamped to the available pages)
        #[arg(long, default_value_t = 1)]
        page: usize,
    },

    /// Show each facet's options after cascading the selections
    Options {
        /// Facet selection as FACET=VALUE; repeatable
        #[arg(long = "select", value_name = "FACET=VALUE", value_parser = parse_selection)]
        selections: Vec<(String, String)>,
    },

    /// Compute class breakpoints for a numeric attribute of a GeoJSON file
    Breaks {
        /// Path to the GeoJSON FeatureCollection
        file: PathBuf,
        /// Numeric feature property to classify
        #[arg(long)]
        attribute: String,
        /// Number of classes (default from config)
        #[arg(long)]
        classes: Option<usize>,
        /// Breakpoint method (quantile or natural)
        #[arg(long, default_value = "quantile")]
        method: BreakMethod,
    },

    /// List the map's data types and datasets
    Datasets {
        /// Only this data type
        #[arg(long = "type")]
        data_type: Option<String>,
    },

    /// Resolve, load and style one map dataset
    Layer {
        /// Data type (POI, AOI, OD流, 微博签到, 移动轨迹, ...)
        #[arg(long = "type")]
        data_type: String,
        /// Dataset title
        #[arg(long)]
        title: String,
    },

    /// Highlight features whose name contains a keyword
    Search {
        /// Path to the GeoJSON FeatureCollection
        file: PathBuf,
        /// Case-insensitive keyword
        keyword: String,
    },

    /// Validate a catalog source against the catalog JSON Schema
    Validate {
        /// Path to the catalog JSON file
        file: PathBuf,
    },
}

/// Parse `FACET=VALUE`. An empty value selects "all".
fn parse_selection(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((facet, value)) if !facet.trim().is_empty() => {
            Ok((facet.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected FACET=VALUE, got '{}'", s)),
    }
}

fn init_logging(quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else {
        EnvFilter::try_from_env("GEOFACET_LOG").unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    let config = match config::load_config(cli.config.as_deref(), cli.data_root.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            report_error(&e, cli.output, cli.quiet);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Catalog { selections, page } => {
            cmd_catalog(&config, &selections, page, cli.output, cli.quiet);
        }
        Commands::Options { selections } => {
            cmd_options(&config, &selections, cli.output, cli.quiet);
        }
        Commands::Breaks {
            file,
            attribute,
            classes,
            method,
        } => {
            let classes = classes.unwrap_or(config.classes.count);
            cmd_breaks(&file, &attribute, classes, method, cli.output, cli.quiet);
        }
        Commands::Datasets { data_type } => {
            cmd_datasets(&config, data_type.as_deref(), cli.output, cli.quiet);
        }
        Commands::Layer { data_type, title } => {
            cmd_layer(&config, &data_type, &title, cli.output, cli.quiet);
        }
        Commands::Search { file, keyword } => {
            cmd_search(&file, &keyword, cli.output, cli.quiet);
        }
        Commands::Validate { file } => {
            cmd_validate(&file, cli.output, cli.quiet);
        }
    }
}

/// Run `future` to completion on a fresh runtime, exiting on failure to
/// start one.
pub(crate) fn block_on<F: Future>(future: F, output: OutputFormat, quiet: bool) -> F::Output {
    match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(future),
        Err(e) => {
            report_error(
                &format!("failed to create tokio runtime: {}", e),
                output,
                quiet,
            );
            process::exit(1);
        }
    }
}

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json(value: &serde_json::Value) {
    let pretty = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!("serialization error: {}", e));
    println!("{}", pretty);
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
