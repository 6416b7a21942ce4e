//! bpdump CLI - deterministic blueprint graph dumps
//!
//! Reads blueprint snapshots from a content store and writes stable JSON
//! documents of their graphs, suitable for diffing and review.

use bpdump_graph::{LinkKind, LinksMeta};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "bpdump")]
#[command(author = "bpdump Contributors")]
#[command(version)]
#[command(about = "Deterministic JSON dumps of blueprint graphs", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where snapshots and settings come from.
#[derive(Args)]
struct SourceArgs {
    /// Snapshot store directory (overrides `store_root` from the config)
    #[arg(long)]
    store: Option<PathBuf>,

    /// Config file (defaults to .bpdump/config.json when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the document to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize bpdump in a directory
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Dump the graphs of a blueprint
    Graph {
        /// Object or package path, e.g. /Game/Doors/BP_Door.BP_Door
        asset: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Only dump graphs with this name (case-insensitive)
        #[arg(long)]
        graph_name: Option<String>,

        /// Omit nodes and pins, keep links
        #[arg(long)]
        links_only: bool,

        /// Which links to emit: all, exec or data
        #[arg(long)]
        link_kind: Option<LinkKind>,

        /// Link metadata: none or min
        #[arg(long)]
        links_meta: Option<LinksMeta>,

        /// Attach counters of skipped adjacency to every graph
        #[arg(long)]
        diagnostics: bool,

        /// Add a generated_at timestamp (output is no longer reproducible)
        #[arg(long)]
        stamp_time: bool,

        /// Compact JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// List the assets of a content folder
    List {
        #[command(flatten)]
        source: SourceArgs,

        /// Content folder to list
        #[arg(long, default_value = "/Game")]
        filter: String,
    },

    /// Show basic information about an asset
    Asset {
        /// Object or package path
        asset: String,

        #[command(flatten)]
        source: SourceArgs,
    },
}

fn main() {
    // Usage errors exit with 1; 2 is reserved for extraction failures.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            std::process::exit(if e.use_stderr() { 1 } else { 0 });
        }
    };

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Init { path } => commands::init(&path),
        Commands::Graph {
            asset,
            source,
            graph_name,
            links_only,
            link_kind,
            links_meta,
            diagnostics,
            stamp_time,
            compact,
        } => {
            let overrides = config::Overrides {
                link_kind,
                links_meta,
                links_only,
                diagnostics,
                stamp_time,
                compact,
            };
            commands::Context::load(source.store.as_deref(), source.config.as_deref()).and_then(
                |ctx| {
                    commands::graph(
                        &ctx,
                        &asset,
                        graph_name.as_deref(),
                        &overrides,
                        source.output.as_deref(),
                    )
                },
            )
        }
        Commands::List { source, filter } => {
            commands::Context::load(source.store.as_deref(), source.config.as_deref())
                .and_then(|ctx| commands::list(&ctx, &filter, source.output.as_deref()))
        }
        Commands::Asset { asset, source } => {
            commands::Context::load(source.store.as_deref(), source.config.as_deref())
                .and_then(|ctx| commands::asset(&ctx, &asset, source.output.as_deref()))
        }
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        if let Some(command) = commands::hint(e.as_ref()) {
            eprintln!("  Run {} to see the available assets", command.cyan());
        }
        std::process::exit(commands::exit_code(e.as_ref()));
    }
}
