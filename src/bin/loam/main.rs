//! loam CLI tool
//!
//! Command-line interface for building a static note garden with loam-core.
//!
//! ## Commands
//!
//! - `build <path>`: build the site into an output directory
//! - `check <path>`: resolve the corpus and report diagnostics without
//!   writing anything
//!
//! With the `serve` feature, `build --serve` starts a local preview server
//! over the generated output after the build completes.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[cfg(feature = "serve")]
mod dev_server;

use loam_core::{
    compiler::{BuildReport, SiteCompiler},
    graph,
    loader::load_corpus,
};

#[derive(Parser)]
#[command(name = "loam")]
#[command(author, version, about = "A static site generator for interlinked note gardens", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site: HTML pages, graph export, and search index
    Build {
        /// Input directory containing markdown notes
        input: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "_site")]
        output: PathBuf,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,

        /// Base URL for sitemap and canonical URLs (e.g. <https://username.github.io/notes>)
        /// Can also be set via the LOAM_BASE_URL environment variable
        #[arg(long)]
        base_url: Option<String>,

        /// Start a local HTTP server over the output after building
        #[cfg(feature = "serve")]
        #[arg(long)]
        serve: bool,

        /// Port for the preview server (default: 8000)
        #[cfg(feature = "serve")]
        #[arg(long, default_value = "8000")]
        port: u16,
    },

    /// Resolve the corpus and print link diagnostics without writing output
    Check {
        /// Input directory containing markdown notes
        input: PathBuf,
    },
}

fn print_report(report: &BuildReport) {
    println!("\n=== Build Results ===");
    println!("Notes: {}", report.notes);
    println!("Links: {}", report.edges);
    println!("Pages written: {}", report.pages_written);
    println!("Broken links: {}", report.broken_links);
    println!("Ambiguous links: {}", report.ambiguous_links);
    println!("Skipped files: {}", report.skipped_files);

    if !report.diagnostics.is_empty() {
        println!("\n=== Diagnostics ===");
        for diagnostic in &report.diagnostics {
            println!("  {diagnostic}");
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            input,
            output,
            verbose,
            base_url,
            #[cfg(feature = "serve")]
            serve,
            #[cfg(feature = "serve")]
            port,
        } => {
            // Read base_url from environment if not provided via CLI
            let base_url = base_url.or_else(|| std::env::var("LOAM_BASE_URL").ok());

            if verbose {
                println!("Building: {input:?} -> {output:?}");
            }

            let compiler = SiteCompiler::new(&input, &output)?;
            let mut config = compiler.config().clone();
            if base_url.is_some() {
                config.base_url = base_url;
            }
            let compiler = SiteCompiler::with_config(&input, &output, config);
            let report = compiler.build()?;
            print_report(&report);

            #[cfg(feature = "serve")]
            if serve {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()?;
                runtime.block_on(async {
                    let server = dev_server::DevServer::new(output.clone(), port);
                    server
                        .serve(async {
                            let _ = tokio::signal::ctrl_c().await;
                            println!("\nShutting down...");
                        })
                        .await
                })?;
            }

            Ok(())
        }

        Commands::Check { input } => {
            let corpus = load_corpus(&input)?;
            let build = graph::build(&corpus.registry);

            println!("\n=== Check Results ===");
            println!("Notes: {}", corpus.registry.len());
            println!("Links: {}", build.graph.edge_count());

            let mut diagnostics = corpus.diagnostics;
            diagnostics.extend(build.diagnostics);
            if diagnostics.is_empty() {
                println!("No diagnostics. All references resolve.");
            } else {
                println!("\n=== Diagnostics ===");
                for diagnostic in &diagnostics {
                    println!("  {diagnostic}");
                }
            }

            Ok(())
        }
    }
}
