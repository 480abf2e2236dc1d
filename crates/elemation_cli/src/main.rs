//! Elemation CLI
//!
//! Replay scroll sessions against a headless page and report when each
//! element is revealed.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use elemation::Host;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod config;
mod simulate;

use config::PageConfig;
use elemation_core::DEFAULT_SELECTORS;

#[derive(Parser)]
#[command(name = "elemation")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Scroll-triggered reveal simulator", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a page fixture's scroll session and report applied classes
    Simulate {
        /// Page fixture (TOML)
        page: PathBuf,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Validate a page fixture without replaying it
    Check {
        /// Page fixture (TOML)
        page: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Simulate { page, format } => cmd_simulate(&page, format),
        Commands::Check { page } => cmd_check(&page),
    }
}

fn cmd_simulate(path: &Path, format: Format) -> Result<()> {
    let page = PageConfig::load(path)?;
    info!(
        "Replaying {} scroll step(s) over {} element(s)",
        page.scroll.len(),
        page.elements.len()
    );

    let report = simulate::run(&page)?;

    match format {
        Format::Text => println!("{}", report),
        Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let page = PageConfig::load(path)?;
    let host = page.build_host();
    let config = &page.elemation;

    match config.trigger_selector() {
        Some(trigger) => {
            let Some(element) = host.query_one(trigger)? else {
                anyhow::bail!("Trigger selector `{}` matches no element", trigger);
            };
            let bounds = host.element_bounds(&element);
            info!(
                "Trigger `{}`: {}..{}",
                trigger,
                bounds.y,
                bounds.bottom()
            );
        }
        None => info!("No trigger selector: the elemation stays dormant"),
    }

    let targets = config.target_selector().unwrap_or(DEFAULT_SELECTORS);
    let matched = host.query_all(targets)?.len();
    if matched == 0 {
        tracing::warn!("Target selector `{}` matches no element", targets);
    }
    info!(
        "Targets `{}`: {} element(s), {}ms apart, class `{}`",
        targets, matched, config.interval_ms, config.append_class
    );

    println!("{} is valid", path.display());
    Ok(())
}
