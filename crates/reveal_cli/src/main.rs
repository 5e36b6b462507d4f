//! Reveal CLI
//!
//! Load a page description, scroll through it and report what got revealed.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reveal_controller::RevealConfig;
use reveal_site::{Page, PageDescription, PageOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod simulate;

use simulate::SimulationOptions;

#[derive(Parser)]
#[command(name = "reveal")]
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
    /// Scroll through a page and print its final state as JSON
    Run {
        /// Page description (JSON)
        page: PathBuf,

        /// Reveal configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Pixels scrolled per step
        #[arg(long, default_value = "200")]
        scroll_step: f32,

        /// Frame length in milliseconds
        #[arg(long, default_value = "16")]
        frame_ms: u32,

        /// Stay at the bottom instead of scrolling back up
        #[arg(long)]
        no_return: bool,

        /// Run without an animation engine; transitions snap to their end
        #[arg(long)]
        no_animation: bool,

        /// Run without a visibility watcher; everything reveals at load
        #[arg(long)]
        no_watch: bool,

        /// Print only the reveal events, not the full snapshot
        #[arg(long)]
        reveals_only: bool,
    },

    /// Validate a page description and configuration
    Check {
        /// Page description (JSON)
        page: PathBuf,

        /// Reveal configuration (TOML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the default configuration as TOML
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            page,
            config,
            scroll_step,
            frame_ms,
            no_return,
            no_animation,
            no_watch,
            reveals_only,
        } => {
            let options = PageOptions {
                animation: !no_animation,
                watch: !no_watch,
            };
            let simulation = SimulationOptions {
                scroll_step,
                frame_ms,
                return_to_top: !no_return,
                ..SimulationOptions::default()
            };
            cmd_run(&page, config.as_deref(), options, simulation, reveals_only)
        }

        Commands::Check { page, config } => cmd_check(&page, config.as_deref()),

        Commands::Config => cmd_config(),
    }
}

fn load_config(path: Option<&Path>) -> Result<RevealConfig> {
    match path {
        Some(path) => RevealConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(RevealConfig::default()),
    }
}

fn load_page(path: &Path) -> Result<PageDescription> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    PageDescription::from_json(&source).with_context(|| format!("Invalid page {}", path.display()))
}

fn cmd_run(
    page_path: &Path,
    config_path: Option<&Path>,
    options: PageOptions,
    simulation: SimulationOptions,
    reveals_only: bool,
) -> Result<()> {
    let config = load_config(config_path)?;
    let description = load_page(page_path)?;
    let mut page = Page::from_description(&description, config, options)
        .with_context(|| format!("Failed to build page {}", page_path.display()))?;

    info!("Running {}", page_path.display());
    let report = simulate::run(&mut page, simulation);
    info!(
        "{} element(s) revealed, {} never reached, {}ms simulated",
        report.reveals.len(),
        report.pending,
        report.snapshot.time_ms
    );

    let output = if reveals_only {
        serde_json::to_string_pretty(&report.reveals)?
    } else {
        serde_json::to_string_pretty(&report)?
    };
    println!("{output}");
    Ok(())
}

fn cmd_check(page_path: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let description = load_page(page_path)?;
    let doc = description
        .build()
        .with_context(|| format!("Failed to build page {}", page_path.display()))?;

    let markers = config.classes.all();
    let targets = doc.query_class_any(doc.body(), &markers);
    let counters = doc.query_class(doc.body(), &config.classes.counter);
    let unusable = counters
        .iter()
        .filter(|&&node| {
            reveal_controller::CounterSpec::read(&doc, node, config.counter_duration_ms).is_err()
        })
        .count();

    info!(
        "{}: {} element(s), {} reveal target(s), {} counter(s)",
        page_path.display(),
        doc.len(),
        targets.len(),
        counters.len()
    );
    if unusable > 0 {
        anyhow::bail!("{} counter(s) have a missing or invalid data-target", unusable);
    }
    info!("OK");
    Ok(())
}

fn cmd_config() -> Result<()> {
    let config = toml::to_string_pretty(&RevealConfig::default())
        .context("Failed to serialize default config")?;
    print!("{config}");
    Ok(())
}
