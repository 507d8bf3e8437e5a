//! Company Atlas CLI: scriptable counts and exports.
//!
//! Commands:
//! - `counts`: coarse counts, or fine counts under one coarse cluster
//! - `export`: write the rows matching a coarse/fine pair as CSV
//! - `sample`: generate a seeded sample dataset
//! - `config`: print the effective configuration as TOML

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use atlas_core::data::load_from_path;
use atlas_core::view::NO_FINE_CLUSTERS;
use atlas_core::{
    coarse_counts, display_label, filter_rows, fine_counts, sample, to_csv_bytes, write_export,
    AtlasConfig, CategoryCount, Dataset,
};

#[derive(Parser)]
#[command(
    name = "atlas",
    version,
    about = "Company Atlas CLI: explore clustered company datasets"
)]
struct Cli {
    /// Config file (defaults to ./atlas.toml, then the platform config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print per-category counts, most frequent first.
    Counts {
        /// CSV with coarse_label and fine_label columns.
        file: PathBuf,

        /// Show fine counts under this coarse cluster (raw label).
        #[arg(long)]
        coarse: Option<String>,

        /// Emit JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Export the rows matching a coarse/fine pair as CSV.
    Export {
        /// CSV with coarse_label and fine_label columns.
        file: PathBuf,

        /// Coarse cluster (raw label).
        #[arg(long)]
        coarse: String,

        /// Fine cluster (raw label).
        #[arg(long)]
        fine: String,

        /// Output directory. Defaults to `[export] dir` from the config.
        #[arg(long)]
        out_dir: Option<PathBuf>,

        /// Write CSV to stdout instead of a file.
        #[arg(long, default_value_t = false, conflicts_with = "out_dir")]
        stdout: bool,
    },
    /// Generate a seeded sample dataset.
    Sample {
        /// Number of rows.
        #[arg(long, default_value_t = 200)]
        rows: usize,

        /// RNG seed; the same seed yields the same file.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Output file. Defaults to stdout.
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print the effective configuration as TOML.
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AtlasConfig::discover(cli.config.as_deref()).context("failed to load config")?;
    init_logging(&config.logging.level);

    match cli.command {
        Commands::Counts { file, coarse, json } => run_counts(&file, coarse.as_deref(), json),
        Commands::Export {
            file,
            coarse,
            fine,
            out_dir,
            stdout,
        } => {
            let out_dir = out_dir.unwrap_or_else(|| config.export.dir.clone());
            run_export(&file, &coarse, &fine, &out_dir, stdout)
        }
        Commands::Sample { rows, seed, out } => run_sample(rows, seed, out.as_deref()),
        Commands::Config => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}

/// Log to stderr so stdout stays clean for CSV and JSON output.
fn init_logging(level: &str) {
    let default = format!("atlas={level},atlas_core={level}");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

fn load(file: &Path) -> Result<Dataset> {
    let dataset =
        load_from_path(file).with_context(|| format!("failed to load {}", file.display()))?;
    tracing::debug!(path = %file.display(), rows = dataset.len(), "dataset loaded");
    Ok(dataset)
}

fn run_counts(file: &Path, coarse: Option<&str>, json: bool) -> Result<()> {
    let dataset = load(file)?;
    let counts = match coarse {
        Some(c) => fine_counts(&dataset, c),
        None => coarse_counts(&dataset),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&counts)?);
        return Ok(());
    }

    match coarse {
        Some(c) => {
            let total: usize = counts.iter().map(|c| c.count).sum();
            println!("Rows in '{}': {total}", display_label(c));
            if counts.is_empty() {
                eprintln!("{NO_FINE_CLUSTERS}");
            }
        }
        None => println!("Total rows: {}", dataset.len()),
    }
    print!("{}", format_counts(&counts));
    Ok(())
}

fn run_export(file: &Path, coarse: &str, fine: &str, out_dir: &Path, stdout: bool) -> Result<()> {
    let dataset = load(file)?;

    if stdout {
        let matching = filter_rows(&dataset, coarse, fine);
        let bytes = to_csv_bytes(&matching)?;
        std::io::stdout()
            .lock()
            .write_all(&bytes)
            .context("failed to write CSV to stdout")?;
        eprintln!("Matching rows: {}", matching.len());
        return Ok(());
    }

    let path = write_export(out_dir, &dataset, coarse, fine)?;
    tracing::info!(path = %path.display(), coarse, fine, "export written");
    println!("Exported to: {}", path.display());
    Ok(())
}

fn run_sample(rows: usize, seed: u64, out: Option<&Path>) -> Result<()> {
    let dataset = sample::generate(rows, seed);
    tracing::debug!(rows, seed, "sample generated");
    let bytes = to_csv_bytes(&dataset)?;
    match out {
        Some(path) => {
            std::fs::write(path, &bytes)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Wrote {rows} rows to {}", path.display());
        }
        None => std::io::stdout()
            .lock()
            .write_all(&bytes)
            .context("failed to write CSV to stdout")?,
    }
    Ok(())
}

/// Two-column table of display labels and counts.
fn format_counts(counts: &[CategoryCount]) -> String {
    let width = counts
        .iter()
        .map(|c| display_label(&c.category).chars().count())
        .max()
        .unwrap_or(0);
    counts
        .iter()
        .map(|c| {
            format!(
                "  {:<width$}  {:>6}\n",
                display_label(&c.category),
                c.count
            )
        })
        .collect()
}
