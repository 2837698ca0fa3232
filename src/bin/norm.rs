//! norm — Go data-access code from annotated SQL
//!
//! # Usage
//!
//! ```bash
//! # Generate the file named by `-- !file` (db.go by default)
//! norm queries.sql
//!
//! # With debug logging
//! NORM_LOG=debug norm queries.sql
//! ```

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use norm::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "norm")]
#[command(version)]
#[command(about = "Generate typed Go data-access code from annotated SQL", long_about = None)]
#[command(after_help = "EXAMPLES:
    norm queries.sql
    NORM_LOG=debug norm queries.sql")]
struct Cli {
    /// The annotated SQL file to compile
    input: PathBuf,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("NORM_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    match generate(&cli) {
        Ok(generated) => {
            println!(
                "{} Wrote {} command(s) to {}",
                "✓".green().bold(),
                generated.commands,
                generated.path.display().to_string().cyan()
            );
        }
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    }
}

fn generate(cli: &Cli) -> Result<Generated> {
    let config = NormConfig::discover(&cli.input).context("Failed to load configuration")?;
    let engine = Engine::new(config);
    let generated = engine
        .run(&cli.input)
        .with_context(|| format!("Failed to generate code from {}", cli.input.display()))?;
    Ok(generated)
}
