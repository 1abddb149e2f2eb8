// SPDX-License-Identifier: PMPL-1.0-or-later

//! gentle-panic: localized, friendlier rendering of runtime error reports.
//!
//! Reads a normalized error descriptor (JSON), dispatches it through the
//! built-in handler registry, and prints the localized report.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use gentle_panic::{ErrorDescriptor, Reporter};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gentle-panic")]
#[command(version = "1.0.0")]
#[command(about = "Localized, friendlier rendering of runtime error reports")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a localized report for an error descriptor
    Explain {
        /// Descriptor file (JSON), or '-' for stdin
        #[arg(value_name = "DESCRIPTOR")]
        descriptor: PathBuf,

        /// Translation config files (JSON or YAML), merged in order
        #[arg(short, long)]
        config: Vec<PathBuf>,

        /// Language to render in
        #[arg(short, long)]
        lang: Option<String>,

        /// Emit the report lines as a JSON array
        #[arg(long)]
        json: bool,

        /// Disable colored output
        #[arg(long)]
        plain: bool,
    },

    /// Print the localized interactive prompt pair
    Prompts {
        /// Translation config files (JSON or YAML), merged in order
        #[arg(short, long)]
        config: Vec<PathBuf>,

        /// Language to render in
        #[arg(short, long)]
        lang: Option<String>,
    },
}

fn build_reporter(configs: &[PathBuf], lang: Option<&str>) -> Result<Reporter> {
    let mut reporter = Reporter::new();
    for path in configs {
        reporter.load_config_file(path)?;
    }
    if let Some(lang) = lang {
        reporter.set_language(lang);
    }
    Ok(reporter)
}

fn read_descriptor(path: &PathBuf) -> Result<ErrorDescriptor> {
    let source = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading descriptor from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("reading descriptor {}", path.display()))?
    };
    serde_json::from_str(&source).context("parsing error descriptor")
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Explain {
            descriptor,
            config,
            lang,
            json,
            plain,
        } => {
            let reporter = build_reporter(&config, lang.as_deref())?;
            let err = read_descriptor(&descriptor)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&reporter.format_lines(&err))?);
                return Ok(());
            }

            for line in reporter.context_lines(&err) {
                println!("{line}");
            }
            let diagnosis = reporter.diagnosis_lines(&err);
            for (i, line) in diagnosis.iter().enumerate() {
                if plain {
                    println!("{line}");
                } else if i == 0 {
                    println!("{}", line.red().bold());
                } else {
                    println!("{}", line.yellow());
                }
            }
        }

        Commands::Prompts { config, lang } => {
            let reporter = build_reporter(&config, lang.as_deref())?;
            let (primary, secondary) = reporter.prompts();
            println!("{primary}");
            println!("{secondary}");
        }
    }

    Ok(())
}
