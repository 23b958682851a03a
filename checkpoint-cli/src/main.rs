//! # Checkpoint CLI
//!
//! Command-line interface for building and inspecting checkpoint traces.
//!
//! Usage:
//!   checkpoint render <scenario.json>
//!   checkpoint render <scenario.json> --links
//!   checkpoint render <scenario.json> --json
//!   checkpoint demo
//!
//! Examples:
//!   checkpoint render scenarios/reader.json
//!   RUST_LOG=debug checkpoint render scenarios/reader.json --links
//!   checkpoint -v demo

mod scenario;

use std::path::{Path, PathBuf};

use anyhow::Context;
use checkpoint::{chain, DefinedError, ResultExt, SharedError};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use scenario::{Report, Scenario};

#[derive(Parser)]
#[command(name = "checkpoint")]
#[command(author, version, about = "Checkpoint - annotated error traces")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scenario file and print the resulting trace
    Render {
        /// Path to the scenario JSON file
        #[arg(required = true)]
        file: PathBuf,

        /// List every link of the chain after the trace
        #[arg(short, long)]
        links: bool,

        /// Print a JSON report instead of the plain trace
        #[arg(long, conflicts_with = "links")]
        json: bool,
    },
    /// Build a chain over a real I/O error and print it
    Demo,
}

/// `-v` wins, then `RUST_LOG`, then `info`.
fn log_directives(verbose: bool, rust_log: Option<&str>) -> String {
    if verbose {
        return "debug".to_string();
    }
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => directives.to_string(),
        _ => "info".to_string(),
    }
}

fn setup_tracing(verbose: bool) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = log_directives(verbose, rust_log.as_deref());
    let filter = EnvFilter::try_new(&directives).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    match cli.command {
        Commands::Render { file, links, json } => render(&file, links, json),
        Commands::Demo => {
            demo();
            Ok(())
        }
    }
}

fn render(file: &Path, links: bool, json: bool) -> anyhow::Result<()> {
    let scenario = Scenario::load(file)
        .with_context(|| format!("cannot use scenario {}", file.display()))?;
    info!(steps = scenario.steps.len(), "scenario loaded");

    let err = scenario.run();
    let report = Report::new(err.as_ref());
    info!(depth = report.depth, "scenario finished");

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to serialize report")?
        );
        return Ok(());
    }

    match &report.trace {
        Some(trace) => print!("{}", trace),
        None => println!("<no error>"),
    }

    if links && !report.links.is_empty() {
        // A foreign root leaves the trace without a final newline.
        if report.trace.as_deref().is_some_and(|t| !t.ends_with('\n')) {
            println!();
        }
        println!("\n--- Links ({}) ---", report.depth);
        for (i, link) in report.links.iter().enumerate() {
            let site = match (&link.file, link.line) {
                (Some(file), Some(line)) => format!("{}:{}", file, line),
                _ => "unknown".to_string(),
            };
            println!("  {:3}. {:<10} {:<20} {}", i, link.kind, site, link.message);
        }
    }

    Ok(())
}

fn read_settings(path: &Path) -> Result<String, SharedError> {
    std::fs::read_to_string(path)
        .map_err(checkpoint::shared)
        .checkpoint()
}

fn demo() {
    let settings_unavailable = DefinedError::shared("settings unavailable");
    let path = Path::new("/nonexistent/checkpoint/settings.toml");

    let err = match read_settings(path).wrap_err(settings_unavailable.clone()) {
        Ok(_) => {
            println!("{} exists, nothing to show", path.display());
            return;
        }
        Err(err) => err,
    };

    println!("{}", err);
    println!("--- Checks ---");
    println!(
        "  is(settings unavailable): {}",
        chain::is(&*err, &*settings_unavailable)
    );
    println!(
        "  find::<io::Error>:        {:?}",
        chain::find::<std::io::Error>(&*err).map(|e| e.kind())
    );
    println!("  depth:                    {}", chain::depth(&*err));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_is_respected() {
        assert_eq!(log_directives(false, Some("debug")), "debug");
        assert_eq!(
            log_directives(false, Some("checkpoint_cli=trace")),
            "checkpoint_cli=trace"
        );
    }

    #[test]
    fn test_default_level() {
        assert_eq!(log_directives(false, None), "info");
        assert_eq!(log_directives(false, Some("  ")), "info");
    }

    #[test]
    fn test_verbose_flag_wins() {
        assert_eq!(log_directives(true, None), "debug");
        assert_eq!(log_directives(true, Some("warn")), "debug");
    }

    #[test]
    fn test_cli_parses_global_verbose() {
        let cli = Cli::try_parse_from(["checkpoint", "render", "a.json", "-v", "--links"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Render { links: true, json: false, .. }));

        assert!(Cli::try_parse_from(["checkpoint", "render", "a.json", "--links", "--json"]).is_err());
    }
}
