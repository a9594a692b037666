//! propdoc command-line interface
//!
//! ```text
//! propdoc [--root <DIR>] [--include-private] [--no-color] [COMMAND]
//! ```
//!
//! Commands:
//! - `all` (default) - proxies, `.gitignore`, key modules and prop tables
//! - `props` - inject prop tables into READMEs
//! - `keys [--check]` - write `__keys.ts` modules, or only report stale ones
//! - `proxies` - write entry-point proxy folders
//! - `gitignore` - write the package `.gitignore`
//! - `clean` - remove proxy folders and build output directories
//!
//! # Environment Variables
//!
//! - `PROPDOC_LOG` - Log level (default: "info")
//! - `PROPDOC_ROOT` - Package root (default: current directory)

mod cleanup;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cleanup::Cleanup;
use propdoc::{DiagnosticsCollector, PackageBuilder, ReportPrinter, Task};
use std::io::{IsTerminal, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Prop tables, key modules and entry-point proxies for component packages
#[derive(Parser, Debug)]
#[command(name = "propdoc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Package root holding package.json
    #[arg(short, long, global = true, env = "PROPDOC_ROOT", default_value = ".")]
    root: PathBuf,

    /// Document props tagged @private
    #[arg(long, global = true)]
    include_private: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Run proxies, gitignore, keys and props
    All,
    /// Inject prop tables into READMEs
    Props,
    /// Write key modules
    Keys {
        /// Report missing or outdated key modules without writing
        #[arg(long)]
        check: bool,
    },
    /// Write entry-point proxy folders
    Proxies,
    /// Write the package .gitignore
    Gitignore,
    /// Remove proxy folders and build output directories
    Clean,
}

impl Command {
    fn tasks(self) -> &'static [Task] {
        match self {
            Command::All => &Task::ALL,
            Command::Props => &[Task::Props],
            Command::Keys { .. } => &[Task::Keys],
            Command::Proxies => &[Task::Proxies],
            Command::Gitignore => &[Task::Gitignore],
            Command::Clean => &[Task::Clean],
        }
    }
}

fn main() -> Result<ExitCode> {
    // Use PROPDOC_LOG env var for log level configuration, default to "info"
    let filter = EnvFilter::try_from_env("PROPDOC_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::All);

    let mut cleanup = Cleanup::new();
    let started = Instant::now();
    cleanup.register("elapsed", move || {
        debug!(elapsed_ms = started.elapsed().as_millis() as u64, "finished");
    });
    cleanup.register("flush stdout", || {
        let _ = std::io::stdout().flush();
    });

    let builder = PackageBuilder::from_root(&cli.root)
        .with_context(|| format!("Failed to load settings of {}", cli.root.display()))?
        .include_private(cli.include_private);
    let use_color = !cli.no_color && std::io::stdout().is_terminal();

    let code = match command {
        Command::Keys { check: true } => check_keys(&builder)?,
        _ => run_tasks(&builder, command.tasks(), use_color)?,
    };

    cleanup.run();
    Ok(code)
}

fn run_tasks(builder: &PackageBuilder, tasks: &[Task], use_color: bool) -> Result<ExitCode> {
    info!(root = %builder.root.display(), ?tasks, "building package");
    let output = builder
        .build(tasks)
        .with_context(|| format!("Failed to build {}", builder.root.display()))?;

    debug!(files = output.all_files().count(), "build finished");
    ReportPrinter::new(&output, &builder.root, use_color).print_to_stdout();

    if output.diagnostics.has_errors() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn check_keys(builder: &PackageBuilder) -> Result<ExitCode> {
    let mut diagnostics = DiagnosticsCollector::new();
    let stale = builder
        .check_keys(&mut diagnostics)
        .with_context(|| format!("Failed to check keys of {}", builder.root.display()))?;

    for diagnostic in diagnostics.diagnostics() {
        eprintln!("{}", diagnostic.format());
    }
    for path in &stale {
        let path = path.strip_prefix(&builder.root).unwrap_or(path);
        println!("Outdated: {}", path.display());
    }

    if !stale.is_empty() || diagnostics.has_errors() {
        warn!(stale = stale.len(), "key modules are out of date");
        return Ok(ExitCode::FAILURE);
    }
    info!("key modules are up to date");
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_keys_check() {
        let cli = Cli::try_parse_from(["propdoc", "--root", "packages/reakit", "keys", "--check"])
            .unwrap();
        assert_eq!(cli.root, PathBuf::from("packages/reakit"));
        assert!(matches!(cli.command, Some(Command::Keys { check: true })));
    }

    #[test]
    fn test_default_command_runs_everything() {
        let cli = Cli::try_parse_from(["propdoc", "--include-private"]).unwrap();
        assert!(cli.include_private);
        assert!(cli.command.is_none());
        assert_eq!(Command::All.tasks(), &Task::ALL);
    }

    #[test]
    fn test_command_tasks() {
        assert_eq!(Command::Props.tasks(), &[Task::Props]);
        assert_eq!(Command::Keys { check: false }.tasks(), &[Task::Keys]);
        assert_eq!(Command::Clean.tasks(), &[Task::Clean]);
    }
}
