//! rubbish - toss files into a journaled bin, restore or wipe them later.

#![deny(unsafe_code)]

mod commands;
mod ui;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use rubbish::config::Settings;
use rubbish::journal::Journal;
use rubbish::paths;
use std::path::PathBuf;
use std::process::ExitCode;

use commands::Session;

#[derive(Parser)]
#[command(name = "rubbish", version, about = "Deferred deletion for the command line")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use this bin directory instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    container: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Move files or directories into the bin
    Toss {
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Days to keep the items before they become wipeable
        #[arg(short, long, value_name = "DAYS")]
        retention: Option<u32>,

        /// Print nothing on success
        #[arg(short, long)]
        silent: bool,
    },

    /// Restore items into the current directory
    Restore {
        #[arg(required = true)]
        items: Vec<String>,

        /// Replace existing files with the restored items
        #[arg(long = "override")]
        override_existing: bool,

        /// Print nothing on success
        #[arg(short, long)]
        silent: bool,
    },

    /// Permanently delete items whose retention has elapsed
    Wipe {
        /// Only wipe these items
        items: Vec<String>,

        /// Ignore retention
        #[arg(short, long)]
        force: bool,

        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Consider items tossed from anywhere, not just this directory
        #[arg(short, long)]
        global: bool,
    },

    /// List items in the bin
    Status {
        /// List items tossed from anywhere, not just this directory
        #[arg(short, long)]
        global: bool,

        /// Only print the bin size
        #[arg(short, long)]
        size: bool,

        /// Only list wipeable items
        #[arg(short, long)]
        wipeable: bool,
    },

    /// Show details of one item
    Info {
        /// Item name as shown by `status`
        #[arg(required_unless_present = "position")]
        item: Option<String>,

        /// 1-based position in the bin; negative counts from the end
        #[arg(
            short,
            long,
            conflicts_with = "item",
            allow_negative_numbers = true,
            value_name = "N"
        )]
        position: Option<i64>,
    },

    /// Compare the journal with the bin contents
    Check {
        /// Drop records whose item is missing from the bin
        #[arg(long)]
        fix: bool,
    },

    /// Print a shell completion script
    Completions { shell: Shell },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Logs go to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    if let Commands::Completions { shell } = cli.command {
        commands::completions::execute(shell, &mut Cli::command());
        return Ok(ExitCode::SUCCESS);
    }

    let settings = Settings::load()?;
    let validation = settings.validate()?;
    for warning in &validation.warnings {
        tracing::warn!("{warning}");
    }

    let container = match cli.container {
        Some(path) => paths::absolute(&path)
            .with_context(|| format!("Invalid bin directory: {}", path.display()))?,
        None => settings.container_dir()?,
    };
    std::fs::create_dir_all(&container)
        .with_context(|| format!("Failed to create bin directory: {}", container.display()))?;

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;

    let mut journal = Journal::open(paths::get_journal_dir(&container))
        .with_context(|| format!("Failed to open journal in {}", container.display()))?;

    let session = Session {
        settings,
        container,
        working_dir,
        journal: &journal,
    };
    let result = dispatch(cli.command, &session);

    // Close on every path, errors included
    if let Err(e) = journal.close() {
        tracing::warn!(error = %e, "Failed to close journal");
    }

    result
}

fn dispatch(command: Commands, session: &Session) -> Result<ExitCode> {
    match command {
        Commands::Toss {
            paths,
            retention,
            silent,
        } => commands::toss::execute(session, &paths, retention, silent),
        Commands::Restore {
            items,
            override_existing,
            silent,
        } => commands::restore::execute(session, &items, override_existing, silent),
        Commands::Wipe {
            items,
            force,
            yes,
            global,
        } => commands::wipe::execute(session, items, force, yes, global),
        Commands::Status {
            global,
            size,
            wipeable,
        } => commands::status::execute(session, global, size, wipeable),
        Commands::Info { item, position } => {
            commands::info::execute(session, item.as_deref(), position)
        },
        Commands::Check { fix } => commands::check::execute(session, fix),
        Commands::Completions { .. } => Ok(ExitCode::SUCCESS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_info_accepts_negative_position() {
        let cli = Cli::try_parse_from(["rubbish", "info", "-p", "-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Info {
                item: None,
                position: Some(-1)
            }
        ));
    }

    #[test]
    fn test_info_requires_item_or_position() {
        assert!(Cli::try_parse_from(["rubbish", "info"]).is_err());
    }

    #[test]
    fn test_wipe_flags() {
        let cli = Cli::try_parse_from(["rubbish", "wipe", "-fyg", "a_X", "b_Y"]).unwrap();
        match cli.command {
            Commands::Wipe {
                items,
                force,
                yes,
                global,
            } => {
                assert_eq!(items, vec!["a_X", "b_Y"]);
                assert!(force && yes && global);
            },
            _ => panic!("expected wipe"),
        }
    }
}
