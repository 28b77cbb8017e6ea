//! Command-line interface module for file-router.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Loading configuration and opening the activity log
//! - Running the organizer with a progress spinner
//! - The setup wizard and the interactive launcher

use clap::{Parser, Subcommand};
use dialoguer::{Select, console::Term};
use std::path::{Path, PathBuf};

use crate::activity_log::ActivityLog;
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::engine::{CancelFlag, OrganizeError, Organizer, RunStats};
use crate::output::OutputFormatter;
use crate::wizard::{self, WizardError};

/// Sort files into category folders by extension.
#[derive(Debug, Parser)]
#[command(name = "file-router", version, about)]
pub struct Cli {
    /// Configuration file (JSON, or TOML when it ends in .toml).
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Only show what would happen; overrides the configured setting.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Write the activity log here instead of the configured location.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Do not echo log lines or the summary to the console.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Represents a CLI command to execute.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Organize the source directory (the default).
    Run,
    /// Create a configuration file.
    Init {
        /// Where to write the configuration.
        #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
        output: PathBuf,
        /// Write the default configuration without prompting.
        #[arg(long)]
        defaults: bool,
        /// Source directory for --defaults.
        #[arg(long, default_value = ".")]
        source: PathBuf,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Choose between a normal run and a dry run from a menu.
    Launch,
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Organize(#[from] OrganizeError),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Options for a single organizing run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Force a dry run regardless of the configured setting.
    pub force_dry_run: bool,
    /// Overrides `settings.log_file`.
    pub log_file: Option<PathBuf>,
    /// Suppress console output; the log file is still written.
    pub quiet: bool,
    /// Checked before each file; setting it stops the run cleanly.
    pub cancel: CancelFlag,
}

impl From<&Cli> for RunOptions {
    fn from(cli: &Cli) -> Self {
        Self {
            force_dry_run: cli.dry_run,
            log_file: cli.log_file.clone(),
            quiet: cli.quiet,
            cancel: CancelFlag::new(),
        }
    }
}

/// Runs the CLI application for parsed arguments.
///
/// This is the main entry point for CLI operations.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use file_router::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["file-router", "--config", "config.json", "--dry-run"]);
/// if let Err(e) = run_cli(&cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        None | Some(Command::Run) => {
            let options = RunOptions::from(cli);
            install_interrupt_handler(&options.cancel);
            organize_from_config(&cli.config, &options)?;
        }
        Some(Command::Init {
            output,
            defaults,
            source,
            force,
        }) => {
            if *defaults {
                wizard::write_default_config(output, source.clone(), *force)?;
                OutputFormatter::success(&format!(
                    "Default configuration written to {}",
                    output.display()
                ));
            } else {
                wizard::run_wizard(output, *force)?;
            }
        }
        Some(Command::Launch) => launch(cli)?,
    }
    Ok(())
}

/// Loads configuration from `config_path` and organizes its source directory.
///
/// This function:
/// 1. Loads and validates the configuration
/// 2. Applies the forced dry-run flag
/// 3. Opens the activity log
/// 4. Routes every file, ticking a spinner on the console
/// 5. Prints the summary
///
/// # Errors
///
/// Returns an `OrganizeError` for fatal problems: bad configuration, missing
/// source directory, or an activity log that cannot be opened. Per-file
/// failures only show up in the returned statistics.
pub fn organize_from_config(
    config_path: &Path,
    options: &RunOptions,
) -> Result<RunStats, OrganizeError> {
    let mut config = Config::load(config_path)?;
    if options.force_dry_run {
        config.settings.dry_run = true;
    }

    let log_path = options
        .log_file
        .clone()
        .unwrap_or_else(|| config.settings.log_file.clone());
    let log = ActivityLog::open(&log_path, config.settings.log_level.filter())
        .map_err(|e| OrganizeError::LogOpen {
            path: log_path.clone(),
            source: e,
        })?
        .with_console(!options.quiet);

    let stats = if options.quiet {
        Organizer::new(config, log)?
            .with_cancel_flag(options.cancel.clone())
            .organize()?
    } else {
        let spinner = OutputFormatter::create_spinner();
        let mut organizer = Organizer::new(config, log.with_progress(spinner.clone()))?
            .with_cancel_flag(options.cancel.clone());
        let result = organizer.organize_with(|report| {
            spinner.inc(1);
            if let Some(name) = report.path.file_name() {
                spinner.set_message(name.to_string_lossy().into_owned());
            }
        });
        spinner.finish_and_clear();
        result?
    };

    if !options.quiet {
        OutputFormatter::run_summary(&stats);
        if stats.dry_run {
            OutputFormatter::dry_run_notice("No files were modified.");
        }
        if stats.errors > 0 {
            OutputFormatter::warning(&format!(
                "{} files could not be organized; see {}",
                stats.errors,
                log_path.display()
            ));
        }
        if stats.cancelled {
            OutputFormatter::warning("Interrupted; the remaining files were left in place.");
        }
    }

    Ok(stats)
}

/// Interactive launcher: pick a normal run or a dry run.
fn launch(cli: &Cli) -> Result<(), CliError> {
    OutputFormatter::header("file-router");

    let choice = Select::new()
        .with_prompt("Select run mode")
        .items(&[
            "Normal run (move files)",
            "Dry run (preview only, nothing is moved)",
        ])
        .default(0)
        .interact_on(&Term::stderr())?;

    let options = RunOptions {
        force_dry_run: cli.dry_run || choice == 1,
        ..RunOptions::from(cli)
    };
    install_interrupt_handler(&options.cancel);
    let stats = organize_from_config(&cli.config, &options)?;

    if stats.cancelled {
        return Ok(());
    }
    OutputFormatter::success("Operation completed!");
    let log_path = options
        .log_file
        .or_else(|| Config::load(&cli.config).ok().map(|c| c.settings.log_file));
    if let Some(log_path) = log_path {
        OutputFormatter::info(&format!("Check {} for details", log_path.display()));
    }
    Ok(())
}

/// Ctrl-C sets `cancel` so the run stops before the next file instead of
/// mid-move. Only the first handler per process is installed.
fn install_interrupt_handler(cancel: &CancelFlag) {
    let cancel = cancel.clone();
    if let Err(e) = ctrlc::set_handler(move || cancel.cancel()) {
        OutputFormatter::warning(&format!("Ctrl-C will not stop the run cleanly: {}", e));
    }
}
