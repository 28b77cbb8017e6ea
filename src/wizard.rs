//! Interactive setup wizard that writes a starter configuration.

use dialoguer::{Confirm, Input, Select, console::Term};
use std::env;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{Config, ConfigError, DuplicatePolicy};
use crate::output::OutputFormatter;

#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("{} already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),
    #[error("Setup cancelled")]
    Cancelled,
    #[error("Could not determine the current directory: {0}")]
    CurrentDir(#[source] io::Error),
    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Everything the wizard asks about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardAnswers {
    pub source_directory: PathBuf,
    /// Destination overrides by category name; unlisted categories keep the default.
    pub destinations: Vec<(String, PathBuf)>,
    pub date_subdirectories: bool,
    pub duplicates: DuplicatePolicy,
}

/// Apply `answers` on top of [`Config::template`].
pub fn build_config(answers: WizardAnswers, organized_root: &Path) -> Config {
    let mut config = Config::template(answers.source_directory, organized_root);
    for (name, path) in answers.destinations {
        if let Some(target) = config
            .target_directories
            .iter_mut()
            .find(|target| target.name == name)
        {
            target.path = path;
        }
    }
    config.settings.create_subdirectories_by_date = answers.date_subdirectories;
    config.settings.handle_duplicates = answers.duplicates;
    config
}

/// Write the default configuration without asking anything.
pub fn write_default_config(
    output: &Path,
    source_directory: PathBuf,
    force: bool,
) -> Result<Config, WizardError> {
    if output.exists() && !force {
        return Err(WizardError::AlreadyExists(output.to_path_buf()));
    }
    let config = Config::template(source_directory, &organized_root()?);
    config.save(output)?;
    Ok(config)
}

/// Ask for source, destinations and policies on the terminal, then save.
pub fn run_wizard(output: &Path, force: bool) -> Result<Config, WizardError> {
    let term = Term::stderr();
    OutputFormatter::header("file-router setup");

    if output.exists() && !force {
        let overwrite = Confirm::new()
            .with_prompt(format!("{} exists. Overwrite it?", output.display()))
            .default(false)
            .interact_on(&term)?;
        if !overwrite {
            return Err(WizardError::Cancelled);
        }
    }

    let source: String = Input::new()
        .with_prompt("Folder to organize (e.g. ~/Downloads)")
        .interact_text_on(&term)?;

    let root = organized_root()?;
    let template = Config::template(PathBuf::new(), &root);
    OutputFormatter::info("Destination for each category (enter keeps the default):");
    let mut destinations = Vec::new();
    for target in &template.target_directories {
        let answer: String = Input::new()
            .with_prompt(format!("  {}", target.name))
            .default(target.path.display().to_string())
            .interact_text_on(&term)?;
        destinations.push((target.name.clone(), PathBuf::from(answer.trim())));
    }

    let date_subdirectories = Confirm::new()
        .with_prompt("Create subdirectories by date?")
        .default(true)
        .interact_on(&term)?;

    let policies = [
        DuplicatePolicy::Rename,
        DuplicatePolicy::Skip,
        DuplicatePolicy::Overwrite,
    ];
    let choice = Select::new()
        .with_prompt("When a file with the same name already exists")
        .items(&["Rename (add _001, _002, ...)", "Skip", "Overwrite"])
        .default(0)
        .interact_on(&term)?;

    let config = build_config(
        WizardAnswers {
            source_directory: PathBuf::from(source.trim()),
            destinations,
            date_subdirectories,
            duplicates: policies[choice],
        },
        &root,
    );
    config.save(output)?;

    OutputFormatter::success(&format!("Configuration saved to {}", output.display()));
    OutputFormatter::dry_run_notice("Try a dry run first: file-router --dry-run");
    Ok(config)
}

fn organized_root() -> Result<PathBuf, WizardError> {
    env::current_dir()
        .map(|cwd| cwd.join("Organized"))
        .map_err(WizardError::CurrentDir)
}
