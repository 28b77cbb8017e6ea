//! file-router - route files into category directories by extension
//!
//! This library scans a source directory, classifies each file by extension
//! against user-defined categories and moves it into that category's target
//! directory, optionally bucketed by modification date. Exclusion patterns,
//! size limits, duplicate-name policies and dry runs are driven by a JSON or
//! TOML configuration file.

pub mod activity_log;
pub mod cli;
pub mod config;
pub mod engine;
pub mod file_category;
pub mod file_organizer;
pub mod filters;
pub mod output;
pub mod placement;
pub mod wizard;

pub use activity_log::{ActivityLog, LogSink, MemoryLog};
pub use config::{Config, ConfigError, DuplicatePolicy, Settings, TargetDirectory};
pub use engine::{CancelFlag, FileReport, OrganizeError, Organizer, Outcome, RunStats, SkipReason};
pub use file_category::CategoryResolver;
pub use file_organizer::FileOrganizer;

pub use cli::{Cli, RunOptions, organize_from_config, run_cli};
