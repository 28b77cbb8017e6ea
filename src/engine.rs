//! The routing pipeline.
//!
//! [`Organizer`] walks the source directory and sends every regular file
//! through the same chain of stages:
//!
//! exclusion filter → size filter → category → destination + duplicate → move
//!
//! The first stage that rejects a file decides its [`Outcome`] and the later
//! stages never run, so cheap name and size checks happen before any
//! directory is created. Every file ends up as exactly one of moved, skipped or
//! failed, and per-file failures never stop the run.

use log::Level;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;
use walkdir::{DirEntry, WalkDir};

use crate::activity_log::LogSink;
use crate::config::{Config, ConfigError};
use crate::file_category::CategoryResolver;
use crate::file_organizer::{FileOrganizer, MoveError, MoveMethod};
use crate::filters::{ExclusionFilter, SizeLimits};
use crate::placement::{DestinationResolver, DuplicateResolver};

/// Fatal, run-level errors. Nothing has been moved when one of these is returned.
#[derive(Debug, thiserror::Error)]
pub enum OrganizeError {
    #[error("Source directory does not exist: {}", .0.display())]
    SourceNotFound(PathBuf),
    #[error("Source path is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),
    #[error("Could not open activity log {}: {source}", path.display())]
    LogOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Why a single file could not be routed. Recorded, never propagated.
#[derive(Debug, thiserror::Error)]
pub enum FileError {
    #[error("Could not read metadata of {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} has no file name", .0.display())]
    NoFileName(PathBuf),
    #[error("Could not create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Date format '{format}' could not be rendered")]
    DateFormat { format: String },
    #[error("No free name for {} after {attempts} attempts", path.display())]
    NamesExhausted { path: PathBuf, attempts: u32 },
    #[error(transparent)]
    Move(#[from] MoveError),
}

/// A regular file picked up by the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub path: PathBuf,
    pub file_name: OsString,
    pub size: u64,
    pub modified: SystemTime,
}

impl CandidateFile {
    /// Reads size and modification time of the file at `path`.
    pub fn from_path(path: &Path) -> Result<Self, FileError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| FileError::NoFileName(path.to_path_buf()))?
            .to_os_string();
        let metadata_error = |e| FileError::Metadata {
            path: path.to_path_buf(),
            source: e,
        };
        let metadata = fs::metadata(path).map_err(metadata_error)?;
        let modified = metadata.modified().map_err(metadata_error)?;

        Ok(Self {
            path: path.to_path_buf(),
            file_name,
            size: metadata.len(),
            modified,
        })
    }
}

/// Why a file was left where it is. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The file name matched an exclusion pattern.
    Excluded { pattern: String },
    /// The size is outside the configured range.
    SizeOutOfRange { size: u64 },
    /// No category lists the file's extension.
    UnrecognizedExtension,
    /// The destination is taken and the duplicate policy is `skip`.
    Duplicate { existing: PathBuf },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Excluded { pattern } => write!(f, "excluded by pattern '{}'", pattern),
            SkipReason::SizeOutOfRange { size } => {
                write!(f, "size {} bytes is outside the allowed range", size)
            }
            SkipReason::UnrecognizedExtension => f.write_str("unrecognized file type"),
            SkipReason::Duplicate { existing } => {
                write!(f, "duplicate of {}", existing.display())
            }
        }
    }
}

/// What happened to one file.
#[derive(Debug)]
pub enum Outcome {
    Moved {
        category: String,
        destination: PathBuf,
        method: MoveMethod,
    },
    Skipped(SkipReason),
    Failed(FileError),
}

impl Outcome {
    pub fn is_moved(&self) -> bool {
        matches!(self, Outcome::Moved { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Outcome::Skipped(_))
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    pub fn skip_reason(&self) -> Option<&SkipReason> {
        match self {
            Outcome::Skipped(reason) => Some(reason),
            _ => None,
        }
    }
}

/// A file and its outcome, as handed to run observers.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Counters for one run. Rebuilt from zero every run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub total_files: usize,
    pub moved_files: usize,
    pub skipped_files: usize,
    pub errors: usize,
    /// Moved files per category.
    pub per_category: HashMap<String, usize>,
    pub dry_run: bool,
    /// The run stopped early because cancellation was requested.
    pub cancelled: bool,
}

impl RunStats {
    /// Count one file. Every file lands in exactly one bucket.
    pub fn record(&mut self, outcome: &Outcome) {
        self.total_files += 1;
        match outcome {
            Outcome::Moved { category, .. } => {
                self.moved_files += 1;
                *self.per_category.entry(category.clone()).or_insert(0) += 1;
            }
            Outcome::Skipped(_) => self.skipped_files += 1,
            Outcome::Failed(_) => self.errors += 1,
        }
    }
}

/// Cooperative cancellation, checked between files.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Routes the files of one source directory according to a [`Config`].
pub struct Organizer<S: LogSink> {
    config: Config,
    exclusions: ExclusionFilter,
    sizes: SizeLimits,
    categories: CategoryResolver,
    destinations: DestinationResolver,
    duplicates: DuplicateResolver,
    mover: FileOrganizer,
    sink: S,
    cancel: CancelFlag,
}

impl<S: LogSink> Organizer<S> {
    /// Compiles `config` into a ready pipeline that reports to `sink`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the config fails validation.
    pub fn new(config: Config, sink: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let settings = &config.settings;

        Ok(Self {
            exclusions: ExclusionFilter::new(&config.exclude_patterns)?,
            sizes: SizeLimits::from_settings(settings),
            categories: CategoryResolver::new(&config.target_directories),
            destinations: DestinationResolver::from_settings(settings),
            duplicates: DuplicateResolver::new(settings.handle_duplicates),
            mover: FileOrganizer::new(settings.dry_run),
            sink,
            cancel: CancelFlag::new(),
            config,
        })
    }

    /// Use `cancel` instead of the organizer's own flag.
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    /// Replace the duplicate resolver, e.g. to lower the rename cap.
    pub fn with_duplicate_resolver(mut self, duplicates: DuplicateResolver) -> Self {
        self.duplicates = duplicates;
        self
    }

    /// A handle that stops the run before the next file.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Route every file in the source directory.
    ///
    /// # Errors
    ///
    /// Only run-level problems are errors: a missing or non-directory source.
    /// Per-file problems are counted in [`RunStats::errors`].
    pub fn organize(&mut self) -> Result<RunStats, OrganizeError> {
        self.organize_with(|_| {})
    }

    /// Like [`organize`](Self::organize), reporting each file to `on_file`
    /// once its outcome is known.
    pub fn organize_with<F>(&mut self, mut on_file: F) -> Result<RunStats, OrganizeError>
    where
        F: FnMut(&FileReport),
    {
        let source = self.config.source_directory.clone();
        if !source.exists() {
            return Err(OrganizeError::SourceNotFound(source));
        }
        if !source.is_dir() {
            return Err(OrganizeError::SourceNotDirectory(source));
        }

        let mut stats = RunStats {
            dry_run: self.mover.is_dry_run(),
            ..RunStats::default()
        };

        if stats.dry_run {
            self.sink.info(format_args!(
                "[DRY RUN] Organizing {} (no files will be changed)",
                source.display()
            ));
        } else {
            self.sink
                .info(format_args!("Organizing {}", source.display()));
        }

        for path in self.discover(&source) {
            if self.cancel.is_cancelled() {
                stats.cancelled = true;
                self.sink.warn(format_args!(
                    "Run cancelled; remaining files were left in place"
                ));
                break;
            }

            let outcome = self.process_file(&path);
            self.log_outcome(&path, &outcome);
            stats.record(&outcome);
            on_file(&FileReport { path, outcome });
        }

        self.sink.info(format_args!(
            "Finished: {} files total, {} moved, {} skipped, {} errors",
            stats.total_files, stats.moved_files, stats.skipped_files, stats.errors
        ));
        self.sink.flush();

        Ok(stats)
    }

    /// Run one file through every stage, stopping at the first rejection.
    pub fn process_file(&mut self, path: &Path) -> Outcome {
        let Some(file_name) = path.file_name() else {
            return Outcome::Failed(FileError::NoFileName(path.to_path_buf()));
        };

        if let Some(pattern) = self
            .exclusions
            .matching_pattern(&file_name.to_string_lossy())
        {
            return Outcome::Skipped(SkipReason::Excluded {
                pattern: pattern.to_string(),
            });
        }

        let candidate = match CandidateFile::from_path(path) {
            Ok(candidate) => candidate,
            Err(e) => return Outcome::Failed(e),
        };

        if !self.sizes.passes(candidate.size) {
            return Outcome::Skipped(SkipReason::SizeOutOfRange {
                size: candidate.size,
            });
        }

        let Some(target) = self
            .categories
            .resolve_path(path)
            .and_then(|name| self.config.category(name))
        else {
            return Outcome::Skipped(SkipReason::UnrecognizedExtension);
        };
        let category = target.name.clone();

        let destination = match self.destinations.resolve(target, &candidate) {
            Ok(destination) => destination,
            Err(e) => return Outcome::Failed(e),
        };

        let final_path = match self.duplicates.resolve(&destination) {
            Ok(Some(final_path)) => final_path,
            Ok(None) => {
                return Outcome::Skipped(SkipReason::Duplicate {
                    existing: destination,
                });
            }
            Err(e) => return Outcome::Failed(e),
        };
        if final_path != destination {
            self.sink.debug(format_args!(
                "{} already exists, using {}",
                destination.display(),
                final_path.display()
            ));
        }

        match self.mover.move_file(path, &final_path) {
            Ok(receipt) => {
                if receipt.method == MoveMethod::Simulated {
                    self.duplicates.claim(final_path.clone());
                }
                Outcome::Moved {
                    category,
                    destination: final_path,
                    method: receipt.method,
                }
            }
            Err(e) => Outcome::Failed(e.into()),
        }
    }

    fn log_outcome(&mut self, path: &Path, outcome: &Outcome) {
        match outcome {
            Outcome::Moved {
                destination,
                method: MoveMethod::Simulated,
                ..
            } => self.sink.info(format_args!(
                "[DRY RUN] Would move {} -> {}",
                path.display(),
                destination.display()
            )),
            Outcome::Moved {
                destination,
                method,
                ..
            } => {
                let via = if *method == MoveMethod::Copied {
                    " (copied across volumes)"
                } else {
                    ""
                };
                self.sink.info(format_args!(
                    "Moved {} -> {}{}",
                    path.display(),
                    destination.display(),
                    via
                ))
            }
            Outcome::Skipped(reason) => self
                .sink
                .debug(format_args!("Skipping {}: {}", path.display(), reason)),
            Outcome::Failed(e) => self
                .sink
                .error(format_args!("Failed to organize {}: {}", path.display(), e)),
        }
    }

    /// Regular files under `source`, sorted by name within each directory.
    ///
    /// Walk errors are logged and skipped. Target directories inside the
    /// source tree are not descended into.
    fn discover(&mut self, source: &Path) -> Vec<PathBuf> {
        let mut walker = WalkDir::new(source).min_depth(1).sort_by_file_name();
        if !self.config.settings.recursive {
            walker = walker.max_depth(1);
        }

        let target_dirs: Vec<PathBuf> = self
            .config
            .target_directories
            .iter()
            .filter_map(|target| fs::canonicalize(&target.path).ok())
            .collect();
        let is_target_dir = |entry: &DirEntry| {
            entry.file_type().is_dir()
                && fs::canonicalize(entry.path())
                    .map(|dir| target_dirs.contains(&dir))
                    .unwrap_or(false)
        };

        let mut files = Vec::new();
        for entry in walker.into_iter().filter_entry(|entry| !is_target_dir(entry)) {
            match entry {
                Ok(entry) if is_regular_file(&entry) => files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => self
                    .sink
                    .warn(format_args!("Error walking {}: {}", source.display(), e)),
            }
        }

        if self.sink.enabled(Level::Debug) {
            self.sink.debug(format_args!(
                "Found {} candidate files in {}",
                files.len(),
                source.display()
            ));
        }
        files
    }
}

/// Regular files, and symlinks that resolve to one.
fn is_regular_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity_log::MemoryLog;
    use crate::config::{DuplicatePolicy, Settings, TargetDirectory};
    use log::LevelFilter;
    use tempfile::TempDir;

    fn config(source: &Path, targets: &Path) -> Config {
        Config {
            source_directory: source.to_path_buf(),
            exclude_patterns: vec!["*.tmp".to_string()],
            target_directories: vec![
                TargetDirectory {
                    name: "documents".to_string(),
                    path: targets.join("docs"),
                    extensions: vec![".pdf".to_string()],
                },
                TargetDirectory {
                    name: "images".to_string(),
                    path: targets.join("images"),
                    extensions: vec![".jpg".to_string()],
                },
            ],
            settings: Settings {
                min_file_size: 100,
                ..Settings::default()
            },
        }
    }

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let source = temp_dir.path().join("in");
        let targets = temp_dir.path().join("out");
        fs::create_dir_all(&source).unwrap();
        (temp_dir, source, targets)
    }

    #[test]
    fn test_mixed_directory_scenario() {
        let (_temp, source, targets) = setup();
        fs::write(source.join("a.pdf"), vec![0u8; 500]).unwrap();
        fs::write(source.join("b.tmp"), vec![0u8; 500]).unwrap();
        fs::write(source.join("c.jpg"), b"").unwrap();

        let mut organizer =
            Organizer::new(config(&source, &targets), MemoryLog::default()).unwrap();
        let stats = organizer.organize().unwrap();

        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.moved_files, 1);
        assert_eq!(stats.skipped_files, 2);
        assert_eq!(stats.errors, 0);
        assert_eq!(stats.per_category.get("documents"), Some(&1));
        assert!(targets.join("docs").join("a.pdf").exists());
        assert!(source.join("b.tmp").exists());
        assert!(source.join("c.jpg").exists());
    }

    #[test]
    fn test_exclusion_checked_before_size_and_category() {
        let (_temp, source, targets) = setup();
        let path = source.join("tiny.tmp");
        fs::write(&path, b"").unwrap();

        let mut organizer =
            Organizer::new(config(&source, &targets), MemoryLog::default()).unwrap();
        let outcome = organizer.process_file(&path);

        assert_eq!(
            outcome.skip_reason(),
            Some(&SkipReason::Excluded {
                pattern: "*.tmp".to_string()
            })
        );
    }

    #[test]
    fn test_size_checked_before_category() {
        let (_temp, source, targets) = setup();
        let path = source.join("small.xyz");
        fs::write(&path, b"12").unwrap();

        let mut organizer =
            Organizer::new(config(&source, &targets), MemoryLog::default()).unwrap();
        let outcome = organizer.process_file(&path);

        assert_eq!(
            outcome.skip_reason(),
            Some(&SkipReason::SizeOutOfRange { size: 2 })
        );
        assert!(!targets.exists());
    }

    #[test]
    fn test_unrecognized_extension_creates_nothing() {
        let (_temp, source, targets) = setup();
        let path = source.join("song.mp3");
        fs::write(&path, vec![1u8; 200]).unwrap();

        let mut organizer =
            Organizer::new(config(&source, &targets), MemoryLog::default()).unwrap();
        let outcome = organizer.process_file(&path);

        assert_eq!(outcome.skip_reason(), Some(&SkipReason::UnrecognizedExtension));
        assert!(!targets.exists());
    }

    #[test]
    fn test_vanished_file_is_a_failure() {
        let (_temp, source, targets) = setup();
        let mut organizer =
            Organizer::new(config(&source, &targets), MemoryLog::default()).unwrap();

        let outcome = organizer.process_file(&source.join("ghost.pdf"));
        assert!(matches!(outcome, Outcome::Failed(FileError::Metadata { .. })));
    }

    #[test]
    fn test_missing_source_is_fatal() {
        let (_temp, source, targets) = setup();
        let mut organizer = Organizer::new(
            config(&source.join("nope"), &targets),
            MemoryLog::default(),
        )
        .unwrap();

        assert!(matches!(
            organizer.organize(),
            Err(OrganizeError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_source_file_is_fatal() {
        let (_temp, source, targets) = setup();
        let file = source.join("a.pdf");
        fs::write(&file, b"x").unwrap();
        let mut organizer =
            Organizer::new(config(&file, &targets), MemoryLog::default()).unwrap();

        assert!(matches!(
            organizer.organize(),
            Err(OrganizeError::SourceNotDirectory(_))
        ));
    }

    #[test]
    fn test_directories_are_not_counted() {
        let (_temp, source, targets) = setup();
        fs::create_dir(source.join("nested")).unwrap();
        fs::write(source.join("nested").join("deep.pdf"), vec![0u8; 200]).unwrap();

        let mut organizer =
            Organizer::new(config(&source, &targets), MemoryLog::default()).unwrap();
        let stats = organizer.organize().unwrap();

        assert_eq!(stats.total_files, 0);
        assert!(source.join("nested").join("deep.pdf").exists());
    }

    #[test]
    fn test_recursive_walk_skips_target_inside_source() {
        let (_temp, source, _targets) = setup();
        let mut cfg = config(&source, &source);
        cfg.settings.recursive = true;
        fs::create_dir_all(source.join("docs")).unwrap();
        fs::write(source.join("docs").join("old.pdf"), vec![0u8; 200]).unwrap();
        fs::create_dir_all(source.join("inbox")).unwrap();
        fs::write(source.join("inbox").join("new.pdf"), vec![0u8; 200]).unwrap();

        let mut organizer = Organizer::new(cfg, MemoryLog::default()).unwrap();
        let stats = organizer.organize().unwrap();

        assert_eq!(stats.total_files, 1);
        assert_eq!(stats.moved_files, 1);
        assert!(source.join("docs").join("old.pdf").exists());
        assert!(source.join("docs").join("new.pdf").exists());
    }

    #[test]
    fn test_cancelled_run_touches_nothing() {
        let (_temp, source, targets) = setup();
        fs::write(source.join("a.pdf"), vec![0u8; 200]).unwrap();

        let mut log = MemoryLog::default();
        let mut organizer = Organizer::new(config(&source, &targets), &mut log).unwrap();
        organizer.cancel_flag().cancel();
        let stats = organizer.organize().unwrap();

        assert!(stats.cancelled);
        assert_eq!(stats.total_files, 0);
        assert!(source.join("a.pdf").exists());
        assert_eq!(log.messages_at(Level::Warn).len(), 1);
    }

    #[test]
    fn test_cancel_between_files() {
        let (_temp, source, targets) = setup();
        fs::write(source.join("a.pdf"), vec![0u8; 200]).unwrap();
        fs::write(source.join("b.pdf"), vec![0u8; 200]).unwrap();

        let cancel = CancelFlag::new();
        let mut organizer = Organizer::new(config(&source, &targets), MemoryLog::default())
            .unwrap()
            .with_cancel_flag(cancel.clone());
        let stats = organizer.organize_with(|_| cancel.cancel()).unwrap();

        assert!(stats.cancelled);
        assert_eq!(stats.moved_files, 1);
        assert!(targets.join("docs").join("a.pdf").exists());
        assert!(source.join("b.pdf").exists());
    }

    #[test]
    fn test_observer_sees_every_file() {
        let (_temp, source, targets) = setup();
        fs::write(source.join("a.pdf"), vec![0u8; 200]).unwrap();
        fs::write(source.join("b.doc"), vec![0u8; 200]).unwrap();

        let mut organizer =
            Organizer::new(config(&source, &targets), MemoryLog::default()).unwrap();
        let mut seen = Vec::new();
        organizer
            .organize_with(|report| {
                seen.push((
                    report.path.file_name().unwrap().to_owned(),
                    report.outcome.is_moved(),
                ))
            })
            .unwrap();

        assert_eq!(
            seen,
            vec![
                (OsString::from("a.pdf"), true),
                (OsString::from("b.doc"), false)
            ]
        );
    }

    #[test]
    fn test_log_levels_per_outcome() {
        let (_temp, source, targets) = setup();
        fs::write(source.join("a.pdf"), vec![0u8; 200]).unwrap();
        fs::write(source.join("b.tmp"), b"").unwrap();

        let mut log = MemoryLog::new(LevelFilter::Debug);
        Organizer::new(config(&source, &targets), &mut log)
            .unwrap()
            .organize()
            .unwrap();

        assert!(log.messages_at(Level::Info).iter().any(|m| m.starts_with("Moved ")));
        assert!(
            log.messages_at(Level::Debug)
                .iter()
                .any(|m| m.contains("b.tmp") && m.contains("excluded by pattern '*.tmp'"))
        );
        assert!(log.messages_at(Level::Info).iter().any(|m| m.starts_with("Finished: 2 files")));
    }

    #[test]
    fn test_rename_cap_counts_as_error() {
        let (_temp, source, targets) = setup();
        fs::write(source.join("a.pdf"), vec![0u8; 200]).unwrap();
        fs::create_dir_all(targets.join("docs")).unwrap();
        fs::write(targets.join("docs").join("a.pdf"), b"old").unwrap();
        fs::write(targets.join("docs").join("a_001.pdf"), b"old").unwrap();

        let mut organizer = Organizer::new(config(&source, &targets), MemoryLog::default())
            .unwrap()
            .with_duplicate_resolver(
                DuplicateResolver::new(DuplicatePolicy::Rename).with_max_attempts(1),
            );
        let stats = organizer.organize().unwrap();

        assert_eq!(stats.errors, 1);
        assert!(source.join("a.pdf").exists());
    }

    #[test]
    fn test_stats_record_is_exclusive() {
        let outcomes = [
            Outcome::Skipped(SkipReason::UnrecognizedExtension),
            Outcome::Failed(FileError::NoFileName(PathBuf::from(".."))),
            Outcome::Moved {
                category: "images".to_string(),
                destination: PathBuf::from("/x.jpg"),
                method: MoveMethod::Renamed,
            },
        ];
        let mut stats = RunStats::default();
        for outcome in &outcomes {
            let buckets = [outcome.is_moved(), outcome.is_skipped(), outcome.is_failed()];
            assert_eq!(buckets.iter().filter(|b| **b).count(), 1);
            stats.record(outcome);
        }
        assert!(outcomes[0].is_skipped());
        assert!(outcomes[1].is_failed());

        assert_eq!(stats.total_files, 3);
        assert_eq!(
            stats.moved_files + stats.skipped_files + stats.errors,
            stats.total_files
        );
    }
}
