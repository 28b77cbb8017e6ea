//! Activity logging for routing runs.
//!
//! A run reports every exclusion, skip, move and error to a [`LogSink`] it is
//! handed at construction. [`ActivityLog`] is the production sink: it appends
//! timestamped lines to a log file and echoes them, colored by level, to the
//! console. [`MemoryLog`] keeps records in memory for tests.

use chrono::Local;
use colored::*;
use indicatif::ProgressBar;
use log::{Level, LevelFilter};
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Destination for run activity.
pub trait LogSink {
    /// Whether records at `level` are kept.
    fn enabled(&self, level: Level) -> bool;

    /// Record a message. Records below the threshold are dropped.
    fn log(&mut self, level: Level, args: fmt::Arguments<'_>);

    /// Push buffered records to their destination.
    fn flush(&mut self) {}

    fn error(&mut self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    fn warn(&mut self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    fn info(&mut self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    fn debug(&mut self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }
}

impl<T: LogSink + ?Sized> LogSink for &mut T {
    fn enabled(&self, level: Level) -> bool {
        (**self).enabled(level)
    }

    fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        (**self).log(level, args);
    }

    fn flush(&mut self) {
        (**self).flush();
    }
}

/// Level names as they appear in the log file.
fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// Persistent, append-only activity log with console echo.
///
/// Each line reads `2024-03-15 12:00:00,123 - INFO - message`.
pub struct ActivityLog {
    file: Option<BufWriter<File>>,
    path: Option<PathBuf>,
    level: LevelFilter,
    console: bool,
    progress: Option<ProgressBar>,
}

impl ActivityLog {
    /// Opens (or creates) the log file at `path` in append mode.
    ///
    /// # Errors
    ///
    /// Returns the underlying IO error if the file or its parent directory
    /// cannot be created.
    pub fn open(path: &Path, level: LevelFilter) -> io::Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            file: Some(BufWriter::new(file)),
            path: Some(path.to_path_buf()),
            level,
            console: true,
            progress: None,
        })
    }

    /// A log that only echoes to the console.
    pub fn console_only(level: LevelFilter) -> Self {
        Self {
            file: None,
            path: None,
            level,
            console: true,
            progress: None,
        }
    }

    /// Turn console echo on or off. The file is written either way.
    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    /// Print console lines above `progress` instead of through stdout.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Location of the log file, if there is one.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn echo(&self, level: Level, message: &str) {
        let line = match level {
            Level::Error => format!("{} {}", "✗".red(), message.red()),
            Level::Warn => format!("{} {}", "⚠".yellow(), message.yellow()),
            Level::Info => message.to_string(),
            Level::Debug | Level::Trace => message.dimmed().to_string(),
        };

        match &self.progress {
            Some(progress) => progress.println(line),
            None if level == Level::Error => eprintln!("{}", line),
            None => println!("{}", line),
        }
    }
}

impl LogSink for ActivityLog {
    fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        if !self.enabled(level) {
            return;
        }
        let message = args.to_string();

        if let Some(file) = self.file.as_mut() {
            let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S,%3f");
            // A failing log write must not abort the run.
            let _ = writeln!(file, "{} - {} - {}", timestamp, level_name(level), message);
        }

        if self.console {
            self.echo(level, &message);
        }
    }

    fn flush(&mut self) {
        if let Some(file) = self.file.as_mut() {
            let _ = file.flush();
        }
    }
}

impl Drop for ActivityLog {
    fn drop(&mut self) {
        LogSink::flush(self);
    }
}

/// In-memory sink, mainly for tests.
#[derive(Debug, Clone)]
pub struct MemoryLog {
    level: LevelFilter,
    records: Vec<(Level, String)>,
}

impl MemoryLog {
    pub fn new(level: LevelFilter) -> Self {
        Self {
            level,
            records: Vec::new(),
        }
    }

    pub fn records(&self) -> &[(Level, String)] {
        &self.records
    }

    /// Messages recorded at exactly `level`.
    pub fn messages_at(&self, level: Level) -> Vec<&str> {
        self.records
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    /// Whether any message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.records.iter().any(|(_, m)| m.contains(needle))
    }
}

impl Default for MemoryLog {
    fn default() -> Self {
        Self::new(LevelFilter::Trace)
    }
}

impl LogSink for MemoryLog {
    fn enabled(&self, level: Level) -> bool {
        level <= self.level
    }

    fn log(&mut self, level: Level, args: fmt::Arguments<'_>) {
        if self.enabled(level) {
            self.records.push((level, args.to_string()));
        }
    }
}
