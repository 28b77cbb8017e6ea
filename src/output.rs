//! Output formatting and styling module.
//!
//! Provides a centralized interface for console output that is not part of
//! the activity log: status lines, the run spinner and the end-of-run summary.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashMap;
use std::time::Duration;

use crate::engine::RunStats;

/// Manages CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - A spinner for the routing run
/// - Summary tables with run statistics
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use file_router::output::OutputFormatter;
    /// OutputFormatter::success("Configuration saved");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a spinner that counts processed files.
    ///
    /// The number of files is not known up front, so this ticks instead of
    /// filling a bar.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use file_router::output::OutputFormatter;
    /// let spinner = OutputFormatter::create_spinner();
    /// spinner.inc(1);
    /// spinner.finish_and_clear();
    /// ```
    pub fn create_spinner() -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {pos} files {msg}")
        {
            pb.set_style(style);
        }
        pb.enable_steady_tick(Duration::from_millis(120));
        pb
    }

    /// Prints a summary of a finished run: outcome counters followed by a
    /// per-category table of moved files.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use file_router::engine::RunStats;
    /// use file_router::output::OutputFormatter;
    ///
    /// let mut stats = RunStats::default();
    /// stats.total_files = 3;
    /// stats.moved_files = 1;
    /// stats.skipped_files = 2;
    /// stats.per_category.insert("documents".to_string(), 1);
    /// OutputFormatter::run_summary(&stats);
    /// ```
    pub fn run_summary(stats: &RunStats) {
        Self::header(if stats.dry_run {
            "DRY RUN SUMMARY"
        } else {
            "SUMMARY"
        });

        let moved_label = if stats.dry_run { "Would move" } else { "Moved" };
        println!("{:<12} {}", "Total files:", stats.total_files.to_string().bold());
        println!(
            "{:<12} {}",
            format!("{}:", moved_label),
            stats.moved_files.to_string().green()
        );
        println!("{:<12} {}", "Skipped:", stats.skipped_files.to_string().yellow());
        let errors = stats.errors.to_string();
        println!(
            "{:<12} {}",
            "Errors:",
            if stats.errors > 0 {
                errors.red()
            } else {
                errors.normal()
            }
        );

        if !stats.per_category.is_empty() {
            Self::category_table(&stats.per_category, stats.moved_files);
        }
    }

    /// Prints a table of category names to file counts.
    pub fn category_table(category_counts: &HashMap<String, usize>, total_files: usize) {
        let mut categories: Vec<_> = category_counts.iter().collect();
        categories.sort_by_key(|&(name, _)| name);

        let max_category_len = categories
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0)
            .max(8);

        println!();
        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in &categories {
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                plural(**count),
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural(total_files),
            width = max_category_len
        );
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}
