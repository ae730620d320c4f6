//! Terminal output for the command-line front end.
//!
//! All printing goes through [`OutputFormatter`] so the library modules stay
//! free of presentation concerns. Diagnostics go through `tracing` instead and
//! end up on stderr.

use crate::file_category::Category;
use crate::file_organizer::{OrganizationResult, PlannedMove};
use crate::scanner::{DirectoryEntry, ScanReport};
use crate::size_format::format_size;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

/// How many error messages are shown before collapsing the rest.
pub const MAX_ERRORS_SHOWN: usize = 5;

/// Manages all CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red to stderr.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Creates a progress bar for the move phase.
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Lists every scanned entry with its size and category.
    pub fn entry_list(report: &ScanReport) {
        Self::header("SCAN RESULTS");
        if report.entries.is_empty() {
            Self::plain("No files or folders found.");
            return;
        }

        let name_width = report
            .entries
            .iter()
            .map(|entry| entry.name().chars().count())
            .max()
            .unwrap_or(0)
            .max(4);

        for entry in &report.entries {
            match entry {
                DirectoryEntry::File(file) => println!(
                    "  {:<width$}  {:>10}  → {}/",
                    file.name,
                    file.size_readable,
                    file.category.dir_name().green(),
                    width = name_width
                ),
                DirectoryEntry::Folder(folder) => println!(
                    "  {:<width$}  {:>10}  {}",
                    folder.name.bold(),
                    "",
                    entry.category_label().dimmed(),
                    width = name_width
                ),
            }
        }
    }

    /// Prints the per-category tally with total, size and average size.
    pub fn summary_table(report: &ScanReport) {
        let tally = report.category_tally();
        Self::category_table(&tally, report.total_file_count());
        println!(
            "{} {}   {} {}",
            "Total size:".bold(),
            format_size(report.total_size()),
            "Average size:".bold(),
            format_size(report.average_size())
        );
    }

    /// Prints a table of file counts by category.
    pub fn category_table(category_counts: &BTreeMap<Category, usize>, total_files: usize) {
        Self::header("SUMMARY");

        let max_category_len = category_counts
            .keys()
            .map(|category| category.dir_name().len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        for (category, count) in category_counts {
            println!(
                "{:<width$} | {} {}",
                category.dir_name(),
                count.to_string().green(),
                plural_files(*count),
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            plural_files(total_files),
            width = max_category_len
        );
    }

    /// Prints the moves a dry run would perform.
    pub fn plan(moves: &[PlannedMove]) {
        Self::header("PLANNED MOVES");
        if moves.is_empty() {
            Self::plain("Nothing to organize.");
            return;
        }
        for planned in moves {
            let source = display_name(&planned.source);
            let target = format!("{}/{}", planned.category.dir_name(), display_name(&planned.destination));
            if planned.is_rename() {
                println!("  {} → {} {}", source, target.yellow(), "(renamed)".dimmed());
            } else {
                println!("  {} → {}", source, target.green());
            }
        }
        Self::dry_run_notice("No files were moved.");
    }

    /// Prints the outcome of an organize run.
    pub fn organization_result(result: &OrganizationResult) {
        Self::header("ORGANIZATION COMPLETE");
        println!(
            "{} {}   {} {}   {} {:.1}%",
            "Files organized:".bold(),
            result.success_count().to_string().green(),
            "Errors:".bold(),
            result.error_count().to_string().red(),
            "Success rate:".bold(),
            result.success_rate()
        );
        if result.cancelled {
            Self::warning("Organizing was cancelled before all files were moved.");
        }
        Self::error_list(&result.error_messages());
    }

    /// Prints the last few errors and how many more were left out.
    pub fn error_list(messages: &[String]) {
        if messages.is_empty() {
            return;
        }
        Self::warning("Some errors occurred:");
        let shown = messages.len().saturating_sub(MAX_ERRORS_SHOWN);
        for message in &messages[shown..] {
            Self::error(message);
        }
        if shown > 0 {
            Self::info(&format!("... and {} more errors", shown));
        }
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }
}

fn plural_files(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
