//! Command-line front end.
//!
//! Drives the pipeline the library exposes: validate the directory, scan it,
//! show what was found, then either print a dry-run plan or organize the
//! files behind a progress bar.

use crate::config::FilterConfig;
use crate::file_organizer::FileOrganizer;
use crate::output::OutputFormatter;
use crate::scanner::Scanner;
use crate::validator::validate_directory;
use anyhow::Context;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

/// Sort the files at the top level of a directory into category folders.
#[derive(Debug, Clone, Parser)]
#[command(name = "smart-organizer", version, about)]
pub struct Cli {
    /// Directory whose top-level files should be organized
    pub directory: PathBuf,

    /// Show where every file would go without moving anything
    #[arg(long)]
    pub dry_run: bool,

    /// Path to a TOML file with exclusion filters
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Organize without asking for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Log each classified entry and each move to stderr
    #[arg(short, long)]
    pub verbose: bool,
}

/// What a CLI run ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Files were organized.
    Organized { moved: usize, errors: usize },
    /// A dry-run plan was printed.
    Planned { files: usize },
    /// The directory had no files to organize.
    NothingToDo,
    /// The user declined the confirmation prompt.
    Aborted,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, RunOutcome::Organized { errors, .. } if *errors > 0)
    }

    pub fn exit_code(&self) -> ExitCode {
        if self.is_success() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        }
    }
}

/// Runs the CLI, reading the confirmation answer from stdin.
pub fn run_cli(cli: &Cli) -> anyhow::Result<RunOutcome> {
    let stdin = io::stdin();
    run_cli_with_input(cli, &mut stdin.lock())
}

/// Runs the CLI, reading the confirmation answer from `input`.
///
/// Fails only when the directory does not pass validation or the
/// configuration cannot be loaded. Problems with individual files are
/// reported and counted in the returned outcome.
pub fn run_cli_with_input(cli: &Cli, input: &mut dyn BufRead) -> anyhow::Result<RunOutcome> {
    let root = cli.directory.as_path();
    validate_directory(root)?;

    let filters = FilterConfig::load(cli.config.as_deref())
        .context("Error loading configuration")?
        .compile()
        .context("Error compiling filters")?;

    OutputFormatter::info(&format!("Scanning: {}", root.display()));
    let report = Scanner::new().with_filters(filters).scan(root);

    OutputFormatter::entry_list(&report);
    OutputFormatter::summary_table(&report);
    OutputFormatter::error_list(&report.error_messages());

    let total = report.total_file_count();
    if total == 0 {
        OutputFormatter::plain("\nNo files to organize.");
        return Ok(RunOutcome::NothingToDo);
    }

    let organizer = FileOrganizer::new();

    if cli.dry_run {
        let plan = organizer.plan(&report.entries, &report.root);
        OutputFormatter::plan(&plan);
        return Ok(RunOutcome::Planned { files: plan.len() });
    }

    if !cli.yes && !confirm(input, total)? {
        OutputFormatter::warning("Aborted. No files were moved.");
        return Ok(RunOutcome::Aborted);
    }

    let pb = OutputFormatter::create_progress_bar(total as u64);
    let mut on_progress = |completed: usize, _total: usize| {
        pb.set_position(completed as u64);
    };
    let result = organizer.organize_with_progress(&report.entries, &report.root, &mut on_progress);
    pb.finish_and_clear();

    OutputFormatter::organization_result(&result);
    if result.success_count() > 0 {
        OutputFormatter::success(&format!(
            "Organized {} files into category folders in {}",
            result.success_count(),
            report.root.display()
        ));
    }

    Ok(RunOutcome::Organized {
        moved: result.success_count(),
        errors: result.error_count(),
    })
}

fn confirm(input: &mut dyn BufRead, total: usize) -> anyhow::Result<bool> {
    print!("\nMove {} files into category folders? [y/N] ", total);
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}
