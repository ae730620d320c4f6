//! smart-organizer - sort the files of a directory into category folders
//!
//! The library validates a target directory, scans its immediate children,
//! classifies files by extension into a fixed taxonomy, and moves them into
//! one folder per category without ever overwriting an existing file.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod logging;
pub mod output;
pub mod scanner;
pub mod size_format;
pub mod validator;

pub use config::{CompiledFilters, ConfigError, FilterConfig};
pub use file_category::{Category, FileMapper};
pub use file_organizer::{FileOrganizer, OrganizationResult, OrganizeError, ProgressObserver};
pub use scanner::{DirectoryEntry, ScanReport, Scanner};
pub use size_format::format_size;
pub use validator::{ValidationError, validate_directory};

pub use cli::{Cli, run_cli};
