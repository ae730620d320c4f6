//! Optional exclusion filters applied while scanning.
//!
//! Hidden entries (names starting with `.` or `~`) are always skipped by the
//! scanner. On top of that, a TOML file can exclude further files by exact
//! name, extension, glob pattern or regex. The category taxonomy itself is
//! compiled in and cannot be configured.
//!
//! # Configuration File Format
//!
//! ```toml
//! [filters.exclude]
//! filenames = ["Thumbs.db", "desktop.ini"]
//! extensions = ["tmp", "part"]
//! patterns = ["*.crdownload"]
//! regex = []
//! ```

use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the per-directory configuration file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = ".smartorganizer.toml";

/// Errors that can occur during configuration loading and compilation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("Invalid glob pattern '{pattern}': {reason}")]
    InvalidGlobPattern { pattern: String, reason: String },

    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegexPattern { pattern: String, reason: String },

    #[error("IO error reading configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level configuration document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub filters: FilterRules,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterRules {
    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,
}

/// Rules for excluding files from a scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g. "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the file name (e.g. "*.crdownload").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Extensions to exclude, with or without the leading dot.
    #[serde(default)]
    pub extensions: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

impl FilterConfig {
    /// Loads configuration, falling back to defaults.
    ///
    /// Lookup order:
    /// 1. `config_path`, if given (it must exist)
    /// 2. `.smartorganizer.toml` in the current directory
    /// 3. `smart-organizer/config.toml` in the user configuration directory
    /// 4. defaults (no extra exclusions)
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.is_file() {
            return Self::load_from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("smart-organizer").join("config.toml");
            if user_config.is_file() {
                return Self::load_from_file(&user_config);
            }
        }

        tracing::debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Loads configuration from a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config = Self::parse(&content)?;
        tracing::info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compiles the rules into matchers, validating every pattern.
    pub fn compile(self) -> Result<CompiledFilters, ConfigError> {
        CompiledFilters::new(self.filters)
    }
}

/// Pre-compiled exclusion rules.
#[derive(Debug, Clone, Default)]
pub struct CompiledFilters {
    exclude_filenames: HashSet<String>,
    exclude_extensions: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
}

impl CompiledFilters {
    fn new(rules: FilterRules) -> Result<Self, ConfigError> {
        let exclude = rules.exclude;

        let exclude_patterns = exclude
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|e| ConfigError::InvalidGlobPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let exclude_regexes = exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            exclude_filenames: exclude.filenames.into_iter().collect(),
            exclude_extensions: exclude
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            exclude_patterns,
            exclude_regexes,
        })
    }

    /// Returns true when a file with this name should be left out of the scan.
    ///
    /// Checks, in order: exact name, extension (case-insensitive), glob, regex.
    pub fn is_excluded(&self, file_name: &str) -> bool {
        if self.exclude_filenames.contains(file_name) {
            return true;
        }

        if let Some((_, ext)) = file_name.rsplit_once('.')
            && self.exclude_extensions.contains(&ext.to_lowercase())
        {
            return true;
        }

        if self
            .exclude_patterns
            .iter()
            .any(|pattern| pattern.matches(file_name))
        {
            return true;
        }

        self.exclude_regexes
            .iter()
            .any(|regex| regex.is_match(file_name))
    }

    /// True when no exclusion rule is configured.
    pub fn is_empty(&self) -> bool {
        self.exclude_filenames.is_empty()
            && self.exclude_extensions.is_empty()
            && self.exclude_patterns.is_empty()
            && self.exclude_regexes.is_empty()
    }
}
