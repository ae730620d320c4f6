//! Shallow directory scanning.
//!
//! A scan lists only the immediate children of a directory. Files are
//! classified by extension; subfolders are recorded as opaque entries and their
//! contents are never read. Hidden entries are dropped before anything else.
//!
//! Errors on individual entries are collected into the [`ScanReport`] and the
//! scan carries on, so a single unreadable entry never hides the rest.

use crate::config::CompiledFilters;
use crate::file_category::{Category, FileMapper, SUBFOLDER_CATEGORY};
use crate::size_format::format_size;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// A regular file found at the top level of the scanned directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// The file name.
    pub name: String,
    /// Absolute path of the file at scan time.
    pub path: PathBuf,
    /// Path relative to the scan root.
    pub relative_path: PathBuf,
    /// Lowercase extension including the dot, or empty when the name has none.
    pub extension: String,
    /// Size in bytes.
    pub size_bytes: u64,
    /// Size formatted for display, e.g. "1.5 KB".
    pub size_readable: String,
    /// Category assigned from the extension.
    pub category: Category,
}

/// A subfolder found at the top level. Its contents are never inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderEntry {
    pub name: String,
    pub path: PathBuf,
}

/// One immediate child of the scanned directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryEntry {
    File(FileEntry),
    Folder(FolderEntry),
}

impl DirectoryEntry {
    pub fn name(&self) -> &str {
        match self {
            DirectoryEntry::File(file) => &file.name,
            DirectoryEntry::Folder(folder) => &folder.name,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            DirectoryEntry::File(file) => &file.path,
            DirectoryEntry::Folder(folder) => &folder.path,
        }
    }

    /// The category folder name for files, or `"Subfolder"` for folders.
    pub fn category_label(&self) -> &'static str {
        match self {
            DirectoryEntry::File(file) => file.category.dir_name(),
            DirectoryEntry::Folder(_) => SUBFOLDER_CATEGORY,
        }
    }

    pub fn as_file(&self) -> Option<&FileEntry> {
        match self {
            DirectoryEntry::File(file) => Some(file),
            DirectoryEntry::Folder(_) => None,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, DirectoryEntry::Folder(_))
    }
}

/// A problem with a single entry, or with listing the directory itself.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Error scanning directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error reading an entry of {}: {source}", path.display())]
    Entry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error inspecting {}: {source}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Everything one scan produced.
///
/// A report describes the directory at the moment it was scanned. Once the
/// directory has been organized the recorded paths are stale and the caller
/// should scan again.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// The scanned directory, made absolute.
    pub root: PathBuf,
    /// Files and folders, sorted by name.
    pub entries: Vec<DirectoryEntry>,
    /// Errors recovered from during the scan.
    pub errors: Vec<ScanError>,
}

impl ScanReport {
    pub fn files(&self) -> impl Iterator<Item = &FileEntry> {
        self.entries.iter().filter_map(DirectoryEntry::as_file)
    }

    pub fn folders(&self) -> impl Iterator<Item = &FolderEntry> {
        self.entries.iter().filter_map(|entry| match entry {
            DirectoryEntry::Folder(folder) => Some(folder),
            DirectoryEntry::File(_) => None,
        })
    }

    /// Number of files found. Folders are not counted.
    pub fn total_file_count(&self) -> usize {
        self.files().count()
    }

    /// Number of files per category, for categories that have at least one.
    pub fn category_tally(&self) -> BTreeMap<Category, usize> {
        let mut tally = BTreeMap::new();
        for file in self.files() {
            *tally.entry(file.category).or_insert(0) += 1;
        }
        tally
    }

    /// Combined size of all files in bytes.
    pub fn total_size(&self) -> u64 {
        self.files().map(|file| file.size_bytes).sum()
    }

    /// Mean file size in bytes, 0 when there are no files.
    pub fn average_size(&self) -> u64 {
        match self.total_file_count() {
            0 => 0,
            count => self.total_size() / count as u64,
        }
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

/// Returns true for names the scanner always skips.
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.') || name.starts_with('~')
}

/// Extracts the lowercase extension of a file name, including the dot.
///
/// Everything after the last dot counts, so `archive.tar.gz` yields `.gz`.
/// A name without any dot has no extension and yields an empty string.
///
/// # Examples
///
/// ```
/// use smart_organizer::scanner::extension_of;
///
/// assert_eq!(extension_of("Report.PDF"), ".pdf");
/// assert_eq!(extension_of("archive.tar.gz"), ".gz");
/// assert_eq!(extension_of("Makefile"), "");
/// ```
pub fn extension_of(name: &str) -> String {
    match name.to_lowercase().rsplit_once('.') {
        Some((_, ext)) => format!(".{}", ext),
        None => String::new(),
    }
}

/// Lists and classifies the top level of a directory.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    mapper: FileMapper,
    filters: CompiledFilters,
}

impl Scanner {
    /// Creates a scanner with the standard taxonomy and no extra filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies user exclusion filters on top of the hidden-entry rule.
    pub fn with_filters(mut self, filters: CompiledFilters) -> Self {
        self.filters = filters;
        self
    }

    /// Uses a custom taxonomy.
    pub fn with_mapper(mut self, mapper: FileMapper) -> Self {
        self.mapper = mapper;
        self
    }

    pub fn mapper(&self) -> &FileMapper {
        &self.mapper
    }

    /// Scans the immediate children of `root`.
    ///
    /// Never fails as a whole: if the directory cannot be listed the report
    /// is empty and carries the error.
    pub fn scan(&self, root: &Path) -> ScanReport {
        let root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());
        let mut report = ScanReport {
            root: root.clone(),
            ..Default::default()
        };

        let read_dir = match fs::read_dir(&root) {
            Ok(read_dir) => read_dir,
            Err(e) => {
                tracing::warn!(path = %root.display(), error = %e, "failed to read directory");
                report.errors.push(ScanError::ReadDir {
                    path: root,
                    source: e,
                });
                return report;
            }
        };

        for entry in read_dir {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(path = %root.display(), error = %e, "failed to read entry");
                    report.errors.push(ScanError::Entry {
                        path: root.clone(),
                        source: e,
                    });
                    continue;
                }
            };

            let name = entry.file_name().to_string_lossy().into_owned();
            if is_hidden(&name) {
                tracing::trace!(name = %name, "skipping hidden entry");
                continue;
            }

            let path = entry.path();
            // Follows symlinks, so a link to a file is treated as a file.
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "failed to inspect entry");
                    report.errors.push(ScanError::Metadata { path, source: e });
                    continue;
                }
            };

            if metadata.is_dir() {
                tracing::debug!(name = %name, "found subfolder");
                report
                    .entries
                    .push(DirectoryEntry::Folder(FolderEntry { name, path }));
            } else if metadata.is_file() {
                if self.filters.is_excluded(&name) {
                    tracing::debug!(name = %name, "excluded by filter");
                    continue;
                }
                let file = self.classify(&root, name, path, metadata.len());
                tracing::debug!(
                    name = %file.name,
                    category = %file.category,
                    size = file.size_bytes,
                    "classified file"
                );
                report.entries.push(DirectoryEntry::File(file));
            } else {
                tracing::debug!(name = %name, "skipping special file");
            }
        }

        report.entries.sort_by(|a, b| a.name().cmp(b.name()));

        tracing::info!(
            path = %report.root.display(),
            files = report.total_file_count(),
            folders = report.folders().count(),
            errors = report.errors.len(),
            "scan complete"
        );
        report
    }

    fn classify(&self, root: &Path, name: String, path: PathBuf, size_bytes: u64) -> FileEntry {
        let extension = extension_of(&name);
        let category = self.mapper.categorize(&extension);
        let relative_path = path
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| PathBuf::from(&name));

        FileEntry {
            name,
            path,
            relative_path,
            extension,
            size_bytes,
            size_readable: format_size(size_bytes),
            category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ExcludeRules, FilterConfig, FilterRules};
    use tempfile::TempDir;
    use tracing_test::traced_test;

    fn write(dir: &Path, name: &str, len: usize) {
        fs::write(dir.join(name), vec![b'x'; len]).expect("Failed to write file");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("photo.JPG"), ".jpg");
        assert_eq!(extension_of("archive.tar.gz"), ".gz");
        assert_eq!(extension_of("README"), "");
        assert_eq!(extension_of("trailing."), ".");
    }

    #[test]
    fn test_is_hidden() {
        assert!(is_hidden(".DS_Store"));
        assert!(is_hidden("~$report.docx"));
        assert!(!is_hidden("report.docx"));
        assert!(!is_hidden("a.b"));
    }

    #[test]
    fn test_scan_classifies_files_and_counts() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        write(root, "report.pdf", 2048);
        write(root, "photo.jpg", 10);
        write(root, "notes.txt", 1024);
        write(root, "Makefile", 3);

        let report = Scanner::new().scan(root);

        assert!(report.errors.is_empty());
        assert_eq!(report.total_file_count(), 4);
        let tally = report.category_tally();
        assert_eq!(tally.get(&Category::Documents), Some(&2));
        assert_eq!(tally.get(&Category::Images), Some(&1));
        assert_eq!(tally.get(&Category::Others), Some(&1));
        assert_eq!(report.total_size(), 2048 + 10 + 1024 + 3);

        let pdf = report
            .files()
            .find(|f| f.name == "report.pdf")
            .expect("report.pdf missing");
        assert_eq!(pdf.extension, ".pdf");
        assert_eq!(pdf.size_readable, "2.0 KB");
        assert_eq!(pdf.relative_path, PathBuf::from("report.pdf"));
        assert!(pdf.path.is_absolute());

        let makefile = report.files().find(|f| f.name == "Makefile").unwrap();
        assert_eq!(makefile.extension, "");
        assert_eq!(makefile.category, Category::Others);
    }

    #[test]
    fn test_scan_records_subfolders_without_descending() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        fs::create_dir(root.join("Archive")).unwrap();
        write(&root.join("Archive"), "inner.pdf", 5);
        write(root, "top.pdf", 5);

        let report = Scanner::new().scan(root);

        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.total_file_count(), 1);
        let folder = report.folders().next().expect("folder missing");
        assert_eq!(folder.name, "Archive");
        let archive_entry = report.entries.iter().find(|e| e.is_folder()).unwrap();
        assert_eq!(archive_entry.category_label(), SUBFOLDER_CATEGORY);
        assert!(report.files().all(|f| f.name != "inner.pdf"));
        assert!(!report.category_tally().contains_key(&Category::Others));
    }

    #[test]
    fn test_scan_skips_hidden_entries() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        write(root, ".hidden.txt", 1);
        write(root, "~lockfile.docx", 1);
        fs::create_dir(root.join(".git")).unwrap();
        write(root, "visible.txt", 1);

        let report = Scanner::new().scan(root);

        let names: Vec<_> = report.entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["visible.txt"]);
    }

    #[test]
    fn test_scan_entries_sorted_by_name() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        write(root, "b.txt", 1);
        write(root, "c.png", 1);
        write(root, "a.mp3", 1);

        let report = Scanner::new().scan(root);
        let names: Vec<_> = report.entries.iter().map(|e| e.name()).collect();
        assert_eq!(names, vec!["a.mp3", "b.txt", "c.png"]);
    }

    #[test]
    fn test_scan_applies_filters() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        write(root, "keep.txt", 1);
        write(root, "Thumbs.db", 1);
        write(root, "partial.crdownload", 1);

        let filters = FilterConfig {
            filters: FilterRules {
                exclude: ExcludeRules {
                    filenames: vec!["Thumbs.db".to_string()],
                    patterns: vec!["*.crdownload".to_string()],
                    ..Default::default()
                },
            },
        }
        .compile()
        .unwrap();

        let report = Scanner::new().with_filters(filters).scan(root);
        let names: Vec<_> = report.files().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["keep.txt"]);
    }

    #[test]
    fn test_scan_empty_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let report = Scanner::new().scan(temp_dir.path());
        assert!(report.entries.is_empty());
        assert!(report.errors.is_empty());
        assert_eq!(report.average_size(), 0);
        assert!(report.category_tally().is_empty());
    }

    #[traced_test]
    #[test]
    fn test_scan_missing_directory_reports_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("gone");

        let report = Scanner::new().scan(&missing);

        assert!(report.entries.is_empty());
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(report.errors[0], ScanError::ReadDir { .. }));
        assert!(report.error_messages()[0].starts_with("Error scanning directory"));
        assert!(logs_contain("failed to read directory"));
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_continues_past_broken_symlink() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        std::os::unix::fs::symlink(root.join("missing-target"), root.join("dangling.txt"))
            .unwrap();
        write(root, "ok.txt", 1);

        let report = Scanner::new().scan(root);

        assert_eq!(report.total_file_count(), 1);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(report.errors[0], ScanError::Metadata { .. }));
    }

    #[test]
    fn test_average_size() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let root = temp_dir.path();
        write(root, "a.txt", 100);
        write(root, "b.txt", 300);

        let report = Scanner::new().scan(root);
        assert_eq!(report.average_size(), 200);
    }
}
