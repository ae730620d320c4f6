//! Moving scanned files into per-category folders.
//!
//! Organizing runs in two phases over the entries of a scan. First one folder
//! is created under the root for every category present among the files.
//! Then each file is moved into its folder, one at a time and in entry order.
//! Subfolders are ignored entirely.
//!
//! A file is never overwritten. When the destination name is taken, the stem
//! gets a numeric suffix (`a.txt` becomes `a_1.txt`, then `a_2.txt`, ...) and
//! the check is made right before each move. Every failure is recorded and
//! the batch carries on with the next file.

use crate::file_category::Category;
use crate::scanner::{DirectoryEntry, FileEntry};
use std::collections::{BTreeSet, HashSet};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// A file that was moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Where the file was before organizing.
    pub original_path: PathBuf,
    /// Where the file is now.
    pub new_path: PathBuf,
    /// The category folder it was moved into.
    pub category: Category,
}

impl Operation {
    /// True when the file had to be renamed to avoid a collision.
    pub fn was_renamed(&self) -> bool {
        self.original_path.file_name() != self.new_path.file_name()
    }
}

/// A move computed by [`FileOrganizer::plan`] without touching the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub category: Category,
}

impl PlannedMove {
    pub fn is_rename(&self) -> bool {
        self.source.file_name() != self.destination.file_name()
    }
}

/// Errors recorded while organizing. None of them stop the batch.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// A category folder could not be created.
    #[error("Error creating folder {category}: {source}")]
    DirectoryCreationFailed {
        category: Category,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file could not be moved into its category folder.
    #[error("Error moving {file_name}: {source}")]
    FileMoveFailure {
        file_name: String,
        source_path: PathBuf,
        destination: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Outcome of one organize call.
#[derive(Debug, Default)]
pub struct OrganizationResult {
    /// Successful moves, in the order they happened.
    pub moves: Vec<Operation>,
    /// Every failure, in the order it happened. Never truncated.
    pub errors: Vec<OrganizeError>,
    /// True when the run stopped early because cancellation was requested.
    pub cancelled: bool,
}

impl OrganizationResult {
    pub fn success_count(&self) -> usize {
        self.moves.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Human-readable messages, one per failure.
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }

    /// Percentage of attempts that succeeded, 0 when nothing was attempted.
    pub fn success_rate(&self) -> f64 {
        let attempted = self.success_count() + self.error_count();
        if attempted == 0 {
            0.0
        } else {
            self.success_count() as f64 / attempted as f64 * 100.0
        }
    }
}

/// Receives progress while files are moved.
///
/// Called synchronously from the move loop after each successful move with
/// the number of files moved so far and the number of files in the batch.
/// Failed moves do not advance the count.
pub trait ProgressObserver {
    fn on_file_moved(&mut self, completed: usize, total: usize);
}

impl<F> ProgressObserver for F
where
    F: FnMut(usize, usize),
{
    fn on_file_moved(&mut self, completed: usize, total: usize) {
        self(completed, total)
    }
}

/// Progress observer that ignores every update.
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_file_moved(&mut self, _completed: usize, _total: usize) {}
}

/// Organizes scanned files into category folders.
#[derive(Debug, Clone, Default)]
pub struct FileOrganizer {
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl FileOrganizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks `flag` between moves and stops once it is set.
    ///
    /// Files not yet reached stay where they are and are not reported as
    /// errors.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel_flag = Some(flag);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_flag
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Organizes the files among `entries` into folders under `root`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use smart_organizer::file_organizer::FileOrganizer;
    /// use smart_organizer::scanner::Scanner;
    /// use std::path::Path;
    ///
    /// let root = Path::new("/home/user/Downloads");
    /// let report = Scanner::new().scan(root);
    /// let result = FileOrganizer::new().organize(&report.entries, root);
    /// println!("moved {}, failed {}", result.success_count(), result.error_count());
    /// ```
    pub fn organize(&self, entries: &[DirectoryEntry], root: &Path) -> OrganizationResult {
        self.organize_with_progress(entries, root, &mut NoProgress)
    }

    /// Like [`organize`](Self::organize), reporting each successful move to `progress`.
    pub fn organize_with_progress<P>(
        &self,
        entries: &[DirectoryEntry],
        root: &Path,
        progress: &mut P,
    ) -> OrganizationResult
    where
        P: ProgressObserver + ?Sized,
    {
        let files: Vec<&FileEntry> = entries.iter().filter_map(DirectoryEntry::as_file).collect();
        let total = files.len();
        let mut result = OrganizationResult::default();

        tracing::info!(root = %root.display(), files = total, "organizing");

        let categories: BTreeSet<Category> = files.iter().map(|file| file.category).collect();
        for category in categories {
            let folder = root.join(category.dir_name());
            if let Err(e) = fs::create_dir_all(&folder) {
                tracing::warn!(folder = %folder.display(), error = %e, "failed to create category folder");
                result.errors.push(OrganizeError::DirectoryCreationFailed {
                    category,
                    path: folder,
                    source: e,
                });
            }
        }

        for file in files {
            if self.is_cancelled() {
                tracing::info!(moved = result.moves.len(), "organizing cancelled");
                result.cancelled = true;
                break;
            }

            let folder = root.join(file.category.dir_name());
            match move_into_folder(file, &folder) {
                Ok(new_path) => {
                    tracing::debug!(
                        from = %file.path.display(),
                        to = %new_path.display(),
                        "moved file"
                    );
                    result.moves.push(Operation {
                        original_path: file.path.clone(),
                        new_path,
                        category: file.category,
                    });
                    progress.on_file_moved(result.moves.len(), total);
                }
                Err(e) => {
                    tracing::warn!(file = %file.name, error = %e, "failed to move file");
                    result.errors.push(e);
                }
            }
        }

        tracing::info!(
            moved = result.success_count(),
            errors = result.error_count(),
            "organizing finished"
        );
        result
    }

    /// Computes where each file would go, without creating or moving anything.
    ///
    /// Collisions are resolved against files already on disk and against
    /// earlier entries of the same plan, so the plan matches what
    /// [`organize`](Self::organize) would do if nothing else touches the
    /// directory in between.
    pub fn plan(&self, entries: &[DirectoryEntry], root: &Path) -> Vec<PlannedMove> {
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        entries
            .iter()
            .filter_map(DirectoryEntry::as_file)
            .map(|file| {
                let folder = root.join(file.category.dir_name());
                let file_name = file_name_of(file);
                let destination = unique_destination(&folder, &file_name, |candidate| {
                    is_occupied(candidate) || claimed.contains(candidate)
                });
                claimed.insert(destination.clone());
                PlannedMove {
                    source: file.path.clone(),
                    destination,
                    category: file.category,
                }
            })
            .collect()
    }
}

fn file_name_of(file: &FileEntry) -> OsString {
    file.path
        .file_name()
        .map(OsStr::to_os_string)
        .unwrap_or_else(|| OsString::from(&file.name))
}

fn move_into_folder(file: &FileEntry, folder: &Path) -> Result<PathBuf, OrganizeError> {
    let destination = unique_destination(folder, &file_name_of(file), is_occupied);

    move_file(&file.path, &destination).map_err(|e| OrganizeError::FileMoveFailure {
        file_name: file.name.clone(),
        source_path: file.path.clone(),
        destination: destination.clone(),
        source: e,
    })?;

    Ok(destination)
}

/// Anything at the path counts, including a dangling symlink.
fn is_occupied(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}

/// Returns `folder/file_name`, or the first `folder/<stem>_<n><ext>` for
/// n = 1, 2, ... that `is_taken` rejects.
pub fn unique_destination<F>(folder: &Path, file_name: &OsStr, is_taken: F) -> PathBuf
where
    F: Fn(&Path) -> bool,
{
    let candidate = folder.join(file_name);
    if !is_taken(&candidate) {
        return candidate;
    }

    let name = Path::new(file_name);
    let stem = name.file_stem().unwrap_or(file_name);
    let extension = name.extension();

    let mut counter: u64 = 1;
    loop {
        let mut renamed = stem.to_os_string();
        renamed.push(format!("_{}", counter));
        if let Some(ext) = extension {
            renamed.push(".");
            renamed.push(ext);
        }
        let candidate = folder.join(renamed);
        if !is_taken(&candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Moves a file, falling back to copy-then-delete across filesystems.
///
/// The fallback stages the copy in a temporary file next to the destination
/// and only removes the source once the copy is in place. If the source
/// cannot be removed the copy is deleted again, so either the move fully
/// happens or the source is left untouched.
pub fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!(from = %source.display(), "rename crosses devices, copying instead");
            copy_then_remove(source, destination)
        }
        Err(e) => Err(e),
    }
}

fn copy_then_remove(source: &Path, destination: &Path) -> io::Result<()> {
    let folder = destination.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent folder")
    })?;

    let mut input = fs::File::open(source)?;
    let mut staged = tempfile::NamedTempFile::new_in(folder)?;
    io::copy(&mut input, staged.as_file_mut())?;
    staged.as_file().sync_all()?;

    let permissions = input.metadata()?.permissions();
    if let Err(e) = fs::set_permissions(staged.path(), permissions) {
        tracing::debug!(error = %e, "could not copy permissions");
    }

    staged.persist_noclobber(destination).map_err(|e| e.error)?;

    if let Err(e) = fs::remove_file(source) {
        if let Err(cleanup) = fs::remove_file(destination) {
            tracing::warn!(
                path = %destination.display(),
                error = %cleanup,
                "failed to discard copy after source removal failed"
            );
        }
        return Err(io::Error::new(
            e.kind(),
            format!("copied across devices but could not remove the original: {}", e),
        ));
    }
    Ok(())
}
