//! Pre-flight checks on the directory to organize.
//!
//! Validation is read-only. It confirms the path exists, is a directory the
//! current user can write to, and is not one of a handful of system locations
//! that must never be reorganized.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Locations that are refused outright. Everything except the filesystem
/// root is also refused as a textual prefix, compared case-insensitively.
pub const SYSTEM_DIRECTORIES: &[&str] = &[
    "/",
    "/usr",
    "/bin",
    "/sbin",
    "/etc",
    "/dev",
    "/proc",
    "/sys",
    "C:\\Windows",
];

/// Why a directory cannot be organized.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Directory does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("No write permission for this directory: {}", .0.display())]
    NotWritable(PathBuf),

    #[error("Cannot organize system directories for safety reasons: {}", .0.display())]
    SystemDirectory(PathBuf),

    /// An unexpected failure while inspecting the path.
    #[error("Error validating directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Checks that `path` is safe to organize.
///
/// The checks run in order (existence, directory, writability, system
/// location) and the first failure is returned.
///
/// # Examples
///
/// ```
/// use smart_organizer::validator::{validate_directory, ValidationError};
/// use std::path::Path;
///
/// let err = validate_directory(Path::new("/definitely/not/here")).unwrap_err();
/// assert!(matches!(err, ValidationError::NotFound(_)));
/// ```
pub fn validate_directory(path: &Path) -> Result<(), ValidationError> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ValidationError::NotFound(path.to_path_buf()));
        }
        Err(e) => {
            return Err(ValidationError::Io {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };

    if !metadata.is_dir() {
        return Err(ValidationError::NotADirectory(path.to_path_buf()));
    }

    if !is_writable(path, &metadata)? {
        return Err(ValidationError::NotWritable(path.to_path_buf()));
    }

    if is_system_directory(path) {
        return Err(ValidationError::SystemDirectory(path.to_path_buf()));
    }

    tracing::debug!(path = %path.display(), "directory passed validation");
    Ok(())
}

/// Returns true when `path` is, or textually starts with, a denied location.
///
/// Trailing separators are ignored, so `/usr/` is treated like `/usr`.
pub fn is_system_directory(path: &Path) -> bool {
    let raw = path.to_string_lossy();
    let trimmed = raw.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        // Only separators: the filesystem root.
        return !raw.is_empty();
    }
    let lowered = trimmed.to_lowercase();

    SYSTEM_DIRECTORIES
        .iter()
        .filter(|system| **system != "/")
        .any(|system| lowered.starts_with(&system.to_lowercase()))
}

#[cfg(unix)]
fn is_writable(path: &Path, _metadata: &fs::Metadata) -> Result<bool, ValidationError> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes()).map_err(|e| ValidationError::Io {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidInput, e),
    })?;
    // SAFETY: `c_path` is a valid NUL-terminated string that outlives the call.
    let result = unsafe { libc::access(c_path.as_ptr(), libc::W_OK) };
    Ok(result == 0)
}

#[cfg(not(unix))]
fn is_writable(_path: &Path, metadata: &fs::Metadata) -> Result<bool, ValidationError> {
    Ok(!metadata.permissions().readonly())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_valid_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        assert!(validate_directory(temp_dir.path()).is_ok());
    }

    #[test]
    fn test_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let missing = temp_dir.path().join("nope");
        let err = validate_directory(&missing).unwrap_err();
        assert!(matches!(err, ValidationError::NotFound(_)));
        assert!(err.to_string().starts_with("Directory does not exist"));
    }

    #[test]
    fn test_file_is_not_a_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "content").expect("Failed to write file");
        let err = validate_directory(&file).unwrap_err();
        assert!(matches!(err, ValidationError::NotADirectory(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_directory() {
        use std::os::unix::fs::PermissionsExt;

        // root bypasses permission bits
        if unsafe { libc::geteuid() } == 0 {
            return;
        }
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let locked = temp_dir.path().join("locked");
        fs::create_dir(&locked).expect("Failed to create directory");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555))
            .expect("Failed to set permissions");

        let result = validate_directory(&locked);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))
            .expect("Failed to restore permissions");
        assert!(matches!(result, Err(ValidationError::NotWritable(_))));
    }

    #[test]
    fn test_system_directory_exact_matches() {
        assert!(is_system_directory(Path::new("/")));
        assert!(is_system_directory(Path::new("/usr")));
        assert!(is_system_directory(Path::new("/etc")));
        assert!(is_system_directory(Path::new("/proc")));
        assert!(is_system_directory(Path::new("C:\\Windows")));
    }

    #[test]
    fn test_system_directory_prefix_and_case() {
        assert!(is_system_directory(Path::new("/usr/local/share")));
        assert!(is_system_directory(Path::new("/ETC/nginx")));
        assert!(is_system_directory(Path::new("/usr/")));
        assert!(is_system_directory(Path::new("c:\\windows\\System32")));
        // textual prefix, not path-component prefix
        assert!(is_system_directory(Path::new("/binaries")));
    }

    #[test]
    fn test_root_is_not_a_prefix_rule() {
        assert!(!is_system_directory(Path::new("/home/user/Downloads")));
        assert!(!is_system_directory(Path::new("/tmp/organize-me")));
        assert!(!is_system_directory(Path::new("relative/dir")));
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_rejects_system_directory() {
        // /etc exists on every unix host; when not writable the writability
        // check fires first, otherwise the deny-list does.
        let err = validate_directory(Path::new("/etc")).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::SystemDirectory(_) | ValidationError::NotWritable(_)
        ));
    }
}
