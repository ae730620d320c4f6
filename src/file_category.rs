//! Extension-based file categorization.
//!
//! Files are classified purely by the extension of their name against a fixed,
//! ordered taxonomy. The first category whose extension set contains the
//! extension wins; anything unlisted lands in [`Category::Others`].
//!
//! # Examples
//!
//! ```
//! use smart_organizer::file_category::{Category, FileMapper};
//!
//! let mapper = FileMapper::default();
//! assert_eq!(mapper.categorize(".pdf"), Category::Documents);
//! assert_eq!(mapper.categorize(".JPG"), Category::Images);
//! assert_eq!(mapper.categorize(".unknown"), Category::Others);
//! ```

use std::collections::HashSet;
use std::fmt;

/// Label given to subfolders found during a scan. Never a move destination.
pub const SUBFOLDER_CATEGORY: &str = "Subfolder";

/// A destination bucket for files.
///
/// The derived ordering follows the taxonomy order, with `Others` last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Text documents, office files and spreadsheets
    Documents,
    /// Raster and vector images
    Images,
    /// Video containers
    Videos,
    /// Audio files
    Audio,
    /// Compressed archives and disk images
    Archives,
    /// Source code and markup
    CodeFiles,
    /// Catch-all for unlisted extensions
    Others,
}

impl Category {
    /// Every category, in taxonomy order.
    pub const ALL: [Category; 7] = [
        Category::Documents,
        Category::Images,
        Category::Videos,
        Category::Audio,
        Category::Archives,
        Category::CodeFiles,
        Category::Others,
    ];

    /// Returns the name of the folder files of this category are moved into.
    ///
    /// # Examples
    ///
    /// ```
    /// use smart_organizer::file_category::Category;
    ///
    /// assert_eq!(Category::Images.dir_name(), "Images");
    /// assert_eq!(Category::CodeFiles.dir_name(), "Code Files");
    /// assert_eq!(Category::Others.dir_name(), "Others");
    /// ```
    pub fn dir_name(&self) -> &'static str {
        match self {
            Category::Documents => "Documents",
            Category::Images => "Images",
            Category::Videos => "Videos",
            Category::Audio => "Audio",
            Category::Archives => "Archives",
            Category::CodeFiles => "Code Files",
            Category::Others => "Others",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// The compiled-in taxonomy. Order matters: lookups take the first match.
pub const STANDARD_TAXONOMY: &[(Category, &[&str])] = &[
    (
        Category::Documents,
        &[
            ".pdf", ".doc", ".docx", ".txt", ".rtf", ".odt", ".xls", ".xlsx", ".ppt", ".pptx",
            ".csv",
        ],
    ),
    (
        Category::Images,
        &[
            ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".tiff", ".ico", ".heic",
        ],
    ),
    (
        Category::Videos,
        &[
            ".mp4", ".avi", ".mkv", ".mov", ".wmv", ".flv", ".webm", ".m4v", ".mpg", ".mpeg",
        ],
    ),
    (
        Category::Audio,
        &[
            ".mp3", ".wav", ".flac", ".aac", ".ogg", ".wma", ".m4a", ".opus", ".aiff",
        ],
    ),
    (
        Category::Archives,
        &[".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".xz", ".iso"],
    ),
    (
        Category::CodeFiles,
        &[
            ".py", ".js", ".html", ".css", ".java", ".cpp", ".c", ".h", ".php", ".rb", ".go",
            ".rs", ".swift", ".kt", ".scala",
        ],
    ),
];

/// Maps file extensions to categories using an ordered taxonomy.
///
/// The taxonomy is fixed at construction and never mutated afterwards, so a
/// mapper can be shared freely between the scanner and any caller.
#[derive(Debug, Clone)]
pub struct FileMapper {
    taxonomy: Vec<(Category, HashSet<String>)>,
}

impl FileMapper {
    /// Creates a mapper with the standard taxonomy.
    pub fn new() -> Self {
        Self::with_taxonomy(STANDARD_TAXONOMY)
    }

    /// Creates a mapper from an explicit ordered table of
    /// `(category, extensions)` pairs. Extensions are normalized to lowercase
    /// with a leading dot.
    pub fn with_taxonomy(table: &[(Category, &[&str])]) -> Self {
        let taxonomy = table
            .iter()
            .map(|(category, extensions)| {
                let set = extensions.iter().map(|ext| normalize_extension(ext)).collect();
                (*category, set)
            })
            .collect();
        Self { taxonomy }
    }

    /// Returns the category for an extension (leading dot expected, any case).
    ///
    /// An empty extension, or one no category lists, maps to `Others`.
    ///
    /// # Examples
    ///
    /// ```
    /// use smart_organizer::file_category::{Category, FileMapper};
    ///
    /// let mapper = FileMapper::default();
    /// assert_eq!(mapper.categorize(".rs"), Category::CodeFiles);
    /// assert_eq!(mapper.categorize(""), Category::Others);
    /// ```
    pub fn categorize(&self, extension: &str) -> Category {
        if extension.is_empty() {
            return Category::Others;
        }
        let extension = normalize_extension(extension);
        self.taxonomy
            .iter()
            .find(|(_, extensions)| extensions.contains(&extension))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Others)
    }

    /// Returns the extensions listed for a category, sorted. Empty for `Others`.
    pub fn extensions_for(&self, category: Category) -> Vec<&str> {
        let mut extensions: Vec<&str> = self
            .taxonomy
            .iter()
            .filter(|(c, _)| *c == category)
            .flat_map(|(_, set)| set.iter().map(String::as_str))
            .collect();
        extensions.sort_unstable();
        extensions
    }
}

impl Default for FileMapper {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_extension(ext: &str) -> String {
    let lower = ext.to_lowercase();
    if lower.starts_with('.') {
        lower
    } else {
        format!(".{}", lower)
    }
}
