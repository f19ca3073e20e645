use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

const EXCLUDE_MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Kind of document, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// Markdown or plain text
    Plain,
    /// JSON
    Structured,
}

impl DocumentKind {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        match path.as_ref().extension() {
            Some(ext) if ext.to_string_lossy().eq_ignore_ascii_case("json") => DocumentKind::Structured,
            _ => DocumentKind::Plain,
        }
    }
}

/// Compiled exclusion pattern.
///
/// `**` matches across directories, `*` within one path component and `?`
/// a single character. Patterns are matched against the whole path
/// relative to the run root, using forward slashes.
#[derive(Debug, Clone)]
pub struct ExcludePattern {
    pattern: Pattern,
}

impl ExcludePattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Pattern::new(pattern)
            .with_context(|| format!("Invalid exclude pattern: {}", pattern))?;
        Ok(Self { pattern })
    }

    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn matches(&self, relative_path: &str) -> bool {
        self.pattern.matches_with(relative_path, EXCLUDE_MATCH_OPTIONS)
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().is_dir()
    }

    /// Find documents under `root` with one of `extensions`, skipping any
    /// whose root-relative path matches an exclusion. Results are sorted.
    pub fn find_documents<P: AsRef<Path>>(
        root: P,
        extensions: &[String],
        exclude_patterns: &[String],
    ) -> Result<Vec<PathBuf>> {
        let root = root.as_ref();
        let excludes = exclude_patterns
            .iter()
            .map(|p| ExcludePattern::new(p))
            .collect::<Result<Vec<_>>>()?;

        let mut result = Vec::new();
        for entry in WalkDir::new(root).follow_links(true).sort_by_file_name() {
            let entry = entry.context("Failed to read directory entry")?;
            let path = entry.path();
            if !path.is_file() || !Self::has_extension(path, extensions) {
                continue;
            }

            let relative = crate::partition::normalize_path(path, root);
            if excludes.iter().any(|p| p.matches(&relative)) {
                continue;
            }
            result.push(path.to_path_buf());
        }

        result.sort();
        Ok(result)
    }

    /// Case-insensitive extension check; a leading dot in `extensions` is ignored
    pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
        let Some(ext) = path.extension() else {
            return false;
        };
        let ext = ext.to_string_lossy();
        extensions
            .iter()
            .any(|wanted| ext.eq_ignore_ascii_case(wanted.trim_start_matches('.')))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write a string to a file
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(&path, content)
            .with_context(|| format!("Failed to write to file: {:?}", path.as_ref()))
    }
}
