//! Recursive vault directory walker.

use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Debug, Error)]
pub enum VaultWalkerError {
    #[error("vault root does not exist: {0}")]
    MissingRoot(String),

    #[error("failed to walk vault directory {0}: {1}")]
    WalkError(String, #[source] walkdir::Error),
}

/// Information about a discovered note file.
#[derive(Debug, Clone)]
pub struct WalkedFile {
    /// Absolute path to the file.
    pub absolute_path: PathBuf,
    /// Path relative to vault root.
    pub relative_path: PathBuf,
}

impl WalkedFile {
    /// Relative path with `/` separators, as used for note paths.
    pub fn note_path(&self) -> String {
        self.relative_path.to_string_lossy().replace('\\', "/")
    }
}

/// Note texts read from a vault, ready for hydration.
#[derive(Debug, Default)]
pub struct SourceFiles {
    /// `(note path, text)` pairs ordered by path.
    pub files: Vec<(String, String)>,
    /// Files that were found but could not be read.
    pub skipped: usize,
}

/// Walker for discovering note files in a vault.
#[derive(Debug)]
pub struct VaultWalker {
    root: PathBuf,
    /// Folders to exclude from walking (relative paths from vault root).
    excluded_folders: Vec<PathBuf>,
    /// Lowercase file extensions (without the dot) treated as notes.
    extensions: Vec<String>,
}

impl VaultWalker {
    /// Create a new walker for the given vault root.
    pub fn new(root: &Path) -> Result<Self, VaultWalkerError> {
        Self::with_exclusions(root, Vec::new())
    }

    /// Create a new walker with folder exclusions.
    ///
    /// Excluded folders can be specified as:
    /// - Relative paths from vault root (e.g., "archive/old")
    /// - Absolute paths (will be converted to relative)
    pub fn with_exclusions(
        root: &Path,
        excluded_folders: Vec<PathBuf>,
    ) -> Result<Self, VaultWalkerError> {
        let root = root
            .canonicalize()
            .map_err(|_| VaultWalkerError::MissingRoot(root.display().to_string()))?;

        let excluded_folders = excluded_folders
            .into_iter()
            .map(|p| {
                if p.is_absolute() {
                    p.strip_prefix(&root).unwrap_or(&p).to_path_buf()
                } else {
                    p
                }
            })
            .collect();

        Ok(Self {
            root,
            excluded_folders,
            extensions: vec!["md".to_string(), "markdown".to_string()],
        })
    }

    /// Also treat files with `extension` as notes.
    pub fn with_extension(mut self, extension: &str) -> Self {
        let ext = extension.trim_start_matches('.').to_lowercase();
        if !ext.is_empty() && !self.extensions.contains(&ext) {
            self.extensions.push(ext);
        }
        self
    }

    /// Walk the vault and return all note files, sorted by relative path.
    /// Excludes hidden directories, common non-vault directories, and configured exclusions.
    pub fn walk(&self) -> Result<Vec<WalkedFile>, VaultWalkerError> {
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| !self.is_excluded(e))
        {
            let entry = entry.map_err(|e| {
                VaultWalkerError::WalkError(self.root.display().to_string(), e)
            })?;

            let path = entry.path();
            if !entry.file_type().is_file() || !self.is_note_file(path) {
                continue;
            }

            let relative_path =
                path.strip_prefix(&self.root).unwrap_or(path).to_path_buf();

            files.push(WalkedFile { absolute_path: path.to_path_buf(), relative_path });
        }

        files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(files)
    }

    /// Walk the vault and read every note file.
    ///
    /// Unreadable files are skipped with a warning. Invalid UTF-8 is decoded
    /// lossily so the note still exists for resolution.
    pub fn read_sources(&self) -> Result<SourceFiles, VaultWalkerError> {
        let mut sources = SourceFiles::default();

        for file in self.walk()? {
            match std::fs::read(&file.absolute_path) {
                Ok(bytes) => {
                    let text = String::from_utf8(bytes).unwrap_or_else(|e| {
                        tracing::debug!(
                            "Decoding {} lossily: {}",
                            file.absolute_path.display(),
                            e.utf8_error()
                        );
                        String::from_utf8_lossy(e.as_bytes()).into_owned()
                    });
                    sources.files.push((file.note_path(), text));
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", file.absolute_path.display(), e);
                    sources.skipped += 1;
                }
            }
        }

        Ok(sources)
    }

    /// Check if an entry should be excluded from walking.
    fn is_excluded(&self, entry: &walkdir::DirEntry) -> bool {
        // Never filter the root directory (depth 0)
        if entry.depth() == 0 {
            return false;
        }

        let name = entry.file_name().to_string_lossy();

        if name.starts_with('.') {
            return true;
        }

        if matches!(name.as_ref(), "node_modules" | "target" | "__pycache__" | "venv") {
            return true;
        }

        if !self.excluded_folders.is_empty()
            && let Ok(relative) = entry.path().strip_prefix(&self.root)
        {
            return self.excluded_folders.iter().any(|excluded| relative.starts_with(excluded));
        }

        false
    }

    fn is_note_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.iter().any(|ext| ext.eq_ignore_ascii_case(e)))
    }

    /// Get the vault root path.
    pub fn root(&self) -> &Path {
        &self.root
    }
}
