//! Candidate file enumeration.
//!
//! Builds the [`FileIndex`] for a run from a source tree: every HDL source
//! and header under the root, minus ignored directories, plus whatever sits
//! directly in the extra directories (generated or vendored files).

use crate::config::{MakedepConfig, DEFAULT_IGNORE_FILE};
use crate::error::{MakedepError, Result};
use crate::index::{FileIndex, SourceKind};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Walks a source root and collects candidate files.
#[derive(Debug, Clone)]
pub struct FileLister {
    root: PathBuf,
    ignore_file: String,
    ignore_dirs: Vec<String>,
    extra_dirs: Vec<PathBuf>,
}

impl FileLister {
    /// Lister for `root` with the default ignore marker.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore_file: DEFAULT_IGNORE_FILE.to_string(),
            ignore_dirs: Vec::new(),
            extra_dirs: Vec::new(),
        }
    }

    /// Lister configured from a run configuration.
    pub fn from_config(config: &MakedepConfig) -> Self {
        Self::new(&config.source_root)
            .with_ignore_file(&config.ignore_file)
            .with_ignore_dirs(config.ignore_dirs.clone())
            .with_extra_dirs(config.extra_dirs.clone())
    }

    /// Directories holding a file with this name are pruned with their subtree.
    pub fn with_ignore_file(mut self, name: impl Into<String>) -> Self {
        self.ignore_file = name.into();
        self
    }

    /// Paths containing any of these strings are pruned.
    pub fn with_ignore_dirs(mut self, dirs: Vec<String>) -> Self {
        self.ignore_dirs = dirs;
        self
    }

    /// Directories whose files are appended without filtering.
    pub fn with_extra_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.extra_dirs = dirs;
        self
    }

    /// Enumerate files into an index of absolute paths.
    ///
    /// # Errors
    ///
    /// Fails if the root or an extra directory cannot be read. Unreadable
    /// entries below the root are skipped with a warning.
    pub fn list(&self) -> Result<FileIndex> {
        let root = fs::canonicalize(&self.root).map_err(|e| MakedepError::io(&self.root, e))?;
        let mut files = Vec::new();

        let walker = WalkDir::new(&root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| self.keep_entry(e));
        for entry in walker {
            match entry {
                Ok(entry) => {
                    if is_file_or_file_link(&entry) && SourceKind::from_path(entry.path()).is_hdl() {
                        files.push(entry.into_path());
                    }
                }
                Err(e) => warn!("Skipping unreadable entry: {e}"),
            }
        }

        for dir in &self.extra_dirs {
            let dir = fs::canonicalize(dir).map_err(|e| MakedepError::io(dir, e))?;
            let entries = fs::read_dir(&dir).map_err(|e| MakedepError::io(&dir, e))?;
            for entry in entries {
                let entry = entry.map_err(|e| MakedepError::io(&dir, e))?;
                if entry.path().is_file() {
                    files.push(entry.path());
                }
            }
        }

        let index = FileIndex::from_paths(files);
        info!("Indexed {} files under {}", index.len(), root.display());
        Ok(index)
    }

    fn keep_entry(&self, entry: &DirEntry) -> bool {
        let path = entry.path();
        if let Some(pattern) = self.ignored_by_pattern(path) {
            debug!("Pruning {} (matches {pattern})", path.display());
            return false;
        }
        if entry.file_type().is_dir() && path.join(&self.ignore_file).exists() {
            debug!("Pruning {} from file list", path.display());
            return false;
        }
        true
    }

    fn ignored_by_pattern(&self, path: &Path) -> Option<&str> {
        let text = path.to_string_lossy();
        self.ignore_dirs
            .iter()
            .map(String::as_str)
            .find(|pattern| !pattern.is_empty() && text.contains(pattern))
    }
}

// Directory links are not descended into, but links to files are listed.
fn is_file_or_file_link(entry: &DirEntry) -> bool {
    entry.file_type().is_file() || (entry.path_is_symlink() && entry.path().is_file())
}
