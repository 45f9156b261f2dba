//! Known source files and their classification.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Extensions of compilable HDL sources.
pub const SOURCE_EXTENSIONS: &[&str] = &["sv", "v"];

/// Extensions of HDL headers pulled in with `` `include ``.
pub const HEADER_EXTENSIONS: &[&str] = &["svh", "vh"];

/// What kind of file a module resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// `.sv` / `.v`
    Source,
    /// `.svh` / `.vh`
    Header,
    /// Anything else (netlists, IP descriptors, substituted blobs)
    Other,
}

impl SourceKind {
    /// Classify a path by its extension, ignoring ASCII case.
    pub fn from_path(path: &Path) -> Self {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return SourceKind::Other;
        };
        if SOURCE_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)) {
            SourceKind::Source
        } else if HEADER_EXTENSIONS.iter().any(|s| s.eq_ignore_ascii_case(ext)) {
            SourceKind::Header
        } else {
            SourceKind::Other
        }
    }

    /// Whether the lexical extractor should run on files of this kind.
    pub fn is_hdl(self) -> bool {
        matches!(self, SourceKind::Source | SourceKind::Header)
    }
}

/// Whether a module name refers to a header (`foo.svh`, `foo.vh`).
pub fn is_header_name(name: &str) -> bool {
    name.ends_with(".svh") || name.ends_with(".vh")
}

/// Deduplicated, sorted set of absolute candidate file paths.
///
/// Built once per run and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileIndex {
    paths: Vec<PathBuf>,
}

impl FileIndex {
    /// Build an index from candidate paths, dropping duplicates.
    pub fn from_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let unique: BTreeSet<PathBuf> = paths.into_iter().map(Into::into).collect();
        Self {
            paths: unique.into_iter().collect(),
        }
    }

    /// Number of files in the index.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the index holds no files.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate over all paths in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.paths.iter().map(PathBuf::as_path)
    }

    /// All paths whose string form contains `token`.
    pub fn matching(&self, token: &str) -> Vec<&Path> {
        self.iter()
            .filter(|p| p.to_string_lossy().contains(token))
            .collect()
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for FileIndex {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self::from_paths(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_classification() {
        assert_eq!(SourceKind::from_path(Path::new("/a/top.sv")), SourceKind::Source);
        assert_eq!(SourceKind::from_path(Path::new("/a/top.V")), SourceKind::Source);
        assert_eq!(SourceKind::from_path(Path::new("/a/defs.svh")), SourceKind::Header);
        assert_eq!(SourceKind::from_path(Path::new("/a/defs.vh")), SourceKind::Header);
        assert_eq!(SourceKind::from_path(Path::new("/a/ip.xci")), SourceKind::Other);
        assert_eq!(SourceKind::from_path(Path::new("/a/Makefile")), SourceKind::Other);
    }

    #[test]
    fn test_header_name() {
        assert!(is_header_name("defs.svh"));
        assert!(is_header_name("old.vh"));
        assert!(!is_header_name("fifo"));
        assert!(!is_header_name("fifo.sv"));
    }

    #[test]
    fn test_index_deduplicates_and_sorts() {
        let index = FileIndex::from_paths(["/r/b.sv", "/r/a.sv", "/r/b.sv"]);
        assert_eq!(index.len(), 2);
        let paths: Vec<_> = index.iter().collect();
        assert_eq!(paths, vec![Path::new("/r/a.sv"), Path::new("/r/b.sv")]);
    }

    #[test]
    fn test_matching() {
        let index: FileIndex = ["/r/fifo.sv", "/r/fifo_ctrl.sv", "/r/top.sv"]
            .into_iter()
            .collect();
        assert_eq!(index.matching("/fifo."), vec![Path::new("/r/fifo.sv")]);
        assert!(index.matching("/missing.").is_empty());
    }
}
