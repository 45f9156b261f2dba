//! Module substitution table and its YAML loader.
//!
//! A substitution overrides convention-based resolution: it pins a module
//! name to a specific file, or marks the module as excluded so every edge to
//! it is dropped.
//!
//! Sources are either direct `name:path` entries or YAML override files:
//!
//! ```yaml
//! include:
//!   - common/subs.yml
//! fifo: vendor/fifo_xilinx.sv
//! debug_core:
//! ```
//!
//! Files listed under the reserved `include` key are loaded first, depth-first,
//! and the including file's own entries override theirs. All paths in the
//! files are relative to the source root.

use crate::error::{MakedepError, Result};
use log::{debug, trace};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Reserved YAML key listing further override files.
pub const INCLUDE_KEY: &str = "include";

/// Merged override table: module name to path, `None` meaning excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionTable {
    entries: BTreeMap<String, Option<PathBuf>>,
}

impl SubstitutionTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry. `None` excludes the module.
    pub fn insert(&mut self, module: impl Into<String>, path: Option<PathBuf>) {
        self.entries.insert(module.into(), path);
    }

    /// Look up a module. The outer `Option` is whether an entry exists.
    pub fn get(&self, module: &str) -> Option<Option<&Path>> {
        self.entries.get(module).map(|p| p.as_deref())
    }

    /// Whether the module has an entry.
    pub fn contains(&self, module: &str) -> bool {
        self.entries.contains_key(module)
    }

    /// Merge another table in; its entries win on conflict.
    pub fn extend(&mut self, other: SubstitutionTable) {
        self.entries.extend(other.entries);
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries sorted by module name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&Path>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }
}

/// One entry of the override source list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubstitutionSource {
    /// `name:path`; an empty path excludes the module
    Direct {
        /// Module name
        module: String,
        /// Path relative to the source root, `None` when excluded
        path: Option<String>,
    },
    /// YAML override file
    File(PathBuf),
}

impl SubstitutionSource {
    /// Parse one entry. Anything containing a colon is a direct pair, split on
    /// the first colon.
    pub fn parse(entry: &str) -> Self {
        match entry.split_once(':') {
            Some((module, path)) => {
                let path = path.trim();
                SubstitutionSource::Direct {
                    module: module.trim().to_string(),
                    path: (!path.is_empty()).then(|| path.to_string()),
                }
            }
            None => SubstitutionSource::File(PathBuf::from(entry.trim())),
        }
    }

    /// Parse a whitespace-separated list, as passed through a make variable.
    /// Quote characters are stripped first.
    pub fn parse_list(list: &str) -> Vec<Self> {
        list.replace(['"', '\''], "")
            .split_whitespace()
            .map(Self::parse)
            .collect()
    }
}

// `include` is the only reserved key; every other key is a module.
#[derive(Debug, Default, Deserialize)]
struct OverrideFile {
    #[serde(default)]
    include: Vec<PathBuf>,
    #[serde(flatten)]
    entries: BTreeMap<String, Option<String>>,
}

/// Loads and merges override sources relative to a source root.
pub struct SubstitutionLoader {
    base: PathBuf,
    // Files currently being loaded, for include cycle detection
    stack: Vec<PathBuf>,
}

impl SubstitutionLoader {
    /// Create a loader resolving paths against `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            stack: Vec::new(),
        }
    }

    /// Merge all sources in order; later sources override earlier ones.
    ///
    /// # Errors
    ///
    /// Fails if an override file cannot be read or parsed, or if its include
    /// chain loops back on itself.
    pub fn load(&mut self, sources: &[SubstitutionSource]) -> Result<SubstitutionTable> {
        let mut table = SubstitutionTable::new();
        for source in sources {
            match source {
                SubstitutionSource::Direct { module, path } => {
                    debug!("Direct subs {module}: {}", path.as_deref().unwrap_or(""));
                    table.insert(module.clone(), self.full_path(path.as_deref()));
                }
                SubstitutionSource::File(path) => {
                    let nested = self.load_file(path)?;
                    table.extend(nested);
                }
            }
        }
        Ok(table)
    }

    /// Load one YAML override file together with everything it includes.
    pub fn load_file(&mut self, path: &Path) -> Result<SubstitutionTable> {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if self.stack.contains(&key) {
            return Err(MakedepError::SubstitutionCycle {
                path: path.to_path_buf(),
            });
        }

        trace!("Loading substitution file {}", path.display());
        let text = fs::read_to_string(path).map_err(|e| MakedepError::io(path, e))?;
        let parsed: OverrideFile = if text.trim().is_empty() {
            OverrideFile::default()
        } else {
            serde_yml::from_str(&text).map_err(|source| MakedepError::Substitution {
                path: path.to_path_buf(),
                source,
            })?
        };

        self.stack.push(key);
        let mut table = SubstitutionTable::new();
        for include in &parsed.include {
            let nested = self.base.join(include);
            match self.load_file(&nested) {
                Ok(t) => table.extend(t),
                Err(e) => {
                    self.stack.pop();
                    return Err(e);
                }
            }
        }
        self.stack.pop();

        for (module, file) in parsed.entries {
            debug!(
                "{} subbed {module}: {}",
                path.display(),
                file.as_deref().unwrap_or("")
            );
            table.insert(module.trim(), self.full_path(file.as_deref()));
        }
        Ok(table)
    }

    fn full_path(&self, path: Option<&str>) -> Option<PathBuf> {
        path.map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| self.base.join(p))
    }
}

/// Load a substitution table from `sources`, resolving paths against `base`.
pub fn load(sources: &[SubstitutionSource], base: &Path) -> Result<SubstitutionTable> {
    SubstitutionLoader::new(base).load(sources)
}
