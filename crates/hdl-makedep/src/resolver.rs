//! Module name to file path resolution.
//!
//! Substitutions always win. Otherwise a name is matched against the file
//! index by basename convention: `fifo` matches `.../fifo.sv` but not
//! `.../fifo_ctrl.sv`, while `defs.svh` is matched literally.

use crate::index::FileIndex;
use crate::substitution::SubstitutionTable;
use log::{trace, warn};
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

/// Outcome of resolving one module name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The module is backed by this file
    Found(PathBuf),
    /// A substitution excludes the module
    Excluded,
    /// No substitution and no matching file
    Unresolved,
}

impl Resolution {
    /// The resolved path, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Resolution::Found(path) => Some(path),
            Resolution::Excluded | Resolution::Unresolved => None,
        }
    }

    /// Consume into the resolved path, if any.
    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            Resolution::Found(path) => Some(path),
            Resolution::Excluded | Resolution::Unresolved => None,
        }
    }
}

/// Build the substring a matching index entry must contain.
///
/// Names without an extension get a trailing `.` so they only match whole
/// basenames.
pub fn match_token(name: &str) -> String {
    let mut token = format!("{MAIN_SEPARATOR}{name}");
    if !name.contains('.') {
        token.push('.');
    }
    token
}

/// Resolves module names over a file index and substitution table.
#[derive(Debug, Clone, Copy)]
pub struct Resolver<'a> {
    index: &'a FileIndex,
    substitutions: &'a SubstitutionTable,
}

impl<'a> Resolver<'a> {
    /// Create a resolver borrowing the run's index and substitutions.
    pub fn new(index: &'a FileIndex, substitutions: &'a SubstitutionTable) -> Self {
        Self {
            index,
            substitutions,
        }
    }

    /// Resolve `name`.
    ///
    /// When several index entries match, a warning lists them all and the
    /// shortest path wins, ties broken lexicographically.
    pub fn resolve(&self, name: &str) -> Resolution {
        if let Some(sub) = self.substitutions.get(name) {
            trace!("{name} resolved by substitution");
            return match sub {
                Some(path) => Resolution::Found(path.to_path_buf()),
                None => Resolution::Excluded,
            };
        }

        let token = match_token(name);
        let matches = self.index.matching(&token);
        if matches.len() > 1 {
            let listed: Vec<String> = matches.iter().map(|p| p.display().to_string()).collect();
            warn!(
                "Found multiple file entries for {name}: {}",
                listed.join(" : ")
            );
        }

        matches
            .into_iter()
            .min_by(|a, b| {
                let (a, b) = (a.as_os_str(), b.as_os_str());
                a.len().cmp(&b.len()).then_with(|| a.cmp(b))
            })
            .map(|p| Resolution::Found(p.to_path_buf()))
            .unwrap_or(Resolution::Unresolved)
    }
}

/// Resolve `name` against `index` and `substitutions`.
pub fn resolve(name: &str, index: &FileIndex, substitutions: &SubstitutionTable) -> Option<PathBuf> {
    Resolver::new(index, substitutions).resolve(name).into_path()
}
