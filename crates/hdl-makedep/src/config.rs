//! Run configuration.

use crate::error::{MakedepError, Result};
use crate::fragment::Staleness;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default name of the marker file that excludes a directory from the index.
pub const DEFAULT_IGNORE_FILE: &str = ".ignore_build_system";

/// Configuration for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MakedepConfig {
    /// Source root; relative override paths are joined to it
    pub source_root: PathBuf,

    /// Directory receiving the fragment files
    pub output_dir: PathBuf,

    /// Output variant names, one fragment per module per variant
    pub variants: Vec<String>,

    /// Module to start from
    pub root_module: String,

    /// Override sources: `name:path` pairs or YAML files, later ones win
    #[serde(default)]
    pub substitutions: Vec<String>,

    /// Directories containing a file with this name are left out of the index
    #[serde(default = "default_ignore_file")]
    pub ignore_file: String,

    /// Paths containing any of these strings are left out of the index
    #[serde(default)]
    pub ignore_dirs: Vec<String>,

    /// Extra directories whose files are added to the index (not recursive)
    #[serde(default)]
    pub extra_dirs: Vec<PathBuf>,

    /// When an existing fragment may be reused
    #[serde(default)]
    pub staleness: Staleness,
}

fn default_ignore_file() -> String {
    DEFAULT_IGNORE_FILE.to_string()
}

impl MakedepConfig {
    /// Create a config with the required settings and defaults for the rest.
    pub fn new(
        source_root: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        root_module: impl Into<String>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            output_dir: output_dir.into(),
            variants: Vec::new(),
            root_module: root_module.into(),
            substitutions: Vec::new(),
            ignore_file: default_ignore_file(),
            ignore_dirs: Vec::new(),
            extra_dirs: Vec::new(),
            staleness: Staleness::default(),
        }
    }

    /// Set the variants from a comma separated list such as `sim,syn`
    pub fn with_variant_list(mut self, list: &str) -> Self {
        self.variants = list
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(String::from)
            .collect();
        self
    }

    /// Set the override sources
    pub fn with_substitutions(mut self, sources: Vec<String>) -> Self {
        self.substitutions = sources;
        self
    }

    /// Set the ignored directory patterns
    pub fn with_ignore_dirs(mut self, dirs: Vec<String>) -> Self {
        self.ignore_dirs = dirs;
        self
    }

    /// Set the extra directories
    pub fn with_extra_dirs(mut self, dirs: Vec<PathBuf>) -> Self {
        self.extra_dirs = dirs;
        self
    }

    /// Set the freshness policy
    pub fn with_staleness(mut self, staleness: Staleness) -> Self {
        self.staleness = staleness;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.variants.is_empty() {
            return Err(MakedepError::invalid_config(
                "at least one output variant is required",
            ));
        }

        if let Some(bad) = self
            .variants
            .iter()
            .find(|v| v.contains(['/', '\\']) || v.chars().any(char::is_whitespace))
        {
            return Err(MakedepError::invalid_config(format!(
                "variant name '{bad}' must not contain path separators or whitespace"
            )));
        }

        if self.root_module.trim().is_empty() {
            return Err(MakedepError::invalid_config("root module name is empty"));
        }

        if self.ignore_file.is_empty() {
            return Err(MakedepError::invalid_config("ignore file name is empty"));
        }

        Ok(())
    }
}
