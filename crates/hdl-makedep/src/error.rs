//! Error types for hdl-makedep operations.
//!
//! Only conditions that abort a run are errors. Unresolved or ambiguous
//! module names are logged and the affected edge is dropped.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for hdl-makedep operations.
pub type Result<T> = std::result::Result<T, MakedepError>;

/// Fatal error raised while loading inputs or writing fragments.
#[derive(Error, Debug)]
pub enum MakedepError {
    /// A resolved source file could not be read, or a fragment could not be written
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File or directory the operation touched
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The requested top-level module maps to no file
    #[error("Could not find module {name}")]
    MissingRootModule {
        /// Name that failed to resolve
        name: String,
    },

    /// An override file is not valid YAML
    #[error("Failed to parse substitution file {path}: {source}")]
    Substitution {
        /// Override file
        path: PathBuf,
        /// Parser error
        #[source]
        source: serde_yml::Error,
    },

    /// An override file includes itself through its `include` chain
    #[error("Substitution file {path} includes itself")]
    SubstitutionCycle {
        /// First file seen twice on the include stack
        path: PathBuf,
    },

    /// Configuration rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MakedepError {
    /// Create an I/O error for the given path.
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
