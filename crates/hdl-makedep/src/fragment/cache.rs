//! Freshness policies for fragments already on disk.
//!
//! An existing fragment that is considered fresh stops the recursion at that
//! module; its subtree is neither re-scanned nor rewritten.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Decides whether an existing fragment may be trusted.
pub trait FreshnessPolicy: Send + Sync {
    /// Whether `fragment`, generated from `source`, can be reused as is.
    fn is_fresh(&self, fragment: &Path, source: &Path) -> bool;
}

/// Any existing fragment is trusted. Stale fragments must be removed by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrustExisting;

impl FreshnessPolicy for TrustExisting {
    fn is_fresh(&self, fragment: &Path, _source: &Path) -> bool {
        fragment.exists()
    }
}

/// A fragment is fresh when it is at least as new as its source file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceMtime;

impl FreshnessPolicy for SourceMtime {
    fn is_fresh(&self, fragment: &Path, source: &Path) -> bool {
        let modified = |p: &Path| fs::metadata(p).and_then(|m| m.modified()).ok();
        match (modified(fragment), modified(source)) {
            (Some(fragment), Some(source)) => fragment >= source,
            _ => false,
        }
    }
}

/// Selectable freshness policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Staleness {
    /// [`TrustExisting`]
    #[default]
    Existing,
    /// [`SourceMtime`]
    Mtime,
}

impl Staleness {
    /// Instantiate the policy.
    pub fn policy(self) -> Box<dyn FreshnessPolicy> {
        match self {
            Staleness::Existing => Box::new(TrustExisting),
            Staleness::Mtime => Box::new(SourceMtime),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn set_mtime(path: &Path, time: SystemTime) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    #[test]
    fn test_trust_existing() {
        let dir = TempDir::new().unwrap();
        let fragment = dir.path().join("fifo.sim.d");
        let source = dir.path().join("fifo.sv");
        assert!(!TrustExisting.is_fresh(&fragment, &source));

        fs::write(&fragment, "").unwrap();
        assert!(TrustExisting.is_fresh(&fragment, &source));
    }

    #[test]
    fn test_source_mtime() {
        let dir = TempDir::new().unwrap();
        let fragment = dir.path().join("fifo.sim.d");
        let source = dir.path().join("fifo.sv");
        fs::write(&fragment, "").unwrap();
        fs::write(&source, "").unwrap();

        let now = SystemTime::now();
        set_mtime(&source, now - Duration::from_secs(60));
        set_mtime(&fragment, now);
        assert!(SourceMtime.is_fresh(&fragment, &source));

        set_mtime(&fragment, now - Duration::from_secs(120));
        assert!(!SourceMtime.is_fresh(&fragment, &source));
    }

    #[test]
    fn test_source_mtime_missing_fragment() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("fifo.sv");
        fs::write(&source, "").unwrap();
        assert!(!SourceMtime.is_fresh(&dir.path().join("fifo.sim.d"), &source));
    }

    #[test]
    fn test_staleness_serde_names() {
        let parsed: Staleness = serde_json::from_str("\"mtime\"").unwrap();
        assert_eq!(parsed, Staleness::Mtime);
        assert_eq!(serde_json::to_string(&Staleness::Existing).unwrap(), "\"existing\"");
    }
}
