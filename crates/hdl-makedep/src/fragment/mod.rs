//! Recursive fragment generation.
//!
//! [`FragmentWriter::write`] starts at a root module and walks its
//! dependencies depth first. Every module reached gets one fragment per output
//! variant at `<out_dir>/<module>.<variant>.d`. A module is visited at most
//! once per run, and a dependency whose fragment the [`FreshnessPolicy`]
//! trusts is not descended into at all.
//!
//! Edges that would close a cycle on the active recursion path are dropped
//! and reported, so the generated make rules stay acyclic.

mod cache;
mod render;

pub use cache::{FreshnessPolicy, SourceMtime, Staleness, TrustExisting};
pub use render::{DependencyRecord, RecordBuilder, DEP_DIR_VAR, FRAGMENT_EXTENSION};

use crate::error::{MakedepError, Result};
use crate::extractor::{DependencyExtractor, LexicalExtractor};
use crate::index::SourceKind;
use crate::resolver::{Resolution, Resolver};
use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Summary of one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteReport {
    /// Root module
    pub root: String,
    /// Modules whose fragments were written, in write order
    pub modules: Vec<String>,
    /// Every fragment file written
    pub fragments: Vec<PathBuf>,
    /// Dependencies whose existing fragment was trusted
    pub reused: BTreeSet<String>,
    /// Names that resolved to no file
    pub unresolved: BTreeSet<String>,
    /// Names excluded by substitution
    pub excluded: BTreeSet<String>,
    /// Dropped back edges, each as the cycle path ending in the repeated module
    pub cycles: Vec<Vec<String>>,
}

/// State of one top-level run, threaded through the recursion.
#[derive(Debug, Default)]
pub struct TraversalContext {
    visited: HashSet<String>,
    active: Vec<String>,
    report: WriteReport,
}

impl TraversalContext {
    /// Fresh context for a run rooted at `root`.
    pub fn new(root: &str) -> Self {
        let mut ctx = Self::default();
        ctx.report.root = root.to_string();
        ctx.visited.insert(root.to_string());
        ctx
    }

    /// Whether `module` has been claimed by this run.
    pub fn is_visited(&self, module: &str) -> bool {
        self.visited.contains(module)
    }

    /// Claim `module`. Returns `false` if it was already claimed.
    pub fn mark_visited(&mut self, module: &str) -> bool {
        self.visited.insert(module.to_string())
    }

    /// The cycle `module` would close, if it is on the active path.
    fn cycle_through(&self, module: &str) -> Option<Vec<String>> {
        let start = self.active.iter().position(|m| m == module)?;
        let mut cycle = self.active[start..].to_vec();
        cycle.push(module.to_string());
        Some(cycle)
    }

    /// Finish the run and take its report.
    pub fn into_report(self) -> WriteReport {
        self.report
    }
}

/// Writes make fragments for a module and everything it depends on.
pub struct FragmentWriter<'a> {
    resolver: Resolver<'a>,
    extractor: Box<dyn DependencyExtractor>,
    freshness: Box<dyn FreshnessPolicy>,
    variants: Vec<String>,
    out_dir: PathBuf,
}

impl<'a> FragmentWriter<'a> {
    /// Create a writer using the lexical extractor and trusting existing fragments.
    ///
    /// `variants` must not be empty; the first one is used for freshness checks.
    pub fn new(resolver: Resolver<'a>, out_dir: impl Into<PathBuf>, variants: Vec<String>) -> Self {
        Self {
            resolver,
            extractor: Box::new(LexicalExtractor::new()),
            freshness: Box::new(TrustExisting),
            variants,
            out_dir: out_dir.into(),
        }
    }

    /// Replace the dependency extractor.
    pub fn with_extractor(mut self, extractor: Box<dyn DependencyExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Replace the freshness policy.
    pub fn with_freshness(mut self, freshness: Box<dyn FreshnessPolicy>) -> Self {
        self.freshness = freshness;
        self
    }

    /// Output variants, in order.
    pub fn variants(&self) -> &[String] {
        &self.variants
    }

    /// Variant whose fragment decides freshness.
    fn first_variant(&self) -> Result<&str> {
        self.variants
            .first()
            .map(String::as_str)
            .ok_or_else(|| MakedepError::invalid_config("no output variants"))
    }

    /// Path of the fragment for `module` and `variant`.
    pub fn fragment_path(&self, module: &str, variant: &str) -> PathBuf {
        self.out_dir
            .join(format!("{module}.{variant}.{FRAGMENT_EXTENSION}"))
    }

    /// Generate fragments for `root` and its transitive dependencies.
    ///
    /// The root's own fragments are always rewritten.
    ///
    /// # Errors
    ///
    /// Returns [`MakedepError::MissingRootModule`] if `root` does not resolve
    /// and [`MakedepError::Io`] if a source cannot be read or a fragment cannot
    /// be written. Nothing written before the failure is rolled back.
    pub fn write(&self, root: &str) -> Result<WriteReport> {
        self.first_variant()?;
        let path = match self.resolver.resolve(root) {
            Resolution::Found(path) => path,
            Resolution::Excluded | Resolution::Unresolved => {
                return Err(MakedepError::MissingRootModule {
                    name: root.to_string(),
                })
            }
        };

        fs::create_dir_all(&self.out_dir).map_err(|e| MakedepError::io(&self.out_dir, e))?;

        let mut ctx = TraversalContext::new(root);
        self.write_module(root, &path, &mut ctx)?;
        info!(
            "Processed dependencies for {root}, wrote {} fragments to {}",
            ctx.report.fragments.len(),
            self.out_dir.display()
        );
        Ok(ctx.into_report())
    }

    /// Write fragments for `name`, already resolved to `path`, recursing into
    /// its dependencies first.
    ///
    /// # Errors
    ///
    /// Returns [`MakedepError::InvalidConfig`] if the writer has no variants.
    pub fn write_module(&self, name: &str, path: &Path, ctx: &mut TraversalContext) -> Result<()> {
        let first_variant = self.first_variant()?;
        info!("{name}");
        let bytes = fs::read(path).map_err(|e| MakedepError::io(path, e))?;
        let text = String::from_utf8_lossy(&bytes);

        let deps = if SourceKind::from_path(path).is_hdl() {
            self.extractor.extract(path, name, &text)
        } else {
            BTreeSet::new()
        };
        debug!("Processing dependencies for {name}: {deps:?}");

        let mut builder = RecordBuilder::new(name, path, &self.variants);
        ctx.active.push(name.to_string());
        for dep in deps {
            if let Some(cycle) = ctx.cycle_through(&dep) {
                warn!(
                    "Dependency cycle {}, dropping edge {name} -> {dep}",
                    cycle.join(" -> ")
                );
                ctx.report.cycles.push(cycle);
                continue;
            }

            let dep_path = match self.resolver.resolve(&dep) {
                Resolution::Found(p) => p,
                Resolution::Excluded => {
                    debug!("Dropping {dep} from {name}, excluded by substitution");
                    ctx.report.excluded.insert(dep);
                    continue;
                }
                Resolution::Unresolved => {
                    debug!("Dropping {dep} from {name}, no matching file");
                    ctx.report.unresolved.insert(dep);
                    continue;
                }
            };
            builder.add_dependency(&dep);

            if ctx.is_visited(&dep) {
                trace!("End recursion for {dep}, already seen");
                continue;
            }
            let fragment = self.fragment_path(&dep, first_variant);
            if self.freshness.is_fresh(&fragment, &dep_path) {
                debug!("End recursion for {dep}, already exists");
                ctx.report.reused.insert(dep);
                continue;
            }
            ctx.mark_visited(&dep);
            if let Err(e) = self.write_module(&dep, &dep_path, ctx) {
                ctx.active.pop();
                return Err(e);
            }
        }
        ctx.active.pop();

        for record in builder.build() {
            let fragment = self.fragment_path(name, &record.variant);
            fs::write(&fragment, record.render()).map_err(|e| MakedepError::io(&fragment, e))?;
            trace!("Wrote {}", fragment.display());
            ctx.report.fragments.push(fragment);
        }
        ctx.report.modules.push(name.to_string());
        Ok(())
    }
}
