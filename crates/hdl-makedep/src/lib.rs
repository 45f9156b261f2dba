//! # hdl-makedep
//!
//! Incremental make-depend generation for SystemVerilog and Verilog trees.
//!
//! ## Pipeline
//!
//! ```text
//! FileLister ──► FileIndex ─┐
//!                           ├─► Resolver ─┐
//! SubstitutionLoader ───────┘             ├─► FragmentWriter ─► <out>/<module>.<variant>.d
//!                     LexicalExtractor ───┘
//! ```
//!
//! - **Resolver**: module name to file, substitutions first, then basename
//!   convention over the index
//! - **Extractor**: includes, package references and instantiations scraped
//!   from text, no grammar
//! - **FragmentWriter**: depth-first walk writing one GNU make fragment per
//!   module and variant, each visited once per run
//!
//! ## Example
//!
//! ```rust,no_run
//! use hdl_makedep::{generate, MakedepConfig};
//!
//! let config = MakedepConfig::new("/work/src", "/work/build/deps", "top")
//!     .with_variant_list("sim,syn");
//! let report = generate(&config).unwrap();
//! println!("wrote {} fragments", report.fragments.len());
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod extractor;
pub mod fragment;
pub mod generate;
pub mod index;
pub mod listing;
pub mod resolver;
pub mod substitution;

// Re-export main types
pub use config::MakedepConfig;
pub use error::{MakedepError, Result};
pub use extractor::{DependencyExtractor, Dependencies, LexicalExtractor, ScanTarget};
pub use fragment::{
    DependencyRecord, FragmentWriter, FreshnessPolicy, SourceMtime, Staleness, TraversalContext,
    TrustExisting, WriteReport,
};
pub use generate::{generate, generate_with_index, load_substitutions};
pub use index::{FileIndex, SourceKind};
pub use listing::FileLister;
pub use resolver::{resolve, Resolution, Resolver};
pub use substitution::{SubstitutionLoader, SubstitutionSource, SubstitutionTable};
