//! Lexical dependency extraction for SystemVerilog/Verilog sources.
//!
//! No grammar is involved. Three patterns are scraped from the text:
//!
//! - `` `include "file.svh" `` records the included file's basename
//! - `pkg::item` records the package name
//! - `module_name [#(...)] instance_name (...);` records the module name,
//!   matched against a [`skeleton`] of the text so comments, strings and
//!   port maps cannot confuse it
//!
//! Callers go through [`DependencyExtractor`] so a real parser can replace
//! [`LexicalExtractor`] later.

mod keywords;
pub mod skeleton;

pub use keywords::is_keyword;

use crate::error::{MakedepError, Result};
use log::trace;
use rayon::prelude::*;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static INCLUDE_USE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"`include\s+["<]([\w/\.\d]+)[">]"#).unwrap());

static PACKAGE_USE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\w+)::([\*\w]+)").unwrap());

// Expects a skeleton, so parameter and port groups are already empty.
static MODULE_INSTANCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)\s+(?:#\s*\(\)\s*)?(\w+)\s*\(\)\s*;").unwrap()
});

/// Extracts the names a source file depends on.
///
/// Implementations must never report `module` itself.
pub trait DependencyExtractor: Send + Sync {
    /// Names referenced by `text`, the contents of `path` which defines `module`.
    fn extract(&self, path: &Path, module: &str, text: &str) -> BTreeSet<String>;
}

/// Dependencies of one file, split by how they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependencies {
    /// Basenames of `` `include``d files
    pub includes: BTreeSet<String>,
    /// Packages referenced through `::`
    pub packages: BTreeSet<String>,
    /// Instantiated modules
    pub instances: BTreeSet<String>,
}

impl Dependencies {
    /// Union of all three categories.
    pub fn all(&self) -> BTreeSet<String> {
        self.includes
            .iter()
            .chain(&self.packages)
            .chain(&self.instances)
            .cloned()
            .collect()
    }

    /// Whether nothing was found.
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.packages.is_empty() && self.instances.is_empty()
    }
}

/// One file to scan and the module it defines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanTarget {
    /// File to read
    pub path: PathBuf,
    /// Module name the file defines
    pub module: String,
}

/// Regex and skeleton based extractor.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalExtractor;

impl LexicalExtractor {
    /// Create the extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract dependencies of `module` from `text`, keeping the categories apart.
    pub fn extract_detailed(&self, module: &str, text: &str) -> Dependencies {
        let includes = INCLUDE_USE
            .captures_iter(text)
            .filter_map(|c| {
                Path::new(&c[1])
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .filter(|name| name != module)
            .collect();

        let packages = PACKAGE_USE
            .captures_iter(text)
            .map(|c| c[1].to_string())
            .filter(|name| name != module)
            .collect();

        let clean = skeleton::skeleton(text);
        let instances = MODULE_INSTANCE
            .captures_iter(&clean)
            .map(|c| c[1].to_string())
            .filter(|name| !is_keyword(name) && name != module)
            .collect();

        Dependencies {
            includes,
            packages,
            instances,
        }
    }

    /// Read and scan many files in parallel. Results keep the input order.
    pub fn scan_files(&self, targets: &[ScanTarget]) -> Vec<Result<Dependencies>> {
        targets
            .par_iter()
            .map(|target| {
                let bytes =
                    std::fs::read(&target.path).map_err(|e| MakedepError::io(&target.path, e))?;
                Ok(self.extract_detailed(&target.module, &String::from_utf8_lossy(&bytes)))
            })
            .collect()
    }
}

impl DependencyExtractor for LexicalExtractor {
    fn extract(&self, path: &Path, module: &str, text: &str) -> BTreeSet<String> {
        let deps = self.extract_detailed(module, text);
        trace!(
            "{}: {} includes, {} packages, {} instances",
            path.display(),
            deps.includes.len(),
            deps.packages.len(),
            deps.instances.len()
        );
        deps.all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(module: &str, text: &str) -> Vec<String> {
        LexicalExtractor::new()
            .extract(Path::new("test.sv"), module, text)
            .into_iter()
            .collect()
    }

    #[test]
    fn test_includes_use_basename() {
        let text = "`include \"common/defs.svh\"\n`include <types.vh>\nmodule top; endmodule";
        let deps = LexicalExtractor::new().extract_detailed("top", text);
        assert_eq!(
            deps.includes.into_iter().collect::<Vec<_>>(),
            vec!["defs.svh", "types.vh"]
        );
    }

    #[test]
    fn test_package_references() {
        let text = "import bus_pkg::*;\nlogic [cfg_pkg::W-1:0] d;";
        let deps = LexicalExtractor::new().extract_detailed("top", text);
        assert_eq!(
            deps.packages.into_iter().collect::<Vec<_>>(),
            vec!["bus_pkg", "cfg_pkg"]
        );
    }

    #[test]
    fn test_instances() {
        let text = r#"
module top (input logic clk);
    fifo #(.WIDTH(8), .DEPTH(16)) u_fifo (
        .clk(clk),
        .din(data[7:0])
    );
    ram u_ram (.clk(clk));
    sync_cell#(2) u_sync(.d(a), .q(b));
endmodule
"#;
        assert_eq!(extract("top", text), vec!["fifo", "ram", "sync_cell"]);
    }

    #[test]
    fn test_array_of_instances() {
        let text = "lane u_lane [3:0] (.d(d));";
        assert_eq!(extract("top", text), vec!["lane"]);
    }

    #[test]
    fn test_keywords_are_not_instances() {
        let text = "always_ff @(posedge clk) begin end\nassign x = y;\nfunction void f (); endfunction";
        assert!(extract("top", text).is_empty());
    }

    #[test]
    fn test_ignores_comments_and_strings() {
        let text = r#"
// fifo u_line ();
/* ram u_block (
   .clk(clk)); */
initial $display("rom u_str ();");
"#;
        assert!(extract("top", text).is_empty());
    }

    #[test]
    fn test_self_reference_is_filtered() {
        let text = "package top; endpackage\nlocalparam int W = top::WIDTH;\ntop u_rec ();";
        assert!(extract("top", text).is_empty());
    }

    #[test]
    fn test_union_of_categories() {
        let text = "`include \"defs.svh\"\nimport bus_pkg::*;\nfifo u_fifo ();";
        assert_eq!(extract("top", text), vec!["bus_pkg", "defs.svh", "fifo"]);
    }

    #[test]
    fn test_dependencies_all_and_empty() {
        let mut deps = Dependencies::default();
        assert!(deps.is_empty());
        deps.instances.insert("fifo".to_string());
        deps.packages.insert("fifo".to_string());
        assert_eq!(deps.all().len(), 1);
    }

    #[test]
    fn test_scan_files_keeps_order() {
        let dir = tempfile::TempDir::new().unwrap();
        let a = dir.path().join("a.sv");
        let b = dir.path().join("b.sv");
        std::fs::write(&a, "fifo u_fifo ();").unwrap();
        std::fs::write(&b, "import bus_pkg::*;").unwrap();

        let targets = vec![
            ScanTarget { path: a, module: "a".to_string() },
            ScanTarget { path: b, module: "b".to_string() },
            ScanTarget { path: dir.path().join("missing.sv"), module: "c".to_string() },
        ];
        let results = LexicalExtractor::new().scan_files(&targets);
        assert_eq!(results.len(), 3);
        assert!(results[0].as_ref().unwrap().instances.contains("fifo"));
        assert!(results[1].as_ref().unwrap().packages.contains("bus_pkg"));
        assert!(results[2].is_err());
    }
}
