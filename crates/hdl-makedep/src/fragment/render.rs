//! Make fragment text.

use crate::index::is_header_name;
use std::path::Path;

/// Make variable holding the fragment and object directory.
pub const DEP_DIR_VAR: &str = "$(DEP_DIR)";

/// Extension of written fragment files.
pub const FRAGMENT_EXTENSION: &str = "d";

/// The generated build description for one (module, variant) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRecord {
    /// Module name
    pub module: String,
    /// Output variant
    pub variant: String,
    /// Object rule with one prerequisite line per dependency, newline terminated
    pub object_rule: String,
    /// Dependency file rule, newline terminated
    pub dep_rule: String,
    /// One guarded `-include` block per dependency
    pub include_directives: Vec<String>,
    /// `<module>_DEPS := $(call uniq, ...)`
    pub deps_var: String,
    /// `<module>_INCLUDE := $(call uniq, ...)`
    pub include_var: String,
}

impl DependencyRecord {
    /// Full fragment file contents.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.object_rule);
        out.push('\n');
        out.push_str(&self.dep_rule);
        out.push('\n');
        for directive in &self.include_directives {
            out.push_str(directive);
        }
        out.push('\n');
        out.push_str(&self.deps_var);
        out.push_str(")\n");
        out.push_str(&self.include_var);
        out.push_str(")\n");
        out
    }
}

/// Accumulates the dependencies of one module across all variants.
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    module: String,
    source: String,
    include_dir: Option<String>,
    variants: Vec<String>,
    deps: Vec<String>,
    deps_terms: String,
    include_terms: String,
}

impl RecordBuilder {
    /// Start a record for `module` backed by `source`.
    ///
    /// Header modules propagate their directory as an include path.
    pub fn new(module: &str, source: &Path, variants: &[String]) -> Self {
        let include_dir = is_header_name(module).then(|| {
            source
                .parent()
                .map(|d| d.display().to_string())
                .unwrap_or_default()
        });
        Self {
            module: module.to_string(),
            source: source.display().to_string(),
            include_dir,
            variants: variants.to_vec(),
            deps: Vec::new(),
            deps_terms: String::new(),
            include_terms: String::new(),
        }
    }

    /// Add a resolved dependency.
    ///
    /// A header contributes itself to the include accumulator; anything else
    /// contributes itself to the dependency accumulator.
    pub fn add_dependency(&mut self, dep: &str) {
        if is_header_name(dep) {
            self.include_terms.push_str(&format!(" $({dep}_INCLUDE) {dep}"));
            self.deps_terms.push_str(&format!(" $({dep}_DEPS)"));
        } else {
            self.include_terms.push_str(&format!(" $({dep}_INCLUDE)"));
            self.deps_terms.push_str(&format!(" $({dep}_DEPS) {dep}"));
        }
        self.deps.push(dep.to_string());
    }

    /// Dependencies added so far, in order.
    pub fn dependencies(&self) -> &[String] {
        &self.deps
    }

    /// One record per variant.
    pub fn build(&self) -> Vec<DependencyRecord> {
        self.variants.iter().map(|v| self.record(v)).collect()
    }

    fn record(&self, variant: &str) -> DependencyRecord {
        let name = &self.module;
        let mut object_rule = String::new();
        if let Some(dir) = &self.include_dir {
            object_rule.push_str(&include_dir_block(dir));
        }
        object_rule.push_str(&format!(
            "{DEP_DIR_VAR}/{name}.{variant}.o: {}",
            self.source
        ));
        for dep in &self.deps {
            object_rule.push_str(&format!("\\\n\t{DEP_DIR_VAR}/{dep}.{variant}.o"));
        }
        object_rule.push('\n');

        let dep_rule = format!(
            "{DEP_DIR_VAR}/{name}.{variant}.{FRAGMENT_EXTENSION}: {}\n",
            self.source
        );

        let include_directives = self
            .deps
            .iter()
            .map(|dep| guarded_include(dep, variant))
            .collect();

        DependencyRecord {
            module: name.clone(),
            variant: variant.to_string(),
            object_rule,
            dep_rule,
            include_directives,
            deps_var: format!("{name}_DEPS := $(call uniq,{}", self.deps_terms),
            include_var: format!("{name}_INCLUDE := $(call uniq,{}", self.include_terms),
        }
    }
}

fn include_dir_block(dir: &str) -> String {
    format!(
        "ifeq (,$(findstring +{dir}\",$(VLOG_INCLUDES)))\n  VLOG_INCLUDES += \"+incdir+{dir}\"\nendif\n"
    )
}

fn guarded_include(dep: &str, variant: &str) -> String {
    let fragment = format!("{DEP_DIR_VAR}/{dep}.{variant}.{FRAGMENT_EXTENSION}");
    format!("ifeq (,$(filter {fragment},$(MAKEFILE_LIST)))\n-include {fragment}\nendif\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn variants(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_leaf_module() {
        let builder = RecordBuilder::new("fifo", Path::new("/src/fifo.sv"), &variants(&["sim"]));
        let records = builder.build();
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].render(),
            "$(DEP_DIR)/fifo.sim.o: /src/fifo.sv\n\
             \n\
             $(DEP_DIR)/fifo.sim.d: /src/fifo.sv\n\
             \n\
             \n\
             fifo_DEPS := $(call uniq,)\n\
             fifo_INCLUDE := $(call uniq,)\n"
        );
    }

    #[test]
    fn test_module_with_dependencies() {
        let mut builder =
            RecordBuilder::new("top", Path::new("/src/top.sv"), &variants(&["syn"]));
        builder.add_dependency("defs.svh");
        builder.add_dependency("fifo");
        let text = builder.build()[0].render();

        let expected = "$(DEP_DIR)/top.syn.o: /src/top.sv\\\n\
\t$(DEP_DIR)/defs.svh.syn.o\\\n\
\t$(DEP_DIR)/fifo.syn.o\n\
\n\
$(DEP_DIR)/top.syn.d: /src/top.sv\n\
\n\
ifeq (,$(filter $(DEP_DIR)/defs.svh.syn.d,$(MAKEFILE_LIST)))\n\
-include $(DEP_DIR)/defs.svh.syn.d\n\
endif\n\
ifeq (,$(filter $(DEP_DIR)/fifo.syn.d,$(MAKEFILE_LIST)))\n\
-include $(DEP_DIR)/fifo.syn.d\n\
endif\n\
\n\
top_DEPS := $(call uniq, $(defs.svh_DEPS) $(fifo_DEPS) fifo)\n\
top_INCLUDE := $(call uniq, $(defs.svh_INCLUDE) defs.svh $(fifo_INCLUDE))\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_header_module_propagates_include_dir() {
        let builder = RecordBuilder::new(
            "defs.svh",
            Path::new("/src/include/defs.svh"),
            &variants(&["sim"]),
        );
        let record = &builder.build()[0];
        assert!(record.object_rule.starts_with(
            "ifeq (,$(findstring +/src/include\",$(VLOG_INCLUDES)))\n  \
             VLOG_INCLUDES += \"+incdir+/src/include\"\nendif\n\
             $(DEP_DIR)/defs.svh.sim.o: /src/include/defs.svh"
        ));
    }

    #[test]
    fn test_one_record_per_variant() {
        let mut builder =
            RecordBuilder::new("top", Path::new("/src/top.sv"), &variants(&["sim", "syn"]));
        builder.add_dependency("fifo");
        let records = builder.build();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].variant, "sim");
        assert!(records[1].object_rule.contains("$(DEP_DIR)/fifo.syn.o"));
        assert_eq!(builder.dependencies(), ["fifo".to_string()]);
    }
}
