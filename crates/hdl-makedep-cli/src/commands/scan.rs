use std::path::{Path, PathBuf};

use hdl_makedep::{Dependencies, LexicalExtractor, ScanTarget};

pub struct ScanArgs {
    pub files: Vec<PathBuf>,
    pub name: Option<String>,
    pub detailed: bool,
}

pub fn run(args: ScanArgs) {
    if args.name.is_some() && args.files.len() > 1 {
        eprintln!("error: --name can only be used with a single file");
        std::process::exit(1);
    }

    let targets: Vec<ScanTarget> = args
        .files
        .iter()
        .map(|path| ScanTarget {
            path: path.clone(),
            module: args.name.clone().unwrap_or_else(|| module_name(path)),
        })
        .collect();

    let results = LexicalExtractor::new().scan_files(&targets);

    let mut failed = false;
    for (target, result) in targets.iter().zip(results) {
        match result {
            Ok(deps) => print!("{}", render(&target.module, &deps, args.detailed)),
            Err(e) => {
                eprintln!("error: {}", e);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }
}

fn module_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn render(module: &str, deps: &Dependencies, detailed: bool) -> String {
    let mut out = format!("{} dependencies:\n", module);
    if detailed {
        for (kind, names) in [
            ("includes", &deps.includes),
            ("packages", &deps.packages),
            ("instances", &deps.instances),
        ] {
            if names.is_empty() {
                continue;
            }
            out.push_str(&format!("  {}:\n", kind));
            for name in names {
                out.push_str(&format!("\t{}\n", name));
            }
        }
    } else {
        for name in deps.all() {
            out.push_str(&format!("\t{}\n", name));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_name_from_stem() {
        assert_eq!(module_name(Path::new("rtl/fifo_ctrl.sv")), "fifo_ctrl");
        assert_eq!(module_name(Path::new("defs.svh")), "defs");
    }

    #[test]
    fn test_render_flat() {
        let deps = LexicalExtractor::new()
            .extract_detailed("top", "module top; import bus_pkg::*; fifo u_f (); endmodule");
        assert_eq!(
            render("top", &deps, false),
            "top dependencies:\n\tbus_pkg\n\tfifo\n"
        );
    }

    #[test]
    fn test_render_detailed_skips_empty_kinds() {
        let deps = LexicalExtractor::new().extract_detailed("top", "module top; fifo u_f (); endmodule");
        assert_eq!(
            render("top", &deps, true),
            "top dependencies:\n  instances:\n\tfifo\n"
        );
    }
}
