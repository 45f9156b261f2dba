//! End-to-end tests running the built binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_hdl-makedep"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

#[test]
fn test_generate_writes_fragments() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    let out = dir.path().join("out");
    write(&src, "top.sv", "module top; core u_core (); endmodule\n");
    write(&src, "core.sv", "module core; endmodule\n");

    let output = run(&[
        "generate",
        src.to_str().unwrap(),
        out.to_str().unwrap(),
        "sim,syn",
        "top",
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    for name in ["top.sim.d", "top.syn.d", "core.sim.d", "core.syn.d"] {
        assert!(out.join(name).exists(), "missing {name}");
    }
}

#[test]
fn test_generate_json_report() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    let out = dir.path().join("out");
    write(&src, "top.sv", "module top; ghost u_g (); endmodule\n");

    let output = run(&[
        "generate",
        src.to_str().unwrap(),
        out.to_str().unwrap(),
        "sim",
        "top",
        "--report",
        "json",
    ]);

    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["root"], "top");
    assert_eq!(report["unresolved"][0], "ghost");
}

#[test]
fn test_generate_missing_root_fails() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    write(&src, "top.sv", "module top; endmodule\n");

    let output = run(&[
        "generate",
        src.to_str().unwrap(),
        dir.path().join("out").to_str().unwrap(),
        "sim",
        "nowhere",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("error: Could not find module nowhere"));
}

#[test]
fn test_scan_prints_dependencies() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "top.sv",
        "`include \"defs.svh\"\nmodule top;\n  // old_core u_old ();\n  core u_core (.clk(clk));\nendmodule\n",
    );

    let output = run(&["scan", dir.path().join("top.sv").to_str().unwrap()]);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "top dependencies:\n\tcore\n\tdefs.svh\n"
    );
}

#[test]
fn test_subs_lists_names() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "subs.yml", "fifo: rtl/fifo_xpm.sv\ndbg_core:\n");

    let subs = dir.path().join("subs.yml");
    let output = run(&[
        "subs",
        dir.path().to_str().unwrap(),
        subs.to_str().unwrap(),
        "ram:rtl/ram.sv",
    ]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "dbg_core fifo ram\n");
}
