use std::path::PathBuf;

use hdl_makedep::{generate, MakedepConfig, Staleness, WriteReport};
use log::info;

use crate::cli::ReportFormat;

pub struct GenerateArgs {
    pub source_root: PathBuf,
    pub output_dir: PathBuf,
    pub variants: String,
    pub name: String,
    pub substitutions: Vec<String>,
    pub ignore_file: Option<String>,
    pub ignore_dirs: Vec<String>,
    pub extra_dirs: Vec<String>,
    pub staleness: Staleness,
    pub report: Option<ReportFormat>,
}

pub fn run(args: GenerateArgs) {
    let report = args.report;
    let config = build_config(args);

    let result = generate(&config).unwrap_or_else(|e| {
        eprintln!("error: {}", e);
        std::process::exit(1);
    });

    info!(
        "{}: wrote {} modules, reused {}",
        result.root,
        result.modules.len(),
        result.reused.len()
    );

    match report {
        None => {}
        Some(ReportFormat::Text) => print_text(&result),
        Some(ReportFormat::Json) => {
            let json = serde_json::to_string_pretty(&result).unwrap_or_else(|e| {
                eprintln!("error: {}", e);
                std::process::exit(1);
            });
            println!("{}", json);
        }
    }
}

fn build_config(args: GenerateArgs) -> MakedepConfig {
    let mut config = MakedepConfig::new(args.source_root, args.output_dir, args.name)
        .with_variant_list(&args.variants)
        .with_substitutions(args.substitutions)
        .with_ignore_dirs(args.ignore_dirs)
        .with_extra_dirs(args.extra_dirs.into_iter().map(PathBuf::from).collect())
        .with_staleness(args.staleness);
    if let Some(ignore_file) = args.ignore_file {
        config.ignore_file = ignore_file;
    }
    config
}

fn print_text(report: &WriteReport) {
    println!("{}: {} fragments written", report.root, report.fragments.len());
    for module in &report.modules {
        println!("  wrote   {}", module);
    }
    for module in &report.reused {
        println!("  reused  {}", module);
    }
    for module in &report.excluded {
        println!("  skipped {}", module);
    }
    for name in &report.unresolved {
        println!("  missing {}", name);
    }
    for cycle in &report.cycles {
        println!("  cycle   {}", cycle.join(" -> "));
    }
}
