mod cli;
mod commands;

use clap::Parser;
use cli::{split_list, Cli, Command};
use commands::generate::GenerateArgs;
use commands::scan::ScanArgs;
use commands::subs::SubsArgs;

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Generate {
            source_root,
            output_dir,
            variants,
            name,
            substitutions,
            ignore_file,
            ignore_dirs,
            extra_dirs,
            staleness,
            report,
        } => commands::generate::run(GenerateArgs {
            source_root,
            output_dir,
            variants,
            name,
            substitutions,
            ignore_file,
            ignore_dirs: split_list(&ignore_dirs),
            extra_dirs: split_list(&extra_dirs),
            staleness: staleness.into(),
            report,
        }),
        Command::Scan {
            files,
            name,
            detailed,
        } => commands::scan::run(ScanArgs {
            files,
            name,
            detailed,
        }),
        Command::Subs {
            source_root,
            sources,
            paths,
        } => commands::subs::run(SubsArgs {
            source_root,
            sources,
            paths,
        }),
    }
}
