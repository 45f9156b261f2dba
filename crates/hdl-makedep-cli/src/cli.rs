use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use hdl_makedep::Staleness;

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum StalenessChoice {
    /// Trust any existing fragment
    #[default]
    Existing,
    /// Regenerate fragments older than their source
    Mtime,
}

impl From<StalenessChoice> for Staleness {
    fn from(choice: StalenessChoice) -> Self {
        match choice {
            StalenessChoice::Existing => Staleness::Existing,
            StalenessChoice::Mtime => Staleness::Mtime,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "hdl-makedep", bin_name = "hdl-makedep", version)]
#[command(about = "Generate make dependency fragments for SystemVerilog/Verilog modules")]
pub struct Cli {
    /// More log output (-v debug, -vv trace)
    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        short_alias = 'd',
        alias = "debug"
    )]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Write dependency fragments for a module and everything it depends on
    #[command(after_help = r#"EXAMPLES:
  hdl-makedep generate ~/repo build/deps sim,syn top
  hdl-makedep generate ~/repo build/deps sim top --subs "boards/a7.yml fifo:rtl/fifo_xpm.sv"
  hdl-makedep generate ~/repo build/deps sim top --extra-dirs build/gen --staleness mtime"#)]
    Generate {
        /// Source root
        #[arg(value_name = "SRCBASE")]
        source_root: PathBuf,

        /// Directory for the fragment files
        #[arg(value_name = "OUTDIR")]
        output_dir: PathBuf,

        /// Comma separated output variants (object file prefixes)
        #[arg(value_name = "VARIANTS")]
        variants: String,

        /// Module to analyze
        #[arg(value_name = "NAME")]
        name: String,

        /// Override sources: YAML files or name:path pairs, whitespace separated
        #[arg(long = "subs", alias = "subsfilelist", value_name = "LIST")]
        substitutions: Vec<String>,

        /// Directories containing a file with this name are ignored
        #[arg(long = "ignore-file", alias = "ignorefile", value_name = "NAME")]
        ignore_file: Option<String>,

        /// Directories to ignore (comma or whitespace separated)
        #[arg(
            long = "ignore-dirs",
            alias = "ignoredirs",
            value_name = "DIRS",
            value_delimiter = ','
        )]
        ignore_dirs: Vec<String>,

        /// Extra non-repo directories to search (comma or whitespace separated)
        #[arg(
            long = "extra-dirs",
            alias = "extradirs",
            value_name = "DIRS",
            value_delimiter = ','
        )]
        extra_dirs: Vec<String>,

        /// When an existing fragment may be reused
        #[arg(long, default_value = "existing", value_name = "POLICY")]
        staleness: StalenessChoice,

        /// Print a summary of the run
        #[arg(long, value_name = "FORMAT")]
        report: Option<ReportFormat>,
    },

    /// Print the dependencies found in source files
    #[command(after_help = r#"EXAMPLES:
  hdl-makedep scan rtl/top.sv
  hdl-makedep scan rtl/top.sv --name top_wrapper
  hdl-makedep scan rtl/*.sv --detailed"#)]
    Scan {
        /// Files to analyze
        #[arg(value_name = "PATH", required = true)]
        files: Vec<PathBuf>,

        /// Module name (defaults to the file stem; single file only)
        #[arg(long, value_name = "NAME")]
        name: Option<String>,

        /// Group dependencies by kind
        #[arg(long)]
        detailed: bool,
    },

    /// Print the merged substitution table
    Subs {
        /// Source root
        #[arg(value_name = "SRCBASE")]
        source_root: PathBuf,

        /// Override sources: YAML files or name:path pairs
        #[arg(value_name = "SOURCES", required = true)]
        sources: Vec<String>,

        /// Include the substituted path
        #[arg(long)]
        paths: bool,
    },
}

/// Split make-style lists that may mix commas and whitespace.
pub fn split_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split_whitespace())
        .map(String::from)
        .collect()
}
