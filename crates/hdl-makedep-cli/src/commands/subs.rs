use std::path::PathBuf;

use hdl_makedep::{SubstitutionLoader, SubstitutionSource, SubstitutionTable};

pub struct SubsArgs {
    pub source_root: PathBuf,
    pub sources: Vec<String>,
    pub paths: bool,
}

pub fn run(args: SubsArgs) {
    let sources: Vec<SubstitutionSource> = args
        .sources
        .iter()
        .flat_map(|s| SubstitutionSource::parse_list(s))
        .collect();

    let table = SubstitutionLoader::new(&args.source_root)
        .load(&sources)
        .unwrap_or_else(|e| {
            eprintln!("error: {}", e);
            std::process::exit(1);
        });

    print!("{}", render(&table, args.paths));
}

fn render(table: &SubstitutionTable, paths: bool) -> String {
    if !paths {
        let names: Vec<&str> = table.iter().map(|(name, _)| name).collect();
        return format!("{}\n", names.join(" "));
    }

    let mut out = String::new();
    for (name, path) in table.iter() {
        match path {
            Some(path) => out.push_str(&format!("{}: {}\n", name, path.display())),
            None => out.push_str(&format!("{}: (excluded)\n", name)),
        }
    }
    out
}
