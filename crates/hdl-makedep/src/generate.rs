//! One-call generation from a [`MakedepConfig`].

use crate::config::MakedepConfig;
use crate::error::Result;
use crate::fragment::{FragmentWriter, WriteReport};
use crate::index::FileIndex;
use crate::listing::FileLister;
use crate::resolver::Resolver;
use crate::substitution::{SubstitutionLoader, SubstitutionSource, SubstitutionTable};
use log::info;

/// Load the substitution table named by `config`.
pub fn load_substitutions(config: &MakedepConfig) -> Result<SubstitutionTable> {
    let sources: Vec<SubstitutionSource> = config
        .substitutions
        .iter()
        .flat_map(|s| SubstitutionSource::parse_list(s))
        .collect();
    let table = SubstitutionLoader::new(&config.source_root).load(&sources)?;
    if !table.is_empty() {
        info!("Loaded {} substitutions", table.len());
    }
    Ok(table)
}

/// Generate fragments for `config.root_module` against an existing index.
pub fn generate_with_index(
    config: &MakedepConfig,
    index: &FileIndex,
    substitutions: &SubstitutionTable,
) -> Result<WriteReport> {
    config.validate()?;
    write_fragments(config, index, substitutions)
}

fn write_fragments(
    config: &MakedepConfig,
    index: &FileIndex,
    substitutions: &SubstitutionTable,
) -> Result<WriteReport> {
    let writer = FragmentWriter::new(
        Resolver::new(index, substitutions),
        &config.output_dir,
        config.variants.clone(),
    )
    .with_freshness(config.staleness.policy());
    writer.write(&config.root_module)
}

/// List files, load substitutions and generate fragments.
///
/// # Errors
///
/// Any fatal error of the listing, loading or writing stages.
pub fn generate(config: &MakedepConfig) -> Result<WriteReport> {
    config.validate()?;
    let index = FileLister::from_config(config).list()?;
    let substitutions = load_substitutions(config)?;
    write_fragments(config, &index, &substitutions)
}
