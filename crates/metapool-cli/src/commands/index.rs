use crate::cli::IndexArgs;
use crate::error::{CliError, Result};
use metapool::core::index::combos::{IndexCombo, assign_index};
use metapool::core::index::names::bcl_scrub_name;
use metapool::core::index::sequencer::sequencer_i5_index;
use metapool::core::io::index_combos::IndexComboFile;
use metapool::core::io::plate_map::PlateMapFile;
use metapool::core::io::traits::TabularFile;
use metapool::core::models::well::Well;
use metapool::core::picklist::index::{IndexLabels, format_index_picklist};
use metapool::engine::error::EngineError;
use tracing::info;

pub fn run(args: IndexArgs) -> Result<()> {
    info!("Loading plate map from {:?}", &args.plate_map);
    let entries = PlateMapFile::default()
        .read_from_path(&args.plate_map)
        .map_err(|e| CliError::FileParsing {
            path: args.plate_map.clone(),
            source: e.into(),
        })?;

    info!("Loading index combinations from {:?}", &args.combos);
    let combos = IndexComboFile::default()
        .read_from_path(&args.combos)
        .map_err(|e| CliError::FileParsing {
            path: args.combos.clone(),
            source: e.into(),
        })?;

    let mut assigned: Vec<IndexCombo> = assign_index(entries.len(), &combos, args.start_index)
        .map_err(EngineError::from)?
        .to_vec();

    if let Some(sequencer) = &args.sequencer {
        let i5: Vec<&str> = assigned.iter().map(|c| c.i5_sequence.as_str()).collect();
        let oriented = sequencer_i5_index(sequencer, &i5).map_err(EngineError::from)?;
        for (combo, sequence) in assigned.iter_mut().zip(oriented) {
            combo.i5_sequence = sequence;
        }
    }

    let names: Vec<String> = entries.iter().map(|e| bcl_scrub_name(&e.sample)).collect();
    let wells: Vec<Well> = entries.iter().map(|e| e.well).collect();
    let picklist = format_index_picklist(&names, &wells, &assigned, &IndexLabels::default())
        .map_err(EngineError::from)?;

    info!("Writing {} transfers to {:?}", picklist.len(), &args.output);
    picklist
        .write_to_path(&args.output)
        .map_err(CliError::output(&args.output))?;
    println!(
        "Assigned index combinations {}..{} to {} sample(s); picklist written to: {}",
        args.start_index,
        args.start_index + entries.len(),
        entries.len(),
        args.output.display()
    );
    Ok(())
}
