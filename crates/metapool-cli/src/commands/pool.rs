use crate::cli::PoolArgs;
use crate::config::PartialMetapoolConfig;
use crate::error::{CliError, Result};
use metapool::core::io::traits::TabularFile;
use metapool::core::io::well_values::{WellValueFile, values_to_plate};
use metapool::core::models::plate::Measurements;
use metapool::core::models::well::PlateShape;
use metapool::engine::config::ConcentrationInput;
use metapool::engine::error::EngineError;
use metapool::workflows::pool;
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: PoolArgs) -> Result<()> {
    let partial_config = PartialMetapoolConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_pooling(&args)?;

    let mut table = match config.input {
        ConcentrationInput::Cp => WellValueFile::qpcr(),
        ConcentrationInput::DnaMass | ConcentrationInput::Molar => {
            WellValueFile::new("Well", "Concentration")
        }
    };
    if let Some(column) = &args.well_column {
        table.well_column = column.clone();
    }
    if let Some(column) = &args.value_column {
        table.value_column = column.clone();
    }

    let measurements = read_plate(&table, &args.input)?;
    let weights = match &args.weights {
        Some(path) => {
            let weights = read_plate(&WellValueFile::new("Well", "Weight"), path)?;
            Some(weights.map(|w| w.unwrap_or(0.0)))
        }
        None => None,
    };

    println!(
        "Pooling {} with the '{}' policy...",
        args.input.display(),
        config.policy
    );
    let result = pool::run(&measurements, weights.as_ref(), &config)?;

    info!("Writing {} transfers to {:?}", result.picklist.len(), &args.output);
    result
        .picklist
        .write_to_path(&args.output)
        .map_err(CliError::output(&args.output))?;

    match result.estimate.concentration_nm {
        Some(nm) => println!(
            "Estimated pool: {:.2} nM in {:.2} uL",
            nm,
            result.estimate.volume_nl / 1000.0
        ),
        None => {
            warn!("No pooled well has a known concentration.");
            println!(
                "Estimated pool: concentration unknown, {:.2} uL",
                result.estimate.volume_nl / 1000.0
            );
        }
    }
    println!("Picklist written to: {}", args.output.display());
    Ok(())
}

fn read_plate(table: &WellValueFile, path: &Path) -> Result<Measurements> {
    info!("Loading '{}' values from {:?}", table.value_column, path);
    let records = table
        .read_from_path(path)
        .map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
    Ok(values_to_plate(&records, PlateShape::PLATE_384).map_err(EngineError::from)?)
}
