use crate::cli::NormalizeArgs;
use crate::config::PartialMetapoolConfig;
use crate::error::{CliError, Result};
use metapool::core::io::plate_map::{PlateMapFile, sample_names_plate};
use metapool::core::io::plate_reader::{PlateReader, PlateReaderFile};
use metapool::core::io::traits::TabularFile;
use metapool::core::models::plate::{SampleNames, build_measurements};
use metapool::core::models::well::PlateShape;
use metapool::engine::config::NormalizationConfig;
use metapool::engine::error::EngineError;
use metapool::workflows::normalize::{self, SampleLayout};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info};

const PICKLIST_SUFFIX: &str = "norm_picklist.tsv";

pub fn run(args: NormalizeArgs) -> Result<()> {
    let partial_config = PartialMetapoolConfig::load(args.config.as_deref())?;
    info!("Merging configuration from file and CLI arguments...");
    let config = partial_config.merge_normalization(&args)?;

    let reader = match &args.plate_reader {
        Some(name) => name
            .parse::<PlateReader>()
            .map_err(|e| CliError::Argument(e.to_string()))?,
        None => PlateReader::default(),
    };

    let sample_names = args
        .plate_map
        .as_deref()
        .map(load_sample_names)
        .transpose()?;

    std::fs::create_dir_all(&args.output_dir).map_err(CliError::output(&args.output_dir))?;

    println!(
        "Normalizing {} plate(s) to {} ng per sample...",
        args.input.len(),
        config.target_ng
    );
    let outcomes: Vec<Result<PathBuf>> = args
        .input
        .par_iter()
        .map(|input| {
            normalize_plate(
                input,
                reader,
                sample_names.as_ref(),
                &config,
                &args.output_dir,
            )
        })
        .collect();

    let mut failures = 0;
    for (input, outcome) in args.input.iter().zip(outcomes) {
        match outcome {
            Ok(output) => println!("  {} -> {}", input.display(), output.display()),
            Err(e) => {
                error!("Failed to normalize {:?}: {}", input, e);
                eprintln!("  {}: {}", input.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        return Err(CliError::Batch {
            failed: failures,
            total: args.input.len(),
        });
    }
    Ok(())
}

fn load_sample_names(path: &Path) -> Result<SampleNames> {
    info!("Loading plate map from {:?}", path);
    let entries = PlateMapFile::default()
        .read_from_path(path)
        .map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
    Ok(sample_names_plate(&entries, PlateShape::PLATE_384).map_err(EngineError::from)?)
}

fn normalize_plate(
    input: &Path,
    reader: PlateReader,
    sample_names: Option<&SampleNames>,
    config: &NormalizationConfig,
    output_dir: &Path,
) -> Result<PathBuf> {
    info!("Loading {} quantification from {:?}", reader, input);
    let records = PlateReaderFile::new(reader)
        .read_from_path(input)
        .map_err(|e| CliError::FileParsing {
            path: input.to_path_buf(),
            source: e.into(),
        })?;
    let concs = build_measurements(
        records.iter().map(|r| (r.well, r.concentration)),
        PlateShape::PLATE_384,
    )
    .map_err(EngineError::from)?;

    let layout = SampleLayout {
        sample_names,
        ..SampleLayout::default()
    };
    let result = normalize::run(&concs, layout, config)?;

    let output = output_path(input, output_dir);
    info!("Writing {} transfers to {:?}", result.picklist.len(), output);
    result
        .picklist
        .write_to_path(&output)
        .map_err(CliError::output(&output))?;
    Ok(output)
}

fn output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "plate".to_string());
    output_dir.join(format!("{}.{}", stem, PICKLIST_SUFFIX))
}
