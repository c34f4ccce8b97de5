use crate::cli::ReformatArgs;
use crate::error::{CliError, Result};
use metapool::core::models::layout::{contiguous_to_interleaved, interleaved_to_contiguous};
use metapool::core::models::well::{Well, WellError};
use metapool::engine::error::EngineError;
use tracing::debug;

pub fn run(args: ReformatArgs) -> Result<()> {
    for (source, destination) in remap(&args.wells, args.inverse)? {
        println!("{} -> {}", source, destination);
    }
    Ok(())
}

fn remap(wells: &[String], inverse: bool) -> Result<Vec<(Well, Well)>> {
    let transform: fn(Well) -> std::result::Result<Well, WellError> = if inverse {
        contiguous_to_interleaved
    } else {
        interleaved_to_contiguous
    };
    wells
        .iter()
        .map(|raw| {
            let source: Well = raw
                .parse()
                .map_err(|e| CliError::Argument(format!("'{}': {}", raw, e)))?;
            let destination = transform(source).map_err(EngineError::from)?;
            debug!("{} -> {}", source, destination);
            Ok((source, destination))
        })
        .collect()
}
