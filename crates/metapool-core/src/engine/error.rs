use thiserror::Error;

use super::config::ConfigError;
use crate::core::index::combos::IndexExhausted;
use crate::core::models::plate::PlateError;
use crate::core::models::well::WellError;
use crate::core::picklist::format::PicklistError;
use crate::core::utils::identifiers::UnknownVariant;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Plate(#[from] PlateError),

    #[error(transparent)]
    Well(#[from] WellError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Picklist error: {0}")]
    Picklist(#[from] PicklistError),

    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),

    #[error(transparent)]
    IndexExhausted(#[from] IndexExhausted),

    #[error(
        "No wells left to pool: {excluded} of {total_wells} wells lack a concentration above {min_conc} nM and the rest carry zero weight"
    )]
    DegenerateNormalization {
        total_wells: usize,
        excluded: usize,
        min_conc: f64,
    },

    #[error("Invalid pooling weight {value} at well {well}: weights must be finite and non-negative")]
    InvalidWeight { well: String, value: f64 },
}
