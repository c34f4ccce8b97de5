use crate::core::models::plate::{Measurements, PlateArray};
use crate::core::picklist::format::Picklist;
use crate::core::picklist::pooling::{PoolingRow, format_pooling_picklist};
use crate::core::quant::calculator::{
    PoolEstimate, compute_pico_concentration, compute_qpcr_concentration, estimate_pool_conc_vol,
};
use crate::engine::config::{ConcentrationInput, PoolingConfig};
use crate::engine::error::EngineError;
use crate::engine::policy::compute_pooling_volumes;
use tracing::{info, instrument, warn};

#[derive(Debug, Clone)]
pub struct PoolingResult {
    /// Library molarity per well, in nM.
    pub concentrations: Measurements,
    /// Pooling volume per well, in nL.
    pub volumes: PlateArray<f64>,
    pub estimate: PoolEstimate,
    pub picklist: Picklist<PoolingRow>,
}

/// Library molarity (nM) from whatever the measurements represent.
pub fn molar_concentrations(measurements: &Measurements, config: &PoolingConfig) -> Measurements {
    match config.input {
        ConcentrationInput::Cp => compute_qpcr_concentration(measurements, &config.curve),
        ConcentrationInput::DnaMass => {
            compute_pico_concentration(measurements, config.fragment_size_bp)
        }
        ConcentrationInput::Molar => measurements.clone(),
    }
}

/// Pools a plate of libraries under the configured policy and produces the
/// pooling picklist together with an estimate of the finished pool.
#[instrument(skip_all, name = "pooling_workflow")]
pub fn run(
    measurements: &Measurements,
    weights: Option<&PlateArray<f64>>,
    config: &PoolingConfig,
) -> Result<PoolingResult, EngineError> {
    info!(
        wells = measurements.len(),
        policy = config.policy.name(),
        "Computing pooling volumes."
    );

    let concentrations = molar_concentrations(measurements, config);
    let volumes = compute_pooling_volumes(&concentrations, weights, &config.policy)?;
    let estimate = estimate_pool_conc_vol(&volumes, &concentrations)?;

    if estimate.excluded_wells > 0 {
        warn!(
            excluded_wells = estimate.excluded_wells,
            "Some pooled wells have no concentration and are left out of the pool estimate."
        );
    }
    match estimate.concentration_nm {
        Some(nm) => info!(
            pool_nm = nm,
            pool_ul = estimate.volume_nl / 1000.0,
            "Estimated pool concentration."
        ),
        None => warn!("Pool concentration is undefined: no well with a known concentration was pooled."),
    }

    let picklist = format_pooling_picklist(&volumes, Some(&concentrations), &config.picklist)?;

    Ok(PoolingResult {
        concentrations,
        volumes,
        estimate,
        picklist,
    })
}
