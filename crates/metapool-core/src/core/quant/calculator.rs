use super::formulas::{
    NL_PER_L, normalized_volume, pico_molar_concentration, qpcr_molar_concentration,
};
use super::params::{StandardCurve, VolumeBounds};
use crate::core::models::plate::{Measurements, PlateArray, PlateError};
use tracing::debug;

/// Per-well DNA volumes (nL) that deliver `target_ng` of each sample.
pub fn calculate_norm_vol(
    dna_concs: &Measurements,
    target_ng: f64,
    bounds: &VolumeBounds,
) -> PlateArray<f64> {
    dna_concs.map(|&c| normalized_volume(c, target_ng, bounds))
}

/// Per-well library molarity (nM) from qPCR Cp values.
pub fn compute_qpcr_concentration(cp_values: &Measurements, curve: &StandardCurve) -> Measurements {
    cp_values.map(|&cp| qpcr_molar_concentration(cp, curve))
}

/// Per-well library molarity (nM) from PicoGreen DNA concentrations (ng/uL).
pub fn compute_pico_concentration(dna_concs: &Measurements, avg_fragment_bp: f64) -> Measurements {
    dna_concs.map(|&c| pico_molar_concentration(c, avg_fragment_bp))
}

/// Estimated molarity and volume of a finished pool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoolEstimate {
    /// Pool molarity in nM; `None` when no well with a known concentration was pooled.
    pub concentration_nm: Option<f64>,
    /// Total pooled volume in nL, including wells of unknown concentration.
    pub volume_nl: f64,
    /// Wells with a transfer volume but no concentration, left out of the molarity estimate.
    pub excluded_wells: usize,
}

/// Estimates the molarity and volume of a pool from co-indexed volumes (nL) and
/// concentrations (nM).
///
/// Wells with a missing concentration contribute to neither the molar sum nor the
/// volume it is divided by.
pub fn estimate_pool_conc_vol(
    volumes: &PlateArray<f64>,
    concentrations: &Measurements,
) -> Result<PoolEstimate, PlateError> {
    volumes.ensure_same_shape(concentrations)?;

    let mut total_pmol = 0.0;
    let mut known_vol = 0.0;
    let mut total_vol = 0.0;
    let mut excluded_wells = 0;

    for ((_, &vol), &conc) in volumes.iter().zip(concentrations.values()) {
        total_vol += vol;
        match conc {
            Some(c) => {
                total_pmol += c * vol / NL_PER_L;
                known_vol += vol;
            }
            None if vol > 0.0 => excluded_wells += 1,
            None => {}
        }
    }

    let concentration_nm = if known_vol > 0.0 {
        Some(total_pmol / (known_vol / NL_PER_L))
    } else {
        None
    };

    debug!(
        total_vol,
        excluded_wells,
        ?concentration_nm,
        "Estimated pool concentration and volume."
    );
    Ok(PoolEstimate {
        concentration_nm,
        volume_nl: total_vol,
        excluded_wells,
    })
}
