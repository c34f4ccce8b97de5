use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_MIN_VOL_NL: f64 = 2.5;
pub const DEFAULT_MAX_VOL_NL: f64 = 3500.0;
pub const DEFAULT_RESOLUTION_NL: f64 = 2.5;

pub const DEFAULT_QPCR_SLOPE: f64 = -3.231;
pub const DEFAULT_QPCR_INTERCEPT: f64 = 12.059;
pub const DEFAULT_QPCR_DILUTION: f64 = 25000.0;

pub const DEFAULT_FRAGMENT_SIZE_BP: f64 = 400.0;

#[derive(Debug, Error, Clone, PartialEq)]
#[error("Invalid value {value} for '{name}': {reason}")]
pub struct ParamError {
    pub name: &'static str,
    pub value: f64,
    pub reason: &'static str,
}

fn require(name: &'static str, value: f64, ok: bool, reason: &'static str) -> Result<(), ParamError> {
    if ok {
        Ok(())
    } else {
        Err(ParamError {
            name,
            value,
            reason,
        })
    }
}

/// Dispensing limits of the liquid handler, in nanoliters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeBounds {
    min_vol: f64,
    max_vol: f64,
    resolution: f64,
}

impl VolumeBounds {
    pub fn new(min_vol: f64, max_vol: f64, resolution: f64) -> Result<Self, ParamError> {
        require(
            "resolution",
            resolution,
            resolution.is_finite() && resolution > 0.0,
            "must be a positive, finite volume",
        )?;
        require(
            "min_vol",
            min_vol,
            min_vol.is_finite() && min_vol >= 0.0,
            "must be a non-negative, finite volume",
        )?;
        require(
            "max_vol",
            max_vol,
            max_vol.is_finite() && max_vol >= min_vol,
            "must be finite and not below min_vol",
        )?;
        let lowest_step = (min_vol / resolution).ceil() * resolution;
        require(
            "max_vol",
            max_vol,
            lowest_step <= max_vol,
            "the range [min_vol, max_vol] holds no multiple of the resolution",
        )?;
        Ok(Self {
            min_vol,
            max_vol,
            resolution,
        })
    }

    pub fn min_vol(&self) -> f64 {
        self.min_vol
    }

    pub fn max_vol(&self) -> f64 {
        self.max_vol
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }
}

impl Default for VolumeBounds {
    fn default() -> Self {
        Self {
            min_vol: DEFAULT_MIN_VOL_NL,
            max_vol: DEFAULT_MAX_VOL_NL,
            resolution: DEFAULT_RESOLUTION_NL,
        }
    }
}

/// qPCR standard curve used to turn Cp values into library molarity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardCurve {
    pub slope: f64,
    pub intercept: f64,
    pub dilution_factor: f64,
}

impl StandardCurve {
    pub fn new(slope: f64, intercept: f64, dilution_factor: f64) -> Result<Self, ParamError> {
        require(
            "slope",
            slope,
            slope.is_finite() && slope != 0.0,
            "must be finite and non-zero",
        )?;
        require("intercept", intercept, intercept.is_finite(), "must be finite")?;
        require(
            "dilution_factor",
            dilution_factor,
            dilution_factor.is_finite() && dilution_factor > 0.0,
            "must be positive and finite",
        )?;
        Ok(Self {
            slope,
            intercept,
            dilution_factor,
        })
    }
}

impl Default for StandardCurve {
    fn default() -> Self {
        Self {
            slope: DEFAULT_QPCR_SLOPE,
            intercept: DEFAULT_QPCR_INTERCEPT,
            dilution_factor: DEFAULT_QPCR_DILUTION,
        }
    }
}
