use crate::core::picklist::normalization::NormalizationLabels;
use crate::core::picklist::pooling::PoolingPicklistOptions;
use crate::core::quant::params::{DEFAULT_FRAGMENT_SIZE_BP, ParamError, StandardCurve, VolumeBounds};
use crate::core::utils::identifiers::{UnknownVariant, lookup_variant};
use phf::{Map, phf_map};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_TARGET_NG: f64 = 5.0;

pub const DEFAULT_EQUAL_VOLUME_UL: f64 = 60.0;

pub const DEFAULT_EXCLUSION_MIN_CONC_NM: f64 = 10.0;
pub const DEFAULT_EXCLUSION_FLOOR_CONC_NM: f64 = 50.0;

pub const DEFAULT_MIN_VOLUME_FLOOR_VOL_NL: f64 = 100.0;
pub const DEFAULT_MIN_VOLUME_FLOOR_CONC_NM: f64 = 40.0;

pub const DEFAULT_TOTAL_NMOL: f64 = 0.01;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value {value} for '{name}': {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl From<ParamError> for ConfigError {
    fn from(e: ParamError) -> Self {
        ConfigError::InvalidParameter {
            name: e.name,
            value: e.value,
            reason: e.reason,
        }
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must be positive and finite",
        })
    }
}

fn require_non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidParameter {
            name,
            value,
            reason: "must be non-negative and finite",
        })
    }
}

/// How per-sample pooling volumes are derived from library molarity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoolingPolicy {
    /// Every well contributes the same volume; `total_volume_ul` is split evenly
    /// over the plate.
    EqualVolume { total_volume_ul: f64 },
    /// Equal-molar pooling that drops wells at or below `min_conc` and pools
    /// wells below `floor_conc` as if they were at the floor, to avoid
    /// over-diluting the pool.
    ExclusionFloor {
        min_conc: f64,
        floor_conc: f64,
        total_nmol: f64,
    },
    /// Equal-molar pooling that keeps every well but caps wells below
    /// `floor_conc` at `floor_vol` nanoliters.
    MinimumVolumeFloor {
        floor_vol: f64,
        floor_conc: f64,
        total_nmol: f64,
    },
}

#[derive(Debug, Clone, Copy)]
enum PolicyKind {
    EqualVolume,
    ExclusionFloor,
    MinimumVolumeFloor,
}

static POLICIES: Map<&'static str, PolicyKind> = phf_map! {
    "equal-volume" => PolicyKind::EqualVolume,
    "exclusion-floor" => PolicyKind::ExclusionFloor,
    "minimum-volume-floor" => PolicyKind::MinimumVolumeFloor,
};

impl PoolingPolicy {
    pub fn equal_volume() -> Self {
        PoolingPolicy::EqualVolume {
            total_volume_ul: DEFAULT_EQUAL_VOLUME_UL,
        }
    }

    pub fn exclusion_floor() -> Self {
        PoolingPolicy::ExclusionFloor {
            min_conc: DEFAULT_EXCLUSION_MIN_CONC_NM,
            floor_conc: DEFAULT_EXCLUSION_FLOOR_CONC_NM,
            total_nmol: DEFAULT_TOTAL_NMOL,
        }
    }

    pub fn minimum_volume_floor() -> Self {
        PoolingPolicy::MinimumVolumeFloor {
            floor_vol: DEFAULT_MIN_VOLUME_FLOOR_VOL_NL,
            floor_conc: DEFAULT_MIN_VOLUME_FLOOR_CONC_NM,
            total_nmol: DEFAULT_TOTAL_NMOL,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PoolingPolicy::EqualVolume { .. } => "equal-volume",
            PoolingPolicy::ExclusionFloor { .. } => "exclusion-floor",
            PoolingPolicy::MinimumVolumeFloor { .. } => "minimum-volume-floor",
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            PoolingPolicy::EqualVolume { total_volume_ul } => {
                require_positive("total_volume_ul", total_volume_ul)
            }
            PoolingPolicy::ExclusionFloor {
                min_conc,
                floor_conc,
                total_nmol,
            } => {
                require_non_negative("min_conc", min_conc)?;
                require_non_negative("floor_conc", floor_conc)?;
                require_positive("total_nmol", total_nmol)
            }
            PoolingPolicy::MinimumVolumeFloor {
                floor_vol,
                floor_conc,
                total_nmol,
            } => {
                require_non_negative("floor_vol", floor_vol)?;
                require_positive("floor_conc", floor_conc)?;
                require_positive("total_nmol", total_nmol)
            }
        }
    }
}

impl Default for PoolingPolicy {
    fn default() -> Self {
        Self::exclusion_floor()
    }
}

impl FromStr for PoolingPolicy {
    type Err = UnknownVariant;

    /// Parses a policy identifier into that policy with its default parameters.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match lookup_variant(&POLICIES, "pooling policy", s)? {
            PolicyKind::EqualVolume => Self::equal_volume(),
            PolicyKind::ExclusionFloor => Self::exclusion_floor(),
            PolicyKind::MinimumVolumeFloor => Self::minimum_volume_floor(),
        })
    }
}

impl fmt::Display for PoolingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What the measurements handed to the pooling workflow represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcentrationInput {
    /// qPCR crossing points, converted through the standard curve.
    #[default]
    Cp,
    /// Library DNA mass concentration (ng/uL), converted through the fragment size.
    DnaMass,
    /// Library molarity (nM), used as-is.
    Molar,
}

static CONCENTRATION_INPUTS: Map<&'static str, ConcentrationInput> = phf_map! {
    "cp" => ConcentrationInput::Cp,
    "dna" => ConcentrationInput::DnaMass,
    "molar" => ConcentrationInput::Molar,
};

impl FromStr for ConcentrationInput {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup_variant(&CONCENTRATION_INPUTS, "input kind", s)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationConfig {
    pub bounds: VolumeBounds,
    pub target_ng: f64,
    pub labels: NormalizationLabels,
}

#[derive(Default)]
pub struct NormalizationConfigBuilder {
    min_vol: Option<f64>,
    max_vol: Option<f64>,
    resolution: Option<f64>,
    target_ng: Option<f64>,
    labels: Option<NormalizationLabels>,
}

impl NormalizationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_vol(mut self, vol: f64) -> Self {
        self.min_vol = Some(vol);
        self
    }
    pub fn max_vol(mut self, vol: f64) -> Self {
        self.max_vol = Some(vol);
        self
    }
    pub fn resolution(mut self, vol: f64) -> Self {
        self.resolution = Some(vol);
        self
    }
    pub fn target_ng(mut self, ng: f64) -> Self {
        self.target_ng = Some(ng);
        self
    }
    pub fn labels(mut self, labels: NormalizationLabels) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Unset volume limits fall back to the instrument defaults; the target
    /// mass must be given.
    pub fn build(self) -> Result<NormalizationConfig, ConfigError> {
        let defaults = VolumeBounds::default();
        let bounds = VolumeBounds::new(
            self.min_vol.unwrap_or(defaults.min_vol()),
            self.max_vol.unwrap_or(defaults.max_vol()),
            self.resolution.unwrap_or(defaults.resolution()),
        )?;
        let target_ng = self
            .target_ng
            .ok_or(ConfigError::MissingParameter("target_ng"))?;
        require_positive("target_ng", target_ng)?;
        Ok(NormalizationConfig {
            bounds,
            target_ng,
            labels: self.labels.unwrap_or_default(),
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolingConfig {
    pub policy: PoolingPolicy,
    pub input: ConcentrationInput,
    pub curve: StandardCurve,
    pub fragment_size_bp: f64,
    pub picklist: PoolingPicklistOptions,
}

#[derive(Default)]
pub struct PoolingConfigBuilder {
    policy: Option<PoolingPolicy>,
    input: Option<ConcentrationInput>,
    curve: Option<StandardCurve>,
    fragment_size_bp: Option<f64>,
    picklist: Option<PoolingPicklistOptions>,
}

impl PoolingConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn policy(mut self, policy: PoolingPolicy) -> Self {
        self.policy = Some(policy);
        self
    }
    pub fn input(mut self, input: ConcentrationInput) -> Self {
        self.input = Some(input);
        self
    }
    pub fn curve(mut self, curve: StandardCurve) -> Self {
        self.curve = Some(curve);
        self
    }
    pub fn fragment_size_bp(mut self, bp: f64) -> Self {
        self.fragment_size_bp = Some(bp);
        self
    }
    pub fn picklist(mut self, options: PoolingPicklistOptions) -> Self {
        self.picklist = Some(options);
        self
    }

    pub fn build(self) -> Result<PoolingConfig, ConfigError> {
        let policy = self.policy.ok_or(ConfigError::MissingParameter("policy"))?;
        policy.validate()?;

        let fragment_size_bp = self.fragment_size_bp.unwrap_or(DEFAULT_FRAGMENT_SIZE_BP);
        require_positive("fragment_size_bp", fragment_size_bp)?;

        let picklist = self.picklist.unwrap_or_default();
        require_positive("max_vol_per_well", picklist.max_vol_per_well)?;

        Ok(PoolingConfig {
            policy,
            input: self.input.unwrap_or_default(),
            curve: self.curve.unwrap_or_default(),
            fragment_size_bp,
            picklist,
        })
    }
}
