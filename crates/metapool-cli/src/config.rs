use crate::cli::{NormalizeArgs, PoolArgs};
use crate::error::{CliError, Result};
use metapool::core::picklist::pooling::PoolingPicklistOptions;
use metapool::core::quant::params::{
    DEFAULT_QPCR_DILUTION, DEFAULT_QPCR_INTERCEPT, DEFAULT_QPCR_SLOPE, StandardCurve,
};
use metapool::engine::config::{
    self as core_config, ConcentrationInput, DEFAULT_EQUAL_VOLUME_UL,
    DEFAULT_EXCLUSION_FLOOR_CONC_NM, DEFAULT_EXCLUSION_MIN_CONC_NM,
    DEFAULT_MIN_VOLUME_FLOOR_CONC_NM, DEFAULT_MIN_VOLUME_FLOOR_VOL_NL, DEFAULT_TARGET_NG,
    DEFAULT_TOTAL_NMOL, PoolingPolicy,
};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialVolumesConfig {
    #[serde(rename = "min-vol")]
    min_vol: Option<f64>,
    #[serde(rename = "max-vol")]
    max_vol: Option<f64>,
    resolution: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialNormalizationConfig {
    #[serde(rename = "target-ng")]
    target_ng: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialQpcrConfig {
    slope: Option<f64>,
    intercept: Option<f64>,
    #[serde(rename = "dilution-factor")]
    dilution_factor: Option<f64>,
    #[serde(rename = "fragment-size")]
    fragment_size: Option<f64>,
}

#[derive(Deserialize, Debug, Clone, Copy)]
#[serde(rename_all = "kebab-case", tag = "type")]
enum PartialPoolingPolicy {
    EqualVolume {
        #[serde(rename = "total-volume")]
        total_volume: Option<f64>,
    },
    ExclusionFloor {
        #[serde(rename = "min-conc")]
        min_conc: Option<f64>,
        #[serde(rename = "floor-conc")]
        floor_conc: Option<f64>,
        #[serde(rename = "total-nmol")]
        total_nmol: Option<f64>,
    },
    MinimumVolumeFloor {
        #[serde(rename = "floor-vol")]
        floor_vol: Option<f64>,
        #[serde(rename = "floor-conc")]
        floor_conc: Option<f64>,
        #[serde(rename = "total-nmol")]
        total_nmol: Option<f64>,
    },
}

impl From<PartialPoolingPolicy> for PoolingPolicy {
    fn from(p: PartialPoolingPolicy) -> Self {
        match p {
            PartialPoolingPolicy::EqualVolume { total_volume } => PoolingPolicy::EqualVolume {
                total_volume_ul: total_volume.unwrap_or(DEFAULT_EQUAL_VOLUME_UL),
            },
            PartialPoolingPolicy::ExclusionFloor {
                min_conc,
                floor_conc,
                total_nmol,
            } => PoolingPolicy::ExclusionFloor {
                min_conc: min_conc.unwrap_or(DEFAULT_EXCLUSION_MIN_CONC_NM),
                floor_conc: floor_conc.unwrap_or(DEFAULT_EXCLUSION_FLOOR_CONC_NM),
                total_nmol: total_nmol.unwrap_or(DEFAULT_TOTAL_NMOL),
            },
            PartialPoolingPolicy::MinimumVolumeFloor {
                floor_vol,
                floor_conc,
                total_nmol,
            } => PoolingPolicy::MinimumVolumeFloor {
                floor_vol: floor_vol.unwrap_or(DEFAULT_MIN_VOLUME_FLOOR_VOL_NL),
                floor_conc: floor_conc.unwrap_or(DEFAULT_MIN_VOLUME_FLOOR_CONC_NM),
                total_nmol: total_nmol.unwrap_or(DEFAULT_TOTAL_NMOL),
            },
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialPoolingConfig {
    #[serde(rename = "max-vol-per-well")]
    max_vol_per_well: Option<f64>,
    policy: Option<PartialPoolingPolicy>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialMetapoolConfig {
    volumes: Option<PartialVolumesConfig>,
    normalization: Option<PartialNormalizationConfig>,
    qpcr: Option<PartialQpcrConfig>,
    pooling: Option<PartialPoolingConfig>,
}

fn parse_float(key: &str, value_str: &str) -> Result<f64> {
    value_str.trim().parse().map_err(|_| {
        CliError::Config(format!("Invalid float value for {}: {}", key, value_str))
    })
}

impl PartialMetapoolConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads the configuration file when one is given; otherwise every value
    /// falls back to its default.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_normalization(
        mut self,
        args: &NormalizeArgs,
    ) -> Result<core_config::NormalizationConfig> {
        self.apply_set_values(&args.set_values)?;

        let volumes = self.volumes.take().unwrap_or_default();
        let normalization = self.normalization.take().unwrap_or_default();

        let mut builder = core_config::NormalizationConfigBuilder::new().target_ng(
            args.target_ng
                .or(normalization.target_ng)
                .unwrap_or(DEFAULT_TARGET_NG),
        );
        if let Some(vol) = volumes.min_vol {
            builder = builder.min_vol(vol);
        }
        if let Some(vol) = volumes.max_vol {
            builder = builder.max_vol(vol);
        }
        if let Some(res) = volumes.resolution {
            builder = builder.resolution(res);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    pub fn merge_pooling(mut self, args: &PoolArgs) -> Result<core_config::PoolingConfig> {
        self.apply_set_values(&args.set_values)?;

        let qpcr = self.qpcr.take().unwrap_or_default();
        let pooling = self.pooling.take().unwrap_or_default();

        let policy = Self::merge_policy(args.policy.as_deref(), pooling.policy)?;

        let input = match &args.input_kind {
            Some(kind) => kind
                .parse::<ConcentrationInput>()
                .map_err(|e| CliError::Argument(e.to_string()))?,
            None => ConcentrationInput::default(),
        };

        let curve = StandardCurve::new(
            qpcr.slope.unwrap_or(DEFAULT_QPCR_SLOPE),
            qpcr.intercept.unwrap_or(DEFAULT_QPCR_INTERCEPT),
            qpcr.dilution_factor.unwrap_or(DEFAULT_QPCR_DILUTION),
        )
        .map_err(|e| CliError::Config(e.to_string()))?;

        let mut picklist = PoolingPicklistOptions::default();
        if let Some(max) = pooling.max_vol_per_well {
            picklist.max_vol_per_well = max;
        }

        let mut builder = core_config::PoolingConfigBuilder::new()
            .policy(policy)
            .input(input)
            .curve(curve)
            .picklist(picklist);
        if let Some(bp) = qpcr.fragment_size {
            builder = builder.fragment_size_bp(bp);
        }

        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    /// A policy named on the command line replaces the file's policy, but keeps
    /// the file's parameters when both name the same policy.
    fn merge_policy(
        cli_policy: Option<&str>,
        file_policy: Option<PartialPoolingPolicy>,
    ) -> Result<PoolingPolicy> {
        let from_file = file_policy.map(PoolingPolicy::from);
        let Some(id) = cli_policy else {
            return Ok(from_file.unwrap_or_default());
        };
        let chosen = id
            .parse::<PoolingPolicy>()
            .map_err(|e| CliError::Argument(e.to_string()))?;
        match from_file {
            Some(policy) if policy.name() == chosen.name() => Ok(policy),
            _ => Ok(chosen),
        }
    }

    fn apply_set_values(&mut self, set_values: &[String]) -> Result<()> {
        if set_values.is_empty() {
            return Ok(());
        }
        for kv_pair in set_values {
            let parts: Vec<_> = kv_pair.splitn(2, '=').collect();
            if parts.len() != 2 {
                return Err(CliError::Config(format!(
                    "Invalid --set format: '{}'. Expected KEY=VALUE.",
                    kv_pair
                )));
            }
            let key = parts[0];
            let value = parse_float(key, parts[1])?;

            match key {
                "volumes.min-vol" => {
                    self.volumes.get_or_insert_with(Default::default).min_vol = Some(value);
                }
                "volumes.max-vol" => {
                    self.volumes.get_or_insert_with(Default::default).max_vol = Some(value);
                }
                "volumes.resolution" => {
                    self.volumes.get_or_insert_with(Default::default).resolution = Some(value);
                }
                "normalization.target-ng" => {
                    self.normalization
                        .get_or_insert_with(Default::default)
                        .target_ng = Some(value);
                }
                "qpcr.slope" => {
                    self.qpcr.get_or_insert_with(Default::default).slope = Some(value);
                }
                "qpcr.intercept" => {
                    self.qpcr.get_or_insert_with(Default::default).intercept = Some(value);
                }
                "qpcr.dilution-factor" => {
                    self.qpcr.get_or_insert_with(Default::default).dilution_factor = Some(value);
                }
                "qpcr.fragment-size" => {
                    self.qpcr.get_or_insert_with(Default::default).fragment_size = Some(value);
                }
                "pooling.max-vol-per-well" => {
                    self.pooling
                        .get_or_insert_with(Default::default)
                        .max_vol_per_well = Some(value);
                }
                _ => {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
        Ok(())
    }
}
