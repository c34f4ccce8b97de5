use super::config::PoolingPolicy;
use super::error::EngineError;
use crate::core::models::plate::{Measurements, PlateArray};
use crate::core::models::well::PlateShape;
use crate::core::quant::formulas::NL_PER_L;
use tracing::{debug, warn};

/// Equal relative abundance for every well of the plate.
pub fn uniform_weights(shape: PlateShape) -> PlateArray<f64> {
    PlateArray::from_element(shape, 1.0 / shape.len() as f64)
}

/// Rescales weights to sum to 1. Returns `None` when nothing carries weight.
pub fn normalized_weights(weights: &PlateArray<f64>) -> Option<PlateArray<f64>> {
    let total: f64 = weights.values().sum();
    if total > 0.0 && total.is_finite() {
        Some(weights.map(|w| w / total))
    } else {
        None
    }
}

fn checked_weights(
    concs: &Measurements,
    weights: Option<&PlateArray<f64>>,
) -> Result<PlateArray<f64>, EngineError> {
    let Some(weights) = weights else {
        return Ok(uniform_weights(concs.shape()));
    };
    concs.ensure_same_shape(weights)?;
    if let Some((well, &value)) = weights.iter().find(|(_, w)| !(w.is_finite() && **w >= 0.0)) {
        return Err(EngineError::InvalidWeight {
            well: well.to_string(),
            value,
        });
    }
    Ok(weights.clone())
}

/// Per-well pooling volumes (nL) for library molarities `concs` (nM).
///
/// `weights` are the relative abundances each library should have in the pool
/// and default to equal-molar. The result has the shape of `concs` and never
/// contains negative volumes.
pub fn compute_pooling_volumes(
    concs: &Measurements,
    weights: Option<&PlateArray<f64>>,
    policy: &PoolingPolicy,
) -> Result<PlateArray<f64>, EngineError> {
    policy.validate()?;
    let weights = checked_weights(concs, weights)?;

    let volumes = match *policy {
        PoolingPolicy::EqualVolume { total_volume_ul } => {
            let per_well = total_volume_ul / concs.len() as f64 * 1000.0;
            PlateArray::from_element(concs.shape(), per_well)
        }
        PoolingPolicy::ExclusionFloor {
            min_conc,
            floor_conc,
            total_nmol,
        } => {
            let passing = concs.zip_map(&weights, |c, &w| match c {
                Some(c) if *c > min_conc => w,
                _ => 0.0,
            })?;
            let excluded = concs
                .values()
                .filter(|c| !matches!(c, Some(c) if *c > min_conc))
                .count();
            let fractions =
                normalized_weights(&passing).ok_or(EngineError::DegenerateNormalization {
                    total_wells: concs.len(),
                    excluded,
                    min_conc,
                })?;
            if excluded > 0 {
                warn!(
                    excluded,
                    min_conc, "Wells without a concentration above the minimum are left out of the pool."
                );
            }
            concs.zip_map(&fractions, |c, &w| match c {
                Some(c) if w > 0.0 => total_nmol * w / c.max(floor_conc) * NL_PER_L,
                _ => 0.0,
            })?
        }
        PoolingPolicy::MinimumVolumeFloor {
            floor_vol,
            floor_conc,
            total_nmol,
        } => concs.zip_map(&weights, |c, &w| match c {
            Some(c) if *c < floor_conc => floor_vol,
            Some(c) => total_nmol * w / c * NL_PER_L,
            None => 0.0,
        })?,
    };

    debug!(
        policy = policy.name(),
        total_nl = volumes.values().sum::<f64>(),
        "Computed pooling volumes."
    );
    Ok(volumes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::ConfigError;

    fn plate(values: Vec<Option<f64>>) -> Measurements {
        let shape = PlateShape::new(1, values.len()).unwrap();
        PlateArray::from_row_major(shape, values).unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9 * b.abs().max(1.0)
    }

    #[test]
    fn equal_volume_splits_the_total_over_the_plate() {
        let concs = plate(vec![Some(1.0), None, Some(500.0), Some(0.0)]);
        let vols = compute_pooling_volumes(&concs, None, &PoolingPolicy::equal_volume()).unwrap();
        assert!(vols.values().all(|&v| approx(v, 15000.0)));
    }

    #[test]
    fn exclusion_floor_renormalizes_surviving_weights() {
        let concs = plate(vec![Some(5.0), Some(10.0), Some(100.0), Some(200.0)]);
        let policy = PoolingPolicy::exclusion_floor();
        let vols = compute_pooling_volumes(&concs, None, &policy).unwrap().to_row_major();

        assert_eq!(vols[0], 0.0);
        assert_eq!(vols[1], 0.0);
        // 0.01 nmol split over two surviving wells.
        assert!(approx(vols[2], 0.005 / 100.0 * 1e9));
        assert!(approx(vols[3], 0.005 / 200.0 * 1e9));

        let pooled_nmol: f64 = [(vols[2], 100.0), (vols[3], 200.0)]
            .iter()
            .map(|(v, c)| v * c / 1e9)
            .sum();
        assert!(approx(pooled_nmol, 0.01));
    }

    #[test]
    fn exclusion_floor_raises_dilute_wells_to_the_floor() {
        let concs = plate(vec![Some(20.0), Some(50.0), None]);
        let vols = compute_pooling_volumes(&concs, None, &PoolingPolicy::exclusion_floor())
            .unwrap()
            .to_row_major();
        assert!(approx(vols[0], 0.005 / 50.0 * 1e9));
        assert!(approx(vols[1], vols[0]));
        assert_eq!(vols[2], 0.0);
    }

    #[test]
    fn normalized_weights_sum_to_one() {
        let weights = PlateArray::from_row_major(PlateShape::new(1, 3).unwrap(), vec![1.0, 3.0, 0.0])
            .unwrap();
        let normalized = normalized_weights(&weights).unwrap();
        assert!(approx(normalized.values().sum::<f64>(), 1.0));
        assert_eq!(normalized.to_row_major(), vec![0.25, 0.75, 0.0]);
        assert!(normalized_weights(&PlateArray::from_element(PlateShape::PLATE_96, 0.0)).is_none());
    }

    #[test]
    fn custom_weights_shift_the_molar_share() {
        let concs = plate(vec![Some(100.0), Some(100.0)]);
        let weights = PlateArray::from_row_major(PlateShape::new(1, 2).unwrap(), vec![3.0, 1.0]).unwrap();
        let vols = compute_pooling_volumes(&concs, Some(&weights), &PoolingPolicy::exclusion_floor())
            .unwrap()
            .to_row_major();
        assert!(approx(vols[0], 3.0 * vols[1]));
    }

    #[test]
    fn zero_weighted_wells_do_not_count_as_excluded() {
        let concs = plate(vec![Some(100.0), Some(100.0), Some(1.0)]);
        let weights =
            PlateArray::from_row_major(PlateShape::new(1, 3).unwrap(), vec![0.0, 0.0, 1.0]).unwrap();
        match compute_pooling_volumes(&concs, Some(&weights), &PoolingPolicy::exclusion_floor()) {
            Err(EngineError::DegenerateNormalization {
                total_wells,
                excluded,
                ..
            }) => assert_eq!((total_wells, excluded), (3, 1)),
            other => panic!("expected a degenerate normalization, got {other:?}"),
        }
    }

    #[test]
    fn exclusion_floor_with_no_survivors_is_degenerate() {
        let concs = plate(vec![Some(1.0), None, Some(10.0)]);
        let err = compute_pooling_volumes(&concs, None, &PoolingPolicy::exclusion_floor()).unwrap_err();
        match err {
            EngineError::DegenerateNormalization {
                total_wells,
                excluded,
                min_conc,
            } => {
                assert_eq!((total_wells, excluded), (3, 3));
                assert_eq!(min_conc, 10.0);
            }
            other => panic!("expected a degenerate normalization, got {other:?}"),
        }
    }

    #[test]
    fn minimum_volume_floor_pins_dilute_wells_to_the_floor_volume() {
        let concs = plate(vec![Some(39.9), Some(40.0), Some(80.0), None]);
        let vols = compute_pooling_volumes(&concs, None, &PoolingPolicy::minimum_volume_floor())
            .unwrap()
            .to_row_major();
        assert_eq!(vols[0], 100.0);
        assert!(approx(vols[1], 0.01 * 0.25 / 40.0 * 1e9));
        assert!(approx(vols[2], 0.01 * 0.25 / 80.0 * 1e9));
        assert_eq!(vols[3], 0.0);
    }

    #[test]
    fn minimum_volume_floor_keeps_volumes_finite_for_empty_wells() {
        let concs = plate(vec![Some(0.0), Some(-5.0), Some(100.0)]);
        let zero_floor = PoolingPolicy::MinimumVolumeFloor {
            floor_vol: 100.0,
            floor_conc: 0.0,
            total_nmol: 0.01,
        };
        assert!(matches!(
            compute_pooling_volumes(&concs, None, &zero_floor),
            Err(EngineError::Config(ConfigError::InvalidParameter {
                name: "floor_conc",
                ..
            }))
        ));

        let policy = PoolingPolicy::MinimumVolumeFloor {
            floor_vol: 100.0,
            floor_conc: 1.0,
            total_nmol: 0.01,
        };
        let vols = compute_pooling_volumes(&concs, None, &policy)
            .unwrap()
            .to_row_major();
        assert_eq!(&vols[..2], &[100.0, 100.0]);
        assert!(vols.iter().all(|v| v.is_finite() && *v >= 0.0));
    }

    #[test]
    fn weights_must_match_and_be_non_negative() {
        let concs = plate(vec![Some(100.0), Some(100.0)]);
        let wrong_shape = PlateArray::from_element(PlateShape::PLATE_96, 1.0);
        assert!(matches!(
            compute_pooling_volumes(&concs, Some(&wrong_shape), &PoolingPolicy::exclusion_floor()),
            Err(EngineError::Plate(_))
        ));

        let negative = PlateArray::from_row_major(PlateShape::new(1, 2).unwrap(), vec![1.0, -1.0]).unwrap();
        match compute_pooling_volumes(&concs, Some(&negative), &PoolingPolicy::exclusion_floor()) {
            Err(EngineError::InvalidWeight { well, value }) => {
                assert_eq!(well, "A2");
                assert_eq!(value, -1.0);
            }
            other => panic!("expected an invalid weight, got {other:?}"),
        }
    }

    #[test]
    fn invalid_policy_parameters_are_rejected() {
        let concs = plate(vec![Some(100.0)]);
        let policy = PoolingPolicy::EqualVolume {
            total_volume_ul: -1.0,
        };
        assert!(matches!(
            compute_pooling_volumes(&concs, None, &policy),
            Err(EngineError::Config(ConfigError::InvalidParameter { .. }))
        ));
    }
}
