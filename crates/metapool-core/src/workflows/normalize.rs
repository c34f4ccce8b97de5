use crate::core::models::plate::{Measurements, PlateArray, SampleNames};
use crate::core::models::well::Well;
use crate::core::picklist::format::Picklist;
use crate::core::picklist::normalization::{
    NormalizationPlates, NormalizationRow, format_dna_norm_picklist,
};
use crate::core::quant::calculator::calculate_norm_vol;
use crate::engine::config::NormalizationConfig;
use crate::engine::error::EngineError;
use tracing::{debug, info, instrument};

#[derive(Debug, Clone)]
pub struct NormalizationResult {
    pub dna_vols: PlateArray<f64>,
    pub water_vols: PlateArray<f64>,
    pub picklist: Picklist<NormalizationRow>,
}

/// Optional per-well annotations carried into the normalization picklist.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleLayout<'a> {
    pub sample_names: Option<&'a SampleNames>,
    pub source_wells: Option<&'a PlateArray<Well>>,
    pub dest_wells: Option<&'a PlateArray<Well>>,
}

/// Normalizes every sample on a plate to the configured DNA mass.
///
/// Each well receives enough DNA to reach `target_ng` and is topped up with
/// water to `max_vol`, so all destination wells end up with the same volume.
#[instrument(skip_all, name = "normalization_workflow")]
pub fn run(
    dna_concs: &Measurements,
    layout: SampleLayout<'_>,
    config: &NormalizationConfig,
) -> Result<NormalizationResult, EngineError> {
    info!(
        wells = dna_concs.len(),
        target_ng = config.target_ng,
        "Computing normalization volumes."
    );

    let dna_vols = calculate_norm_vol(dna_concs, config.target_ng, &config.bounds);
    let max_vol = config.bounds.max_vol();
    let water_vols = dna_vols.map(|v| (max_vol - v).max(0.0));

    let missing = dna_concs.values().filter(|c| c.is_none()).count();
    if missing > 0 {
        debug!(missing, "Wells without a concentration receive the maximum DNA volume.");
    }

    let mut plates = NormalizationPlates::new(&dna_vols, &water_vols).dna_concs(dna_concs);
    if let Some(names) = layout.sample_names {
        plates = plates.sample_names(names);
    }
    if let Some(wells) = layout.source_wells {
        plates = plates.source_wells(wells);
    }
    if let Some(wells) = layout.dest_wells {
        plates = plates.dest_wells(wells);
    }
    let picklist = format_dna_norm_picklist(&plates, &config.labels)?;

    info!(
        transfers = picklist.len(),
        total_dna_nl = dna_vols.values().sum::<f64>(),
        "Normalization picklist ready."
    );
    Ok(NormalizationResult {
        dna_vols,
        water_vols,
        picklist,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::plate::PlateError;
    use crate::core::models::well::PlateShape;
    use crate::engine::config::NormalizationConfigBuilder;

    fn config() -> NormalizationConfig {
        NormalizationConfigBuilder::new().target_ng(5.0).build().unwrap()
    }

    #[test]
    fn dna_and_water_add_up_to_the_maximum_volume() {
        let shape = PlateShape::new(1, 4).unwrap();
        let concs =
            PlateArray::from_row_major(shape, vec![Some(10.0), Some(1e6), None, Some(0.5)]).unwrap();
        let result = run(&concs, SampleLayout::default(), &config()).unwrap();

        assert_eq!(result.dna_vols.to_row_major(), vec![500.0, 2.5, 3500.0, 3500.0]);
        assert_eq!(
            result.water_vols.to_row_major(),
            vec![3000.0, 3497.5, 0.0, 0.0]
        );
        assert_eq!(result.picklist.len(), 8);
        assert_eq!(result.picklist.rows()[0].source_plate_name, "Water");
        assert_eq!(result.picklist.rows()[4].source_plate_name, "Sample");
    }

    #[test]
    fn sample_names_flow_into_the_picklist() {
        let shape = PlateShape::new(1, 2).unwrap();
        let concs = PlateArray::from_element(shape, Some(5.0));
        let names =
            PlateArray::from_row_major(shape, vec![Some("s1".to_string()), None]).unwrap();
        let layout = SampleLayout {
            sample_names: Some(&names),
            ..SampleLayout::default()
        };
        let result = run(&concs, layout, &config()).unwrap();
        let samples: Vec<Option<String>> =
            result.picklist.rows().iter().map(|r| r.sample.clone()).collect();
        assert_eq!(
            samples,
            vec![Some("s1".to_string()), None, Some("s1".to_string()), None]
        );
    }

    #[test]
    fn mismatched_layouts_fail_the_whole_run() {
        let concs = PlateArray::from_element(PlateShape::new(1, 2).unwrap(), Some(5.0));
        let names = PlateArray::from_element(PlateShape::PLATE_96, None);
        let layout = SampleLayout {
            sample_names: Some(&names),
            ..SampleLayout::default()
        };
        let err = run(&concs, layout, &config()).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Picklist(crate::core::picklist::format::PicklistError::Plate(
                PlateError::ShapeMismatch { .. }
            ))
        ));
    }
}
