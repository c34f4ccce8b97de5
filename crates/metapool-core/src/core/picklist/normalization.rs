use super::format::{
    Delimiter, Picklist, PicklistError, PicklistRow, format_amount, format_optional_amount,
};
use crate::core::models::plate::{Measurements, PlateArray, SampleNames};
use crate::core::models::well::Well;

pub const DEFAULT_WATER_PLATE_NAME: &str = "Water";
pub const DEFAULT_SOURCE_PLATE_TYPE: &str = "384PP_AQ_BP2_HT";
pub const DEFAULT_SAMPLE_PLATE_NAME: &str = "Sample";
pub const DEFAULT_NORM_DEST_PLATE_NAME: &str = "NormalizedDNA";

/// Plate names and types stamped on a normalization picklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizationLabels {
    pub water_plate_name: String,
    pub water_plate_type: String,
    pub dna_plate_type: String,
    pub sample_plate_name: String,
    pub dest_plate_name: String,
}

impl Default for NormalizationLabels {
    fn default() -> Self {
        Self {
            water_plate_name: DEFAULT_WATER_PLATE_NAME.to_string(),
            water_plate_type: DEFAULT_SOURCE_PLATE_TYPE.to_string(),
            dna_plate_type: DEFAULT_SOURCE_PLATE_TYPE.to_string(),
            sample_plate_name: DEFAULT_SAMPLE_PLATE_NAME.to_string(),
            dest_plate_name: DEFAULT_NORM_DEST_PLATE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationRow {
    pub sample: Option<String>,
    pub source_plate_name: String,
    pub source_plate_type: String,
    pub source_well: Well,
    pub concentration: Option<f64>,
    pub transfer_volume: f64,
    pub dest_plate_name: String,
    pub dest_well: Well,
}

impl PicklistRow for NormalizationRow {
    const HEADER: &'static [&'static str] = &[
        "Sample",
        "Source Plate Name",
        "Source Plate Type",
        "Source Well",
        "Concentration",
        "Transfer Volume",
        "Destination Plate Name",
        "Destination Well",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.sample.clone().unwrap_or_default(),
            self.source_plate_name.clone(),
            self.source_plate_type.clone(),
            self.source_well.to_string(),
            format_optional_amount(self.concentration),
            format_amount(self.transfer_volume),
            self.dest_plate_name.clone(),
            self.dest_well.to_string(),
        ]
    }
}

/// The co-indexed plates a normalization picklist is assembled from.
///
/// Only the DNA and water volumes are required. Source wells default to the
/// position of each value on the plate and destination wells default to the
/// source wells.
#[derive(Debug, Clone, Copy)]
pub struct NormalizationPlates<'a> {
    pub dna_vols: &'a PlateArray<f64>,
    pub water_vols: &'a PlateArray<f64>,
    pub source_wells: Option<&'a PlateArray<Well>>,
    pub dest_wells: Option<&'a PlateArray<Well>>,
    pub dna_concs: Option<&'a Measurements>,
    pub sample_names: Option<&'a SampleNames>,
}

impl<'a> NormalizationPlates<'a> {
    pub fn new(dna_vols: &'a PlateArray<f64>, water_vols: &'a PlateArray<f64>) -> Self {
        Self {
            dna_vols,
            water_vols,
            source_wells: None,
            dest_wells: None,
            dna_concs: None,
            sample_names: None,
        }
    }

    pub fn source_wells(mut self, wells: &'a PlateArray<Well>) -> Self {
        self.source_wells = Some(wells);
        self
    }

    pub fn dest_wells(mut self, wells: &'a PlateArray<Well>) -> Self {
        self.dest_wells = Some(wells);
        self
    }

    pub fn dna_concs(mut self, concs: &'a Measurements) -> Self {
        self.dna_concs = Some(concs);
        self
    }

    pub fn sample_names(mut self, names: &'a SampleNames) -> Self {
        self.sample_names = Some(names);
        self
    }

    fn check_shapes(&self) -> Result<(), PicklistError> {
        self.dna_vols.ensure_same_shape(self.water_vols)?;
        if let Some(wells) = self.source_wells {
            self.dna_vols.ensure_same_shape(wells)?;
        }
        if let Some(wells) = self.dest_wells {
            self.dna_vols.ensure_same_shape(wells)?;
        }
        if let Some(concs) = self.dna_concs {
            self.dna_vols.ensure_same_shape(concs)?;
        }
        if let Some(names) = self.sample_names {
            self.dna_vols.ensure_same_shape(names)?;
        }
        Ok(())
    }
}

/// Builds the Echo picklist that tops every sample up to a common mass.
///
/// Every water transfer is listed before every DNA transfer; each block walks
/// the plate row-major and contains one row per well, zero volumes included.
pub fn format_dna_norm_picklist(
    plates: &NormalizationPlates<'_>,
    labels: &NormalizationLabels,
) -> Result<Picklist<NormalizationRow>, PicklistError> {
    plates.check_shapes()?;

    let wells: Vec<(Well, Well, Option<String>, Option<f64>)> = plates
        .dna_vols
        .iter()
        .map(|(pos, _)| {
            let source = plates
                .source_wells
                .and_then(|w| w.get(pos).copied())
                .unwrap_or(pos);
            let dest = plates
                .dest_wells
                .and_then(|w| w.get(pos).copied())
                .unwrap_or(source);
            let sample = plates
                .sample_names
                .and_then(|n| n.get(pos).cloned())
                .flatten();
            let conc = plates.dna_concs.and_then(|c| c.get(pos).copied()).flatten();
            (source, dest, sample, conc)
        })
        .collect();

    let water_rows = wells
        .iter()
        .zip(plates.water_vols.values())
        .map(|((source, dest, sample, conc), &vol)| NormalizationRow {
            sample: sample.clone(),
            source_plate_name: labels.water_plate_name.clone(),
            source_plate_type: labels.water_plate_type.clone(),
            source_well: *source,
            concentration: *conc,
            transfer_volume: vol,
            dest_plate_name: labels.dest_plate_name.clone(),
            dest_well: *dest,
        });

    let dna_rows = wells
        .iter()
        .zip(plates.dna_vols.values())
        .map(|((source, dest, sample, conc), &vol)| NormalizationRow {
            sample: sample.clone(),
            source_plate_name: labels.sample_plate_name.clone(),
            source_plate_type: labels.dna_plate_type.clone(),
            source_well: *source,
            concentration: *conc,
            transfer_volume: vol,
            dest_plate_name: labels.dest_plate_name.clone(),
            dest_well: *dest,
        });

    Ok(Picklist::with_rows(
        Delimiter::Tab,
        water_rows.chain(dna_rows).collect(),
    ))
}
