use super::format::{
    Delimiter, Picklist, PicklistError, PicklistRow, format_amount, format_optional_amount,
};
use crate::core::models::plate::{Measurements, PlateArray};
use crate::core::models::well::{PlateShape, Well, row_letter};
use nalgebra::Scalar;

pub const DEFAULT_MAX_VOL_PER_WELL_NL: f64 = 60000.0;
pub const DEFAULT_POOL_SOURCE_PLATE_NAME: &str = "1";
pub const DEFAULT_POOL_SOURCE_PLATE_TYPE: &str = "384LDV_AQ_B2_HT";
pub const DEFAULT_POOL_DEST_PLATE_NAME: &str = "NormalizedDNA";

#[derive(Debug, Clone, PartialEq)]
pub struct PoolingPicklistOptions {
    pub source_plate_name: String,
    pub source_plate_type: String,
    pub dest_plate_name: String,
    pub max_vol_per_well: f64,
    pub dest_shape: PlateShape,
}

impl Default for PoolingPicklistOptions {
    fn default() -> Self {
        Self {
            source_plate_name: DEFAULT_POOL_SOURCE_PLATE_NAME.to_string(),
            source_plate_type: DEFAULT_POOL_SOURCE_PLATE_TYPE.to_string(),
            dest_plate_name: DEFAULT_POOL_DEST_PLATE_NAME.to_string(),
            max_vol_per_well: DEFAULT_MAX_VOL_PER_WELL_NL,
            dest_shape: PlateShape::PLATE_384,
        }
    }
}

/// Tracks which destination well a pool is currently filling.
///
/// The counter starts at 1. Adding a volume that would push the current well
/// past `max_vol_per_well` moves on to the next well, whose running total then
/// starts at that volume.
#[derive(Debug, Clone, PartialEq)]
pub struct DestinationCursor {
    counter: usize,
    running_total: f64,
    max_vol_per_well: f64,
    dest_shape: PlateShape,
}

impl DestinationCursor {
    pub fn new(max_vol_per_well: f64, dest_shape: PlateShape) -> Self {
        Self {
            counter: 1,
            running_total: 0.0,
            max_vol_per_well,
            dest_shape,
        }
    }

    pub fn counter(&self) -> usize {
        self.counter
    }

    pub fn running_total(&self) -> f64 {
        self.running_total
    }

    /// Accounts for `volume` and returns the label of the well receiving it.
    pub fn advance(&mut self, volume: f64) -> Result<String, PicklistError> {
        if self.running_total + volume > self.max_vol_per_well {
            self.counter += 1;
            self.running_total = volume;
        } else {
            self.running_total += volume;
        }
        self.label()
    }

    /// Label of the current destination well.
    ///
    /// The row is `counter / rows` and the column `counter % cols`, so labels
    /// can carry a zero column (`B0` on a 16x24 plate). Downstream sheets
    /// depend on these labels.
    pub fn label(&self) -> Result<String, PicklistError> {
        let row = self.counter / self.dest_shape.rows;
        if row >= self.dest_shape.rows {
            return Err(PicklistError::DestinationOverflow {
                counter: self.counter,
                shape: self.dest_shape,
            });
        }
        Ok(format!(
            "{}{}",
            row_letter(row),
            self.counter % self.dest_shape.cols
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PoolingRow {
    pub source_plate_name: String,
    pub source_plate_type: String,
    pub source_well: Well,
    pub concentration: Option<f64>,
    pub transfer_volume: f64,
    pub dest_plate_name: String,
    pub dest_well: String,
}

impl PicklistRow for PoolingRow {
    const HEADER: &'static [&'static str] = &[
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
            self.source_plate_name.clone(),
            self.source_plate_type.clone(),
            self.source_well.to_string(),
            format_optional_amount(self.concentration),
            format_amount(self.transfer_volume),
            self.dest_plate_name.clone(),
            self.dest_well.clone(),
        ]
    }
}

/// Builds the comma-delimited Echo picklist that pools every well of a plate.
///
/// Wells are visited row-major. Missing volumes are written as zero so that
/// unpooled wells still appear in the picklist; a NaN or infinite volume is an
/// error.
pub fn format_pooling_picklist<V>(
    volumes: &PlateArray<V>,
    concentrations: Option<&Measurements>,
    options: &PoolingPicklistOptions,
) -> Result<Picklist<PoolingRow>, PicklistError>
where
    V: Scalar + Copy + Into<Option<f64>>,
{
    if let Some(concs) = concentrations {
        volumes.ensure_same_shape(concs)?;
    }

    let mut cursor = DestinationCursor::new(options.max_vol_per_well, options.dest_shape);
    let mut rows = Vec::with_capacity(volumes.len());

    for (well, &vol) in volumes.iter() {
        let vol = match Into::<Option<f64>>::into(vol) {
            Some(v) if !v.is_finite() => {
                return Err(PicklistError::NonFiniteVolume { well, value: v });
            }
            Some(v) => v,
            None => 0.0,
        };
        let dest_well = cursor.advance(vol)?;
        rows.push(PoolingRow {
            source_plate_name: options.source_plate_name.clone(),
            source_plate_type: options.source_plate_type.clone(),
            source_well: well,
            concentration: concentrations.and_then(|c| c.get(well).copied()).flatten(),
            transfer_volume: vol,
            dest_plate_name: options.dest_plate_name.clone(),
            dest_well,
        });
    }

    Ok(Picklist::with_rows(Delimiter::Comma, rows))
}
