use super::format::{Delimiter, Picklist, PicklistError, PicklistRow, format_amount};
use crate::core::index::combos::IndexCombo;
use crate::core::models::well::Well;

pub const DEFAULT_INDEX_VOL_NL: f64 = 250.0;
pub const DEFAULT_INDEX_PLATE_TYPE: &str = "384LDV_AQ_B2_HT";
pub const DEFAULT_INDEX_DEST_PLATE_NAME: &str = "IndexPCRPlate";

#[derive(Debug, Clone, PartialEq)]
pub struct IndexLabels {
    pub i5_vol: f64,
    pub i7_vol: f64,
    pub i5_plate_type: String,
    pub i7_plate_type: String,
    pub dest_plate_name: String,
}

impl Default for IndexLabels {
    fn default() -> Self {
        Self {
            i5_vol: DEFAULT_INDEX_VOL_NL,
            i7_vol: DEFAULT_INDEX_VOL_NL,
            i5_plate_type: DEFAULT_INDEX_PLATE_TYPE.to_string(),
            i7_plate_type: DEFAULT_INDEX_PLATE_TYPE.to_string(),
            dest_plate_name: DEFAULT_INDEX_DEST_PLATE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexRow {
    pub sample: String,
    pub source_plate_name: String,
    pub source_plate_type: String,
    pub source_well: String,
    pub transfer_volume: f64,
    pub index_name: String,
    pub index_sequence: String,
    pub index_combo: u32,
    pub dest_plate_name: String,
    pub dest_well: Well,
}

impl PicklistRow for IndexRow {
    const HEADER: &'static [&'static str] = &[
        "Sample",
        "Source Plate Name",
        "Source Plate Type",
        "Source Well",
        "Transfer Volume",
        "Index Name",
        "Index Sequence",
        "Index Combo",
        "Destination Plate Name",
        "Destination Well",
    ];

    fn fields(&self) -> Vec<String> {
        vec![
            self.sample.clone(),
            self.source_plate_name.clone(),
            self.source_plate_type.clone(),
            self.source_well.clone(),
            format_amount(self.transfer_volume),
            self.index_name.clone(),
            self.index_sequence.clone(),
            self.index_combo.to_string(),
            self.dest_plate_name.clone(),
            self.dest_well.to_string(),
        ]
    }
}

#[derive(Clone, Copy)]
enum Barcode {
    I5,
    I7,
}

fn index_row(
    barcode: Barcode,
    sample: &str,
    well: Well,
    combo: &IndexCombo,
    labels: &IndexLabels,
) -> IndexRow {
    let (plate, plate_type, source_well, vol, name, sequence) = match barcode {
        Barcode::I5 => (
            &combo.i5_plate,
            &labels.i5_plate_type,
            &combo.i5_well,
            labels.i5_vol,
            &combo.i5_name,
            &combo.i5_sequence,
        ),
        Barcode::I7 => (
            &combo.i7_plate,
            &labels.i7_plate_type,
            &combo.i7_well,
            labels.i7_vol,
            &combo.i7_name,
            &combo.i7_sequence,
        ),
    };
    IndexRow {
        sample: sample.to_string(),
        source_plate_name: plate.clone(),
        source_plate_type: plate_type.clone(),
        source_well: source_well.clone(),
        transfer_volume: vol,
        index_name: name.clone(),
        index_sequence: sequence.clone(),
        index_combo: combo.index_combo,
        dest_plate_name: labels.dest_plate_name.clone(),
        dest_well: well,
    }
}

/// Builds the Echo picklist that adds one i5 and one i7 barcode to each sample.
///
/// `sample_names`, `sample_wells` and `indices` are parallel lists. All i5
/// transfers are listed first, then all i7 transfers, each in sample order.
pub fn format_index_picklist<S: AsRef<str>>(
    sample_names: &[S],
    sample_wells: &[Well],
    indices: &[IndexCombo],
    labels: &IndexLabels,
) -> Result<Picklist<IndexRow>, PicklistError> {
    let expected = sample_names.len();
    for (what, found) in [("sample_wells", sample_wells.len()), ("indices", indices.len())] {
        if found != expected {
            return Err(PicklistError::LengthMismatch {
                what,
                expected,
                found,
            });
        }
    }

    let rows = [Barcode::I5, Barcode::I7]
        .into_iter()
        .flat_map(move |barcode| {
            sample_names
                .iter()
                .zip(sample_wells)
                .zip(indices)
                .map(move |((sample, &well), combo)| {
                    index_row(barcode, sample.as_ref(), well, combo, labels)
                })
        })
        .collect();

    Ok(Picklist::with_rows(Delimiter::Tab, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::index::combos::sample_combos;

    fn wells(names: &[&str]) -> Vec<Well> {
        names.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn i5_block_precedes_i7_block() {
        let combos = sample_combos(2);
        let picklist = format_index_picklist(
            &["sam1", "sam2"],
            &wells(&["A1", "B1"]),
            &combos,
            &IndexLabels::default(),
        )
        .unwrap();

        let lines: Vec<String> = picklist.to_string().lines().map(str::to_string).collect();
        assert_eq!(
            lines[0],
            "Sample\tSource Plate Name\tSource Plate Type\tSource Well\tTransfer Volume\tIndex Name\tIndex Sequence\tIndex Combo\tDestination Plate Name\tDestination Well"
        );
        assert_eq!(
            lines[1],
            "sam1\tiTru5_plate\t384LDV_AQ_B2_HT\tA1\t250.00\tiTru5_00\tACGTACGT\t0\tIndexPCRPlate\tA1"
        );
        assert_eq!(
            lines[2],
            "sam2\tiTru5_plate\t384LDV_AQ_B2_HT\tA2\t250.00\tiTru5_01\tACGTACGT\t1\tIndexPCRPlate\tB1"
        );
        assert_eq!(
            lines[3],
            "sam1\tiTru7_plate\t384LDV_AQ_B2_HT\tB1\t250.00\tiTru7_00\tTTGGCCAA\t0\tIndexPCRPlate\tA1"
        );
        assert_eq!(lines.len(), 5);
    }

    #[test]
    fn custom_labels_are_applied_per_barcode() {
        let combos = sample_combos(1);
        let labels = IndexLabels {
            i5_vol: 100.0,
            i7_vol: 200.0,
            ..IndexLabels::default()
        };
        let picklist =
            format_index_picklist(&["s"], &wells(&["C5"]), &combos, &labels).unwrap();
        let vols: Vec<f64> = picklist.rows().iter().map(|r| r.transfer_volume).collect();
        assert_eq!(vols, vec![100.0, 200.0]);
    }

    #[test]
    fn parallel_lists_must_have_equal_length() {
        let combos = sample_combos(1);
        let err = format_index_picklist(
            &["s1", "s2"],
            &wells(&["A1", "A2"]),
            &combos,
            &IndexLabels::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            PicklistError::LengthMismatch {
                what: "indices",
                expected: 2,
                found: 1
            }
        );
    }
}
