use super::error::TabularError;
use super::table::{column_index, delimited_reader, parse_well};
use super::traits::TabularFile;
use crate::core::models::plate::{PlateError, SampleNames, build_plate_array};
use crate::core::models::well::{PlateShape, Well};
use crate::core::utils::identifiers::find_duplicates;
use serde::Deserialize;
use std::io::BufRead;
use tracing::warn;

#[derive(Debug, Deserialize)]
struct RawPlateMapRow {
    #[serde(rename = "Sample")]
    sample: Option<String>,
    #[serde(rename = "Row")]
    row: Option<String>,
    #[serde(rename = "Col")]
    col: Option<String>,
}

/// A sample and the well it occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateMapEntry {
    pub sample: String,
    pub well: Well,
}

/// Sample layout sheet with `Sample`, `Row` (letter) and `Col` (number) columns.
#[derive(Debug, Clone, Copy)]
pub struct PlateMapFile {
    pub delimiter: u8,
}

impl Default for PlateMapFile {
    fn default() -> Self {
        Self { delimiter: b'\t' }
    }
}

impl TabularFile for PlateMapFile {
    type Record = PlateMapEntry;
    type Error = TabularError;

    fn read_from(&self, reader: &mut impl BufRead) -> Result<Vec<PlateMapEntry>, TabularError> {
        let mut csv = delimited_reader(self.delimiter, reader);
        let headers = csv.headers()?.clone();
        for column in ["Sample", "Row", "Col"] {
            column_index(&headers, &[column])?;
        }

        let mut entries = Vec::new();
        let mut empty_wells = 0;
        for (i, row) in csv.deserialize::<RawPlateMapRow>().enumerate() {
            let row = row?;
            let line = i + 2;
            let Some(sample) = row.sample.filter(|s| !s.is_empty()) else {
                empty_wells += 1;
                continue;
            };
            let address = format!(
                "{}{}",
                row.row.unwrap_or_default(),
                row.col.unwrap_or_default()
            );
            entries.push(PlateMapEntry {
                sample,
                well: parse_well(&address, line)?,
            });
        }

        if empty_wells > 0 {
            warn!(
                "This plate map contains {} empty wells, these will be ignored.",
                empty_wells
            );
        }

        let duplicates = find_duplicates(entries.iter().map(|e| e.sample.as_str()));
        if !duplicates.is_empty() {
            return Err(TabularError::DuplicateSamples(duplicates));
        }
        Ok(entries)
    }
}

/// Places sample names on a plate, leaving unassigned wells empty.
pub fn sample_names_plate(
    entries: &[PlateMapEntry],
    shape: PlateShape,
) -> Result<SampleNames, PlateError> {
    build_plate_array(entries.iter().map(|e| (e.well, e.sample.clone())), shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(text: &str) -> Result<Vec<PlateMapEntry>, TabularError> {
        PlateMapFile::default().read_from(&mut Cursor::new(text.as_bytes()))
    }

    #[test]
    fn reads_samples_and_builds_wells() {
        let entries = read("Sample\tRow\tCol\tBlank\nsam1\tA\t1\tFalse\nsam2\tB\t12\tFalse\n").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].sample, "sam2");
        assert_eq!(entries[1].well.to_string(), "B12");
    }

    #[test]
    fn skips_wells_without_a_sample() {
        let entries = read("Sample\tRow\tCol\nsam1\tA\t1\n\tA\t2\nsam3\tA\t3\n").unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.sample.as_str()).collect();
        assert_eq!(names, ["sam1", "sam3"]);
    }

    #[test]
    fn duplicated_samples_are_named_in_sorted_order() {
        let err = read("Sample\tRow\tCol\nz\tA\t1\nz\tA\t2\nb\tA\t3\nb\tA\t4\n").unwrap_err();
        match err {
            TabularError::DuplicateSamples(names) => assert_eq!(names, vec!["b", "z"]),
            other => panic!("expected duplicate samples, got {other:?}"),
        }
    }

    #[test]
    fn missing_columns_are_reported() {
        let err = read("Sample\tWell\nsam1\tA1\n").unwrap_err();
        assert!(matches!(err, TabularError::MissingColumn { .. }));
    }

    #[test]
    fn sample_names_land_on_their_wells() {
        let entries = read("Sample\tRow\tCol\nsam1\tB\t2\n").unwrap();
        let plate = sample_names_plate(&entries, PlateShape::PLATE_96).unwrap();
        assert_eq!(
            plate.get("B2".parse().unwrap()),
            Some(&Some("sam1".to_string()))
        );
        assert_eq!(plate.get("A1".parse().unwrap()), Some(&None));
    }

    #[test]
    fn read_from_path_opens_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plate_map.tsv");
        std::fs::write(&path, "Sample\tRow\tCol\nsam1\tC\t3\n").unwrap();
        let entries = PlateMapFile::default().read_from_path(&path).unwrap();
        assert_eq!(entries[0].well.to_string(), "C3");
    }
}
