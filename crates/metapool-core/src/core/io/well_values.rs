use super::error::TabularError;
use super::table::{column_index, delimited_reader, parse_value, parse_well, reject_duplicate_wells};
use super::traits::TabularFile;
use crate::core::models::plate::{Measurements, PlateError, build_measurements};
use crate::core::models::well::{PlateShape, Well};
use std::io::BufRead;

/// A numeric reading for one well.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WellValue {
    pub well: Well,
    pub value: Option<f64>,
}

/// Any delimited table with one well-address column and one numeric column,
/// such as a qPCR export (`Pos`, `Cp`).
#[derive(Debug, Clone)]
pub struct WellValueFile {
    pub well_column: String,
    pub value_column: String,
    pub delimiter: u8,
    /// Lines to drop before the header row.
    pub skip_lines: usize,
}

impl WellValueFile {
    pub fn new(well_column: impl Into<String>, value_column: impl Into<String>) -> Self {
        Self {
            well_column: well_column.into(),
            value_column: value_column.into(),
            delimiter: b'\t',
            skip_lines: 0,
        }
    }

    /// LightCycler absolute-quantification export: an experiment title line,
    /// then a tab-delimited table with `Pos` and `Cp` columns.
    pub fn qpcr() -> Self {
        Self {
            skip_lines: 1,
            ..Self::new("Pos", "Cp")
        }
    }
}

impl TabularFile for WellValueFile {
    type Record = WellValue;
    type Error = TabularError;

    fn read_from(&self, reader: &mut impl BufRead) -> Result<Vec<WellValue>, TabularError> {
        let mut skipped = String::new();
        for _ in 0..self.skip_lines {
            skipped.clear();
            reader.read_line(&mut skipped)?;
        }

        let mut csv = delimited_reader(self.delimiter, reader);
        let headers = csv.headers()?.clone();
        let well_idx = column_index(&headers, &[self.well_column.as_str()])?;
        let value_idx = column_index(&headers, &[self.value_column.as_str()])?;

        let mut records = Vec::new();
        for (i, row) in csv.records().enumerate() {
            let row = row?;
            let line = self.skip_lines + i + 2;
            records.push(WellValue {
                well: parse_well(row.get(well_idx).unwrap_or(""), line)?,
                value: row.get(value_idx).and_then(parse_value),
            });
        }

        let wells: Vec<Well> = records.iter().map(|r| r.well).collect();
        reject_duplicate_wells(&wells)?;
        Ok(records)
    }
}

/// Places well readings on a plate of the given shape.
pub fn values_to_plate(records: &[WellValue], shape: PlateShape) -> Result<Measurements, PlateError> {
    build_measurements(records.iter().map(|r| (r.well, r.value)), shape)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const QPCR: &str = "Experiment: KL_qPCR_01  Selected Filter: SYBR Green I / HRM Dye (465-510)\n\
Include\tColor\tPos\tName\tCp\tConcentration\tStandard\tStatus\n\
True\t255\tA1\tSample 1\t20.55\t\t0\t\n\
True\t255\tA2\tSample 2\t\t\t0\t\n\
True\t255\tB1\tSample 3\t18.9\t\t0\t\n";

    #[test]
    fn reads_qpcr_exports() {
        let records = WellValueFile::qpcr()
            .read_from(&mut Cursor::new(QPCR.as_bytes()))
            .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].value, Some(20.55));
        assert_eq!(records[1].value, None);
        assert_eq!(records[2].well.to_string(), "B1");
    }

    #[test]
    fn readings_are_placed_on_the_plate() {
        let records = WellValueFile::qpcr()
            .read_from(&mut Cursor::new(QPCR.as_bytes()))
            .unwrap();
        let plate = values_to_plate(&records, PlateShape::new(2, 2).unwrap()).unwrap();
        assert_eq!(plate.to_row_major(), vec![Some(20.55), None, Some(18.9), None]);
    }

    #[test]
    fn custom_columns_and_delimiters_are_supported() {
        let file = WellValueFile {
            delimiter: b',',
            ..WellValueFile::new("Well", "nM")
        };
        let records = file
            .read_from(&mut Cursor::new("Well,nM\nC3,4.5\n".as_bytes()))
            .unwrap();
        assert_eq!(records[0].well.to_string(), "C3");
        assert_eq!(records[0].value, Some(4.5));
    }

    #[test]
    fn invalid_wells_carry_their_line_number() {
        let err = WellValueFile::new("Pos", "Cp")
            .read_from(&mut Cursor::new("Pos\tCp\nA1\t1\n??\t2\n".as_bytes()))
            .unwrap_err();
        assert!(matches!(err, TabularError::InvalidWell { line: 3, .. }));
    }
}
