use super::error::TabularError;
use super::table::delimited_reader;
use super::traits::TabularFile;
use crate::core::index::combos::IndexCombo;
use std::io::BufRead;

/// Comma-separated table of index combinations, one [`IndexCombo`] per row.
#[derive(Debug, Clone, Copy)]
pub struct IndexComboFile {
    pub delimiter: u8,
}

impl Default for IndexComboFile {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl TabularFile for IndexComboFile {
    type Record = IndexCombo;
    type Error = TabularError;

    fn read_from(&self, reader: &mut impl BufRead) -> Result<Vec<IndexCombo>, TabularError> {
        let mut csv = delimited_reader(self.delimiter, reader);
        let combos = csv
            .deserialize::<IndexCombo>()
            .collect::<Result<Vec<_>, _>>()?;
        Ok(combos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_index_combinations() {
        let text = "index combo,i5 name,i5 sequence,i5 well,i5 plate,i7 name,i7 sequence,i7 well,i7 plate\n\
0,iTru5_01_A,ACCGACAA,A1,iTru5_plate,iTru7_101_01,ACGTTACC,A1,iTru7_plate\n\
1,iTru5_01_B,AGTGGCAA,B1,iTru5_plate,iTru7_101_02,CTGTGTTG,A2,iTru7_plate\n";
        let combos = IndexComboFile::default()
            .read_from(&mut Cursor::new(text.as_bytes()))
            .unwrap();
        assert_eq!(combos.len(), 2);
        assert_eq!(combos[1].index_combo, 1);
        assert_eq!(combos[1].i5_sequence, "AGTGGCAA");
        assert_eq!(combos[1].i7_well, "A2");
    }

    #[test]
    fn malformed_rows_are_rejected() {
        let text = "index combo,i5 name\nnot-a-number,x\n";
        let err = IndexComboFile::default()
            .read_from(&mut Cursor::new(text.as_bytes()))
            .unwrap_err();
        assert!(matches!(err, TabularError::Csv(_)));
    }
}
