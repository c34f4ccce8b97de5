use super::error::TabularError;
use super::table::{column_index, delimited_reader, parse_value, parse_well, reject_duplicate_wells};
use super::traits::TabularFile;
use crate::core::models::well::Well;
use crate::core::utils::identifiers::{UnknownVariant, lookup_variant};
use phf::{Map, phf_map};
use std::fmt;
use std::io::{BufRead, Read};
use std::str::FromStr;

const WELL_COLUMNS: &[&str] = &["Well", "Wells"];
const CONCENTRATION_COLUMNS: &[&str] = &["Concentration", "[Concentration]"];
const PREAMBLE_LINES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    Utf16,
}

/// Fluorescence plate readers whose PicoGreen exports can be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlateReader {
    #[default]
    SynergyHt,
    SpectraMaxI3x,
}

static PLATE_READERS: Map<&'static str, PlateReader> = phf_map! {
    "Synergy_HT" => PlateReader::SynergyHt,
    "SpectraMax_i3x" => PlateReader::SpectraMaxI3x,
};

impl PlateReader {
    pub fn name(&self) -> &'static str {
        match self {
            PlateReader::SynergyHt => "Synergy_HT",
            PlateReader::SpectraMaxI3x => "SpectraMax_i3x",
        }
    }

    pub fn encoding(&self) -> TextEncoding {
        match self {
            PlateReader::SynergyHt => TextEncoding::Utf8,
            PlateReader::SpectraMaxI3x => TextEncoding::Utf16,
        }
    }

    /// Summary lines the instrument appends after the data table.
    pub fn footer_lines(&self) -> usize {
        match self {
            PlateReader::SynergyHt => 5,
            PlateReader::SpectraMaxI3x => 15,
        }
    }
}

impl FromStr for PlateReader {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup_variant(&PLATE_READERS, "plate reader", s)
    }
}

impl fmt::Display for PlateReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A DNA concentration (ng/uL) read for one well.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuantRecord {
    pub well: Well,
    pub concentration: Option<f64>,
}

/// PicoGreen quantification export of a plate reader.
#[derive(Debug, Clone, Copy)]
pub struct PlateReaderFile {
    pub reader: PlateReader,
    pub delimiter: u8,
}

impl PlateReaderFile {
    pub fn new(reader: PlateReader) -> Self {
        Self {
            reader,
            delimiter: b'\t',
        }
    }
}

pub(crate) fn decode_text(bytes: &[u8], encoding: TextEncoding) -> Result<String, TabularError> {
    match encoding {
        TextEncoding::Utf8 => {
            let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
            String::from_utf8(bytes.to_vec()).map_err(|e| TabularError::Encoding(e.to_string()))
        }
        TextEncoding::Utf16 => {
            let (body, big_endian) = if let Some(rest) = bytes.strip_prefix(b"\xFE\xFF") {
                (rest, true)
            } else {
                (bytes.strip_prefix(b"\xFF\xFE").unwrap_or(bytes), false)
            };
            if body.len() % 2 != 0 {
                return Err(TabularError::Encoding(
                    "UTF-16 data has an odd number of bytes".to_string(),
                ));
            }
            let units: Vec<u16> = body
                .chunks_exact(2)
                .map(|pair| {
                    if big_endian {
                        u16::from_be_bytes([pair[0], pair[1]])
                    } else {
                        u16::from_le_bytes([pair[0], pair[1]])
                    }
                })
                .collect();
            String::from_utf16(&units).map_err(|e| TabularError::Encoding(e.to_string()))
        }
    }
}

impl TabularFile for PlateReaderFile {
    type Record = QuantRecord;
    type Error = TabularError;

    fn read_from(&self, reader: &mut impl BufRead) -> Result<Vec<QuantRecord>, TabularError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = decode_text(&bytes, self.reader.encoding())?;

        let lines: Vec<&str> = text.lines().collect();
        let needed = PREAMBLE_LINES + self.reader.footer_lines();
        if lines.len() < needed {
            return Err(TabularError::Truncated {
                found: lines.len(),
                needed,
            });
        }
        let table = lines[PREAMBLE_LINES..lines.len() - self.reader.footer_lines()].join("\n");

        let mut csv = delimited_reader(self.delimiter, table.as_bytes());
        let headers = csv.headers()?.clone();
        let well_idx = column_index(&headers, WELL_COLUMNS)?;
        let conc_idx = column_index(&headers, CONCENTRATION_COLUMNS)?;

        let mut records = Vec::new();
        for (i, row) in csv.records().enumerate() {
            let row = row?;
            // The table header sits on the line right after the preamble.
            let line = PREAMBLE_LINES + i + 2;
            let well = parse_well(row.get(well_idx).unwrap_or(""), line)?;
            let concentration = row.get(conc_idx).and_then(parse_value);
            records.push(QuantRecord {
                well,
                concentration,
            });
        }

        let wells: Vec<Well> = records.iter().map(|r| r.well).collect();
        reject_duplicate_wells(&wells)?;
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SYNERGY: &str = "Software Version\t3.02.1\n\
Experiment File Path:\tC:\\pico.xpt\n\
Well\tSample\tConcentration\n\
A1\tSPL1\t3.432\n\
A2\tSPL2\t<0.000\n\
B1\tSPL3\t12.1\n\
\n\
Results summary\n\
Standard curve\n\
R^2\t0.998\n\
Done\n";

    fn read(file: PlateReaderFile, bytes: Vec<u8>) -> Result<Vec<QuantRecord>, TabularError> {
        file.read_from(&mut Cursor::new(bytes))
    }

    #[test]
    fn parses_synergy_exports_and_coerces_odd_values() {
        let records = read(
            PlateReaderFile::new(PlateReader::SynergyHt),
            SYNERGY.as_bytes().to_vec(),
        )
        .unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].well.to_string(), "A1");
        assert_eq!(records[0].concentration, Some(3.432));
        assert_eq!(records[1].concentration, None);
        assert_eq!(records[2].concentration, Some(12.1));
    }

    #[test]
    fn parses_utf16_spectramax_exports() {
        let mut text = String::from("##BLOCKS= 1\nPlate:\tPlate1\nWells\tSample\t[Concentration]\n");
        text.push_str("A1\tS1\t1.25\nP24\tS2\tRange?\n");
        for i in 0..15 {
            text.push_str(&format!("footer {i}\n"));
        }
        let mut bytes = vec![0xFF, 0xFE];
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }

        let records = read(PlateReaderFile::new(PlateReader::SpectraMaxI3x), bytes).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].concentration, Some(1.25));
        assert_eq!(records[1].well.to_string(), "P24");
        assert_eq!(records[1].concentration, None);
    }

    #[test]
    fn rejects_duplicate_wells() {
        let text = SYNERGY.replace("B1\tSPL3", "A1\tSPL3");
        let err = read(
            PlateReaderFile::new(PlateReader::SynergyHt),
            text.into_bytes(),
        )
        .unwrap_err();
        assert!(matches!(err, TabularError::DuplicateWells(ref w) if w == &vec!["A1".to_string()]));
    }

    #[test]
    fn reports_missing_concentration_column() {
        let text = SYNERGY.replace("Concentration", "Conc");
        let err = read(
            PlateReaderFile::new(PlateReader::SynergyHt),
            text.into_bytes(),
        )
        .unwrap_err();
        assert!(matches!(err, TabularError::MissingColumn { .. }));
    }

    #[test]
    fn short_files_are_reported_as_truncated() {
        let err = read(
            PlateReaderFile::new(PlateReader::SpectraMaxI3x),
            vec![0xFF, 0xFE],
        )
        .unwrap_err();
        assert!(matches!(err, TabularError::Truncated { found: 0, needed: 17 }));
    }

    #[test]
    fn plate_reader_names_round_trip() {
        assert_eq!("Synergy_HT".parse::<PlateReader>().unwrap(), PlateReader::SynergyHt);
        assert_eq!(PlateReader::SpectraMaxI3x.to_string(), "SpectraMax_i3x");
        let err = "Infinite_M200".parse::<PlateReader>().unwrap_err();
        assert_eq!(err.accepted, vec!["SpectraMax_i3x", "Synergy_HT"]);
    }
}
