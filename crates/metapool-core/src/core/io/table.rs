use super::error::TabularError;
use crate::core::models::well::Well;
use crate::core::utils::identifiers::find_duplicates;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;

pub(crate) fn delimited_reader<R: Read>(delimiter: u8, input: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input)
}

/// Position of the first header that matches any of the candidate names.
pub(crate) fn column_index(
    headers: &StringRecord,
    candidates: &[&str],
) -> Result<usize, TabularError> {
    candidates
        .iter()
        .find_map(|name| headers.iter().position(|h| h == *name))
        .ok_or_else(|| TabularError::MissingColumn {
            candidates: candidates.iter().map(|c| c.to_string()).collect(),
        })
}

/// Numeric cell value; anything that is not a finite number reads as missing.
pub(crate) fn parse_value(field: &str) -> Option<f64> {
    field.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

pub(crate) fn parse_well(field: &str, line: usize) -> Result<Well, TabularError> {
    field
        .parse()
        .map_err(|source| TabularError::InvalidWell { line, source })
}

pub(crate) fn reject_duplicate_wells(wells: &[Well]) -> Result<(), TabularError> {
    let names: Vec<String> = wells.iter().map(|w| w.to_string()).collect();
    let duplicates = find_duplicates(names.iter().map(String::as_str));
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(TabularError::DuplicateWells(duplicates))
    }
}
