use crate::core::models::plate::PlateError;
use crate::core::models::well::{PlateShape, Well};
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PicklistError {
    #[error(transparent)]
    Plate(#[from] PlateError),

    #[error("Length mismatch: {what} has {found} entries, expected {expected}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error(
        "Destination counter {counter} falls beyond row {} of the {shape} destination plate",
        .shape.rows
    )]
    DestinationOverflow { counter: usize, shape: PlateShape },

    #[error("Transfer volume {value} for well {well} is not a finite number")]
    NonFiniteVolume { well: Well, value: f64 },
}

/// Field separator of a serialized picklist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
}

impl Delimiter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Tab => "\t",
            Delimiter::Comma => ",",
        }
    }
}

/// One instruction line of a liquid-handler picklist.
pub trait PicklistRow {
    /// Column names, in output order.
    const HEADER: &'static [&'static str];

    /// Rendered field values, one per header column.
    fn fields(&self) -> Vec<String>;
}

/// An ordered list of typed picklist rows.
///
/// Serializes as a header line followed by one line per row, joined with `\n`
/// and without a trailing newline.
#[derive(Debug, Clone, PartialEq)]
pub struct Picklist<R> {
    delimiter: Delimiter,
    rows: Vec<R>,
}

impl<R: PicklistRow> Picklist<R> {
    pub fn new(delimiter: Delimiter) -> Self {
        Self {
            delimiter,
            rows: Vec::new(),
        }
    }

    pub fn with_rows(delimiter: Delimiter, rows: Vec<R>) -> Self {
        Self { delimiter, rows }
    }

    pub fn push(&mut self, row: R) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[R] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        write!(writer, "{self}")
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush()
    }
}

impl<R: PicklistRow> fmt::Display for Picklist<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = self.delimiter.as_str();
        f.write_str(&R::HEADER.join(sep))?;
        for row in &self.rows {
            write!(f, "\n{}", row.fields().join(sep))?;
        }
        Ok(())
    }
}

/// Volumes and concentrations are written with two decimals; the instrument
/// does its own rounding.
pub(crate) fn format_amount(value: f64) -> String {
    format!("{value:.2}")
}

pub(crate) fn format_optional_amount(value: Option<f64>) -> String {
    value.map(format_amount).unwrap_or_default()
}
