use crate::core::models::well::WellError;
use crate::core::utils::identifiers::UnknownVariant;
use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TabularError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Malformed delimited data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Text encoding error: {0}")]
    Encoding(String),

    #[error("Missing column: expected one of {}", .candidates.join(", "))]
    MissingColumn { candidates: Vec<String> },

    #[error("Invalid well on line {line}: {source}")]
    InvalidWell {
        line: usize,
        #[source]
        source: WellError,
    },

    #[error("The following sample names are duplicated: {}", .0.join(", "))]
    DuplicateSamples(Vec<String>),

    #[error("The following wells are listed more than once: {}", .0.join(", "))]
    DuplicateWells(Vec<String>),

    #[error("File has {found} lines, fewer than the {needed} lines of preamble and footer its layout expects")]
    Truncated { found: usize, needed: usize },

    #[error(transparent)]
    UnknownVariant(#[from] UnknownVariant),
}
