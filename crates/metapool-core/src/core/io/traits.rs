use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading the delimited tables produced by lab
/// instruments and sample-tracking sheets.
///
/// Implementors are small descriptors of one table layout (delimiter, column
/// names, preamble), and parse it into typed records.
pub trait TabularFile {
    /// One parsed row of the table.
    type Record;

    /// The error type for parsing and I/O failures.
    type Error: Error + From<io::Error>;

    /// Reads every record from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the layout does not match or a row cannot be parsed.
    fn read_from(&self, reader: &mut impl BufRead) -> Result<Vec<Self::Record>, Self::Error>;

    /// Reads every record from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Self::Record>, Self::Error> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        self.read_from(&mut reader)
    }
}
