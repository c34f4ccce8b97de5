use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Row letters are single upper-case ASCII characters, so no plate can have more rows than this.
pub const MAX_ROWS: usize = 26;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WellError {
    #[error("Well address is empty")]
    Empty,
    #[error("Invalid row letter in well address '{0}'")]
    InvalidRow(String),
    #[error("Invalid column number in well address '{0}'")]
    InvalidColumn(String),
    #[error("Row index {row} exceeds the {max} addressable row letters", max = MAX_ROWS)]
    RowOutOfRange { row: usize },
    #[error("Well {well} lies outside the {shape} plate")]
    OutOfBounds { well: String, shape: PlateShape },
    #[error("Invalid plate shape {rows}x{cols}: {reason}")]
    InvalidShape {
        rows: usize,
        cols: usize,
        reason: &'static str,
    },
}

/// The `(rows, cols)` geometry of a microplate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlateShape {
    pub rows: usize,
    pub cols: usize,
}

impl PlateShape {
    pub const PLATE_384: PlateShape = PlateShape { rows: 16, cols: 24 };
    pub const PLATE_96: PlateShape = PlateShape { rows: 8, cols: 12 };

    pub fn new(rows: usize, cols: usize) -> Result<Self, WellError> {
        if rows == 0 || cols == 0 {
            return Err(WellError::InvalidShape {
                rows,
                cols,
                reason: "a plate needs at least one row and one column",
            });
        }
        if rows > MAX_ROWS {
            return Err(WellError::InvalidShape {
                rows,
                cols,
                reason: "rows must be addressable by a single letter",
            });
        }
        Ok(Self { rows, cols })
    }

    /// Number of wells on the plate.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, well: Well) -> bool {
        well.row < self.rows && well.col < self.cols
    }

    pub fn check(&self, well: Well) -> Result<Well, WellError> {
        if self.contains(well) {
            Ok(well)
        } else {
            Err(WellError::OutOfBounds {
                well: well.to_string(),
                shape: *self,
            })
        }
    }

    /// All wells of the plate in row-major order (A1, A2, ..., B1, ...).
    pub fn wells(self) -> impl Iterator<Item = Well> {
        let Self { rows, cols } = self;
        (0..rows).flat_map(move |row| (0..cols).map(move |col| Well::at(row, col)))
    }
}

impl Default for PlateShape {
    fn default() -> Self {
        Self::PLATE_384
    }
}

impl fmt::Display for PlateShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// A well position, stored zero-based and rendered as `A1`-style addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Well {
    row: usize,
    col: usize,
}

impl Well {
    pub fn from_row_col(row: usize, col: usize) -> Result<Self, WellError> {
        if row >= MAX_ROWS {
            return Err(WellError::RowOutOfRange { row });
        }
        Ok(Self { row, col })
    }

    pub(crate) const fn at(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parses an address and checks it against a plate shape.
    pub fn parse_in(address: &str, shape: PlateShape) -> Result<Self, WellError> {
        shape.check(address.parse()?)
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn to_row_col(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn row_letter(&self) -> char {
        row_letter(self.row)
    }
}

pub(crate) fn row_letter(row: usize) -> char {
    (b'A' + row as u8) as char
}

impl FromStr for Well {
    type Err = WellError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let mut chars = s.chars();
        let letter = chars.next().ok_or(WellError::Empty)?;
        if !letter.is_ascii_alphabetic() {
            return Err(WellError::InvalidRow(s.to_string()));
        }
        let row = (letter.to_ascii_uppercase() as u8 - b'A') as usize;

        let number: usize = chars
            .as_str()
            .parse()
            .map_err(|_| WellError::InvalidColumn(s.to_string()))?;
        if number == 0 {
            return Err(WellError::InvalidColumn(s.to_string()));
        }
        Ok(Self {
            row,
            col: number - 1,
        })
    }
}

impl fmt::Display for Well {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.row_letter(), self.col + 1)
    }
}

pub fn well_to_row_col(address: &str) -> Result<(usize, usize), WellError> {
    address.parse::<Well>().map(|w| w.to_row_col())
}

pub fn row_col_to_well(row: usize, col: usize) -> Result<String, WellError> {
    Well::from_row_col(row, col).map(|w| w.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_upper_and_lower_case_addresses() {
        assert_eq!(well_to_row_col("A1").unwrap(), (0, 0));
        assert_eq!(well_to_row_col("p24").unwrap(), (15, 23));
        assert_eq!(well_to_row_col(" c10 ").unwrap(), (2, 9));
    }

    #[test]
    fn renders_upper_case_one_based_addresses() {
        assert_eq!(row_col_to_well(0, 0).unwrap(), "A1");
        assert_eq!(row_col_to_well(15, 23).unwrap(), "P24");
        assert_eq!("h12".parse::<Well>().unwrap().to_string(), "H12");
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert_eq!("".parse::<Well>(), Err(WellError::Empty));
        assert!(matches!("11".parse::<Well>(), Err(WellError::InvalidRow(_))));
        assert!(matches!("A".parse::<Well>(), Err(WellError::InvalidColumn(_))));
        assert!(matches!("A0".parse::<Well>(), Err(WellError::InvalidColumn(_))));
        assert!(matches!("Ax".parse::<Well>(), Err(WellError::InvalidColumn(_))));
        assert!(matches!(
            row_col_to_well(26, 0),
            Err(WellError::RowOutOfRange { row: 26 })
        ));
    }

    #[test]
    fn round_trips_every_well_of_a_384_plate() {
        let shape = PlateShape::PLATE_384;
        for well in shape.wells() {
            let text = well.to_string();
            let (row, col) = well_to_row_col(&text).unwrap();
            assert_eq!(row_col_to_well(row, col).unwrap(), text);
        }
        assert_eq!(shape.wells().count(), 384);
    }

    #[test]
    fn parse_in_enforces_plate_bounds() {
        assert!(Well::parse_in("H12", PlateShape::PLATE_96).is_ok());
        assert!(matches!(
            Well::parse_in("I1", PlateShape::PLATE_96),
            Err(WellError::OutOfBounds { .. })
        ));
        assert!(matches!(
            Well::parse_in("A13", PlateShape::PLATE_96),
            Err(WellError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn wells_iterate_row_major() {
        let shape = PlateShape::new(2, 3).unwrap();
        let order: Vec<String> = shape.wells().map(|w| w.to_string()).collect();
        assert_eq!(order, ["A1", "A2", "A3", "B1", "B2", "B3"]);
    }

    #[test]
    fn plate_shape_rejects_degenerate_geometry() {
        assert!(PlateShape::new(0, 12).is_err());
        assert!(PlateShape::new(27, 12).is_err());
        assert_eq!(PlateShape::default(), PlateShape::PLATE_384);
        assert_eq!(PlateShape::PLATE_96.to_string(), "8x12");
    }
}
