use super::well::{PlateShape, Well, WellError};
use nalgebra::{DMatrix, Scalar};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlateError {
    #[error("Shape mismatch: expected a {expected} plate, found {found}")]
    ShapeMismatch {
        expected: PlateShape,
        found: PlateShape,
    },
    #[error("Length mismatch: a {shape} plate needs {expected} values, found {found}")]
    LengthMismatch {
        shape: PlateShape,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Well(#[from] WellError),
}

/// A value per well, laid out `[row][col]` with a fixed plate shape.
#[derive(Debug, Clone, PartialEq)]
pub struct PlateArray<T: Scalar> {
    data: DMatrix<T>,
}

/// Per-well measurements where `None` marks a missing or unparseable value.
pub type Measurements = PlateArray<Option<f64>>;

/// Per-well sample names; `None` marks an empty well.
pub type SampleNames = PlateArray<Option<String>>;

impl<T: Scalar> PlateArray<T> {
    pub fn from_element(shape: PlateShape, value: T) -> Self {
        Self {
            data: DMatrix::from_element(shape.rows, shape.cols, value),
        }
    }

    /// Builds a plate from values listed in row-major order (A1, A2, ..., B1, ...).
    pub fn from_row_major(shape: PlateShape, values: Vec<T>) -> Result<Self, PlateError> {
        if values.len() != shape.len() {
            return Err(PlateError::LengthMismatch {
                shape,
                expected: shape.len(),
                found: values.len(),
            });
        }
        Ok(Self {
            data: DMatrix::from_row_iterator(shape.rows, shape.cols, values),
        })
    }

    pub fn shape(&self) -> PlateShape {
        PlateShape {
            rows: self.data.nrows(),
            cols: self.data.ncols(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, well: Well) -> Option<&T> {
        self.data.get((well.row(), well.col()))
    }

    pub fn set(&mut self, well: Well, value: T) -> Result<(), PlateError> {
        let shape = self.shape();
        shape.check(well)?;
        self.data[(well.row(), well.col())] = value;
        Ok(())
    }

    /// Iterates `(well, value)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Well, &T)> + '_ {
        let shape = self.shape();
        (0..shape.rows).flat_map(move |row| {
            (0..shape.cols).map(move |col| (Well::at(row, col), &self.data[(row, col)]))
        })
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.iter().map(|(_, v)| v)
    }

    pub fn to_row_major(&self) -> Vec<T> {
        self.values().cloned().collect()
    }

    pub fn map<U: Scalar>(&self, mut f: impl FnMut(&T) -> U) -> PlateArray<U> {
        PlateArray {
            data: self.data.map(|v| f(&v)),
        }
    }

    pub fn ensure_same_shape<U: Scalar>(&self, other: &PlateArray<U>) -> Result<(), PlateError> {
        if self.shape() != other.shape() {
            return Err(PlateError::ShapeMismatch {
                expected: self.shape(),
                found: other.shape(),
            });
        }
        Ok(())
    }

    /// Combines two co-indexed plates element-wise after checking that their shapes agree.
    pub fn zip_map<U: Scalar, V: Scalar>(
        &self,
        other: &PlateArray<U>,
        mut f: impl FnMut(&T, &U) -> V,
    ) -> Result<PlateArray<V>, PlateError> {
        self.ensure_same_shape(other)?;
        Ok(PlateArray {
            data: self.data.zip_map(&other.data, |a, b| f(&a, &b)),
        })
    }
}

/// Lifts `(well, value)` records into a plate, leaving unmentioned wells as `None`.
///
/// Wells outside `shape` are rejected. When the same well appears more than once
/// the last record wins; the duplicated addresses are logged as a warning.
pub fn build_plate_array<T: Scalar>(
    records: impl IntoIterator<Item = (Well, T)>,
    shape: PlateShape,
) -> Result<PlateArray<Option<T>>, PlateError> {
    let mut plate = PlateArray::from_element(shape, None);
    let mut seen = BTreeSet::new();
    let mut duplicates = BTreeSet::new();

    for (well, value) in records {
        plate.set(well, Some(value))?;
        if !seen.insert(well) {
            duplicates.insert(well);
        }
    }

    if !duplicates.is_empty() {
        let names: Vec<String> = duplicates.iter().map(|w| w.to_string()).collect();
        warn!(
            "Wells {} were given more than one value; the last value was kept.",
            names.join(", ")
        );
    }
    Ok(plate)
}

/// Lifts measured `(well, value)` records into a plate; wells that were not
/// measured and values that could not be read are both `None`.
pub fn build_measurements(
    records: impl IntoIterator<Item = (Well, Option<f64>)>,
    shape: PlateShape,
) -> Result<Measurements, PlateError> {
    Ok(build_plate_array(records, shape)?.map(|v| v.flatten()))
}
