//! # Core Models Module
//!
//! Plate geometry and plate-shaped data containers.
//!
//! ## Key Components
//!
//! - [`well`] - Well addresses (`A1`-style) and plate shapes, with the bijective
//!   mapping between addresses and zero-based `(row, col)` pairs
//! - [`plate`] - [`plate::PlateArray`], a shape-checked `[row][col]` container, and
//!   [`plate::build_plate_array`] for lifting per-well records onto a plate
//! - [`layout`] - Remapping between the 2x2-interleaved and column-block
//!   arrangements of four 96-well plates on one 384-well plate
//!
//! ## Usage
//!
//! ```
//! use metapool::core::models::plate::build_plate_array;
//! use metapool::core::models::well::{PlateShape, Well};
//!
//! let records = vec![("A1".parse::<Well>().unwrap(), 12.5)];
//! let plate = build_plate_array(records, PlateShape::PLATE_96).unwrap();
//! assert_eq!(plate.get("A1".parse().unwrap()), Some(&Some(12.5)));
//! ```

pub mod layout;
pub mod plate;
pub mod well;
