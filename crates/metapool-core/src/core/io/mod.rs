//! Readers for the delimited tables that feed the pooling engine.
//!
//! Every reader is a small layout descriptor implementing [`traits::TabularFile`];
//! the records they return are lifted onto plates with
//! [`crate::core::models::plate::build_plate_array`].

pub mod error;
pub mod index_combos;
pub mod plate_map;
pub mod plate_reader;
pub(crate) mod table;
pub mod traits;
pub mod well_values;
