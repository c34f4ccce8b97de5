//! # Core Module
//!
//! The stateless foundation of metapool: plate geometry, measurement
//! conversions, picklist serialization and the table readers that feed them.
//!
//! ## Architecture
//!
//! - **Plate Representation** ([`models`]) - Well addresses, plate shapes, shape-checked
//!   plate arrays and the 96-to-384 interleave remapping
//! - **Quantification** ([`quant`]) - Normalization volumes, qPCR and PicoGreen molarity,
//!   and the pool concentration estimate
//! - **Picklists** ([`picklist`]) - Typed rows and serializers for normalization,
//!   index-addition and pooling picklists
//! - **File I/O** ([`io`]) - Readers for plate maps, plate-reader exports, qPCR tables
//!   and index combination sheets
//! - **Index Barcodes** ([`index`]) - Index assignment, i5 orientation per sequencer and
//!   sample-name scrubbing
//!
//! Everything here is a pure function of its inputs; orchestration and policy
//! decisions live in [`crate::engine`].

pub mod index;
pub mod io;
pub mod models;
pub mod picklist;
pub mod quant;
pub mod utils;
