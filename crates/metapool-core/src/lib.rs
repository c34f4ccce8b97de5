//! # metapool Core Library
//!
//! Volumetric pooling and normalization for plate-based sequencing library
//! preparation, producing ready-to-load picklists for acoustic liquid handlers.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture so that the arithmetic, the
//! policies built on it, and the bench procedures stay separately testable.
//!
//! - **[`core`]: The Foundation.** Plate geometry (`Well`, `PlateArray`), the volume and
//!   molarity formulas, index tables, picklist formatting, and readers for plate-reader,
//!   plate-map and qPCR exports.
//!
//! - **[`engine`]: The Logic Core.** Validated configurations and the pooling policies
//!   (equal volume, exclusion floor, minimum-volume floor) that turn molarities into
//!   per-well volumes.
//!
//! - **[`workflows`]: The Public API.** Complete procedures, normalization and pooling,
//!   that go from measurements to a picklist in one call.

pub mod core;
pub mod engine;
pub mod workflows;
