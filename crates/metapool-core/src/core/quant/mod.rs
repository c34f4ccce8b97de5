//! # Quantification Module
//!
//! Conversions from raw plate measurements to concentrations and dispensing volumes.
//!
//! - [`params`] - Validated instrument and assay parameters ([`params::VolumeBounds`],
//!   [`params::StandardCurve`]) with their laboratory defaults
//! - [`formulas`] - Scalar per-well conversions (normalization volume, qPCR and
//!   PicoGreen molarity)
//! - [`calculator`] - The same conversions lifted over whole plates, and the pool
//!   concentration estimate

pub mod calculator;
pub mod formulas;
pub mod params;
