//! # Engine Module
//!
//! Policy decisions layered on top of the [`crate::core`] conversions.
//!
//! - **Configuration** ([`config`]) - Pooling policies, normalization and pooling
//!   configurations and their validating builders
//! - **Pooling Policies** ([`policy`]) - Turns library molarities and relative
//!   abundances into per-well pooling volumes
//! - **Error Handling** ([`error`]) - [`error::EngineError`], which every lower-level
//!   error converts into

pub mod config;
pub mod error;
pub mod policy;
