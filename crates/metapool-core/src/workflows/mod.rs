//! # Workflows Module
//!
//! End-to-end procedures as they are run at the bench. Each workflow takes
//! plate-shaped measurements and a validated configuration and returns the
//! computed volumes together with a ready-to-write picklist.
//!
//! - **Normalization** ([`normalize`]) - Equalizes DNA mass across a plate before
//!   library preparation, topping every well up with water
//! - **Pooling** ([`pool`]) - Converts library quantifications to molarity, applies a
//!   pooling policy, and estimates the resulting pool

pub mod normalize;
pub mod pool;
