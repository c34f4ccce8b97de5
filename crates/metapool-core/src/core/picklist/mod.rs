//! # Picklist Module
//!
//! Serialization of transfer decisions into Echo liquid-handler picklists.
//!
//! Each picklist kind has a typed row ([`normalization::NormalizationRow`],
//! [`index::IndexRow`], [`pooling::PoolingRow`]) implementing
//! [`format::PicklistRow`]; [`format::Picklist`] renders any of them with a
//! header line and the kind's delimiter.

pub mod format;
pub mod index;
pub mod normalization;
pub mod pooling;
