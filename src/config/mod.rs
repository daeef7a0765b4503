//! # pgrecord Configuration Module
//!
//! This module centralizes the wire-level constants the record decoder relies
//! on. Values that depend on each other are co-located and their relationships
//! are enforced through compile-time assertions.
//!
//! ## Module Organization
//!
//! - [`constants`]: Format codes, header sizes, sentinels, and limits

pub mod constants;
pub use constants::*;
