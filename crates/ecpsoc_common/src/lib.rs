//! Shared value types for the ECP5 SoC composer.
//!
//! This crate provides frequencies with unit parsing, clock phases in degrees,
//! and content hashing used to fingerprint composed systems.

#![warn(missing_docs)]

pub mod frequency;
pub mod hash;
pub mod phase;

pub use frequency::{Frequency, ParseFrequencyError};
pub use hash::ContentHash;
pub use phase::{Phase, PhaseError};
