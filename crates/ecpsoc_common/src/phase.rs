//! Clock phase offsets in degrees.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A clock phase offset in degrees, always within `[0, 360)`.
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Phase(f64);

/// Error returned for phase values outside `[0, 360)`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("phase {degrees}° is outside [0, 360)")]
pub struct PhaseError {
    /// The rejected value in degrees.
    pub degrees: f64,
}

impl Phase {
    /// Zero phase offset.
    pub const ZERO: Phase = Phase(0.0);

    /// Half-period offset.
    pub const HALF_CYCLE: Phase = Phase(180.0);

    /// Creates a phase from degrees, rejecting values outside `[0, 360)`.
    pub fn from_degrees(degrees: f64) -> Result<Self, PhaseError> {
        if degrees.is_finite() && (0.0..360.0).contains(&degrees) {
            Ok(Self(degrees))
        } else {
            Err(PhaseError { degrees })
        }
    }

    /// Returns the phase in degrees.
    pub fn degrees(&self) -> f64 {
        self.0
    }
}

impl Default for Phase {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Debug for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Phase({}°)", self.0)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}
