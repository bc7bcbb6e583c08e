//! Clock frequencies with unit parsing, arithmetic, and display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A clock frequency stored in Hertz.
///
/// Parses strings like "60MHz", "12 MHz", "25e6" or "48000000Hz" (bare
/// numbers are Hz) and displays using the largest unit that keeps the value
/// at or above one.
#[derive(Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frequency(f64);

impl Frequency {
    /// Creates a new frequency from a value in Hertz.
    pub const fn from_hz(hz: f64) -> Self {
        Self(hz)
    }

    /// Creates a new frequency from a value in megahertz.
    pub fn from_mhz(mhz: f64) -> Self {
        Self(mhz * 1_000_000.0)
    }

    /// Returns the frequency in Hertz.
    pub fn hz(&self) -> f64 {
        self.0
    }

    /// Returns the frequency in megahertz.
    pub fn mhz(&self) -> f64 {
        self.0 / 1_000_000.0
    }

    /// Returns the frequency rounded to the nearest whole Hertz.
    ///
    /// Negative and non-finite values saturate to zero.
    pub fn whole_hz(&self) -> u64 {
        if self.0.is_finite() && self.0 > 0.0 {
            self.0.round() as u64
        } else {
            0
        }
    }

    /// Returns `true` for finite frequencies strictly above zero.
    pub fn is_positive(&self) -> bool {
        self.0.is_finite() && self.0 > 0.0
    }

    /// Returns this frequency multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self(self.0 * factor)
    }

    /// Returns this frequency divided by an integer divider.
    pub fn divided(&self, divider: u32) -> Self {
        Self(self.0 / f64::from(divider))
    }

    /// Returns `true` if `self` lies within `target ± target * margin`.
    ///
    /// A margin of zero demands an exact match.
    pub fn within_margin(&self, target: Frequency, margin: f64) -> bool {
        (self.0 - target.0).abs() <= target.0 * margin
    }
}

impl fmt::Debug for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frequency({self})")
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hz = self.0;
        if hz >= 1_000_000_000.0 {
            write!(f, "{}GHz", hz / 1_000_000_000.0)
        } else if hz >= 1_000_000.0 {
            write!(f, "{}MHz", hz / 1_000_000.0)
        } else if hz >= 1_000.0 {
            write!(f, "{}KHz", hz / 1_000.0)
        } else {
            write!(f, "{hz}Hz")
        }
    }
}

/// Error returned when a frequency string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid frequency: '{input}'")]
pub struct ParseFrequencyError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for Frequency {
    type Err = ParseFrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let err = || ParseFrequencyError {
            input: s.to_string(),
        };

        let lower = s.to_ascii_lowercase();
        let (digits, scale) = if let Some(num) = lower.strip_suffix("ghz") {
            (num, 1_000_000_000.0)
        } else if let Some(num) = lower.strip_suffix("mhz") {
            (num, 1_000_000.0)
        } else if let Some(num) = lower.strip_suffix("khz") {
            (num, 1_000.0)
        } else if let Some(num) = lower.strip_suffix("hz") {
            (num, 1.0)
        } else {
            (lower.as_str(), 1.0)
        };

        let val: f64 = digits.trim().parse().map_err(|_| err())?;
        if !val.is_finite() {
            return Err(err());
        }
        Ok(Frequency(val * scale))
    }
}
