//! The single reference oscillator all domains derive from.

use ecpsoc_common::Frequency;
use serde::{Deserialize, Serialize};

use crate::error::{ClockError, DerivationFailure};

/// Nominal frequency of the board's 25 MHz crystal oscillator.
pub const BOARD_OSCILLATOR_HZ: f64 = 25_000_000.0;

/// Base frequency of the ECP5 on-die OSCG oscillator before division.
pub const OSCG_BASE_HZ: f64 = 310_000_000.0;

/// Supported OSCG divisor range.
pub const OSCG_DIVISOR_RANGE: std::ops::RangeInclusive<u32> = 2..=128;

/// Divisor used when the internal oscillator is selected without one.
pub const DEFAULT_OSCG_DIVISOR: u32 = 5;

/// The root clock of a composed system. Exactly one exists per system.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RootClock {
    /// A clock fed into a device pin from a board oscillator.
    ExternalPin {
        /// Nominal oscillator frequency.
        frequency: Frequency,
    },
    /// The on-die OSCG oscillator, divided down.
    InternalOscillator {
        /// OSCG divisor; the effective frequency is 310 MHz / divisor.
        divisor: u32,
    },
}

impl RootClock {
    /// The board's 25 MHz pin-fed oscillator.
    pub fn board_oscillator() -> Self {
        RootClock::ExternalPin {
            frequency: Frequency::from_hz(BOARD_OSCILLATOR_HZ),
        }
    }

    /// The on-die oscillator with the default divisor.
    pub fn internal_oscillator() -> Self {
        RootClock::InternalOscillator {
            divisor: DEFAULT_OSCG_DIVISOR,
        }
    }

    /// Returns `true` when the root is fed from a device pin.
    pub fn is_external(&self) -> bool {
        matches!(self, RootClock::ExternalPin { .. })
    }

    /// Returns the effective root frequency.
    ///
    /// Fails for a non-positive pin frequency or an out-of-range OSCG divisor.
    pub fn frequency(&self) -> Result<Frequency, ClockError> {
        match *self {
            RootClock::ExternalPin { frequency } => {
                if frequency.is_positive() {
                    Ok(frequency)
                } else {
                    Err(ClockError::new(
                        "root",
                        frequency,
                        DerivationFailure::NonPositive,
                    ))
                }
            }
            RootClock::InternalOscillator { divisor } => {
                if OSCG_DIVISOR_RANGE.contains(&divisor) {
                    Ok(Frequency::from_hz(OSCG_BASE_HZ).divided(divisor))
                } else {
                    Err(ClockError::new(
                        "root",
                        Frequency::from_hz(OSCG_BASE_HZ),
                        DerivationFailure::OscillatorDivisor {
                            divisor,
                            min: *OSCG_DIVISOR_RANGE.start(),
                            max: *OSCG_DIVISOR_RANGE.end(),
                        },
                    ))
                }
            }
        }
    }
}
