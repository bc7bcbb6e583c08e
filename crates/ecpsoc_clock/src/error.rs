//! Error types for clock derivation.

use ecpsoc_common::Frequency;

/// A clock domain could not be derived from the root clock.
///
/// Carries the domain that failed, the frequency that was asked for and the
/// platform constraint that ruled it out. Nothing is clamped: an
/// unsatisfiable request always surfaces here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("cannot derive clock domain '{domain}' at {requested}: {reason}")]
pub struct ClockError {
    /// Name of the domain (or `root` for the root clock itself).
    pub domain: String,
    /// The frequency that was requested.
    pub requested: Frequency,
    /// Why the derivation failed.
    pub reason: DerivationFailure,
}

impl ClockError {
    pub(crate) fn new(
        domain: impl Into<String>,
        requested: Frequency,
        reason: DerivationFailure,
    ) -> Self {
        Self {
            domain: domain.into(),
            requested,
            reason,
        }
    }
}

/// The platform constraint that made a derivation impossible.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DerivationFailure {
    /// The requested frequency is zero, negative or not finite.
    #[error("frequency must be positive")]
    NonPositive,

    /// The on-die oscillator divisor is outside the supported range.
    #[error("oscillator divisor {divisor} is outside {min}..={max}")]
    OscillatorDivisor {
        /// The rejected divisor.
        divisor: u32,
        /// Smallest supported divisor.
        min: u32,
        /// Largest supported divisor.
        max: u32,
    },

    /// The PLL reference input is outside the accepted range.
    #[error("PLL input must lie within {min}..{max}")]
    InputOutOfRange {
        /// Lowest accepted input frequency.
        min: Frequency,
        /// Highest accepted input frequency.
        max: Frequency,
    },

    /// The requested output frequency is outside the PLL output range.
    #[error("PLL output must lie within {min}..{max}")]
    OutputOutOfRange {
        /// Lowest output frequency.
        min: Frequency,
        /// Highest output frequency.
        max: Frequency,
    },

    /// The PLL has no free output left.
    #[error("{pll} already drives its maximum of {max} outputs")]
    TooManyOutputs {
        /// PLL instance name.
        pll: String,
        /// Maximum number of user outputs.
        max: usize,
    },

    /// No VCO frequency and output divider reach the request within margin.
    #[error("no {pll} divider setting reaches it within ±{margin_pct}%")]
    NoDividerSolution {
        /// PLL instance name.
        pll: String,
        /// Allowed deviation in percent.
        margin_pct: f64,
    },

    /// Each output is reachable on its own but no single VCO serves them all.
    #[error("{pll} has no VCO frequency shared by all of its outputs")]
    NoCommonVco {
        /// PLL instance name.
        pll: String,
    },
}
