//! ECP5 EHXPLLL model and divider solver.
//!
//! The PLL multiplies its reference by `CLKFB / CLKI` (feedback taken from a
//! spare output running at the VCO frequency) and divides the VCO down
//! independently on each output. The solver walks the divider space in a
//! fixed order and returns the first setting that satisfies every output, so
//! identical requests always yield identical configurations.

use std::ops::RangeInclusive;

use ecpsoc_common::{Frequency, Phase};
use serde::{Deserialize, Serialize};

use crate::error::{ClockError, DerivationFailure};

/// Accepted reference input range, in Hz.
pub const CLKI_FREQ_RANGE: (f64, f64) = (8e6, 400e6);
/// Output frequency range, in Hz.
pub const CLKO_FREQ_RANGE: (f64, f64) = (3.125e6, 400e6);
/// VCO operating range, in Hz.
pub const VCO_FREQ_RANGE: (f64, f64) = (400e6, 800e6);
/// Range of the input, feedback and output dividers.
pub const DIVIDER_RANGE: RangeInclusive<u32> = 1..=128;
/// User-visible outputs per PLL; the fourth drives the feedback path.
pub const MAX_OUTPUTS: usize = 3;
/// Relative deviation tolerated when no margin is given.
pub const DEFAULT_MARGIN: f64 = 1e-2;

/// A requested PLL output, before solving.
#[derive(Debug, Clone, PartialEq)]
struct OutputRequest {
    domain: String,
    frequency: Frequency,
    phase: Phase,
    margin: f64,
}

/// One ECP5 PLL instance collecting output requests.
#[derive(Debug, Clone)]
pub struct Ecp5Pll {
    name: String,
    clkin: Frequency,
    outputs: Vec<OutputRequest>,
}

/// A solved output of a PLL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PllOutputConfig {
    /// Domain driven by this output.
    pub domain: String,
    /// Output divider applied to the VCO.
    pub divider: u32,
    /// Frequency the output actually runs at.
    pub frequency: Frequency,
    /// Frequency that was asked for.
    pub requested: Frequency,
    /// Phase offset of the output.
    pub phase: Phase,
}

/// A solved PLL configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PllConfig {
    /// PLL instance name (e.g. `pll_main`).
    pub name: String,
    /// Reference input frequency.
    pub clkin: Frequency,
    /// Reference input divider.
    pub clki_div: u32,
    /// Feedback divider.
    pub clkfb_div: u32,
    /// Resulting VCO frequency.
    pub vco: Frequency,
    /// Solved outputs, in request order.
    pub outputs: Vec<PllOutputConfig>,
}

impl Ecp5Pll {
    /// Creates a PLL fed by `clkin`, rejecting references outside the input range.
    pub fn new(name: impl Into<String>, clkin: Frequency) -> Result<Self, ClockError> {
        let name = name.into();
        let (min, max) = CLKI_FREQ_RANGE;
        if clkin.hz() < min || clkin.hz() > max {
            return Err(ClockError::new(
                name,
                clkin,
                DerivationFailure::InputOutOfRange {
                    min: Frequency::from_hz(min),
                    max: Frequency::from_hz(max),
                },
            ));
        }
        Ok(Self {
            name,
            clkin,
            outputs: Vec::new(),
        })
    }

    /// Returns the instance name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Requests an output driving `domain`.
    ///
    /// `margin` is the tolerated relative deviation; zero demands an exact
    /// frequency.
    pub fn add_output(
        &mut self,
        domain: &str,
        frequency: Frequency,
        phase: Phase,
        margin: f64,
    ) -> Result<(), ClockError> {
        if !frequency.is_positive() {
            return Err(ClockError::new(
                domain,
                frequency,
                DerivationFailure::NonPositive,
            ));
        }
        let (min, max) = CLKO_FREQ_RANGE;
        if frequency.hz() < min || frequency.hz() > max {
            return Err(ClockError::new(
                domain,
                frequency,
                DerivationFailure::OutputOutOfRange {
                    min: Frequency::from_hz(min),
                    max: Frequency::from_hz(max),
                },
            ));
        }
        if self.outputs.len() >= MAX_OUTPUTS {
            return Err(ClockError::new(
                domain,
                frequency,
                DerivationFailure::TooManyOutputs {
                    pll: self.name.clone(),
                    max: MAX_OUTPUTS,
                },
            ));
        }
        self.outputs.push(OutputRequest {
            domain: domain.to_string(),
            frequency,
            phase,
            margin,
        });
        Ok(())
    }

    /// Solves the dividers for all requested outputs.
    ///
    /// Search order is input divider, then feedback divider, then output
    /// divider, all ascending; the first VCO in range that serves every
    /// output wins.
    pub fn solve(&self) -> Result<PllConfig, ClockError> {
        let (vco_min, vco_max) = VCO_FREQ_RANGE;
        for clki_div in DIVIDER_RANGE {
            for clkfb_div in DIVIDER_RANGE {
                let vco = self.clkin.divided(clki_div).scaled(f64::from(clkfb_div));
                if vco.hz() < vco_min || vco.hz() > vco_max {
                    continue;
                }
                let outputs: Option<Vec<PllOutputConfig>> = self
                    .outputs
                    .iter()
                    .map(|out| output_divider(vco, out))
                    .collect();
                if let Some(outputs) = outputs {
                    tracing::debug!(
                        pll = %self.name,
                        clki_div,
                        clkfb_div,
                        vco = %vco,
                        "solved PLL dividers"
                    );
                    return Ok(PllConfig {
                        name: self.name.clone(),
                        clkin: self.clkin,
                        clki_div,
                        clkfb_div,
                        vco,
                        outputs,
                    });
                }
            }
        }
        Err(self.explain_failure())
    }

    /// Picks the output to blame when no joint solution exists.
    ///
    /// An output unreachable on its own is reported first; otherwise the
    /// outputs only conflict with each other.
    fn explain_failure(&self) -> ClockError {
        let reachable_alone = |out: &OutputRequest| {
            self.vco_candidates()
                .any(|vco| output_divider(vco, out).is_some())
        };
        if let Some(out) = self.outputs.iter().find(|out| !reachable_alone(out)) {
            return ClockError::new(
                out.domain.clone(),
                out.frequency,
                DerivationFailure::NoDividerSolution {
                    pll: self.name.clone(),
                    margin_pct: out.margin * 100.0,
                },
            );
        }
        match self.outputs.first() {
            Some(out) => ClockError::new(
                out.domain.clone(),
                out.frequency,
                DerivationFailure::NoCommonVco {
                    pll: self.name.clone(),
                },
            ),
            None => ClockError::new(
                self.name.clone(),
                self.clkin,
                DerivationFailure::NoCommonVco {
                    pll: self.name.clone(),
                },
            ),
        }
    }

    fn vco_candidates(&self) -> impl Iterator<Item = Frequency> + '_ {
        let (vco_min, vco_max) = VCO_FREQ_RANGE;
        DIVIDER_RANGE
            .flat_map(move |clki| {
                DIVIDER_RANGE.map(move |fb| self.clkin.divided(clki).scaled(f64::from(fb)))
            })
            .filter(move |vco| vco.hz() >= vco_min && vco.hz() <= vco_max)
    }
}

/// Finds the smallest output divider that lands within the request's margin.
fn output_divider(vco: Frequency, out: &OutputRequest) -> Option<PllOutputConfig> {
    DIVIDER_RANGE.find_map(|divider| {
        let frequency = vco.divided(divider);
        frequency
            .within_margin(out.frequency, out.margin)
            .then(|| PllOutputConfig {
                domain: out.domain.clone(),
                divider,
                frequency,
                requested: out.frequency,
                phase: out.phase,
            })
    })
}
