//! Clock plan derivation.

use std::fmt;
use std::str::FromStr;

use ecpsoc_common::{Frequency, Phase};
use serde::{Deserialize, Serialize};

use crate::domain::{
    ClockDomain, DomainSource, ResetPolicy, HDMI5X_CLK, HDMI_CLK, SYS2X_CLK, SYS2X_PS_CLK,
    SYS_CLK, SYS_PS_CLK, USB_12M, USB_48M,
};
use crate::error::ClockError;
use crate::pll::{Ecp5Pll, PllConfig, DEFAULT_MARGIN};
use crate::root::RootClock;

/// Phase of the SDRAM clock companion domains.
///
/// The memory timing model wants 90°, but the ECP5 PLL cannot step that
/// finely at these output dividers, so 180° is used. Other devices must
/// re-derive this value.
pub const MEMORY_CLOCK_PHASE: Phase = Phase::HALF_CYCLE;

/// Fixed USB clock frequencies, in MHz.
const USB_CLOCKS_MHZ: [(&str, f64); 2] = [(USB_12M, 12.0), (USB_48M, 48.0)];

/// Video pixel clock for 800x600@60Hz, in MHz.
const VIDEO_PIXEL_MHZ: f64 = 40.0;

/// Ratio of the serializer clock to the pixel clock.
const VIDEO_SERIALIZER_RATIO: f64 = 5.0;

/// SDRAM controller clocking ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MemoryRatio {
    /// Full-rate PHY: the controller and SDRAM share the system clock.
    #[default]
    #[serde(rename = "1:1")]
    FullRate,
    /// Half-rate PHY: the SDRAM runs at twice the system clock.
    #[serde(rename = "1:2", alias = "2:1")]
    HalfRate,
}

impl MemoryRatio {
    /// Multiplier applied to the system clock for the memory companion domains.
    pub fn multiplier(self) -> f64 {
        match self {
            MemoryRatio::FullRate => 1.0,
            MemoryRatio::HalfRate => 2.0,
        }
    }
}

impl fmt::Display for MemoryRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemoryRatio::FullRate => write!(f, "1:1"),
            MemoryRatio::HalfRate => write!(f, "1:2"),
        }
    }
}

/// Error returned for an unsupported memory ratio string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported memory ratio '{input}' (expected \"1:1\" or \"1:2\")")]
pub struct ParseRatioError {
    /// The rejected input.
    pub input: String,
}

impl FromStr for MemoryRatio {
    type Err = ParseRatioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1:1" => Ok(MemoryRatio::FullRate),
            "1:2" | "2:1" => Ok(MemoryRatio::HalfRate),
            other => Err(ParseRatioError {
                input: other.to_string(),
            }),
        }
    }
}

/// Everything a clock plan is derived from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockRequest {
    /// The root clock.
    pub root: RootClock,
    /// Target system clock frequency.
    pub sys_clk_freq: Frequency,
    /// SDRAM clocking ratio.
    pub memory_ratio: MemoryRatio,
    /// Derive the 12/48 MHz USB domains.
    pub with_usb_clk: bool,
    /// Derive the video pixel and serializer domains.
    pub with_vid_clk: bool,
}

impl ClockRequest {
    /// Creates a request for a full-rate system with no auxiliary clocks.
    pub fn new(root: RootClock, sys_clk_freq: Frequency) -> Self {
        Self {
            root,
            sys_clk_freq,
            memory_ratio: MemoryRatio::FullRate,
            with_usb_clk: false,
            with_vid_clk: false,
        }
    }

    /// Sets the SDRAM clocking ratio.
    pub fn with_memory_ratio(mut self, ratio: MemoryRatio) -> Self {
        self.memory_ratio = ratio;
        self
    }

    /// Requests the USB clock domains.
    pub fn with_usb_clk(mut self, enabled: bool) -> Self {
        self.with_usb_clk = enabled;
        self
    }

    /// Requests the video clock domains.
    pub fn with_vid_clk(mut self, enabled: bool) -> Self {
        self.with_vid_clk = enabled;
        self
    }
}

/// A domain request waiting for its PLL to be solved.
struct DomainTarget {
    name: &'static str,
    frequency: Frequency,
    phase: Phase,
    margin: f64,
    source: DomainSource,
}

impl DomainTarget {
    fn new(name: &'static str, frequency: Frequency, source: DomainSource) -> Self {
        Self {
            name,
            frequency,
            phase: Phase::ZERO,
            margin: DEFAULT_MARGIN,
            source,
        }
    }

    fn phase(mut self, phase: Phase) -> Self {
        self.phase = phase;
        self
    }

    fn exact(mut self) -> Self {
        self.margin = 0.0;
        self
    }
}

/// The full, consistent set of clock domains for one system.
///
/// Owns its domains; peripherals refer to them by name. A derived plan lists
/// the system clock first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockPlan {
    root: RootClock,
    root_frequency: Frequency,
    memory_ratio: MemoryRatio,
    domains: Vec<ClockDomain>,
    plls: Vec<PllConfig>,
}

impl ClockPlan {
    /// Derives every domain implied by `request`.
    ///
    /// Fails without producing anything if any domain cannot be derived.
    pub fn derive(request: &ClockRequest) -> Result<Self, ClockError> {
        let _span = tracing::debug_span!(
            "derive_clock_plan",
            sys_clk = %request.sys_clk_freq,
            ratio = %request.memory_ratio
        )
        .entered();

        let root_frequency = request.root.frequency()?;
        let sys = request.sys_clk_freq;
        if !sys.is_positive() {
            return Err(ClockError::new(
                SYS_CLK,
                sys,
                crate::error::DerivationFailure::NonPositive,
            ));
        }

        let mut groups = vec![("pll_main", main_domains(sys, request.memory_ratio))];
        if request.with_usb_clk {
            let targets: Vec<DomainTarget> = USB_CLOCKS_MHZ
                .iter()
                .map(|&(name, mhz)| {
                    DomainTarget::new(name, Frequency::from_mhz(mhz), DomainSource::Root).exact()
                })
                .collect();
            groups.push(("pll_usb", targets));
        }
        if request.with_vid_clk {
            let pixel = Frequency::from_mhz(VIDEO_PIXEL_MHZ);
            groups.push((
                "pll_video",
                vec![
                    DomainTarget::new(HDMI_CLK, pixel, DomainSource::Root).exact(),
                    DomainTarget::new(
                        HDMI5X_CLK,
                        pixel.scaled(VIDEO_SERIALIZER_RATIO),
                        DomainSource::Domain(HDMI_CLK.to_string()),
                    )
                    .exact(),
                ],
            ));
        }

        let mut domains = Vec::new();
        let mut plls = Vec::with_capacity(groups.len());
        for (pll_name, targets) in groups {
            let mut pll = Ecp5Pll::new(pll_name, root_frequency)?;
            for target in &targets {
                pll.add_output(target.name, target.frequency, target.phase, target.margin)?;
            }
            let config = pll.solve()?;
            for (target, output) in targets.into_iter().zip(&config.outputs) {
                domains.push(ClockDomain {
                    name: target.name.to_string(),
                    frequency: output.frequency,
                    requested: target.frequency,
                    phase: target.phase,
                    source: target.source,
                    pll: pll_name.to_string(),
                    reset: ResetPolicy::default(),
                });
            }
            plls.push(config);
        }

        tracing::debug!(domains = domains.len(), plls = plls.len(), "clock plan derived");

        Ok(Self {
            root: request.root,
            root_frequency,
            memory_ratio: request.memory_ratio,
            domains,
            plls,
        })
    }

    /// Returns the root clock.
    pub fn root(&self) -> &RootClock {
        &self.root
    }

    /// Returns the effective root frequency.
    pub fn root_frequency(&self) -> Frequency {
        self.root_frequency
    }

    /// Returns the SDRAM clocking ratio the plan was derived for.
    pub fn memory_ratio(&self) -> MemoryRatio {
        self.memory_ratio
    }

    /// Returns all domains in derivation order.
    pub fn domains(&self) -> &[ClockDomain] {
        &self.domains
    }

    /// Returns the domain names in derivation order.
    pub fn domain_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.domains.iter().map(|d| d.name.as_str())
    }

    /// Looks up a domain by name.
    pub fn domain(&self, name: &str) -> Option<&ClockDomain> {
        self.domains.iter().find(|d| d.name == name)
    }

    /// Returns `true` if the plan produced a domain with this name.
    pub fn contains(&self, name: &str) -> bool {
        self.domain(name).is_some()
    }

    /// Returns the system clock domain.
    ///
    /// Always present on a derived plan; a deserialized plan may lack it.
    pub fn sys_clk(&self) -> Option<&ClockDomain> {
        self.domain(SYS_CLK)
    }

    /// Returns the solved PLL configurations.
    pub fn plls(&self) -> &[PllConfig] {
        &self.plls
    }
}

/// Domains produced by the main PLL.
fn main_domains(sys: Frequency, ratio: MemoryRatio) -> Vec<DomainTarget> {
    let from_sys = || DomainSource::Domain(SYS_CLK.to_string());
    let mut targets = vec![DomainTarget::new(SYS_CLK, sys, DomainSource::Root)];
    match ratio {
        MemoryRatio::FullRate => {
            targets.push(DomainTarget::new(SYS_PS_CLK, sys, from_sys()).phase(MEMORY_CLOCK_PHASE));
        }
        MemoryRatio::HalfRate => {
            let doubled = sys.scaled(ratio.multiplier());
            targets.push(DomainTarget::new(SYS2X_CLK, doubled, from_sys()));
            targets.push(
                DomainTarget::new(SYS2X_PS_CLK, doubled, from_sys()).phase(MEMORY_CLOCK_PHASE),
            );
        }
    }
    targets
}
