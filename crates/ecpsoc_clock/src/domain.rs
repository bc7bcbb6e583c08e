//! Clock domains and their reset wiring.

use ecpsoc_common::{Frequency, Phase};
use serde::{Deserialize, Serialize};

/// Main system clock.
pub const SYS_CLK: &str = "sys_clk";
/// Phase-shifted system clock driving the full-rate SDRAM clock pin.
pub const SYS_PS_CLK: &str = "sys_ps_clk";
/// Doubled system clock for the half-rate SDRAM PHY.
pub const SYS2X_CLK: &str = "sys2x_clk";
/// Phase-shifted doubled clock driving the half-rate SDRAM clock pin.
pub const SYS2X_PS_CLK: &str = "sys2x_ps_clk";
/// 12 MHz USB clock.
pub const USB_12M: &str = "usb_12m";
/// 48 MHz USB clock.
pub const USB_48M: &str = "usb_48m";
/// Video pixel clock.
pub const HDMI_CLK: &str = "hdmi_clk";
/// 5x video serializer clock.
pub const HDMI5X_CLK: &str = "hdmi5x_clk";

/// Board reset input shared by every PLL.
pub const BOARD_RESET_SIGNAL: &str = "cpu_reset_n";

/// Where a domain's frequency is derived from.
///
/// Refers to another domain by name; a domain never names itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DomainSource {
    /// Derived directly from the root clock.
    Root,
    /// Derived from another domain of the same plan.
    Domain(String),
}

/// How a domain is reset.
///
/// Every PLL is held in reset while the active-low board reset is asserted
/// or the SoC's soft reset signal is raised; its domains follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetPolicy {
    /// Board reset signal name.
    pub board_reset: String,
    /// Whether the board reset is active-low.
    pub active_low: bool,
    /// Whether the shared soft reset is OR'd in.
    pub soft_reset: bool,
}

impl Default for ResetPolicy {
    fn default() -> Self {
        Self {
            board_reset: BOARD_RESET_SIGNAL.to_string(),
            active_low: true,
            soft_reset: true,
        }
    }
}

/// A named clock that logic can be synchronized to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClockDomain {
    /// Unique domain name within the plan.
    pub name: String,
    /// Frequency the PLL output actually produces.
    pub frequency: Frequency,
    /// Frequency that was requested for the domain.
    pub requested: Frequency,
    /// Phase offset relative to the PLL's zero-phase output.
    pub phase: Phase,
    /// Derivation source.
    pub source: DomainSource,
    /// PLL instance that produces the domain.
    pub pll: String,
    /// Reset wiring.
    pub reset: ResetPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reset_policy() {
        let reset = ResetPolicy::default();
        assert_eq!(reset.board_reset, "cpu_reset_n");
        assert!(reset.active_low);
        assert!(reset.soft_reset);
    }

    #[test]
    fn source_serializes_by_name() {
        let json = serde_json::to_string(&DomainSource::Domain(SYS_CLK.to_string())).unwrap();
        assert_eq!(json, r#"{"domain":"sys_clk"}"#);
        assert_eq!(serde_json::to_string(&DomainSource::Root).unwrap(), r#""root""#);
    }
}
