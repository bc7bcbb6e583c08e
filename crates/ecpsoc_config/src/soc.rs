//! The resolved composition input.

use std::collections::BTreeMap;
use std::fmt;

use ecpsoc_catalog::{PeripheralKind, PinOverrides};
use ecpsoc_clock::{ClockRequest, MemoryRatio, RootClock};
use ecpsoc_common::Frequency;
use serde::{Deserialize, Serialize};

/// Console serial port implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerialKind {
    /// Hardware UART on the header pins.
    #[default]
    Uart,
    /// USB CDC-ACM device; needs the 12/48 MHz USB clocks.
    UsbAcm,
}

/// What the RGMII PHY is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkMode {
    /// Ethernet MAC for the CPU.
    Ethernet,
    /// Etherbone bus bridge.
    Etherbone,
}

impl fmt::Display for NetworkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkMode::Ethernet => write!(f, "ethernet"),
            NetworkMode::Etherbone => write!(f, "etherbone"),
        }
    }
}

/// Network interface selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Ethernet or Etherbone.
    pub mode: NetworkMode,
    /// RGMII port index.
    pub phy: u8,
}

/// HDMI output usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoMode {
    /// Text terminal.
    Terminal,
    /// Memory-backed framebuffer.
    Framebuffer,
}

/// SD card interface mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SdCardMode {
    /// SPI-mode card access.
    Spi,
    /// Native 4-bit SD bus.
    Native,
}

/// A caller-defined general-purpose output bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GpioBank {
    /// Instance name.
    pub name: String,
    /// Output pins, one per bit.
    pub pins: Vec<String>,
}

/// Everything the composer needs, with alternatives already made exclusive.
///
/// `with_usb_clk` and `with_vid_clk` are set by the caller layer from the
/// serial and video selections; the composer re-checks them against the
/// peripherals that need those clocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocConfig {
    /// Board variant identifier.
    pub board: String,
    /// Board revision.
    pub revision: String,
    /// Opaque toolchain identifier.
    pub toolchain: String,
    /// Target system clock.
    pub sys_clk_freq: Frequency,
    /// Root clock source.
    pub root: RootClock,
    /// SDRAM clocking ratio.
    pub memory_ratio: MemoryRatio,
    /// Derive the USB clock domains.
    pub with_usb_clk: bool,
    /// Derive the video clock domains.
    pub with_vid_clk: bool,
    /// Console serial port.
    pub serial: SerialKind,
    /// Network interface, if any.
    pub network: Option<NetworkConfig>,
    /// Video output, if any.
    pub video: Option<VideoMode>,
    /// SD card, if any.
    pub sdcard: Option<SdCardMode>,
    /// Local dotted-quad address.
    pub local_ip: Option<String>,
    /// Remote dotted-quad address.
    pub remote_ip: Option<String>,
    /// LED chaser.
    pub led_chaser: bool,
    /// SPI master.
    pub spi: bool,
    /// I2C master.
    pub i2c: bool,
    /// LoRa reset output bank.
    pub lora_reset: bool,
    /// Additional output banks.
    pub gpio_banks: Vec<GpioBank>,
    /// Integrated main RAM size in bytes; zero selects SDRAM.
    pub integrated_main_ram_size: u64,
    /// L2 cache size in bytes.
    pub l2_size: u64,
    /// Pin overrides per peripheral kind.
    pub pin_overrides: BTreeMap<PeripheralKind, PinOverrides>,
}

impl Default for SocConfig {
    fn default() -> Self {
        Self {
            board: "i5".to_string(),
            revision: "7.0".to_string(),
            toolchain: "trellis".to_string(),
            sys_clk_freq: Frequency::from_mhz(60.0),
            root: RootClock::board_oscillator(),
            memory_ratio: MemoryRatio::FullRate,
            with_usb_clk: false,
            with_vid_clk: false,
            serial: SerialKind::Uart,
            network: None,
            video: None,
            sdcard: None,
            local_ip: None,
            remote_ip: None,
            led_chaser: true,
            spi: true,
            i2c: true,
            lora_reset: true,
            gpio_banks: Vec::new(),
            integrated_main_ram_size: 0,
            l2_size: 8192,
            pin_overrides: BTreeMap::new(),
        }
    }
}

impl SocConfig {
    /// Sets both clock flags from the peripherals that need them.
    pub fn with_implied_clocks(mut self) -> Self {
        self.with_usb_clk = self.serial == SerialKind::UsbAcm;
        self.with_vid_clk = self.video.is_some();
        self
    }

    /// Builds the clock request for this configuration.
    pub fn clock_request(&self) -> ClockRequest {
        ClockRequest::new(self.root, self.sys_clk_freq)
            .with_memory_ratio(self.memory_ratio)
            .with_usb_clk(self.with_usb_clk)
            .with_vid_clk(self.with_vid_clk)
    }

    /// Returns the pin overrides for `kind`, if any.
    pub fn overrides_for(&self, kind: PeripheralKind) -> Option<&PinOverrides> {
        self.pin_overrides.get(&kind)
    }

    /// Returns `true` when main RAM is on-chip and no SDRAM is instantiated.
    pub fn uses_integrated_main_ram(&self) -> bool {
        self.integrated_main_ram_size > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implied_clocks_follow_peripherals() {
        let config = SocConfig {
            serial: SerialKind::UsbAcm,
            video: Some(VideoMode::Terminal),
            ..SocConfig::default()
        }
        .with_implied_clocks();
        assert!(config.with_usb_clk);
        assert!(config.with_vid_clk);

        let plain = SocConfig::default().with_implied_clocks();
        assert!(!plain.with_usb_clk && !plain.with_vid_clk);
    }

    #[test]
    fn clock_request_carries_flags() {
        let config = SocConfig {
            memory_ratio: MemoryRatio::HalfRate,
            with_vid_clk: true,
            ..SocConfig::default()
        };
        let request = config.clock_request();
        assert_eq!(request.memory_ratio, MemoryRatio::HalfRate);
        assert!(request.with_vid_clk);
        assert!(!request.with_usb_clk);
        assert_eq!(request.sys_clk_freq, Frequency::from_mhz(60.0));
    }

    #[test]
    fn integrated_ram() {
        let config = SocConfig {
            integrated_main_ram_size: 0x1000,
            ..SocConfig::default()
        };
        assert!(config.uses_integrated_main_ram());
        assert!(!SocConfig::default().uses_integrated_main_ram());
    }
}
