//! Peripheral kinds known to the catalog.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A class of peripheral subsystem the board can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeripheralKind {
    /// SDRAM controller and PHY.
    Memory,
    /// Boot SPI flash.
    Flash,
    /// SD card on the PMOD header.
    SdCard,
    /// Console serial port (UART or USB-ACM).
    Serial,
    /// SPI bus master.
    Spi,
    /// I2C bus master.
    I2c,
    /// RGMII Ethernet PHY.
    Network,
    /// HDMI video output.
    Video,
    /// User LED chaser.
    Led,
    /// General-purpose output bank.
    Gpio,
}

impl PeripheralKind {
    /// Every kind, in composition priority order.
    ///
    /// Memory comes first because its presence decides whether the address
    /// space needs an integrated RAM fallback.
    pub const PRIORITY: [PeripheralKind; 10] = [
        PeripheralKind::Memory,
        PeripheralKind::Flash,
        PeripheralKind::SdCard,
        PeripheralKind::Serial,
        PeripheralKind::Spi,
        PeripheralKind::I2c,
        PeripheralKind::Network,
        PeripheralKind::Video,
        PeripheralKind::Led,
        PeripheralKind::Gpio,
    ];

    /// Returns the canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            PeripheralKind::Memory => "memory",
            PeripheralKind::Flash => "flash",
            PeripheralKind::SdCard => "sd_card",
            PeripheralKind::Serial => "serial",
            PeripheralKind::Spi => "spi",
            PeripheralKind::I2c => "i2c",
            PeripheralKind::Network => "network",
            PeripheralKind::Video => "video",
            PeripheralKind::Led => "led",
            PeripheralKind::Gpio => "gpio",
        }
    }

    /// Position in [`PeripheralKind::PRIORITY`].
    pub fn priority(self) -> usize {
        Self::PRIORITY
            .iter()
            .position(|k| *k == self)
            .unwrap_or(Self::PRIORITY.len())
    }
}

impl fmt::Display for PeripheralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeripheralKind {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" | "sdram" => Ok(PeripheralKind::Memory),
            "flash" | "spiflash" => Ok(PeripheralKind::Flash),
            "sd_card" | "sdcard" => Ok(PeripheralKind::SdCard),
            "serial" | "uart" => Ok(PeripheralKind::Serial),
            "spi" => Ok(PeripheralKind::Spi),
            "i2c" => Ok(PeripheralKind::I2c),
            "network" | "eth" | "ethernet" => Ok(PeripheralKind::Network),
            "video" | "hdmi" => Ok(PeripheralKind::Video),
            "led" | "leds" => Ok(PeripheralKind::Led),
            "gpio" => Ok(PeripheralKind::Gpio),
            _ => Err(CatalogError::UnknownKind {
                input: s.to_string(),
            }),
        }
    }
}
