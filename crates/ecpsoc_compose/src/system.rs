//! The composed system description.

use std::collections::BTreeMap;

use ecpsoc_catalog::{PeripheralKind, PinBinding};
use ecpsoc_clock::{ClockPlan, MemoryRatio, RootClock};
use ecpsoc_common::{ContentHash, Frequency};
use ecpsoc_config::{NetworkMode, SdCardMode, SerialKind, VideoMode};
use serde::Serialize;

use crate::board::{Board, FlashPart};
use crate::error::ComposeError;

/// SDRAM chip fitted to both boards.
pub const SDRAM_MODULE: &str = "M12L64322A";

/// Flash read command used in single-lane mode.
pub const FLASH_READ_OPCODE: &str = "READ_1_1_1";

/// Video timings driven on the 40 MHz pixel clock.
pub const VIDEO_TIMINGS: &str = "800x600@60Hz";

/// UART line rate.
pub const UART_BAUDRATE: u32 = 115_200;

/// SPI master data width in bits.
pub const SPI_DATA_WIDTH: u8 = 8;

/// SPI master bus clock in Hz.
pub const SPI_CLK_FREQ_HZ: f64 = 1_000_000.0;

/// SDRAM PHY flavour, matching the memory ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MemoryPhy {
    /// Full-rate single data rate PHY.
    #[serde(rename = "GENSDRPHY")]
    FullRate,
    /// Half-rate PHY clocked from the doubled domains.
    #[serde(rename = "HalfRateGENSDRPHY")]
    HalfRate,
}

impl From<MemoryRatio> for MemoryPhy {
    fn from(ratio: MemoryRatio) -> Self {
        match ratio {
            MemoryRatio::FullRate => MemoryPhy::FullRate,
            MemoryRatio::HalfRate => MemoryPhy::HalfRate,
        }
    }
}

/// Kind-specific parameters of a peripheral instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PeripheralConfig {
    /// SDRAM controller.
    Memory {
        /// PHY flavour.
        phy: MemoryPhy,
        /// SDRAM chip.
        module: &'static str,
        /// Clocking ratio.
        ratio: MemoryRatio,
        /// L2 cache size in bytes.
        l2_cache_size: u64,
    },
    /// Boot flash.
    Flash {
        /// Flash part.
        part: FlashPart,
        /// Bus mode.
        mode: &'static str,
        /// Read command.
        read_opcode: &'static str,
    },
    /// SD card.
    SdCard {
        /// Interface mode.
        mode: SdCardMode,
    },
    /// Console serial port.
    Serial {
        /// UART or USB-ACM.
        kind: SerialKind,
        /// Line rate, UART only.
        #[serde(skip_serializing_if = "Option::is_none")]
        baudrate: Option<u32>,
    },
    /// SPI bus master.
    Spi {
        /// Data width in bits.
        data_width: u8,
        /// Bus clock.
        spi_clk_freq: Frequency,
    },
    /// Bit-banged I2C master.
    I2c,
    /// RGMII network PHY.
    Network {
        /// Ethernet or Etherbone.
        mode: NetworkMode,
        /// RGMII port.
        phy: u8,
        /// Transmit clock delay.
        tx_delay: u32,
    },
    /// HDMI output.
    Video {
        /// Terminal or framebuffer.
        mode: VideoMode,
        /// Video timings.
        timings: &'static str,
    },
    /// LED chaser.
    Led {
        /// Clock the chaser period is derived from.
        sys_clk_freq: Frequency,
    },
    /// General-purpose output bank.
    Gpio {
        /// Number of outputs.
        width: usize,
    },
}

/// One enabled peripheral with its resolved bindings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeripheralInstance {
    /// Unique instance name.
    pub name: String,
    /// Peripheral kind.
    pub kind: PeripheralKind,
    /// Catalog variant the instance was built from.
    pub variant: &'static str,
    /// Gateware core.
    pub core: &'static str,
    /// Resolved pins in declaration order.
    pub pins: Vec<PinBinding>,
    /// I/O standard.
    pub io_standard: &'static str,
    /// Domain the instance runs in.
    pub clock_domain: String,
    /// Additional domains the instance uses.
    pub companion_domains: Vec<String>,
    /// Kind-specific parameters.
    pub config: PeripheralConfig,
}

/// Where main RAM lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MainRam {
    /// External SDRAM behind the named controller instance.
    Sdram {
        /// Controller instance.
        instance: String,
        /// SDRAM chip.
        module: &'static str,
    },
    /// On-chip block RAM.
    Integrated {
        /// Size in bytes.
        size: u64,
    },
}

/// A fully validated system ready for the build pipeline.
///
/// Built once by the composer and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComposedSystem {
    ident: String,
    board: Board,
    revision: String,
    toolchain: String,
    clocks: ClockPlan,
    main_ram: MainRam,
    peripherals: Vec<PeripheralInstance>,
    constants: BTreeMap<String, u64>,
    fingerprint: ContentHash,
}

/// Borrowed view hashed into the fingerprint.
#[derive(Serialize)]
struct FingerprintView<'a> {
    ident: &'a str,
    board: Board,
    revision: &'a str,
    toolchain: &'a str,
    clocks: &'a ClockPlan,
    main_ram: &'a MainRam,
    peripherals: &'a [PeripheralInstance],
    constants: &'a BTreeMap<String, u64>,
}

/// The parts of a system gathered by the composer before sealing.
pub(crate) struct SystemParts {
    pub ident: String,
    pub board: Board,
    pub revision: String,
    pub toolchain: String,
    pub clocks: ClockPlan,
    pub main_ram: MainRam,
    pub peripherals: Vec<PeripheralInstance>,
    pub constants: BTreeMap<String, u64>,
}

impl ComposedSystem {
    /// Seals the parts, computing the fingerprint over their canonical JSON.
    pub(crate) fn seal(parts: SystemParts) -> Result<Self, ComposeError> {
        let view = FingerprintView {
            ident: &parts.ident,
            board: parts.board,
            revision: &parts.revision,
            toolchain: &parts.toolchain,
            clocks: &parts.clocks,
            main_ram: &parts.main_ram,
            peripherals: &parts.peripherals,
            constants: &parts.constants,
        };
        let encoded = serde_json::to_vec(&view).map_err(|e| ComposeError::Encoding(e.to_string()))?;
        let fingerprint = ContentHash::from_bytes(&encoded);
        Ok(Self {
            ident: parts.ident,
            board: parts.board,
            revision: parts.revision,
            toolchain: parts.toolchain,
            clocks: parts.clocks,
            main_ram: parts.main_ram,
            peripherals: parts.peripherals,
            constants: parts.constants,
            fingerprint,
        })
    }

    /// SoC identification string.
    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// Board variant.
    pub fn board(&self) -> Board {
        self.board
    }

    /// Board revision.
    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Opaque toolchain identifier.
    pub fn toolchain(&self) -> &str {
        &self.toolchain
    }

    /// The root clock.
    pub fn root(&self) -> &RootClock {
        self.clocks.root()
    }

    /// The clock plan, including solved PLL settings.
    pub fn clocks(&self) -> &ClockPlan {
        &self.clocks
    }

    /// Main RAM placement.
    pub fn main_ram(&self) -> &MainRam {
        &self.main_ram
    }

    /// Enabled peripherals in composition order.
    pub fn peripherals(&self) -> &[PeripheralInstance] {
        &self.peripherals
    }

    /// Looks up a peripheral by instance name.
    pub fn peripheral(&self, name: &str) -> Option<&PeripheralInstance> {
        self.peripherals.iter().find(|p| p.name == name)
    }

    /// Returns the peripherals of one kind.
    pub fn peripherals_of(&self, kind: PeripheralKind) -> impl Iterator<Item = &PeripheralInstance> {
        self.peripherals.iter().filter(move |p| p.kind == kind)
    }

    /// Generated build-time constants.
    pub fn constants(&self) -> &BTreeMap<String, u64> {
        &self.constants
    }

    /// Content hash over everything above.
    pub fn fingerprint(&self) -> ContentHash {
        self.fingerprint
    }

    /// Every claimed pin with its claimant, in composition order.
    pub fn pin_assignments(&self) -> impl Iterator<Item = (&str, String)> {
        self.peripherals.iter().flat_map(|p| {
            p.pins
                .iter()
                .map(move |b| (b.pin.as_str(), format!("{}.{}", p.name, b.signal)))
        })
    }
}
