//! The Colorlight i5/i9 peripheral registry.
//!
//! Pin names are ECP5 CABGA381 balls. Both board variants share this pinout;
//! only the boot flash part differs, which the composer selects.

use ecpsoc_clock::domain::{
    HDMI5X_CLK, HDMI_CLK, SYS2X_CLK, SYS2X_PS_CLK, SYS_CLK, SYS_PS_CLK, USB_12M, USB_48M,
};

use crate::error::CatalogError;
use crate::kind::PeripheralKind;
use crate::template::{Multiplicity, PeripheralTemplate, PinOverrides, SignalTemplate};

/// Variant names used by the composer.
pub mod variant {
    /// Full-rate SDRAM PHY.
    pub const SDRAM_FULL_RATE: &str = "full_rate";
    /// Half-rate SDRAM PHY.
    pub const SDRAM_HALF_RATE: &str = "half_rate";
    /// Single-lane boot flash.
    pub const FLASH_1X: &str = "spi_1x";
    /// SD card in SPI mode.
    pub const SDCARD_SPI: &str = "spi";
    /// SD card in native 4-bit mode.
    pub const SDCARD_NATIVE: &str = "native";
    /// UART console.
    pub const SERIAL_UART: &str = "uart";
    /// USB-ACM console.
    pub const SERIAL_USB_ACM: &str = "usb_acm";
    /// SPI bus master on the header.
    pub const SPI_MASTER: &str = "spi_master";
    /// Bit-banged I2C master on the header.
    pub const I2C_BITBANG: &str = "bitbang";
    /// RGMII PHY on port 0.
    pub const RGMII_PORT0: &str = "rgmii0";
    /// RGMII PHY on port 1.
    pub const RGMII_PORT1: &str = "rgmii1";
    /// HDMI output on the GPDI connector.
    pub const GPDI: &str = "gpdi";
    /// LED chaser.
    pub const LED_CHASER: &str = "chaser";
    /// LoRa module reset output.
    pub const GPIO_LORA_RESET: &str = "lora_reset";
    /// Caller-defined output bank; its pins come from the configuration.
    pub const GPIO_BANK: &str = "bank";
}

const LVCMOS33: &str = "LVCMOS33";

/// External 25 MHz oscillator input.
pub const CLK25_PIN: &str = "P3";

/// Pins the clock/reset generator always claims.
///
/// The oscillator pin is only claimed when the root clock is pin-fed; the
/// SDRAM clock output is driven by the reset generator even when no SDRAM
/// controller is instantiated.
pub static CRG_SIGNALS: &[SignalTemplate] = &[
    SignalTemplate {
        name: "clk25",
        pins: &[CLK25_PIN],
    },
    SignalTemplate {
        name: "cpu_reset_n",
        pins: &["K18"],
    },
    SignalTemplate {
        name: "sdram_clock",
        pins: &["B9"],
    },
];

static SDRAM_SIGNALS: &[SignalTemplate] = &[
    SignalTemplate {
        name: "a",
        pins: &[
            "B13", "C14", "A16", "A17", "B16", "B15", "A14", "A13", "A12", "A11", "B12",
        ],
    },
    SignalTemplate {
        name: "dq",
        pins: &[
            "D15", "E14", "E13", "D12", "E12", "D11", "C10", "B17", "B8", "A8", "C7", "A7", "A6",
            "B6", "A5", "B5", "D5", "C5", "D6", "C6", "E7", "D7", "E8", "D8", "E9", "D9", "E11",
            "C11", "C12", "D13", "D14", "C15",
        ],
    },
    SignalTemplate {
        name: "we_n",
        pins: &["A10"],
    },
    SignalTemplate {
        name: "ras_n",
        pins: &["B10"],
    },
    SignalTemplate {
        name: "cas_n",
        pins: &["A9"],
    },
    SignalTemplate {
        name: "ba",
        pins: &["B11", "C8"],
    },
];

static FLASH_SIGNALS: &[SignalTemplate] = &[
    SignalTemplate {
        name: "cs_n",
        pins: &["R2"],
    },
    SignalTemplate {
        name: "mosi",
        pins: &["W2"],
    },
    SignalTemplate {
        name: "miso",
        pins: &["V2"],
    },
];

static SDCARD_SPI_SIGNALS: &[SignalTemplate] = &[
    SignalTemplate {
        name: "clk",
        pins: &["J1"],
    },
    SignalTemplate {
        name: "mosi",
        pins: &["J3"],
    },
    SignalTemplate {
        name: "cs_n",
        pins: &["H1"],
    },
    SignalTemplate {
        name: "miso",
        pins: &["K2"],
    },
];

static SDCARD_NATIVE_SIGNALS: &[SignalTemplate] = &[
    SignalTemplate {
        name: "clk",
        pins: &["J1"],
    },
    SignalTemplate {
        name: "cmd",
        pins: &["J3"],
    },
    SignalTemplate {
        name: "data",
        pins: &["K2", "K1", "H2", "H1"],
    },
];

static UART_SIGNALS: &[SignalTemplate] = &[
    SignalTemplate {
        name: "tx",
        pins: &["J17"],
    },
    SignalTemplate {
        name: "rx",
        pins: &["H17"],
    },
];

static USB_SIGNALS: &[SignalTemplate] = &[
    SignalTemplate {
        name: "d_p",
        pins: &["D20"],
    },
    SignalTemplate {
        name: "d_n",
        pins: &["E19"],
    },
    SignalTemplate {
        name: "pullup",
        pins: &["F19"],
    },
];

static SPI_SIGNALS: &[SignalTemplate] = &[
    SignalTemplate {
        name: "clk",
        pins: &["G20"],
    },
    SignalTemplate {
        name: "mosi",
        pins: &["L18"],
    },
    SignalTemplate {
        name: "miso",
        pins: &["M18"],
    },
    SignalTemplate {
        name: "cs_n",
        pins: &["N17"],
    },
];

static I2C_SIGNALS: &[SignalTemplate] = &[
    SignalTemplate {
        name: "scl",
        pins: &["F3"],
    },
    SignalTemplate {
        name: "sda",
        pins: &["G3"],
    },
];

static RGMII0_SIGNALS: &[SignalTemplate] = &[
    SignalTemplate {
        name: "clk_tx",
        pins: &["U19"],
    },
    SignalTemplate {
        name: "clk_rx",
        pins: &["L19"],
    },
    SignalTemplate {
        name: "rst_n",
        pins: &["P4"],
    },
    SignalTemplate {
        name: "mdio",
        pins: &["N5"],
    },
    SignalTemplate {
        name: "mdc",
        pins: &["P5"],
    },
    SignalTemplate {
        name: "rx_ctl",
        pins: &["M20"],
    },
    SignalTemplate {
        name: "rx_data",
        pins: &["P20", "N19", "N20", "M19"],
    },
    SignalTemplate {
        name: "tx_ctl",
        pins: &["P19"],
    },
    SignalTemplate {
        name: "tx_data",
        pins: &["U20", "T19", "T20", "R20"],
    },
];

// Port 1 shares its management interface with port 0 and its data pins with
// the PMOD header.
static RGMII1_SIGNALS: &[SignalTemplate] = &[
    SignalTemplate {
        name: "clk_tx",
        pins: &["G1"],
    },
    SignalTemplate {
        name: "clk_rx",
        pins: &["H2"],
    },
    SignalTemplate {
        name: "rst_n",
        pins: &["P4"],
    },
    SignalTemplate {
        name: "mdio",
        pins: &["N5"],
    },
    SignalTemplate {
        name: "mdc",
        pins: &["P5"],
    },
    SignalTemplate {
        name: "rx_ctl",
        pins: &["P2"],
    },
    SignalTemplate {
        name: "rx_data",
        pins: &["K2", "L1", "N1", "P1"],
    },
    SignalTemplate {
        name: "tx_ctl",
        pins: &["K1"],
    },
    SignalTemplate {
        name: "tx_data",
        pins: &["G2", "H1", "J1", "J3"],
    },
];

static GPDI_SIGNALS: &[SignalTemplate] = &[
    SignalTemplate {
        name: "clk_p",
        pins: &["J19"],
    },
    SignalTemplate {
        name: "data0_p",
        pins: &["G19"],
    },
    SignalTemplate {
        name: "data1_p",
        pins: &["E20"],
    },
    SignalTemplate {
        name: "data2_p",
        pins: &["C20"],
    },
];

static LED_SIGNALS: &[SignalTemplate] = &[SignalTemplate {
    name: "user_led_n",
    pins: &["U16"],
}];

static LORA_RESET_SIGNALS: &[SignalTemplate] = &[SignalTemplate {
    name: "pin",
    pins: &["L20"],
}];

/// Every template in the registry.
pub static TEMPLATES: &[PeripheralTemplate] = &[
    PeripheralTemplate {
        kind: PeripheralKind::Memory,
        variant: variant::SDRAM_FULL_RATE,
        instance: "sdram",
        core: "GENSDRPHY",
        signals: SDRAM_SIGNALS,
        clock_domain: SYS_CLK,
        companion_domains: &[SYS_PS_CLK],
        io_standard: LVCMOS33,
        multiplicity: Multiplicity::Singular,
    },
    PeripheralTemplate {
        kind: PeripheralKind::Memory,
        variant: variant::SDRAM_HALF_RATE,
        instance: "sdram",
        core: "HalfRateGENSDRPHY",
        signals: SDRAM_SIGNALS,
        clock_domain: SYS_CLK,
        companion_domains: &[SYS2X_CLK, SYS2X_PS_CLK],
        io_standard: LVCMOS33,
        multiplicity: Multiplicity::Singular,
    },
    PeripheralTemplate {
        kind: PeripheralKind::Flash,
        variant: variant::FLASH_1X,
        instance: "spiflash",
        core: "LiteSPI",
        signals: FLASH_SIGNALS,
        clock_domain: SYS_CLK,
        companion_domains: &[],
        io_standard: LVCMOS33,
        multiplicity: Multiplicity::Singular,
    },
    PeripheralTemplate {
        kind: PeripheralKind::SdCard,
        variant: variant::SDCARD_SPI,
        instance: "spisdcard",
        core: "SPIMaster",
        signals: SDCARD_SPI_SIGNALS,
        clock_domain: SYS_CLK,
        companion_domains: &[],
        io_standard: LVCMOS33,
        multiplicity: Multiplicity::Singular,
    },
    PeripheralTemplate {
        kind: PeripheralKind::SdCard,
        variant: variant::SDCARD_NATIVE,
        instance: "sdcard",
        core: "LiteSDCard",
        signals: SDCARD_NATIVE_SIGNALS,
        clock_domain: SYS_CLK,
        companion_domains: &[],
        io_standard: LVCMOS33,
        multiplicity: Multiplicity::Singular,
    },
    PeripheralTemplate {
        kind: PeripheralKind::Serial,
        variant: variant::SERIAL_UART,
        instance: "uart",
        core: "UART",
        signals: UART_SIGNALS,
        clock_domain: SYS_CLK,
        companion_domains: &[],
        io_standard: LVCMOS33,
        multiplicity: Multiplicity::Singular,
    },
    PeripheralTemplate {
        kind: PeripheralKind::Serial,
        variant: variant::SERIAL_USB_ACM,
        instance: "usb_acm",
        core: "ValentyUSB",
        signals: USB_SIGNALS,
        clock_domain: USB_12M,
        companion_domains: &[USB_48M],
        io_standard: LVCMOS33,
        multiplicity: Multiplicity::Singular,
    },
    PeripheralTemplate {
        kind: PeripheralKind::Spi,
        variant: variant::SPI_MASTER,
        instance: "spi",
        core: "SPIMaster",
        signals: SPI_SIGNALS,
        clock_domain: SYS_CLK,
        companion_domains: &[],
        io_standard: LVCMOS33,
        multiplicity: Multiplicity::Singular,
    },
    PeripheralTemplate {
        kind: PeripheralKind::I2c,
        variant: variant::I2C_BITBANG,
        instance: "i2c_master",
        core: "I2CMaster",
        signals: I2C_SIGNALS,
        clock_domain: SYS_CLK,
        companion_domains: &[],
        io_standard: LVCMOS33,
        multiplicity: Multiplicity::Singular,
    },
    PeripheralTemplate {
        kind: PeripheralKind::Network,
        variant: variant::RGMII_PORT0,
        instance: "ethphy",
        core: "LiteEthPHYRGMII",
        signals: RGMII0_SIGNALS,
        clock_domain: SYS_CLK,
        companion_domains: &[],
        io_standard: LVCMOS33,
        multiplicity: Multiplicity::Singular,
    },
    PeripheralTemplate {
        kind: PeripheralKind::Network,
        variant: variant::RGMII_PORT1,
        instance: "ethphy",
        core: "LiteEthPHYRGMII",
        signals: RGMII1_SIGNALS,
        clock_domain: SYS_CLK,
        companion_domains: &[],
        io_standard: LVCMOS33,
        multiplicity: Multiplicity::Singular,
    },
    PeripheralTemplate {
        kind: PeripheralKind::Video,
        variant: variant::GPDI,
        instance: "videophy",
        core: "VideoHDMIPHY",
        signals: GPDI_SIGNALS,
        clock_domain: HDMI_CLK,
        companion_domains: &[HDMI5X_CLK],
        io_standard: "LVCMOS33D",
        multiplicity: Multiplicity::Singular,
    },
    PeripheralTemplate {
        kind: PeripheralKind::Led,
        variant: variant::LED_CHASER,
        instance: "leds",
        core: "LedChaser",
        signals: LED_SIGNALS,
        clock_domain: SYS_CLK,
        companion_domains: &[],
        io_standard: LVCMOS33,
        multiplicity: Multiplicity::Singular,
    },
    PeripheralTemplate {
        kind: PeripheralKind::Gpio,
        variant: variant::GPIO_LORA_RESET,
        instance: "rst_lora",
        core: "GPIOOut",
        signals: LORA_RESET_SIGNALS,
        clock_domain: SYS_CLK,
        companion_domains: &[],
        io_standard: LVCMOS33,
        multiplicity: Multiplicity::Repeatable,
    },
    PeripheralTemplate {
        kind: PeripheralKind::Gpio,
        variant: variant::GPIO_BANK,
        instance: "gpio",
        core: "GPIOOut",
        signals: &[],
        clock_domain: SYS_CLK,
        companion_domains: &[],
        io_standard: LVCMOS33,
        multiplicity: Multiplicity::Repeatable,
    },
];

/// Looks up the template for `kind` and `variant`.
pub fn lookup(
    kind: PeripheralKind,
    variant: &str,
) -> Result<&'static PeripheralTemplate, CatalogError> {
    TEMPLATES
        .iter()
        .find(|t| t.kind == kind && t.variant == variant)
        .ok_or_else(|| CatalogError::UnknownVariant {
            kind,
            variant: variant.to_string(),
        })
}

/// Returns every variant of `kind`.
pub fn variants(kind: PeripheralKind) -> impl Iterator<Item = &'static PeripheralTemplate> {
    TEMPLATES.iter().filter(move |t| t.kind == kind)
}

/// Returns the first-listed variant of `kind`.
pub fn default_template(kind: PeripheralKind) -> Option<&'static PeripheralTemplate> {
    variants(kind).next()
}

fn pairs(entries: &[(&str, &str)]) -> PinOverrides {
    entries
        .iter()
        .map(|(signal, pin)| (signal.to_string(), pin.to_string()))
        .collect()
}

/// Header pin remap of the reference board revision.
///
/// The SPI header moves from the N2 row onto the F2..C2 pads, the LoRa reset
/// follows it to G2, and the I2C pair moves to the J1 header.
pub fn header_remap() -> Vec<(PeripheralKind, PinOverrides)> {
    vec![
        (
            PeripheralKind::Spi,
            pairs(&[("clk", "F2"), ("mosi", "E2"), ("miso", "D2"), ("cs_n", "C2")]),
        ),
        (PeripheralKind::I2c, pairs(&[("scl", "H18"), ("sda", "J18")])),
        (PeripheralKind::Gpio, pairs(&[("pin", "G2")])),
    ]
}
