//! Configuration types deserialized from `ecpsoc.toml`.

use std::collections::BTreeMap;

use ecpsoc_common::Frequency;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

use crate::soc::SerialKind;

/// The top-level file configuration parsed from `ecpsoc.toml`.
///
/// Every section is optional; an empty file describes the reference i5
/// board at 60 MHz with the default peripherals. The command line overlays
/// its flags onto this value before it is resolved.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SocFile {
    /// Board identification.
    #[serde(default)]
    pub board: BoardSection,
    /// Root and system clock settings.
    #[serde(default)]
    pub clocks: ClockSection,
    /// SoC core settings.
    #[serde(default)]
    pub soc: SocSection,
    /// Feature toggles.
    #[serde(default)]
    pub features: FeatureSection,
    /// Network addresses.
    #[serde(default)]
    pub network: NetworkSection,
    /// Pin overrides keyed by peripheral kind, then by signal.
    #[serde(default)]
    pub pins: BTreeMap<String, BTreeMap<String, String>>,
    /// Additional general-purpose output banks.
    #[serde(default)]
    pub gpio: Vec<GpioBankDef>,
}

/// The `[board]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BoardSection {
    /// Board variant (`i5` or `i9`).
    #[serde(default = "default_variant")]
    pub variant: String,
    /// Board revision string.
    #[serde(default = "default_revision")]
    pub revision: String,
    /// Toolchain identifier handed to the build pipeline.
    #[serde(default = "default_toolchain")]
    pub toolchain: String,
}

impl Default for BoardSection {
    fn default() -> Self {
        Self {
            variant: default_variant(),
            revision: default_revision(),
            toolchain: default_toolchain(),
        }
    }
}

fn default_variant() -> String {
    "i5".to_string()
}

fn default_revision() -> String {
    "7.0".to_string()
}

fn default_toolchain() -> String {
    "trellis".to_string()
}

/// The `[clocks]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ClockSection {
    /// Target system clock, as `"60MHz"` or a number of Hz.
    #[serde(
        default = "default_sys_clk_freq",
        deserialize_with = "deserialize_frequency"
    )]
    pub sys_clk_freq: Frequency,
    /// Use the on-die oscillator instead of the 25 MHz board oscillator.
    #[serde(default)]
    pub internal_oscillator: bool,
    /// Divisor for the on-die oscillator.
    #[serde(default = "default_oscillator_divisor")]
    pub oscillator_divisor: u32,
    /// SDRAM clocking ratio, `"1:1"` or `"1:2"`.
    #[serde(default = "default_memory_ratio")]
    pub memory_ratio: String,
}

impl Default for ClockSection {
    fn default() -> Self {
        Self {
            sys_clk_freq: default_sys_clk_freq(),
            internal_oscillator: false,
            oscillator_divisor: default_oscillator_divisor(),
            memory_ratio: default_memory_ratio(),
        }
    }
}

fn default_sys_clk_freq() -> Frequency {
    Frequency::from_mhz(60.0)
}

fn default_oscillator_divisor() -> u32 {
    ecpsoc_clock::root::DEFAULT_OSCG_DIVISOR
}

fn default_memory_ratio() -> String {
    "1:1".to_string()
}

/// The `[soc]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SocSection {
    /// Console serial port.
    #[serde(default)]
    pub serial: SerialKind,
    /// Size of integrated main RAM in bytes; non-zero skips the SDRAM.
    #[serde(default)]
    pub integrated_main_ram_size: u64,
    /// L2 cache size in front of the SDRAM, in bytes.
    #[serde(default = "default_l2_size")]
    pub l2_size: u64,
}

impl Default for SocSection {
    fn default() -> Self {
        Self {
            serial: SerialKind::default(),
            integrated_main_ram_size: 0,
            l2_size: default_l2_size(),
        }
    }
}

fn default_l2_size() -> u64 {
    8192
}

/// The `[features]` section.
///
/// Pairs of flags that select alternatives are plain booleans here; setting
/// both is rejected when the file is resolved.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureSection {
    /// Ethernet MAC on the RGMII PHY.
    #[serde(default)]
    pub ethernet: bool,
    /// Etherbone bridge on the RGMII PHY.
    #[serde(default)]
    pub etherbone: bool,
    /// RGMII port (0 or 1).
    #[serde(default)]
    pub eth_phy: u8,
    /// HDMI text terminal.
    #[serde(default)]
    pub video_terminal: bool,
    /// HDMI framebuffer.
    #[serde(default)]
    pub video_framebuffer: bool,
    /// SD card in SPI mode.
    #[serde(default)]
    pub spi_sdcard: bool,
    /// SD card in native mode.
    #[serde(default)]
    pub sdcard: bool,
    /// LED chaser on the user LED.
    #[serde(default = "enabled")]
    pub led_chaser: bool,
    /// SPI master on the header.
    #[serde(default = "enabled")]
    pub spi: bool,
    /// I2C master on the header.
    #[serde(default = "enabled")]
    pub i2c: bool,
    /// LoRa module reset output.
    #[serde(default = "enabled")]
    pub lora_reset: bool,
    /// Apply the reference revision's header remap.
    #[serde(default = "enabled")]
    pub remap_headers: bool,
}

impl Default for FeatureSection {
    fn default() -> Self {
        Self {
            ethernet: false,
            etherbone: false,
            eth_phy: 0,
            video_terminal: false,
            video_framebuffer: false,
            spi_sdcard: false,
            sdcard: false,
            led_chaser: true,
            spi: true,
            i2c: true,
            lora_reset: true,
            remap_headers: true,
        }
    }
}

fn enabled() -> bool {
    true
}

/// The `[network]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NetworkSection {
    /// Dotted-quad address of the board.
    #[serde(default)]
    pub local_ip: String,
    /// Dotted-quad address of the host.
    #[serde(default)]
    pub remote_ip: String,
}

/// A `[[gpio]]` output bank.
#[derive(Debug, Clone, Deserialize)]
pub struct GpioBankDef {
    /// Instance name.
    pub name: String,
    /// Pins, either a single string or a list.
    #[serde(deserialize_with = "deserialize_string_or_vec")]
    pub pins: Vec<String>,
}

/// Deserializes a frequency given either as a string with units or as Hz.
fn deserialize_frequency<'de, D>(deserializer: D) -> Result<Frequency, D::Error>
where
    D: Deserializer<'de>,
{
    struct FrequencyVisitor;

    impl<'de> Visitor<'de> for FrequencyVisitor {
        type Value = Frequency;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a frequency such as \"60MHz\" or a number of Hz")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            v.parse().map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
            Ok(Frequency::from_hz(v as f64))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
            Ok(Frequency::from_hz(v as f64))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
            Ok(Frequency::from_hz(v))
        }
    }

    deserializer.deserialize_any(FrequencyVisitor)
}

/// Deserializes a field that can be either a single string or a list of strings.
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}
