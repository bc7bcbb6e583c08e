//! Resolution of a parsed file into the composer's [`SocConfig`].

use std::collections::BTreeMap;

use ecpsoc_catalog::{header_remap, PeripheralKind, PinOverrides};
use ecpsoc_clock::{MemoryRatio, RootClock};

use crate::error::ConfigError;
use crate::soc::{GpioBank, NetworkConfig, NetworkMode, SdCardMode, SocConfig, VideoMode};
use crate::types::SocFile;

/// Number of RGMII ports on the board.
const ETH_PHY_COUNT: u8 = 2;

/// Resolves a parsed (and possibly CLI-overlaid) file into a [`SocConfig`].
///
/// Exclusive flag pairs become `Option`s, the clock flags are derived from
/// the serial and video selections, and pin overrides are layered on top of
/// the header remap. The board variant is passed through untouched; the
/// composer checks it.
pub fn resolve_soc(file: &SocFile) -> Result<SocConfig, ConfigError> {
    let features = &file.features;

    let network = match exclusive(
        ("features.ethernet", features.ethernet),
        ("features.etherbone", features.etherbone),
    )? {
        Some(first) => {
            if features.eth_phy >= ETH_PHY_COUNT {
                return Err(ConfigError::InvalidValue {
                    field: "features.eth_phy".to_string(),
                    value: features.eth_phy.to_string(),
                    reason: format!("expected a port below {ETH_PHY_COUNT}"),
                });
            }
            Some(NetworkConfig {
                mode: if first {
                    NetworkMode::Ethernet
                } else {
                    NetworkMode::Etherbone
                },
                phy: features.eth_phy,
            })
        }
        None => None,
    };

    let video = exclusive(
        ("features.video_terminal", features.video_terminal),
        ("features.video_framebuffer", features.video_framebuffer),
    )?
    .map(|first| {
        if first {
            VideoMode::Terminal
        } else {
            VideoMode::Framebuffer
        }
    });

    let sdcard = exclusive(
        ("features.spi_sdcard", features.spi_sdcard),
        ("features.sdcard", features.sdcard),
    )?
    .map(|first| {
        if first {
            SdCardMode::Spi
        } else {
            SdCardMode::Native
        }
    });

    let memory_ratio: MemoryRatio =
        file.clocks
            .memory_ratio
            .parse()
            .map_err(|e: ecpsoc_clock::ParseRatioError| ConfigError::InvalidValue {
                field: "clocks.memory_ratio".to_string(),
                value: file.clocks.memory_ratio.clone(),
                reason: e.to_string(),
            })?;

    let root = if file.clocks.internal_oscillator {
        RootClock::InternalOscillator {
            divisor: file.clocks.oscillator_divisor,
        }
    } else {
        RootClock::board_oscillator()
    };

    let config = SocConfig {
        board: file.board.variant.clone(),
        revision: file.board.revision.clone(),
        toolchain: file.board.toolchain.clone(),
        sys_clk_freq: file.clocks.sys_clk_freq,
        root,
        memory_ratio,
        with_usb_clk: false,
        with_vid_clk: false,
        serial: file.soc.serial,
        network,
        video,
        sdcard,
        local_ip: non_empty(&file.network.local_ip),
        remote_ip: non_empty(&file.network.remote_ip),
        led_chaser: features.led_chaser,
        spi: features.spi,
        i2c: features.i2c,
        lora_reset: features.lora_reset,
        gpio_banks: file
            .gpio
            .iter()
            .map(|bank| GpioBank {
                name: bank.name.clone(),
                pins: bank.pins.clone(),
            })
            .collect(),
        integrated_main_ram_size: file.soc.integrated_main_ram_size,
        l2_size: file.soc.l2_size,
        pin_overrides: merge_pin_overrides(file)?,
    }
    .with_implied_clocks();

    tracing::debug!(
        board = %config.board,
        sys_clk = %config.sys_clk_freq,
        usb_clk = config.with_usb_clk,
        vid_clk = config.with_vid_clk,
        "resolved configuration"
    );
    Ok(config)
}

/// Returns `Some(true)` if only the first flag is set, `Some(false)` if only
/// the second is, `None` if neither is.
fn exclusive(
    first: (&'static str, bool),
    second: (&'static str, bool),
) -> Result<Option<bool>, ConfigError> {
    match (first.1, second.1) {
        (true, true) => Err(ConfigError::MutuallyExclusive {
            first: first.0,
            second: second.0,
        }),
        (true, false) => Ok(Some(true)),
        (false, true) => Ok(Some(false)),
        (false, false) => Ok(None),
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Layers file overrides over the header remap.
fn merge_pin_overrides(
    file: &SocFile,
) -> Result<BTreeMap<PeripheralKind, PinOverrides>, ConfigError> {
    let mut merged: BTreeMap<PeripheralKind, PinOverrides> = BTreeMap::new();
    if file.features.remap_headers {
        for (kind, overrides) in header_remap() {
            merged.entry(kind).or_default().extend(overrides);
        }
    }
    for (kind_name, pins) in &file.pins {
        let kind: PeripheralKind =
            kind_name
                .parse()
                .map_err(|e: ecpsoc_catalog::CatalogError| ConfigError::InvalidValue {
                    field: "pins".to_string(),
                    value: kind_name.clone(),
                    reason: e.to_string(),
                })?;
        let entry = merged.entry(kind).or_default();
        for (signal, pin) in pins {
            entry.insert(signal.clone(), pin.clone());
        }
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;
    use crate::soc::SerialKind;

    fn resolve(toml: &str) -> Result<SocConfig, ConfigError> {
        resolve_soc(&load_config_from_str(toml).unwrap())
    }

    #[test]
    fn defaults_resolve_to_reference_board() {
        let config = resolve("").unwrap();
        assert_eq!(config.board, "i5");
        assert_eq!(config.root, RootClock::board_oscillator());
        assert_eq!(config.memory_ratio, MemoryRatio::FullRate);
        assert_eq!(config.network, None);
        assert_eq!(config.video, None);
        assert!(!config.with_usb_clk && !config.with_vid_clk);
        assert_eq!(config.local_ip, None);
    }

    #[test]
    fn header_remap_applied_by_default() {
        let config = resolve("").unwrap();
        let spi = config.overrides_for(PeripheralKind::Spi).unwrap();
        assert_eq!(spi["clk"], "F2");
        assert_eq!(spi["cs_n"], "C2");
        assert_eq!(config.overrides_for(PeripheralKind::Gpio).unwrap()["pin"], "G2");
        assert_eq!(config.overrides_for(PeripheralKind::I2c).unwrap()["sda"], "J18");
    }

    #[test]
    fn header_remap_can_be_disabled() {
        let config = resolve("[features]\nremap_headers = false\n").unwrap();
        assert!(config.pin_overrides.is_empty());
    }

    #[test]
    fn file_overrides_win_over_remap() {
        let config = resolve("[pins.spi]\nclk = \"A3\"\n").unwrap();
        let spi = config.overrides_for(PeripheralKind::Spi).unwrap();
        assert_eq!(spi["clk"], "A3");
        assert_eq!(spi["mosi"], "E2");
    }

    #[test]
    fn unknown_pin_kind_rejected() {
        let err = resolve("[pins.pcie]\nrx = \"A3\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "pins"));
    }

    #[test]
    fn ethernet_and_etherbone_exclusive() {
        let err = resolve("[features]\nethernet = true\netherbone = true\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::MutuallyExclusive {
                first: "features.ethernet",
                second: "features.etherbone"
            }
        ));
    }

    #[test]
    fn video_modes_exclusive() {
        let err = resolve("[features]\nvideo_terminal = true\nvideo_framebuffer = true\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::MutuallyExclusive { .. }));
    }

    #[test]
    fn sdcard_modes_exclusive() {
        let err = resolve("[features]\nspi_sdcard = true\nsdcard = true\n").unwrap_err();
        assert!(matches!(err, ConfigError::MutuallyExclusive { .. }));
    }

    #[test]
    fn etherbone_on_port1() {
        let config = resolve("[features]\netherbone = true\neth_phy = 1\n").unwrap();
        assert_eq!(
            config.network,
            Some(NetworkConfig {
                mode: NetworkMode::Etherbone,
                phy: 1
            })
        );
    }

    #[test]
    fn eth_phy_out_of_range() {
        let err = resolve("[features]\nethernet = true\neth_phy = 2\n").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn video_sets_video_clock() {
        let config = resolve("[features]\nvideo_terminal = true\n").unwrap();
        assert_eq!(config.video, Some(VideoMode::Terminal));
        assert!(config.with_vid_clk);
    }

    #[test]
    fn usb_acm_sets_usb_clock() {
        let config = resolve("[soc]\nserial = \"usb_acm\"\n").unwrap();
        assert_eq!(config.serial, SerialKind::UsbAcm);
        assert!(config.with_usb_clk);
    }

    #[test]
    fn bad_memory_ratio() {
        let err = resolve("[clocks]\nmemory_ratio = \"4:1\"\n").unwrap_err();
        assert!(
            matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "clocks.memory_ratio")
        );
    }

    #[test]
    fn half_rate_alias() {
        let config = resolve("[clocks]\nmemory_ratio = \"2:1\"\n").unwrap();
        assert_eq!(config.memory_ratio, MemoryRatio::HalfRate);
    }

    #[test]
    fn internal_oscillator_root() {
        let config = resolve("[clocks]\ninternal_oscillator = true\n").unwrap();
        assert_eq!(config.root, RootClock::InternalOscillator { divisor: 5 });
    }

    #[test]
    fn blank_addresses_are_absent() {
        let config = resolve("[network]\nlocal_ip = \"  \"\nremote_ip = \"10.0.0.1\"\n").unwrap();
        assert_eq!(config.local_ip, None);
        assert_eq!(config.remote_ip.as_deref(), Some("10.0.0.1"));
    }
}
