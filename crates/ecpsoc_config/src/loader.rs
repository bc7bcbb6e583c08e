//! Configuration file loading and validation.

use std::path::Path;

use crate::error::ConfigError;
use crate::types::SocFile;

/// Name of the configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "ecpsoc.toml";

/// Loads and validates `ecpsoc.toml` from a project directory.
pub fn load_config(project_dir: &Path) -> Result<SocFile, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<SocFile, ConfigError> {
    tracing::debug!(path = %path.display(), "loading configuration");
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates an `ecpsoc.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<SocFile, ConfigError> {
    let config: SocFile =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates that required fields are present.
fn validate_config(config: &SocFile) -> Result<(), ConfigError> {
    if config.board.variant.trim().is_empty() {
        return Err(ConfigError::MissingField("board.variant".to_string()));
    }
    if config.board.toolchain.trim().is_empty() {
        return Err(ConfigError::MissingField("board.toolchain".to_string()));
    }
    if let Some(bank) = config.gpio.iter().find(|b| b.name.trim().is_empty()) {
        return Err(ConfigError::MissingField(format!(
            "gpio.name (bank with pins {:?})",
            bank.pins
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::soc::SerialKind;
    use ecpsoc_common::Frequency;

    #[test]
    fn parse_empty_config() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config.board.variant, "i5");
        assert_eq!(config.board.revision, "7.0");
        assert_eq!(config.board.toolchain, "trellis");
        assert_eq!(config.clocks.sys_clk_freq, Frequency::from_mhz(60.0));
        assert!(config.pins.is_empty());
        assert!(config.gpio.is_empty());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[board]
variant = "i9"
revision = "7.2"
toolchain = "trellis"

[clocks]
sys_clk_freq = "50MHz"
internal_oscillator = true
oscillator_divisor = 6
memory_ratio = "1:2"

[soc]
serial = "usb_acm"
integrated_main_ram_size = 0
l2_size = 4096

[features]
etherbone = true
eth_phy = 1
video_framebuffer = true
sdcard = true
led_chaser = false

[network]
local_ip = "10.0.0.2"
remote_ip = "10.0.0.1"

[pins.spi]
clk = "F2"

[[gpio]]
name = "relay"
pins = ["A1", "A2"]
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.board.variant, "i9");
        assert_eq!(config.clocks.sys_clk_freq, Frequency::from_mhz(50.0));
        assert!(config.clocks.internal_oscillator);
        assert_eq!(config.clocks.oscillator_divisor, 6);
        assert_eq!(config.clocks.memory_ratio, "1:2");
        assert_eq!(config.soc.serial, SerialKind::UsbAcm);
        assert_eq!(config.soc.l2_size, 4096);
        assert!(config.features.etherbone);
        assert_eq!(config.features.eth_phy, 1);
        assert!(!config.features.led_chaser);
        assert_eq!(config.network.local_ip, "10.0.0.2");
        assert_eq!(config.pins["spi"]["clk"], "F2");
        assert_eq!(config.gpio[0].name, "relay");
    }

    #[test]
    fn empty_variant_errors() {
        let err = load_config_from_str("[board]\nvariant = \"\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn unnamed_gpio_bank_errors() {
        let err = load_config_from_str("[[gpio]]\nname = \" \"\npins = \"A1\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::MissingField(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn unknown_serial_kind_errors() {
        let err = load_config_from_str("[soc]\nserial = \"jtag\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[board]\nvariant = \"i9\"\n",
        )
        .unwrap();
        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.board.variant, "i9");
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
