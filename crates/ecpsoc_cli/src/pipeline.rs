//! Shared front half of `compose` and `clocks`: load, overlay, resolve.

use std::path::{Path, PathBuf};

use ecpsoc_config::{SocConfig, SocFile, CONFIG_FILE_NAME};

use crate::{GlobalArgs, SocArgs};

/// Loads the configuration file, if any.
///
/// An explicit `--config` must exist. Without it, `ecpsoc.toml` in the
/// current directory is used when present and the built-in defaults
/// otherwise.
pub fn load_file(global: &GlobalArgs) -> Result<SocFile, Box<dyn std::error::Error>> {
    match &global.config {
        Some(path) => Ok(ecpsoc_config::load_config_file(Path::new(path))?),
        None => {
            let default = PathBuf::from(CONFIG_FILE_NAME);
            if default.is_file() {
                Ok(ecpsoc_config::load_config_file(&default)?)
            } else {
                tracing::debug!("no {CONFIG_FILE_NAME} found, using defaults");
                Ok(SocFile::default())
            }
        }
    }
}

/// Layers the command-line flags over the file.
///
/// Flags only switch features on; a feature enabled in the file stays
/// enabled. Conflicting alternatives are left for resolution to reject.
pub fn apply_flags(file: &mut SocFile, args: &SocArgs) {
    if let Some(board) = &args.board {
        file.board.variant = board.clone();
    }
    if let Some(revision) = &args.revision {
        file.board.revision = revision.clone();
    }
    if let Some(toolchain) = &args.toolchain {
        file.board.toolchain = toolchain.clone();
    }
    if let Some(freq) = args.sys_clk_freq {
        file.clocks.sys_clk_freq = freq;
    }
    if args.use_internal_osc {
        file.clocks.internal_oscillator = true;
    }
    if let Some(ratio) = args.sdram_rate {
        file.clocks.memory_ratio = ratio.to_string();
    }
    if args.usb_acm {
        file.soc.serial = ecpsoc_config::SerialKind::UsbAcm;
    }
    if let Some(size) = args.integrated_main_ram_size {
        file.soc.integrated_main_ram_size = size;
    }

    let features = &mut file.features;
    features.ethernet |= args.with_ethernet;
    features.etherbone |= args.with_etherbone;
    if let Some(phy) = args.eth_phy {
        features.eth_phy = phy;
    }
    features.video_terminal |= args.with_video_terminal;
    features.video_framebuffer |= args.with_video_framebuffer;
    features.spi_sdcard |= args.with_spi_sdcard;
    features.sdcard |= args.with_sdcard;

    if let Some(ip) = &args.local_ip {
        file.network.local_ip = ip.clone();
    }
    if let Some(ip) = &args.remote_ip {
        file.network.remote_ip = ip.clone();
    }
}

/// Loads, overlays and resolves into a [`SocConfig`].
pub fn resolve(
    args: &SocArgs,
    global: &GlobalArgs,
) -> Result<SocConfig, Box<dyn std::error::Error>> {
    let mut file = load_file(global)?;
    apply_flags(&mut file, args);
    Ok(ecpsoc_config::resolve_soc(&file)?)
}
