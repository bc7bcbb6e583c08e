//! `ecpsoc init`: write a starter `ecpsoc.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use ecpsoc_compose::Board;
use ecpsoc_config::CONFIG_FILE_NAME;

/// Runs the `ecpsoc init` command.
///
/// Creates `dir` if needed and writes the configuration file into it,
/// refusing to overwrite an existing one unless `force` is set.
pub fn run(
    dir: Option<String>,
    board: &str,
    force: bool,
) -> Result<i32, Box<dyn std::error::Error>> {
    let board = Board::parse(board)?;
    let target_dir = match dir {
        Some(d) => {
            let dir = PathBuf::from(d);
            fs::create_dir_all(&dir)?;
            dir
        }
        None => std::env::current_dir()?,
    };

    let path = write_config(&target_dir, board, force)?;
    eprintln!("     Created {}", path.display());
    Ok(0)
}

/// Writes the template for `board` into `dir` and returns its path.
fn write_config(
    dir: &Path,
    board: Board,
    force: bool,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = dir.join(CONFIG_FILE_NAME);
    if path.exists() && !force {
        return Err(format!(
            "'{}' already exists (use --force to replace it)",
            path.display()
        )
        .into());
    }
    fs::write(&path, template(board))?;
    Ok(path)
}

/// The starter file contents.
fn template(board: Board) -> String {
    format!(
        r#"[board]
variant = "{board}"
revision = "7.0"
toolchain = "trellis"

[clocks]
sys_clk_freq = "60MHz"
internal_oscillator = false
memory_ratio = "1:1"

[soc]
serial = "uart"

[features]
ethernet = false
etherbone = false
eth_phy = 0
video_terminal = false
video_framebuffer = false
spi_sdcard = false
sdcard = false

[network]
local_ip = "192.168.1.50"
remote_ip = "192.168.1.100"

# Override individual pins per peripheral kind:
# [pins.spi]
# clk = "F2"

# Extra output banks:
# [[gpio]]
# name = "relay"
# pins = ["A3", "A4"]
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_resolves() {
        let file = ecpsoc_config::load_config_from_str(&template(Board::I9)).unwrap();
        assert_eq!(file.board.variant, "i9");
        let config = ecpsoc_config::resolve_soc(&file).unwrap();
        assert_eq!(config.local_ip.as_deref(), Some("192.168.1.50"));
        assert!(config.network.is_none());
    }

    #[test]
    fn writes_into_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), Board::I5, false).unwrap();
        assert_eq!(path, dir.path().join("ecpsoc.toml"));
        let file = ecpsoc_config::load_config(dir.path()).unwrap();
        assert_eq!(file.board.variant, "i5");
    }

    #[test]
    fn refuses_to_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), Board::I5, false).unwrap();
        let err = write_config(dir.path(), Board::I9, false).unwrap_err();
        assert!(err.to_string().contains("already exists"));
        write_config(dir.path(), Board::I9, true).unwrap();
        let file = ecpsoc_config::load_config(dir.path()).unwrap();
        assert_eq!(file.board.variant, "i9");
    }

    #[test]
    fn unknown_board_rejected() {
        assert!(run(None, "i7", false).is_err());
    }
}
