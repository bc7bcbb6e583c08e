//! ecpsoc: compose a LiteX SoC for the Colorlight i5/i9 boards.
//!
//! `ecpsoc compose` resolves the configuration, derives the clock plan and
//! composes the peripherals, `ecpsoc clocks` stops after the clock plan, and
//! `ecpsoc init` writes a starter `ecpsoc.toml`.

#![warn(missing_docs)]

mod clocks;
mod compose;
mod init;
mod logger;
mod pipeline;

use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ecpsoc_clock::MemoryRatio;
use ecpsoc_common::Frequency;

/// Colorlight i5/i9 SoC composer.
#[derive(Parser, Debug)]
#[command(name = "ecpsoc", version, about = "Colorlight i5/i9 SoC composer")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `ecpsoc.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compose the system and print its description.
    Compose(ComposeArgs),
    /// Derive and print the clock plan only.
    Clocks(ComposeArgs),
    /// Write a starter `ecpsoc.toml`.
    Init {
        /// Directory to create the file in. Defaults to the current directory.
        dir: Option<String>,

        /// Board variant recorded in the file.
        #[arg(long, default_value = "i5")]
        board: String,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Arguments shared by `compose` and `clocks`.
#[derive(Args, Debug, Default)]
pub struct ComposeArgs {
    /// Settings layered over the configuration file.
    #[command(flatten)]
    pub soc: SocArgs,

    /// Output format for the result and diagnostics.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Board and feature flags. Each one given overrides the file.
#[derive(Args, Debug, Default)]
pub struct SocArgs {
    /// Board variant (`i5` or `i9`).
    #[arg(long)]
    pub board: Option<String>,

    /// Board revision.
    #[arg(long)]
    pub revision: Option<String>,

    /// Toolchain identifier handed to the build.
    #[arg(long)]
    pub toolchain: Option<String>,

    /// System clock frequency (e.g. `60MHz`).
    #[arg(long)]
    pub sys_clk_freq: Option<Frequency>,

    /// Use the on-die oscillator instead of the 25 MHz board oscillator.
    #[arg(long)]
    pub use_internal_osc: bool,

    /// SDRAM clocking ratio (`1:1` or `1:2`).
    #[arg(long)]
    pub sdram_rate: Option<MemoryRatio>,

    /// Console on USB-ACM instead of the UART.
    #[arg(long)]
    pub usb_acm: bool,

    /// Use on-chip RAM of this many bytes instead of the SDRAM.
    #[arg(long)]
    pub integrated_main_ram_size: Option<u64>,

    /// Enable the Ethernet MAC.
    #[arg(long, conflicts_with = "with_etherbone")]
    pub with_ethernet: bool,

    /// Enable the Etherbone bridge.
    #[arg(long)]
    pub with_etherbone: bool,

    /// RGMII port to use (0 or 1).
    #[arg(long)]
    pub eth_phy: Option<u8>,

    /// Local dotted-quad address.
    #[arg(long)]
    pub local_ip: Option<String>,

    /// Remote dotted-quad address.
    #[arg(long)]
    pub remote_ip: Option<String>,

    /// Enable the HDMI text terminal.
    #[arg(long, conflicts_with = "with_video_framebuffer")]
    pub with_video_terminal: bool,

    /// Enable the HDMI framebuffer.
    #[arg(long)]
    pub with_video_framebuffer: bool,

    /// Enable the SD card in SPI mode.
    #[arg(long, conflicts_with = "with_sdcard")]
    pub with_spi_sdcard: bool,

    /// Enable the SD card in native mode.
    #[arg(long)]
    pub with_sdcard: bool,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    #[default]
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    logger::init(cli.verbose, cli.quiet);

    let color = match cli.color {
        ColorChoice::Auto => {
            std::env::var_os("NO_COLOR").is_none() && std::env::var_os("TERM").is_some()
        }
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Compose(ref args) => compose::run(args, &global),
        Command::Clocks(ref args) => clocks::run(args, &global),
        Command::Init { dir, board, force } => init::run(dir, &board, force),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}
