//! Parsing and resolution of `ecpsoc.toml` SoC configuration files.
//!
//! The file is read into a [`SocFile`], which callers may overlay with their
//! own flags, and then resolved into the strongly typed [`SocConfig`] the
//! composer consumes.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod soc;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::resolve_soc;
pub use soc::{GpioBank, NetworkConfig, NetworkMode, SdCardMode, SerialKind, SocConfig, VideoMode};
pub use types::*;
