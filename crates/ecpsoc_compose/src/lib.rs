//! Composition of a Colorlight i5/i9 system-on-chip.
//!
//! [`SystemComposer`] takes a resolved [`SocConfig`](ecpsoc_config::SocConfig),
//! derives its clock plan, instantiates every enabled peripheral from the
//! catalog, binds each one to the clock domains it needs and checks that no
//! pin is claimed twice. The result is an immutable [`ComposedSystem`]
//! carrying a content fingerprint.
//!
//! ```
//! use ecpsoc_compose::{MainRam, SystemComposer};
//! use ecpsoc_config::SocConfig;
//! use ecpsoc_diagnostics::DiagnosticSink;
//!
//! let config = SocConfig::default();
//! let sink = DiagnosticSink::new();
//! let system = SystemComposer::new(&config).compose(&sink).unwrap();
//! assert!(matches!(system.main_ram(), MainRam::Sdram { .. }));
//! assert!(system.peripheral("uart").is_some());
//! ```

#![warn(missing_docs)]

pub mod board;
pub mod composer;
pub mod constants;
pub mod error;
mod ledger;
pub mod system;

pub use board::{Board, FlashPart};
pub use composer::SystemComposer;
pub use constants::{parse_dotted_quad, CONFIG_CLOCK_FREQUENCY, LOCAL_IP_PREFIX, REMOTE_IP_PREFIX};
pub use error::ComposeError;
pub use system::{
    ComposedSystem, MainRam, MemoryPhy, PeripheralConfig, PeripheralInstance, SDRAM_MODULE,
};
