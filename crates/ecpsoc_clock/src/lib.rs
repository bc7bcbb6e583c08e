//! Clock-domain derivation for the ECP5 SoC composer.
//!
//! A [`ClockPlan`] is derived from a [`ClockRequest`]: one [`RootClock`]
//! (board oscillator or on-die OSCG), the target system frequency, the
//! SDRAM timing ratio and the auxiliary USB / video clock flags. Each group
//! of domains is produced by its own [`Ecp5Pll`] instance whose dividers are
//! solved against the ECP5 EHXPLLL limits.
//!
//! ```
//! use ecpsoc_clock::{ClockPlan, ClockRequest, MemoryRatio, RootClock};
//! use ecpsoc_common::Frequency;
//!
//! let request = ClockRequest::new(RootClock::board_oscillator(), Frequency::from_mhz(60.0))
//!     .with_memory_ratio(MemoryRatio::FullRate);
//! let plan = ClockPlan::derive(&request).unwrap();
//! assert_eq!(plan.domain_names().collect::<Vec<_>>(), ["sys_clk", "sys_ps_clk"]);
//! ```
//!
//! Derivation is all-or-nothing: any unsatisfiable domain yields a
//! [`ClockError`] and no plan.

#![warn(missing_docs)]

pub mod domain;
pub mod error;
pub mod plan;
pub mod pll;
pub mod root;

pub use domain::{ClockDomain, DomainSource, ResetPolicy};
pub use error::{ClockError, DerivationFailure};
pub use plan::{ClockPlan, ClockRequest, MemoryRatio, ParseRatioError, MEMORY_CLOCK_PHASE};
pub use pll::{Ecp5Pll, PllConfig, PllOutputConfig};
pub use root::RootClock;
