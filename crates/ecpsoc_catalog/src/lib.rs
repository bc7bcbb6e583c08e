//! Static peripheral catalog for the Colorlight i5/i9 boards.
//!
//! Each [`PeripheralKind`] has one or more [`PeripheralTemplate`] variants
//! declaring its logical signals, default pins and the clock domains it must
//! be bound to. Templates are `'static` and never mutated; pin overrides are
//! applied to a resolved copy via [`PeripheralTemplate::resolve`].
//!
//! ```
//! use ecpsoc_catalog::{lookup, variant, PeripheralKind, PinOverrides};
//!
//! let spi = lookup(PeripheralKind::Spi, variant::SPI_MASTER).unwrap();
//! let overrides = PinOverrides::from([("clk".to_string(), "F2".to_string())]);
//! let pins = spi.resolve(&overrides).unwrap();
//! assert_eq!(pins[0].pin, "F2");
//! assert_eq!(spi.signals[0].pins, ["G20"]);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod kind;
pub mod registry;
pub mod template;

pub use error::CatalogError;
pub use kind::PeripheralKind;
pub use registry::{
    default_template, header_remap, lookup, variant, variants, CLK25_PIN, CRG_SIGNALS, TEMPLATES,
};
pub use template::{
    expand_bus, Multiplicity, PeripheralTemplate, PinBinding, PinOverrides, SignalTemplate,
};
