//! Peripheral templates: logical signals, default pins and clock bindings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::kind::PeripheralKind;

/// Pin overrides for one peripheral, keyed by expanded signal name
/// (`clk`, `data[2]`).
pub type PinOverrides = BTreeMap<String, String>;

/// A logical signal and its default physical pins.
#[derive(Debug, PartialEq, Eq)]
pub struct SignalTemplate {
    /// Signal name (`mosi`, `tx_data`).
    pub name: &'static str,
    /// Default pins, one per bit.
    pub pins: &'static [&'static str],
}

impl SignalTemplate {
    /// Number of bits in the signal.
    pub fn width(&self) -> usize {
        self.pins.len()
    }

    /// Yields `(expanded name, default pin)` for every bit.
    pub fn expanded(&self) -> impl Iterator<Item = (String, &'static str)> + '_ {
        let multi_bit = self.pins.len() > 1;
        self.pins.iter().enumerate().map(move |(bit, pin)| {
            let name = if multi_bit {
                format!("{}[{bit}]", self.name)
            } else {
                self.name.to_string()
            };
            (name, *pin)
        })
    }
}

/// Whether a kind may be instantiated more than once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Multiplicity {
    /// At most one instance (memory controller, flash).
    Singular,
    /// Any number of instances (GPIO banks).
    Repeatable,
}

/// One physical pin bound to one bit of a logical signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinBinding {
    /// Expanded signal name.
    pub signal: String,
    /// Package pin.
    pub pin: String,
}

impl PinBinding {
    /// Creates a binding.
    pub fn new(signal: impl Into<String>, pin: impl Into<String>) -> Self {
        Self {
            signal: signal.into(),
            pin: pin.into(),
        }
    }
}

/// The immutable requirement template of one peripheral variant.
#[derive(Debug, PartialEq, Eq)]
pub struct PeripheralTemplate {
    /// Peripheral kind.
    pub kind: PeripheralKind,
    /// Variant name, unique within the kind.
    pub variant: &'static str,
    /// Default instance name.
    pub instance: &'static str,
    /// Gateware core the instance is built from.
    pub core: &'static str,
    /// Logical signals with default pins.
    pub signals: &'static [SignalTemplate],
    /// Domain the peripheral's logic runs in.
    pub clock_domain: &'static str,
    /// Further domains the peripheral needs (PHY, serializer).
    pub companion_domains: &'static [&'static str],
    /// I/O standard of every pin.
    pub io_standard: &'static str,
    /// Singular or repeatable.
    pub multiplicity: Multiplicity,
}

impl PeripheralTemplate {
    /// Returns the default bindings, in declaration order.
    pub fn default_pins(&self) -> Vec<PinBinding> {
        self.signals
            .iter()
            .flat_map(SignalTemplate::expanded)
            .map(|(signal, pin)| PinBinding::new(signal, pin))
            .collect()
    }

    /// Returns `true` if `signal` names a bit of this template.
    pub fn has_signal(&self, signal: &str) -> bool {
        self.signals
            .iter()
            .flat_map(SignalTemplate::expanded)
            .any(|(name, _)| name == signal)
    }

    /// Returns a resolved copy of the default bindings with `overrides`
    /// applied.
    ///
    /// Only the signal names are checked; whether the resulting pins collide
    /// with other peripherals is the composer's concern.
    pub fn resolve(&self, overrides: &PinOverrides) -> Result<Vec<PinBinding>, CatalogError> {
        if let Some(unknown) = overrides.keys().find(|s| !self.has_signal(s)) {
            return Err(CatalogError::UnknownSignal {
                kind: self.kind,
                variant: self.variant,
                signal: unknown.clone(),
            });
        }
        let mut pins = self.default_pins();
        for binding in &mut pins {
            if let Some(pin) = overrides.get(&binding.signal) {
                binding.pin.clone_from(pin);
            }
        }
        Ok(pins)
    }

    /// Every domain the peripheral must be bound to, primary first.
    pub fn required_domains(&self) -> impl Iterator<Item = &'static str> + '_ {
        std::iter::once(self.clock_domain).chain(self.companion_domains.iter().copied())
    }
}

/// Expands a bus of explicit pins the same way templates do.
///
/// Used for caller-defined banks whose width is only known at runtime.
pub fn expand_bus<S: AsRef<str>>(name: &str, pins: &[S]) -> Vec<PinBinding> {
    if pins.len() == 1 {
        return vec![PinBinding::new(name, pins[0].as_ref())];
    }
    pins.iter()
        .enumerate()
        .map(|(bit, pin)| PinBinding::new(format!("{name}[{bit}]"), pin.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    static SIGNALS: &[SignalTemplate] = &[
        SignalTemplate {
            name: "clk",
            pins: &["A1"],
        },
        SignalTemplate {
            name: "data",
            pins: &["B1", "B2"],
        },
    ];

    static TEMPLATE: PeripheralTemplate = PeripheralTemplate {
        kind: PeripheralKind::Spi,
        variant: "test",
        instance: "spi",
        core: "SPIMaster",
        signals: SIGNALS,
        clock_domain: "sys_clk",
        companion_domains: &["aux_clk"],
        io_standard: "LVCMOS33",
        multiplicity: Multiplicity::Singular,
    };

    #[test]
    fn multi_bit_signals_expand() {
        let names: Vec<_> = TEMPLATE
            .default_pins()
            .into_iter()
            .map(|b| b.signal)
            .collect();
        assert_eq!(names, ["clk", "data[0]", "data[1]"]);
    }

    #[test]
    fn override_replaces_one_bit() {
        let overrides = PinOverrides::from([("data[1]".to_string(), "C9".to_string())]);
        let pins = TEMPLATE.resolve(&overrides).unwrap();
        assert_eq!(pins[1].pin, "B1");
        assert_eq!(pins[2].pin, "C9");
    }

    #[test]
    fn resolve_leaves_template_untouched() {
        let overrides = PinOverrides::from([("clk".to_string(), "Z9".to_string())]);
        TEMPLATE.resolve(&overrides).unwrap();
        assert_eq!(TEMPLATE.default_pins()[0].pin, "A1");
    }

    #[test]
    fn unknown_signal_rejected() {
        let overrides = PinOverrides::from([("data".to_string(), "C9".to_string())]);
        let err = TEMPLATE.resolve(&overrides).unwrap_err();
        assert_eq!(
            err,
            CatalogError::UnknownSignal {
                kind: PeripheralKind::Spi,
                variant: "test",
                signal: "data".to_string(),
            }
        );
    }

    #[test]
    fn required_domains_primary_first() {
        let domains: Vec<_> = TEMPLATE.required_domains().collect();
        assert_eq!(domains, ["sys_clk", "aux_clk"]);
    }

    #[test]
    fn bus_expansion() {
        assert_eq!(expand_bus("pin", &["G2"]), [PinBinding::new("pin", "G2")]);
        assert_eq!(
            expand_bus("pin", &["A1", "A2"]),
            [PinBinding::new("pin[0]", "A1"), PinBinding::new("pin[1]", "A2")]
        );
    }
}
