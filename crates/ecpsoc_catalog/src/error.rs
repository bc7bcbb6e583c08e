//! Catalog lookup errors.

use crate::kind::PeripheralKind;

/// A lookup named something the catalog does not contain.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// The peripheral kind name is not recognized.
    #[error("unknown peripheral kind '{input}'")]
    UnknownKind {
        /// The rejected name.
        input: String,
    },

    /// The kind has no template with this variant name.
    #[error("{kind} has no variant '{variant}'")]
    UnknownVariant {
        /// Peripheral kind.
        kind: PeripheralKind,
        /// The rejected variant name.
        variant: String,
    },

    /// A pin override names a signal the template does not declare.
    #[error("{kind} template '{variant}' has no signal '{signal}'")]
    UnknownSignal {
        /// Peripheral kind.
        kind: PeripheralKind,
        /// Template variant.
        variant: &'static str,
        /// The rejected signal name.
        signal: String,
    },
}
