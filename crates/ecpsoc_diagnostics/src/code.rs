//! Diagnostic codes with category prefixes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Composition errors, prefixed with `E`.
    Error,
    /// Advisory warnings, prefixed with `W`.
    Warning,
    /// Informational notes, prefixed with `N`.
    Note,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Error => 'E',
            Category::Warning => 'W',
            Category::Note => 'N',
        }
    }
}

/// A diagnostic code: category prefix plus a zero-padded 3-digit number.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// An input value is outside the supported domain.
    pub const INVALID_CONFIGURATION: Self = Self::new(Category::Error, 101);
    /// A clock domain cannot be derived from the root clock.
    pub const CLOCK_DERIVATION: Self = Self::new(Category::Error, 102);
    /// Two enabled peripherals claim the same physical pin.
    pub const PIN_CONFLICT: Self = Self::new(Category::Error, 103);
    /// A peripheral needs a clock domain the plan did not produce.
    pub const UNRESOLVED_CLOCK_DOMAIN: Self = Self::new(Category::Error, 104);
    /// The composed system could not be encoded for fingerprinting.
    pub const ENCODING: Self = Self::new(Category::Error, 105);
    /// A derived clock domain is not consumed by any peripheral.
    pub const UNUSED_CLOCK_DOMAIN: Self = Self::new(Category::Warning, 201);
    /// Summary of a successful composition.
    pub const COMPOSED: Self = Self::new(Category::Note, 301);

    /// Creates a new diagnostic code.
    pub const fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}
