//! Supported board variants.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ComposeError;

/// A supported Colorlight board variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Board {
    /// Colorlight i5.
    I5,
    /// Colorlight i9.
    I9,
}

/// Boot flash part fitted to a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlashPart {
    /// GigaDevice GD25Q16, 2 MiB.
    #[serde(rename = "GD25Q16")]
    Gd25q16,
    /// Winbond W25Q64, 8 MiB.
    #[serde(rename = "W25Q64")]
    W25q64,
}

impl fmt::Display for FlashPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlashPart::Gd25q16 => write!(f, "GD25Q16"),
            FlashPart::W25q64 => write!(f, "W25Q64"),
        }
    }
}

impl Board {
    /// Parses a board identifier, ignoring case.
    pub fn parse(value: &str) -> Result<Self, ComposeError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "i5" => Ok(Board::I5),
            "i9" => Ok(Board::I9),
            _ => Err(ComposeError::configuration(
                "board",
                value,
                "supported boards are i5 and i9",
            )),
        }
    }

    /// Returns the lowercase identifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Board::I5 => "i5",
            Board::I9 => "i9",
        }
    }

    /// The boot flash part fitted to this board.
    pub fn flash_part(self) -> FlashPart {
        match self {
            Board::I5 => FlashPart::Gd25q16,
            Board::I9 => FlashPart::W25q64,
        }
    }

    /// The SoC identification string.
    pub fn ident(self) -> String {
        format!(
            "LiteX System on Colorlight {} Board",
            self.as_str().to_ascii_uppercase()
        )
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
