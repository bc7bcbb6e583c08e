//! Error types for configuration loading and validation.

/// Errors that can occur when loading or resolving an `ecpsoc.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Two alternatives that exclude each other were both selected.
    #[error("'{first}' and '{second}' cannot both be enabled")]
    MutuallyExclusive {
        /// First flag.
        first: &'static str,
        /// Second flag.
        second: &'static str,
    },

    /// A field holds a value outside its supported domain.
    #[error("invalid value '{value}' for {field}: {reason}")]
    InvalidValue {
        /// Dotted field path.
        field: String,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },
}
