//! Composition errors and their diagnostic form.

use ecpsoc_catalog::PeripheralKind;
use ecpsoc_clock::ClockError;
use ecpsoc_diagnostics::{Diagnostic, DiagnosticCode};

/// Why a system could not be composed.
///
/// Every variant is a hard failure: no partially composed system is ever
/// returned alongside it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ComposeError {
    /// An input value is outside the supported domain.
    #[error("invalid {field} '{value}': {reason}")]
    Configuration {
        /// Field the value came from.
        field: String,
        /// The rejected value.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A clock domain could not be derived.
    #[error(transparent)]
    Clock(#[from] ClockError),

    /// Two enabled peripherals claim the same pin.
    #[error("pin {pin} is claimed by both {first} and {second}")]
    PinConflict {
        /// The contested pin.
        pin: String,
        /// Earlier claimant, as `instance.signal`.
        first: String,
        /// Later claimant, as `instance.signal`.
        second: String,
    },

    /// A peripheral needs a domain the clock plan did not produce.
    #[error("{kind} requires clock domain '{domain}', which the clock plan does not provide")]
    UnresolvedClockDomain {
        /// Kind of the peripheral.
        kind: PeripheralKind,
        /// Name of the missing domain.
        domain: String,
    },

    /// The composed system could not be encoded for fingerprinting.
    #[error("failed to encode composed system: {0}")]
    Encoding(String),
}

impl ComposeError {
    pub(crate) fn configuration(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ComposeError::Configuration {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Returns the diagnostic code for this error.
    pub fn code(&self) -> DiagnosticCode {
        match self {
            ComposeError::Configuration { .. } => DiagnosticCode::INVALID_CONFIGURATION,
            ComposeError::Clock(_) => DiagnosticCode::CLOCK_DERIVATION,
            ComposeError::PinConflict { .. } => DiagnosticCode::PIN_CONFLICT,
            ComposeError::UnresolvedClockDomain { .. } => DiagnosticCode::UNRESOLVED_CLOCK_DOMAIN,
            ComposeError::Encoding(_) => DiagnosticCode::ENCODING,
        }
    }

    /// Converts the error into a renderable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string());
        match self {
            ComposeError::Configuration { field, .. } => diag.with_subject(field.clone()),
            ComposeError::Clock(err) => diag
                .with_subject(err.domain.clone())
                .with_help("choose a frequency the PLL can reach from the root clock"),
            ComposeError::PinConflict { pin, first, .. } => diag
                .with_subject(pin.clone())
                .with_note(format!("{first} was instantiated first"))
                .with_help("override one of the claimants' pins or disable it"),
            ComposeError::UnresolvedClockDomain { kind, domain } => {
                let diag = diag.with_subject(domain.clone());
                match kind {
                    PeripheralKind::Video => {
                        diag.with_help("request the video clock together with the video output")
                    }
                    PeripheralKind::Serial => {
                        diag.with_help("request the USB clock together with the USB-ACM console")
                    }
                    PeripheralKind::Memory => diag.with_note(
                        "the SDRAM PHY variant must match the memory ratio of the clock plan",
                    ),
                    _ => diag,
                }
            }
            ComposeError::Encoding(_) => diag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecpsoc_diagnostics::Severity;

    #[test]
    fn pin_conflict_display() {
        let err = ComposeError::PinConflict {
            pin: "G2".to_string(),
            first: "ethphy.tx_data[0]".to_string(),
            second: "rst_lora.pin".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "pin G2 is claimed by both ethphy.tx_data[0] and rst_lora.pin"
        );
        let diag = err.to_diagnostic();
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.code.to_string(), "E103");
        assert_eq!(diag.subject.as_deref(), Some("G2"));
    }

    #[test]
    fn unresolved_video_domain_suggests_clock() {
        let err = ComposeError::UnresolvedClockDomain {
            kind: PeripheralKind::Video,
            domain: "hdmi_clk".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "video requires clock domain 'hdmi_clk', which the clock plan does not provide"
        );
        let diag = err.to_diagnostic();
        assert_eq!(diag.code, DiagnosticCode::UNRESOLVED_CLOCK_DOMAIN);
        assert_eq!(diag.help.len(), 1);
    }

    #[test]
    fn configuration_display() {
        let err = ComposeError::configuration("board", "i7", "expected i5 or i9");
        assert_eq!(err.to_string(), "invalid board 'i7': expected i5 or i9");
        assert_eq!(err.code(), DiagnosticCode::INVALID_CONFIGURATION);
    }
}
