//! Diagnostic rendering backends for human-readable and machine-readable output.

use crate::diagnostic::Diagnostic;

/// Formats diagnostics into output strings.
pub trait DiagnosticRenderer {
    /// Renders a single diagnostic into a formatted string.
    fn render(&self, diag: &Diagnostic) -> String;

    /// Renders a batch of diagnostics, one after another.
    fn render_all(&self, diags: &[Diagnostic]) -> String {
        diags.iter().map(|d| self.render(d)).collect()
    }
}

/// Renders diagnostics in a rustc-style terminal format.
///
/// ```text
/// error[E103]: pin F2 is claimed by both spi.clk and i2c.scl
///   --> i2c.scl
///    = note: ...
///    = help: ...
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TerminalRenderer {
    /// Whether to use ANSI color codes in output.
    pub color: bool,
}

impl TerminalRenderer {
    /// Creates a new terminal renderer.
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl DiagnosticRenderer for TerminalRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        let mut out = String::new();

        if self.color {
            out.push_str(&format!(
                "{}{}[{}]\x1b[0m\x1b[1m: {}\x1b[0m\n",
                diag.severity.ansi_color(),
                diag.severity,
                diag.code,
                diag.message
            ));
        } else {
            out.push_str(&format!(
                "{}[{}]: {}\n",
                diag.severity, diag.code, diag.message
            ));
        }

        if let Some(subject) = &diag.subject {
            out.push_str(&format!("  --> {subject}\n"));
        }
        for note in &diag.notes {
            out.push_str(&format!("   = note: {note}\n"));
        }
        for help in &diag.help {
            out.push_str(&format!("   = help: {help}\n"));
        }

        out
    }
}

/// Renders each diagnostic as one line of JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl DiagnosticRenderer for JsonRenderer {
    fn render(&self, diag: &Diagnostic) -> String {
        match serde_json::to_string(diag) {
            Ok(line) => format!("{line}\n"),
            Err(e) => format!("{{\"error\":\"unserializable diagnostic: {e}\"}}\n"),
        }
    }
}
