//! `ecpsoc compose`: resolve, derive clocks, compose, report.

use std::fmt::Write as _;

use ecpsoc_compose::{ComposedSystem, MainRam, SystemComposer};
use ecpsoc_diagnostics::{Diagnostic, DiagnosticRenderer, DiagnosticSink, TerminalRenderer};
use serde::Serialize;

use crate::clocks::render_plan;
use crate::{pipeline, ComposeArgs, GlobalArgs, ReportFormat};

/// JSON output of `ecpsoc compose`.
#[derive(Serialize)]
struct Report<'a> {
    system: Option<&'a ComposedSystem>,
    diagnostics: &'a [Diagnostic],
}

/// Runs the `ecpsoc compose` command.
///
/// Returns exit code 0 when the system composed, 1 otherwise. Configuration
/// file errors are returned as `Err` and reported by `main`.
pub fn run(args: &ComposeArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = pipeline::resolve(&args.soc, global)?;
    let sink = DiagnosticSink::new();

    let system = match SystemComposer::new(&config).compose(&sink) {
        Ok(system) => Some(system),
        Err(e) => {
            tracing::debug!(error = %e, "composition failed");
            sink.emit(e.to_diagnostic());
            None
        }
    };
    let diagnostics = sink.take_all();

    match args.format {
        ReportFormat::Text => {
            if let Some(system) = &system {
                if !global.quiet {
                    print!("{}", render_system(system));
                }
            }
            report_diagnostics(&diagnostics, global);
        }
        ReportFormat::Json => {
            let report = Report {
                system: system.as_ref(),
                diagnostics: &diagnostics,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(if system.is_some() { 0 } else { 1 })
}

/// Writes diagnostics to stderr in the terminal format.
///
/// In quiet mode only errors are shown.
pub fn report_diagnostics(diagnostics: &[Diagnostic], global: &GlobalArgs) {
    let renderer = TerminalRenderer::new(global.color);
    for diag in diagnostics {
        if global.quiet && !diag.severity.is_error() {
            continue;
        }
        eprint!("{}", renderer.render(diag));
    }
}

/// Human-readable summary of a composed system.
pub fn render_system(system: &ComposedSystem) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} (revision {}, toolchain {})",
        system.ident(),
        system.revision(),
        system.toolchain()
    );
    out.push('\n');
    out.push_str(&render_plan(system.clocks()));

    out.push_str("\nmain ram: ");
    match system.main_ram() {
        MainRam::Sdram { instance, module } => {
            let _ = writeln!(out, "{module} via {instance}");
        }
        MainRam::Integrated { size } => {
            let _ = writeln!(out, "{size} bytes integrated");
        }
    }

    out.push_str("\nperipherals:\n");
    for p in system.peripherals() {
        let mut domains = p.clock_domain.clone();
        for companion in &p.companion_domains {
            domains.push('+');
            domains.push_str(companion);
        }
        let _ = writeln!(
            out,
            "  {:<12} {:<8} {:<18} {:<28} {}",
            p.name,
            p.kind,
            p.core,
            domains,
            p.pins
                .iter()
                .map(|b| format!("{}={}", b.signal, b.pin))
                .collect::<Vec<_>>()
                .join(" ")
        );
    }

    out.push_str("\nconstants:\n");
    for (name, value) in system.constants() {
        let _ = writeln!(out, "  {name} = {value}");
    }
    let _ = writeln!(out, "\nfingerprint: {}", system.fingerprint());
    out
}
