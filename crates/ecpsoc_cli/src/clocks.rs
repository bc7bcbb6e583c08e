//! `ecpsoc clocks`: derive and print the clock plan.

use std::fmt::Write as _;

use ecpsoc_clock::{ClockPlan, RootClock};
use ecpsoc_compose::ComposeError;
use ecpsoc_diagnostics::{DiagnosticRenderer, JsonRenderer};

use crate::compose::report_diagnostics;
use crate::{pipeline, ComposeArgs, GlobalArgs, ReportFormat};

/// Runs the `ecpsoc clocks` command.
pub fn run(args: &ComposeArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = pipeline::resolve(&args.soc, global)?;

    match ClockPlan::derive(&config.clock_request()) {
        Ok(plan) => {
            match args.format {
                ReportFormat::Text => {
                    if !global.quiet {
                        print!("{}", render_plan(&plan));
                    }
                }
                ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&plan)?),
            }
            Ok(0)
        }
        Err(e) => {
            let diag = ComposeError::from(e).to_diagnostic();
            match args.format {
                ReportFormat::Text => report_diagnostics(&[diag], global),
                ReportFormat::Json => print!("{}", JsonRenderer.render(&diag)),
            }
            Ok(1)
        }
    }
}

/// Human-readable listing of the domains and solved PLL settings.
pub fn render_plan(plan: &ClockPlan) -> String {
    let mut out = String::new();
    match plan.root() {
        RootClock::ExternalPin { .. } => {
            let _ = writeln!(out, "root: {} board oscillator", plan.root_frequency());
        }
        RootClock::InternalOscillator { divisor } => {
            let _ = writeln!(
                out,
                "root: {} internal oscillator (divisor {divisor})",
                plan.root_frequency()
            );
        }
    }

    out.push_str("domains:\n");
    for domain in plan.domains() {
        let _ = writeln!(
            out,
            "  {:<14} {:>16} {:>6}  {}",
            domain.name,
            domain.frequency.to_string(),
            domain.phase.to_string(),
            domain.pll
        );
    }

    for pll in plan.plls() {
        let _ = writeln!(
            out,
            "{}: clki/{} fb/{} vco {}",
            pll.name, pll.clki_div, pll.clkfb_div, pll.vco
        );
        for output in &pll.outputs {
            let _ = writeln!(
                out,
                "  {:<14} /{:<4} requested {}",
                output.domain, output.divider, output.requested
            );
        }
    }
    out
}
