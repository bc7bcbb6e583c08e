//! Conformance helpers for the SoC composer.
//!
//! Runs configuration text through the whole front half of the build
//! (parse → resolve → derive clocks → compose) and returns a structured
//! result for assertion in the integration tests.

#![warn(missing_docs)]

use ecpsoc_compose::{ComposeError, ComposedSystem, SystemComposer};
use ecpsoc_config::{ConfigError, SocConfig};
use ecpsoc_diagnostics::{Diagnostic, DiagnosticSink};

/// Where the pipeline stopped.
#[derive(Debug, thiserror::Error)]
pub enum Failure {
    /// The file could not be parsed or resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The resolved configuration could not be composed.
    #[error(transparent)]
    Compose(#[from] ComposeError),
}

impl Failure {
    /// Returns the composition error, if that is where the pipeline stopped.
    pub fn compose_error(&self) -> Option<&ComposeError> {
        match self {
            Failure::Compose(e) => Some(e),
            Failure::Config(_) => None,
        }
    }
}

/// Result of running the full pipeline.
#[derive(Debug)]
pub struct PipelineResult {
    /// The composed system, or the first failure.
    pub outcome: Result<ComposedSystem, Failure>,
    /// All diagnostics emitted during composition.
    pub diagnostics: Vec<Diagnostic>,
    /// Number of warning-severity diagnostics.
    pub warning_count: usize,
}

impl PipelineResult {
    /// The composed system; panics with the failure otherwise.
    pub fn system(&self) -> &ComposedSystem {
        match &self.outcome {
            Ok(system) => system,
            Err(e) => panic!("expected a composed system, got: {e}"),
        }
    }

    /// The composition error; panics if the pipeline stopped elsewhere.
    pub fn compose_error(&self) -> &ComposeError {
        match &self.outcome {
            Err(Failure::Compose(e)) => e,
            Err(Failure::Config(e)) => panic!("expected a composition error, got: {e}"),
            Ok(_) => panic!("expected a composition error, but the system composed"),
        }
    }
}

/// Parses and resolves `ecpsoc.toml` text.
pub fn resolve_toml(source: &str) -> Result<SocConfig, ConfigError> {
    let file = ecpsoc_config::load_config_from_str(source)?;
    ecpsoc_config::resolve_soc(&file)
}

/// Composes an already resolved configuration.
pub fn compose_config(config: &SocConfig) -> PipelineResult {
    let sink = DiagnosticSink::new();
    let outcome = SystemComposer::new(config)
        .compose(&sink)
        .map_err(Failure::from);
    PipelineResult {
        outcome,
        warning_count: sink.warning_count(),
        diagnostics: sink.take_all(),
    }
}

/// Runs the full pipeline on `ecpsoc.toml` text.
pub fn full_pipeline(source: &str) -> PipelineResult {
    match resolve_toml(source) {
        Ok(config) => compose_config(&config),
        Err(e) => PipelineResult {
            outcome: Err(Failure::Config(e)),
            diagnostics: Vec::new(),
            warning_count: 0,
        },
    }
}
