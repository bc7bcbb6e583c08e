//! Loading `ecpsoc.toml` from disk and composing it.

use std::fs;

use ecpsoc_compose::{MainRam, SystemComposer};
use ecpsoc_config::{load_config, resolve_soc, ConfigError, SerialKind};
use ecpsoc_diagnostics::{DiagnosticCode, DiagnosticSink, Severity};

#[test]
fn project_directory_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("ecpsoc.toml"),
        r#"
[board]
variant = "i9"
revision = "7.2"
toolchain = "diamond"

[clocks]
sys_clk_freq = 50000000

[soc]
integrated_main_ram_size = 16384
"#,
    )
    .unwrap();

    let file = load_config(dir.path()).unwrap();
    let config = resolve_soc(&file).unwrap();
    assert_eq!(config.serial, SerialKind::Uart);

    let sink = DiagnosticSink::new();
    let system = SystemComposer::new(&config).compose(&sink).unwrap();
    assert_eq!(system.revision(), "7.2");
    assert_eq!(system.toolchain(), "diamond");
    assert_eq!(system.main_ram(), &MainRam::Integrated { size: 16384 });
    assert_eq!(system.constants()["CONFIG_CLOCK_FREQUENCY"], 50_000_000);

    let diagnostics = sink.diagnostics();
    let warnings: Vec<_> = diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
        .collect();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].code, DiagnosticCode::UNUSED_CLOCK_DOMAIN);
    assert_eq!(warnings[0].subject.as_deref(), Some("sys_ps_clk"));
    assert_eq!(
        diagnostics.last().map(|d| d.code),
        Some(DiagnosticCode::COMPOSED)
    );
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(load_config(dir.path()), Err(ConfigError::IoError(_))));
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ecpsoc.toml"), "[board\nvariant = ").unwrap();
    assert!(matches!(load_config(dir.path()), Err(ConfigError::ParseError(_))));
}

#[test]
fn bad_memory_ratio_names_the_field() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("ecpsoc.toml"),
        "[clocks]\nmemory_ratio = \"1:4\"\n",
    )
    .unwrap();
    let file = load_config(dir.path()).unwrap();
    match resolve_soc(&file) {
        Err(ConfigError::InvalidValue { field, value, .. }) => {
            assert_eq!(field, "clocks.memory_ratio");
            assert_eq!(value, "1:4");
        }
        other => panic!("unexpected result: {other:?}"),
    }
}
