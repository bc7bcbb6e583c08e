//! Each failure aborts composition with a typed error and no system.

use ecpsoc_catalog::PeripheralKind;
use ecpsoc_clock::domain::HDMI_CLK;
use ecpsoc_clock::MemoryRatio;
use ecpsoc_common::Frequency;
use ecpsoc_compose::ComposeError;
use ecpsoc_config::{ConfigError, SocConfig, VideoMode};
use ecpsoc_conformance::{compose_config, full_pipeline, resolve_toml, Failure};
use ecpsoc_diagnostics::DiagnosticCode;

#[test]
fn video_terminal_without_video_clock() {
    let config = SocConfig {
        video: Some(VideoMode::Terminal),
        with_vid_clk: false,
        ..SocConfig::default()
    };
    let result = compose_config(&config);
    assert_eq!(
        result.compose_error(),
        &ComposeError::UnresolvedClockDomain {
            kind: PeripheralKind::Video,
            domain: HDMI_CLK.to_string(),
        }
    );
    assert!(result.diagnostics.is_empty());
}

#[test]
fn video_terminal_from_file_implies_the_clock() {
    let result = full_pipeline("[features]\nvideo_terminal = true\n");
    assert!(result.system().clocks().contains(HDMI_CLK));
}

#[test]
fn local_address_constants() {
    let result = full_pipeline("[network]\nlocal_ip = \"192.168.1.50\"\n");
    let constants = result.system().constants();
    assert_eq!(constants["LOCAL_1"], 192);
    assert_eq!(constants["LOCAL_2"], 168);
    assert_eq!(constants["LOCAL_3"], 1);
    assert_eq!(constants["LOCAL_4"], 50);
    assert!(!constants.contains_key("REMOTE_1"));
}

#[test]
fn fourth_octet_out_of_range() {
    let result = full_pipeline("[network]\nlocal_ip = \"192.168.1.256\"\n");
    match result.compose_error() {
        ComposeError::Configuration {
            field,
            value,
            reason,
        } => {
            assert_eq!(field, "local_ip");
            assert_eq!(value, "192.168.1.256");
            assert!(reason.starts_with("octet 4"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unsupported_board_fails_before_clocks() {
    let result =
        full_pipeline("[board]\nvariant = \"i7\"\n[clocks]\nsys_clk_freq = \"450MHz\"\n");
    let err = result.compose_error();
    assert!(matches!(err, ComposeError::Configuration { field, .. } if field == "board"));
    assert_eq!(err.code(), DiagnosticCode::INVALID_CONFIGURATION);
}

#[test]
fn unreachable_system_clock() {
    let result = full_pipeline("[clocks]\nsys_clk_freq = \"450MHz\"\n");
    let err = result.compose_error();
    assert!(matches!(err, ComposeError::Clock(e) if e.domain == "sys_clk"));
    assert_eq!(err.to_diagnostic().code.to_string(), "E102");
}

#[test]
fn memory_ratio_must_match_plan() {
    let mut config = SocConfig {
        memory_ratio: MemoryRatio::HalfRate,
        ..SocConfig::default()
    };
    let plan = ecpsoc_clock::ClockPlan::derive(&config.clock_request()).unwrap();
    config.memory_ratio = MemoryRatio::FullRate;
    let err = ecpsoc_compose::SystemComposer::new(&config)
        .compose_with_plan(plan, &ecpsoc_diagnostics::DiagnosticSink::new())
        .unwrap_err();
    assert_eq!(
        err,
        ComposeError::UnresolvedClockDomain {
            kind: PeripheralKind::Memory,
            domain: "sys_ps_clk".to_string(),
        }
    );
}

#[test]
fn half_rate_memory_binds_doubled_domains() {
    let result = full_pipeline("[clocks]\nmemory_ratio = \"1:2\"\n");
    let system = result.system();
    let sdram = system.peripheral("sdram").unwrap();
    assert_eq!(sdram.core, "HalfRateGENSDRPHY");
    for name in &sdram.companion_domains {
        let domain = system.clocks().domain(name).unwrap();
        assert_eq!(domain.frequency, Frequency::from_mhz(120.0));
    }
}

#[test]
fn mutually_exclusive_flags_rejected_on_resolve() {
    let err = resolve_toml("[features]\nspi_sdcard = true\nsdcard = true\n").unwrap_err();
    assert!(matches!(err, ConfigError::MutuallyExclusive { .. }));
    let result = full_pipeline("[features]\nethernet = true\netherbone = true\n");
    assert!(matches!(result.outcome, Err(Failure::Config(_))));
}

#[test]
fn out_of_range_phy_rejected_on_resolve() {
    let err = resolve_toml("[features]\nethernet = true\neth_phy = 2\n").unwrap_err();
    assert!(err.to_string().contains("eth_phy"), "{err}");
}

#[test]
fn unknown_override_signal() {
    let result = full_pipeline("[pins.spi]\nsclk = \"A3\"\n");
    assert!(matches!(
        result.compose_error(),
        ComposeError::Configuration { field, .. } if field == "pins.spi"
    ));
}

#[test]
fn failed_composition_leaves_no_note() {
    let result = full_pipeline("[pins.i2c]\nsda = \"U16\"\n");
    assert!(result.outcome.is_err());
    assert!(result
        .diagnostics
        .iter()
        .all(|d| d.code != DiagnosticCode::COMPOSED));
}
