//! The single-pass system composer.

use std::collections::{BTreeMap, BTreeSet};

use ecpsoc_catalog::{
    expand_bus, lookup, variant, CatalogError, Multiplicity, PeripheralKind, PeripheralTemplate,
    PinBinding, PinOverrides, CRG_SIGNALS,
};
use ecpsoc_clock::domain::SYS_CLK;
use ecpsoc_clock::ClockPlan;
use ecpsoc_common::Frequency;
use ecpsoc_config::{SdCardMode, SerialKind, SocConfig};
use ecpsoc_diagnostics::{Diagnostic, DiagnosticCode, DiagnosticSink};

use crate::board::Board;
use crate::constants::{insert_address, CONFIG_CLOCK_FREQUENCY, LOCAL_IP_PREFIX, REMOTE_IP_PREFIX};
use crate::error::ComposeError;
use crate::ledger::PinLedger;
use crate::system::{
    ComposedSystem, MainRam, MemoryPhy, PeripheralConfig, PeripheralInstance, SystemParts,
    FLASH_READ_OPCODE, SDRAM_MODULE, SPI_CLK_FREQ_HZ, SPI_DATA_WIDTH, UART_BAUDRATE,
    VIDEO_TIMINGS,
};

/// A peripheral about to be instantiated.
struct Request {
    template: &'static PeripheralTemplate,
    name: String,
    pins: Vec<PinBinding>,
    config: PeripheralConfig,
}

/// Turns a [`SocConfig`] into a [`ComposedSystem`].
///
/// Composition is one linear pass: board check, clock plan, reset generator
/// pins, then every enabled peripheral in [`PeripheralKind::PRIORITY`]
/// order. The first failure aborts the pass.
#[derive(Debug, Clone, Copy)]
pub struct SystemComposer<'a> {
    config: &'a SocConfig,
}

impl<'a> SystemComposer<'a> {
    /// Creates a composer for `config`.
    pub fn new(config: &'a SocConfig) -> Self {
        Self { config }
    }

    /// Derives the clock plan from the configuration and composes the system.
    ///
    /// The board variant is checked before any clock is derived.
    pub fn compose(&self, sink: &DiagnosticSink) -> Result<ComposedSystem, ComposeError> {
        Board::parse(&self.config.board)?;
        let plan = ClockPlan::derive(&self.config.clock_request())?;
        self.compose_with_plan(plan, sink)
    }

    /// Composes the system on top of an already derived clock plan.
    ///
    /// Peripherals are bound only to domains the plan actually contains, so a
    /// plan derived for different flags than the configuration implies is
    /// rejected rather than trusted.
    pub fn compose_with_plan(
        &self,
        plan: ClockPlan,
        sink: &DiagnosticSink,
    ) -> Result<ComposedSystem, ComposeError> {
        let config = self.config;
        let board = Board::parse(&config.board)?;
        let _span = tracing::info_span!("compose", board = %board).entered();

        let mut ledger = PinLedger::default();
        self.claim_crg_pins(&plan, &mut ledger)?;

        let mut peripherals: Vec<PeripheralInstance> = Vec::new();
        let mut used: BTreeSet<String> = BTreeSet::from([SYS_CLK.to_string()]);
        for kind in PeripheralKind::PRIORITY {
            for request in self.requests_for(kind, board)? {
                admit(&peripherals, &request)?;
                ledger.claim_all(&request.name, &request.pins)?;
                let instance = bind_clocks(request, &plan)?;
                tracing::debug!(
                    instance = %instance.name,
                    kind = %instance.kind,
                    domain = %instance.clock_domain,
                    pins = instance.pins.len(),
                    "instantiated peripheral"
                );
                used.insert(instance.clock_domain.clone());
                used.extend(instance.companion_domains.iter().cloned());
                peripherals.push(instance);
            }
        }

        let main_ram = match peripherals.iter().find(|p| p.kind == PeripheralKind::Memory) {
            Some(memory) => MainRam::Sdram {
                instance: memory.name.clone(),
                module: SDRAM_MODULE,
            },
            None => MainRam::Integrated {
                size: config.integrated_main_ram_size,
            },
        };

        let constants = self.constants()?;

        for domain in plan.domains().iter().filter(|d| !used.contains(&d.name)) {
            sink.emit(
                Diagnostic::warning(
                    DiagnosticCode::UNUSED_CLOCK_DOMAIN,
                    format!("clock domain '{}' is not used by any peripheral", domain.name),
                )
                .with_subject(domain.name.clone())
                .with_note(format!("driven by {} at {}", domain.pll, domain.frequency)),
            );
        }

        let system = ComposedSystem::seal(SystemParts {
            ident: board.ident(),
            board,
            revision: config.revision.clone(),
            toolchain: config.toolchain.clone(),
            clocks: plan,
            main_ram,
            peripherals,
            constants,
        })?;

        sink.emit(Diagnostic::note(
            DiagnosticCode::COMPOSED,
            format!(
                "composed {} peripherals on {} clock domains ({} pins)",
                system.peripherals().len(),
                system.clocks().domains().len(),
                ledger.len()
            ),
        ));
        tracing::info!(fingerprint = %system.fingerprint(), "system composed");
        Ok(system)
    }

    /// Claims the oscillator input (pin-fed roots only), the reset button and
    /// the SDRAM clock output.
    fn claim_crg_pins(&self, plan: &ClockPlan, ledger: &mut PinLedger) -> Result<(), ComposeError> {
        for signal in CRG_SIGNALS {
            if signal.name == "clk25" && !plan.root().is_external() {
                continue;
            }
            for (name, pin) in signal.expanded() {
                ledger.claim(pin, format!("crg.{name}"))?;
            }
        }
        Ok(())
    }

    /// Builds the requests for one kind; disabled kinds yield none.
    fn requests_for(
        &self,
        kind: PeripheralKind,
        board: Board,
    ) -> Result<Vec<Request>, ComposeError> {
        let config = self.config;
        let requests = match kind {
            PeripheralKind::Memory => {
                if config.uses_integrated_main_ram() {
                    Vec::new()
                } else {
                    let phy = MemoryPhy::from(config.memory_ratio);
                    let name = match phy {
                        MemoryPhy::FullRate => variant::SDRAM_FULL_RATE,
                        MemoryPhy::HalfRate => variant::SDRAM_HALF_RATE,
                    };
                    vec![self.request(
                        kind,
                        name,
                        PeripheralConfig::Memory {
                            phy,
                            module: SDRAM_MODULE,
                            ratio: config.memory_ratio,
                            l2_cache_size: config.l2_size,
                        },
                    )?]
                }
            }
            PeripheralKind::Flash => vec![self.request(
                kind,
                variant::FLASH_1X,
                PeripheralConfig::Flash {
                    part: board.flash_part(),
                    mode: "1x",
                    read_opcode: FLASH_READ_OPCODE,
                },
            )?],
            PeripheralKind::SdCard => match config.sdcard {
                Some(mode) => {
                    let name = match mode {
                        SdCardMode::Spi => variant::SDCARD_SPI,
                        SdCardMode::Native => variant::SDCARD_NATIVE,
                    };
                    vec![self.request(kind, name, PeripheralConfig::SdCard { mode })?]
                }
                None => Vec::new(),
            },
            PeripheralKind::Serial => {
                let (name, baudrate) = match config.serial {
                    SerialKind::Uart => (variant::SERIAL_UART, Some(UART_BAUDRATE)),
                    SerialKind::UsbAcm => (variant::SERIAL_USB_ACM, None),
                };
                vec![self.request(
                    kind,
                    name,
                    PeripheralConfig::Serial {
                        kind: config.serial,
                        baudrate,
                    },
                )?]
            }
            PeripheralKind::Spi if config.spi => vec![self.request(
                kind,
                variant::SPI_MASTER,
                PeripheralConfig::Spi {
                    data_width: SPI_DATA_WIDTH,
                    spi_clk_freq: Frequency::from_hz(SPI_CLK_FREQ_HZ),
                },
            )?],
            PeripheralKind::I2c if config.i2c => {
                vec![self.request(kind, variant::I2C_BITBANG, PeripheralConfig::I2c)?]
            }
            PeripheralKind::Network => match config.network {
                Some(network) => {
                    let name = match network.phy {
                        0 => variant::RGMII_PORT0,
                        1 => variant::RGMII_PORT1,
                        other => {
                            return Err(ComposeError::configuration(
                                "eth_phy",
                                other.to_string(),
                                "the board has RGMII ports 0 and 1",
                            ))
                        }
                    };
                    vec![self.request(
                        kind,
                        name,
                        PeripheralConfig::Network {
                            mode: network.mode,
                            phy: network.phy,
                            tx_delay: 0,
                        },
                    )?]
                }
                None => Vec::new(),
            },
            PeripheralKind::Video => match config.video {
                Some(mode) => vec![self.request(
                    kind,
                    variant::GPDI,
                    PeripheralConfig::Video {
                        mode,
                        timings: VIDEO_TIMINGS,
                    },
                )?],
                None => Vec::new(),
            },
            PeripheralKind::Led if config.led_chaser => vec![self.request(
                kind,
                variant::LED_CHASER,
                PeripheralConfig::Led {
                    sys_clk_freq: config.sys_clk_freq,
                },
            )?],
            PeripheralKind::Gpio => self.gpio_requests()?,
            PeripheralKind::Spi | PeripheralKind::I2c | PeripheralKind::Led => Vec::new(),
        };
        Ok(requests)
    }

    /// Instantiates the template `kind`/`name` with the configured overrides.
    fn request(
        &self,
        kind: PeripheralKind,
        name: &str,
        peripheral: PeripheralConfig,
    ) -> Result<Request, ComposeError> {
        let template = lookup(kind, name)
            .map_err(|e| ComposeError::configuration(kind.as_str(), name, e.to_string()))?;
        let pins = self.resolve_pins(template)?;
        Ok(Request {
            template,
            name: template.instance.to_string(),
            pins,
            config: peripheral,
        })
    }

    fn resolve_pins(
        &self,
        template: &'static PeripheralTemplate,
    ) -> Result<Vec<PinBinding>, ComposeError> {
        let empty = PinOverrides::new();
        let overrides = self.config.overrides_for(template.kind).unwrap_or(&empty);
        template.resolve(overrides).map_err(|e| {
            let signal = match &e {
                CatalogError::UnknownSignal { signal, .. } => signal.clone(),
                _ => template.variant.to_string(),
            };
            ComposeError::configuration(format!("pins.{}", template.kind), signal, e.to_string())
        })
    }

    /// The LoRa reset bank followed by caller-defined banks.
    fn gpio_requests(&self) -> Result<Vec<Request>, ComposeError> {
        let config = self.config;
        let mut requests = Vec::new();
        if config.lora_reset {
            requests.push(self.request(
                PeripheralKind::Gpio,
                variant::GPIO_LORA_RESET,
                PeripheralConfig::Gpio { width: 1 },
            )?);
        }
        if config.gpio_banks.is_empty() {
            return Ok(requests);
        }
        let template = lookup(PeripheralKind::Gpio, variant::GPIO_BANK)
            .map_err(|e| ComposeError::configuration("gpio", variant::GPIO_BANK, e.to_string()))?;
        for bank in &config.gpio_banks {
            if bank.pins.is_empty() {
                return Err(ComposeError::configuration(
                    "gpio.pins",
                    bank.name.clone(),
                    "a bank needs at least one pin",
                ));
            }
            requests.push(Request {
                template,
                name: bank.name.clone(),
                pins: expand_bus("pin", &bank.pins),
                config: PeripheralConfig::Gpio {
                    width: bank.pins.len(),
                },
            });
        }
        Ok(requests)
    }

    /// `CONFIG_CLOCK_FREQUENCY` plus the address octets, if given.
    fn constants(&self) -> Result<BTreeMap<String, u64>, ComposeError> {
        let config = self.config;
        let mut constants = BTreeMap::new();
        constants.insert(
            CONFIG_CLOCK_FREQUENCY.to_string(),
            config.sys_clk_freq.whole_hz(),
        );
        if let Some(local) = config.local_ip.as_deref().filter(|s| !s.is_empty()) {
            insert_address(&mut constants, LOCAL_IP_PREFIX, "local_ip", local)?;
        }
        if let Some(remote) = config.remote_ip.as_deref().filter(|s| !s.is_empty()) {
            insert_address(&mut constants, REMOTE_IP_PREFIX, "remote_ip", remote)?;
        }
        Ok(constants)
    }
}

/// Checks that `request` may join the peripherals composed so far.
fn admit(peripherals: &[PeripheralInstance], request: &Request) -> Result<(), ComposeError> {
    let kind = request.template.kind;
    if request.template.multiplicity == Multiplicity::Singular
        && peripherals.iter().any(|p| p.kind == kind)
    {
        return Err(ComposeError::configuration(
            kind.as_str(),
            request.name.clone(),
            format!("only one {kind} instance is allowed"),
        ));
    }
    if peripherals.iter().any(|p| p.name == request.name) {
        return Err(ComposeError::configuration(
            format!("{kind}.name"),
            request.name.clone(),
            "instance names must be unique",
        ));
    }
    Ok(())
}

/// Binds a request to the plan's domains, failing on the first missing one.
fn bind_clocks(request: Request, plan: &ClockPlan) -> Result<PeripheralInstance, ComposeError> {
    let template = request.template;
    if let Some(missing) = template.required_domains().find(|d| !plan.contains(d)) {
        return Err(ComposeError::UnresolvedClockDomain {
            kind: template.kind,
            domain: missing.to_string(),
        });
    }
    Ok(PeripheralInstance {
        name: request.name,
        kind: template.kind,
        variant: template.variant,
        core: template.core,
        pins: request.pins,
        io_standard: template.io_standard,
        clock_domain: template.clock_domain.to_string(),
        companion_domains: template
            .companion_domains
            .iter()
            .map(|d| d.to_string())
            .collect(),
        config: request.config,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecpsoc_clock::domain::{HDMI5X_CLK, HDMI_CLK, SYS2X_CLK, SYS_PS_CLK, USB_12M, USB_48M};
    use ecpsoc_clock::{MemoryRatio, RootClock};
    use ecpsoc_config::{GpioBank, NetworkConfig, NetworkMode, VideoMode};

    use crate::board::FlashPart;

    fn compose(config: &SocConfig) -> Result<ComposedSystem, ComposeError> {
        SystemComposer::new(config).compose(&DiagnosticSink::new())
    }

    fn with_override(kind: PeripheralKind, signal: &str, pin: &str) -> SocConfig {
        let mut config = SocConfig::default();
        config
            .pin_overrides
            .entry(kind)
            .or_default()
            .insert(signal.to_string(), pin.to_string());
        config
    }

    #[test]
    fn default_board_composes() {
        let sink = DiagnosticSink::new();
        let config = SocConfig::default();
        let system = SystemComposer::new(&config).compose(&sink).unwrap();
        let names: Vec<_> = system.peripherals().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            ["sdram", "spiflash", "uart", "spi", "i2c_master", "leds", "rst_lora"]
        );
        assert_eq!(system.ident(), "LiteX System on Colorlight I5 Board");
        assert_eq!(system.constants()[CONFIG_CLOCK_FREQUENCY], 60_000_000);
        assert_eq!(system.constants().len(), 1);
        assert!(matches!(system.main_ram(), MainRam::Sdram { .. }));
        assert_eq!(sink.warning_count(), 0);
        assert!(!sink.has_errors());
        assert_eq!(sink.diagnostics().len(), 1);
    }

    #[test]
    fn unsupported_board_checked_before_clocks() {
        let config = SocConfig {
            board: "i7".to_string(),
            sys_clk_freq: Frequency::from_hz(0.0),
            ..SocConfig::default()
        };
        let err = compose(&config).unwrap_err();
        assert!(matches!(err, ComposeError::Configuration { ref field, .. } if field == "board"));
    }

    #[test]
    fn video_without_video_clock_is_unresolved() {
        let config = SocConfig {
            video: Some(VideoMode::Terminal),
            ..SocConfig::default()
        };
        assert_eq!(
            compose(&config).unwrap_err(),
            ComposeError::UnresolvedClockDomain {
                kind: PeripheralKind::Video,
                domain: HDMI_CLK.to_string(),
            }
        );
    }

    #[test]
    fn video_binds_pixel_and_serializer_clocks() {
        let config = SocConfig {
            video: Some(VideoMode::Framebuffer),
            ..SocConfig::default()
        }
        .with_implied_clocks();
        let system = compose(&config).unwrap();
        let video = system.peripheral("videophy").unwrap();
        assert_eq!(video.clock_domain, HDMI_CLK);
        assert_eq!(video.companion_domains, [HDMI5X_CLK]);
        assert_eq!(
            video.config,
            PeripheralConfig::Video {
                mode: VideoMode::Framebuffer,
                timings: VIDEO_TIMINGS,
            }
        );
    }

    #[test]
    fn overlapping_override_names_both_claimants() {
        let config = with_override(PeripheralKind::Spi, "clk", "U16");
        assert_eq!(
            compose(&config).unwrap_err(),
            ComposeError::PinConflict {
                pin: "U16".to_string(),
                first: "spi.clk".to_string(),
                second: "leds.user_led_n".to_string(),
            }
        );
    }

    #[test]
    fn override_onto_reset_pin_conflicts_with_crg() {
        let config = with_override(PeripheralKind::I2c, "sda", "K18");
        let err = compose(&config).unwrap_err();
        assert!(
            matches!(err, ComposeError::PinConflict { ref first, .. } if first == "crg.cpu_reset_n")
        );
    }

    #[test]
    fn internal_oscillator_frees_the_clock_pin() {
        let mut config = with_override(PeripheralKind::Spi, "clk", "P3");
        assert!(matches!(
            compose(&config).unwrap_err(),
            ComposeError::PinConflict { ref first, .. } if first == "crg.clk25"
        ));
        config.root = RootClock::internal_oscillator();
        let system = compose(&config).unwrap();
        assert_eq!(system.peripheral("spi").unwrap().pins[0].pin, "P3");
    }

    #[test]
    fn port1_collides_with_remapped_lora_reset() {
        let mut config = with_override(PeripheralKind::Gpio, "pin", "G2");
        config.network = Some(NetworkConfig {
            mode: NetworkMode::Ethernet,
            phy: 1,
        });
        assert_eq!(
            compose(&config).unwrap_err(),
            ComposeError::PinConflict {
                pin: "G2".to_string(),
                first: "ethphy.tx_data[0]".to_string(),
                second: "rst_lora.pin".to_string(),
            }
        );
    }

    #[test]
    fn network_parameters() {
        let config = SocConfig {
            network: Some(NetworkConfig {
                mode: NetworkMode::Etherbone,
                phy: 0,
            }),
            ..SocConfig::default()
        };
        let system = compose(&config).unwrap();
        let eth = system.peripheral("ethphy").unwrap();
        assert_eq!(eth.variant, variant::RGMII_PORT0);
        assert_eq!(
            eth.config,
            PeripheralConfig::Network {
                mode: NetworkMode::Etherbone,
                phy: 0,
                tx_delay: 0,
            }
        );
    }

    #[test]
    fn invalid_eth_phy() {
        let config = SocConfig {
            network: Some(NetworkConfig {
                mode: NetworkMode::Ethernet,
                phy: 3,
            }),
            ..SocConfig::default()
        };
        assert!(matches!(
            compose(&config).unwrap_err(),
            ComposeError::Configuration { ref field, .. } if field == "eth_phy"
        ));
    }

    #[test]
    fn composing_twice_is_identical() {
        let config = SocConfig {
            local_ip: Some("192.168.1.50".to_string()),
            remote_ip: Some("192.168.1.100".to_string()),
            memory_ratio: MemoryRatio::HalfRate,
            ..SocConfig::default()
        };
        let a = compose(&config).unwrap();
        let b = compose(&config).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_tracks_content() {
        let a = compose(&SocConfig::default()).unwrap();
        let b = compose(&SocConfig {
            board: "i9".to_string(),
            ..SocConfig::default()
        })
        .unwrap();
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn address_constants() {
        let config = SocConfig {
            local_ip: Some("192.168.1.50".to_string()),
            remote_ip: Some("192.168.1.100".to_string()),
            ..SocConfig::default()
        };
        let system = compose(&config).unwrap();
        let constants = system.constants();
        assert_eq!(
            [
                constants["LOCAL_1"],
                constants["LOCAL_2"],
                constants["LOCAL_3"],
                constants["LOCAL_4"]
            ],
            [192, 168, 1, 50]
        );
        assert_eq!(constants["REMOTE_4"], 100);
        assert_eq!(constants.len(), 9);
    }

    #[test]
    fn bad_octet_aborts() {
        let config = SocConfig {
            local_ip: Some("192.168.1.256".to_string()),
            ..SocConfig::default()
        };
        let err = compose(&config).unwrap_err();
        assert!(err.to_string().contains("octet 4"), "{err}");
    }

    #[test]
    fn half_rate_selects_half_rate_phy() {
        let config = SocConfig {
            memory_ratio: MemoryRatio::HalfRate,
            ..SocConfig::default()
        };
        let system = compose(&config).unwrap();
        let sdram = system.peripheral("sdram").unwrap();
        assert_eq!(sdram.core, "HalfRateGENSDRPHY");
        assert_eq!(sdram.companion_domains, ["sys2x_clk", "sys2x_ps_clk"]);
    }

    #[test]
    fn mismatched_plan_rejected() {
        let config = SocConfig {
            memory_ratio: MemoryRatio::HalfRate,
            ..SocConfig::default()
        };
        let plan = ClockPlan::derive(&SocConfig::default().clock_request()).unwrap();
        let err = SystemComposer::new(&config)
            .compose_with_plan(plan, &DiagnosticSink::new())
            .unwrap_err();
        assert_eq!(
            err,
            ComposeError::UnresolvedClockDomain {
                kind: PeripheralKind::Memory,
                domain: SYS2X_CLK.to_string(),
            }
        );
    }

    #[test]
    fn integrated_ram_skips_sdram_and_warns() {
        let sink = DiagnosticSink::new();
        let config = SocConfig {
            integrated_main_ram_size: 0x8000,
            ..SocConfig::default()
        };
        let system = SystemComposer::new(&config).compose(&sink).unwrap();
        assert!(system.peripheral("sdram").is_none());
        assert_eq!(system.main_ram(), &MainRam::Integrated { size: 0x8000 });
        let warnings: Vec<_> = sink
            .diagnostics()
            .into_iter()
            .filter(|d| d.code == DiagnosticCode::UNUSED_CLOCK_DOMAIN)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].subject.as_deref(), Some(SYS_PS_CLK));
    }

    #[test]
    fn unused_usb_clock_warns() {
        let sink = DiagnosticSink::new();
        let config = SocConfig {
            with_usb_clk: true,
            ..SocConfig::default()
        };
        SystemComposer::new(&config).compose(&sink).unwrap();
        assert_eq!(sink.warning_count(), 2);
    }

    #[test]
    fn usb_acm_serial_binds_usb_clocks() {
        let config = SocConfig {
            serial: SerialKind::UsbAcm,
            ..SocConfig::default()
        }
        .with_implied_clocks();
        let system = compose(&config).unwrap();
        let serial = system.peripheral("usb_acm").unwrap();
        assert_eq!(serial.clock_domain, USB_12M);
        assert_eq!(serial.companion_domains, [USB_48M]);
        assert!(system.peripheral("uart").is_none());
    }

    #[test]
    fn usb_acm_without_usb_clock_is_unresolved() {
        let config = SocConfig {
            serial: SerialKind::UsbAcm,
            ..SocConfig::default()
        };
        assert!(matches!(
            compose(&config).unwrap_err(),
            ComposeError::UnresolvedClockDomain { kind: PeripheralKind::Serial, .. }
        ));
    }

    #[test]
    fn flash_part_follows_board() {
        let i9 = compose(&SocConfig {
            board: "I9".to_string(),
            ..SocConfig::default()
        })
        .unwrap();
        let flash = i9.peripheral("spiflash").unwrap();
        assert!(matches!(
            flash.config,
            PeripheralConfig::Flash {
                part: FlashPart::W25q64,
                read_opcode: "READ_1_1_1",
                ..
            }
        ));
    }

    #[test]
    fn sdcard_modes() {
        let system = compose(&SocConfig {
            sdcard: Some(SdCardMode::Native),
            ..SocConfig::default()
        })
        .unwrap();
        let sd = system.peripheral("sdcard").unwrap();
        assert_eq!(sd.pins.len(), 6);
        assert_eq!(sd.pins[2].signal, "data[0]");
    }

    #[test]
    fn caller_gpio_banks() {
        let config = SocConfig {
            gpio_banks: vec![GpioBank {
                name: "relay".to_string(),
                pins: vec!["A3".to_string(), "A4".to_string()],
            }],
            ..SocConfig::default()
        };
        let system = compose(&config).unwrap();
        let gpio: Vec<_> = system.peripherals_of(PeripheralKind::Gpio).collect();
        assert_eq!(gpio.len(), 2);
        assert_eq!(gpio[1].name, "relay");
        assert_eq!(gpio[1].pins[1], PinBinding::new("pin[1]", "A4"));
        assert_eq!(gpio[1].config, PeripheralConfig::Gpio { width: 2 });
    }

    #[test]
    fn duplicate_instance_name_rejected() {
        let config = SocConfig {
            gpio_banks: vec![GpioBank {
                name: "rst_lora".to_string(),
                pins: vec!["A3".to_string()],
            }],
            ..SocConfig::default()
        };
        assert!(matches!(
            compose(&config).unwrap_err(),
            ComposeError::Configuration { ref field, .. } if field == "gpio.name"
        ));
    }

    #[test]
    fn unknown_override_signal() {
        let config = with_override(PeripheralKind::Spi, "sclk", "A3");
        assert_eq!(
            compose(&config).unwrap_err(),
            ComposeError::Configuration {
                field: "pins.spi".to_string(),
                value: "sclk".to_string(),
                reason: "spi template 'spi_master' has no signal 'sclk'".to_string(),
            }
        );
    }

    #[test]
    fn overrides_for_disabled_peripherals_reserve_nothing() {
        let mut config = with_override(PeripheralKind::Video, "clk_p", "U16");
        config.spi = false;
        config.i2c = false;
        let system = compose(&config).unwrap();
        assert!(system.peripheral("spi").is_none());
        assert!(system.pin_assignments().all(|(pin, _)| pin != "F3"));
    }

    #[test]
    fn unreachable_clock_is_reported() {
        let config = SocConfig {
            sys_clk_freq: Frequency::from_mhz(450.0),
            ..SocConfig::default()
        };
        let err = compose(&config).unwrap_err();
        assert!(matches!(err, ComposeError::Clock(ref e) if e.domain == "sys_clk"));
        assert_eq!(err.code(), DiagnosticCode::CLOCK_DERIVATION);
    }

    #[test]
    fn second_singular_instance_rejected() {
        let config = SocConfig::default();
        let composer = SystemComposer::new(&config);
        let system = compose(&config).unwrap();
        let request = composer
            .request(
                PeripheralKind::Flash,
                variant::FLASH_1X,
                PeripheralConfig::Flash {
                    part: FlashPart::Gd25q16,
                    mode: "1x",
                    read_opcode: FLASH_READ_OPCODE,
                },
            )
            .unwrap();
        let err = admit(system.peripherals(), &request).unwrap_err();
        assert!(matches!(
            err,
            ComposeError::Configuration { ref field, ref reason, .. }
                if field == "flash" && reason == "only one flash instance is allowed"
        ));
    }

    #[test]
    fn repeatable_kind_admits_another_bank() {
        let config = SocConfig::default();
        let system = compose(&config).unwrap();
        let template = lookup(PeripheralKind::Gpio, variant::GPIO_BANK).unwrap();
        let request = Request {
            template,
            name: "relay".to_string(),
            pins: vec![PinBinding::new("pin[0]", "A3")],
            config: PeripheralConfig::Gpio { width: 1 },
        };
        assert!(admit(system.peripherals(), &request).is_ok());
    }
}
