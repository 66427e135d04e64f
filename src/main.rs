//! PetFeeder Peripheral Firmware: Main Entry Point
//!
//! Hexagonal architecture with a single cooperative poll loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter     UartTransport      Esp32TimeAdapter       │
//! │  (ActuatorPort)      (Transport)        (ClockPort)            │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  FrameAssembler · CommandDispatcher · Buzzer · Dispenser│   │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Watchdog (fed every tick)                                     │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

// ── Imports ───────────────────────────────────────────────────
use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use log::{info, warn};

use petfeeder::adapters::hardware::HardwareAdapter;
use petfeeder::adapters::time::Esp32TimeAdapter;
use petfeeder::adapters::uart::UartTransport;
use petfeeder::app::service::AppService;
use petfeeder::config::SystemConfig;
use petfeeder::drivers::hw_init;
use petfeeder::drivers::watchdog::Watchdog;

/// Load the build-time override, falling back to defaults.
fn load_config() -> SystemConfig {
    match option_env!("PETFEEDER_CONFIG_JSON") {
        Some(json) => match SystemConfig::from_json(json) {
            Ok(cfg) => {
                info!("Config loaded from PETFEEDER_CONFIG_JSON");
                cfg
            }
            Err(e) => {
                warn!("Config override rejected ({}), using defaults", e);
                SystemConfig::default()
            }
        },
        None => SystemConfig::default(),
    }
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  PetFeeder peripheral v{}         ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration and peripherals ──────────────────────
    let config = load_config();
    if let Err(e) = hw_init::bring_up(&config) {
        // Without the host link or actuators there is nothing to serve.
        // The watchdog is not yet armed; halt and let the operator see the log.
        log::error!("Bring-up failed ({}), halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }
    let watchdog = Watchdog::new(config.watchdog_timeout_ms);

    // ── 3. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::from_board();
    let mut uart = UartTransport::new();
    let clock = Esp32TimeAdapter::new();

    // ── 4. Construct app service ──────────────────────────────
    let mut app = AppService::new(&config);
    app.start(&mut hw);

    info!(
        "System ready ({:?} protocol, {} baud, watchdog {}). Entering poll loop.",
        config.protocol_revision,
        config.uart_baud,
        if watchdog.is_armed() { "armed" } else { "off" }
    );

    // ── 5. Poll loop ──────────────────────────────────────────
    loop {
        app.tick(&mut uart, &mut hw, &clock);

        // Feed watchdog on every iteration.
        watchdog.feed();

        // Yield to the idle task; the tick itself never blocks.
        FreeRtos::delay_ms(config.loop_yield_ms);
    }
}
