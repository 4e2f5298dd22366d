//! WasteNode Firmware: Main Entry Point
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  LedIndicator    LogEventSink   NvsAdapter   MonotonicClock    │
//! │  (IndicatorPort) (EventSink)    (Config)     (uptime)          │
//! │  ChannelBridge   LoopbackCoordinator                           │
//! │  (Requests)      (Registration + Observers)                    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              NodeService (pure logic)                  │    │
//! │  │  Classifiers · AnomalyState · Reset · Actuator         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  NodeRuntime (registration · button · requests · timers)       │
//! └────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::Result;
use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{InterruptType, PinDriver, Pull};
use esp_idf_hal::peripherals::Peripherals;
use log::{info, warn};

use wastenode::adapters::coordinator::LoopbackCoordinator;
use wastenode::adapters::log_sink::LogEventSink;
use wastenode::adapters::nvs::NvsAdapter;
use wastenode::adapters::time::MonotonicClock;
use wastenode::app::ports::ConfigPort;
use wastenode::config::NodeConfig;
use wastenode::drivers::button::button_isr_handler;
use wastenode::drivers::indicator::LedIndicator;
use wastenode::endpoints::channels::ChannelBridge;
use wastenode::runtime::NodeRuntime;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  WasteNode v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Load config from NVS (or defaults) ─────────────────
    let config = match NvsAdapter::new().and_then(|nvs| nvs.load()) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("NVS config unavailable ({}), using defaults", e);
            NodeConfig::default()
        }
    };
    let tick_ms = config.actuator_tick_ms;

    // ── 3. Peripherals ────────────────────────────────────────
    let peripherals = Peripherals::take()?;
    let red = PinDriver::output(peripherals.pins.gpio4)?;
    let yellow = PinDriver::output(peripherals.pins.gpio5)?;
    let green = PinDriver::output(peripherals.pins.gpio6)?;

    let mut button = PinDriver::input(peripherals.pins.gpio0)?;
    button.set_pull(Pull::Up)?;
    button.set_interrupt_type(InterruptType::NegEdge)?;
    // SAFETY: the callback only performs a lock-free atomic store and an
    // ISR-safe timer read.
    unsafe {
        button.subscribe(|| {
            let now_us = esp_idf_svc::sys::esp_timer_get_time();
            button_isr_handler((now_us / 1_000) as u32);
        })?;
    }
    button.enable_interrupt()?;

    // ── 4. Runtime ────────────────────────────────────────────
    let clock = MonotonicClock::new();
    let mut runtime = NodeRuntime::new(
        config,
        LedIndicator::new(red, yellow, green),
        LoopbackCoordinator::new(),
        ChannelBridge::global(),
        LogEventSink::new(),
    )?;
    runtime.start(clock.uptime_ms());
    info!("Entering control loop ({} ms tick)", tick_ms);

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        runtime.step(clock.uptime_ms());
        // The GPIO driver disarms the interrupt after each edge.
        button.enable_interrupt()?;
        FreeRtos::delay_ms(tick_ms);
    }
}
