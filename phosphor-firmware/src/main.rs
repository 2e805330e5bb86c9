//! Phosphor - XY Vector Display Firmware
//!
//! Drives an oscilloscope in X-Y mode from an RP2040 and an MCP4922 dual
//! DAC. Drawing runs on the thread executor; the refresh consumer runs
//! on a higher-priority interrupt executor so a long draw never starves
//! the screen.
//!
//! Pins (Raspberry Pi Pico):
//! - GPIO18 SCK, GPIO19 MOSI, GPIO20 CS to the DAC
//! - GPIO16 Z (beam blanking)

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{InterruptExecutor, Spawner};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::PIO0;
use embassy_rp::pio::Pio;
use embassy_rp::spi::{Config as SpiConfig, Spi};
use embassy_time::Delay;
use static_cell::{ConstStaticCell, StaticCell};
use {defmt_rtt as _, panic_probe as _};

use phosphor_core::buffer::FrameExchange;
use phosphor_core::config::{parse_config, BackendKind, BoardCaps, ScopeConfig};
use phosphor_core::refresh::{RefreshLink, Refresher};
use phosphor_core::Scope;
use phosphor_drivers::{BlankLine, Mcp4922, PulseOutput, StreamingConfig, StreamingOutput};
use phosphor_hal_rp2040::pio::MAX_WORD_RATE_HZ;
use phosphor_hal_rp2040::{Pin, PioDacStream};

use crate::clock::EmbassyClock;
use crate::tasks::FRAME_CAPACITY;

mod clock;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit scope.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../scope.toml");

/// DAC SPI clock for the pulse backend
const PULSE_SPI_HZ: u32 = 16_000_000;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => embassy_rp::pio::InterruptHandler<PIO0>;
});

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_HIGH.on_interrupt()
}

// Built in place; too large to construct on the stack
static EXCHANGE: ConstStaticCell<FrameExchange<FRAME_CAPACITY>> = ConstStaticCell::new(FrameExchange::new());
static LINK: StaticCell<RefreshLink> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Phosphor firmware v{} starting...", phosphor_core::VERSION);

    let config = load_config();
    info!(
        "Config: backend={:?} clock={} Hz floor={} us saver={} s",
        config.backend, config.clock_hz, config.refresh_floor_us, config.screen_saver_s
    );

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let exchange = EXCHANGE.take();
    let (producer, consumer) = exchange.split();
    let link: &'static RefreshLink = LINK.init(RefreshLink::new(config.refresh_floor_us, config.screen_saver_ms()));
    info!("Frame buffers: 3 x {} samples", FRAME_CAPACITY);

    let blank = BlankLine::new(Pin::new(Output::new(p.PIN_16, Level::High)), config.blank_active_high);

    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let high_spawner = EXECUTOR_HIGH.start(interrupt::SWI_IRQ_1);

    match config.backend {
        BackendKind::Streaming => {
            let Pio { mut common, sm0, .. } = Pio::new(p.PIO0, Irqs);
            let stream = PioDacStream::new(
                &mut common,
                sm0,
                p.DMA_CH0,
                p.PIN_18,
                p.PIN_19,
                p.PIN_20,
                config.clock_hz,
            );
            let backend = StreamingOutput::new(stream, blank, Delay, StreamingConfig::from(&config));
            let refresher = Refresher::new(consumer, link, backend, EmbassyClock);
            info!("Streaming backend on PIO0 SM0");
            high_spawner.spawn(tasks::streaming_refresh_task(refresher)).unwrap();
        }
        BackendKind::Pulse => {
            let mut spi_config = SpiConfig::default();
            spi_config.frequency = PULSE_SPI_HZ;
            let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
            let cs = Pin::new(Output::new(p.PIN_20, Level::High));
            let backend = PulseOutput::new(
                Mcp4922::new(spi, cs),
                blank,
                Delay,
                config.pulse,
                PULSE_SPI_HZ,
                config.min_compute_us,
            );
            let refresher = Refresher::new(consumer, link, backend, EmbassyClock);
            info!("Pulse backend on SPI0 at {} Hz", PULSE_SPI_HZ);
            high_spawner.spawn(tasks::pulse_refresh_task(refresher)).unwrap();
        }
    }

    let scope = Scope::new(producer, link, &config);
    spawner.spawn(tasks::demo_task(scope)).unwrap();

    info!("All tasks spawned, firmware running");
}

/// Parse and validate the embedded configuration
///
/// A bad configuration is fatal: there is no safe display to fall
/// back to.
fn load_config() -> ScopeConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            panic!("invalid scope.toml");
        }
    };

    let caps = BoardCaps {
        streaming_max_hz: Some(MAX_WORD_RATE_HZ),
        pulse: true,
    };
    if let Err(e) = config.validate_for(&caps) {
        error!("Invalid configuration: {:?}", e);
        panic!("invalid scope.toml");
    }

    config
}
