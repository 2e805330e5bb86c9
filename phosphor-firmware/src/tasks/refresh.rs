//! Refresh consumer tasks
//!
//! Each call to `Refresher::cycle` paints the displayed frame once; the
//! next call is scheduled one returned period after this one started,
//! so the paint time is absorbed into the period rather than added to it.

use defmt::*;
use embassy_rp::peripherals::{DMA_CH0, PIO0, SPI0};
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::{Delay, Duration, Instant, Timer};
use phosphor_core::refresh::Refresher;
use phosphor_core::state::State;
use phosphor_core::traits::OutputBackend;
use phosphor_drivers::{Mcp4922, PulseOutput, StreamingOutput};
use phosphor_hal_rp2040::{Pin, PioDacStream};

use super::FRAME_CAPACITY;
use crate::clock::EmbassyClock;

pub type StreamingRefresher = Refresher<
    'static,
    StreamingOutput<PioDacStream<'static, PIO0, 0, DMA_CH0>, Pin<'static>, Delay>,
    EmbassyClock,
    FRAME_CAPACITY,
>;

pub type PulseRefresher = Refresher<
    'static,
    PulseOutput<Mcp4922<Spi<'static, SPI0, Blocking>, Pin<'static>>, Pin<'static>, Delay>,
    EmbassyClock,
    FRAME_CAPACITY,
>;

#[embassy_executor::task]
pub async fn streaming_refresh_task(mut refresher: StreamingRefresher) {
    info!("Refresh task started (streaming)");
    run(&mut refresher).await
}

#[embassy_executor::task]
pub async fn pulse_refresh_task(mut refresher: PulseRefresher) {
    info!("Refresh task started (pulse)");
    run(&mut refresher).await
}

async fn run<B: OutputBackend>(refresher: &mut Refresher<'static, B, EmbassyClock, FRAME_CAPACITY>) -> ! {
    let mut next = Instant::now();
    let mut overruns = 0;
    let mut errors = 0;
    let mut blanked = false;
    let mut frames = 0;

    loop {
        let period_us = refresher.cycle().await;
        if refresher.frames_acquired() != frames {
            frames = refresher.frames_acquired();
            trace!("Frame swap: {} points, period {} us", refresher.link().armed_points(), period_us);
        }
        report(refresher, &mut overruns, &mut errors, &mut blanked);

        next += Duration::from_micros(period_us as u64);
        let now = Instant::now();
        if next < now {
            // Fell behind; don't try to catch up with back-to-back paints
            next = now;
        }
        Timer::at(next).await;
    }
}

fn report<B: OutputBackend>(
    refresher: &Refresher<'static, B, EmbassyClock, FRAME_CAPACITY>,
    overruns: &mut u32,
    errors: &mut u32,
    blanked: &mut bool,
) {
    let stats = refresher.link().stats();

    if stats.overruns != *overruns {
        *overruns = stats.overruns;
        warn!(
            "Refresh overrun: {} points took {} us (period {} us)",
            stats.points,
            stats.paint_us,
            refresher.link().period_us()
        );
    }

    if stats.errors != *errors {
        *errors = stats.errors;
        if let Some(e) = refresher.last_error() {
            error!("Output error: {:?}", e);
        }
    }

    let now_blanked = refresher.state() == State::ScreenBlanked;
    if now_blanked != *blanked {
        *blanked = now_blanked;
        if now_blanked {
            info!("Screen saver: beam blanked");
        } else {
            info!("Screen saver: woke on activity");
        }
    }
}
