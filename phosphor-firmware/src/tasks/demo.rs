//! Demo producer
//!
//! Redraws a test card once a second: a border, a swept arc, a midpoint
//! ellipse, a title, and the refresh statistics of the previous frame.

use defmt::*;
use embassy_time::{Duration, Ticker};
use phosphor_core::error::BufferError;
use phosphor_core::font::Justify;
use phosphor_core::raster::ArcMask;
use phosphor_core::scope::PrintSetup;
use phosphor_core::Scope;

use super::FRAME_CAPACITY;

/// Redraw interval
const REDRAW_MS: u64 = 1000;

const CENTER: i32 = 2048;

#[embassy_executor::task]
pub async fn demo_task(mut scope: Scope<'static, FRAME_CAPACITY>) {
    info!("Demo task started");

    let mut ticker = Ticker::every(Duration::from_millis(REDRAW_MS));
    let mut frame: u32 = 0;

    loop {
        scope.frame_start();
        if draw_card(&mut scope, frame).is_err() {
            warn!("Frame {} overflowed at {} points", frame, scope.point_count());
        }
        scope.frame_end();

        let summary = scope.last_frame();
        if summary.skipped > 0 {
            debug!("Frame {}: {} points off screen", frame, summary.skipped);
        }
        trace!("Frame {} published: {} points", frame, summary.points);

        frame = frame.wrapping_add(1);
        ticker.next().await;
    }
}

fn draw_card(scope: &mut Scope<'static, FRAME_CAPACITY>, frame: u32) -> Result<(), BufferError> {
    scope.rectangle(0, 0, 4095, 4095)?;

    // One octant lit per frame, walking around the circle
    let octant = ArcMask::from_bits_truncate(1 << (frame % 8));
    scope.circle_arc(CENTER, CENTER, 1200, octant)?;
    scope.circle_midpoint(CENTER, CENTER, 1200)?;
    scope.ellipse_midpoint_arc(CENTER, CENTER, 1600, 600, ArcMask::UPPER)?;

    scope.print_setup(PrintSetup::at(CENTER, 3600).size(200).justify(Justify::Center));
    scope.print_underlined("PHOSPHOR")?;

    let stats = scope.stats();
    scope.print_setup(PrintSetup::at(200, 500).size(100).justify(Justify::Left));
    scope.print("PTS ")?;
    scope.print_int(stats.points as i32)?;

    let hz = if stats.interval_us > 0 {
        1_000_000.0 / stats.interval_us as f32
    } else {
        0.0
    };
    scope.print_setup(PrintSetup::at(2600, 500));
    scope.print_float(hz, 1)?;
    scope.print(" HZ")
}
