//! Refresh consumer
//!
//! One call to [`Refresher::cycle`] is one refresh: it applies pending
//! requests from the producer, claims the newest frame if one was
//! published, and streams the displayed frame through the backend. The
//! caller schedules the next call one returned period after this one
//! started.

use super::{RefreshLink, ScreenSaver};
use crate::buffer::FrameConsumer;
use crate::error::OutputError;
use crate::state::{Event, State};
use crate::traits::{Monotonic, OutputBackend};

pub struct Refresher<'a, B, C, const N: usize> {
    consumer: FrameConsumer<'a, N>,
    link: &'a RefreshLink,
    backend: B,
    clock: C,
    saver: ScreenSaver,
    state: State,
    last_tick_us: Option<u64>,
    last_start_us: Option<u64>,
    last_error: Option<OutputError>,
    /// Frames swapped in since start-up
    frames: u32,
}

impl<'a, B, C, const N: usize> Refresher<'a, B, C, N>
where
    B: OutputBackend,
    C: Monotonic,
{
    /// Create the consumer and publish the backend's timing
    pub fn new(consumer: FrameConsumer<'a, N>, link: &'a RefreshLink, mut backend: B, clock: C) -> Self {
        backend.set_blanked(true);
        link.publish_timing(backend.timing());
        Self {
            consumer,
            link,
            backend,
            clock,
            saver: ScreenSaver::new(link.saver_timeout_ms()),
            state: State::Idle,
            last_tick_us: None,
            last_start_us: None,
            last_error: None,
            frames: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn saver(&self) -> &ScreenSaver {
        &self.saver
    }

    pub fn link(&self) -> &'a RefreshLink {
        self.link
    }

    /// Most recent backend error, if any
    pub fn last_error(&self) -> Option<OutputError> {
        self.last_error
    }

    /// Number of published frames taken over by the consumer
    pub fn frames_acquired(&self) -> u32 {
        self.frames
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    fn apply(&mut self, event: Event) {
        self.state = self.state.transition(event);
    }

    /// Run one refresh cycle; returns the period until the next one
    pub async fn cycle(&mut self) -> u32 {
        let now = self.clock.now_us();
        let elapsed = self.last_tick_us.map_or(0, |t| now.saturating_sub(t));
        self.last_tick_us = Some(now);

        // Screen saver: timeout changes, activity, countdown
        let timeout = self.link.saver_timeout_ms();
        if timeout != self.saver.timeout_ms() {
            self.saver.set_timeout(timeout);
        }
        if self.link.take_activity() {
            self.saver.reset();
            let was_blanked = self.state == State::ScreenBlanked;
            self.apply(Event::Activity);
            // Wake into whatever the displayed frame calls for
            if was_blanked && self.consumer.front().is_empty() {
                self.apply(Event::FrameCleared);
            }
        }
        if self.saver.tick(elapsed) {
            self.apply(Event::SaverExpired);
        }

        // Clock retune requested by the producer
        if let Some(hz) = self.link.take_clock_request() {
            match self.backend.set_clock_rate(hz) {
                Ok(_) => self.link.publish_timing(self.backend.timing()),
                Err(e) => self.last_error = Some(e),
            }
        }

        // Swap in the newest complete frame
        if self.consumer.acquire() {
            self.frames = self.frames.wrapping_add(1);
            let event = if self.consumer.front().is_empty() {
                Event::FrameCleared
            } else {
                Event::FrameArmed
            };
            self.apply(event);
        } else if self.link.is_filling() {
            self.apply(Event::FrameStarted);
        }

        self.link.retune();
        let period = self.link.period_us();
        if !self.state.output_allowed() || !self.link.output_enabled() {
            self.backend.set_blanked(true);
            return period;
        }

        self.apply(Event::TransferStarted);
        let words = self.consumer.front().words();
        let start = self.clock.now_us();
        let result = self.backend.transfer(words).await;
        let end = self.clock.now_us();
        let points = words.len() as u32;
        self.apply(Event::TransferComplete);

        let paint_us = end.saturating_sub(start).min(u32::MAX as u64) as u32;
        let interval_us = self
            .last_start_us
            .map_or(0, |t| start.saturating_sub(t).min(u32::MAX as u64) as u32);
        self.last_start_us = Some(start);
        if let Err(e) = result {
            self.last_error = Some(e);
        }
        self.link
            .record_cycle(paint_us, interval_us, points, paint_us > period, result.is_err());

        period
    }
}
