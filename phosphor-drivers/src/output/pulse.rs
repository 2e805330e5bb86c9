//! Pulse-sequencing backend
//!
//! Each sample is written to the DAC by software, given time to settle,
//! and then drawn with a short unblank pulse. Settling time depends on
//! how far the beam jumped: short hops need none, long jumps need the
//! large settle count. All counts are tunable while running.

use embedded_hal::delay::DelayNs;
use phosphor_core::buffer::Sample;
use phosphor_core::config::PulseTiming;
use phosphor_core::error::OutputError;
use phosphor_core::refresh::FrameTiming;
use phosphor_core::traits::OutputBackend;
use phosphor_hal::{DualDac, OutputPin};

use super::NS_PER_S;
use crate::blank::BlankLine;

/// Bits clocked per sample (two 16-bit DAC frames)
const BITS_PER_SAMPLE: u32 = 32;

pub struct PulseOutput<D, P, T> {
    dac: D,
    blank: BlankLine<P>,
    delay: T,
    timing: PulseTiming,
    bus_hz: u32,
    min_compute_us: u32,
    /// Where the beam was left by the last sample
    last: Option<Sample>,
}

impl<D, P, T> PulseOutput<D, P, T>
where
    D: DualDac,
    P: OutputPin,
    T: DelayNs,
{
    /// `bus_hz` is the DAC bus clock, used only for the cost model
    pub fn new(dac: D, blank: BlankLine<P>, delay: T, timing: PulseTiming, bus_hz: u32, min_compute_us: u32) -> Self {
        Self {
            dac,
            blank,
            delay,
            timing,
            bus_hz: bus_hz.max(1),
            min_compute_us,
            last: None,
        }
    }

    pub fn pulse_timing(&self) -> PulseTiming {
        self.timing
    }

    /// Change settle and unblank counts; takes effect on the next sample
    pub fn set_pulse_timing(&mut self, timing: PulseTiming) {
        self.timing = timing;
    }

    /// Estimated time per sample: bus write, a small settle, the pulse
    fn point_ns(&self) -> u32 {
        let write_ns = (BITS_PER_SAMPLE as u64 * NS_PER_S as u64 / self.bus_hz as u64) as u32;
        let settle_ns = self.timing.counts_to_ns(self.timing.small_settle);
        let unblank_ns = self.timing.counts_to_ns(self.timing.unblank);
        write_ns.saturating_add(settle_ns).saturating_add(unblank_ns)
    }

    fn draw(&mut self, sample: Sample) -> Result<(), OutputError> {
        let distance = match self.last {
            Some(prev) => prev.x.abs_diff(sample.x).max(prev.y.abs_diff(sample.y)),
            // Unknown beam position: settle as for the longest jump
            None => u16::MAX,
        };

        self.dac.write_xy(sample.x, sample.y).map_err(|_| OutputError::Bus)?;
        self.last = Some(sample);

        let settle = self.timing.settle_counts(distance);
        if settle > 0 {
            self.delay.delay_ns(self.timing.counts_to_ns(settle));
        }

        self.blank.set_blanked(false);
        self.delay.delay_ns(self.timing.counts_to_ns(self.timing.unblank));
        self.blank.set_blanked(true);
        Ok(())
    }
}

impl<D, P, T> OutputBackend for PulseOutput<D, P, T>
where
    D: DualDac,
    P: OutputPin,
    T: DelayNs,
{
    async fn transfer(&mut self, words: &[u32]) -> Result<(), OutputError> {
        self.blank.set_blanked(true);
        for &word in words {
            if let Err(e) = self.draw(Sample::from_word(word)) {
                self.last = None;
                self.blank.set_blanked(true);
                return Err(e);
            }
        }
        Ok(())
    }

    fn set_blanked(&mut self, blanked: bool) {
        if blanked {
            self.blank.set_blanked(true);
        }
    }

    fn set_clock_rate(&mut self, _hz: u32) -> Result<u32, OutputError> {
        Err(OutputError::Unsupported)
    }

    fn clock_period_ns(&self) -> u32 {
        self.point_ns()
    }

    fn timing(&self) -> FrameTiming {
        FrameTiming {
            per_point_ns: self.point_ns(),
            overhead_us: self.min_compute_us,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{Log, MockDac, MockDelay, MockPin, Op};
    use embassy_futures::block_on;
    use phosphor_hal::DacChannel;
    use std::vec::Vec;

    fn output(log: &Log) -> PulseOutput<MockDac<'_>, MockPin<'_>, MockDelay<'_>> {
        let blank = BlankLine::new(MockPin { log, high: false }, false);
        PulseOutput::new(
            MockDac { log, fail: false },
            blank,
            MockDelay { log },
            PulseTiming::default(),
            16_000_000,
            2000,
        )
    }

    fn word(x: u16, y: u16) -> u32 {
        Sample::new(x, y).to_word()
    }

    fn delays(log: &Log) -> Vec<u32> {
        log.borrow()
            .iter()
            .filter_map(|op| match op {
                Op::Delay(ns) => Some(*ns),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_sample_sequence() {
        let log = Log::default();
        let mut out = output(&log);
        log.borrow_mut().clear();

        block_on(out.transfer(&[word(10, 20)])).unwrap();

        // Active-low blanking: beam on = pin high
        assert_eq!(
            *log.borrow(),
            [
                Op::Pin(false),
                Op::Dac(DacChannel::X, 10),
                Op::Dac(DacChannel::Y, 20),
                Op::Delay(5_000),
                Op::Pin(true),
                Op::Delay(500),
                Op::Pin(false),
            ]
        );
    }

    #[test]
    fn test_settle_tiers() {
        let log = Log::default();
        let mut out = output(&log);
        // First sample settles long; then a short hop, a medium jump
        // and a long jump
        let words = [word(0, 0), word(10, 10), word(1510, 10), word(4000, 10)];
        block_on(out.transfer(&words)).unwrap();

        assert_eq!(delays(&log), [5_000, 500, 500, 2_500, 500, 5_000, 500]);
    }

    #[test]
    fn test_retuned_timing_applies() {
        let log = Log::default();
        let mut out = output(&log);
        block_on(out.transfer(&[word(0, 0)])).unwrap();
        log.borrow_mut().clear();

        let mut timing = out.pulse_timing();
        timing.settle_threshold = 0;
        timing.small_settle = 7;
        timing.unblank = 2;
        out.set_pulse_timing(timing);
        block_on(out.transfer(&[word(1, 1)])).unwrap();
        assert_eq!(delays(&log), [700, 200]);
    }

    #[test]
    fn test_dac_error_blanks() {
        let log = Log::default();
        let mut out = output(&log);
        out.dac.fail = true;
        assert_eq!(block_on(out.transfer(&[word(1, 1)])), Err(OutputError::Bus));
        assert!(out.blank.is_blanked());
    }

    #[test]
    fn test_no_clock_tuning() {
        let log = Log::default();
        let mut out = output(&log);
        assert_eq!(out.set_clock_rate(100_000), Err(OutputError::Unsupported));
    }

    #[test]
    fn test_cost_model() {
        let log = Log::default();
        let out = output(&log);
        // 32 bits at 16 MHz + 2.5 us settle + 0.5 us pulse
        assert_eq!(
            out.timing(),
            FrameTiming {
                per_point_ns: 2_000 + 2_500 + 500,
                overhead_us: 2000,
            }
        );
    }
}
