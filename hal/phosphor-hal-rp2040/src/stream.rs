//! PIO + DMA word stream into an MCP4922
//!
//! DMA feeds the state machine's TX FIFO from the displayed frame; the
//! state machine paces the SPI frames by its clock divider, so once a
//! transfer starts the CPU is free until it completes.

use embassy_rp::dma::Channel;
use embassy_rp::pio::{
    Common, Config, Direction as PioDirection, FifoJoin, Instance, PioPin, ShiftConfig, ShiftDirection,
    StateMachine,
};
use embassy_rp::Peri;
use fixed::types::U24F8;
use phosphor_hal::WordStream;

use crate::pio::{achieved_rate, calc_clock_divider, cycles_per_word, MAX_WORD_RATE_HZ, SYS_CLK_HZ};

/// Hardware-paced DAC stream on one PIO state machine
pub struct PioDacStream<'d, PIO: Instance, const SM: usize, DMA: Channel> {
    sm: StateMachine<'d, PIO, SM>,
    dma: Peri<'d, DMA>,
    /// Current divider as (integer, fraction)
    divider: (u16, u8),
    rate_hz: u32,
}

impl<'d, PIO: Instance, const SM: usize, DMA: Channel> PioDacStream<'d, PIO, SM, DMA> {
    /// Load the SPI program and start the state machine at `rate_hz`
    ///
    /// `sck`, `mosi` and `cs` must be PIO-capable pins. An out-of-range
    /// rate falls back to the maximum.
    pub fn new<SCK: PioPin, MOSI: PioPin, CS: PioPin>(
        common: &mut Common<'d, PIO>,
        mut sm: StateMachine<'d, PIO, SM>,
        dma: Peri<'d, DMA>,
        sck: Peri<'d, SCK>,
        mosi: Peri<'d, MOSI>,
        cs: Peri<'d, CS>,
        rate_hz: u32,
    ) -> Self {
        // Side-set drives SCK; data changes on the falling edge and is
        // latched by the DAC on the rising edge. CS rises after 16 bits.
        let prg = pio::pio_asm!(
            ".side_set 1",
            ".wrap_target",
            "pull ifempty block side 0",
            "set pins, 0        side 0",
            "set x, 15          side 0",
            "bitloop:",
            "out pins, 1        side 0",
            "jmp x-- bitloop    side 1",
            "set pins, 1        side 0",
            ".wrap"
        );

        let installed = common.load_program(&prg.program);

        let sck = common.make_pio_pin(sck);
        let mosi = common.make_pio_pin(mosi);
        let cs = common.make_pio_pin(cs);

        let mut cfg = Config::default();
        cfg.use_program(&installed, &[&sck]);
        cfg.set_out_pins(&[&mosi]);
        cfg.set_set_pins(&[&cs]);
        // X frame sits in the high half, so shift MSB first across the
        // whole word
        cfg.shift_out = ShiftConfig {
            threshold: 32,
            direction: ShiftDirection::Left,
            auto_fill: false,
        };
        cfg.fifo_join = FifoJoin::TxOnly;

        let rate = if rate_hz == 0 || rate_hz > MAX_WORD_RATE_HZ {
            MAX_WORD_RATE_HZ
        } else {
            rate_hz
        };
        let divider = calc_clock_divider(SYS_CLK_HZ, rate);
        cfg.clock_divider = to_fixed(divider);

        sm.set_config(&cfg);
        sm.set_pin_dirs(PioDirection::Out, &[&sck, &mosi, &cs]);
        sm.set_enable(true);

        Self {
            sm,
            dma,
            divider,
            rate_hz: achieved_rate(SYS_CLK_HZ, divider.0, divider.1),
        }
    }

    /// Wait for the FIFO to drain and the last word to leave the OSR
    async fn drain(&mut self) {
        while !self.sm.tx().empty() {
            embassy_futures::yield_now().await;
        }
        cortex_m::asm::delay(cycles_per_word(self.divider.0, self.divider.1));
    }
}

/// Convert (integer, fraction) into the U24F8 divider register format
fn to_fixed((int_part, frac_part): (u16, u8)) -> U24F8 {
    U24F8::from_bits(((int_part as u32) << 8) | frac_part as u32)
}

impl<PIO: Instance, const SM: usize, DMA: Channel> WordStream for PioDacStream<'_, PIO, SM, DMA> {
    type Error = core::convert::Infallible;

    async fn stream(&mut self, words: &[u32]) -> Result<(), Self::Error> {
        if words.is_empty() {
            return Ok(());
        }
        self.sm.tx().dma_push(self.dma.reborrow(), words, false).await;
        self.drain().await;
        Ok(())
    }

    fn set_word_rate(&mut self, hz: u32) -> Option<u32> {
        if hz == 0 || hz > MAX_WORD_RATE_HZ {
            return None;
        }
        let divider = calc_clock_divider(SYS_CLK_HZ, hz);
        self.sm.set_clock_divider(to_fixed(divider));
        self.sm.clkdiv_restart();
        self.divider = divider;
        self.rate_hz = achieved_rate(SYS_CLK_HZ, divider.0, divider.1);
        Some(self.rate_hz)
    }

    fn word_rate(&self) -> u32 {
        self.rate_hz
    }
}
