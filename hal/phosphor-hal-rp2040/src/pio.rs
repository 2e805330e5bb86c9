//! PIO timing for the DAC word stream
//!
//! One PIO state machine shifts each 32-bit sample word out as two
//! 16-bit MCP4922 frames (X on channel A, then Y on channel B), toggling
//! chip select around each frame so the DAC latches it.
//!
//! Per frame the program spends 1 cycle pulling, 2 on setup, 32 on the
//! bit loop (two instructions per bit) and 1 raising chip select, so a
//! word costs a fixed [`CYCLES_PER_WORD`] PIO cycles. The word rate is
//! therefore set entirely by the clock divider.

/// System clock frequency (RP2040 default)
pub const SYS_CLK_HZ: u32 = 125_000_000;

/// PIO cycles per 16-bit DAC frame
pub const CYCLES_PER_FRAME: u32 = 36;

/// PIO cycles per sample word (two frames)
pub const CYCLES_PER_WORD: u32 = 2 * CYCLES_PER_FRAME;

/// Maximum word rate in Hz
///
/// SCK toggles every other PIO cycle; the MCP4922 tops out at 20 MHz
/// SCK, so the PIO clock must stay at or below 40 MHz.
pub const MAX_WORD_RATE_HZ: u32 = 500_000;

/// Calculate the 16.8 clock divider for a target word rate
///
/// divider = sys_clk / (rate * CYCLES_PER_WORD), with 8 fractional bits.
/// Returns `(0xFFFF, 0xFF)` (slowest) for a zero rate.
pub fn calc_clock_divider(sys_hz: u32, rate_hz: u32) -> (u16, u8) {
    if rate_hz == 0 {
        return (0xFFFF, 0xFF);
    }

    let divisor = rate_hz as u64 * CYCLES_PER_WORD as u64;
    let divider_x256 = (sys_hz as u64 * 256 / divisor).clamp(0x100, 0xFF_FFFF);

    ((divider_x256 >> 8) as u16, (divider_x256 & 0xFF) as u8)
}

/// Word rate produced by a 16.8 divider
pub fn achieved_rate(sys_hz: u32, int_part: u16, frac_part: u8) -> u32 {
    let divider_x256 = ((int_part as u64) << 8) | frac_part as u64;
    if divider_x256 == 0 {
        return 0;
    }
    (sys_hz as u64 * 256 / (divider_x256 * CYCLES_PER_WORD as u64)) as u32
}

/// System clock cycles needed to shift one word at a given divider
///
/// Used to wait out the last word after the FIFO drains.
pub fn cycles_per_word(int_part: u16, frac_part: u8) -> u32 {
    let divider_x256 = ((int_part as u32) << 8) | frac_part as u32;
    (CYCLES_PER_WORD * divider_x256).div_ceil(256)
}
