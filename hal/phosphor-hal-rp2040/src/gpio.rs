//! GPIO outputs

use embassy_rp::gpio::Output;

/// Push-pull output implementing the Phosphor pin trait
pub struct Pin<'d> {
    output: Output<'d>,
}

impl<'d> Pin<'d> {
    pub fn new(output: Output<'d>) -> Self {
        Self { output }
    }
}

impl phosphor_hal::OutputPin for Pin<'_> {
    fn set_high(&mut self) {
        self.output.set_high();
    }

    fn set_low(&mut self) {
        self.output.set_low();
    }

    fn is_set_high(&self) -> bool {
        self.output.is_set_high()
    }
}
