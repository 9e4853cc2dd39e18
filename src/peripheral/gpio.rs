use tracing::trace;

use crate::hal::{GpioHal, PinFlags};
use crate::types::PinId;

/// Output driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    PushPull,
    OpenDrain,
}

impl OutputMode {
    pub fn flags(self) -> PinFlags {
        match self {
            OutputMode::PushPull => PinFlags::OUTPUT,
            OutputMode::OpenDrain => PinFlags::OUTPUT | PinFlags::OPEN_DRAIN,
        }
    }
}

/// A digital output pin.
///
/// The pin is write-only at the hardware level; [`DigitalOut::is_set_high`]
/// reports the last value written through this handle.
pub struct DigitalOut<H: GpioHal> {
    hal: H,
    pin: PinId,
    mode: OutputMode,
    high: bool,
}

impl<H: GpioHal> DigitalOut<H> {
    /// Configures `pin` as a push-pull output and drives it low.
    pub fn new(hal: H, pin: impl Into<PinId>) -> Self {
        Self::with_mode(hal, pin, OutputMode::PushPull)
    }

    /// Configures `pin` as an output in `mode` and drives it low.
    pub fn with_mode(hal: H, pin: impl Into<PinId>, mode: OutputMode) -> Self {
        let mut out = Self {
            hal,
            pin: pin.into(),
            mode,
            high: false,
        };
        out.hal.pin_config(out.pin, mode.flags());
        out.write(false);
        out
    }

    pub fn pin(&self) -> PinId {
        self.pin
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: OutputMode) {
        self.mode = mode;
        self.hal.pin_config(self.pin, mode.flags());
    }

    pub fn write(&mut self, high: bool) {
        trace!(pin = %self.pin, high, "pin write");
        self.hal.pin_write(self.pin, high);
        self.high = high;
    }

    pub fn set_high(&mut self) {
        self.write(true);
    }

    pub fn set_low(&mut self) {
        self.write(false);
    }

    /// Reverses the current output level
    pub fn toggle(&mut self) {
        self.write(!self.high);
    }

    pub fn is_set_high(&self) -> bool {
        self.high
    }
}

impl<H: GpioHal> std::fmt::Debug for DigitalOut<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigitalOut")
            .field("pin", &self.pin)
            .field("mode", &self.mode)
            .field("high", &self.high)
            .finish()
    }
}
