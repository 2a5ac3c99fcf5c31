//! Capability interfaces the motor core consumes instead of touching hardware.
//!
//! The controller in [`crate::motor`] never writes a register itself. It talks
//! to three narrow traits — [`ClockSource`], [`PwmSink`], and [`PinOwner`] —
//! which the RP2040/RP2350 backend in [`crate::rp`] implements over the real
//! peripheral block. Host tests substitute a recording mock.
//!
//! Channel and pin identifiers are plain GPIO numbers. On the Pico, two GPIOs
//! can land on the same PWM slice; [`PwmSink::slice_id`] exposes that so the
//! controller can avoid programming a shared slice twice.

/// Supplies the frequency of the clock feeding the PWM counters.
pub trait ClockSource {
    /// Source clock frequency in Hz (`clk_sys` on the Pico).
    fn source_frequency(&self) -> u32;
}

/// Writes PWM timing and level registers for one channel at a time.
///
/// `period`/`wrap`/`level` are in PWM counter ticks. The divider is the
/// hardware's 8.4 fixed-point clock divider, split into integer and
/// fractional (sixteenths) parts.
pub trait PwmSink {
    /// The timer slice the channel's GPIO resolves to.
    fn slice_id(&self, channel: u8) -> u8;

    /// Program a channel's slice from scratch: divider, wrap (`period - 1`),
    /// and counter reset. Used once per slice during `init`.
    fn configure_channel(&mut self, channel: u8, period: u16, div_int: u8, div_frac: u8);

    /// Rewrite only the clock divider of the channel's slice.
    fn set_divider(&mut self, channel: u8, div_int: u8, div_frac: u8);

    /// Rewrite only the wrap (top) value of the channel's slice.
    fn set_wrap(&mut self, channel: u8, wrap: u16);

    /// Set the channel's compare level (ON time in ticks).
    fn set_level(&mut self, channel: u8, level: u16);

    /// Start the channel's slice counting.
    fn enable(&mut self, channel: u8);
}

/// Hands GPIOs to the PWM function and back.
pub trait PinOwner {
    /// Route the pin to its PWM channel.
    fn claim_for_pwm(&mut self, pin: u8);

    /// Return the pin to a non-PWM (null) function.
    fn release(&mut self, pin: u8);
}

/// Umbrella trait so [`Motor`](crate::motor::Motor) takes one hardware value.
///
/// Blanket-implemented for anything providing all three capabilities.
pub trait MotorHal: ClockSource + PwmSink + PinOwner {}

impl<T: ClockSource + PwmSink + PinOwner> MotorHal for T {}
