//! A device abstraction for a brushed DC motor behind an H-bridge.
//!
//! Two complementary PWM channels drive the bridge. [`Motor`] owns the pair,
//! holds the commanded speed/frequency/decay mode, and sequences register
//! writes so a live frequency change never lets a stale duty level face a
//! new period (which would blip the motor). See [`Motor`] for usage.

use crate::duty::{DecayMode, duty_levels};
use crate::hal::MotorHal;
use crate::pwm_timing::PwmTiming;
use crate::{Error, Result};

/// A brushed DC motor on two PWM channels of an H-bridge.
///
/// Construction is hardware-free; [`init`](Self::init) programs the PWM
/// slices and claims the pins. Until `init` succeeds every mutator reports
/// [`Error::NotInitialized`]. On drop, both pins are handed back to a
/// non-PWM function.
///
/// On hardware, pass [`RpMotorHal`](crate::rp::RpMotorHal); tests substitute
/// any [`MotorHal`] implementation.
///
/// # Example
///
/// ```
/// use motor_envoy::duty::DecayMode;
/// use motor_envoy::motor::Motor;
/// # use motor_envoy::hal::{ClockSource, PinOwner, PwmSink};
/// # struct Hal;
/// # impl ClockSource for Hal {
/// #     fn source_frequency(&self) -> u32 { 125_000_000 }
/// # }
/// # impl PwmSink for Hal {
/// #     fn slice_id(&self, channel: u8) -> u8 { (channel / 2) % 8 }
/// #     fn configure_channel(&mut self, _: u8, _: u16, _: u8, _: u8) {}
/// #     fn set_divider(&mut self, _: u8, _: u8, _: u8) {}
/// #     fn set_wrap(&mut self, _: u8, _: u16) {}
/// #     fn set_level(&mut self, _: u8, _: u16) {}
/// #     fn enable(&mut self, _: u8) {}
/// # }
/// # impl PinOwner for Hal {
/// #     fn claim_for_pwm(&mut self, _: u8) {}
/// #     fn release(&mut self, _: u8) {}
/// # }
///
/// // Motor wired to GPIO 6 (positive) and GPIO 7 (negative), 25 kHz PWM.
/// let mut motor = Motor::new(Hal, 6, 7, 25_000.0, DecayMode::SlowDecay);
/// motor.init()?;
///
/// motor.set_speed(0.5)?;   // half speed forward
/// motor.set_speed(-1.0)?;  // full speed reverse
/// motor.stop()?;           // speed 0 (brakes in slow decay)
/// motor.disable()?;        // both outputs low until the next command
/// # Ok::<(), motor_envoy::Error>(())
/// ```
pub struct Motor<H: MotorHal> {
    hw: H,
    pin_pos: u8,
    pin_neg: u8,
    speed: f32,
    frequency: f32,
    decay_mode: DecayMode,
    timing: Option<PwmTiming>,
}

impl<H: MotorHal> Motor<H> {
    /// Create an uninitialized motor. No hardware is touched.
    ///
    /// `pin_pos`/`pin_neg` are the GPIOs wired to the bridge's positive and
    /// negative inputs; `frequency` is the PWM frequency `init` will apply.
    #[must_use]
    pub const fn new(hw: H, pin_pos: u8, pin_neg: u8, frequency: f32, decay_mode: DecayMode) -> Self {
        Self {
            hw,
            pin_pos,
            pin_neg,
            speed: 0.0,
            frequency,
            decay_mode,
            timing: None,
        }
    }

    /// Program the PWM hardware and start driving.
    ///
    /// Factorizes the configured frequency, programs period and divider for
    /// both channels (a shared slice only once), claims both pins for PWM,
    /// writes the duty levels for the current speed, and enables output.
    ///
    /// # Errors
    ///
    /// [`Error::InfeasibleFrequency`] if the configured frequency cannot be
    /// realized; in that case no hardware write happens and the motor stays
    /// uninitialized.
    pub fn init(&mut self) -> Result<()> {
        let timing = PwmTiming::from_frequency(self.frequency, self.hw.source_frequency())?;
        self.timing = Some(timing);

        self.each_distinct_slice(|hw, channel| {
            hw.configure_channel(channel, timing.period, timing.div_int(), timing.div_frac());
        });
        self.hw.claim_for_pwm(self.pin_pos);
        self.hw.claim_for_pwm(self.pin_neg);
        self.write_levels(timing.period);
        self.hw.enable(self.pin_pos);
        self.hw.enable(self.pin_neg);
        Ok(())
    }

    /// Whether [`init`](Self::init) has succeeded.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.timing.is_some()
    }

    /// The current speed in `[-1.0, 1.0]`.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// Set the speed, clamped to `[-1.0, 1.0]`, and rewrite the duty levels.
    ///
    /// The period does not change, so no write-ordering hazard exists. Also
    /// resumes drive after [`disable`](Self::disable).
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] before a successful `init`.
    pub fn set_speed(&mut self, speed: f32) -> Result<()> {
        let timing = self.ready_timing()?;
        self.speed = speed.clamp(-1.0, 1.0);
        self.write_levels(timing.period);
        Ok(())
    }

    /// The current PWM frequency in Hz.
    #[must_use]
    pub const fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Change the PWM frequency while (possibly) running, glitch-free.
    ///
    /// In slow decay one channel sits at the full period value, so the duty
    /// and wrap registers must agree at every instant. When the new period
    /// is larger, the duty levels (computed against the new period) go out
    /// before the wrap; when smaller, after. The divider always goes first,
    /// written once per distinct slice.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] before a successful `init`;
    /// [`Error::InfeasibleFrequency`] if `freq_hz` cannot be realized, in
    /// which case no state or hardware change happens.
    pub fn set_frequency(&mut self, freq_hz: f32) -> Result<()> {
        let old = self.ready_timing()?;
        let timing = PwmTiming::from_frequency(freq_hz, self.hw.source_frequency())?;

        // Whether to apply new duty levels before or after the new wrap, to
        // avoid a momentary blip in PWM output on slow decay.
        let pre_update_levels = timing.period > old.period;

        self.frequency = freq_hz;
        self.timing = Some(timing);

        self.each_distinct_slice(|hw, channel| {
            hw.set_divider(channel, timing.div_int(), timing.div_frac());
        });
        if pre_update_levels {
            self.write_levels(timing.period);
        }
        self.each_distinct_slice(|hw, channel| {
            hw.set_wrap(channel, timing.period - 1);
        });
        if !pre_update_levels {
            self.write_levels(timing.period);
        }
        Ok(())
    }

    /// The current decay mode.
    #[must_use]
    pub const fn decay_mode(&self) -> DecayMode {
        self.decay_mode
    }

    /// Switch decay mode and rewrite the duty levels for the current speed.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] before a successful `init`.
    pub fn set_decay_mode(&mut self, mode: DecayMode) -> Result<()> {
        let timing = self.ready_timing()?;
        self.decay_mode = mode;
        self.write_levels(timing.period);
        Ok(())
    }

    /// Set the speed to zero. In slow decay this brakes; in fast decay it
    /// coasts.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] before a successful `init`.
    pub fn stop(&mut self) -> Result<()> {
        self.set_speed(0.0)
    }

    /// Drive both outputs to a raw zero level and zero the stored speed.
    ///
    /// Bypasses the decay-mode mapping (even slow decay goes fully low), so
    /// the bridge neither drives nor brakes. Frequency, period, and decay
    /// mode are untouched and the motor stays ready; any speed command
    /// resumes drive.
    ///
    /// # Errors
    ///
    /// [`Error::NotInitialized`] before a successful `init`.
    pub fn disable(&mut self) -> Result<()> {
        self.ready_timing()?;
        self.speed = 0.0;
        self.hw.set_level(self.pin_pos, 0);
        self.hw.set_level(self.pin_neg, 0);
        Ok(())
    }

    fn ready_timing(&self) -> Result<PwmTiming> {
        self.timing.ok_or(Error::NotInitialized)
    }

    /// Map the current speed and write both channel levels.
    fn write_levels(&mut self, period: u16) {
        let (level_pos, level_neg) = duty_levels(self.speed, period, self.decay_mode);
        self.hw.set_level(self.pin_pos, level_pos);
        self.hw.set_level(self.pin_neg, level_neg);
    }

    /// Run a slice-level write for the positive channel, and again for the
    /// negative channel only when it lives on a different slice.
    fn each_distinct_slice(&mut self, mut write: impl FnMut(&mut H, u8)) {
        write(&mut self.hw, self.pin_pos);
        if self.hw.slice_id(self.pin_neg) != self.hw.slice_id(self.pin_pos) {
            write(&mut self.hw, self.pin_neg);
        }
    }
}

impl<H: MotorHal> Drop for Motor<H> {
    /// Hand both pins back to a non-PWM function.
    fn drop(&mut self) {
        self.hw.release(self.pin_pos);
        self.hw.release(self.pin_neg);
    }
}
