//! RP2040/RP2350 implementation of the motor hardware capabilities.
//!
//! [`RpMotorHal`] drives the PWM block and GPIO function selects directly
//! through `embassy_rp::pac`, the same registers `embassy_rp::pwm` programs,
//! because the motor core needs slice-granular writes (divider alone, wrap
//! alone) that the config-at-a-time HAL API does not expose. The system
//! clock comes from [`clk_sys_freq`].
//!
//! Pin mapping: even GPIOs are PWM channel A, odd are B. On the RP2040 the
//! slice is `(gpio / 2) % 8`; the RP2350 B-grade parts extend the map with
//! slices 8..12 for GPIOs 32..48.

use defmt::{debug, info};
use embassy_rp::clocks::clk_sys_freq;
use embassy_rp::pac;

use crate::hal::{ClockSource, PinOwner, PwmSink};

/// GPIO function select for PWM (same value on RP2040 and RP2350).
const FUNCSEL_PWM: u8 = 4;

/// GPIO function select for "no function".
const FUNCSEL_NULL: u8 = 31;

/// The Pico's PWM and GPIO blocks as a [`MotorHal`](crate::hal::MotorHal).
///
/// Stateless; every call goes straight to the peripheral registers. The
/// caller is responsible for not handing the same GPIO to two owners — the
/// usual arrangement is one `RpMotorHal` inside each
/// [`Motor`](crate::motor::Motor), with the two motors on disjoint pins.
#[derive(Debug, defmt::Format)]
pub struct RpMotorHal {
    _private: (),
}

impl RpMotorHal {
    /// Create a handle to the PWM/GPIO blocks.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl Default for RpMotorHal {
    fn default() -> Self {
        Self::new()
    }
}

/// PWM slice for a GPIO.
fn slice_for(gpio: u8) -> u8 {
    if gpio < 32 {
        (gpio / 2) % 8
    } else {
        // RP2350B only: GPIOs 32..48 land on slices 8..12.
        8 + ((gpio - 32) / 2) % 4
    }
}

/// Whether a GPIO is the A (even) output of its slice.
const fn is_channel_a(gpio: u8) -> bool {
    gpio % 2 == 0
}

impl ClockSource for RpMotorHal {
    fn source_frequency(&self) -> u32 {
        clk_sys_freq()
    }
}

impl PwmSink for RpMotorHal {
    fn slice_id(&self, channel: u8) -> u8 {
        slice_for(channel)
    }

    fn configure_channel(&mut self, channel: u8, period: u16, div_int: u8, div_frac: u8) {
        let slice = pac::PWM.ch(usize::from(slice_for(channel)));
        slice.div().write(|w| {
            w.set_int(div_int);
            w.set_frac(div_frac);
        });
        // Wrap one less than the period to get full 0 to 100%.
        slice.top().write(|w| w.set_top(period - 1));
        slice.ctr().write(|w| w.set_ctr(0));
        info!(
            "pwm slice {} configured: top={} div={}.{}",
            slice_for(channel),
            period - 1,
            div_int,
            div_frac
        );
    }

    fn set_divider(&mut self, channel: u8, div_int: u8, div_frac: u8) {
        pac::PWM.ch(usize::from(slice_for(channel))).div().write(|w| {
            w.set_int(div_int);
            w.set_frac(div_frac);
        });
    }

    fn set_wrap(&mut self, channel: u8, wrap: u16) {
        pac::PWM
            .ch(usize::from(slice_for(channel)))
            .top()
            .write(|w| w.set_top(wrap));
    }

    fn set_level(&mut self, channel: u8, level: u16) {
        let slice = pac::PWM.ch(usize::from(slice_for(channel)));
        if is_channel_a(channel) {
            slice.cc().modify(|w| w.set_a(level));
        } else {
            slice.cc().modify(|w| w.set_b(level));
        }
    }

    fn enable(&mut self, channel: u8) {
        pac::PWM
            .ch(usize::from(slice_for(channel)))
            .csr()
            .modify(|w| w.set_en(true));
    }
}

impl PinOwner for RpMotorHal {
    fn claim_for_pwm(&mut self, pin: u8) {
        // RP2350 pads come out of reset isolated; release the latch so the
        // PWM function reaches the pad.
        #[cfg(feature = "pico2")]
        pac::PADS_BANK0
            .gpio(usize::from(pin))
            .modify(|w| w.set_iso(false));

        pac::IO_BANK0
            .gpio(usize::from(pin))
            .ctrl()
            .write(|w| w.set_funcsel(FUNCSEL_PWM));
        debug!("gpio {} claimed for pwm", pin);
    }

    fn release(&mut self, pin: u8) {
        pac::IO_BANK0
            .gpio(usize::from(pin))
            .ctrl()
            .write(|w| w.set_funcsel(FUNCSEL_NULL));
        debug!("gpio {} released", pin);
    }
}
