//! PWM period/divider factorization for a requested output frequency.
//!
//! The Pico's PWM slices count up to a 16-bit wrap value at `clk_sys` divided
//! by an 8.4 fixed-point divider, so a requested frequency has to be split
//! into an integer `(period, divider)` pair. A larger period means finer
//! speed resolution, so the factorization grows the period as far as the
//! 16-bit counter allows and leaves the remainder in the divider.

use fixed::FixedU16;
use fixed::types::extra::U4;

use crate::{Error, Result};

/// Largest PWM period the 16-bit slice counter can represent.
pub const MAX_PWM_PERIOD: u32 = 65_535;

/// Smallest representable 12.4 fixed-point divider (1.0).
const MIN_DIV16: u32 = 16;

/// One past the largest representable 12.4 fixed-point divider (256.0).
const MAX_DIV16: u32 = 256 * 16;

/// Integer PWM timing for one output frequency: a tick count per cycle and a
/// 12.4 fixed-point clock divider.
///
/// Invariant (approximately): `period * div16 / 16 == source_hz / frequency`.
///
/// # Example
///
/// ```
/// use motor_envoy::pwm_timing::PwmTiming;
///
/// // 125 MHz system clock, 25 kHz PWM: 125e6 / 25e3 = 5000 ticks.
/// let timing = PwmTiming::from_frequency(25_000.0, 125_000_000)?;
/// assert_eq!(timing.period, 5000);
/// assert_eq!(timing.div16, 16); // divider 1.0
/// assert_eq!(timing.div_int(), 1);
/// assert_eq!(timing.div_frac(), 0);
/// # Ok::<(), motor_envoy::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, defmt::Format)]
pub struct PwmTiming {
    /// PWM ticks per cycle, `1..=MAX_PWM_PERIOD`.
    pub period: u16,
    /// Clock divider in sixteenths, `16..4096` (i.e. 1.0 to just under 256.0).
    pub div16: u16,
}

impl PwmTiming {
    /// Factor `source_hz / freq_hz` into a `(period, divider)` pair.
    ///
    /// Starts from the full ratio as a unit-period divider, then greedily
    /// moves factors of 5, 3, and 2 (in that priority order, repeatedly)
    /// from the divider into the period while the period stays within the
    /// 16-bit counter. Factor 2 is extracted even from odd dividers, as a
    /// truncating halving, trading a sliver of accuracy for a longer period.
    ///
    /// # Errors
    ///
    /// [`Error::InfeasibleFrequency`] if `freq_hz` is outside
    /// `[1, source_hz / 2]`, or if the residual divider lands outside the
    /// representable `[1.0, 256.0)` range.
    pub fn from_frequency(freq_hz: f32, source_hz: u32) -> Result<Self> {
        if freq_hz < 1.0 || f64::from(freq_hz) > f64::from(source_hz / 2) {
            return Err(Error::InfeasibleFrequency);
        }

        // Seed: divider for a period of one tick, rounded to the nearest
        // sixteenth. f64 keeps source_hz * 16 exact; the saturating cast
        // turns an absurd ratio into a divider the range check rejects.
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "positive, and float-to-int casts saturate"
        )]
        let mut div16 = (f64::from(source_hz) * 16.0 / f64::from(freq_hz) + 0.5) as u32;
        let mut period: u32 = 1;

        loop {
            if div16 >= 5 * MIN_DIV16 && div16 % 5 == 0 && period * 5 < MAX_PWM_PERIOD {
                div16 /= 5;
                period *= 5;
            } else if div16 >= 3 * MIN_DIV16 && div16 % 3 == 0 && period * 3 < MAX_PWM_PERIOD {
                div16 /= 3;
                period *= 3;
            } else if div16 >= 2 * MIN_DIV16 && period * 2 <= MAX_PWM_PERIOD {
                div16 /= 2;
                period *= 2;
            } else {
                break;
            }
        }

        if (MIN_DIV16..MAX_DIV16).contains(&div16) {
            #[expect(
                clippy::cast_possible_truncation,
                reason = "period <= MAX_PWM_PERIOD and div16 < 4096 by the checks above"
            )]
            let timing = Self {
                period: period as u16,
                div16: div16 as u16,
            };
            Ok(timing)
        } else {
            Err(Error::InfeasibleFrequency)
        }
    }

    /// Integer part of the divider.
    #[must_use]
    pub const fn div_int(self) -> u8 {
        (self.div16 >> 4) as u8
    }

    /// Fractional part of the divider, in sixteenths.
    #[must_use]
    pub const fn div_frac(self) -> u8 {
        (self.div16 & 0xF) as u8
    }

    /// The divider as the hardware's fixed-point type.
    #[must_use]
    pub fn divider(self) -> FixedU16<U4> {
        FixedU16::from_bits(self.div16)
    }
}
