//! Signed speed to per-channel PWM level mapping.
//!
//! An H-bridge driven by two PWM channels supports two modulation schemes,
//! named for what the motor windings do during the OFF part of each cycle:
//! slow decay (the bridge shorts the windings — active braking) and fast
//! decay (the bridge floats the windings — coasting).

/// What the H-bridge does during the OFF portion of each PWM cycle.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, defmt::Format)]
pub enum DecayMode {
    /// Braking characteristic: one channel is pinned fully high each cycle,
    /// so zero speed shorts both motor terminals high and holds the shaft.
    SlowDecay,
    /// Coasting characteristic: at most one channel is high at a time, so
    /// zero speed leaves the motor free-wheeling.
    FastDecay,
}

/// Map a signed speed onto the two channel levels for one PWM period.
///
/// `speed` is clamped to `[-1.0, 1.0]`; the sign selects direction. Returns
/// `(positive_channel, negative_channel)` levels, each in `0..=period`.
///
/// The speed is scaled to a signed tick count with round-half-away-from-zero
/// so `+s` and `-s` always land symmetrically.
///
/// # Examples
///
/// ```
/// use motor_envoy::duty::{DecayMode, duty_levels};
///
/// // Stopped: slow decay brakes (both pinned high), fast decay coasts.
/// assert_eq!(duty_levels(0.0, 5000, DecayMode::SlowDecay), (5000, 5000));
/// assert_eq!(duty_levels(0.0, 5000, DecayMode::FastDecay), (0, 0));
///
/// // Half speed forward.
/// assert_eq!(duty_levels(0.5, 5000, DecayMode::SlowDecay), (5000, 2500));
/// assert_eq!(duty_levels(0.5, 5000, DecayMode::FastDecay), (2500, 0));
/// ```
#[must_use]
pub fn duty_levels(speed: f32, period: u16, mode: DecayMode) -> (u16, u16) {
    let period_ticks = i32::from(period);
    let signed_duty = round_ties_away(speed.clamp(-1.0, 1.0) * f32::from(period))
        .clamp(-period_ticks, period_ticks);

    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "each arm is clamped into 0..=period"
    )]
    let levels = match mode {
        DecayMode::SlowDecay => {
            if signed_duty >= 0 {
                (period, (period_ticks - signed_duty) as u16)
            } else {
                ((period_ticks + signed_duty) as u16, period)
            }
        }
        DecayMode::FastDecay => {
            if signed_duty >= 0 {
                (signed_duty as u16, 0)
            } else {
                (0, (-signed_duty) as u16)
            }
        }
    };
    levels
}

/// Round to the nearest integer, ties away from zero.
///
/// The `as` cast truncates toward zero, so shifting by half first rounds.
#[expect(
    clippy::cast_possible_truncation,
    reason = "inputs are within +-(MAX_PWM_PERIOD + 1)"
)]
fn round_ties_away(value: f32) -> i32 {
    if value >= 0.0 {
        (value + 0.5) as i32
    } else {
        (value - 0.5) as i32
    }
}
