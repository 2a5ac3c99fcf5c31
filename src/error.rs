//! Crate-wide error type and `Result` alias.

use derive_more::{Display, Error};

/// Errors reported by this crate.
///
/// Every fallible operation reports one of these two conditions; on any
/// failure the motor's stored state is left exactly as it was before the
/// call.
#[derive(Clone, Copy, Debug, Display, Error, Eq, Hash, PartialEq, defmt::Format)]
pub enum Error {
    /// The requested PWM frequency cannot be realized from the source clock.
    ///
    /// Either the frequency is outside `[1 Hz, clock/2]`, or no
    /// period/divider factorization lands the clock divider inside the
    /// hardware's representable range.
    #[display("requested PWM frequency cannot be realized from the source clock")]
    InfeasibleFrequency,

    /// A mutator was called before a successful [`Motor::init`](crate::motor::Motor::init).
    #[display("motor used before a successful init()")]
    NotInitialized,
}

/// Result alias used throughout this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
