//! Hold a steady speed while toggling decay mode and changing the PWM
//! frequency live — listen for the pitch change, watch for the absence of
//! speed blips.
//!
//! Wiring: H-bridge inputs on GPIO 6 (positive) and GPIO 7 (negative).
#![no_std]
#![no_main]
#![cfg(not(feature = "host"))]

use core::{convert::Infallible, panic};
use embassy_executor::Spawner;
use embassy_time::Timer;
use motor_envoy::{Result, duty::DecayMode, motor::Motor, rp::RpMotorHal};
use {defmt::info, defmt_rtt as _, panic_probe as _};

const FREQUENCIES_HZ: [f32; 4] = [1_000.0, 5_000.0, 25_000.0, 50_000.0];

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(_spawner: Spawner) -> Result<Infallible> {
    let _p = embassy_rp::init(Default::default());

    let mut motor = Motor::new(RpMotorHal::new(), 6, 7, 25_000.0, DecayMode::SlowDecay);
    motor.init()?;
    motor.set_speed(0.5)?;

    loop {
        for mode in [DecayMode::SlowDecay, DecayMode::FastDecay] {
            motor.set_decay_mode(mode)?;
            info!("decay mode {}", motor.decay_mode());
            for freq_hz in FREQUENCIES_HZ {
                // Period grows and shrinks across this list, exercising both
                // write orderings.
                motor.set_frequency(freq_hz)?;
                info!("pwm {} Hz", motor.frequency());
                Timer::after_millis(1500).await;
            }
        }
    }
}
