//! Sweep a motor from full reverse to full forward and back, forever.
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

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(_spawner: Spawner) -> Result<Infallible> {
    let _p = embassy_rp::init(Default::default());

    let mut motor = Motor::new(RpMotorHal::new(), 6, 7, 25_000.0, DecayMode::SlowDecay);
    motor.init()?;
    info!("motor ready at {} Hz", motor.frequency());

    loop {
        // -1.0 -> 1.0 -> -1.0 in tenths.
        for step in (-10_i16..=10).chain((-9_i16..10).rev()) {
            let speed = f32::from(step) / 10.0;
            motor.set_speed(speed)?;
            info!("speed {}", motor.speed());
            Timer::after_millis(300).await;
        }
    }
}
