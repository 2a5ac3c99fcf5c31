//! Compile-only check: construct and drive a motor on Pico 1.
#![no_std]
#![no_main]

use core::{convert::Infallible, panic};
use embassy_executor::Spawner;
use motor_envoy::{Result, duty::DecayMode, motor::Motor, rp::RpMotorHal};
use {defmt_rtt as _, panic_probe as _};

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let err = inner_main(spawner).await.unwrap_err();
    panic!("{err}");
}

async fn inner_main(_spawner: Spawner) -> Result<Infallible> {
    let _p = embassy_rp::init(Default::default());

    let mut motor = Motor::new(RpMotorHal::new(), 2, 3, 12_500.0, DecayMode::FastDecay);
    motor.init()?;
    motor.set_speed(-0.25)?;
    motor.set_frequency(6_250.0)?;
    motor.set_decay_mode(DecayMode::SlowDecay)?;
    motor.stop()?;
    motor.disable()?;

    core::future::pending().await
}
