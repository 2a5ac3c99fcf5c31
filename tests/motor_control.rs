#![allow(missing_docs)]
//! Host-level tests for the motor state machine, using a recording hardware
//! mock to observe register-write ordering.

use std::cell::RefCell;
use std::rc::Rc;

use motor_envoy::Error;
use motor_envoy::duty::DecayMode;
use motor_envoy::hal::{ClockSource, PinOwner, PwmSink};
use motor_envoy::motor::Motor;

const CLOCK_HZ: u32 = 125_000_000;

/// One hardware access, in the order the controller issued it.
#[derive(Clone, Debug, Eq, PartialEq)]
enum Call {
    Configure {
        slice: u8,
        period: u16,
        div_int: u8,
        div_frac: u8,
    },
    Divider {
        slice: u8,
        div_int: u8,
        div_frac: u8,
    },
    Wrap {
        slice: u8,
        wrap: u16,
    },
    Level {
        channel: u8,
        level: u16,
    },
    Enable {
        channel: u8,
    },
    Claim {
        pin: u8,
    },
    Release {
        pin: u8,
    },
}

/// Mock hal that records every access. Clones share the same log, so a test
/// can keep a probe while the motor owns the hal.
#[derive(Clone)]
struct RecordingHal {
    clock_hz: u32,
    calls: Rc<RefCell<Vec<Call>>>,
}

impl RecordingHal {
    fn new(clock_hz: u32) -> Self {
        Self {
            clock_hz,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }

    /// Drain and return everything recorded so far.
    fn take(&self) -> Vec<Call> {
        self.calls.borrow_mut().split_off(0)
    }
}

impl ClockSource for RecordingHal {
    fn source_frequency(&self) -> u32 {
        self.clock_hz
    }
}

impl PwmSink for RecordingHal {
    fn slice_id(&self, channel: u8) -> u8 {
        // RP2040 mapping: adjacent even/odd GPIOs share a slice.
        (channel / 2) % 8
    }

    fn configure_channel(&mut self, channel: u8, period: u16, div_int: u8, div_frac: u8) {
        let slice = self.slice_id(channel);
        self.record(Call::Configure {
            slice,
            period,
            div_int,
            div_frac,
        });
    }

    fn set_divider(&mut self, channel: u8, div_int: u8, div_frac: u8) {
        let slice = self.slice_id(channel);
        self.record(Call::Divider {
            slice,
            div_int,
            div_frac,
        });
    }

    fn set_wrap(&mut self, channel: u8, wrap: u16) {
        let slice = self.slice_id(channel);
        self.record(Call::Wrap { slice, wrap });
    }

    fn set_level(&mut self, channel: u8, level: u16) {
        self.record(Call::Level { channel, level });
    }

    fn enable(&mut self, channel: u8) {
        self.record(Call::Enable { channel });
    }
}

impl PinOwner for RecordingHal {
    fn claim_for_pwm(&mut self, pin: u8) {
        self.record(Call::Claim { pin });
    }

    fn release(&mut self, pin: u8) {
        self.record(Call::Release { pin });
    }
}

/// Motor on GPIO 6/7 (shared slice 3), initialized at `freq_hz`, with the
/// init traffic drained from the probe.
fn ready_motor(freq_hz: f32) -> (Motor<RecordingHal>, RecordingHal) {
    let hal = RecordingHal::new(CLOCK_HZ);
    let probe = hal.clone();
    let mut motor = Motor::new(hal, 6, 7, freq_hz, DecayMode::SlowDecay);
    motor.init().expect("init should succeed");
    let _ = probe.take();
    (motor, probe)
}

#[test]
fn mutators_before_init_report_not_initialized() {
    let hal = RecordingHal::new(CLOCK_HZ);
    let probe = hal.clone();
    let mut motor = Motor::new(hal, 6, 7, 25_000.0, DecayMode::SlowDecay);

    assert!(!motor.is_ready());
    assert_eq!(motor.set_speed(0.5), Err(Error::NotInitialized));
    assert_eq!(motor.set_frequency(10_000.0), Err(Error::NotInitialized));
    assert_eq!(motor.set_decay_mode(DecayMode::FastDecay), Err(Error::NotInitialized));
    assert_eq!(motor.stop(), Err(Error::NotInitialized));
    assert_eq!(motor.disable(), Err(Error::NotInitialized));
    assert_eq!(probe.take(), vec![], "no hardware access before init");
}

#[test]
fn failed_init_touches_no_hardware_and_stays_uninitialized() {
    let hal = RecordingHal::new(CLOCK_HZ);
    let probe = hal.clone();
    // 0.1 Hz is below the representable range.
    let mut motor = Motor::new(hal, 6, 7, 0.1, DecayMode::SlowDecay);

    assert_eq!(motor.init(), Err(Error::InfeasibleFrequency));
    assert!(!motor.is_ready());
    assert_eq!(probe.take(), vec![]);
    assert_eq!(motor.set_speed(1.0), Err(Error::NotInitialized));
}

#[test]
fn init_configures_shared_slice_once_then_claims_levels_enables() {
    let hal = RecordingHal::new(CLOCK_HZ);
    let probe = hal.clone();
    let mut motor = Motor::new(hal, 6, 7, 25_000.0, DecayMode::SlowDecay);
    motor.init().expect("init should succeed");

    // 25 kHz at 125 MHz: period 5000, divider 1.0. GPIO 6 and 7 share
    // slice 3, so exactly one configure write.
    assert_eq!(
        probe.take(),
        vec![
            Call::Configure {
                slice: 3,
                period: 5000,
                div_int: 1,
                div_frac: 0
            },
            Call::Claim { pin: 6 },
            Call::Claim { pin: 7 },
            Call::Level {
                channel: 6,
                level: 5000
            },
            Call::Level {
                channel: 7,
                level: 5000
            },
            Call::Enable { channel: 6 },
            Call::Enable { channel: 7 },
        ]
    );
    assert!(motor.is_ready());
}

#[test]
fn init_configures_both_slices_when_pins_do_not_share_one() {
    let hal = RecordingHal::new(CLOCK_HZ);
    let probe = hal.clone();
    // GPIO 6 is slice 3, GPIO 8 is slice 4.
    let mut motor = Motor::new(hal, 6, 8, 25_000.0, DecayMode::SlowDecay);
    motor.init().expect("init should succeed");

    let configures: Vec<Call> = probe
        .take()
        .into_iter()
        .filter(|call| matches!(call, Call::Configure { .. }))
        .collect();
    assert_eq!(
        configures,
        vec![
            Call::Configure {
                slice: 3,
                period: 5000,
                div_int: 1,
                div_frac: 0
            },
            Call::Configure {
                slice: 4,
                period: 5000,
                div_int: 1,
                div_frac: 0
            },
        ]
    );
    drop(motor);
}

#[test]
fn growing_period_writes_levels_before_wrap() {
    // 50 kHz gives period 2500; dropping to 25 kHz doubles it to 5000.
    let (mut motor, probe) = ready_motor(50_000.0);
    motor.set_speed(0.5).expect("set_speed should succeed");
    let _ = probe.take();

    motor.set_frequency(25_000.0).expect("set_frequency should succeed");
    assert_eq!(
        probe.take(),
        vec![
            Call::Divider {
                slice: 3,
                div_int: 1,
                div_frac: 0
            },
            // Levels for the *new* period go out before the wrap changes.
            Call::Level {
                channel: 6,
                level: 5000
            },
            Call::Level {
                channel: 7,
                level: 2500
            },
            Call::Wrap {
                slice: 3,
                wrap: 4999
            },
        ]
    );
    assert_eq!(motor.frequency(), 25_000.0);
}

#[test]
fn shrinking_period_writes_wrap_before_levels() {
    // 25 kHz gives period 5000; raising to 50 kHz halves it to 2500.
    let (mut motor, probe) = ready_motor(25_000.0);
    motor.set_speed(0.5).expect("set_speed should succeed");
    let _ = probe.take();

    motor.set_frequency(50_000.0).expect("set_frequency should succeed");
    assert_eq!(
        probe.take(),
        vec![
            Call::Divider {
                slice: 3,
                div_int: 1,
                div_frac: 0
            },
            Call::Wrap {
                slice: 3,
                wrap: 2499
            },
            // Levels for the *new* period go out after the wrap changed.
            Call::Level {
                channel: 6,
                level: 2500
            },
            Call::Level {
                channel: 7,
                level: 1250
            },
        ]
    );
}

#[test]
fn failed_set_frequency_mutates_nothing() {
    let (mut motor, probe) = ready_motor(25_000.0);
    motor.set_speed(0.5).expect("set_speed should succeed");
    let _ = probe.take();

    assert_eq!(motor.set_frequency(0.5), Err(Error::InfeasibleFrequency));
    assert_eq!(probe.take(), vec![], "no hardware access on failure");
    assert_eq!(motor.frequency(), 25_000.0);
    assert_eq!(motor.speed(), 0.5);

    // Still driving against the old period of 5000.
    motor.set_speed(1.0).expect("set_speed should succeed");
    assert_eq!(
        probe.take(),
        vec![
            Call::Level {
                channel: 6,
                level: 5000
            },
            Call::Level { channel: 7, level: 0 },
        ]
    );
}

#[test]
fn set_speed_clamps_to_full_scale() {
    let (mut motor, probe) = ready_motor(25_000.0);

    motor.set_speed(5.0).expect("set_speed should succeed");
    let overdriven = probe.take();
    motor.set_speed(1.0).expect("set_speed should succeed");
    assert_eq!(overdriven, probe.take());
    assert_eq!(motor.speed(), 1.0);

    motor.set_speed(-5.0).expect("set_speed should succeed");
    let overdriven = probe.take();
    motor.set_speed(-1.0).expect("set_speed should succeed");
    assert_eq!(overdriven, probe.take());
    assert_eq!(motor.speed(), -1.0);
}

#[test]
fn stop_matches_zero_speed_levels() {
    let (mut motor, probe) = ready_motor(25_000.0);
    motor.set_speed(0.7).expect("set_speed should succeed");
    let _ = probe.take();

    motor.stop().expect("stop should succeed");
    assert_eq!(motor.speed(), 0.0);
    assert_eq!(
        probe.take(),
        vec![
            Call::Level {
                channel: 6,
                level: 5000
            },
            Call::Level {
                channel: 7,
                level: 5000
            },
        ]
    );
}

#[test]
fn decay_mode_switch_rewrites_levels_for_current_speed() {
    let (mut motor, probe) = ready_motor(25_000.0);
    motor.set_speed(0.5).expect("set_speed should succeed");
    let _ = probe.take();

    motor
        .set_decay_mode(DecayMode::FastDecay)
        .expect("set_decay_mode should succeed");
    assert_eq!(motor.decay_mode(), DecayMode::FastDecay);
    assert_eq!(
        probe.take(),
        vec![
            Call::Level {
                channel: 6,
                level: 2500
            },
            Call::Level { channel: 7, level: 0 },
        ]
    );
}

#[test]
fn disable_zeroes_levels_and_keeps_everything_else() {
    let (mut motor, probe) = ready_motor(25_000.0);
    motor.set_speed(0.75).expect("set_speed should succeed");
    let _ = probe.take();

    motor.disable().expect("disable should succeed");
    assert_eq!(
        probe.take(),
        vec![
            Call::Level { channel: 6, level: 0 },
            Call::Level { channel: 7, level: 0 },
        ]
    );
    assert_eq!(motor.speed(), 0.0);
    assert_eq!(motor.frequency(), 25_000.0);
    assert_eq!(motor.decay_mode(), DecayMode::SlowDecay);
    assert!(motor.is_ready());

    // Any speed command resumes drive.
    motor.set_speed(0.25).expect("set_speed should succeed");
    assert_eq!(
        probe.take(),
        vec![
            Call::Level {
                channel: 6,
                level: 5000
            },
            Call::Level {
                channel: 7,
                level: 3750
            },
        ]
    );
}

#[test]
fn drop_releases_both_pins_once() {
    let (motor, probe) = ready_motor(25_000.0);
    drop(motor);
    assert_eq!(
        probe.take(),
        vec![Call::Release { pin: 6 }, Call::Release { pin: 7 }]
    );
}

#[test]
fn drop_releases_pins_even_without_init() {
    let hal = RecordingHal::new(CLOCK_HZ);
    let probe = hal.clone();
    let motor = Motor::new(hal, 10, 11, 25_000.0, DecayMode::FastDecay);
    drop(motor);
    assert_eq!(
        probe.take(),
        vec![Call::Release { pin: 10 }, Call::Release { pin: 11 }]
    );
}
