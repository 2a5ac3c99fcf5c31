//! Drive brushed DC motors through an H-bridge on the Pico 1 and 2.
//!
//! A motor sits behind two complementary PWM channels. [`motor::Motor`]
//! exposes signed speed, live frequency changes, and braking/coasting decay
//! modes, while [`pwm_timing`] and [`duty`] hold the two pure algorithms
//! underneath: factorizing a frequency into the hardware's (period, divider)
//! pair, and mapping a signed speed onto the two channel levels.
//!
//! # Glossary
//!
//! - **PWM ([Pulse Width Modulation](https://en.wikipedia.org/wiki/Pulse-width_modulation)) Slices:**
//!   Pico 1 has 8 slices, Pico 2 has 12 (B-grade parts). Each slice drives two
//!   output channels, A and B. These "slices" are unrelated to Rust slices.
//! - **H-bridge:** four-switch driver that lets one supply push current
//!   through a motor in either direction.
//! - **Decay mode:** what the bridge does during the OFF part of each PWM
//!   cycle — short the windings (slow decay, brakes) or float them (fast
//!   decay, coasts).
#![cfg_attr(not(feature = "host"), no_std)]

// Compile-time checks: exactly one board must be selected (unless testing with host feature)
#[cfg(all(not(any(feature = "pico1", feature = "pico2")), not(feature = "host")))]
compile_error!("Must enable exactly one board feature: 'pico1' or 'pico2'");

#[cfg(all(feature = "pico1", feature = "pico2"))]
compile_error!("Cannot enable both 'pico1' and 'pico2' features simultaneously");

// Compile-time checks: exactly one architecture must be selected (unless testing with host feature)
#[cfg(all(not(any(feature = "arm", feature = "riscv")), not(feature = "host")))]
compile_error!("Must enable exactly one architecture feature: 'arm' or 'riscv'");

#[cfg(all(feature = "arm", feature = "riscv"))]
compile_error!("Cannot enable both 'arm' and 'riscv' features simultaneously");

// Compile-time check: pico1 only supports ARM
#[cfg(all(feature = "pico1", feature = "riscv"))]
compile_error!("Pico 1 (RP2040) only supports ARM architecture, not RISC-V");

pub mod duty;
mod error;
pub mod hal;
pub mod motor;
pub mod pwm_timing;
// The concrete backend requires embassy_rp and is excluded when testing on host
#[cfg(not(feature = "host"))]
pub mod rp;

// Re-export error types and result (used throughout)
pub use crate::error::{Error, Result};
