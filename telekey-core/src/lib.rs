#![cfg_attr(not(any(test, feature = "std")), no_std)]

//! # Telekey Core
//!
//! Core logic for turning a two-lever telegraph key into a text stream.
//! Supports operator-timed manual keying and an automatic iambic (Mode A)
//! keyer, with adaptive unit-time calibration and idle-gap character/word
//! detection. The core is clock-agnostic and lock-free: one polling cycle
//! drives every state machine through [`Keyer::tick`].

pub mod controller;
pub mod estimator;
pub mod fsm;
pub mod hal;
pub mod table;
pub mod timer;
pub mod types;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use controller::PaddleInput;
pub use fsm::{Keyer, ACTIVITY_PULSE_MS, CHAR_GAP_UNITS, WORD_GAP_UNITS};
#[cfg(feature = "embassy-time")]
pub use fsm::keyer_task;
pub use table::{CodeTable, Decoded, BACKSPACE_CODE, SHIFT_CODE};
pub use timer::Countdown;
pub use types::*;

/// Keyer library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default configuration for most operators: 20 WPM starting estimate,
/// standard 3:1 dash ratio, 10 ms polling
pub fn default_config() -> KeyerConfig {
    KeyerConfig::default()
}
