//! Hardware seam for the polled input lines
//!
//! Pin sampling belongs to the host firmware; this module only defines the
//! trait a host wires real GPIOs through, plus an adapter for `embedded-hal`
//! input pins.

use embedded_hal::digital::InputPin;

use crate::controller::PaddleInput;
use crate::types::PaddleSide;

/// Error type for line sampling
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HalError {
    /// GPIO read failed
    Gpio,
}

#[cfg(feature = "std")]
impl core::fmt::Display for HalError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            HalError::Gpio => write!(f, "GPIO read failed"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for HalError {}

/// One sampled input line (paddle or mode select)
pub trait InputLine {
    type Error: From<HalError>;

    /// Current level, true when the line is active
    fn is_active(&mut self) -> Result<bool, Self::Error>;
}

/// Active-low pin adapter (pulled up, grounded when pressed)
pub struct InputPinLine<P> {
    pin: P,
}

impl<P> InputPinLine<P>
where
    P: InputPin,
{
    pub fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P> InputLine for InputPinLine<P>
where
    P: InputPin,
{
    type Error = HalError;

    fn is_active(&mut self) -> Result<bool, Self::Error> {
        self.pin.is_low().map_err(|_| HalError::Gpio)
    }
}

/// The three polled lines feeding one `PaddleInput`
pub struct KeyerLines<D, A, M> {
    pub dot: D,
    pub dash: A,
    pub mode: M,
}

impl<D, A, M, E> KeyerLines<D, A, M>
where
    D: InputLine<Error = E>,
    A: InputLine<Error = E>,
    M: InputLine<Error = E>,
    E: From<HalError>,
{
    /// Refreshes the shared input state from the pins, once per cycle
    pub fn sample(&mut self, input: &PaddleInput, now_ms: u32, debounce_ms: u32) -> Result<(), E> {
        input.update(PaddleSide::Dot, self.dot.is_active()?, now_ms, debounce_ms);
        input.update(PaddleSide::Dash, self.dash.is_active()?, now_ms, debounce_ms);
        input.set_automatic(self.mode.is_active()?);
        Ok(())
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    //! Mock line implementation for testing

    use super::{HalError, InputLine};
    use core::cell::Cell;

    #[derive(Default)]
    pub struct MockLine {
        active: Cell<bool>,
    }

    impl MockLine {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn set_active(&self, active: bool) {
            self.active.set(active);
        }
    }

    impl InputLine for &MockLine {
        type Error = HalError;

        fn is_active(&mut self) -> Result<bool, Self::Error> {
            Ok(self.active.get())
        }
    }
}
