//! Core data types for the adaptive keyer

use heapless::Vec;

/// Morse symbols produced by one key-down interval
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Symbol {
    /// Dot (short element)
    Dot,
    /// Dash (long element, nominally 3x dot)
    Dash,
}

impl Symbol {
    /// Returns the opposite symbol (Dot <-> Dash)
    pub const fn opposite(&self) -> Symbol {
        match self {
            Symbol::Dot => Symbol::Dash,
            Symbol::Dash => Symbol::Dot,
        }
    }

    /// Code-table glyph for this symbol
    pub const fn glyph(&self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }

    /// Nominal key-down duration at the given unit time
    pub fn nominal_ms(&self, unit_ms: u32, dash_ratio: f32) -> u32 {
        match self {
            Symbol::Dot => unit_ms,
            Symbol::Dash => (dash_ratio * unit_ms as f32 + 0.5) as u32,
        }
    }
}

/// Paddle side identification
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PaddleSide {
    /// Dot paddle (typically left side)
    Dot,
    /// Dash paddle (typically right side)
    Dash,
}

impl PaddleSide {
    /// Convert to the corresponding symbol
    pub const fn to_symbol(&self) -> Symbol {
        match self {
            PaddleSide::Dot => Symbol::Dot,
            PaddleSide::Dash => Symbol::Dash,
        }
    }
}

/// Keyer operating modes, selected by the mode line
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyerMode {
    /// Operator-timed keying: pulse lengths come straight from the key
    Manual,
    /// Iambic keying: the keyer schedules dot/dash playback itself
    Automatic,
}

/// Snapshot of the three input lines for one polling cycle
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineLevels {
    pub dot: bool,
    pub dash: bool,
    pub automatic: bool,
}

impl LineLevels {
    /// True while either paddle is active
    pub const fn any_paddle(&self) -> bool {
        self.dot || self.dash
    }

    /// True while both paddles are released
    pub const fn both_released(&self) -> bool {
        !self.dot && !self.dash
    }
}

/// Maximum pulses held for one character in progress
pub const PULSE_CAPACITY: usize = 64;

/// Bounded, insertion-ordered key-down durations for the character being
/// typed. Appends past capacity are dropped silently so pathological input
/// never grows memory.
#[derive(Debug, Default)]
pub struct PulseBuffer {
    pulses: Vec<u32, PULSE_CAPACITY>,
}

impl PulseBuffer {
    pub const fn new() -> Self {
        Self { pulses: Vec::new() }
    }

    /// Records one key-down duration; no-op when full
    pub fn append(&mut self, duration_ms: u32) {
        let _ = self.pulses.push(duration_ms);
    }

    pub fn clear(&mut self) {
        self.pulses.clear();
    }

    /// Read-only ordered view for the estimator and decoder
    pub fn as_slice(&self) -> &[u32] {
        &self.pulses
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }
}

/// Output events produced by the keyer core.
///
/// Characters and word spaces are the decode stream; the remaining events
/// drive host-side indicators (LED/buzzer, shift indicator, mode indicator)
/// as levels.
#[derive(Copy, Clone, PartialEq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyerEvent {
    /// A decoded character with the shift state it consumed
    Character { ch: char, shifted: bool },
    /// Word gap elapsed since the last character
    WordSpace,
    /// Correction code decoded; the host should erase one character
    Backspace,
    /// Sidetone/keying indicator edges
    SidetoneOn,
    SidetoneOff,
    /// Brief key-activity indicator pulse edges
    ActivityOn,
    ActivityOff,
    /// Shift latch armed / consumed
    ShiftOn,
    ShiftOff,
    /// Mode line changed
    Mode(KeyerMode),
}

/// Keyer configuration parameters
#[derive(Copy, Clone, Debug)]
pub struct KeyerConfig {
    /// Dash to dot duration ratio (nominal 3.0)
    pub dash_ratio: f32,
    /// Adjacent-pulse ratio that marks a dot/dash transition (nominal 2.0)
    pub dash_threshold: f32,
    /// Unit time at startup, before any calibration
    pub default_unit_ms: u32,
    /// Hard floor for the calibrated unit time
    pub min_unit_ms: u32,
    /// Polling cadence; 10 ms also filters contact bounce
    pub poll_interval_ms: u32,
    /// Edge debounce window for the paddle lines
    pub debounce_ms: u32,
}

impl Default for KeyerConfig {
    fn default() -> Self {
        Self {
            dash_ratio: 3.0,
            dash_threshold: 2.0,
            default_unit_ms: 60, // 20 WPM
            min_unit_ms: 20,
            poll_interval_ms: 10,
            debounce_ms: 10,
        }
    }
}

impl KeyerConfig {
    /// Create a configuration for a target speed with validation
    pub fn with_wpm(wpm: u32) -> Result<Self, &'static str> {
        if wpm == 0 || wpm > 100 {
            return Err("WPM must be between 1 and 100");
        }
        // PARIS standard: 50 units per word
        Ok(Self {
            default_unit_ms: 1200 / wpm,
            ..Self::default()
        })
    }

    /// Words per minute implied by the given unit time
    pub fn wpm(unit_ms: u32) -> u32 {
        (1200 / unit_ms.max(1)).max(1)
    }
}
