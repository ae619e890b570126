//! Keying state machines, boundary detection, and the owning aggregate
//!
//! Everything mutable lives in the single [`Keyer`] aggregate and is only
//! touched from [`Keyer::tick`], so the whole core runs without locks. All
//! timers are polled; `tick` takes the clock explicitly, which keeps the
//! state machines deterministic under test.

use heapless::spsc::Producer;
use heapless::String;

use crate::controller::PaddleInput;
use crate::estimator::estimate_unit;
use crate::table::{CodeTable, Decoded};
use crate::timer::Countdown;
use crate::types::{
    KeyerConfig, KeyerEvent, KeyerMode, LineLevels, PulseBuffer, Symbol, PULSE_CAPACITY,
};

/// Idle gap, in unit times, that completes a character
pub const CHAR_GAP_UNITS: u32 = 3;
/// Idle gap, in unit times, that completes a word
pub const WORD_GAP_UNITS: u32 = 9;
/// Key-activity indicator pulse length (two polling cycles)
pub const ACTIVITY_PULSE_MS: u32 = 20;

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
enum ManualState {
    Idle,
    Keying,
}

/// Operator-timed keying: measures raw key-down intervals
#[derive(Debug)]
struct ManualKeyer {
    state: ManualState,
    pressed_at: u32,
    released_at: u32,
}

impl ManualKeyer {
    const fn new() -> Self {
        Self {
            state: ManualState::Idle,
            pressed_at: 0,
            released_at: 0,
        }
    }

    fn reset(&mut self, now_ms: u32) {
        self.state = ManualState::Idle;
        self.released_at = now_ms;
    }
}

/// Iambic Mode A scheduling state.
///
/// The slot timer's tag is the symbol currently being played; `None` means
/// the keyer is free to dispatch. `queue` is the edge-latched hard slot,
/// `soft_queue` the level-derived squeeze slot recomputed every cycle.
#[derive(Debug)]
struct AutoKeyer {
    slot: Countdown<Option<Symbol>>,
    queue: Option<Symbol>,
    soft_queue: Option<Symbol>,
    dot_held: bool,
    dash_held: bool,
}

impl AutoKeyer {
    const fn new() -> Self {
        Self {
            slot: Countdown::new(None),
            queue: None,
            soft_queue: None,
            dot_held: false,
            dash_held: false,
        }
    }

    fn playing(&self) -> Option<Symbol> {
        *self.slot.tag()
    }

    fn reset(&mut self, now_ms: u32) {
        self.slot.set_tag(None);
        self.slot.arm(now_ms, 0);
        self.queue = None;
        self.soft_queue = None;
        self.dot_held = false;
        self.dash_held = false;
    }

    /// Edge and level tracking for one cycle.
    ///
    /// A rising edge arms the hard queue when it is empty; while the
    /// opposite symbol is playing with that same opposite already queued, a
    /// fresh press overrides the pending request (alternation override).
    /// The soft queue mirrors whichever held paddle differs from the
    /// playing symbol, and releasing both paddles clears it immediately:
    /// that is Mode A, no trailing element after release.
    fn track_paddles(&mut self, levels: LineLevels) {
        let playing = self.playing();

        if self.dot_held && !levels.dot {
            self.dot_held = false;
        }
        if !self.dot_held && levels.dot {
            self.dot_held = true;
            if self.queue.is_none() {
                self.queue = Some(Symbol::Dot);
            } else if playing == Some(Symbol::Dash) && self.queue == Some(Symbol::Dash) {
                self.queue = Some(Symbol::Dot);
            }
        }

        if self.dash_held && !levels.dash {
            self.dash_held = false;
        }
        if !self.dash_held && levels.dash {
            self.dash_held = true;
            if self.queue.is_none() {
                self.queue = Some(Symbol::Dash);
            } else if playing == Some(Symbol::Dot) && self.queue == Some(Symbol::Dot) {
                self.queue = Some(Symbol::Dash);
            }
        }

        if levels.both_released() {
            self.soft_queue = None;
        } else {
            if self.dot_held && playing != Some(Symbol::Dot) {
                self.soft_queue = Some(Symbol::Dot);
            }
            if self.dash_held && playing != Some(Symbol::Dash) {
                self.soft_queue = Some(Symbol::Dash);
            }
        }
    }

    /// Resolves the next symbol: hard queue first, squeeze slot as fallback
    fn take_next(&mut self) -> Option<Symbol> {
        let next = self.queue.or(self.soft_queue);
        if next.is_some() {
            self.queue = None;
            self.soft_queue = None;
        }
        next
    }
}

/// One-shot character/word completion flags plus the shift latch
#[derive(Debug)]
struct BoundaryDetector {
    char_done: bool,
    word_done: bool,
    shift: bool,
}

impl BoundaryDetector {
    const fn new() -> Self {
        Self {
            char_done: false,
            word_done: false,
            shift: false,
        }
    }

    /// Re-arms both completion events; the only way they are re-armed
    fn reset_window(&mut self) {
        self.char_done = false;
        self.word_done = false;
    }
}

/// The single keyer aggregate.
///
/// Owns the calibrated unit time, the pulse buffer, both state machines,
/// the boundary detector, and the indicator timers. Single-writer: touch it
/// only from the polling cycle.
pub struct Keyer {
    config: KeyerConfig,
    table: CodeTable,
    unit_ms: u32,
    pulses: PulseBuffer,
    mode: Option<KeyerMode>,
    manual: ManualKeyer,
    auto: AutoKeyer,
    boundary: BoundaryDetector,
    sidetone: Countdown<bool>,
    activity: Countdown<bool>,
}

impl Keyer {
    pub fn new(config: KeyerConfig) -> Self {
        Self {
            config,
            table: CodeTable::new(),
            unit_ms: config.default_unit_ms.max(config.min_unit_ms),
            pulses: PulseBuffer::new(),
            mode: None,
            manual: ManualKeyer::new(),
            auto: AutoKeyer::new(),
            boundary: BoundaryDetector::new(),
            sidetone: Countdown::new(false),
            activity: Countdown::new(false),
        }
    }

    /// Current calibrated unit (dot) time
    pub fn unit_ms(&self) -> u32 {
        self.unit_ms
    }

    /// Active mode; `Manual` until the first tick samples the mode line
    pub fn mode(&self) -> KeyerMode {
        self.mode.unwrap_or(KeyerMode::Manual)
    }

    pub fn config(&self) -> &KeyerConfig {
        &self.config
    }

    /// Pulses recorded for the character in progress
    pub fn pulses(&self) -> &[u32] {
        self.pulses.as_slice()
    }

    /// One polling cycle: samples the lines, steps the active state
    /// machine, and services the indicator timers
    pub fn tick<const N: usize>(
        &mut self,
        now_ms: u32,
        input: &PaddleInput,
        events: &mut Producer<'_, KeyerEvent, N>,
    ) {
        let levels = input.levels();
        self.update_mode(now_ms, levels.automatic, events);

        match self.mode() {
            KeyerMode::Manual => self.tick_manual(now_ms, levels, events),
            KeyerMode::Automatic => self.tick_auto(now_ms, levels, events),
        }

        self.service_indicators(now_ms, events);
    }

    fn update_mode<const N: usize>(
        &mut self,
        now_ms: u32,
        automatic: bool,
        events: &mut Producer<'_, KeyerEvent, N>,
    ) {
        let mode = if automatic {
            KeyerMode::Automatic
        } else {
            KeyerMode::Manual
        };
        if self.mode == Some(mode) {
            return;
        }

        // Abandon whatever the other machine had in flight.
        if self.manual.state == ManualState::Keying {
            events.enqueue(KeyerEvent::SidetoneOff).ok();
        }
        self.manual.reset(now_ms);
        self.auto.reset(now_ms);

        self.mode = Some(mode);
        events.enqueue(KeyerEvent::Mode(mode)).ok();
        #[cfg(feature = "defmt")]
        defmt::debug!("mode -> {}", mode);
    }

    fn tick_manual<const N: usize>(
        &mut self,
        now_ms: u32,
        levels: LineLevels,
        events: &mut Producer<'_, KeyerEvent, N>,
    ) {
        // Either paddle keys; pressing both is the same as pressing one.
        let pressed = levels.any_paddle();

        match self.manual.state {
            ManualState::Idle => {
                if pressed {
                    self.manual.state = ManualState::Keying;
                    self.manual.pressed_at = now_ms;
                    self.boundary.reset_window();
                    events.enqueue(KeyerEvent::SidetoneOn).ok();
                } else {
                    let idle_ms = now_ms.wrapping_sub(self.manual.released_at);
                    self.check_boundaries(now_ms, idle_ms, events);
                }
            }
            ManualState::Keying => {
                if !pressed {
                    let duration = now_ms.wrapping_sub(self.manual.pressed_at);
                    self.manual.state = ManualState::Idle;
                    self.manual.released_at = now_ms;
                    self.pulses.append(duration);
                    self.retime();
                    events.enqueue(KeyerEvent::SidetoneOff).ok();
                }
            }
        }
    }

    fn tick_auto<const N: usize>(
        &mut self,
        now_ms: u32,
        levels: LineLevels,
        events: &mut Producer<'_, KeyerEvent, N>,
    ) {
        // Guard for an unset unit time. The default keeps this always
        // calibrated, but an uninitialized estimate must block scheduling.
        if self.unit_ms == 0 {
            return;
        }

        self.auto.track_paddles(levels);

        // Completion: free the slot the moment its timer runs out and
        // re-arm at zero so idle counting starts here.
        if self.auto.playing().is_some() && self.auto.slot.is_due(now_ms) {
            self.auto.slot.set_tag(None);
            self.auto.slot.arm(now_ms, 0);
            self.retime();
        }

        if self.auto.playing().is_none() {
            if let Some(symbol) = self.auto.take_next() {
                self.dispatch(now_ms, symbol, events);
            } else {
                // The one-unit inter-element gap has already passed before
                // idle time registers, hence the offset.
                let idle_ms = self.auto.slot.elapsed(now_ms).max(0) as u32 + self.unit_ms;
                self.check_boundaries(now_ms, idle_ms, events);
            }
        }
    }

    /// Starts playback of one symbol and schedules its slot
    fn dispatch<const N: usize>(
        &mut self,
        now_ms: u32,
        symbol: Symbol,
        events: &mut Producer<'_, KeyerEvent, N>,
    ) {
        self.boundary.reset_window();

        let duration = symbol.nominal_ms(self.unit_ms, self.config.dash_ratio);
        self.pulses.append(duration);

        events.enqueue(KeyerEvent::SidetoneOn).ok();
        self.sidetone.set_tag(true);
        self.sidetone.arm(now_ms, duration);

        // Slot length includes the trailing one-unit inter-element gap.
        let slot_ms = match symbol {
            Symbol::Dot => 2 * self.unit_ms,
            Symbol::Dash => {
                ((self.config.dash_ratio + 1.0) * self.unit_ms as f32 + 0.5) as u32
            }
        };
        self.auto.slot.set_tag(Some(symbol));
        self.auto.slot.arm(now_ms, slot_ms);

        #[cfg(feature = "defmt")]
        defmt::trace!("dispatch {} for {} ms", symbol, duration);
    }

    /// Re-estimates the unit time from the pulse buffer. An inconclusive
    /// estimate leaves the previous value unchanged; a defined one is
    /// clamped to the configured floor.
    fn retime(&mut self) {
        if let Some(estimate) = estimate_unit(
            self.pulses.as_slice(),
            self.config.dash_ratio,
            self.config.dash_threshold,
        ) {
            self.unit_ms = estimate.max(self.config.min_unit_ms);
            #[cfg(feature = "defmt")]
            defmt::trace!("unit time {} ms", self.unit_ms);
        }
    }

    /// Fires the one-shot word/character completion events once their
    /// unit-scaled idle thresholds are crossed
    fn check_boundaries<const N: usize>(
        &mut self,
        now_ms: u32,
        idle_ms: u32,
        events: &mut Producer<'_, KeyerEvent, N>,
    ) {
        if idle_ms > WORD_GAP_UNITS * self.unit_ms && !self.boundary.word_done {
            self.boundary.word_done = true;
            events.enqueue(KeyerEvent::WordSpace).ok();
            self.pulse_activity(now_ms, events);
        }

        if idle_ms > CHAR_GAP_UNITS * self.unit_ms && !self.boundary.char_done {
            self.boundary.char_done = true;
            self.finish_character(now_ms, events);
        }
    }

    /// Decodes the pulse buffer and emits the completed character
    fn finish_character<const N: usize>(
        &mut self,
        now_ms: u32,
        events: &mut Producer<'_, KeyerEvent, N>,
    ) {
        let code = self.pattern();
        let decoded = self.table.decode(&code);

        match decoded {
            Some(Decoded::Shift) => {
                self.boundary.shift = true;
                events.enqueue(KeyerEvent::ShiftOn).ok();
            }
            Some(Decoded::Backspace) => {
                events.enqueue(KeyerEvent::Backspace).ok();
                self.pulse_activity(now_ms, events);
            }
            Some(Decoded::Char(ch)) => {
                let shifted = self.boundary.shift;
                if shifted {
                    self.boundary.shift = false;
                    events.enqueue(KeyerEvent::ShiftOff).ok();
                }
                events.enqueue(KeyerEvent::Character { ch, shifted }).ok();
                self.pulse_activity(now_ms, events);
                #[cfg(feature = "defmt")]
                defmt::debug!("decoded '{}' shifted={}", ch, shifted);
            }
            None => {}
        }

        // Characters that produce no text never earn a trailing word space.
        match decoded {
            None | Some(Decoded::Shift) | Some(Decoded::Backspace) | Some(Decoded::Char(' ')) => {
                self.boundary.word_done = true;
            }
            Some(Decoded::Char(_)) => {}
        }

        self.pulses.clear();
    }

    /// Classifies buffered pulses against the current unit time
    fn pattern(&self) -> String<PULSE_CAPACITY> {
        let mut code = String::new();
        let dash_floor = self.config.dash_threshold * self.unit_ms as f32;
        for &pulse in self.pulses.as_slice() {
            let symbol = if (pulse as f32) < dash_floor {
                Symbol::Dot
            } else {
                Symbol::Dash
            };
            let _ = code.push(symbol.glyph());
        }
        code
    }

    /// Arms the brief key-activity indicator pulse
    fn pulse_activity<const N: usize>(
        &mut self,
        now_ms: u32,
        events: &mut Producer<'_, KeyerEvent, N>,
    ) {
        events.enqueue(KeyerEvent::ActivityOn).ok();
        self.activity.set_tag(true);
        self.activity.arm(now_ms, ACTIVITY_PULSE_MS);
    }

    /// Turns timed indicators off once their pulses elapse
    fn service_indicators<const N: usize>(
        &mut self,
        now_ms: u32,
        events: &mut Producer<'_, KeyerEvent, N>,
    ) {
        if *self.sidetone.tag() && self.sidetone.is_due(now_ms) {
            self.sidetone.set_tag(false);
            events.enqueue(KeyerEvent::SidetoneOff).ok();
        }
        if *self.activity.tag() && self.activity.is_due(now_ms) {
            self.activity.set_tag(false);
            events.enqueue(KeyerEvent::ActivityOff).ok();
        }
    }
}

/// Async polling task driving [`Keyer::tick`] at the configured cadence
#[cfg(feature = "embassy-time")]
pub async fn keyer_task<const N: usize>(
    input: &PaddleInput,
    mut events: Producer<'_, KeyerEvent, N>,
    config: KeyerConfig,
) {
    use embassy_time::{Duration, Instant, Timer};

    let mut keyer = Keyer::new(config);
    let interval = Duration::from_millis(config.poll_interval_ms as u64);

    loop {
        let now_ms = Instant::now().as_millis() as u32;
        keyer.tick(now_ms, input, &mut events);
        Timer::after(interval).await;
    }
}
