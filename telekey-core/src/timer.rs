//! Wraparound-safe countdown timers

/// A polled countdown with an attached state tag.
///
/// Deadlines are absolute `u32` millisecond timestamps and all comparisons
/// use wrapping subtraction, so a monotonic clock rollover after extended
/// uptime never produces a false due/not-due reading. The signed window is
/// ±2^31 ms (~24 days), far beyond any armed duration.
#[derive(Copy, Clone, Debug)]
pub struct Countdown<T> {
    deadline: u32,
    tag: T,
}

impl<T> Countdown<T> {
    pub const fn new(tag: T) -> Self {
        Self { deadline: 0, tag }
    }

    /// Sets the deadline to `now + duration`
    pub fn arm(&mut self, now_ms: u32, duration_ms: u32) {
        self.deadline = now_ms.wrapping_add(duration_ms);
    }

    /// Signed time since the deadline; negative while not yet due
    pub fn elapsed(&self, now_ms: u32) -> i32 {
        now_ms.wrapping_sub(self.deadline) as i32
    }

    pub fn is_due(&self, now_ms: u32) -> bool {
        self.elapsed(now_ms) >= 0
    }

    pub fn tag(&self) -> &T {
        &self.tag
    }

    pub fn set_tag(&mut self, tag: T) {
        self.tag = tag;
    }
}
