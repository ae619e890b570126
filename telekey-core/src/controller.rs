//! Shared input-line state between edge sources and the polling cycle

use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use crate::types::{LineLevels, PaddleSide};

/// Atomic input-line state for the two paddles and the mode-select line.
/// Safe to update from interrupt context; the polling cycle only snapshots.
pub struct PaddleInput {
    dot_active: AtomicBool,
    dash_active: AtomicBool,
    automatic: AtomicBool,
    dot_last_edge: AtomicU32,
    dash_last_edge: AtomicU32,
}

impl PaddleInput {
    pub const fn new() -> Self {
        Self {
            dot_active: AtomicBool::new(false),
            dash_active: AtomicBool::new(false),
            automatic: AtomicBool::new(false),
            dot_last_edge: AtomicU32::new(0),
            dash_last_edge: AtomicU32::new(0),
        }
    }

    /// Updates one paddle line. Edges inside the debounce window are
    /// dropped; pass a zero window to accept every edge.
    pub fn update(&self, side: PaddleSide, active: bool, now_ms: u32, debounce_ms: u32) {
        let (line, edge) = match side {
            PaddleSide::Dot => (&self.dot_active, &self.dot_last_edge),
            PaddleSide::Dash => (&self.dash_active, &self.dash_last_edge),
        };
        let last = edge.load(Ordering::Relaxed);
        if line.load(Ordering::Relaxed) != active && now_ms.wrapping_sub(last) >= debounce_ms {
            line.store(active, Ordering::Relaxed);
            edge.store(now_ms, Ordering::Relaxed);
        }
    }

    /// Updates the mode-select line (active = automatic)
    pub fn set_automatic(&self, automatic: bool) {
        self.automatic.store(automatic, Ordering::Relaxed);
    }

    pub fn dot(&self) -> bool {
        self.dot_active.load(Ordering::Relaxed)
    }

    pub fn dash(&self) -> bool {
        self.dash_active.load(Ordering::Relaxed)
    }

    pub fn automatic(&self) -> bool {
        self.automatic.load(Ordering::Relaxed)
    }

    /// Coherent-enough snapshot for one polling cycle
    pub fn levels(&self) -> LineLevels {
        LineLevels {
            dot: self.dot(),
            dash: self.dash(),
            automatic: self.automatic(),
        }
    }

    /// Reset all line state (for testing)
    #[cfg(feature = "test-utils")]
    pub fn reset(&self) {
        self.dot_active.store(false, Ordering::Relaxed);
        self.dash_active.store(false, Ordering::Relaxed);
        self.automatic.store(false, Ordering::Relaxed);
        self.dot_last_edge.store(0, Ordering::Relaxed);
        self.dash_last_edge.store(0, Ordering::Relaxed);
    }
}

impl Default for PaddleInput {
    fn default() -> Self {
        Self::new()
    }
}
