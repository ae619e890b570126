//! Adaptive unit-time (dot length) estimation
//!
//! A pulse length on its own is ambiguous: 60 ms is a dot at 60 ms/unit or
//! a dash at 20 ms/unit. Only the ratio between adjacent pulses
//! disambiguates, so classification here is relative, never absolute.

use crate::types::Symbol;

/// Estimates the dot duration from a sequence of raw key-down pulses.
///
/// Walks the sequence classifying each pulse against its predecessor: a jump
/// past `threshold` x previous marks a transition into dash, a drop below
/// previous / `threshold` marks a transition into dot, anything else
/// continues the established kind. Pulses seen before the first transition
/// are retroactively classified as the opposite kind once one is found.
/// Dot pulses contribute their raw duration, dash pulses contribute
/// `duration / dash_ratio`; the result is the floor of the mean.
///
/// Returns `None` when no transition is detectable (a single pulse, or all
/// pulses within ratio `threshold` of each other). Callers must keep their
/// previous estimate in that case, and clamp a defined result to the
/// configured floor.
pub fn estimate_unit(pulses: &[u32], dash_ratio: f32, threshold: f32) -> Option<u32> {
    let mut kind: Option<Symbol> = None;
    let mut sum = 0.0f32;
    let mut count = 0u32;
    let mut prev: Option<u32> = None;

    for (i, &pulse) in pulses.iter().enumerate() {
        if let Some(prev) = prev {
            if pulse as f32 > threshold * prev as f32 {
                if kind.is_none() {
                    // Everything before the first dash was a dot.
                    for &earlier in &pulses[..i] {
                        sum += earlier as f32;
                        count += 1;
                    }
                }
                kind = Some(Symbol::Dash);
            } else if (pulse as f32) < prev as f32 / threshold {
                if kind.is_none() {
                    // Everything before the first dot was a dash.
                    for &earlier in &pulses[..i] {
                        sum += earlier as f32 / dash_ratio;
                        count += 1;
                    }
                }
                kind = Some(Symbol::Dot);
            }
        }

        if let Some(kind) = kind {
            sum += match kind {
                Symbol::Dot => pulse as f32,
                Symbol::Dash => pulse as f32 / dash_ratio,
            };
            count += 1;
        }
        prev = Some(pulse);
    }

    if count > 0 {
        Some((sum / count as f32) as u32)
    } else {
        None
    }
}
