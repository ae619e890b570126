//! Character/word boundary detection and the shift/backspace flows

#[cfg(test)]
mod tests {
    use telekey_core::test_utils::script::{manual_presses, run_script, transcript, Captured};
    use telekey_core::{KeyerConfig, KeyerEvent};

    fn characters(captured: &[Captured]) -> Vec<(char, bool)> {
        captured
            .iter()
            .filter_map(|c| match c.event {
                KeyerEvent::Character { ch, shifted } => Some((ch, shifted)),
                _ => None,
            })
            .collect()
    }

    fn count(captured: &[Captured], event: KeyerEvent) -> usize {
        captured.iter().filter(|c| c.event == event).count()
    }

    #[test]
    fn boundaries_fire_exactly_once_per_idle_period() {
        // A single dot, then idle held far beyond both thresholds across
        // hundreds of polling cycles.
        let steps = manual_presses(&[(60, 5_000)]);
        let captured = run_script(KeyerConfig::default(), &steps, 5_000);

        assert_eq!(characters(&captured), [('e', false)]);
        assert_eq!(count(&captured, KeyerEvent::WordSpace), 1);
    }

    #[test]
    fn word_space_follows_character_at_nine_units() {
        let steps = manual_presses(&[(60, 1_000)]);
        let captured = run_script(KeyerConfig::default(), &steps, 1_200);

        let char_at = captured
            .iter()
            .find(|c| matches!(c.event, KeyerEvent::Character { .. }))
            .map(|c| c.at_ms)
            .unwrap();
        let space_at = captured
            .iter()
            .find(|c| c.event == KeyerEvent::WordSpace)
            .map(|c| c.at_ms)
            .unwrap();
        // Character past 3 units of idle, word space past 9.
        assert!(char_at > 60 + 180, "char at {char_at}");
        assert!(space_at > 60 + 540, "space at {space_at}");
        assert!(space_at > char_at);
    }

    #[test]
    fn shift_code_latches_and_shifts_the_next_character() {
        // Four dashes (the shift code), a character gap, then ".-".
        let steps = manual_presses(&[
            (180, 60),
            (180, 60),
            (180, 60),
            (180, 400),
            (60, 60),
            (180, 800),
        ]);
        let captured = run_script(KeyerConfig::default(), &steps, 4_000);

        assert_eq!(count(&captured, KeyerEvent::ShiftOn), 1);
        assert_eq!(count(&captured, KeyerEvent::ShiftOff), 1);
        assert_eq!(characters(&captured), [('a', true)]);
        // The shift code itself never earns a word space.
        let shift_on = captured
            .iter()
            .find(|c| c.event == KeyerEvent::ShiftOn)
            .map(|c| c.at_ms)
            .unwrap();
        assert!(captured
            .iter()
            .all(|c| c.event != KeyerEvent::WordSpace || c.at_ms > shift_on));
    }

    #[test]
    fn backspace_code_erases() {
        // "e", then the eight-dot correction sign.
        let mut presses = vec![(60, 400)];
        presses.extend([(60, 60); 7]);
        presses.push((60, 800));
        let steps = manual_presses(&presses);
        let captured = run_script(KeyerConfig::default(), &steps, 4_000);

        assert_eq!(count(&captured, KeyerEvent::Backspace), 1);
        assert_eq!(transcript(&captured), "");
    }

    #[test]
    fn unknown_code_is_dropped_silently() {
        // ".-.-" has no table entry: no character, and no trailing space.
        let steps = manual_presses(&[(60, 60), (180, 60), (60, 60), (180, 1_000)]);
        let captured = run_script(KeyerConfig::default(), &steps, 3_000);

        assert!(characters(&captured).is_empty(), "events: {captured:?}");
        assert_eq!(count(&captured, KeyerEvent::WordSpace), 0);
    }

    #[test]
    fn decoding_recovers_after_a_miss() {
        // An unknown code, then a clean "e".
        let steps = manual_presses(&[
            (60, 60),
            (180, 60),
            (60, 60),
            (180, 400),
            (60, 1_000),
        ]);
        let captured = run_script(KeyerConfig::default(), &steps, 3_500);

        assert_eq!(characters(&captured), [('e', false)]);
    }
}
