//! End-to-end decode sessions through the manual keyer

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use telekey_core::test_utils::script::{manual_presses, run_script, transcript};
    use telekey_core::KeyerConfig;

    /// Key down 60 ms, up 60 ms, down 180 ms at the default 60 ms unit,
    /// then idle; ".-" decodes to 'a'.
    #[test]
    fn dot_dash_decodes_to_a() {
        let steps = manual_presses(&[(60, 60), (180, 400)]);
        // Stop before the nine-unit word gap elapses.
        let captured = run_script(KeyerConfig::default(), &steps, 700);
        assert_eq!(transcript(&captured), "a");
    }

    #[rstest]
    #[case::single_dot(&[(60, 800)], "e ")]
    #[case::single_dash(&[(180, 900)], "t ")]
    #[case::dot_dot_dot(&[(60, 60), (60, 60), (60, 800)], "s ")]
    fn single_characters_with_word_space(
        #[case] presses: &[(u32, u32)],
        #[case] expected: &str,
    ) {
        let steps = manual_presses(presses);
        let captured = run_script(KeyerConfig::default(), &steps, 3_000);
        assert_eq!(transcript(&captured), expected);
    }

    #[test]
    fn two_character_word() {
        // "hi": four dots, a character gap, two dots, then a long idle.
        let steps = manual_presses(&[
            (60, 60),
            (60, 60),
            (60, 60),
            (60, 300),
            (60, 60),
            (60, 800),
        ]);
        let captured = run_script(KeyerConfig::default(), &steps, 3_000);
        assert_eq!(transcript(&captured), "hi ");
    }

    /// The decoder follows an operator who keys faster than the default
    /// estimate: consistent ratios recalibrate the unit time.
    #[test]
    fn adapts_to_a_faster_fist() {
        // "a" at 30 ms/unit: the 30/90 ratio drives the estimate down,
        // and boundaries then scale with the new unit.
        let steps = manual_presses(&[(30, 30), (90, 600)]);
        let captured = run_script(KeyerConfig::default(), &steps, 1_500);
        assert_eq!(transcript(&captured), "a ");
    }
}
