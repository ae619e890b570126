//! Mode-select line behavior

#[cfg(test)]
mod tests {
    use telekey_core::test_utils::script::{run_script, ScriptStep};
    use telekey_core::{KeyerConfig, KeyerEvent, KeyerMode};

    fn step(at_ms: u32, dot: bool, automatic: bool) -> ScriptStep {
        ScriptStep {
            at_ms,
            dot,
            dash: false,
            automatic,
        }
    }

    #[test]
    fn initial_mode_is_announced() {
        let captured = run_script(KeyerConfig::default(), &[], 100);
        let modes: Vec<KeyerMode> = captured
            .iter()
            .filter_map(|c| match c.event {
                KeyerEvent::Mode(m) => Some(m),
                _ => None,
            })
            .collect();
        assert_eq!(modes, [KeyerMode::Manual]);
    }

    #[test]
    fn mode_changes_announce_once_per_edge() {
        let steps = [step(0, false, false), step(200, false, true), step(600, false, false)];
        let captured = run_script(KeyerConfig::default(), &steps, 1_000);

        let modes: Vec<KeyerMode> = captured
            .iter()
            .filter_map(|c| match c.event {
                KeyerEvent::Mode(m) => Some(m),
                _ => None,
            })
            .collect();
        assert_eq!(
            modes,
            [KeyerMode::Manual, KeyerMode::Automatic, KeyerMode::Manual]
        );
    }

    #[test]
    fn switching_mid_press_forces_sidetone_off() {
        // Manual press in flight when the mode line flips.
        let steps = [step(0, true, false), step(50, true, true), step(80, false, true)];
        let captured = run_script(KeyerConfig::default(), &steps, 300);

        let switch_at = captured
            .iter()
            .find(|c| c.event == KeyerEvent::Mode(KeyerMode::Automatic))
            .map(|c| c.at_ms)
            .unwrap();
        assert!(captured
            .iter()
            .any(|c| c.at_ms == switch_at && c.event == KeyerEvent::SidetoneOff));
    }
}
