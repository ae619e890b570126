//! Deterministic simulation utilities for driving the keyer from scripts

pub mod script {
    //! Script-driven keyer simulation
    //!
    //! A script is a list of absolute-time line-level changes. The runner
    //! ticks the keyer at the configured polling cadence, applying changes
    //! as their time comes due and capturing every emitted event with its
    //! timestamp.

    use heapless::spsc::Queue;
    use std::vec::Vec;

    use crate::controller::PaddleInput;
    use crate::fsm::Keyer;
    use crate::types::{KeyerConfig, KeyerEvent, PaddleSide};

    /// Line levels taking effect at an absolute time
    #[derive(Debug, Clone, Copy)]
    pub struct ScriptStep {
        pub at_ms: u32,
        pub dot: bool,
        pub dash: bool,
        pub automatic: bool,
    }

    /// One captured event with the cycle it was emitted in
    #[derive(Debug, Clone, PartialEq)]
    pub struct Captured {
        pub at_ms: u32,
        pub event: KeyerEvent,
    }

    /// Runs a level script against a fresh keyer until `until_ms`
    pub fn run_script(config: KeyerConfig, steps: &[ScriptStep], until_ms: u32) -> Vec<Captured> {
        let input = PaddleInput::new();
        let mut keyer = Keyer::new(config);
        let mut queue: Queue<KeyerEvent, 64> = Queue::new();
        let (mut producer, mut consumer) = queue.split();

        let mut captured = Vec::new();
        let mut next = 0usize;
        let mut now = 0u32;
        while now <= until_ms {
            while next < steps.len() && steps[next].at_ms <= now {
                let step = steps[next];
                input.update(PaddleSide::Dot, step.dot, now, 0);
                input.update(PaddleSide::Dash, step.dash, now, 0);
                input.set_automatic(step.automatic);
                next += 1;
            }
            keyer.tick(now, &input, &mut producer);
            while let Some(event) = consumer.dequeue() {
                captured.push(Captured { at_ms: now, event });
            }
            now += config.poll_interval_ms;
        }
        captured
    }

    /// Builds a manual-mode script from (key-down, gap) duration pairs
    pub fn manual_presses(presses: &[(u32, u32)]) -> Vec<ScriptStep> {
        let mut steps = Vec::new();
        let mut t = 0u32;
        for &(down_ms, gap_ms) in presses {
            steps.push(ScriptStep {
                at_ms: t,
                dot: true,
                dash: false,
                automatic: false,
            });
            t += down_ms;
            steps.push(ScriptStep {
                at_ms: t,
                dot: false,
                dash: false,
                automatic: false,
            });
            t += gap_ms;
        }
        steps
    }

    /// Collects the decoded character stream, spaces included
    pub fn transcript(captured: &[Captured]) -> std::string::String {
        let mut out = std::string::String::new();
        for c in captured {
            match c.event {
                KeyerEvent::Character { ch, shifted } => {
                    if shifted {
                        out.extend(ch.to_uppercase());
                    } else {
                        out.push(ch);
                    }
                }
                KeyerEvent::WordSpace => out.push(' '),
                KeyerEvent::Backspace => {
                    out.pop();
                }
                _ => {}
            }
        }
        out
    }

    /// Pairs sidetone on/off edges into (start, duration) pulses
    pub fn sidetone_pulses(captured: &[Captured]) -> Vec<(u32, u32)> {
        let mut pulses = Vec::new();
        let mut start: Option<u32> = None;
        for c in captured {
            match c.event {
                KeyerEvent::SidetoneOn => start = Some(c.at_ms),
                KeyerEvent::SidetoneOff => {
                    if let Some(on) = start.take() {
                        pulses.push((on, c.at_ms.wrapping_sub(on)));
                    }
                }
                _ => {}
            }
        }
        pulses
    }
}
