//! Scripted keying sessions against the core, printed for inspection
//!
//! Run with `cargo run -p telekey-tests --bin simulate`.

use telekey_core::test_utils::script::{
    manual_presses, run_script, sidetone_pulses, transcript, ScriptStep,
};
use telekey_core::{KeyerConfig, KeyerEvent};

fn main() {
    manual_session();
    squeeze_session();
}

fn manual_session() {
    println!("=== Manual session: keying \"hi\" ===");
    let steps = manual_presses(&[
        (60, 60),
        (60, 60),
        (60, 60),
        (60, 300),
        (60, 60),
        (60, 800),
    ]);
    let captured = run_script(KeyerConfig::default(), &steps, 3_000);

    for c in &captured {
        match c.event {
            KeyerEvent::Character { ch, shifted } => {
                println!("{:>5} ms  char '{}' (shifted: {})", c.at_ms, ch, shifted);
            }
            KeyerEvent::WordSpace => println!("{:>5} ms  word space", c.at_ms),
            _ => {}
        }
    }
    println!("transcript: {:?}\n", transcript(&captured));
}

fn squeeze_session() {
    println!("=== Automatic session: squeeze for 500 ms ===");
    let steps = [
        ScriptStep {
            at_ms: 0,
            dot: true,
            dash: true,
            automatic: true,
        },
        ScriptStep {
            at_ms: 500,
            dot: false,
            dash: false,
            automatic: true,
        },
    ];
    let captured = run_script(KeyerConfig::default(), &steps, 2_000);

    for (start, duration) in sidetone_pulses(&captured) {
        let symbol = if duration >= 120 { "dash" } else { "dot" };
        println!("{start:>5} ms  {symbol} ({duration} ms)");
    }
    println!("transcript: {:?}", transcript(&captured));
}
