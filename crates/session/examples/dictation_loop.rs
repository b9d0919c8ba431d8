//! Example: run a dictation exercise headless against the virtual player.
//!
//! Run with: cargo run -p diktat-session --example dictation_loop

use diktat_playback::VirtualPlayer;
use diktat_session::{KeyBindings, Phase, Session, SubmitOutcome};
use diktat_transcript::{Exercise, MediaRef, Segment};
use std::sync::Arc;
use std::time::Duration;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("diktat_session=debug,diktat_playback=debug")
        .init();

    let exercise = Exercise {
        id: "a1-1".to_string(),
        title: "Begrüßung".to_string(),
        level: "A1".to_string(),
        media: MediaRef::Audio {
            url: "audio/a1-1.mp3".to_string(),
        },
        segments: vec![
            Segment::new("Guten Tag!", 0.0, 1.5).with_translation("Good day!"),
            Segment::new("Wie geht es Ihnen?", 2.0, 4.0).with_translation("How are you?"),
        ],
    };

    let mut session = Session::new(Arc::new(VirtualPlayer::new(60.0)), KeyBindings::default());
    session.load_exercise(exercise);

    let attempts = ["guten tag", "guten tag!", "wie geht es ihnen?"];
    for attempt in attempts {
        println!(
            "segment {}/{}: typing {attempt:?}",
            session.current_index() + 1,
            session.segment_count()
        );
        session.replay();
        std::thread::sleep(Duration::from_millis(50));

        session.input_changed(attempt);
        match session.submit() {
            SubmitOutcome::Correct { advanced } => {
                println!("  correct (advanced: {advanced})");
            }
            SubmitOutcome::Incorrect => {
                let reference = session
                    .current_segment()
                    .map(|s| s.text.clone())
                    .unwrap_or_default();
                println!("  incorrect, reference revealed: {reference:?}");
            }
            SubmitOutcome::NoSegment => println!("  nothing to check"),
        }
    }

    assert_eq!(session.phase(), Phase::Answering);
    session.unload();
    println!("done.");
}
