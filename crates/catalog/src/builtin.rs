//! Built-in exercises shipped with the trainer.

use diktat_transcript::{Exercise, MediaRef, Segment};

/// The static audio exercise set.
pub fn builtin_exercises() -> Vec<Exercise> {
    vec![
        Exercise {
            id: "a1-1".to_string(),
            title: "Begrüßung".to_string(),
            level: "A1".to_string(),
            media: MediaRef::Audio {
                url: "audio/a1-1.mp3".to_string(),
            },
            segments: vec![
                Segment::new("Guten Tag!", 0.0, 1.5),
                Segment::new("Wie geht es Ihnen?", 2.0, 4.0),
            ],
        },
        Exercise {
            id: "a1-2".to_string(),
            title: "Sich vorstellen".to_string(),
            level: "A1".to_string(),
            media: MediaRef::Audio {
                url: "audio/a1-2.mp3".to_string(),
            },
            segments: vec![
                Segment::new("Ich heiße Anna.", 0.0, 2.0),
                Segment::new("Ich komme aus Deutschland.", 3.0, 5.0),
            ],
        },
        Exercise {
            id: "a2-1".to_string(),
            title: "Einkaufen".to_string(),
            level: "A2".to_string(),
            media: MediaRef::Audio {
                url: "audio/a2-1.mp3".to_string(),
            },
            segments: vec![
                Segment::new("Wie viel kostet das?", 0.0, 2.0),
                Segment::new("Das kostet 10 Euro.", 3.0, 5.0),
            ],
        },
    ]
}

/// The static video exercise set.
pub fn builtin_video_exercises() -> Vec<Exercise> {
    vec![Exercise {
        id: "video-a1-1".to_string(),
        title: "Begrüßung (Video)".to_string(),
        level: "A1".to_string(),
        media: MediaRef::Video {
            video_id: "wtMUy_3NGl4".to_string(),
            window_start: Some(0.0),
            window_end: Some(60.0),
        },
        segments: vec![
            Segment::new("Guten Tag!", 0.0, 2.0).with_translation("Good day!"),
            Segment::new("Wie geht es Ihnen?", 2.0, 4.0).with_translation("How are you?"),
        ],
    }]
}
