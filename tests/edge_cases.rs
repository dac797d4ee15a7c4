//! Edge case tests and robustness validation
//!
//! Extreme and malformed inputs must never panic the core: the detector
//! eats NaN buffers, the session tolerates out-of-order calls, and the
//! note model rejects bad values with typed errors instead of aborting.

use melodine::config::Config;
use melodine::game::{Difficulty, GameSession, GameState};
use melodine::melody::{LogPlayer, MelodyGenerator};
use melodine::music::{Note, NoteError, PitchClass};
use melodine::{PitchDetector, average_frequency, closest_pitch_class};
use std::time::{Duration, Instant};

#[test]
fn detector_survives_hostile_buffers() {
    let mut detector = PitchDetector::default();

    let cases: Vec<Vec<f32>> = vec![
        vec![],
        vec![0.0],
        vec![f32::NAN; 2048],
        vec![f32::INFINITY; 2048],
        vec![f32::NEG_INFINITY; 2048],
        vec![1e30; 2048],
        vec![-1e-30; 2048],
    ];

    for buffer in cases {
        // Must not panic; any Some result must at least be finite
        if let Some(freq) = detector.detect(&buffer, 44_100.0) {
            assert!(freq.is_finite());
        }
    }
}

#[test]
fn detector_survives_hostile_sample_rates() {
    let mut detector = PitchDetector::default();
    let buffer = vec![0.5; 2048];

    for rate in [0.0, -44_100.0, f32::NAN, 1.0, 1e9] {
        if let Some(freq) = detector.detect(&buffer, rate) {
            assert!(freq.is_finite());
        }
    }
}

#[test]
fn resolver_rejects_degenerate_frequencies() {
    assert_eq!(closest_pitch_class(0.0), None);
    assert_eq!(closest_pitch_class(-440.0), None);
    assert_eq!(closest_pitch_class(f64::NAN), None);
    assert_eq!(closest_pitch_class(f64::INFINITY), None);

    assert_eq!(average_frequency(&[f32::NAN, f32::INFINITY, -1.0, 0.0]), None);
}

#[test]
fn note_model_rejects_bad_input_loudly() {
    assert!(matches!(
        PitchClass::from_name("Q"),
        Err(NoteError::InvalidNoteName(_))
    ));
    assert!(matches!(
        Note::new(PitchClass::C, 42),
        Err(NoteError::InvalidOctave(42))
    ));
    assert!(matches!(
        Note::from_midi(1000),
        Err(NoteError::InvalidMidiNote(1000))
    ));
    assert!(matches!(
        Note::from_frequency(0.0),
        Err(NoteError::FrequencyOutOfRange(_))
    ));
}

#[test]
fn generator_is_total_over_difficulties() {
    let mut generator = MelodyGenerator::with_seed(1);
    for _ in 0..200 {
        for difficulty in Difficulty::ALL {
            let melody = generator.generate(difficulty);
            assert_eq!(melody.len(), difficulty.note_count());
        }
    }
}

#[test]
fn session_tolerates_out_of_order_calls() {
    let mut player = LogPlayer::new();
    let mut session = GameSession::with_generator(
        Difficulty::Easy,
        Config::default(),
        MelodyGenerator::with_seed(9),
    );
    let t0 = Instant::now();

    // Everything before play_melody is a no-op
    session.stop();
    session.stop();
    session.replay(&mut player, t0);
    session.note_detected(PitchClass::C, t0);
    session.process_pitch(Some(440.0), t0);
    session.tick(&mut player, t0);
    assert_eq!(session.state(), GameState::Idle);
    assert_eq!(player.scheduled(), 0);

    // play twice in a row: second call restarts the round
    session.play_melody(&mut player, t0);
    session.play_melody(&mut player, t0 + Duration::from_millis(100));
    assert_eq!(player.scheduled(), 2);
    assert_eq!(session.state(), GameState::Playing);
    assert_eq!(session.attempts_left(), 3);

    // Ticking far in the future lands in listening exactly once
    session.tick(&mut player, t0 + Duration::from_secs(60));
    assert_eq!(session.state(), GameState::Listening);
}

#[test]
fn session_ignores_garbage_pitch_values() {
    let mut player = LogPlayer::new();
    let mut session = GameSession::with_generator(
        Difficulty::Easy,
        Config::default(),
        MelodyGenerator::with_seed(13),
    );
    let t0 = Instant::now();

    session.play_melody(&mut player, t0);
    session.tick(&mut player, t0 + Duration::from_millis(2000));
    assert_eq!(session.state(), GameState::Listening);

    // Degenerate estimates accumulate but never resolve to a note
    let mut t = t0 + Duration::from_millis(2000);
    for garbage in [f32::NAN, f32::INFINITY, -440.0, 0.0, 1e9] {
        t += Duration::from_millis(46);
        session.process_pitch(Some(garbage), t);
    }
    t += Duration::from_millis(200);
    session.process_pitch(Some(f32::NAN), t);

    assert!(session.user_input().is_empty());
    assert_eq!(session.attempts_left(), 3);
}

#[test]
fn history_exhaustion_degrades_gracefully() {
    // Length-1 melodies only have 12 possibilities; past that the
    // generator must accept duplicates instead of hanging
    let mut generator = MelodyGenerator::with_seed(99);
    for _ in 0..100 {
        let melody = generator.generate(Difficulty::Elementary);
        assert_eq!(melody.len(), 1);
    }
    assert!(generator.history().len() <= 12);
}
