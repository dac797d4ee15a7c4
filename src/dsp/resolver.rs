// Note resolution: frequency estimates -> one pitch class per attempt
//
// Raw per-callback pitch estimates are jittery. A RecordingWindow
// accumulates them for a short fixed duration and resolves the average to
// the nearest pitch class, so the match engine sees one note per attempt
// instead of one per audio callback.

use std::time::{Duration, Instant};

use crate::music::{Note, PitchClass};

/// Nearest chromatic pitch class for a frequency, at any octave.
/// None outside the valid frequency range.
pub fn closest_pitch_class(frequency: f64) -> Option<PitchClass> {
    Note::from_frequency(frequency).ok().map(|n| n.pitch_class())
}

/// Arithmetic mean of the valid entries (finite and positive), or None
/// when no valid entries remain.
pub fn average_frequency(samples: &[f32]) -> Option<f32> {
    let mut sum = 0.0f64;
    let mut count = 0usize;

    for &sample in samples {
        if sample.is_finite() && sample > 0.0 {
            sum += sample as f64;
            count += 1;
        }
    }

    if count == 0 {
        None
    } else {
        Some((sum / count as f64) as f32)
    }
}

/// A short accumulation period for pitch estimates.
///
/// Opened when the session starts waiting for a note, fed one estimate per
/// capture callback, and resolved once the deadline passes. At most one
/// window is open at a time; the session's re-entrancy guard enforces that.
#[derive(Debug)]
pub struct RecordingWindow {
    samples: Vec<f32>,
    deadline: Instant,
}

impl RecordingWindow {
    pub fn open(now: Instant, duration: Duration) -> Self {
        Self {
            samples: Vec::new(),
            deadline: now + duration,
        }
    }

    pub fn push(&mut self, frequency: f32) {
        self.samples.push(frequency);
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Average the collected estimates and map them to the nearest pitch
    /// class. None when nothing usable was collected.
    pub fn resolve(&self) -> Option<PitchClass> {
        let mean = average_frequency(&self.samples)?;
        closest_pitch_class(mean as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_pitch_class() {
        assert_eq!(closest_pitch_class(440.0), Some(PitchClass::A));
        assert_eq!(closest_pitch_class(261.63), Some(PitchClass::C));
        // Slightly sharp A is still A
        assert_eq!(closest_pitch_class(448.0), Some(PitchClass::A));
        assert_eq!(closest_pitch_class(5.0), None);
        assert_eq!(closest_pitch_class(25_000.0), None);
    }

    #[test]
    fn test_average_frequency() {
        assert_eq!(average_frequency(&[440.0, 442.0]), Some(441.0));
        assert_eq!(average_frequency(&[]), None);

        // Invalid entries are dropped, not averaged in
        let samples = [440.0, -1.0, 0.0, f32::NAN, f32::INFINITY, 444.0];
        assert_eq!(average_frequency(&samples), Some(442.0));

        // Nothing valid left
        assert_eq!(average_frequency(&[-5.0, f32::NAN]), None);
    }

    #[test]
    fn test_window_resolution() {
        let start = Instant::now();
        let mut window = RecordingWindow::open(start, Duration::from_millis(100));

        window.push(438.0);
        window.push(441.0);
        window.push(443.0);

        assert!(!window.is_due(start + Duration::from_millis(50)));
        assert!(window.is_due(start + Duration::from_millis(100)));
        assert_eq!(window.sample_count(), 3);
        assert_eq!(window.resolve(), Some(PitchClass::A));
    }

    #[test]
    fn test_window_without_valid_samples() {
        let start = Instant::now();
        let mut window = RecordingWindow::open(start, Duration::from_millis(100));
        assert_eq!(window.resolve(), None);

        window.push(f32::NAN);
        window.push(-10.0);
        assert_eq!(window.resolve(), None);
    }
}
