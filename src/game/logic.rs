// Pure melody-matching rules
//
// Kept free of session state so every branch is directly testable. The
// session applies the verdicts and owns attempts/feedback/timing.

use crate::melody::Melody;
use crate::music::PitchClass;

/// Outcome of comparing accumulated user input against the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchVerdict {
    /// Some position differs (or input is longer than the melody)
    Mismatch,
    /// Input matches so far but the melody is not finished
    Prefix { matched: usize },
    /// Input equals the melody exactly
    Complete,
}

/// Compare user input against the melody, position by position.
///
/// An empty melody is complete by definition; any input against it is a
/// mismatch. An empty input against a non-empty melody is a (vacuous)
/// prefix of length zero.
pub fn check_melody_match(user_input: &[PitchClass], melody: &Melody) -> MatchVerdict {
    let target = melody.notes();

    if user_input.len() > target.len() {
        return MatchVerdict::Mismatch;
    }

    for (&sung, &expected) in user_input.iter().zip(target.iter()) {
        if sung != expected {
            return MatchVerdict::Mismatch;
        }
    }

    if user_input.len() == target.len() {
        MatchVerdict::Complete
    } else {
        MatchVerdict::Prefix {
            matched: user_input.len(),
        }
    }
}

/// Score awarded for a completed melody:
/// `multiplier * length * (1 + streak * 0.1)`, using the streak as it
/// stood before this completion. Awarded only on full completion.
pub fn calculate_score(melody_len: usize, streak: u32, multiplier: f64) -> f64 {
    multiplier * melody_len as f64 * (1.0 + streak as f64 * 0.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Difficulty;

    fn melody(notes: &[PitchClass]) -> Melody {
        Melody::new(notes.to_vec(), Difficulty::Easy)
    }

    #[test]
    fn test_prefix_progression() {
        use PitchClass::{C, E, G};
        let target = melody(&[C, E, G]);

        assert_eq!(
            check_melody_match(&[], &target),
            MatchVerdict::Prefix { matched: 0 }
        );
        assert_eq!(
            check_melody_match(&[C], &target),
            MatchVerdict::Prefix { matched: 1 }
        );
        assert_eq!(
            check_melody_match(&[C, E], &target),
            MatchVerdict::Prefix { matched: 2 }
        );
        assert_eq!(check_melody_match(&[C, E, G], &target), MatchVerdict::Complete);
    }

    #[test]
    fn test_mismatch_positions() {
        use PitchClass::{C, D, E, G};
        let target = melody(&[C, E, G]);

        // Wrong first note
        assert_eq!(check_melody_match(&[D], &target), MatchVerdict::Mismatch);
        // Wrong middle note
        assert_eq!(check_melody_match(&[C, D], &target), MatchVerdict::Mismatch);
        // Wrong last note
        assert_eq!(
            check_melody_match(&[C, E, D], &target),
            MatchVerdict::Mismatch
        );
        // Too long
        assert_eq!(
            check_melody_match(&[C, E, G, C], &target),
            MatchVerdict::Mismatch
        );
    }

    #[test]
    fn test_empty_melody_terminal() {
        use PitchClass::C;
        let target = melody(&[]);

        // Complete with no input, unmatchable with any
        assert_eq!(check_melody_match(&[], &target), MatchVerdict::Complete);
        assert_eq!(check_melody_match(&[C], &target), MatchVerdict::Mismatch);
    }

    #[test]
    fn test_calculate_score() {
        assert_eq!(calculate_score(3, 0, 10.0), 30.0);
        assert_eq!(calculate_score(3, 1, 10.0), 33.0);
        assert!((calculate_score(5, 3, 10.0) - 65.0).abs() < 1e-9);
        assert_eq!(calculate_score(0, 5, 10.0), 0.0);
    }
}
