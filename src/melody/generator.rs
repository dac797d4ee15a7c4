// Melody generation: interval-biased random walk over the chromatic scale
//
// Two bounded retry loops keep generation total: a per-step cap when an
// interval step cannot reach a fresh index, and a whole-sequence cap
// against the history. Exhausting either degrades gracefully (repeat
// note / duplicate melody) instead of failing the round.

use log::warn;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::game::Difficulty;
use crate::music::{INTERVALS, PitchClass};

use super::history::MelodyHistory;
use super::melody::Melody;

/// Whole-sequence retries before accepting a duplicate melody.
const MAX_UNIQUE_ATTEMPTS: usize = 100;

/// Per-step retries before accepting a repeated note.
const MAX_INTERVAL_ATTEMPTS: usize = 10;

pub struct MelodyGenerator {
    history: MelodyHistory,
    rng: StdRng,
}

impl MelodyGenerator {
    pub fn new() -> Self {
        Self::with_history(MelodyHistory::new())
    }

    pub fn with_history(history: MelodyHistory) -> Self {
        Self {
            history,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            history: MelodyHistory::new(),
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn history(&self) -> &MelodyHistory {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Generate a melody for a difficulty: random start, then one random
    /// non-unison interval per step, direction chosen at random.
    pub fn generate(&mut self, difficulty: Difficulty) -> Melody {
        let count = difficulty.note_count();
        self.generate_unique(Some(difficulty), |g| {
            let mut notes = Vec::with_capacity(count);
            let mut current = g.rng.gen_range(0..PitchClass::ALL.len());

            for i in 0..count {
                notes.push(PitchClass::ALL[current]);
                if i + 1 < count {
                    current = g.step_interval(current);
                }
            }

            notes
        })
    }

    /// Generate a melody with one uniformly random note per position,
    /// independent of interval logic. Same uniqueness contract.
    pub fn generate_random(&mut self, length: usize) -> Melody {
        self.generate_unique(None, |g| {
            (0..length)
                .map(|_| PitchClass::ALL[g.rng.gen_range(0..PitchClass::ALL.len())])
                .collect()
        })
    }

    /// Run `build` until it yields a melody not yet in the history, up to
    /// the retry cap. On exhaustion the duplicate is accepted with a
    /// warning. Every accepted melody is recorded.
    fn generate_unique<F>(&mut self, difficulty: Option<Difficulty>, mut build: F) -> Melody
    where
        F: FnMut(&mut Self) -> Vec<PitchClass>,
    {
        let wrap = |notes: Vec<PitchClass>| match difficulty {
            Some(d) => Melody::new(notes, d),
            None => Melody::untagged(notes),
        };

        let mut melody = wrap(build(self));

        for attempt in 1..MAX_UNIQUE_ATTEMPTS {
            if !self.history.contains(&melody) {
                break;
            }
            melody = wrap(build(self));
            if attempt + 1 == MAX_UNIQUE_ATTEMPTS && self.history.contains(&melody) {
                warn!(
                    "no unique melody after {MAX_UNIQUE_ATTEMPTS} attempts, accepting duplicate {melody}"
                );
            }
        }

        self.history.record(&melody);
        melody
    }

    /// Step from `current` by a random non-unison interval. Out-of-range
    /// steps fall back in order: opposite direction, modulo wrap, random
    /// fresh index. Bounded retries; a repeat of `current` is accepted
    /// only after the retries run out.
    fn step_interval(&mut self, current: usize) -> usize {
        let len = PitchClass::ALL.len() as i32;
        let current = current as i32;

        for _ in 0..MAX_INTERVAL_ATTEMPTS {
            // Skip index 0, the unison, to avoid immediate repeats
            let semitones = INTERVALS[self.rng.gen_range(1..INTERVALS.len())].semitones;
            let direction: i32 = if self.rng.gen_bool(0.5) { 1 } else { -1 };
            let mut next = current + semitones * direction;

            if next >= len {
                next = current - semitones;
                if next < 0 {
                    next = (current + semitones) % len;
                }
            } else if next < 0 {
                next = current + semitones;
                if next >= len {
                    next = (current - semitones + len) % len;
                }
            }

            if !(0..len).contains(&next) {
                next = self.rng.gen_range(0..len);
            }

            if next != current {
                return next as usize;
            }
        }

        // Retries exhausted: pick any different index directly
        loop {
            let next = self.rng.gen_range(0..len);
            if next != current {
                return next as usize;
            }
        }
    }
}

impl Default for MelodyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_length_by_difficulty() {
        let mut generator = MelodyGenerator::with_seed(7);
        assert_eq!(generator.generate(Difficulty::Elementary).len(), 1);
        assert_eq!(generator.generate(Difficulty::Easy).len(), 3);
        assert_eq!(generator.generate(Difficulty::Medium).len(), 5);
        assert_eq!(generator.generate(Difficulty::Hard).len(), 8);
    }

    #[test]
    fn test_no_immediate_repeats() {
        let mut generator = MelodyGenerator::with_seed(11);
        for _ in 0..20 {
            let melody = generator.generate(Difficulty::Hard);
            for pair in melody.notes().windows(2) {
                assert_ne!(pair[0], pair[1], "adjacent repeat in {melody}");
            }
        }
    }

    #[test]
    fn test_uniqueness_across_session() {
        let mut generator = MelodyGenerator::with_seed(23);
        let mut seen = HashSet::new();

        for _ in 0..50 {
            let melody = generator.generate(Difficulty::Medium);
            assert!(seen.insert(melody.signature()), "duplicate {melody}");
        }
        assert_eq!(generator.history().len(), 50);
    }

    #[test]
    fn test_generate_random_uniqueness() {
        let mut generator = MelodyGenerator::with_seed(31);
        let mut seen = HashSet::new();

        for _ in 0..50 {
            let melody = generator.generate_random(5);
            assert_eq!(melody.len(), 5);
            assert!(seen.insert(melody.signature()), "duplicate {melody}");
        }
    }

    #[test]
    fn test_history_reset() {
        let mut generator = MelodyGenerator::with_seed(43);
        generator.generate(Difficulty::Easy);
        assert_eq!(generator.history().len(), 1);

        generator.clear_history();
        assert!(generator.history().is_empty());
    }

    #[test]
    fn test_duplicate_accepted_when_space_exhausted() {
        // Elementary melodies have 12 possible values; generating more
        // than 12 must not loop forever and keeps recording history.
        let mut generator = MelodyGenerator::with_seed(5);
        for _ in 0..20 {
            let melody = generator.generate(Difficulty::Elementary);
            assert_eq!(melody.len(), 1);
        }
        assert!(generator.history().len() <= 12);
    }

    #[test]
    fn test_steps_are_valid_indices() {
        let mut generator = MelodyGenerator::with_seed(3);
        for start in 0..12 {
            for _ in 0..50 {
                let next = generator.step_interval(start);
                assert!(next < 12);
                assert_ne!(next, start);
            }
        }
    }
}
