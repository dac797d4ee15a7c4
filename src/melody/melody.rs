// Melody - an ordered, fixed-length sequence of pitch classes

use std::fmt;

use crate::game::Difficulty;
use crate::music::PitchClass;

/// A target melody for one round. The note sequence is fixed at
/// construction; the session owns it for the round and drops it after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Melody {
    notes: Vec<PitchClass>,
    difficulty: Option<Difficulty>,
}

impl Melody {
    pub fn new(notes: Vec<PitchClass>, difficulty: Difficulty) -> Self {
        Self {
            notes,
            difficulty: Some(difficulty),
        }
    }

    /// A melody without a difficulty tag (free-form generation, tests).
    pub fn untagged(notes: Vec<PitchClass>) -> Self {
        Self {
            notes,
            difficulty: None,
        }
    }

    pub fn notes(&self) -> &[PitchClass] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    /// Canonical signature used for history lookups: note names joined
    /// with '-', e.g. "C-D#-G".
    pub fn signature(&self) -> String {
        self.notes
            .iter()
            .map(|pc| pc.name())
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl fmt::Display for Melody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.signature())
    }
}
