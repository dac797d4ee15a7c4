// Difficulty levels and their melody lengths

use std::fmt;

/// Difficulty level. The note-count table is total over the enum, so a
/// round can never start without a valid length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Elementary,
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [
        Difficulty::Elementary,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
    ];

    /// Notes per melody at this difficulty.
    pub fn note_count(self) -> usize {
        match self {
            Difficulty::Elementary => 1,
            Difficulty::Easy => 3,
            Difficulty::Medium => 5,
            Difficulty::Hard => 8,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Elementary => "Elementary",
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }

    /// Parse a difficulty name, case-insensitively. Unknown names fall
    /// back to Easy; this is the only lossy entry point and exists for
    /// config/CLI input.
    pub fn from_name(name: &str) -> Difficulty {
        Self::ALL
            .iter()
            .find(|d| d.label().eq_ignore_ascii_case(name))
            .copied()
            .unwrap_or_default()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
