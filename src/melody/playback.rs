// Playback collaborator contract
//
// The core never synthesizes audio itself. It hands the melody to a
// MelodyPlayer (fire-and-forget) and computes the total playback duration
// so the session knows when to start listening.

use std::time::Duration;

use log::info;

use super::melody::Melody;

/// Octave the playback collaborator renders bare pitch classes at.
pub const PLAYBACK_OCTAVE: i32 = 4;

/// Extra settle time after the last scheduled note before listening.
pub const PLAYBACK_LEAD_OUT: Duration = Duration::from_millis(200);

/// Schedules melody audio. Implementations are fire-and-forget: the
/// session only relies on `playback_duration` for timing.
pub trait MelodyPlayer {
    fn schedule(&mut self, melody: &Melody);
}

/// Total time from scheduling a melody until listening can begin.
pub fn playback_duration(note_count: usize, note_interval: Duration) -> Duration {
    note_interval * note_count as u32 + PLAYBACK_LEAD_OUT
}

/// Player that only logs what would be scheduled. Used by the binary when
/// no synthesizer is wired up, and by tests.
#[derive(Debug, Default)]
pub struct LogPlayer {
    scheduled: usize,
}

impl LogPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of schedule calls so far.
    pub fn scheduled(&self) -> usize {
        self.scheduled
    }
}

impl MelodyPlayer for LogPlayer {
    fn schedule(&mut self, melody: &Melody) {
        self.scheduled += 1;
        info!("scheduling melody [{melody}] at octave {PLAYBACK_OCTAVE}");
    }
}
