// Melodine - ear-training game core: library exports for tests and benchmarks

pub mod audio;
pub mod config;
pub mod dsp;
pub mod game;
pub mod melody;
pub mod messaging;
pub mod music;

// Re-export commonly used types for convenience
pub use audio::{AudioCapture, AudioChunk, CaptureError};
pub use config::{AudioConfig, Config, GameConfig};
pub use dsp::{PitchDetector, RecordingWindow, average_frequency, closest_pitch_class};
pub use game::{
    Difficulty, Feedback, GameSession, GameState, GameStats, MatchVerdict, SessionView,
    calculate_score, check_melody_match,
};
pub use melody::{LogPlayer, Melody, MelodyGenerator, MelodyHistory, MelodyPlayer};
pub use messaging::channels::{create_chunk_channel, create_notification_channel};
pub use music::{INTERVALS, Interval, Note, NoteError, PitchClass};
