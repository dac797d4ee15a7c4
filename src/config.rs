// Tunable constants for analysis and game pacing
//
// Defaults match the values the game was tuned with; a JSON file can
// override any subset for experimentation.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Capture and pitch-analysis settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Preferred capture sample rate (the device may override it)
    pub sample_rate: u32,
    /// Samples per analysis chunk
    pub buffer_size: usize,
    /// Lower bound of the detectable range, Hz
    pub min_frequency: f32,
    /// Upper bound of the detectable range, Hz
    pub max_frequency: f32,
    /// Correlation confidence threshold for accepting a pitch
    pub min_correlation: f32,
    /// RMS silence gate
    pub min_rms: f32,
    /// Gap between scheduled playback notes, milliseconds
    pub note_interval_ms: u64,
    /// Recording window length, milliseconds
    pub recording_window_ms: u64,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100,
            buffer_size: 2048,
            min_frequency: 80.0,
            max_frequency: 1000.0,
            min_correlation: 0.7,
            min_rms: 0.01,
            note_interval_ms: 600,
            recording_window_ms: 100,
        }
    }
}

impl AudioConfig {
    pub fn note_interval(&self) -> Duration {
        Duration::from_millis(self.note_interval_ms)
    }

    pub fn recording_window(&self) -> Duration {
        Duration::from_millis(self.recording_window_ms)
    }
}

/// Round pacing and scoring settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Base score multiplier for a completed melody
    pub score_multiplier: f64,
    /// How long success feedback stays visible, milliseconds
    pub feedback_duration_ms: u64,
    /// Delay between success and returning to idle, milliseconds
    pub success_delay_ms: u64,
    /// How long error feedback stays visible, milliseconds
    pub error_feedback_duration_ms: u64,
    /// Pause before the next recording window opens, milliseconds
    pub resolution_cooldown_ms: u64,
    /// Wrong attempts allowed per melody
    pub max_attempts: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            score_multiplier: 10.0,
            feedback_duration_ms: 500,
            success_delay_ms: 200,
            error_feedback_duration_ms: 500,
            resolution_cooldown_ms: 700,
            max_attempts: 3,
        }
    }
}

impl GameConfig {
    pub fn feedback_duration(&self) -> Duration {
        Duration::from_millis(self.feedback_duration_ms)
    }

    pub fn success_delay(&self) -> Duration {
        Duration::from_millis(self.success_delay_ms)
    }

    pub fn error_feedback_duration(&self) -> Duration {
        Duration::from_millis(self.error_feedback_duration_ms)
    }

    pub fn resolution_cooldown(&self) -> Duration {
        Duration::from_millis(self.resolution_cooldown_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub game: GameConfig,
}

impl Config {
    /// Load a config from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}
