// Real-time analysis of captured audio: pitch detection and note resolution

pub mod pitch;
pub mod resolver;

pub use pitch::PitchDetector;
pub use resolver::{RecordingWindow, average_frequency, closest_pitch_class};
