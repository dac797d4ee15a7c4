// Microphone capture boundary

pub mod capture;

pub use capture::{AudioCapture, CaptureError};

/// One fixed-size snapshot of mono samples in [-1, 1], produced per
/// capture callback and consumed transiently by the pitch detector.
#[derive(Debug, Clone)]
pub struct AudioChunk {
    pub samples: Vec<f32>,
    pub sample_rate: f32,
}
