// Time-domain monophonic pitch detector
//
// Normalized windowed autocorrelation over one fixed-size buffer:
// Hann window, RMS silence gate, lag scan across the configured frequency
// range, confidence threshold on the winning correlation. Returns None for
// silence, noise and boundary lags. Absence of pitch is an expected
// outcome, never an error, and downstream matching depends on that.
//
// Cost is O(N * lags) per buffer. At 2048 samples / 44.1 kHz that is well
// under the ~46 ms callback period.

use std::f32::consts::PI;

use crate::config::AudioConfig;

pub struct PitchDetector {
    min_frequency: f32,
    max_frequency: f32,
    min_correlation: f32,
    min_rms: f32,

    // Scratch buffer for the windowed signal, reused across calls
    windowed: Vec<f32>,
}

impl PitchDetector {
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            min_frequency: config.min_frequency,
            max_frequency: config.max_frequency,
            min_correlation: config.min_correlation,
            min_rms: config.min_rms,
            windowed: Vec::new(),
        }
    }

    /// Estimate the fundamental frequency of `buffer` in Hz, or None when
    /// the signal is too quiet, too noisy, or outside the detectable range.
    pub fn detect(&mut self, buffer: &[f32], sample_rate: f32) -> Option<f32> {
        let n = buffer.len();
        if n < 2 || sample_rate <= 0.0 {
            return None;
        }

        // Hann window to reduce edge artifacts
        self.windowed.clear();
        self.windowed.reserve(n);
        let denom = (n - 1) as f32;
        for (i, &sample) in buffer.iter().enumerate() {
            let w = 0.5 - 0.5 * (2.0 * PI * i as f32 / denom).cos();
            self.windowed.push(sample * w);
        }

        // Silence gate. The comparison is written so a NaN RMS also bails.
        let energy: f64 = self
            .windowed
            .iter()
            .map(|&v| (v as f64) * (v as f64))
            .sum();
        let rms = (energy / n as f64).sqrt() as f32;
        if !(rms >= self.min_rms) {
            return None;
        }

        // Lag bounds from the detectable frequency range:
        // lag = sample_rate / frequency
        let min_lag = (sample_rate / self.max_frequency) as usize;
        let max_lag = ((sample_rate / self.min_frequency) as usize).min(n);
        if min_lag + 1 >= max_lag {
            return None;
        }

        let mut max_corr = 0.0f64;
        let mut best_lag = 0usize;

        for lag in min_lag..max_lag {
            let mut corr = 0.0f64;
            let mut norm = 0.0f64;

            for i in 0..n - lag {
                let a = self.windowed[i] as f64;
                let b = self.windowed[i + lag] as f64;
                corr += a * b;
                norm += a * a + b * b;
            }

            if norm > 0.0 {
                corr /= norm.sqrt();
            }

            if corr > max_corr {
                max_corr = corr;
                best_lag = lag;
            }
        }

        // Reject weak peaks and lags touching the scan boundaries
        if max_corr > self.min_correlation as f64 && best_lag > min_lag && best_lag < max_lag - 1 {
            return Some(sample_rate / best_lag as f32);
        }

        None
    }
}

impl Default for PitchDetector {
    fn default() -> Self {
        Self::new(&AudioConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate_sine(sample_rate: f32, frequency: f32, amplitude: f32, count: usize) -> Vec<f32> {
        (0..count)
            .map(|i| (2.0 * PI * frequency * i as f32 / sample_rate).sin() * amplitude)
            .collect()
    }

    #[test]
    fn test_silence_returns_none() {
        let mut detector = PitchDetector::default();
        let buffer = vec![0.0f32; 2048];
        assert_eq!(detector.detect(&buffer, 44_100.0), None);
    }

    #[test]
    fn test_quiet_signal_gated() {
        // Below the RMS threshold even though perfectly periodic
        let mut detector = PitchDetector::default();
        let buffer = generate_sine(44_100.0, 440.0, 0.005, 2048);
        assert_eq!(detector.detect(&buffer, 44_100.0), None);
    }

    #[test]
    fn test_sine_440() {
        let mut detector = PitchDetector::default();
        let buffer = generate_sine(44_100.0, 440.0, 0.8, 2048);
        let freq = detector.detect(&buffer, 44_100.0).expect("should detect");
        let error = (freq - 440.0).abs() / 440.0;
        assert!(error < 0.02, "expected ~440 Hz, got {freq} Hz");
    }

    #[test]
    fn test_sine_sweep_accuracy() {
        let mut detector = PitchDetector::default();
        for target in [100.0f32, 150.0, 220.0, 330.0, 440.0, 660.0, 900.0] {
            let buffer = generate_sine(44_100.0, target, 0.8, 2048);
            let freq = detector
                .detect(&buffer, 44_100.0)
                .unwrap_or_else(|| panic!("no pitch at {target} Hz"));
            let error = (freq - target).abs() / target;
            assert!(error < 0.02, "expected ~{target} Hz, got {freq} Hz");
        }
    }

    #[test]
    fn test_degenerate_buffers() {
        let mut detector = PitchDetector::default();
        assert_eq!(detector.detect(&[], 44_100.0), None);
        assert_eq!(detector.detect(&[0.5], 44_100.0), None);
        assert_eq!(detector.detect(&[0.5; 16], 44_100.0), None);

        let nan_buffer = vec![f32::NAN; 2048];
        assert_eq!(detector.detect(&nan_buffer, 44_100.0), None);

        let buffer = generate_sine(44_100.0, 440.0, 0.8, 2048);
        assert_eq!(detector.detect(&buffer, 0.0), None);
    }

    #[test]
    fn test_noise_rejected() {
        // Deterministic pseudo-noise loud enough to pass the RMS gate but
        // aperiodic, so no lag reaches the confidence threshold
        let mut detector = PitchDetector::default();
        let mut state = 0x12345678u32;
        let buffer: Vec<f32> = (0..2048)
            .map(|_| {
                state = state.wrapping_mul(1664525).wrapping_add(1013904223);
                ((state >> 8) as f32 / 8_388_608.0 - 1.0) * 0.05
            })
            .collect();
        assert_eq!(detector.detect(&buffer, 44_100.0), None);
    }
}
