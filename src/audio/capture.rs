// Microphone capture - CPAL input stream
//
// # Format Support
//
// The device's preferred sample format is detected via `sample_format()`
// and the matching input stream is built. All downstream processing is
// f32; conversion from I16/U16 happens per sample via CPAL's
// `FromSample` trait at the point of reading.
//
// The callback slices interleaved frames down to channel 0 (mono) and
// accumulates fixed-size chunks, handing each completed chunk to the
// logic thread over the lock-free chunk channel. A full channel drops
// the chunk: losing ~46 ms of audio under backpressure is preferable to
// blocking the audio thread.
//
// Device and permission failures are converted to `CaptureError` /
// notifications here and never propagate as panics; the session shows
// "Microphone error" and stays usable.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use std::sync::{Arc, Mutex};

use crate::config::AudioConfig;
use crate::messaging::channels::{ChunkProducer, NotificationProducer};
use crate::messaging::notification::{Notification, NotificationCategory};

use super::AudioChunk;

#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("no input device found")]
    NoInputDevice,

    #[error("input configuration error: {0}")]
    Config(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("unsupported sample format: {0:?}")]
    UnsupportedFormat(SampleFormat),
}

/// Microphone capture engine.
///
/// `start` and `stop` are both idempotent. Stopping drops the stream,
/// which tears down the capture graph synchronously; the next `start`
/// rebuilds it from scratch (this is also the recovery path after a
/// device error).
pub struct AudioCapture {
    config: AudioConfig,
    chunk_tx: Arc<Mutex<ChunkProducer>>,
    notification_tx: Arc<Mutex<NotificationProducer>>,
    stream: Option<Stream>,
    sample_rate: f32,
}

impl AudioCapture {
    pub fn new(
        config: AudioConfig,
        chunk_tx: ChunkProducer,
        notification_tx: Arc<Mutex<NotificationProducer>>,
    ) -> Self {
        let sample_rate = config.sample_rate as f32;
        Self {
            config,
            chunk_tx: Arc::new(Mutex::new(chunk_tx)),
            notification_tx,
            stream: None,
            sample_rate,
        }
    }

    /// Open the default input device and start streaming chunks.
    /// Calling start while already running is a no-op.
    pub fn start(&mut self) -> Result<(), CaptureError> {
        if self.stream.is_some() {
            return Ok(());
        }

        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(CaptureError::NoInputDevice)?;

        let supported = device
            .default_input_config()
            .map_err(|e| CaptureError::Config(e.to_string()))?;

        let sample_format = supported.sample_format();
        let stream_config: StreamConfig = supported.into();
        self.sample_rate = stream_config.sample_rate.0 as f32;

        log::info!(
            "capture device: {} ({} Hz, {:?})",
            device.name().unwrap_or_else(|_| "unknown".to_string()),
            stream_config.sample_rate.0,
            sample_format
        );

        let stream = match sample_format {
            SampleFormat::F32 => self.build_stream::<f32>(&device, &stream_config),
            SampleFormat::I16 => self.build_stream::<i16>(&device, &stream_config),
            SampleFormat::U16 => self.build_stream::<u16>(&device, &stream_config),
            other => return Err(CaptureError::UnsupportedFormat(other)),
        }?;

        stream
            .play()
            .map_err(|e| CaptureError::Stream(e.to_string()))?;
        self.stream = Some(stream);
        Ok(())
    }

    /// Tear down the capture graph. Safe to call when already stopped.
    pub fn stop(&mut self) {
        if self.stream.take().is_some() {
            log::info!("capture stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    /// Sample rate of the running stream (the device may differ from the
    /// configured preference).
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn build_stream<T>(
        &self,
        device: &Device,
        stream_config: &StreamConfig,
    ) -> Result<Stream, CaptureError>
    where
        T: SizedSample,
        f32: FromSample<T>,
    {
        let channels = stream_config.channels as usize;
        let sample_rate = stream_config.sample_rate.0 as f32;
        let chunk_size = self.config.buffer_size;

        let chunk_tx = Arc::clone(&self.chunk_tx);
        let notification_tx = Arc::clone(&self.notification_tx);

        let mut pending: Vec<f32> = Vec::with_capacity(chunk_size);

        let stream = device
            .build_input_stream(
                stream_config,
                move |data: &[T], _: &cpal::InputCallbackInfo| {
                    // Channel 0 of each interleaved frame
                    for frame in data.chunks(channels.max(1)) {
                        pending.push(f32::from_sample(frame[0]));

                        if pending.len() == chunk_size {
                            let samples =
                                std::mem::replace(&mut pending, Vec::with_capacity(chunk_size));
                            let chunk = AudioChunk {
                                samples,
                                sample_rate,
                            };
                            if let Ok(mut tx) = chunk_tx.lock() {
                                // Full channel: drop the chunk, never block
                                let _ = ringbuf::traits::Producer::try_push(&mut *tx, chunk);
                            }
                        }
                    }
                },
                move |err| {
                    log::error!("capture stream error: {err}");
                    if let Ok(mut tx) = notification_tx.lock() {
                        let _ = ringbuf::traits::Producer::try_push(
                            &mut *tx,
                            Notification::error(
                                NotificationCategory::Capture,
                                format!("Capture stream error: {err}"),
                            ),
                        );
                    }
                },
                None,
            )
            .map_err(|e| CaptureError::Stream(e.to_string()))?;

        Ok(stream)
    }
}
