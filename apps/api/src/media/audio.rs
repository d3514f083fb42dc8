//! Voice-session audio plumbing.
//!
//! The realtime socket itself is an external collaborator; this module owns
//! the deterministic parts: PCM16 frame conversion for the 16kHz mono
//! outbound stream, decoding of the 24kHz mono inbound stream, and the
//! playback scheduler that queues inbound buffers back-to-back without
//! overlap or gaps.

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::Serialize;
use thiserror::Error;

/// Outbound capture rate and its wire MIME tag.
pub const OUTBOUND_SAMPLE_RATE: u32 = 16_000;
pub const OUTBOUND_MIME: &str = "audio/pcm;rate=16000";

/// Inbound playback rate.
pub const INBOUND_SAMPLE_RATE: u32 = 24_000;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("Invalid base64 audio payload: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("PCM16 payload has an odd byte length: {0}")]
    OddLength(usize),
}

/// Encodes float samples as a base64 PCM16 little-endian frame for the
/// outbound stream. Samples are clamped to [-1.0, 1.0].
pub fn encode_pcm16_frame(samples: &[f32]) -> String {
    let mut bytes = Vec::with_capacity(samples.len() * 2);
    for sample in samples {
        let clamped = sample.clamp(-1.0, 1.0);
        let value = (clamped * 32768.0).clamp(i16::MIN as f32, i16::MAX as f32) as i16;
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    BASE64_STANDARD.encode(bytes)
}

/// Decodes a base64 PCM16 little-endian frame back into float samples.
pub fn decode_pcm16_frame(payload: &str) -> Result<Vec<f32>, AudioError> {
    let bytes = BASE64_STANDARD.decode(payload)?;
    if bytes.len() % 2 != 0 {
        return Err(AudioError::OddLength(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]) as f32 / 32768.0)
        .collect())
}

/// Seconds of playback a mono frame of `samples` occupies at `rate`.
pub fn frame_duration_secs(samples: usize, rate: u32) -> f64 {
    samples as f64 / rate as f64
}

/// Schedules inbound buffers for gap-free sequential playback: each buffer
/// starts at the later of "now" and the end of the previously scheduled one.
#[derive(Debug, Default)]
pub struct PlaybackScheduler {
    next_start: f64,
}

impl PlaybackScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the start time for a buffer of `duration` seconds given the
    /// current clock `now`, and advances the queue.
    pub fn schedule(&mut self, now: f64, duration: f64) -> f64 {
        let start = now.max(self.next_start);
        self.next_start = start + duration;
        start
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VoiceMode {
    Chat,
    MockInterview,
}

/// A live voice session. Capture and playback are acquired together and
/// released together on close, never individually leaked.
#[derive(Debug)]
pub struct VoiceSession {
    pub mode: VoiceMode,
    pub is_listening: bool,
    pub is_speaking: bool,
    scheduler: PlaybackScheduler,
}

impl VoiceSession {
    pub fn open(mode: VoiceMode) -> Self {
        VoiceSession {
            mode,
            is_listening: true,
            is_speaking: false,
            scheduler: PlaybackScheduler::new(),
        }
    }

    pub fn scheduler(&mut self) -> &mut PlaybackScheduler {
        &mut self.scheduler
    }

    /// Tears the session down. Consuming `self` releases the capture and
    /// playback sides in one step.
    pub fn close(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pcm16_frame_round_trips() {
        let samples = vec![0.0, 0.5, -0.5, 0.25];
        let decoded = decode_pcm16_frame(&encode_pcm16_frame(&samples)).unwrap();
        assert_eq!(decoded.len(), samples.len());
        for (a, b) in samples.iter().zip(&decoded) {
            assert!((a - b).abs() < 1.0 / 32768.0 * 2.0, "{a} vs {b}");
        }
    }

    #[test]
    fn test_encode_clamps_out_of_range_samples() {
        let decoded = decode_pcm16_frame(&encode_pcm16_frame(&[2.0, -2.0])).unwrap();
        assert!(decoded[0] > 0.99);
        assert!(decoded[1] <= -0.99);
    }

    #[test]
    fn test_decode_rejects_odd_byte_payload() {
        let payload = BASE64_STANDARD.encode([0u8, 1, 2]);
        assert!(matches!(
            decode_pcm16_frame(&payload),
            Err(AudioError::OddLength(3))
        ));
    }

    #[test]
    fn test_scheduler_queues_buffers_back_to_back() {
        let mut scheduler = PlaybackScheduler::new();
        // First buffer starts immediately.
        assert_eq!(scheduler.schedule(1.0, 0.5), 1.0);
        // Second arrives while the first still plays: queued at its end.
        assert_eq!(scheduler.schedule(1.2, 0.5), 1.5);
        // Third arrives after the queue drained: starts at "now".
        assert_eq!(scheduler.schedule(5.0, 0.25), 5.0);
    }

    #[test]
    fn test_frame_duration_at_inbound_rate() {
        let duration = frame_duration_secs(24_000, INBOUND_SAMPLE_RATE);
        assert!((duration - 1.0).abs() < f64::EPSILON);
    }
}
