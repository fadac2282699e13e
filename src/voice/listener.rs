//! End-to-end question capture
//!
//! Records from the microphone until the utterance ends, then transcribes.
//! This is the concrete implementation behind the controller's
//! `SpeechCapture` seam.

use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::controller::SpeechCapture;
use crate::voice::{AudioCapture, SAMPLE_RATE, SpeechToText, UtteranceDetector, samples_to_wav};
use crate::{Error, Result};

/// Poll cadence for draining the capture buffer
const CHUNK_INTERVAL: Duration = Duration::from_millis(100);

/// Hard cap on a single utterance once speech has started
const MAX_UTTERANCE: Duration = Duration::from_secs(15);

/// Captures one spoken question from the default microphone
pub struct VoiceListener {
    stt: SpeechToText,
}

impl VoiceListener {
    /// Create a new listener
    #[must_use]
    pub fn new(stt: SpeechToText) -> Self {
        Self { stt }
    }
}

#[async_trait]
impl SpeechCapture for VoiceListener {
    async fn capture(&self, timeout: Duration) -> Result<String> {
        let samples = tokio::task::spawn_blocking(move || record_utterance(timeout))
            .await
            .map_err(|e| Error::Audio(e.to_string()))??;

        let wav = samples_to_wav(&samples, SAMPLE_RATE)?;
        let transcript = self.stt.transcribe(&wav).await?;

        let transcript = transcript.trim();
        if transcript.is_empty() {
            return Err(Error::CaptureUnrecognized);
        }

        Ok(transcript.to_string())
    }
}

/// Record until the utterance ends
///
/// The timeout bounds the wait for speech to start; once speech begins the
/// utterance runs to its silence endpoint, with a hard cap as backstop.
fn record_utterance(timeout: Duration) -> Result<Vec<f32>> {
    let mut capture = AudioCapture::new()?;
    capture.start()?;

    let mut detector = UtteranceDetector::new();
    let started = Instant::now();

    loop {
        std::thread::sleep(CHUNK_INTERVAL);
        let chunk = capture.take_buffer();

        if detector.process(&chunk) {
            break;
        }

        if !detector.speech_started() && started.elapsed() >= timeout {
            capture.stop();
            tracing::debug!("no speech before timeout");
            return Err(Error::CaptureTimeout);
        }

        if started.elapsed() >= timeout + MAX_UTTERANCE {
            tracing::warn!("utterance cap reached, cutting off");
            break;
        }
    }

    capture.stop();

    let samples = detector.take_utterance();
    if samples.is_empty() {
        return Err(Error::CaptureUnrecognized);
    }

    Ok(samples)
}
