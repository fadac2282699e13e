//! Utterance endpointing
//!
//! Decides where a spoken question starts and ends in the microphone
//! stream using RMS energy: silence, then speech, then enough trailing
//! silence to call the utterance complete.

/// Minimum audio energy threshold to consider speech
const ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum duration of speech to accept an utterance (in samples at 16kHz)
const MIN_SPEECH_SAMPLES: usize = 4800; // 0.3 seconds

/// Silence duration to consider end of utterance (in samples)
const SILENCE_SAMPLES: usize = 8000; // 0.5 seconds

/// State of the utterance detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointState {
    /// Waiting for speech to start
    Waiting,
    /// Speech detected, accumulating the utterance
    Speech,
}

/// Detects utterance boundaries in an audio stream
pub struct UtteranceDetector {
    state: EndpointState,
    buffer: Vec<f32>,
    silence_counter: usize,
}

impl Default for UtteranceDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl UtteranceDetector {
    /// Create a new detector in the waiting state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: EndpointState::Waiting,
            buffer: Vec::new(),
            silence_counter: 0,
        }
    }

    /// Process a chunk of samples
    ///
    /// Returns true once the utterance is complete (enough speech followed
    /// by enough silence).
    pub fn process(&mut self, samples: &[f32]) -> bool {
        let energy = calculate_energy(samples);
        let is_speech = energy > ENERGY_THRESHOLD;

        match self.state {
            EndpointState::Waiting => {
                if is_speech {
                    self.state = EndpointState::Speech;
                    self.buffer.clear();
                    self.buffer.extend_from_slice(samples);
                    self.silence_counter = 0;
                    tracing::trace!(energy, "speech started");
                }
            }
            EndpointState::Speech => {
                self.buffer.extend_from_slice(samples);

                if is_speech {
                    self.silence_counter = 0;
                } else {
                    self.silence_counter += samples.len();
                }

                if self.silence_counter > SILENCE_SAMPLES
                    && self.buffer.len() > MIN_SPEECH_SAMPLES
                {
                    tracing::debug!(samples = self.buffer.len(), "utterance complete");
                    return true;
                }

                // Too much silence without enough speech: forget the blip
                if self.silence_counter > SILENCE_SAMPLES * 2 {
                    tracing::trace!("spurious speech, resetting");
                    self.reset();
                }
            }
        }

        false
    }

    /// Whether speech has started
    #[must_use]
    pub fn speech_started(&self) -> bool {
        self.state == EndpointState::Speech
    }

    /// Take the accumulated utterance, clearing it
    pub fn take_utterance(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.buffer)
    }

    /// Reset to the waiting state
    pub fn reset(&mut self) {
        self.state = EndpointState::Waiting;
        self.buffer.clear();
        self.silence_counter = 0;
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> EndpointState {
        self.state
    }
}

/// Calculate RMS energy of audio samples
#[allow(clippy::cast_precision_loss)]
fn calculate_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::SAMPLE_RATE;

    fn sine(duration_secs: f32, amplitude: f32) -> Vec<f32> {
        let num_samples = (SAMPLE_RATE as f32 * duration_secs) as usize;
        (0..num_samples)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                amplitude * (2.0 * std::f32::consts::PI * 440.0 * t).sin()
            })
            .collect()
    }

    fn silence(duration_secs: f32) -> Vec<f32> {
        vec![0.0; (SAMPLE_RATE as f32 * duration_secs) as usize]
    }

    #[test]
    fn test_energy_calculation() {
        assert!(calculate_energy(&silence(0.1)) < 0.001);
        assert!(calculate_energy(&vec![0.5f32; 100]) > 0.4);
        assert!(calculate_energy(&[]) < f32::EPSILON);
    }

    #[test]
    fn test_silence_does_not_start_utterance() {
        let mut detector = UtteranceDetector::new();
        assert!(!detector.process(&silence(0.2)));
        assert_eq!(detector.state(), EndpointState::Waiting);
        assert!(!detector.speech_started());
    }

    #[test]
    fn test_speech_then_silence_completes() {
        let mut detector = UtteranceDetector::new();

        detector.process(&sine(0.5, 0.3));
        assert_eq!(detector.state(), EndpointState::Speech);
        assert!(detector.speech_started());

        let complete = detector.process(&silence(0.6));
        assert!(complete);
        assert!(!detector.take_utterance().is_empty());
    }

    #[test]
    fn test_utterance_accumulates_chunks() {
        let mut detector = UtteranceDetector::new();

        let a = sine(0.2, 0.3);
        let b = sine(0.2, 0.3);
        detector.process(&a);
        detector.process(&b);

        assert_eq!(detector.take_utterance().len(), a.len() + b.len());
    }

    #[test]
    fn test_reset_returns_to_waiting() {
        let mut detector = UtteranceDetector::new();
        detector.process(&sine(0.2, 0.3));
        detector.reset();

        assert_eq!(detector.state(), EndpointState::Waiting);
        assert!(detector.take_utterance().is_empty());
    }
}
