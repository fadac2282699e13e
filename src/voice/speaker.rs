//! Speaking text aloud
//!
//! Synthesize then play, returning only when audio output has finished.
//! Concrete implementation behind the controller's `Speaker` seam.

use async_trait::async_trait;

use crate::controller::Speaker;
use crate::voice::{AudioPlayback, TextToSpeech};
use crate::Result;

/// Speaks text on the default output device
pub struct VoiceSpeaker {
    tts: TextToSpeech,
    playback: AudioPlayback,
}

impl VoiceSpeaker {
    /// Create a new speaker
    #[must_use]
    pub fn new(tts: TextToSpeech, playback: AudioPlayback) -> Self {
        Self { tts, playback }
    }
}

#[async_trait]
impl Speaker for VoiceSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        tracing::debug!(text, "speaking");
        let audio = self.tts.synthesize(text).await?;
        self.playback.play_mp3(&audio).await
    }
}
