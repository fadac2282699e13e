//! Voice interaction control flow
//!
//! One trigger drives one cycle: listen for a question, match it against the
//! FAQ store, deliver the answer aloud and on screen, play the reactive
//! clip. Every collaborator failure is converted into a spoken + displayed
//! message here; nothing escapes to the host event loop, and every cycle
//! ends back at `Idle` (or `Ended` on an exit phrase).

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::Result;
use crate::ui::StatusSurface;

/// Status shown while waiting for speech
pub const STATUS_LISTENING: &str = "Listening...";

/// Delivered when the capture timeout elapses with no speech
pub const MSG_NO_INPUT: &str = "No input detected.";

/// Delivered when speech was captured but not recognized
pub const MSG_NOT_UNDERSTOOD: &str = "Sorry, I didn't understand that.";

/// Delivered when an exit phrase ends the session
pub const MSG_FAREWELL: &str = "Goodbye! See you soon!";

/// Phrases that end the session, matched by containment
pub const EXIT_PHRASES: [&str; 2] = ["thanks", "exit"];

/// Where a session is in its interaction lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InteractionState {
    /// Waiting for a trigger
    #[default]
    Idle,
    /// Waiting for speech
    Listening,
    /// Question recognized, checking exit phrases
    Matching,
    /// Looking up and delivering the answer
    Responding,
    /// An exit phrase ended the session; no further cycles are accepted
    Ended,
}

/// Terminal result of one interaction cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// An answer was delivered (including the canned fallback)
    Answered(String),
    /// Capture timed out with no speech
    NoInput,
    /// Speech was captured but not recognized
    Unrecognized,
    /// An exit phrase ended the session
    Farewell,
    /// A collaborator failed; a diagnostic was delivered instead
    Failed,
    /// The trigger was rejected (cycle in flight or session over)
    Rejected,
}

/// Captures one spoken question
#[async_trait]
pub trait SpeechCapture: Send + Sync {
    /// Block until speech is captured and recognized, or the timeout elapses
    ///
    /// Never returns a partially-formed question.
    ///
    /// # Errors
    ///
    /// `CaptureTimeout` if no speech starts within `timeout`,
    /// `CaptureUnrecognized` if speech could not be turned into text
    async fn capture(&self, timeout: Duration) -> Result<String>;
}

/// Answers a question with a best-match response
#[async_trait]
pub trait ResponseStore: Send + Sync {
    /// Look up an answer by case-insensitive containment
    ///
    /// "No row matched" is a valid answer (the canned fallback), never an
    /// error; errors mean the store itself is unreachable.
    async fn lookup(&self, question: &str) -> Result<String>;
}

/// Renders text to audible speech
#[async_trait]
pub trait Speaker: Send + Sync {
    /// Speak, blocking until audio output completes
    async fn speak(&self, text: &str) -> Result<()>;
}

/// Plays a reactive clip onto its designated surface
#[async_trait]
pub trait FeedbackPlayer: Send + Sync {
    /// Play the clip's frame sequence to exhaustion at a fixed cadence
    async fn play(&self, clip: &Path) -> Result<()>;
}

/// Drives one complete voice-interaction cycle per trigger
pub struct InteractionController<C, R, S, F> {
    state: InteractionState,
    capture: C,
    store: R,
    speaker: S,
    feedback: F,
    surface: Arc<dyn StatusSurface>,
    clip: PathBuf,
    capture_timeout: Duration,
}

impl<C, R, S, F> InteractionController<C, R, S, F>
where
    C: SpeechCapture,
    R: ResponseStore,
    S: Speaker,
    F: FeedbackPlayer,
{
    /// Create a new controller in the idle state
    pub fn new(
        capture: C,
        store: R,
        speaker: S,
        feedback: F,
        surface: Arc<dyn StatusSurface>,
        clip: PathBuf,
        capture_timeout: Duration,
    ) -> Self {
        Self {
            state: InteractionState::Idle,
            capture,
            store,
            speaker,
            feedback,
            surface,
            clip,
            capture_timeout,
        }
    }

    /// Get the current interaction state
    #[must_use]
    pub const fn state(&self) -> InteractionState {
        self.state
    }

    /// Speak and display the startup greeting
    pub async fn greet(&self, greeting: &str) {
        self.deliver(greeting).await;
    }

    /// Run one complete interaction cycle
    ///
    /// Re-invocable: a trigger while a cycle is in flight, or after the
    /// session has ended, is rejected. Collaborator errors are delivered as
    /// diagnostics and never propagate; the cycle always terminates in
    /// `Idle` or `Ended`.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.state {
            InteractionState::Idle => {}
            state => {
                tracing::debug!(?state, "trigger rejected");
                return CycleOutcome::Rejected;
            }
        }

        self.state = InteractionState::Listening;
        self.surface.set_status(STATUS_LISTENING);
        tracing::info!("listening for a question");

        let question = match self.capture.capture(self.capture_timeout).await {
            Ok(text) => text.to_lowercase(),
            Err(crate::Error::CaptureTimeout) => {
                self.deliver(MSG_NO_INPUT).await;
                self.state = InteractionState::Idle;
                return CycleOutcome::NoInput;
            }
            Err(crate::Error::CaptureUnrecognized) => {
                self.deliver(MSG_NOT_UNDERSTOOD).await;
                self.state = InteractionState::Idle;
                return CycleOutcome::Unrecognized;
            }
            Err(e) => {
                tracing::error!(error = %e, "speech capture failed");
                self.deliver(&format!("Audio error: {e}")).await;
                self.state = InteractionState::Idle;
                return CycleOutcome::Failed;
            }
        };

        tracing::info!(question = %question, "question recognized");
        self.surface.set_status(&format!("You said: {question}"));
        self.state = InteractionState::Matching;

        // Exit phrases take priority over lookup
        if EXIT_PHRASES.iter().any(|p| question.contains(p)) {
            self.deliver(MSG_FAREWELL).await;
            self.state = InteractionState::Ended;
            self.surface.request_close();
            return CycleOutcome::Farewell;
        }

        self.state = InteractionState::Responding;
        let answer = match self.store.lookup(&question).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!(error = %e, "answer lookup failed");
                self.deliver(&format!("Database error: {e}")).await;
                self.state = InteractionState::Idle;
                return CycleOutcome::Failed;
            }
        };

        tracing::info!(answer = %answer, "delivering answer");
        self.surface.set_status(&format!("Answer: {answer}"));

        // The clip plays for any produced answer, fallback included; the
        // spoken answer completes even if the clip cannot be shown
        let (spoken, played) =
            tokio::join!(self.speaker.speak(&answer), self.feedback.play(&self.clip));
        if let Err(e) = spoken {
            tracing::error!(error = %e, "failed to speak answer");
        }
        if let Err(e) = played {
            tracing::warn!(error = %e, "feedback clip failed, answer was still delivered");
        }

        self.state = InteractionState::Idle;
        CycleOutcome::Answered(answer)
    }

    /// Speak and display the same message, swallowing speaker failures
    async fn deliver(&self, message: &str) {
        self.surface.set_status(message);
        if let Err(e) = self.speaker.speak(message).await {
            tracing::warn!(error = %e, message, "failed to speak message");
        }
    }
}
