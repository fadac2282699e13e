//! Campus Kiosk - voice-driven campus FAQ assistant
//!
//! Press the trigger, ask a question aloud, hear and see the answer:
//!
//! ```text
//! trigger ──> InteractionController
//!                │ capture (mic + STT, 5s timeout)
//!                │ match   (exit phrases, then FAQ containment lookup)
//!                └ respond (TTS playback + reactive clip + status text)
//! ```
//!
//! The windowing surface, speech engines, datastore, and clip decoding are
//! external collaborators behind narrow seams (`controller`, `ui`); the
//! crate ships SQLite, HTTP STT/TTS, cpal audio, and console-surface
//! implementations of those seams.

pub mod app;
pub mod config;
pub mod controller;
pub mod error;
pub mod store;
pub mod ui;
pub mod voice;

pub use app::Kiosk;
pub use config::Config;
pub use controller::{CycleOutcome, InteractionController, InteractionState};
pub use error::{Error, Result};
