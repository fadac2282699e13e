//! Kiosk assembly and host event loop
//!
//! Wires the datastore, voice I/O, surfaces, theme, and controller
//! together, then drives everything from a single event loop: one logical
//! thread owns the interaction state, the active theme, and the status
//! text, so a cycle always runs to completion before the next trigger is
//! looked at.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::Config;
use crate::controller::{CycleOutcome, InteractionController};
use crate::store::{self, DbPool, FaqRepo, FaqStore};
use crate::ui::{
    ClipPlayer, ConsoleClipRegion, ConsoleSurface, FrameSurface, StatusSurface, ThemeManager,
    UiEvent, spawn_input_reader, spawn_overlay_loop,
};
use crate::voice::{AudioPlayback, SpeechToText, TextToSpeech, VoiceListener, VoiceSpeaker};
use crate::{Error, Result};

/// The kiosk - owns configuration and the FAQ database
pub struct Kiosk {
    config: Config,
    db: DbPool,
}

impl Kiosk {
    /// Create a new kiosk instance
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be initialized
    pub fn new(config: Config) -> Result<Self> {
        let db = store::init(&config.store.db_path)?;
        tracing::info!(path = %config.store.db_path.display(), "FAQ database ready");

        Ok(Self { config, db })
    }

    /// Run the kiosk until an exit phrase or quit signal
    ///
    /// # Errors
    ///
    /// Returns error if a collaborator cannot be constructed; once the loop
    /// is running, failures are delivered as spoken/displayed diagnostics
    /// instead
    pub async fn run(self) -> Result<()> {
        let config = self.config;

        let repo = FaqRepo::new(self.db);
        match repo.count()? {
            0 => tracing::warn!("FAQ table is empty - add rows with `kiosk seed`"),
            n => tracing::info!(rows = n, "FAQ table loaded"),
        }
        let answers = FaqStore::new(repo, config.store.fallback_answer.clone());

        let api_key = config.api_keys.openai.clone().ok_or_else(|| {
            Error::Config(
                "OpenAI API key required - set OPENAI_API_KEY or api_keys.openai".to_string(),
            )
        })?;
        let listener = VoiceListener::new(SpeechToText::new(
            api_key.clone(),
            config.voice.stt_model.clone(),
        )?);
        let speaker = VoiceSpeaker::new(
            TextToSpeech::new(
                api_key,
                config.voice.tts_voice.clone(),
                config.voice.tts_speed,
                config.voice.tts_model.clone(),
            )?,
            AudioPlayback::new()?,
        );

        let (events_tx, mut events_rx) = mpsc::unbounded_channel();
        let surface = Arc::new(ConsoleSurface::new(events_tx.clone()));
        let clip_region = Arc::new(ConsoleClipRegion::new("answer-clip"));

        let mut themes = ThemeManager::new(config.ui.theme);
        themes.register(&surface);
        themes.register(&clip_region);

        let frame_interval = Duration::from_millis(config.ui.frame_interval_ms);
        let feedback = ClipPlayer::new(
            Arc::clone(&clip_region) as Arc<dyn FrameSurface>,
            frame_interval,
        );

        let mut controller = InteractionController::new(
            listener,
            answers,
            speaker,
            feedback,
            Arc::clone(&surface) as Arc<dyn StatusSurface>,
            config.ui.clip_dir.clone(),
            Duration::from_secs(config.voice.capture_timeout_secs),
        );

        surface.set_status("Loading...");

        let _input = spawn_input_reader(events_tx.clone());
        let ctrlc_tx = events_tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                let _ = ctrlc_tx.send(UiEvent::Quit);
            }
        });

        tracing::info!("kiosk running - press Enter to ask, 't' to toggle theme, 'q' to quit");

        // The greeting fires once after the configured delay; triggers stay
        // live in the meantime
        let greeting_at =
            tokio::time::Instant::now() + Duration::from_secs(config.ui.greeting_delay_secs);
        let mut greeted = false;
        let mut overlay_task = None;

        loop {
            tokio::select! {
                () = tokio::time::sleep_until(greeting_at), if !greeted => {
                    greeted = true;
                    controller.greet(&config.ui.greeting).await;

                    // The overlay surface only exists from here on
                    let overlay = Arc::new(ConsoleClipRegion::new("overlay"));
                    themes.register(&overlay);
                    match spawn_overlay_loop(
                        Arc::clone(&overlay) as Arc<dyn FrameSurface>,
                        config.ui.overlay_dir.clone(),
                        frame_interval,
                    ) {
                        Ok(handle) => overlay_task = Some(handle),
                        Err(e) => tracing::warn!(error = %e, "overlay animation unavailable"),
                    }
                    themes.apply_to_all();
                }
                event = events_rx.recv() => {
                    let Some(event) = event else { break };
                    match event {
                        UiEvent::AskPressed => {
                            let outcome = controller.run_cycle().await;
                            tracing::debug!(?outcome, "cycle finished");
                            if outcome == CycleOutcome::Farewell {
                                break;
                            }
                        }
                        UiEvent::ToggleTheme => themes.toggle(),
                        UiEvent::Quit => break,
                    }
                }
            }
        }

        if let Some(handle) = overlay_task {
            handle.abort();
        }

        tracing::info!("kiosk stopped");
        Ok(())
    }
}
