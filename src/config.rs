//! Configuration for the campus kiosk
//!
//! Defaults overlaid by an optional TOML file at
//! `~/.config/campus-kiosk/config.toml`. All file fields are optional — the
//! file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::ui::theme::ThemeName;
use crate::{Error, Result};

/// Default capture timeout (seconds to wait for speech to start)
pub const DEFAULT_CAPTURE_TIMEOUT_SECS: u64 = 5;

/// Default delay before the startup greeting
pub const DEFAULT_GREETING_DELAY_SECS: u64 = 2;

/// Default cadence between clip frames
pub const DEFAULT_FRAME_INTERVAL_MS: u64 = 100;

/// Spoken when no FAQ row matches a question
pub const DEFAULT_FALLBACK_ANSWER: &str = "Sorry, I don't have an answer for that.";

/// Spoken once after startup
pub const DEFAULT_GREETING: &str = "Hello! I am your campus assistant. Ask me anything!";

/// Kiosk configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to data directory (database, clip frames)
    pub data_dir: PathBuf,

    /// Voice capture/synthesis configuration
    pub voice: VoiceConfig,

    /// FAQ datastore configuration
    pub store: StoreConfig,

    /// Visual surface configuration
    pub ui: UiConfig,

    /// API keys for external services
    pub api_keys: ApiKeys,
}

/// Voice processing configuration
#[derive(Debug, Clone)]
pub struct VoiceConfig {
    /// STT model (e.g. "whisper-1")
    pub stt_model: String,

    /// TTS model (e.g. "tts-1")
    pub tts_model: String,

    /// TTS voice identifier (e.g. "alloy")
    pub tts_voice: String,

    /// TTS speed multiplier (0.25 to 4.0)
    pub tts_speed: f64,

    /// Seconds to wait for speech to start before giving up
    pub capture_timeout_secs: u64,
}

/// FAQ datastore configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the SQLite database
    pub db_path: PathBuf,

    /// Answer delivered when no row matches
    pub fallback_answer: String,
}

/// Visual surface configuration
#[derive(Debug, Clone)]
pub struct UiConfig {
    /// Initial theme
    pub theme: ThemeName,

    /// Greeting spoken after startup
    pub greeting: String,

    /// Delay before the greeting
    pub greeting_delay_secs: u64,

    /// Directory of pre-extracted answer-clip frames
    pub clip_dir: PathBuf,

    /// Directory of pre-extracted overlay-animation frames
    pub overlay_dir: PathBuf,

    /// Cadence between frames in milliseconds
    pub frame_interval_ms: u64,
}

/// API keys for external services
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    /// `OpenAI` API key (for Whisper STT and TTS)
    pub openai: Option<String>,
}

impl Config {
    /// Load configuration: defaults, then the TOML overlay, then environment
    ///
    /// # Errors
    ///
    /// Returns error if the platform data/config directories cannot be
    /// determined, or if an explicitly given config file cannot be parsed
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) => {
                let content = std::fs::read_to_string(path)?;
                toml::from_str(&content)?
            }
            None => load_config_file(),
        };

        let data_dir = directories::BaseDirs::new()
            .map(|d| d.data_dir().join("campus-kiosk"))
            .ok_or_else(|| Error::Config("cannot determine data directory".to_string()))?;

        let openai = file
            .api_keys
            .openai
            .or_else(|| std::env::var("OPENAI_API_KEY").ok());

        Ok(Self {
            voice: VoiceConfig {
                stt_model: file.voice.stt_model.unwrap_or_else(|| "whisper-1".to_string()),
                tts_model: file.voice.tts_model.unwrap_or_else(|| "tts-1".to_string()),
                tts_voice: file.voice.tts_voice.unwrap_or_else(|| "alloy".to_string()),
                tts_speed: file.voice.tts_speed.unwrap_or(1.0),
                capture_timeout_secs: file
                    .voice
                    .capture_timeout_secs
                    .unwrap_or(DEFAULT_CAPTURE_TIMEOUT_SECS),
            },
            store: StoreConfig {
                db_path: file
                    .store
                    .db_path
                    .unwrap_or_else(|| data_dir.join("kiosk.db")),
                fallback_answer: file
                    .store
                    .fallback_answer
                    .unwrap_or_else(|| DEFAULT_FALLBACK_ANSWER.to_string()),
            },
            ui: UiConfig {
                theme: file.ui.theme.unwrap_or_default(),
                greeting: file.ui.greeting.unwrap_or_else(|| DEFAULT_GREETING.to_string()),
                greeting_delay_secs: file
                    .ui
                    .greeting_delay_secs
                    .unwrap_or(DEFAULT_GREETING_DELAY_SECS),
                clip_dir: file
                    .ui
                    .clip_dir
                    .unwrap_or_else(|| data_dir.join("clips").join("answer")),
                overlay_dir: file
                    .ui
                    .overlay_dir
                    .unwrap_or_else(|| data_dir.join("clips").join("overlay")),
                frame_interval_ms: file
                    .ui
                    .frame_interval_ms
                    .unwrap_or(DEFAULT_FRAME_INTERVAL_MS),
            },
            api_keys: ApiKeys { openai },
            data_dir,
        })
    }
}

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
struct KioskConfigFile {
    /// Voice/audio configuration
    #[serde(default)]
    voice: VoiceFileConfig,

    /// FAQ datastore configuration
    #[serde(default)]
    store: StoreFileConfig,

    /// Visual surface configuration
    #[serde(default)]
    ui: UiFileConfig,

    /// API keys for external services
    #[serde(default)]
    api_keys: ApiKeysFileConfig,
}

#[derive(Debug, Default, Deserialize)]
struct VoiceFileConfig {
    stt_model: Option<String>,
    tts_model: Option<String>,
    tts_voice: Option<String>,
    tts_speed: Option<f64>,
    capture_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct StoreFileConfig {
    db_path: Option<PathBuf>,
    fallback_answer: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct UiFileConfig {
    theme: Option<ThemeName>,
    greeting: Option<String>,
    greeting_delay_secs: Option<u64>,
    clip_dir: Option<PathBuf>,
    overlay_dir: Option<PathBuf>,
    frame_interval_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiKeysFileConfig {
    openai: Option<String>,
}

/// Load the TOML config file from the standard path
///
/// Returns defaults if the file doesn't exist or can't be parsed.
fn load_config_file() -> KioskConfigFile {
    let Some(path) = config_file_path() else {
        return KioskConfigFile::default();
    };

    if !path.exists() {
        return KioskConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                KioskConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            KioskConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/campus-kiosk/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("campus-kiosk").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_overlay_parsing() {
        let file: KioskConfigFile = toml::from_str(
            r#"
            [voice]
            capture_timeout_secs = 8

            [ui]
            theme = "dark"
            "#,
        )
        .unwrap();

        assert_eq!(file.voice.capture_timeout_secs, Some(8));
        assert_eq!(file.voice.stt_model, None);
        assert_eq!(file.ui.theme, Some(ThemeName::Dark));
        assert_eq!(file.store.db_path, None);
    }

    #[test]
    fn test_empty_file_is_valid() {
        let file: KioskConfigFile = toml::from_str("").unwrap();
        assert!(file.api_keys.openai.is_none());
    }
}
