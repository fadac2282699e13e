use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use campus_kiosk::store::{self, FaqRepo};
use campus_kiosk::voice::{AudioCapture, AudioPlayback, TextToSpeech};
use campus_kiosk::{Config, Kiosk};

/// Campus Kiosk - voice-driven campus FAQ assistant
#[derive(Parser)]
#[command(name = "kiosk", version, about)]
struct Cli {
    /// Path to a config file (default: ~/.config/campus-kiosk/config.toml)
    #[arg(short, long, env = "KIOSK_CONFIG")]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Test microphone input
    TestMic {
        /// Duration in seconds
        #[arg(short, long, default_value = "5")]
        duration: u64,
    },
    /// Test speaker output
    TestSpeaker,
    /// Test TTS output
    TestTts {
        /// Text to speak
        #[arg(default_value = "Hello! This is a test of the text to speech system.")]
        text: String,
    },
    /// Load FAQ rows from a TOML file into the datastore
    Seed {
        /// Path to a TOML file with [[faq]] question/answer entries
        file: PathBuf,
    },
    /// Print the resolved configuration
    ShowConfig,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "info,campus_kiosk=info",
        1 => "info,campus_kiosk=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();

    if let Some(cmd) = cli.command {
        return match cmd {
            Command::TestMic { duration } => test_mic(duration).await,
            Command::TestSpeaker => test_speaker().await,
            Command::TestTts { text } => test_tts(config_path, &text).await,
            Command::Seed { file } => seed(config_path, &file),
            Command::ShowConfig => show_config(config_path),
        };
    }

    let config = Config::load(config_path)?;
    tracing::debug!(?config, "loaded configuration");

    let kiosk = Kiosk::new(config)?;
    kiosk.run().await?;

    Ok(())
}

/// Test microphone input
async fn test_mic(duration: u64) -> anyhow::Result<()> {
    println!("Testing microphone for {duration} seconds...");
    println!("Speak into your microphone!\n");

    let mut capture = AudioCapture::new()?;
    capture.start()?;

    for i in 0..duration {
        tokio::time::sleep(Duration::from_secs(1)).await;

        let samples = capture.peek_buffer();
        let energy = calculate_rms(&samples);
        let peak = samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);

        // Visual meter
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let meter_len = (energy * 100.0).min(50.0) as usize;
        let meter: String = "#".repeat(meter_len) + &" ".repeat(50 - meter_len);

        println!(
            "[{:2}s] RMS: {:.4} | Peak: {:.4} | [{}]",
            i + 1,
            energy,
            peak,
            meter
        );

        capture.clear_buffer();
    }

    capture.stop();

    println!("\n---");
    println!("If you saw movement in the meter, your mic is working!");

    Ok(())
}

/// Calculate RMS energy
#[allow(clippy::cast_precision_loss)]
fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Test speaker output with a sine wave
async fn test_speaker() -> anyhow::Result<()> {
    println!("Testing speaker output...");
    println!("You should hear a 440Hz tone for 2 seconds\n");

    let playback = AudioPlayback::new()?;

    let sample_rate = 24000_u32;
    let frequency = 440.0_f32;
    let duration_secs = 2.0_f32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let num_samples = (sample_rate as f32 * duration_secs) as usize;

    #[allow(clippy::cast_precision_loss)]
    let samples: Vec<f32> = (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            (2.0 * std::f32::consts::PI * frequency * t).sin() * 0.3 // 30% volume
        })
        .collect();

    playback.play(samples).await?;

    println!("If you heard the tone, your speakers are working!");

    Ok(())
}

/// Test TTS output
async fn test_tts(config_path: Option<&std::path::Path>, text: &str) -> anyhow::Result<()> {
    println!("Testing TTS with text: \"{text}\"\n");

    let config = Config::load(config_path)?;
    let api_key = config
        .api_keys
        .openai
        .ok_or_else(|| anyhow::anyhow!("OpenAI API key required for TTS"))?;

    let tts = TextToSpeech::new(
        api_key,
        config.voice.tts_voice,
        config.voice.tts_speed,
        config.voice.tts_model,
    )?;

    println!("Synthesizing speech...");
    let mp3_data = tts.synthesize(text).await?;
    println!("Got {} bytes of audio data", mp3_data.len());

    println!("Playing audio...");
    let playback = AudioPlayback::new()?;
    playback.play_mp3(&mp3_data).await?;

    println!("If you heard the speech, TTS is working!");

    Ok(())
}

/// FAQ seed file schema
#[derive(serde::Deserialize)]
struct SeedFile {
    #[serde(default)]
    faq: Vec<SeedEntry>,
}

#[derive(serde::Deserialize)]
struct SeedEntry {
    question: String,
    answer: String,
}

/// Load FAQ rows from a TOML file
fn seed(config_path: Option<&std::path::Path>, file: &std::path::Path) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;

    let content = std::fs::read_to_string(file)?;
    let seed_file: SeedFile = toml::from_str(&content)?;

    if seed_file.faq.is_empty() {
        anyhow::bail!("no [[faq]] entries in {}", file.display());
    }

    let pool = store::init(&config.store.db_path)?;
    let repo = FaqRepo::new(pool);

    for entry in &seed_file.faq {
        repo.add(&entry.question, &entry.answer)?;
    }

    println!(
        "Seeded {} rows into {}",
        seed_file.faq.len(),
        config.store.db_path.display()
    );

    Ok(())
}

/// Print the resolved configuration
fn show_config(config_path: Option<&std::path::Path>) -> anyhow::Result<()> {
    let config = Config::load(config_path)?;
    println!("{config:#?}");

    if config_path.is_none() {
        if let Some(path) = campus_kiosk::config::config_file_path() {
            println!("\nconfig file: {}", path.display());
        }
    }

    Ok(())
}
