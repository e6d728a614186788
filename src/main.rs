use std::path::{Path, PathBuf};

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use voice_relay::{RelayConfig, SynthesisEngine, SynthesisRequest};

/// Voice Relay - resilient speech synthesis over a pool of Genie TTS servers
#[derive(Parser, Debug)]
#[command(name = "voice-relay")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Synthesize text with a character voice and print the resulting WAV path
    Speak {
        /// Character (voice) name known to the servers
        #[arg(long)]
        character: String,

        /// Reference audio path, as seen by the servers
        #[arg(long = "ref-audio-path")]
        ref_audio_path: String,

        /// Transcript of the reference audio
        #[arg(long = "ref-audio-text")]
        ref_audio_text: String,

        /// Text to synthesize
        #[arg(long)]
        text: String,

        /// Identifier attached to every log line of this request
        #[arg(long = "correlation-id")]
        correlation_id: Option<String>,

        /// Move the resulting WAV file here
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (must be done before config loading)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = if let Some(config_path) = cli.config {
        info!("Loading configuration from {}", config_path.display());
        RelayConfig::from_file(&config_path).map_err(|e| anyhow!(e.to_string()))?
    } else {
        RelayConfig::from_env().map_err(|e| anyhow!(e.to_string()))?
    };

    match cli.command {
        Commands::Speak {
            character,
            ref_audio_path,
            ref_audio_text,
            text,
            correlation_id,
            output,
        } => {
            let engine = SynthesisEngine::from_config(&config)?;
            let correlation_id =
                correlation_id.unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
            let request = SynthesisRequest::new(
                character,
                ref_audio_path,
                ref_audio_text,
                text,
                correlation_id,
            );

            let audio = engine.synthesize(&request).await?;
            if audio.is_partial() {
                warn!(
                    missing = ?audio.missing_chunks,
                    total = audio.chunk_count,
                    "Audio is missing some chunks"
                );
            }

            let path = match output {
                Some(target) => move_file(audio.asset.path(), &target).await?,
                None => audio.asset.into_path(),
            };
            println!("{}", path.display());
        }
    }

    Ok(())
}

/// Rename, falling back to copy and delete when crossing filesystems.
async fn move_file(from: &Path, to: &Path) -> anyhow::Result<PathBuf> {
    if let Some(parent) = to.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    if tokio::fs::rename(from, to).await.is_err() {
        tokio::fs::copy(from, to)
            .await
            .map_err(|e| anyhow!("Failed to write {}: {e}", to.display()))?;
        if let Err(e) = tokio::fs::remove_file(from).await {
            warn!("Failed to remove {}: {e}", from.display());
        }
    }
    Ok(to.to_path_buf())
}
