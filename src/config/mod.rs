pub mod toml_config;

#[cfg(feature = "cli")]
use chrono::{DateTime, Utc};
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "es-hoy")]
#[command(about = "Is it July 20th in Colombia? SÍ or NO.")]
pub struct CliConfig {
    /// Raw query string, e.g. "?test=si" to force the answer
    #[arg(long, default_value = "")]
    pub query: String,

    /// Evaluate at this RFC 3339 instant instead of now
    #[arg(long)]
    pub at: Option<DateTime<Utc>>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Print the verdict as JSON instead of presenting it
    #[arg(long)]
    pub json: bool,

    /// Seed for message and confetti randomness
    #[arg(long)]
    pub seed: Option<u64>,

    /// Override confetti duration from config
    #[arg(long)]
    pub confetti_seconds: Option<u64>,

    /// Skip audio playback
    #[arg(long)]
    pub no_audio: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}
