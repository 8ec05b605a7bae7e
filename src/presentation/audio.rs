use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::{Child, Command};

pub const FANFARE_NOTES: [(&str, f64); 3] = [("C5", 523.25), ("E5", 659.25), ("G5", 783.99)];
pub const MISSING_AUDIO_HINT: &str = "No se encontró el audio. Reproducir fanfarria.";
pub const BLOCKED_AUDIO_HINT: &str = "Intente de nuevo, patriota.";

pub enum PlaybackOutcome {
    /// The player is running in the background.
    Playing(Child),
    /// No audio file; the fanfare stands in for it.
    Fanfare,
    /// The player could not be started.
    Blocked { hint: &'static str },
}

/// Plays the anthem through an external player command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Soundtrack {
    path: PathBuf,
    player: String,
    player_args: Vec<String>,
}

impl Soundtrack {
    pub fn new(path: impl Into<PathBuf>, player: impl Into<String>, player_args: Vec<String>) -> Self {
        Self {
            path: path.into(),
            player: player.into(),
            player_args,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn play(&self) -> PlaybackOutcome {
        match tokio::fs::try_exists(&self.path).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!("Audio file not found: {}", self.path.display());
                return PlaybackOutcome::Fanfare;
            }
            Err(e) => {
                tracing::warn!("Cannot inspect audio file {}: {}", self.path.display(), e);
                return PlaybackOutcome::Fanfare;
            }
        }

        let spawned = Command::new(&self.player)
            .args(&self.player_args)
            .arg(&self.path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn();

        match spawned {
            Ok(child) => {
                tracing::info!("🎺 Playing {} with {}", self.path.display(), self.player);
                PlaybackOutcome::Playing(child)
            }
            Err(e) => {
                tracing::warn!("Audio player '{}' failed to start: {}", self.player, e);
                PlaybackOutcome::Blocked {
                    hint: BLOCKED_AUDIO_HINT,
                }
            }
        }
    }
}

/// Terminal rendition of the fallback fanfare: bell plus the C-major triad.
pub fn fanfare_line() -> String {
    let notes = FANFARE_NOTES
        .iter()
        .map(|(name, hz)| format!("{} ({:.2} Hz)", name, hz))
        .collect::<Vec<_>>()
        .join(" · ");
    format!("\x07♪ {}", notes)
}
