use crate::presentation::audio::Soundtrack;
use crate::presentation::confetti::ConfettiSettings;
use crate::presentation::terminal::PresentationSettings;
use crate::utils::error::{HoyError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_positive_number,
    validate_range, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Optional settings file. Timezone and target date are not configurable here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TomlConfig {
    pub presentation: PresentationConfig,
    pub audio: AudioConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresentationConfig {
    pub seed: Option<u64>,
    pub confetti_seconds: u64,
    pub confetti_interval_ms: u64,
    pub initial_burst: usize,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            confetti_seconds: 6,
            confetti_interval_ms: 180,
            initial_burst: 20,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AudioConfig {
    pub enabled: bool,
    pub path: String,
    pub player: String,
    pub player_args: Vec<String>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "assets/himno-colombia.mp3".to_string(),
            player: "mpv".to_string(),
            player_args: vec!["--no-video".to_string(), "--really-quiet".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub json: bool,
    pub level: Option<String>,
}

impl TomlConfig {
    /// Loads and parses a settings file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(HoyError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| HoyError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Expands `${VAR}` references from the environment; unknown ones are left as-is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| HoyError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Command line flags take precedence over the file.
    pub fn apply_overrides(&mut self, seed: Option<u64>, confetti_seconds: Option<u64>, no_audio: bool) {
        if let Some(seed) = seed {
            self.presentation.seed = Some(seed);
            tracing::debug!("🔧 Seed overridden to: {}", seed);
        }
        if let Some(seconds) = confetti_seconds {
            self.presentation.confetti_seconds = seconds;
            tracing::debug!("🔧 Confetti duration overridden to: {}s", seconds);
        }
        if no_audio {
            self.audio.enabled = false;
        }
    }

    pub fn presentation_settings(&self) -> PresentationSettings {
        let soundtrack = self.audio.enabled.then(|| {
            Soundtrack::new(
                &self.audio.path,
                self.audio.player.clone(),
                self.audio.player_args.clone(),
            )
        });

        PresentationSettings {
            seed: self.presentation.seed,
            confetti: ConfettiSettings {
                initial_burst: self.presentation.initial_burst,
                interval: Duration::from_millis(self.presentation.confetti_interval_ms),
                duration: Duration::from_secs(self.presentation.confetti_seconds),
            },
            soundtrack,
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_positive_number(
            "presentation.confetti_seconds",
            self.presentation.confetti_seconds,
            1,
        )?;
        validate_range(
            "presentation.confetti_interval_ms",
            self.presentation.confetti_interval_ms,
            16,
            10_000,
        )?;
        validate_range("presentation.initial_burst", self.presentation.initial_burst, 0, 500)?;

        if self.audio.enabled {
            validate_path("audio.path", &self.audio.path)?;
            validate_non_empty_string("audio.player", &self.audio.player)?;
        }

        if let Some(level) = &self.logging.level {
            validate_one_of("logging.level", level, &LOG_LEVELS)?;
        }

        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
