//! Configuration types for the quote bot.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Closed integer range of seconds used for interval selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalRange {
    /// Lower bound in seconds (inclusive).
    pub min: u64,
    /// Upper bound in seconds (inclusive).
    pub max: u64,
}

impl IntervalRange {
    /// The range's lower bound as a duration.
    ///
    /// For `chat_active_probe` this doubles as the inactivity threshold:
    /// chat is presumed dead once it has been silent longer than `min`.
    #[must_use]
    pub fn threshold(&self) -> Duration {
        Duration::from_secs(self.min)
    }
}

/// Closed integer range of characters bounding an acceptable quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthRange {
    /// Quotes must be strictly longer than this.
    pub min: usize,
    /// Quotes must be strictly shorter than this.
    pub max: usize,
}

/// Top-level configuration for the bot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Channel to join (Twitch channel name, lowercase, no `#`).
    pub channel: String,
    /// The bot's own account name; used for loop-back suppression.
    pub nick: String,
    /// Delay range while no channel session has been resolved yet.
    pub startup_probe: IntervalRange,
    /// Delay range while chat looks inactive. The range's `min` is also the
    /// inactivity threshold in seconds.
    pub chat_active_probe: IntervalRange,
    /// Delay range between quotes while chat is active.
    pub auto_quote_time: IntervalRange,
    /// Acceptable quote length (exclusive on both ends).
    pub quote_length: LengthRange,
    /// Path to the quote corpus file (one quote per line).
    pub corpus_path: PathBuf,
    /// OAuth credential settings.
    pub auth: AuthConfig,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            channel: "sergeyager".to_owned(),
            nick: "snergebot".to_owned(),
            startup_probe: IntervalRange { min: 10, max: 30 },
            chat_active_probe: IntervalRange { min: 300, max: 600 },
            auto_quote_time: IntervalRange { min: 480, max: 1200 },
            quote_length: LengthRange { min: 24, max: 80 },
            corpus_path: PathBuf::from("quotes.txt"),
            auth: AuthConfig::default(),
        }
    }
}

/// OAuth credential configuration.
///
/// Secrets are referenced by environment variable, never stored inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Environment variable holding the IRC OAuth access token.
    pub token_env: String,
    /// Environment variable holding the app client id (for refresh).
    pub client_id_env: String,
    /// Environment variable holding the app client secret (for refresh).
    pub client_secret_env: String,
    /// Environment variable holding the refresh token (for refresh).
    pub refresh_token_env: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_env: "TWITCH_OAUTH_TOKEN".to_owned(),
            client_id_env: "TWITCH_CLIENT_ID".to_owned(),
            client_secret_env: "TWITCH_CLIENT_SECRET".to_owned(),
            refresh_token_env: "TWITCH_REFRESH_TOKEN".to_owned(),
        }
    }
}

impl BotConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| crate::error::BotError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::BotError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `~/.config/snerge/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("snerge").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("snerge")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/snerge-config/config.toml")
        }
    }

    /// Check range invariants: every `min` must not exceed its `max`.
    ///
    /// # Errors
    ///
    /// Returns a `Config` error naming the offending range.
    pub fn validate(&self) -> crate::error::Result<()> {
        for (name, range) in [
            ("startup_probe", &self.startup_probe),
            ("chat_active_probe", &self.chat_active_probe),
            ("auto_quote_time", &self.auto_quote_time),
        ] {
            if range.min > range.max {
                return Err(crate::error::BotError::Config(format!(
                    "{name}: min {} exceeds max {}",
                    range.min, range.max
                )));
            }
        }
        if self.quote_length.min > self.quote_length.max {
            return Err(crate::error::BotError::Config(format!(
                "quote_length: min {} exceeds max {}",
                self.quote_length.min, self.quote_length.max
            )));
        }
        if self.channel.trim().is_empty() {
            return Err(crate::error::BotError::Config(
                "channel must not be empty".to_owned(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = BotConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.startup_probe.min <= config.startup_probe.max);
        assert!(config.chat_active_probe.min <= config.chat_active_probe.max);
        assert!(config.auto_quote_time.min <= config.auto_quote_time.max);
        assert!(config.quote_length.min < config.quote_length.max);
        assert!(!config.channel.is_empty());
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = BotConfig::default();
        config.channel = "examplechannel".to_owned();
        config.auto_quote_time = IntervalRange { min: 60, max: 120 };

        config.save_to_file(&path).unwrap();
        let loaded = BotConfig::from_file(&path).unwrap();

        assert_eq!(loaded.channel, "examplechannel");
        assert_eq!(loaded.auto_quote_time, IntervalRange { min: 60, max: 120 });
        assert_eq!(loaded.quote_length, config.quote_length);
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = BotConfig::from_file(std::path::Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn inverted_range_rejected() {
        let mut config = BotConfig::default();
        config.startup_probe = IntervalRange { min: 30, max: 10 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_channel_rejected() {
        let mut config = BotConfig::default();
        config.channel = "  ".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn threshold_is_range_min() {
        let range = IntervalRange { min: 300, max: 600 };
        assert_eq!(range.threshold(), Duration::from_secs(300));
    }

    #[test]
    fn default_config_path_ends_with_config_toml() {
        let path = BotConfig::default_config_path();
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }
}
