//! Application-level configuration loading: game defaults, reminder schedule and mail settings.

use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "HANGMAN_BACK_CONFIG_PATH";

/// Immutable runtime configuration shared across the application.
///
/// Every key is optional in the JSON file; missing keys keep their default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Wrong-guess budget used when a new game does not specify one.
    pub default_attempts: u32,
    /// Number of entries returned by the leaderboard when the caller does not ask.
    pub high_scores_limit: usize,
    /// Reminder job schedule.
    pub reminder: ReminderConfig,
    /// Sender and relay of reminder mails.
    pub mail: MailConfig,
}

/// Schedule of the job reminding users of their unfinished games.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReminderConfig {
    /// Whether the reminder job runs at all.
    pub enabled: bool,
    /// Cron expression with a seconds field, evaluated in UTC.
    pub schedule: String,
}

/// Outgoing mail settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// `From` address of reminder mails.
    pub sender: String,
    /// Subject line of reminder mails.
    pub subject: String,
    /// HTTP relay receiving reminder messages; mails are only logged when unset.
    pub relay_url: Option<String>,
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        Self::load_from(&resolve_config_path())
    }

    fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::parse(&contents) {
                Ok(config) => {
                    info!(
                        path = %path.display(),
                        reminder_enabled = config.reminder.enabled,
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse a JSON configuration document.
    pub fn parse(contents: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(contents)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_attempts: 6,
            high_scores_limit: 10,
            reminder: ReminderConfig::default(),
            mail: MailConfig::default(),
        }
    }
}

impl Default for ReminderConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            schedule: "0 0 9 * * *".into(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            sender: "noreply@hangman.local".into(),
            subject: "This is a reminder!".into(),
            relay_url: None,
        }
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_keeps_defaults() {
        let config = AppConfig::parse(
            r#"{ "default_attempts": 8, "mail": { "relay_url": "http://relay.local/send" } }"#,
        )
        .unwrap();

        assert_eq!(config.default_attempts, 8);
        assert_eq!(config.high_scores_limit, 10);
        assert_eq!(config.reminder, ReminderConfig::default());
        assert_eq!(config.mail.sender, "noreply@hangman.local");
        assert_eq!(
            config.mail.relay_url.as_deref(),
            Some("http://relay.local/send")
        );
    }

    #[test]
    fn empty_document_equals_defaults() {
        assert_eq!(AppConfig::parse("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn rejects_malformed_values() {
        assert!(AppConfig::parse(r#"{ "default_attempts": "six" }"#).is_err());
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = env::temp_dir().join("hangman-back-missing-config.json");
        assert_eq!(AppConfig::load_from(&path), AppConfig::default());
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let path = env::temp_dir().join(format!("hangman-back-{}.json", std::process::id()));
        fs::write(&path, "not json").unwrap();

        let config = AppConfig::load_from(&path);
        fs::remove_file(&path).ok();

        assert_eq!(config, AppConfig::default());
    }
}
