use std::path::PathBuf;
use std::time::Duration;
use anyhow::{anyhow, Context, Result};
use log::warn;
use simplelog::LevelFilter;
use url::Url;
use crate::utils::celebration::DEFAULT_THRESHOLD;
use crate::utils::share::APP_URL;

pub const DEFAULT_PREFS_PATH: &str = "preferences.json";
pub const DEFAULT_REMOVE_DELAY_MS: u64 = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramSettings {
    pub bot_token: String,
    pub chat_id: i64,
}

/// Runtime settings, read from the environment (and `.env` via dotenv).
#[derive(Debug, Clone)]
pub struct Settings {
    pub log_level: LevelFilter,
    pub prefs_path: PathBuf,
    /// OS dark-mode signal; `None` when the platform gives none.
    pub prefers_dark: Option<bool>,
    pub remove_delay: Duration,
    pub celebrate_at: f64,
    pub share_url: Url,
    pub telegram: Option<TelegramSettings>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Settings::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let log_level = match var("CGPA_LOG_LEVEL") {
            Some(level) => level
                .parse::<LevelFilter>()
                .map_err(|_| anyhow!("CGPA_LOG_LEVEL has unknown level `{}`", level))?,
            None => LevelFilter::Info,
        };

        let prefers_dark = match var("CGPA_PREFERS_DARK") {
            Some(flag) => Some(parse_flag(&flag).context("CGPA_PREFERS_DARK must be true or false")?),
            None => None,
        };

        let remove_delay_ms = match var("CGPA_REMOVE_DELAY_MS") {
            Some(ms) => ms.parse::<u64>().context("CGPA_REMOVE_DELAY_MS must be a whole number")?,
            None => DEFAULT_REMOVE_DELAY_MS,
        };

        let celebrate_at = match var("CGPA_CELEBRATE_AT") {
            Some(value) => {
                let threshold = value.parse::<f64>().context("CGPA_CELEBRATE_AT must be a number")?;
                if !threshold.is_finite() {
                    return Err(anyhow!("CGPA_CELEBRATE_AT must be a finite number, got `{}`", value));
                }
                threshold
            }
            None => DEFAULT_THRESHOLD,
        };

        let share_url = var("CGPA_SHARE_URL").unwrap_or_else(|| APP_URL.to_string());
        let share_url = Url::parse(&share_url).context("CGPA_SHARE_URL is not a valid URL")?;

        let telegram = match (var("BOT_TOKEN"), var("CHAT_ID")) {
            (Some(bot_token), Some(chat_id)) => Some(TelegramSettings {
                bot_token,
                chat_id: chat_id.parse().context("CHAT_ID must be a numeric chat id")?,
            }),
            (None, None) => None,
            _ => {
                warn!("Sharing via Telegram needs both BOT_TOKEN and CHAT_ID, ignoring");
                None
            }
        };

        Ok(Settings {
            log_level,
            prefs_path: var("CGPA_PREFS_PATH").map(PathBuf::from).unwrap_or_else(|| DEFAULT_PREFS_PATH.into()),
            prefers_dark,
            remove_delay: Duration::from_millis(remove_delay_ms),
            celebrate_at,
            share_url,
            telegram,
        })
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "dark" => Ok(true),
        "0" | "false" | "no" | "light" => Ok(false),
        other => Err(anyhow!("unrecognised flag `{}`", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let settings = settings(&[]).unwrap();
        assert_eq!(settings.log_level, LevelFilter::Info);
        assert_eq!(settings.prefs_path, PathBuf::from(DEFAULT_PREFS_PATH));
        assert_eq!(settings.prefers_dark, None);
        assert_eq!(settings.remove_delay, Duration::from_millis(200));
        assert_eq!(settings.celebrate_at, 9.0);
        assert_eq!(settings.share_url.host_str(), Some("cgpacalculator.himavarshithreddy.in"));
        assert!(settings.telegram.is_none());
    }

    #[test]
    fn reads_overrides() {
        let settings = settings(&[
            ("CGPA_LOG_LEVEL", "debug"),
            ("CGPA_PREFS_PATH", "/tmp/prefs.json"),
            ("CGPA_PREFERS_DARK", "TRUE"),
            ("CGPA_REMOVE_DELAY_MS", "0"),
            ("CGPA_CELEBRATE_AT", "8.5"),
            ("BOT_TOKEN", "123:abc"),
            ("CHAT_ID", "-1001"),
        ])
        .unwrap();
        assert_eq!(settings.log_level, LevelFilter::Debug);
        assert_eq!(settings.prefs_path, PathBuf::from("/tmp/prefs.json"));
        assert_eq!(settings.prefers_dark, Some(true));
        assert_eq!(settings.remove_delay, Duration::ZERO);
        assert_eq!(settings.celebrate_at, 8.5);
        assert_eq!(
            settings.telegram,
            Some(TelegramSettings { bot_token: "123:abc".into(), chat_id: -1001 })
        );
    }

    #[test]
    fn blank_values_count_as_unset() {
        let settings = settings(&[("CGPA_PREFERS_DARK", "  "), ("CGPA_LOG_LEVEL", "")]).unwrap();
        assert_eq!(settings.prefers_dark, None);
        assert_eq!(settings.log_level, LevelFilter::Info);
    }

    #[test]
    fn celebration_threshold_must_be_finite() {
        assert!(settings(&[("CGPA_CELEBRATE_AT", "NaN")]).is_err());
        assert!(settings(&[("CGPA_CELEBRATE_AT", "inf")]).is_err());
        assert!(settings(&[("CGPA_CELEBRATE_AT", "-infinity")]).is_err());
        assert_eq!(settings(&[("CGPA_CELEBRATE_AT", "9.5")]).unwrap().celebrate_at, 9.5);
    }

    #[test]
    fn half_configured_telegram_is_ignored() {
        assert!(settings(&[("BOT_TOKEN", "123:abc")]).unwrap().telegram.is_none());
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(settings(&[("CGPA_LOG_LEVEL", "loud")]).is_err());
        assert!(settings(&[("CGPA_PREFERS_DARK", "maybe")]).is_err());
        assert!(settings(&[("CGPA_REMOVE_DELAY_MS", "-1")]).is_err());
        assert!(settings(&[("CGPA_SHARE_URL", "not a url")]).is_err());
        assert!(settings(&[("CGPA_CELEBRATE_AT", "nine")]).is_err());
        assert!(settings(&[("BOT_TOKEN", "t"), ("CHAT_ID", "general")]).is_err());
    }
}
