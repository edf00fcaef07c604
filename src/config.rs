use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum charts selectable per recommendation tab
    pub max_selectable: usize,
    /// How long the export notice stays visible
    pub notice_secs: u64,
    pub tick_rate_ms: u64,
    /// Host document opened when none is given on the command line
    pub default_document: Option<String>,
    /// Log file; defaults to `~/.lux-widget/lux-widget.log`
    pub log_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_selectable: 10,
            notice_secs: 7,
            tick_rate_ms: 100,
            default_document: None,
            log_file: None,
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".lux-widget"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        Self::from_json(&contents)
    }

    fn from_json(contents: &str) -> Option<Config> {
        serde_json::from_str(contents).ok()
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(())
    }

    pub fn notice_duration(&self) -> Duration {
        Duration::from_secs(self.notice_secs)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(10))
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        match &self.log_file {
            Some(path) => Some(PathBuf::from(path)),
            None => Self::config_dir().map(|dir| dir.join("lux-widget.log")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_falls_back_to_defaults() {
        let config = Config::from_json(r#"{"max_selectable": 3}"#).unwrap();
        assert_eq!(config.max_selectable, 3);
        assert_eq!(config.notice_duration(), Duration::from_secs(7));
        assert_eq!(config.tick_rate(), Duration::from_millis(100));
    }

    #[test]
    fn test_malformed_config_is_ignored() {
        assert!(Config::from_json("{ not json").is_none());
    }

    #[test]
    fn test_explicit_log_file_wins() {
        let config = Config {
            log_file: Some("/tmp/widget.log".to_string()),
            ..Config::default()
        };
        assert_eq!(config.log_path(), Some(PathBuf::from("/tmp/widget.log")));
    }
}
