use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub const API_KEY_ENV: &str = "TRACKING_DISPLAY_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub base_url: String,
    pub plugin_id: String,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/".to_string(),
            plugin_id: "MaintenanceManager".to_string(),
            api_key: None,
            timeout_secs: None,
        }
    }
}

impl ServerSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyFormat {
    #[default]
    Html,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WidgetBackend {
    #[default]
    Desktop,
    Log,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub poll_interval_ms: u64,
    /// Unset picks `text` for the desktop backend, whose notification markup
    /// has no `<br>`/`<ul>`/`<li>`, and `html` otherwise.
    pub format: Option<BodyFormat>,
    pub backend: WidgetBackend,
    pub title: String,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            format: None,
            backend: WidgetBackend::Desktop,
            title: "Tracking Display".to_string(),
        }
    }
}

impl DisplaySettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn body_format(&self) -> BodyFormat {
        self.format.unwrap_or(match self.backend {
            WidgetBackend::Desktop => BodyFormat::Text,
            WidgetBackend::Log => BodyFormat::Html,
        })
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tracking-display").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path().context("Could not determine config directory")?;

        let mut settings = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            let settings: Settings = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

            tracing::info!(?path, "Loaded config");
            settings
        } else {
            tracing::info!(?path, "Config file not found, using defaults");
            Self::default()
        };

        settings.apply_env_overrides(std::env::var(API_KEY_ENV).ok());
        settings.validate()?;
        Ok(settings)
    }

    fn apply_env_overrides(&mut self, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            tracing::debug!("Using API key from {}", API_KEY_ENV);
            self.server.api_key = Some(key);
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.plugin_id.trim().is_empty() {
            anyhow::bail!("server.plugin_id must not be empty");
        }

        reqwest::Url::parse(&self.server.base_url)
            .with_context(|| format!("server.base_url is not a valid URL: {}", self.server.base_url))?;

        if self.display.poll_interval_ms == 0 {
            anyhow::bail!("display.poll_interval_ms must be greater than 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.base_url, "http://localhost:5000/");
        assert_eq!(settings.server.plugin_id, "MaintenanceManager");
        assert!(settings.server.api_key.is_none());
        assert!(settings.server.timeout().is_none());
        assert_eq!(settings.display.poll_interval(), Duration::from_secs(1));
        assert!(settings.display.format.is_none());
        assert_eq!(settings.display.body_format(), BodyFormat::Text);
        assert_eq!(settings.display.backend, WidgetBackend::Desktop);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.display.poll_interval_ms = 0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.server.plugin_id = "  ".to_string();
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.server.base_url = "not a url".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            [server]
            base_url = "http://octopi.local/"
            api_key = "ABC123"
            timeout_secs = 5

            [display]
            poll_interval_ms = 2500
            format = "text"
            backend = "log"
        "#;

        let settings: Settings = toml::from_str(toml).unwrap();
        assert_eq!(settings.server.base_url, "http://octopi.local/");
        assert_eq!(settings.server.plugin_id, "MaintenanceManager");
        assert_eq!(settings.server.api_key.as_deref(), Some("ABC123"));
        assert_eq!(settings.server.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(settings.display.poll_interval_ms, 2500);
        assert_eq!(settings.display.body_format(), BodyFormat::Text);
        assert_eq!(settings.display.backend, WidgetBackend::Log);
        assert_eq!(settings.display.title, "Tracking Display");
    }

    #[test]
    fn test_body_format_follows_backend_unless_set() {
        let desktop: Settings = toml::from_str("[display]\nbackend = \"desktop\"").unwrap();
        assert_eq!(desktop.display.body_format(), BodyFormat::Text);

        let log: Settings = toml::from_str("[display]\nbackend = \"log\"").unwrap();
        assert_eq!(log.display.body_format(), BodyFormat::Html);

        let forced: Settings =
            toml::from_str("[display]\nbackend = \"desktop\"\nformat = \"html\"").unwrap();
        assert_eq!(forced.display.body_format(), BodyFormat::Html);
    }

    #[test]
    fn test_env_api_key_overrides_file() {
        let mut settings = Settings::default();
        settings.server.api_key = Some("from-file".to_string());

        settings.apply_env_overrides(Some(" ".to_string()));
        assert_eq!(settings.server.api_key.as_deref(), Some("from-file"));

        settings.apply_env_overrides(Some("from-env".to_string()));
        assert_eq!(settings.server.api_key.as_deref(), Some("from-env"));
    }
}
