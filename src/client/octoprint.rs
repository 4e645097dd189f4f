use crate::client::TrackingSource;
use crate::core::models::{PluginSettings, TrackingResponse};
use crate::core::settings::ServerSettings;
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

const TRACKING_ENDPOINT: &str = "trackingInformation";
const SETTINGS_ENDPOINT: &str = "api/settings";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub plugin_id: String,
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
}

impl From<&ServerSettings> for ApiConfig {
    fn from(settings: &ServerSettings) -> Self {
        Self {
            base_url: settings.base_url.clone(),
            plugin_id: settings.plugin_id.clone(),
            api_key: settings.api_key.clone(),
            timeout: settings.timeout(),
        }
    }
}

pub struct ApiClient {
    config: ApiConfig,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            config,
            http: builder.build()?,
        })
    }

    pub fn plugin_id(&self) -> &str {
        &self.config.plugin_id
    }

    /// `<baseUrl>plugin/<pluginId>/trackingInformation`, plus `apikey` when configured.
    pub fn tracking_url(&self) -> Result<Url, FetchError> {
        self.endpoint(&format!(
            "plugin/{}/{}",
            self.config.plugin_id, TRACKING_ENDPOINT
        ))
    }

    pub fn settings_url(&self) -> Result<Url, FetchError> {
        self.endpoint(SETTINGS_ENDPOINT)
    }

    fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        let mut base = self.config.base_url.clone();
        if !base.ends_with('/') {
            base.push('/');
        }

        let mut url = Url::parse(&format!("{base}{path}"))
            .map_err(|e| FetchError::InvalidUrl(format!("{base}{path}: {e}")))?;

        if let Some(key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            url.query_pairs_mut().append_pair("apikey", key);
        }

        Ok(url)
    }

    /// Issues one request and hands whatever came back to `on_result`.
    pub async fn fetch_tracking_information_with<F, T>(&self, on_result: F) -> T
    where
        F: FnOnce(Result<TrackingResponse, FetchError>) -> T,
    {
        on_result(TrackingSource::fetch_tracking_information(self).await)
    }

    /// Reads `plugins.<pluginId>` from the host settings.
    pub async fn fetch_plugin_settings(&self) -> Result<Option<PluginSettings>, FetchError> {
        let url = self.settings_url()?;
        let settings: serde_json::Value = self.get_json(url).await?;

        let block = settings
            .get("plugins")
            .and_then(|plugins| plugins.get(&self.config.plugin_id))
            .cloned();

        match block {
            Some(block) => Ok(Some(serde_json::from_value(block)?)),
            None => {
                tracing::debug!(
                    plugin_id = %self.config.plugin_id,
                    "Host settings contain no block for plugin"
                );
                Ok(None)
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        tracing::trace!(path = url.path(), "GET");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status { status, body });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TrackingSource for ApiClient {
    async fn fetch_tracking_information(&self) -> Result<TrackingResponse, FetchError> {
        let url = self.tracking_url()?;
        self.get_json(url).await
    }
}
