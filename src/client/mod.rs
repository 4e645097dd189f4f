mod octoprint;

use crate::core::models::TrackingResponse;
use async_trait::async_trait;

pub use octoprint::{ApiClient, ApiConfig, FetchError};

/// Where the display controller gets its tracking data from.
#[async_trait]
pub trait TrackingSource: Send + Sync {
    /// Performs exactly one request. Failures are returned, never retried.
    async fn fetch_tracking_information(&self) -> Result<TrackingResponse, FetchError>;
}
