use crate::client::{ApiClient, ApiConfig, FetchError};
use crate::core::models::{TrackingResponse, TrackingSnapshot};
use crate::core::settings::{BodyFormat, Settings};
use crate::ui::render_body;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct StatusOutput {
    plugin_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tracking_information: Option<TrackingSnapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(with = "chrono::serde::ts_seconds")]
    fetched_at: DateTime<Utc>,
}

pub async fn run(json: bool, format: BodyFormat) -> Result<()> {
    let settings = Settings::load()?;
    let client = ApiClient::new(ApiConfig::from(&settings.server))?;

    let output = client
        .fetch_tracking_information_with(|result| to_output(client.plugin_id(), result))
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text_output(&output, format);
    }

    Ok(())
}

fn to_output(plugin_id: &str, result: Result<TrackingResponse, FetchError>) -> StatusOutput {
    let (tracking_information, error) = match result {
        Ok(response) => (response.tracking_information, None),
        Err(e) => (None, Some(e.to_string())),
    };

    StatusOutput {
        plugin_id: plugin_id.to_string(),
        tracking_information,
        error,
        fetched_at: Utc::now(),
    }
}

fn print_text_output(output: &StatusOutput, format: BodyFormat) {
    println!("{}", output.plugin_id);

    if let Some(error) = &output.error {
        println!("  Error: {}", error);
        return;
    }

    if output.tracking_information.is_none() {
        println!("  No tracking information reported yet");
    }

    println!("{}", render_body(format, output.tracking_information.as_ref()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_from_error() {
        let output = to_output(
            "MaintenanceManager",
            Err(FetchError::InvalidUrl("bad".to_string())),
        );
        assert!(output.tracking_information.is_none());
        assert_eq!(output.error.as_deref(), Some("invalid endpoint URL: bad"));
    }

    #[test]
    fn test_json_output_skips_missing_payload() {
        let output = to_output("MaintenanceManager", Ok(TrackingResponse::default()));
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["plugin_id"], "MaintenanceManager");
        assert!(json.get("tracking_information").is_none());
        assert!(json.get("error").is_none());
        assert!(json["fetched_at"].is_i64());
    }

    #[test]
    fn test_json_output_uses_wire_field_names() {
        let output = to_output(
            "MaintenanceManager",
            Ok(TrackingResponse {
                tracking_information: Some(TrackingSnapshot {
                    total_print_time: Some("3m2s".to_string()),
                    ..Default::default()
                }),
            }),
        );
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["tracking_information"]["totalPrintTime"], "3m2s");
        assert!(json["tracking_information"]["eMovement"].is_null());
    }
}
