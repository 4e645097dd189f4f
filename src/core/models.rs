use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const PLACEHOLDER: &str = "-";

/// Cumulative print-time and axis-movement totals as reported by the plugin.
///
/// Every field is preformatted by the server ("15.11.2020 20:21", "2h13m5s",
/// "3m 12cm 4mm") and is displayed verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingSnapshot {
    #[serde(default)]
    pub tracking_since: Option<String>,
    #[serde(default)]
    pub total_print_time: Option<String>,
    #[serde(default)]
    pub x_movement: Option<String>,
    #[serde(default)]
    pub y_movement: Option<String>,
    #[serde(default)]
    pub z_movement: Option<String>,
    #[serde(default)]
    pub e_movement: Option<String>,
}

impl TrackingSnapshot {
    pub fn tracking_since_or_placeholder(&self) -> &str {
        or_placeholder(&self.tracking_since)
    }

    pub fn total_print_time_or_placeholder(&self) -> &str {
        or_placeholder(&self.total_print_time)
    }

    pub fn x_movement_or_placeholder(&self) -> &str {
        or_placeholder(&self.x_movement)
    }

    pub fn y_movement_or_placeholder(&self) -> &str {
        or_placeholder(&self.y_movement)
    }

    pub fn z_movement_or_placeholder(&self) -> &str {
        or_placeholder(&self.z_movement)
    }

    pub fn e_movement_or_placeholder(&self) -> &str {
        or_placeholder(&self.e_movement)
    }
}

fn or_placeholder(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(PLACEHOLDER)
}

/// Body of `GET plugin/<id>/trackingInformation`.
///
/// The server answers `{"trackingInformation": null}` while its tracking
/// service is not initialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingResponse {
    #[serde(default)]
    pub tracking_information: Option<TrackingSnapshot>,
}

/// The plugin's block from `GET api/settings` (`plugins.<pluginId>`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PluginSettings {
    #[serde(default)]
    pub installed_version: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_response() {
        let json = r#"{
            "trackingInformation": {
                "trackingSince": "15.11.2020 20:21",
                "totalPrintTime": "1d2h3m4s",
                "xMovement": "12m 3cm 4mm",
                "yMovement": "8m 0cm 1mm",
                "zMovement": "42cm 7mm",
                "eMovement": "1k 2m 3cm 4mm"
            }
        }"#;

        let response: TrackingResponse = serde_json::from_str(json).unwrap();
        let info = response.tracking_information.unwrap();
        assert_eq!(info.tracking_since.as_deref(), Some("15.11.2020 20:21"));
        assert_eq!(info.total_print_time.as_deref(), Some("1d2h3m4s"));
        assert_eq!(info.e_movement.as_deref(), Some("1k 2m 3cm 4mm"));
    }

    #[test]
    fn test_null_tracking_information() {
        let response: TrackingResponse =
            serde_json::from_str(r#"{"trackingInformation": null}"#).unwrap();
        assert!(response.tracking_information.is_none());
    }

    #[test]
    fn test_missing_tracking_information() {
        let response: TrackingResponse = serde_json::from_str(r#"{"other": 1}"#).unwrap();
        assert!(response.tracking_information.is_none());
    }

    #[test]
    fn test_partial_snapshot_uses_placeholders() {
        let snapshot: TrackingSnapshot =
            serde_json::from_str(r#"{"xMovement": "5mm", "eMovement": null}"#).unwrap();
        assert_eq!(snapshot.x_movement_or_placeholder(), "5mm");
        assert_eq!(snapshot.e_movement_or_placeholder(), PLACEHOLDER);
        assert_eq!(snapshot.tracking_since_or_placeholder(), PLACEHOLDER);
    }

    #[test]
    fn test_plugin_settings_keeps_unknown_keys() {
        let settings: PluginSettings = serde_json::from_str(
            r#"{"installed_version": "0.1.0", "showTrackingDisplay": true}"#,
        )
        .unwrap();
        assert_eq!(settings.installed_version.as_deref(), Some("0.1.0"));
        assert_eq!(
            settings.extra.get("showTrackingDisplay"),
            Some(&serde_json::Value::Bool(true))
        );
    }
}
