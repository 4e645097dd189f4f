use crate::client::{ApiClient, ApiConfig};
use crate::core::settings::Settings;
use crate::daemon::dbus::start_dbus_server;
use crate::daemon::{ControllerOptions, DisplayController};
use crate::ui::{self, WidgetConfig};
use anyhow::{Context, Result};
use std::sync::Arc;

pub async fn run() -> Result<()> {
    let settings = Settings::load()?;

    let client = ApiClient::new(ApiConfig::from(&settings.server))
        .context("Failed to build HTTP client")?;

    tracing::info!(
        base_url = %settings.server.base_url,
        plugin_id = %settings.server.plugin_id,
        api_key = settings.server.api_key.is_some(),
        "Configured tracking endpoint"
    );

    let plugin_settings = match client.fetch_plugin_settings().await {
        Ok(plugin_settings) => plugin_settings,
        Err(e) => {
            tracing::warn!(error = %e, "Could not read plugin settings from host");
            None
        }
    };

    let options = ControllerOptions {
        plugin_id: settings.server.plugin_id.clone(),
        poll_interval: settings.display.poll_interval(),
        widget: WidgetConfig {
            title: settings.display.title.clone(),
            format: settings.display.body_format(),
        },
    };

    let host = ui::widget_host(settings.display.backend);
    let (mut controller, handle) = DisplayController::new(Arc::new(client), host, options);
    controller.bind_settings(plugin_settings);

    let _dbus_connection = match start_dbus_server(handle.clone()).await {
        Ok(connection) => Some(connection),
        Err(e) => {
            tracing::warn!(error = %e, "D-Bus control interface unavailable");
            None
        }
    };

    handle.activate()?;
    let mut controller_task = tokio::spawn(controller.run());

    tokio::select! {
        result = &mut controller_task => {
            result.context("Tracking display controller panicked")?;
            tracing::info!("Tracking display controller finished");
        }
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            tracing::info!("Interrupt received, shutting down");
            handle.stop()?;
            controller_task
                .await
                .context("Tracking display controller panicked")?;
        }
    }

    Ok(())
}
