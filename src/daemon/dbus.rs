use crate::daemon::controller::{ControllerHandle, PollState};
use crate::daemon::{DBUS_NAME, DBUS_PATH};
use anyhow::{Context, Result};
use zbus::interface;

pub struct TrackingDisplayService {
    handle: ControllerHandle,
}

impl TrackingDisplayService {
    pub fn new(handle: ControllerHandle) -> Self {
        Self { handle }
    }
}

fn to_fdo(e: anyhow::Error) -> zbus::fdo::Error {
    zbus::fdo::Error::Failed(e.to_string())
}

#[interface(name = "io.github.octoprint.TrackingDisplay")]
impl TrackingDisplayService {
    async fn show(&self) -> zbus::fdo::Result<()> {
        tracing::info!("D-Bus Show called");
        self.handle.resume().map_err(to_fdo)
    }

    async fn hide(&self) -> zbus::fdo::Result<()> {
        tracing::info!("D-Bus Hide called");
        self.handle.hide().map_err(to_fdo)
    }

    async fn stop(&self) -> zbus::fdo::Result<()> {
        tracing::info!("D-Bus Stop called");
        self.handle.stop().map_err(to_fdo)
    }

    async fn plugin_message(&self, plugin: &str, data: &str) -> zbus::fdo::Result<()> {
        let data: serde_json::Value = serde_json::from_str(data)
            .map_err(|e| zbus::fdo::Error::InvalidArgs(format!("data is not JSON: {e}")))?;
        self.handle.plugin_message(plugin, data).map_err(to_fdo)
    }

    #[zbus(property)]
    fn visible(&self) -> bool {
        self.handle.state() == PollState::Running
    }

    #[zbus(property)]
    fn state(&self) -> String {
        format!("{:?}", self.handle.state()).to_lowercase()
    }
}

pub async fn start_dbus_server(handle: ControllerHandle) -> Result<zbus::Connection> {
    let connection = zbus::connection::Builder::session()
        .context("Failed to connect to session D-Bus")?
        .name(DBUS_NAME)
        .context("Invalid D-Bus name")?
        .serve_at(DBUS_PATH, TrackingDisplayService::new(handle))
        .context("Failed to serve D-Bus interface")?
        .build()
        .await
        .with_context(|| format!("Failed to register {DBUS_NAME} on the session bus"))?;

    tracing::info!(name = DBUS_NAME, path = DBUS_PATH, "D-Bus service started");
    Ok(connection)
}
