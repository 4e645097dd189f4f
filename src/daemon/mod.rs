mod app;
pub mod controller;
mod dbus;

use anyhow::Result;

pub use controller::{ControllerOptions, DisplayController};

pub const DBUS_NAME: &str = "io.github.octoprint.TrackingDisplay";
pub const DBUS_PATH: &str = "/io/github/octoprint/TrackingDisplay";

pub async fn run() -> Result<()> {
    tracing::info!("Starting tracking-display daemon");
    app::run().await
}
