use crate::client::TrackingSource;
use crate::core::models::{PluginSettings, TrackingResponse, TrackingSnapshot};
use crate::ui::{render_body, TrackingWidget, WidgetConfig, WidgetHost};
use anyhow::{anyhow, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// No widget, no schedule.
    Inactive,
    Running,
    /// Widget closed or hidden; the schedule is kept but ticks do nothing.
    Paused,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Rendered,
    NoPayload,
    Failed,
    Idle,
}

#[derive(Debug)]
pub enum ControlCommand {
    Activate,
    Hide,
    Resume,
    Stop,
    WidgetClosed { generation: u64 },
    PluginMessage { plugin: String, data: serde_json::Value },
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub plugin_id: String,
    pub poll_interval: Duration,
    pub widget: WidgetConfig,
}

/// Cloneable sender side used by the daemon, D-Bus service and signal handler.
#[derive(Clone)]
pub struct ControllerHandle {
    commands: mpsc::UnboundedSender<ControlCommand>,
    state: watch::Receiver<PollState>,
}

impl ControllerHandle {
    pub fn activate(&self) -> Result<()> {
        self.send(ControlCommand::Activate)
    }

    pub fn hide(&self) -> Result<()> {
        self.send(ControlCommand::Hide)
    }

    pub fn resume(&self) -> Result<()> {
        self.send(ControlCommand::Resume)
    }

    pub fn stop(&self) -> Result<()> {
        self.send(ControlCommand::Stop)
    }

    pub fn plugin_message(&self, plugin: &str, data: serde_json::Value) -> Result<()> {
        self.send(ControlCommand::PluginMessage {
            plugin: plugin.to_string(),
            data,
        })
    }

    pub fn state(&self) -> PollState {
        *self.state.borrow()
    }

    fn send(&self, command: ControlCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| anyhow!("Tracking display controller has stopped"))
    }
}

pub struct DisplayController {
    source: Arc<dyn TrackingSource>,
    host: Box<dyn WidgetHost>,
    options: ControllerOptions,
    widget: Option<Box<dyn TrackingWidget>>,
    widget_generation: u64,
    visible: bool,
    state: PollState,
    last_snapshot: Option<TrackingSnapshot>,
    plugin_settings: Option<PluginSettings>,
    commands_tx: mpsc::WeakUnboundedSender<ControlCommand>,
    commands_rx: Option<mpsc::UnboundedReceiver<ControlCommand>>,
    state_tx: watch::Sender<PollState>,
}

impl DisplayController {
    pub fn new(
        source: Arc<dyn TrackingSource>,
        host: Box<dyn WidgetHost>,
        options: ControllerOptions,
    ) -> (Self, ControllerHandle) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(PollState::Inactive);

        let controller = Self {
            source,
            host,
            options,
            widget: None,
            widget_generation: 0,
            visible: false,
            state: PollState::Inactive,
            last_snapshot: None,
            plugin_settings: None,
            commands_tx: commands_tx.downgrade(),
            commands_rx: Some(commands_rx),
            state_tx,
        };

        let handle = ControllerHandle {
            commands: commands_tx,
            state: state_rx,
        };

        (controller, handle)
    }

    #[allow(dead_code)]
    pub fn state(&self) -> PollState {
        self.state
    }

    #[allow(dead_code)]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    #[allow(dead_code)]
    pub fn plugin_settings(&self) -> Option<&PluginSettings> {
        self.plugin_settings.as_ref()
    }

    pub fn bind_settings(&mut self, settings: Option<PluginSettings>) {
        match &settings {
            Some(s) => tracing::info!(
                plugin_id = %self.options.plugin_id,
                installed_version = s.installed_version.as_deref().unwrap_or("unknown"),
                "Bound plugin settings"
            ),
            None => tracing::debug!(plugin_id = %self.options.plugin_id, "No plugin settings to bind"),
        }
        self.plugin_settings = settings;
    }

    /// Creates the widget and starts polling. Does nothing once activated.
    pub fn activate(&mut self) -> Result<()> {
        if self.state != PollState::Inactive {
            tracing::debug!(state = ?self.state, "Tracking display already activated");
            return Ok(());
        }

        self.open_widget()?;
        self.visible = true;
        self.set_state(PollState::Running);
        tracing::info!(
            interval_ms = self.options.poll_interval.as_millis() as u64,
            "Tracking display activated"
        );
        Ok(())
    }

    /// Closes the widget and pauses polling until [`resume`](Self::resume).
    pub fn hide(&mut self) {
        if self.state != PollState::Running {
            return;
        }

        self.visible = false;
        self.set_state(PollState::Paused);
        if let Some(widget) = self.widget.take() {
            widget.close();
        }
        tracing::info!("Tracking display hidden, polling paused");
    }

    pub fn resume(&mut self) -> Result<()> {
        match self.state {
            PollState::Inactive => self.activate(),
            PollState::Paused => {
                if self.widget.is_none() {
                    self.open_widget()?;
                }
                self.visible = true;
                self.set_state(PollState::Running);
                tracing::info!("Tracking display resumed");
                Ok(())
            }
            PollState::Running | PollState::Stopped => Ok(()),
        }
    }

    pub fn stop(&mut self) {
        if self.state == PollState::Stopped {
            return;
        }

        self.visible = false;
        self.set_state(PollState::Stopped);
        if let Some(widget) = self.widget.take() {
            widget.close();
        }
        tracing::info!("Tracking display stopped");
    }

    fn widget_closed(&mut self, generation: u64) {
        if generation != self.widget_generation {
            tracing::debug!(generation, "Ignoring close of a replaced widget");
            return;
        }

        self.widget = None;
        self.visible = false;
        if self.state == PollState::Running {
            self.set_state(PollState::Paused);
            tracing::info!("Tracking display closed, polling paused");
        }
    }

    /// Push channel from the host. Returns whether the message was addressed
    /// to this plugin.
    pub fn on_plugin_message(&self, plugin: &str, data: &serde_json::Value) -> bool {
        if plugin != self.options.plugin_id {
            return false;
        }

        tracing::debug!(plugin, %data, "Received plugin message");
        true
    }

    /// One poll-render iteration.
    pub async fn tick(&mut self) -> TickOutcome {
        if !self.visible {
            return TickOutcome::Idle;
        }

        match self.source.fetch_tracking_information().await {
            Ok(TrackingResponse {
                tracking_information: Some(snapshot),
            }) => {
                self.render(Some(&snapshot));
                self.last_snapshot = Some(snapshot);
                TickOutcome::Rendered
            }
            Ok(_) => {
                tracing::debug!("Response carried no tracking information");
                TickOutcome::NoPayload
            }
            Err(e) => {
                tracing::debug!(error = %e, "Failed to fetch tracking information");
                TickOutcome::Failed
            }
        }
    }

    pub fn handle_command(&mut self, command: ControlCommand) {
        let result = match command {
            ControlCommand::Activate => self.activate(),
            ControlCommand::Resume => self.resume(),
            ControlCommand::Hide => {
                self.hide();
                Ok(())
            }
            ControlCommand::Stop => {
                self.stop();
                Ok(())
            }
            ControlCommand::WidgetClosed { generation } => {
                self.widget_closed(generation);
                Ok(())
            }
            ControlCommand::PluginMessage { plugin, data } => {
                self.on_plugin_message(&plugin, &data);
                Ok(())
            }
        };

        if let Err(e) = result {
            tracing::error!(error = %e, "Failed to open tracking display");
        }
    }

    /// Drives the controller until stopped or until every handle is dropped.
    ///
    /// The next tick is scheduled one interval after the previous fetch
    /// completed, so ticks never overlap.
    pub async fn run(mut self) {
        let Some(mut commands) = self.commands_rx.take() else {
            tracing::warn!("Tracking display controller is already running");
            return;
        };

        let mut next_tick = Instant::now();

        while self.state != PollState::Stopped {
            let was_running = self.state == PollState::Running;

            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => self.stop(),
                },
                _ = tokio::time::sleep_until(next_tick), if was_running => {
                    self.tick().await;
                    next_tick = Instant::now() + self.options.poll_interval;
                }
            }

            if !was_running && self.state == PollState::Running {
                next_tick = Instant::now();
            }
        }
    }

    fn open_widget(&mut self) -> Result<()> {
        self.widget_generation += 1;
        let generation = self.widget_generation;
        let commands = self.commands_tx.clone();

        let on_close = Box::new(move || {
            if let Some(commands) = commands.upgrade() {
                let _ = commands.send(ControlCommand::WidgetClosed { generation });
            }
        });

        let widget = self.host.create(&self.options.widget, on_close)?;
        self.widget = Some(widget);
        self.render(self.last_snapshot.clone().as_ref());
        Ok(())
    }

    fn render(&mut self, snapshot: Option<&TrackingSnapshot>) {
        let Some(widget) = self.widget.as_mut() else {
            return;
        };

        let body = render_body(self.options.widget.format, snapshot);
        if let Err(e) = widget.update(&body) {
            tracing::warn!(error = %e, "Failed to update tracking display");
        }
    }

    fn set_state(&mut self, state: PollState) {
        self.state = state;
        self.state_tx.send_replace(state);
    }
}
