use crate::ui::widget::{
    close_once, CloseCallback, LastBody, TrackingWidget, WidgetConfig, WidgetHost,
};
use anyhow::{Context, Result};
use notify_rust::{Notification, NotificationHandle, Timeout};

const APP_NAME: &str = "tracking-display";
const WAITING_BODY: &str = "Waiting for tracking data";

/// Shows the tracking display as a persistent desktop notification.
///
/// Updates replace the notification in place by reusing its id. The original
/// handle is parked on a helper thread that blocks until the notification
/// server reports the notification as closed.
#[derive(Debug, Default)]
pub struct DesktopWidgetHost;

impl DesktopWidgetHost {
    pub fn new() -> Self {
        Self
    }
}

impl WidgetHost for DesktopWidgetHost {
    fn create(
        &mut self,
        config: &WidgetConfig,
        on_close: CloseCallback,
    ) -> Result<Box<dyn TrackingWidget>> {
        let handle = Notification::new()
            .summary(&config.title)
            .body(WAITING_BODY)
            .appname(APP_NAME)
            .timeout(Timeout::Never)
            .show()
            .context("Failed to show tracking notification")?;

        let id = handle.id();
        let on_close = close_once(on_close);

        std::thread::Builder::new()
            .name("tracking-display-close".to_string())
            .spawn(move || {
                handle.on_close(on_close);
            })
            .context("Failed to spawn notification close listener")?;

        tracing::info!(id, title = %config.title, "Opened tracking notification");

        Ok(Box::new(DesktopWidget {
            id,
            title: config.title.clone(),
            current: None,
            last_body: LastBody::default(),
        }))
    }
}

struct DesktopWidget {
    id: u32,
    title: String,
    current: Option<NotificationHandle>,
    last_body: LastBody,
}

impl DesktopWidget {
    fn show(&self, body: &str) -> Result<NotificationHandle> {
        Notification::new()
            .id(self.id)
            .summary(&self.title)
            .body(body)
            .appname(APP_NAME)
            .timeout(Timeout::Never)
            .show()
            .context("Failed to update tracking notification")
    }
}

impl TrackingWidget for DesktopWidget {
    fn update(&mut self, body: &str) -> Result<()> {
        if self.last_body.is_unchanged(body) {
            return Ok(());
        }

        let handle = self.show(body)?;
        self.current = Some(handle);
        self.last_body.record(body);
        Ok(())
    }

    fn close(mut self: Box<Self>) {
        let handle = match self.current.take() {
            Some(handle) => Some(handle),
            None => self.show(WAITING_BODY).ok(),
        };

        match handle {
            Some(handle) => {
                tracing::info!(id = self.id, "Closing tracking notification");
                handle.close();
            }
            None => tracing::warn!(id = self.id, "Could not reach tracking notification to close it"),
        }
    }
}
