use crate::ui::widget::{CloseCallback, LastBody, TrackingWidget, WidgetConfig, WidgetHost};
use anyhow::Result;

/// Headless backend: the widget body goes to the log instead of the screen.
#[derive(Debug, Default)]
pub struct LogWidgetHost;

impl LogWidgetHost {
    pub fn new() -> Self {
        Self
    }
}

impl WidgetHost for LogWidgetHost {
    fn create(
        &mut self,
        config: &WidgetConfig,
        on_close: CloseCallback,
    ) -> Result<Box<dyn TrackingWidget>> {
        tracing::info!(title = %config.title, "Opened tracking display (log backend)");
        Ok(Box::new(LogWidget {
            title: config.title.clone(),
            last_body: LastBody::default(),
            on_close: Some(on_close),
        }))
    }
}

struct LogWidget {
    title: String,
    last_body: LastBody,
    on_close: Option<CloseCallback>,
}

impl TrackingWidget for LogWidget {
    fn update(&mut self, body: &str) -> Result<()> {
        if self.last_body.is_unchanged(body) {
            tracing::trace!(title = %self.title, "Tracking display unchanged");
            return Ok(());
        }

        tracing::info!(title = %self.title, body, "Tracking display updated");
        self.last_body.record(body);
        Ok(())
    }

    fn close(mut self: Box<Self>) {
        tracing::info!(title = %self.title, "Closed tracking display (log backend)");
        if let Some(on_close) = self.on_close.take() {
            on_close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::BodyFormat;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_close_runs_callback_once() {
        let closed = Arc::new(AtomicUsize::new(0));
        let closed_clone = Arc::clone(&closed);

        let mut host = LogWidgetHost::new();
        let config = WidgetConfig {
            title: "Tracking Display".to_string(),
            format: BodyFormat::Text,
        };
        let mut widget = host
            .create(
                &config,
                Box::new(move || {
                    closed_clone.fetch_add(1, Ordering::SeqCst);
                }),
            )
            .unwrap();

        widget.update("Tracking since: -").unwrap();
        widget.update("Tracking since: -").unwrap();
        assert_eq!(closed.load(Ordering::SeqCst), 0);

        widget.close();
        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }
}
