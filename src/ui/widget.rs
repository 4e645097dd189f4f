use crate::core::settings::BodyFormat;
use anyhow::Result;
use std::sync::Mutex;

/// Invoked once when the widget goes away, whether the user dismissed it or
/// it was closed programmatically.
pub type CloseCallback = Box<dyn FnOnce() + Send + 'static>;

/// Adapts a [`CloseCallback`] for APIs that want a reusable `Fn()`. Only the
/// first call reaches the callback.
pub fn close_once(on_close: CloseCallback) -> impl Fn() + Send + 'static {
    let on_close = Mutex::new(Some(on_close));
    move || {
        let callback = on_close.lock().ok().and_then(|mut slot| slot.take());
        if let Some(callback) = callback {
            callback();
        }
    }
}

/// Remembers the body last pushed to a widget so repeated ticks with the
/// same values do not redraw it.
#[derive(Debug, Default)]
pub struct LastBody(Option<String>);

impl LastBody {
    pub fn is_unchanged(&self, body: &str) -> bool {
        self.0.as_deref() == Some(body)
    }

    pub fn record(&mut self, body: &str) {
        self.0 = Some(body.to_string());
    }
}

#[derive(Debug, Clone)]
pub struct WidgetConfig {
    pub title: String,
    pub format: BodyFormat,
}

pub trait TrackingWidget: Send {
    fn update(&mut self, body: &str) -> Result<()>;
    fn close(self: Box<Self>);
}

pub trait WidgetHost: Send {
    fn create(
        &mut self,
        config: &WidgetConfig,
        on_close: CloseCallback,
    ) -> Result<Box<dyn TrackingWidget>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_close_once_runs_callback_a_single_time() {
        let closed = Arc::new(AtomicUsize::new(0));
        let closed_clone = Arc::clone(&closed);

        let handler = close_once(Box::new(move || {
            closed_clone.fetch_add(1, Ordering::SeqCst);
        }));

        fn requires_fn(handler: &impl Fn()) {
            handler();
        }

        requires_fn(&handler);
        requires_fn(&handler);
        handler();

        assert_eq!(closed.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_last_body_tracks_changes() {
        let mut last = LastBody::default();
        assert!(!last.is_unchanged("Tracking since: -"));

        last.record("Tracking since: -");
        assert!(last.is_unchanged("Tracking since: -"));
        assert!(!last.is_unchanged("Tracking since: 15.11.2020 20:21"));

        last.record("Tracking since: 15.11.2020 20:21");
        assert!(last.is_unchanged("Tracking since: 15.11.2020 20:21"));
    }
}
