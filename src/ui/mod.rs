mod desktop;
mod log;
pub mod render;
pub mod widget;

pub use desktop::DesktopWidgetHost;
pub use log::LogWidgetHost;
pub use render::render_body;
pub use widget::{TrackingWidget, WidgetConfig, WidgetHost};

use crate::core::settings::WidgetBackend;

pub fn widget_host(backend: WidgetBackend) -> Box<dyn WidgetHost> {
    match backend {
        WidgetBackend::Desktop => Box::new(DesktopWidgetHost::new()),
        WidgetBackend::Log => Box::new(LogWidgetHost::new()),
    }
}
