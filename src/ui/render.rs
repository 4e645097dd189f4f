use crate::core::models::TrackingSnapshot;
use crate::core::settings::BodyFormat;

pub fn render_body(format: BodyFormat, snapshot: Option<&TrackingSnapshot>) -> String {
    match format {
        BodyFormat::Html => render_html(snapshot),
        BodyFormat::Text => render_text(snapshot),
    }
}

/// Renders the notification markup. `None` renders every value as `-`.
pub fn render_html(snapshot: Option<&TrackingSnapshot>) -> String {
    let fields = DisplayFields::from(snapshot);

    format!(
        "Tracking since: <b>{}</b><br>\
         Total print time: <b>{}</b><br>\
         Total Movement:<br>\
         <ul>\
         <li>X: <b>{}</b></li>\
         <li>Y: <b>{}</b></li>\
         <li>Z: <b>{}</b></li>\
         <li>T0: <b>{}</b></li>\
         </ul>",
        fields.tracking_since,
        fields.total_print_time,
        fields.x_movement,
        fields.y_movement,
        fields.z_movement,
        fields.e_movement,
    )
}

pub fn render_text(snapshot: Option<&TrackingSnapshot>) -> String {
    let fields = DisplayFields::from(snapshot);

    format!(
        "Tracking since: {}\n\
         Total print time: {}\n\
         Total Movement:\n\
         \x20 X:  {}\n\
         \x20 Y:  {}\n\
         \x20 Z:  {}\n\
         \x20 T0: {}",
        fields.tracking_since,
        fields.total_print_time,
        fields.x_movement,
        fields.y_movement,
        fields.z_movement,
        fields.e_movement,
    )
}

struct DisplayFields<'a> {
    tracking_since: &'a str,
    total_print_time: &'a str,
    x_movement: &'a str,
    y_movement: &'a str,
    z_movement: &'a str,
    e_movement: &'a str,
}

impl<'a> From<Option<&'a TrackingSnapshot>> for DisplayFields<'a> {
    fn from(snapshot: Option<&'a TrackingSnapshot>) -> Self {
        static EMPTY: TrackingSnapshot = TrackingSnapshot {
            tracking_since: None,
            total_print_time: None,
            x_movement: None,
            y_movement: None,
            z_movement: None,
            e_movement: None,
        };
        let snapshot = snapshot.unwrap_or(&EMPTY);

        Self {
            tracking_since: snapshot.tracking_since_or_placeholder(),
            total_print_time: snapshot.total_print_time_or_placeholder(),
            x_movement: snapshot.x_movement_or_placeholder(),
            y_movement: snapshot.y_movement_or_placeholder(),
            z_movement: snapshot.z_movement_or_placeholder(),
            e_movement: snapshot.e_movement_or_placeholder(),
        }
    }
}
