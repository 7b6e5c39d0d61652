// Small helpers shared across the app.

use crate::model::GeoPoint;

/// Mean Earth radius in meters, for great-circle math.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Great-circle distance between two coordinates, in meters (haversine).
pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    let dlat = (b.lat - a.lat).to_radians();
    let dlng = (b.lng - a.lng).to_radians();
    let h = (dlat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (dlng / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Human label for a walking distance: whole meters under a kilometre,
/// kilometres to one decimal above.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{} meters", meters.round() as i64)
    } else {
        format!("{:.1} km", meters / 1000.0)
    }
}

/// "HH:MM" label for chat timestamps, from the device clock.
pub fn now_label() -> String {
    let now = js_sys::Date::new_0();
    format!("{:02}:{:02}", now.get_hours(), now.get_minutes())
}

pub fn clog(msg: &str) {
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(msg));
}
