//! Device position stream.
//!
//! Wraps the browser geolocation watch in an owning handle: building a
//! [`PositionStream`] asks for one immediate fix and then subscribes to
//! continuous updates, and dropping it clears the watch. The closures
//! backing the browser callbacks live inside the handle so they stay
//! valid for exactly as long as the subscription does.

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Geolocation, GeolocationPosition, GeolocationPositionError, PositionOptions};
use yew::Callback;

use crate::model::{GeoPoint, PositionFix};

/// Knobs passed straight through to the browser watch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoConfig {
    pub high_accuracy: bool,
    pub timeout_ms: u32,
    pub max_age_ms: u32,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout_ms: 10_000,
            max_age_ms: 0,
        }
    }
}

/// The three failure classes the browser reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoError {
    PermissionDenied,
    Unavailable,
    Timeout,
}

impl GeoError {
    fn from_code(code: u16) -> Self {
        match code {
            1 => Self::PermissionDenied,
            3 => Self::Timeout,
            _ => Self::Unavailable,
        }
    }
}

impl std::fmt::Display for GeoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::PermissionDenied => "location permission denied",
            Self::Unavailable => "location unavailable",
            Self::Timeout => "location request timed out",
        };
        f.write_str(text)
    }
}

fn fix_from(position: &GeolocationPosition) -> PositionFix {
    let coords = position.coords();
    PositionFix {
        point: GeoPoint {
            lat: coords.latitude(),
            lng: coords.longitude(),
        },
        captured_at_ms: js_sys::Date::now(),
    }
}

fn options_from(config: GeoConfig) -> PositionOptions {
    let options = PositionOptions::new();
    options.set_enable_high_accuracy(config.high_accuracy);
    options.set_timeout(config.timeout_ms);
    options.set_maximum_age(config.max_age_ms);
    options
}

/// Live geolocation subscription. Drop to unsubscribe.
pub struct PositionStream {
    geolocation: Geolocation,
    watch_id: i32,
    _watch_ok: Closure<dyn FnMut(GeolocationPosition)>,
    _watch_err: Closure<dyn FnMut(GeolocationPositionError)>,
    _first_ok: Closure<dyn FnMut(GeolocationPosition)>,
    _first_err: Closure<dyn FnMut(GeolocationPositionError)>,
}

impl PositionStream {
    /// Start streaming fixes into `on_fix`.
    ///
    /// The one-shot request fires first so the caller gets a point as
    /// soon as the browser has one; if that request fails, `fallback`
    /// is emitted as a synthetic fix so the map still has somewhere to
    /// put the user. Watch errors after that only report, keeping the
    /// last good fix on screen.
    pub fn start(
        config: GeoConfig,
        fallback: GeoPoint,
        on_fix: Callback<PositionFix>,
        on_error: Callback<GeoError>,
    ) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let geolocation = window.navigator().geolocation()?;
        let options = options_from(config);

        let first_ok = {
            let on_fix = on_fix.clone();
            Closure::wrap(Box::new(move |position: GeolocationPosition| {
                on_fix.emit(fix_from(&position));
            }) as Box<dyn FnMut(GeolocationPosition)>)
        };
        let first_err = {
            let on_fix = on_fix.clone();
            let on_error = on_error.clone();
            Closure::wrap(Box::new(move |error: GeolocationPositionError| {
                on_error.emit(GeoError::from_code(error.code()));
                on_fix.emit(PositionFix {
                    point: fallback,
                    captured_at_ms: js_sys::Date::now(),
                });
            }) as Box<dyn FnMut(GeolocationPositionError)>)
        };
        geolocation.get_current_position_with_error_callback_and_options(
            first_ok.as_ref().unchecked_ref(),
            Some(first_err.as_ref().unchecked_ref()),
            &options,
        );

        let watch_ok = {
            let on_fix = on_fix.clone();
            Closure::wrap(Box::new(move |position: GeolocationPosition| {
                on_fix.emit(fix_from(&position));
            }) as Box<dyn FnMut(GeolocationPosition)>)
        };
        let watch_err = {
            let on_error = on_error.clone();
            Closure::wrap(Box::new(move |error: GeolocationPositionError| {
                on_error.emit(GeoError::from_code(error.code()));
            }) as Box<dyn FnMut(GeolocationPositionError)>)
        };
        let watch_id = geolocation.watch_position_with_error_callback_and_options(
            watch_ok.as_ref().unchecked_ref(),
            Some(watch_err.as_ref().unchecked_ref()),
            &options,
        );

        Ok(Self {
            geolocation,
            watch_id,
            _watch_ok: watch_ok,
            _watch_err: watch_err,
            _first_ok: first_ok,
            _first_err: first_err,
        })
    }
}

impl Drop for PositionStream {
    fn drop(&mut self) {
        self.geolocation.clear_watch(self.watch_id);
    }
}
