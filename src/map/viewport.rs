//! Viewport math: geographic coordinates to canvas pixels.
//!
//! The projection is a local equirectangular plane around the view
//! center, scaled by the web-mercator ground resolution for the chosen
//! zoom. At campus scale (a few kilometers) the error against a true
//! mercator projection is far below one pixel, and the math stays
//! invertible and testable.

use crate::model::GeoPoint;
use crate::util::EARTH_RADIUS_M;

/// Ground resolution at zoom 0 on the equator, meters per pixel.
pub const BASE_RESOLUTION: f64 = 156_543.033_92;

/// Pixels kept clear on every edge when fitting two points.
pub const FIT_PADDING_PX: f64 = 50.0;
pub const FIT_MIN_ZOOM: f64 = 3.0;
pub const FIT_MAX_ZOOM: f64 = 18.0;

pub fn meters_per_pixel(lat: f64, zoom: f64) -> f64 {
    BASE_RESOLUTION * lat.to_radians().cos() / 2f64.powf(zoom)
}

/// A fixed view over the canvas: center, zoom and pixel size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    center: GeoPoint,
    zoom: f64,
    width: f64,
    height: f64,
    mpp: f64,
}

impl Projection {
    pub fn centered(center: GeoPoint, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
            mpp: meters_per_pixel(center.lat, zoom),
        }
    }

    /// View containing both points with [`FIT_PADDING_PX`] on each edge.
    ///
    /// The zoom is solved from the larger of the two axis spans and
    /// clamped to [`FIT_MIN_ZOOM`]..[`FIT_MAX_ZOOM`]; identical points
    /// degenerate to the maximum zoom rather than dividing by zero.
    pub fn fit(a: GeoPoint, b: GeoPoint, width: f64, height: f64) -> Self {
        let center = GeoPoint {
            lat: (a.lat + b.lat) / 2.0,
            lng: (a.lng + b.lng) / 2.0,
        };
        let east_span = (a.lng - b.lng).abs().to_radians()
            * EARTH_RADIUS_M
            * center.lat.to_radians().cos();
        let north_span = (a.lat - b.lat).abs().to_radians() * EARTH_RADIUS_M;
        let usable_w = (width - 2.0 * FIT_PADDING_PX).max(1.0);
        let usable_h = (height - 2.0 * FIT_PADDING_PX).max(1.0);
        let needed_mpp = (east_span / usable_w).max(north_span / usable_h);
        let zoom = if needed_mpp > 0.0 {
            (BASE_RESOLUTION * center.lat.to_radians().cos() / needed_mpp).log2()
        } else {
            FIT_MAX_ZOOM
        };
        Self::centered(center, zoom.clamp(FIT_MIN_ZOOM, FIT_MAX_ZOOM), width, height)
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn meters_per_pixel(&self) -> f64 {
        self.mpp
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Canvas position of a point, origin top-left, north up.
    pub fn to_canvas(&self, point: GeoPoint) -> (f64, f64) {
        let east = (point.lng - self.center.lng).to_radians()
            * EARTH_RADIUS_M
            * self.center.lat.to_radians().cos();
        let north = (point.lat - self.center.lat).to_radians() * EARTH_RADIUS_M;
        (
            self.width / 2.0 + east / self.mpp,
            self.height / 2.0 - north / self.mpp,
        )
    }

    /// Inverse of [`to_canvas`](Self::to_canvas); used to find the
    /// coordinate range the canvas currently covers.
    pub fn to_geo(&self, x: f64, y: f64) -> GeoPoint {
        let east = (x - self.width / 2.0) * self.mpp;
        let north = (self.height / 2.0 - y) * self.mpp;
        GeoPoint {
            lat: self.center.lat + (north / EARTH_RADIUS_M).to_degrees(),
            lng: self.center.lng
                + (east / (EARTH_RADIUS_M * self.center.lat.to_radians().cos())).to_degrees(),
        }
    }
}

/// Degree spacing for backdrop graticule lines, snapped to a 1-2-5
/// ladder so consecutive lines sit between 80 and 200 px apart at any
/// zoom.
pub fn graticule_step(meters_per_pixel: f64) -> f64 {
    let meters_per_degree = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
    let target = meters_per_pixel * 80.0 / meters_per_degree;
    let base = 10f64.powf(target.log10().floor());
    for mult in [1.0, 2.0, 5.0] {
        if base * mult >= target {
            return base * mult;
        }
    }
    base * 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const W: f64 = 800.0;
    const H: f64 = 600.0;

    fn p(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint { lat, lng }
    }

    #[test]
    fn center_lands_mid_canvas() {
        let proj = Projection::centered(p(21.0047, 79.0476), 16.0, W, H);
        let (x, y) = proj.to_canvas(p(21.0047, 79.0476));
        assert!((x - W / 2.0).abs() < 1e-9);
        assert!((y - H / 2.0).abs() < 1e-9);
    }

    #[test]
    fn one_zoom_step_halves_resolution() {
        let coarse = meters_per_pixel(21.0, 15.0);
        let fine = meters_per_pixel(21.0, 16.0);
        assert!((coarse / fine - 2.0).abs() < 1e-9);
    }

    #[test]
    fn north_is_up() {
        let proj = Projection::centered(p(21.0, 79.0), 16.0, W, H);
        let (_, y_north) = proj.to_canvas(p(21.001, 79.0));
        let (_, y_center) = proj.to_canvas(p(21.0, 79.0));
        assert!(y_north < y_center);
    }

    #[test]
    fn fit_keeps_both_points_inside_padding() {
        let a = p(21.000, 79.000);
        let b = p(21.010, 79.010);
        let proj = Projection::fit(a, b, W, H);
        for point in [a, b] {
            let (x, y) = proj.to_canvas(point);
            assert!(x >= FIT_PADDING_PX - 1e-6 && x <= W - FIT_PADDING_PX + 1e-6);
            assert!(y >= FIT_PADDING_PX - 1e-6 && y <= H - FIT_PADDING_PX + 1e-6);
        }
    }

    #[test]
    fn fit_of_identical_points_maxes_zoom() {
        let a = p(21.0047, 79.0476);
        let proj = Projection::fit(a, a, W, H);
        assert_eq!(proj.zoom(), FIT_MAX_ZOOM);
        let (x, y) = proj.to_canvas(a);
        assert!((x - W / 2.0).abs() < 1e-9);
        assert!((y - H / 2.0).abs() < 1e-9);
    }

    #[test]
    fn geo_canvas_round_trip() {
        let proj = Projection::centered(p(21.0047, 79.0476), 16.0, W, H);
        let original = p(21.0081, 79.0513);
        let (x, y) = proj.to_canvas(original);
        let back = proj.to_geo(x, y);
        assert!((back.lat - original.lat).abs() < 1e-9);
        assert!((back.lng - original.lng).abs() < 1e-9);
    }

    #[test]
    fn graticule_lines_stay_between_80_and_200_px() {
        let meters_per_degree = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
        for zoom in [3.0, 8.0, 12.0, 16.0, 18.0] {
            let mpp = meters_per_pixel(21.0, zoom);
            let step = graticule_step(mpp);
            let spacing_px = step * meters_per_degree / mpp;
            assert!(spacing_px >= 80.0 - 1e-6, "too dense at zoom {zoom}");
            assert!(spacing_px < 200.0 + 1e-6, "too sparse at zoom {zoom}");
            // Step must come off the 1-2-5 ladder.
            let mantissa = step / 10f64.powf(step.log10().floor());
            assert!(
                [1.0, 2.0, 5.0]
                    .iter()
                    .any(|m| (mantissa - m).abs() < 1e-9),
                "off-ladder step {step}"
            );
        }
    }
}
