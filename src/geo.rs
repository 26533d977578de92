//! Geographic primitives and the map viewport model
//!
//! The viewport uses spherical Web Mercator with 256px tiles, so corner
//! coordinates match what a slippy-map widget would report for the same
//! center, zoom and pixel size.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// Mean earth radius in meters used for great-circle distances
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

const TILE_SIZE: f64 = 256.0;
const MAX_LATITUDE: f64 = 85.051_128_779_806_6;
pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 19.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lon: f64,
}

impl LatLng {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Haversine distance in meters
    pub fn distance_to(&self, other: &LatLng) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let d_phi = (other.lat - self.lat).to_radians();
        let d_lambda = (other.lon - self.lon).to_radians();

        let a = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self { south_west, north_east }
    }

    /// Radius of the circle roughly enclosing the bounds: half the diagonal
    pub fn search_radius(&self) -> f64 {
        self.north_east.distance_to(&self.south_west) / 2.0
    }
}

/// Pixel position in world space at a given zoom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

fn world_size(zoom: f64) -> f64 {
    TILE_SIZE * 2f64.powf(zoom)
}

pub fn project(point: &LatLng, zoom: f64) -> WorldPoint {
    let size = world_size(zoom);
    let lat = point.lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = (point.lon + 180.0) / 360.0 * size;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
    WorldPoint { x, y }
}

pub fn unproject(point: &WorldPoint, zoom: f64) -> LatLng {
    let size = world_size(zoom);
    let lon = point.x / size * 360.0 - 180.0;
    let n = PI * (1.0 - 2.0 * point.y / size);
    let lat = n.sinh().atan().to_degrees();
    LatLng::new(lat, lon)
}

/// The visible map region: center, zoom and pixel size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: LatLng,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(center: LatLng, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            width,
            height,
        }
    }

    pub fn bounds(&self) -> LatLngBounds {
        let c = project(&self.center, self.zoom);
        let (hw, hh) = (self.width / 2.0, self.height / 2.0);
        let south_west = unproject(&WorldPoint { x: c.x - hw, y: c.y + hh }, self.zoom);
        let north_east = unproject(&WorldPoint { x: c.x + hw, y: c.y - hh }, self.zoom);
        LatLngBounds::new(south_west, north_east)
    }

    pub fn search_radius(&self) -> f64 {
        self.bounds().search_radius()
    }

    /// Screen offset of `point` relative to the top-left corner
    pub fn to_screen(&self, point: &LatLng) -> (f64, f64) {
        let c = project(&self.center, self.zoom);
        let p = project(point, self.zoom);
        (p.x - c.x + self.width / 2.0, p.y - c.y + self.height / 2.0)
    }

    /// Move the center by a pixel delta (positive dx pans the view east)
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        let c = project(&self.center, self.zoom);
        let mut moved = unproject(&WorldPoint { x: c.x + dx, y: c.y + dy }, self.zoom);
        moved.lon = wrap_lon(moved.lon);
        self.center = moved;
    }

    pub fn zoom_by(&mut self, delta: f64) {
        self.zoom = (self.zoom + delta).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }
}

fn wrap_lon(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 && lon > 0.0 { 180.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() < eps
    }

    #[test]
    fn test_distance_zero() {
        let p = LatLng::new(12.9716, 77.5946);
        assert_eq!(p.distance_to(&p), 0.0);
    }

    #[test]
    fn test_distance_one_degree_equator() {
        let a = LatLng::new(0.0, 0.0);
        let b = LatLng::new(0.0, 1.0);
        // 2πR / 360
        assert!(approx(a.distance_to(&b), 111_194.93, 1.0));
    }

    #[test]
    fn test_project_roundtrip() {
        let p = LatLng::new(12.9716, 77.5946);
        let back = unproject(&project(&p, 13.0), 13.0);
        assert!(approx(back.lat, p.lat, 1e-9));
        assert!(approx(back.lon, p.lon, 1e-9));
    }

    #[test]
    fn test_bounds_surround_center() {
        let vp = Viewport::new(LatLng::new(12.9716, 77.5946), 13.0, 800.0, 600.0);
        let b = vp.bounds();
        assert!(b.south_west.lat < vp.center.lat && vp.center.lat < b.north_east.lat);
        assert!(b.south_west.lon < vp.center.lon && vp.center.lon < b.north_east.lon);
    }

    #[test]
    fn test_radius_is_half_diagonal() {
        let vp = Viewport::new(LatLng::new(12.9716, 77.5946), 13.0, 800.0, 600.0);
        let b = vp.bounds();
        let expected = b.north_east.distance_to(&b.south_west) / 2.0;
        assert_eq!(vp.search_radius(), expected);
        // ~19m per pixel at z13 near Bangalore, 500px half-diagonal
        assert!(vp.search_radius() > 8_000.0 && vp.search_radius() < 11_000.0);
    }

    #[test]
    fn test_zoom_in_shrinks_radius() {
        let mut vp = Viewport::new(LatLng::new(48.85, 2.35), 12.0, 800.0, 600.0);
        let before = vp.search_radius();
        vp.zoom_by(1.0);
        assert!(approx(vp.search_radius() * 2.0, before, before * 0.01));
    }

    #[test]
    fn test_zoom_clamped() {
        let mut vp = Viewport::new(LatLng::new(0.0, 0.0), 30.0, 100.0, 100.0);
        assert_eq!(vp.zoom, MAX_ZOOM);
        vp.zoom_by(-100.0);
        assert_eq!(vp.zoom, MIN_ZOOM);
    }

    #[test]
    fn test_pan_east_and_screen_position() {
        let mut vp = Viewport::new(LatLng::new(0.0, 0.0), 10.0, 400.0, 400.0);
        let origin = vp.center;
        vp.pan_by(100.0, 0.0);
        assert!(vp.center.lon > 0.0);
        let (x, y) = vp.to_screen(&origin);
        assert!(approx(x, 100.0, 1e-6));
        assert!(approx(y, 200.0, 1e-6));
    }

    #[test]
    fn test_wrap_lon() {
        assert!(approx(wrap_lon(190.0), -170.0, 1e-9));
        assert!(approx(wrap_lon(-190.0), 170.0, 1e-9));
        assert_eq!(wrap_lon(180.0), 180.0);
    }
}
