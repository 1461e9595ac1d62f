use std::f64::consts::PI;

use crate::geo::{Bounds, Coordinate};

pub const DEFAULT_CENTER: Coordinate = Coordinate {
    latitude: 9.0222,
    longitude: 38.7468,
};
pub const DEFAULT_ZOOM: f64 = 13.0;

pub const TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors";

pub const MARKER_ICON: &str = "🚖";
pub const MARKER_CLASS: &str = "taxi-marker";
pub const MARKER_SIZE: u32 = 25;

const TILE_SIZE: f64 = 256.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathStyle {
    pub color: &'static str,
    pub weight: f64,
    pub opacity: f64,
    pub line_join: &'static str,
    pub dash_array: &'static str,
    pub line_cap: &'static str,
}

pub const ROUTE_STYLE: PathStyle = PathStyle {
    color: "#0066cc",
    weight: 4.0,
    opacity: 0.8,
    line_join: "round",
    dash_array: "10, 10",
    line_cap: "round",
};

/// Weight and opacity applied while the pointer is over the path,
/// reverted on pointer out.
pub const HOVER_WEIGHT: f64 = 6.0;
pub const HOVER_OPACITY: f64 = 1.0;

#[derive(Debug, Clone)]
pub struct Marker {
    pub coordinate: Coordinate,
    pub popup: String,
}

#[derive(Debug, Clone)]
pub struct RoutePath {
    pub points: Vec<Coordinate>,
    pub style: PathStyle,
}

/// Headless stand-in for the map engine instance: one tile layer, the
/// overlays, and a viewport. The emitted page reproduces it with real
/// map tiles.
#[derive(Debug, Clone)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
    pub center: Coordinate,
    pub zoom: f64,
    pub markers: Vec<Marker>,
    pub path: Option<RoutePath>,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            center: DEFAULT_CENTER,
            zoom: DEFAULT_ZOOM,
            markers: Vec::new(),
            path: None,
        }
    }

    /// Removes every marker and the path, keeping the viewport.
    pub fn clear_overlays(&mut self) {
        self.markers.clear();
        self.path = None;
    }

    /// Moves the viewport so the bounds fit inside the canvas with the
    /// given pixel padding on each side, zoom snapped down to a whole
    /// level and capped at `max_zoom`. A single point bounds pins the
    /// zoom at the cap.
    pub fn fit_bounds(&mut self, bounds: &Bounds, padding: u32, max_zoom: f64) {
        let (Some(south_west), Some(north_east)) = (bounds.south_west(), bounds.north_east())
        else {
            return;
        };

        let span_x = (world_x(north_east.longitude) - world_x(south_west.longitude)).abs();
        let span_y = (world_y(south_west.latitude) - world_y(north_east.latitude)).abs();
        let avail_x = self.width.saturating_sub(2 * padding).max(1) as f64;
        let avail_y = self.height.saturating_sub(2 * padding).max(1) as f64;

        // Zero spans divide out to infinity and land on the cap.
        let zoom_x = (avail_x / (TILE_SIZE * span_x)).log2();
        let zoom_y = (avail_y / (TILE_SIZE * span_y)).log2();
        self.zoom = zoom_x.min(zoom_y).floor().clamp(0.0, max_zoom);

        let mid_y = (world_y(south_west.latitude) + world_y(north_east.latitude)) / 2.0;
        self.center = Coordinate {
            latitude: latitude_of(mid_y),
            longitude: (south_west.longitude + north_east.longitude) / 2.0,
        };
    }
}

// Web mercator projection, as a fraction of the world at zoom 0.

fn world_x(longitude: f64) -> f64 {
    (longitude + 180.0) / 360.0
}

fn world_y(latitude: f64) -> f64 {
    let lat = latitude.to_radians();
    (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0
}

fn latitude_of(world_y: f64) -> f64 {
    (PI * (1.0 - 2.0 * world_y)).sinh().atan().to_degrees()
}

#[test]
fn fit_single_point_test() {
    let mut canvas = Canvas::new(1024, 768);
    let mut bounds = Bounds::new();
    let point = Coordinate {
        latitude: 9.0,
        longitude: 38.7,
    };
    bounds.extend(point);
    canvas.fit_bounds(&bounds, 50, 15.0);
    assert_eq!(canvas.zoom, 15.0);
    assert!((canvas.center.latitude - 9.0).abs() < 1e-9);
    assert!((canvas.center.longitude - 38.7).abs() < 1e-9);
}

#[test]
fn fit_pair_test() {
    let mut canvas = Canvas::new(1024, 768);
    let mut bounds = Bounds::new();
    bounds.extend(Coordinate {
        latitude: 9.0,
        longitude: 38.7,
    });
    bounds.extend(Coordinate {
        latitude: 9.1,
        longitude: 38.8,
    });
    canvas.fit_bounds(&bounds, 50, 15.0);
    // Two points 15 km apart should sit well below the zoom cap.
    assert!(canvas.zoom < 15.0);
    assert!(canvas.zoom >= 10.0);
    assert_eq!(canvas.zoom, canvas.zoom.floor());
    assert!((canvas.center.longitude - 38.75).abs() < 1e-9);
    assert!(canvas.center.latitude > 9.0 && canvas.center.latitude < 9.1);
}

#[test]
fn fit_empty_bounds_test() {
    let mut canvas = Canvas::new(1024, 768);
    let bounds = Bounds::new();
    canvas.fit_bounds(&bounds, 50, 15.0);
    // Nothing to fit, the viewport stays at the defaults.
    assert_eq!(canvas.zoom, DEFAULT_ZOOM);
    assert_eq!(canvas.center, DEFAULT_CENTER);
}

#[test]
fn clear_overlays_test() {
    let mut canvas = Canvas::new(1024, 768);
    canvas.markers.push(Marker {
        coordinate: DEFAULT_CENTER,
        popup: "<strong>A</strong>".into(),
    });
    canvas.path = Some(RoutePath {
        points: vec![DEFAULT_CENTER],
        style: ROUTE_STYLE,
    });
    canvas.clear_overlays();
    assert!(canvas.markers.is_empty());
    assert!(canvas.path.is_none());
}
