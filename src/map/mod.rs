mod canvas;
pub mod leaflet;
pub use canvas::*;

use crate::{
    geo::{Bounds, Coordinate, path_length},
    model::RouteData,
    routing::RoutingClient,
};

pub const DEFAULT_WIDTH: u32 = 1024;
pub const DEFAULT_HEIGHT: u32 = 768;

pub const FIT_PADDING: u32 = 50;
pub const FIT_MAX_ZOOM: f64 = 15.0;

/// Owns the single map instance for a view.
///
/// Drawing waits until the canvas reports ready, and every operation
/// becomes a no-op once the view is closed. A geometry fetch that
/// finishes after close therefore draws nothing instead of touching a
/// dead canvas.
#[derive(Debug, Default)]
pub struct MapView {
    canvas: Option<Canvas>,
    ready: bool,
}

impl MapView {
    pub fn new() -> Self {
        Default::default()
    }

    /// Creates the map instance, replacing any previous one.
    pub fn mount(&mut self) {
        self.mount_sized(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    pub fn mount_sized(&mut self, width: u32, height: u32) {
        self.canvas = Some(Canvas::new(width, height));
        self.ready = true;
    }

    /// Destroys the map instance. Draw calls after this do nothing.
    pub fn close(&mut self) {
        self.canvas = None;
        self.ready = false;
    }

    pub fn is_ready(&self) -> bool {
        self.ready && self.canvas.is_some()
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        self.canvas.as_ref()
    }

    /// Clears previous overlays, places one taxi marker per station
    /// with its name popup, and refits the viewport over them. Returns
    /// the station coordinates in route order, or None when there is no
    /// ready canvas to draw on.
    pub fn place_stations(&mut self, route: &RouteData) -> Option<Vec<Coordinate>> {
        if !self.ready {
            return None;
        }
        let canvas = self.canvas.as_mut()?;
        canvas.clear_overlays();

        let mut bounds = Bounds::new();
        let points: Vec<Coordinate> = route
            .route
            .iter()
            .map(|station| {
                canvas.markers.push(Marker {
                    coordinate: station.coordinate,
                    popup: format!("<strong>{}</strong>", station.name),
                });
                bounds.extend(station.coordinate);
                station.coordinate
            })
            .collect();

        if bounds.is_valid() {
            canvas.fit_bounds(&bounds, FIT_PADDING, FIT_MAX_ZOOM);
        }
        Some(points)
    }

    /// Draws the route path and rewrites the first station's popup with
    /// the total path distance. No-op when the view has been closed.
    pub fn draw_path(&mut self, path: &[Coordinate], route: &RouteData) {
        if !self.ready {
            return;
        }
        let Some(canvas) = self.canvas.as_mut() else {
            return;
        };

        canvas.path = Some(RoutePath {
            points: path.to_vec(),
            style: ROUTE_STYLE,
        });

        if let Some(first) = canvas.markers.first_mut()
            && let Some(station) = route.route.first()
        {
            let total = path_length(path);
            first.popup = format!(
                "<strong>{}</strong><br>Total route distance: {:.1} km",
                station.name,
                total.as_kilometers()
            );
        }
    }

    /// Full redraw for a route: markers and viewport first, then the
    /// road geometry once the fetch resolves.
    pub async fn render_route(&mut self, route: &RouteData, routing: &RoutingClient) {
        let Some(points) = self.place_stations(route) else {
            return;
        };
        let path = routing.road_path(&points).await;
        self.draw_path(&path, route);
    }
}
