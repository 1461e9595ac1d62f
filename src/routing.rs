use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::error;

use crate::geo::Coordinate;

/// The public OSRM demo server.
pub const OSRM_URL: &str = "https://router.project-osrm.org";

#[derive(Error, Debug)]
pub enum Error {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to fetch route")]
    BadStatus,
    #[error("No route found")]
    NoRoute,
}

#[derive(Deserialize, Debug)]
struct RouteResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Deserialize, Debug)]
struct OsrmRoute {
    geometry: Geometry,
}

#[derive(Deserialize, Debug)]
struct Geometry {
    /// `[longitude, latitude]` pairs, GeoJSON order.
    coordinates: Vec<[f64; 2]>,
}

/// Fetches driving geometry from an OSRM compatible service.
#[derive(Debug, Clone)]
pub struct RoutingClient {
    http: Client,
    base: String,
}

impl RoutingClient {
    pub fn new() -> Self {
        Self::with_base(OSRM_URL)
    }

    /// Points the client at another service, e.g. a local mock.
    pub fn with_base(base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base: base.into(),
        }
    }

    /// Road following geometry through the given waypoints. On any
    /// failure the original points come back unchanged and in order, so
    /// the caller always has something to draw.
    pub async fn road_path(&self, points: &[Coordinate]) -> Vec<Coordinate> {
        match self.fetch_path(points).await {
            Ok(path) => path,
            Err(err) => {
                error!("Error fetching route: {err}");
                points.to_vec()
            }
        }
    }

    /// The fallible variant of [`Self::road_path`].
    pub async fn fetch_path(&self, points: &[Coordinate]) -> Result<Vec<Coordinate>, Error> {
        // The service wants longitude,latitude pairs joined by ';'.
        let coordinates = points
            .iter()
            .map(|point| format!("{},{}", point.longitude, point.latitude))
            .collect::<Vec<_>>()
            .join(";");
        let url = format!(
            "{}/route/v1/driving/{coordinates}?overview=full&geometries=geojson",
            self.base
        );

        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::BadStatus);
        }

        let data: RouteResponse = response.json().await?;
        let route = data.routes.first().ok_or(Error::NoRoute)?;
        Ok(route
            .geometry
            .coordinates
            .iter()
            .map(|&[longitude, latitude]| Coordinate {
                latitude,
                longitude,
            })
            .collect())
    }
}

impl Default for RoutingClient {
    fn default() -> Self {
        Self::new()
    }
}
