use reqwest::{Client, StatusCode, Url, header::ACCEPT};
use thiserror::Error;
use tracing::{debug, error};

use crate::{
    config::Config,
    contribute::Contribution,
    model::{RouteData, RouteDoc, Station, StationsDoc},
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid base url: {0}")]
    BaseUrl(String),
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("HTTP error! status: {}", .0.as_u16())]
    Status(StatusCode),
    #[error("Unable to load station data - invalid format")]
    StationFormat,
    #[error("Unable to load station data - fetch failed")]
    StationFetch,
    #[error("Error fetching route data")]
    RouteFetch,
    #[error("{0}")]
    Rejected(String),
}

/// A fare lookup ready to present: the full station list and the
/// priced route between the requested endpoints.
#[derive(Debug, Clone)]
pub struct FareView {
    pub stations: Vec<Station>,
    pub route: RouteData,
}

/// Client for the fare backend.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(base: &str) -> Result<Self, Error> {
        let base = base
            .parse()
            .map_err(|err| Error::BaseUrl(format!("{base}: {err}")))?;
        Ok(Self {
            http: Client::new(),
            base,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, Error> {
        Self::new(&config.api_url)
    }

    fn url(&self, path: &str) -> Result<Url, Error> {
        self.base
            .join(path)
            .map_err(|err| Error::BaseUrl(format!("{path}: {err}")))
    }

    /// Fetches every station known to the backend. The endpoint answers
    /// with either a bare array or `{"stations": [...]}`; both are
    /// normalized here, any other shape is a data error.
    pub async fn stations(&self) -> Result<Vec<Station>, Error> {
        let url = self.url("/stations")?;
        debug!("Fetching stations from {url}");
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        let body: serde_json::Value = response.json().await?;
        let doc: StationsDoc = serde_json::from_value(body).map_err(|err| {
            error!("Invalid stations data format: {err}");
            Error::StationFormat
        })?;
        Ok(doc.into_stations())
    }

    /// Fetches the priced route between two stations. The backend keys
    /// routes by `<name> Station`; the suffix is an API convention and
    /// is appended verbatim here.
    pub async fn route_map(&self, from: &str, to: &str) -> Result<RouteData, Error> {
        let url = self.url(&format!("/route-map?from={from} Station&to={to} Station"))?;
        debug!("Fetching route from {url}");
        let response = self.http.get(url).send().await?;
        if !response.status().is_success() {
            return Err(Error::Status(response.status()));
        }

        let doc: RouteDoc = response.json().await?;
        Ok(doc.into())
    }

    /// Submits a route contribution as multipart form data. Any 2xx is
    /// success and the body is ignored; otherwise the response body
    /// text becomes the user facing message.
    pub async fn contribute(&self, contribution: &Contribution) -> Result<(), Error> {
        let url = self.url("/api/contribute")?;
        let form = contribution.to_form()?;
        let response = self
            .http
            .post(url)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        if response.status().is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        error!("Server response: {text}");
        if text.is_empty() {
            Err(Error::Rejected("Failed to submit form".to_string()))
        } else {
            Err(Error::Rejected(text))
        }
    }

    /// The full fare lookup: stations exactly once, then the route.
    /// Failures collapse to the user facing messages, with the cause
    /// logged; an invalid stations shape keeps its own message.
    pub async fn fare_view(&self, from: &str, to: &str) -> Result<FareView, Error> {
        let stations = self.stations().await.map_err(|err| match err {
            Error::StationFormat => Error::StationFormat,
            err => {
                error!("Error fetching stations: {err}");
                Error::StationFetch
            }
        })?;
        debug!("Stations loaded successfully: {} stations", stations.len());

        let route = self.route_map(from, to).await.map_err(|err| {
            error!("Error fetching route data: {err}");
            Error::RouteFetch
        })?;
        Ok(FareView { stations, route })
    }
}
