use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StationRecord {
    pub name: String,
    pub location: LocationRecord,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LocationRecord {
    /// `[longitude, latitude]`, GeoJSON order.
    pub coordinates: [f64; 2],
}

/// The stations endpoint answers with either a bare array or an object
/// wrapping the array under a `stations` key. Both are accepted, any
/// other shape is a data error.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum StationsDoc {
    Bare(Vec<StationRecord>),
    Wrapped { stations: Vec<StationRecord> },
}

impl StationsDoc {
    pub fn into_stations(self) -> Vec<Station> {
        let records = match self {
            StationsDoc::Bare(records) => records,
            StationsDoc::Wrapped { stations } => stations,
        };
        records.into_iter().map(Station::from).collect()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RouteDoc {
    pub route: Vec<StationRecord>,
    pub total_price: f64,
    pub legs: Vec<LegRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LegRecord {
    pub from: String,
    pub to: String,
    pub price: f64,
}

/// A named stop with its position in rendering order, latitude first.
#[derive(Debug, Clone, PartialEq)]
pub struct Station {
    pub name: String,
    pub coordinate: Coordinate,
}

impl From<StationRecord> for Station {
    fn from(value: StationRecord) -> Self {
        let [longitude, latitude] = value.location.coordinates;
        Self {
            name: value.name,
            coordinate: Coordinate {
                latitude,
                longitude,
            },
        }
    }
}

/// One priced hop between two consecutive stations.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteLeg {
    pub from: String,
    pub to: String,
    pub price: f64,
}

impl From<LegRecord> for RouteLeg {
    fn from(value: LegRecord) -> Self {
        Self {
            from: value.from,
            to: value.to,
            price: value.price,
        }
    }
}

/// A priced route: ordered stations, per leg prices, and the total.
/// The backend guarantees the totals line up, they are not checked
/// again here.
#[derive(Debug, Clone)]
pub struct RouteData {
    pub route: Vec<Station>,
    pub total_price: f64,
    pub legs: Vec<RouteLeg>,
}

impl From<RouteDoc> for RouteData {
    fn from(value: RouteDoc) -> Self {
        Self {
            route: value.route.into_iter().map(Station::from).collect(),
            total_price: value.total_price,
            legs: value.legs.into_iter().map(RouteLeg::from).collect(),
        }
    }
}

impl RouteData {
    /// Station names joined in travel order, e.g. `A → B → C`.
    pub fn description(&self) -> String {
        self.route
            .iter()
            .map(|station| station.name.as_str())
            .collect::<Vec<_>>()
            .join(" → ")
    }

    /// Station coordinates in travel order.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.route.iter().map(|station| station.coordinate).collect()
    }

    pub fn fare_card(&self) -> FareCard<'_> {
        FareCard(self)
    }
}

/// Text rendering of the fare details card.
pub struct FareCard<'a>(&'a RouteData);

impl Display for FareCard<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Redat Fare Details")?;
        writeln!(f, "Total Fare: {} Birr", number_text(self.0.total_price))?;
        writeln!(f, "Route: {}", self.0.description())?;
        if !self.0.legs.is_empty() {
            writeln!(f, "Journey Segments")?;
            for leg in &self.0.legs {
                writeln!(f, "  {} → {} : {} Birr", leg.from, leg.to, number_text(leg.price))?;
            }
        }
        Ok(())
    }
}

/// Formats a price without a trailing `.0` on whole values.
pub(crate) fn number_text(value: f64) -> String {
    if value.fract() == 0.0 && value.is_finite() {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[test]
fn number_text_test() {
    assert_eq!(number_text(25.0), "25");
    assert_eq!(number_text(25.5), "25.5");
    assert_eq!(number_text(0.0), "0");
}

#[test]
fn station_order_test() {
    // Wire order is [longitude, latitude].
    let record = StationRecord {
        name: "A".into(),
        location: LocationRecord {
            coordinates: [38.7, 9.0],
        },
    };
    let station = Station::from(record);
    assert_eq!(station.coordinate.latitude, 9.0);
    assert_eq!(station.coordinate.longitude, 38.7);
}
