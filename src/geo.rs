use std::{
    cmp,
    fmt::Display,
    iter::Sum,
    ops::Add,
};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default)]
pub struct Distance(f64);

impl PartialEq for Distance {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl PartialOrd for Distance {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Add for Distance {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sum for Distance {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

impl Distance {
    pub const fn from_meters(distance: f64) -> Self {
        Self(distance)
    }

    pub const fn from_kilometers(distance: f64) -> Self {
        Self(distance * 1000.0)
    }

    pub const fn as_meters(&self) -> f64 {
        self.0
    }

    pub const fn as_kilometers(&self) -> f64 {
        self.0 / 1000.0
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}, {}", self.latitude, self.longitude))
    }
}

impl Coordinate {
    /// Great circle distance to another coordinate.
    pub fn distance_to(&self, coord: &Self) -> Distance {
        const R: f64 = 6371.0;
        let dist_lat = f64::to_radians(coord.latitude - self.latitude);
        let dist_lon = f64::to_radians(coord.longitude - self.longitude);
        let a = f64::powi(f64::sin(dist_lat / 2.0), 2)
            + f64::cos(f64::to_radians(self.latitude))
                * f64::cos(f64::to_radians(coord.latitude))
                * f64::sin(dist_lon / 2.0)
                * f64::sin(dist_lon / 2.0);
        let c = 2.0 * f64::atan2(f64::sqrt(a), f64::sqrt(1.0 - a));
        Distance::from_kilometers(R * c)
    }
}

/// Cumulative length of an ordered path, summing the great circle
/// distance between each consecutive pair of points.
pub fn path_length(points: &[Coordinate]) -> Distance {
    points
        .windows(2)
        .map(|pair| pair[0].distance_to(&pair[1]))
        .sum()
}

/// The minimal rectangle covering a set of coordinates. Starts out
/// empty and invalid, like a bounds object built from no points.
#[derive(Debug, Default, Clone, Copy)]
pub struct Bounds {
    corners: Option<(Coordinate, Coordinate)>,
}

impl Bounds {
    pub fn new() -> Self {
        Default::default()
    }

    /// Grows the bounds to include the given coordinate.
    pub fn extend(&mut self, coordinate: Coordinate) {
        match &mut self.corners {
            Some((south_west, north_east)) => {
                south_west.latitude = south_west.latitude.min(coordinate.latitude);
                south_west.longitude = south_west.longitude.min(coordinate.longitude);
                north_east.latitude = north_east.latitude.max(coordinate.latitude);
                north_east.longitude = north_east.longitude.max(coordinate.longitude);
            }
            None => self.corners = Some((coordinate, coordinate)),
        }
    }

    /// A bounds is valid once it covers at least one point.
    pub fn is_valid(&self) -> bool {
        self.corners.is_some()
    }

    pub fn south_west(&self) -> Option<Coordinate> {
        self.corners.map(|(south_west, _)| south_west)
    }

    pub fn north_east(&self) -> Option<Coordinate> {
        self.corners.map(|(_, north_east)| north_east)
    }
}

#[test]
fn distance_test() {
    // Meskel Square to Bole Airport, roughly 5.3 km.
    let coord_a = Coordinate {
        latitude: 9.0105,
        longitude: 38.7614,
    };

    let coord_b = Coordinate {
        latitude: 8.9806,
        longitude: 38.7992,
    };
    let d = coord_a.distance_to(&coord_b);
    assert!((d.as_kilometers() - 5.3).abs() < 0.3);
}

#[test]
fn distance_eq_test() {
    let dist_a = Distance::from_meters(1000.0);
    let dist_b = Distance::from_kilometers(1.0);
    assert_eq!(dist_a, dist_b)
}

#[test]
fn distance_cmp_test() {
    let dist_a = Distance::from_meters(1000.0);
    let dist_b = Distance::from_kilometers(0.5);
    assert!(dist_a > dist_b)
}

#[test]
fn path_length_test() {
    let points = [
        Coordinate {
            latitude: 9.0,
            longitude: 38.7,
        },
        Coordinate {
            latitude: 9.05,
            longitude: 38.75,
        },
        Coordinate {
            latitude: 9.1,
            longitude: 38.8,
        },
    ];
    let expected = points[0].distance_to(&points[1]) + points[1].distance_to(&points[2]);
    assert_eq!(path_length(&points), expected);
    assert!(path_length(&points).as_meters() >= 0.0);
}

#[test]
fn path_length_short_test() {
    assert_eq!(path_length(&[]), Distance::default());
    let single = [Coordinate {
        latitude: 9.0,
        longitude: 38.7,
    }];
    assert_eq!(path_length(&single), Distance::default());
}

#[test]
fn bounds_test() {
    let mut bounds = Bounds::new();
    assert!(!bounds.is_valid());

    bounds.extend(Coordinate {
        latitude: 9.1,
        longitude: 38.7,
    });
    assert!(bounds.is_valid());

    bounds.extend(Coordinate {
        latitude: 9.0,
        longitude: 38.8,
    });
    let south_west = bounds.south_west().unwrap();
    let north_east = bounds.north_east().unwrap();
    assert_eq!(south_west.latitude, 9.0);
    assert_eq!(south_west.longitude, 38.7);
    assert_eq!(north_east.latitude, 9.1);
    assert_eq!(north_east.longitude, 38.8);
}
