//! Client toolkit for the Redat taxi-route fare service: station and
//! fare lookups, route map rendering with road-following geometry, and
//! contribution and feedback submission.

pub mod api;
pub mod config;
pub mod contribute;
pub mod feedback;
pub mod geo;
pub mod map;
pub mod model;
pub mod routing;

pub mod prelude {
    pub use crate::api::{ApiClient, FareView};
    pub use crate::config::Config;
    pub use crate::contribute::{Contribution, ImageFile};
    pub use crate::feedback::{FeedbackFlow, FormspreeClient, Step};
    pub use crate::geo::{Coordinate, Distance};
    pub use crate::map::MapView;
    pub use crate::model::{RouteData, RouteLeg, Station};
    pub use crate::routing::RoutingClient;
}
