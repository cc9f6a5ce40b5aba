//! Adapters for the geocoding and route-geometry collaborators, plus the traffic
//! model that fills in what the geometry collaborator does not supply.

pub mod geocoding;
pub mod osrm;
pub mod traffic;

pub use geocoding::{Geocoder, GeocodingError, NominatimGeocoder};
pub use osrm::{
    synthesize_candidate, OsrmRouteProvider, RouteGeometry, RouteProvider, RouteStep,
    RoutingError,
};
pub use traffic::{FixedTraffic, RandomTraffic, TrafficModel, TrafficSample};
