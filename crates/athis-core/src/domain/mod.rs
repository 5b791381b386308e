//! Domain model (IDs, coordinates, areas, demands, statuses, errors, events).

pub mod area;
pub mod demand;
pub mod errors;
pub mod events;
pub mod geo;
pub mod ids;
pub mod route;
pub mod status;

pub use area::{Area, AreaCatalog, Infrastructure, Priority};
pub use demand::{Demand, DemandKind, NewDemand, Requester};
pub use errors::{AthisError, ErrorClass, Result};
pub use events::DemandEvent;
pub use geo::{GeoPoint, OutOfRange};
pub use ids::DemandId;
pub use route::RouteResult;
pub use status::DemandStatus;
