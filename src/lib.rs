//! Fleet Route Planner Library
//!
//! Single-vehicle route planning for waste-collection fleets.
//!
//! # Features
//!
//! - Haversine great-circle distances between stops
//! - Priority-biased nearest neighbor tour construction
//! - Distance, duration, fuel and efficiency metrics per route
//! - Adapter for incomplete order records with a seedable random source
//! - Parallel batch planning over many independent requests
//!
//! # Example
//!
//! ```no_run
//! use fleet_route_planner::instance::{Coordinate, Stop};
//! use fleet_route_planner::planner::plan_route;
//! use fleet_route_planner::priority::Priority;
//!
//! let depot = Coordinate::new(3.1390, 101.6869, "Depot");
//! let stops = vec![
//!     Stop::new("bin-1", Coordinate::new(3.1500, 101.7000, "Jalan Ampang"), 5.0, Priority::High),
//!     Stop::new("bin-2", Coordinate::new(3.1200, 101.6500, "Bangsar"), 8.0, Priority::Low),
//! ];
//!
//! let route = plan_route(&depot, &stops).unwrap();
//! println!("{}", route);
//! ```

pub mod error;
pub mod priority;
pub mod instance;
pub mod geo;
pub mod solution;
pub mod heuristics;
pub mod metrics;
pub mod planner;
pub mod adapter;
pub mod batch;

pub use error::{Error, Result};
pub use instance::{Coordinate, RouteRequest, Stop};
pub use planner::plan_route;
pub use priority::Priority;
pub use solution::RouteResult;
