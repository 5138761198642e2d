//! Route planning entry points.
//!
//! Every entry point validates its input before constructing a tour, so a
//! caller either gets a complete [`RouteResult`] or a typed [`Error`] and
//! never a partial route.
//!
//! [`Error`]: crate::error::Error

use crate::error::Result;
use crate::heuristics::construction::{ConstructionHeuristic, PriorityNearestNeighbor};
use crate::instance::{validate_request, Coordinate, RouteRequest, RouteRequestRecord, Stop};
use crate::metrics::synthesize;
use crate::solution::{RouteResult, Tour};

/// Plan a route over `stops` from `start` with the priority-biased nearest
/// neighbor heuristic.
pub fn plan_route(start: &Coordinate, stops: &[Stop]) -> Result<RouteResult> {
    plan_route_with(&PriorityNearestNeighbor::new(), start, stops)
}

/// Plan a route with a specific construction heuristic
pub fn plan_route_with<H>(heuristic: &H, start: &Coordinate, stops: &[Stop]) -> Result<RouteResult>
where
    H: ConstructionHeuristic + ?Sized,
{
    let tour = construct_tour(heuristic, start, stops)?;
    let result = synthesize(tour);
    log::info!(
        "{}: {} stops, {:.2} km, {:.0} min, efficiency {}",
        heuristic.name(),
        result.waypoints.len(),
        result.total_distance,
        result.total_duration,
        result.efficiency
    );
    Ok(result)
}

/// Validate and build the raw tour without synthesizing metrics
pub fn construct_tour<H>(heuristic: &H, start: &Coordinate, stops: &[Stop]) -> Result<Tour>
where
    H: ConstructionHeuristic + ?Sized,
{
    validate_request(start, stops)?;
    Ok(heuristic.construct(start, stops))
}

/// Plan a validated request
pub fn plan_request(request: &RouteRequest) -> Result<RouteResult> {
    plan_route(&request.start, &request.stops)
}

/// Validate a loose request record and plan it
pub fn plan_record(record: RouteRequestRecord) -> Result<RouteResult> {
    let request = RouteRequest::try_from(record)?;
    plan_request(&request)
}
