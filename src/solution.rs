//! Tour and route result representation.
//!
//! A [`Tour`] is the raw output of a construction heuristic: the visiting
//! order plus the unrounded distance and time accumulated leg by leg. A
//! [`RouteResult`] is what callers receive once metrics are synthesized.

use crate::instance::Stop;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One step of a tour: travel from the previous location to a stop, then service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub stop_id: String,
    /// Raw great-circle distance of this leg in km
    pub distance: f64,
    /// Travel plus service minutes for this leg
    pub duration: f64,
    /// Raw distance accumulated up to and including this leg
    pub cumulative_distance: f64,
    /// Minutes accumulated up to and including this leg
    pub cumulative_duration: f64,
}

/// Ordered visiting sequence with raw accumulated totals
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    pub waypoints: Vec<Stop>,
    pub legs: Vec<Leg>,
    /// Sum of raw leg distances (km)
    pub total_distance: f64,
    /// Sum of leg durations (minutes)
    pub total_duration: f64,
    /// Heuristic that produced the tour
    pub algorithm: String,
}

impl Tour {
    /// Create an empty tour
    pub fn new(algorithm: &str) -> Self {
        Tour { algorithm: algorithm.to_string(), ..Default::default() }
    }

    /// Append a stop reached after `distance` km, accumulating totals.
    ///
    /// `travel_minutes` is the driving time for the leg; the stop's service
    /// duration is added on top.
    pub fn push(&mut self, stop: Stop, distance: f64, travel_minutes: f64) {
        let duration = stop.duration + travel_minutes;
        self.total_distance += distance;
        self.total_duration += duration;
        self.legs.push(Leg {
            stop_id: stop.id.clone(),
            distance,
            duration,
            cumulative_distance: self.total_distance,
            cumulative_duration: self.total_duration,
        });
        self.waypoints.push(stop);
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Check that the tour visits exactly the given stops, each once
    pub fn is_permutation_of(&self, stops: &[Stop]) -> bool {
        is_permutation(&self.waypoints, stops)
    }
}

/// Aggregated route returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResult {
    /// Kilometers, rounded to 2 decimals
    pub total_distance: f64,
    /// Minutes, rounded to the nearest whole minute
    pub total_duration: f64,
    /// Liters, rounded to 2 decimals
    pub estimated_fuel: f64,
    /// Visiting order
    pub waypoints: Vec<Stop>,
    /// 0..=100, higher is better
    pub efficiency: u8,
}

impl RouteResult {
    /// Result for a request with no stops
    pub fn empty() -> Self {
        RouteResult {
            total_distance: 0.0,
            total_duration: 0.0,
            estimated_fuel: 0.0,
            waypoints: Vec::new(),
            efficiency: 100,
        }
    }

    /// Visiting order as stop ids
    pub fn order(&self) -> Vec<&str> {
        self.waypoints.iter().map(|s| s.id.as_str()).collect()
    }

    pub fn is_permutation_of(&self, stops: &[Stop]) -> bool {
        is_permutation(&self.waypoints, stops)
    }
}

impl std::fmt::Display for RouteResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Route ({} stops)", self.waypoints.len())?;
        writeln!(f, "  Distance: {:.2} km", self.total_distance)?;
        writeln!(f, "  Duration: {:.0} min", self.total_duration)?;
        writeln!(f, "  Fuel: {:.2} L", self.estimated_fuel)?;
        writeln!(f, "  Efficiency: {}", self.efficiency)?;
        writeln!(f, "  Order: {:?}", self.order())
    }
}

fn is_permutation(waypoints: &[Stop], stops: &[Stop]) -> bool {
    if waypoints.len() != stops.len() {
        return false;
    }

    let visited: HashSet<&str> = waypoints.iter().map(|s| s.id.as_str()).collect();
    visited.len() == waypoints.len() && stops.iter().all(|s| visited.contains(s.id.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Coordinate;
    use crate::priority::Priority;

    fn stop(id: &str) -> Stop {
        Stop::new(id, Coordinate::new(0.0, 0.0, id), 4.0, Priority::Low)
    }

    #[test]
    fn test_push_accumulates() {
        let mut tour = Tour::new("test");
        tour.push(stop("a"), 2.0, 3.0);
        tour.push(stop("b"), 1.5, 2.25);

        assert_eq!(tour.len(), 2);
        assert_eq!(tour.total_distance, 3.5);
        assert_eq!(tour.total_duration, 13.25);
        assert_eq!(tour.legs[0].duration, 7.0);
        assert_eq!(tour.legs[1].cumulative_distance, 3.5);
        assert_eq!(tour.legs[1].cumulative_duration, 13.25);
    }

    #[test]
    fn test_permutation_check() {
        let stops = vec![stop("a"), stop("b"), stop("c")];
        let mut tour = Tour::new("test");
        for id in ["c", "a", "b"] {
            tour.push(stop(id), 0.0, 0.0);
        }
        assert!(tour.is_permutation_of(&stops));

        let mut short = Tour::new("test");
        short.push(stop("a"), 0.0, 0.0);
        assert!(!short.is_permutation_of(&stops));

        let mut duplicated = Tour::new("test");
        for id in ["a", "a", "b"] {
            duplicated.push(stop(id), 0.0, 0.0);
        }
        assert!(!duplicated.is_permutation_of(&stops));
    }

    #[test]
    fn test_empty_result() {
        let result = RouteResult::empty();
        assert_eq!(result.efficiency, 100);
        assert!(result.waypoints.is_empty());
        assert_eq!(result.total_distance, 0.0);
        assert!(result.is_permutation_of(&[]));
    }
}
