//! Derived route metrics: rounded totals, fuel estimate and efficiency score.

use crate::solution::{RouteResult, Tour};

/// Fuel consumption in liters per km (8 L / 100 km)
pub const FUEL_LITERS_PER_KM: f64 = 0.08;

/// Efficiency points lost per km of average distance per stop
const EFFICIENCY_PENALTY_PER_KM: f64 = 2.0;

/// Round half away from zero to `decimals` places
#[inline]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Fuel in liters for a (reported) distance, rounded to 2 decimals
pub fn estimated_fuel(total_distance: f64) -> f64 {
    round_to(total_distance * FUEL_LITERS_PER_KM, 2)
}

/// Score in 0..=100 penalizing the average raw distance per stop.
/// An empty route scores 100.
pub fn efficiency(raw_distance: f64, stop_count: usize) -> u8 {
    if stop_count == 0 {
        return 100;
    }
    let score = 100.0 - (raw_distance / stop_count as f64) * EFFICIENCY_PENALTY_PER_KM;
    score.max(0.0).round().clamp(0.0, 100.0) as u8
}

/// Turn a constructed tour into the result returned to callers.
///
/// Distance is reported to 2 decimals and duration to whole minutes. Fuel
/// is derived from the reported distance; efficiency from the raw one.
pub fn synthesize(tour: Tour) -> RouteResult {
    if tour.is_empty() {
        return RouteResult::empty();
    }

    let n = tour.len();
    let total_distance = round_to(tour.total_distance.max(0.0), 2);
    let total_duration = tour.total_duration.max(0.0).round();

    RouteResult {
        total_distance,
        total_duration,
        estimated_fuel: estimated_fuel(total_distance),
        efficiency: efficiency(tour.total_distance, n),
        waypoints: tour.waypoints,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::{Coordinate, Stop};
    use crate::priority::Priority;

    fn tour_with(distances: &[f64]) -> Tour {
        let mut tour = Tour::new("test");
        for (i, &d) in distances.iter().enumerate() {
            let stop = Stop::new(format!("s{}", i), Coordinate::new(0.0, 0.0, ""), 10.0, Priority::Medium);
            tour.push(stop, d, d / 40.0 * 60.0);
        }
        tour
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.234, 2), 1.23);
        assert_eq!(round_to(1.235_1, 2), 1.24);
        assert_eq!(round_to(12.5, 0), 13.0);
        assert_eq!(round_to(0.0, 2), 0.0);
    }

    #[test]
    fn test_empty_tour() {
        let result = synthesize(Tour::new("test"));
        assert_eq!(result, RouteResult::empty());
    }

    #[test]
    fn test_efficiency_bounds() {
        assert_eq!(efficiency(0.0, 5), 100);
        assert_eq!(efficiency(10.0, 2), 90);
        assert_eq!(efficiency(1000.0, 1), 0);
        assert_eq!(efficiency(0.0, 0), 100);
        assert_eq!(efficiency(24.9, 1), 50);
    }

    #[test]
    fn test_synthesize_metrics() {
        let result = synthesize(tour_with(&[4.0, 6.0]));

        assert_eq!(result.total_distance, 10.0);
        // 20 min service + 15 min driving
        assert_eq!(result.total_duration, 35.0);
        assert_eq!(result.estimated_fuel, 0.8);
        assert_eq!(result.efficiency, 90);
        assert_eq!(result.waypoints.len(), 2);
    }

    #[test]
    fn test_fuel_matches_reported_distance() {
        let result = synthesize(tour_with(&[3.333_33, 7.777_77, 0.123_45]));
        assert_eq!(result.total_distance, 11.23);
        assert_eq!(result.estimated_fuel, round_to(result.total_distance * 0.08, 2));
        assert_eq!(result.total_duration, 47.0);
    }
}
