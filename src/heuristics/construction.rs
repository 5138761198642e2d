use crate::geo::{haversine_distance, travel_minutes};
use crate::instance::{Coordinate, Stop};
use crate::solution::Tour;
use ordered_float::OrderedFloat;
use std::cmp::Reverse;

pub trait ConstructionHeuristic {
    /// Build a visiting order over `stops` starting at `start`.
    /// Implementations must not reorder or modify the caller's slice.
    fn construct(&self, start: &Coordinate, stops: &[Stop]) -> Tour;
    fn name(&self) -> &str;
}

/// Priority-biased Nearest Neighbor Heuristic
///
/// Repeatedly visits the unvisited stop with the smallest biased distance,
/// where the raw great-circle distance is scaled by the stop's
/// [`selection_bias`](crate::priority::Priority::selection_bias). Candidates
/// are scanned in descending priority order (input order within a priority),
/// and the first minimum wins, so the result is deterministic.
///
/// The bias only steers selection: the tour accumulates raw distances.
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityNearestNeighbor;

impl PriorityNearestNeighbor {
    pub fn new() -> Self {
        PriorityNearestNeighbor
    }

    /// Returns the index of the selected candidate and its raw distance
    fn find_nearest(&self, current: &Coordinate, remaining: &[Stop]) -> Option<(usize, f64)> {
        remaining
            .iter()
            .enumerate()
            .map(|(i, stop)| {
                let raw = haversine_distance(current, &stop.location);
                (i, raw, raw * stop.priority.selection_bias())
            })
            .min_by_key(|&(_, _, biased)| OrderedFloat(biased))
            .map(|(i, raw, _)| (i, raw))
    }
}

impl ConstructionHeuristic for PriorityNearestNeighbor {
    fn construct(&self, start: &Coordinate, stops: &[Stop]) -> Tour {
        let mut tour = Tour::new(self.name());
        if stops.is_empty() {
            return tour;
        }

        // Stable sort keeps input order among equal priorities
        let mut remaining = stops.to_vec();
        remaining.sort_by_key(|s| Reverse(s.priority.ordinal_weight()));

        let mut current = start.clone();

        while let Some((idx, distance)) = self.find_nearest(&current, &remaining) {
            let next = remaining.remove(idx);
            log::debug!(
                "leg {}: {} ({}) at {:.3} km",
                tour.len() + 1,
                next.id,
                next.priority,
                distance
            );
            current = next.location.clone();
            tour.push(next, distance, travel_minutes(distance));
        }

        tour
    }

    fn name(&self) -> &str {
        "PriorityNearestNeighbor"
    }
}
