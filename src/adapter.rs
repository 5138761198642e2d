//! Adapter from loose order records to route stops.
//!
//! Orders coming from order management may lack coordinates, a priority or a
//! service estimate. This path fills the gaps with defaults and approximates
//! missing coordinates near a reference point, which makes it less accurate
//! than planning over surveyed stops. Synthetic coordinates come from an
//! injected random source so results are reproducible for a given seed.

use crate::error::{Error, Result};
use crate::instance::{Coordinate, Stop};
use crate::priority::Priority;
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Partially populated order as delivered by order management
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderRecord {
    pub id: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    /// Service minutes
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub priority: Option<String>,
}

impl OrderRecord {
    pub fn new(id: impl Into<String>) -> Self {
        OrderRecord { id: id.into(), ..Default::default() }
    }

    /// Load an array of order records from a JSON file
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Vec<OrderRecord>> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// Adapter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    /// Latitude of the point missing coordinates are approximated around
    pub reference_lat: f64,
    /// Longitude of the reference point
    pub reference_lng: f64,
    /// Maximum offset in degrees applied on each axis
    pub jitter_degrees: f64,
    /// Service minutes assumed when an order has none
    pub default_duration: f64,
    /// Seed for the default random source
    pub seed: u64,
}

/// Largest usable jitter; wider boxes would cover the whole globe
pub const MAX_JITTER_DEGREES: f64 = 180.0;

impl AdapterConfig {
    /// Reject a reference point outside the valid range and a jitter that is
    /// negative, non-finite or wider than [`MAX_JITTER_DEGREES`].
    pub fn validate(&self) -> Result<()> {
        Coordinate::new(self.reference_lat, self.reference_lng, "").validate("reference point")?;
        if !self.jitter_degrees.is_finite()
            || !(0.0..=MAX_JITTER_DEGREES).contains(&self.jitter_degrees)
        {
            return Err(Error::InvalidConfig(format!(
                "jitter_degrees must be within 0..={}, got {}",
                MAX_JITTER_DEGREES, self.jitter_degrees
            )));
        }
        Ok(())
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        AdapterConfig {
            // Kuala Lumpur city centre
            reference_lat: 3.1390,
            reference_lng: 101.6869,
            jitter_degrees: 0.05,
            default_duration: 15.0,
            seed: 42,
        }
    }
}

/// Converts order records into stops
pub struct OrderAdapter<R: Rng> {
    pub config: AdapterConfig,
    rng: R,
}

impl OrderAdapter<ChaCha8Rng> {
    /// Adapter whose random source is seeded from `config.seed`
    pub fn new(config: AdapterConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        OrderAdapter { config, rng }
    }
}

impl Default for OrderAdapter<ChaCha8Rng> {
    fn default() -> Self {
        Self::new(AdapterConfig::default())
    }
}

impl<R: Rng> OrderAdapter<R> {
    /// Adapter drawing synthetic coordinates from the given source
    pub fn with_rng(config: AdapterConfig, rng: R) -> Self {
        OrderAdapter { config, rng }
    }

    /// Convert every order, failing on the first invalid one
    pub fn convert_all(&mut self, orders: &[OrderRecord]) -> Result<Vec<Stop>> {
        let stops = orders
            .iter()
            .map(|order| self.convert(order))
            .collect::<Result<Vec<_>>>()?;

        let synthesized = orders.iter().filter(|o| o.lat.is_none() || o.lng.is_none()).count();
        if synthesized > 0 {
            log::warn!(
                "{} of {} orders have approximated coordinates near ({}, {})",
                synthesized,
                orders.len(),
                self.config.reference_lat,
                self.config.reference_lng
            );
        }
        Ok(stops)
    }

    /// Convert one order.
    ///
    /// A missing priority becomes medium; priority text that is present but
    /// unrecognized is an error. An invalid [`AdapterConfig`] fails every
    /// conversion.
    pub fn convert(&mut self, order: &OrderRecord) -> Result<Stop> {
        self.config.validate()?;

        let priority = match order.priority.as_deref() {
            None => Priority::default(),
            Some(text) => text
                .parse()
                .map_err(|_| Error::invalid_priority(&order.id, text))?,
        };

        let label = order.address.clone().unwrap_or_else(|| order.id.clone());
        let location = match (order.lat, order.lng) {
            (Some(lat), Some(lng)) => Coordinate::new(lat, lng, label),
            _ => {
                log::debug!("order {} has no coordinates, approximating", order.id);
                self.approximate(label)
            }
        };

        let stop = Stop::new(
            order.id.clone(),
            location,
            order.duration.unwrap_or(self.config.default_duration),
            priority,
        );
        stop.validate()?;
        Ok(stop)
    }

    fn approximate(&mut self, label: String) -> Coordinate {
        let jitter = self.config.jitter_degrees;
        let (d_lat, d_lng) = if jitter > 0.0 {
            (self.rng.gen_range(-jitter..=jitter), self.rng.gen_range(-jitter..=jitter))
        } else {
            (0.0, 0.0)
        };
        // The reference point is validated; only the offset can leave the range
        Coordinate::new(
            (self.config.reference_lat + d_lat).clamp(-90.0, 90.0),
            (self.config.reference_lng + d_lng).clamp(-180.0, 180.0),
            label,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    fn orders() -> Vec<OrderRecord> {
        vec![
            OrderRecord {
                lat: Some(3.15),
                lng: Some(101.70),
                address: Some("Jalan Ampang".to_string()),
                duration: Some(8.0),
                priority: Some("high".to_string()),
                ..OrderRecord::new("ord-1")
            },
            OrderRecord::new("ord-2"),
            OrderRecord { lat: Some(3.2), ..OrderRecord::new("ord-3") },
        ]
    }

    #[test]
    fn test_complete_order_kept_as_is() {
        let mut adapter = OrderAdapter::default();
        let stop = adapter.convert(&orders()[0]).unwrap();
        assert_eq!(stop.location, Coordinate::new(3.15, 101.70, "Jalan Ampang"));
        assert_eq!(stop.duration, 8.0);
        assert_eq!(stop.priority, Priority::High);
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let mut adapter = OrderAdapter::default();
        let stop = adapter.convert(&orders()[1]).unwrap();
        assert_eq!(stop.priority, Priority::Medium);
        assert_eq!(stop.duration, 15.0);
        assert_eq!(stop.location.label, "ord-2");
    }

    #[test]
    fn test_synthetic_coordinates_within_jitter() {
        let config = AdapterConfig::default();
        let mut adapter = OrderAdapter::new(config.clone());
        for i in 0..200 {
            let stop = adapter.convert(&OrderRecord::new(format!("o{}", i))).unwrap();
            assert!((stop.location.lat - config.reference_lat).abs() <= config.jitter_degrees + 1e-12);
            assert!((stop.location.lng - config.reference_lng).abs() <= config.jitter_degrees + 1e-12);
        }
    }

    #[test]
    fn test_partial_coordinates_are_approximated() {
        let mut adapter = OrderAdapter::default();
        let stop = adapter.convert(&orders()[2]).unwrap();
        assert!((stop.location.lat - 3.1390).abs() <= 0.05 + 1e-12);
    }

    #[test]
    fn test_same_seed_same_stops() {
        let first = OrderAdapter::default().convert_all(&orders()).unwrap();
        let second = OrderAdapter::default().convert_all(&orders()).unwrap();
        assert_eq!(first, second);

        let other_seed = AdapterConfig { seed: 7, ..Default::default() };
        let third = OrderAdapter::new(other_seed).convert_all(&orders()).unwrap();
        assert_ne!(first[1].location, third[1].location);
    }

    #[test]
    fn test_injected_rng() {
        let config = AdapterConfig { jitter_degrees: 0.0, ..Default::default() };
        let mut adapter = OrderAdapter::with_rng(config, StepRng::new(0, 1));
        let stop = adapter.convert(&OrderRecord::new("o")).unwrap();
        assert_eq!(stop.location.lat, 3.1390);
        assert_eq!(stop.location.lng, 101.6869);
    }

    #[test]
    fn test_unknown_priority_is_error() {
        let order = OrderRecord { priority: Some("whenever".to_string()), ..OrderRecord::new("o") };
        let err = OrderAdapter::default().convert(&order).unwrap_err();
        assert!(matches!(err, Error::InvalidPriority { ref stop_id, .. } if stop_id == "o"));
    }

    #[test]
    fn test_unbounded_jitter_rejected() {
        for jitter in [f64::INFINITY, f64::NAN, 1e308, -0.5] {
            let config = AdapterConfig { jitter_degrees: jitter, ..Default::default() };
            let err = OrderAdapter::new(config).convert(&OrderRecord::new("o")).unwrap_err();
            assert!(matches!(err, Error::InvalidConfig(_)), "jitter {}", jitter);
        }
    }

    #[test]
    fn test_widest_jitter_stays_in_range() {
        let config = AdapterConfig { jitter_degrees: MAX_JITTER_DEGREES, ..Default::default() };
        let mut adapter = OrderAdapter::new(config);
        for i in 0..50 {
            let stop = adapter.convert(&OrderRecord::new(format!("o{}", i))).unwrap();
            assert!(stop.location.is_valid());
        }
    }

    #[test]
    fn test_reference_point_out_of_range_rejected() {
        let config = AdapterConfig { reference_lat: 95.0, ..Default::default() };
        let err = OrderAdapter::new(config).convert(&OrderRecord::new("o")).unwrap_err();
        assert!(matches!(err, Error::InvalidLocation { ref owner, lat, .. }
            if owner == "reference point" && lat == 95.0));

        let config = AdapterConfig { reference_lng: f64::INFINITY, ..Default::default() };
        let err = OrderAdapter::new(config).convert_all(&[OrderRecord::new("o")]).unwrap_err();
        assert!(matches!(err, Error::InvalidLocation { .. }));
    }

    #[test]
    fn test_out_of_range_coordinates_rejected() {
        let order = OrderRecord { lat: Some(123.0), lng: Some(0.0), ..OrderRecord::new("o") };
        let err = OrderAdapter::default().convert(&order).unwrap_err();
        assert!(matches!(err, Error::InvalidLocation { .. }));
    }
}
