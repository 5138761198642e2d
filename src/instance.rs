//! Module for parsing, validating and representing route requests.
//!
//! A request is a start location plus a set of stops. Input arrives in a
//! loose shape ([`StopRecord`], [`RouteRequestRecord`]) with free-text
//! priorities and is validated into typed values before any distance is
//! computed. Requests can be loaded from JSON files or from a CSV stop table.

use crate::error::{Error, Result};
use crate::geo::haversine_distance;
use crate::priority::Priority;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A point on the globe in degrees
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
    /// Human-readable label (address, depot name, ...)
    #[serde(default)]
    pub label: String,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64, label: impl Into<String>) -> Self {
        Coordinate { lat, lng, label: label.into() }
    }

    /// Check that both components are finite and within range
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Reject non-finite or out-of-range coordinates; `owner` names the
    /// start or stop the coordinate belongs to in the error.
    pub fn validate(&self, owner: &str) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::invalid_location(owner, self.lat, self.lng))
        }
    }
}

/// A pending pickup or delivery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Identifier, unique within a request
    pub id: String,
    pub location: Coordinate,
    /// Estimated service time on site in minutes
    pub duration: f64,
    pub priority: Priority,
}

impl Stop {
    pub fn new(id: impl Into<String>, location: Coordinate, duration: f64, priority: Priority) -> Self {
        Stop { id: id.into(), location, duration, priority }
    }

    /// Validate location and service duration
    pub fn validate(&self) -> Result<()> {
        if !self.location.is_valid() {
            return Err(Error::invalid_location(
                format!("stop {}", self.id),
                self.location.lat,
                self.location.lng,
            ));
        }
        if !self.duration.is_finite() || self.duration < 0.0 {
            return Err(Error::InvalidDuration {
                stop_id: self.id.clone(),
                duration: self.duration,
            });
        }
        Ok(())
    }
}

/// Loose stop shape as found in JSON requests and CSV stop tables
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StopRecord {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub label: String,
    pub duration: f64,
    pub priority: String,
}

impl TryFrom<StopRecord> for Stop {
    type Error = Error;

    fn try_from(record: StopRecord) -> Result<Self> {
        let priority: Priority = record
            .priority
            .parse()
            .map_err(|_| Error::invalid_priority(&record.id, &record.priority))?;
        let stop = Stop::new(
            record.id,
            Coordinate::new(record.lat, record.lng, record.label),
            record.duration,
            priority,
        );
        stop.validate()?;
        Ok(stop)
    }
}

/// Loose request shape as found in JSON request files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequestRecord {
    pub start: Coordinate,
    #[serde(default)]
    pub stops: Vec<StopRecord>,
}

/// A validated routing request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Name of the request (file stem when loaded from disk)
    #[serde(default)]
    pub name: String,
    pub start: Coordinate,
    pub stops: Vec<Stop>,
}

impl TryFrom<RouteRequestRecord> for RouteRequest {
    type Error = Error;

    fn try_from(record: RouteRequestRecord) -> Result<Self> {
        let stops = record
            .stops
            .into_iter()
            .map(Stop::try_from)
            .collect::<Result<Vec<_>>>()?;
        RouteRequest::new(record.start, stops)
    }
}

impl RouteRequest {
    /// Build a request, validating start, stops and id uniqueness
    pub fn new(start: Coordinate, stops: Vec<Stop>) -> Result<Self> {
        validate_request(&start, &stops)?;
        Ok(RouteRequest { name: String::new(), start, stops })
    }

    /// Load a request from a JSON file of the shape
    /// `{"start": {...}, "stops": [{id, lat, lng, label, duration, priority}]}`
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(&path)?;
        let record: RouteRequestRecord = serde_json::from_reader(BufReader::new(file))?;
        let mut request = RouteRequest::try_from(record)?;
        request.name = file_stem(path.as_ref());
        Ok(request)
    }

    /// Load stops from a CSV table with header `id,lat,lng,label,duration,priority`
    pub fn from_csv_file<P: AsRef<Path>>(start: Coordinate, path: P) -> Result<Self> {
        let file = File::open(&path)?;
        let mut request = RouteRequest::new(start, read_stop_records(file)?)?;
        request.name = file_stem(path.as_ref());
        Ok(request)
    }

    /// Get statistics about the request
    pub fn statistics(&self) -> RequestStatistics {
        let count = |p: Priority| self.stops.iter().filter(|s| s.priority == p).count();
        let from_start: Vec<f64> = self
            .stops
            .iter()
            .map(|s| haversine_distance(&self.start, &s.location))
            .collect();

        let avg_distance_from_start = if from_start.is_empty() {
            0.0
        } else {
            from_start.iter().sum::<f64>() / from_start.len() as f64
        };
        let max_distance_from_start = from_start.iter().cloned().fold(0.0, f64::max);

        RequestStatistics {
            name: self.name.clone(),
            num_stops: self.stops.len(),
            num_high: count(Priority::High),
            num_medium: count(Priority::Medium),
            num_low: count(Priority::Low),
            total_service_minutes: self.stops.iter().map(|s| s.duration).sum(),
            avg_distance_from_start,
            max_distance_from_start,
        }
    }
}

/// Read stop rows from any CSV source
pub fn read_stop_records<R: std::io::Read>(reader: R) -> Result<Vec<Stop>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut stops = Vec::new();
    for row in csv_reader.deserialize::<StopRecord>() {
        stops.push(Stop::try_from(row?)?);
    }
    Ok(stops)
}

/// Validate a start location and a stop set.
///
/// Checks every coordinate and duration and that stop ids are unique. An
/// empty stop set is valid.
pub fn validate_request(start: &Coordinate, stops: &[Stop]) -> Result<()> {
    start.validate("start")?;

    let mut seen = HashSet::with_capacity(stops.len());
    for stop in stops {
        stop.validate()?;
        if !seen.insert(stop.id.as_str()) {
            return Err(Error::DuplicateStop(stop.id.clone()));
        }
    }
    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Statistics about a route request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestStatistics {
    pub name: String,
    pub num_stops: usize,
    pub num_high: usize,
    pub num_medium: usize,
    pub num_low: usize,
    pub total_service_minutes: f64,
    pub avg_distance_from_start: f64,
    pub max_distance_from_start: f64,
}

impl std::fmt::Display for RequestStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Request: {}", self.name)?;
        writeln!(f, "  Stops: {} (high {}, medium {}, low {})",
            self.num_stops, self.num_high, self.num_medium, self.num_low)?;
        writeln!(f, "  Service time: {:.0} min", self.total_service_minutes)?;
        writeln!(f, "  Avg distance from start: {:.2} km", self.avg_distance_from_start)?;
        writeln!(f, "  Max distance from start: {:.2} km", self.max_distance_from_start)
    }
}
