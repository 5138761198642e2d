//! Batch planning over many independent route requests.
//!
//! Requests share nothing, so they are planned in parallel and collected in
//! input order. A summary aggregates the planned routes for dispatch
//! overviews.

use crate::instance::RouteRequest;
use crate::planner::plan_request;
use crate::solution::RouteResult;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Batch configuration
#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Plan requests on the rayon thread pool
    pub parallel: bool,
    /// Draw a progress bar on stderr
    pub show_progress: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        BatchConfig {
            parallel: true,
            show_progress: false,
        }
    }
}

/// Outcome of planning one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchEntry {
    pub name: String,
    pub result: Option<RouteResult>,
    pub error: Option<String>,
}

impl BatchEntry {
    fn from_outcome(name: String, outcome: crate::error::Result<RouteResult>) -> Self {
        match outcome {
            Ok(result) => BatchEntry { name, result: Some(result), error: None },
            Err(e) => {
                log::error!("planning {} failed: {}", name, e);
                BatchEntry { name, result: None, error: Some(e.to_string()) }
            }
        }
    }
}

/// Plan every request, returning one entry per request in input order
pub fn plan_batch(requests: &[RouteRequest], config: &BatchConfig) -> Vec<BatchEntry> {
    let progress = if config.show_progress {
        let pb = ProgressBar::new(requests.len() as u64);
        if let Ok(style) = ProgressStyle::with_template("{bar:40} {pos}/{len} requests ({elapsed})") {
            pb.set_style(style);
        }
        pb
    } else {
        ProgressBar::hidden()
    };

    let plan_one = |request: &RouteRequest| {
        let entry = BatchEntry::from_outcome(request.name.clone(), plan_request(request));
        progress.inc(1);
        entry
    };

    let entries: Vec<BatchEntry> = if config.parallel {
        requests.par_iter().map(plan_one).collect()
    } else {
        requests.iter().map(plan_one).collect()
    };

    progress.finish_and_clear();
    log::info!("planned {} requests", entries.len());
    entries
}

/// Aggregate statistics over a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSummary {
    /// RFC 3339 timestamp of when the summary was built
    pub generated_at: String,
    pub num_requests: usize,
    pub num_planned: usize,
    pub num_failed: usize,
    pub total_stops: usize,
    pub total_distance: f64,
    pub mean_distance: f64,
    pub std_distance: f64,
    pub total_duration: f64,
    pub total_fuel: f64,
    pub mean_efficiency: f64,
    pub min_efficiency: u8,
    pub max_efficiency: u8,
}

impl BatchSummary {
    pub fn from_entries(entries: &[BatchEntry]) -> Self {
        let planned: Vec<&RouteResult> = entries.iter().filter_map(|e| e.result.as_ref()).collect();
        let distances: Vec<f64> = planned.iter().map(|r| r.total_distance).collect();
        let efficiencies: Vec<f64> = planned.iter().map(|r| r.efficiency as f64).collect();

        let (mean_distance, std_distance) = mean_and_std(&distances);
        let (mean_efficiency, _) = mean_and_std(&efficiencies);

        BatchSummary {
            generated_at: chrono::Utc::now().to_rfc3339(),
            num_requests: entries.len(),
            num_planned: planned.len(),
            num_failed: entries.len() - planned.len(),
            total_stops: planned.iter().map(|r| r.waypoints.len()).sum(),
            total_distance: distances.iter().sum(),
            mean_distance,
            std_distance,
            total_duration: planned.iter().map(|r| r.total_duration).sum(),
            total_fuel: planned.iter().map(|r| r.estimated_fuel).sum(),
            mean_efficiency,
            min_efficiency: planned.iter().map(|r| r.efficiency).min().unwrap_or(0),
            max_efficiency: planned.iter().map(|r| r.efficiency).max().unwrap_or(0),
        }
    }
}

/// Mean and sample standard deviation; zero where undefined
fn mean_and_std(values: &[f64]) -> (f64, f64) {
    use statrs::statistics::Statistics;

    match values.len() {
        0 => (0.0, 0.0),
        1 => (values[0], 0.0),
        _ => (values.mean(), values.std_dev()),
    }
}

impl std::fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Batch summary ({})", self.generated_at)?;
        writeln!(f, "  Requests: {} ({} planned, {} failed)",
            self.num_requests, self.num_planned, self.num_failed)?;
        writeln!(f, "  Stops: {}", self.total_stops)?;
        writeln!(f, "  Distance: {:.2} km (mean {:.2}, std {:.2})",
            self.total_distance, self.mean_distance, self.std_distance)?;
        writeln!(f, "  Duration: {:.0} min", self.total_duration)?;
        writeln!(f, "  Fuel: {:.2} L", self.total_fuel)?;
        writeln!(f, "  Efficiency: mean {:.1}, min {}, max {}",
            self.mean_efficiency, self.min_efficiency, self.max_efficiency)
    }
}

/// Load every `*.json` request in a directory, sorted by name.
/// Files that fail to load are skipped with a warning.
pub fn load_requests_from_dir<P: AsRef<Path>>(dir: P) -> Vec<RouteRequest> {
    let mut requests = Vec::new();

    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                match RouteRequest::from_json_file(&path) {
                    Ok(request) => requests.push(request),
                    Err(e) => log::warn!("skipping {:?}: {}", path, e),
                }
            }
        }
    }

    requests.sort_by(|a, b| a.name.cmp(&b.name));
    requests
}
