//! Fleet Route Planner - Command Line Interface
//!
//! Plans collection routes from request files, loose order exports or whole
//! directories of requests.

use clap::{Parser, Subcommand};
use fleet_route_planner::adapter::{AdapterConfig, OrderAdapter, OrderRecord};
use fleet_route_planner::batch::{load_requests_from_dir, plan_batch, BatchConfig, BatchSummary};
use fleet_route_planner::heuristics::construction::PriorityNearestNeighbor;
use fleet_route_planner::instance::{Coordinate, RouteRequest};
use fleet_route_planner::metrics::synthesize;
use fleet_route_planner::planner::construct_tour;
use serde::Serialize;

use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "fleet-route-planner")]
#[command(version = "1.0")]
#[command(about = "Priority-biased route planning for waste-collection fleets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan a route from a JSON request or a CSV stop table
    Plan {
        /// JSON request file ({"start": {...}, "stops": [...]})
        #[arg(short, long, conflicts_with = "stops")]
        request: Option<PathBuf>,

        /// CSV stop table (id,lat,lng,label,duration,priority)
        #[arg(short, long)]
        stops: Option<PathBuf>,

        /// Start latitude (required with --stops)
        #[arg(long, allow_negative_numbers = true)]
        start_lat: Option<f64>,

        /// Start longitude (required with --stops)
        #[arg(long, allow_negative_numbers = true)]
        start_lng: Option<f64>,

        /// Start label
        #[arg(long, default_value = "Start")]
        start_label: String,

        /// Write the route as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print request statistics and every leg
        #[arg(short, long)]
        verbose: bool,
    },

    /// Plan a route from loose order records, approximating missing data
    Adapt {
        /// JSON array of order records
        #[arg(long)]
        orders: PathBuf,

        /// Start latitude
        #[arg(long, allow_negative_numbers = true)]
        start_lat: f64,

        /// Start longitude
        #[arg(long, allow_negative_numbers = true)]
        start_lng: f64,

        /// Start label
        #[arg(long, default_value = "Start")]
        start_label: String,

        /// Seed for approximated coordinates
        #[arg(long, default_value = "42")]
        seed: u64,

        /// Reference latitude for orders without coordinates
        #[arg(long, default_value = "3.139", allow_negative_numbers = true)]
        reference_lat: f64,

        /// Reference longitude for orders without coordinates
        #[arg(long, default_value = "101.6869", allow_negative_numbers = true)]
        reference_lng: f64,

        /// Maximum offset in degrees around the reference point
        #[arg(long, default_value = "0.05")]
        jitter: f64,

        /// Service minutes for orders without an estimate
        #[arg(long, default_value = "15")]
        default_duration: f64,

        /// Write the route as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print every leg
        #[arg(short, long)]
        verbose: bool,
    },

    /// Plan every JSON request in a directory
    Batch {
        /// Directory containing request files
        #[arg(short, long)]
        dir: PathBuf,

        /// Write entries and summary as JSON
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Plan requests one after another
        #[arg(long)]
        sequential: bool,

        /// Hide the progress bar
        #[arg(long)]
        quiet: bool,
    },
}

#[derive(Serialize)]
struct BatchReport<'a> {
    summary: &'a BatchSummary,
    entries: &'a [fleet_route_planner::batch::BatchEntry],
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { request, stops, start_lat, start_lng, start_label, output, verbose } => {
            let request = load_request(request, stops, start_lat, start_lng, start_label);
            plan(&request, output, verbose);
        }

        Commands::Adapt {
            orders,
            start_lat,
            start_lng,
            start_label,
            seed,
            reference_lat,
            reference_lng,
            jitter,
            default_duration,
            output,
            verbose,
        } => {
            let config = AdapterConfig {
                reference_lat,
                reference_lng,
                jitter_degrees: jitter,
                default_duration,
                seed,
            };
            let start = Coordinate::new(start_lat, start_lng, start_label);
            adapt(&orders, start, config, output, verbose);
        }

        Commands::Batch { dir, output, sequential, quiet } => {
            run_batch(&dir, output, sequential, quiet);
        }
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

fn load_request(
    request: Option<PathBuf>,
    stops: Option<PathBuf>,
    start_lat: Option<f64>,
    start_lng: Option<f64>,
    start_label: String,
) -> RouteRequest {
    let loaded = match (request, stops) {
        (Some(path), _) => {
            println!("Loading request from {:?}...", path);
            RouteRequest::from_json_file(&path)
        }
        (None, Some(path)) => {
            let (lat, lng) = match (start_lat, start_lng) {
                (Some(lat), Some(lng)) => (lat, lng),
                _ => fail("--start-lat and --start-lng are required with --stops"),
            };
            println!("Loading stops from {:?}...", path);
            RouteRequest::from_csv_file(Coordinate::new(lat, lng, start_label), &path)
        }
        (None, None) => fail("either --request or --stops is required"),
    };

    loaded.unwrap_or_else(|e| fail(format!("cannot load request: {}", e)))
}

fn plan(request: &RouteRequest, output: Option<PathBuf>, verbose: bool) {
    if verbose {
        println!("{}", request.statistics());
    }

    let start = Instant::now();
    let heuristic = PriorityNearestNeighbor::new();
    let tour = construct_tour(&heuristic, &request.start, &request.stops)
        .unwrap_or_else(|e| fail(e));
    let elapsed = start.elapsed();

    if verbose {
        print_legs(&tour);
    }

    let route = synthesize(tour);

    println!("\n========== Results ==========");
    print!("{}", route);
    println!("  Time: {:.4}s", elapsed.as_secs_f64());

    if let Some(out_path) = output {
        write_json(&out_path, &route);
        println!("\nRoute saved to {:?}", out_path);
    }
}

fn adapt(orders: &Path, start: Coordinate, config: AdapterConfig, output: Option<PathBuf>, verbose: bool) {
    println!("Loading orders from {:?}...", orders);
    let records = OrderRecord::load_json(orders)
        .unwrap_or_else(|e| fail(format!("cannot load orders: {}", e)));

    let mut adapter = OrderAdapter::new(config);
    let stops = adapter.convert_all(&records).unwrap_or_else(|e| fail(e));
    let mut request = RouteRequest::new(start, stops).unwrap_or_else(|e| fail(e));
    request.name = orders
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    plan(&request, output, verbose);
}

fn run_batch(dir: &Path, output: Option<PathBuf>, sequential: bool, quiet: bool) {
    println!("Loading requests from {:?}...", dir);
    let requests = load_requests_from_dir(dir);
    println!("Found {} requests", requests.len());

    if requests.is_empty() {
        eprintln!("No requests found!");
        return;
    }

    let config = BatchConfig {
        parallel: !sequential,
        show_progress: !quiet,
    };

    let start = Instant::now();
    let entries = plan_batch(&requests, &config);
    let elapsed = start.elapsed();

    for entry in &entries {
        match (&entry.result, &entry.error) {
            (Some(route), _) => println!(
                "{:<30} {:>4} stops {:>10.2} km {:>6.0} min  eff {:>3}",
                entry.name,
                route.waypoints.len(),
                route.total_distance,
                route.total_duration,
                route.efficiency
            ),
            (None, Some(error)) => println!("{:<30} FAILED: {}", entry.name, error),
            (None, None) => {}
        }
    }

    let summary = BatchSummary::from_entries(&entries);
    println!("\n{}", summary);
    println!("Time: {:.4}s", elapsed.as_secs_f64());

    if let Some(out_path) = output {
        write_json(&out_path, &BatchReport { summary: &summary, entries: &entries });
        println!("Batch report saved to {:?}", out_path);
    }
}

fn print_legs(tour: &fleet_route_planner::solution::Tour) {
    println!("{:<4} {:<20} {:>10} {:>10} {:>12}", "#", "Stop", "Leg km", "Leg min", "Cumul. km");
    println!("{}", "-".repeat(60));
    for (i, leg) in tour.legs.iter().enumerate() {
        println!(
            "{:<4} {:<20} {:>10.2} {:>10.1} {:>12.2}",
            i + 1,
            leg.stop_id,
            leg.distance,
            leg.duration,
            leg.cumulative_distance
        );
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) {
    let json = serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| fail(format!("cannot serialize output: {}", e)));
    std::fs::write(path, json).unwrap_or_else(|e| fail(format!("cannot write {:?}: {}", path, e)));
}
