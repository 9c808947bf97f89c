//! Demarc -- province map preparation CLI.
//!
//! Batch tool over JSON map files:
//!
//! Usage:
//!   demarc adjacency <map.json>... [OPTIONS]
//!   demarc merge <output.json> <input.json>... [OPTIONS]
//!   demarc convert <input.geojson> <output.json> [OPTIONS]
//!
//! adjacency options:
//!   --tolerance T    Override the adaptive tolerance
//!   --no-backup      Do not write a .json.backup sibling
//!
//! merge options:
//!   --id ID          Region id of the combined map (default: combined)
//!   --name NAME      Display name (default: Combined Map)
//!   --description D  Description text
//!
//! convert options:
//!   --region NAME    Region id for the imported map (default: imported)
//!   --owner NAME     Owner realm for all provinces (default: region id)
//!   --culture NAME   Culture for all provinces
//!   --religion NAME  Religion for all provinces
//!   --no-simplify    Keep full boundary resolution
//!
//! Log verbosity follows RUST_LOG (default: info).

use std::path::Path;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use demarc::adjacency::{build_adjacency, build_map_adjacency, AdjacencySummary};
use demarc::format::{load_map, save_map};
use demarc::geojson::{import_geojson, ImportOptions};
use demarc::merge::merge_regions;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return ExitCode::FAILURE;
    }

    let result = match args[1].as_str() {
        "adjacency" => run_adjacency(&args[2..]),
        "merge" => run_merge(&args[2..]),
        "convert" => run_convert(&args[2..]),
        "--help" | "-h" => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

/// Recomputes the neighbor graph of each given map file in place.
fn run_adjacency(args: &[String]) -> Result<(), String> {
    let mut paths: Vec<&String> = Vec::new();
    let mut tolerance: Option<f64> = None;
    let mut backup = true;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--tolerance" => {
                i += 1;
                let value = args.get(i).ok_or("--tolerance needs a value")?;
                tolerance = Some(value.parse().map_err(|_| "invalid --tolerance value")?);
            }
            "--no-backup" => backup = false,
            flag if flag.starts_with("--") => return Err(format!("unknown flag: {}", flag)),
            _ => paths.push(&args[i]),
        }
        i += 1;
    }
    if paths.is_empty() {
        return Err("adjacency: no map files given".to_string());
    }

    for path in paths {
        let path = Path::new(path);
        let mut region = load_map(path).map_err(|e| e.to_string())?;
        println!("{}: {} provinces", path.display(), region.provinces.len());

        let summary = match tolerance {
            Some(t) => build_adjacency(&mut region.provinces, t),
            None => build_map_adjacency(&mut region),
        };
        region.recompute_bounds();
        save_map(path, &region, backup).map_err(|e| e.to_string())?;
        print_summary(&summary);
    }
    Ok(())
}

/// Combines several map files into one and recomputes the global graph.
fn run_merge(args: &[String]) -> Result<(), String> {
    let mut paths: Vec<&String> = Vec::new();
    let mut id = "combined".to_string();
    let mut name = "Combined Map".to_string();
    let mut description = String::new();

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--id" => {
                i += 1;
                id = args.get(i).ok_or("--id needs a value")?.clone();
            }
            "--name" => {
                i += 1;
                name = args.get(i).ok_or("--name needs a value")?.clone();
            }
            "--description" => {
                i += 1;
                description = args.get(i).ok_or("--description needs a value")?.clone();
            }
            flag if flag.starts_with("--") => return Err(format!("unknown flag: {}", flag)),
            _ => paths.push(&args[i]),
        }
        i += 1;
    }
    let (output, inputs) = paths
        .split_first()
        .ok_or("merge: output and at least one input required")?;
    if inputs.is_empty() {
        return Err("merge: at least one input map required".to_string());
    }

    let mut sources = Vec::new();
    for input in inputs {
        let region = load_map(Path::new(input.as_str())).map_err(|e| e.to_string())?;
        println!("{}: {} provinces", input, region.provinces.len());
        sources.push(region);
    }

    let (combined, summary) = merge_regions(sources, id, name, description);
    save_map(Path::new(output.as_str()), &combined, false).map_err(|e| e.to_string())?;
    println!(
        "Combined {} provinces into {}",
        combined.provinces.len(),
        output
    );
    print_summary(&summary);
    Ok(())
}

/// Converts a GeoJSON FeatureCollection into a game map file.
fn run_convert(args: &[String]) -> Result<(), String> {
    let mut paths: Vec<&String> = Vec::new();
    let mut region_id = "imported".to_string();
    let mut owner: Option<String> = None;
    let mut culture = String::new();
    let mut religion = String::new();
    let mut simplify = true;

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--region" => {
                i += 1;
                region_id = args.get(i).ok_or("--region needs a value")?.clone();
            }
            "--owner" => {
                i += 1;
                owner = Some(args.get(i).ok_or("--owner needs a value")?.clone());
            }
            "--culture" => {
                i += 1;
                culture = args.get(i).ok_or("--culture needs a value")?.clone();
            }
            "--religion" => {
                i += 1;
                religion = args.get(i).ok_or("--religion needs a value")?.clone();
            }
            "--no-simplify" => simplify = false,
            flag if flag.starts_with("--") => return Err(format!("unknown flag: {}", flag)),
            _ => paths.push(&args[i]),
        }
        i += 1;
    }
    let [input, output] = paths.as_slice() else {
        return Err("convert: input and output paths required".to_string());
    };

    let text = std::fs::read_to_string(input.as_str())
        .map_err(|e| format!("failed to read {}: {}", input, e))?;

    let mut options = ImportOptions::new(region_id);
    if let Some(owner) = owner {
        options.owner = owner;
    }
    options.culture = culture;
    options.religion = religion;
    options.simplify = simplify;

    let region = import_geojson(&text, &options).map_err(|e| e.to_string())?;
    save_map(Path::new(output.as_str()), &region, false).map_err(|e| e.to_string())?;
    println!(
        "Converted {} provinces from {} to {}",
        region.provinces.len(),
        input,
        output
    );
    Ok(())
}

fn print_summary(summary: &AdjacencySummary) {
    println!("  Tolerance: {:.4}", summary.tolerance);
    println!("  Found {} adjacencies", summary.adjacency_count);
    println!("  Max neighbors: {}", summary.max_neighbors);
    if !summary.invalid_boundaries.is_empty() {
        println!(
            "  WARNING: {} provinces with invalid boundaries: {:?}",
            summary.invalid_boundaries.len(),
            summary.invalid_boundaries
        );
    }
    if !summary.isolated.is_empty() {
        let shown: Vec<u32> = summary.isolated.iter().take(5).copied().collect();
        print!(
            "  WARNING: {} isolated provinces: {:?}",
            summary.isolated.len(),
            shown
        );
        if summary.isolated.len() > 5 {
            print!(" ... and {} more", summary.isolated.len() - 5);
        }
        println!();
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  demarc adjacency <map.json>... [--tolerance T] [--no-backup]");
    eprintln!("  demarc merge <output.json> <input.json>... [--id ID] [--name NAME] [--description D]");
    eprintln!("  demarc convert <input.geojson> <output.json> [--region NAME] [--owner NAME]");
    eprintln!("                 [--culture NAME] [--religion NAME] [--no-simplify]");
}
