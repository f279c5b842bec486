//! CLI tool for vastgrid - loads a JSON record table and outputs grid state
//!
//! Usage:
//!   vastgrid_cli <records.json>               # Output state JSON to stdout
//!   vastgrid_cli <records.json> -o state.json # Output state JSON to file
//!
//! The output is the persisted `{"row,col": value}` map the engine loads
//! back with `load_state_json`. Set `VASTGRID_CONFIG` to a JSON config to
//! change the grid dimensions.

#![allow(clippy::exit)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::indexing_slicing)]

use std::env;
use std::io::{self, Write};
use vastgrid::{GridConfig, GridView, SelectionStats};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: vastgrid_cli <records.json> [-o state.json]");
        std::process::exit(1);
    }

    let input_path = &args[1];
    let output_path = if args.len() > 3 && args[2] == "-o" {
        Some(&args[3])
    } else {
        None
    };

    let config = match env::var("VASTGRID_CONFIG") {
        Ok(json) => match GridConfig::from_json(&json) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error in VASTGRID_CONFIG: {}", e);
                std::process::exit(1);
            }
        },
        Err(_) => GridConfig::default(),
    };

    // Load the table
    let mut grid = GridView::new(config, 800.0, 600.0);
    match grid.load_table_file(input_path) {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("Input is not a non-empty array of records");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error loading {}: {}", input_path, e);
            std::process::exit(1);
        }
    }

    let cells = grid.sheet().cells();
    let stats = SelectionStats::from_values(cells.iter().map(|(_, v)| v));
    eprintln!(
        "Loaded {} cells ({} numeric, sum {})",
        stats.count, stats.numeric_count, stats.sum
    );

    // Output
    match output_path {
        Some(path) => {
            if let Err(e) = grid.save_state_file(path) {
                eprintln!("Error writing {}: {}", path, e);
                std::process::exit(1);
            }
            eprintln!("Written: {}", path);
        }
        None => {
            let json = match grid.state_json() {
                Ok(j) => j,
                Err(e) => {
                    eprintln!("Error serializing JSON: {}", e);
                    std::process::exit(1);
                }
            };
            io::stdout().write_all(json.as_bytes()).unwrap();
            println!();
        }
    }
}
