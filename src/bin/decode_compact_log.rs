//! Decoder for compact binary step logs
//!
//! Reads .bin files produced by CompactLogWriter and prints one line per step

use std::env;
use std::fs;
use std::process;

use mazebot::compact_log::CompactLogReader;

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        let program = args.first().map(String::as_str).unwrap_or("decode_compact_log");
        eprintln!("Usage: {} <training_data.bin> [--json]", program);
        eprintln!("Decodes a compact binary step log to human-readable form");
        process::exit(1);
    }

    let filename = &args[1];
    let as_json = args.iter().skip(2).any(|a| a == "--json");

    let data = match fs::read(filename) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Failed to read {}: {}", filename, e);
            process::exit(1);
        }
    };

    let mut reader = CompactLogReader::new(&data);
    let mut entries = Vec::new();
    loop {
        match reader.read_entry() {
            Ok(Some(entry)) => entries.push(entry),
            Ok(None) => break,
            Err(e) => {
                eprintln!("{} (decoded {} entries before the error)", e, entries.len());
                process::exit(2);
            }
        }
    }

    if as_json {
        match serde_json::to_string_pretty(&entries) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to encode JSON: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    println!("=== Compact Step Log: {} ===", filename);
    println!("File size: {} bytes\n", data.len());

    for (i, entry) in entries.iter().enumerate() {
        let lidar: Vec<String> = entry.state.lidar.iter().map(|d| format!("{:.0}", d)).collect();
        println!(
            "#{:5} depth={} lidar=[{}] {:<9} reward={:+}",
            i + 1,
            entry.state.depth,
            lidar.join(" "),
            entry.action.as_str(),
            entry.reward
        );
    }

    println!("\n=== Summary ===");
    println!("Total entries: {}", entries.len());
    if !entries.is_empty() {
        println!("Average bytes per entry: {:.2}", data.len() as f64 / entries.len() as f64);
    }
}
