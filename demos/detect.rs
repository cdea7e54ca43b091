use cdtds_rs::{detect_drift, DriftConfig};
use std::env;
use std::fs::{self, File};
use std::io::{BufRead, BufReader};

/// Reports concept drift in a file of transactions.
///
/// Each line of `<transactions>` is one transaction of whitespace-separated
/// items. An optional JSON file overrides the default parameters, e.g.
/// `{"window_len": 100, "local_cut_confidence": 0.01}`.
///
/// Usage: cargo run --example detect <transactions> [config.json]
fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <transactions> [config.json]", args[0]);
        std::process::exit(1);
    }

    let config = match args.get(2) {
        Some(path) => {
            let json = fs::read_to_string(path).unwrap_or_else(|_| {
                eprintln!("Config \"{}\" not found.", path);
                std::process::exit(1);
            });
            DriftConfig::from_json(&json).unwrap_or_else(|err| {
                eprintln!("Invalid config: {}", err);
                std::process::exit(1);
            })
        }
        None => DriftConfig::default(),
    };

    let filename = &args[1];
    let file = File::open(filename).unwrap_or_else(|_| {
        eprintln!("File \"{}\" not found.", filename);
        std::process::exit(1);
    });

    let transactions = BufReader::new(file).lines().map(|line| {
        let line = line.unwrap_or_else(|err| {
            eprintln!("Error reading file: {}", err);
            std::process::exit(1);
        });
        line.split_whitespace()
            .map(str::to_owned)
            .collect::<Vec<String>>()
    });

    let stream = detect_drift(transactions, &config).unwrap_or_else(|err| {
        eprintln!("Invalid config: {}", err);
        std::process::exit(1);
    });

    let mut detections = 0usize;
    for detection in stream {
        detections += 1;

        let total = detection.tree.num_transactions();
        let mut top: Vec<_> = detection.tree.item_count().iter().collect();
        top.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        let summary: Vec<String> = top
            .into_iter()
            .take(5)
            .map(|(item, count)| format!("{}={:.3}", item, *count as f64 / total as f64))
            .collect();

        println!(
            "drift at transaction {}: {} transactions kept, avg length {:.2}, top items [{}]",
            detection.transactions_consumed,
            total,
            detection.avg_path_len,
            summary.join(", ")
        );
    }

    println!("\n=== Summary ===");
    println!("Drifts detected: {}", detections);
}
