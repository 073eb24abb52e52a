//! Poll a Tempest station and print the classification after each run
//!
//! ```text
//! TEMPEST_API_KEY=... TEMPEST_STATION_ID=150341 cargo run --example monitor
//! ```
//!
//! Optional: `SKYWATCH_CONFIG` (default `thresholds.json`), `SKYWATCH_EXPORT`
//! (default `history.json`), `SKYWATCH_INTERVAL_SECS` (default 60),
//! `SKYWATCH_SAMPLES` (default 10).

use std::env;
use std::error::Error;

use skywatch_connectors::{
    JsonFileConfigStore, JsonSnapshotExporter, Monitor, MonitorConfig, TempestClient, TempestConfig,
};
use skywatch_core::{constants::DEFAULT_HISTORY_CAPACITY, Station};

fn env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let api_key = env::var("TEMPEST_API_KEY").map_err(|_| "TEMPEST_API_KEY is not set")?;
    let station_id = env::var("TEMPEST_STATION_ID").map_err(|_| "TEMPEST_STATION_ID is not set")?;

    let store = JsonFileConfigStore::new(env_or("SKYWATCH_CONFIG", "thresholds.json"));
    store.load_or_init()?;

    let mut station = Station::new(store, DEFAULT_HISTORY_CAPACITY)?;
    let config = station.load_config()?;
    println!("Thresholds ({} units): {:?}", config.units.system(), config);

    let client = TempestClient::new(TempestConfig::new(api_key, station_id))?;
    let schedule = MonitorConfig::default()
        .interval_secs(env_or("SKYWATCH_INTERVAL_SECS", "60").parse()?)
        .samples(env_or("SKYWATCH_SAMPLES", "10").parse()?);

    let mut monitor = Monitor::new(client, station, schedule)
        .with_exporter(JsonSnapshotExporter::new(env_or("SKYWATCH_EXPORT", "history.json")));
    let stats = monitor.run().await;

    println!(
        "Collected {} of {} samples ({} fetch failures)",
        stats.accepted, stats.samples, stats.fetch_failures
    );
    match stats.last_classification {
        Some(classification) => {
            for (metric, level) in classification.levels() {
                println!("  {:<12} {}", metric.as_str(), level);
            }
            println!("  humidity slope {:+.4}", classification.humidity.slope);
            println!("  pressure slope {:+.4} ({})", classification.pressure.slope, classification.pressure.trend);
        }
        None => println!("No classification: no reading was collected"),
    }

    Ok(())
}
