//! Weather Station: Notification Hubs
//!
//! Run with: RUST_LOG=info cargo run -p behavior-catalog --example weather_station
//!
//! Displays subscribe to a station. The station only holds weak references,
//! so a display that goes away simply stops being notified.

use std::sync::Arc;

use behavior_catalog::{DisplayDevice, WeatherStation};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Weather Station: Notification Hubs ===\n");

    // -------------------------------------------------------------------------
    // 1. Ordered Delivery
    // -------------------------------------------------------------------------
    println!("1. Ordered Delivery");
    println!("-------------------\n");

    let station = WeatherStation::new("rooftop");
    let lobby = Arc::new(DisplayDevice::new("lobby"));
    let office = Arc::new(DisplayDevice::new("office"));
    station.subscribe(&lobby);
    station.subscribe(&office);

    for t in [18, 21, 19] {
        let delivery = station.set_temperature(t);
        println!("  {} -> {} displays", station.reading(), delivery.delivered);
    }
    println!();

    // -------------------------------------------------------------------------
    // 2. Dropped and Removed Displays
    // -------------------------------------------------------------------------
    println!("2. Dropped and Removed Displays");
    println!("-------------------------------\n");

    drop(office);
    let delivery = station.set_temperature(25);
    println!("  after drop: delivered {}, stale {}", delivery.delivered, delivery.stale);

    station.unsubscribe(&lobby);
    let delivery = station.set_temperature(26);
    println!("  after unsubscribe: delivered {}", delivery.delivered);
    println!();

    println!("  lobby saw: {:?}", lobby.history().iter().map(|r| r.temperature).collect::<Vec<_>>());

    println!("\n=== Done ===");
}
