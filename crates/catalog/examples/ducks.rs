//! Ducks: Strategy Slots
//!
//! Run with: cargo run -p behavior-catalog --example ducks
//!
//! One `Duck` type, many behaviors. Flying and walking are strategies held in
//! slots and swapped while the duck is in use.

use std::sync::Arc;

use behavior_catalog::flight::{Duck, JetFly, NoFly, Waddle};
use behavior_catalog::CatalogError;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), CatalogError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Ducks: Strategy Slots ===\n");

    // -------------------------------------------------------------------------
    // 1. Same Host, Different Strategies
    // -------------------------------------------------------------------------
    println!("1. Same Host, Different Strategies");
    println!("----------------------------------\n");

    let ducks = [Duck::mallard("City duck"), Duck::rubber("Bath duck")];
    for duck in &ducks {
        println!("  {}", duck.fly()?);
        println!("  {}", duck.walk()?);
    }
    println!();

    // -------------------------------------------------------------------------
    // 2. Swapping at Run Time
    // -------------------------------------------------------------------------
    println!("2. Swapping at Run Time");
    println!("-----------------------\n");

    let bath = &ducks[1];
    let previous = bath.set_fly_behavior(Arc::new(JetFly));
    println!(
        "  replaced {:?} with {:?}",
        previous.map(|s| s.name().to_string()),
        bath.behaviors().0
    );
    println!("  {}", bath.fly()?);
    bath.set_fly_behavior(Arc::new(NoFly));
    println!("  {}", bath.fly()?);
    println!();

    // -------------------------------------------------------------------------
    // 3. Unconfigured Slots
    // -------------------------------------------------------------------------
    println!("3. Unconfigured Slots");
    println!("---------------------\n");

    let decoy = Duck::new("Decoy").with_walk_behavior(Arc::new(Waddle));
    println!("  {}", decoy.walk()?);
    match decoy.fly() {
        Ok(msg) => println!("  unexpected: {msg}"),
        Err(e) => println!("  fly failed: {e}"),
    }

    println!("\n=== Done ===");
    Ok(())
}
