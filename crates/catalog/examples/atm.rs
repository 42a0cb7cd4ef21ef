//! ATM: Responsibility Chains
//!
//! Run with: cargo run -p behavior-catalog --example atm
//!
//! Each note denomination is a handler. A withdrawal walks the chain from
//! the largest note down; whatever is left after the last handler is
//! reported, not swallowed.

use behavior_catalog::{Atm, CatalogError, DispenserConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), CatalogError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== ATM: Responsibility Chains ===\n");

    // -------------------------------------------------------------------------
    // 1. The Reference Chain
    // -------------------------------------------------------------------------
    println!("1. The Reference Chain");
    println!("----------------------\n");

    let atm = Atm::standard()?;
    println!("  handlers: {:?}", atm.chain().labels());

    let withdrawal = atm.withdraw(8700)?;
    for bundle in &withdrawal.bundles {
        println!("  dispensing {bundle}");
    }
    println!("  {} notes for {}", withdrawal.note_count(), withdrawal.amount);
    println!();

    // -------------------------------------------------------------------------
    // 2. Amounts No Note Covers
    // -------------------------------------------------------------------------
    println!("2. Amounts No Note Covers");
    println!("-------------------------\n");

    let plan = atm.plan(8753);
    for portion in &plan.portions {
        println!("  {} -> {}", portion.label, portion.value);
    }
    println!("  leftover: {:?}", plan.remainder());

    match atm.withdraw(8753) {
        Ok(_) => println!("  unexpected: 8753 dispensed"),
        Err(e) => println!("  {e}"),
    }
    println!();

    // -------------------------------------------------------------------------
    // 3. Configured Denominations
    // -------------------------------------------------------------------------
    println!("3. Configured Denominations");
    println!("---------------------------\n");

    let config = DispenserConfig::default().with_denominations(vec![500, 200, 50]);
    let small = Atm::new(&config)?;
    for bundle in small.withdraw(8750)?.bundles {
        println!("  dispensing {bundle}");
    }

    match Atm::new(&DispenserConfig::default().with_denominations(vec![100, 0])) {
        Ok(_) => println!("  unexpected: zero note accepted"),
        Err(e) => println!("  {e}"),
    }

    println!("\n=== Done ===");
    Ok(())
}
