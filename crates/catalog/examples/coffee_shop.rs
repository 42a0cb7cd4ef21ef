//! Coffee Shop: Decorator Chains
//!
//! Run with: cargo run -p behavior-catalog --example coffee_shop
//!
//! Orders are built by wrapping a base beverage in condiment layers. Each
//! layer adds its price and appends its name; the caller only ever sees a
//! single `BehaviorUnit`.

use behavior_catalog::{Beverage, CatalogError, Condiment, Menu, MenuConfig};
use behavior_core::decorator::{depth, layer_names};
use behavior_core::{BehaviorUnit, DecoratorChain, Money};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), CatalogError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Coffee Shop: Decorator Chains ===\n");

    // -------------------------------------------------------------------------
    // 1. Typed Composition
    // -------------------------------------------------------------------------
    println!("1. Typed Composition");
    println!("--------------------\n");

    let order = DecoratorChain::new()
        .base(Beverage::Espresso.unit())
        .wrap(Condiment::Mocha.layer())
        .wrap(Condiment::Whip.layer())
        .build()?;

    println!("  {} = {}", order.describe(), order.compute());
    println!("  layers: {:?} (depth {})", layer_names(order.as_ref()), depth(order.as_ref()));
    println!();

    // -------------------------------------------------------------------------
    // 2. Ordering From the Menu
    // -------------------------------------------------------------------------
    println!("2. Ordering From the Menu");
    println!("-------------------------\n");

    let menu = Menu::default();
    let orders: [(&str, &[&str]); 3] = [
        ("DarkRoast", &["Milk"]),
        ("HouseBlend", &["Soy", "Mocha", "Mocha"]),
        ("Espresso", &[]),
    ];

    let mut total = Money::ZERO;
    for (base, condiments) in orders {
        let unit = menu.order(base, condiments)?;
        println!("  {:<40} {}", unit.describe(), unit.compute());
        total = total + unit.compute();
    }
    println!("  {:<40} {}", "TOTAL", total);
    println!();

    // -------------------------------------------------------------------------
    // 3. Repricing Without New Types
    // -------------------------------------------------------------------------
    println!("3. Repricing Without New Types");
    println!("------------------------------\n");

    let seasonal = Menu::new(
        &MenuConfig::default().with_condiment("Pumpkin", Money::cents(45)),
    );
    let latte = seasonal.order("Espresso", &["Milk", "Pumpkin"])?;
    println!("  {} = {}", latte.describe(), latte.compute());

    match seasonal.order("Espresso", &["Sprinkles"]) {
        Ok(_) => println!("  unexpected: sprinkles accepted"),
        Err(e) => println!("  rejected: {e}"),
    }

    println!("\n=== Done ===");
    Ok(())
}
