//! # Behavior Catalog
//!
//! Reference hosts built on `behavior-core`, one per composition mechanism:
//!
//! - [`beverage`]: coffee orders priced by stacking condiment layers
//! - [`flight`]: ducks whose flying and walking are swappable strategies
//! - [`cash`]: an ATM that dispenses notes through a handler chain
//! - [`document`]: a draft/moderation/published workflow
//! - [`weather`]: a station pushing readings to display observers
//!
//! ## Example
//!
//! ```rust
//! use behavior_catalog::{Atm, CatalogConfig, Menu};
//! use behavior_core::BehaviorUnit;
//!
//! let config = CatalogConfig::default();
//! let menu = Menu::new(&config.menu);
//! let order = menu.order("DarkRoast", &["Soy", "Mocha"]).unwrap();
//! assert_eq!(order.compute().as_cents(), 134);
//!
//! let atm = Atm::new(&config.dispenser).unwrap();
//! assert_eq!(atm.withdraw(2600).unwrap().note_count(), 3);
//! ```

pub mod beverage;
pub mod cash;
pub mod config;
pub mod document;
mod error;
pub mod flight;
pub mod weather;

pub use beverage::{Beverage, Condiment, Menu};
pub use cash::{Atm, NoteBundle, NoteDispenser, Withdrawal};
pub use config::{CatalogConfig, DispenserConfig, MenuConfig};
pub use document::{document_table, Document, DocumentOp, DocumentState};
pub use error::CatalogError;
pub use flight::{Duck, JetFly, NoFly, SimpleFly};
pub use weather::{DisplayDevice, Reading, WeatherStation};
