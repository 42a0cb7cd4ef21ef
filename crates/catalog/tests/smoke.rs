//! End-to-end checks of the catalogue hosts, configured from JSON.

use std::sync::Arc;

use behavior_catalog::document::DocumentTransition;
use behavior_catalog::flight::Waddle;
use behavior_catalog::{
    Atm, CatalogConfig, CatalogError, DisplayDevice, Document, DocumentState, Duck, JetFly, Menu,
    Reading, WeatherStation,
};
use behavior_core::{BehaviorUnit, CompositeObserver, FnObserver, Money, Observer};
use parking_lot::Mutex;

const CONFIG: &str = r#"{
    "menu": {
        "beverages": { "Espresso": 249, "Cortado": 275 },
        "condiments": { "Oat": 60, "Whip": 20 }
    },
    "dispenser": { "denominations": [1000, 500, 200] },
    "hub": { "label": "lobby-station", "prune_stale": false }
}"#;

#[test]
fn smoke_config_drives_menu() {
    let config = CatalogConfig::from_json(CONFIG).unwrap();
    let menu = Menu::new(&config.menu);

    let order = menu.order("Cortado", &["Oat", "Whip"]).unwrap();
    assert_eq!(order.compute(), Money::cents(355));
    assert_eq!(order.describe(), "Cortado, Oat, Whip");

    assert!(matches!(
        menu.order("DarkRoast", &[]),
        Err(CatalogError::UnknownItem { kind: "beverage", .. })
    ));
}

#[test]
fn smoke_config_drives_atm() {
    let config = CatalogConfig::from_json(CONFIG).unwrap();
    let atm = Atm::new(&config.dispenser).unwrap();

    let withdrawal = atm.withdraw(3700).unwrap();
    let counts: Vec<_> = withdrawal
        .bundles
        .iter()
        .map(|b| (b.denomination, b.count))
        .collect();
    assert_eq!(counts, vec![(1000, 3), (500, 1), (200, 1)]);

    assert!(matches!(
        atm.withdraw(3750),
        Err(CatalogError::CannotDispense { remainder: 50, .. })
    ));
}

#[test]
fn smoke_config_drives_station_hub() {
    let config = CatalogConfig::from_json(CONFIG).unwrap();
    let station = WeatherStation::with_config("roof", config.hub.clone());

    let display = Arc::new(DisplayDevice::new("hall"));
    let gone = Arc::new(DisplayDevice::new("gone"));
    station.subscribe(&display);
    station.subscribe(&gone);
    drop(gone);

    assert_eq!(station.set_temperature(3).stale, 1);
    // Pruning is disabled, so the stale registration is skipped again.
    assert_eq!(station.set_temperature(4).stale, 1);
    assert_eq!(display.history(), vec![Reading::celsius(3), Reading::celsius(4)]);
}

#[test]
fn smoke_duck_strategy_swap() {
    let duck = Duck::new("Howard").with_walk_behavior(Arc::new(Waddle));
    assert!(duck.fly().is_err());

    duck.set_fly_behavior(Arc::new(JetFly));
    assert_eq!(duck.fly().unwrap(), "Howard flies with a jet pack");
    assert_eq!(duck.walk().unwrap(), "Howard waddles");
}

#[test]
fn smoke_document_feeds_composite_observer() {
    let doc = Document::new("changelog").unwrap();
    let states = Arc::new(Mutex::new(Vec::new()));
    let effects = Arc::new(Mutex::new(Vec::new()));

    let (s, e) = (Arc::clone(&states), Arc::clone(&effects));
    let both: Arc<CompositeObserver<DocumentTransition>> = Arc::new(
        CompositeObserver::new()
            .with(FnObserver::new(move |t: &DocumentTransition| s.lock().push(t.to)))
            .with(FnObserver::new(move |t: &DocumentTransition| {
                e.lock().push(t.effect.clone())
            })),
    );
    doc.subscribe(&both);

    doc.edit("line");
    doc.publish();
    doc.publish();
    doc.publish();

    assert_eq!(
        *states.lock(),
        vec![
            DocumentState::Draft,
            DocumentState::Moderation,
            DocumentState::Published
        ]
    );
    assert_eq!(effects.lock().len(), 3);
    assert_eq!(doc.state(), DocumentState::Published);
}

#[test]
fn smoke_display_is_an_observer() {
    let display = DisplayDevice::new("direct");
    display.on_notify(&Reading::celsius(-4));
    assert_eq!(display.last(), Some(Reading::celsius(-4)));
}
