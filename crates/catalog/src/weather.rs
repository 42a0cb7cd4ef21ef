//! # Weather Station
//!
//! A station publishes readings; displays subscribe and react. The station
//! never owns its displays: dropping a display is enough to stop it being
//! notified.
//!
//! ```text
//!   WeatherStation ──notify──▶ DisplayDevice "lobby"
//!          │        ──notify──▶ DisplayDevice "roof"
//!          └── holds Weak refs only
//! ```

use std::fmt;
use std::sync::Arc;

use behavior_core::{Delivery, HubConfig, ObservedValue, Observer};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// A single measurement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Degrees Celsius.
    pub temperature: i32,
}

impl Reading {
    pub fn celsius(temperature: i32) -> Self {
        Self { temperature }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°C", self.temperature)
    }
}

// ============================================================================
// Station
// ============================================================================

/// The subject: the latest reading plus its subscribers.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use behavior_catalog::weather::{DisplayDevice, Reading, WeatherStation};
///
/// let station = WeatherStation::new("rooftop");
/// let lobby = Arc::new(DisplayDevice::new("lobby"));
/// station.subscribe(&lobby);
///
/// station.set_temperature(21);
/// assert_eq!(lobby.last(), Some(Reading::celsius(21)));
/// ```
pub struct WeatherStation {
    name: String,
    reading: ObservedValue<Reading>,
}

impl WeatherStation {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let config = HubConfig::default().with_label(name.clone());
        Self::with_config(name, config)
    }

    pub fn with_config(name: impl Into<String>, config: HubConfig) -> Self {
        Self {
            name: name.into(),
            reading: ObservedValue::with_config(Reading::default(), config),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The latest reading.
    pub fn reading(&self) -> Reading {
        self.reading.get()
    }

    /// Record a new temperature and push it to every live display.
    pub fn set_temperature(&self, temperature: i32) -> Delivery {
        self.publish(Reading::celsius(temperature))
    }

    pub fn publish(&self, reading: Reading) -> Delivery {
        let delivery = self.reading.set(reading);
        tracing::debug!(
            station = %self.name,
            reading = %reading,
            delivered = delivery.delivered,
            stale = delivery.stale,
            "reading published"
        );
        delivery
    }

    pub fn subscribe<O: Observer<Reading> + 'static>(&self, observer: &Arc<O>) {
        self.reading.hub().subscribe(observer);
    }

    pub fn unsubscribe<O: ?Sized>(&self, observer: &Arc<O>) -> usize {
        self.reading.hub().unsubscribe(observer)
    }

    /// Subscribers that are still alive.
    pub fn display_count(&self) -> usize {
        self.reading.hub().live_count()
    }
}

impl fmt::Debug for WeatherStation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherStation")
            .field("name", &self.name)
            .field("reading", &self.reading())
            .finish()
    }
}

// ============================================================================
// Display
// ============================================================================

/// An observer that shows and remembers every reading it receives.
#[derive(Debug, Default)]
pub struct DisplayDevice {
    name: String,
    history: Mutex<Vec<Reading>>,
}

impl DisplayDevice {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            history: Mutex::new(Vec::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The most recent reading shown.
    pub fn last(&self) -> Option<Reading> {
        self.history.lock().last().copied()
    }

    /// Every reading shown, oldest first.
    pub fn history(&self) -> Vec<Reading> {
        self.history.lock().clone()
    }
}

impl Observer<Reading> for DisplayDevice {
    fn on_notify(&self, reading: &Reading) {
        tracing::info!(display = %self.name, temperature = reading.temperature, "temperature updated");
        self.history.lock().push(*reading);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_displays_notified_in_subscription_order() {
        let station = WeatherStation::new("test");
        let order = Arc::new(Mutex::new(Vec::new()));

        struct Tagged {
            tag: &'static str,
            order: Arc<Mutex<Vec<&'static str>>>,
        }
        impl Observer<Reading> for Tagged {
            fn on_notify(&self, _: &Reading) {
                self.order.lock().push(self.tag);
            }
        }

        let a = Arc::new(Tagged { tag: "a", order: Arc::clone(&order) });
        let b = Arc::new(Tagged { tag: "b", order: Arc::clone(&order) });
        let c = Arc::new(Tagged { tag: "c", order: Arc::clone(&order) });
        station.subscribe(&a);
        station.subscribe(&b);
        station.subscribe(&c);

        let delivery = station.set_temperature(18);
        assert_eq!(delivery.delivered, 3);
        assert_eq!(*order.lock(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_display_history() {
        let station = WeatherStation::new("test");
        let display = Arc::new(DisplayDevice::new("hall"));
        station.subscribe(&display);

        station.set_temperature(10);
        station.set_temperature(12);
        assert_eq!(
            display.history(),
            vec![Reading::celsius(10), Reading::celsius(12)]
        );
        assert_eq!(station.reading(), Reading::celsius(12));
    }

    #[test]
    fn test_dropped_display_is_skipped() {
        let station = WeatherStation::new("test");
        let kept = Arc::new(DisplayDevice::new("kept"));
        let dropped = Arc::new(DisplayDevice::new("dropped"));
        station.subscribe(&kept);
        station.subscribe(&dropped);
        drop(dropped);

        let delivery = station.set_temperature(5);
        assert_eq!(delivery.delivered, 1);
        assert_eq!(delivery.stale, 1);
        assert_eq!(station.display_count(), 1);
        assert_eq!(kept.last(), Some(Reading::celsius(5)));
    }

    #[test]
    fn test_unsubscribed_display_stops_receiving() {
        let station = WeatherStation::new("test");
        let display = Arc::new(DisplayDevice::new("hall"));
        station.subscribe(&display);
        station.set_temperature(1);

        assert_eq!(station.unsubscribe(&display), 1);
        station.set_temperature(2);
        assert_eq!(display.history(), vec![Reading::celsius(1)]);
    }
}
