//! # Notification Hubs
//!
//! One producer, many consumers: when a subject changes, every currently
//! subscribed observer hears about it, synchronously, in registration order.
//!
//! ```text
//!                    ┌──────────▶ Phone
//!   WeatherStation ──┼──────────▶ TV
//!     (subject)      └──────────▶ Logger
//! ```
//!
//! ## Ownership
//!
//! The hub never owns its observers. It keeps `Weak` references, so an
//! observer dropped by its owner simply stops receiving: the hub skips it,
//! counts it as stale, and (by default) prunes it.
//!
//! ## Policy
//!
//! - Subscribing the same observer twice yields two deliveries per notify.
//! - `unsubscribe` removes every occurrence.
//! - `notify` snapshots the list and delivers after releasing the lock, so
//!   observers may (un)subscribe from inside `on_notify`. Such changes apply
//!   from the next notification on.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::config::HubConfig;

// ============================================================================
// Observer Trait
// ============================================================================

/// Receives notifications from a hub.
pub trait Observer<P: ?Sized>: Send + Sync {
    /// Called once per delivery.
    fn on_notify(&self, payload: &P);
}

/// Adapts a closure into an [`Observer`].
pub struct FnObserver<F> {
    f: F,
}

impl<F> FnObserver<F> {
    /// Wrap a closure.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<P: ?Sized, F> Observer<P> for FnObserver<F>
where
    F: Fn(&P) + Send + Sync,
{
    fn on_notify(&self, payload: &P) {
        (self.f)(payload)
    }
}

/// An observer that logs every payload it receives.
#[derive(Debug, Clone, Default)]
pub struct LoggingObserver {
    name: String,
}

impl LoggingObserver {
    /// Create a named logging observer.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl<P: fmt::Debug + ?Sized> Observer<P> for LoggingObserver {
    fn on_notify(&self, payload: &P) {
        tracing::info!(observer = %self.name, payload = ?payload, "notified");
    }
}

/// An observer that forwards to several owned observers, in insertion order.
pub struct CompositeObserver<P: ?Sized> {
    observers: Vec<Box<dyn Observer<P>>>,
}

impl<P: ?Sized> CompositeObserver<P> {
    /// Create an empty composite.
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Add an observer to the composite.
    pub fn with<O: Observer<P> + 'static>(mut self, observer: O) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Number of inner observers.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Whether the composite has no inner observers.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<P: ?Sized> Default for CompositeObserver<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized> Observer<P> for CompositeObserver<P> {
    fn on_notify(&self, payload: &P) {
        for observer in &self.observers {
            observer.on_notify(payload);
        }
    }
}

// ============================================================================
// Hub
// ============================================================================

/// Counts from one [`NotificationHub::notify`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    /// Observers that received the payload.
    pub delivered: usize,
    /// Registrations skipped because the observer was dropped.
    pub stale: usize,
}

/// An ordered registry of non-owning observer references.
///
/// # Example
///
/// ```
/// use behavior_core::{FnObserver, NotificationHub};
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let hub: NotificationHub<i32> = NotificationHub::new();
///
/// let log = Arc::clone(&seen);
/// let observer = Arc::new(FnObserver::new(move |t: &i32| log.lock().unwrap().push(*t)));
/// hub.subscribe(&observer);
///
/// let delivery = hub.notify(&25);
/// assert_eq!(delivery.delivered, 1);
/// assert_eq!(*seen.lock().unwrap(), vec![25]);
///
/// drop(observer);
/// assert_eq!(hub.notify(&30).stale, 1);
/// ```
pub struct NotificationHub<P: ?Sized> {
    config: HubConfig,
    observers: Mutex<Vec<Weak<dyn Observer<P>>>>,
}

impl<P: ?Sized + 'static> NotificationHub<P> {
    /// Create a hub with default configuration.
    pub fn new() -> Self {
        Self::with_config(HubConfig::default())
    }

    /// Create a hub with the given configuration.
    pub fn with_config(config: HubConfig) -> Self {
        Self {
            config,
            observers: Mutex::new(Vec::new()),
        }
    }

    /// The hub's configuration.
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// Append an observer to the notification order.
    ///
    /// The hub keeps only a weak reference; the caller owns the observer.
    pub fn subscribe<O: Observer<P> + 'static>(&self, observer: &Arc<O>) {
        let weak: Weak<O> = Arc::downgrade(observer);
        self.subscribe_weak(weak);
    }

    /// Append an already type-erased observer.
    pub fn subscribe_dyn(&self, observer: &Arc<dyn Observer<P>>) {
        self.subscribe_weak(Arc::downgrade(observer));
    }

    /// Append a weak observer reference.
    pub fn subscribe_weak(&self, observer: Weak<dyn Observer<P>>) {
        let mut observers = self.observers.lock();
        observers.push(observer);
        tracing::trace!(hub = %self.config.label, count = observers.len(), "observer subscribed");
    }

    /// Remove every registration of `observer`. Returns how many were removed.
    pub fn unsubscribe<O: ?Sized>(&self, observer: &Arc<O>) -> usize {
        let target = Arc::as_ptr(observer).cast::<()>();
        let mut observers = self.observers.lock();
        let before = observers.len();
        observers.retain(|weak| weak.as_ptr().cast::<()>() != target);
        let removed = before - observers.len();
        tracing::trace!(hub = %self.config.label, removed, "observer unsubscribed");
        removed
    }

    /// Number of registrations, including any not yet pruned stale ones.
    pub fn len(&self) -> usize {
        self.observers.lock().len()
    }

    /// Whether there are no registrations.
    pub fn is_empty(&self) -> bool {
        self.observers.lock().is_empty()
    }

    /// Number of registrations whose observer is still alive.
    pub fn live_count(&self) -> usize {
        self.observers
            .lock()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Drop registrations whose observer is gone. Returns how many were removed.
    pub fn prune_stale(&self) -> usize {
        let mut observers = self.observers.lock();
        let before = observers.len();
        observers.retain(|weak| weak.strong_count() > 0);
        before - observers.len()
    }

    /// Deliver `payload` to every live observer in registration order.
    ///
    /// Runs synchronously; every delivery has happened when this returns.
    pub fn notify(&self, payload: &P) -> Delivery {
        let snapshot: Vec<Weak<dyn Observer<P>>> = self.observers.lock().clone();
        let mut delivery = Delivery::default();

        for weak in &snapshot {
            match weak.upgrade() {
                Some(observer) => {
                    observer.on_notify(payload);
                    delivery.delivered += 1;
                }
                None => delivery.stale += 1,
            }
        }

        if delivery.stale > 0 {
            tracing::warn!(
                hub = %self.config.label,
                stale = delivery.stale,
                "skipped dropped observers"
            );
            if self.config.prune_stale {
                self.prune_stale();
            }
        }

        tracing::debug!(hub = %self.config.label, delivered = delivery.delivered, "notified");
        delivery
    }
}

impl<P: ?Sized + 'static> Default for NotificationHub<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ?Sized> fmt::Debug for NotificationHub<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationHub")
            .field("label", &self.config.label)
            .field("registrations", &self.observers.lock().len())
            .finish()
    }
}

// ============================================================================
// Observed Value
// ============================================================================

/// A subject: a value plus the hub that announces its changes.
///
/// The new value is stored before any observer runs, so observers always
/// see post-update data.
///
/// # Example
///
/// ```
/// use behavior_core::{FnObserver, ObservedValue};
/// use std::sync::Arc;
///
/// let temperature = Arc::new(ObservedValue::new(20));
/// let probe = Arc::clone(&temperature);
/// let observer = Arc::new(FnObserver::new(move |t: &i32| {
///     assert_eq!(probe.get(), *t);
/// }));
/// temperature.hub().subscribe(&observer);
/// temperature.set(25);
/// ```
pub struct ObservedValue<T> {
    value: Mutex<T>,
    hub: NotificationHub<T>,
}

impl<T: Clone + Send + 'static> ObservedValue<T> {
    /// Create a subject holding `initial`.
    pub fn new(initial: T) -> Self {
        Self::with_config(initial, HubConfig::default())
    }

    /// Create a subject with a configured hub.
    pub fn with_config(initial: T, config: HubConfig) -> Self {
        Self {
            value: Mutex::new(initial),
            hub: NotificationHub::with_config(config),
        }
    }

    /// The current value.
    pub fn get(&self) -> T {
        self.value.lock().clone()
    }

    /// The hub observers subscribe to.
    pub fn hub(&self) -> &NotificationHub<T> {
        &self.hub
    }

    /// Store a new value, then notify observers of it.
    pub fn set(&self, value: T) -> Delivery {
        self.update(|current| *current = value)
    }

    /// Mutate the value in place, then notify observers of the result.
    pub fn update<F: FnOnce(&mut T)>(&self, f: F) -> Delivery {
        let updated = {
            let mut current = self.value.lock();
            f(&mut current);
            current.clone()
        };
        self.hub.notify(&updated)
    }
}

impl<T: fmt::Debug> fmt::Debug for ObservedValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservedValue")
            .field("value", &*self.value.lock())
            .field("hub", &self.hub)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
