//! Runtime configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`crate::notify::NotificationHub`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubConfig {
    /// Label used in log events.
    pub label: String,
    /// Remove observers found dropped during a notification.
    pub prune_stale: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            label: "hub".to_string(),
            prune_stale: true,
        }
    }
}

impl HubConfig {
    /// Set the log label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set whether stale observers are pruned.
    pub fn with_prune_stale(mut self, prune: bool) -> Self {
        self.prune_stale = prune;
        self
    }
}
