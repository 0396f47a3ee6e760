//! # Sync State
//!
//! Connectivity of a session's snapshot subscription. A degraded session
//! still serves its last good view; collaborators use this signal to show
//! that the list may be stale.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub enum Connectivity {
    /// Subscribed, first snapshot not yet received
    Connecting,
    /// Snapshots are flowing
    Live,
    /// The subscription broke; the view is the last good snapshot
    Degraded {
        reason: String,
        since: DateTime<Utc>,
    },
    /// The session was torn down
    Closed,
}

impl Connectivity {
    pub fn degraded(reason: impl Into<String>) -> Self {
        Self::Degraded {
            reason: reason.into(),
            since: Utc::now(),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::Connecting
    }
}
