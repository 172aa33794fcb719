//! History entry

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use framenav_routes::Route;

/// One slot of the history stack: the resolved route plus the full URL
/// actually sent to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Unique identifier
    pub id: String,
    /// The resolved destination
    pub route: Route,
    /// Path + serialized query as delivered to the host
    pub full_url: String,
    /// When the host confirmed the navigation
    pub visited_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(route: Route, full_url: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            route,
            full_url: full_url.into(),
            visited_at: Utc::now(),
        }
    }
}

/// Shared handle to a stack slot.
///
/// The tab cache hands the same allocation back on every switch to a
/// visited tab, so observers holding the handle keep a stable reference
/// across tab switches.
pub type SharedEntry = Arc<RwLock<HistoryEntry>>;

pub(crate) fn shared(entry: HistoryEntry) -> SharedEntry {
    Arc::new(RwLock::new(entry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use framenav_routes::NavKind;

    #[test]
    fn test_new_entry() {
        let entry = HistoryEntry::new(Route::new("/pages/home/index", NavKind::Push), "/pages/home/index");
        assert!(!entry.id.is_empty());
        assert_eq!(entry.route.path, "/pages/home/index");
        assert_eq!(entry.full_url, "/pages/home/index");
    }
}
