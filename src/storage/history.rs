// Persisted weather search history and unit preference.
// History is most-recent-first, deduplicated by normalized query, and capped.

use std::sync::Arc;

use tracing::warn;

use crate::api::Units;
use crate::error::Result;

use super::store::{KeyValueStore, read_json, write_json};
use super::weather_cache::normalize_query;

pub const HISTORY_KEY: &str = "panorama.search_history";
pub const UNITS_KEY: &str = "panorama.units";

/// Maximum number of remembered searches.
pub const HISTORY_LIMIT: usize = 8;

/// Recent weather searches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchHistory {
    entries: Vec<String>,
    limit: usize,
}

impl SearchHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit,
        }
    }

    /// Load history from the store. Unreadable data yields an empty history.
    pub fn load(store: &dyn KeyValueStore, limit: usize) -> Self {
        let entries: Vec<String> = match read_json(store, HISTORY_KEY) {
            Ok(Some(entries)) => entries,
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(error = %e, "discarding unreadable search history");
                Vec::new()
            }
        };

        let mut history = Self::new(limit);
        // Oldest first so the stored order survives re-insertion
        for entry in entries.iter().rev() {
            history.push(entry);
        }
        history
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        write_json(store, HISTORY_KEY, &self.entries)
    }

    /// Record a search at the front, dropping any earlier equivalent and the overflow.
    pub fn push(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        let normalized = normalize_query(query);
        self.entries.retain(|e| normalize_query(e) != normalized);
        self.entries.insert(0, query.to_string());
        self.entries.truncate(self.limit);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Persisted state shared by the weather page: history and unit preference.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
    default_units: Units,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>, default_units: Units) -> Self {
        Self {
            store,
            default_units,
        }
    }

    /// Stored unit preference, or the configured default.
    pub fn units(&self) -> Units {
        match read_json::<Units>(self.store.as_ref(), UNITS_KEY) {
            Ok(Some(units)) => units,
            Ok(None) => self.default_units,
            Err(e) => {
                warn!(error = %e, "discarding unreadable unit preference");
                self.default_units
            }
        }
    }

    pub fn set_units(&self, units: Units) -> Result<()> {
        write_json(self.store.as_ref(), UNITS_KEY, &units)
    }

    pub fn history(&self) -> SearchHistory {
        SearchHistory::load(self.store.as_ref(), HISTORY_LIMIT)
    }

    pub fn save_history(&self, history: &SearchHistory) -> Result<()> {
        history.save(self.store.as_ref())
    }
}
