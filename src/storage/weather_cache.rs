// Weather response cache.
// Memoizes normalized Weatherstack payloads per (query, units) with a fixed TTL, expiring passively on read.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::api::{NormalizedWeatherData, Units};
use crate::error::Result;

use super::clock::Clock;
use super::store::{CachedData, KeyValueStore, read_json, write_json};

/// Default lifetime of a cached weather response: 10 minutes.
pub const WEATHER_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Namespace for weather entries in the key-value store.
pub const WEATHER_KEY_PREFIX: &str = "weather:";

/// Query that asks Weatherstack to geolocate the caller's IP.
pub const CALLER_IP_QUERY: &str = "fetch:ip";

/// Canonicalize a query for cache-key matching.
///
/// Coordinate pairs and the caller-IP sentinel are kept as typed (trimmed);
/// place names are lowercased with runs of whitespace collapsed.
pub fn normalize_query(query: &str) -> String {
    let trimmed = query.trim();
    if trimmed == CALLER_IP_QUERY || parse_coordinates(trimmed).is_some() {
        return trimmed.to_string();
    }
    trimmed
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse `"lat,lon"` into two finite numbers. Range is not checked here.
pub fn parse_coordinates(query: &str) -> Option<(f64, f64)> {
    let (lat, lon) = query.split_once(',')?;
    let lat: f64 = lat.trim().parse().ok()?;
    let lon: f64 = lon.trim().parse().ok()?;
    if lat.is_finite() && lon.is_finite() {
        Some((lat, lon))
    } else {
        None
    }
}

/// Store key for a weather lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn new(query: &str, units: Units) -> Self {
        Self(format!(
            "{}{}|{}",
            WEATHER_KEY_PREFIX,
            normalize_query(query),
            units.code()
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// TTL cache over a key-value store, with an injected clock.
pub struct WeatherCache {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    ttl: Duration,
}

impl WeatherCache {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self { store, clock, ttl }
    }

    /// Fresh payload for `key`, or `None`. Stale and unreadable entries are removed.
    pub fn get(&self, key: &CacheKey) -> Option<NormalizedWeatherData> {
        match read_json::<CachedData<NormalizedWeatherData>>(self.store.as_ref(), key.as_str()) {
            Ok(Some(entry)) if !entry.is_expired(self.clock.now()) => {
                debug!(key = key.as_str(), cached_at = %entry.cached_at, "weather cache hit");
                Some(entry.data)
            }
            Ok(Some(_)) => {
                debug!(key = key.as_str(), "weather cache entry expired");
                self.evict(key);
                None
            }
            Ok(None) => None,
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "unreadable weather cache entry");
                self.evict(key);
                None
            }
        }
    }

    /// Store a payload stamped with the current time.
    pub fn put(&self, key: &CacheKey, data: &NormalizedWeatherData) -> Result<()> {
        let entry = CachedData::new(data, self.clock.now(), self.ttl);
        write_json(self.store.as_ref(), key.as_str(), &entry)
    }

    fn evict(&self, key: &CacheKey) {
        if let Err(e) = self.store.remove(key.as_str()) {
            warn!(key = key.as_str(), error = %e, "failed to evict weather cache entry");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{CurrentConditions, WeatherLocation};
    use crate::storage::clock::ManualClock;
    use crate::storage::store::{FileStore, MemoryStore};
    use chrono::Utc;
    use proptest::prelude::*;
    use serde_json::json;

    fn sample(name: &str) -> NormalizedWeatherData {
        NormalizedWeatherData {
            location: WeatherLocation {
                name: name.to_string(),
                country: "United States of America".to_string(),
                region: "New York".to_string(),
                timezone: "America/New_York".to_string(),
                lat: 40.714,
                lon: -74.006,
            },
            current: CurrentConditions {
                temperature: 13.0,
                humidity: 58.0,
                pressure: 1010.0,
                wind_speed: 0.0,
                wind_direction: "N".to_string(),
                feels_like: 13.0,
                visibility: 16.0,
                uv_index: 4.0,
                precipitation: 0.0,
                conditions: vec!["Sunny".to_string()],
                observation_time: Some("12:14 PM".to_string()),
            },
            raw: json!({"location": {"name": name}}),
        }
    }

    fn cache_with(store: Arc<MemoryStore>, clock: Arc<ManualClock>) -> WeatherCache {
        WeatherCache::new(store, clock, WEATHER_CACHE_TTL)
    }

    #[test]
    fn test_read_after_write_returns_payload() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = cache_with(store, clock.clone());

        let key = CacheKey::new("New York", Units::Metric);
        let data = sample("New York");
        cache.put(&key, &data).unwrap();

        clock.advance(Duration::from_secs(9 * 60));
        assert_eq!(cache.get(&key), Some(data));
    }

    #[test]
    fn test_file_backed_lookup_does_not_cross_queries() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let store = Arc::new(FileStore::new(temp_dir.path()));
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = WeatherCache::new(store, clock, WEATHER_CACHE_TTL);

        cache
            .put(&CacheKey::new("New York", Units::Metric), &sample("New York"))
            .unwrap();
        assert_eq!(cache.get(&CacheKey::new("new_york", Units::Metric)), None);
        assert_eq!(cache.get(&CacheKey::new("new|york", Units::Metric)), None);
        assert_eq!(
            cache.get(&CacheKey::new("  new   york ", Units::Metric)),
            Some(sample("New York"))
        );
    }

    #[test]
    fn test_expired_entry_is_miss_and_removed() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = cache_with(store.clone(), clock.clone());

        let key = CacheKey::new("Paris", Units::Metric);
        cache.put(&key, &sample("Paris")).unwrap();
        assert_eq!(store.len(), 1);

        clock.advance(Duration::from_secs(11 * 60));
        assert!(cache.get(&key).is_none());
        assert!(store.get(key.as_str()).unwrap().is_none());
    }

    #[test]
    fn test_corrupt_entry_is_evicted() {
        let store = Arc::new(MemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let cache = cache_with(store.clone(), clock);

        let key = CacheKey::new("Oslo", Units::Metric);
        store.set(key.as_str(), "{not json").unwrap();

        assert!(cache.get(&key).is_none());
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_cache_key_examples() {
        let a = CacheKey::new("New York", Units::Metric);
        let b = CacheKey::new("new york", Units::Metric);
        let c = CacheKey::new("40.7,-74.0", Units::Metric);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str(), "weather:new york|m");
        assert_eq!(c.as_str(), "weather:40.7,-74.0|m");
        assert_ne!(a, CacheKey::new("New York", Units::Fahrenheit));
    }

    #[test]
    fn test_normalize_preserves_coordinates_and_sentinel() {
        assert_eq!(normalize_query("  40.7,-74.0 "), "40.7,-74.0");
        assert_eq!(normalize_query("fetch:ip"), "fetch:ip");
        assert_eq!(normalize_query("  São   PAULO "), "são paulo");
    }

    #[test]
    fn test_parse_coordinates() {
        assert_eq!(parse_coordinates("40.7,-74.0"), Some((40.7, -74.0)));
        assert_eq!(parse_coordinates(" 1 , 2 "), Some((1.0, 2.0)));
        assert_eq!(parse_coordinates("London"), None);
        assert_eq!(parse_coordinates("inf,1"), None);
        assert_eq!(parse_coordinates("1,2,3"), None);
    }

    proptest! {
        #[test]
        fn prop_normalization_is_idempotent(query in "[ a-zA-Z0-9,.:\\-]{0,32}") {
            let once = normalize_query(&query);
            prop_assert_eq!(normalize_query(&once), once);
        }
    }
}
