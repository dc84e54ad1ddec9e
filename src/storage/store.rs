// Key-value store for persisted client state.
// Backs the weather cache, search history, and unit preference; JSON values, one file per key on disk.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::Result;

/// String key to string value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// Wrapper for stored data with its write time and lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedData<T> {
    /// The cached data.
    pub data: T,
    /// When the data was cached.
    pub cached_at: DateTime<Utc>,
    /// Lifetime in seconds, recorded with the entry.
    pub ttl_secs: u64,
}

impl<T> CachedData<T> {
    pub fn new(data: T, cached_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            data,
            cached_at,
            ttl_secs: ttl.as_secs(),
        }
    }

    /// Check if the entry has reached its TTL at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        // A timestamp in the future counts as expired rather than forever fresh.
        let age = now
            .signed_duration_since(self.cached_at)
            .to_std()
            .unwrap_or(Duration::MAX);

        age >= Duration::from_secs(self.ttl_secs)
    }
}

/// Read and decode a JSON value.
pub fn read_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(text) => Ok(Some(serde_json::from_str(&text)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON value.
pub fn write_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let text = serde_json::to_string(value)?;
    store.set(key, &text)
}

/// Store keeping one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_key(key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);

        // Write atomically via temp file
        let temp_path = path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&temp_path, &path)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Process-local store, used when no cache directory is available.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// Encode a key as a file name stem.
/// ASCII alphanumerics, `.` and `-` are kept; every other byte becomes `_XX`
/// (uppercase hex), so distinct keys never share a file.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'.' | b'-' => encoded.push(byte as char),
            _ => encoded.push_str(&format!("_{:02X}", byte)),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_encode_key() {
        assert_eq!(encode_key("simple"), "simple");
        assert_eq!(encode_key("weather:new york|m"), "weather_3Anew_20york_7Cm");
        assert_eq!(encode_key("weather:new_york|m"), "weather_3Anew_5Fyork_7Cm");
        assert_eq!(encode_key("../etc"), ".._2Fetc");
    }

    #[test]
    fn test_file_store_keys_differing_in_separators_stay_apart() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        store.set("weather:new york|m", "\"spaced\"").unwrap();
        assert!(store.get("weather:new_york|m").unwrap().is_none());
        assert!(store.get("weather:new:york|m").unwrap().is_none());

        store.set("weather:new_york|m", "\"underscored\"").unwrap();
        assert_eq!(store.get("weather:new york|m").unwrap().as_deref(), Some("\"spaced\""));
        assert_eq!(
            store.get("weather:new_york|m").unwrap().as_deref(),
            Some("\"underscored\"")
        );

        store.remove("weather:new york|m").unwrap();
        assert!(store.get("weather:new_york|m").unwrap().is_some());
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path().join("store"));

        let data = TestData {
            name: "test".to_string(),
            value: 42,
        };
        write_json(&store, "panorama.test", &data).unwrap();

        let read: Option<TestData> = read_json(&store, "panorama.test").unwrap();
        assert_eq!(read, Some(data));
        assert!(store.dir().join("panorama.test.json").exists());
    }

    #[test]
    fn test_file_store_missing_and_remove() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileStore::new(temp_dir.path());

        assert!(store.get("nonexistent").unwrap().is_none());

        store.set("k", "\"v\"").unwrap();
        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());

        // Removing twice is fine
        store.remove("k").unwrap();
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.len(), 1);
        store.remove("a").unwrap();
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_cached_data_expiry() {
        let start = Utc::now();
        let entry = CachedData::new("payload", start, Duration::from_secs(600));

        assert!(!entry.is_expired(start));
        assert!(!entry.is_expired(start + chrono::Duration::seconds(599)));
        assert!(entry.is_expired(start + chrono::Duration::seconds(600)));
        assert!(entry.is_expired(start + chrono::Duration::seconds(3600)));
    }

    #[test]
    fn test_cached_data_from_future_is_expired() {
        let now = Utc::now();
        let entry = CachedData::new("payload", now + chrono::Duration::hours(1), Duration::from_secs(600));
        assert!(entry.is_expired(now));
    }
}
