// Local persistence module.
// Key-value store backends, the weather response cache, and saved preferences.

pub mod clock;
pub mod history;
pub mod paths;
pub mod store;
pub mod weather_cache;

pub use clock::{Clock, SystemClock};
pub use history::{Preferences, SearchHistory};
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use weather_cache::{CALLER_IP_QUERY, CacheKey, WEATHER_CACHE_TTL, WeatherCache};
