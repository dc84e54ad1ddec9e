// panorama: terminal dashboard over four public JSON APIs.
// Wires configuration, storage, services, and the terminal together.

mod api;
mod app;
mod config;
mod error;
mod router;
mod services;
mod state;
mod storage;
mod tasks;
mod ui;

use std::fs::{self, OpenOptions};
use std::sync::{Arc, Mutex};

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::HttpClient;
use crate::app::App;
use crate::config::{ACCESS_KEY_ENV, Config};
use crate::services::Services;
use crate::state::PageSettings;
use crate::storage::{FileStore, KeyValueStore, MemoryStore, Preferences, SystemClock, WeatherCache, paths};

/// Log to a file under the cache directory; the terminal belongs to the UI.
/// Without a writable location, logging stays off.
#[allow(clippy::collapsible_if)]
fn init_logging() {
    let Some(path) = paths::log_path() else {
        return;
    };
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "panorama=info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();
}

fn open_store() -> Arc<dyn KeyValueStore> {
    match paths::store_dir() {
        Some(dir) => {
            let store = FileStore::new(dir);
            info!(dir = %store.dir().display(), "using file store");
            Arc::new(store)
        }
        None => {
            warn!("no cache directory available, history and cache will not persist");
            Arc::new(MemoryStore::new())
        }
    }
}

#[tokio::main]
async fn main() -> error::Result<()> {
    init_logging();
    info!(version = env!("CARGO_PKG_VERSION"), "starting panorama");

    let config = Config::load()?;
    let store = open_store();
    let cache = Arc::new(WeatherCache::new(
        store.clone(),
        Arc::new(SystemClock),
        config.weather_cache_ttl(),
    ));
    let client = HttpClient::new(config.connect_timeout())?;
    let services = Arc::new(Services::new(&config, client, cache));

    if !services.weather.is_configured() {
        warn!(env = ACCESS_KEY_ENV, "weather access key not configured");
    }

    let settings = PageSettings {
        debounce: config.debounce_delay(),
        prefs: Preferences::new(store, config.weather.default_units),
        weather_configured: services.weather.is_configured(),
    };
    let mut app = App::new(services, settings, config.toast_duration());

    // Optional start location, e.g. `panorama '#weather'`
    let start = std::env::args().nth(1).unwrap_or_default();
    app.navigate(&start);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    info!("exiting");
    result?;
    Ok(())
}
