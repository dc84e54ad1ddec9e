// Filesystem locations for panorama.
// Resolves config, key-value store, and log paths from the platform project directories.

use std::path::PathBuf;

use directories::ProjectDirs;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "panorama")
}

/// Base cache directory (~/.cache/panorama on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Base config directory (~/.config/panorama on Linux).
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().to_path_buf())
}

/// Default configuration file.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("config.toml"))
}

/// Directory holding the key-value store files.
pub fn store_dir() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("store"))
}

/// Log file written by the tracing subscriber.
pub fn log_path() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("panorama.log"))
}
