// Endpoint registry for the upstream APIs.
// Maps logical API names to base URLs and joins paths onto them.

use serde::Deserialize;

/// Upstream APIs the views consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Api {
    JsonPlaceholder,
    RickAndMorty,
    RestCountries,
    Weatherstack,
}

impl Api {
    pub const ALL: [Api; 4] = [
        Api::JsonPlaceholder,
        Api::RickAndMorty,
        Api::RestCountries,
        Api::Weatherstack,
    ];

    /// Public base URL used when configuration does not override it.
    pub fn default_base(&self) -> &'static str {
        match self {
            Api::JsonPlaceholder => "https://jsonplaceholder.typicode.com",
            Api::RickAndMorty => "https://rickandmortyapi.com/api",
            Api::RestCountries => "https://restcountries.com/v3.1",
            Api::Weatherstack => "https://api.weatherstack.com",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Api::JsonPlaceholder => "JSONPlaceholder",
            Api::RickAndMorty => "Rick and Morty API",
            Api::RestCountries => "REST Countries",
            Api::Weatherstack => "Weatherstack",
        }
    }
}

/// Effective base URL per API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub jsonplaceholder: String,
    pub rick_and_morty: String,
    pub rest_countries: String,
    pub weatherstack: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            jsonplaceholder: Api::JsonPlaceholder.default_base().to_string(),
            rick_and_morty: Api::RickAndMorty.default_base().to_string(),
            rest_countries: Api::RestCountries.default_base().to_string(),
            weatherstack: Api::Weatherstack.default_base().to_string(),
        }
    }
}

impl Endpoints {
    /// Base URL for an API.
    pub fn base(&self, api: Api) -> &str {
        match api {
            Api::JsonPlaceholder => &self.jsonplaceholder,
            Api::RickAndMorty => &self.rick_and_morty,
            Api::RestCountries => &self.rest_countries,
            Api::Weatherstack => &self.weatherstack,
        }
    }
}

/// Join `base` and `path` with exactly one slash between them.
pub fn build_url(base: &str, path: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    let path = path.strip_prefix('/').unwrap_or(path);
    format!("{}/{}", base, path)
}
