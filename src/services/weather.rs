// Weather service.
// Current-conditions lookup against Weatherstack, validated up front and memoized in the weather cache.

use std::sync::Arc;

use reqwest::Url;
use tracing::{debug, info, warn};

use crate::api::{
    CurrentConditions, HttpClient, NormalizedWeatherData, Units, WeatherLocation,
    WeatherstackResponse, build_url,
};
use crate::config::ACCESS_KEY_ENV;
use crate::error::{PanoramaError, Result};
use crate::storage::weather_cache::parse_coordinates;
use crate::storage::{CALLER_IP_QUERY, CacheKey, WeatherCache};

/// What a weather query refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    Place(String),
    Coordinates { lat: f64, lon: f64 },
    CallerIp,
}

impl LocationQuery {
    /// Classify and validate raw user input. Never touches the network.
    pub fn parse(query: &str) -> Result<Self> {
        let query = query.trim();
        if query.is_empty() {
            return Err(PanoramaError::validation(
                "Enter a city name, \"lat,lon\" coordinates, or fetch:ip",
            ));
        }

        if query.eq_ignore_ascii_case(CALLER_IP_QUERY) {
            return Ok(LocationQuery::CallerIp);
        }

        if let Some((lat, lon)) = parse_coordinates(query) {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(PanoramaError::validation(format!(
                    "Latitude {} is out of range [-90, 90]",
                    lat
                )));
            }
            if !(-180.0..=180.0).contains(&lon) {
                return Err(PanoramaError::validation(format!(
                    "Longitude {} is out of range [-180, 180]",
                    lon
                )));
            }
            return Ok(LocationQuery::Coordinates { lat, lon });
        }

        Ok(LocationQuery::Place(query.to_string()))
    }

    /// Value for the upstream `query` parameter.
    pub fn as_param(&self) -> String {
        match self {
            LocationQuery::Place(name) => name.clone(),
            LocationQuery::Coordinates { lat, lon } => format!("{},{}", lat, lon),
            LocationQuery::CallerIp => CALLER_IP_QUERY.to_string(),
        }
    }
}

/// A weather lookup as issued by the page.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub query: String,
    pub units: Units,
    /// Skip both the cache read and the cache write.
    pub bypass_cache: bool,
}

impl WeatherQuery {
    pub fn new(query: impl Into<String>, units: Units) -> Self {
        Self {
            query: query.into(),
            units,
            bypass_cache: false,
        }
    }

    pub fn bypassing_cache(mut self) -> Self {
        self.bypass_cache = true;
        self
    }
}

/// Result of a lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherReport {
    pub query: String,
    pub units: Units,
    pub data: NormalizedWeatherData,
    pub from_cache: bool,
}

pub struct WeatherService {
    client: HttpClient,
    base: String,
    access_key: Option<String>,
    cache: Arc<WeatherCache>,
}

impl WeatherService {
    pub fn new(
        client: HttpClient,
        base: impl Into<String>,
        access_key: Option<String>,
        cache: Arc<WeatherCache>,
    ) -> Self {
        Self {
            client,
            base: base.into(),
            access_key,
            cache,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.access_key.is_some()
    }

    /// Current conditions for a query, served from the cache while fresh.
    pub async fn current(&self, request: &WeatherQuery) -> Result<WeatherReport> {
        let location = LocationQuery::parse(&request.query)?;
        let access_key = self.access_key.as_deref().ok_or_else(|| {
            PanoramaError::validation(format!(
                "Weather API key is not configured (set {} or weather.access_key)",
                ACCESS_KEY_ENV
            ))
        })?;

        let key = CacheKey::new(&request.query, request.units);
        if !request.bypass_cache {
            if let Some(data) = self.cache.get(&key) {
                return Ok(self.report(request, data, true));
            }
        }

        let url = Url::parse_with_params(
            &build_url(&self.base, "/current"),
            [
                ("access_key", access_key),
                ("query", location.as_param().as_str()),
                ("units", request.units.code()),
            ],
        )
        .map_err(|e| PanoramaError::Config(format!("invalid weather URL: {}", e)))?;

        let raw = self
            .client
            .get(url.as_str())
            .await?
            .data
            .ok_or_else(|| PanoramaError::Schema("empty weather response".to_string()))?;
        let data = normalize_response(raw)?;
        info!(location = %data.location.name, units = request.units.code(), "fetched weather");

        if !request.bypass_cache {
            if let Err(e) = self.cache.put(&key, &data) {
                warn!(key = key.as_str(), error = %e, "failed to cache weather response");
            }
        } else {
            debug!(key = key.as_str(), "cache bypassed, not storing response");
        }

        Ok(self.report(request, data, false))
    }

    fn report(&self, request: &WeatherQuery, data: NormalizedWeatherData, from_cache: bool) -> WeatherReport {
        WeatherReport {
            query: request.query.trim().to_string(),
            units: request.units,
            data,
            from_cache,
        }
    }
}

/// Validate a Weatherstack payload and flatten it.
pub fn normalize_response(raw: serde_json::Value) -> Result<NormalizedWeatherData> {
    let parsed: WeatherstackResponse = serde_json::from_value(raw.clone())
        .map_err(|e| PanoramaError::Schema(e.to_string()))?;

    if let Some(error) = parsed.error {
        let message = error.info.unwrap_or_else(|| {
            format!(
                "Weather API error {} ({})",
                error.code.map(|c| c.to_string()).unwrap_or_else(|| "?".to_string()),
                error.kind.unwrap_or_else(|| "unknown".to_string())
            )
        });
        return Err(PanoramaError::Upstream(message));
    }
    if parsed.success == Some(false) {
        return Err(PanoramaError::Upstream("Weather API request failed".to_string()));
    }

    let (Some(location), Some(current)) = (parsed.location, parsed.current) else {
        return Err(PanoramaError::Schema(
            "weather response is missing location or current conditions".to_string(),
        ));
    };

    Ok(NormalizedWeatherData {
        location: WeatherLocation {
            name: location.name,
            country: location.country,
            region: location.region,
            timezone: location.timezone_id,
            lat: location.lat,
            lon: location.lon,
        },
        current: CurrentConditions {
            temperature: current.temperature,
            humidity: current.humidity,
            pressure: current.pressure,
            wind_speed: current.wind_speed,
            wind_direction: current.wind_dir,
            feels_like: current.feelslike,
            visibility: current.visibility,
            uv_index: current.uv_index,
            precipitation: current.precip,
            conditions: current.weather_descriptions,
            observation_time: current.observation_time,
        },
        raw,
    })
}
