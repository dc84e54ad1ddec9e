// Upstream API response types.
// Explicit schemas for every payload; anything that fails to decode is rejected at the service boundary.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// JSONPlaceholder
// ---------------------------------------------------------------------------

/// Blog post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub user_id: u64,
    pub id: u64,
    pub title: String,
    pub body: String,
}

/// Comment on a post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub post_id: u64,
    pub id: u64,
    pub name: String,
    pub email: String,
    pub body: String,
}

/// Payload for creating or replacing a post.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub user_id: u64,
}

// ---------------------------------------------------------------------------
// Rick and Morty
// ---------------------------------------------------------------------------

/// Pagination metadata returned with every character list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    pub count: u64,
    pub pages: u32,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// Named link to another resource (origin, location).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedLink {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// Character from the multiverse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: u64,
    pub name: String,
    pub status: String,
    pub species: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub gender: String,
    #[serde(default)]
    pub origin: NamedLink,
    #[serde(default)]
    pub location: NamedLink,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub episode: Vec<String>,
}

/// One page of characters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterPage {
    pub info: PageInfo,
    pub results: Vec<Character>,
}

impl CharacterPage {
    pub fn has_next(&self) -> bool {
        self.info.next.is_some()
    }

    pub fn has_prev(&self) -> bool {
        self.info.prev.is_some()
    }
}

// ---------------------------------------------------------------------------
// REST Countries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryName {
    pub common: String,
    #[serde(default)]
    pub official: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flags {
    pub png: Option<String>,
    pub alt: Option<String>,
}

/// Country as rendered by the countries view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub name: CountryName,
    #[serde(default)]
    pub cca3: String,
    #[serde(default)]
    pub region: String,
    pub subregion: Option<String>,
    #[serde(default)]
    pub population: u64,
    #[serde(default)]
    pub capital: Vec<String>,
    #[serde(default)]
    pub flags: Flags,
}

impl Country {
    /// First listed capital, if any.
    pub fn capital(&self) -> Option<&str> {
        self.capital.first().map(String::as_str)
    }
}

// ---------------------------------------------------------------------------
// Weatherstack
// ---------------------------------------------------------------------------

/// Unit system understood by Weatherstack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Units {
    #[default]
    #[serde(rename = "m")]
    Metric,
    #[serde(rename = "f")]
    Fahrenheit,
    #[serde(rename = "s")]
    Scientific,
}

impl Units {
    /// Query parameter value.
    pub fn code(&self) -> &'static str {
        match self {
            Units::Metric => "m",
            Units::Fahrenheit => "f",
            Units::Scientific => "s",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Units::Metric => "Metric",
            Units::Fahrenheit => "Fahrenheit",
            Units::Scientific => "Scientific",
        }
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Fahrenheit => "°F",
            Units::Scientific => "K",
        }
    }

    pub fn speed_suffix(&self) -> &'static str {
        match self {
            Units::Fahrenheit => "mph",
            Units::Metric | Units::Scientific => "km/h",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Units::Metric => Units::Fahrenheit,
            Units::Fahrenheit => Units::Scientific,
            Units::Scientific => Units::Metric,
        }
    }
}

/// Raw Weatherstack envelope. Either `error` or `location` + `current` is present.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherstackResponse {
    pub success: Option<bool>,
    pub error: Option<WeatherstackError>,
    pub location: Option<WeatherstackLocation>,
    pub current: Option<WeatherstackCurrent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherstackError {
    pub code: Option<i64>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub info: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherstackLocation {
    pub name: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub region: String,
    #[serde(deserialize_with = "number_or_string")]
    pub lat: f64,
    #[serde(deserialize_with = "number_or_string")]
    pub lon: f64,
    #[serde(default)]
    pub timezone_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherstackCurrent {
    pub observation_time: Option<String>,
    pub temperature: f64,
    #[serde(default)]
    pub weather_descriptions: Vec<String>,
    #[serde(default)]
    pub wind_speed: f64,
    #[serde(default)]
    pub wind_dir: String,
    #[serde(default)]
    pub pressure: f64,
    #[serde(default)]
    pub precip: f64,
    #[serde(default)]
    pub humidity: f64,
    #[serde(default)]
    pub feelslike: f64,
    #[serde(default)]
    pub uv_index: f64,
    #[serde(default)]
    pub visibility: f64,
}

/// Where the weather was observed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherLocation {
    pub name: String,
    pub country: String,
    pub region: String,
    pub timezone: String,
    pub lat: f64,
    pub lon: f64,
}

/// Current conditions, units as requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub wind_direction: String,
    pub feels_like: f64,
    pub visibility: f64,
    pub uv_index: f64,
    pub precipitation: f64,
    pub conditions: Vec<String>,
    pub observation_time: Option<String>,
}

/// Weather payload after validation, as cached and rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedWeatherData {
    pub location: WeatherLocation,
    pub current: CurrentConditions,
    /// Upstream payload exactly as received.
    pub raw: Value,
}

/// Accept coordinates sent either as JSON numbers or numeric strings.
fn number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_uses_camel_case() {
        let post: Post = serde_json::from_value(json!({
            "userId": 1, "id": 7, "title": "qui est esse", "body": "est rerum"
        }))
        .unwrap();
        assert_eq!(post.user_id, 1);
        assert_eq!(post.id, 7);

        let draft = NewPost {
            title: "t".into(),
            body: "b".into(),
            user_id: 1,
        };
        assert_eq!(serde_json::to_value(&draft).unwrap()["userId"], 1);
    }

    #[test]
    fn test_character_page_decodes() {
        let page: CharacterPage = serde_json::from_value(json!({
            "info": {"count": 826, "pages": 42, "next": "https://x/?page=2", "prev": null},
            "results": [{
                "id": 1, "name": "Rick Sanchez", "status": "Alive", "species": "Human",
                "type": "", "gender": "Male",
                "origin": {"name": "Earth (C-137)", "url": ""},
                "location": {"name": "Citadel of Ricks", "url": ""},
                "image": "https://x/1.jpeg", "episode": ["https://x/ep/1"]
            }]
        }))
        .unwrap();
        assert!(page.has_next());
        assert!(!page.has_prev());
        assert_eq!(page.results[0].origin.name, "Earth (C-137)");
    }

    #[test]
    fn test_country_missing_optional_fields() {
        let country: Country = serde_json::from_value(json!({
            "name": {"common": "Antarctica"},
            "region": "Antarctic"
        }))
        .unwrap();
        assert_eq!(country.capital(), None);
        assert_eq!(country.population, 0);
        assert!(country.flags.png.is_none());
    }

    #[test]
    fn test_weatherstack_location_accepts_string_coordinates() {
        let location: WeatherstackLocation = serde_json::from_value(json!({
            "name": "New York", "country": "United States of America", "region": "New York",
            "lat": "40.714", "lon": -74.006, "timezone_id": "America/New_York"
        }))
        .unwrap();
        assert_eq!(location.lat, 40.714);
        assert_eq!(location.lon, -74.006);
    }

    #[test]
    fn test_units_codes() {
        for units in [Units::Metric, Units::Fahrenheit, Units::Scientific] {
            assert_eq!(serde_json::to_value(units).unwrap(), json!(units.code()));
        }
        assert_eq!(Units::Scientific.next(), Units::Metric);
        assert_eq!(serde_json::to_value(Units::Fahrenheit).unwrap(), json!("f"));
    }
}
