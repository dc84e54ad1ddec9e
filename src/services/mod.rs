// Per-resource services.
// Build request URLs and parameters for each view and decode the responses.

pub mod characters;
pub mod countries;
pub mod posts;
pub mod weather;

use std::sync::Arc;

use tracing::debug;

use crate::api::{Api, HttpClient};
use crate::config::Config;
use crate::storage::WeatherCache;

pub use characters::{CharacterGender, CharacterQuery, CharacterStatus, CharactersService};
pub use countries::CountriesService;
pub use posts::PostsService;
pub use weather::{LocationQuery, WeatherQuery, WeatherReport, WeatherService};

/// All services, shared with background loads.
pub struct Services {
    pub posts: PostsService,
    pub characters: CharactersService,
    pub countries: CountriesService,
    pub weather: WeatherService,
}

impl Services {
    pub fn new(config: &Config, client: HttpClient, cache: Arc<WeatherCache>) -> Self {
        let endpoints = &config.endpoints;
        for api in Api::ALL {
            debug!(api = api.name(), base = endpoints.base(api), "endpoint");
        }
        Self {
            posts: PostsService::new(client.clone(), endpoints.base(Api::JsonPlaceholder)),
            characters: CharactersService::new(client.clone(), endpoints.base(Api::RickAndMorty)),
            countries: CountriesService::new(client.clone(), endpoints.base(Api::RestCountries)),
            weather: WeatherService::new(
                client,
                endpoints.base(Api::Weatherstack),
                config.weather_access_key().map(str::to_string),
                cache,
            ),
        }
    }
}
