// Countries service.
// Bulk fetch from REST Countries, limited to the fields the view renders.

use reqwest::Url;

use crate::api::{Country, HttpClient, build_url};
use crate::error::{PanoramaError, Result};

/// Fields requested from `/all`; the endpoint refuses unbounded requests.
const COUNTRY_FIELDS: &str = "name,cca3,region,subregion,population,capital,flags";

#[derive(Debug, Clone)]
pub struct CountriesService {
    client: HttpClient,
    base: String,
}

impl CountriesService {
    pub fn new(client: HttpClient, base: impl Into<String>) -> Self {
        Self {
            client,
            base: base.into(),
        }
    }

    pub async fn all_countries(&self) -> Result<Vec<Country>> {
        let url = Url::parse_with_params(&build_url(&self.base, "/all"), [("fields", COUNTRY_FIELDS)])
            .map_err(|e| PanoramaError::Config(format!("invalid countries URL: {}", e)))?;
        let response = self.client.get(url.as_str()).await?;
        if response.data.is_none() {
            return Ok(Vec::new());
        }
        response.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockServer;
    use std::time::Duration;

    #[tokio::test]
    async fn test_all_countries_requests_fields() {
        let server = MockServer::start(vec![(
            200,
            r#"[{"name":{"common":"Peru","official":"Republic of Peru"},"cca3":"PER",
                "region":"Americas","subregion":"South America","population":32971846,
                "capital":["Lima"],"flags":{"png":"https://flagcdn.com/w320/pe.png","alt":""}}]"#
                .to_string(),
        )])
        .await;

        let service = CountriesService::new(HttpClient::new(Duration::from_secs(2)).unwrap(), &server.base_url);
        let countries = service.all_countries().await.unwrap();
        assert_eq!(countries[0].capital(), Some("Lima"));

        let requests = server.requests().await;
        assert!(requests[0].starts_with("GET /all?fields=name%2Ccca3%2Cregion"));
    }

    #[tokio::test]
    async fn test_empty_body_is_empty_list() {
        let server = MockServer::start(vec![(200, String::new())]).await;
        let service = CountriesService::new(HttpClient::new(Duration::from_secs(2)).unwrap(), &server.base_url);
        assert!(service.all_countries().await.unwrap().is_empty());
    }
}
