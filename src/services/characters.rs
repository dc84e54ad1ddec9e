// Characters service.
// Paginated, filtered listing against the Rick and Morty character resource.

use reqwest::Url;
use tracing::debug;

use crate::api::{CharacterPage, HttpClient, build_url};
use crate::error::{PanoramaError, Result};

/// Life status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterStatus {
    Alive,
    Dead,
    Unknown,
}

impl CharacterStatus {
    pub fn as_param(&self) -> &'static str {
        match self {
            CharacterStatus::Alive => "alive",
            CharacterStatus::Dead => "dead",
            CharacterStatus::Unknown => "unknown",
        }
    }

    /// Next filter in the cycle any → alive → dead → unknown → any.
    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(CharacterStatus::Alive),
            Some(CharacterStatus::Alive) => Some(CharacterStatus::Dead),
            Some(CharacterStatus::Dead) => Some(CharacterStatus::Unknown),
            Some(CharacterStatus::Unknown) => None,
        }
    }
}

/// Gender filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterGender {
    Female,
    Male,
    Genderless,
    Unknown,
}

impl CharacterGender {
    pub fn as_param(&self) -> &'static str {
        match self {
            CharacterGender::Female => "female",
            CharacterGender::Male => "male",
            CharacterGender::Genderless => "genderless",
            CharacterGender::Unknown => "unknown",
        }
    }

    pub fn cycle(current: Option<Self>) -> Option<Self> {
        match current {
            None => Some(CharacterGender::Female),
            Some(CharacterGender::Female) => Some(CharacterGender::Male),
            Some(CharacterGender::Male) => Some(CharacterGender::Genderless),
            Some(CharacterGender::Genderless) => Some(CharacterGender::Unknown),
            Some(CharacterGender::Unknown) => None,
        }
    }
}

/// Server-side filters and page for a character listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterQuery {
    pub page: u32,
    pub name: Option<String>,
    pub status: Option<CharacterStatus>,
    pub species: Option<String>,
    pub gender: Option<CharacterGender>,
}

impl Default for CharacterQuery {
    fn default() -> Self {
        Self {
            page: 1,
            name: None,
            status: None,
            species: None,
            gender: None,
        }
    }
}

impl CharacterQuery {
    /// Query parameters; blank text filters are omitted.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.max(1).to_string())];

        if let Some(name) = non_blank(&self.name) {
            params.push(("name", name));
        }
        if let Some(status) = self.status {
            params.push(("status", status.as_param().to_string()));
        }
        if let Some(species) = non_blank(&self.species) {
            params.push(("species", species));
        }
        if let Some(gender) = self.gender {
            params.push(("gender", gender.as_param().to_string()));
        }
        params
    }

    /// Whether any filter beyond the page number is active.
    pub fn is_filtered(&self) -> bool {
        self.params().len() > 1
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Clone)]
pub struct CharactersService {
    client: HttpClient,
    base: String,
}

impl CharactersService {
    pub fn new(client: HttpClient, base: impl Into<String>) -> Self {
        Self {
            client,
            base: base.into(),
        }
    }

    /// One page of characters. The API answers 404 when nothing matches; that
    /// surfaces as a status error like any other.
    pub async fn list_characters(&self, query: &CharacterQuery) -> Result<CharacterPage> {
        let url = Url::parse_with_params(&build_url(&self.base, "/character"), query.params())
            .map_err(|e| PanoramaError::Config(format!("invalid characters URL: {}", e)))?;

        debug!(?query, "listing characters");
        self.client.get(url.as_str()).await?.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockServer;
    use std::time::Duration;

    fn service(base: &str) -> CharactersService {
        CharactersService::new(HttpClient::new(Duration::from_secs(2)).unwrap(), base)
    }

    #[test]
    fn test_params_skip_blank_filters() {
        let query = CharacterQuery {
            page: 2,
            name: Some("  rick ".to_string()),
            status: Some(CharacterStatus::Alive),
            species: Some("   ".to_string()),
            gender: None,
        };
        assert_eq!(
            query.params(),
            vec![
                ("page", "2".to_string()),
                ("name", "rick".to_string()),
                ("status", "alive".to_string()),
            ]
        );
        assert!(query.is_filtered());
        assert!(!CharacterQuery::default().is_filtered());
    }

    #[test]
    fn test_page_zero_becomes_one() {
        let query = CharacterQuery {
            page: 0,
            ..CharacterQuery::default()
        };
        assert_eq!(query.params(), vec![("page", "1".to_string())]);
    }

    #[test]
    fn test_filter_cycles_return_to_any() {
        let mut status = None;
        for _ in 0..4 {
            status = CharacterStatus::cycle(status);
        }
        assert_eq!(status, None);

        let mut gender = None;
        for _ in 0..5 {
            gender = CharacterGender::cycle(gender);
        }
        assert_eq!(gender, None);
    }

    #[tokio::test]
    async fn test_list_characters_sends_filters() {
        let server = MockServer::start(vec![(
            200,
            r#"{"info":{"count":1,"pages":1,"next":null,"prev":null},"results":[
                {"id":1,"name":"Rick Sanchez","status":"Alive","species":"Human","type":"","gender":"Male"}
            ]}"#
            .to_string(),
        )])
        .await;

        let query = CharacterQuery {
            name: Some("rick".to_string()),
            gender: Some(CharacterGender::Male),
            ..CharacterQuery::default()
        };
        let page = service(&server.base_url).list_characters(&query).await.unwrap();
        assert_eq!(page.results.len(), 1);

        let requests = server.requests().await;
        assert!(requests[0].starts_with("GET /character?page=1&name=rick&gender=male "));
    }

    #[tokio::test]
    async fn test_no_match_404_is_an_error() {
        let server = MockServer::start(vec![(404, r#"{"error":"There is nothing here"}"#.to_string())]).await;
        let err = service(&server.base_url)
            .list_characters(&CharacterQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert!(err.to_string().contains("404"));
    }

    #[tokio::test]
    async fn test_server_error_propagates() {
        let server = MockServer::start(vec![(500, String::new())]).await;
        let err = service(&server.base_url)
            .list_characters(&CharacterQuery::default())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
}
