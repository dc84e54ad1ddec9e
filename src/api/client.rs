// HTTP client for the upstream REST APIs.
// Normalizes method, headers, and JSON parsing; non-2xx and bad JSON become errors.

use std::time::Duration;

use reqwest::{
    Client, Method, Url,
    header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::error::{PanoramaError, Result};

const USER_AGENT_VALUE: &str = concat!("panorama/", env!("CARGO_PKG_VERSION"));
const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Query parameters whose values never reach the log.
const SECRET_PARAMS: &[&str] = &["access_key"];

/// Normalized result of a successful request.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Parsed body, `None` when the body was empty.
    pub data: Option<Value>,
    pub status: u16,
    pub ok: bool,
}

impl HttpResponse {
    /// Decode the body into a typed schema.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        let status = self.status;
        let data = self
            .data
            .ok_or_else(|| PanoramaError::Schema(format!("empty response body (HTTP {})", status)))?;
        serde_json::from_value(data).map_err(|e| PanoramaError::Schema(e.to_string()))
    }
}

/// Thin wrapper over a shared `reqwest::Client`. One attempt per call.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Create a client with JSON defaults and the given connect timeout.
    pub fn new(connect_timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = Client::builder()
            .default_headers(headers)
            .connect_timeout(connect_timeout)
            .build()
            .map_err(PanoramaError::Transport)?;

        Ok(Self { client })
    }

    /// Perform a request and normalize the response.
    pub async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<HttpResponse> {
        debug!(%method, url = %redact_url(url), "HTTP request");

        let mut builder = self.client.request(method.clone(), url);
        if method != Method::GET && method != Method::HEAD {
            builder = builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE);
            if let Some(body) = body {
                builder = builder.body(serde_json::to_vec(body)?);
            }
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(PanoramaError::Status {
                status: status.as_u16(),
                reason: status
                    .canonical_reason()
                    .unwrap_or("Unknown Status")
                    .to_string(),
            });
        }

        let text = response.text().await?;
        let data = parse_body(&text)?;

        Ok(HttpResponse {
            data,
            status: status.as_u16(),
            ok: true,
        })
    }

    pub async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.request(Method::GET, url, None).await
    }

    pub async fn post(&self, url: &str, body: &Value) -> Result<HttpResponse> {
        self.request(Method::POST, url, Some(body)).await
    }

    pub async fn put(&self, url: &str, body: &Value) -> Result<HttpResponse> {
        self.request(Method::PUT, url, Some(body)).await
    }

    pub async fn delete(&self, url: &str) -> Result<HttpResponse> {
        self.request(Method::DELETE, url, None).await
    }
}

/// Parse a response body; empty means no data, anything else must be JSON.
fn parse_body(text: &str) -> Result<Option<Value>> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text)
        .map(Some)
        .map_err(PanoramaError::MalformedBody)
}

/// Mask secret query parameters for logging.
fn redact_url(url: &str) -> String {
    let Ok(mut parsed) = Url::parse(url) else {
        return url.to_string();
    };

    let pairs: Vec<(String, String)> = parsed
        .query_pairs()
        .map(|(k, v)| {
            if SECRET_PARAMS.contains(&k.as_ref()) {
                (k.into_owned(), "***".to_string())
            } else {
                (k.into_owned(), v.into_owned())
            }
        })
        .collect();

    if pairs.is_empty() {
        return parsed.to_string();
    }

    parsed.query_pairs_mut().clear().extend_pairs(pairs);
    parsed.to_string()
}
