// Upstream API module.
// Provides the HTTP client, endpoint registry, and response schemas.

pub mod client;
pub mod endpoints;
#[cfg(test)]
pub mod mock;
pub mod types;

pub use client::{HttpClient, HttpResponse};
pub use endpoints::{Api, Endpoints, build_url};
pub use types::*;
