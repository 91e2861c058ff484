// src/integrations/catalog_api/client.rs
//
// Remote movie catalog endpoint
//
// ARCHITECTURE:
// - Plain HTTP client for the hosted catalog JSON document
// - Maps external data → internal DTOs (NO domain mutation)
// - Used by CatalogService
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Never creates or modifies domain entities directly
// - Returns DTOs that services can map
// - Connection errors, bad statuses and malformed payloads are all
//   surfaced as the same error kind; callers must not branch on them

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::domain::movie::Movie;
use crate::error::{AppError, AppResult};

pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/erik-sytnyk/movies-list/master/";

const CATALOG_RESOURCE: &str = "db.json";

/// A movie as the remote catalog reports it. There is no favorite flag on
/// the wire; that state exists only locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteMovie {
    pub id: i64,
    pub title: String,
    pub year: String,
    pub runtime: String,
    pub genres: Vec<String>,
    pub director: String,
    pub actors: String,
    pub plot: String,
    #[serde(rename = "posterUrl")]
    pub poster_url: String,
}

/// The full catalog document: `{ "genres": [...], "movies": [...] }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteCatalog {
    pub genres: Vec<String>,
    pub movies: Vec<RemoteMovie>,
}

impl RemoteMovie {
    /// Merge into the domain form. The favorite flag defaults to false here,
    /// at the one place remote data crosses into the domain.
    pub fn into_movie(self) -> Movie {
        Movie {
            id: self.id,
            title: self.title,
            plot: self.plot,
            poster_url: self.poster_url,
            runtime: self.runtime,
            year: self.year,
            director: self.director,
            actors: self.actors,
            genres: self.genres,
            is_favorite: false,
        }
    }
}

/// The remote source boundary: one fetch-all operation.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch_catalog(&self) -> AppResult<RemoteCatalog>;
}

/// HTTP implementation of [`CatalogSource`].
pub struct HttpCatalogSource {
    base_url: String,
    http_client: Client,
}

impl HttpCatalogSource {
    /// Create a client against the default catalog URL.
    pub fn new() -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            http_client,
        }
    }

    /// Create a client against a custom base URL (tests, mirrors).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut client = Self::new();
        client.base_url = base_url.into();
        client
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch_catalog(&self) -> AppResult<RemoteCatalog> {
        let url = format!("{}{}", self.base_url, CATALOG_RESOURCE);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Remote(format!("Catalog request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Remote(format!(
                "Catalog endpoint returned status: {}",
                response.status()
            )));
        }

        let catalog: RemoteCatalog = response
            .json()
            .await
            .map_err(|e| AppError::Remote(format!("Failed to parse catalog payload: {}", e)))?;

        Ok(catalog)
    }
}

impl Default for HttpCatalogSource {
    fn default() -> Self {
        Self::new()
    }
}
