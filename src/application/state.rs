// src/application/state.rs

use std::sync::Arc;

use crate::db::ConnectionPool;
use crate::domain::movie::{Catalog, CatalogOrigin, Genre, Movie};
use crate::error::AppResult;
use crate::integrations::catalog_api::CatalogSource;
use crate::repositories::{
    SqliteGenreRepository, SqliteMovieRepository, SqlitePreferencesRepository,
};
use crate::services::{CatalogService, FavoritesService, PagingService, PreferencesService};

/// Application state for a client shell.
/// All services are Arc-wrapped for thread-safe sharing.
pub struct AppState {
    pub catalog_service: Arc<CatalogService>,
    pub paging_service: Arc<PagingService>,
    pub favorites_service: Arc<FavoritesService>,
    pub preferences_service: Arc<PreferencesService>,
}

/// Everything the first screen needs, loaded in one pass.
#[derive(Debug, Clone)]
pub struct StartupSnapshot {
    pub catalog: Catalog,
    pub paged: Vec<Movie>,
    pub genres: Vec<Genre>,
    pub favorites: Vec<Movie>,
    /// Informational only: set when the remote failed AND the cache is empty,
    /// i.e. there is no data to show from anywhere.
    pub notice: Option<String>,
}

impl AppState {
    /// Wire repositories and services over a ready (migrated) pool.
    pub fn new(pool: Arc<ConnectionPool>, remote: Arc<dyn CatalogSource>) -> AppResult<Self> {
        let movie_repo = Arc::new(SqliteMovieRepository::new(pool.clone()));
        let genre_repo = Arc::new(SqliteGenreRepository::new(pool.clone()));
        let preferences_repo = Arc::new(SqlitePreferencesRepository::new(pool));

        let catalog_service = Arc::new(CatalogService::new(
            movie_repo,
            genre_repo,
            preferences_repo.clone(),
            remote,
        ));
        let paging_service = Arc::new(PagingService::new(catalog_service.clone()));
        let favorites_service = Arc::new(FavoritesService::new(
            catalog_service.clone(),
            paging_service.clone(),
        ));
        let preferences_service = Arc::new(PreferencesService::new(preferences_repo)?);

        Ok(Self {
            catalog_service,
            paging_service,
            favorites_service,
            preferences_service,
        })
    }

    /// The first load of a client screen: refresh the catalog (falling back
    /// to cache when offline), list genres, load the first page and the
    /// favorites view.
    pub async fn startup(&self) -> AppResult<StartupSnapshot> {
        let catalog = self.catalog_service.refresh_catalog().await?;

        let notice = if catalog.origin == CatalogOrigin::Cache && catalog.is_empty() {
            Some("Could not reach the catalog and no cached data is available".to_string())
        } else {
            None
        };

        let genres = self.catalog_service.all_genres()?;
        let paged = self.paging_service.load_initial()?;
        let favorites = self.favorites_service.load_favorites()?;

        Ok(StartupSnapshot {
            catalog,
            paged,
            genres,
            favorites,
            notice,
        })
    }
}
