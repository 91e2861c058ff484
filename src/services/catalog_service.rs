// src/services/catalog_service.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::domain::movie::{Catalog, CatalogOrigin, Genre, Movie};
use crate::error::AppResult;
use crate::integrations::catalog_api::CatalogSource;
use crate::repositories::{
    GenreRepository, MovieRepository, PreferencesRepository, KEY_LAST_REFRESH,
};

/// Reconciles the remote catalog with the local store.
///
/// The refresh policy is remote-first: a successful fetch replaces the cached
/// movie set wholesale, while any remote failure falls back to whatever the
/// store holds, favorite flags intact. Every other operation is a straight
/// pass-through to the store with domain mapping.
pub struct CatalogService {
    movie_repo: Arc<dyn MovieRepository>,
    genre_repo: Arc<dyn GenreRepository>,
    preferences_repo: Arc<dyn PreferencesRepository>,
    remote: Arc<dyn CatalogSource>,
}

impl CatalogService {
    pub fn new(
        movie_repo: Arc<dyn MovieRepository>,
        genre_repo: Arc<dyn GenreRepository>,
        preferences_repo: Arc<dyn PreferencesRepository>,
        remote: Arc<dyn CatalogSource>,
    ) -> Self {
        Self {
            movie_repo,
            genre_repo,
            preferences_repo,
            remote,
        }
    }

    /// Fetch the catalog, replacing the local cache on success and serving
    /// cached data on any remote failure.
    ///
    /// The clear+insert sequence is deliberately not one transaction: a crash
    /// between the two statements leaves an empty store, and the only
    /// recovery path is the next refresh.
    pub async fn refresh_catalog(&self) -> AppResult<Catalog> {
        match self.remote.fetch_catalog().await {
            Ok(remote) => {
                let genres = remote.genres;
                let movies: Vec<Movie> =
                    remote.movies.into_iter().map(|m| m.into_movie()).collect();

                self.movie_repo.clear()?;
                self.movie_repo.insert_all(&movies)?;
                for name in &genres {
                    self.genre_repo.upsert(name)?;
                }
                self.stamp_refresh()?;

                info!(
                    "catalog refreshed from remote: {} movies, {} genres",
                    movies.len(),
                    genres.len()
                );

                Ok(Catalog {
                    genres,
                    movies,
                    origin: CatalogOrigin::Remote,
                })
            }
            Err(err) => {
                warn!("remote catalog fetch failed, serving cached data: {}", err);
                self.cached_catalog()
            }
        }
    }

    /// Synthesize a catalog from the local store alone. The genre list is
    /// derived from the cached movies, not the genre table.
    pub fn cached_catalog(&self) -> AppResult<Catalog> {
        let movies = self.movie_repo.list_all()?;
        Ok(Catalog::from_cached(movies))
    }

    /// Substring match against title, plot, actors and director; a movie
    /// matching any one field is returned.
    pub fn search_movies(&self, query: &str) -> AppResult<Vec<Movie>> {
        self.movie_repo.search(query)
    }

    pub fn all_genres(&self) -> AppResult<Vec<Genre>> {
        self.genre_repo.list_all()
    }

    /// One limit/offset window of the year-descending movie sequence.
    pub fn movies_paged(&self, limit: u32, offset: u32) -> AppResult<Vec<Movie>> {
        self.movie_repo.list_paged(limit, offset)
    }

    /// `None` for ids the store does not know; stale ids are a normal outcome.
    pub fn movie_by_id(&self, id: i64) -> AppResult<Option<Movie>> {
        self.movie_repo.get_by_id(id)
    }

    /// Flips the favorite flag; silently a no-op for missing ids.
    pub fn toggle_favorite(&self, id: i64) -> AppResult<()> {
        self.movie_repo.toggle_favorite(id)
    }

    pub fn set_favorite(&self, id: i64, value: bool) -> AppResult<()> {
        self.movie_repo.set_favorite(id, value)
    }

    pub fn favorite_movies(&self) -> AppResult<Vec<Movie>> {
        self.movie_repo.list_favorites()
    }

    /// When the last successful remote refresh happened, if ever. The
    /// fallback path never moves this stamp, so consumers can tell how stale
    /// cached data is.
    pub fn last_refreshed(&self) -> AppResult<Option<DateTime<Utc>>> {
        match self.preferences_repo.get(KEY_LAST_REFRESH)? {
            Some(raw) => {
                let stamp = DateTime::parse_from_rfc3339(&raw)?;
                Ok(Some(stamp.with_timezone(&Utc)))
            }
            None => Ok(None),
        }
    }

    fn stamp_refresh(&self) -> AppResult<()> {
        self.preferences_repo
            .set(KEY_LAST_REFRESH, &Utc::now().to_rfc3339())
    }
}
