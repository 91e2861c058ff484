// src/services/favorites_service.rs
use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::movie::Movie;
use crate::error::AppResult;
use crate::services::catalog_service::CatalogService;
use crate::services::paging_service::PagingService;

/// Everything a favorite mutation refreshed, returned in one value so the
/// consumer can apply it without watching for side effects.
///
/// Search results are deliberately not part of this: they keep whatever
/// favorite flags they had until the next search.
#[derive(Debug, Clone)]
pub struct FavoriteRefresh {
    /// The re-read paged snapshot.
    pub paged: Vec<Movie>,
    /// The reloaded favorites view.
    pub favorites: Vec<Movie>,
    /// The current selection, re-fetched when it was the mutated movie.
    pub selected: Option<Movie>,
}

/// Toggles and queries the per-movie favorite flag, keeping the paged and
/// favorites views consistent after each mutation.
pub struct FavoritesService {
    catalog: Arc<CatalogService>,
    pager: Arc<PagingService>,
    favorites_tx: watch::Sender<Vec<Movie>>,
}

impl FavoritesService {
    pub fn new(catalog: Arc<CatalogService>, pager: Arc<PagingService>) -> Self {
        let (favorites_tx, _) = watch::channel(Vec::new());
        Self {
            catalog,
            pager,
            favorites_tx,
        }
    }

    /// Flip the flag and refresh the dependent views. A missing id mutates
    /// nothing but still re-reads the views.
    pub fn toggle(&self, id: i64) -> AppResult<FavoriteRefresh> {
        self.catalog.toggle_favorite(id)?;
        self.refresh_views(id)
    }

    pub fn set(&self, id: i64, value: bool) -> AppResult<FavoriteRefresh> {
        self.catalog.set_favorite(id, value)?;
        self.refresh_views(id)
    }

    /// Replace the favorites view with the current favorite set.
    pub fn load_favorites(&self) -> AppResult<Vec<Movie>> {
        let favorites = self.catalog.favorite_movies()?;
        self.favorites_tx.send_replace(favorites.clone());
        Ok(favorites)
    }

    /// Observe the favorites view.
    pub fn favorites(&self) -> watch::Receiver<Vec<Movie>> {
        self.favorites_tx.subscribe()
    }

    fn refresh_views(&self, id: i64) -> AppResult<FavoriteRefresh> {
        let (paged, selected) = self.pager.refresh_after_mutation(id)?;
        let favorites = self.load_favorites()?;
        Ok(FavoriteRefresh {
            paged,
            favorites,
            selected,
        })
    }
}
