// src/services/paging_service.rs
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use log::debug;
use tokio::sync::watch;

use crate::domain::movie::Movie;
use crate::error::AppResult;
use crate::services::catalog_service::CatalogService;

/// Window size for every paged fetch.
pub const PAGE_SIZE: u32 = 20;

/// Outcome of a [`PagingService::load_more`] attempt, returned as an explicit
/// value so callers can compose follow-up work instead of inferring it from
/// side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLoad {
    /// A window was appended; carries the full accumulated snapshot.
    Appended(Vec<Movie>),
    /// The store had no movies past the current window.
    EndReached,
    /// Another load is in flight; nothing was fetched.
    AlreadyLoading,
    /// A `load_initial` superseded this load; the fetched window was
    /// discarded.
    Superseded,
}

struct PageCursor {
    current_page: u32,
    end_reached: bool,
}

/// Serves paged windows, substring search and the genre-filtered view over
/// the cached catalog.
///
/// The paged list, search results and selection are published through
/// last-value-wins `watch` channels; every transition also returns the new
/// snapshot directly. Search results are a parallel sequence, independent of
/// the paged list: consumers display them while a query is active and the
/// paged list otherwise.
pub struct PagingService {
    catalog: Arc<CatalogService>,
    page_size: u32,
    cursor: Mutex<PageCursor>,
    loading_more: AtomicBool,
    generation: AtomicU64,
    active_query: Mutex<String>,
    genre_filter: Mutex<Option<String>>,
    paged_tx: watch::Sender<Vec<Movie>>,
    search_tx: watch::Sender<Vec<Movie>>,
    selected_tx: watch::Sender<Option<Movie>>,
}

impl PagingService {
    pub fn new(catalog: Arc<CatalogService>) -> Self {
        Self::with_page_size(catalog, PAGE_SIZE)
    }

    /// Page size override for callers with different window needs.
    pub fn with_page_size(catalog: Arc<CatalogService>, page_size: u32) -> Self {
        let (paged_tx, _) = watch::channel(Vec::new());
        let (search_tx, _) = watch::channel(Vec::new());
        let (selected_tx, _) = watch::channel(None);

        Self {
            catalog,
            page_size,
            cursor: Mutex::new(PageCursor {
                current_page: 0,
                end_reached: false,
            }),
            loading_more: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            active_query: Mutex::new(String::new()),
            genre_filter: Mutex::new(None),
            paged_tx,
            search_tx,
            selected_tx,
        }
    }

    /// Reset to page zero and REPLACE the paged snapshot with the first
    /// window. Any `load_more` still in flight is superseded.
    pub fn load_initial(&self) -> AppResult<Vec<Movie>> {
        self.generation.fetch_add(1, Ordering::SeqCst);
        {
            let mut cursor = self.cursor.lock().unwrap();
            cursor.current_page = 0;
            cursor.end_reached = false;
        }

        let movies = self.catalog.movies_paged(self.page_size, 0)?;
        self.paged_tx.send_replace(movies.clone());
        Ok(movies)
    }

    /// Fetch the next window and append it.
    ///
    /// The in-flight guard is the sole concurrency control between
    /// overlapping `load_more` calls: a second caller gets
    /// [`PageLoad::AlreadyLoading`] without touching the store.
    pub fn load_more(&self) -> AppResult<PageLoad> {
        if self.cursor.lock().unwrap().end_reached {
            return Ok(PageLoad::EndReached);
        }

        let generation = self.generation.load(Ordering::SeqCst);

        if self
            .loading_more
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Ok(PageLoad::AlreadyLoading);
        }

        let result = self.load_next_window(generation);
        self.loading_more.store(false, Ordering::SeqCst);
        result
    }

    fn load_next_window(&self, generation: u64) -> AppResult<PageLoad> {
        let current_page = self.cursor.lock().unwrap().current_page;
        let next_offset = (current_page + 1) * self.page_size;

        let window = self.catalog.movies_paged(self.page_size, next_offset)?;

        // A load_initial that ran while we were fetching owns the snapshot
        // now; this window belongs to the previous sequence.
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("discarding superseded page load at offset {}", next_offset);
            return Ok(PageLoad::Superseded);
        }

        if window.is_empty() {
            self.cursor.lock().unwrap().end_reached = true;
            return Ok(PageLoad::EndReached);
        }

        self.cursor.lock().unwrap().current_page += 1;

        let mut snapshot = self.paged_tx.borrow().clone();
        snapshot.extend(window);
        self.paged_tx.send_replace(snapshot.clone());
        Ok(PageLoad::Appended(snapshot))
    }

    /// Replace the search results with the full match set, or clear them when
    /// the query is blank.
    pub fn search(&self, query: &str) -> AppResult<Vec<Movie>> {
        *self.active_query.lock().unwrap() = query.to_string();

        let results = if query.trim().is_empty() {
            Vec::new()
        } else {
            self.catalog.search_movies(query)?
        };

        self.search_tx.send_replace(results.clone());
        Ok(results)
    }

    pub fn set_genre_filter(&self, genre: Option<String>) {
        *self.genre_filter.lock().unwrap() = genre;
    }

    pub fn genre_filter(&self) -> Option<String> {
        self.genre_filter.lock().unwrap().clone()
    }

    /// The list a consumer should display right now: search results while a
    /// query is active, the paged list otherwise, with the genre filter
    /// applied client-side over whichever is chosen.
    pub fn visible_movies(&self) -> Vec<Movie> {
        let query_active = !self.active_query.lock().unwrap().trim().is_empty();
        let base = if query_active {
            self.search_tx.borrow().clone()
        } else {
            self.paged_tx.borrow().clone()
        };

        match self.genre_filter.lock().unwrap().as_deref() {
            Some(genre) => base.into_iter().filter(|m| m.has_genre(genre)).collect(),
            None => base,
        }
    }

    /// Resolve a movie from the paged snapshot first, then the store, and
    /// publish it as the current selection. `None` for stale ids.
    pub fn select_movie(&self, id: i64) -> AppResult<Option<Movie>> {
        let cached = self.paged_tx.borrow().iter().find(|m| m.id == id).cloned();
        let movie = match cached {
            Some(movie) => Some(movie),
            None => self.catalog.movie_by_id(id)?,
        };

        self.selected_tx.send_replace(movie.clone());
        Ok(movie)
    }

    /// Re-read the displayed movies after a store mutation so favorite flags
    /// are current: the same ids when anything is displayed, the current
    /// offset window otherwise. The selection is re-fetched when it is the
    /// mutated movie. Returns the refreshed paged snapshot and selection.
    pub fn refresh_after_mutation(&self, id: i64) -> AppResult<(Vec<Movie>, Option<Movie>)> {
        let current_ids: Vec<i64> = self.paged_tx.borrow().iter().map(|m| m.id).collect();

        let refreshed = if current_ids.is_empty() {
            let offset = self.cursor.lock().unwrap().current_page * self.page_size;
            self.catalog.movies_paged(self.page_size, offset)?
        } else {
            let mut movies = Vec::with_capacity(current_ids.len());
            for movie_id in current_ids {
                if let Some(movie) = self.catalog.movie_by_id(movie_id)? {
                    movies.push(movie);
                }
            }
            movies
        };
        self.paged_tx.send_replace(refreshed.clone());

        let selected = match self.selected_tx.borrow().clone() {
            Some(previous) if previous.id == id => self.catalog.movie_by_id(id)?,
            other => other,
        };
        self.selected_tx.send_replace(selected.clone());

        Ok((refreshed, selected))
    }

    /// Observe the accumulated paged list.
    pub fn paged_movies(&self) -> watch::Receiver<Vec<Movie>> {
        self.paged_tx.subscribe()
    }

    /// Observe the search results.
    pub fn search_results(&self) -> watch::Receiver<Vec<Movie>> {
        self.search_tx.subscribe()
    }

    /// Observe the current selection.
    pub fn selected_movie(&self) -> watch::Receiver<Option<Movie>> {
        self.selected_tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, initialize_database};
    use crate::integrations::catalog_api::MockCatalogSource;
    use crate::repositories::{
        MovieRepository, SqliteGenreRepository, SqliteMovieRepository, SqlitePreferencesRepository,
    };

    /// Catalog service over an in-memory store seeded with `count` movies,
    /// years descending from 3000 so insertion order equals paged order.
    fn seeded_service(count: i64) -> (Arc<CatalogService>, Arc<SqliteMovieRepository>) {
        let pool = Arc::new(create_test_pool().unwrap());
        initialize_database(&pool.get().unwrap()).unwrap();

        let movie_repo = Arc::new(SqliteMovieRepository::new(pool.clone()));
        let genre_repo = Arc::new(SqliteGenreRepository::new(pool.clone()));
        let preferences_repo = Arc::new(SqlitePreferencesRepository::new(pool));

        let movies: Vec<Movie> = (0..count)
            .map(|i| Movie {
                id: i + 1,
                title: format!("Movie {}", i + 1),
                plot: String::new(),
                poster_url: String::new(),
                runtime: "90".to_string(),
                year: (3000 - i).to_string(),
                director: String::new(),
                actors: String::new(),
                genres: if i % 2 == 0 {
                    vec!["Action".to_string()]
                } else {
                    vec!["Drama".to_string()]
                },
                is_favorite: false,
            })
            .collect();
        movie_repo.insert_all(&movies).unwrap();

        let service = Arc::new(CatalogService::new(
            movie_repo.clone(),
            genre_repo,
            preferences_repo,
            Arc::new(MockCatalogSource::new()),
        ));
        (service, movie_repo)
    }

    fn pager(count: i64, page_size: u32) -> PagingService {
        let (service, _) = seeded_service(count);
        PagingService::with_page_size(service, page_size)
    }

    #[test]
    fn test_load_initial_replaces_snapshot() {
        let svc = pager(10, 4);

        svc.load_initial().unwrap();
        svc.load_more().unwrap();
        assert_eq!(svc.paged_movies().borrow().len(), 8);

        // A fresh initial load replaces, not appends.
        let movies = svc.load_initial().unwrap();
        assert_eq!(movies.len(), 4);
        assert_eq!(svc.paged_movies().borrow().len(), 4);
        assert_eq!(movies[0].id, 1);
    }

    #[test]
    fn test_pagination_terminates_exactly() {
        // 10 movies, window of 4: loads of 4, 4, 2, then end.
        let svc = pager(10, 4);

        let first = svc.load_initial().unwrap();
        assert_eq!(first.len(), 4);

        let mut appended_windows = 0;
        loop {
            match svc.load_more().unwrap() {
                PageLoad::Appended(_) => appended_windows += 1,
                PageLoad::EndReached => break,
                other => panic!("unexpected load outcome: {:?}", other),
            }
        }

        // ceil(10 / 4) = 3 total page loads, one of them the initial load.
        assert_eq!(appended_windows, 2);

        let snapshot = svc.paged_movies().borrow().clone();
        assert_eq!(snapshot.len(), 10);
        let mut ids: Vec<i64> = snapshot.iter().map(|m| m.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), 10, "no duplicate windows");

        // Once the end is reached, further calls are no-ops.
        assert_eq!(svc.load_more().unwrap(), PageLoad::EndReached);
    }

    #[test]
    fn test_page_count_divisible_by_window() {
        let svc = pager(8, 4);
        svc.load_initial().unwrap();

        assert!(matches!(svc.load_more().unwrap(), PageLoad::Appended(_)));
        assert_eq!(svc.load_more().unwrap(), PageLoad::EndReached);
        assert_eq!(svc.paged_movies().borrow().len(), 8);
    }

    #[test]
    fn test_load_more_guard_rejects_reentry() {
        let svc = pager(10, 4);
        svc.load_initial().unwrap();

        svc.loading_more.store(true, Ordering::SeqCst);
        assert_eq!(svc.load_more().unwrap(), PageLoad::AlreadyLoading);

        svc.loading_more.store(false, Ordering::SeqCst);
        assert!(matches!(svc.load_more().unwrap(), PageLoad::Appended(_)));
    }

    #[test]
    fn test_stale_generation_discards_window() {
        let svc = pager(10, 4);
        svc.load_initial().unwrap();

        // A window fetched under an older generation must not commit.
        let stale = svc.generation.load(Ordering::SeqCst) - 1;
        assert_eq!(svc.load_next_window(stale).unwrap(), PageLoad::Superseded);
        assert_eq!(svc.paged_movies().borrow().len(), 4);
        assert_eq!(svc.cursor.lock().unwrap().current_page, 0);
    }

    #[test]
    fn test_concurrent_load_more_yields_no_duplicates() {
        let (service, _) = seeded_service(30);
        let svc = Arc::new(PagingService::with_page_size(service, 4));
        svc.load_initial().unwrap();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let svc = svc.clone();
            handles.push(std::thread::spawn(move || loop {
                match svc.load_more().unwrap() {
                    PageLoad::EndReached => break,
                    _ => std::thread::yield_now(),
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = svc.paged_movies().borrow().clone();
        assert_eq!(snapshot.len(), 30);
        let mut ids: Vec<i64> = snapshot.iter().map(|m| m.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 30);
    }

    #[test]
    fn test_search_blank_clears_results() {
        let svc = pager(5, 4);

        svc.search("Movie").unwrap();
        assert_eq!(svc.search_results().borrow().len(), 5);

        let cleared = svc.search("   ").unwrap();
        assert!(cleared.is_empty());
        assert!(svc.search_results().borrow().is_empty());
    }

    #[test]
    fn test_genre_filter_over_active_list() {
        let svc = pager(6, 10);
        svc.load_initial().unwrap();

        svc.set_genre_filter(Some("Action".to_string()));
        let visible = svc.visible_movies();
        assert_eq!(visible.len(), 3);
        assert!(visible.iter().all(|m| m.has_genre("Action")));

        // With a query active, the filter applies to search results instead.
        svc.search("Movie 2").unwrap();
        svc.set_genre_filter(Some("Drama".to_string()));
        let visible = svc.visible_movies();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 2);

        svc.set_genre_filter(None);
        svc.search("").unwrap();
        assert_eq!(svc.visible_movies().len(), 6);
    }

    #[test]
    fn test_select_movie_falls_back_to_store() {
        let svc = pager(10, 4);
        svc.load_initial().unwrap();

        // In the paged snapshot.
        let selected = svc.select_movie(2).unwrap().unwrap();
        assert_eq!(selected.id, 2);

        // Beyond the loaded window, resolved from the store.
        let selected = svc.select_movie(9).unwrap().unwrap();
        assert_eq!(selected.id, 9);
        assert_eq!(svc.selected_movie().borrow().as_ref().unwrap().id, 9);

        // Stale id: absent, not an error.
        assert!(svc.select_movie(999).unwrap().is_none());
        assert!(svc.selected_movie().borrow().is_none());
    }

    #[test]
    fn test_refresh_after_mutation_rereads_displayed_ids() {
        let (service, movie_repo) = seeded_service(6);
        let svc = PagingService::with_page_size(service.clone(), 4);
        svc.load_initial().unwrap();
        svc.select_movie(1).unwrap();

        service.set_favorite(1, true).unwrap();
        let (paged, selected) = svc.refresh_after_mutation(1).unwrap();

        assert_eq!(paged.len(), 4);
        assert!(paged[0].is_favorite);
        assert!(selected.unwrap().is_favorite);

        // Rows deleted underneath the view drop out on refresh.
        movie_repo.clear().unwrap();
        let (paged, _) = svc.refresh_after_mutation(1).unwrap();
        assert!(paged.is_empty());
    }
}
