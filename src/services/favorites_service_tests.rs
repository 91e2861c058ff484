// src/services/favorites_service_tests.rs
//
// Favorites subsystem tests
//
// INVARIANTS TESTED:
// - Toggling twice restores the original flag; setting true twice keeps it
// - The favorites view is exactly the favorite subset, year descending
// - A mutation refreshes the paged view and selection, not search results

#[cfg(test)]
mod favorites_tests {
    use std::sync::Arc;

    use crate::db::{create_test_pool, initialize_database};
    use crate::domain::movie::Movie;
    use crate::integrations::catalog_api::MockCatalogSource;
    use crate::repositories::{
        MovieRepository, SqliteGenreRepository, SqliteMovieRepository, SqlitePreferencesRepository,
    };
    use crate::services::{CatalogService, FavoritesService, PagingService};

    struct Fixture {
        catalog: Arc<CatalogService>,
        pager: Arc<PagingService>,
        favorites: FavoritesService,
    }

    /// Full stack over an in-memory store seeded with `count` movies, years
    /// descending from 3000 so paged order equals id order.
    fn fixture(count: i64) -> Fixture {
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
                genres: vec!["Action".to_string()],
                is_favorite: false,
            })
            .collect();
        movie_repo.insert_all(&movies).unwrap();

        let catalog = Arc::new(CatalogService::new(
            movie_repo,
            genre_repo,
            preferences_repo,
            Arc::new(MockCatalogSource::new()),
        ));
        let pager = Arc::new(PagingService::with_page_size(catalog.clone(), 4));
        let favorites = FavoritesService::new(catalog.clone(), pager.clone());

        Fixture {
            catalog,
            pager,
            favorites,
        }
    }

    #[test]
    fn test_toggle_twice_restores_original_flag() {
        let fx = fixture(3);

        let refresh = fx.favorites.toggle(1).unwrap();
        assert_eq!(refresh.favorites.len(), 1);
        assert!(fx.catalog.movie_by_id(1).unwrap().unwrap().is_favorite);

        let refresh = fx.favorites.toggle(1).unwrap();
        assert!(refresh.favorites.is_empty());
        assert!(!fx.catalog.movie_by_id(1).unwrap().unwrap().is_favorite);
    }

    #[test]
    fn test_set_true_twice_stays_true() {
        let fx = fixture(3);

        fx.favorites.set(1, true).unwrap();
        let refresh = fx.favorites.set(1, true).unwrap();

        assert_eq!(refresh.favorites.len(), 1);
        assert!(refresh.favorites[0].is_favorite);
    }

    #[test]
    fn test_favorites_view_is_exact_subset_year_descending() {
        let fx = fixture(5);

        // Ids 1..5 have years 3000..2996; favorite the middle and the oldest.
        fx.favorites.set(3, true).unwrap();
        fx.favorites.set(5, true).unwrap();

        let favorites = fx.favorites.load_favorites().unwrap();
        let ids: Vec<i64> = favorites.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 5]);

        // Toggling one off is reflected on the next load.
        fx.favorites.toggle(3).unwrap();
        let ids: Vec<i64> = fx
            .favorites
            .load_favorites()
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, vec![5]);
    }

    #[test]
    fn test_mutation_refreshes_paged_view_and_selection() {
        let fx = fixture(6);
        fx.pager.load_initial().unwrap();
        fx.pager.select_movie(2).unwrap();

        let refresh = fx.favorites.toggle(2).unwrap();

        assert_eq!(refresh.paged.len(), 4);
        assert!(refresh.paged[1].is_favorite, "displayed flag is current");
        assert!(refresh.selected.unwrap().is_favorite);
        assert_eq!(refresh.favorites.len(), 1);

        // The observable views agree with the returned snapshots.
        assert!(fx.pager.paged_movies().borrow()[1].is_favorite);
        assert_eq!(fx.favorites.favorites().borrow().len(), 1);
    }

    #[test]
    fn test_mutation_leaves_search_results_stale() {
        let fx = fixture(4);
        fx.pager.load_initial().unwrap();
        fx.pager.search("Movie 1").unwrap();

        fx.favorites.toggle(1).unwrap();

        // The search snapshot still carries the pre-mutation flag.
        let stale = fx.pager.search_results().borrow().clone();
        assert_eq!(stale.len(), 1);
        assert!(!stale[0].is_favorite);

        // Re-running the search picks up the new flag.
        let fresh = fx.pager.search("Movie 1").unwrap();
        assert!(fresh[0].is_favorite);
    }

    #[test]
    fn test_mutating_missing_id_is_silent_noop() {
        let fx = fixture(2);
        fx.pager.load_initial().unwrap();

        let refresh = fx.favorites.toggle(999).unwrap();
        assert!(refresh.favorites.is_empty());
        assert_eq!(refresh.paged.len(), 2);
        assert!(refresh.paged.iter().all(|m| !m.is_favorite));
    }
}
