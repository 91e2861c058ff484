use std::collections::HashSet;

use super::entity::Movie;

/// Where a [`Catalog`] came from. Remote payloads carry no favorite
/// information; cached ones preserve the locally stored flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogOrigin {
    Remote,
    Cache,
}

/// A full movie+genre dataset for one fetch, either straight from the remote
/// endpoint or synthesized from the local store.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub genres: Vec<String>,
    pub movies: Vec<Movie>,
    pub origin: CatalogOrigin,
}

impl Catalog {
    /// Synthesize a catalog from cached movies. The genre list is derived
    /// from the movies themselves, not the persisted genre table, so it may
    /// differ from what `GenreRepository::list_all` reports.
    pub fn from_cached(movies: Vec<Movie>) -> Self {
        let genres = derive_genres(&movies);
        Self {
            genres,
            movies,
            origin: CatalogOrigin::Cache,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

/// Flatten the movies' genre lists into one deduplicated sequence,
/// preserving first-seen order.
pub fn derive_genres(movies: &[Movie]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut genres = Vec::new();
    for movie in movies {
        for genre in &movie.genres {
            if seen.insert(genre.clone()) {
                genres.push(genre.clone());
            }
        }
    }
    genres
}
