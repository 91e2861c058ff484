use serde::{Deserialize, Serialize};

/// A single movie in the catalog.
///
/// `id` is assigned by the remote catalog and is the sole identity key; a
/// successful refresh replaces the whole local set keyed by it. `is_favorite`
/// is local-only state and never appears in the remote payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    pub plot: String,
    pub poster_url: String,

    /// String-encoded minutes, as delivered by the remote.
    pub runtime: String,

    /// Release year, kept as a string; ordering relies on the fixed
    /// four-digit form the catalog uses.
    pub year: String,

    pub director: String,
    pub actors: String,

    /// Ordered genre list as reported by the remote.
    pub genres: Vec<String>,

    pub is_favorite: bool,
}

impl Movie {
    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g == genre)
    }
}

/// A genre name from the catalog. The name is the primary key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
}

impl Genre {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
