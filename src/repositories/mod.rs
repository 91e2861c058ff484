// src/repositories/mod.rs
//
// Repository layer
//
// CRITICAL RULES:
// - Repositories are DUMB data mappers
// - NO business logic
// - NO invariant enforcement
// - NO cross-repository calls
// - Explicit SQL only

pub mod genre_repository;
pub mod movie_repository;
pub mod preferences_repository;

pub use genre_repository::{GenreRepository, SqliteGenreRepository};
pub use movie_repository::{MovieRepository, SqliteMovieRepository};
pub use preferences_repository::{
    LayoutMode, PreferencesRepository, SqlitePreferencesRepository, KEY_DARK_THEME,
    KEY_LAST_REFRESH, KEY_LAYOUT_MODE,
};
