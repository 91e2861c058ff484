// src/lib.rs
// MovieHub - offline-first movie catalog core
//
// Architecture:
// - Remote-first: a successful fetch replaces the local cache wholesale
// - Offline fallback: any remote failure serves cached data instead
// - Explicit: view refreshes are return values, not hidden side effects
// - Local-only favorites: the remote payload never carries them

// ============================================================================
// FOUNDATION
// ============================================================================

pub mod db;
pub mod domain;
pub mod error;
pub mod integrations;
pub mod repositories;
pub mod services;

// ============================================================================
// APPLICATION LAYER
// ============================================================================

pub mod application;

// ============================================================================
// PUBLIC API - Domain Entities
// ============================================================================

pub use domain::{derive_genres, Catalog, CatalogOrigin, Genre, Movie};

// ============================================================================
// PUBLIC API - Error Types
// ============================================================================

pub use error::{AppError, AppResult};

// ============================================================================
// PUBLIC API - Database
// ============================================================================

pub use db::{create_connection_pool, initialize_database, ConnectionPool};

// ============================================================================
// PUBLIC API - Repositories
// ============================================================================

pub use repositories::{
    GenreRepository,
    LayoutMode,
    MovieRepository,
    PreferencesRepository,
    SqliteGenreRepository,
    SqliteMovieRepository,
    SqlitePreferencesRepository,
};

// ============================================================================
// PUBLIC API - Remote Source
// ============================================================================

pub use integrations::{CatalogSource, HttpCatalogSource, RemoteCatalog, RemoteMovie};

// ============================================================================
// PUBLIC API - Services
// ============================================================================

pub use services::{
    // Sync repository
    CatalogService,

    FavoriteRefresh,
    // Favorites
    FavoritesService,

    PageLoad,
    // Pagination / query engine
    PagingService,

    // Preferences
    PreferencesService,

    PAGE_SIZE,
};

// ============================================================================
// PUBLIC API - Application Layer
// ============================================================================

pub use application::{AppState, StartupSnapshot};
