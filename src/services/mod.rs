// src/services/mod.rs
//
// Services Module - Orchestration Layer

pub mod catalog_service;
pub mod favorites_service;
pub mod paging_service;
pub mod preferences_service;

#[cfg(test)]
mod favorites_service_tests;

// Re-export all services and their types
pub use catalog_service::CatalogService;

pub use paging_service::{PageLoad, PagingService, PAGE_SIZE};

pub use favorites_service::{FavoriteRefresh, FavoritesService};

pub use preferences_service::PreferencesService;
