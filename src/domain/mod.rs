// src/domain/mod.rs
//
// Domain Root - The Single Source of Truth for Domain API
//
// This file MUST declare all domain modules and re-export their public API.
// All other modules import from `crate::domain::*`

pub mod movie;

pub use movie::{derive_genres, Catalog, CatalogOrigin, Genre, Movie};
