// src/integrations/catalog_api/mod.rs

pub mod client;

pub use client::{CatalogSource, HttpCatalogSource, RemoteCatalog, RemoteMovie, DEFAULT_BASE_URL};

#[cfg(test)]
pub use client::MockCatalogSource;
