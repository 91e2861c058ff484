// src/repositories/preferences_repository.rs
//
// Key-value preference store

use std::str::FromStr;
use std::sync::Arc;

use rusqlite::params;
use serde::{Deserialize, Serialize};

use crate::db::ConnectionPool;
use crate::error::{AppError, AppResult};

pub const KEY_DARK_THEME: &str = "dark_theme";
pub const KEY_LAYOUT_MODE: &str = "layout_mode";
pub const KEY_LAST_REFRESH: &str = "last_catalog_refresh";

/// How the catalog is presented by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    #[default]
    List,
    Grid,
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutMode::List => write!(f, "list"),
            LayoutMode::Grid => write!(f, "grid"),
        }
    }
}

impl FromStr for LayoutMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(LayoutMode::List),
            "grid" => Ok(LayoutMode::Grid),
            other => Err(AppError::Other(format!("Unknown layout mode: {}", other))),
        }
    }
}

/// Persisted configuration: raw string values plus typed accessors for the
/// settings clients actually use. Missing keys fall back to defaults.
pub trait PreferencesRepository: Send + Sync {
    fn get(&self, key: &str) -> AppResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> AppResult<()>;

    fn dark_theme(&self) -> AppResult<bool> {
        Ok(self
            .get(KEY_DARK_THEME)?
            .map(|v| v == "true")
            .unwrap_or(false))
    }

    fn set_dark_theme(&self, on: bool) -> AppResult<()> {
        self.set(KEY_DARK_THEME, if on { "true" } else { "false" })
    }

    fn layout_mode(&self) -> AppResult<LayoutMode> {
        Ok(self
            .get(KEY_LAYOUT_MODE)?
            .map(|v| v.parse().unwrap_or_default())
            .unwrap_or_default())
    }

    fn set_layout_mode(&self, mode: LayoutMode) -> AppResult<()> {
        self.set(KEY_LAYOUT_MODE, &mode.to_string())
    }
}

pub struct SqlitePreferencesRepository {
    pool: Arc<ConnectionPool>,
}

impl SqlitePreferencesRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

impl PreferencesRepository for SqlitePreferencesRepository {
    fn get(&self, key: &str) -> AppResult<Option<String>> {
        let conn = self.pool.get()?;

        match conn.query_row(
            "SELECT value FROM preferences WHERE key = ?1",
            params![key],
            |row| row.get(0),
        ) {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}
