// src/repositories/genre_repository.rs
//
// Genre persistence

use std::sync::Arc;

use rusqlite::params;

use crate::db::ConnectionPool;
use crate::domain::movie::Genre;
use crate::error::AppResult;

/// Genre names live in their own table, upserted on every successful catalog
/// refresh. Nothing prunes them when the catalog shrinks.
pub trait GenreRepository: Send + Sync {
    fn upsert(&self, name: &str) -> AppResult<()>;
    fn list_all(&self) -> AppResult<Vec<Genre>>;
}

pub struct SqliteGenreRepository {
    pool: Arc<ConnectionPool>,
}

impl SqliteGenreRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }
}

impl GenreRepository for SqliteGenreRepository {
    fn upsert(&self, name: &str) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT OR REPLACE INTO genres (name) VALUES (?1)",
            params![name],
        )?;
        Ok(())
    }

    fn list_all(&self) -> AppResult<Vec<Genre>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare("SELECT name FROM genres")?;
        let genres: Vec<Genre> = stmt
            .query_map([], |row| Ok(Genre { name: row.get(0)? }))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(genres)
    }
}
