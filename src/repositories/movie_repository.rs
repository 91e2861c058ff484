// src/repositories/movie_repository.rs
//
// Movie persistence

use std::sync::Arc;

use rusqlite::{params, Row};

use crate::db::ConnectionPool;
use crate::domain::movie::Movie;
use crate::error::{AppError, AppResult};

/// The local movie store boundary.
///
/// Year-ordered queries sort `year DESC, id ASC`; the id tie-break keeps
/// equal-year windows stable across calls.
pub trait MovieRepository: Send + Sync {
    /// Insert all movies, replacing any existing row with the same id.
    fn insert_all(&self, movies: &[Movie]) -> AppResult<()>;
    fn list_all(&self) -> AppResult<Vec<Movie>>;
    fn get_by_id(&self, id: i64) -> AppResult<Option<Movie>>;
    fn list_paged(&self, limit: u32, offset: u32) -> AppResult<Vec<Movie>>;
    /// Substring match against title, plot, actors and director, OR-combined.
    fn search(&self, query: &str) -> AppResult<Vec<Movie>>;
    fn clear(&self) -> AppResult<()>;
    /// Flips the favorite flag in place. A missing id affects zero rows and
    /// is not an error.
    fn toggle_favorite(&self, id: i64) -> AppResult<()>;
    fn set_favorite(&self, id: i64, value: bool) -> AppResult<()>;
    fn list_favorites(&self) -> AppResult<Vec<Movie>>;
}

pub struct SqliteMovieRepository {
    pool: Arc<ConnectionPool>,
}

const MOVIE_COLUMNS: &str =
    "id, title, plot, poster_url, runtime, year, director, actors, genres, is_favorite";

impl SqliteMovieRepository {
    pub fn new(pool: Arc<ConnectionPool>) -> Self {
        Self { pool }
    }

    /// Map database row to Movie - returns rusqlite::Error for query_map compatibility
    fn row_to_movie(row: &Row) -> Result<Movie, rusqlite::Error> {
        let genres_json: String = row.get("genres")?;
        let genres: Vec<String> = serde_json::from_str(&genres_json)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;

        Ok(Movie {
            id: row.get("id")?,
            title: row.get("title")?,
            plot: row.get("plot")?,
            poster_url: row.get("poster_url")?,
            runtime: row.get("runtime")?,
            year: row.get("year")?,
            director: row.get("director")?,
            actors: row.get("actors")?,
            genres,
            is_favorite: row.get("is_favorite")?,
        })
    }
}

impl MovieRepository for SqliteMovieRepository {
    fn insert_all(&self, movies: &[Movie]) -> AppResult<()> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(
            "INSERT OR REPLACE INTO movies (
                id, title, plot, poster_url, runtime, year,
                director, actors, genres, is_favorite
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        )?;

        for movie in movies {
            let genres_json = serde_json::to_string(&movie.genres)?;
            stmt.execute(params![
                movie.id,
                movie.title,
                movie.plot,
                movie.poster_url,
                movie.runtime,
                movie.year,
                movie.director,
                movie.actors,
                genres_json,
                movie.is_favorite,
            ])?;
        }

        Ok(())
    }

    fn list_all(&self) -> AppResult<Vec<Movie>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM movies ORDER BY year DESC, id ASC",
            MOVIE_COLUMNS
        ))?;

        let movies: Vec<Movie> = stmt
            .query_map([], Self::row_to_movie)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(movies)
    }

    fn get_by_id(&self, id: i64) -> AppResult<Option<Movie>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM movies WHERE id = ?1",
            MOVIE_COLUMNS
        ))?;

        match stmt.query_row(params![id], Self::row_to_movie) {
            Ok(movie) => Ok(Some(movie)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(AppError::Database(e)),
        }
    }

    fn list_paged(&self, limit: u32, offset: u32) -> AppResult<Vec<Movie>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM movies ORDER BY year DESC, id ASC LIMIT ?1 OFFSET ?2",
            MOVIE_COLUMNS
        ))?;

        let movies: Vec<Movie> = stmt
            .query_map(params![limit, offset], Self::row_to_movie)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(movies)
    }

    fn search(&self, query: &str) -> AppResult<Vec<Movie>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM movies
             WHERE title LIKE '%' || ?1 || '%'
                OR plot LIKE '%' || ?1 || '%'
                OR actors LIKE '%' || ?1 || '%'
                OR director LIKE '%' || ?1 || '%'",
            MOVIE_COLUMNS
        ))?;

        let movies: Vec<Movie> = stmt
            .query_map(params![query], Self::row_to_movie)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(movies)
    }

    fn clear(&self) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM movies", [])?;
        Ok(())
    }

    fn toggle_favorite(&self, id: i64) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE movies SET is_favorite = NOT is_favorite WHERE id = ?1",
            params![id],
        )?;
        Ok(())
    }

    fn set_favorite(&self, id: i64, value: bool) -> AppResult<()> {
        let conn = self.pool.get()?;
        conn.execute(
            "UPDATE movies SET is_favorite = ?2 WHERE id = ?1",
            params![id, value],
        )?;
        Ok(())
    }

    fn list_favorites(&self) -> AppResult<Vec<Movie>> {
        let conn = self.pool.get()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM movies WHERE is_favorite = 1 ORDER BY year DESC, id ASC",
            MOVIE_COLUMNS
        ))?;

        let movies: Vec<Movie> = stmt
            .query_map([], Self::row_to_movie)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(movies)
    }
}
