//! Persistence sinks for parsed books
//!
//! A sink receives the pipeline's output exactly once per book and must
//! persist it atomically: either the book row and every chunk row become
//! visible together, or nothing does.

use std::path::Path;

use rusqlite::{params, Connection};
use thiserror::Error;
use tracing::debug;

use crate::epub::types::Chunk;

/// Identifier assigned to a stored book by the sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BookId(pub i64);

/// Errors raised while persisting a book.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Destination for a fully parsed book.
pub trait PersistenceSink {
    /// Persist the book and all of its chunks as a single atomic unit.
    fn store(
        &mut self,
        title: &str,
        file_path: &Path,
        chunks: &[Chunk],
    ) -> Result<BookId, StoreError>;
}

const SCHEMA_SQL: &str = r#"
-- Books table
CREATE TABLE IF NOT EXISTS books (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    file_path TEXT NOT NULL,
    total_chunks INTEGER NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- Chunks table (one row per display unit, ordered by position)
CREATE TABLE IF NOT EXISTS chunks (
    id INTEGER PRIMARY KEY,
    book_id INTEGER NOT NULL REFERENCES books(id),
    text TEXT NOT NULL,
    kind TEXT NOT NULL,
    chapter_title TEXT,
    position INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_chunks_book_position ON chunks(book_id, position);
"#;

/// SQLite-backed sink. Each stored book is one transaction.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and initialize the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::from_connection(Connection::open(path)?)
    }

    /// In-memory database, mainly for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self { conn })
    }

    /// Number of chunk rows stored for a book.
    pub fn chunk_count(&self, book_id: BookId) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM chunks WHERE book_id = ?1",
            params![book_id.0],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}

impl PersistenceSink for SqliteStore {
    fn store(
        &mut self,
        title: &str,
        file_path: &Path,
        chunks: &[Chunk],
    ) -> Result<BookId, StoreError> {
        let tx = self.conn.transaction()?;

        let file_path = file_path.to_string_lossy();
        tx.execute(
            "INSERT INTO books (title, file_path, total_chunks) VALUES (?1, ?2, ?3)",
            params![title, file_path.as_ref(), chunks.len() as i64],
        )?;
        let book_id = BookId(tx.last_insert_rowid());

        {
            let mut insert = tx.prepare(
                "INSERT INTO chunks (book_id, text, kind, chapter_title, position)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for chunk in chunks {
                insert.execute(params![
                    book_id.0,
                    chunk.text,
                    chunk.kind.as_str(),
                    chunk.chapter_title,
                    chunk.position as i64,
                ])?;
            }
        }

        tx.commit()?;
        debug!(book_id = book_id.0, chunks = chunks.len(), "book stored");
        Ok(book_id)
    }
}

/// In-memory sink used by tests and callers that do not need
/// durability.
#[derive(Debug, Default)]
pub struct MemorySink {
    books: Vec<StoredBook>,
}

/// One book captured by [`MemorySink`].
#[derive(Debug, Clone)]
pub struct StoredBook {
    pub id: BookId,
    pub title: String,
    pub file_path: std::path::PathBuf,
    pub chunks: Vec<Chunk>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn books(&self) -> &[StoredBook] {
        &self.books
    }
}

impl PersistenceSink for MemorySink {
    fn store(
        &mut self,
        title: &str,
        file_path: &Path,
        chunks: &[Chunk],
    ) -> Result<BookId, StoreError> {
        let id = BookId(self.books.len() as i64 + 1);
        self.books.push(StoredBook {
            id,
            title: title.to_string(),
            file_path: file_path.to_path_buf(),
            chunks: chunks.to_vec(),
        });
        Ok(id)
    }
}
