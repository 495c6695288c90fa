//! Folio
//!
//! EPUB ingestion pipeline for feed-style reading: parses an EPUB
//! archive into an ordered sequence of bounded-size text chunks, one
//! paragraph (or chapter heading) per screen, and persists them through
//! a pluggable sink.
//!
//! # Modules
//!
//! - `epub`: the parsing pipeline (archive extraction, package
//!   resolution, content extraction)
//! - `chunking`: the greedy merge/split engine and sentence splitter
//! - `store`: persistence sinks (SQLite, in-memory)
//! - `config`: environment-based configuration

pub mod chunking;
pub mod config;
pub mod epub;
pub mod store;

pub use config::Config;
pub use epub::types::{BlockKind, Chunk, ParsedBook, RawBlock};
pub use epub::{EpubParser, IngestError, ParseError};
pub use store::{BookId, MemorySink, PersistenceSink, SqliteStore, StoreError};
