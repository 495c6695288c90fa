//! EPUB parsing pipeline
//!
//! Turns an EPUB archive into an ordered list of display-ready chunks:
//! extract the ZIP container, resolve the package manifest and spine,
//! read the title, flatten the content documents into raw blocks, and
//! chunk them for one-paragraph-per-screen reading.
//!
//! Only a missing or undecodable archive is fatal. Everything past
//! extraction degrades to a fallback, so a malformed real-world EPUB
//! still produces something readable.

pub mod archive;
pub mod content;
pub mod opf;
pub mod types;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::chunking::chunk_blocks;
use crate::store::{BookId, PersistenceSink, StoreError};
use types::ParsedBook;

/// Errors raised while turning an archive into chunks.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The input path does not exist.
    #[error("EPUB file not found: {}", .0.display())]
    ArchiveNotFound(PathBuf),

    /// The container could not be opened or decoded as a ZIP archive.
    #[error("failed to open EPUB archive: {0}")]
    ArchiveCorrupt(#[from] zip::result::ZipError),

    /// The working root or scoped extraction directory could not be set up.
    #[error("failed to prepare working directory: {0}")]
    WorkingRoot(#[source] std::io::Error),
}

/// Errors raised by [`EpubParser::ingest`].
#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("failed to persist book: {0}")]
    Store(#[from] StoreError),
}

/// The parsing pipeline, configured with a working root for scoped
/// extraction directories.
#[derive(Debug, Clone)]
pub struct EpubParser {
    working_root: PathBuf,
}

impl EpubParser {
    /// Parser using the process-local default working root.
    pub fn new() -> Self {
        Self {
            working_root: std::env::temp_dir().join("folio"),
        }
    }

    /// Parser extracting under a caller-supplied working root.
    pub fn with_working_root(working_root: impl Into<PathBuf>) -> Self {
        Self {
            working_root: working_root.into(),
        }
    }

    /// Parse an EPUB archive into a title and ordered chunks.
    ///
    /// The extraction directory is removed before this returns, on
    /// success and on failure.
    pub fn parse(&self, epub_path: &Path) -> Result<ParsedBook, ParseError> {
        let extracted = archive::extract(epub_path, &self.working_root)?;
        Ok(self.parse_extracted(extracted.path()))
    }

    /// Parse an EPUB archive and hand the result to a persistence sink.
    ///
    /// The sink runs while the extraction directory is still held, so
    /// the directory is released after persistence completes, whether
    /// the store succeeded or not.
    pub fn ingest<S: PersistenceSink>(
        &self,
        epub_path: &Path,
        sink: &mut S,
    ) -> Result<BookId, IngestError> {
        let extracted = archive::extract(epub_path, &self.working_root)?;
        let book = self.parse_extracted(extracted.path());

        let book_id = sink.store(&book.title, epub_path, &book.chunks)?;
        info!(
            book_id = book_id.0,
            title = %book.title,
            chunks = book.chunks.len(),
            "book ingested"
        );
        Ok(book_id)
    }

    /// Run the post-extraction stages. Infallible: every failure past
    /// this point falls back to a degraded but usable result.
    fn parse_extracted(&self, root: &Path) -> ParsedBook {
        let resolved = opf::resolve(root);
        let title = opf::read_title(resolved.package_doc.as_deref());
        let blocks = content::extract_raw_blocks(&resolved.spine);
        let chunks = chunk_blocks(blocks);

        info!(title = %title, chunks = chunks.len(), "parsed book");
        ParsedBook { title, chunks }
    }
}

impl Default for EpubParser {
    fn default() -> Self {
        Self::new()
    }
}
