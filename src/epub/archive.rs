//! Archive extraction
//!
//! Unpacks the EPUB ZIP container into a scoped working directory. The
//! directory lives under a shared working root and carries a randomized
//! name, so concurrent parses never collide. Dropping the handle removes
//! the directory and everything in it; removal failures are swallowed.

use std::fs::{self, File};
use std::path::Path;

use tempfile::TempDir;
use tracing::{debug, info};

use super::ParseError;

/// A fully extracted archive, scoped to one parse call.
///
/// The backing directory is deleted when this value drops.
pub struct ExtractedArchive {
    dir: TempDir,
}

impl ExtractedArchive {
    /// Root of the extracted file tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Extract the archive at `epub_path` into a fresh directory under
/// `working_root` (created on demand).
///
/// Fails with [`ParseError::ArchiveNotFound`] when the input path does
/// not exist and [`ParseError::ArchiveCorrupt`] when the container
/// cannot be opened or decoded.
pub fn extract(epub_path: &Path, working_root: &Path) -> Result<ExtractedArchive, ParseError> {
    if !epub_path.exists() {
        return Err(ParseError::ArchiveNotFound(epub_path.to_path_buf()));
    }

    fs::create_dir_all(working_root).map_err(ParseError::WorkingRoot)?;
    let dir = tempfile::Builder::new()
        .prefix("epub-")
        .tempdir_in(working_root)
        .map_err(ParseError::WorkingRoot)?;

    debug!(archive = %epub_path.display(), target = %dir.path().display(), "extracting archive");

    let file = File::open(epub_path)
        .map_err(|error| ParseError::ArchiveCorrupt(zip::result::ZipError::Io(error)))?;
    let mut archive = zip::ZipArchive::new(file)?;
    archive.extract(dir.path())?;

    info!(
        archive = %epub_path.display(),
        entries = archive.len(),
        "archive extracted"
    );
    Ok(ExtractedArchive { dir })
}
