//! End-to-end pipeline tests over real assembled EPUB archives.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use folio::{BlockKind, EpubParser, MemorySink, ParseError, PersistenceSink, SqliteStore};

const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
    <rootfiles>
        <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
    </rootfiles>
</container>"#;

const PACKAGE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
    <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
        <dc:title>The Midnight Library</dc:title>
        <dc:language>en</dc:language>
    </metadata>
    <manifest>
        <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
        <item id="ch2" href="ch2.xhtml" media-type="application/xhtml+xml"/>
    </manifest>
    <spine>
        <itemref idref="ch1"/>
        <itemref idref="ch2"/>
    </spine>
</package>"#;

const CH1_XHTML: &str = r#"<html><body>
<h1>Chapter One</h1>
<p>Short one.</p>
<p>Another short.</p>
<p>And one more.</p>
</body></html>"#;

const CH2_XHTML: &str = r#"<html><body>
<h1>Chapter Two</h1>
<p>The second chapter starts here with a modest paragraph.</p>
</body></html>"#;

fn write_epub(path: &Path, files: &[(&str, &str)]) {
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    for (name, contents) in files {
        writer.start_file(*name, SimpleFileOptions::default()).unwrap();
        writer.write_all(contents.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

fn well_formed_epub(dir: &Path) -> PathBuf {
    let path = dir.join("book.epub");
    write_epub(
        &path,
        &[
            ("mimetype", "application/epub+zip"),
            ("META-INF/container.xml", CONTAINER_XML),
            ("OEBPS/content.opf", PACKAGE_XML),
            ("OEBPS/ch1.xhtml", CH1_XHTML),
            ("OEBPS/ch2.xhtml", CH2_XHTML),
        ],
    );
    path
}

/// Number of entries currently under the working root.
fn working_entries(working_root: &Path) -> usize {
    match fs::read_dir(working_root) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

#[test]
fn parses_a_well_formed_epub() {
    let workspace = tempfile::tempdir().unwrap();
    let epub = well_formed_epub(workspace.path());
    let parser = EpubParser::with_working_root(workspace.path().join("work"));

    let book = parser.parse(&epub).unwrap();

    assert_eq!(book.title, "The Midnight Library");
    assert!(!book.chunks.is_empty());

    // Chapter headings stay 1:1; the three short paragraphs merge.
    assert_eq!(book.chunks[0].kind, BlockKind::Chapter);
    assert_eq!(book.chunks[0].text, "Chapter One");
    assert_eq!(book.chunks[1].kind, BlockKind::Paragraph);
    assert!(book.chunks[1].text.contains("Short one"));
    assert!(book.chunks[1].text.contains("And one more"));
    assert_eq!(book.chunks[2].text, "Chapter Two");

    for (i, chunk) in book.chunks.iter().enumerate() {
        assert_eq!(chunk.position, i);
        assert!(!chunk.text.is_empty());
    }
}

#[test]
fn working_directory_is_released_after_parse() {
    let workspace = tempfile::tempdir().unwrap();
    let working_root = workspace.path().join("work");
    let epub = well_formed_epub(workspace.path());
    let parser = EpubParser::with_working_root(&working_root);

    parser.parse(&epub).unwrap();

    assert_eq!(working_entries(&working_root), 0);
}

#[test]
fn working_directory_is_released_after_failed_parse() {
    let workspace = tempfile::tempdir().unwrap();
    let working_root = workspace.path().join("work");
    let bogus = workspace.path().join("bogus.epub");
    fs::write(&bogus, "not a zip archive at all").unwrap();
    let parser = EpubParser::with_working_root(&working_root);

    let result = parser.parse(&bogus);

    assert!(matches!(result, Err(ParseError::ArchiveCorrupt(_))));
    assert_eq!(working_entries(&working_root), 0);
}

#[test]
fn missing_archive_is_reported_before_extraction() {
    let workspace = tempfile::tempdir().unwrap();
    let parser = EpubParser::with_working_root(workspace.path().join("work"));

    let result = parser.parse(&workspace.path().join("absent.epub"));

    assert!(matches!(result, Err(ParseError::ArchiveNotFound(_))));
}

#[test]
fn container_less_epub_falls_back_to_content_scan() {
    let workspace = tempfile::tempdir().unwrap();
    let epub = workspace.path().join("bare.epub");
    write_epub(
        &epub,
        &[
            ("pages/one.html", "<p>Found by the scan.</p>"),
            ("pages/two.html", "<p>So was this.</p>"),
        ],
    );
    let parser = EpubParser::with_working_root(workspace.path().join("work"));

    let book = parser.parse(&epub).unwrap();

    assert_eq!(book.title, "Untitled Book");
    assert_eq!(book.chunks.len(), 1);
    assert!(book.chunks[0].text.contains("Found by the scan"));
    assert!(book.chunks[0].text.contains("So was this"));
}

#[test]
fn epub_with_no_content_yields_the_placeholder() {
    let workspace = tempfile::tempdir().unwrap();
    let epub = workspace.path().join("empty.epub");
    write_epub(&epub, &[("mimetype", "application/epub+zip")]);
    let parser = EpubParser::with_working_root(workspace.path().join("work"));

    let book = parser.parse(&epub).unwrap();

    assert_eq!(book.chunks.len(), 1);
    assert_eq!(book.chunks[0].text, "This book could not be parsed properly.");
    assert_eq!(book.chunks[0].kind, BlockKind::Paragraph);
    assert_eq!(book.chunks[0].position, 0);
}

#[test]
fn ingest_hands_the_parse_to_the_sink() {
    let workspace = tempfile::tempdir().unwrap();
    let working_root = workspace.path().join("work");
    let epub = well_formed_epub(workspace.path());
    let parser = EpubParser::with_working_root(&working_root);
    let mut sink = MemorySink::new();

    let book_id = parser.ingest(&epub, &mut sink).unwrap();

    let stored = &sink.books()[0];
    assert_eq!(stored.id, book_id);
    assert_eq!(stored.title, "The Midnight Library");
    assert_eq!(stored.file_path, epub);
    assert!(!stored.chunks.is_empty());
    assert_eq!(working_entries(&working_root), 0);
}

#[test]
fn ingest_into_sqlite_round_trips_counts() {
    let workspace = tempfile::tempdir().unwrap();
    let epub = well_formed_epub(workspace.path());
    let parser = EpubParser::with_working_root(workspace.path().join("work"));
    let mut store = SqliteStore::open_in_memory().unwrap();

    let book_id = parser.ingest(&epub, &mut store).unwrap();
    let book = parser.parse(&epub).unwrap();

    assert_eq!(store.chunk_count(book_id).unwrap(), book.chunks.len());
}

#[test]
fn sink_failure_still_releases_the_working_directory() {
    struct FailingSink;

    impl PersistenceSink for FailingSink {
        fn store(
            &mut self,
            _title: &str,
            _file_path: &Path,
            _chunks: &[folio::Chunk],
        ) -> Result<folio::BookId, folio::StoreError> {
            Err(folio::StoreError::Database(
                rusqlite::Error::ExecuteReturnedResults,
            ))
        }
    }

    let workspace = tempfile::tempdir().unwrap();
    let working_root = workspace.path().join("work");
    let epub = well_formed_epub(workspace.path());
    let parser = EpubParser::with_working_root(&working_root);

    let result = parser.ingest(&epub, &mut FailingSink);

    assert!(result.is_err());
    assert_eq!(working_entries(&working_root), 0);
}
