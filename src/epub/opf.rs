//! Package document resolution
//!
//! Locates the OPF package document through `META-INF/container.xml`,
//! resolves the manifest and spine into an ordered list of content
//! document paths, and reads the book title from the package metadata.
//! Every step degrades to a fallback rather than failing: a broken or
//! absent package yields a file-system scan, a missing title yields a
//! fixed literal.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Media type that marks a container rootfile as the package document.
const PACKAGE_MEDIA_TYPE: &str = "application/oebps-package+xml";

/// Extensions recognized as content documents by the fallback scan.
const CONTENT_EXTENSIONS: [&str; 3] = ["html", "xhtml", "htm"];

/// Title used when the package metadata cannot be read.
pub const DEFAULT_TITLE: &str = "Untitled Book";

/// Outcome of package resolution for one extracted archive.
#[derive(Debug, Clone)]
pub struct ResolvedPackage {
    /// Located package document, if any. Consumed by the title reader.
    pub package_doc: Option<PathBuf>,
    /// Content documents in reading order. Spine order when the package
    /// resolves, file-system scan order otherwise.
    pub spine: Vec<PathBuf>,
}

/// Resolve the package document and reading order for an extraction
/// directory. Never fails; the spine may be empty.
pub fn resolve(root: &Path) -> ResolvedPackage {
    let package_doc = locate_package_document(root).filter(|path| path.exists());

    let mut spine = package_doc
        .as_deref()
        .and_then(spine_from_package)
        .unwrap_or_default();

    if spine.is_empty() {
        warn!(root = %root.display(), "no usable spine, scanning for content documents");
        spine = scan_for_content_documents(root);
    }

    debug!(documents = spine.len(), "resolved reading order");
    ResolvedPackage { package_doc, spine }
}

/// Read the book title from the package document's metadata block.
///
/// Returns the first `title` element's text content unmodified, or
/// [`DEFAULT_TITLE`] when the document is absent, unreadable, unparsable
/// or carries no title element.
pub fn read_title(package_doc: Option<&Path>) -> String {
    let title = package_doc
        .and_then(|path| fs::read_to_string(path).ok())
        .and_then(|xml| {
            let doc = roxmltree::Document::parse(&xml).ok()?;
            doc.descendants()
                .find(|node| node.tag_name().name() == "title")
                .map(|node| node.text().unwrap_or_default().to_string())
        });

    match title {
        Some(title) => title,
        None => {
            debug!("no title in package metadata, using fallback");
            DEFAULT_TITLE.to_string()
        }
    }
}

/// Find the package document path.
///
/// `META-INF/container.xml` is consulted first: the first `rootfile`
/// element carrying the package media type wins. When the pointer file
/// is missing, unparsable or points nowhere, the extraction tree is
/// scanned for any `.opf` file instead.
fn locate_package_document(root: &Path) -> Option<PathBuf> {
    let container = root.join("META-INF").join("container.xml");

    if let Ok(xml) = fs::read_to_string(&container) {
        if let Ok(doc) = roxmltree::Document::parse(&xml) {
            let rootfile = doc.descendants().find(|node| {
                node.tag_name().name() == "rootfile"
                    && node.attribute("media-type") == Some(PACKAGE_MEDIA_TYPE)
            });
            if let Some(path) = rootfile.and_then(|node| node.attribute("full-path")) {
                return Some(root.join(path));
            }
        }
    }

    warn!("container.xml did not yield a package document, scanning for .opf");
    scan_for_extension(root, "opf").into_iter().next()
}

/// Parse the package document into spine order.
///
/// Manifest `item` elements are collected into an id→path map (hrefs
/// resolved against the package document's directory), then spine
/// `itemref` elements are resolved in document order. Unresolvable
/// idrefs are skipped silently.
fn spine_from_package(package_doc: &Path) -> Option<Vec<PathBuf>> {
    let xml = fs::read_to_string(package_doc).ok()?;
    let doc = roxmltree::Document::parse(&xml).ok()?;
    let package_dir = package_doc.parent().unwrap_or_else(|| Path::new(""));

    let mut manifest: HashMap<String, PathBuf> = HashMap::new();
    for node in doc.descendants() {
        if node.tag_name().name() == "item" {
            if let (Some(id), Some(href)) = (node.attribute("id"), node.attribute("href")) {
                manifest.insert(id.to_string(), package_dir.join(href));
            }
        }
    }

    let mut spine = Vec::new();
    for node in doc.descendants() {
        if node.tag_name().name() == "itemref" {
            if let Some(path) = node.attribute("idref").and_then(|idref| manifest.get(idref)) {
                spine.push(path.clone());
            }
        }
    }

    Some(spine)
}

/// Recursively collect content documents, one pass per recognized
/// extension.
fn scan_for_content_documents(root: &Path) -> Vec<PathBuf> {
    CONTENT_EXTENSIONS
        .iter()
        .flat_map(|extension| scan_for_extension(root, extension))
        .collect()
}

/// Depth-first scan for files with the given extension: matching files
/// in a directory first, then its subdirectories, entries sorted for a
/// stable order.
fn scan_for_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    let mut found = Vec::new();

    let Ok(entries) = fs::read_dir(dir) else {
        return found;
    };
    let mut paths: Vec<PathBuf> = entries.flatten().map(|entry| entry.path()).collect();
    paths.sort();

    for path in &paths {
        if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some(extension) {
            found.push(path.clone());
        }
    }
    for path in paths {
        if path.is_dir() {
            found.extend(scan_for_extension(&path, extension));
        }
    }

    found
}
