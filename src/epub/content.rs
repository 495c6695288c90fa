//! Content document extraction
//!
//! Walks each content document in reading order and flattens it into a
//! single stream of raw text blocks. Markup is parsed tolerantly, so a
//! malformed document degrades instead of aborting the book.

use std::fs;
use std::path::{Path, PathBuf};

use scraper::{Html, Selector};
use tracing::{debug, warn};

use super::types::{BlockKind, RawBlock};

/// Elements that produce a raw block, in document order. Level-1 and
/// level-2 headings open chapters; everything else is body text.
const BLOCK_SELECTOR: &str = "h1, h2, p";

/// Classify a selected element by tag name. Closed over the selector's
/// element set, so classification is a plain pattern match.
fn classify(tag: &str) -> Option<BlockKind> {
    match tag {
        "h1" | "h2" => Some(BlockKind::Chapter),
        "p" => Some(BlockKind::Paragraph),
        _ => None,
    }
}

/// Extract all raw blocks from the given documents, in order.
///
/// The ordinal stream is continuous across documents; document
/// boundaries leave no trace in the output. Files that are missing or
/// unreadable are skipped.
pub fn extract_raw_blocks(documents: &[PathBuf]) -> Vec<RawBlock> {
    let blocks = documents.iter().fold(Vec::new(), |mut blocks, path| {
        extract_document(path, &mut blocks);
        blocks
    });

    debug!(blocks = blocks.len(), documents = documents.len(), "content extraction complete");
    blocks
}

/// Append one document's blocks to the accumulator.
fn extract_document(path: &Path, blocks: &mut Vec<RawBlock>) {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) => {
            warn!(path = %path.display(), %error, "skipping unreadable content document");
            return;
        }
    };

    // BOM-sniffing decode; invalid sequences are replaced, not rejected.
    let (html, _, _) = encoding_rs::UTF_8.decode(&bytes);
    let document = Html::parse_document(&html);
    let selector = Selector::parse(BLOCK_SELECTOR).unwrap();

    for element in document.select(&selector) {
        let Some(kind) = classify(element.value().name()) else {
            continue;
        };

        let text = element.text().collect::<String>();
        let text = text.trim();
        if text.is_empty() {
            continue;
        }

        let chapter_title = match kind {
            BlockKind::Chapter => Some(text.to_string()),
            BlockKind::Paragraph => None,
        };
        blocks.push(RawBlock {
            text: text.to_string(),
            kind,
            chapter_title,
            ordinal: blocks.len(),
        });
    }
}
