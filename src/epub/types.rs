//! Core data types for parsed book content.

use serde::{Deserialize, Serialize};

/// Classification of a text unit, both before and after chunking.
///
/// Chapters pass through the chunking engine untouched; paragraphs are
/// merged and split to hit the target chunk size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Chapter,
    Paragraph,
}

impl BlockKind {
    /// Stable string form, used by the SQLite sink.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockKind::Chapter => "chapter",
            BlockKind::Paragraph => "paragraph",
        }
    }
}

/// A raw text unit extracted from one content document.
///
/// `ordinal` is strictly increasing across the whole book, not per
/// document. Raw blocks only live for the duration of one parse call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    pub text: String,
    pub kind: BlockKind,
    pub chapter_title: Option<String>,
    pub ordinal: usize,
}

/// A final, display-ready unit of reading content.
///
/// `position` is reassigned densely (0..N-1) after chunking and matches
/// the final output order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    pub text: String,
    pub kind: BlockKind,
    pub chapter_title: Option<String>,
    pub position: usize,
}

/// The pipeline's output: a resolved title plus the ordered chunk list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedBook {
    pub title: String,
    pub chunks: Vec<Chunk>,
}

impl ParsedBook {
    /// Number of chunks that a sink would persist.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}
