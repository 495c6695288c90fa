//! Chunking engine
//!
//! Merges and splits raw text blocks into display-ready chunks sized for
//! one-paragraph-per-screen reading:
//! - short paragraphs are combined up to the target range
//! - paragraphs over the cap are split at sentence boundaries
//! - chapter headings always stay as their own chunk

pub mod sentence;

use tracing::debug;

use crate::epub::types::{BlockKind, Chunk, RawBlock};
use sentence::split_sentences;

/// Lower bound of the target chunk size, in bytes of raw text.
pub const TARGET_MIN: usize = 250;

/// Upper bound of the target chunk size, in bytes of raw text.
pub const TARGET_MAX: usize = 500;

/// Text of the single fallback chunk emitted when extraction produced
/// no usable content.
pub const PLACEHOLDER_TEXT: &str = "This book could not be parsed properly.";

/// When enabled, a non-empty buffer below [`TARGET_MIN`] is flushed
/// before an incoming paragraph replaces it. Off by default: the buffer
/// is dropped at that point, matching the historical behavior.
const FLUSH_SHORT_BUFFER_ON_REPLACE: bool = false;

/// Transform raw blocks, in ordinal order, into the final chunk list.
///
/// The output is never empty and `position` values always form the
/// contiguous sequence `0..chunks.len()`.
pub fn chunk_blocks(blocks: Vec<RawBlock>) -> Vec<Chunk> {
    let mut chunks: Vec<Chunk> = Vec::new();
    let mut buffer = String::new();

    for block in blocks {
        match block.kind {
            // Chapters always stay separate.
            BlockKind::Chapter => {
                if !buffer.is_empty() {
                    chunks.push(paragraph_chunk(std::mem::take(&mut buffer)));
                }
                chunks.push(Chunk {
                    text: block.text,
                    kind: BlockKind::Chapter,
                    chapter_title: block.chapter_title,
                    position: 0,
                });
            }
            BlockKind::Paragraph => {
                let length = block.text.len();

                // Joined by a blank line, so +2 for the separator.
                if buffer.len() + length + 2 < TARGET_MAX {
                    if !buffer.is_empty() {
                        buffer.push_str("\n\n");
                    }
                    buffer.push_str(&block.text);
                    continue;
                }

                // The buffer would overflow the cap. Flush it if it
                // already reached the target range; a shorter buffer is
                // left in place.
                if !buffer.is_empty() && buffer.len() >= TARGET_MIN {
                    chunks.push(paragraph_chunk(std::mem::take(&mut buffer)));
                }

                if length > TARGET_MAX {
                    pack_long_paragraph(&block.text, &mut buffer, &mut chunks);
                } else {
                    if FLUSH_SHORT_BUFFER_ON_REPLACE && !buffer.is_empty() {
                        chunks.push(paragraph_chunk(std::mem::take(&mut buffer)));
                    }
                    // Seeds the next accumulation; any leftover short
                    // buffer is superseded here.
                    buffer = block.text;
                }
            }
        }
    }

    if !buffer.is_empty() {
        chunks.push(paragraph_chunk(buffer));
    }

    for (position, chunk) in chunks.iter_mut().enumerate() {
        chunk.position = position;
    }

    if chunks.is_empty() {
        chunks.push(Chunk {
            text: PLACEHOLDER_TEXT.to_string(),
            kind: BlockKind::Paragraph,
            chapter_title: None,
            position: 0,
        });
    }

    debug!(chunks = chunks.len(), "chunking complete");
    chunks
}

/// Split an over-cap paragraph at sentence boundaries and greedily pack
/// the sentences, space-joined, into chunks of at most [`TARGET_MAX`]
/// bytes. A short remainder becomes the new primary buffer when that
/// buffer is empty; otherwise it is flushed as its own chunk.
fn pack_long_paragraph(text: &str, buffer: &mut String, chunks: &mut Vec<Chunk>) {
    let mut packed = String::new();

    for sentence in split_sentences(text) {
        if !packed.is_empty() && packed.len() + sentence.len() + 1 > TARGET_MAX {
            chunks.push(paragraph_chunk(std::mem::take(&mut packed)));
        }
        if !packed.is_empty() {
            packed.push(' ');
        }
        packed.push_str(sentence);
    }

    if !packed.is_empty() {
        if packed.len() < TARGET_MIN && buffer.is_empty() {
            *buffer = packed;
        } else {
            chunks.push(paragraph_chunk(packed));
        }
    }
}

fn paragraph_chunk(text: String) -> Chunk {
    Chunk {
        text,
        kind: BlockKind::Paragraph,
        chapter_title: None,
        // Reassigned once the full output order is known.
        position: 0,
    }
}
