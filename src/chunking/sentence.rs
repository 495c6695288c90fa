//! Sentence boundary splitting for oversized paragraphs.

/// Split text into sentence fragments.
///
/// A boundary is any `.`, `!` or `?` immediately followed by ASCII
/// whitespace; the whitespace run is consumed and the punctuation stays
/// with the preceding fragment. Abbreviations, decimal numbers and
/// quotation marks are not special-cased. Non-empty input always yields
/// at least one fragment.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if matches!(bytes[i], b'.' | b'!' | b'?') {
            let mut next = i + 1;
            while next < bytes.len() && bytes[next].is_ascii_whitespace() {
                next += 1;
            }
            if next > i + 1 {
                // All boundary bytes are ASCII, so the slice points land
                // on char boundaries even in multi-byte text.
                let fragment = &text[start..=i];
                if !fragment.is_empty() {
                    sentences.push(fragment);
                }
                start = next;
                i = next;
                continue;
            }
        }
        i += 1;
    }

    if start < bytes.len() {
        sentences.push(&text[start..]);
    }

    if sentences.is_empty() && !text.is_empty() {
        sentences.push(text);
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_period_space() {
        let sentences = split_sentences("First one. Second one. Third.");
        assert_eq!(sentences, vec!["First one.", "Second one.", "Third."]);
    }

    #[test]
    fn splits_on_exclamation_and_question() {
        let sentences = split_sentences("Really! Are you sure? Yes.");
        assert_eq!(sentences, vec!["Really!", "Are you sure?", "Yes."]);
    }

    #[test]
    fn consumes_whole_whitespace_run() {
        let sentences = split_sentences("One.  \n Two.");
        assert_eq!(sentences, vec!["One.", "Two."]);
    }

    #[test]
    fn punctuation_without_whitespace_is_not_a_boundary() {
        let sentences = split_sentences("Version 2.5 shipped");
        assert_eq!(sentences, vec!["Version 2.5 shipped"]);
    }

    #[test]
    fn no_boundary_returns_whole_input() {
        let sentences = split_sentences("no punctuation here");
        assert_eq!(sentences, vec!["no punctuation here"]);
    }

    #[test]
    fn trailing_whitespace_leaves_no_empty_fragment() {
        let sentences = split_sentences("Done. ");
        assert_eq!(sentences, vec!["Done."]);
    }

    #[test]
    fn abbreviations_are_not_special_cased() {
        let sentences = split_sentences("Dr. Smith arrived.");
        assert_eq!(sentences, vec!["Dr.", "Smith arrived."]);
    }

    #[test]
    fn handles_multibyte_text() {
        let sentences = split_sentences("Café closed. Très bien!");
        assert_eq!(sentences, vec!["Café closed.", "Très bien!"]);
    }
}
