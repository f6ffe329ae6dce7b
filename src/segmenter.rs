/// Characters that terminate a candidate sentence.
/// The hyphen is included because social-media posts use it as a hard break.
pub const SENTENCE_TERMINATORS: [char; 5] = ['.', ':', '?', '!', '-'];

/// Split raw message text into candidate sentences by terminator scanning.
///
/// The terminator stays at the end of its segment and each segment is
/// trimmed on emission. A non-empty remainder after the scan is emitted
/// without requiring a terminator. Adjacent terminators produce degenerate
/// one-character segments and a whitespace-only remainder produces an empty
/// one; the segmenter emits both and callers filter.
pub fn segment(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        current.push(ch);
        if SENTENCE_TERMINATORS.contains(&ch) {
            sentences.push(current.trim().to_string());
            current.clear();
        }
    }
    if !current.is_empty() {
        sentences.push(current.trim().to_string());
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_each_terminator() {
        let sentences = segment("First one. Second one? Third one!");
        assert_eq!(sentences, vec!["First one.", "Second one?", "Third one!"]);
    }

    #[test]
    fn colon_and_hyphen_are_terminators() {
        let sentences = segment("update: masks required - stay safe");
        assert_eq!(sentences, vec!["update:", "masks required -", "stay safe"]);
    }

    #[test]
    fn trailing_remainder_is_emitted_without_terminator() {
        let sentences = segment("Is this over? not yet");
        assert_eq!(sentences, vec!["Is this over?", "not yet"]);
    }

    #[test]
    fn adjacent_terminators_yield_degenerate_segments() {
        let sentences = segment("Really?!");
        assert_eq!(sentences, vec!["Really?", "!"]);

        let sentences = segment("What...");
        assert_eq!(sentences, vec!["What.", ".", "."]);
    }

    #[test]
    fn whitespace_remainder_is_emitted_empty() {
        let sentences = segment("Done.   ");
        assert_eq!(sentences, vec!["Done.", ""]);
    }

    #[test]
    fn empty_input_yields_no_segments() {
        assert!(segment("").is_empty());
    }

    #[test]
    fn segments_reconstruct_source_modulo_whitespace() {
        let text = "One. Two? Three!";
        let joined = segment(text).join(" ");
        assert_eq!(joined, text);
    }
}
