use nanoid::nanoid;

/// Canonical alphabet for document identifiers (no ambiguous glyphs).
const DOCUMENT_ID_ALPHABET: &[char] = &[
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L', 'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y',
    'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'j', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9',
];
/// Default document id length.
const DOCUMENT_ID_LENGTH: usize = 20;
/// Embedded comments get shorter ids; they are only unique within one parent.
const COMMENT_ID_LENGTH: usize = 12;

/// Generates a new document identifier using the configured alphabet and length.
pub fn generate_document_id() -> String {
    nanoid!(DOCUMENT_ID_LENGTH, DOCUMENT_ID_ALPHABET)
}

/// Generates an identifier for a comment embedded in a post or video.
pub fn generate_comment_id() -> String {
    nanoid!(COMMENT_ID_LENGTH, DOCUMENT_ID_ALPHABET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_has_expected_length_and_charset() {
        let id = generate_document_id();
        assert_eq!(id.len(), DOCUMENT_ID_LENGTH);
        assert!(id.chars().all(|c| DOCUMENT_ID_ALPHABET.contains(&c)));
    }

    #[test]
    fn comment_id_is_shorter() {
        let id = generate_comment_id();
        assert_eq!(id.len(), COMMENT_ID_LENGTH);
    }
}
