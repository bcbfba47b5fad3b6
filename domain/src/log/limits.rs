//! Field value length limits

/// Largest single field value Graylog can index, in bytes.
///
/// Elasticsearch rejects terms longer than 32766 bytes, so longer values
/// are cut down before they leave the process.
pub const MAX_VALUE_LENGTH: usize = 32766;

/// Cut `value` down to at most [`MAX_VALUE_LENGTH`] bytes
pub fn truncate_to_max_value_length(value: &[u8]) -> &[u8] {
    &value[..value.len().min(MAX_VALUE_LENGTH)]
}

/// Like [`truncate_to_max_value_length`] but never splits a UTF-8 character
pub fn truncate_str(value: &str) -> &str {
    if value.len() <= MAX_VALUE_LENGTH {
        return value;
    }
    let mut end = MAX_VALUE_LENGTH;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_values_untouched() {
        assert_eq!(truncate_to_max_value_length(b"hello"), b"hello");
        assert_eq!(truncate_to_max_value_length(b""), b"");
        assert_eq!(truncate_str("hello"), "hello");
    }

    #[test]
    fn test_long_values_cut_to_limit() {
        let long = vec![b'x'; MAX_VALUE_LENGTH + 10];
        assert_eq!(truncate_to_max_value_length(&long).len(), MAX_VALUE_LENGTH);

        let exact = vec![b'x'; MAX_VALUE_LENGTH];
        assert_eq!(truncate_to_max_value_length(&exact).len(), MAX_VALUE_LENGTH);
    }

    #[test]
    fn test_truncate_str_respects_char_boundaries() {
        // 'é' is two bytes; MAX_VALUE_LENGTH is even, so an odd prefix
        // pushes a character across the limit.
        let s = format!("a{}", "é".repeat(MAX_VALUE_LENGTH));
        let truncated = truncate_str(&s);
        assert!(truncated.len() <= MAX_VALUE_LENGTH);
        assert_eq!(truncated.len(), MAX_VALUE_LENGTH - 1);
    }
}
