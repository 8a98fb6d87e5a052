//! Splits a message body into length-bounded, numbered parts.

use crate::error::SplitError;

/// Split `message` into parts no longer than `max_length`.
///
/// A message that already fits is returned unchanged as a single part.
/// Otherwise 4 characters of each part are reserved for an `"i/total "`
/// prefix (1-based, left-to-right, no overlap), so the payload budget
/// per part is `max_length - 4`. Lengths count chars, not bytes, so a
/// multi-byte body can never be cut inside a code point.
///
/// `max_length <= 4` leaves no payload budget and is rejected.
pub fn split_into_parts(message: &str, max_length: usize) -> Result<Vec<String>, SplitError> {
    let chars: Vec<char> = message.chars().collect();
    if chars.len() <= max_length {
        return Ok(vec![message.to_string()]);
    }
    if max_length <= 4 {
        return Err(SplitError::MaxLengthTooSmall { max_length });
    }

    let budget = max_length - 4;
    let total = chars.len().div_ceil(budget);
    let mut parts = Vec::with_capacity(total);
    for (i, chunk) in chars.chunks(budget).enumerate() {
        let payload: String = chunk.iter().collect();
        parts.push(format!("{}/{} {}", i + 1, total, payload));
    }
    Ok(parts)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fitting_message_is_unchanged() {
        assert_eq!(split_into_parts("hello", 10).unwrap(), vec!["hello"]);
    }

    #[test]
    fn boundary_length_is_unchanged() {
        assert_eq!(split_into_parts("hello", 5).unwrap(), vec!["hello"]);
    }

    #[test]
    fn long_message_is_numbered() {
        let parts = split_into_parts("abcdefghij", 6).unwrap();
        assert_eq!(parts, vec!["1/5 ab", "2/5 cd", "3/5 ef", "4/5 gh", "5/5 ij"]);
    }

    #[test]
    fn uneven_tail_part() {
        let parts = split_into_parts("abcdefg", 6).unwrap();
        assert_eq!(parts, vec!["1/4 ab", "2/4 cd", "3/4 ef", "4/4 g"]);
    }

    #[test]
    fn degenerate_max_length_is_rejected() {
        let err = split_into_parts("too long to fit", 4).unwrap_err();
        assert!(matches!(err, SplitError::MaxLengthTooSmall { max_length: 4 }));
    }

    #[test]
    fn degenerate_max_length_still_passes_through_fitting_message() {
        // Guard only applies when splitting is actually needed.
        assert_eq!(split_into_parts("ok", 3).unwrap(), vec!["ok"]);
    }

    #[test]
    fn multibyte_body_splits_on_char_boundaries() {
        let parts = split_into_parts("éééééé", 5).unwrap();
        assert_eq!(parts, vec!["1/6 é", "2/6 é", "3/6 é", "4/6 é", "5/6 é", "6/6 é"]);
    }
}
