//! UTF-8 boundary helpers for streaming byte sources.
//!
//! A chunk of a byte stream may end in the middle of a multi-byte sequence.
//! These helpers find how many trailing bytes belong to such a partial
//! sequence so callers can hold them back until the next chunk arrives.
//! Invalid sequences are never held: they are complete as far as a lossy
//! decoder is concerned.

/// Expected sequence length for a UTF-8 lead byte, or `0` for bytes that
/// cannot start a sequence (continuation bytes and invalid leads).
pub fn utf8_seq_len(first: u8) -> usize {
    match first {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Number of trailing bytes of `bytes` that form the start of a UTF-8
/// sequence which is not complete yet.
///
/// At most three bytes are ever reported.
pub fn incomplete_suffix_len(bytes: &[u8]) -> usize {
    let len = bytes.len();
    let lookback = len.min(3);
    for back in 1..=lookback {
        let byte = bytes[len - back];
        if is_continuation(byte) {
            continue;
        }
        let expected = utf8_seq_len(byte);
        // Lead byte found: partial only if the sequence needs more bytes.
        return if expected > back { back } else { 0 };
    }
    0
}

/// Length of the prefix of `bytes` that can be decoded without splitting a
/// multi-byte sequence.
pub fn complete_prefix_len(bytes: &[u8]) -> usize {
    bytes.len() - incomplete_suffix_len(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_is_always_complete() {
        assert_eq!(incomplete_suffix_len(b"hello"), 0);
        assert_eq!(incomplete_suffix_len(b""), 0);
    }

    #[test]
    fn split_two_byte_sequence() {
        // "×" is C3 97.
        assert_eq!(incomplete_suffix_len(&[b'a', 0xC3]), 1);
        assert_eq!(incomplete_suffix_len(&[b'a', 0xC3, 0x97]), 0);
    }

    #[test]
    fn split_four_byte_sequence_at_every_point() {
        // U+1F600 is F0 9F 98 80.
        let full = [b'x', 0xF0, 0x9F, 0x98, 0x80];
        assert_eq!(incomplete_suffix_len(&full[..2]), 1);
        assert_eq!(incomplete_suffix_len(&full[..3]), 2);
        assert_eq!(incomplete_suffix_len(&full[..4]), 3);
        assert_eq!(incomplete_suffix_len(&full), 0);
        assert_eq!(complete_prefix_len(&full[..4]), 1);
    }

    #[test]
    fn invalid_bytes_are_not_held() {
        assert_eq!(incomplete_suffix_len(&[b'a', 0xFF]), 0);
        assert_eq!(incomplete_suffix_len(&[0x80, 0x80, 0x80, 0x80]), 0);
        // Lone lead followed by ASCII is complete (and invalid).
        assert_eq!(incomplete_suffix_len(&[0xE2, b'a']), 0);
    }
}
