//! Display width, kept as the one authoritative function callers use for
//! cursor/redisplay math — mirroring the "single width function" pattern
//! in `core-text/src/width.rs`. The algorithm itself is deliberately
//! simpler than the teacher's full grapheme-cluster engine: spec.md §4.4
//! defines width as a codepoint count, with UTF-8 continuation bytes
//! (0x80–0xBF) skipped, not full Unicode East-Asian-width/combining-mark
//! handling.

pub fn display_width(s: &str) -> usize {
    s.bytes().filter(|&b| !(0x80..=0xBF).contains(&b)).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_width_is_byte_count() {
        assert_eq!(display_width("hello"), 5);
    }

    #[test]
    fn multibyte_sequence_counts_as_one() {
        assert_eq!(display_width("é"), 1);
        assert_eq!(display_width("caf\u{e9}"), 4);
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(display_width(""), 0);
    }
}
