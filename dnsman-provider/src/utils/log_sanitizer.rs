//! Log sanitization utilities
//!
//! Keeps API tokens and bulky response bodies from landing in debug logs in
//! full.

/// Maximum number of bytes to include in truncated log output.
const TRUNCATE_LIMIT: usize = 256;

/// Truncate a string for safe logging.
///
/// Returns the original string when it fits, otherwise a prefix of at most
/// [`TRUNCATE_LIMIT`] bytes (cut at a character boundary) with a suffix
/// noting the total length.
pub fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        return s.to_string();
    }
    let mut cut = TRUNCATE_LIMIT;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}... [truncated, total {} bytes]", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_string_unchanged() {
        assert_eq!(truncate_for_log("ok"), "ok");
    }

    #[test]
    fn long_string_truncated_with_total() {
        let s = "x".repeat(1000);
        let out = truncate_for_log(&s);
        assert!(out.starts_with(&"x".repeat(TRUNCATE_LIMIT)));
        assert!(out.ends_with("[truncated, total 1000 bytes]"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let s = "é".repeat(300);
        let out = truncate_for_log(&s);
        assert!(out.contains("[truncated"));
    }
}
