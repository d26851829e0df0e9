//! Username normalization
//!
//! Turns raw strings into comparable [`Username`] identity keys: trimmed,
//! lowercased, NFC-composed and stripped of characters that do not print.
//! The result is deterministic and independent of the process locale.

use crate::models::Username;
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

/// Normalize a raw username.
///
/// Never fails; an input with nothing printable yields the empty username.
pub fn normalize(raw: &str) -> Username {
    let lowered = raw.trim().to_lowercase();
    let printable: String = lowered.nfc().filter(|&c| is_printable(c)).collect();
    // Stripping can expose edge whitespace or split a composable pair.
    Username::from_normalized(printable.trim().nfc().collect())
}

/// Normalize an untyped JSON value; anything but a string yields the empty username.
pub fn normalize_value(raw: &Value) -> Username {
    match raw {
        Value::String(s) => normalize(s),
        _ => Username::empty(),
    }
}

/// Whether `c` renders as a visible glyph or a plain space.
///
/// Control characters, separators other than U+0020, invisible formatting
/// characters and private-use code points are all rejected.
pub fn is_printable(c: char) -> bool {
    if c == ' ' {
        return true;
    }
    if c.is_control() || c.is_whitespace() {
        return false;
    }
    !is_format_char(c) && !is_private_use(c)
}

// General category Cf, plus the separators that `char::is_whitespace` misses.
fn is_format_char(c: char) -> bool {
    matches!(
        c,
        '\u{00AD}'
            | '\u{0600}'..='\u{0605}'
            | '\u{061C}'
            | '\u{06DD}'
            | '\u{070F}'
            | '\u{0890}'..='\u{0891}'
            | '\u{08E2}'
            | '\u{180E}'
            | '\u{200B}'..='\u{200F}'
            | '\u{2028}'..='\u{202E}'
            | '\u{2060}'..='\u{2064}'
            | '\u{2066}'..='\u{206F}'
            | '\u{FEFF}'
            | '\u{FFF9}'..='\u{FFFB}'
            | '\u{110BD}'
            | '\u{110CD}'
            | '\u{13430}'..='\u{1343F}'
            | '\u{1BCA0}'..='\u{1BCA3}'
            | '\u{1D173}'..='\u{1D17A}'
            | '\u{E0001}'
            | '\u{E0020}'..='\u{E007F}'
    )
}

fn is_private_use(c: char) -> bool {
    matches!(
        c,
        '\u{E000}'..='\u{F8FF}' | '\u{F0000}'..='\u{FFFFD}' | '\u{100000}'..='\u{10FFFD}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_case_insensitive() {
        assert_eq!(normalize("UserName"), normalize("username"));
        assert_eq!(normalize("UserName"), "username");
    }

    #[test]
    fn test_trims_whitespace() {
        assert_eq!(normalize("  alice \n"), "alice");
        assert_eq!(normalize("\t"), "");
    }

    #[test]
    fn test_nfc_composition() {
        let decomposed = "cafe\u{0301}";
        let composed = "caf\u{00E9}";
        assert_eq!(normalize(decomposed), normalize(composed));
        assert_eq!(normalize(decomposed), composed);
    }

    #[test]
    fn test_strips_invisible_characters() {
        assert_eq!(normalize("ali\u{200B}ce"), "alice");
        assert_eq!(normalize("\u{FEFF}bob"), "bob");
        assert_eq!(normalize("car\u{0007}ol"), "carol");
        assert_eq!(normalize("dave\u{00A0}"), "dave");
        assert_eq!(normalize("e\u{E000}ve"), "eve");
    }

    #[test]
    fn test_keeps_inner_space_and_symbols() {
        assert_eq!(normalize("john doe"), "john doe");
        assert_eq!(normalize("john.doe_99"), "john.doe_99");
    }

    #[test]
    fn test_idempotent() {
        let samples = [
            "UserName",
            "  Mixed Case  ",
            "\u{200B} leading",
            "e\u{200B}\u{0301}",
            "ÅNGSTRÖM",
            "İstanbul",
            "",
            "\u{0000}\u{0001}",
        ];
        for sample in samples {
            let once = normalize(sample);
            let twice = normalize(once.as_str());
            assert_eq!(once, twice, "normalization not idempotent for {:?}", sample);
        }
    }

    #[test]
    fn test_stripping_exposes_composable_pair() {
        assert_eq!(normalize("e\u{200B}\u{0301}"), "\u{00E9}");
    }

    #[test]
    fn test_non_string_value_is_empty() {
        assert!(normalize_value(&json!(42)).is_empty());
        assert!(normalize_value(&json!(null)).is_empty());
        assert!(normalize_value(&json!(["alice"])).is_empty());
        assert_eq!(normalize_value(&json!("Alice")), "alice");
    }
}
