//! Company name normalization
//!
//! Turns free-form company names ("NVIDIA CORP", "Apple Inc.") into the
//! canonical lookup key used by the ticker resolver ("nvidia", "apple").

use regex::Regex;
use std::sync::LazyLock;

static NON_ALNUM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^a-z0-9\s]").expect("valid regex")
});

static CORPORATE_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(inc|corp|co|ltd|plc|sa|nv|se|llc|lp|group|holdings|international|limited|technologies|solutions|systems|enterprises?)\b",
    )
    .expect("valid regex")
});

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Normalize a company name or ticker into a lookup key
///
/// Lower-cases, drops punctuation, removes corporate suffix words, and
/// collapses whitespace. Total and idempotent.
pub fn normalize_title(name: &str) -> String {
    let lowered = name.to_lowercase();
    let stripped = NON_ALNUM.replace_all(&lowered, "");
    let without_suffix = CORPORATE_SUFFIX.replace_all(&stripped, "");
    WHITESPACE
        .replace_all(&without_suffix, " ")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_strips_suffix_and_punctuation() {
        assert_eq!(normalize_title("Apple Inc."), "apple");
        assert_eq!(normalize_title("NVIDIA CORP"), "nvidia");
        assert_eq!(normalize_title("Microsoft Corp"), "microsoft");
        assert_eq!(normalize_title("Alphabet Inc."), "alphabet");
    }

    #[test]
    fn test_only_whole_words_removed() {
        // "co" inside "coca" and "cola" must survive
        assert_eq!(normalize_title("Coca-Cola Co"), "cocacola");
        assert_eq!(normalize_title("Incyte Corp"), "incyte");
    }

    #[test]
    fn test_enterprise_singular_and_plural() {
        assert_eq!(normalize_title("Acme Enterprise"), "acme");
        assert_eq!(normalize_title("Acme Enterprises"), "acme");
    }

    #[test]
    fn test_collapses_whitespace() {
        assert_eq!(
            normalize_title("  Berkshire   Hathaway\tInc  "),
            "berkshire hathaway"
        );
        assert_eq!(normalize_title("Johnson & Johnson"), "johnson johnson");
    }

    #[test]
    fn test_total_on_degenerate_input() {
        assert_eq!(normalize_title(""), "");
        assert_eq!(normalize_title("!!!"), "");
        assert_eq!(normalize_title("Holdings Group Ltd"), "");
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "Apple Inc.",
            "NVIDIA CORP",
            "  Co  Co Inc ",
            "T-Mobile US, Inc.",
            "Über Technologies Inc",
            "3M Co",
            "",
            "Invalid Company",
            "abc co\u{a0}def",
        ];

        for input in inputs {
            let once = normalize_title(input);
            assert_eq!(normalize_title(&once), once, "input: {input:?}");
        }
    }

    proptest! {
        #[test]
        fn prop_idempotent(input in any::<String>()) {
            let once = normalize_title(&input);
            prop_assert_eq!(normalize_title(&once), once);
        }

        #[test]
        fn prop_output_is_canonical(input in "[A-Za-z0-9 .,&'-]{0,40}") {
            let key = normalize_title(&input);
            prop_assert!(key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == ' '));
            prop_assert!(!key.starts_with(' ') && !key.ends_with(' ') && !key.contains("  "));
        }
    }
}
