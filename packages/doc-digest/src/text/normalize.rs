//! Whitespace and punctuation cleanup applied before and between model passes.

use regex::Regex;
use std::sync::LazyLock;

static RE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

// Table-of-contents leaders and similar dot runs
static RE_DOT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.{4,}").expect("valid dot run regex"));

/// Normalize text for summarization.
///
/// Newlines and whitespace runs become a single space, a space before a
/// period is dropped, runs of four or more dots become an ellipsis and the
/// result is trimmed. `normalize(normalize(x)) == normalize(x)`.
pub fn normalize(text: &str) -> String {
    let collapsed = RE_WHITESPACE.replace_all(text, " ");
    let tightened = collapsed.replace(" .", ".");
    let dotted = RE_DOT_RUN.replace_all(&tightened, "...");
    dotted.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_collapses_newlines_and_spaces() {
        assert_eq!(
            normalize("The Council\n\nmet   today\t .\n"),
            "The Council met today."
        );
    }

    #[test]
    fn test_collapses_leader_dots() {
        assert_eq!(normalize("Introduction .......... 4"), "Introduction... 4");
    }

    #[test]
    fn test_keeps_short_ellipsis() {
        assert_eq!(normalize("and so on..."), "and so on...");
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    proptest! {
        #[test]
        fn proptest_normalize_is_idempotent(text in "[a-zA-Z .\n\t!?]{0,200}") {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once);
        }

        #[test]
        fn proptest_normalize_leaves_no_whitespace_runs(text in "[a-z .\n\r\t]{0,120}") {
            let normalized = normalize(&text);
            prop_assert!(!normalized.contains("  "));
            prop_assert!(!normalized.contains('\n'));
            prop_assert!(!normalized.contains(" ."));
        }
    }
}
