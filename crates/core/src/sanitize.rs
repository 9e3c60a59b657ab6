use std::sync::LazyLock;

use regex::Regex;

static NON_WORD_OR_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("sanitizer pattern is valid"));

/// Drop every character that is neither a Unicode word character nor whitespace.
///
/// Word characters are the regex crate's `\w`: alphabetic, marks, decimal
/// digits, connector punctuation and join controls. Superscripts and
/// vulgar fractions (`²`, `½`) are not decimal digits and are removed.
pub fn sanitize_text(text: &str) -> String {
    NON_WORD_OR_SPACE.replace_all(text, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_punctuation_and_markup() {
        assert_eq!(
            sanitize_text("<b>Hello</b>, world! It's 9:30."),
            "bHellob world Its 930"
        );
    }

    #[test]
    fn keeps_unicode_letters_digits_and_spacing() {
        assert_eq!(sanitize_text("Привет,  мир ２０２４ snake_case\n"), "Привет  мир ２０２４ snake_case\n");
    }

    #[test]
    fn is_idempotent() {
        for input in ["", "[Music]", "a&b <c> \"d\" — e…", "naïve café, 100%"] {
            let once = sanitize_text(input);
            assert_eq!(sanitize_text(&once), once);
        }
    }

    #[test]
    fn word_characters_follow_unicode_word_class() {
        // Marks and connector punctuation stay; other-number symbols go.
        assert_eq!(sanitize_text("x² ½ e\u{301} ‿"), "x  e\u{301} ‿");
        assert_eq!(sanitize_text("नमस्ते"), "नमस्ते");
    }

    #[test]
    fn removes_exactly_non_word_non_space_characters() {
        let input = "x-y_z 1+2=3\t!?";
        let kept: String = input
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
            .collect();
        assert_eq!(sanitize_text(input), kept);
    }
}
