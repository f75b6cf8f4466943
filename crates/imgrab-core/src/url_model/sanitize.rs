//! Keyword to directory-name sanitization.

/// Derives a directory name from a search keyword.
///
/// - Removes double quotes (used in keywords for exact-phrase search)
/// - Replaces `/`, `\`, NUL and control characters with `_`
/// - Trims surrounding whitespace and dots
///
/// Returns `None` when nothing usable remains.
pub fn sanitize_keyword(keyword: &str) -> Option<String> {
    let cleaned: String = keyword
        .chars()
        .filter(|&c| c != '"')
        .map(|c| {
            if c == '/' || c == '\\' || c == '\0' || c.is_control() {
                '_'
            } else {
                c
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches(|c: char| c.is_whitespace() || c == '.');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_quotes_and_keeps_spaces() {
        assert_eq!(
            sanitize_keyword("\"golden retriever\" puppy").as_deref(),
            Some("golden retriever puppy")
        );
    }

    #[test]
    fn replaces_separators() {
        assert_eq!(sanitize_keyword("cats/dogs\\x").as_deref(), Some("cats_dogs_x"));
        assert_eq!(sanitize_keyword("a\tb").as_deref(), Some("a_b"));
    }

    #[test]
    fn rejects_empty_and_dot_names() {
        assert_eq!(sanitize_keyword("\"\""), None);
        assert_eq!(sanitize_keyword(" .. "), None);
    }

    #[test]
    fn non_ascii_is_kept() {
        assert_eq!(sanitize_keyword("고양이").as_deref(), Some("고양이"));
    }
}
