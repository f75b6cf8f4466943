//! Last path segment of a URL.

/// Extracts the last non-empty path segment of a URL (query and fragment ignored).
///
/// Returns `None` if the URL cannot be parsed or the path is empty/root.
pub fn last_path_segment(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path_segments()?.filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normal() {
        assert_eq!(
            last_path_segment("https://example.com/a/b/cat.JPG").as_deref(),
            Some("cat.JPG")
        );
        assert_eq!(
            last_path_segment("https://example.com/images?q=tbn:abc").as_deref(),
            Some("images")
        );
    }

    #[test]
    fn root_or_unparseable() {
        assert_eq!(last_path_segment("https://example.com/"), None);
        assert_eq!(last_path_segment("not a url"), None);
        assert_eq!(last_path_segment("data:image/gif;base64,R0lG"), None);
    }
}
