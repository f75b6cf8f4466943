//! Discovered image references and the ordered, deduplicated set handed to the downloader.

use std::collections::HashSet;
use std::hash::Hash;

const JPEG_DATA_PREFIX: &str = "data:image/jpeg;base64,";
const PNG_DATA_PREFIX: &str = "data:image/png;base64,";

/// Declared type of an inline base64 payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InlineKind {
    Jpeg,
    Png,
}

impl InlineKind {
    /// Output extension used for payloads of this kind.
    pub fn extension(self) -> &'static str {
        match self {
            InlineKind::Jpeg => "jpg",
            InlineKind::Png => "png",
        }
    }
}

/// One image reference as read from the page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LinkRecord {
    /// A fetchable URI.
    Remote(String),
    /// An inline `data:` URI with a recognized image type.
    Inline { kind: InlineKind, data_uri: String },
}

impl LinkRecord {
    /// Classifies a raw `src` value.
    pub fn from_reference(reference: impl Into<String>) -> Self {
        let reference = reference.into();
        if reference.starts_with(JPEG_DATA_PREFIX) {
            LinkRecord::Inline {
                kind: InlineKind::Jpeg,
                data_uri: reference,
            }
        } else if reference.starts_with(PNG_DATA_PREFIX) {
            LinkRecord::Inline {
                kind: InlineKind::Png,
                data_uri: reference,
            }
        } else {
            LinkRecord::Remote(reference)
        }
    }

    /// The reference exactly as discovered.
    pub fn as_str(&self) -> &str {
        match self {
            LinkRecord::Remote(uri) => uri,
            LinkRecord::Inline { data_uri, .. } => data_uri,
        }
    }

    /// Base64 text after the `data:...;base64,` header, for inline records.
    pub fn inline_payload(&self) -> Option<&str> {
        match self {
            LinkRecord::Remote(_) => None,
            LinkRecord::Inline { data_uri, .. } => {
                data_uri.split_once(',').map(|(_, encoded)| encoded)
            }
        }
    }

    /// Short form for log lines (inline payloads can be megabytes).
    pub fn display_short(&self) -> String {
        match self {
            LinkRecord::Remote(uri) => uri.clone(),
            LinkRecord::Inline { kind, data_uri } => {
                format!("<inline {:?}, {} bytes>", kind, data_uri.len())
            }
        }
    }
}

/// Keeps the first occurrence of each value, preserving order.
pub fn dedup_first_seen<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Ordered, duplicate-free references for one task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSet {
    records: Vec<LinkRecord>,
}

impl LinkSet {
    /// Builds a set from raw references in discovery order, dropping later duplicates.
    pub fn from_discovered<I, S>(references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique = dedup_first_seen(references.into_iter().map(Into::into));
        Self {
            records: unique.into_iter().map(LinkRecord::from_reference).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LinkRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a LinkSet {
    type Item = &'a LinkRecord;
    type IntoIter = std::slice::Iter<'a, LinkRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_keeps_first_occurrence_order() {
        assert_eq!(
            dedup_first_seen(["b", "a", "b", "c", "a"]),
            vec!["b", "a", "c"]
        );
    }

    #[test]
    fn link_set_from_discovered() {
        let set = LinkSet::from_discovered([
            "https://x/b.jpg",
            "https://x/a.jpg",
            "https://x/b.jpg",
        ]);
        let refs: Vec<&str> = set.iter().map(LinkRecord::as_str).collect();
        assert_eq!(refs, vec!["https://x/b.jpg", "https://x/a.jpg"]);
    }

    #[test]
    fn classifies_inline_payloads() {
        let png = LinkRecord::from_reference("data:image/png;base64,iVBORw0KGgo=");
        assert!(matches!(
            png,
            LinkRecord::Inline {
                kind: InlineKind::Png,
                ..
            }
        ));
        assert_eq!(png.inline_payload(), Some("iVBORw0KGgo="));

        let jpeg = LinkRecord::from_reference("data:image/jpeg;base64,/9j/4AAQ");
        assert!(matches!(
            jpeg,
            LinkRecord::Inline {
                kind: InlineKind::Jpeg,
                ..
            }
        ));
    }

    #[test]
    fn other_references_are_remote() {
        assert_eq!(
            LinkRecord::from_reference("https://example.com/cat.png"),
            LinkRecord::Remote("https://example.com/cat.png".into())
        );
        // Only jpeg/png payloads are recognized inline types.
        assert!(matches!(
            LinkRecord::from_reference("data:image/gif;base64,R0lGOD"),
            LinkRecord::Remote(_)
        ));
    }
}
