//! Keyword list loading.
//!
//! The keyword file is normalized in place: blank lines dropped, entries
//! trimmed, deduplicated and sorted, so the file doubles as a record of what
//! the crawl covers.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Default keyword file name, relative to the working directory.
pub const DEFAULT_KEYWORDS_FILE: &str = "keywords.txt";

/// Normalizes keyword file contents (optional UTF-8 BOM allowed).
pub fn normalize_keywords(text: &str) -> Vec<String> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Reads and normalizes the keyword file, then writes the normalized list back.
pub fn load_keywords(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read keyword file {}", path.display()))?;
    let keywords = normalize_keywords(&text);

    let mut normalized = String::new();
    for keyword in &keywords {
        normalized.push_str(keyword);
        normalized.push('\n');
    }
    fs::write(path, normalized)
        .with_context(|| format!("failed to rewrite keyword file {}", path.display()))?;

    tracing::info!(count = keywords.len(), "loaded keywords from {}", path.display());
    Ok(keywords)
}
