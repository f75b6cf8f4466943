//! Provisional extension guess from a link.

use super::path::last_path_segment;

/// Extension used when the link gives no recognizable hint.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Guesses an image extension from the link's last path segment.
///
/// Case-insensitive; `jpg`/`jpeg` map to `jpg`, `gif` and `png` pass through,
/// anything else falls back to [`DEFAULT_EXTENSION`]. This is a guess only:
/// the downloader corrects it after sniffing the written bytes.
pub fn extension_from_link(link: &str) -> &'static str {
    let Some(segment) = last_path_segment(link) else {
        return DEFAULT_EXTENSION;
    };
    let Some((_, ext)) = segment.rsplit_once('.') else {
        return DEFAULT_EXTENSION;
    };
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "jpg",
        "gif" => "gif",
        "png" => "png",
        _ => DEFAULT_EXTENSION,
    }
}
