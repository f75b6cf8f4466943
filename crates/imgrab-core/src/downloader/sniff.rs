//! Content sniffing of written files.

use image::ImageFormat;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Bytes read from the start of a file; enough for every magic number `image` knows.
const HEADER_LEN: u64 = 64;

/// Detects the image format of the file at `path` from its leading bytes.
/// `Ok(None)` means the content is not a recognized image.
pub fn sniff_format(path: &Path) -> io::Result<Option<ImageFormat>> {
    let mut header = Vec::with_capacity(HEADER_LEN as usize);
    File::open(path)?.take(HEADER_LEN).read_to_end(&mut header)?;
    Ok(image::guess_format(&header).ok())
}

/// File extension used for a sniffed format (`jpg` rather than `jpeg`).
pub fn format_extension(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpg",
        other => other.extensions_str().first().copied().unwrap_or("img"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::downloader::testdata::{GIF_BYTES, JPEG_BYTES, PNG_BYTES};
    use tempfile::tempdir;

    fn sniff_bytes(bytes: &[u8]) -> Option<ImageFormat> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f");
        std::fs::write(&path, bytes).unwrap();
        sniff_format(&path).unwrap()
    }

    #[test]
    fn recognizes_common_formats() {
        assert_eq!(sniff_bytes(PNG_BYTES), Some(ImageFormat::Png));
        assert_eq!(sniff_bytes(JPEG_BYTES), Some(ImageFormat::Jpeg));
        assert_eq!(sniff_bytes(GIF_BYTES), Some(ImageFormat::Gif));
    }

    #[test]
    fn html_and_empty_are_unrecognized() {
        assert_eq!(sniff_bytes(b"<!doctype html><html></html>"), None);
        assert_eq!(sniff_bytes(b""), None);
    }

    #[test]
    fn extensions() {
        assert_eq!(format_extension(ImageFormat::Jpeg), "jpg");
        assert_eq!(format_extension(ImageFormat::Png), "png");
        assert_eq!(format_extension(ImageFormat::Gif), "gif");
        assert_eq!(format_extension(ImageFormat::WebP), "webp");
    }
}
