//! Transfer of a single link record to disk, followed by sniff-and-correct.

use super::sniff::{format_extension, sniff_format};
use super::DownloadResult;
use crate::fetch::{FetchError, HttpFetch};
use crate::link::LinkRecord;
use crate::storage::KeywordDir;
use crate::url_model::extension_from_link;
use base64::Engine;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::Path;
use thiserror::Error;

/// Failure of one record's transfer; the pipeline logs it and moves on.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("inline payload: {0}")]
    Decode(#[from] base64::DecodeError),
    #[error("inline payload has no data section")]
    MissingPayload,
    #[error("fetch: {0}")]
    Fetch(#[from] FetchError),
    #[error("io: {0}")]
    Io(#[from] io::Error),
}

fn decode_inline(record: &LinkRecord) -> Result<Vec<u8>, RecordError> {
    let encoded = record.inline_payload().ok_or(RecordError::MissingPayload)?;
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    Ok(base64::engine::general_purpose::STANDARD.decode(compact)?)
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), "could not remove file: {}", e);
        }
    }
}

/// Writes `record` as `<label>_<index>.<ext>` in `dir`, then validates the content.
///
/// Unrecognizable content is deleted and reported as unsuccessful. A recognized
/// format that disagrees with the guessed extension is renamed.
pub(super) fn download_record<F: HttpFetch + ?Sized>(
    fetcher: &F,
    dir: &KeywordDir,
    label: &str,
    index: usize,
    record: &LinkRecord,
) -> Result<DownloadResult, RecordError> {
    let provisional = match record {
        LinkRecord::Inline { kind, .. } => kind.extension(),
        LinkRecord::Remote(uri) => extension_from_link(uri),
    };
    let path = dir.file_path(label, index, provisional);

    match record {
        LinkRecord::Inline { .. } => {
            let bytes = decode_inline(record)?;
            fs::write(&path, bytes)?;
        }
        LinkRecord::Remote(uri) => {
            let file = File::create(&path)?;
            let mut sink = BufWriter::new(file);
            if let Err(e) = fetcher.fetch_into(uri, &mut sink) {
                drop(sink);
                remove_quietly(&path);
                return Err(e.into());
            }
            if let Err(e) = sink.into_inner() {
                remove_quietly(&path);
                return Err(e.into_error().into());
            }
        }
    }

    let sniffed = match sniff_format(&path) {
        Ok(sniffed) => sniffed,
        Err(e) => {
            remove_quietly(&path);
            return Err(e.into());
        }
    };
    let Some(format) = sniffed else {
        tracing::warn!(index, url = %record.display_short(), "unreadable image, removing");
        remove_quietly(&path);
        return Ok(DownloadResult {
            index,
            final_path: None,
            success: false,
            detected_format: None,
        });
    };

    let actual = format_extension(format);
    let final_path = if actual != provisional {
        let corrected = dir.file_path(label, index, actual);
        match fs::rename(&path, &corrected) {
            Ok(()) => {
                tracing::debug!(index, "extension changed: {} -> {}", provisional, actual);
                corrected
            }
            Err(e) => {
                tracing::warn!(index, "keeping .{} name, rename to .{} failed: {}", provisional, actual, e);
                path
            }
        }
    } else {
        path
    };

    Ok(DownloadResult {
        index,
        final_path: Some(final_path),
        success: true,
        detected_format: Some(format),
    })
}
