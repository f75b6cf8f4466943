//! Download pipeline.
//!
//! Turns one task's [`LinkSet`] into files under `<root>/<keyword>/`, capped at
//! `max_count` successes, validating each written file by sniffing its bytes.
//! When the loop ends (capped, exhausted or all failed) the source's
//! completion sentinel is written, marking the pair as attempted.

mod record;
mod sniff;
#[cfg(test)]
pub(crate) mod testdata;

pub use record::RecordError;
pub use sniff::{format_extension, sniff_format};

use crate::fetch::HttpFetch;
use crate::link::LinkSet;
use crate::storage::KeywordDir;
use crate::url_model::sanitize_keyword;
use anyhow::{anyhow, Result};
use image::ImageFormat;
use std::path::{Path, PathBuf};

/// Outcome for one attempted record.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadResult {
    /// Position of the record in the link set (also the file-name index).
    pub index: usize,
    /// Final location on disk; `None` when nothing was kept.
    pub final_path: Option<PathBuf>,
    pub success: bool,
    pub detected_format: Option<ImageFormat>,
}

/// Summary of one `download` call.
#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    /// Records actually attempted (records past the cap are never attempted).
    pub attempted: usize,
    pub succeeded: usize,
    pub results: Vec<DownloadResult>,
}

/// Downloads link sets into the keyword tree under `root`.
pub struct Downloader<'a, F: HttpFetch + ?Sized> {
    root: PathBuf,
    fetcher: &'a F,
}

impl<'a, F: HttpFetch + ?Sized> Downloader<'a, F> {
    pub fn new(root: impl Into<PathBuf>, fetcher: &'a F) -> Self {
        Self {
            root: root.into(),
            fetcher,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Downloads `links` for `keyword`, naming files `<label>_<0000>.<ext>`.
    ///
    /// `max_count == 0` means unbounded. Individual record failures are logged
    /// and skipped. Errors only when the keyword directory or sentinel cannot be
    /// created.
    pub fn download(
        &self,
        keyword: &str,
        links: &LinkSet,
        label: &str,
        max_count: usize,
    ) -> Result<DownloadReport> {
        let dir_name =
            sanitize_keyword(keyword).ok_or_else(|| anyhow!("unusable keyword {:?}", keyword))?;
        let dir = KeywordDir::new(&self.root, &dir_name);
        dir.ensure()?;

        let max_count = if max_count == 0 { links.len() } else { max_count };
        let mut report = DownloadReport::default();

        for (index, link) in links.iter().enumerate() {
            if report.succeeded >= max_count {
                break;
            }
            tracing::debug!(
                keyword,
                source = label,
                index,
                "downloading {} / {}",
                report.succeeded + 1,
                max_count
            );
            report.attempted += 1;

            match record::download_record(self.fetcher, &dir, label, index, link) {
                Ok(result) => {
                    if result.success {
                        report.succeeded += 1;
                    }
                    report.results.push(result);
                }
                Err(e) => {
                    tracing::warn!(
                        keyword,
                        source = label,
                        index,
                        url = %link.display_short(),
                        "download failed: {}",
                        e
                    );
                    report.results.push(DownloadResult {
                        index,
                        final_path: None,
                        success: false,
                        detected_format: None,
                    });
                }
            }
        }

        dir.mark_complete(label)?;
        tracing::info!(
            keyword,
            source = label,
            succeeded = report.succeeded,
            attempted = report.attempted,
            total = links.len(),
            "download finished"
        );
        Ok(report)
    }
}
