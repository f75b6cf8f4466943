//! Imbalance auditor: flags keyword directories holding far fewer files than
//! the average and optionally removes them so a resumed crawl refills them.

use crate::storage::{keyword_dirs, KeywordDir};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Directories below this fraction of the mean count are flagged.
pub const IMBALANCE_RATIO: f64 = 0.5;

/// File count of one keyword directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordCount {
    pub path: PathBuf,
    pub files: usize,
}

impl KeywordCount {
    /// Directory name, which is the sanitized keyword.
    pub fn keyword(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AuditReport {
    pub counts: Vec<KeywordCount>,
    pub mean: f64,
    /// Under-populated directories, in path order.
    pub flagged: Vec<KeywordCount>,
}

impl AuditReport {
    /// Computes the report from already gathered counts.
    pub fn from_counts(counts: Vec<KeywordCount>) -> Self {
        if counts.is_empty() {
            return Self {
                counts,
                mean: 0.0,
                flagged: Vec::new(),
            };
        }
        let total: usize = counts.iter().map(|c| c.files).sum();
        let mean = total as f64 / counts.len() as f64;
        let threshold = mean * IMBALANCE_RATIO;
        let flagged = counts
            .iter()
            .filter(|c| (c.files as f64) < threshold)
            .cloned()
            .collect();
        Self {
            counts,
            mean,
            flagged,
        }
    }

    pub fn is_balanced(&self) -> bool {
        self.flagged.is_empty()
    }

    pub fn threshold(&self) -> f64 {
        self.mean * IMBALANCE_RATIO
    }
}

/// What to do with flagged directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remediation {
    Keep,
    RemoveFlagged,
}

/// Counts files in every keyword directory under `root`.
pub fn audit(root: &Path) -> Result<AuditReport> {
    let dirs = keyword_dirs(root)
        .with_context(|| format!("failed to list {}", root.display()))?;
    let mut counts = Vec::with_capacity(dirs.len());
    for dir in dirs {
        let files = dir
            .file_count()
            .with_context(|| format!("failed to count {}", dir.path().display()))?;
        counts.push(KeywordCount {
            path: dir.path().to_path_buf(),
            files,
        });
    }
    Ok(AuditReport::from_counts(counts))
}

/// Audits `root` and, when directories are flagged, asks `decide` what to do.
/// `decide` is not called for a balanced tree. Returns the report and the
/// directories that were removed.
pub fn audit_and_remediate<D>(root: &Path, mut decide: D) -> Result<(AuditReport, Vec<PathBuf>)>
where
    D: FnMut(&AuditReport) -> Remediation,
{
    let report = audit(root)?;
    if report.is_balanced() {
        tracing::info!(
            directories = report.counts.len(),
            mean = report.mean,
            "keyword directories are balanced"
        );
        return Ok((report, Vec::new()));
    }

    for flagged in &report.flagged {
        tracing::warn!(
            keyword = %flagged.keyword(),
            files = flagged.files,
            threshold = report.threshold(),
            "under-populated keyword directory"
        );
    }

    let mut removed = Vec::new();
    if decide(&report) == Remediation::RemoveFlagged {
        for flagged in &report.flagged {
            fs::remove_dir_all(&flagged.path)
                .with_context(|| format!("failed to remove {}", flagged.path.display()))?;
            tracing::info!("removed {}", flagged.path.display());
            removed.push(flagged.path.clone());
        }
    }
    Ok((report, removed))
}

/// Per-directory view used by the status listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordStatus {
    pub count: KeywordCount,
    /// Labels whose completion sentinel exists.
    pub completed: Vec<&'static str>,
}

/// File counts plus completed source labels for every keyword directory.
pub fn status(root: &Path, labels: &[&'static str]) -> Result<Vec<KeywordStatus>> {
    let report = audit(root)?;
    Ok(report
        .counts
        .into_iter()
        .map(|count| {
            let dir = KeywordDir::new(root, &count.keyword());
            let completed = labels
                .iter()
                .copied()
                .filter(|label| dir.is_complete(label))
                .collect();
            KeywordStatus { count, completed }
        })
        .collect())
}
