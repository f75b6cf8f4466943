//! On-disk layout of the download tree.
//!
//! `<root>/<keyword>/<label>_<0000>.<ext>` for images and `<root>/<keyword>/<label>_done`
//! as the zero-byte completion sentinel. Sentinels are the only state kept
//! across runs.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

/// Suffix of completion sentinel files.
pub const SENTINEL_SUFFIX: &str = "_done";

/// One keyword's directory under the download root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordDir {
    path: PathBuf,
}

impl KeywordDir {
    /// `dir_name` must already be sanitized (see `url_model::sanitize_keyword`).
    pub fn new(root: &Path, dir_name: &str) -> Self {
        Self {
            path: root.join(dir_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates the directory (and the root) if missing.
    pub fn ensure(&self) -> Result<()> {
        fs::create_dir_all(&self.path)
            .with_context(|| format!("failed to create {}", self.path.display()))
    }

    /// Path of record `index` for `label` with extension `ext`.
    pub fn file_path(&self, label: &str, index: usize, ext: &str) -> PathBuf {
        self.path.join(format!("{}_{:04}.{}", label, index, ext))
    }

    pub fn sentinel_path(&self, label: &str) -> PathBuf {
        self.path.join(format!("{}{}", label, SENTINEL_SUFFIX))
    }

    pub fn is_complete(&self, label: &str) -> bool {
        self.sentinel_path(label).is_file()
    }

    /// Writes the zero-byte sentinel for `label`. Rewriting an existing one is harmless.
    pub fn mark_complete(&self, label: &str) -> Result<()> {
        let path = self.sentinel_path(label);
        File::create(&path)
            .with_context(|| format!("failed to write sentinel {}", path.display()))?;
        Ok(())
    }

    /// Number of regular files directly inside the directory (sentinels included).
    pub fn file_count(&self) -> io::Result<usize> {
        let mut count = 0;
        for entry in fs::read_dir(&self.path)? {
            if entry?.file_type()?.is_file() {
                count += 1;
            }
        }
        Ok(count)
    }
}

/// All keyword directories directly under `root`, sorted by path.
/// A missing root yields an empty list.
pub fn keyword_dirs(root: &Path) -> io::Result<Vec<KeywordDir>> {
    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e),
    };
    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            dirs.push(KeywordDir { path: entry.path() });
        }
    }
    dirs.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(dirs)
}
