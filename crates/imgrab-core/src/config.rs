use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Which source families are crawled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcesEnabled {
    pub google: bool,
    pub naver: bool,
}

impl Default for SourcesEnabled {
    fn default() -> Self {
        Self {
            google: true,
            naver: true,
        }
    }
}

/// Traversal pacing in milliseconds (optional section in config.toml).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Pause after navigating to a search page.
    pub after_navigate_ms: u64,
    /// Settle delay after each "reveal more" scroll step.
    pub settle_ms: u64,
    /// Poll interval while a loading indicator is visible.
    pub loading_poll_ms: u64,
    /// Pause after a successful click.
    pub after_click_ms: u64,
    /// Pause after reloading the page before retrying a click.
    pub reload_pause_ms: u64,
    /// Poll interval while waiting for an element to become clickable.
    pub clickable_poll_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            after_navigate_ms: 1000,
            settle_ms: 200,
            loading_poll_ms: 100,
            after_click_ms: 1000,
            reload_pause_ms: 2000,
            clickable_poll_ms: 250,
        }
    }
}

/// Global configuration loaded from `~/.config/imgrab/config.toml`.
///
/// Built once (file defaults, then CLI overrides) and passed by reference
/// into the scheduler, traversal engine and download pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// Skip (keyword, source) pairs whose completion sentinel already exists.
    pub skip_completed: bool,
    /// Number of parallel workers, each owning one browser session at a time.
    pub worker_count: usize,
    /// Walk the full-resolution viewer instead of the thumbnail grid.
    pub full_resolution: bool,
    /// Append the per-source face-search filter to the search URL.
    pub face_filter: bool,
    /// Run the browser without a window. Unset means "auto": headless in full-resolution mode.
    #[serde(default)]
    pub headless: Option<bool>,
    /// Root of the keyword directory tree.
    pub download_path: PathBuf,
    /// Maximum successful downloads per (keyword, source); 0 = unbounded.
    pub max_per_source: usize,
    /// Proxies; each browser session picks one at random.
    #[serde(default)]
    pub proxy_pool: Vec<String>,
    /// Seconds to wait for an element to become clickable before reloading.
    pub click_timeout_secs: u64,
    #[serde(default)]
    pub sources: SourcesEnabled,
    #[serde(default)]
    pub timing: Option<TimingConfig>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            skip_completed: true,
            worker_count: 4,
            full_resolution: false,
            face_filter: false,
            headless: None,
            download_path: PathBuf::from("download"),
            max_per_source: 0,
            proxy_pool: Vec::new(),
            click_timeout_secs: 15,
            sources: SourcesEnabled::default(),
            timing: None,
        }
    }
}

impl CrawlerConfig {
    /// Effective headless flag after resolving "auto".
    pub fn headless(&self) -> bool {
        self.headless.unwrap_or(self.full_resolution)
    }

    pub fn timing(&self) -> TimingConfig {
        self.timing.unwrap_or_default()
    }

    pub fn click_timeout(&self) -> Duration {
        Duration::from_secs(self.click_timeout_secs)
    }

    /// Worker count clamped to at least one.
    pub fn workers(&self) -> usize {
        self.worker_count.max(1)
    }

    /// Replace the proxy pool, dropping blank entries.
    pub fn set_proxy_pool<I, S>(&mut self, proxies: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.proxy_pool = proxies
            .into_iter()
            .map(|p| p.as_ref().trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("imgrab")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<CrawlerConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = CrawlerConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: CrawlerConfig =
        toml::from_str(&data).with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}
