//! CLI for the imgrab image collector.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use imgrab_core::config::{self, CrawlerConfig};
use imgrab_core::keywords::DEFAULT_KEYWORDS_FILE;
use std::path::PathBuf;

use commands::{run_audit, run_crawl_command, run_status};

/// Top-level CLI for imgrab.
#[derive(Debug, Parser)]
#[command(name = "imgrab")]
#[command(about = "imgrab: collect search-engine images into a keyword-organized tree", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Crawl every keyword in the keyword file, then audit the result.
    Crawl(CrawlArgs),

    /// Flag under-populated keyword directories and optionally remove them.
    Audit {
        /// Download root (default: `download_path` from config).
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,
        /// Remove flagged directories without asking.
        #[arg(long)]
        yes: bool,
    },

    /// List keyword directories, file counts and completed sources.
    Status {
        /// Download root (default: `download_path` from config).
        #[arg(long, value_name = "DIR")]
        download_dir: Option<PathBuf>,
    },
}

/// Browser window mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NoGui {
    /// Headless only in full-resolution mode.
    Auto,
    True,
    False,
}

impl NoGui {
    pub fn headless(self) -> Option<bool> {
        match self {
            NoGui::Auto => None,
            NoGui::True => Some(true),
            NoGui::False => Some(false),
        }
    }
}

/// Options for `imgrab crawl`. Unset options keep the config file's value.
#[derive(Debug, Args)]
pub struct CrawlArgs {
    /// Keyword file, one keyword per line. Rewritten normalized.
    #[arg(long, value_name = "FILE", default_value = DEFAULT_KEYWORDS_FILE)]
    pub keywords: PathBuf,
    /// Skip keyword/source pairs that already have a completion marker.
    #[arg(long, value_name = "BOOL")]
    pub skip: Option<bool>,
    /// Number of parallel browser workers.
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,
    /// Crawl Google.
    #[arg(long, value_name = "BOOL")]
    pub google: Option<bool>,
    /// Crawl Naver.
    #[arg(long, value_name = "BOOL")]
    pub naver: Option<bool>,
    /// Walk the full-resolution viewer instead of the thumbnail grid.
    #[arg(long, value_name = "BOOL")]
    pub full: Option<bool>,
    /// Restrict results to faces.
    #[arg(long, value_name = "BOOL")]
    pub face: Option<bool>,
    /// Run the browser without a window.
    #[arg(long = "no-gui", value_enum, value_name = "MODE")]
    pub no_gui: Option<NoGui>,
    /// Maximum images per keyword and source (0 = no limit).
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,
    /// Comma-separated proxies; each browser picks one at random.
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub proxy_list: Vec<String>,
    /// Download root.
    #[arg(long, value_name = "DIR")]
    pub download_dir: Option<PathBuf>,
}

impl CrawlArgs {
    /// Layers the given options over `cfg`.
    pub fn apply(&self, cfg: &mut CrawlerConfig) {
        if let Some(skip) = self.skip {
            cfg.skip_completed = skip;
        }
        if let Some(threads) = self.threads {
            cfg.worker_count = threads;
        }
        if let Some(google) = self.google {
            cfg.sources.google = google;
        }
        if let Some(naver) = self.naver {
            cfg.sources.naver = naver;
        }
        if let Some(full) = self.full {
            cfg.full_resolution = full;
        }
        if let Some(face) = self.face {
            cfg.face_filter = face;
        }
        if let Some(mode) = self.no_gui {
            cfg.headless = mode.headless();
        }
        if let Some(limit) = self.limit {
            cfg.max_per_source = limit;
        }
        if !self.proxy_list.is_empty() {
            cfg.set_proxy_pool(&self.proxy_list);
        }
        if let Some(dir) = &self.download_dir {
            cfg.download_path = dir.clone();
        }
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Crawl(args) => run_crawl_command(cfg, &args)?,
            CliCommand::Audit { download_dir, yes } => {
                let root = download_dir.unwrap_or(cfg.download_path);
                run_audit(&root, yes)?;
            }
            CliCommand::Status { download_dir } => {
                let root = download_dir.unwrap_or(cfg.download_path);
                run_status(&root)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
