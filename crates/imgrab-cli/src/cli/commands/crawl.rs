//! `imgrab crawl` – collect and download images for every keyword.

use super::audit::{print_outcome, prompt_on_terminal};
use crate::cli::CrawlArgs;
use anyhow::Result;
use imgrab_core::browser::ChromiumLauncher;
use imgrab_core::config::CrawlerConfig;
use imgrab_core::fetch::CurlFetcher;
use imgrab_core::keywords::load_keywords;
use imgrab_core::scheduler::run_crawl;
use std::time::Duration;

pub fn run_crawl_command(mut cfg: CrawlerConfig, args: &CrawlArgs) -> Result<()> {
    args.apply(&mut cfg);
    let keywords = load_keywords(&args.keywords)?;

    println!(
        "{} keywords, google={} naver={} full={} face={} headless={} workers={} limit={}",
        keywords.len(),
        cfg.sources.google,
        cfg.sources.naver,
        cfg.full_resolution,
        cfg.face_filter,
        cfg.headless(),
        cfg.workers(),
        cfg.max_per_source
    );

    let launcher = ChromiumLauncher::new(
        cfg.headless(),
        Duration::from_millis(cfg.timing().clickable_poll_ms),
    );
    let fetcher = CurlFetcher::default();
    let summary = run_crawl(&cfg, &keywords, &launcher, &fetcher, prompt_on_terminal)?;

    println!(
        "Tasks: {} completed, {} abandoned of {}; {} files written to {}",
        summary.completed,
        summary.abandoned,
        summary.tasks,
        summary.files_written,
        cfg.download_path.display()
    );
    print_outcome(&summary.audit, &summary.removed);
    Ok(())
}
