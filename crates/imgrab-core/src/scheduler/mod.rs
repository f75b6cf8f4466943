//! Crawl orchestration: enumerate tasks, run them on the worker pool, then
//! audit the download tree once every worker has finished.

mod pool;
mod tasks;

pub use pool::{pick_proxy, run_pool, run_task, TaskOutcome};
pub use tasks::{enumerate_jobs, enumerate_tasks, KeywordJob};

use crate::audit::{audit_and_remediate, AuditReport, Remediation};
use crate::browser::SessionLauncher;
use crate::config::CrawlerConfig;
use crate::fetch::HttpFetch;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// What a crawl did.
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub tasks: usize,
    pub completed: usize,
    pub abandoned: usize,
    pub files_written: usize,
    pub audit: AuditReport,
    /// Directories removed by the post-crawl remediation.
    pub removed: Vec<PathBuf>,
}

/// Runs the full crawl for `keywords` and returns after the post-crawl audit
/// (and `decide`, when anything is flagged) has resolved.
///
/// Fails before starting any task when the browser cannot run on this host.
/// Individual task failures are counted in the summary, not returned.
pub fn run_crawl<L, F, D>(
    cfg: &CrawlerConfig,
    keywords: &[String],
    launcher: &L,
    fetcher: &F,
    decide: D,
) -> Result<CrawlSummary>
where
    L: SessionLauncher,
    F: HttpFetch + ?Sized,
    D: FnMut(&AuditReport) -> Remediation,
{
    launcher.preflight().context("browser preflight failed")?;

    let jobs = enumerate_jobs(cfg, keywords);
    let task_count: usize = jobs.iter().map(|j| j.tasks.len()).sum();
    tracing::info!(
        keywords = keywords.len(),
        jobs = jobs.len(),
        tasks = task_count,
        workers = cfg.workers(),
        "starting crawl"
    );

    let outcomes = run_pool(cfg, launcher, fetcher, jobs);

    let mut completed = 0;
    let mut abandoned = 0;
    let mut files_written = 0;
    for (task, outcome) in &outcomes {
        match outcome {
            TaskOutcome::Completed { files, .. } => {
                completed += 1;
                files_written += files;
            }
            TaskOutcome::Abandoned { reason } => {
                abandoned += 1;
                tracing::warn!(keyword = %task.keyword, source = %task.source, "abandoned: {}", reason);
            }
        }
    }
    tracing::info!(completed, abandoned, files_written, "crawl finished");

    let (audit, removed) = audit_and_remediate(&cfg.download_path, decide)?;
    Ok(CrawlSummary {
        tasks: task_count,
        completed,
        abandoned,
        files_written,
        audit,
        removed,
    })
}
