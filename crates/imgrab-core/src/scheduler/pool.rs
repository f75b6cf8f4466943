//! Fixed-size worker pool. Each worker pulls whole keyword jobs from a shared
//! queue and runs their tasks one after another, one browser session per task.

use super::tasks::KeywordJob;
use crate::browser::SessionLauncher;
use crate::config::CrawlerConfig;
use crate::downloader::Downloader;
use crate::fetch::HttpFetch;
use crate::source::Task;
use crate::traversal::TraversalEngine;
use std::collections::VecDeque;
use std::sync::{mpsc, Mutex};

/// Result of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// Links collected and the download loop ran; the sentinel is written.
    Completed { links: usize, files: usize },
    /// Launch, traversal or directory setup failed; no sentinel, a rerun retries it.
    Abandoned { reason: String },
}

/// Picks a proxy uniformly at random; `None` for an empty pool.
pub fn pick_proxy(pool: &[String]) -> Option<&str> {
    if pool.is_empty() {
        return None;
    }
    Some(pool[rand::random_range(0..pool.len())].as_str())
}

/// Runs one task: launch a session, traverse, download.
pub fn run_task<L, F>(
    cfg: &CrawlerConfig,
    engine: &TraversalEngine,
    launcher: &L,
    downloader: &Downloader<'_, F>,
    task: &Task,
) -> TaskOutcome
where
    L: SessionLauncher,
    F: HttpFetch + ?Sized,
{
    let proxy = pick_proxy(&cfg.proxy_pool);
    tracing::info!(keyword = %task.keyword, source = %task.source, proxy = ?proxy, "starting task");

    let session = match launcher.launch(proxy) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(keyword = %task.keyword, source = %task.source, "browser launch failed: {}", e);
            return TaskOutcome::Abandoned {
                reason: e.to_string(),
            };
        }
    };

    let links = match engine.collect(session, task) {
        Ok(links) => links,
        Err(e) => {
            tracing::error!(keyword = %task.keyword, source = %task.source, "traversal failed: {}", e);
            return TaskOutcome::Abandoned {
                reason: e.to_string(),
            };
        }
    };

    let label = task.source.family().label();
    match downloader.download(&task.keyword, &links, label, cfg.max_per_source) {
        Ok(report) => TaskOutcome::Completed {
            links: links.len(),
            files: report.succeeded,
        },
        Err(e) => {
            tracing::error!(keyword = %task.keyword, source = %task.source, "download failed: {:#}", e);
            TaskOutcome::Abandoned {
                reason: format!("{:#}", e),
            }
        }
    }
}

/// Runs `jobs` on `cfg.workers()` threads and returns every task outcome.
/// Returns once the queue is drained and all workers have exited.
pub fn run_pool<L, F>(
    cfg: &CrawlerConfig,
    launcher: &L,
    fetcher: &F,
    jobs: Vec<KeywordJob>,
) -> Vec<(Task, TaskOutcome)>
where
    L: SessionLauncher,
    F: HttpFetch + ?Sized,
{
    let num_workers = cfg.workers().min(jobs.len());
    if num_workers == 0 {
        return Vec::new();
    }
    let engine = TraversalEngine::from_config(cfg);
    let downloader = Downloader::new(&cfg.download_path, fetcher);
    let work: Mutex<VecDeque<KeywordJob>> = Mutex::new(jobs.into_iter().collect());
    let (tx, rx) = mpsc::channel();

    std::thread::scope(|scope| {
        for worker in 0..num_workers {
            let tx = tx.clone();
            let work = &work;
            let engine = &engine;
            let downloader = &downloader;
            scope.spawn(move || loop {
                let job = match work.lock().unwrap_or_else(|e| e.into_inner()).pop_front() {
                    Some(job) => job,
                    None => break,
                };
                tracing::debug!(worker, keyword = %job.keyword, tasks = job.tasks.len(), "picked job");
                for task in job.tasks {
                    let outcome = run_task(cfg, engine, launcher, downloader, &task);
                    if tx.send((task, outcome)).is_err() {
                        return;
                    }
                }
            });
        }
        drop(tx);
        rx.into_iter().collect()
    })
}
