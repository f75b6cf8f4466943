//! Task enumeration: keywords × enabled source families, minus completed pairs.

use crate::config::CrawlerConfig;
use crate::source::{SourceFamily, Task};
use crate::storage::KeywordDir;
use crate::url_model::sanitize_keyword;
use std::collections::HashSet;

/// All tasks for one keyword. A job is run start to finish by one worker, so
/// a keyword directory never has two writers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordJob {
    pub keyword: String,
    pub tasks: Vec<Task>,
}

fn family_enabled(cfg: &CrawlerConfig, family: SourceFamily) -> bool {
    match family {
        SourceFamily::Google => cfg.sources.google,
        SourceFamily::Naver => cfg.sources.naver,
    }
}

/// Builds one job per keyword directory in keyword order. A keyword whose
/// directory name was already claimed by an earlier keyword (`cat` and
/// `"cat"`) is dropped. With `skip_completed`, a family whose sentinel already
/// exists for the keyword is left out; keywords with nothing left to do
/// produce no job.
pub fn enumerate_jobs(cfg: &CrawlerConfig, keywords: &[String]) -> Vec<KeywordJob> {
    let mut jobs = Vec::new();
    let mut claimed = HashSet::new();
    for keyword in keywords {
        let Some(dir_name) = sanitize_keyword(keyword) else {
            tracing::warn!("skipping unusable keyword {:?}", keyword);
            continue;
        };
        if !claimed.insert(dir_name.clone()) {
            tracing::warn!(
                "skipping keyword {:?}: directory {:?} belongs to an earlier keyword",
                keyword,
                dir_name
            );
            continue;
        }
        let dir = KeywordDir::new(&cfg.download_path, &dir_name);

        let mut tasks = Vec::new();
        for family in SourceFamily::ALL {
            if !family_enabled(cfg, family) {
                continue;
            }
            if cfg.skip_completed && dir.is_complete(family.label()) {
                tracing::info!(keyword = %keyword, source = %family, "already complete, skipping");
                continue;
            }
            tasks.push(Task {
                keyword: keyword.clone(),
                source: family.source(cfg.full_resolution),
                face_filter: cfg.face_filter,
            });
        }
        if !tasks.is_empty() {
            jobs.push(KeywordJob {
                keyword: keyword.clone(),
                tasks,
            });
        }
    }
    jobs
}

/// Flat task list in execution order.
pub fn enumerate_tasks(cfg: &CrawlerConfig, keywords: &[String]) -> Vec<Task> {
    enumerate_jobs(cfg, keywords)
        .into_iter()
        .flat_map(|job| job.tasks)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Source;
    use tempfile::tempdir;

    fn keywords(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| k.to_string()).collect()
    }

    #[test]
    fn crosses_keywords_with_enabled_families() {
        let cfg = CrawlerConfig {
            full_resolution: true,
            face_filter: true,
            ..CrawlerConfig::default()
        };
        let tasks = enumerate_tasks(&cfg, &keywords(&["cat", "dog"]));
        let pairs: Vec<(&str, Source)> = tasks.iter().map(|t| (t.keyword.as_str(), t.source)).collect();
        assert_eq!(
            pairs,
            vec![
                ("cat", Source::GoogleFull),
                ("cat", Source::NaverFull),
                ("dog", Source::GoogleFull),
                ("dog", Source::NaverFull),
            ]
        );
        assert!(tasks.iter().all(|t| t.face_filter));
    }

    #[test]
    fn disabled_family_is_omitted() {
        let mut cfg = CrawlerConfig::default();
        cfg.sources.google = false;
        let tasks = enumerate_tasks(&cfg, &keywords(&["cat"]));
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].source, Source::Naver);
    }

    #[test]
    fn completed_family_skipped_only_when_requested() {
        let root = tempdir().unwrap();
        let dir = KeywordDir::new(root.path(), "cat");
        dir.ensure().unwrap();
        dir.mark_complete("google").unwrap();

        let mut cfg = CrawlerConfig {
            download_path: root.path().to_path_buf(),
            ..CrawlerConfig::default()
        };
        let jobs = enumerate_jobs(&cfg, &keywords(&["cat"]));
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].tasks.len(), 1);
        assert_eq!(jobs[0].tasks[0].source, Source::Naver);

        cfg.skip_completed = false;
        assert_eq!(enumerate_tasks(&cfg, &keywords(&["cat"])).len(), 2);
    }

    #[test]
    fn keywords_sharing_a_directory_get_one_job() {
        let jobs = enumerate_jobs(
            &CrawlerConfig::default(),
            &keywords(&["cat", "dog", "\"cat\"", " cat."]),
        );
        let names: Vec<&str> = jobs.iter().map(|j| j.keyword.as_str()).collect();
        assert_eq!(names, vec!["cat", "dog"]);
    }

    #[test]
    fn fully_complete_keyword_has_no_job() {
        let root = tempdir().unwrap();
        let dir = KeywordDir::new(root.path(), "cat");
        dir.ensure().unwrap();
        dir.mark_complete("google").unwrap();
        dir.mark_complete("naver").unwrap();
        let cfg = CrawlerConfig {
            download_path: root.path().to_path_buf(),
            ..CrawlerConfig::default()
        };
        assert!(enumerate_jobs(&cfg, &keywords(&["cat", "\"\""])).is_empty());
    }
}
