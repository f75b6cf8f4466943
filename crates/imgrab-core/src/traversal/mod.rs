//! Traversal engine: drives one browser session over one search results page
//! and returns the image references it found.
//!
//! Two strategies exist. The bulk grid reveals the thumbnail grid by scrolling
//! and reads it in one pass. The sequential carousel opens the full-resolution
//! viewer and steps through it until the scroll offset stops changing (see
//! [`patience::ScrollPatience`]).

mod actions;
mod carousel;
#[cfg(test)]
pub(crate) mod fake;
mod grid;
pub mod patience;
pub mod sites;

pub use sites::{CarouselSite, GridSite, InlinePolicy};

use crate::browser::{BrowserSession, DriverError};
use crate::config::{CrawlerConfig, TimingConfig};
use crate::link::LinkSet;
use crate::source::{Source, Task};
use std::time::Duration;

/// Fixed delays between page actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub after_navigate: Duration,
    pub settle: Duration,
    pub loading_poll: Duration,
    pub after_click: Duration,
    pub reload_pause: Duration,
}

impl Pacing {
    /// No delays at all; for scripted sessions.
    pub fn immediate() -> Self {
        Self {
            after_navigate: Duration::ZERO,
            settle: Duration::ZERO,
            loading_poll: Duration::ZERO,
            after_click: Duration::ZERO,
            reload_pause: Duration::ZERO,
        }
    }
}

impl From<TimingConfig> for Pacing {
    fn from(t: TimingConfig) -> Self {
        Self {
            after_navigate: Duration::from_millis(t.after_navigate_ms),
            settle: Duration::from_millis(t.settle_ms),
            loading_poll: Duration::from_millis(t.loading_poll_ms),
            after_click: Duration::from_millis(t.after_click_ms),
            reload_pause: Duration::from_millis(t.reload_pause_ms),
        }
    }
}

/// How a source's results page is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    BulkGrid(GridSite),
    SequentialCarousel(CarouselSite),
}

impl Strategy {
    pub fn for_source(source: Source) -> Self {
        match source {
            Source::Google => Strategy::BulkGrid(sites::GOOGLE_GRID),
            Source::Naver => Strategy::BulkGrid(sites::NAVER_GRID),
            Source::GoogleFull => Strategy::SequentialCarousel(sites::GOOGLE_CAROUSEL),
            Source::NaverFull => Strategy::SequentialCarousel(sites::NAVER_CAROUSEL),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TraversalEngine {
    pacing: Pacing,
    click_timeout: Duration,
}

impl TraversalEngine {
    pub fn new(pacing: Pacing, click_timeout: Duration) -> Self {
        Self {
            pacing,
            click_timeout,
        }
    }

    pub fn from_config(cfg: &CrawlerConfig) -> Self {
        Self::new(cfg.timing().into(), cfg.click_timeout())
    }

    pub fn pacing(&self) -> &Pacing {
        &self.pacing
    }

    pub fn click_timeout(&self) -> Duration {
        self.click_timeout
    }

    /// Collects `task`'s references and closes `session`, whether or not the
    /// traversal succeeded.
    pub fn collect<S: BrowserSession>(
        &self,
        mut session: S,
        task: &Task,
    ) -> Result<LinkSet, DriverError> {
        let strategy = Strategy::for_source(task.source);
        let result = self.run(&mut session, &strategy, &task.search_url());
        if let Err(e) = session.close() {
            tracing::warn!(keyword = %task.keyword, source = %task.source, "closing browser failed: {}", e);
        }
        let links = result?;
        tracing::info!(
            keyword = %task.keyword,
            source = %task.source,
            links = links.len(),
            "traversal finished"
        );
        Ok(links)
    }

    /// Navigates to `url` and walks it with `strategy`, returning deduplicated references.
    pub fn run<S: BrowserSession>(
        &self,
        session: &mut S,
        strategy: &Strategy,
        url: &str,
    ) -> Result<LinkSet, DriverError> {
        tracing::debug!(url, "navigating");
        session.navigate(url)?;
        actions::pause(self.pacing.after_navigate);

        let references = match strategy {
            Strategy::BulkGrid(site) => grid::collect(self, session, site)?,
            Strategy::SequentialCarousel(site) => carousel::collect(self, session, site)?,
        };
        Ok(LinkSet::from_discovered(references))
    }
}

#[cfg(test)]
mod tests {
    use super::fake::{FakeImage, FakeSession};
    use super::*;

    fn engine() -> TraversalEngine {
        TraversalEngine::new(Pacing::immediate(), Duration::ZERO)
    }

    fn task(source: Source) -> Task {
        Task {
            keyword: "red fox".to_string(),
            source,
            face_filter: false,
        }
    }

    #[test]
    fn strategy_follows_resolution_mode() {
        assert!(matches!(
            Strategy::for_source(Source::Google),
            Strategy::BulkGrid(_)
        ));
        assert!(matches!(
            Strategy::for_source(Source::NaverFull),
            Strategy::SequentialCarousel(_)
        ));
    }

    #[test]
    fn pacing_from_timing() {
        let pacing = Pacing::from(TimingConfig::default());
        assert_eq!(pacing.settle, Duration::from_millis(200));
        assert_eq!(pacing.reload_pause, Duration::from_secs(2));
    }

    #[test]
    fn collect_dedups_and_closes_session() {
        let session = FakeSession::grid(sites::NAVER_GRID)
            .with_cell(vec![FakeImage::src("https://n.test/b.jpg")])
            .with_cell(vec![FakeImage::src("https://n.test/a.jpg")])
            .with_cell(vec![FakeImage::src("https://n.test/b.jpg")]);
        let closed = session.closed_flag();
        let navigated = session.navigated_log();

        let links = engine().collect(session, &task(Source::Naver)).unwrap();
        let refs: Vec<&str> = links.iter().map(|l| l.as_str()).collect();
        assert_eq!(refs, vec!["https://n.test/b.jpg", "https://n.test/a.jpg"]);
        assert!(closed.load(std::sync::atomic::Ordering::SeqCst));
        assert_eq!(
            navigated.lock().unwrap().as_slice(),
            [task(Source::Naver).search_url()]
        );
    }

    #[test]
    fn session_closed_after_failure() {
        let session = FakeSession::grid(sites::GOOGLE_GRID).failing_navigation();
        let closed = session.closed_flag();

        assert!(engine().collect(session, &task(Source::Google)).is_err());
        assert!(closed.load(std::sync::atomic::Ordering::SeqCst));
    }
}
