//! Sequential-carousel strategy: open the first result in the viewer and walk
//! forward one item at a time until the page stops scrolling.

use super::actions::{highlight, pause, press, scroll_offset, wait_and_click};
use super::patience::ScrollPatience;
use super::sites::CarouselSite;
use super::{Pacing, TraversalEngine};
use crate::browser::{BrowserSession, DriverError};
use crate::retry::RetryPolicy;

pub(super) fn collect<S: BrowserSession>(
    engine: &TraversalEngine,
    session: &mut S,
    site: &CarouselSite,
) -> Result<Vec<String>, DriverError> {
    let pacing = engine.pacing();
    let mut target = session.find_element(site.key_target)?;

    let policy = RetryPolicy::Unbounded {
        pause: pacing.reload_pause,
    };
    wait_and_click(session, site.first_item, engine.click_timeout(), policy)?;
    pause(pacing.after_click);

    let mut references = Vec::new();
    let mut patience = ScrollPatience::new(site.patience);
    loop {
        match read_current(session, site, pacing) {
            Ok(found) => {
                for src in found {
                    tracing::debug!(item = references.len() + 1, "{}", truncate(&src));
                    references.push(src);
                }
            }
            Err(e) if e.is_stale() => tracing::debug!("viewer went stale, skipping item"),
            Err(e) => tracing::debug!("could not read viewer: {}", e),
        }

        for key in site.advance {
            if let Err(e) = press(session, &mut target, site.key_target, *key) {
                tracing::warn!(key = key.name(), "advance failed: {}", e);
            }
        }

        let offset = match scroll_offset(session) {
            Ok(offset) => Some(offset),
            Err(e) => {
                tracing::debug!("scroll offset unreadable: {}", e);
                None
            }
        };
        if patience.observe(offset) {
            tracing::debug!(stalls = patience.stalls(), "viewer stopped moving");
            break;
        }
    }
    Ok(references)
}

/// Image sources of the item currently shown in the viewer.
fn read_current<S: BrowserSession>(
    session: &mut S,
    site: &CarouselSite,
    pacing: &Pacing,
) -> Result<Vec<String>, DriverError> {
    let images = match site.container {
        Some(container) => {
            let pane = session.find_element(container)?;
            highlight(session, &pane)?;
            if let Some(loading) = site.loading {
                let indicator = session.find_child(&pane, loading)?;
                wait_until_hidden(session, &indicator, pacing)?;
            }
            session.find_children(&pane, site.image)?
        }
        None => session.find_elements(site.image)?,
    };

    let mut found = Vec::new();
    for image in &images {
        highlight(session, image)?;
        if let Some(src) = session.attribute(image, "src")? {
            found.push(src);
        }
    }
    Ok(found)
}

/// Polls the loading indicator until its inline style hides it.
fn wait_until_hidden<S: BrowserSession>(
    session: &mut S,
    indicator: &S::Element,
    pacing: &Pacing,
) -> Result<(), DriverError> {
    loop {
        let style = session.attribute(indicator, "style")?.unwrap_or_default();
        let compact: String = style.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.contains("display:none") {
            return Ok(());
        }
        pause(pacing.loading_poll);
    }
}

fn truncate(src: &str) -> &str {
    match src.char_indices().nth(120) {
        Some((i, _)) => &src[..i],
        None => src,
    }
}
