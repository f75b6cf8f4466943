//! Bulk-grid strategy: reveal the whole thumbnail grid, then read it in one pass.

use super::actions::{pause, reveal, wait_and_click};
use super::sites::{GridSite, InlinePolicy};
use super::TraversalEngine;
use crate::browser::{BrowserSession, DriverError};
use crate::link::LinkRecord;
use crate::retry::RetryPolicy;

pub(super) fn collect<S: BrowserSession>(
    engine: &TraversalEngine,
    session: &mut S,
    site: &GridSite,
) -> Result<Vec<String>, DriverError> {
    let pacing = engine.pacing();
    let mut target = session.find_element(site.scroll_target)?;
    reveal(session, &mut target, site.scroll_target, site.reveal_steps, pacing);

    if let Some(selector) = site.load_more {
        match wait_and_click(session, selector, engine.click_timeout(), RetryPolicy::once()) {
            Ok(_) => {
                pause(pacing.after_click);
                reveal(session, &mut target, site.scroll_target, site.reveal_steps, pacing);
            }
            Err(e) => tracing::debug!(selector, "no load-more control: {}", e),
        }
    }

    let cells = session.find_elements(site.cell)?;
    tracing::debug!(cells = cells.len(), "reading grid");

    let mut references = Vec::new();
    for (i, cell) in cells.iter().enumerate() {
        match read_cell(session, site, cell) {
            Ok(found) => references.extend(found),
            Err(e) if e.is_stale() => tracing::debug!(cell = i, "cell went stale, skipping"),
            Err(e) => tracing::warn!(cell = i, "failed to read cell: {}", e),
        }
    }
    Ok(references)
}

fn read_cell<S: BrowserSession>(
    session: &mut S,
    site: &GridSite,
    cell: &S::Element,
) -> Result<Vec<String>, DriverError> {
    let mut found = Vec::new();
    match site.image {
        Some(selector) => {
            for image in session.find_children(cell, selector)? {
                found.extend(image_reference(session, site.inline, &image)?);
            }
        }
        None => found.extend(image_reference(session, site.inline, cell)?),
    }
    Ok(found)
}

/// The usable reference of one image element under `policy`, if any.
fn image_reference<S: BrowserSession>(
    session: &mut S,
    policy: InlinePolicy,
    image: &S::Element,
) -> Result<Option<String>, DriverError> {
    let src = session.attribute(image, "src")?;
    match policy {
        InlinePolicy::Reject => Ok(src.filter(|s| !s.starts_with("data:"))),
        InlinePolicy::Prefer { lazy_attr } => match src {
            Some(src) if !src.starts_with("data:") || is_inline_image(&src) => Ok(Some(src)),
            _ => session.attribute(image, lazy_attr),
        },
    }
}

fn is_inline_image(src: &str) -> bool {
    matches!(LinkRecord::from_reference(src), LinkRecord::Inline { .. })
}
