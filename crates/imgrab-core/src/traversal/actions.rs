//! Page actions shared by the traversal strategies.

use super::Pacing;
use crate::browser::{BrowserSession, DriverError, Key};
use crate::retry::{run_with_retry, RetryPolicy};
use std::time::Duration;

const HIGHLIGHT_FN: &str = "function() { \
    this.setAttribute('style', 'background: yellow; border: 2px solid red;'); }";

const SCROLL_OFFSET_FN: &str = "function() { return window.pageYOffset; }";

pub(crate) fn pause(d: Duration) {
    if !d.is_zero() {
        std::thread::sleep(d);
    }
}

/// Stamps a visual highlight on `element` so a watched (headful) run shows progress.
pub(crate) fn highlight<S: BrowserSession>(
    session: &mut S,
    element: &S::Element,
) -> Result<(), DriverError> {
    session.execute_script(HIGHLIGHT_FN, Some(element))?;
    Ok(())
}

/// Current vertical scroll offset of the page.
pub(crate) fn scroll_offset<S: BrowserSession>(session: &mut S) -> Result<f64, DriverError> {
    let value = session.execute_script(SCROLL_OFFSET_FN, None)?;
    value
        .as_f64()
        .ok_or_else(|| DriverError::Other(format!("scroll offset is not a number: {value}")))
}

/// Waits for `selector` to become clickable and clicks it.
///
/// When the wait times out (or the click fails) the page is reloaded and the
/// whole wait-and-click starts over, as often as `policy` allows.
pub(crate) fn wait_and_click<S: BrowserSession>(
    session: &mut S,
    selector: &str,
    timeout: Duration,
    policy: RetryPolicy,
) -> Result<S::Element, DriverError> {
    run_with_retry(
        &policy,
        session,
        |s| {
            let element = s.wait_for_clickable(selector, timeout)?;
            s.click(&element)?;
            if let Err(e) = highlight(s, &element) {
                tracing::debug!(selector, "highlight failed: {}", e);
            }
            Ok(element)
        },
        |s, err| {
            tracing::warn!(selector, "click failed ({}), reloading page", err);
            if let Err(e) = s.reload() {
                tracing::warn!(selector, "reload failed: {}", e);
            }
        },
    )
}

/// Sends `key` to the element at `selector`, re-locating it once if it went stale.
pub(crate) fn press<S: BrowserSession>(
    session: &mut S,
    target: &mut S::Element,
    selector: &str,
    key: Key,
) -> Result<(), DriverError> {
    match session.send_key(target, key) {
        Err(e) if e.is_stale() => {
            *target = session.find_element(selector)?;
            session.send_key(target, key)
        }
        other => other,
    }
}

/// Sends `steps` PageDown presses, settling between each, to reveal lazily loaded items.
pub(crate) fn reveal<S: BrowserSession>(
    session: &mut S,
    target: &mut S::Element,
    selector: &str,
    steps: usize,
    pacing: &Pacing,
) {
    for step in 0..steps {
        if let Err(e) = press(session, target, selector, Key::PageDown) {
            tracing::debug!(step, "scroll step failed: {}", e);
        }
        pause(pacing.settle);
    }
}
