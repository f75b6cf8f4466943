//! Browser-automation capability consumed by the traversal engine.
//!
//! The engine only needs a small, blocking surface: navigate, locate elements
//! by CSS selector (page-wide or under an element), read attributes, run a
//! script, send keys, wait for clickability, click, reload and close. The
//! Chromium binding lives in [`chromium`]; tests drive scripted fakes.

pub mod chromium;

use std::time::Duration;
use thiserror::Error;

pub use chromium::{ChromiumLauncher, ChromiumSession};

/// Errors reported by a browser session.
#[derive(Debug, Error)]
pub enum DriverError {
    /// The element handle no longer refers to a live DOM node (it was replaced).
    #[error("stale element reference")]
    StaleElement,
    #[error("no element matches `{0}`")]
    NoSuchElement(String),
    #[error("`{selector}` not clickable within {timeout:?}")]
    Timeout { selector: String, timeout: Duration },
    #[error("browser launch failed: {0}")]
    Launch(String),
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),
    #[error("browser executable not found (set IMGRAB_CHROME or install chromium)")]
    MissingExecutable,
    #[error("browser: {0}")]
    Other(String),
}

impl DriverError {
    /// Element went stale mid-read; the caller abandons the current iteration.
    pub fn is_stale(&self) -> bool {
        matches!(self, DriverError::StaleElement)
    }

    /// Conditions under which no task should be attempted at all.
    pub fn is_process_fatal(&self) -> bool {
        matches!(
            self,
            DriverError::UnsupportedPlatform(_) | DriverError::MissingExecutable
        )
    }
}

/// Synthetic keys the traversal strategies send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    PageDown,
    ArrowRight,
}

impl Key {
    /// DOM key name.
    pub fn name(self) -> &'static str {
        match self {
            Key::PageDown => "PageDown",
            Key::ArrowRight => "ArrowRight",
        }
    }
}

/// One driven browser page. Owned by exactly one worker for its lifetime.
pub trait BrowserSession {
    type Element;

    fn navigate(&mut self, url: &str) -> Result<(), DriverError>;

    fn find_element(&mut self, selector: &str) -> Result<Self::Element, DriverError>;

    fn find_elements(&mut self, selector: &str) -> Result<Vec<Self::Element>, DriverError>;

    fn find_child(
        &mut self,
        parent: &Self::Element,
        selector: &str,
    ) -> Result<Self::Element, DriverError>;

    fn find_children(
        &mut self,
        parent: &Self::Element,
        selector: &str,
    ) -> Result<Vec<Self::Element>, DriverError>;

    fn attribute(
        &mut self,
        element: &Self::Element,
        name: &str,
    ) -> Result<Option<String>, DriverError>;

    /// Runs a JavaScript function declaration (`function() { ... }`) and returns its
    /// result. With a `target`, `this` is bound to that element.
    fn execute_script(
        &mut self,
        function: &str,
        target: Option<&Self::Element>,
    ) -> Result<serde_json::Value, DriverError>;

    fn send_key(&mut self, element: &Self::Element, key: Key) -> Result<(), DriverError>;

    /// Waits until an element matching `selector` is visible and enabled.
    /// Returns [`DriverError::Timeout`] when `timeout` elapses first.
    fn wait_for_clickable(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Self::Element, DriverError>;

    fn click(&mut self, element: &Self::Element) -> Result<(), DriverError>;

    fn reload(&mut self) -> Result<(), DriverError>;

    fn close(self) -> Result<(), DriverError>
    where
        Self: Sized;
}

/// Creates browser sessions for workers.
pub trait SessionLauncher: Sync {
    type Session: BrowserSession;

    /// Checks conditions that make every launch fail (platform, missing binary).
    fn preflight(&self) -> Result<(), DriverError> {
        Ok(())
    }

    /// Starts a fresh session, routed through `proxy` when given.
    fn launch(&self, proxy: Option<&str>) -> Result<Self::Session, DriverError>;
}
