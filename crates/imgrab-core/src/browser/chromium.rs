//! Chromium binding of [`BrowserSession`] using chromiumoxide.
//!
//! chromiumoxide is async; each session owns a small tokio runtime and blocks
//! on it, so a worker thread sees an ordinary blocking API and waiting in one
//! session never stalls another.

use super::{BrowserSession, DriverError, Key, SessionLauncher};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

/// Environment variable that overrides browser discovery.
pub const CHROME_ENV: &str = "IMGRAB_CHROME";

const SUPPORTED_PLATFORMS: [&str; 3] = ["linux", "macos", "windows"];

const CANDIDATE_BINARIES: [&str; 5] = [
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "chrome",
];

/// CDP messages that mean a node handle outlived its DOM node.
const STALE_MARKERS: [&str; 4] = [
    "No node with given id",
    "Could not find node with given id",
    "does not belong to the document",
    "Cannot find context with specified id",
];

const CLICKABLE_FN: &str = "function() { \
    const r = this.getBoundingClientRect(); \
    return !this.disabled && r.width > 0 && r.height > 0 && \
        getComputedStyle(this).visibility !== 'hidden'; }";

/// Find the Chromium/Chrome binary: `IMGRAB_CHROME`, then `PATH`, then the macOS app bundle.
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(p) = std::env::var(CHROME_ENV) {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    for name in CANDIDATE_BINARIES {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

fn classify(err: CdpError, selector: Option<&str>) -> DriverError {
    let msg = err.to_string();
    if STALE_MARKERS.iter().any(|m| msg.contains(m)) {
        return DriverError::StaleElement;
    }
    match (err, selector) {
        (CdpError::NotFound, Some(sel)) => DriverError::NoSuchElement(sel.to_string()),
        _ => DriverError::Other(msg),
    }
}

/// Launches one Chromium process per session.
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    executable: Option<PathBuf>,
    headless: bool,
    clickable_poll: Duration,
}

impl ChromiumLauncher {
    /// Locates the browser binary. A missing binary is reported by [`SessionLauncher::preflight`].
    pub fn new(headless: bool, clickable_poll: Duration) -> Self {
        Self {
            executable: find_chromium(),
            headless,
            clickable_poll,
        }
    }
}

impl SessionLauncher for ChromiumLauncher {
    type Session = ChromiumSession;

    fn preflight(&self) -> Result<(), DriverError> {
        let os = std::env::consts::OS;
        if !SUPPORTED_PLATFORMS.contains(&os) {
            return Err(DriverError::UnsupportedPlatform(os.to_string()));
        }
        match &self.executable {
            Some(path) => {
                tracing::info!(platform = os, "using browser at {}", path.display());
                Ok(())
            }
            None => Err(DriverError::MissingExecutable),
        }
    }

    fn launch(&self, proxy: Option<&str>) -> Result<ChromiumSession, DriverError> {
        let executable = self.executable.clone().ok_or(DriverError::MissingExecutable)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(|e| DriverError::Launch(format!("tokio runtime: {e}")))?;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(executable)
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage");
        if !self.headless {
            builder = builder.with_head();
        }
        if let Some(proxy) = proxy {
            builder = builder.arg(format!("--proxy-server={proxy}"));
        }
        let config = builder.build().map_err(DriverError::Launch)?;

        let (browser, page, handler) = runtime.block_on(async {
            let (browser, mut handler) = Browser::launch(config)
                .await
                .map_err(|e| DriverError::Launch(e.to_string()))?;

            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    let _ = event;
                }
            });

            match browser.version().await {
                Ok(v) => tracing::info!(product = %v.product, "browser started"),
                Err(e) => tracing::warn!("could not read browser version: {}", e),
            }

            let page = browser
                .new_page("about:blank")
                .await
                .map_err(|e| DriverError::Launch(e.to_string()))?;
            Ok::<_, DriverError>((browser, page, handler))
        })?;

        Ok(ChromiumSession {
            page,
            browser,
            handler,
            clickable_poll: self.clickable_poll,
            runtime,
        })
    }
}

/// A single Chromium page driven synchronously.
pub struct ChromiumSession {
    page: Page,
    browser: Browser,
    handler: JoinHandle<()>,
    clickable_poll: Duration,
    runtime: Runtime,
}

impl BrowserSession for ChromiumSession {
    type Element = Element;

    fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        self.runtime.block_on(async {
            self.page.goto(url).await.map_err(|e| classify(e, None))?;
            self.page
                .wait_for_navigation()
                .await
                .map_err(|e| classify(e, None))?;
            Ok(())
        })
    }

    fn find_element(&mut self, selector: &str) -> Result<Element, DriverError> {
        self.runtime
            .block_on(self.page.find_element(selector))
            .map_err(|e| classify(e, Some(selector)))
    }

    fn find_elements(&mut self, selector: &str) -> Result<Vec<Element>, DriverError> {
        self.runtime
            .block_on(self.page.find_elements(selector))
            .map_err(|e| classify(e, Some(selector)))
    }

    fn find_child(&mut self, parent: &Element, selector: &str) -> Result<Element, DriverError> {
        self.runtime
            .block_on(parent.find_element(selector))
            .map_err(|e| classify(e, Some(selector)))
    }

    fn find_children(
        &mut self,
        parent: &Element,
        selector: &str,
    ) -> Result<Vec<Element>, DriverError> {
        self.runtime
            .block_on(parent.find_elements(selector))
            .map_err(|e| classify(e, Some(selector)))
    }

    fn attribute(&mut self, element: &Element, name: &str) -> Result<Option<String>, DriverError> {
        self.runtime
            .block_on(element.attribute(name))
            .map_err(|e| classify(e, None))
    }

    fn execute_script(
        &mut self,
        function: &str,
        target: Option<&Element>,
    ) -> Result<serde_json::Value, DriverError> {
        match target {
            Some(element) => {
                let ret = self
                    .runtime
                    .block_on(element.call_js_fn(function, false))
                    .map_err(|e| classify(e, None))?;
                Ok(ret.result.value.unwrap_or(serde_json::Value::Null))
            }
            None => {
                let ret = self
                    .runtime
                    .block_on(self.page.evaluate(format!("({function})()")))
                    .map_err(|e| classify(e, None))?;
                Ok(ret.value().cloned().unwrap_or(serde_json::Value::Null))
            }
        }
    }

    fn send_key(&mut self, element: &Element, key: Key) -> Result<(), DriverError> {
        self.runtime
            .block_on(element.press_key(key.name()))
            .map(|_| ())
            .map_err(|e| classify(e, None))
    }

    fn wait_for_clickable(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Element, DriverError> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(element) = self.runtime.block_on(self.page.find_element(selector)) {
                let clickable = self
                    .runtime
                    .block_on(element.call_js_fn(CLICKABLE_FN, false))
                    .ok()
                    .and_then(|ret| ret.result.value)
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);
                if clickable {
                    return Ok(element);
                }
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout {
                    selector: selector.to_string(),
                    timeout,
                });
            }
            std::thread::sleep(self.clickable_poll);
        }
    }

    fn click(&mut self, element: &Element) -> Result<(), DriverError> {
        self.runtime
            .block_on(element.click())
            .map(|_| ())
            .map_err(|e| classify(e, None))
    }

    fn reload(&mut self) -> Result<(), DriverError> {
        self.runtime
            .block_on(self.page.reload())
            .map(|_| ())
            .map_err(|e| classify(e, None))
    }

    fn close(self) -> Result<(), DriverError> {
        let ChromiumSession {
            page,
            mut browser,
            handler,
            runtime,
            ..
        } = self;
        drop(page);
        let result = runtime.block_on(async {
            browser.close().await.map_err(|e| classify(e, None))?;
            let _ = browser.wait().await;
            Ok(())
        });
        handler.abort();
        result
    }
}
