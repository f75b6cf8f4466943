//! HTTP fetch capability: a streamed GET copied into a caller-supplied sink.

use std::io::Write;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Error returned by a single transfer.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, unsupported scheme, etc.).
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// HTTP response had a non-2xx status.
    #[error("HTTP {0}")]
    Http(u32),
    /// Writing the body to the sink failed.
    #[error("sink: {0}")]
    Sink(std::io::Error),
}

/// Streams the body of `url` into `sink`, returning the number of bytes copied.
/// A non-success status is an error even if a body was received.
pub trait HttpFetch: Sync {
    fn fetch_into(&self, url: &str, sink: &mut dyn Write) -> Result<u64, FetchError>;
}

/// Transfer options for [`CurlFetcher`].
#[derive(Debug, Clone, Copy)]
pub struct CurlFetcher {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    /// Abort when slower than 1 KiB/s for this long.
    pub low_speed_time: Duration,
}

impl Default for CurlFetcher {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(300),
            low_speed_time: Duration::from_secs(60),
        }
    }
}

impl HttpFetch for CurlFetcher {
    fn fetch_into(&self, url: &str, sink: &mut dyn Write) -> Result<u64, FetchError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(USER_AGENT)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.low_speed_limit(1024)?;
        easy.low_speed_time(self.low_speed_time)?;
        easy.timeout(self.timeout)?;

        let mut written = 0u64;
        let mut sink_error: Option<std::io::Error> = None;
        let performed = {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| match sink.write_all(data) {
                Ok(()) => {
                    written += data.len() as u64;
                    Ok(data.len())
                }
                Err(e) => {
                    sink_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = sink_error {
            return Err(FetchError::Sink(e));
        }
        performed?;

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::Http(code));
        }
        sink.flush().map_err(FetchError::Sink)?;
        Ok(written)
    }
}
