//! Manifest and package download over HTTP.
//!
//! Provides a trait-based abstraction for fetching the release manifest
//! and streaming package files to disk, enabling dependency injection for
//! testing. Downloads are written in fixed-size chunks so memory use is
//! bounded regardless of package size, and progress is reported through a
//! [`DownloadObserver`] when the server declares a `Content-Length`.

use std::io::{Read, Write};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// The fixed release manifest endpoint under the vendor's Linux
/// desktop download base.
pub const MANIFEST_URL: &str =
    "https://proton.me/download/PassDesktop/linux/x64/version.json";

/// URL probed to confirm the host has connectivity before any fetch.
const CONNECTIVITY_PROBE_URL: &str = "https://proton.me/es-es";

/// Timeout for the manifest fetch.
const MANIFEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Timeout for the package download.
const PACKAGE_TIMEOUT: Duration = Duration::from_secs(60);
/// Timeout for the connectivity probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Fixed chunk size for streamed writes.
const CHUNK_SIZE: usize = 8192;

/// Errors arising from download operations.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested resource was not found (HTTP 404).
    #[error("resource not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// Receives incremental download progress.
///
/// `total` is `None` when the server did not declare a `Content-Length`;
/// implementations should omit percentage output in that case.
pub trait DownloadObserver {
    /// Called after each chunk is written to disk.
    fn progress(&mut self, received: u64, total: Option<u64>);
}

/// No-op observer for callers that do not report progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentObserver;

impl DownloadObserver for SilentObserver {
    fn progress(&mut self, _received: u64, _total: Option<u64>) {}
}

/// Trait for fetching the release manifest and package files.
///
/// Abstractions allow tests to mock HTTP behaviour without network access.
#[cfg_attr(test, mockall::automock)]
pub trait ReleaseDownloader {
    /// Fetch the release manifest JSON from the fixed endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body cannot be read.
    fn fetch_manifest(&self) -> Result<String, DownloadError>;

    /// Stream the package at `url` into `dest`, reporting progress.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or any file write fails. A
    /// partially written file is left at `dest` for the caller's
    /// cleanup.
    fn download_package(
        &self,
        url: &str,
        dest: &Path,
        observer: &mut dyn DownloadObserver,
    ) -> Result<(), DownloadError>;
}

/// HTTP-based downloader using `ureq`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpDownloader;

impl ReleaseDownloader for HttpDownloader {
    fn fetch_manifest(&self) -> Result<String, DownloadError> {
        let response = manifest_agent()
            .get(MANIFEST_URL)
            .call()
            .map_err(|e| map_ureq_error(MANIFEST_URL, &e))?;
        response
            .into_body()
            .read_to_string()
            .map_err(|e| DownloadError::HttpError {
                url: MANIFEST_URL.to_owned(),
                reason: e.to_string(),
            })
    }

    fn download_package(
        &self,
        url: &str,
        dest: &Path,
        observer: &mut dyn DownloadObserver,
    ) -> Result<(), DownloadError> {
        let response = package_agent()
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;

        let total = response
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        let mut reader = response.into_body().into_reader();
        let mut file = std::fs::File::create(dest)?;
        let mut buffer = [0u8; CHUNK_SIZE];
        let mut received: u64 = 0;
        loop {
            let bytes_read = reader.read(&mut buffer)?;
            if bytes_read == 0 {
                break;
            }
            file.write_all(&buffer[..bytes_read])?;
            received += bytes_read as u64;
            observer.progress(received, total);
        }
        file.flush()?;
        Ok(())
    }
}

/// Whether the vendor site is reachable. Used as a preflight check so a
/// disconnected host fails fast instead of waiting out the manifest
/// timeout.
#[must_use]
pub fn network_available() -> bool {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(PROBE_TIMEOUT))
        .build();
    let agent = ureq::Agent::new_with_config(config);
    agent.get(CONNECTIVITY_PROBE_URL).call().is_ok()
}

/// Return the final path segment of a download URL.
#[must_use]
pub fn url_basename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Shared `ureq` agent for the manifest fetch (30s timeout).
fn manifest_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| agent_with_timeout(MANIFEST_TIMEOUT))
}

/// Shared `ureq` agent for package downloads (60s timeout).
fn package_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| agent_with_timeout(PACKAGE_TIMEOUT))
}

fn agent_with_timeout(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .build();
    ureq::Agent::new_with_config(config)
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
