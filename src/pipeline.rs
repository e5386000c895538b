//! The download-verify-install pipeline.
//!
//! Runs the full sequence for one release: fetch the manifest, select
//! the artefact for the host package family, stream it into a scoped
//! temporary directory, verify its SHA-512 digest, and hand it to the
//! platform package manager. The temporary directory is removed on every
//! exit path; cleanup failures are reported but never override the
//! pipeline result.

use std::path::{Path, PathBuf};

use crate::download::{DownloadObserver, ReleaseDownloader, SilentObserver, url_basename};
use crate::error::{InstallerError, Result};
use crate::family::PackageFamily;
use crate::i18n::arg;
use crate::install::{CommandExecutor, install_package};
use crate::manifest::{PackageArtifact, parse_manifest};
use crate::output::StatusWriter;
use crate::session::InstallSession;
use crate::verify::compute_sha512;

/// What the caller asked the pipeline to do.
#[derive(Debug, Clone)]
pub struct PipelineRequest {
    /// The release version to fetch, compared by exact equality.
    pub version: String,
    /// The host package family, used to select the artefact.
    pub family: PackageFamily,
    /// When false, stop after checksum verification.
    pub do_install: bool,
    /// Attempt dependency repair when a deb install fails.
    pub force_deps: bool,
}

/// How far a successful pipeline run went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The package was verified and installed.
    Installed,
    /// Verification-only mode: the package checked out but was not
    /// installed.
    VerifiedOnly,
}

/// The installer pipeline with its injected collaborators.
pub struct Pipeline<'a> {
    downloader: &'a dyn ReleaseDownloader,
    executor: &'a dyn CommandExecutor,
}

impl<'a> Pipeline<'a> {
    /// Assemble a pipeline over the given downloader and executor.
    pub fn new(downloader: &'a dyn ReleaseDownloader, executor: &'a dyn CommandExecutor) -> Self {
        Self {
            downloader,
            executor,
        }
    }

    /// Run the pipeline for one request.
    ///
    /// # Errors
    ///
    /// Returns the first pipeline failure: manifest fetch or parse
    /// errors, an unknown version or missing artefact, download and I/O
    /// failures, a checksum mismatch, or a package-manager failure.
    pub fn run(
        &self,
        request: &PipelineRequest,
        status: &mut StatusWriter<'_>,
    ) -> Result<PipelineOutcome> {
        let artifact = self.select_artifact(request, status)?;

        let mut session = InstallSession::begin()?;
        let result = self.run_steps(request, &artifact, &mut session, status);
        finish_session(session, status);
        result
    }

    /// Fetch the manifest and pick the artefact for this request.
    fn select_artifact(
        &self,
        request: &PipelineRequest,
        status: &mut StatusWriter<'_>,
    ) -> Result<PackageArtifact> {
        status.say("fetching-release-info");
        let body = self
            .downloader
            .fetch_manifest()
            .map_err(|source| InstallerError::ManifestFetch { source })?;
        let manifest = parse_manifest(&body)?;
        status.say("release-info-ok");

        let release = manifest
            .release(&request.version)
            .ok_or_else(|| InstallerError::VersionNotFound {
                version: request.version.clone(),
            })?;
        let artifact = release
            .artifact(request.family)
            .ok_or_else(|| InstallerError::ArtifactNotFound {
                extension: request.family.extension().to_owned(),
            })?;
        Ok(artifact.clone())
    }

    fn run_steps(
        &self,
        request: &PipelineRequest,
        artifact: &PackageArtifact,
        session: &mut InstallSession,
        status: &mut StatusWriter<'_>,
    ) -> Result<PipelineOutcome> {
        let package = self.download_artifact(artifact, session, status)?;
        self.verify_artifact(artifact, &package, status)?;

        if !request.do_install {
            return Ok(PipelineOutcome::VerifiedOnly);
        }

        status.say("installing-package");
        install_package(
            self.executor,
            request.family,
            &package,
            request.force_deps,
            status,
        )?;
        status.say("install-ok");
        Ok(PipelineOutcome::Installed)
    }

    /// Stream the artefact into the session directory.
    ///
    /// The destination is recorded on the session only after the
    /// download completes; a partial file is swept away with the
    /// directory itself.
    fn download_artifact(
        &self,
        artifact: &PackageArtifact,
        session: &mut InstallSession,
        status: &mut StatusWriter<'_>,
    ) -> Result<PathBuf> {
        let filename = url_basename(&artifact.url);
        let dest = session.dir().join(filename);
        status.say_with("downloading-package", &arg("filename", filename));

        let downloaded = if status.progress_enabled() {
            let mut progress = ProgressPrinter::new(status);
            let result = self
                .downloader
                .download_package(&artifact.url, &dest, &mut progress);
            progress.finish();
            result
        } else {
            self.downloader
                .download_package(&artifact.url, &dest, &mut SilentObserver)
        };
        downloaded.map_err(|source| InstallerError::Download { source })?;

        session.record_download(dest.clone());
        status.say_with("download-complete", &arg("path", dest.to_string_lossy()));
        Ok(dest)
    }

    fn verify_artifact(
        &self,
        artifact: &PackageArtifact,
        package: &Path,
        status: &mut StatusWriter<'_>,
    ) -> Result<()> {
        status.say("computing-checksum");
        status.say_with("checksum-expected", &arg("digest", artifact.checksum.as_str()));
        let computed = compute_sha512(package)?;
        status.say_with("checksum-computed", &arg("digest", computed.as_str()));

        if computed != artifact.checksum {
            status.alert("checksum-mismatch");
            status.alert("checksum-mismatch-detail");
            status.alert("checksum-mismatch-abort");
            return Err(InstallerError::ChecksumMismatch {
                expected: artifact.checksum.as_str().to_owned(),
                computed: computed.as_str().to_owned(),
            });
        }

        status.say("checksum-match");
        Ok(())
    }
}

/// Remove the session directory, downgrading failures to a warning.
fn finish_session(session: InstallSession, status: &mut StatusWriter<'_>) {
    if let Err(error) = session.finish() {
        log::warn!("temporary directory cleanup failed: {error}");
        status.alert_with("cleanup-warning", &arg("error", error.to_string()));
    }
}

/// Rewrites a single terminal line with integer download percentages.
///
/// Emits nothing when the server did not declare a content length, and
/// only writes when the integer percentage changes.
struct ProgressPrinter<'a, 'b> {
    status: &'a mut StatusWriter<'b>,
    last_percent: Option<u64>,
}

impl<'a, 'b> ProgressPrinter<'a, 'b> {
    fn new(status: &'a mut StatusWriter<'b>) -> Self {
        Self {
            status,
            last_percent: None,
        }
    }

    /// Terminate the rewritten progress line, if one was started.
    fn finish(self) {
        if self.last_percent.is_some() {
            self.status.blank();
        }
    }
}

impl DownloadObserver for ProgressPrinter<'_, '_> {
    fn progress(&mut self, received: u64, total: Option<u64>) {
        let Some(total) = total.filter(|total| *total > 0) else {
            return;
        };
        let percent = (received.min(total) * 100) / total;
        if self.last_percent == Some(percent) {
            return;
        }
        self.last_percent = Some(percent);
        let line = self
            .status
            .messages()
            .text_with("download-progress", &arg("percent", percent.to_string()));
        self.status.raw(&format!("\r{line}"));
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
