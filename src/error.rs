//! Error types for the Proton Pass installer CLI.
//!
//! This module defines semantic error variants for every hard-fail point
//! in the install pipeline. Checksum mismatches are deliberately their own
//! variant: they are a security gate and must never be treated as a
//! retryable transport problem.

use crate::download::DownloadError;
use thiserror::Error;

/// Errors that can occur during the download-verify-install process.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The release manifest could not be retrieved.
    #[error("failed to fetch release manifest: {source}")]
    ManifestFetch {
        /// The underlying transport failure.
        #[source]
        source: DownloadError,
    },

    /// The release manifest was retrieved but is not valid JSON.
    #[error("invalid release manifest: {source}")]
    ManifestParse {
        /// The deserialization failure.
        #[source]
        source: serde_json::Error,
    },

    /// No release in the manifest matches the requested version exactly.
    #[error("version {version} not found in the release manifest")]
    VersionNotFound {
        /// The version string that was requested.
        version: String,
    },

    /// The matched release has no artifact for the host package family.
    #[error("no {extension} package found in the release file list")]
    ArtifactNotFound {
        /// The artifact extension that was searched for.
        extension: String,
    },

    /// The package download failed part-way through.
    #[error("package download failed: {source}")]
    Download {
        /// The underlying transport failure.
        #[source]
        source: DownloadError,
    },

    /// The computed digest does not match the manifest digest.
    ///
    /// This is the checksum gate: the downloaded file may be corrupt or
    /// tampered with, so installation is refused and never retried.
    #[error("checksum mismatch: expected {expected}, computed {computed}")]
    ChecksumMismatch {
        /// The digest declared in the release manifest.
        expected: String,
        /// The digest computed over the downloaded file.
        computed: String,
    },

    /// The platform package command exited with a nonzero status.
    #[error("package installation failed: {stderr}")]
    Install {
        /// Captured stderr from the package command.
        stderr: String,
    },

    /// The non-interactive sudo probe failed before install.
    #[error("superuser privileges are required to install the package")]
    PrivilegeDenied,

    /// The host is not a Debian-style or RPM-style distribution.
    #[error("this tool supports Debian/Ubuntu and Fedora/RHEL based systems only")]
    UnsupportedHost,

    /// Neither a deb nor an rpm package manager was found on the host.
    #[error("could not determine the host package manager (need apt, dnf, or yum)")]
    UnknownPackageFamily,

    /// The connectivity probe failed before any manifest fetch.
    #[error("no internet connection available")]
    Offline,

    /// A language tag was requested that no bundled locale provides.
    #[error("language {language} is not supported")]
    UnknownLanguage {
        /// The rejected language tag.
        language: String,
    },

    /// Per-user configuration state could not be resolved or written.
    #[error("configuration error: {reason}")]
    Settings {
        /// Description of the configuration failure.
        reason: String,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
