//! Release manifest schema and lookup helpers.
//!
//! The vendor publishes a `version.json` document listing every desktop
//! release together with its downloadable package variants:
//!
//! ```json
//! {
//!   "Releases": [
//!     {
//!       "Version": "1.32.5",
//!       "File": [
//!         {
//!           "Identifier": ".deb (Ubuntu/Debian)",
//!           "Url": "https://proton.me/.../proton-pass_1.32.5_amd64.deb",
//!           "Sha512CheckSum": "…128 hex characters…"
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Field names are the vendor's PascalCase keys, mapped with serde
//! renames. Digest validation runs during deserialization, rejecting
//! malformed checksums at parse time.

use crate::digest::Sha512Digest;
use crate::error::{InstallerError, Result};
use crate::family::PackageFamily;
use serde::Deserialize;

/// The parsed `version.json` document.
#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseManifest {
    /// Every published release, newest first as the vendor emits them.
    #[serde(rename = "Releases", default)]
    pub releases: Vec<Release>,
}

/// One published release and its installable file variants.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// The release version string, compared by exact equality.
    #[serde(rename = "Version")]
    pub version: String,
    /// The downloadable package variants for this release.
    #[serde(rename = "File", default)]
    pub files: Vec<PackageArtifact>,
}

/// One downloadable package variant.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageArtifact {
    /// Human-oriented identifier beginning with the file extension,
    /// e.g. `".deb (Ubuntu/Debian)"`.
    #[serde(rename = "Identifier")]
    pub identifier: String,
    /// Direct download URL for the package file.
    #[serde(rename = "Url")]
    pub url: String,
    /// Expected SHA-512 digest of the package file.
    #[serde(rename = "Sha512CheckSum")]
    pub checksum: Sha512Digest,
}

impl ReleaseManifest {
    /// Find the release whose version equals `version` exactly.
    ///
    /// No semantic-version matching is performed; `"1.32"` does not match
    /// `"1.32.5"`.
    #[must_use]
    pub fn release(&self, version: &str) -> Option<&Release> {
        self.releases.iter().find(|r| r.version == version)
    }
}

impl Release {
    /// Select the first artifact whose identifier starts with the
    /// family's extension, in declared order.
    #[must_use]
    pub fn artifact(&self, family: PackageFamily) -> Option<&PackageArtifact> {
        self.files
            .iter()
            .find(|f| f.identifier.starts_with(family.extension()))
    }
}

/// Parse a JSON string into a validated [`ReleaseManifest`].
///
/// # Errors
///
/// Returns [`InstallerError::ManifestParse`] if the JSON is malformed or
/// any checksum fails digest validation.
pub fn parse_manifest(json: &str) -> Result<ReleaseManifest> {
    serde_json::from_str(json).map_err(|source| InstallerError::ManifestParse { source })
}
