//! Host package-family and distribution probes.
//!
//! Stateless filesystem probes: the host is classified as deb-style or
//! rpm-style by the package-manager binaries it carries. The probes are
//! pure over an injected root so tests can exercise them against a
//! temporary directory tree.

use std::path::Path;

/// The host packaging ecosystem, which determines the artifact extension
/// to request and the privileged install command to invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFamily {
    /// Debian-style packaging (`dpkg`/`apt`).
    Deb,
    /// RPM-style packaging (`dnf`/`yum`).
    Rpm,
}

impl PackageFamily {
    /// The artifact file extension for this family.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Deb => ".deb",
            Self::Rpm => ".rpm",
        }
    }

    /// Classify the running host, or `None` when no known package
    /// manager is present.
    #[must_use]
    pub fn detect() -> Option<Self> {
        Self::detect_in(Path::new("/"))
    }

    /// Classify the host rooted at `root`.
    ///
    /// RPM-family managers win over apt: a host carrying both (dnf with a
    /// compatibility apt shim, for instance) installs rpm packages.
    #[must_use]
    pub fn detect_in(root: &Path) -> Option<Self> {
        if root.join("usr/bin/dnf").exists() || root.join("usr/bin/yum").exists() {
            return Some(Self::Rpm);
        }
        if root.join("usr/bin/apt").exists() {
            return Some(Self::Deb);
        }
        None
    }
}

impl std::fmt::Display for PackageFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Deb => "deb",
            Self::Rpm => "rpm",
        })
    }
}

/// Whether the running host is a supported distribution.
#[must_use]
pub fn is_supported_distro() -> bool {
    is_supported_distro_in(Path::new("/"))
}

/// Whether the host rooted at `root` carries a supported distribution
/// marker (Debian/Ubuntu or Fedora/RHEL release files).
#[must_use]
pub fn is_supported_distro_in(root: &Path) -> bool {
    root.join("etc/debian_version").exists()
        || root.join("etc/fedora-release").exists()
        || root.join("etc/redhat-release").exists()
}
