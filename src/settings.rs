//! Run-environment detection, application paths, and user preferences.
//!
//! The installer stores a small `KEY=value` preferences file and a
//! `VERSION` marker. Where those live depends on how the binary itself
//! was installed: a packaged or system-wide binary uses the XDG
//! configuration and data homes, while a source checkout keeps its
//! files next to the executable.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::family::PackageFamily;

/// Preferences key holding the interface language.
pub const LANGUAGE_KEY: &str = "IDIOMA";

/// Version reported when no `VERSION` marker exists.
pub const DEFAULT_VERSION: &str = "1.0.0";

/// Marker file indicating a system-wide deb installation.
const PACKAGED_MARKER: &str = ".deb_installed";

/// Host directories the path resolution depends on.
///
/// Implemented by [`SystemBaseDirs`] in production; tests substitute
/// fixed directories.
pub trait BaseDirs {
    /// The XDG configuration home (`~/.config` by default).
    fn config_home(&self) -> PathBuf;

    /// The XDG data home (`~/.local/share` by default).
    fn data_home(&self) -> PathBuf;

    /// The resolved path of the running executable.
    fn executable(&self) -> PathBuf;
}

/// Host directories resolved from the process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn config_home(&self) -> PathBuf {
        directories_next::BaseDirs::new()
            .map_or_else(|| PathBuf::from("."), |dirs| dirs.config_dir().to_path_buf())
    }

    fn data_home(&self) -> PathBuf {
        directories_next::BaseDirs::new()
            .map_or_else(|| PathBuf::from("."), |dirs| dirs.data_dir().to_path_buf())
    }

    fn executable(&self) -> PathBuf {
        std::env::current_exe().unwrap_or_default()
    }
}

/// How this binary reached the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnvironment {
    /// Installed through the platform package manager.
    Packaged,
    /// Copied into `/usr/local/bin`.
    LocalBin,
    /// Run from a source checkout or ad-hoc location.
    Source,
}

impl RunEnvironment {
    /// Classify the running binary against the live filesystem.
    #[must_use]
    pub fn detect(dirs: &dyn BaseDirs, family: Option<PackageFamily>) -> Self {
        Self::classify(&dirs.executable(), family, Path::new("/"))
    }

    /// Classification against an arbitrary filesystem root.
    ///
    /// A binary under `/usr/local/bin` counts as `LocalBin` even though
    /// the prefix also matches the packaged check. The packaged marker
    /// is only honoured on deb hosts because rpm installs do not write
    /// it.
    pub(crate) fn classify(
        executable: &Path,
        family: Option<PackageFamily>,
        root: &Path,
    ) -> Self {
        if executable.starts_with("/usr/local/bin") {
            return Self::LocalBin;
        }
        let packaged = family == Some(PackageFamily::Deb)
            && (root.join(PACKAGED_MARKER).exists()
                || executable.starts_with("/usr")
                || executable.starts_with("/opt"));
        if packaged {
            Self::Packaged
        } else {
            Self::Source
        }
    }
}

/// Where the preferences file, version marker, and locale assets live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    /// Directory holding `.env` and `VERSION`.
    pub config_dir: PathBuf,
    /// Directory holding provisioned locale assets.
    pub locale_root: PathBuf,
}

impl AppPaths {
    /// Resolve the application paths for the given run environment.
    #[must_use]
    pub fn resolve(dirs: &dyn BaseDirs, environment: RunEnvironment) -> Self {
        match environment {
            RunEnvironment::Source => {
                let base = dirs
                    .executable()
                    .parent()
                    .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
                Self {
                    config_dir: base.clone(),
                    locale_root: base,
                }
            }
            RunEnvironment::Packaged | RunEnvironment::LocalBin => Self {
                config_dir: vendor_subdir(&dirs.config_home()),
                locale_root: vendor_subdir(&dirs.data_home()),
            },
        }
    }

    /// The `KEY=value` preferences file.
    #[must_use]
    pub fn preferences_file(&self) -> PathBuf {
        self.config_dir.join(".env")
    }

    /// The installed-version marker file.
    #[must_use]
    pub fn version_marker(&self) -> PathBuf {
        self.config_dir.join("VERSION")
    }

    /// The directory locale assets are provisioned into.
    #[must_use]
    pub fn locale_dir(&self) -> PathBuf {
        self.locale_root.join("locales")
    }
}

fn vendor_subdir(home: &Path) -> PathBuf {
    home.join("mlogicial").join("proton-pass-installer")
}

/// Ordered `KEY=value` preferences.
///
/// Keys this tool does not know about are preserved across a
/// load-store cycle; comment lines are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preferences {
    entries: Vec<(String, String)>,
}

impl Preferences {
    /// Load preferences from `path`.
    ///
    /// A missing file yields empty preferences. Blank lines, comment
    /// lines, and lines without a `=` separator are skipped.
    ///
    /// # Errors
    ///
    /// Returns any I/O error other than the file being absent.
    pub fn load(path: &Path) -> io::Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(error) => return Err(error),
        };

        let mut prefs = Self::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                prefs.set(key.trim(), value.trim());
            }
        }
        Ok(prefs)
    }

    /// The value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(stored, _)| stored == key)
            .map(|(_, value)| value.as_str())
    }

    /// Set `key`, replacing an existing entry in place or appending.
    pub fn set(&mut self, key: &str, value: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|(stored, _)| stored == key) {
            entry.1 = value.to_owned();
        } else {
            self.entries.push((key.to_owned(), value.to_owned()));
        }
    }

    /// The configured interface language, if any.
    #[must_use]
    pub fn language(&self) -> Option<&str> {
        self.get(LANGUAGE_KEY)
    }

    /// Set the configured interface language.
    pub fn set_language(&mut self, language: &str) {
        self.set(LANGUAGE_KEY, language);
    }

    /// Write the preferences to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from creating directories or writing the
    /// file.
    pub fn store(&self, path: &Path) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut text = String::new();
        for (key, value) in &self.entries {
            text.push_str(key);
            text.push('=');
            text.push_str(value);
            text.push('\n');
        }
        fs::write(path, text)
    }
}

/// Create the preferences file with defaults when it does not exist.
///
/// The initial language is taken from the process locale, falling back
/// to `default_language`. An existing file is left untouched.
///
/// # Errors
///
/// Returns any I/O error from creating or writing the file.
pub fn ensure_preferences(path: &Path, default_language: &str) -> io::Result<()> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let language = system_language().unwrap_or_else(|| default_language.to_owned());
    let text = format!("# Language preferences.\n{LANGUAGE_KEY}={language}\n");
    fs::write(path, text)
}

/// The host locale as a BCP 47-style tag, from `LC_ALL`, `LC_MESSAGES`,
/// or `LANG` in that order.
///
/// Encoding suffixes and modifiers are stripped and the underscore
/// separator is normalised, so `es_ES.UTF-8@euro` becomes `es-ES`. The
/// `C` and `POSIX` locales yield `None`.
#[must_use]
pub fn system_language() -> Option<String> {
    ["LC_ALL", "LC_MESSAGES", "LANG"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|value| !value.trim().is_empty())
        .and_then(|value| normalise_locale(&value))
}

fn normalise_locale(value: &str) -> Option<String> {
    let tag = value
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim()
        .replace('_', "-");
    if tag.is_empty() || tag == "C" || tag == "POSIX" {
        None
    } else {
        Some(tag)
    }
}

/// The version recorded in the marker file, or [`DEFAULT_VERSION`].
#[must_use]
pub fn installed_version(paths: &AppPaths) -> String {
    fs::read_to_string(paths.version_marker())
        .map_or_else(|_| DEFAULT_VERSION.to_owned(), |text| {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                DEFAULT_VERSION.to_owned()
            } else {
                trimmed.to_owned()
            }
        })
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
