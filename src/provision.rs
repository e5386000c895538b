//! Provisioning of bundled locale assets into the user's data directory.
//!
//! The binary carries its Fluent resources; on first run they are copied
//! under the locale directory so packaged translations can be inspected
//! or extended without rebuilding. An existing locale directory is left
//! untouched unless a refresh is forced.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::i18n;

/// Locale resources compiled into the binary.
const BUNDLED_LOCALES: &[(&str, &str)] = &[
    ("es", include_str!("../locales/es/installer.ftl")),
    ("en", include_str!("../locales/en/installer.ftl")),
];

/// Copy the bundled locale resources under `locale_dir`.
///
/// Returns the provisioned directory, or `None` when it already existed
/// and `force` was not set.
///
/// # Errors
///
/// Returns any I/O error from creating directories or writing files.
pub fn provision_locales(locale_dir: &Path, force: bool) -> io::Result<Option<PathBuf>> {
    if locale_dir.exists() && !force {
        return Ok(None);
    }
    for (language, resource) in BUNDLED_LOCALES {
        let dir = locale_dir.join(language);
        fs::create_dir_all(&dir)?;
        fs::write(dir.join("installer.ftl"), resource)?;
    }
    Ok(Some(locale_dir.to_path_buf()))
}

/// All selectable languages: bundled locales plus any provisioned
/// under `locale_dir`, sorted and deduplicated.
#[must_use]
pub fn available_languages(locale_dir: &Path) -> Vec<String> {
    let mut languages: Vec<String> = i18n::bundled_locales().to_vec();
    if let Ok(entries) = fs::read_dir(locale_dir) {
        for entry in entries.flatten() {
            if entry.path().is_dir() {
                languages.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
    }
    languages.sort();
    languages.dedup();
    languages
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_run_provisions_every_bundled_locale() {
        let dir = TempDir::new().expect("temp dir");
        let locale_dir = dir.path().join("locales");

        let provisioned = provision_locales(&locale_dir, false).expect("provision");
        assert_eq!(provisioned, Some(locale_dir.clone()));

        let spanish = fs::read_to_string(locale_dir.join("es").join("installer.ftl"))
            .expect("Spanish resource");
        assert!(spanish.contains("checksum-match"));
        assert!(locale_dir.join("en").join("installer.ftl").exists());
    }

    #[test]
    fn existing_locale_directory_is_left_alone() {
        let dir = TempDir::new().expect("temp dir");
        let locale_dir = dir.path().join("locales");
        let marker = locale_dir.join("es").join("installer.ftl");
        fs::create_dir_all(marker.parent().expect("parent")).expect("mkdir");
        fs::write(&marker, "# customised\n").expect("seed");

        assert_eq!(provision_locales(&locale_dir, false).expect("skip"), None);
        assert_eq!(
            fs::read_to_string(&marker).expect("read back"),
            "# customised\n"
        );
    }

    #[test]
    fn force_overwrites_a_customised_resource() {
        let dir = TempDir::new().expect("temp dir");
        let locale_dir = dir.path().join("locales");
        let marker = locale_dir.join("es").join("installer.ftl");
        fs::create_dir_all(marker.parent().expect("parent")).expect("mkdir");
        fs::write(&marker, "# customised\n").expect("seed");

        let provisioned = provision_locales(&locale_dir, true).expect("refresh");
        assert_eq!(provisioned, Some(locale_dir));
        assert!(
            fs::read_to_string(&marker)
                .expect("read back")
                .contains("checksum-match")
        );
    }

    #[test]
    fn available_languages_unions_bundled_and_provisioned() {
        let dir = TempDir::new().expect("temp dir");
        let locale_dir = dir.path().join("locales");
        fs::create_dir_all(locale_dir.join("gl")).expect("mkdir gl");
        fs::create_dir_all(locale_dir.join("es")).expect("mkdir es");
        fs::write(locale_dir.join("notes.txt"), "").expect("stray file");

        assert_eq!(available_languages(&locale_dir), ["en", "es", "gl"]);
    }

    #[test]
    fn available_languages_without_a_directory_lists_bundled_locales() {
        let dir = TempDir::new().expect("temp dir");
        let mut expected: Vec<String> = i18n::bundled_locales().to_vec();
        expected.sort();
        assert_eq!(available_languages(&dir.path().join("missing")), expected);
    }
}
