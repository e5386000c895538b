//! Scoped per-invocation state for one install run.
//!
//! An [`InstallSession`] owns the temporary directory that receives the
//! downloaded package. It is created before the first pipeline step and
//! finished in every exit path; `finish` removes the downloaded file and
//! the directory, and the `TempDir` drop glue covers panic unwinding.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Prefix for the session's temporary directory name.
const TEMP_PREFIX: &str = "protonpass_";

/// Transient state for a single download-verify-install run.
#[derive(Debug)]
pub struct InstallSession {
    temp: TempDir,
    downloaded: Option<PathBuf>,
}

impl InstallSession {
    /// Create the session's temporary directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn begin() -> io::Result<Self> {
        let temp = tempfile::Builder::new().prefix(TEMP_PREFIX).tempdir()?;
        Ok(Self {
            temp,
            downloaded: None,
        })
    }

    /// The session's temporary directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.temp.path()
    }

    /// Record the path of a fully downloaded file.
    ///
    /// Only set after a successful download; a partial file is swept up
    /// with the directory instead.
    pub fn record_download(&mut self, path: PathBuf) {
        self.downloaded = Some(path);
    }

    /// The downloaded file, when the download completed.
    #[must_use]
    pub fn downloaded(&self) -> Option<&Path> {
        self.downloaded.as_deref()
    }

    /// Remove the downloaded file and the temporary directory.
    ///
    /// Both removals are attempted even when the first fails; the first
    /// error is reported. Callers downgrade it to a warning so cleanup
    /// can never mask the pipeline outcome.
    ///
    /// # Errors
    ///
    /// Returns the first removal error encountered.
    pub fn finish(self) -> io::Result<()> {
        let Self { temp, downloaded } = self;

        let mut first_err = None;
        if let Some(file) = downloaded {
            if file.exists() {
                if let Err(e) = fs::remove_file(&file) {
                    first_err = Some(e);
                }
            }
        }
        if let Err(e) = temp.close() {
            first_err.get_or_insert(e);
        }

        match first_err {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }
}
