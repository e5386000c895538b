//! Privileged package installation via the platform package manager.
//!
//! This module provides the command abstraction for running external
//! processes, the non-interactive sudo probe, and the family-specific
//! install commands. Deb installs support a single dependency-repair
//! retry; the rpm path has no equivalent because `dnf install` resolves
//! local-package dependencies itself.

use crate::error::{InstallerError, Result};
use crate::family::PackageFamily;
use crate::output::StatusWriter;
use std::path::Path;
use std::process::{Command, Output};

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the
    /// command.
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        Command::new(cmd)
            .args(args)
            .output()
            .map_err(InstallerError::from)
    }
}

/// Whether elevated privileges are available without prompting.
///
/// Uses `sudo -n true` so the probe never blocks on a password prompt.
#[must_use]
pub fn sudo_available(executor: &dyn CommandExecutor) -> bool {
    executor
        .run("sudo", &["-n", "true"])
        .is_ok_and(|o| o.status.success())
}

/// Install the verified package file via the platform package manager.
///
/// Deb hosts run `dpkg -i`; when that fails and `force_deps` is set, the
/// package's declared dependencies are installed via apt and the install
/// is retried exactly once. Rpm hosts run a single `dnf install -y`.
///
/// # Errors
///
/// Returns [`InstallerError::Install`] with the captured stderr when the
/// package command (and any retry) exits nonzero.
pub fn install_package(
    executor: &dyn CommandExecutor,
    family: PackageFamily,
    file: &Path,
    force_deps: bool,
    status: &mut StatusWriter<'_>,
) -> Result<()> {
    match family {
        PackageFamily::Deb => install_deb(executor, file, force_deps, status),
        PackageFamily::Rpm => install_rpm(executor, file),
    }
}

fn install_deb(
    executor: &dyn CommandExecutor,
    file: &Path,
    force_deps: bool,
    status: &mut StatusWriter<'_>,
) -> Result<()> {
    let path = file.to_string_lossy();
    let output = run_dpkg_install(executor, &path)?;
    if output.status.success() {
        return Ok(());
    }

    if force_deps {
        status.say("repairing-dependencies");
        repair_dependencies(executor, &path)?;
        let retried = run_dpkg_install(executor, &path)?;
        if retried.status.success() {
            return Ok(());
        }
        return Err(install_failure(&retried));
    }

    Err(install_failure(&output))
}

fn install_rpm(executor: &dyn CommandExecutor, file: &Path) -> Result<()> {
    let path = file.to_string_lossy();
    let output = executor.run("sudo", &["dnf", "install", "-y", &path])?;
    if output.status.success() {
        return Ok(());
    }
    Err(install_failure(&output))
}

fn run_dpkg_install(executor: &dyn CommandExecutor, path: &str) -> Result<Output> {
    executor.run("sudo", &["dpkg", "-i", path])
}

/// Install the package's declared dependencies via apt.
///
/// Queries the control field with `dpkg-deb -f <file> Depends` and feeds
/// the parsed package names to `apt-get install -y`.
fn repair_dependencies(executor: &dyn CommandExecutor, path: &str) -> Result<()> {
    let query = executor.run("dpkg-deb", &["-f", path, "Depends"])?;
    if !query.status.success() {
        return Err(install_failure(&query));
    }

    let field = String::from_utf8_lossy(&query.stdout);
    let depends = parse_depends(&field);
    if depends.is_empty() {
        return Ok(());
    }

    let mut args: Vec<&str> = vec!["apt-get", "install", "-y"];
    args.extend(depends.iter().map(String::as_str));
    let output = executor.run("sudo", &args)?;
    if output.status.success() {
        Ok(())
    } else {
        Err(install_failure(&output))
    }
}

/// Parse a dpkg `Depends` control field into bare package names.
///
/// Entries are comma-separated; each may carry a version constraint in
/// parentheses and alternatives joined with `|`, of which the first is
/// taken.
pub(crate) fn parse_depends(field: &str) -> Vec<String> {
    field
        .split(',')
        .filter_map(|entry| {
            let first_alternative = entry.split('|').next()?;
            let name = first_alternative
                .split('(')
                .next()?
                .trim();
            if name.is_empty() {
                None
            } else {
                Some(name.to_owned())
            }
        })
        .collect()
}

fn install_failure(output: &Output) -> InstallerError {
    InstallerError::Install {
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
    }
}

#[cfg(test)]
#[path = "install_tests.rs"]
mod tests;
