//! Proton Pass installer CLI entrypoint.
//!
//! This binary fetches a published Proton Pass release, verifies its
//! SHA-512 checksum, and installs it via the host package manager. It
//! also manages the interface language and the provisioned locale
//! assets.

use std::io::Write;

use clap::CommandFactory;
use proton_pass_installer::cli::Cli;
use proton_pass_installer::download::{self, HttpDownloader};
use proton_pass_installer::error::{InstallerError, Result};
use proton_pass_installer::family::{self, PackageFamily};
use proton_pass_installer::i18n::{self, Localiser, arg};
use proton_pass_installer::install::{self, SystemCommandExecutor};
use proton_pass_installer::output::{StatusWriter, write_stderr_line};
use proton_pass_installer::pipeline::{Pipeline, PipelineOutcome, PipelineRequest};
use proton_pass_installer::provision;
use proton_pass_installer::settings::{
    self, AppPaths, Preferences, RunEnvironment, SystemBaseDirs, installed_version,
};

fn main() {
    let dirs = SystemBaseDirs;
    let family = PackageFamily::detect();
    let environment = RunEnvironment::detect(&dirs, family);
    let paths = AppPaths::resolve(&dirs, environment);

    let cli = Cli::parse_with_version(installed_version(&paths));
    let mut stderr = std::io::stderr();

    if !cli.has_action() {
        let mut command = Cli::command();
        if command.print_help().is_err() {
            // Best-effort help output; the exit code still signals misuse.
        }
        std::process::exit(1);
    }

    let messages = load_messages(&paths);
    let run_result = run(&cli, &paths, family, &messages, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &messages, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

/// Provision locale assets, seed the preferences file, and pick the
/// interface language.
///
/// Failures here degrade to the fallback locale rather than aborting;
/// the installer must stay usable on a half-provisioned host.
fn load_messages(paths: &AppPaths) -> Localiser {
    if let Err(error) = provision::provision_locales(&paths.locale_dir(), false) {
        log::warn!("locale provisioning failed: {error}");
    }
    let preferences_file = paths.preferences_file();
    if let Err(error) = settings::ensure_preferences(&preferences_file, i18n::FALLBACK_LOCALE) {
        log::warn!("could not create the preferences file: {error}");
    }
    let language = Preferences::load(&preferences_file)
        .ok()
        .and_then(|prefs| prefs.language().map(ToOwned::to_owned))
        .or_else(settings::system_language);
    Localiser::new(language.as_deref())
}

fn run(
    cli: &Cli,
    paths: &AppPaths,
    family: Option<PackageFamily>,
    messages: &Localiser,
    stderr: &mut dyn Write,
) -> Result<()> {
    let mut status = StatusWriter::new(stderr, messages, cli.quiet);

    if cli.refresh_locales
        && let Some(dir) = provision::provision_locales(&paths.locale_dir(), true)?
    {
        status.say_with("locales-provisioned", &arg("path", dir.to_string_lossy()));
    }

    if cli.list_languages {
        print_languages(paths, &mut status);
        return Ok(());
    }

    if let Some(language) = cli.language.as_deref() {
        return apply_language(paths, language, &mut status);
    }

    let Some(version) = cli.requested_version.as_deref() else {
        // Locale refresh was the only requested action.
        return Ok(());
    };
    run_install(cli, version, family, &mut status)
}

fn print_languages(paths: &AppPaths, status: &mut StatusWriter<'_>) {
    let heading = format!("{}:", status.messages().text("available-languages"));
    status.line(heading);
    for language in provision::available_languages(&paths.locale_dir()) {
        status.line(format!("  {language}"));
    }
}

/// Record the selected language in the preferences file.
fn apply_language(paths: &AppPaths, language: &str, status: &mut StatusWriter<'_>) -> Result<()> {
    let available = provision::available_languages(&paths.locale_dir());
    if !available.iter().any(|known| known == language) {
        status.alert("language-update-failed");
        return Err(InstallerError::UnknownLanguage {
            language: language.to_owned(),
        });
    }

    let preferences_file = paths.preferences_file();
    let mut prefs =
        Preferences::load(&preferences_file).map_err(|error| InstallerError::Settings {
            reason: format!("could not read {}: {error}", preferences_file.display()),
        })?;
    prefs.set_language(language);
    prefs
        .store(&preferences_file)
        .map_err(|error| InstallerError::Settings {
            reason: format!("could not write {}: {error}", preferences_file.display()),
        })?;
    status.say_with("language-updated", &arg("language", language));
    Ok(())
}

/// Validate the host, then run the download-verify-install pipeline.
fn run_install(
    cli: &Cli,
    version: &str,
    family: Option<PackageFamily>,
    status: &mut StatusWriter<'_>,
) -> Result<()> {
    if !family::is_supported_distro() {
        return Err(InstallerError::UnsupportedHost);
    }
    if !download::network_available() {
        return Err(InstallerError::Offline);
    }
    let family = family.ok_or(InstallerError::UnknownPackageFamily)?;

    status.say_with("starting-install", &arg("version", version));
    let executor = SystemCommandExecutor;
    if cli.no_install {
        status.say("verify-only-mode");
    } else if !install::sudo_available(&executor) {
        return Err(InstallerError::PrivilegeDenied);
    }

    let downloader = HttpDownloader;
    let pipeline = Pipeline::new(&downloader, &executor);
    let request = PipelineRequest {
        version: version.to_owned(),
        family,
        do_install: !cli.no_install,
        force_deps: cli.force_deps,
    };

    match pipeline.run(&request, status) {
        Ok(PipelineOutcome::Installed) => {
            status.blank();
            status.say("run-success");
            status.say("run-success-hint");
            Ok(())
        }
        Ok(PipelineOutcome::VerifiedOnly) => Ok(()),
        Err(error) => {
            status.blank();
            status.alert("run-failed");
            Err(error)
        }
    }
}

fn exit_code_for_run_result(
    result: Result<()>,
    messages: &Localiser,
    stderr: &mut dyn Write,
) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, failure_line(&err, messages));
            1
        }
    }
}

/// The final stderr line for a failed run.
///
/// Host and privilege failures map to their localised messages; other
/// errors already narrated themselves and render their display form.
fn failure_line(err: &InstallerError, messages: &Localiser) -> String {
    let key = match err {
        InstallerError::UnsupportedHost => Some("unsupported-host"),
        InstallerError::Offline => Some("offline"),
        InstallerError::UnknownPackageFamily => Some("unknown-package-family"),
        InstallerError::PrivilegeDenied => Some("sudo-required"),
        _ => None,
    };
    key.map_or_else(|| err.to_string(), |key| messages.text(key))
}
