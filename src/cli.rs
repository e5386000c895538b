//! Command-line interface definition.

use clap::{CommandFactory, FromArgMatches, Parser};

/// Downloads, verifies, and installs Proton Pass automatically.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "proton-pass-installer",
    about = "Downloads, verifies, and installs Proton Pass automatically",
    after_help = "Example: proton-pass-installer 1.32.5"
)]
pub struct Cli {
    /// Proton Pass release version to install (for example: 1.32.5)
    #[arg(value_name = "VERSION")]
    pub requested_version: Option<String>,

    /// Download and verify only, do not install
    #[arg(short = 'n', long)]
    pub no_install: bool,

    /// Install missing dependencies when a deb install fails
    #[arg(short = 'f', long)]
    pub force_deps: bool,

    /// Show the available languages and exit
    #[arg(long, visible_alias = "list-langs", conflicts_with = "language")]
    pub list_languages: bool,

    /// Set the application language (for example: -l es) and exit
    #[arg(short = 'l', long, value_name = "LANGUAGE")]
    pub language: Option<String>,

    /// Re-copy the bundled language files and exit
    #[arg(long)]
    pub refresh_locales: bool,

    /// Suppress progress output
    #[arg(short = 'q', long)]
    pub quiet: bool,
}

impl Cli {
    /// Parse the process arguments, reporting `installed` for
    /// `--version`.
    ///
    /// The version flag reflects the recorded installation marker
    /// rather than the build-time crate version.
    #[must_use]
    pub fn parse_with_version(installed: String) -> Self {
        let matches = Self::command().version(installed).get_matches();
        match Self::from_arg_matches(&matches) {
            Ok(cli) => cli,
            Err(error) => error.exit(),
        }
    }

    /// Whether any requested action was selected.
    #[must_use]
    pub fn has_action(&self) -> bool {
        self.requested_version.is_some()
            || self.list_languages
            || self.language.is_some()
            || self.refresh_locales
    }
}
