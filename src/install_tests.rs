//! Tests for privileged package installation.

use super::*;
use crate::i18n::Localiser;
use crate::test_utils::{StubExecutor, StubbedCommand, output_with};
use rstest::rstest;
use std::path::PathBuf;

fn package_path() -> PathBuf {
    PathBuf::from("/tmp/protonpass_test/proton-pass_1.32.5_amd64.deb")
}

fn install_quietly(
    executor: &StubExecutor,
    family: PackageFamily,
    file: &std::path::Path,
    force_deps: bool,
) -> Result<()> {
    let messages = Localiser::new(Some("en"));
    let mut sink = Vec::new();
    let mut status = StatusWriter::new(&mut sink, &messages, true);
    install_package(executor, family, file, force_deps, &mut status)
}

#[test]
fn sudo_available_when_probe_succeeds() {
    let executor = StubExecutor::new(vec![StubbedCommand {
        cmd: "sudo",
        args_prefix: vec!["-n", "true"],
        output: output_with(0, "", ""),
    }]);
    assert!(sudo_available(&executor));
}

#[test]
fn sudo_unavailable_when_probe_fails() {
    let executor = StubExecutor::new(vec![StubbedCommand {
        cmd: "sudo",
        args_prefix: vec!["-n", "true"],
        output: output_with(1, "", "a password is required"),
    }]);
    assert!(!sudo_available(&executor));
}

#[test]
fn deb_install_runs_dpkg_once_on_success() {
    let executor = StubExecutor::new(vec![StubbedCommand {
        cmd: "sudo",
        args_prefix: vec!["dpkg", "-i"],
        output: output_with(0, "", ""),
    }]);

    install_quietly(&executor, PackageFamily::Deb, &package_path(), false)
        .expect("install succeeds");
    assert!(executor.exhausted());

    let calls = executor.calls();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].1.contains(&package_path().to_string_lossy().into_owned()));
}

#[test]
fn deb_install_failure_without_force_deps_carries_stderr() {
    let executor = StubExecutor::new(vec![StubbedCommand {
        cmd: "sudo",
        args_prefix: vec!["dpkg", "-i"],
        output: output_with(1, "", "dependency problems prevent configuration"),
    }]);

    let err = install_quietly(&executor, PackageFamily::Deb, &package_path(), false)
        .expect_err("install fails");
    assert!(matches!(
        err,
        InstallerError::Install { ref stderr } if stderr.contains("dependency problems")
    ));
    // No dependency repair was attempted.
    assert_eq!(executor.calls().len(), 1);
}

#[test]
fn deb_install_with_force_deps_repairs_and_retries_once() {
    let executor = StubExecutor::new(vec![
        StubbedCommand {
            cmd: "sudo",
            args_prefix: vec!["dpkg", "-i"],
            output: output_with(1, "", "dependency problems"),
        },
        StubbedCommand {
            cmd: "dpkg-deb",
            args_prefix: vec!["-f"],
            output: output_with(0, "libc6 (>= 2.17), libgtk-3-0 | libgtk-4-1\n", ""),
        },
        StubbedCommand {
            cmd: "sudo",
            args_prefix: vec!["apt-get", "install", "-y", "libc6", "libgtk-3-0"],
            output: output_with(0, "", ""),
        },
        StubbedCommand {
            cmd: "sudo",
            args_prefix: vec!["dpkg", "-i"],
            output: output_with(0, "", ""),
        },
    ]);

    install_quietly(&executor, PackageFamily::Deb, &package_path(), true)
        .expect("repaired install succeeds");
    assert!(executor.exhausted());
}

#[test]
fn deb_install_fails_when_retry_also_fails() {
    let executor = StubExecutor::new(vec![
        StubbedCommand {
            cmd: "sudo",
            args_prefix: vec!["dpkg", "-i"],
            output: output_with(1, "", "first failure"),
        },
        StubbedCommand {
            cmd: "dpkg-deb",
            args_prefix: vec!["-f"],
            output: output_with(0, "libnotify4", ""),
        },
        StubbedCommand {
            cmd: "sudo",
            args_prefix: vec!["apt-get", "install", "-y", "libnotify4"],
            output: output_with(0, "", ""),
        },
        StubbedCommand {
            cmd: "sudo",
            args_prefix: vec!["dpkg", "-i"],
            output: output_with(1, "", "still broken"),
        },
    ]);

    let err = install_quietly(&executor, PackageFamily::Deb, &package_path(), true)
        .expect_err("retry fails");
    assert!(matches!(
        err,
        InstallerError::Install { ref stderr } if stderr.contains("still broken")
    ));
    assert!(executor.exhausted());
}

#[test]
fn deb_repair_with_empty_depends_skips_apt_and_retries() {
    let executor = StubExecutor::new(vec![
        StubbedCommand {
            cmd: "sudo",
            args_prefix: vec!["dpkg", "-i"],
            output: output_with(1, "", "first failure"),
        },
        StubbedCommand {
            cmd: "dpkg-deb",
            args_prefix: vec!["-f"],
            output: output_with(0, "\n", ""),
        },
        StubbedCommand {
            cmd: "sudo",
            args_prefix: vec!["dpkg", "-i"],
            output: output_with(0, "", ""),
        },
    ]);

    install_quietly(&executor, PackageFamily::Deb, &package_path(), true)
        .expect("retry succeeds");
    assert!(executor.exhausted());
}

#[test]
fn deb_repair_announces_itself() {
    let executor = StubExecutor::new(vec![
        StubbedCommand {
            cmd: "sudo",
            args_prefix: vec!["dpkg", "-i"],
            output: output_with(1, "", "dependency problems"),
        },
        StubbedCommand {
            cmd: "dpkg-deb",
            args_prefix: vec!["-f"],
            output: output_with(0, "libnotify4", ""),
        },
        StubbedCommand {
            cmd: "sudo",
            args_prefix: vec!["apt-get", "install", "-y", "libnotify4"],
            output: output_with(0, "", ""),
        },
        StubbedCommand {
            cmd: "sudo",
            args_prefix: vec!["dpkg", "-i"],
            output: output_with(0, "", ""),
        },
    ]);

    let messages = Localiser::new(Some("en"));
    let mut sink = Vec::new();
    let mut status = StatusWriter::new(&mut sink, &messages, false);
    install_package(&executor, PackageFamily::Deb, &package_path(), true, &mut status)
        .expect("repaired install succeeds");

    let text = String::from_utf8(sink).expect("UTF-8 output");
    assert!(text.contains("dependencies"));
}

#[test]
fn rpm_install_runs_dnf_with_no_repair_path() {
    let executor = StubExecutor::new(vec![StubbedCommand {
        cmd: "sudo",
        args_prefix: vec!["dnf", "install", "-y"],
        output: output_with(1, "", "no match for argument"),
    }]);

    let err = install_quietly(
        &executor,
        PackageFamily::Rpm,
        &PathBuf::from("/tmp/protonpass_test/proton-pass-1.32.5.rpm"),
        true,
    )
    .expect_err("install fails");
    assert!(matches!(err, InstallerError::Install { .. }));
    // force_deps has no effect for rpm: exactly one invocation.
    assert_eq!(executor.calls().len(), 1);
}

#[rstest]
#[case::versions_and_alternatives(
    "libc6 (>= 2.17), libgtk-3-0 | libgtk-4-1, libnotify4",
    &["libc6", "libgtk-3-0", "libnotify4"]
)]
#[case::single("libasound2", &["libasound2"])]
#[case::whitespace("  libnss3 ,  libxss1 ", &["libnss3", "libxss1"])]
#[case::empty("", &[])]
fn parse_depends_extracts_bare_names(#[case] field: &str, #[case] expected: &[&str]) {
    assert_eq!(parse_depends(field), expected);
}
