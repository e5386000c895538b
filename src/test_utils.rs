//! Shared test helpers for command-execution tests.

use crate::error::Result;
use crate::install::CommandExecutor;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};

/// Build an [`ExitStatus`] carrying `code`.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Build a captured [`Output`] with the given exit code and stderr.
pub fn output_with(code: i32, stdout: &str, stderr: &str) -> Output {
    Output {
        status: exit_status(code),
        stdout: stdout.as_bytes().to_vec(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// One scripted command invocation and its canned result.
pub struct StubbedCommand {
    /// The expected program name.
    pub cmd: &'static str,
    /// The expected leading arguments; the invocation must start with
    /// these (trailing arguments such as file paths are not matched).
    pub args_prefix: Vec<&'static str>,
    /// The output to return.
    pub output: Output,
}

/// A [`CommandExecutor`] that returns scripted responses in order and
/// panics on any invocation it was not prepared for.
pub struct StubExecutor {
    script: RefCell<VecDeque<StubbedCommand>>,
    calls: RefCell<Vec<(String, Vec<String>)>>,
}

impl StubExecutor {
    /// Create a stub that will serve `script` in order.
    pub fn new(script: Vec<StubbedCommand>) -> Self {
        Self {
            script: RefCell::new(script.into_iter().collect()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Create a stub that panics on any command invocation.
    pub fn forbidding() -> Self {
        Self::new(Vec::new())
    }

    /// Every invocation observed so far, in order.
    pub fn calls(&self) -> Vec<(String, Vec<String>)> {
        self.calls.borrow().clone()
    }

    /// Whether every scripted command was consumed.
    pub fn exhausted(&self) -> bool {
        self.script.borrow().is_empty()
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        self.calls.borrow_mut().push((
            cmd.to_owned(),
            args.iter().map(|a| (*a).to_owned()).collect(),
        ));

        let Some(next) = self.script.borrow_mut().pop_front() else {
            panic!("unexpected command invocation: {cmd} {args:?}");
        };
        assert_eq!(next.cmd, cmd, "unexpected program: {cmd} {args:?}");
        assert!(
            args.len() >= next.args_prefix.len()
                && args[..next.args_prefix.len()] == next.args_prefix[..],
            "unexpected arguments for {cmd}: {args:?} (wanted prefix {:?})",
            next.args_prefix,
        );
        Ok(next.output)
    }
}
