//! Mock command runner for testing
//!
//! Records every command and answers from canned responses, so the update
//! pipeline and publisher can be exercised without `helm`, `git` or `gh`.

use std::cell::RefCell;

use crate::error::ShellError;
use crate::shell::{CommandRunner, CommandSpec};

/// A canned response for commands whose arguments start with `prefix`
#[derive(Debug, Clone)]
struct Response {
    program: String,
    prefix: Vec<String>,
    outcome: Outcome,
}

#[derive(Debug, Clone)]
enum Outcome {
    Stdout(Vec<u8>),
    Fail { code: i32, stderr: String },
}

/// In-memory command runner
#[derive(Debug, Default)]
pub struct MockRunner {
    responses: Vec<Response>,
    calls: RefCell<Vec<CommandSpec>>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `program prefix...` with `stdout`.
    ///
    /// Later registrations win over earlier ones for the same command.
    pub fn respond<S: Into<String>>(
        mut self,
        program: &str,
        prefix: impl IntoIterator<Item = S>,
        stdout: impl Into<Vec<u8>>,
    ) -> Self {
        self.responses.push(Response {
            program: program.to_string(),
            prefix: prefix.into_iter().map(Into::into).collect(),
            outcome: Outcome::Stdout(stdout.into()),
        });
        self
    }

    /// Make `program prefix...` exit with `code`
    pub fn fail<S: Into<String>>(
        mut self,
        program: &str,
        prefix: impl IntoIterator<Item = S>,
        code: i32,
        stderr: &str,
    ) -> Self {
        self.responses.push(Response {
            program: program.to_string(),
            prefix: prefix.into_iter().map(Into::into).collect(),
            outcome: Outcome::Fail {
                code,
                stderr: stderr.to_string(),
            },
        });
        self
    }

    /// All commands run so far, in order
    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.borrow().clone()
    }

    /// Commands run so far, rendered as `program args...`
    pub fn command_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(ToString::to_string).collect()
    }

    /// Number of commands run for `program`
    pub fn count(&self, program: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.program == program)
            .count()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, spec: &CommandSpec) -> Result<Vec<u8>, ShellError> {
        self.calls.borrow_mut().push(spec.clone());

        let response = self.responses.iter().rev().find(|r| {
            r.program == spec.program
                && spec.args.len() >= r.prefix.len()
                && spec.args.iter().zip(&r.prefix).all(|(a, p)| a == p)
        });

        match response.map(|r| &r.outcome) {
            Some(Outcome::Stdout(out)) => Ok(out.clone()),
            Some(Outcome::Fail { code, stderr }) => Err(ShellError::Failed {
                command: spec.to_string(),
                status: exit_status(*code),
                stderr: stderr.clone(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(unix)]
fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
fn exit_status(code: i32) -> std::process::ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    std::process::ExitStatus::from_raw(code as u32)
}
