//! External command execution
//!
//! Every call to `helm`, `git` and `gh` goes through [`CommandRunner`], which
//! takes an explicit program and argument list. Nothing is re-tokenized after
//! construction, so titles and bodies with spaces or quotes reach the child
//! process untouched.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::ShellError;
use crate::log;

/// A fully specified command invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub current_dir: Option<PathBuf>,
    pub envs: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            current_dir: None,
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Extra environment for the child; values are never echoed to the log
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) || arg.contains('"') {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// A configured executable, possibly with leading arguments
/// (`docker run --rm alpine/helm`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    executable: String,
    leading_args: Vec<String>,
}

impl Program {
    /// A bare executable with no leading arguments
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            leading_args: Vec::new(),
        }
    }

    /// Parse a configured command line such as `helm` or `"/opt/my tools/helm" --debug`
    pub fn parse(what: &str, line: &str) -> Result<Self, ShellError> {
        let mut tokens = tokenize(line)?.into_iter();
        let executable = tokens.next().ok_or_else(|| ShellError::EmptyProgram {
            what: what.to_string(),
        })?;
        Ok(Self {
            executable,
            leading_args: tokens.collect(),
        })
    }

    /// Start a command for this program
    pub fn command(&self) -> CommandSpec {
        CommandSpec::new(&self.executable).args(self.leading_args.iter().cloned())
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }
}

/// Split a command line on spaces, keeping double-quoted text together.
///
/// Quote characters are removed. This is only used for configured program
/// overrides; arguments built by the tool never pass through here.
pub fn tokenize(line: &str) -> Result<Vec<String>, ShellError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(ShellError::UnterminatedQuote {
            line: line.to_string(),
        });
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Runs external commands
pub trait CommandRunner {
    /// Run `spec` to completion and return its stdout.
    ///
    /// A non-zero exit is an error.
    fn run(&self, spec: &CommandSpec) -> Result<Vec<u8>, ShellError>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, spec: &CommandSpec) -> Result<Vec<u8>, ShellError> {
        (**self).run(spec)
    }
}

/// Runs commands as child processes, logging each invocation and its output
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, spec: &CommandSpec) -> Result<Vec<u8>, ShellError> {
        let command_line = spec.to_string();
        tracing::info!("$ {}", command_line);

        let mut command = Command::new(&spec.program);
        command.args(&spec.args);
        if let Some(dir) = &spec.current_dir {
            command.current_dir(dir);
        }
        for (key, value) in &spec.envs {
            command.env(key, value);
        }

        let output = command.output().map_err(|source| {
            tracing::error!("Failed to launch {}: {}", spec.program, source);
            ShellError::Launch {
                command: command_line.clone(),
                source,
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            tracing::error!("{}", output.status);
            log::warn_lines(&stderr);
            return Err(ShellError::Failed {
                command: command_line,
                status: output.status,
                stderr,
            });
        }

        tracing::info!("Result:");
        log::lines(&String::from_utf8_lossy(&output.stdout));
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_plain() {
        assert_eq!(tokenize("helm repo update").unwrap(), ["helm", "repo", "update"]);
        assert_eq!(tokenize("  helm   repo  ").unwrap(), ["helm", "repo"]);
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize(r#"git commit -m "Updated chart versions""#).unwrap(),
            ["git", "commit", "-m", "Updated chart versions"]
        );
        assert_eq!(
            tokenize(r#""/opt/my tools/helm" --debug"#).unwrap(),
            ["/opt/my tools/helm", "--debug"]
        );
        assert_eq!(tokenize(r#"echo """#).unwrap(), ["echo", ""]);
        assert_eq!(tokenize(r#"a"b c"d"#).unwrap(), ["ab cd"]);
    }

    #[test]
    fn test_tokenize_unterminated_quote() {
        let err = tokenize(r#"helm "repo"#).unwrap_err();
        assert!(matches!(err, ShellError::UnterminatedQuote { .. }));
    }

    #[test]
    fn test_program_parse() {
        let program = Program::parse("helm", "docker run --rm alpine/helm").unwrap();
        assert_eq!(program.executable(), "docker");

        let spec = program.command().args(["repo", "update"]);
        assert_eq!(spec.program, "docker");
        assert_eq!(spec.args, ["run", "--rm", "alpine/helm", "repo", "update"]);
    }

    #[test]
    fn test_program_parse_empty() {
        let err = Program::parse("git", "   ").unwrap_err();
        assert!(err.to_string().contains("git"));
    }

    #[test]
    fn test_command_display_quotes_spaces() {
        let spec = CommandSpec::new("git")
            .args(["commit", "-m", "Updated chart versions"])
            .env("GH_TOKEN", "secret");
        assert_eq!(spec.to_string(), r#"git commit -m "Updated chart versions""#);
        assert!(!spec.to_string().contains("secret"));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_captures_stdout() {
        let dir = tempfile::TempDir::new().unwrap();
        let spec = CommandSpec::new("sh")
            .args(["-c", "pwd; echo \"$GREETING\""])
            .current_dir(dir.path())
            .env("GREETING", "hello world");

        let out = ProcessRunner.run(&spec).unwrap();
        let out = String::from_utf8(out).unwrap();
        let mut lines = out.lines();
        let pwd = std::path::PathBuf::from(lines.next().unwrap());
        assert_eq!(pwd.canonicalize().unwrap(), dir.path().canonicalize().unwrap());
        assert_eq!(lines.next(), Some("hello world"));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_nonzero_exit() {
        let spec = CommandSpec::new("sh").args(["-c", "echo boom >&2; exit 3"]);
        match ProcessRunner.run(&spec).unwrap_err() {
            ShellError::Failed {
                command,
                status,
                stderr,
            } => {
                assert_eq!(command, r#"sh -c "echo boom >&2; exit 3""#);
                assert_eq!(status.code(), Some(3));
                assert_eq!(stderr.trim(), "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_process_runner_launch_failure() {
        let spec = CommandSpec::new("helmbump-definitely-not-a-real-binary");
        let err = ProcessRunner.run(&spec).unwrap_err();
        assert!(matches!(err, ShellError::Launch { .. }));
    }
}
