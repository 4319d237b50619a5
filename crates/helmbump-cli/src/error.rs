//! CLI error types with exit code handling
//!
//! This module provides a unified error type for CLI operations that
//! maps errors to appropriate exit codes.

use helmbump_core::{ConfigError, HelmbumpError, ManifestError, ShellError, UpdateError};
use miette::Diagnostic;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum CliError {
    /// Pull request configuration missing
    #[error("Configuration error: {message}")]
    #[diagnostic(code(helmbump::cli::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Invalid flag or environment value
    #[error("Invalid option: {message}")]
    #[diagnostic(code(helmbump::cli::usage))]
    Usage { message: String },

    /// Version string could not be parsed
    #[error("Version error: {message}")]
    #[diagnostic(code(helmbump::cli::version))]
    Version {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// External command failed
    #[error("Command failed: {message}")]
    #[diagnostic(code(helmbump::cli::command))]
    Command {
        message: String,
        #[help]
        stderr: Option<String>,
    },

    /// Manifest schema error
    #[error("Manifest error: {message}")]
    #[diagnostic(code(helmbump::cli::manifest))]
    Manifest {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Repository has no versions for a chart
    #[error("{message}")]
    #[diagnostic(code(helmbump::cli::no_versions))]
    NoVersions {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// IO error (file not found, permissions, etc.)
    #[error("IO error: {message}")]
    #[diagnostic(code(helmbump::cli::io))]
    Io { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config { .. } => exit_codes::CONFIG_ERROR,
            CliError::Usage { .. } => exit_codes::USAGE_ERROR,
            CliError::Version { .. } => exit_codes::VERSION_ERROR,
            CliError::Command { .. } => exit_codes::COMMAND_ERROR,
            CliError::Manifest { .. } => exit_codes::MANIFEST_ERROR,
            CliError::NoVersions { .. } => exit_codes::NO_VERSIONS,
            CliError::Io { .. } => exit_codes::IO_ERROR,
        }
    }

    /// Create a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        let help = match err {
            ConfigError::MissingToken => "Set GITHUB_TOKEN, or NO_PR=1 to skip the pull request",
            ConfigError::MissingRepository => "Set GITHUB_REPOSITORY to owner/name",
            ConfigError::MissingActor => "Set GITHUB_ACTOR to the commit author name",
        };
        CliError::Config {
            message: err.to_string(),
            help: Some(help.to_string()),
        }
    }
}

impl From<ShellError> for CliError {
    fn from(err: ShellError) -> Self {
        match err {
            ShellError::Failed { ref stderr, .. } => {
                let stderr = stderr.trim();
                CliError::Command {
                    message: err.to_string(),
                    stderr: (!stderr.is_empty()).then(|| stderr.to_string()),
                }
            }
            ShellError::Launch { .. } => CliError::Command {
                message: err.to_string(),
                stderr: None,
            },
            ShellError::EmptyProgram { .. } | ShellError::UnterminatedQuote { .. } => {
                CliError::usage(err.to_string())
            }
        }
    }
}

impl From<ManifestError> for CliError {
    fn from(err: ManifestError) -> Self {
        HelmbumpError::from(err).into()
    }
}

impl From<HelmbumpError> for CliError {
    fn from(err: HelmbumpError) -> Self {
        match err {
            HelmbumpError::Config(e) => e.into(),
            HelmbumpError::Shell(e) => e.into(),
            HelmbumpError::Version(e) => CliError::Version {
                message: e.to_string(),
                help: Some("Versions must look like 1.2.3, v1.2.3 or 1.2".to_string()),
            },
            HelmbumpError::Manifest(e @ ManifestError::Format(_)) => CliError::Manifest {
                message: e.to_string(),
                help: Some(
                    "Each entry needs exactly: name, repo, url, version".to_string(),
                ),
            },
            HelmbumpError::Manifest(e) => CliError::Io {
                message: e.to_string(),
            },
            HelmbumpError::Update(e @ UpdateError::NoVersions { .. }) => CliError::NoVersions {
                message: e.to_string(),
                help: Some("Check the chart name and repository URL in the manifest".to_string()),
            },
            HelmbumpError::Update(e) => CliError::Command {
                message: e.to_string(),
                stderr: None,
            },
        }
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_errors_exit_one() {
        for err in [
            ConfigError::MissingToken,
            ConfigError::MissingRepository,
            ConfigError::MissingActor,
        ] {
            let cli: CliError = HelmbumpError::from(err).into();
            assert_eq!(cli.exit_code(), 1);
        }
    }

    #[test]
    fn test_no_versions_exit_code() {
        let err = HelmbumpError::from(UpdateError::NoVersions {
            repo: "bitnami".to_string(),
            name: "nginx".to_string(),
        });
        let cli = CliError::from(err);
        assert_eq!(cli.exit_code(), exit_codes::NO_VERSIONS);
        assert!(cli.to_string().contains("bitnami/nginx"));
    }

    #[test]
    fn test_manifest_format_vs_io() {
        let format = helmbump_core::Manifest::parse("- nope").unwrap_err();
        assert!(matches!(format, ManifestError::Format(_)));
        let cli = CliError::from(HelmbumpError::from(format));
        assert_eq!(cli.exit_code(), exit_codes::MANIFEST_ERROR);

        let read = ManifestError::Read {
            path: "charts.yaml".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let cli = CliError::from(HelmbumpError::from(read));
        assert_eq!(cli.exit_code(), exit_codes::IO_ERROR);
    }

    #[test]
    fn test_program_parse_is_usage_error() {
        let cli = CliError::from(ShellError::EmptyProgram {
            what: "helm".to_string(),
        });
        assert_eq!(cli.exit_code(), exit_codes::USAGE_ERROR);
    }
}
