//! Core error types

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// A version string that is not a semantic version
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid version '{input}': {reason}")]
pub struct VersionError {
    pub input: String,
    pub reason: String,
}

/// Errors reading or writing the chart manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid chart manifest: {0}")]
    Format(#[from] serde_yaml::Error),
}

/// Errors running an external command
#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Failed to launch `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed with {status}")]
    Failed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Empty command line for {what}")]
    EmptyProgram { what: String },

    #[error("Unterminated quote in command line: {line}")]
    UnterminatedQuote { line: String },
}

/// Errors while looking up chart versions
#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("No versions available for chart {repo}/{name}")]
    NoVersions { repo: String, name: String },

    #[error("Failed to parse helm search output for {chart}: {source}")]
    SearchOutput {
        chart: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Missing configuration required to open a pull request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No GitHub token (env GITHUB_TOKEN) provided")]
    MissingToken,

    #[error("No GitHub repository (env GITHUB_REPOSITORY) provided")]
    MissingRepository,

    #[error("No GitHub actor (env GITHUB_ACTOR) provided")]
    MissingActor,
}

/// Umbrella error for the whole update run
#[derive(Error, Debug)]
pub enum HelmbumpError {
    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Shell(#[from] ShellError),

    #[error(transparent)]
    Update(#[from] UpdateError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, HelmbumpError>;
