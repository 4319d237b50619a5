//! helmbump Core - chart manifest updates and pull request publishing
//!
//! This crate provides the pieces of a `charts.yaml` bump run:
//! - `Manifest`: the pinned chart list, strictly parsed
//! - `ChartVersion`: lenient semver parsing with precedence ordering
//! - `CommandRunner`: the single boundary for `helm`, `git` and `gh` calls
//! - `update_charts`: the sequential version check over every chart
//! - `Publisher`: branch, commit, push and `gh pr create`

pub mod error;
pub mod helm;
pub mod log;
pub mod manifest;
pub mod mock;
pub mod publish;
pub mod settings;
pub mod shell;
pub mod updater;
pub mod version;

pub use error::{
    ConfigError, HelmbumpError, ManifestError, Result, ShellError, UpdateError, VersionError,
};
pub use helm::{ChartSource, HelmClient, SearchResult};
pub use manifest::{ChartEntry, Manifest, ManifestStore};
pub use publish::{PublishIdentity, PullRequest, Publisher, branch_name};
pub use settings::Settings;
pub use shell::{CommandRunner, CommandSpec, ProcessRunner, Program};
pub use updater::{ChartBump, UpdateReport, update_charts};
pub use version::ChartVersion;
