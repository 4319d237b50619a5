//! Run configuration
//!
//! Everything the run needs from its environment is collected here once at
//! startup and handed to each component.

use std::path::PathBuf;

use crate::shell::Program;

/// Default working directory (the GitHub Actions workspace mount)
pub const DEFAULT_WORKING_DIRECTORY: &str = "/github/workspace";

/// Default manifest file name inside the working directory
pub const DEFAULT_CHART_FILE: &str = "charts.yaml";

/// Default pull request base branch
pub const DEFAULT_BASE_BRANCH: &str = "main";

#[derive(Debug, Clone)]
pub struct Settings {
    /// Root for manifest lookup and every git/gh command
    pub working_directory: PathBuf,

    /// Manifest file name, relative to `working_directory`
    pub chart_file: String,

    /// Skip the manifest rewrite and pull request
    pub no_write: bool,

    /// Rewrite the manifest but do not branch, commit, push or open a PR
    pub no_pull_request: bool,

    /// GitHub token handed to `gh`
    pub token: Option<String>,

    /// `owner/name` of the GitHub repository
    pub repository: Option<String>,

    /// Commit author name
    pub actor: Option<String>,

    pub base_branch: String,

    pub helm: Program,
    pub git: Program,
    pub gh: Program,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            working_directory: PathBuf::from(DEFAULT_WORKING_DIRECTORY),
            chart_file: DEFAULT_CHART_FILE.to_string(),
            no_write: false,
            no_pull_request: false,
            token: None,
            repository: None,
            actor: None,
            base_branch: DEFAULT_BASE_BRANCH.to_string(),
            helm: Program::new("helm"),
            git: Program::new("git"),
            gh: Program::new("gh"),
        }
    }
}

impl Settings {
    /// Full path of the chart manifest
    pub fn chart_path(&self) -> PathBuf {
        self.working_directory.join(&self.chart_file)
    }
}

/// Treat empty or whitespace-only values as unset
pub fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
