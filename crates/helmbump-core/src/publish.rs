//! Pull request creation for bumped charts
//!
//! Branch, commit and push go through `git`; the pull request itself is opened
//! with the GitHub CLI (`gh`).

use rand::Rng;
use rand::distr::Alphanumeric;
use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::log;
use crate::settings::{Settings, non_empty};
use crate::shell::{CommandRunner, Program};
use crate::updater::ChartBump;

/// Prefix of every branch this tool pushes
pub const BRANCH_PREFIX: &str = "helm-update-";

/// Commit message for the manifest change
pub const COMMIT_MESSAGE: &str = "Updated chart versions";

/// Labels attached to every pull request
pub const LABELS: [&str; 2] = ["dependencies", "github_actions"];

const BODY_HEADER: &str = "## Helm Chart Updater";

/// Credentials and identity needed to push and open a pull request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishIdentity {
    pub token: String,
    pub repository: String,
    pub actor: String,
}

impl PublishIdentity {
    /// Validate the GitHub settings, reporting the first one missing
    pub fn from_settings(settings: &Settings) -> std::result::Result<Self, ConfigError> {
        let token = non_empty(settings.token.clone()).ok_or(ConfigError::MissingToken)?;
        let repository =
            non_empty(settings.repository.clone()).ok_or(ConfigError::MissingRepository)?;
        let actor = non_empty(settings.actor.clone()).ok_or(ConfigError::MissingActor)?;
        Ok(Self {
            token,
            repository,
            actor,
        })
    }
}

/// Title and body describing a set of bumps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    pub title: String,
    pub body: String,
}

impl PullRequest {
    /// Describe `updated` charts
    pub fn from_updates(updated: &[ChartBump]) -> Self {
        let clauses: Vec<String> = updated
            .iter()
            .map(|b| format!("{} from {} to {}", b.name, b.from, b.to))
            .collect();

        let mut body = format!("{}\n", BODY_HEADER);
        for bump in updated {
            body.push_str(&format!(
                "Bumps {} Helm Chart version from {} to {}.\n",
                bump.name, bump.from, bump.to
            ));
        }

        Self {
            title: format!("Bump {}", clauses.join(", ")),
            body,
        }
    }

    pub fn log(&self) {
        tracing::info!("Pull Request Title:");
        tracing::info!("{}", self.title);
        tracing::info!("Pull Request Body:");
        log::lines(&self.body);
    }
}

/// A fresh branch name, unique per run
pub fn branch_name() -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect();
    format!("{}{}", BRANCH_PREFIX, suffix)
}

/// Pushes the rewritten manifest and opens the pull request
pub struct Publisher<'a, R> {
    git: &'a Program,
    gh: &'a Program,
    base_branch: &'a str,
    runner: R,
}

impl<'a, R: CommandRunner> Publisher<'a, R> {
    pub fn new(settings: &'a Settings, runner: R) -> Self {
        Self {
            git: &settings.git,
            gh: &settings.gh,
            base_branch: &settings.base_branch,
            runner,
        }
    }

    /// Commit everything in `working_dir` on `branch` and open a pull request.
    ///
    /// Stops at the first failing command.
    pub fn publish(
        &self,
        pr: &PullRequest,
        identity: &PublishIdentity,
        working_dir: &Path,
        branch: &str,
    ) -> Result<()> {
        self.git(working_dir, &["config", "user.name", identity.actor.as_str()])?;
        self.git(working_dir, &["config", "user.email", "<>"])?;

        tracing::info!("Creating new branch {}...", branch);
        self.git(working_dir, &["checkout", "-b", branch])?;
        tracing::info!("Branch successfully created!");

        tracing::info!("Committing changes to remote branch...");
        self.git(working_dir, &["add", "-A"])?;
        self.git(working_dir, &["commit", "-m", COMMIT_MESSAGE])?;
        self.git(working_dir, &["push", "-u", "origin", branch])?;
        tracing::info!("Successfully pushed changes to remote branch!");

        tracing::info!("Creating pull request...");
        let mut create = self
            .gh
            .command()
            .args(["pr", "create"])
            .args(["--repo", identity.repository.as_str()])
            .args(["--title", pr.title.as_str()])
            .args(["--body", pr.body.as_str()])
            .args(["--base", self.base_branch])
            .args(["--head", branch]);
        for label in LABELS {
            create = create.args(["--label", label]);
        }
        let create = create
            .current_dir(working_dir)
            .env("GH_TOKEN", identity.token.as_str());

        self.runner.run(&create)?;
        tracing::info!("Successfully created pull request!");
        Ok(())
    }

    fn git(&self, working_dir: &Path, args: &[&str]) -> Result<()> {
        let spec = self
            .git
            .command()
            .args(args.iter().copied())
            .current_dir(working_dir);
        self.runner.run(&spec)?;
        Ok(())
    }
}
