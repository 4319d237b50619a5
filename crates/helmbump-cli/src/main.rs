//! helmbump CLI - opens pull requests that bump Helm chart versions

use clap::Parser;
use helmbump_core::settings::{Settings, non_empty};
use helmbump_core::{ProcessRunner, Program};
use std::path::PathBuf;

mod commands;
mod error;
mod exit_codes;
mod logging;

use error::{CliError, Result};

#[derive(Parser, Debug)]
#[command(name = "helmbump")]
#[command(author = "helmbump Contributors")]
#[command(version)]
#[command(about = "Bump Helm chart versions pinned in charts.yaml and open a pull request", long_about = None)]
struct Cli {
    /// Root for the manifest and every git/gh command [default: /github/workspace]
    #[arg(long, env = "WORKING_DIRECTORY")]
    working_directory: Option<String>,

    /// Manifest file inside the working directory [default: charts.yaml]
    #[arg(long, env = "CHART_FILE")]
    chart_file: Option<String>,

    /// Only report newer versions; leave the manifest and repository alone
    #[arg(long, env = "NO_WRITE", num_args = 0..=1, default_missing_value = "true")]
    no_write: Option<String>,

    /// Rewrite the manifest but do not branch, commit, push or open a pull request
    #[arg(long = "no-pr", env = "NO_PR", num_args = 0..=1, default_missing_value = "true")]
    no_pr: Option<String>,

    /// GitHub token used by gh
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitHub repository (owner/name)
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Commit author name
    #[arg(long, env = "GITHUB_ACTOR")]
    actor: Option<String>,

    /// Pull request base branch [default: main]
    #[arg(long, env = "MAIN_BRANCH")]
    base_branch: Option<String>,

    /// helm command line
    #[arg(long, env = "HELM_BIN")]
    helm: Option<String>,

    /// git command line
    #[arg(long, env = "GIT_BIN")]
    git: Option<String>,

    /// GitHub CLI command line
    #[arg(long, env = "GH_BIN")]
    gh: Option<String>,

    /// Enable debug output
    #[arg(long)]
    debug: bool,
}

impl Cli {
    /// Collect flags and environment into one [`Settings`]
    fn into_settings(self) -> Result<Settings> {
        let defaults = Settings::default();

        Ok(Settings {
            working_directory: non_empty(self.working_directory)
                .map(PathBuf::from)
                .unwrap_or(defaults.working_directory),
            chart_file: non_empty(self.chart_file).unwrap_or(defaults.chart_file),
            no_write: non_empty(self.no_write).is_some(),
            no_pull_request: non_empty(self.no_pr).is_some(),
            token: non_empty(self.token),
            repository: non_empty(self.repository),
            actor: non_empty(self.actor),
            base_branch: non_empty(self.base_branch).unwrap_or(defaults.base_branch),
            helm: program("helm", self.helm, defaults.helm)?,
            git: program("git", self.git, defaults.git)?,
            gh: program("gh", self.gh, defaults.gh)?,
        })
    }
}

fn program(what: &str, line: Option<String>, default: Program) -> Result<Program> {
    match non_empty(line) {
        Some(line) => Program::parse(what, &line).map_err(CliError::from),
        None => Ok(default),
    }
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();
    logging::init(cli.debug);

    let code = match cli
        .into_settings()
        .and_then(|settings| commands::update::run(&settings, &ProcessRunner))
    {
        Ok(outcome) => {
            if let commands::update::Outcome::Published { branch } = outcome {
                tracing::info!("Done: pull request opened from {}", branch);
            }
            exit_codes::SUCCESS
        }
        Err(err) => {
            let code = err.exit_code();
            eprintln!("{:?}", miette::Report::new(err));
            code
        }
    };

    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["helmbump"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_override_defaults() {
        let settings = parse(&[
            "--working-directory",
            "/repo",
            "--chart-file",
            "helm/charts.yaml",
            "--no-write",
            "--base-branch",
            "develop",
            "--helm",
            "docker run --rm alpine/helm",
        ])
        .into_settings()
        .unwrap();

        assert_eq!(settings.chart_path(), PathBuf::from("/repo/helm/charts.yaml"));
        assert!(settings.no_write);
        assert_eq!(settings.base_branch, "develop");
        assert_eq!(settings.helm.executable(), "docker");
    }

    #[test]
    fn test_flag_with_value() {
        let cli = Cli::try_parse_from(["helmbump", "--no-pr=1", "--repository", "acme/infra"]).unwrap();
        let settings = cli.into_settings().unwrap();
        assert!(settings.no_pull_request);
        assert_eq!(settings.repository.as_deref(), Some("acme/infra"));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let cli = Cli {
            working_directory: Some(String::new()),
            chart_file: Some(String::new()),
            no_write: Some(String::new()),
            no_pr: None,
            token: Some(" ".to_string()),
            repository: None,
            actor: None,
            base_branch: Some(String::new()),
            helm: Some(String::new()),
            git: None,
            gh: None,
            debug: false,
        };
        let settings = cli.into_settings().unwrap();

        assert_eq!(
            settings.chart_path(),
            PathBuf::from("/github/workspace/charts.yaml")
        );
        assert!(!settings.no_write);
        assert_eq!(settings.token, None);
        assert_eq!(settings.base_branch, "main");
        assert_eq!(settings.helm.executable(), "helm");
    }

    #[test]
    fn test_bad_program_is_usage_error() {
        let cli = Cli::try_parse_from(["helmbump", "--git", "\"unterminated"]).unwrap();
        let err = cli.into_settings().unwrap_err();
        assert_eq!(err.exit_code(), exit_codes::USAGE_ERROR);
    }
}
