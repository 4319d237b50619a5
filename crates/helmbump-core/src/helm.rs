//! Helm repository queries through the `helm` CLI

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::{Result, UpdateError};
use crate::manifest::ChartEntry;
use crate::shell::{CommandRunner, CommandSpec, Program};

/// One record of `helm search repo --output yaml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResult {
    /// `<repo>/<chart>`
    pub name: String,

    pub version: String,

    #[serde(default)]
    pub app_version: Option<String>,

    #[serde(default)]
    pub description: Option<String>,
}

/// Where the update pipeline learns about upstream chart versions
pub trait ChartSource {
    /// Make sure the chart's repository is registered and its index is fresh
    fn refresh(&mut self, chart: &ChartEntry) -> Result<()>;

    /// Versions of exactly this chart, highest first
    fn search(&mut self, chart: &ChartEntry) -> Result<Vec<SearchResult>>;
}

/// [`ChartSource`] backed by the `helm` CLI
pub struct HelmClient<R> {
    helm: Program,
    working_dir: Option<PathBuf>,
    runner: R,
}

impl<R: CommandRunner> HelmClient<R> {
    pub fn new(helm: Program, runner: R) -> Self {
        Self {
            helm,
            working_dir: None,
            runner,
        }
    }

    /// Run every `helm` command from `dir`
    pub fn in_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.working_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    fn command<'a>(&self, args: impl IntoIterator<Item = &'a str>) -> CommandSpec {
        let spec = self.helm.command().args(args);
        match &self.working_dir {
            Some(dir) => spec.current_dir(dir),
            None => spec,
        }
    }
}

impl<R: CommandRunner> ChartSource for HelmClient<R> {
    fn refresh(&mut self, chart: &ChartEntry) -> Result<()> {
        tracing::info!("Getting {} Helm repository from {}", chart.name, chart.url);

        let add = self.command(["repo", "add", chart.repo.as_str(), chart.url.as_str(), "--force-update"]);
        self.runner.run(&add)?;

        let update = self.command(["repo", "update", chart.repo.as_str()]);
        self.runner.run(&update)?;
        Ok(())
    }

    fn search(&mut self, chart: &ChartEntry) -> Result<Vec<SearchResult>> {
        tracing::info!("Pulling {} versions", chart.name);

        let qualified = chart.qualified_name();
        let search = self.command([
            "search",
            "repo",
            qualified.as_str(),
            "--versions",
            "--output",
            "yaml",
        ]);
        let stdout = self.runner.run(&search)?;
        parse_search_output(&qualified, &stdout)
    }
}

/// Parse `helm search repo -o yaml` output, keeping only `qualified` itself.
///
/// Helm matches the query as a substring, so `bitnami/nginx` also returns
/// `bitnami/nginx-ingress-controller`.
pub fn parse_search_output(qualified: &str, stdout: &[u8]) -> Result<Vec<SearchResult>> {
    let text = String::from_utf8_lossy(stdout);
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let results: Vec<SearchResult> =
        serde_yaml::from_str(&text).map_err(|source| UpdateError::SearchOutput {
            chart: qualified.to_string(),
            source,
        })?;

    Ok(results
        .into_iter()
        .filter(|r| r.name == qualified)
        .collect())
}
