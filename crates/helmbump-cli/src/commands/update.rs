//! Update command: check every chart, rewrite the manifest, open a pull request

use helmbump_core::{
    CommandRunner, HelmClient, ManifestStore, PublishIdentity, Publisher, PullRequest, Settings,
    branch_name, update_charts,
};

use crate::error::Result;

/// How a successful run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every chart is already at its latest version
    UpToDate,
    /// Newer versions exist but writing is disabled
    WriteSkipped,
    /// Manifest rewritten, pull request disabled
    PullRequestSkipped,
    /// Pull request opened from `branch`
    Published { branch: String },
}

/// Run the whole update against `settings`, sending every command to `runner`
pub fn run<R: CommandRunner>(settings: &Settings, runner: &R) -> Result<Outcome> {
    let path = settings.chart_path();
    let store = ManifestStore::new(&path);
    let manifest = store.load()?;

    let mut helm =
        HelmClient::new(settings.helm.clone(), runner).in_dir(&settings.working_directory);
    let report = update_charts(&manifest, &mut helm)?;

    if !report.any_updated() {
        tracing::info!("No newer versions found, nothing to do.");
        return Ok(Outcome::UpToDate);
    }

    if settings.no_write {
        tracing::info!("NO_WRITE set, preventing file writing and pull request");
        return Ok(Outcome::WriteSkipped);
    }

    // Fail before touching anything if the pull request cannot be opened
    let identity = if settings.no_pull_request {
        None
    } else {
        Some(PublishIdentity::from_settings(settings)?)
    };

    tracing::info!("Newer versions found, updating {}", settings.chart_file);
    store.rewrite(&report.manifest)?;

    let pr = PullRequest::from_updates(&report.updated);
    pr.log();

    let Some(identity) = identity else {
        tracing::info!("NO_PR set, preventing pull request");
        return Ok(Outcome::PullRequestSkipped);
    };

    let branch = branch_name();
    Publisher::new(settings, runner).publish(&pr, &identity, &settings.working_directory, &branch)?;

    Ok(Outcome::Published { branch })
}
