//! Chart update pipeline
//!
//! Walks the manifest one chart at a time, asks a [`ChartSource`] for the
//! newest published version and bumps charts that are behind.

use crate::error::{Result, UpdateError};
use crate::helm::ChartSource;
use crate::manifest::{ChartEntry, Manifest};
use crate::version::ChartVersion;

/// One chart moved to a newer version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartBump {
    pub name: String,
    pub from: String,
    pub to: String,
}

impl ChartBump {
    /// Describe `chart` if it was bumped this run
    pub fn of(chart: &ChartEntry) -> Option<Self> {
        let from = chart.previous_version.clone()?;
        Some(Self {
            name: chart.name.clone(),
            from,
            to: chart.version.clone(),
        })
    }
}

/// Outcome of one pass over the manifest
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateReport {
    /// Every chart, in manifest order, with bumped versions applied
    pub manifest: Manifest,

    /// Just the bumped charts, in manifest order
    pub updated: Vec<ChartBump>,
}

impl UpdateReport {
    pub fn any_updated(&self) -> bool {
        !self.updated.is_empty()
    }
}

/// Check every chart against its repository.
///
/// Charts are processed strictly in order; the first failure aborts the pass.
pub fn update_charts<S: ChartSource + ?Sized>(
    manifest: &Manifest,
    source: &mut S,
) -> Result<UpdateReport> {
    let mut charts = Vec::with_capacity(manifest.len());
    let mut updated = Vec::new();

    for chart in &manifest.charts {
        let checked = check_chart(chart, source)?.unwrap_or_else(|| chart.clone());
        updated.extend(ChartBump::of(&checked));
        charts.push(checked);
    }

    Ok(UpdateReport {
        manifest: Manifest::new(charts),
        updated,
    })
}

/// Return the bumped entry if the repository has a newer version
fn check_chart<S: ChartSource + ?Sized>(
    chart: &ChartEntry,
    source: &mut S,
) -> Result<Option<ChartEntry>> {
    let current = ChartVersion::parse(&chart.version)?;

    source.refresh(chart)?;
    let results = source.search(chart)?;

    let first = results.first().ok_or_else(|| UpdateError::NoVersions {
        repo: chart.repo.clone(),
        name: chart.name.clone(),
    })?;
    let latest = ChartVersion::parse(&first.version)?;

    if latest.is_newer_than(&current) {
        tracing::info!("Found newer version of {}: {} -> {}", chart.name, current, latest);
        Ok(Some(chart.bumped_to(latest.original())))
    } else {
        tracing::info!("Current version {} of {} is the latest", current, chart.name);
        Ok(None)
    }
}
