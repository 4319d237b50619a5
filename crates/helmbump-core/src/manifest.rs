//! Chart manifest (`charts.yaml`) loading and rewriting

use serde::de;
use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::path::Path;

use crate::error::ManifestError;
use crate::log;

/// One chart pinned in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartEntry {
    /// Chart name within its repository
    pub name: String,

    /// Local alias for the Helm repository (`helm repo add <repo> <url>`)
    pub repo: String,

    /// Helm repository URL
    pub url: String,

    /// Pinned chart version
    pub version: String,

    /// Version before this run's bump; only set for updated charts
    #[serde(skip)]
    pub previous_version: Option<String>,
}

impl ChartEntry {
    pub fn new(
        name: impl Into<String>,
        repo: impl Into<String>,
        url: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            repo: repo.into(),
            url: url.into(),
            version: version.into(),
            previous_version: None,
        }
    }

    /// `<repo>/<name>`, the chart's fully qualified name in `helm search`
    pub fn qualified_name(&self) -> String {
        format!("{}/{}", self.repo, self.name)
    }

    /// Copy of this entry bumped to `version`, remembering the old one
    pub fn bumped_to(&self, version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            previous_version: Some(self.version.clone()),
            ..self.clone()
        }
    }
}

/// Ordered list of pinned charts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    pub charts: Vec<ChartEntry>,
}

impl Manifest {
    pub fn new(charts: Vec<ChartEntry>) -> Self {
        Self { charts }
    }

    /// Parse manifest YAML; unknown fields and non-text values are rejected
    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let document: Value = serde_yaml::from_str(content)?;
        check_scalars(&document)?;
        Ok(serde_yaml::from_str(content)?)
    }

    /// Load a manifest file
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = read(path)?;
        Self::parse(&content)
    }

    /// Serialize to YAML (`name`, `repo`, `url`, `version` per entry).
    ///
    /// Versions that would read back as numbers are single-quoted, so an
    /// unquoted `1.10` is written as `'1.10'`.
    pub fn to_yaml(&self) -> Result<String, ManifestError> {
        Ok(serde_yaml::to_string(&self.charts)?)
    }

    /// Write the manifest to `path`
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let content = self.to_yaml()?;
        write(path, &content)
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

/// Rewrites the manifest on disk, logging the old and new content
pub struct ManifestStore<'a> {
    path: &'a Path,
}

impl<'a> ManifestStore<'a> {
    pub fn new(path: &'a Path) -> Self {
        Self { path }
    }

    /// Read and log the manifest
    pub fn load(&self) -> Result<Manifest, ManifestError> {
        tracing::info!("Opening chart manifest {}", self.path.display());
        let content = read(self.path)?;
        log::lines(&content);
        Manifest::parse(&content)
    }

    /// Replace the manifest with `manifest`
    pub fn rewrite(&self, manifest: &Manifest) -> Result<(), ManifestError> {
        let new_content = manifest.to_yaml()?;

        tracing::info!("Previous content of {}:", self.path.display());
        log::lines(&read(self.path)?);

        write(self.path, &new_content)?;

        tracing::info!("Written new chart versions to {}:", self.path.display());
        log::lines(&new_content);
        Ok(())
    }
}

/// Entry fields must be strings or plain numbers.
///
/// Numbers keep their literal text (`version: 1.10` loads as `"1.10"`), but
/// booleans, nulls and nested values are errors rather than being stringified.
fn check_scalars(document: &Value) -> Result<(), serde_yaml::Error> {
    let Some(entries) = document.as_sequence() else {
        return Ok(());
    };

    for (index, entry) in entries.iter().enumerate() {
        let Some(fields) = entry.as_mapping() else {
            continue;
        };
        for (key, value) in fields {
            let found = match value {
                Value::String(_) | Value::Number(_) => continue,
                Value::Bool(_) => "a boolean",
                Value::Null => "null",
                Value::Sequence(_) => "a list",
                Value::Mapping(_) => "a mapping",
                Value::Tagged(_) => "a tagged value",
            };
            return Err(de::Error::custom(format!(
                "chart entry {}: `{}` must be a string, found {}",
                index + 1,
                key.as_str().unwrap_or("?"),
                found
            )));
        }
    }
    Ok(())
}

fn read(path: &Path) -> Result<String, ManifestError> {
    std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, content: &str) -> Result<(), ManifestError> {
    std::fs::write(path, content).map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })
}
