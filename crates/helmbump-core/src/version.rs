//! Chart version parsing and comparison
//!
//! Helm repositories are not strict about semver: `v1.2.3` and `1.2` both show
//! up in the wild. [`ChartVersion`] accepts those spellings, compares by semver
//! precedence, and keeps the literal text so manifests are rewritten with the
//! exact string the repository published.

use semver::Version;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::VersionError;

/// A parsed chart version that remembers how it was written
#[derive(Debug, Clone)]
pub struct ChartVersion {
    original: String,
    parsed: Version,
}

impl ChartVersion {
    /// Parse a version string
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        let normalized = normalize(trimmed).ok_or_else(|| VersionError {
            input: input.to_string(),
            reason: "expected major.minor.patch".to_string(),
        })?;

        let parsed = Version::parse(&normalized).map_err(|e| VersionError {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            original: trimmed.to_string(),
            parsed,
        })
    }

    /// The version exactly as it was written
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The normalized semantic version
    pub fn semver(&self) -> &Version {
        &self.parsed
    }

    /// True if `self` has strictly lower precedence than `other`
    pub fn less_than(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Less
    }

    /// True if `self` has strictly higher precedence than `other`
    pub fn is_newer_than(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Greater
    }
}

/// Pad `1` / `1.2` to `1.0.0` / `1.2.0` and drop a leading `v`.
///
/// Returns `None` when the numeric core has more than three components or is empty.
fn normalize(input: &str) -> Option<String> {
    let input = input
        .strip_prefix('v')
        .or_else(|| input.strip_prefix('V'))
        .unwrap_or(input);

    let suffix_at = input.find(['-', '+']).unwrap_or(input.len());
    let (core, suffix) = input.split_at(suffix_at);

    if core.is_empty() {
        return None;
    }

    let mut parts: Vec<&str> = core.split('.').collect();
    if parts.len() > 3 {
        return None;
    }
    while parts.len() < 3 {
        parts.push("0");
    }

    Some(format!("{}{}", parts.join("."), suffix))
}

/// Semver precedence: build metadata never participates
fn precedence(a: &Version, b: &Version) -> Ordering {
    (a.major, a.minor, a.patch)
        .cmp(&(b.major, b.minor, b.patch))
        .then_with(|| match (a.pre.is_empty(), b.pre.is_empty()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => a.pre.cmp(&b.pre),
        })
}

impl PartialEq for ChartVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ChartVersion {}

impl PartialOrd for ChartVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChartVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        precedence(&self.parsed, &other.parsed)
    }
}

impl FromStr for ChartVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ChartVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> ChartVersion {
        ChartVersion::parse(s).unwrap()
    }

    #[test]
    fn test_parse_canonical() {
        let version = v("15.2.3");
        assert_eq!(version.semver(), &Version::new(15, 2, 3));
        assert_eq!(version.original(), "15.2.3");
    }

    #[test]
    fn test_parse_keeps_original_literal() {
        let version = v("v1.2");
        assert_eq!(version.original(), "v1.2");
        assert_eq!(version.to_string(), "v1.2");
        assert_eq!(version.semver(), &Version::new(1, 2, 0));
    }

    #[test]
    fn test_parse_prerelease_and_build() {
        let version = v("2.0.0-rc.1+build.5");
        assert_eq!(version.semver().pre.as_str(), "rc.1");
        assert_eq!(version.semver().build.as_str(), "build.5");

        let short = v("2.1-beta");
        assert_eq!(short.semver().pre.as_str(), "beta");
        assert_eq!(short.semver().minor, 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "latest", "1.2.3.4", "1..2", "v", "-rc.1", "1.x"] {
            let err = ChartVersion::parse(input).unwrap_err();
            assert_eq!(err.input, input);
        }
    }

    #[test]
    fn test_ordering_ignores_formatting() {
        assert_eq!(v("1.2.0"), v("1.2"));
        assert!(!v("1.2.0").less_than(&v("1.2")));
        assert!(!v("1.2").less_than(&v("1.2.0")));
        assert_eq!(v("v3.0.0"), v("3"));
    }

    #[test]
    fn test_ordering_numeric_components() {
        assert!(v("1.9.0").less_than(&v("1.10.0")));
        assert!(v("1.0.9").less_than(&v("1.1.0")));
        assert!(v("9.9.9").less_than(&v("10.0.0")));
        assert!(v("2.0.0").is_newer_than(&v("1.99.99")));
    }

    #[test]
    fn test_prerelease_sorts_below_release() {
        assert!(v("1.0.0-alpha").less_than(&v("1.0.0")));
        assert!(v("1.0.0-alpha").less_than(&v("1.0.0-beta")));
        assert!(v("1.0.0").is_newer_than(&v("1.0.0-rc.1")));
        assert!(v("0.9.9").less_than(&v("1.0.0-alpha")));
    }

    #[test]
    fn test_build_metadata_ignored() {
        assert_eq!(v("1.0.0+a"), v("1.0.0+b"));
        assert!(!v("1.0.0+a").less_than(&v("1.0.0+b")));
    }

    #[test]
    fn test_from_str() {
        let version: ChartVersion = "4.5.6".parse().unwrap();
        assert_eq!(version.semver(), &Version::new(4, 5, 6));
    }
}
