use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// ── Upstream analysis result ──────────────────────────────────────────────────

/// Unique key of a package or project.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(default)]
    pub namespace: String,
    pub name: String,
    #[serde(default)]
    pub version: String,
}

impl Identifier {
    /// Package URL form used as the entry's display identity.
    pub fn purl(&self) -> String {
        if self.namespace.is_empty() {
            format!("pkg:generic/{}@{}", self.name, self.version)
        } else {
            format!("pkg:generic/{}/{}@{}", self.namespace, self.name, self.version)
        }
    }
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}:{}", self.namespace, self.name, self.version)
    }
}

/// The three places a license determination can come from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LicenseSources {
    /// Manually curated; overrides everything else when non-empty.
    #[serde(default)]
    pub concluded: Vec<String>,
    /// From package metadata.
    #[serde(default)]
    pub declared: Vec<String>,
    /// From source scanning.
    #[serde(default)]
    pub detected: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteArtifact {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageRecord {
    pub id: Identifier,
    #[serde(default)]
    pub binary_artifact: Option<RemoteArtifact>,
    #[serde(default)]
    pub licenses: LicenseSources,
}

impl PackageRecord {
    /// Filename component of the binary artifact URL, if there is one.
    pub fn binary_filename(&self) -> Option<String> {
        let url = self.binary_artifact.as_ref()?.url.as_str();
        let path = url.split(['?', '#']).next().unwrap_or(url);
        // Drop scheme and authority; a bare host has no filename.
        let path = match path.split_once("://") {
            Some((_, rest)) => rest.split_once('/').map_or("", |(_, p)| p),
            None => path,
        };
        let file = path.rsplit('/').next().unwrap_or(path);
        if file.is_empty() {
            None
        } else {
            Some(file.to_string())
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub id: Identifier,
    #[serde(default)]
    pub licenses: LicenseSources,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseFinding {
    pub license: String,
    #[serde(default)]
    pub copyrights: Vec<String>,
    /// Path exclude patterns matching every location of this finding.
    #[serde(default)]
    pub path_excludes: Vec<String>,
}

impl LicenseFinding {
    pub fn is_excluded(&self) -> bool {
        !self.path_excludes.is_empty()
    }
}

/// All findings reported for one package or project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindingRecord {
    pub id: Identifier,
    #[serde(default)]
    pub findings: Vec<LicenseFinding>,
}

/// Output of the dependency-analysis pipeline, as read from JSON.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub projects: Vec<ProjectRecord>,
    #[serde(default)]
    pub packages: Vec<PackageRecord>,
    #[serde(default)]
    pub license_findings: Vec<FindingRecord>,
}

impl AnalysisResult {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read analysis result {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse analysis result {}", path.display()))
    }
}

// ── Document model ────────────────────────────────────────────────────────────

/// Deduplicated, lexicographically sorted license identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseSet(BTreeSet<String>);

impl LicenseSet {
    pub fn contains(&self, license: &str) -> bool {
        self.0.contains(license)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for LicenseSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        LicenseSet(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseInfo {
    /// Alphanumeric cross-reference key, unique per license identifier.
    pub anchor: String,
    pub text: String,
    pub license: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionEntry {
    pub purl: String,
    pub binary_filename: Option<String>,
    pub licenses: Vec<LicenseInfo>,
    pub copyright: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectMetadata {
    pub name: String,
    pub version: String,
    pub copyright: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionModel {
    pub project: ProjectMetadata,
    pub entries: Vec<AttributionEntry>,
}

impl AttributionModel {
    /// Every distinct license referenced by any entry, ordered by identifier.
    pub fn distinct_licenses(&self) -> Vec<&LicenseInfo> {
        let mut seen = BTreeSet::new();
        let mut licenses: Vec<&LicenseInfo> = self
            .entries
            .iter()
            .flat_map(|e| &e.licenses)
            .filter(|l| seen.insert(l.anchor.as_str()))
            .collect();
        licenses.sort_by(|a, b| a.license.cmp(&b.license));
        licenses
    }
}

/// What a report generation left in the output sink.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The emitted artifact was copied verbatim.
    Written { bytes: u64 },
    /// The emitter finished without producing a file; nothing was written.
    NoArtifact,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Written { bytes } => write!(f, "{} bytes written", bytes),
            Outcome::NoArtifact => write!(f, "no artifact produced"),
        }
    }
}
