use crate::models::{LicenseSet, LicenseSources};

/// Choose the authoritative license set for one package or project.
///
/// A non-empty concluded list is a manual override and wins outright. Otherwise
/// the declared and detected licenses are unioned. Both paths deduplicate and
/// sort; no data at all yields an empty set.
pub fn select(sources: &LicenseSources) -> LicenseSet {
    if !sources.concluded.is_empty() {
        return sources.concluded.iter().collect();
    }

    sources
        .declared
        .iter()
        .chain(&sources.detected)
        .collect()
}
