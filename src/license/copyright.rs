use std::collections::HashMap;

use tracing::debug;

use crate::models::{AnalysisResult, Identifier, LicenseFinding, LicenseSet};

/// License findings per package or project, with path-excluded findings dropped.
///
/// Built once per report and only read afterwards. Findings keep the order in
/// which the analysis result listed them.
#[derive(Debug, Default)]
pub struct FindingsIndex {
    by_id: HashMap<Identifier, Vec<LicenseFinding>>,
}

impl FindingsIndex {
    pub fn collect(result: &AnalysisResult) -> Self {
        let mut by_id: HashMap<Identifier, Vec<LicenseFinding>> = HashMap::new();
        let mut excluded = 0usize;

        for record in &result.license_findings {
            let findings = by_id.entry(record.id.clone()).or_default();
            for finding in &record.findings {
                if finding.is_excluded() {
                    excluded += 1;
                    continue;
                }
                findings.push(finding.clone());
            }
        }

        debug!(ids = by_id.len(), excluded, "collected license findings");
        FindingsIndex { by_id }
    }

    pub fn findings(&self, id: &Identifier) -> &[LicenseFinding] {
        self.by_id.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Join every copyright statement of `id` whose finding's license is in `licenses`.
///
/// Statements appear in finding order, then statement order, one per line.
/// Identical statements from different findings are all kept.
pub fn aggregate(id: &Identifier, licenses: &LicenseSet, index: &FindingsIndex) -> String {
    index
        .findings(id)
        .iter()
        .filter(|f| licenses.contains(&f.license))
        .flat_map(|f| f.copyrights.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FindingRecord;

    fn id(name: &str) -> Identifier {
        Identifier {
            namespace: "ns".into(),
            name: name.into(),
            version: "1.0".into(),
        }
    }

    fn finding(license: &str, copyrights: &[&str], excludes: &[&str]) -> LicenseFinding {
        LicenseFinding {
            license: license.into(),
            copyrights: copyrights.iter().map(|s| s.to_string()).collect(),
            path_excludes: excludes.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn index(records: Vec<(Identifier, Vec<LicenseFinding>)>) -> FindingsIndex {
        let result = AnalysisResult {
            license_findings: records
                .into_iter()
                .map(|(id, findings)| FindingRecord { id, findings })
                .collect(),
            ..Default::default()
        };
        FindingsIndex::collect(&result)
    }

    #[test]
    fn test_only_selected_licenses_contribute() {
        let idx = index(vec![(
            id("a"),
            vec![
                finding("MIT", &["(c) Alice"], &[]),
                finding("GPL-3.0-only", &["(c) Mallory"], &[]),
                finding("Apache-2.0", &["(c) Bob", "(c) Carol"], &[]),
            ],
        )]);
        let set: LicenseSet = ["Apache-2.0", "MIT"].into_iter().collect();

        let text = aggregate(&id("a"), &set, &idx);
        assert_eq!(text, "(c) Alice\n(c) Bob\n(c) Carol");
        assert!(!text.contains("Mallory"));
    }

    #[test]
    fn test_duplicates_preserved() {
        let idx = index(vec![(
            id("a"),
            vec![finding("MIT", &["(c) Alice"], &[]), finding("MIT", &["(c) Alice"], &[])],
        )]);
        let set: LicenseSet = ["MIT"].into_iter().collect();
        assert_eq!(aggregate(&id("a"), &set, &idx), "(c) Alice\n(c) Alice");
    }

    #[test]
    fn test_excluded_findings_dropped() {
        let idx = index(vec![(
            id("a"),
            vec![
                finding("MIT", &["(c) Test fixture"], &["src/test/**"]),
                finding("MIT", &["(c) Alice"], &[]),
            ],
        )]);
        let set: LicenseSet = ["MIT"].into_iter().collect();
        assert_eq!(aggregate(&id("a"), &set, &idx), "(c) Alice");
    }

    #[test]
    fn test_findings_merge_across_records() {
        let idx = index(vec![
            (id("a"), vec![finding("MIT", &["(c) first"], &[])]),
            (id("b"), vec![finding("MIT", &["(c) other"], &[])]),
            (id("a"), vec![finding("MIT", &["(c) second"], &[])]),
        ]);
        let set: LicenseSet = ["MIT"].into_iter().collect();
        assert_eq!(aggregate(&id("a"), &set, &idx), "(c) first\n(c) second");
    }

    #[test]
    fn test_unknown_id_is_empty() {
        let idx = FindingsIndex::default();
        let set: LicenseSet = ["MIT"].into_iter().collect();
        assert_eq!(aggregate(&id("missing"), &set, &idx), "");
    }
}
