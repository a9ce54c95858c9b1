use tracing::{debug, warn};

use crate::error::ReportError;
use crate::license::copyright::{self, FindingsIndex};
use crate::license::spdx::LicenseRegistry;
use crate::license::texts::LicenseTextLookup;
use crate::license::{entry, selector};
use crate::models::{AnalysisResult, AttributionEntry, AttributionModel, ProjectMetadata};

/// Assemble the document model: one entry per package plus the root project.
pub fn build(
    result: &AnalysisResult,
    texts: &dyn LicenseTextLookup,
    registry: &dyn LicenseRegistry,
) -> Result<AttributionModel, ReportError> {
    let index = FindingsIndex::collect(result);

    let entries: Vec<AttributionEntry> = result
        .packages
        .iter()
        .map(|pkg| {
            let licenses = selector::select(&pkg.licenses);
            if licenses.is_empty() {
                warn!(package = %pkg.id, "no license determined");
            } else {
                debug!(package = %pkg.id, licenses = licenses.len(), "resolved licenses");
            }

            AttributionEntry {
                purl: pkg.id.purl(),
                binary_filename: pkg.binary_filename(),
                licenses: licenses
                    .iter()
                    .map(|license| entry::build(license, texts, registry))
                    .collect(),
                copyright: copyright::aggregate(&pkg.id, &licenses, &index),
            }
        })
        .collect();

    // Multi-project reports are not supported.
    let project = match result.projects.as_slice() {
        [project] => project,
        other => return Err(ReportError::ProjectCount { found: other.len() }),
    };

    let licenses = selector::select(&project.licenses);
    let project = ProjectMetadata {
        name: project.id.name.clone(),
        version: project.id.version.clone(),
        copyright: copyright::aggregate(&project.id, &licenses, &index),
    };

    Ok(AttributionModel { project, entries })
}
