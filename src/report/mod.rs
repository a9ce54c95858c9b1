//! Attribution document generation.
//!
//! - [`model`] — builds the [`AttributionModel`] from an analysis result.
//! - [`template`] — template registry and template selection from options.
//! - [`pdf`] — the built-in [`DocumentEmitter`], rendering a multi-page PDF.
//! - [`terminal`] — console summary of the model.
//!
//! [`generate`] runs the whole pipeline: model → template selection → emitter
//! in a private scratch directory → verbatim copy of the artifact to the sink.

pub mod model;
pub mod pdf;
pub mod template;
pub mod terminal;

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::ReportError;
use crate::license::spdx::LicenseRegistry;
use crate::license::texts::LicenseTextLookup;
use crate::models::{AnalysisResult, AttributionModel, Outcome};
use template::{GenerationOptions, TemplateRegistry, TemplateSelection};

/// Renders a document model into a file inside `scratch_dir`.
///
/// Returns the path of the produced artifact, or `None` if nothing was produced.
pub trait DocumentEmitter {
    fn emit(
        &self,
        model: &AttributionModel,
        templates: &TemplateRegistry,
        template_id: &str,
        scratch_dir: &Path,
    ) -> anyhow::Result<Option<PathBuf>>;
}

/// Build the model for `result` and render it into `out`.
pub fn generate(
    result: &AnalysisResult,
    texts: &dyn LicenseTextLookup,
    registry: &dyn LicenseRegistry,
    options: &GenerationOptions,
    emitter: &dyn DocumentEmitter,
    out: &mut dyn Write,
) -> Result<Outcome, ReportError> {
    let model = model::build(result, texts, registry)?;
    render(&model, options, emitter, out)
}

/// Render an already built model into `out`.
pub fn render(
    model: &AttributionModel,
    options: &GenerationOptions,
    emitter: &dyn DocumentEmitter,
    out: &mut dyn Write,
) -> Result<Outcome, ReportError> {
    let selection = TemplateSelection::resolve(options);
    let mut templates = TemplateRegistry::with_builtin();
    if let Some(source) = &selection.source {
        templates.register_source(source)?;
    }
    debug!(template = %selection.id, "selected template");

    let scratch = tempfile::Builder::new()
        .prefix("attribution-report-")
        .tempdir()?;
    let scratch_path = scratch.path().to_path_buf();

    let outcome = emit_into(model, &templates, &selection.id, &scratch_path, emitter, out);

    // Output has already been copied, so a leftover directory is only logged.
    if let Err(e) = scratch.close() {
        warn!(path = %scratch_path.display(), error = %e, "failed to remove scratch directory");
    }

    outcome
}

fn emit_into(
    model: &AttributionModel,
    templates: &TemplateRegistry,
    template_id: &str,
    scratch_dir: &Path,
    emitter: &dyn DocumentEmitter,
    out: &mut dyn Write,
) -> Result<Outcome, ReportError> {
    let artifact = emitter
        .emit(model, templates, template_id, scratch_dir)
        .map_err(|e| ReportError::Emitter(e.into()))?;

    let path = match artifact {
        Some(path) if path.is_file() => path,
        _ => {
            info!("emitter produced no artifact");
            return Ok(Outcome::NoArtifact);
        }
    };

    let mut file = File::open(&path)?;
    let bytes = std::io::copy(&mut file, out)?;
    out.flush()?;

    debug!(path = %path.display(), bytes, "copied artifact");
    Ok(Outcome::Written { bytes })
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::license::spdx::SpdxRegistry;
    use crate::license::texts::LicenseTexts;
    use crate::models::{Identifier, LicenseSources, ProjectRecord};

    /// Test emitter that remembers where it was asked to write.
    enum Behavior {
        Write(&'static [u8]),
        Nothing,
        Fail,
    }

    struct FakeEmitter {
        behavior: Behavior,
        seen_scratch: RefCell<Option<PathBuf>>,
        seen_template: RefCell<Option<String>>,
    }

    impl FakeEmitter {
        fn new(behavior: Behavior) -> Self {
            FakeEmitter {
                behavior,
                seen_scratch: RefCell::new(None),
                seen_template: RefCell::new(None),
            }
        }

        fn scratch(&self) -> PathBuf {
            self.seen_scratch.borrow().clone().expect("emitter was not called")
        }
    }

    impl DocumentEmitter for FakeEmitter {
        fn emit(
            &self,
            _model: &AttributionModel,
            templates: &TemplateRegistry,
            template_id: &str,
            scratch_dir: &Path,
        ) -> anyhow::Result<Option<PathBuf>> {
            assert!(scratch_dir.is_dir());
            *self.seen_scratch.borrow_mut() = Some(scratch_dir.to_path_buf());
            let template = templates
                .get(template_id)
                .ok_or_else(|| anyhow::anyhow!("unknown template '{}'", template_id))?;
            *self.seen_template.borrow_mut() = Some(template.title.clone());

            match self.behavior {
                Behavior::Write(bytes) => {
                    let path = scratch_dir.join("out.bin");
                    std::fs::write(&path, bytes)?;
                    Ok(Some(path))
                }
                Behavior::Nothing => Ok(None),
                Behavior::Fail => anyhow::bail!("renderer crashed"),
            }
        }
    }

    fn result(projects: usize) -> AnalysisResult {
        AnalysisResult {
            projects: (0..projects)
                .map(|i| ProjectRecord {
                    id: Identifier {
                        namespace: "acme".into(),
                        name: format!("app{}", i),
                        version: "1.0".into(),
                    },
                    licenses: LicenseSources::default(),
                })
                .collect(),
            ..Default::default()
        }
    }

    fn run(
        result: &AnalysisResult,
        options: &GenerationOptions,
        emitter: &FakeEmitter,
        out: &mut Vec<u8>,
    ) -> Result<Outcome, ReportError> {
        generate(
            result,
            &LicenseTexts::default(),
            &SpdxRegistry::default(),
            options,
            emitter,
            out,
        )
    }

    #[test]
    fn test_artifact_copied_verbatim() {
        let emitter = FakeEmitter::new(Behavior::Write(b"%PDF-1.3\x00\xff binary"));
        let mut out = Vec::new();

        let outcome = run(&result(1), &GenerationOptions::new(), &emitter, &mut out).unwrap();

        assert_eq!(outcome, Outcome::Written { bytes: 17 });
        assert_eq!(out, b"%PDF-1.3\x00\xff binary");
        assert!(!emitter.scratch().exists());
    }

    #[test]
    fn test_no_artifact_writes_nothing() {
        let emitter = FakeEmitter::new(Behavior::Nothing);
        let mut out = Vec::new();

        let outcome = run(&result(1), &GenerationOptions::new(), &emitter, &mut out).unwrap();

        assert_eq!(outcome, Outcome::NoArtifact);
        assert!(out.is_empty());
        assert!(!emitter.scratch().exists());
    }

    #[test]
    fn test_emitter_failure_propagates_and_cleans_up() {
        let emitter = FakeEmitter::new(Behavior::Fail);
        let mut out = Vec::new();

        let err = run(&result(1), &GenerationOptions::new(), &emitter, &mut out).unwrap_err();

        assert!(matches!(err, ReportError::Emitter(_)));
        assert!(out.is_empty());
        assert!(!emitter.scratch().exists());
    }

    #[test]
    fn test_project_count_checked_before_emitting() {
        for projects in [0, 2] {
            let emitter = FakeEmitter::new(Behavior::Write(b"data"));
            let mut out = Vec::new();

            let err = run(&result(projects), &GenerationOptions::new(), &emitter, &mut out)
                .unwrap_err();

            assert!(err.to_string().contains("exactly one project required"));
            assert!(out.is_empty());
            assert!(emitter.seen_scratch.borrow().is_none());
        }
    }

    #[test]
    fn test_custom_template_source() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("acme.toml"),
            "[[template]]\nid = \"acme\"\ntitle = \"ACME Notices\"\n",
        )
        .unwrap();
        let options: GenerationOptions = [
            ("template.id".to_string(), "acme".to_string()),
            ("template.path".to_string(), dir.path().display().to_string()),
        ]
        .into_iter()
        .collect();
        let emitter = FakeEmitter::new(Behavior::Write(b"ok"));
        let mut out = Vec::new();

        run(&result(1), &options, &emitter, &mut out).unwrap();

        assert_eq!(emitter.seen_template.borrow().as_deref(), Some("ACME Notices"));
    }

    #[test]
    fn test_template_id_alone_uses_default() {
        let options: GenerationOptions = [("template.id".to_string(), "acme".to_string())]
            .into_iter()
            .collect();
        let emitter = FakeEmitter::new(Behavior::Write(b"ok"));
        let mut out = Vec::new();

        run(&result(1), &options, &emitter, &mut out).unwrap();

        assert_eq!(emitter.seen_template.borrow().as_deref(), Some("Open Source"));
    }
}
