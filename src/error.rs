use std::io;
use std::path::PathBuf;

/// Errors that abort a report generation.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// The analysis result must describe exactly one root project.
    #[error("exactly one project required, found {found}")]
    ProjectCount { found: usize },

    /// A template source could not be read or parsed.
    #[error("invalid template source {}: {message}", .path.display())]
    TemplateSource { path: PathBuf, message: String },

    /// The document emitter failed.
    #[error("document generation failed")]
    Emitter(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),

    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
