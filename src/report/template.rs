use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ReportError;

pub const OPTION_TEMPLATE_ID: &str = "template.id";
pub const OPTION_TEMPLATE_PATH: &str = "template.path";
pub const DEFAULT_TEMPLATE_ID: &str = "default";

/// Free-form generation options, e.g. `template.id` and `template.path`.
pub type GenerationOptions = BTreeMap<String, String>;

/// Page styling for one kind of attribution document.
#[derive(Debug, Clone, Deserialize)]
pub struct Template {
    pub id: String,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_subtitle")]
    pub subtitle: String,
    /// Footer line; falls back to the tool name and version.
    #[serde(default)]
    pub footer: Option<String>,
    #[serde(default = "default_accent_from")]
    pub accent_from: [f32; 3],
    #[serde(default = "default_accent_to")]
    pub accent_to: [f32; 3],
    #[serde(default = "default_true")]
    pub include_license_texts: bool,
}

fn default_title() -> String {
    "Open Source".to_string()
}

fn default_subtitle() -> String {
    "Attribution Notices".to_string()
}

fn default_accent_from() -> [f32; 3] {
    [0.20, 0.46, 0.95]
}

fn default_accent_to() -> [f32; 3] {
    [0.52, 0.30, 0.95]
}

fn default_true() -> bool {
    true
}

/// On-disk layout of a template source file: any number of `[[template]]` tables.
#[derive(Debug, Deserialize)]
struct TemplateFile {
    #[serde(default, rename = "template")]
    templates: Vec<Template>,
}

/// Templates known to this generation, keyed by id.
///
/// Owned by one generation and handed to the emitter, so registering a source
/// never affects another report.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    pub fn with_builtin() -> Self {
        let default = Template {
            id: DEFAULT_TEMPLATE_ID.to_string(),
            title: default_title(),
            subtitle: default_subtitle(),
            footer: None,
            accent_from: default_accent_from(),
            accent_to: default_accent_to(),
            include_license_texts: true,
        };
        let compact = Template {
            id: "compact".to_string(),
            subtitle: "Attribution Summary".to_string(),
            include_license_texts: false,
            ..default.clone()
        };

        let templates = [default, compact]
            .into_iter()
            .map(|t| (t.id.clone(), t))
            .collect();
        TemplateRegistry { templates }
    }

    pub fn get(&self, id: &str) -> Option<&Template> {
        self.templates.get(id)
    }

    /// Load every `*.toml` file of a directory (in name order), or a single file.
    /// Templates from later sources replace earlier ones with the same id.
    pub fn register_source(&mut self, path: &Path) -> Result<(), ReportError> {
        let source_err = |message: String| ReportError::TemplateSource {
            path: path.to_path_buf(),
            message,
        };

        let files: Vec<PathBuf> = if path.is_dir() {
            let mut files: Vec<PathBuf> = std::fs::read_dir(path)
                .map_err(|e| source_err(e.to_string()))?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "toml"))
                .collect();
            files.sort();
            files
        } else if path.is_file() {
            vec![path.to_path_buf()]
        } else {
            return Err(source_err("no such file or directory".to_string()));
        };

        for file in files {
            let content = std::fs::read_to_string(&file)
                .map_err(|e| source_err(format!("{}: {}", file.display(), e)))?;
            let parsed: TemplateFile = toml::from_str(&content)
                .map_err(|e| source_err(format!("{}: {}", file.display(), e)))?;
            for template in parsed.templates {
                debug!(id = %template.id, file = %file.display(), "registered template");
                self.templates.insert(template.id.clone(), template);
            }
        }

        info!(path = %path.display(), "registered template source");
        Ok(())
    }
}

/// Which template to render with, and where to load extra templates from.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateSelection {
    pub id: String,
    pub source: Option<PathBuf>,
}

impl TemplateSelection {
    /// A custom template needs both `template.id` and `template.path`; with
    /// either one missing the default template is used and nothing is loaded.
    pub fn resolve(options: &GenerationOptions) -> Self {
        match (options.get(OPTION_TEMPLATE_ID), options.get(OPTION_TEMPLATE_PATH)) {
            (Some(id), Some(path)) => TemplateSelection {
                id: id.clone(),
                source: Some(PathBuf::from(path)),
            },
            _ => TemplateSelection {
                id: DEFAULT_TEMPLATE_ID.to_string(),
                source: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(pairs: &[(&str, &str)]) -> GenerationOptions {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_selection_requires_both_options() {
        let default = TemplateSelection {
            id: DEFAULT_TEMPLATE_ID.to_string(),
            source: None,
        };
        assert_eq!(TemplateSelection::resolve(&options(&[])), default);
        assert_eq!(
            TemplateSelection::resolve(&options(&[("template.id", "acme")])),
            default
        );
        assert_eq!(
            TemplateSelection::resolve(&options(&[("template.path", "/opt/templates")])),
            default
        );
    }

    #[test]
    fn test_selection_custom() {
        let selection = TemplateSelection::resolve(&options(&[
            ("template.id", "acme"),
            ("template.path", "/opt/templates"),
        ]));
        assert_eq!(selection.id, "acme");
        assert_eq!(selection.source, Some(PathBuf::from("/opt/templates")));
    }

    #[test]
    fn test_builtin_templates() {
        let registry = TemplateRegistry::with_builtin();
        assert!(registry.get("default").unwrap().include_license_texts);
        assert!(!registry.get("compact").unwrap().include_license_texts);
        assert!(registry.get("acme").is_none());
    }

    #[test]
    fn test_register_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("acme.toml"),
            r#"
[[template]]
id = "acme"
title = "ACME Corp"
footer = "Confidential"
accent_from = [0.1, 0.2, 0.3]

[[template]]
id = "default"
title = "Overridden"
"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.md"), "not a template").unwrap();

        let mut registry = TemplateRegistry::with_builtin();
        registry.register_source(dir.path()).unwrap();

        let acme = registry.get("acme").unwrap();
        assert_eq!(acme.title, "ACME Corp");
        assert_eq!(acme.footer.as_deref(), Some("Confidential"));
        assert_eq!(acme.accent_from, [0.1, 0.2, 0.3]);
        assert_eq!(acme.subtitle, "Attribution Notices");
        assert!(acme.include_license_texts);
        assert_eq!(registry.get("default").unwrap().title, "Overridden");
        assert!(registry.get("compact").is_some());
    }

    #[test]
    fn test_register_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = TemplateRegistry::with_builtin();
        let err = registry.register_source(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, ReportError::TemplateSource { .. }));
    }

    #[test]
    fn test_register_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.toml");
        std::fs::write(&file, "[[template]]\ntitle = 3").unwrap();

        let mut registry = TemplateRegistry::with_builtin();
        assert!(registry.register_source(&file).is_err());
    }
}
