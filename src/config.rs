use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::report::template::GenerationOptions;

/// Root configuration structure, deserialized from `.attribution-report/config.toml`.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Generation options such as `template.id` and `template.path`.
    #[serde(default)]
    pub options: GenerationOptions,
    #[serde(default)]
    pub licenses: LicensesConfig,
    #[serde(default)]
    pub network: NetworkConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct LicensesConfig {
    /// Directories holding license texts named after their identifier.
    #[serde(default)]
    pub text_dirs: Vec<PathBuf>,
    /// Display names for identifiers the built-in SPDX table does not know,
    /// or should name differently.
    #[serde(default)]
    pub names: HashMap<String, String>,
}

/// HTTP settings for `--online`.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    #[serde(default)]
    pub proxy: Option<String>,
    #[serde(default)]
    pub proxy_user: Option<String>,
    #[serde(default)]
    pub proxy_password: Option<String>,
    /// Comma-separated hosts that bypass the proxy.
    #[serde(default)]
    pub no_proxy: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for NetworkConfig {
    fn default() -> Self {
        NetworkConfig {
            proxy: None,
            proxy_user: None,
            proxy_password: None,
            no_proxy: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<base_dir>/.attribution-report/config.toml`
/// 3. `~/.config/attribution-report/config.toml`
/// 4. Built-in [`Config::default`]
///
/// Relative `text_dirs` are resolved against the directory of the file they came from.
pub fn load_config(base_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let project_config = base_dir.join(".attribution-report").join("config.toml");
    if project_config.exists() {
        return read_config(&project_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("attribution-report")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config {}", path.display()))?;

    if let Some(dir) = path.parent() {
        for text_dir in &mut config.licenses.text_dirs {
            if text_dir.is_relative() {
                *text_dir = dir.join(&*text_dir);
            }
        }
    }
    Ok(config)
}

/// Parse a `key=value` generation option from the command line.
pub fn parse_option(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.options.is_empty());
        assert!(config.licenses.text_dirs.is_empty());
        assert_eq!(config.network.timeout_secs, 10);
        assert!(config.network.proxy.is_none());
    }

    #[test]
    fn test_project_config_found() {
        let dir = tempfile::tempdir().unwrap();
        let config_dir = dir.path().join(".attribution-report");
        std::fs::create_dir(&config_dir).unwrap();
        std::fs::write(
            config_dir.join("config.toml"),
            r#"
[options]
"template.id" = "acme"
"template.path" = "/opt/templates"

[licenses]
text_dirs = ["texts", "/usr/share/licenses"]

[licenses.names]
"LicenseRef-acme" = "ACME License"

[network]
proxy = "http://proxy.internal:3128"
proxy_user = "builder"
"#,
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.options.get("template.id").map(String::as_str), Some("acme"));
        assert_eq!(config.licenses.text_dirs[0], config_dir.join("texts"));
        assert_eq!(config.licenses.text_dirs[1], PathBuf::from("/usr/share/licenses"));
        assert_eq!(config.licenses.names["LicenseRef-acme"], "ACME License");
        assert_eq!(config.network.proxy_user.as_deref(), Some("builder"));
        assert_eq!(config.network.timeout_secs, 10);
    }

    #[test]
    fn test_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("custom.toml");
        std::fs::write(&file, "[network]\ntimeout_secs = 30\n").unwrap();

        let config = load_config(dir.path(), Some(&file)).unwrap();
        assert_eq!(config.network.timeout_secs, 30);
    }

    #[test]
    fn test_invalid_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.toml");
        std::fs::write(&file, "[licenses]\ntext_dirs = 5\n").unwrap();

        let err = load_config(dir.path(), Some(&file)).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_parse_option() {
        assert_eq!(
            parse_option("template.id=acme"),
            Ok(("template.id".to_string(), "acme".to_string()))
        );
        assert_eq!(
            parse_option("template.path=/a=b"),
            Ok(("template.path".to_string(), "/a=b".to_string()))
        );
        assert!(parse_option("novalue").is_err());
        assert!(parse_option("=x").is_err());
    }
}
