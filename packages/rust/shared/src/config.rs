//! Bundler configuration.
//!
//! The optional config file lives at `<project root>/openapi-bundle.toml`.
//! CLI flags override config file values, which override defaults. The
//! defaults describe the conventional `openapi/` layout, so a project without
//! a config file needs no setup at all.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BundleError, Result};
use crate::types::Category;

/// Default configuration file name, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "openapi-bundle.toml";

// ---------------------------------------------------------------------------
// Config structs (matching openapi-bundle.toml schema)
// ---------------------------------------------------------------------------

/// Top-level bundler config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BundleConfig {
    /// Input and output locations.
    #[serde(default)]
    pub layout: LayoutConfig,

    /// Merge behavior.
    #[serde(default)]
    pub merge: MergeConfig,
}

/// `[layout]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Directory holding the base document and fragments, relative to the project root.
    #[serde(default = "default_source_dir")]
    pub source_dir: String,

    /// Base document, relative to `source_dir`.
    #[serde(default = "default_base_file")]
    pub base_file: String,

    #[serde(default = "default_paths_dir")]
    pub paths_dir: String,

    #[serde(default = "default_schemas_dir")]
    pub schemas_dir: String,

    #[serde(default = "default_parameters_dir")]
    pub parameters_dir: String,

    #[serde(default = "default_responses_dir")]
    pub responses_dir: String,

    #[serde(default = "default_examples_dir")]
    pub examples_dir: String,

    /// Standalone security schemes file, relative to `source_dir`.
    #[serde(default = "default_security_schemes_file")]
    pub security_schemes_file: String,

    /// Extension (without the dot) a file must have to count as a fragment.
    #[serde(default = "default_fragment_extension")]
    pub fragment_extension: String,

    /// JSON output, relative to the project root.
    #[serde(default = "default_json_output")]
    pub json_output: String,

    /// YAML output, relative to the project root.
    #[serde(default = "default_yaml_output")]
    pub yaml_output: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            base_file: default_base_file(),
            paths_dir: default_paths_dir(),
            schemas_dir: default_schemas_dir(),
            parameters_dir: default_parameters_dir(),
            responses_dir: default_responses_dir(),
            examples_dir: default_examples_dir(),
            security_schemes_file: default_security_schemes_file(),
            fragment_extension: default_fragment_extension(),
            json_output: default_json_output(),
            yaml_output: default_yaml_output(),
        }
    }
}

fn default_source_dir() -> String {
    "openapi".into()
}
fn default_base_file() -> String {
    "base.yaml".into()
}
fn default_paths_dir() -> String {
    "paths".into()
}
fn default_schemas_dir() -> String {
    "components/schemas".into()
}
fn default_parameters_dir() -> String {
    "components/parameters".into()
}
fn default_responses_dir() -> String {
    "components/responses".into()
}
fn default_examples_dir() -> String {
    "examples".into()
}
fn default_security_schemes_file() -> String {
    "components/security-schemes.yaml".into()
}
fn default_fragment_extension() -> String {
    "yaml".into()
}
fn default_json_output() -> String {
    "openapi.json".into()
}
fn default_yaml_output() -> String {
    "openapi.yaml".into()
}

/// `[merge]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeConfig {
    /// What to do when two fragment files define the same key.
    #[serde(default)]
    pub on_duplicate: DuplicatePolicy,
}

/// Handling of keys defined by more than one fragment file in a category.
///
/// The later file (by name) always wins; the policy only decides whether
/// that is reported, fatal, or silent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    #[default]
    Warn,
    Error,
    Ignore,
}

// ---------------------------------------------------------------------------
// Resolved layout (absolute paths)
// ---------------------------------------------------------------------------

/// Input and output paths resolved against a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub base_file: PathBuf,
    pub paths_dir: PathBuf,
    pub schemas_dir: PathBuf,
    pub parameters_dir: PathBuf,
    pub responses_dir: PathBuf,
    pub examples_dir: PathBuf,
    pub security_schemes_file: PathBuf,
    pub fragment_extension: String,
    pub json_output: PathBuf,
    pub yaml_output: PathBuf,
}

impl LayoutConfig {
    /// Resolve every configured path against `root`.
    pub fn resolve(&self, root: &Path) -> Layout {
        let source = root.join(&self.source_dir);
        Layout {
            base_file: source.join(&self.base_file),
            paths_dir: source.join(&self.paths_dir),
            schemas_dir: source.join(&self.schemas_dir),
            parameters_dir: source.join(&self.parameters_dir),
            responses_dir: source.join(&self.responses_dir),
            examples_dir: source.join(&self.examples_dir),
            security_schemes_file: source.join(&self.security_schemes_file),
            fragment_extension: self.fragment_extension.trim_start_matches('.').to_string(),
            json_output: root.join(&self.json_output),
            yaml_output: root.join(&self.yaml_output),
        }
    }
}

impl Layout {
    /// Conventional layout under `root`.
    pub fn conventional(root: &Path) -> Self {
        LayoutConfig::default().resolve(root)
    }

    /// Fragment directory for a directory-backed category.
    ///
    /// Security schemes come from a single file and have no directory.
    pub fn directory(&self, category: Category) -> Option<&Path> {
        match category {
            Category::Paths => Some(&self.paths_dir),
            Category::Schemas => Some(&self.schemas_dir),
            Category::Parameters => Some(&self.parameters_dir),
            Category::Responses => Some(&self.responses_dir),
            Category::Examples => Some(&self.examples_dir),
            Category::SecuritySchemes => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Path of the config file for a project root.
pub fn config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Load the config for a project root. Returns defaults if the file does not exist.
pub fn load_config(root: &Path) -> Result<BundleConfig> {
    let path = config_file_path(root);

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(BundleConfig::default());
    }

    load_config_from(&path)
}

/// Load the config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<BundleConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| BundleError::io(path, e))?;

    toml::from_str(&content)
        .map_err(|e| BundleError::config(format!("failed to parse {}: {e}", path.display())))
}

/// Write a default config file into `root`. Returns the path to the created file.
///
/// An existing config file is never overwritten.
pub fn init_config(root: &Path) -> Result<PathBuf> {
    let path = config_file_path(root);
    if path.exists() {
        return Err(BundleError::config(format!(
            "{} already exists",
            path.display()
        )));
    }

    let content = toml::to_string_pretty(&BundleConfig::default())
        .map_err(|e| BundleError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| BundleError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "openapi-bundle-config-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn default_config_serializes() {
        let config = BundleConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("source_dir"));
        assert!(toml_str.contains("on_duplicate = \"warn\""));
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let toml_str = r#"
[layout]
source_dir = "api"
json_output = "public/openapi.json"

[merge]
on_duplicate = "error"
"#;
        let config: BundleConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.layout.source_dir, "api");
        assert_eq!(config.layout.base_file, "base.yaml");
        assert_eq!(config.layout.yaml_output, "openapi.yaml");
        assert_eq!(config.merge.on_duplicate, DuplicatePolicy::Error);
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let result: std::result::Result<BundleConfig, _> =
            toml::from_str("[merge]\non_duplicate = \"sometimes\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn conventional_layout_paths() {
        let root = Path::new("/project");
        let layout = Layout::conventional(root);
        assert_eq!(layout.base_file, root.join("openapi/base.yaml"));
        assert_eq!(layout.paths_dir, root.join("openapi/paths"));
        assert_eq!(layout.schemas_dir, root.join("openapi/components/schemas"));
        assert_eq!(layout.examples_dir, root.join("openapi/examples"));
        assert_eq!(
            layout.security_schemes_file,
            root.join("openapi/components/security-schemes.yaml")
        );
        assert_eq!(layout.json_output, root.join("openapi.json"));
        assert_eq!(layout.yaml_output, root.join("openapi.yaml"));
        assert_eq!(layout.fragment_extension, "yaml");
        assert!(layout.directory(Category::SecuritySchemes).is_none());
        assert_eq!(
            layout.directory(Category::Parameters),
            Some(root.join("openapi/components/parameters").as_path())
        );
    }

    #[test]
    fn extension_leading_dot_is_stripped() {
        let config = LayoutConfig {
            fragment_extension: ".yml".into(),
            ..LayoutConfig::default()
        };
        assert_eq!(config.resolve(Path::new(".")).fragment_extension, "yml");
    }

    #[test]
    fn load_config_defaults_when_absent() {
        let tmp = temp_dir();
        let config = load_config(&tmp).unwrap();
        assert_eq!(config.layout.source_dir, "openapi");
        assert_eq!(config.merge.on_duplicate, DuplicatePolicy::Warn);
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn init_config_roundtrip_and_no_overwrite() {
        let tmp = temp_dir();

        let path = init_config(&tmp).unwrap();
        assert_eq!(path, config_file_path(&tmp));

        let loaded = load_config(&tmp).unwrap();
        assert_eq!(loaded.layout.json_output, "openapi.json");

        let err = init_config(&tmp).unwrap_err();
        assert!(err.to_string().contains("already exists"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn invalid_config_reports_path() {
        let tmp = temp_dir();
        let path = config_file_path(&tmp);
        std::fs::write(&path, "[layout\nsource_dir = 1").unwrap();

        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, BundleError::Config { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
