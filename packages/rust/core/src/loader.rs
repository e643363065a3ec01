//! Fragment and document loading.
//!
//! Documents are parsed into `serde_json::Value` regardless of their on-disk
//! format: `.json` files go through `serde_json`, everything else through
//! `serde_yaml`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use openapi_bundle_shared::{BundleError, Category, Collision, Result};

/// All fragments of one category, merged.
#[derive(Debug, Clone, Default)]
pub struct FragmentSet {
    /// Merged top-level keys of every fragment file, in file order.
    pub entries: Map<String, Value>,
    /// Fragment files that were read, in merge order.
    pub files: Vec<PathBuf>,
    /// Keys defined by more than one file.
    pub collisions: Vec<Collision>,
}

/// Parse a document file into a generic value.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|e| BundleError::io(path, e))?;
    if content.trim().is_empty() {
        return Ok(Value::Null);
    }

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&content).map_err(|e| BundleError::parse(path, e.to_string()))
    } else {
        parse_yaml(path, &content)
    }
}

/// Parse YAML through `serde_yaml::Value` so duplicate keys are rejected and
/// `<<` merge keys are resolved before conversion.
fn parse_yaml(path: &Path, content: &str) -> Result<Value> {
    let mut yaml: serde_yaml::Value =
        serde_yaml::from_str(content).map_err(|e| BundleError::parse(path, e.to_string()))?;
    yaml.apply_merge()
        .map_err(|e| BundleError::parse(path, e.to_string()))?;
    serde_json::to_value(yaml).map_err(|e| BundleError::parse(path, e.to_string()))
}

/// Parse a document whose top level must be a mapping.
///
/// An empty document (YAML null) yields an empty mapping.
pub fn load_mapping(path: &Path) -> Result<Map<String, Value>> {
    match load_document(path)? {
        Value::Object(map) => Ok(map),
        Value::Null => {
            debug!(path = %path.display(), "empty document");
            Ok(Map::new())
        }
        other => Err(BundleError::parse(
            path,
            format!("expected a mapping at the top level, found {}", kind(&other)),
        )),
    }
}

/// Load and shallow-merge every fragment file of a category directory.
///
/// A missing directory yields an empty set. Files are merged in file-name
/// order; when several files define the same key the last one wins and a
/// [`Collision`] is recorded.
#[instrument(skip_all, fields(category = %category, dir = %dir.display()))]
pub fn load_fragment_directory(
    dir: &Path,
    extension: &str,
    category: Category,
) -> Result<FragmentSet> {
    let mut set = FragmentSet::default();

    if !dir.exists() {
        debug!("fragment directory not found, nothing to merge");
        return Ok(set);
    }

    let files = list_fragment_files(dir, extension)?;
    let mut owners: HashMap<String, PathBuf> = HashMap::new();

    for file in files {
        let fragment = load_mapping(&file)?;
        debug!(file = %file.display(), keys = fragment.len(), "loaded fragment");

        for (key, value) in fragment {
            if let Some(previous) = owners.insert(key.clone(), file.clone()) {
                let collision = Collision {
                    category,
                    key: key.clone(),
                    previous,
                    file: file.clone(),
                };
                debug!(%collision, "duplicate fragment key");
                set.collisions.push(collision);
            }
            set.entries.insert(key, value);
        }

        set.files.push(file);
    }

    Ok(set)
}

/// Regular files in `dir` with the given extension, sorted by file name.
fn list_fragment_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| BundleError::io(dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| BundleError::io(dir, e))?.path();
        let matches = path.extension().is_some_and(|ext| ext == extension);
        if matches && path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "openapi-bundle-loader-test-{}",
            uuid::Uuid::now_v7()
        ));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_directory_is_empty() {
        let tmp = temp_dir();
        let set = load_fragment_directory(&tmp.join("nope"), "yaml", Category::Paths).unwrap();
        assert!(set.entries.is_empty());
        assert!(set.files.is_empty());
        assert!(set.collisions.is_empty());
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn merges_files_and_filters_extension() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("users.yaml"), "User:\n  type: object\n").unwrap();
        std::fs::write(tmp.join("orders.yaml"), "Order:\n  type: object\n").unwrap();
        std::fs::write(tmp.join("README.md"), "# not a fragment\n").unwrap();
        std::fs::write(tmp.join("draft.yml"), "Draft: {}\n").unwrap();
        std::fs::create_dir_all(tmp.join("nested.yaml")).unwrap();

        let set = load_fragment_directory(&tmp, "yaml", Category::Schemas).unwrap();

        assert_eq!(set.files.len(), 2);
        assert_eq!(set.entries.len(), 2);
        assert_eq!(set.entries["User"], json!({"type": "object"}));
        assert!(set.entries.contains_key("Order"));
        assert!(!set.entries.contains_key("Draft"));

        // Merge order follows file names.
        let keys: Vec<&str> = set.entries.keys().map(String::as_str).collect();
        assert_eq!(keys, ["Order", "User"]);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn later_file_wins_and_collision_is_recorded() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("b.yaml"), "foo: 2\n").unwrap();
        std::fs::write(tmp.join("a.yaml"), "foo: 1\nbar: true\n").unwrap();

        let set = load_fragment_directory(&tmp, "yaml", Category::Examples).unwrap();

        assert_eq!(set.entries["foo"], json!(2));
        assert_eq!(set.entries["bar"], json!(true));
        assert_eq!(set.collisions.len(), 1);

        let collision = &set.collisions[0];
        assert_eq!(collision.category, Category::Examples);
        assert_eq!(collision.key, "foo");
        assert_eq!(collision.previous, tmp.join("a.yaml"));
        assert_eq!(collision.file, tmp.join("b.yaml"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn empty_fragment_contributes_nothing() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("empty.yaml"), "").unwrap();
        std::fs::write(tmp.join("ok.yaml"), "Limit:\n  in: query\n").unwrap();

        let set = load_fragment_directory(&tmp, "yaml", Category::Parameters).unwrap();
        assert_eq!(set.files.len(), 2);
        assert_eq!(set.entries.len(), 1);

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn non_mapping_fragment_is_a_parse_error() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("list.yaml"), "- a\n- b\n").unwrap();

        let err = load_fragment_directory(&tmp, "yaml", Category::Paths).unwrap_err();
        assert!(matches!(err, BundleError::Parse { .. }));
        let msg = err.to_string();
        assert!(msg.contains("list.yaml"));
        assert!(msg.contains("a sequence"));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn malformed_fragment_aborts() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("bad.yaml"), "key: [unclosed\n").unwrap();

        let err = load_fragment_directory(&tmp, "yaml", Category::Responses).unwrap_err();
        assert!(matches!(err, BundleError::Parse { ref path, .. } if path.ends_with("bad.yaml")));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn duplicate_key_within_one_file_aborts() {
        let tmp = temp_dir();
        std::fs::write(tmp.join("dup.yaml"), "A: 1\nA: 2\n").unwrap();

        let err = load_fragment_directory(&tmp, "yaml", Category::Schemas).unwrap_err();
        assert!(matches!(err, BundleError::Parse { ref path, .. } if path.ends_with("dup.yaml")));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn merge_keys_are_resolved() {
        let tmp = temp_dir();
        let path = tmp.join("schemas.yaml");
        std::fs::write(
            &path,
            "Base: &b {type: object, x: 1}\nUser: {<<: *b, y: 2}\n",
        )
        .unwrap();

        let map = load_mapping(&path).unwrap();
        assert_eq!(map["Base"], json!({"type": "object", "x": 1}));
        assert_eq!(map["User"], json!({"type": "object", "x": 1, "y": 2}));
        assert!(map["User"].get("<<").is_none());

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn numeric_yaml_keys_become_strings() {
        let tmp = temp_dir();
        let path = tmp.join("responses.yaml");
        std::fs::write(&path, "200:\n  description: ok\n").unwrap();

        let map = load_mapping(&path).unwrap();
        assert_eq!(map["200"], json!({"description": "ok"}));

        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[test]
    fn json_documents_are_supported() {
        let tmp = temp_dir();
        let path = tmp.join("base.json");
        std::fs::write(&path, r#"{"openapi": "3.1.0"}"#).unwrap();

        let doc = load_document(&path).unwrap();
        assert_eq!(doc, json!({"openapi": "3.1.0"}));

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
