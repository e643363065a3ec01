//! Serialization and atomic writing of the composite document.

use std::path::Path;

use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;

use openapi_bundle_shared::{BundleError, OutputArtifact, Result};

/// Pretty-printed JSON with 2-space indentation.
pub fn render_json(document: &Value) -> Result<String> {
    serde_json::to_string_pretty(document)
        .map_err(|e| BundleError::serialize(format!("JSON serialization failed: {e}")))
}

/// YAML block output. Long scalars are never folded.
pub fn render_yaml(document: &Value) -> Result<String> {
    serde_yaml::to_string(document)
        .map_err(|e| BundleError::serialize(format!("YAML serialization failed: {e}")))
}

/// Write `content` to `path`, replacing any existing file.
///
/// Parent directories are created as needed. The content goes to a hidden
/// temp file next to the target first and is then renamed over it.
pub fn write_output(path: &Path, content: &str) -> Result<OutputArtifact> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| BundleError::io(parent, e))?;

    let file_name = path
        .file_name()
        .ok_or_else(|| BundleError::config(format!("output path {path:?} has no file name")))?
        .to_string_lossy();
    let temp = parent.join(format!(".{file_name}.tmp"));

    std::fs::write(&temp, content).map_err(|e| BundleError::io(&temp, e))?;
    std::fs::rename(&temp, path).map_err(|e| BundleError::io(path, e))?;

    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let sha256 = format!("{:x}", hasher.finalize());

    debug!(path = %path.display(), size = content.len(), "wrote output");

    Ok(OutputArtifact {
        path: path.to_path_buf(),
        sha256,
        size_bytes: content.len(),
    })
}
