//! End-to-end bundle pipeline: base → fragments → composite → JSON + YAML.

use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use openapi_bundle_shared::{
    BundleError, Category, Collision, DuplicatePolicy, Layout, OutputArtifact, Result,
    SectionCounts,
};

use crate::loader::{load_fragment_directory, load_mapping};
use crate::merge::{ensure_components, splice_section, summarize};
use crate::writer::{render_json, render_yaml, write_output};

/// Options that change how fragments are merged.
#[derive(Debug, Clone, Default)]
pub struct BundleOptions {
    /// Handling of keys defined by several fragment files.
    pub on_duplicate: DuplicatePolicy,
}

/// What one category contributed to the composite document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLoad {
    pub category: Category,
    /// Fragment files read.
    pub files: usize,
    /// Distinct keys merged into the section.
    pub entries: usize,
}

/// The composite document before it is written.
#[derive(Debug, Clone)]
pub struct Assembled {
    pub document: Value,
    pub loads: Vec<CategoryLoad>,
    pub collisions: Vec<Collision>,
}

/// Result of a full bundle run.
#[derive(Debug, Clone)]
pub struct BundleResult {
    pub document: Value,
    pub loads: Vec<CategoryLoad>,
    /// Duplicate fragment keys (empty under [`DuplicatePolicy::Ignore`]).
    pub collisions: Vec<Collision>,
    pub counts: SectionCounts,
    /// JSON output first, then YAML.
    pub outputs: Vec<OutputArtifact>,
}

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter {
    /// Called when the base document has been parsed.
    fn base_loaded(&self, layout: &Layout);
    /// Called after each category has been merged.
    fn category_loaded(&self, load: &CategoryLoad);
    /// Called after each output file is written.
    fn output_written(&self, artifact: &OutputArtifact);
    /// Called when the pipeline completes.
    fn done(&self, result: &BundleResult);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn base_loaded(&self, _layout: &Layout) {}
    fn category_loaded(&self, _load: &CategoryLoad) {}
    fn output_written(&self, _artifact: &OutputArtifact) {}
    fn done(&self, _result: &BundleResult) {}
}

/// Build the composite document without writing anything.
#[instrument(skip_all, fields(base = %layout.base_file.display()))]
pub fn assemble(
    layout: &Layout,
    options: &BundleOptions,
    progress: &dyn ProgressReporter,
) -> Result<Assembled> {
    let base_path = &layout.base_file;
    if !base_path.exists() {
        return Err(BundleError::MissingBase {
            path: base_path.clone(),
        });
    }

    let mut document: Map<String, Value> = load_mapping(base_path)?;
    info!("loaded base document");
    progress.base_loaded(layout);

    ensure_components(&mut document, base_path)?;

    let mut loads = Vec::with_capacity(Category::ALL.len());
    let mut collisions = Vec::new();

    for category in Category::DIRECTORIES {
        let Some(dir) = layout.directory(category) else {
            continue;
        };

        let set = load_fragment_directory(dir, &layout.fragment_extension, category)?;
        let load = CategoryLoad {
            category,
            files: set.files.len(),
            entries: set.entries.len(),
        };

        let replaced = splice_section(&mut document, category, set.entries, base_path)?;
        for key in &replaced {
            debug!(%category, key = %key, "fragment overrides base definition");
        }

        info!(%category, files = load.files, entries = load.entries, "merged fragments");
        progress.category_loaded(&load);
        loads.push(load);
        collisions.extend(set.collisions);
    }

    let security_file = &layout.security_schemes_file;
    if security_file.exists() {
        let schemes = load_mapping(security_file)?;
        let load = CategoryLoad {
            category: Category::SecuritySchemes,
            files: 1,
            entries: schemes.len(),
        };
        splice_section(&mut document, Category::SecuritySchemes, schemes, base_path)?;

        info!(entries = load.entries, "merged security schemes");
        progress.category_loaded(&load);
        loads.push(load);
    } else {
        debug!(path = %security_file.display(), "no security schemes file");
    }

    let collisions = apply_duplicate_policy(options.on_duplicate, collisions)?;

    Ok(Assembled {
        document: Value::Object(document),
        loads,
        collisions,
    })
}

/// Assemble the composite document and write both outputs.
///
/// Nothing is written unless assembly succeeds completely.
#[instrument(skip_all, fields(json = %layout.json_output.display(), yaml = %layout.yaml_output.display()))]
pub fn bundle(
    layout: &Layout,
    options: &BundleOptions,
    progress: &dyn ProgressReporter,
) -> Result<BundleResult> {
    let Assembled {
        document,
        loads,
        collisions,
    } = assemble(layout, options, progress)?;

    let json = render_json(&document)?;
    let yaml = render_yaml(&document)?;

    let mut outputs = Vec::with_capacity(2);
    for (path, content) in [(&layout.json_output, &json), (&layout.yaml_output, &yaml)] {
        let artifact = write_output(path, content)?;
        progress.output_written(&artifact);
        outputs.push(artifact);
    }

    let counts = match &document {
        Value::Object(map) => summarize(map),
        _ => SectionCounts::default(),
    };

    let result = BundleResult {
        document,
        loads,
        collisions,
        counts,
        outputs,
    };

    info!(
        paths = counts.paths,
        schemas = counts.schemas,
        collisions = result.collisions.len(),
        "bundle complete"
    );
    progress.done(&result);

    Ok(result)
}

fn apply_duplicate_policy(
    policy: DuplicatePolicy,
    collisions: Vec<Collision>,
) -> Result<Vec<Collision>> {
    match policy {
        DuplicatePolicy::Ignore => Ok(Vec::new()),
        DuplicatePolicy::Warn => {
            for collision in &collisions {
                warn!(%collision, "duplicate fragment key, later file wins");
            }
            Ok(collisions)
        }
        DuplicatePolicy::Error if collisions.is_empty() => Ok(collisions),
        DuplicatePolicy::Error => Err(BundleError::DuplicateKeys {
            count: collisions.len(),
            summary: collisions
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        }),
    }
}
