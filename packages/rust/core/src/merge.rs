//! Shallow merge of category maps into the composite document.
//!
//! Merging only ever touches the top level of a section: a fragment key
//! replaces the whole value under that key, nested mappings are not combined.

use std::path::Path;

use serde_json::{Map, Value};

use openapi_bundle_shared::{
    BundleError, COMPONENTS_KEY, Category, Result, SectionCounts, SectionLocation,
};

/// Insert every key of `source` into `target`, overwriting existing keys.
///
/// Overwritten keys keep their position. Returns the keys that were replaced.
pub fn shallow_merge(target: &mut Map<String, Value>, source: Map<String, Value>) -> Vec<String> {
    let mut replaced = Vec::new();
    for (key, value) in source {
        if target.contains_key(&key) {
            replaced.push(key.clone());
        }
        target.insert(key, value);
    }
    replaced
}

/// Ensure `parent[key]` is a mapping and return it.
///
/// An absent or null value becomes an empty mapping; any other shape is an
/// error attributed to `source`.
pub fn ensure_mapping<'a>(
    parent: &'a mut Map<String, Value>,
    key: &str,
    display_key: &str,
    source: &Path,
) -> Result<&'a mut Map<String, Value>> {
    let slot = parent
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));

    if slot.is_null() {
        *slot = Value::Object(Map::new());
    }

    slot.as_object_mut()
        .ok_or_else(|| BundleError::parse(source, format!("`{display_key}` must be a mapping")))
}

/// Ensure the document has a `components` mapping.
pub fn ensure_components<'a>(
    document: &'a mut Map<String, Value>,
    source: &Path,
) -> Result<&'a mut Map<String, Value>> {
    ensure_mapping(document, COMPONENTS_KEY, COMPONENTS_KEY, source)
}

/// Merge a category map into its section of the document.
///
/// The section is created empty when absent. Returns the base keys that the
/// fragments replaced.
pub fn splice_section(
    document: &mut Map<String, Value>,
    category: Category,
    entries: Map<String, Value>,
    source: &Path,
) -> Result<Vec<String>> {
    let display_key = category.to_string();
    let section = match category.location() {
        SectionLocation::Root(key) => ensure_mapping(document, key, &display_key, source)?,
        SectionLocation::Components(key) => {
            let components = ensure_components(document, source)?;
            ensure_mapping(components, key, &display_key, source)?
        }
    };
    Ok(shallow_merge(section, entries))
}

/// Number of entries in a category's section, zero when absent or not a mapping.
pub fn section_len(document: &Map<String, Value>, category: Category) -> usize {
    let section = match category.location() {
        SectionLocation::Root(key) => document.get(key),
        SectionLocation::Components(key) => document
            .get(COMPONENTS_KEY)
            .and_then(|components| components.get(key)),
    };
    section.and_then(Value::as_object).map_or(0, Map::len)
}

/// Count the entries of every section of a composite document.
pub fn summarize(document: &Map<String, Value>) -> SectionCounts {
    let mut counts = SectionCounts::default();
    for category in Category::ALL {
        counts.set(category, section_len(document, category));
    }
    counts
}
