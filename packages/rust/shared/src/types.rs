//! Core domain types for bundling fragment documents.

use std::path::PathBuf;

use serde::Serialize;

/// Name of the top-level section holding reusable components.
pub const COMPONENTS_KEY: &str = "components";

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// A fragment category: a directory (or file) of fragments merged into one
/// section of the composite document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Paths,
    Schemas,
    Parameters,
    Responses,
    Examples,
    SecuritySchemes,
}

/// Where a category's section lives inside the composite document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionLocation {
    /// A key of the document root (e.g. `paths`).
    Root(&'static str),
    /// A key of the `components` section (e.g. `components.schemas`).
    Components(&'static str),
}

impl Category {
    /// Categories loaded from fragment directories, in merge order.
    pub const DIRECTORIES: [Category; 5] = [
        Category::Paths,
        Category::Schemas,
        Category::Parameters,
        Category::Responses,
        Category::Examples,
    ];

    /// Every category, in summary order.
    pub const ALL: [Category; 6] = [
        Category::Paths,
        Category::Schemas,
        Category::Parameters,
        Category::Responses,
        Category::Examples,
        Category::SecuritySchemes,
    ];

    /// Document key of this category's section.
    pub fn key(self) -> &'static str {
        match self {
            Self::Paths => "paths",
            Self::Schemas => "schemas",
            Self::Parameters => "parameters",
            Self::Responses => "responses",
            Self::Examples => "examples",
            Self::SecuritySchemes => "securitySchemes",
        }
    }

    /// Location of this category's section in the composite document.
    pub fn location(self) -> SectionLocation {
        match self {
            Self::Paths => SectionLocation::Root(self.key()),
            _ => SectionLocation::Components(self.key()),
        }
    }

    /// Singular noun used in progress messages.
    pub fn noun(self) -> &'static str {
        match self {
            Self::Paths => "path",
            Self::Schemas => "schema",
            Self::Parameters => "parameter",
            Self::Responses => "response",
            Self::Examples => "example",
            Self::SecuritySchemes => "security scheme",
        }
    }

    /// Capitalized plural label used in the summary.
    pub fn label(self) -> &'static str {
        match self {
            Self::Paths => "Paths",
            Self::Schemas => "Schemas",
            Self::Parameters => "Parameters",
            Self::Responses => "Responses",
            Self::Examples => "Examples",
            Self::SecuritySchemes => "Security schemes",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.location() {
            SectionLocation::Root(key) => write!(f, "{key}"),
            SectionLocation::Components(key) => write!(f, "{COMPONENTS_KEY}.{key}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Collision
// ---------------------------------------------------------------------------

/// A key defined by more than one fragment file in the same category.
///
/// The value from `file` replaced the one from `previous`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collision {
    pub category: Category,
    pub key: String,
    pub previous: PathBuf,
    pub file: PathBuf,
}

impl std::fmt::Display for Collision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} key '{}' in {} overrides {}",
            self.category,
            self.key,
            self.file.display(),
            self.previous.display()
        )
    }
}

// ---------------------------------------------------------------------------
// Outputs and summary
// ---------------------------------------------------------------------------

/// Metadata for a single written output file.
#[derive(Debug, Clone, Serialize)]
pub struct OutputArtifact {
    pub path: PathBuf,
    pub sha256: String,
    pub size_bytes: usize,
}

/// Entry counts per section of a composite document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SectionCounts {
    pub paths: usize,
    pub schemas: usize,
    pub parameters: usize,
    pub responses: usize,
    pub examples: usize,
    pub security_schemes: usize,
}

impl SectionCounts {
    /// Count for one category.
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Paths => self.paths,
            Category::Schemas => self.schemas,
            Category::Parameters => self.parameters,
            Category::Responses => self.responses,
            Category::Examples => self.examples,
            Category::SecuritySchemes => self.security_schemes,
        }
    }

    /// Set the count for one category.
    pub fn set(&mut self, category: Category, count: usize) {
        let slot = match category {
            Category::Paths => &mut self.paths,
            Category::Schemas => &mut self.schemas,
            Category::Parameters => &mut self.parameters,
            Category::Responses => &mut self.responses,
            Category::Examples => &mut self.examples,
            Category::SecuritySchemes => &mut self.security_schemes,
        };
        *slot = count;
    }
}
