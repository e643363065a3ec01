//! Shared types, error model, and configuration for openapi-bundle.
//!
//! This crate is the foundation depended on by the core and CLI crates.
//! It provides:
//! - [`BundleError`] — the unified error type
//! - Domain types ([`Category`], [`Collision`], [`SectionCounts`], [`OutputArtifact`])
//! - Configuration ([`BundleConfig`], [`Layout`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    BundleConfig, CONFIG_FILE_NAME, DuplicatePolicy, Layout, LayoutConfig, MergeConfig,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{BundleError, Result};
pub use types::{
    COMPONENTS_KEY, Category, Collision, OutputArtifact, SectionCounts, SectionLocation,
};
