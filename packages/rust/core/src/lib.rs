//! Fragment loading, shallow merge, and the bundle pipeline for openapi-bundle.
//!
//! This crate ties together loading a base document, merging category
//! fragment directories into it, and writing the composite document as
//! JSON and YAML.

pub mod bundler;
pub mod loader;
pub mod merge;
pub mod writer;
