//! Template fetching, expansion and writing
//!
//! This module provides:
//! - The `TemplateStore` contract the render stage reads sources through
//! - Template fetching from embedded, local or remote sources
//! - `<%= name %>` placeholder expansion
//! - A root-confined writer for copies and expansions
//! - Version compatibility checking

pub mod fetcher;
pub mod manifest;
pub mod render;
pub mod version;
pub mod writer;

use anyhow::Result;
use async_trait::async_trait;

pub use fetcher::{TemplateFetcher, TemplateSource, TEMPLATE_NAME};
pub use manifest::TemplateManifest;
pub use render::{interpolate, Bindings};
pub use version::check_compatibility;
pub use writer::TemplateWriter;

/// Source of template files
#[async_trait]
pub trait TemplateStore: Send {
    /// The template's manifest
    async fn manifest(&mut self) -> Result<TemplateManifest>;

    /// Raw contents of a template source file
    async fn load(&mut self, path: &str) -> Result<Vec<u8>>;
}
