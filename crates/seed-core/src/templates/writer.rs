//! Writing template sources into the project directory

use super::render::{interpolate, Bindings};
use super::TemplateStore;
use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Writes files beneath a fixed project root
///
/// Destinations are relative to `root`; absolute paths and `..` are refused
/// so nothing lands outside the project. Existing files are overwritten.
#[derive(Debug, Clone)]
pub struct TemplateWriter {
    root: PathBuf,
}

impl TemplateWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Copy `src` verbatim to `dest`
    pub async fn copy(
        &self,
        store: &mut dyn TemplateStore,
        src: &str,
        dest: &str,
    ) -> Result<PathBuf> {
        let content = store.load(src).await?;
        self.write(dest, &content).await
    }

    /// Expand `src` with `bindings` and write the result to `dest`
    pub async fn render(
        &self,
        store: &mut dyn TemplateStore,
        src: &str,
        dest: &str,
        bindings: &Bindings,
    ) -> Result<PathBuf> {
        let content = store.load(src).await?;
        let text = String::from_utf8(content)
            .with_context(|| format!("Template '{}' is not valid UTF-8", src))?;
        let expanded =
            interpolate(&text, bindings).with_context(|| format!("Failed to expand '{}'", src))?;
        self.write(dest, expanded.as_bytes()).await
    }

    async fn write(&self, dest: &str, content: &[u8]) -> Result<PathBuf> {
        let target_path = self.resolve(dest)?;

        // Ensure parent directories exist
        if let Some(parent) = target_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&target_path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", target_path.display()))?;

        tracing::debug!(path = %target_path.display(), bytes = content.len(), "wrote file");
        Ok(target_path)
    }

    fn resolve(&self, dest: &str) -> Result<PathBuf> {
        let relative = Path::new(dest);
        let escapes = relative.as_os_str().is_empty()
            || relative
                .components()
                .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            anyhow::bail!(
                "Destination '{}' must be a relative path inside {}",
                dest,
                self.root.display()
            );
        }
        Ok(self.root.join(relative))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::TemplateFetcher;

    fn bindings() -> Bindings {
        Bindings::from([
            ("elementName", "x-foo".to_string()),
            ("githubUser", "alice".to_string()),
        ])
    }

    #[tokio::test]
    async fn test_copy_writes_nested_paths() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TemplateWriter::new(dir.path().join("x-foo"));
        let mut store = TemplateFetcher::embedded();

        let written = writer.copy(&mut store, "bowerrc", ".bowerrc").await.unwrap();
        assert_eq!(written, dir.path().join("x-foo/.bowerrc"));
        assert!(std::fs::read_to_string(written).unwrap().contains("\"directory\""));
    }

    #[tokio::test]
    async fn test_render_expands_bindings() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TemplateWriter::new(dir.path());
        let mut store = TemplateFetcher::embedded();

        let written = writer
            .render(&mut store, "bower.json", "bower.json", &bindings())
            .await
            .unwrap();
        let content = std::fs::read_to_string(written).unwrap();
        assert!(content.contains("\"name\": \"x-foo\""));
        assert!(content.contains("https://github.com/alice/x-foo/"));
        assert!(!content.contains("<%="));
    }

    #[tokio::test]
    async fn test_render_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README.md"), "stale").unwrap();
        let writer = TemplateWriter::new(dir.path());
        let mut store = TemplateFetcher::embedded();

        writer
            .render(&mut store, "README.md", "README.md", &bindings())
            .await
            .unwrap();
        let content = std::fs::read_to_string(dir.path().join("README.md")).unwrap();
        assert!(content.starts_with("# x-foo"));
    }

    #[tokio::test]
    async fn test_refuses_paths_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        let writer = TemplateWriter::new(dir.path().join("project"));
        let mut store = TemplateFetcher::embedded();

        assert!(writer.copy(&mut store, "gitignore", "../escape").await.is_err());
        assert!(writer.copy(&mut store, "gitignore", "/tmp/escape").await.is_err());
        assert!(writer.copy(&mut store, "gitignore", "").await.is_err());
        assert!(!dir.path().join("escape").exists());
    }
}
