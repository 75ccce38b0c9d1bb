//! Template fetching from the embedded copy, a local directory or a remote archive
//!
//! - Embedded: the `seed-element` template compiled into the binary
//! - Local: reads `template.yaml` and sources straight from a directory
//! - Remote: downloads `<url>/seed-element.zip` once and serves files from memory

use super::manifest::TemplateManifest;
use super::TemplateStore;
use crate::product::GeneratorConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::PathBuf;
use tokio::fs;
use url::Url;
use zip::ZipArchive;

/// Name of the template directory and of the remote archive
pub const TEMPLATE_NAME: &str = "seed-element";

const MANIFEST_FILE: &str = "template.yaml";

macro_rules! embed {
    ($($path:literal),* $(,)?) => {
        &[$(($path, include_bytes!(concat!("../../templates/seed-element/", $path)) as &[u8])),*]
    };
}

/// Template sources compiled into the binary
const EMBEDDED: &[(&str, &[u8])] = embed![
    "template.yaml",
    "gitignore",
    "gitattributes",
    "bowerrc",
    "jshintrc",
    "editorconfig",
    "bower.json",
    "seed-element.html",
    "index.html",
    "demo/index.html",
    "README.md",
    "test/index.html",
    "test/seed-element-basic.html",
];

/// Where template sources come from
#[derive(Debug, Clone)]
pub enum TemplateSource {
    Embedded,
    Local(PathBuf),
    Remote(Url),
}

impl TemplateSource {
    /// Pick the source: an explicit directory wins, then the product's URL
    /// override from the environment, then the embedded template
    pub fn from_config<C: GeneratorConfig>(
        config: &C,
        template_dir: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(dir) = template_dir {
            return Ok(Self::Local(dir));
        }

        match std::env::var(config.template_url_env()) {
            Ok(url_str) if !url_str.trim().is_empty() => {
                let url = Url::parse(url_str.trim())
                    .with_context(|| format!("Invalid template URL: {}", url_str))?;
                Ok(Self::Remote(url))
            }
            _ => Ok(Self::Embedded),
        }
    }
}

/// Template fetcher - handles retrieving template sources
pub struct TemplateFetcher {
    source: TemplateSource,
    client: reqwest::Client,
    /// Files extracted from a downloaded archive
    archive: Option<HashMap<String, Vec<u8>>>,
    manifest: Option<TemplateManifest>,
}

impl TemplateFetcher {
    /// Create a new fetcher with a custom user agent
    pub fn new(source: TemplateSource, user_agent: &str) -> Self {
        Self {
            source,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            archive: None,
            manifest: None,
        }
    }

    /// Fetcher over the templates compiled into the binary
    pub fn embedded() -> Self {
        Self::new(TemplateSource::Embedded, TEMPLATE_NAME)
    }

    /// Build a URL by appending a path segment, preserving query parameters
    fn build_url(base: &Url, path_segment: &str) -> Result<Url> {
        let mut url = base.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("URL cannot have path segments: {}", base))?
            .pop_if_empty()
            .push(path_segment);
        Ok(url)
    }

    async fn download_archive(&self, base_url: &Url) -> Result<HashMap<String, Vec<u8>>> {
        let zip_url = Self::build_url(base_url, &format!("{}.zip", TEMPLATE_NAME))?;
        tracing::debug!(url = %zip_url, "downloading template archive");

        let response = self
            .client
            .get(zip_url.clone())
            .send()
            .await
            .with_context(|| format!("Failed to fetch template archive from {}", zip_url))?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to fetch template archive from {}: HTTP {}",
                zip_url,
                response.status()
            );
        }

        let bytes = response.bytes().await?;
        extract_archive(&bytes)
    }

    async fn read_bytes(&mut self, path: &str) -> Result<Vec<u8>> {
        match &self.source {
            TemplateSource::Embedded => EMBEDDED
                .iter()
                .find(|(name, _)| *name == path)
                .map(|(_, bytes)| bytes.to_vec())
                .ok_or_else(|| anyhow::anyhow!("File '{}' not found in embedded template", path)),
            TemplateSource::Local(dir) => {
                let full_path = dir.join(path);
                fs::read(&full_path)
                    .await
                    .with_context(|| format!("Failed to read {}", full_path.display()))
            }
            TemplateSource::Remote(base_url) => {
                if self.archive.is_none() {
                    let files = self.download_archive(base_url).await?;
                    self.archive = Some(files);
                }
                self.archive
                    .as_ref()
                    .and_then(|files| files.get(path))
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("File '{}' not found in template archive", path))
            }
        }
    }
}

#[async_trait]
impl TemplateStore for TemplateFetcher {
    async fn manifest(&mut self) -> Result<TemplateManifest> {
        if let Some(manifest) = &self.manifest {
            return Ok(manifest.clone());
        }

        let bytes = self.read_bytes(MANIFEST_FILE).await?;
        let content = String::from_utf8_lossy(&bytes);
        let manifest =
            TemplateManifest::from_yaml(&content).context("Failed to parse template manifest")?;
        self.manifest = Some(manifest.clone());
        Ok(manifest)
    }

    async fn load(&mut self, path: &str) -> Result<Vec<u8>> {
        self.read_bytes(path).await
    }
}

/// Extract a template archive into a path -> contents map
///
/// Entries are expected under a `seed-element/` prefix, which is stripped.
fn extract_archive(zip_bytes: &[u8]) -> Result<HashMap<String, Vec<u8>>> {
    let mut archive =
        ZipArchive::new(Cursor::new(zip_bytes)).context("Failed to read template archive")?;

    let prefix = format!("{}/", TEMPLATE_NAME);
    let mut files = HashMap::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        if file.is_dir() {
            continue;
        }

        let full_path = file.name().to_string();
        let relative_path = full_path
            .strip_prefix(&prefix)
            .unwrap_or(&full_path)
            .to_string();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents)?;
        files.insert(relative_path, contents);
    }

    if !files.contains_key(MANIFEST_FILE) {
        anyhow::bail!("Template archive is missing {}", MANIFEST_FILE);
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn archive(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        {
            let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
            for (name, content) in entries {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(content.as_bytes()).unwrap();
            }
            zip.finish().unwrap();
        }
        buffer
    }

    #[tokio::test]
    async fn test_embedded_manifest_lists_every_embedded_file() {
        let mut fetcher = TemplateFetcher::embedded();
        let manifest = fetcher.manifest().await.unwrap();
        assert_eq!(manifest.name, TEMPLATE_NAME);
        for (path, _) in EMBEDDED.iter().filter(|(p, _)| *p != MANIFEST_FILE) {
            assert!(manifest.provides(path), "manifest is missing {path}");
        }
    }

    #[tokio::test]
    async fn test_embedded_missing_file() {
        let mut fetcher = TemplateFetcher::embedded();
        assert!(fetcher.load("nope.txt").await.is_err());
    }

    #[tokio::test]
    async fn test_local_source_reads_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(MANIFEST_FILE),
            "name: local\ndescription: d\nversion: 9.0.0\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("gitignore"), "dist\n").unwrap();

        let mut fetcher = TemplateFetcher::new(TemplateSource::Local(dir.path().into()), "test");
        assert_eq!(fetcher.manifest().await.unwrap().version, "9.0.0");
        assert_eq!(fetcher.load("gitignore").await.unwrap(), b"dist\n");
    }

    #[test]
    fn test_extract_strips_template_prefix() {
        let bytes = archive(&[
            ("seed-element/template.yaml", "name: a\ndescription: b\nversion: 0.1.0\n"),
            ("seed-element/demo/index.html", "<p>demo</p>"),
        ]);
        let files = extract_archive(&bytes).unwrap();
        assert_eq!(files["demo/index.html"], b"<p>demo</p>");
    }

    #[test]
    fn test_extract_requires_manifest() {
        let bytes = archive(&[("seed-element/README.md", "# hi")]);
        assert!(extract_archive(&bytes).is_err());
    }

    #[test]
    fn test_build_url_appends_segment() {
        let base = Url::parse("https://example.com/templates/?ref=main").unwrap();
        let url = TemplateFetcher::build_url(&base, "seed-element.zip").unwrap();
        assert_eq!(url.as_str(), "https://example.com/templates/seed-element.zip?ref=main");
    }
}
