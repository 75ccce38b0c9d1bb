//! Template manifest types and parsing

use serde::{Deserialize, Serialize};

/// Template manifest (`template.yaml` at the root of a template)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateManifest {
    /// Display name of the template
    pub name: String,

    /// Description of what the template provides
    pub description: String,

    /// Semver version for CLI compatibility checking
    pub version: String,

    /// Source files shipped with the template
    #[serde(default)]
    pub files: Vec<String>,
}

impl TemplateManifest {
    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Whether the template ships `path`
    pub fn provides(&self, path: &str) -> bool {
        self.files.iter().any(|f| f == path)
    }
}
