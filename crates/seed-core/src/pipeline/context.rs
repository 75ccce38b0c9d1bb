//! State shared by the stages of a single run

use crate::runtime::InstallOptions;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Mutable record threaded through every stage
///
/// Created when a run starts and dropped when it ends. Each field is written
/// by exactly one stage and only read by the stages after it.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    requested_name: String,
    workspace: PathBuf,
    element_name: Option<String>,
    pub(crate) lives_dangerously: bool,
    pub(crate) github_user: String,
    pub(crate) include_test_scaffold: bool,
    install: InstallOptions,
    pub(crate) output_root: Option<PathBuf>,
    pub(crate) written: Vec<PathBuf>,
}

impl PipelineContext {
    pub fn new(
        requested_name: impl Into<String>,
        workspace: PathBuf,
        install: InstallOptions,
    ) -> Self {
        Self {
            requested_name: requested_name.into(),
            workspace,
            element_name: None,
            lives_dangerously: false,
            github_user: String::new(),
            include_test_scaffold: false,
            install,
            output_root: None,
            written: Vec::new(),
        }
    }

    /// Name as given on the command line, before validation
    pub fn requested_name(&self) -> &str {
        &self.requested_name
    }

    /// Directory the generator was invoked in
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// Validated element name; an error before the validate stage has run
    pub fn element_name(&self) -> Result<&str> {
        self.element_name
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Element name has not been validated yet"))
    }

    /// Record the validated name. It can only be set once.
    pub(crate) fn set_element_name(&mut self, name: impl Into<String>) -> Result<()> {
        if self.element_name.is_some() {
            anyhow::bail!("Element name is already set");
        }
        self.element_name = Some(name.into());
        Ok(())
    }

    pub fn lives_dangerously(&self) -> bool {
        self.lives_dangerously
    }

    pub fn github_user(&self) -> &str {
        &self.github_user
    }

    pub fn include_test_scaffold(&self) -> bool {
        self.include_test_scaffold
    }

    pub fn install_options(&self) -> InstallOptions {
        self.install
    }

    /// Project directory, known once rendering has started
    pub fn output_root(&self) -> Result<&Path> {
        self.output_root
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Output root has not been established yet"))
    }
}
