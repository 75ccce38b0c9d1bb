//! The five stages and the render plan
//!
//! Each stage reads what earlier stages wrote into the context, writes its
//! own fields and returns a `Flow`. Awaiting a collaborator is the only
//! place a stage suspends.

use super::context::PipelineContext;
use super::status::{AbortReason, Flow};
use super::Pipeline;
use crate::prompt::Question;
use crate::templates::{check_compatibility, Bindings, TemplateWriter};
use crate::workspace::scan_workspace;
use anyhow::{Context, Result};
use std::path::PathBuf;

const DANGER_WARNING: &str = "You are generating your element in a workspace that appears to \
    contain data other than web components. This is potentially dangerous, as your element's \
    dependencies will be installed in the current directory. Bower will overwrite any \
    conflicting directories.";

pub const LIVES_DANGEROUSLY: &str = "livesDangerously";
pub const GITHUB_USER: &str = "ghUser";
pub const INCLUDE_WCT: &str = "includeWCT";

/// Whether a planned file is copied verbatim or expanded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderAction {
    Copy,
    Template,
}

/// One file the render stage writes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderStep {
    pub action: RenderAction,
    /// Path inside the template
    pub source: &'static str,
    /// Path relative to the project root
    pub dest: String,
}

impl RenderStep {
    fn copy(source: &'static str, dest: &str) -> Self {
        Self {
            action: RenderAction::Copy,
            source,
            dest: dest.to_string(),
        }
    }

    fn template(source: &'static str, dest: impl Into<String>) -> Self {
        Self {
            action: RenderAction::Template,
            source,
            dest: dest.into(),
        }
    }
}

/// Files to write for `element_name`, in order
pub fn render_plan(element_name: &str, include_tests: bool) -> Vec<RenderStep> {
    let mut plan = vec![
        RenderStep::copy("gitignore", ".gitignore"),
        RenderStep::copy("gitattributes", ".gitattributes"),
        RenderStep::copy("bowerrc", ".bowerrc"),
        RenderStep::template("bower.json", "bower.json"),
        RenderStep::copy("jshintrc", ".jshintrc"),
        RenderStep::copy("editorconfig", ".editorconfig"),
        RenderStep::template("seed-element.html", format!("{}.html", element_name)),
        RenderStep::template("index.html", "index.html"),
        RenderStep::template("demo/index.html", "demo/index.html"),
        RenderStep::template("README.md", "README.md"),
    ];

    if include_tests {
        plan.push(RenderStep::template("test/index.html", "test/index.html"));
        plan.push(RenderStep::template(
            "test/seed-element-basic.html",
            format!("test/{}-basic.html", element_name),
        ));
    }

    plan
}

impl Pipeline<'_> {
    /// Check the requested name; an invalid name ends the run before any output
    pub(crate) async fn validate(&mut self, ctx: &mut PipelineContext) -> Result<Flow> {
        let name = ctx.requested_name().to_string();
        let result = self.validator.validate(&name).await?;

        if !result.is_valid {
            let message = result
                .message
                .unwrap_or_else(|| format!("'{}' is not a valid element name", name));
            self.prompter.error(&message)?;
            return Ok(Flow::Abort(AbortReason::InvalidName));
        }

        if let Some(message) = result.message.filter(|m| !m.is_empty()) {
            self.prompter.warn(&message)?;
        }

        ctx.set_element_name(name)?;
        Ok(Flow::Continue)
    }

    /// Make sure the user knows dependencies land next to the new element
    pub(crate) async fn safety_check(&mut self, ctx: &mut PipelineContext) -> Result<Flow> {
        let scan = scan_workspace(ctx.workspace())?;

        if !scan.has_foreign_entries() {
            ctx.lives_dangerously = true;
            return Ok(Flow::Continue);
        }

        tracing::debug!(foreign = ?scan.foreign(), "workspace holds non-component entries");
        self.prompter.warn(DANGER_WARNING)?;

        let question =
            Question::confirm(LIVES_DANGEROUSLY, "Are you ok with that?").with_default(false);
        let answers = self.prompter.ask(&[question]).await?;
        ctx.lives_dangerously = answers.flag(LIVES_DANGEROUSLY)?;

        if ctx.lives_dangerously {
            Ok(Flow::Continue)
        } else {
            Ok(Flow::Abort(AbortReason::UserDeclined))
        }
    }

    /// Ask for the GitHub user and whether to include a test scaffold
    pub(crate) async fn configure(&mut self, ctx: &mut PipelineContext) -> Result<Flow> {
        self.prompter.note(&self.settings.greeting)?;

        let answers = self
            .prompter
            .ask(&[
                Question::input(GITHUB_USER, "What is your GitHub username?"),
                Question::confirm(INCLUDE_WCT, "Would you like to include web-component-tester?")
                    .with_default(true),
            ])
            .await?;

        ctx.github_user = answers.text(GITHUB_USER)?.to_string();
        ctx.include_test_scaffold = answers.flag(INCLUDE_WCT)?;
        Ok(Flow::Continue)
    }

    /// Materialize the template under `<workspace>/<element-name>/`
    pub(crate) async fn render(&mut self, ctx: &mut PipelineContext) -> Result<Flow> {
        let name = ctx.element_name()?.to_string();
        let plan = render_plan(&name, ctx.include_test_scaffold);

        let manifest = self.templates.manifest().await?;
        if let Some(warning) = check_compatibility(
            &self.settings.cli_version,
            &manifest.version,
            &self.settings.upgrade_command,
        ) {
            self.prompter.warn(&warning)?;
        }

        let missing: Vec<&str> = plan
            .iter()
            .map(|step| step.source)
            .filter(|source| !manifest.provides(source))
            .collect();
        if !missing.is_empty() {
            anyhow::bail!(
                "Template '{}' does not provide: {}",
                manifest.name,
                missing.join(", ")
            );
        }

        let root = ctx.workspace().join(&name);
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("Failed to create project directory: {}", root.display()))?;
        ctx.output_root = Some(root.clone());

        let bindings = Bindings::from([
            ("elementName", name.clone()),
            ("githubUser", ctx.github_user.clone()),
        ]);
        let writer = TemplateWriter::new(root);

        for step in plan {
            match step.action {
                RenderAction::Copy => {
                    writer.copy(&mut *self.templates, step.source, &step.dest).await?
                }
                RenderAction::Template => {
                    writer
                        .render(&mut *self.templates, step.source, &step.dest, &bindings)
                        .await?
                }
            };
            ctx.written.push(PathBuf::from(step.dest));
        }

        Ok(Flow::Continue)
    }

    /// Hand the project to the installer without waiting for it
    pub(crate) async fn install(&mut self, ctx: &mut PipelineContext) -> Result<Flow> {
        let root = ctx.output_root()?.to_path_buf();

        match self.installer.install(&root, ctx.install_options()).await {
            Ok(handle) => self.pending_install = Some(handle),
            Err(e) => {
                tracing::warn!(error = %e, "dependency installation did not start");
                self.prompter
                    .warn(&format!("Dependency installation could not be started: {:#}", e))?;
            }
        }

        Ok(Flow::Continue)
    }
}
