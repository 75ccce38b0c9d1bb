//! The generator pipeline
//!
//! `Pipeline` owns the ordered stage list and the collaborators the stages
//! talk to. A run walks the stages strictly in order over one
//! `PipelineContext`:
//!
//! ```text
//! validate ──→ safety-check ──→ configure ──→ render ──→ install
//!    │              │
//!    └─ invalid     └─ declined
//!       name           confirmation
//! ```
//!
//! Stage N+1 starts only after stage N has resolved. An invalid name or a
//! declined confirmation ends the run with an abort status; any collaborator
//! error ends it with `Failed`. Nothing written before a failure is removed.

mod context;
mod stages;
mod status;

pub use context::PipelineContext;
pub use stages::{
    render_plan, RenderAction, RenderStep, GITHUB_USER, INCLUDE_WCT, LIVES_DANGEROUSLY,
};
pub use status::{StageName, Summary, TerminalStatus, STAGES};

use crate::error::PipelineError;
use crate::prompt::Prompter;
use crate::runtime::{InstallHandle, InstallOptions, Installer};
use crate::templates::TemplateStore;
use crate::validator::NameValidator;
use crate::DEFAULT_CLI_VERSION;
use anyhow::Result;
use status::Flow;
use std::path::PathBuf;

const DEFAULT_GREETING: &str = "Out of the box I follow the seed-element pattern.";
const DEFAULT_UPGRADE_COMMAND: &str = "cargo install seed-element --force";

/// Caller-supplied inputs for one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub element_name: String,
    /// Directory the generator runs in; the project is created beneath it
    pub workspace: PathBuf,
    pub install: InstallOptions,
}

impl RunOptions {
    pub fn new(element_name: impl Into<String>, workspace: impl Into<PathBuf>) -> Self {
        Self {
            element_name: element_name.into(),
            workspace: workspace.into(),
            install: InstallOptions::default(),
        }
    }

    pub fn with_install(mut self, install: InstallOptions) -> Self {
        self.install = install;
        self
    }
}

#[derive(Debug, Clone)]
struct Settings {
    cli_version: String,
    upgrade_command: String,
    greeting: String,
}

/// Runs the stages in order against the supplied collaborators
pub struct Pipeline<'a> {
    validator: &'a dyn NameValidator,
    prompter: &'a mut dyn Prompter,
    templates: &'a mut dyn TemplateStore,
    installer: &'a dyn Installer,
    settings: Settings,
    pending_install: Option<InstallHandle>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        validator: &'a dyn NameValidator,
        prompter: &'a mut dyn Prompter,
        templates: &'a mut dyn TemplateStore,
        installer: &'a dyn Installer,
    ) -> Self {
        Self {
            validator,
            prompter,
            templates,
            installer,
            settings: Settings {
                cli_version: DEFAULT_CLI_VERSION.to_string(),
                upgrade_command: DEFAULT_UPGRADE_COMMAND.to_string(),
                greeting: DEFAULT_GREETING.to_string(),
            },
            pending_install: None,
        }
    }

    /// Version used to check template compatibility, and how to upgrade
    pub fn with_cli_version(
        mut self,
        cli_version: impl Into<String>,
        upgrade_command: impl Into<String>,
    ) -> Self {
        self.settings.cli_version = cli_version.into();
        self.settings.upgrade_command = upgrade_command.into();
        self
    }

    /// Message shown before the configuration questions
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.settings.greeting = greeting.into();
        self
    }

    /// Run every stage and report how the run ended
    pub async fn run(&mut self, options: RunOptions) -> TerminalStatus {
        let RunOptions {
            element_name,
            workspace,
            install,
        } = options;
        let mut ctx = PipelineContext::new(element_name, workspace, install);

        for stage in STAGES {
            tracing::debug!(%stage, "stage started");

            let flow = match stage {
                StageName::Validate => self.validate(&mut ctx).await,
                StageName::SafetyCheck => self.safety_check(&mut ctx).await,
                StageName::Configure => self.configure(&mut ctx).await,
                StageName::Render => self.render(&mut ctx).await,
                StageName::Install => self.install(&mut ctx).await,
            };

            match flow {
                Ok(Flow::Continue) => tracing::debug!(%stage, "stage finished"),
                Ok(Flow::Abort(reason)) => {
                    tracing::info!(%stage, ?reason, "run aborted");
                    return reason.status();
                }
                Err(source) => {
                    tracing::error!(%stage, error = %source, "stage failed");
                    return TerminalStatus::Failed(PipelineError::new(stage, source));
                }
            }
        }

        match summarize(ctx) {
            Ok(summary) => TerminalStatus::Completed(summary),
            Err(source) => TerminalStatus::Failed(PipelineError::new(StageName::Install, source)),
        }
    }

    /// Take the background installation started by the last run, if any
    pub fn take_install(&mut self) -> Option<InstallHandle> {
        self.pending_install.take()
    }

    /// Wait for the background installation started by the last run
    pub async fn wait_for_install(&mut self) -> Result<()> {
        match self.take_install() {
            Some(handle) => handle.wait().await,
            None => Ok(()),
        }
    }
}

fn summarize(ctx: PipelineContext) -> Result<Summary> {
    Ok(Summary {
        element_name: ctx.element_name()?.to_string(),
        project_dir: ctx.output_root()?.to_path_buf(),
        include_tests: ctx.include_test_scaffold(),
        install: ctx.install_options(),
        files: ctx.written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ScriptedPrompter;
    use crate::templates::{TemplateFetcher, TemplateManifest};
    use crate::validator::{ElementNameValidator, Validation};
    use async_trait::async_trait;
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingInstaller {
        calls: Mutex<Vec<(PathBuf, InstallOptions)>>,
        fail: bool,
    }

    impl RecordingInstaller {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<(PathBuf, InstallOptions)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Installer for RecordingInstaller {
        async fn install(&self, dir: &Path, options: InstallOptions) -> Result<InstallHandle> {
            self.calls.lock().unwrap().push((dir.to_path_buf(), options));
            if self.fail {
                anyhow::bail!("bower exploded");
            }
            Ok(InstallHandle::skipped())
        }
    }

    struct BrokenValidator;

    #[async_trait]
    impl NameValidator for BrokenValidator {
        async fn validate(&self, _name: &str) -> Result<Validation> {
            anyhow::bail!("validator unavailable")
        }
    }

    struct FixedVersionStore {
        inner: TemplateFetcher,
        version: &'static str,
    }

    #[async_trait]
    impl TemplateStore for FixedVersionStore {
        async fn manifest(&mut self) -> Result<TemplateManifest> {
            let mut manifest = self.inner.manifest().await?;
            manifest.version = self.version.to_string();
            Ok(manifest)
        }

        async fn load(&mut self, path: &str) -> Result<Vec<u8>> {
            self.inner.load(path).await
        }
    }

    /// Embedded template with one source unlisted or unreadable
    #[derive(Default)]
    struct FaultyStore {
        unlisted: Option<&'static str>,
        unreadable: Option<&'static str>,
    }

    #[async_trait]
    impl TemplateStore for FaultyStore {
        async fn manifest(&mut self) -> Result<TemplateManifest> {
            let mut manifest = TemplateFetcher::embedded().manifest().await?;
            if let Some(unlisted) = self.unlisted {
                manifest.files.retain(|f| f != unlisted);
            }
            Ok(manifest)
        }

        async fn load(&mut self, path: &str) -> Result<Vec<u8>> {
            if self.unreadable == Some(path) {
                anyhow::bail!("{} vanished", path);
            }
            TemplateFetcher::embedded().load(path).await
        }
    }

    /// Every file under `dir`, relative, with `/` separators
    fn files_under(dir: &Path) -> BTreeSet<String> {
        walkdir::WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                e.path()
                    .strip_prefix(dir)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    fn expected(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    const BASE_FILES: [&str; 10] = [
        ".gitignore",
        ".gitattributes",
        ".bowerrc",
        "bower.json",
        ".jshintrc",
        ".editorconfig",
        "super-element.html",
        "index.html",
        "demo/index.html",
        "README.md",
    ];

    async fn run_with(
        workspace: &Path,
        name: &str,
        prompter: &mut ScriptedPrompter,
        installer: &RecordingInstaller,
    ) -> TerminalStatus {
        let mut templates = TemplateFetcher::embedded();
        let mut pipeline =
            Pipeline::new(&ElementNameValidator, prompter, &mut templates, installer);
        pipeline.run(RunOptions::new(name, workspace)).await
    }

    #[tokio::test]
    async fn test_empty_workspace_without_tests() {
        let dir = tempfile::tempdir().unwrap();
        let mut prompter = ScriptedPrompter::new()
            .answer(GITHUB_USER, "alice")
            .answer(INCLUDE_WCT, false);
        let installer = RecordingInstaller::default();

        let status = run_with(dir.path(), "super-element", &mut prompter, &installer).await;

        let TerminalStatus::Completed(summary) = status else {
            panic!("expected completion, got {status:?}");
        };
        let project = dir.path().join("super-element");
        assert_eq!(summary.project_dir, project);
        assert_eq!(files_under(&project), expected(&BASE_FILES));
        assert_eq!(summary.files.len(), BASE_FILES.len());
        assert_eq!(prompter.times_asked(LIVES_DANGEROUSLY), 0);
        assert_eq!(installer.calls(), vec![(project, InstallOptions::default())]);

        let bower = fs::read_to_string(dir.path().join("super-element/bower.json")).unwrap();
        assert!(bower.contains("\"name\": \"super-element\""));
        assert!(bower.contains("alice"));
    }

    #[tokio::test]
    async fn test_empty_workspace_with_tests() {
        let dir = tempfile::tempdir().unwrap();
        let mut prompter = ScriptedPrompter::new()
            .answer(GITHUB_USER, "alice")
            .answer(INCLUDE_WCT, true);
        let installer = RecordingInstaller::default();

        let status = run_with(dir.path(), "super-element", &mut prompter, &installer).await;
        assert!(status.is_completed());

        let mut want = expected(&BASE_FILES);
        want.insert("test/index.html".to_string());
        want.insert("test/super-element-basic.html".to_string());
        assert_eq!(files_under(&dir.path().join("super-element")), want);

        let basic =
            fs::read_to_string(dir.path().join("super-element/test/super-element-basic.html"))
                .unwrap();
        assert!(basic.contains("<super-element></super-element>"));
    }

    #[tokio::test]
    async fn test_invalid_name_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "keep").unwrap();
        let mut prompter = ScriptedPrompter::new();
        let installer = RecordingInstaller::default();

        let status = run_with(dir.path(), "1-bad", &mut prompter, &installer).await;

        assert!(matches!(status, TerminalStatus::AbortedByValidation));
        assert_eq!(files_under(dir.path()), expected(&["notes.txt"]));
        assert_eq!(prompter.errors.len(), 1);
        assert!(prompter.asked.is_empty());
        assert!(installer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_advisory_is_shown_and_run_continues() {
        let dir = tempfile::tempdir().unwrap();
        let mut prompter = ScriptedPrompter::new()
            .answer(GITHUB_USER, "")
            .answer(INCLUDE_WCT, true);
        let installer = RecordingInstaller::default();

        let status = run_with(dir.path(), "x-foo", &mut prompter, &installer).await;

        assert!(status.is_completed());
        assert_eq!(prompter.warnings.len(), 1);
        let project = dir.path().join("x-foo");
        assert!(project.join("x-foo.html").is_file());
        assert!(project.join("test/x-foo-basic.html").is_file());
    }

    #[tokio::test]
    async fn test_component_only_workspace_skips_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        for component in ["polymer", "iron-icon"] {
            fs::create_dir(dir.path().join(component)).unwrap();
            fs::write(dir.path().join(component).join("bower.json"), "{}").unwrap();
        }
        let mut prompter = ScriptedPrompter::new()
            .answer(GITHUB_USER, "alice")
            .answer(INCLUDE_WCT, false);
        let installer = RecordingInstaller::default();

        let status = run_with(dir.path(), "super-element", &mut prompter, &installer).await;

        assert!(status.is_completed());
        assert_eq!(prompter.times_asked(LIVES_DANGEROUSLY), 0);
        assert_eq!(prompter.times_asked(GITHUB_USER), 1);
    }

    #[tokio::test]
    async fn test_declined_confirmation_aborts_without_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("taxes.xls"), "").unwrap();
        let mut prompter = ScriptedPrompter::new()
            .answer(LIVES_DANGEROUSLY, false)
            .answer(GITHUB_USER, "alice")
            .answer(INCLUDE_WCT, true);
        let installer = RecordingInstaller::default();

        let status = run_with(dir.path(), "super-element", &mut prompter, &installer).await;

        assert!(matches!(status, TerminalStatus::AbortedByUser));
        assert_eq!(prompter.times_asked(LIVES_DANGEROUSLY), 1);
        assert_eq!(prompter.times_asked(GITHUB_USER), 0);
        assert!(!dir.path().join("super-element").exists());
        assert!(installer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_accepted_confirmation_proceeds() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("taxes.xls"), "").unwrap();
        let mut prompter = ScriptedPrompter::new()
            .answer(LIVES_DANGEROUSLY, true)
            .answer(GITHUB_USER, "alice")
            .answer(INCLUDE_WCT, false);
        let installer = RecordingInstaller::default();

        let status = run_with(dir.path(), "super-element", &mut prompter, &installer).await;

        assert!(status.is_completed());
        assert_eq!(prompter.times_asked(LIVES_DANGEROUSLY), 1);
        assert_eq!(prompter.warnings.len(), 1);
        assert!(dir.path().join("super-element/super-element.html").is_file());
    }

    #[tokio::test]
    async fn test_validator_error_fails_validate_stage() {
        let dir = tempfile::tempdir().unwrap();
        let mut prompter = ScriptedPrompter::new();
        let mut templates = TemplateFetcher::embedded();
        let installer = RecordingInstaller::default();
        let mut pipeline =
            Pipeline::new(&BrokenValidator, &mut prompter, &mut templates, &installer);

        let status = pipeline.run(RunOptions::new("super-element", dir.path())).await;

        let TerminalStatus::Failed(err) = status else {
            panic!("expected failure, got {status:?}");
        };
        assert_eq!(err.stage, StageName::Validate);
        assert!(files_under(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_missing_answer_fails_configure_stage() {
        let dir = tempfile::tempdir().unwrap();
        let mut prompter = ScriptedPrompter::new().answer(INCLUDE_WCT, true);
        let installer = RecordingInstaller::default();

        let status = run_with(dir.path(), "super-element", &mut prompter, &installer).await;

        assert!(matches!(
            status,
            TerminalStatus::Failed(PipelineError { stage: StageName::Configure, .. })
        ));
        assert!(!dir.path().join("super-element").exists());
    }

    #[tokio::test]
    async fn test_missing_workspace_fails_safety_check_stage() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = dir.path().join("missing");
        let mut prompter = ScriptedPrompter::new();
        let installer = RecordingInstaller::default();

        let status = run_with(&workspace, "super-element", &mut prompter, &installer).await;

        assert!(matches!(
            status,
            TerminalStatus::Failed(PipelineError { stage: StageName::SafetyCheck, .. })
        ));
        assert!(prompter.asked.is_empty());
        assert!(!workspace.exists());
    }

    #[tokio::test]
    async fn test_unreadable_source_fails_render_and_keeps_earlier_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut prompter = ScriptedPrompter::new()
            .answer(GITHUB_USER, "alice")
            .answer(INCLUDE_WCT, false);
        let mut templates = FaultyStore {
            unreadable: Some("README.md"),
            ..FaultyStore::default()
        };
        let installer = RecordingInstaller::default();

        let mut pipeline =
            Pipeline::new(&ElementNameValidator, &mut prompter, &mut templates, &installer);
        let status = pipeline.run(RunOptions::new("super-element", dir.path())).await;

        let TerminalStatus::Failed(err) = status else {
            panic!("expected failure, got {status:?}");
        };
        assert_eq!(err.stage, StageName::Render);
        assert!(format!("{err}").contains("README.md vanished"));

        let written = files_under(&dir.path().join("super-element"));
        let before_readme = expected(&BASE_FILES[..BASE_FILES.len() - 1]);
        assert_eq!(written, before_readme);
        assert!(installer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_unlisted_source_fails_render_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut prompter = ScriptedPrompter::new()
            .answer(GITHUB_USER, "alice")
            .answer(INCLUDE_WCT, true);
        let mut templates = FaultyStore {
            unlisted: Some("test/index.html"),
            ..FaultyStore::default()
        };
        let installer = RecordingInstaller::default();

        let mut pipeline =
            Pipeline::new(&ElementNameValidator, &mut prompter, &mut templates, &installer);
        let status = pipeline.run(RunOptions::new("super-element", dir.path())).await;

        let TerminalStatus::Failed(err) = status else {
            panic!("expected failure, got {status:?}");
        };
        assert_eq!(err.stage, StageName::Render);
        assert!(format!("{err}").contains("test/index.html"));
        assert!(!dir.path().join("super-element").exists());
    }

    #[tokio::test]
    async fn test_installer_failure_still_completes() {
        let dir = tempfile::tempdir().unwrap();
        let mut prompter = ScriptedPrompter::new()
            .answer(GITHUB_USER, "alice")
            .answer(INCLUDE_WCT, false);
        let installer = RecordingInstaller::failing();

        let status = run_with(dir.path(), "super-element", &mut prompter, &installer).await;

        assert!(status.is_completed());
        assert_eq!(installer.calls().len(), 1);
        assert!(prompter.warnings.iter().any(|w| w.contains("bower exploded")));
    }

    #[tokio::test]
    async fn test_install_flags_pass_through() {
        let dir = tempfile::tempdir().unwrap();
        let mut prompter = ScriptedPrompter::new()
            .answer(GITHUB_USER, "alice")
            .answer(INCLUDE_WCT, false);
        let mut templates = TemplateFetcher::embedded();
        let installer = RecordingInstaller::default();
        let flags = InstallOptions {
            skip_install: true,
            skip_message: true,
        };

        let mut pipeline =
            Pipeline::new(&ElementNameValidator, &mut prompter, &mut templates, &installer);
        let status = pipeline
            .run(RunOptions::new("super-element", dir.path()).with_install(flags))
            .await;
        pipeline.wait_for_install().await.unwrap();

        let TerminalStatus::Completed(summary) = status else {
            panic!("expected completion, got {status:?}");
        };
        assert_eq!(summary.install, flags);
        assert_eq!(installer.calls()[0].1, flags);
    }

    #[tokio::test]
    async fn test_rerun_overwrites_and_keeps_stale_files() {
        let dir = tempfile::tempdir().unwrap();
        let installer = RecordingInstaller::default();

        let mut prompter = ScriptedPrompter::new()
            .answer(GITHUB_USER, "alice")
            .answer(INCLUDE_WCT, true);
        assert!(run_with(dir.path(), "super-element", &mut prompter, &installer)
            .await
            .is_completed());

        // The generated project carries a bower.json, so it counts as a component
        let mut prompter = ScriptedPrompter::new()
            .answer(GITHUB_USER, "bob")
            .answer(INCLUDE_WCT, false);
        assert!(run_with(dir.path(), "super-element", &mut prompter, &installer)
            .await
            .is_completed());
        assert_eq!(prompter.times_asked(LIVES_DANGEROUSLY), 0);

        let project = dir.path().join("super-element");
        let bower = fs::read_to_string(project.join("bower.json")).unwrap();
        assert!(bower.contains("bob"));
        assert!(project.join("test/super-element-basic.html").is_file());
    }

    #[tokio::test]
    async fn test_newer_template_warns() {
        let dir = tempfile::tempdir().unwrap();
        let mut prompter = ScriptedPrompter::new()
            .answer(GITHUB_USER, "alice")
            .answer(INCLUDE_WCT, false);
        let mut templates = FixedVersionStore {
            inner: TemplateFetcher::embedded(),
            version: "99.0.0",
        };
        let installer = RecordingInstaller::default();

        let mut pipeline =
            Pipeline::new(&ElementNameValidator, &mut prompter, &mut templates, &installer)
                .with_cli_version("0.1.0", "cargo install seed-element --force");
        let status = pipeline.run(RunOptions::new("super-element", dir.path())).await;
        drop(pipeline);

        assert!(status.is_completed());
        assert!(prompter.warnings.iter().any(|w| w.contains("99.0.0")));
    }
}
