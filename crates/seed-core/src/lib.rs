//! Seed Core - Shared library for generating custom element projects
//!
//! This library scaffolds a new web component project that follows the
//! seed-element pattern: it validates the element name, warns when the
//! workspace holds data other than components, asks a couple of questions,
//! writes the template files into `<element-name>/` and kicks off
//! `bower install`.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Collaborators** - Name validation, workspace scanning, template
//!   fetching/writing, dependency installation
//! - **Layer 2: Pipeline** - `Pipeline` runs the ordered stages over a single
//!   `PipelineContext` and returns a `TerminalStatus`
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based TUI prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use seed_core::{BowerInstaller, ElementNameValidator, Pipeline, RunOptions, ScriptedPrompter};
//! use seed_core::templates::TemplateFetcher;
//!
//! let validator = ElementNameValidator;
//! let mut prompter = ScriptedPrompter::new().answer("ghUser", "alice").answer("includeWCT", true);
//! let mut templates = TemplateFetcher::embedded();
//! let installer = BowerInstaller::new();
//!
//! let mut pipeline = Pipeline::new(&validator, &mut prompter, &mut templates, &installer);
//! let status = pipeline.run(RunOptions::new("super-element", std::env::current_dir()?)).await;
//! ```

pub mod error;
pub mod pipeline;
pub mod product;
pub mod prompt;
pub mod runtime;
pub mod templates;
pub mod validator;
pub mod workspace;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::PipelineError;
pub use pipeline::{Pipeline, PipelineContext, RunOptions, StageName, Summary, TerminalStatus};
pub use product::GeneratorConfig;
pub use prompt::{Answer, Answers, Prompter, Question, QuestionKind, ScriptedPrompter};
pub use runtime::{BowerInstaller, InstallHandle, InstallOptions, Installer};
pub use validator::{ElementNameValidator, NameValidator, Validation};

#[cfg(feature = "tui")]
pub use tui::run;

/// CLI version - used for template compatibility checking
/// Each binary should define its own version, but this provides a fallback
pub const DEFAULT_CLI_VERSION: &str = "0.1.0";
