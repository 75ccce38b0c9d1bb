//! Charm-style CLI prompts using cliclack

use crate::pipeline::{Pipeline, RunOptions, Summary, TerminalStatus, GITHUB_USER, INCLUDE_WCT};
use crate::product::GeneratorConfig;
use crate::prompt::{Answer, Answers, Prompter, Question, QuestionKind};
use crate::runtime::{BowerInstaller, InstallOptions};
use crate::templates::{TemplateFetcher, TemplateSource};
use crate::validator::ElementNameValidator;
use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// CLI arguments for generating an element
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Tag name of the element and directory to generate
    pub element_name: String,

    /// Don't install bower dependencies
    pub skip_install: bool,

    /// Don't show the install commands
    pub skip_install_message: bool,

    /// Local directory to use for templates instead of the built-in ones
    pub template_dir: Option<PathBuf>,

    /// GitHub username (skips the prompt)
    pub github_user: Option<String>,

    /// Whether to include web-component-tester (skips the prompt)
    pub include_wct: Option<bool>,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

impl CreateArgs {
    fn preset_answers(&self) -> Answers {
        let mut answers = Answers::new();
        if let Some(user) = &self.github_user {
            answers.insert(GITHUB_USER, user.clone());
        }
        if let Some(include) = self.include_wct {
            answers.insert(INCLUDE_WCT, include);
        }
        answers
    }
}

/// Prompter backed by cliclack
///
/// Questions with a preset answer are not asked. With `yes`, confirmations
/// resolve to true and text inputs to their default (or empty).
pub struct CliclackPrompter {
    preset: Answers,
    yes: bool,
}

impl CliclackPrompter {
    pub fn new(preset: Answers, yes: bool) -> Self {
        Self { preset, yes }
    }

    fn ask_one(&self, question: &Question) -> Result<Answer> {
        if let Some(answer) = self.preset.get(question.key) {
            return Ok(answer.clone());
        }

        match question.kind {
            QuestionKind::Confirm => {
                let initial = matches!(question.default, Some(Answer::Bool(true)));
                if self.yes {
                    return Ok(Answer::Bool(true));
                }
                let confirmed: bool = cliclack::confirm(question.message)
                    .initial_value(initial)
                    .interact()?;
                Ok(Answer::Bool(confirmed))
            }
            QuestionKind::Input => {
                let default = match &question.default {
                    Some(Answer::Text(text)) => text.clone(),
                    _ => String::new(),
                };
                if self.yes {
                    return Ok(Answer::Text(default));
                }
                let mut input = cliclack::input(question.message).required(false);
                if !default.is_empty() {
                    input = input.default_input(&default);
                }
                let value: String = input.interact()?;
                Ok(Answer::Text(value))
            }
        }
    }
}

#[async_trait]
impl Prompter for CliclackPrompter {
    async fn ask(&mut self, questions: &[Question]) -> Result<Answers> {
        let mut answers = Answers::new();
        for question in questions {
            answers.insert(question.key, self.ask_one(question)?);
        }
        Ok(answers)
    }

    fn warn(&mut self, message: &str) -> Result<()> {
        cliclack::log::warning(message)?;
        Ok(())
    }

    fn error(&mut self, message: &str) -> Result<()> {
        cliclack::log::error(message)?;
        Ok(())
    }

    fn note(&mut self, message: &str) -> Result<()> {
        cliclack::log::remark(message)?;
        Ok(())
    }
}

/// Run the generator with interactive prompts
pub async fn run<C: GeneratorConfig>(
    config: &C,
    args: CreateArgs,
    cli_version: &str,
) -> Result<TerminalStatus> {
    cliclack::intro(config.display_name())?;

    let workspace = std::env::current_dir()?;
    let mut templates = setup_fetcher(config, args.template_dir.clone())?;
    let mut prompter = CliclackPrompter::new(args.preset_answers(), args.yes);
    let installer = BowerInstaller::new();
    let validator = ElementNameValidator;

    let install = InstallOptions {
        skip_install: args.skip_install,
        skip_message: args.skip_install_message,
    };
    let options = RunOptions::new(args.element_name.clone(), workspace).with_install(install);

    let mut pipeline = Pipeline::new(&validator, &mut prompter, &mut templates, &installer)
        .with_cli_version(cli_version, config.upgrade_command())
        .with_greeting(config.greeting());
    let status = pipeline.run(options).await;
    let pending_install = pipeline.take_install();
    drop(pipeline);

    match &status {
        TerminalStatus::Completed(summary) => {
            cliclack::log::success(format!(
                "Created {} files in {}",
                summary.files.len(),
                summary.project_dir.display()
            ))?;

            if let Some(handle) = pending_install {
                if let Err(e) = handle.wait().await {
                    cliclack::log::warning(format!("{:#}", e))?;
                }
            }

            print_next_steps(config, summary)?;
        }
        TerminalStatus::AbortedByValidation => {
            cliclack::outro_cancel("Invalid element name, nothing was generated.")?;
        }
        TerminalStatus::AbortedByUser => {
            cliclack::outro_cancel("Setup cancelled.")?;
        }
        TerminalStatus::Failed(err) => {
            cliclack::log::error(err.to_string())?;
            cliclack::outro_cancel("Generation failed.")?;
        }
    }

    Ok(status)
}

fn setup_fetcher<C: GeneratorConfig>(
    config: &C,
    template_dir: Option<PathBuf>,
) -> Result<TemplateFetcher> {
    let source = TemplateSource::from_config(config, template_dir)?;
    match &source {
        TemplateSource::Local(path) => {
            cliclack::log::info(format!("Using local templates from {}", path.display()))?;
        }
        TemplateSource::Remote(url) => {
            cliclack::log::info(format!("Using remote templates from {}", url))?;
        }
        TemplateSource::Embedded => {}
    }

    Ok(TemplateFetcher::new(source, config.user_agent()))
}

fn print_next_steps<C: GeneratorConfig>(config: &C, summary: &Summary) -> Result<()> {
    let steps = config.next_steps(
        &summary.project_dir,
        summary.include_tests,
        summary.install.skip_install,
    );

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy hacking!")?;

    Ok(())
}
