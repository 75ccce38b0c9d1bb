//! seed-element - Generate custom elements that follow the seed-element pattern

use anyhow::Result;
use clap::Parser;
use seed_core::tui::CreateArgs;
use seed_core::GeneratorConfig;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// CLI version
pub const CLI_VERSION: &str = env!("CARGO_PKG_VERSION");

/// seed-element product configuration
#[derive(Clone)]
pub struct SeedElementConfig;

impl GeneratorConfig for SeedElementConfig {
    fn name(&self) -> &'static str {
        "seed-element"
    }

    fn display_name(&self) -> &'static str {
        "Seed Element"
    }

    fn template_url_env(&self) -> &'static str {
        "SEED_ELEMENT_TEMPLATE_URL"
    }

    fn greeting(&self) -> &'static str {
        "Out of the box I follow the seed-element pattern."
    }

    fn upgrade_command(&self) -> &'static str {
        "cargo install seed-element --force"
    }

    fn next_steps(&self, dir: &Path, include_tests: bool, skip_install: bool) -> Vec<String> {
        let mut steps = vec![format!("cd {}", dir.display())];

        if skip_install {
            steps.push("bower install".to_string());
        }

        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        steps.push(format!(
            "polyserve, then open /components/{}/demo/ in your browser",
            name
        ));

        if include_tests {
            steps.push("wct".to_string());
        }

        steps
    }
}

#[derive(Parser, Debug)]
#[command(name = "seed-element")]
#[command(about = "Generate a Polymer element that follows the seed-element pattern")]
#[command(version)]
pub struct Args {
    /// Tag name of the element and directory to generate
    #[arg(value_name = "ELEMENT_NAME")]
    pub element_name: String,

    /// Whether bower dependencies should be installed
    #[arg(long = "skip-install")]
    pub skip_install: bool,

    /// Whether commands run should be shown
    #[arg(long = "skip-install-message")]
    pub skip_install_message: bool,

    /// Local directory to use for templates instead of the built-in ones (for development use)
    #[arg(long = "template-dir")]
    pub template_dir: Option<PathBuf>,

    /// GitHub username used in the generated files
    #[arg(long = "github-user")]
    pub github_user: Option<String>,

    /// Include a web-component-tester scaffold
    #[arg(long = "include-wct")]
    pub include_wct: Option<bool>,

    /// Auto-confirm all prompts (non-interactive mode)
    #[arg(short, long)]
    pub yes: bool,

    /// Show debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl From<Args> for CreateArgs {
    fn from(args: Args) -> Self {
        CreateArgs {
            element_name: args.element_name,
            skip_install: args.skip_install,
            skip_install_message: args.skip_install_message,
            template_dir: args.template_dir,
            github_user: args.github_user,
            include_wct: args.include_wct,
            yes: args.yes,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "seed_core=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    // Handle Ctrl+C gracefully
    ctrlc::set_handler(move || {
        let _ = console::Term::stderr().show_cursor();
        std::process::exit(130);
    })
    .ok();

    let args = Args::parse();
    init_tracing(args.verbose);

    let config = SeedElementConfig;
    let result = seed_core::run(&config, args.into(), CLI_VERSION).await;

    // Ensure cursor is visible on normal exit
    let _ = console::Term::stderr().show_cursor();

    let status = result?;
    tracing::debug!(exit_code = status.exit_code(), "generator finished");
    Ok(ExitCode::from(status.exit_code()))
}
