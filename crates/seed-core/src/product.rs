//! Product configuration trait for CLI binaries
//!
//! The binary implements this trait to tell the shared scaffolding code who
//! it is, where remote templates live and what to print once a project exists.

use std::path::Path;

/// Configuration trait for the generator front-end
///
/// Implementations define:
/// - Product identity (name, display name)
/// - Template source override
/// - Greeting shown before the configuration questions
/// - Post-generation instructions
pub trait GeneratorConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for CLI command, env vars)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Environment variable name that points at a remote template archive
    fn template_url_env(&self) -> &'static str;

    /// Message shown before asking for the project configuration
    fn greeting(&self) -> &'static str;

    /// Upgrade/install command shown in version warnings
    fn upgrade_command(&self) -> &'static str;

    /// Generate the "next steps" instructions after project creation
    fn next_steps(&self, dir: &Path, include_tests: bool, skip_install: bool) -> Vec<String>;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
