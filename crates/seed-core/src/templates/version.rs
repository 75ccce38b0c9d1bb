//! Version comparison for CLI and template compatibility

use semver::Version;

/// Compare CLI version against template version
/// Returns a warning message if the CLI is older than the template expects
pub fn check_compatibility(
    cli_version: &str,
    template_version: &str,
    upgrade_command: &str,
) -> Option<String> {
    // Unparseable versions can't be compared, so no warning
    let cli_ver = parse_version(cli_version)?;
    let template_ver = parse_version(template_version)?;

    (cli_ver < template_ver).then(|| {
        format!(
            "This template was designed for CLI version {} or newer. \
             You are running version {}. Consider updating: {}",
            template_version, cli_version, upgrade_command
        )
    })
}

/// Parse a version string, tolerating a leading `v`
fn parse_version(version_str: &str) -> Option<Version> {
    let cleaned = version_str.strip_prefix('v').unwrap_or(version_str);
    Version::parse(cleaned).ok()
}
