//! Pure formatting functions for UI output.
//!
//! This module contains all display/formatting logic separated from user interaction.

use console::style;
use semver::Version;

use crate::catalog::Catalog;
use crate::domain::ResolvedRelease;
use crate::skip::SkipReason;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a skip notice to the user.
pub fn display_skip_notice(reason: &SkipReason) {
    eprintln!("{} {}", style("⚠ SKIPPED:").yellow(), reason);
}

/// Display the proposed version change.
///
/// # Arguments
/// * `current` - Version of the running binary
/// * `release` - The release that would be installed
pub fn display_update_available(current: &Version, release: &ResolvedRelease) {
    println!("\n{}", style("Update available:").bold());
    println!("  From: {}", style(current).red());
    println!("  To:   {}", style(&release.display_tag).green());
    println!("  Asset: {}", release.download_url);
}

/// Display that nothing newer is eligible.
pub fn display_up_to_date(current: &Version) {
    display_success(&format!("Already up to date ({})", current));
}

/// Format one catalog line: tag, normalized version, stability and flags
pub fn format_catalog_line(
    tag: &str,
    version: &Version,
    stability: &str,
    flagged: bool,
    assets: usize,
) -> String {
    let mut line = format!("{:<20} {:<16} {:<7}", tag, version.to_string(), stability);
    if flagged {
        line.push_str(" [prerelease]");
    }
    if assets == 0 {
        line.push_str(" [no assets]");
    }
    line
}

/// Display every release of a catalog, newest first, then the skipped tags.
pub fn display_catalog(catalog: &Catalog) {
    println!("{}", style("Published releases:").bold());
    if catalog.is_empty() {
        println!("  (none with a version tag)");
    }
    for release in catalog {
        let line = format_catalog_line(
            &release.raw_tag,
            &release.version,
            &release.stability().to_string(),
            release.is_prerelease,
            release.assets.len(),
        );
        println!("  {}", line);
    }

    for reason in catalog.skipped() {
        display_skip_notice(reason);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_catalog_line_stable() {
        let line = format_catalog_line("v1.2.0", &Version::new(1, 2, 0), "stable", false, 1);
        assert!(line.starts_with("v1.2.0"));
        assert!(line.contains("1.2.0"));
        assert!(!line.contains("[prerelease]"));
        assert!(!line.contains("[no assets]"));
    }

    #[test]
    fn test_format_catalog_line_flags() {
        let line = format_catalog_line("v1.3.0", &Version::new(1, 3, 0), "stable", true, 0);
        assert!(line.contains("[prerelease]"));
        assert!(line.contains("[no assets]"));
    }

    #[test]
    fn test_display_status() {
        // Visual verification test - output is printed to stdout
        display_status("test status");
    }
}
