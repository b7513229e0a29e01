//! Build version reporting.

/// Package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Commit hash injected at build time through `VISOR_COMMIT_HASH`.
const COMMIT_HASH: Option<&str> = option_env!("VISOR_COMMIT_HASH");

/// Returns the version string, with the commit hash appended when known.
#[must_use]
pub fn version_string() -> String {
    format_version(VERSION, COMMIT_HASH)
}

fn format_version(version: &str, commit: Option<&str>) -> String {
    match commit.filter(|c| !c.is_empty()) {
        Some(commit) => format!("{version}-{commit}"),
        None => version.to_string(),
    }
}
