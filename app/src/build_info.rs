//! Build metadata shown on the About screen.
//!
//! Values are fixed at compile time by `build.rs`.

use serde::Serialize;

/// Placeholder for metadata that could not be determined.
pub const UNKNOWN: &str = "N/A";

/// Application name, version and source revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    /// Display name.
    pub app_name: &'static str,
    /// Package version.
    pub version: &'static str,
    /// Full commit hash, or [`UNKNOWN`].
    pub commit_hash: &'static str,
    /// Commit date (`YYYY-MM-DD`), or [`UNKNOWN`].
    pub build_date: &'static str,
}

impl BuildInfo {
    /// Metadata of the running binary.
    #[must_use]
    pub const fn current() -> Self {
        Self {
            app_name: "EcoLesson",
            version: env!("CARGO_PKG_VERSION"),
            commit_hash: match option_env!("ECOLESSON_COMMIT_HASH") {
                Some(hash) => hash,
                None => UNKNOWN,
            },
            build_date: match option_env!("ECOLESSON_BUILD_DATE") {
                Some(date) => date,
                None => UNKNOWN,
            },
        }
    }

    /// First seven characters of the commit hash.
    ///
    /// Hashes shorter than that are returned whole; an empty hash becomes
    /// [`UNKNOWN`].
    #[must_use]
    pub fn short_hash(&self) -> &'static str {
        let hash = self.commit_hash;
        if hash.is_empty() {
            return UNKNOWN;
        }
        hash.get(..7).unwrap_or(hash)
    }
}
