//! Offline cache preflight check.

use super::CheckResult;
use crate::utils::fs::ensure_writable;
use std::path::Path;

/// Check the cache file's directory is writable.
pub fn check(path: &Path) -> CheckResult {
    match ensure_writable(path) {
        Ok(()) => CheckResult::ok("Offline cache", &path.display().to_string()),
        Err(e) => CheckResult::fail(
            "Offline cache",
            &format!("{} is not writable: {}", path.display(), e),
            "Set [cache].path in config.toml or pass --offline-cache",
        ),
    }
}
