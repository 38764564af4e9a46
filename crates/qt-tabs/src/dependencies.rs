// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Presence checks for the executables the init command relies on

use tracing::warn;

/// Names from `names` that are not found on `PATH`, sorted
pub fn find_missing_dependencies<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut missing: Vec<String> = names
        .into_iter()
        .filter(|name| which::which(name.as_ref()).is_err())
        .map(|name| name.as_ref().to_string())
        .collect();
    missing.sort();
    missing
}

/// Warn about missing executables and carry on. Returns what was missing.
pub fn warn_missing_dependencies(names: &[String]) -> Vec<String> {
    let missing = find_missing_dependencies(names);
    if !missing.is_empty() {
        warn!(
            missing = %missing.join(", "),
            "Missing optional dependencies for tmux-quick-tabs"
        );
    }
    missing
}
