//! Compile and output configuration
//!
//! Defaults can be overridden from the environment:
//!
//! - `OPTGEN_MAX_ERRORS`: diagnostics rendered before the summary line
//! - `OPTGEN_POSITIONS`: `1` or `true` to print `Src=<...>` positions
//!
//! Command-line flags take precedence over both.

use crate::diagnostics::DEFAULT_MAX_ERRORS;
use crate::printer::FormatOptions;
use serde::Serialize;

pub const MAX_ERRORS_VAR: &str = "OPTGEN_MAX_ERRORS";
pub const POSITIONS_VAR: &str = "OPTGEN_POSITIONS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompileConfig {
    /// Number of diagnostics rendered in full
    pub max_errors: usize,
    /// Include source positions in canonical output
    pub positions: bool,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            max_errors: DEFAULT_MAX_ERRORS,
            positions: false,
        }
    }
}

impl CompileConfig {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`. Unparsable values are
    /// ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            max_errors: lookup(MAX_ERRORS_VAR)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.max_errors),
            positions: lookup(POSITIONS_VAR)
                .map(|s| s == "true" || s == "1")
                .unwrap_or(defaults.positions),
        }
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            positions: self.positions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = CompileConfig::from_lookup(lookup(&[]));
        assert_eq!(config, CompileConfig::default());
        assert_eq!(config.max_errors, 2);
        assert!(!config.positions);
    }

    #[test]
    fn test_overrides() {
        let config = CompileConfig::from_lookup(lookup(&[
            (MAX_ERRORS_VAR, "10"),
            (POSITIONS_VAR, "true"),
        ]));
        assert_eq!(config.max_errors, 10);
        assert!(config.format_options().positions);
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let config = CompileConfig::from_lookup(lookup(&[
            (MAX_ERRORS_VAR, "many"),
            (POSITIONS_VAR, "yes please"),
        ]));
        assert_eq!(config, CompileConfig::default());
    }
}
