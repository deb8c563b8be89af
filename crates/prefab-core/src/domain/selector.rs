//! Glob-based file selection shared by the step variants.
//!
//! Every step that operates on files carries a selector built from one or
//! more glob patterns. A step declared without patterns gets the catch-all
//! [`DEFAULT_PATTERN`], which matches any YAML-suffixed path anywhere in the
//! tree — the overwhelmingly common case for config-as-code bundles.

use globset::{Glob, GlobSet, GlobSetBuilder};

use super::error::DomainError;

/// Pattern substituted when a step declares no explicit file patterns.
pub const DEFAULT_PATTERN: &str = "**/*.yaml";

/// Compiled glob selector over workspace/backend paths.
#[derive(Debug, Clone)]
pub struct FileSelector {
    patterns: Vec<String>,
    set: GlobSet,
}

impl FileSelector {
    /// Build a selector from glob patterns.
    ///
    /// An empty list falls back to [`DEFAULT_PATTERN`]. Invalid glob syntax
    /// fails with [`DomainError::InvalidPattern`] naming the bad pattern.
    pub fn new(patterns: Vec<String>) -> Result<Self, DomainError> {
        let patterns = if patterns.is_empty() {
            vec![DEFAULT_PATTERN.to_string()]
        } else {
            patterns
        };

        let mut builder = GlobSetBuilder::new();
        for pattern in &patterns {
            let glob = Glob::new(pattern).map_err(|e| DomainError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
            builder.add(glob);
        }
        let set = builder.build().map_err(|e| DomainError::InvalidPattern {
            pattern: patterns.join(", "),
            reason: e.to_string(),
        })?;

        Ok(Self { patterns, set })
    }

    /// The default YAML catch-all selector.
    pub fn default_yaml() -> Self {
        // DEFAULT_PATTERN is a compile-time constant known to be valid glob syntax.
        Self::new(Vec::new()).expect("default pattern must compile")
    }

    pub fn is_match(&self, path: &str) -> bool {
        self.set.is_match(path)
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selector_matches_yaml_anywhere() {
        let selector = FileSelector::default_yaml();
        assert!(selector.is_match("app.yaml"));
        assert!(selector.is_match("services/payments/app.yaml"));
        assert!(selector.is_match("deep/ly/nested/tree/x.yaml"));
    }

    #[test]
    fn default_selector_rejects_non_yaml() {
        let selector = FileSelector::default_yaml();
        assert!(!selector.is_match("app.yml"));
        assert!(!selector.is_match("app.json"));
        assert!(!selector.is_match("README.md"));
        assert!(!selector.is_match("yaml"));
    }

    #[test]
    fn empty_pattern_list_falls_back_to_default() {
        let selector = FileSelector::new(Vec::new()).unwrap();
        assert_eq!(selector.patterns(), &[DEFAULT_PATTERN.to_string()]);
    }

    #[test]
    fn explicit_patterns_replace_the_default() {
        let selector = FileSelector::new(vec!["services/*.yaml".into()]).unwrap();
        assert!(selector.is_match("services/app.yaml"));
        assert!(!selector.is_match("other/app.yaml"));
        assert!(!selector.is_match("services/nested/app.yaml"));
    }

    #[test]
    fn multiple_patterns_union() {
        let selector =
            FileSelector::new(vec!["*.json".into(), "pipelines/**/*.yaml".into()]).unwrap();
        assert!(selector.is_match("config.json"));
        assert!(selector.is_match("pipelines/ci/build.yaml"));
        assert!(!selector.is_match("config.toml"));
    }

    #[test]
    fn invalid_pattern_is_reported_with_its_text() {
        let err = FileSelector::new(vec!["a{".into()]).unwrap_err();
        assert!(matches!(err, DomainError::InvalidPattern { pattern, .. } if pattern == "a{"));
    }
}
