//! Dependency registry.
//!
//! The ordered list of import-path prefixes that are considered vendored.
//! It is read from a flat `dependencies` file (one prefix per line) and always
//! ends with the package currently being vendored, so the package's imports of
//! itself are rewritten too.

use crate::error::{VendorError, VendorResult};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyRegistry {
    prefixes: Vec<String>,
}

impl DependencyRegistry {
    /// Read `list_file` (a missing file counts as empty) and append `current`.
    pub fn load(list_file: &Path, current: &str) -> VendorResult<Self> {
        let mut registry = match fs::read_to_string(list_file) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == ErrorKind::NotFound => Self::default(),
            Err(e) => return Err(VendorError::io_at("read", list_file, e)),
        };
        registry.push(current);
        Ok(registry)
    }

    /// One prefix per line. Blank lines are skipped: an empty prefix would
    /// match every import.
    pub fn parse(content: &str) -> Self {
        Self::from_prefixes(content.lines())
    }

    pub fn from_prefixes<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Self::default();
        for prefix in prefixes {
            registry.push(prefix.as_ref());
        }
        registry
    }

    fn push(&mut self, prefix: &str) {
        let prefix = prefix.trim();
        if !prefix.is_empty() {
            self.prefixes.push(prefix.to_string());
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// First prefix (in registry order) that `path` starts with.
    ///
    /// This is a plain byte prefix test: `exampleorg` matches
    /// `exampleorg-extra/pkg` as well as `exampleorg/pkg`.
    pub fn first_match(&self, path: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .map(String::as_str)
            .find(|prefix| path.starts_with(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_blank_lines() {
        let registry = DependencyRegistry::parse("github.com/a/x\n\n  github.com/b/y  \r\n\n");
        assert_eq!(registry.prefixes(), &["github.com/a/x", "github.com/b/y"]);
    }

    #[test]
    fn test_load_missing_file_yields_current_only() {
        let dir = tempfile::tempdir().unwrap();
        let registry =
            DependencyRegistry::load(&dir.path().join("dependencies"), "github.com/acme/lib").unwrap();
        assert_eq!(registry.prefixes(), &["github.com/acme/lib"]);
    }

    #[test]
    fn test_load_appends_current_last() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("dependencies");
        fs::write(&list, "github.com/acme/base\ngithub.com/acme/lib\n").unwrap();

        let registry = DependencyRegistry::load(&list, "github.com/acme/lib").unwrap();
        // Duplicates are kept; they are harmless.
        assert_eq!(
            registry.prefixes(),
            &["github.com/acme/base", "github.com/acme/lib", "github.com/acme/lib"]
        );
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_load_unreadable_list_is_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a file.
        let result = DependencyRegistry::load(dir.path(), "github.com/acme/lib");
        assert!(matches!(result, Err(VendorError::Io { .. })));
    }

    #[test]
    fn test_first_match_respects_order() {
        let registry = DependencyRegistry::from_prefixes(["github.com/acme", "github.com/acme/lib"]);
        assert_eq!(registry.first_match("github.com/acme/lib/util"), Some("github.com/acme"));
        assert_eq!(registry.first_match("github.com/other/thing"), None);
    }

    #[test]
    fn test_first_match_is_boundary_unaware() {
        let registry = DependencyRegistry::from_prefixes(["exampleorg"]);
        assert_eq!(registry.first_match("exampleorg-extra/pkg"), Some("exampleorg"));
        assert_eq!(registry.first_match("example/pkg"), None);
        assert_eq!(registry.first_match("my/exampleorg/pkg"), None);
    }
}
