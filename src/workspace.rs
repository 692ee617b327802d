//! GOPATH-style workspaces.
//!
//! A workspace is a list of root directories; package `a/b/c` lives at
//! `<root>/src/a/b/c` under the first root that has it.

use crate::error::{VendorError, VendorResult};
use colored::*;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    roots: Vec<PathBuf>,
}

impl Workspace {
    /// Parse a colon-separated root list such as `$GOPATH`.
    pub fn parse(list: &str) -> VendorResult<Self> {
        let roots: Vec<PathBuf> = list
            .split(':')
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();
        if roots.is_empty() {
            return Err(VendorError::Config("missing GOPATH".to_string()));
        }
        Ok(Self { roots })
    }

    pub fn from_env() -> VendorResult<Self> {
        Self::parse(&std::env::var("GOPATH").unwrap_or_default())
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Source directory of `import_path` in the first root that contains it.
    pub fn resolve(&self, import_path: &str) -> VendorResult<PathBuf> {
        for root in &self.roots {
            let dir = root.join("src").join(import_path);
            match fs::metadata(&dir) {
                Ok(meta) if meta.is_dir() => return Ok(dir),
                Ok(_) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => eprintln!("{} {}: {}", "!".yellow(), dir.display(), e),
            }
        }
        Err(VendorError::PackageNotFound(import_path.to_string()))
    }

    /// Import path of `dir`, which must lie strictly inside `<root>/src`.
    pub fn import_path_of(&self, dir: &Path) -> VendorResult<String> {
        self.locate(dir).map(|(_, path)| path).ok_or_else(|| {
            VendorError::Config(format!("{} is not inside any GOPATH entry", dir.display()))
        })
    }

    /// `<root>/src` directory that contains `dir`, if any.
    pub fn src_root_of(&self, dir: &Path) -> Option<PathBuf> {
        self.locate(dir).map(|(src, _)| src)
    }

    fn locate(&self, dir: &Path) -> Option<(PathBuf, String)> {
        for root in &self.roots {
            let src = root.join("src");
            let Ok(rel) = dir.strip_prefix(&src) else {
                continue;
            };
            let parts: Vec<String> = rel
                .components()
                .filter_map(|c| match c {
                    Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
                    _ => None,
                })
                .collect();
            if !parts.is_empty() {
                return Some((src, parts.join("/")));
            }
        }
        None
    }
}
