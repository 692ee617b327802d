//! Import rewriting for a single Go source file.

use crate::golang::{ParseError, SourceFile};
use crate::registry::DependencyRegistry;
use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Result of rewriting one file.
#[derive(Debug)]
pub enum RewriteOutcome {
    Unchanged,
    Rewritten { imports: usize },
    Failed(RewriteError),
}

impl RewriteOutcome {
    pub fn is_rewritten(&self) -> bool {
        matches!(self, RewriteOutcome::Rewritten { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RewriteOutcome::Failed(_))
    }
}

#[derive(Debug)]
pub enum RewriteError {
    Read(io::Error),
    Parse(ParseError),
    Write(io::Error),
}

impl fmt::Display for RewriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteError::Read(e) => write!(f, "read error: {}", e),
            RewriteError::Parse(e) => write!(f, "parse error: {}", e),
            RewriteError::Write(e) => write!(f, "write error: {}", e),
        }
    }
}

impl std::error::Error for RewriteError {}

/// Rewrites import paths that fall under a registry prefix so they point at
/// the vendored copy under `local_root`.
#[derive(Debug, Clone)]
pub struct ImportRewriter {
    registry: DependencyRegistry,
    local_root: String,
}

impl ImportRewriter {
    pub fn new(registry: DependencyRegistry, local_root: impl Into<String>) -> Self {
        let local_root = local_root.into().trim_end_matches('/').to_string();
        Self {
            registry,
            local_root,
        }
    }

    pub fn registry(&self) -> &DependencyRegistry {
        &self.registry
    }

    pub fn local_root(&self) -> &str {
        &self.local_root
    }

    /// New location for `path`, or `None` when no prefix matches.
    ///
    /// `github.com/acme/lib/util` under prefix `github.com/acme/lib` becomes
    /// `<local_root>/lib/util`.
    pub fn rewrite_path(&self, path: &str) -> Option<String> {
        let prefix = self.registry.first_match(path)?;
        let suffix = &path[prefix.len()..];
        Some(format!("{}/{}{}", self.local_root, base_name(prefix), suffix))
    }

    /// Rewrite the imports of a parsed file in place. Returns the number of
    /// imports changed.
    pub fn rewrite_source(&self, file: &mut SourceFile) -> usize {
        let mut changed = 0;
        for index in 0..file.imports().len() {
            if let Some(new_path) = self.rewrite_path(&file.imports()[index].path) {
                file.set_import_path(index, new_path);
                changed += 1;
            }
        }
        changed
    }

    /// Parse, rewrite and (only if something changed) atomically replace the
    /// file at `path`.
    pub fn rewrite_file(&self, path: &Path) -> RewriteOutcome {
        self.rewrite_file_with(path, write_atomically)
    }

    fn rewrite_file_with<W>(&self, path: &Path, write: W) -> RewriteOutcome
    where
        W: FnOnce(&Path, &[u8]) -> io::Result<()>,
    {
        let src = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => return RewriteOutcome::Failed(RewriteError::Read(e)),
        };
        let mut file = match SourceFile::parse(src) {
            Ok(f) => f,
            Err(e) => return RewriteOutcome::Failed(RewriteError::Parse(e)),
        };

        let imports = self.rewrite_source(&mut file);
        if !file.is_modified() {
            return RewriteOutcome::Unchanged;
        }

        match write(path, file.emit().as_bytes()) {
            Ok(()) => RewriteOutcome::Rewritten { imports },
            Err(e) => RewriteOutcome::Failed(RewriteError::Write(e)),
        }
    }
}

/// Last element of an import path, ignoring trailing slashes.
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.is_empty() { "." } else { "/" };
    }
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

/// Write `contents` to a temporary file next to `path`, then rename it over
/// `path`. On any failure the temporary file is removed and `path` keeps its
/// previous contents.
pub fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path).ok().map(|m| m.permissions());

    let mut tmp = tempfile::Builder::new()
        .prefix(".govend-")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(contents)?;
    tmp.flush()?;
    if let Some(perms) = permissions {
        tmp.as_file().set_permissions(perms)?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
