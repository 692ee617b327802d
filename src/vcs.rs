//! Version-control backends.
//!
//! Vendored packages usually come from a checkout of some VCS. Each backend
//! can tell whether a directory belongs to it and read the checked-out
//! revision; backends are probed in the fixed order of [`Vcs::ALL`].

use crate::error::{VendorError, VendorResult};
use colored::*;
use git2::Repository;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vcs {
    Git,
    Mercurial,
    Bazaar,
}

impl Vcs {
    /// Probe order.
    pub const ALL: [Vcs; 3] = [Vcs::Git, Vcs::Mercurial, Vcs::Bazaar];

    pub fn name(self) -> &'static str {
        match self {
            Vcs::Git => "git",
            Vcs::Mercurial => "hg",
            Vcs::Bazaar => "bzr",
        }
    }

    pub fn metadata_dir(self) -> &'static str {
        match self {
            Vcs::Git => ".git",
            Vcs::Mercurial => ".hg",
            Vcs::Bazaar => ".bzr",
        }
    }

    pub fn detect(self, dir: &Path) -> bool {
        dir.join(self.metadata_dir()).exists()
    }

    /// Revision checked out in `dir`. Git and Mercurial ids are shortened to
    /// 8 characters; Bazaar revision numbers are returned as-is.
    pub fn revision(self, dir: &Path) -> VendorResult<String> {
        match self {
            Vcs::Git => {
                let repo = Repository::open(dir)?;
                let commit = repo.head()?.peel_to_commit()?;
                Ok(short(&commit.id().to_string()))
            }
            Vcs::Mercurial => run_capture("hg", &["id", "-i"], dir).map(|id| short(&id)),
            Vcs::Bazaar => run_capture("bzr", &["revno"], dir),
        }
    }
}

fn short(id: &str) -> String {
    id.chars().take(8).collect()
}

fn run_capture(program: &str, args: &[&str], dir: &Path) -> VendorResult<String> {
    let output = Command::new(program)
        .args(args)
        .current_dir(dir)
        .output()
        .map_err(|e| VendorError::Tool {
            tool: program.to_string(),
            message: e.to_string(),
        })?;
    if !output.status.success() {
        return Err(VendorError::Tool {
            tool: program.to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Nearest checkout containing `dir`: `dir` itself, then its parents up to and
/// including `boundary`. Without a boundary only `dir` is probed.
pub fn find_checkout(dir: &Path, boundary: Option<&Path>) -> Option<(Vcs, PathBuf)> {
    for candidate in dir.ancestors() {
        if let Some(vcs) = Vcs::ALL.into_iter().find(|vcs| vcs.detect(candidate)) {
            return Some((vcs, candidate.to_path_buf()));
        }
        match boundary {
            Some(b) if candidate != b && candidate.starts_with(b) => continue,
            _ => break,
        }
    }
    None
}

/// Revision of the checkout containing `dir`, or an empty string when there
/// is none or it cannot be read.
pub fn detect_revision(dir: &Path, boundary: Option<&Path>) -> String {
    let Some((vcs, checkout)) = find_checkout(dir, boundary) else {
        return String::new();
    };
    match vcs.revision(&checkout) {
        Ok(rev) => rev,
        Err(e) => {
            eprintln!(
                "{} Could not read {} revision of {}: {}",
                "!".yellow(),
                vcs.name(),
                checkout.display(),
                e
            );
            String::new()
        }
    }
}

/// Remove every known VCS metadata directory directly under `dir`.
pub fn strip_metadata(dir: &Path) -> VendorResult<()> {
    for vcs in Vcs::ALL {
        let meta = dir.join(vcs.metadata_dir());
        if meta.is_dir() {
            fs::remove_dir_all(&meta).map_err(|e| VendorError::io_at("remove", &meta, e))?;
        } else if meta.exists() {
            // Git worktrees and submodules use a `.git` file.
            fs::remove_file(&meta).map_err(|e| VendorError::io_at("remove", &meta, e))?;
        }
    }
    Ok(())
}
