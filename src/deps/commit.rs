//! Committing a vendored package to the host project's git repository.

use crate::error::{VendorError, VendorResult};
use git2::{Index, IndexAddOption, Oid, Repository};
use std::path::Path;

pub fn commit_message(import_path: &str, revision: &str) -> String {
    if revision.is_empty() {
        format!("Vendor {}", import_path)
    } else {
        format!("Vendor {} revision {}", import_path, revision)
    }
}

/// Stage every change under `dest` (additions, edits and deletions) in the
/// repository containing `project_dir`, and commit it on `HEAD`.
///
/// The commit holds `HEAD`'s tree with only the `dest` subtree replaced, so
/// anything else already staged stays staged and out of the commit.
pub fn commit_vendored(project_dir: &Path, dest: &Path, message: &str) -> VendorResult<Oid> {
    let repo = Repository::discover(project_dir)?;
    let workdir = repo
        .workdir()
        .ok_or_else(|| VendorError::Config("repository has no working directory".to_string()))?;

    let workdir = workdir
        .canonicalize()
        .map_err(|e| VendorError::io_at("resolve", workdir, e))?;
    let dest_abs = dest
        .canonicalize()
        .map_err(|e| VendorError::io_at("resolve", dest, e))?;
    let rel = dest_abs.strip_prefix(&workdir).map_err(|_| {
        VendorError::Config(format!(
            "{} is outside the repository at {}",
            dest.display(),
            workdir.display()
        ))
    })?;
    let prefix = rel.to_string_lossy().replace('\\', "/");
    let pathspec = if prefix.is_empty() { "." } else { prefix.as_str() };

    let mut index = repo.index()?;
    index.add_all([pathspec], IndexAddOption::DEFAULT, None)?;
    index.update_all([pathspec], None)?;
    index.write()?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit()?),
        Err(_) => None,
    };

    let mut staged = Index::new()?;
    if let Some(parent) = &parent {
        staged.read_tree(&parent.tree()?)?;
    }
    if prefix.is_empty() {
        staged.clear()?;
    } else {
        staged.remove_dir(rel, 0)?;
    }
    for entry in index.iter().filter(|e| under(&e.path, prefix.as_bytes())) {
        staged.add(&entry)?;
    }
    let tree = repo.find_tree(staged.write_tree_to(&repo)?)?;

    if let Some(parent) = &parent
        && parent.tree_id() == tree.id()
    {
        return Err(VendorError::Tool {
            tool: "git".to_string(),
            message: "nothing to commit".to_string(),
        });
    }

    let sig = repo.signature()?;
    let parents: Vec<&git2::Commit> = parent.iter().collect();
    Ok(repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?)
}

// Index path inside the `prefix` directory; an empty prefix is the whole tree.
fn under(path: &[u8], prefix: &[u8]) -> bool {
    prefix.is_empty()
        || path.strip_prefix(prefix).is_some_and(|rest| rest.is_empty() || rest[0] == b'/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn init_repo(dir: &Path) -> Repository {
        let repo = Repository::init(dir).unwrap();
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "Test").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
        repo
    }

    #[test]
    fn test_commit_message() {
        assert_eq!(
            commit_message("github.com/acme/lib", "1a2b3c4d"),
            "Vendor github.com/acme/lib revision 1a2b3c4d"
        );
        assert_eq!(commit_message("github.com/acme/lib", ""), "Vendor github.com/acme/lib");
    }

    #[test]
    fn test_commit_stages_only_dest() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = init_repo(tmp.path());
        fs::create_dir_all(tmp.path().join("lib/sub")).unwrap();
        fs::write(tmp.path().join("lib/lib.go"), "package lib\n").unwrap();
        fs::write(tmp.path().join("lib/sub/x.go"), "package sub\n").unwrap();
        fs::write(tmp.path().join("main.go"), "package main\n").unwrap();

        let oid = commit_vendored(tmp.path(), &tmp.path().join("lib"), "Vendor lib").unwrap();

        let commit = repo.find_commit(oid).unwrap();
        assert_eq!(commit.message(), Some("Vendor lib"));
        let tree = commit.tree().unwrap();
        assert!(tree.get_path(Path::new("lib/lib.go")).is_ok());
        assert!(tree.get_path(Path::new("lib/sub/x.go")).is_ok());
        assert!(tree.get_path(Path::new("main.go")).is_err());
    }

    #[test]
    fn test_commit_records_deletions_and_parent() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = init_repo(tmp.path());
        fs::create_dir_all(tmp.path().join("lib")).unwrap();
        fs::write(tmp.path().join("lib/old.go"), "package lib\n").unwrap();
        let first = commit_vendored(tmp.path(), &tmp.path().join("lib"), "one").unwrap();

        fs::remove_file(tmp.path().join("lib/old.go")).unwrap();
        fs::write(tmp.path().join("lib/new.go"), "package lib\n").unwrap();
        let second = commit_vendored(tmp.path(), &tmp.path().join("lib"), "two").unwrap();

        let commit = repo.find_commit(second).unwrap();
        assert_eq!(commit.parent_id(0).unwrap(), first);
        let tree = commit.tree().unwrap();
        assert!(tree.get_path(Path::new("lib/new.go")).is_ok());
        assert!(tree.get_path(Path::new("lib/old.go")).is_err());
    }

    #[test]
    fn test_commit_without_changes_fails() {
        let tmp = tempfile::tempdir().unwrap();
        init_repo(tmp.path());
        fs::create_dir_all(tmp.path().join("lib")).unwrap();
        fs::write(tmp.path().join("lib/a.go"), "package lib\n").unwrap();
        commit_vendored(tmp.path(), &tmp.path().join("lib"), "one").unwrap();

        let again = commit_vendored(tmp.path(), &tmp.path().join("lib"), "two");
        assert!(matches!(again, Err(VendorError::Tool { .. })));
    }

    #[test]
    fn test_commit_missing_dest_fails() {
        let tmp = tempfile::tempdir().unwrap();
        init_repo(tmp.path());
        let result = commit_vendored(tmp.path(), &tmp.path().join("missing"), "x");
        assert!(matches!(result, Err(VendorError::Io { .. })));
    }

    #[test]
    fn test_commit_leaves_unrelated_staged_changes_out() {
        let tmp = tempfile::tempdir().unwrap();
        let repo = init_repo(tmp.path());
        fs::write(tmp.path().join("main.go"), "package main\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("main.go")).unwrap();
        index.write().unwrap();
        let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
        let sig = repo.signature().unwrap();
        repo.commit(Some("HEAD"), &sig, &sig, "init", &tree, &[]).unwrap();

        fs::write(tmp.path().join("main.go"), "package main\n// wip\n").unwrap();
        let mut index = repo.index().unwrap();
        index.add_path(Path::new("main.go")).unwrap();
        index.write().unwrap();
        fs::create_dir_all(tmp.path().join("lib")).unwrap();
        fs::write(tmp.path().join("lib/b.go"), "package lib\n").unwrap();

        let oid = commit_vendored(tmp.path(), &tmp.path().join("lib"), "Vendor lib").unwrap();

        let tree = repo.find_commit(oid).unwrap().tree().unwrap();
        assert!(tree.get_path(Path::new("lib/b.go")).is_ok());
        let main = tree.get_path(Path::new("main.go")).unwrap();
        let blob = repo.find_blob(main.id()).unwrap();
        assert_eq!(blob.content(), b"package main\n");

        // The edit is still staged for the user's own commit.
        let index = repo.index().unwrap();
        let staged = index.get_path(Path::new("main.go"), 0).unwrap();
        assert_ne!(staged.id, main.id());
    }

    #[test]
    fn test_under_prefix() {
        assert!(under(b"lib/a.go", b"lib"));
        assert!(under(b"lib", b"lib"));
        assert!(!under(b"libx/a.go", b"lib"));
        assert!(!under(b"main.go", b"lib"));
        assert!(under(b"main.go", b""));
    }
}
