//! Tree-wide import rewriting.

use super::file::{ImportRewriter, RewriteError, RewriteOutcome};
use crate::error::VendorResult;
use crate::format::SourceFormatter;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: RewriteOutcome,
}

#[derive(Debug, Default)]
pub struct RewriteReport {
    /// One entry per visited source file (and per walk error), sorted by path.
    pub files: Vec<FileReport>,
    /// Whether the formatter ran.
    pub formatted: bool,
}

impl RewriteReport {
    pub fn rewritten(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_rewritten()).count()
    }

    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| f.outcome.is_failed()).count()
    }

    pub fn unchanged(&self) -> usize {
        self.files.len() - self.rewritten() - self.failed()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &RewriteError)> {
        self.files.iter().filter_map(|f| match &f.outcome {
            RewriteOutcome::Failed(e) => Some((f.path.as_path(), e)),
            _ => None,
        })
    }
}

/// Rewrite every file under `root` whose name ends in `suffix`.
///
/// A failure on one file is reported and recorded, never fatal. If any file
/// was rewritten, `formatter` runs over the whole tree afterwards; only a
/// formatter failure is returned as an error.
pub fn rewrite_tree(
    root: &Path,
    rewriter: &ImportRewriter,
    suffix: &str,
    formatter: &dyn SourceFormatter,
) -> VendorResult<RewriteReport> {
    let (files, mut reports) = collect_sources(root, suffix);

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    for report in &reports {
        if let RewriteOutcome::Failed(e) = &report.outcome {
            pb.suspend(|| warn_failure(&report.path, e));
        }
    }

    let visited: Vec<FileReport> = files
        .into_par_iter()
        .map(|path| {
            let outcome = rewriter.rewrite_file(&path);
            if let RewriteOutcome::Failed(e) = &outcome {
                pb.suspend(|| warn_failure(&path, e));
            }
            pb.inc(1);
            FileReport { path, outcome }
        })
        .collect();

    pb.finish_and_clear();

    reports.extend(visited);
    reports.sort_by(|a, b| a.path.cmp(&b.path));

    let mut report = RewriteReport {
        files: reports,
        formatted: false,
    };

    if report.rewritten() > 0 {
        formatter.format_tree(root)?;
        report.formatted = true;
    }

    Ok(report)
}

/// Source files under `root`, plus a failed report for every entry the walk
/// could not read. Hidden directories (`.git`, `.hg`, ...) are skipped.
fn collect_sources(root: &Path, suffix: &str) -> (Vec<PathBuf>, Vec<FileReport>) {
    let mut files = Vec::new();
    let mut errors = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden_dir(e));

    for entry in walker {
        match entry {
            Ok(entry) => {
                if entry.file_type().is_file()
                    && entry.file_name().to_string_lossy().ends_with(suffix)
                {
                    files.push(entry.into_path());
                }
            }
            Err(e) => {
                let path = e.path().unwrap_or(root).to_path_buf();
                errors.push(FileReport {
                    path,
                    outcome: RewriteOutcome::Failed(RewriteError::Read(io::Error::from(e))),
                });
            }
        }
    }

    (files, errors)
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir() && entry.file_name().to_string_lossy().starts_with('.')
}

fn warn_failure(path: &Path, err: &RewriteError) {
    eprintln!("{} {}: {}", "x".red(), path.display(), err);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VendorError;
    use crate::registry::DependencyRegistry;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFormatter(AtomicUsize);

    impl SourceFormatter for CountingFormatter {
        fn format_tree(&self, _root: &Path) -> VendorResult<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct FailingFormatter;

    impl SourceFormatter for FailingFormatter {
        fn format_tree(&self, _root: &Path) -> VendorResult<()> {
            Err(VendorError::Tool {
                tool: "gofmt".to_string(),
                message: "boom".to_string(),
            })
        }
    }

    fn rewriter() -> ImportRewriter {
        ImportRewriter::new(
            DependencyRegistry::from_prefixes(["github.com/acme/lib"]),
            "myproj",
        )
    }

    fn write(root: &Path, rel: &str, content: &str) -> PathBuf {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_failure_does_not_stop_walk() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        let good = write(root, "a/good.go", "package a\nimport \"github.com/acme/lib/x\"\n");
        let broken_src = "package b\nimport \"github.com/acme/lib\"\nfunc f() {\n";
        let broken = write(root, "b/broken.go", broken_src);
        let plain = write(root, "c/plain.go", "package c\nimport \"fmt\"\n");
        write(root, "c/notes.txt", "import \"github.com/acme/lib\"\n");

        let formatter = CountingFormatter(AtomicUsize::new(0));
        let report = rewrite_tree(root, &rewriter(), ".go", &formatter).unwrap();

        assert_eq!(report.files.len(), 3);
        assert_eq!(report.rewritten(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.unchanged(), 1);
        assert!(report.formatted);
        assert_eq!(formatter.0.load(Ordering::SeqCst), 1);

        assert!(fs::read_to_string(&good).unwrap().contains("\"myproj/lib/x\""));
        assert_eq!(fs::read_to_string(&broken).unwrap(), broken_src);
        assert_eq!(fs::read_to_string(&plain).unwrap(), "package c\nimport \"fmt\"\n");

        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, broken.as_path());
    }

    #[test]
    fn test_formatter_skipped_when_nothing_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "main.go", "package main\nimport \"fmt\"\n");

        let formatter = CountingFormatter(AtomicUsize::new(0));
        let report = rewrite_tree(dir.path(), &rewriter(), ".go", &formatter).unwrap();

        assert_eq!(report.unchanged(), 1);
        assert!(!report.formatted);
        assert_eq!(formatter.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_formatter_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "main.go", "package main\nimport \"github.com/acme/lib\"\n");

        let result = rewrite_tree(dir.path(), &rewriter(), ".go", &FailingFormatter);
        assert!(result.is_err());
    }

    #[test]
    fn test_hidden_directories_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let hidden = write(dir.path(), ".git/hooks/x.go", "package x\nimport \"github.com/acme/lib\"\n");

        let report = rewrite_tree(dir.path(), &rewriter(), ".go", &CountingFormatter(AtomicUsize::new(0)))
            .unwrap();

        assert!(report.files.is_empty());
        assert!(fs::read_to_string(&hidden).unwrap().contains("github.com/acme/lib"));
    }

    #[test]
    fn test_report_sorted_by_path() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "z.go", "package z\n");
        write(dir.path(), "a.go", "package a\n");
        write(dir.path(), "m/m.go", "package m\n");

        let report = rewrite_tree(dir.path(), &rewriter(), ".go", &CountingFormatter(AtomicUsize::new(0)))
            .unwrap();
        let names: Vec<_> = report
            .files
            .iter()
            .map(|f| f.path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            names,
            vec![PathBuf::from("a.go"), PathBuf::from("m/m.go"), PathBuf::from("z.go")]
        );
    }
}
