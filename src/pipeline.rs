//! The vendoring pipeline.
//!
//! Stages run strictly in order, each depending on the disk state left by the
//! previous one:
//!
//! 1. copy the package into the project (fatal on failure)
//! 2. strip VCS metadata from the copy (fatal on failure)
//! 3. detect the source revision (empty on failure)
//! 4. rewrite imports across the whole project, then re-format
//! 5. commit the vendored directory (reported on failure)
//!
//! Stages 1-3 are controlled by `copy`, stage 4 by `rewrite` and stage 5 by
//! `commit`.

use crate::config::VendorConfig;
use crate::deps;
use crate::error::{VendorError, VendorResult};
use crate::format::SourceFormatter;
use crate::registry::DependencyRegistry;
use crate::rewrite::{self, ImportRewriter, RewriteReport};
use crate::vcs;
use crate::workspace::Workspace;
use colored::*;
use git2::Oid;
use std::path::{Path, PathBuf};

/// A package being vendored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub import_path: String,
    pub source_dir: PathBuf,
    pub dest_dir: PathBuf,
    /// Empty until detected, and when no revision could be determined.
    pub revision: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorOptions {
    pub copy: bool,
    pub rewrite: bool,
    pub commit: bool,
    pub verbose: bool,
}

impl Default for VendorOptions {
    fn default() -> Self {
        Self {
            copy: true,
            rewrite: true,
            commit: true,
            verbose: false,
        }
    }
}

/// Everything the pipeline needs to know about the host project.
#[derive(Debug, Clone)]
pub struct VendorContext {
    pub workspace: Workspace,
    pub project_dir: PathBuf,
    /// Import path of `project_dir`.
    pub project_import: String,
    pub config: VendorConfig,
}

impl VendorContext {
    pub fn new(workspace: Workspace, project_dir: PathBuf, config: VendorConfig) -> VendorResult<Self> {
        let project_import = workspace.import_path_of(&project_dir)?;
        Ok(Self {
            workspace,
            project_dir,
            project_import,
            config,
        })
    }

    /// Import path under which vendored packages live.
    pub fn local_root(&self) -> String {
        match self.config.vendor_import_dir() {
            "" => self.project_import.clone(),
            dir => format!("{}/{}", self.project_import, dir),
        }
    }

    pub fn vendor_dir(&self) -> PathBuf {
        self.project_dir.join(self.config.vendor_import_dir())
    }

    /// Resolve `import_path` in the workspace and work out where it goes.
    pub fn package(&self, import_path: &str) -> VendorResult<Package> {
        let import_path = import_path.trim_end_matches('/');
        validate_import_path(import_path)?;
        let source_dir = self.workspace.resolve(import_path)?;
        let dest_dir = self.vendor_dir().join(rewrite::base_name(import_path));
        Ok(Package {
            import_path: import_path.to_string(),
            source_dir,
            dest_dir,
            revision: String::new(),
        })
    }

    fn dependencies_file(&self) -> PathBuf {
        self.project_dir.join(&self.config.dependencies_file)
    }
}

fn validate_import_path(import_path: &str) -> VendorResult<()> {
    let bad = import_path.is_empty()
        || import_path.starts_with('/')
        || import_path
            .split('/')
            .any(|part| part.is_empty() || part == "." || part == "..");
    if bad {
        return Err(VendorError::Config(format!(
            "invalid import path '{}'",
            import_path
        )));
    }
    Ok(())
}

#[derive(Debug)]
pub struct VendorSummary {
    pub package: Package,
    pub report: Option<RewriteReport>,
    pub commit: Option<Oid>,
}

/// Run the pipeline for `import_path`.
pub fn vendor_package(
    ctx: &VendorContext,
    import_path: &str,
    options: &VendorOptions,
    formatter: &dyn SourceFormatter,
) -> VendorResult<VendorSummary> {
    let mut package = ctx.package(import_path)?;

    println!(
        "{} Vendoring {} into {}",
        "📦".blue(),
        package.import_path.bold(),
        package.dest_dir.display()
    );

    if options.copy {
        println!("   {} Copying {}", "+".green(), package.source_dir.display());
        deps::copy_package(&package.source_dir, &package.dest_dir)?;
        vcs::strip_metadata(&package.dest_dir)?;

        let boundary = ctx.workspace.src_root_of(&package.source_dir);
        package.revision = vcs::detect_revision(&package.source_dir, boundary.as_deref());
        if package.revision.is_empty() {
            println!("   {} No revision detected", "!".yellow());
        } else {
            println!("   {} Revision {}", "✓".green(), package.revision.cyan());
        }
    }

    let mut report = None;
    if options.rewrite {
        let registry = DependencyRegistry::load(&ctx.dependencies_file(), &package.import_path)?;
        let rewriter = ImportRewriter::new(registry, ctx.local_root());
        println!(
            "{} Rewriting imports under {} ({} prefixes)...",
            "⚡".yellow(),
            rewriter.local_root().cyan(),
            rewriter.registry().len()
        );

        let result = rewrite::rewrite_tree(
            &ctx.project_dir,
            &rewriter,
            &ctx.config.source_suffix,
            formatter,
        )?;
        print_report(&ctx.project_dir, &result, options.verbose);
        report = Some(result);
    }

    let mut commit = None;
    if options.commit {
        let message = deps::commit_message(&package.import_path, &package.revision);
        match deps::commit_vendored(&ctx.project_dir, &package.dest_dir, &message) {
            Ok(oid) => {
                println!("{} Committed {} ({})", "✓".green(), message, short_oid(oid));
                commit = Some(oid);
            }
            Err(e) => {
                println!(
                    "{} Commit failed: {}. The vendored tree was left in place.",
                    "!".yellow(),
                    e
                );
            }
        }
    }

    Ok(VendorSummary {
        package,
        report,
        commit,
    })
}

fn print_report(root: &Path, report: &RewriteReport, verbose: bool) {
    if verbose {
        for file in report.files.iter().filter(|f| f.outcome.is_rewritten()) {
            let shown = file.path.strip_prefix(root).unwrap_or(&file.path);
            println!("   {} {}", "~".cyan(), shown.display());
        }
    }

    let line = format!(
        "Rewrote {} of {} files",
        report.rewritten(),
        report.files.len()
    );
    if report.failed() == 0 {
        println!("{} {}", "✓".green(), line);
    } else {
        println!(
            "{} {} ({} failed, left unchanged)",
            "!".yellow(),
            line,
            report.failed()
        );
    }
}

fn short_oid(oid: Oid) -> String {
    oid.to_string().chars().take(8).collect()
}
