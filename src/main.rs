//! # govend CLI Entry Point
//!
//! Parses arguments, reads the ambient context (GOPATH, working directory,
//! `govend.toml`) and hands it to the pipeline.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use colored::*;

use govend::config::VendorConfig;
use govend::format::CommandFormatter;
use govend::pipeline::{self, VendorContext, VendorOptions};
use govend::workspace::Workspace;

#[derive(Parser)]
#[command(name = "govend")]
#[command(about = "Vendor a Go package and rewrite its imports", version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
struct Cli {
    /// Import path of the package to vendor
    package: Option<String>,

    /// Copy the package, strip VCS metadata and detect its revision
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, value_name = "BOOL")]
    copy: bool,

    /// Rewrite import paths across the project, then re-format
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, value_name = "BOOL")]
    rewrite: bool,

    /// Commit the vendored package
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set, value_name = "BOOL")]
    commit: bool,

    /// List every rewritten file
    #[arg(short, long)]
    verbose: bool,

    /// Print a shell completion script and exit
    #[arg(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        generate(shell, &mut Cli::command(), "govend", &mut std::io::stdout());
        return Ok(());
    }

    let Some(package) = cli.package.as_deref() else {
        eprintln!("{}", Cli::command().render_usage());
        std::process::exit(1);
    };

    let workspace = Workspace::from_env()?;
    let project_dir = std::env::current_dir().context("Failed to read current directory")?;
    let config = VendorConfig::load(&project_dir)?;
    let ctx = match VendorContext::new(workspace.clone(), project_dir.clone(), config.clone()) {
        Ok(ctx) => ctx,
        // GOPATH may name the directory through a symlink.
        Err(e) => match project_dir.canonicalize() {
            Ok(real) if real != project_dir => VendorContext::new(workspace, real, config)?,
            _ => return Err(e.into()),
        },
    };

    let formatter = CommandFormatter::from_command(&ctx.config.format_command)
        .context("format_command must not be empty")?;
    let options = VendorOptions {
        copy: cli.copy,
        rewrite: cli.rewrite,
        commit: cli.commit,
        verbose: cli.verbose,
    };

    let summary = pipeline::vendor_package(&ctx, package, &options, &formatter)?;

    if let Some(report) = &summary.report
        && report.failed() > 0
    {
        println!(
            "{} {} file(s) could not be rewritten; see messages above.",
            "!".yellow(),
            report.failed()
        );
    }
    println!("{} Done.", "✓".green());
    Ok(())
}
