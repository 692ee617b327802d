//! Source re-formatting after a rewrite.
//!
//! Rewriting only swaps import literals, but a changed path can break the
//! column alignment of trailing comments in an import group, so the whole tree
//! is run through the formatter (`gofmt -l -w <root>` by default).

use crate::error::{VendorError, VendorResult};
use std::path::Path;
use std::process::Command;

pub trait SourceFormatter: Sync {
    fn format_tree(&self, root: &Path) -> VendorResult<()>;
}

/// Runs an external formatter with the tree root appended to its arguments.
#[derive(Debug, Clone)]
pub struct CommandFormatter {
    program: String,
    args: Vec<String>,
}

impl CommandFormatter {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Build from a `[program, args...]` list; `None` if the list is empty.
    pub fn from_command(command: &[String]) -> Option<Self> {
        let (program, args) = command.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl SourceFormatter for CommandFormatter {
    fn format_tree(&self, root: &Path) -> VendorResult<()> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(root)
            .output()
            .map_err(|e| VendorError::Tool {
                tool: self.program.clone(),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VendorError::Tool {
                tool: self.program.clone(),
                message: if stderr.trim().is_empty() {
                    format!("exited with {}", output.status)
                } else {
                    stderr.trim().to_string()
                },
            });
        }
        Ok(())
    }
}

/// Formatter that leaves the tree alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFormat;

impl SourceFormatter for NoFormat {
    fn format_tree(&self, _root: &Path) -> VendorResult<()> {
        Ok(())
    }
}
