//! Import rewriting engine.
//!
//! - [`ImportRewriter`] - rewrites the imports of one file against the
//!   dependency registry, replacing the file atomically when it changed
//! - [`rewrite_tree`] - applies the rewriter to every source file under a
//!   directory, then re-formats the tree

mod file;
mod walk;

pub use file::{ImportRewriter, RewriteError, RewriteOutcome, base_name, write_atomically};
pub use walk::{FileReport, RewriteReport, rewrite_tree};
