//! # govend - Go package vendoring
//!
//! govend copies a Go package from your GOPATH into your project, strips its
//! version-control metadata, and rewrites every import that points at it (or at
//! a previously vendored package) so the copy is built from its new location.
//!
//! ## Quick Start
//!
//! ```bash
//! # From inside $GOPATH/src/github.com/me/app
//! govend github.com/acme/lib
//!
//! # Copy only, no rewrite or commit
//! govend --rewrite=false --commit=false github.com/acme/lib
//! ```
//!
//! ## Module Organization
//!
//! - [`golang`] - Go lexer and import declaration parser
//! - [`registry`] - Vendored import-path prefixes
//! - [`rewrite`] - Per-file and tree-wide import rewriting
//! - [`pipeline`] - Copy, strip, revision, rewrite, commit

/// Project configuration (`govend.toml`).
pub mod config;

/// Package copy and commit.
pub mod deps;

/// Error types.
pub mod error;

/// Post-rewrite source formatting.
pub mod format;

/// Go source lexing and import parsing.
pub mod golang;

/// The vendoring pipeline.
pub mod pipeline;

/// Dependency prefix registry.
pub mod registry;

/// Import rewriting engine.
pub mod rewrite;

/// Version-control backends.
pub mod vcs;

/// GOPATH workspace lookup.
pub mod workspace;
