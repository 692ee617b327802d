use std::fmt;
use std::io;
use std::path::Path;

/// Fatal errors raised while vendoring a package.
#[derive(Debug)]
pub enum VendorError {
    /// The import path does not exist under any workspace root
    PackageNotFound(String),
    /// Missing or inconsistent configuration (GOPATH, govend.toml, working directory)
    Config(String),
    /// File-system operation failed
    Io { context: String, source: io::Error },
    /// libgit2 error
    Git(git2::Error),
    /// External program failed or could not be started
    Tool { tool: String, message: String },
}

impl VendorError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        VendorError::Io {
            context: context.into(),
            source,
        }
    }

    pub fn io_at(action: &str, path: &Path, source: io::Error) -> Self {
        Self::io(format!("{} {}", action, path.display()), source)
    }
}

impl fmt::Display for VendorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VendorError::PackageNotFound(pkg) => {
                write!(f, "could not find package '{}' in any GOPATH entry", pkg)
            }
            VendorError::Config(msg) => write!(f, "configuration error: {}", msg),
            VendorError::Io { context, source } => write!(f, "failed to {}: {}", context, source),
            VendorError::Git(e) => write!(f, "git error: {}", e.message()),
            VendorError::Tool { tool, message } => write!(f, "{} failed: {}", tool, message),
        }
    }
}

impl std::error::Error for VendorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            VendorError::Io { source, .. } => Some(source),
            VendorError::Git(e) => Some(e),
            _ => None,
        }
    }
}

impl From<git2::Error> for VendorError {
    fn from(e: git2::Error) -> Self {
        VendorError::Git(e)
    }
}

pub type VendorResult<T> = Result<T, VendorError>;
