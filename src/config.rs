use crate::error::{VendorError, VendorResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const CONFIG_FILE: &str = "govend.toml";

/// Project settings from `govend.toml`. Every field is optional.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct VendorConfig {
    /// Directory (relative to the project) that receives vendored packages.
    /// Empty means the project root itself.
    pub vendor_dir: String,
    /// Flat list of previously vendored import-path prefixes.
    pub dependencies_file: String,
    pub source_suffix: String,
    /// Formatter program and arguments; the tree root is appended.
    pub format_command: Vec<String>,
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            vendor_dir: String::new(),
            dependencies_file: "dependencies".to_string(),
            source_suffix: ".go".to_string(),
            format_command: vec!["gofmt".to_string(), "-l".to_string(), "-w".to_string()],
        }
    }
}

impl VendorConfig {
    /// Load `govend.toml` from `project_dir`, or defaults if it does not exist.
    pub fn load(project_dir: &Path) -> VendorResult<Self> {
        let path = project_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(&path).map_err(|e| VendorError::io_at("read", &path, e))?;
        let config = Self::parse(&content)
            .map_err(|e| VendorError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    fn validate(&self) -> VendorResult<()> {
        if self.format_command.is_empty() {
            return Err(VendorError::Config("format_command must not be empty".to_string()));
        }
        if self.source_suffix.is_empty() {
            return Err(VendorError::Config("source_suffix must not be empty".to_string()));
        }
        if Path::new(&self.vendor_dir).is_absolute() || self.vendor_dir.split('/').any(|c| c == "..")
        {
            return Err(VendorError::Config(format!(
                "vendor_dir must be a relative path inside the project, got '{}'",
                self.vendor_dir
            )));
        }
        Ok(())
    }

    /// Vendor directory as an import-path fragment (no leading/trailing `/`).
    pub fn vendor_import_dir(&self) -> &str {
        self.vendor_dir.trim_matches('/')
    }
}
