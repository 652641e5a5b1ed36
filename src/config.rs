//! Configuration for Tracewatch
//!
//! Loaded from `tracewatch.toml` at the project root; every field has a
//! built-in default so the file is optional:
//!
//! ```toml
//! version = "0.0.49"
//! experimental = true
//! modules = "inline"
//! output = "app.js"
//! include = ["human*.js"]
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{TracewatchError, TracewatchResult};

/// Name of the optional configuration file at the project root.
pub const CONFIG_FILE: &str = "tracewatch.toml";

/// Per-project build configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Traceur release to resolve.
    pub version: String,
    /// Pass `--experimental` to enable in-progress language features.
    pub experimental: bool,
    /// Module output strategy, forwarded as `--modules=<strategy>`.
    pub modules: String,
    /// Name of the aggregate output file written per asset root. When
    /// empty, derived from the project directory name (`<project>.js`).
    pub output: String,
    /// Wildcard include patterns matched against file base names. When a
    /// file matches none, the in-source marker comment decides.
    pub include: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "0.0.49".to_string(),
            experimental: false,
            modules: "inline".to_string(),
            output: String::new(),
            include: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration for the project rooted at `base_dir`.
    ///
    /// A missing `tracewatch.toml` yields the defaults; a malformed one is
    /// an error. Either way the output name is resolved before returning.
    pub fn load(base_dir: &Path) -> TracewatchResult<Self> {
        let path = base_dir.join(CONFIG_FILE);
        let mut config = if path.exists() {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content).map_err(|e| TracewatchError::InvalidConfig {
                file: path,
                message: e.to_string(),
            })?
        } else {
            Self::default()
        };
        if config.output.is_empty() {
            config.output = default_output_name(base_dir);
        }
        Ok(config)
    }
}

/// `<project-dir-name>.js`, the original default of one artifact file named
/// after the project.
fn default_output_name(base_dir: &Path) -> String {
    let artifact = base_dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    format!("{artifact}.js")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.version, "0.0.49");
        assert!(!config.experimental);
        assert_eq!(config.modules, "inline");
        assert!(config.include.is_empty());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let base = dir.path().join("acme");
        fs::create_dir_all(&base).unwrap();
        let config = Config::load(&base).unwrap();
        assert_eq!(config.version, "0.0.49");
        assert_eq!(config.output, "acme.js");
    }

    #[test]
    fn test_load_file_overrides() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"
version = "0.0.72"
experimental = true
modules = "commonjs"
output = "bundle.js"
include = ["human*.js"]
"#,
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.version, "0.0.72");
        assert!(config.experimental);
        assert_eq!(config.modules, "commonjs");
        assert_eq!(config.output, "bundle.js");
        assert_eq!(config.include, vec!["human*.js".to_string()]);
    }

    #[test]
    fn test_load_rejects_unknown_keys() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "compiler = \"babel\"\n").unwrap();
        let err = Config::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("invalid configuration"));
    }
}
