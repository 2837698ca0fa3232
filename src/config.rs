//! Configuration from `norm.toml`.
//!
//! ```toml
//! [defaults]
//! file = "db.go"
//! package = "db"
//! driver_lib = "github.com/lib/pq"
//! driver_name = "postgres"
//!
//! [formatter]
//! enabled = true
//! command = "gofmt"
//! args = []
//! ```
//!
//! Every key is optional. Directives in the input file always win over
//! `[defaults]`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::ast::HeaderConfig;
use crate::error::{NormError, NormResult};
use crate::fmt::{ExternalFormatter, Passthrough, SourceFormatter};

/// Project configuration file name, looked up next to the input file.
pub const FILE_NAME: &str = "norm.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NormConfig {
    pub defaults: Defaults,
    pub formatter: FormatterConfig,
}

/// Header values used when the input has no overriding directive.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Defaults {
    pub file: String,
    pub package: String,
    pub driver_lib: String,
    pub driver_name: String,
}

impl Default for Defaults {
    fn default() -> Self {
        let header = HeaderConfig::default();
        Self {
            file: header.output,
            package: header.package,
            driver_lib: header.driver_lib,
            driver_name: header.driver_name,
        }
    }
}

/// External formatter settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatterConfig {
    pub enabled: bool,
    pub command: String,
    pub args: Vec<String>,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "gofmt".to_string(),
            args: Vec::new(),
        }
    }
}

impl NormConfig {
    /// Parse configuration from TOML text. `origin` is only used in errors.
    pub fn from_toml(content: &str, origin: &Path) -> NormResult<Self> {
        toml::from_str(content).map_err(|e| NormError::Config {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> NormResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| NormError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml(&content, path)
    }

    /// Find the configuration for an input file.
    ///
    /// Looks for `norm.toml` next to the input, then `norm/config.toml` in the
    /// user configuration directory. Falls back to built-in defaults.
    pub fn discover(input: &Path) -> NormResult<Self> {
        for candidate in candidates(input) {
            if candidate.is_file() {
                debug!(path = %candidate.display(), "loading configuration");
                return Self::load(&candidate);
            }
        }
        debug!("no configuration file found, using defaults");
        Ok(Self::default())
    }

    /// Header configuration the scanner starts from.
    pub fn header(&self) -> HeaderConfig {
        HeaderConfig {
            output: self.defaults.file.clone(),
            package: self.defaults.package.clone(),
            driver_lib: self.defaults.driver_lib.clone(),
            driver_name: self.defaults.driver_name.clone(),
            imports: Vec::new(),
        }
    }

    /// The formatter selected by `[formatter]`.
    pub fn formatter(&self) -> Box<dyn SourceFormatter> {
        if self.formatter.enabled {
            Box::new(ExternalFormatter::new(
                self.formatter.command.clone(),
                self.formatter.args.clone(),
            ))
        } else {
            Box::new(Passthrough)
        }
    }
}

fn candidates(input: &Path) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let dir = match input.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    paths.push(dir.join(FILE_NAME));
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("norm").join("config.toml"));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_default() {
        let config = NormConfig::from_toml("", Path::new("norm.toml")).unwrap();
        assert_eq!(config, NormConfig::default());
        assert_eq!(config.header(), HeaderConfig::default());
        assert_eq!(config.formatter().name(), "gofmt");
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [defaults]
            package = "store"
            driver_name = "sqlite3"

            [formatter]
            enabled = false
        "#;
        let config = NormConfig::from_toml(toml, Path::new("norm.toml")).unwrap();
        let header = config.header();
        assert_eq!(header.package, "store");
        assert_eq!(header.driver_name, "sqlite3");
        assert_eq!(header.output, "db.go");
        assert_eq!(header.driver_lib, "github.com/lib/pq");
        assert_eq!(config.formatter().name(), "none");
    }

    #[test]
    fn test_custom_formatter_command() {
        let toml = r#"
            [formatter]
            command = "goimports"
            args = ["-local", "example.com"]
        "#;
        let config = NormConfig::from_toml(toml, Path::new("norm.toml")).unwrap();
        assert!(config.formatter.enabled);
        assert_eq!(config.formatter.args, vec!["-local", "example.com"]);
        assert_eq!(config.formatter().name(), "goimports");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = NormConfig::from_toml("[defaults]\npkg = \"x\"\n", Path::new("norm.toml"))
            .unwrap_err();
        assert!(matches!(err, NormError::Config { .. }));
    }

    #[test]
    fn test_discover_next_to_input() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FILE_NAME), "[defaults]\npackage = \"found\"\n").unwrap();
        let config = NormConfig::discover(&dir.path().join("queries.sql")).unwrap();
        assert_eq!(config.defaults.package, "found");
    }

    #[test]
    fn test_candidates_for_bare_file_name() {
        let paths = candidates(Path::new("queries.sql"));
        assert_eq!(paths[0], Path::new(".").join(FILE_NAME));
    }
}
