use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::core::AdapterSpec;
use crate::error::{AdxError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Source scanning configuration
    pub parsing: ParsingConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Custom language adapters
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adapters: Vec<AdapterSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Source directories to scan when no paths are given
    pub source_dirs: Vec<PathBuf>,

    /// Gitignore-style patterns to skip
    pub ignore_patterns: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsingConfig {
    /// Built-in adapters to enable
    pub languages: Vec<String>,

    /// Maximum file size to parse (in bytes)
    pub max_file_size: usize,

    /// Attribute/modifier lines allowed between a comment and its declaration
    #[serde(default = "default_lookahead")]
    pub lookahead_lines: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON output
    pub pretty: bool,

    /// Include the diagnostics list next to each file model
    pub include_diagnostics: bool,
}

fn default_lookahead() -> usize {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: ProjectConfig {
                name: "Unnamed Project".to_string(),
                source_dirs: vec![PathBuf::from("src")],
                ignore_patterns: vec![
                    "target/".to_string(),
                    "build/".to_string(),
                    "node_modules/".to_string(),
                    ".git/".to_string(),
                ],
            },
            parsing: ParsingConfig {
                languages: vec![
                    "kotlin".to_string(),
                    "swift".to_string(),
                    "java".to_string(),
                    "cpp".to_string(),
                ],
                max_file_size: 1024 * 1024, // 1MB
                lookahead_lines: default_lookahead(),
            },
            output: OutputConfig {
                pretty: true,
                include_diagnostics: true,
            },
            adapters: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| AdxError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AdxError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration with fallback to default
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(p) => {
                if p.as_ref().exists() {
                    Self::load(p)
                } else {
                    Err(AdxError::Config(format!(
                        "config file {} does not exist",
                        p.as_ref().display()
                    )))
                }
            }
            None => {
                // Try common config file locations
                let candidates = [
                    "Adx.toml",
                    "adx.toml",
                    ".adx.toml",
                ];

                for candidate in &candidates {
                    if Path::new(candidate).exists() {
                        return Self::load(candidate);
                    }
                }

                Ok(Self::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("adx.toml");

        let mut config = Config::default();
        config.project.name = "shapes".to_string();
        config.parsing.lookahead_lines = 5;
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.project.name, "shapes");
        assert_eq!(loaded.parsing.lookahead_lines, 5);
        assert_eq!(loaded.parsing.languages.len(), 4);
        assert!(loaded.adapters.is_empty());
    }

    #[test]
    fn test_custom_adapter_section() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("adx.toml");
        std::fs::write(
            &path,
            r#"
[project]
name = "mixed"
source_dirs = ["src"]
ignore_patterns = []

[parsing]
languages = ["kotlin"]
max_file_size = 4096

[output]
pretty = false
include_diagnostics = true

[[adapters]]
id = "groovy"
extensions = ["groovy"]
block_comment = { open = "/**", middle = "*", close = "*/" }
type_keywords = ["class"]
function_keywords = ["def"]
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.parsing.lookahead_lines, 3);
        assert_eq!(config.adapters.len(), 1);
        assert_eq!(config.adapters[0].id, "groovy");
        assert_eq!(config.adapters[0].grammar.function_keywords, vec!["def".to_string()]);
    }

    #[test]
    fn test_missing_explicit_config_is_an_error() {
        let result = Config::load_or_default(Some("/definitely/not/here/adx.toml"));
        assert!(matches!(result, Err(AdxError::Config(_))));
    }
}
