// src/core/engine.rs
use std::path::{Path, PathBuf};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn, debug};

use crate::config::Config;
use super::{AdapterRegistry, CodeParser, ParsedFile, Severity, TableAdapter};

/// Output envelope of the `extract` command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractReport {
    pub generated_at: DateTime<Utc>,
    pub files: Vec<ParsedFile>,
}

/// Diagnostic totals of one run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl CheckSummary {
    pub fn failed(&self, strict: bool) -> bool {
        self.errors > 0 || (strict && self.warnings > 0)
    }
}

/// Main orchestration engine for adx
pub struct Engine {
    config: Config,
    parser: CodeParser,
}

impl Engine {
    /// Create a new engine instance from the configuration file
    pub async fn new(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load_or_default(config_path)?;

        debug!("Loaded configuration: {:?}", config);

        Self::from_config(config)
    }

    pub fn from_config(config: Config) -> Result<Self> {
        let mut registry = AdapterRegistry::with_builtins(&config.parsing.languages)?;
        for spec in &config.adapters {
            let adapter = TableAdapter::from_spec(spec.clone())?;
            registry.register(Box::new(adapter))?;
        }

        for language in &config.parsing.languages {
            if registry.get(language).is_err() {
                warn!("Language '{}' is enabled but no adapter provides it", language);
            }
        }

        let parser = CodeParser::new(&config.parsing, registry)
            .with_ignore_patterns(&config.project.ignore_patterns);

        Ok(Self { config, parser })
    }

    /// Parse the given paths (or the configured source dirs)
    pub async fn parse(&self, paths: Vec<PathBuf>, language: Option<&str>) -> Result<Vec<ParsedFile>> {
        let paths = if paths.is_empty() {
            self.config.project.source_dirs.clone()
        } else {
            paths
        };

        info!("Extracting documentation from {} path(s)", paths.len());
        let files = self.parser.parse_paths(&paths, language).await?;

        for file in &files {
            for diagnostic in &file.diagnostics {
                warn!("{}", diagnostic);
            }
        }
        Ok(files)
    }

    pub fn report(&self, mut files: Vec<ParsedFile>) -> ExtractReport {
        if !self.config.output.include_diagnostics {
            for file in &mut files {
                file.diagnostics.clear();
            }
        }
        ExtractReport {
            generated_at: Utc::now(),
            files,
        }
    }

    pub async fn extract(&self, paths: Vec<PathBuf>, language: Option<String>, output: Option<PathBuf>) -> Result<()> {
        let files = self.parse(paths, language.as_deref()).await?;
        let declarations: usize = files.iter().map(|f| f.model.declaration_count()).sum();
        let report = self.report(files);

        let json = if self.config.output.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };

        match output {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&path, json)?;
                info!(
                    "Wrote {} declarations from {} files to {}",
                    declarations,
                    report.files.len(),
                    path.display()
                );
            }
            None => println!("{}", json),
        }
        Ok(())
    }

    pub fn summarize(files: &[ParsedFile]) -> CheckSummary {
        let mut summary = CheckSummary {
            files: files.len(),
            ..CheckSummary::default()
        };
        for diagnostic in files.iter().flat_map(|f| &f.diagnostics) {
            match diagnostic.severity {
                Severity::Error => summary.errors += 1,
                Severity::Warning => summary.warnings += 1,
            }
        }
        summary
    }

    pub async fn check(&self, paths: Vec<PathBuf>, language: Option<String>, strict: bool) -> Result<()> {
        let files = self.parse(paths, language.as_deref()).await?;

        for diagnostic in files.iter().flat_map(|f| &f.diagnostics) {
            println!("{}", diagnostic);
        }

        let summary = Self::summarize(&files);
        println!(
            "{} files checked: {} errors, {} warnings",
            summary.files, summary.errors, summary.warnings
        );

        if summary.failed(strict) {
            anyhow::bail!(
                "documentation check failed with {} errors and {} warnings",
                summary.errors,
                summary.warnings
            );
        }
        Ok(())
    }

    pub async fn languages(&self) -> Result<()> {
        for adapter in self.parser.registry().adapters() {
            let extensions: Vec<String> = adapter
                .file_extensions()
                .iter()
                .map(|e| format!(".{}", e))
                .collect();
            println!("{:<10} {}", adapter.language_id(), extensions.join(", "));
        }
        Ok(())
    }

    pub async fn init(&self, path: Option<PathBuf>) -> Result<()> {
        let target_dir = match path {
            Some(path) => path,
            None => std::env::current_dir()?,
        };
        info!("Initializing adx in: {}", target_dir.display());

        let config_path = target_dir.join("adx.toml");
        if config_path.exists() {
            anyhow::bail!("{} already exists", config_path.display());
        }

        std::fs::create_dir_all(&target_dir)?;
        Config::default().save(&config_path)?;
        info!("Wrote {}", config_path.display());
        Ok(())
    }
}
