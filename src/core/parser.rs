use std::path::{Path, PathBuf};
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use sha2::{Sha256, Digest};
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::config::ParsingConfig;
use crate::error::{AdxError, Result};
use super::association::associate;
use super::builder::ModelBuilder;
use super::diagnostics::{Diagnostic, DiagnosticSink};
use super::languages::{AdapterRegistry, LanguageAdapter};
use super::model::FileModel;
use super::scanner::Scanner;

/// One file's model and the diagnostics produced while building it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedFile {
    #[serde(flatten)]
    pub model: FileModel,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

/// Run the scanner → association → builder pipeline over one file's text
pub fn parse_source(path: &Path, text: &str, adapter: &dyn LanguageAdapter, lookahead: usize) -> ParsedFile {
    let mut sink = DiagnosticSink::new(path);

    let candidates = Scanner::new(adapter, lookahead).scan(text, &mut sink);
    let associations = associate(adapter, candidates, &mut sink);
    let (declarations, orphaned_comments) = ModelBuilder::new(adapter).build(associations, &mut sink);

    let model = FileModel {
        path: path.to_path_buf(),
        language: adapter.language_id().to_string(),
        content_hash: calculate_hash(text),
        declarations,
        orphaned_comments,
    };
    let mut diagnostics = sink.into_vec();
    diagnostics.sort_by_key(|d| (d.file_location.line, d.file_location.column));

    debug!(
        "Parsed {}: {} declarations, {} orphaned comments, {} diagnostics",
        path.display(),
        model.declaration_count(),
        model.orphaned_comments.len(),
        diagnostics.len()
    );

    ParsedFile { model, diagnostics }
}

/// Calculate SHA256 hash of content
fn calculate_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Read and parse one file with an explicit or extension-selected adapter
fn parse_file_with(
    registry: &AdapterRegistry,
    config: &ParsingConfig,
    path: &Path,
    language: Option<&str>,
) -> Result<ParsedFile> {
    let adapter = match language {
        Some(language) => registry.get(language)?,
        None => registry.for_path(path)?,
    };

    let metadata = std::fs::metadata(path)?;
    if metadata.len() as usize > config.max_file_size {
        return Err(AdxError::FileTooLarge {
            path: path.display().to_string(),
            limit: config.max_file_size,
        });
    }

    let source_content = std::fs::read_to_string(path)?;
    Ok(parse_source(path, &source_content, adapter, config.lookahead_lines))
}

/// Multi-language documentation parser sharing one adapter registry
pub struct CodeParser {
    config: ParsingConfig,
    ignore_patterns: Vec<String>,
    registry: Arc<AdapterRegistry>,
}

impl CodeParser {
    pub fn new(config: &ParsingConfig, registry: AdapterRegistry) -> Self {
        Self {
            config: config.clone(),
            ignore_patterns: Vec::new(),
            registry: Arc::new(registry),
        }
    }

    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Self {
        self.ignore_patterns = patterns.to_vec();
        self
    }

    pub fn registry(&self) -> &AdapterRegistry {
        &self.registry
    }

    /// Parse a single source file
    pub fn parse_file<P: AsRef<Path>>(&self, file_path: P, language: Option<&str>) -> Result<ParsedFile> {
        parse_file_with(&self.registry, &self.config, file_path.as_ref(), language)
    }

    /// Parse files and directories concurrently; results keep input order.
    /// Unreadable or oversized files are skipped with a warning.
    pub async fn parse_paths(&self, paths: &[PathBuf], language: Option<&str>) -> Result<Vec<ParsedFile>> {
        let files = self.collect_files(paths, language)?;
        let mut tasks = JoinSet::new();

        for (index, path) in files.into_iter().enumerate() {
            let registry = Arc::clone(&self.registry);
            let config = self.config.clone();
            let language = language.map(|l| l.to_string());
            tasks.spawn_blocking(move || {
                let result = parse_file_with(&registry, &config, &path, language.as_deref());
                (index, result)
            });
        }

        let mut results: Vec<Option<ParsedFile>> = Vec::new();
        results.resize_with(tasks.len(), || None);
        while let Some(joined) = tasks.join_next().await {
            let (index, result) = joined.map_err(|e| AdxError::FileSystem(format!("parse task failed: {}", e)))?;
            match result {
                Ok(parsed) => results[index] = Some(parsed),
                Err(err @ AdxError::AdapterNotFound { .. }) => return Err(err),
                Err(err) => warn!("Skipping file: {}", err),
            }
        }

        Ok(results.into_iter().flatten().collect())
    }

    /// Expand directories into the files some adapter can handle
    pub fn collect_files(&self, paths: &[PathBuf], language: Option<&str>) -> Result<Vec<PathBuf>> {
        if let Some(language) = language {
            self.registry.get(language)?;
        }
        let mut files = Vec::new();

        for path in paths {
            if path.is_file() {
                files.push(path.clone());
                continue;
            }
            if !path.is_dir() {
                return Err(AdxError::FileSystem(format!("{} does not exist", path.display())));
            }

            let mut overrides = OverrideBuilder::new(path);
            for pattern in &self.ignore_patterns {
                overrides
                    .add(&format!("!{}", pattern))
                    .map_err(|e| AdxError::Config(format!("invalid ignore pattern '{}': {}", pattern, e)))?;
            }
            let overrides = overrides
                .build()
                .map_err(|e| AdxError::Config(e.to_string()))?;

            // Use ignore crate to respect .gitignore and custom patterns
            let walker = WalkBuilder::new(path)
                .hidden(false)
                .git_ignore(true)
                .overrides(overrides)
                .sort_by_file_name(|a, b| a.cmp(b))
                .build();

            for entry in walker {
                let entry = entry.map_err(|e| AdxError::FileSystem(e.to_string()))?;
                let entry_path = entry.path();
                if entry_path.is_file() && self.should_parse_file(entry_path, language) {
                    files.push(entry_path.to_path_buf());
                }
            }
        }

        debug!("Collected {} files to parse", files.len());
        Ok(files)
    }

    fn should_parse_file(&self, path: &Path, language: Option<&str>) -> bool {
        match language {
            Some(language) => {
                let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or_default();
                self.registry
                    .get(language)
                    .map_or(false, |a| a.file_extensions().iter().any(|e| e == extension))
            }
            None => self.registry.for_path(path).is_ok(),
        }
    }
}
