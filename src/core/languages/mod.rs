//! Language adapters
//!
//! An adapter tells the language-agnostic pipeline how one language spells
//! its comments, tags and declarations. Most languages are pure data
//! ([`TableAdapter`]); languages whose headers do not fit the tables
//! implement [`LanguageAdapter`] directly and override recognition.

mod table;
mod kotlin;
mod swift;
mod java;
mod cpp;

pub use table::{AdapterSpec, TableAdapter};
pub use kotlin::kotlin_adapter;
pub use swift::swift_adapter;
pub use java::java_adapter;
pub use cpp::CppAdapter;

use std::collections::HashMap;
use std::path::Path;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AdxError, Result};
use super::recognizer::{self, DeclarationSkeleton, Grammar, LineClass};
use super::tags::TagVocabulary;

/// Doc-comment block delimiters, e.g. `/**`, `*`, `*/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDelimiters {
    pub open: String,
    #[serde(default)]
    pub middle: Option<String>,
    pub close: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Nesting {
    #[default]
    Allowed,
    Forbidden,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentSyntax {
    /// Documentation block comment
    #[serde(default)]
    pub block: Option<BlockDelimiters>,

    /// Prefixes of documentation line comments; consecutive lines form one block
    #[serde(default)]
    pub line_prefixes: Vec<String>,

    /// Ordinary block comment, skipped
    #[serde(default)]
    pub plain_block: Option<(String, String)>,

    /// Ordinary line comment prefix, skipped
    #[serde(default)]
    pub plain_line: Option<String>,

    #[serde(default)]
    pub nesting: Nesting,
}

impl CommentSyntax {
    /// C-family defaults: `/** */` docs, `/* */` and `//` ordinary comments
    pub fn c_family() -> Self {
        Self {
            block: Some(BlockDelimiters {
                open: "/**".to_string(),
                middle: Some("*".to_string()),
                close: "*/".to_string(),
            }),
            line_prefixes: Vec::new(),
            plain_block: Some(("/*".to_string(), "*/".to_string())),
            plain_line: Some("//".to_string()),
            nesting: Nesting::Allowed,
        }
    }

    pub fn decoration(&self) -> Option<&str> {
        self.block.as_ref().and_then(|b| b.middle.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.block.is_none() && self.line_prefixes.is_empty()
    }
}

/// Capability interface every language implements
pub trait LanguageAdapter: Send + Sync {
    fn language_id(&self) -> &str;

    fn file_extensions(&self) -> &[String];

    fn comment_syntax(&self) -> &CommentSyntax;

    fn tag_vocabulary(&self) -> &TagVocabulary;

    fn grammar(&self) -> &Grammar;

    /// Classify one line of code for the scanner
    fn classify_line(&self, line: &str) -> LineClass {
        recognizer::classify(self.grammar(), line)
    }

    /// Recognize the declaration spelled by `signature`
    fn recognize_declaration(&self, signature: &str) -> Option<DeclarationSkeleton> {
        recognizer::recognize(self.grammar(), signature)
    }
}

pub(crate) fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

/// Read-only table of adapters shared by all file pipelines
#[derive(Default)]
pub struct AdapterRegistry {
    adapters: Vec<Box<dyn LanguageAdapter>>,
    by_id: HashMap<String, usize>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in adapters named in `enabled`
    pub fn with_builtins(enabled: &[String]) -> Result<Self> {
        let mut registry = Self::new();
        for language in enabled {
            let adapter: Box<dyn LanguageAdapter> = match language.as_str() {
                "kotlin" => Box::new(kotlin_adapter()),
                "swift" => Box::new(swift_adapter()),
                "java" => Box::new(java_adapter()),
                "cpp" => Box::new(CppAdapter::new()),
                other => {
                    debug!("No built-in adapter for '{}', expecting a custom registration", other);
                    continue;
                }
            };
            registry.register(adapter)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, adapter: Box<dyn LanguageAdapter>) -> Result<()> {
        let id = adapter.language_id().to_string();
        if id.trim().is_empty() {
            return Err(AdxError::Adapter("adapter id must not be empty".to_string()));
        }
        if adapter.comment_syntax().is_empty() {
            return Err(AdxError::Adapter(format!("adapter '{}' declares no doc-comment syntax", id)));
        }
        if self.by_id.contains_key(&id) {
            return Err(AdxError::Adapter(format!("adapter '{}' is already registered", id)));
        }

        debug!("Registered adapter '{}' for {:?}", id, adapter.file_extensions());
        self.by_id.insert(id, self.adapters.len());
        self.adapters.push(adapter);
        Ok(())
    }

    pub fn get(&self, language: &str) -> Result<&dyn LanguageAdapter> {
        self.by_id
            .get(language)
            .map(|&i| self.adapters[i].as_ref())
            .ok_or_else(|| AdxError::AdapterNotFound {
                language: language.to_string(),
            })
    }

    /// Adapter chosen by file extension
    pub fn for_path(&self, path: &Path) -> Result<&dyn LanguageAdapter> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        self.adapters
            .iter()
            .find(|a| a.file_extensions().iter().any(|e| e == extension))
            .map(|a| a.as_ref())
            .ok_or_else(|| AdxError::AdapterNotFound {
                language: format!(".{}", extension),
            })
    }

    pub fn adapters(&self) -> impl Iterator<Item = &dyn LanguageAdapter> {
        self.adapters.iter().map(|a| a.as_ref())
    }
}
