// src/core/languages/table.rs
use std::collections::HashMap;
use serde::{Deserialize, Serialize};

use crate::core::recognizer::Grammar;
use crate::core::tags::{TagKind, TagVocabulary};
use crate::error::{AdxError, Result};
use super::{BlockDelimiters, CommentSyntax, LanguageAdapter, Nesting};

/// An adapter made purely of tables
#[derive(Debug, Clone)]
pub struct TableAdapter {
    id: String,
    extensions: Vec<String>,
    comments: CommentSyntax,
    vocabulary: TagVocabulary,
    grammar: Grammar,
}

impl TableAdapter {
    pub fn new(
        id: &str,
        extensions: &[&str],
        comments: CommentSyntax,
        vocabulary: TagVocabulary,
        grammar: Grammar,
    ) -> Self {
        Self {
            id: id.to_string(),
            extensions: extensions.iter().map(|e| e.to_string()).collect(),
            comments,
            vocabulary,
            grammar,
        }
    }

    /// Build an adapter from an `[[adapters]]` configuration entry
    pub fn from_spec(spec: AdapterSpec) -> Result<Self> {
        if spec.extensions.is_empty() {
            return Err(AdxError::Adapter(format!(
                "adapter '{}' lists no file extensions",
                spec.id
            )));
        }

        let plain_block = spec.block_comment.as_ref().and_then(|b| {
            b.open
                .strip_suffix('*')
                .filter(|open| !open.is_empty())
                .map(|open| (open.to_string(), b.close.clone()))
        });
        let comments = CommentSyntax {
            block: spec.block_comment,
            line_prefixes: spec.line_comment.into_iter().collect(),
            plain_block,
            plain_line: spec.plain_line_comment,
            nesting: spec.nested_comments,
        };

        let vocabulary = match (spec.block_tags, spec.inline_tags) {
            (None, None) => TagVocabulary::block_tags(),
            (block_tags, inline_tags) => TagVocabulary {
                inline_param_group: inline_tags.as_ref().map(|_| "Parameters".to_string()),
                block_tags,
                inline_tags,
                ..TagVocabulary::block_tags()
            },
        };

        Ok(Self {
            id: spec.id,
            extensions: spec
                .extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_string())
                .collect(),
            comments,
            vocabulary,
            grammar: spec.grammar,
        })
    }
}

impl LanguageAdapter for TableAdapter {
    fn language_id(&self) -> &str {
        &self.id
    }

    fn file_extensions(&self) -> &[String] {
        &self.extensions
    }

    fn comment_syntax(&self) -> &CommentSyntax {
        &self.comments
    }

    fn tag_vocabulary(&self) -> &TagVocabulary {
        &self.vocabulary
    }

    fn grammar(&self) -> &Grammar {
        &self.grammar
    }
}

/// Configuration form of a custom adapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterSpec {
    pub id: String,

    #[serde(default)]
    pub extensions: Vec<String>,

    #[serde(default)]
    pub block_comment: Option<BlockDelimiters>,

    /// Documentation line-comment prefix, e.g. `///`
    #[serde(default)]
    pub line_comment: Option<String>,

    /// Ordinary line-comment prefix to skip, e.g. `#`
    #[serde(default)]
    pub plain_line_comment: Option<String>,

    #[serde(default)]
    pub block_tags: Option<HashMap<String, TagKind>>,

    #[serde(default)]
    pub inline_tags: Option<HashMap<String, TagKind>>,

    #[serde(default)]
    pub nested_comments: Nesting,

    #[serde(flatten)]
    pub grammar: Grammar,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::recognizer::{LineClass, DeclarationRole, ParameterStyle};

    const SPEC: &str = r#"
id = "groovy"
extensions = [".groovy", "gvy"]
block_comment = { open = "/**", middle = "*", close = "*/" }
plain_line_comment = "//"
type_keywords = ["class", "interface"]
modifier_keywords = ["public", "private", "def"]
static_keywords = ["static"]
reserved_words = ["return", "import", "package"]
parameter_style = "type-first"
attribute_prefix = "@"
"#;

    #[test]
    fn test_adapter_from_toml() {
        let spec: AdapterSpec = toml::from_str(SPEC).unwrap();
        assert_eq!(spec.grammar.parameter_style, ParameterStyle::TypeFirst);

        let adapter = TableAdapter::from_spec(spec).unwrap();
        assert_eq!(adapter.language_id(), "groovy");
        assert_eq!(adapter.file_extensions(), &["groovy".to_string(), "gvy".to_string()]);
        assert_eq!(adapter.comment_syntax().decoration(), Some("*"));
        assert_eq!(
            adapter.comment_syntax().plain_block,
            Some(("/*".to_string(), "*/".to_string()))
        );
        assert!(adapter.tag_vocabulary().block_tags.is_some());
        assert_eq!(
            adapter.classify_line("public class Widget {"),
            LineClass::Declaration(DeclarationRole::Type)
        );
    }

    #[test]
    fn test_inline_tags_enable_parameter_group() {
        let spec: AdapterSpec = toml::from_str(
            r#"
id = "markup"
extensions = ["mk"]
line_comment = "///"
inline_tags = { Parameter = "param", Returns = "return" }
"#,
        )
        .unwrap();
        let adapter = TableAdapter::from_spec(spec).unwrap();

        assert_eq!(adapter.tag_vocabulary().inline_param_group.as_deref(), Some("Parameters"));
        assert!(adapter.tag_vocabulary().block_tags.is_none());
        assert_eq!(adapter.comment_syntax().line_prefixes, vec!["///".to_string()]);
    }

    #[test]
    fn test_spec_without_extensions_rejected() {
        let spec: AdapterSpec = toml::from_str("id = \"bare\"\nline_comment = \"#\"").unwrap();
        assert!(matches!(TableAdapter::from_spec(spec), Err(AdxError::Adapter(_))));
    }
}
