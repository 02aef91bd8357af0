// src/core/model.rs
//! The uniform documentation model handed to renderers.
//!
//! Field names here are part of the external JSON contract.

use std::path::PathBuf;
use serde::{Deserialize, Serialize, Serializer};

use super::tags::{TagEntry, TagKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeclarationKind {
    Class,
    Property,
    Method,
    /// Free function at file level
    Function,
    Constructor,
    StaticProperty,
    StaticMethod,
}

impl DeclarationKind {
    pub fn is_property(self) -> bool {
        matches!(self, DeclarationKind::Property | DeclarationKind::StaticProperty)
    }

    /// The static flavour of a member kind; types and constructors are unchanged
    pub fn to_static(self) -> Self {
        match self {
            DeclarationKind::Property => DeclarationKind::StaticProperty,
            DeclarationKind::Method | DeclarationKind::Function => DeclarationKind::StaticMethod,
            other => other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Returns {
    pub description: String,
}

/// Parsed documentation attached to one declaration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Documentation {
    pub summary: Option<String>,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagEntry>,
}

impl Documentation {
    pub fn from_entries(tags: Vec<TagEntry>) -> Self {
        let summary = tags
            .iter()
            .find(|t| t.kind == TagKind::Summary)
            .map(|t| t.value.clone());

        let paragraphs: Vec<&str> = tags
            .iter()
            .filter(|t| t.kind == TagKind::Description)
            .map(|t| t.value.as_str())
            .collect();
        let description = if paragraphs.is_empty() {
            None
        } else {
            Some(paragraphs.join("\n\n"))
        };

        Self { summary, description, tags }
    }

    pub fn entries(&self, kind: TagKind) -> impl Iterator<Item = &TagEntry> {
        self.tags.iter().filter(move |t| t.kind == kind)
    }

    /// First entry of `kind` documenting `name`
    pub fn named(&self, kind: TagKind, name: &str) -> Option<&TagEntry> {
        self.entries(kind).find(|t| t.name.as_deref() == Some(name))
    }

    pub fn returns(&self) -> Option<&TagEntry> {
        self.entries(TagKind::Return).next()
    }

    pub fn constructor_note(&self) -> Option<&TagEntry> {
        self.entries(TagKind::ConstructorNote).next()
    }

    pub fn marker(&self) -> Option<&TagEntry> {
        self.entries(TagKind::Marker).next()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MismatchKind {
    /// Documented parameter missing from the signature
    UnknownParameter,
    /// Signature parameter without a matching tag
    UndocumentedParameter,
    DuplicateParameter,
    UnknownProperty,
    UnexpectedReturn,
    UnexpectedTag,
    NameMismatch,
}

/// A disagreement between documentation and signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    pub kind: MismatchKind,
    pub name: Option<String>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    pub kind: DeclarationKind,
    pub name: String,
    pub modifiers: Vec<String>,
    pub parameters: Vec<Parameter>,
    pub returns: Option<Returns>,
    #[serde(flatten, serialize_with = "documentation_or_nulls")]
    pub documentation: Option<Documentation>,
    pub members: Vec<Declaration>,
    pub mismatches: Vec<Mismatch>,
    pub line: usize,
}

impl Declaration {
    pub fn is_static(&self) -> bool {
        self.modifiers.iter().any(|m| m == "static")
    }

    pub fn summary(&self) -> Option<&str> {
        self.documentation.as_ref().and_then(|d| d.summary.as_deref())
    }

    pub fn description(&self) -> Option<&str> {
        self.documentation.as_ref().and_then(|d| d.description.as_deref())
    }

    pub fn member(&self, name: &str) -> Option<&Declaration> {
        self.members.iter().find(|m| m.name == name)
    }
}

/// Undocumented declarations still carry `summary` and `description`, as null
fn documentation_or_nulls<S: Serializer>(documentation: &Option<Documentation>, serializer: S) -> Result<S::Ok, S::Error> {
    match documentation {
        Some(documentation) => documentation.serialize(serializer),
        None => Documentation::default().serialize(serializer),
    }
}

/// A comment that documents nothing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrphanedComment {
    pub line: usize,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub text: String,
}

/// Everything extracted from one source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileModel {
    pub path: PathBuf,
    pub language: String,
    pub content_hash: String,
    pub declarations: Vec<Declaration>,
    pub orphaned_comments: Vec<OrphanedComment>,
}

impl FileModel {
    pub fn declaration(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| d.name == name)
    }

    /// Total declarations including nested members
    pub fn declaration_count(&self) -> usize {
        fn count(decls: &[Declaration]) -> usize {
            decls.iter().map(|d| 1 + count(&d.members)).sum()
        }
        count(&self.declarations)
    }
}
