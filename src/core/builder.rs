// src/core/builder.rs
//! Assembles associated declarations into the per-file model.
//!
//! Declarations arrive in source order with their nesting depth. Type
//! declarations stay open on a stack until a shallower declaration (or the
//! end of the file) closes them; everything in between becomes a member.
//! While building, each declaration's documentation is cross-checked against
//! its signature and disagreements are recorded as mismatches.

use std::collections::HashSet;

use super::association::{Associated, Association};
use super::diagnostics::{DiagnosticKind, DiagnosticSink, Position};
use super::languages::LanguageAdapter;
use super::model::{
    Declaration, DeclarationKind, Documentation, Mismatch, MismatchKind, OrphanedComment, Parameter,
    Returns,
};
use super::recognizer::{DeclarationSkeleton, SkeletonKind};
use super::scanner::{CommentBlock, CommentForm};
use super::tags::{TagEntry, TagKind, TagParser};

/// A type declaration still collecting members
struct OpenType {
    declaration: Declaration,
    position: Position,
    /// `@property` tags naming no primary-constructor parameter
    deferred_properties: Vec<TagEntry>,
}

pub struct ModelBuilder<'a> {
    adapter: &'a dyn LanguageAdapter,
}

impl<'a> ModelBuilder<'a> {
    pub fn new(adapter: &'a dyn LanguageAdapter) -> Self {
        Self { adapter }
    }

    pub fn build(
        &self,
        associations: Vec<Association>,
        sink: &mut DiagnosticSink,
    ) -> (Vec<Declaration>, Vec<OrphanedComment>) {
        let mut roots = Vec::new();
        let mut orphans = Vec::new();
        let mut open: Vec<OpenType> = Vec::new();

        for association in associations {
            match association {
                Association::Orphan(comment) => orphans.push(self.orphan(&comment)),
                Association::Declaration(mut item) => {
                    while open.len() > item.depth {
                        close_type(&mut open, &mut roots, sink);
                    }
                    let nested = item.depth > 0;
                    let position = item.position;
                    let siblings = std::mem::take(&mut item.skeleton.declarators);
                    let (declaration, deferred) = self.declaration(item, nested);
                    report(&declaration, position, sink);

                    if declaration.kind == DeclarationKind::Class {
                        open.push(OpenType {
                            declaration,
                            position,
                            deferred_properties: deferred,
                        });
                        continue;
                    }

                    // Each declarator of `int width, height;` shares the comment
                    let shared = (!siblings.is_empty()).then(|| declaration.clone());
                    attach(&mut open, &mut roots, declaration);
                    if let Some(template) = shared {
                        for name in siblings {
                            let mut sibling = template.clone();
                            sibling.name = name;
                            sibling.mismatches.clear();
                            attach(&mut open, &mut roots, sibling);
                        }
                    }
                }
            }
        }

        while !open.is_empty() {
            close_type(&mut open, &mut roots, sink);
        }
        (roots, orphans)
    }

    pub fn document(&self, comment: &CommentBlock) -> Documentation {
        let decoration = match comment.form {
            CommentForm::Block => self.adapter.comment_syntax().decoration(),
            CommentForm::Line => None,
        };
        let entries = TagParser::new(self.adapter.tag_vocabulary(), decoration).parse(&comment.text);
        Documentation::from_entries(entries)
    }

    fn orphan(&self, comment: &CommentBlock) -> OrphanedComment {
        let documentation = self.document(comment);
        OrphanedComment {
            line: comment.start.line,
            summary: documentation.summary,
            description: documentation.description,
            text: comment.text.trim().to_string(),
        }
    }

    fn declaration(&self, item: Associated, nested: bool) -> (Declaration, Vec<TagEntry>) {
        let Associated {
            skeleton,
            comment,
            position,
            in_static_scope,
            ..
        } = item;
        let documentation = comment.as_ref().map(|c| self.document(c));

        let mut kind = match skeleton.kind {
            SkeletonKind::Type => DeclarationKind::Class,
            SkeletonKind::Function if nested => DeclarationKind::Method,
            SkeletonKind::Function => DeclarationKind::Function,
            SkeletonKind::Constructor => DeclarationKind::Constructor,
            SkeletonKind::Property => DeclarationKind::Property,
        };
        let mut modifiers = skeleton.modifiers.clone();
        if nested && (skeleton.is_static() || in_static_scope) {
            kind = kind.to_static();
            if !modifiers.iter().any(|m| m == "static") {
                modifiers.push("static".to_string());
            }
        }

        let mut checks = Checks::new(&skeleton.name);
        if let Some(doc) = &documentation {
            checks.marker(doc);
        }

        let mut declaration = Declaration {
            kind,
            name: skeleton.name.clone(),
            modifiers,
            parameters: Vec::new(),
            returns: None,
            documentation: None,
            members: Vec::new(),
            mismatches: Vec::new(),
            line: position.line,
        };

        let mut deferred = Vec::new();
        match kind {
            DeclarationKind::Class => {
                let (members, unmatched) = self.primary_constructor(&skeleton, documentation.as_ref(), position.line, &mut checks);
                declaration.members = members;
                deferred = unmatched;
                if let Some(doc) = &documentation {
                    checks.unexpected_return(doc);
                }
            }
            DeclarationKind::Property | DeclarationKind::StaticProperty => {
                if let Some(doc) = &documentation {
                    checks.unexpected_tags(doc, &[TagKind::Param, TagKind::Property, TagKind::ConstructorNote]);
                    checks.unexpected_return(doc);
                }
            }
            _ => {
                let names: Vec<&str> = skeleton.parameters.iter().map(|p| p.name.as_str()).collect();
                declaration.parameters = names
                    .iter()
                    .map(|name| Parameter {
                        name: name.to_string(),
                        description: documentation
                            .as_ref()
                            .and_then(|d| d.named(TagKind::Param, name))
                            .map(|t| t.value.clone()),
                    })
                    .collect();

                if let Some(doc) = &documentation {
                    checks.parameters(doc, &names, &[]);
                    checks.unexpected_tags(doc, &[TagKind::Property, TagKind::ConstructorNote]);
                    declaration.returns = match doc.returns() {
                        Some(_) if skeleton.returns_value == Some(false) => {
                            checks.unexpected_return(doc);
                            None
                        }
                        Some(tag) => Some(Returns {
                            description: tag.value.clone(),
                        }),
                        None => None,
                    };
                }
            }
        }

        declaration.documentation = documentation;
        declaration.mismatches = checks.into_mismatches();
        (declaration, deferred)
    }

    /// Property and constructor members implied by a class header's
    /// parameter list, plus `@property` tags left for body properties
    fn primary_constructor(
        &self,
        skeleton: &DeclarationSkeleton,
        doc: Option<&Documentation>,
        line: usize,
        checks: &mut Checks,
    ) -> (Vec<Declaration>, Vec<TagEntry>) {
        let promoting = &self.adapter.grammar().promoting_keywords;
        let names: Vec<&str> = skeleton.parameters.iter().map(|p| p.name.as_str()).collect();
        let tag = |kind: TagKind, name: &str| doc.and_then(|d| d.named(kind, name)).map(|t| t.value.clone());

        let mut members = Vec::new();
        for param in &skeleton.parameters {
            let property_tag = tag(TagKind::Property, &param.name);
            if !param.promoted && property_tag.is_none() {
                continue;
            }
            let description = property_tag.or_else(|| tag(TagKind::Param, &param.name));
            members.push(Declaration {
                kind: DeclarationKind::Property,
                name: param.name.clone(),
                modifiers: param
                    .modifiers
                    .iter()
                    .filter(|m| !promoting.contains(*m))
                    .cloned()
                    .collect(),
                parameters: Vec::new(),
                returns: None,
                documentation: description.map(summary_only),
                members: Vec::new(),
                mismatches: Vec::new(),
                line,
            });
        }

        let note = doc.and_then(|d| d.constructor_note()).map(|t| t.value.clone());
        if skeleton.has_parameter_list || note.is_some() {
            members.push(Declaration {
                kind: DeclarationKind::Constructor,
                name: skeleton.name.clone(),
                modifiers: Vec::new(),
                parameters: skeleton
                    .parameters
                    .iter()
                    .map(|p| Parameter {
                        name: p.name.clone(),
                        description: tag(TagKind::Param, &p.name).or_else(|| tag(TagKind::Property, &p.name)),
                    })
                    .collect(),
                returns: None,
                documentation: note.map(summary_only),
                members: Vec::new(),
                mismatches: Vec::new(),
                line,
            });
        }

        let mut deferred = Vec::new();
        if let Some(doc) = doc {
            let property_names: Vec<&str> = doc
                .entries(TagKind::Property)
                .filter_map(|t| t.name.as_deref())
                .collect();
            checks.parameters(doc, &names, &property_names);
            deferred = doc
                .entries(TagKind::Property)
                .filter(|t| !t.name.as_deref().map_or(false, |n| names.contains(&n)))
                .cloned()
                .collect();
        }
        (members, deferred)
    }
}

fn summary_only(text: String) -> Documentation {
    Documentation {
        summary: Some(text),
        description: None,
        tags: Vec::new(),
    }
}

fn tag_label(kind: TagKind) -> &'static str {
    match kind {
        TagKind::Param => "parameter",
        TagKind::Return => "return",
        TagKind::Property => "property",
        TagKind::ConstructorNote => "constructor",
        TagKind::Marker => "marker",
        TagKind::Summary | TagKind::Description | TagKind::Unknown => "documentation",
    }
}

fn attach(open: &mut [OpenType], roots: &mut Vec<Declaration>, declaration: Declaration) {
    match open.last_mut() {
        Some(parent) => parent.declaration.members.push(declaration),
        None => roots.push(declaration),
    }
}

/// Finish the innermost open type and hand it to its parent
fn close_type(open: &mut Vec<OpenType>, roots: &mut Vec<Declaration>, sink: &mut DiagnosticSink) {
    let Some(OpenType {
        mut declaration,
        position,
        deferred_properties,
    }) = open.pop()
    else {
        return;
    };

    for tag in deferred_properties {
        let Some(name) = tag.name.as_deref() else {
            continue;
        };
        let property = declaration
            .members
            .iter_mut()
            .find(|m| m.kind.is_property() && m.name == name);
        match property {
            Some(member) => {
                if member.documentation.is_none() {
                    member.documentation = Some(summary_only(tag.value.clone()));
                }
            }
            None => {
                let mismatch = Mismatch {
                    kind: MismatchKind::UnknownProperty,
                    name: Some(name.to_string()),
                    message: format!("documented property `{}` is not declared in `{}`", name, declaration.name),
                    description: Some(tag.value.clone()),
                };
                sink.report(DiagnosticKind::DocMismatch, position, mismatch.message.clone());
                declaration.mismatches.push(mismatch);
            }
        }
    }

    attach(open, roots, declaration);
}

fn report(declaration: &Declaration, position: Position, sink: &mut DiagnosticSink) {
    for mismatch in &declaration.mismatches {
        sink.report(DiagnosticKind::DocMismatch, position, mismatch.message.clone());
    }
}

/// Mismatch collection for one declaration
struct Checks {
    name: String,
    mismatches: Vec<Mismatch>,
}

impl Checks {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            mismatches: Vec::new(),
        }
    }

    fn push(&mut self, kind: MismatchKind, name: Option<&str>, message: String, description: Option<&str>) {
        self.mismatches.push(Mismatch {
            kind,
            name: name.map(|n| n.to_string()),
            message,
            description: description.map(|d| d.to_string()),
        });
    }

    /// Marker names may be qualified (`Rectangle::area`); compare the last segment
    fn marker(&mut self, doc: &Documentation) {
        let Some(marker) = doc.marker() else {
            return;
        };
        let Some(named) = marker.name.as_deref() else {
            return;
        };
        let last = named.rsplit(|c| c == '.' || c == ':').next().unwrap_or(named);
        if last != self.name {
            let message = format!("`{}: {}` heads the comment of `{}`", marker.value, named, self.name);
            self.push(MismatchKind::NameMismatch, Some(named), message, None);
        }
    }

    /// Set match of `@param` names against `signature`; `also_documented`
    /// names count as documented without being parameter tags
    fn parameters(&mut self, doc: &Documentation, signature: &[&str], also_documented: &[&str]) {
        let mut seen: HashSet<&str> = HashSet::new();
        for tag in doc.entries(TagKind::Param) {
            let Some(name) = tag.name.as_deref() else {
                let message = format!("parameter tag without a name on `{}`", self.name);
                self.push(MismatchKind::UnknownParameter, None, message, Some(&tag.value));
                continue;
            };
            if !seen.insert(name) {
                let message = format!("parameter `{}` of `{}` is documented more than once", name, self.name);
                self.push(MismatchKind::DuplicateParameter, Some(name), message, Some(&tag.value));
            } else if !signature.contains(&name) {
                let message = format!("documented parameter `{}` is not in the signature of `{}`", name, self.name);
                self.push(MismatchKind::UnknownParameter, Some(name), message, Some(&tag.value));
            }
        }

        for name in signature {
            if !seen.contains(name) && !also_documented.contains(name) {
                let message = format!("parameter `{}` of `{}` is not documented", name, self.name);
                self.push(MismatchKind::UndocumentedParameter, Some(*name), message, None);
            }
        }
    }

    fn unexpected_return(&mut self, doc: &Documentation) {
        if let Some(tag) = doc.returns() {
            let message = format!("`{}` documents a return value but returns nothing", self.name);
            self.push(MismatchKind::UnexpectedReturn, None, message, Some(&tag.value));
        }
    }

    fn unexpected_tags(&mut self, doc: &Documentation, kinds: &[TagKind]) {
        for kind in kinds {
            for tag in doc.entries(*kind) {
                let message = format!("{} tag does not apply to `{}`", tag_label(*kind), self.name);
                self.push(MismatchKind::UnexpectedTag, tag.name.as_deref(), message, Some(&tag.value));
            }
        }
    }

    fn into_mismatches(self) -> Vec<Mismatch> {
        self.mismatches
    }
}
