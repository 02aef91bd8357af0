// src/core/association.rs
//! Binds scanned comments to the declarations that follow them.

use tracing::debug;

use super::diagnostics::{DiagnosticKind, DiagnosticSink, Position};
use super::languages::LanguageAdapter;
use super::recognizer::DeclarationSkeleton;
use super::scanner::{Candidate, CommentBlock};

/// A recognized declaration and the comment documenting it, if any
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Associated {
    pub skeleton: DeclarationSkeleton,
    pub comment: Option<CommentBlock>,
    pub position: Position,
    pub depth: usize,
    pub in_static_scope: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Association {
    Declaration(Associated),
    /// A comment with no declaration after it
    Orphan(CommentBlock),
}

pub fn associate(
    adapter: &dyn LanguageAdapter,
    candidates: Vec<Candidate>,
    sink: &mut DiagnosticSink,
) -> Vec<Association> {
    let mut associations = Vec::with_capacity(candidates.len());

    for candidate in candidates {
        let Candidate {
            comment,
            signature,
            depth,
            in_static_scope,
        } = candidate;

        let recognized = signature.as_ref().and_then(|sig| {
            adapter
                .recognize_declaration(&sig.text)
                .map(|skeleton| (skeleton, sig.start))
        });

        match (recognized, comment) {
            (Some((skeleton, position)), comment) => {
                associations.push(Association::Declaration(Associated {
                    skeleton,
                    comment,
                    position,
                    depth,
                    in_static_scope,
                }));
            }
            (None, Some(comment)) => {
                let message = match &signature {
                    Some(sig) => format!(
                        "comment is followed by `{}`, which is not a declaration",
                        sig.text.lines().last().unwrap_or_default().trim()
                    ),
                    None => "comment is not followed by a declaration".to_string(),
                };
                sink.report(DiagnosticKind::OrphanedComment, comment.start, message);
                associations.push(Association::Orphan(comment));
            }
            (None, None) => {
                if let Some(sig) = signature {
                    debug!("Skipping unrecognized signature at line {}", sig.start.line);
                }
            }
        }
    }

    associations
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use crate::core::languages::{kotlin_adapter, swift_adapter};
    use crate::core::scanner::Scanner;

    fn run(adapter: &dyn LanguageAdapter, text: &str) -> (Vec<Association>, Vec<crate::core::Diagnostic>) {
        let mut sink = DiagnosticSink::new(Path::new("Sample.kt"));
        let candidates = Scanner::new(adapter, 3).scan(text, &mut sink);
        let associations = associate(adapter, candidates, &mut sink);
        (associations, sink.into_vec())
    }

    #[test]
    fn test_comments_pair_one_to_one() {
        let adapter = kotlin_adapter();
        let (associations, diagnostics) = run(
            &adapter,
            "/** A. */\nfun a() {}\n\nfun b() {}\n/** C. */\n@Inline\nval c = 1\n",
        );

        assert!(diagnostics.is_empty());
        let names: Vec<(&str, bool)> = associations
            .iter()
            .map(|a| match a {
                Association::Declaration(d) => (d.skeleton.name.as_str(), d.comment.is_some()),
                Association::Orphan(_) => ("<orphan>", true),
            })
            .collect();
        assert_eq!(names, vec![("a", true), ("b", false), ("c", true)]);
    }

    #[test]
    fn test_orphan_at_end_of_file() {
        let adapter = swift_adapter();
        let (associations, diagnostics) = run(&adapter, "/// Nothing follows.\n\n\n");

        assert_eq!(associations.len(), 1);
        assert!(matches!(associations[0], Association::Orphan(_)));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].kind, DiagnosticKind::OrphanedComment);
        assert_eq!(diagnostics[0].file_location.line, 1);
    }

    #[test]
    fn test_lookahead_window_exceeded() {
        let adapter = kotlin_adapter();
        let (associations, diagnostics) = run(
            &adapter,
            "/** Too far. */\n@A\n@B\n@C\n@D\nfun late() {}\n",
        );

        assert!(matches!(associations[0], Association::Orphan(_)));
        match &associations[1] {
            Association::Declaration(d) => {
                assert_eq!(d.skeleton.name, "late");
                assert!(d.comment.is_none());
            }
            other => panic!("expected declaration, got {:?}", other),
        }
        assert_eq!(diagnostics.len(), 1);
    }
}
