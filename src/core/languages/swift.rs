// src/core/languages/swift.rs
use crate::core::recognizer::Grammar;
use crate::core::tags::TagVocabulary;
use super::{words, CommentSyntax, TableAdapter};

/// Swift markup: `- Parameter x:` tags in `/** */` or `///` comments
pub fn swift_adapter() -> TableAdapter {
    let mut comments = CommentSyntax::c_family();
    comments.line_prefixes = words(&["///"]);

    let grammar = Grammar {
        type_keywords: words(&["class", "struct", "enum", "protocol", "extension", "actor"]),
        function_keywords: words(&["func"]),
        constructor_keywords: words(&["init"]),
        property_keywords: words(&["let", "var"]),
        modifier_keywords: words(&[
            "public", "private", "fileprivate", "internal", "open", "final", "override",
            "mutating", "nonmutating", "lazy", "weak", "unowned", "dynamic", "required",
            "convenience", "indirect", "nonisolated",
        ]),
        static_keywords: words(&["static"]),
        reserved_words: words(&[
            "return", "if", "guard", "for", "while", "repeat", "switch", "case", "import",
            "typealias", "deinit", "defer", "throw",
        ]),
        attribute_prefix: Some("@".to_string()),
        ..Grammar::default()
    };

    TableAdapter::new(
        "swift",
        &["swift"],
        comments,
        TagVocabulary::inline_dashes(),
        grammar,
    )
}
