// src/core/languages/kotlin.rs
use crate::core::recognizer::Grammar;
use crate::core::tags::TagVocabulary;
use super::{words, CommentSyntax, TableAdapter};

/// KDoc comments over Kotlin declarations
pub fn kotlin_adapter() -> TableAdapter {
    let grammar = Grammar {
        type_keywords: words(&["class", "interface", "object"]),
        function_keywords: words(&["fun"]),
        constructor_keywords: words(&["constructor"]),
        property_keywords: words(&["val", "var"]),
        modifier_keywords: words(&[
            "public", "private", "protected", "internal", "open", "abstract", "final", "override",
            "data", "enum", "sealed", "inner", "annotation", "value", "inline", "suspend",
            "operator", "infix", "tailrec", "external", "lateinit", "const", "companion",
            "expect", "actual",
        ]),
        promoting_keywords: words(&["val", "var"]),
        static_scopes: words(&["companion object"]),
        reserved_words: words(&[
            "return", "if", "else", "when", "for", "while", "do", "try", "catch", "throw",
            "package", "import", "typealias", "init",
        ]),
        attribute_prefix: Some("@".to_string()),
        ..Grammar::default()
    };

    TableAdapter::new(
        "kotlin",
        &["kt", "kts"],
        CommentSyntax::c_family(),
        TagVocabulary::block_tags(),
        grammar,
    )
}
