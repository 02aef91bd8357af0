// src/core/languages/java.rs
use crate::core::recognizer::{Grammar, ParameterStyle};
use crate::core::tags::TagVocabulary;
use super::{words, CommentSyntax, Nesting, TableAdapter};

/// Javadoc over Java declarations
pub fn java_adapter() -> TableAdapter {
    let mut comments = CommentSyntax::c_family();
    comments.nesting = Nesting::Forbidden;

    let grammar = Grammar {
        type_keywords: words(&["class", "interface", "enum", "record"]),
        modifier_keywords: words(&[
            "public", "private", "protected", "abstract", "final", "native", "synchronized",
            "transient", "volatile", "strictfp", "default", "sealed", "non-sealed",
        ]),
        static_keywords: words(&["static"]),
        reserved_words: words(&[
            "return", "package", "import", "if", "else", "for", "while", "do", "switch", "case",
            "try", "catch", "finally", "throw", "new", "this", "super", "assert", "break",
            "continue", "yield",
        ]),
        parameter_style: ParameterStyle::TypeFirst,
        attribute_prefix: Some("@".to_string()),
        ..Grammar::default()
    };

    TableAdapter::new(
        "java",
        &["java"],
        comments,
        TagVocabulary::block_tags(),
        grammar,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::languages::LanguageAdapter;
    use crate::core::recognizer::{LineClass, SkeletonKind};

    #[test]
    fn test_java_declarations() {
        let adapter = java_adapter();

        let class = adapter
            .recognize_declaration("public final class Shapes<T extends Shape> implements Comparable<T> {")
            .unwrap();
        assert_eq!(class.kind, SkeletonKind::Type);
        assert_eq!(class.name, "Shapes");

        let method = adapter
            .recognize_declaration("@Override\npublic static double area(final Shape shape) throws IOException {")
            .unwrap();
        assert_eq!(method.name, "area");
        assert!(method.is_static());
        assert_eq!(method.parameters[0].name, "shape");
    }

    #[test]
    fn test_java_statements() {
        let adapter = java_adapter();

        assert_eq!(adapter.classify_line("import java.util.List;"), LineClass::Code);
        assert_eq!(adapter.classify_line("@Deprecated"), LineClass::Attribute);
        assert_eq!(adapter.classify_line("this.width = width;"), LineClass::Code);
        assert_eq!(adapter.comment_syntax().nesting, Nesting::Forbidden);
    }
}
