// src/core/languages/cpp.rs
//! C++ headers and sources.
//!
//! C++ declarations carry templates, qualified names, destructors and
//! operators that the keyword tables cannot express, so this adapter
//! rewrites signatures before handing them to the shared recognizer.

use std::sync::LazyLock;
use regex::Regex;

use crate::core::recognizer::{
    self, is_identifier_char, normalize, parenthesized, skip_generics, DeclarationSkeleton, Grammar,
    LineClass, ParameterStyle, SkeletonKind,
};
use crate::core::tags::TagVocabulary;
use super::{words, CommentSyntax, LanguageAdapter};

static ACCESS_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:public|private|protected|signals)(?:\s+(?:slots|Q_SLOTS))?\s*:$").unwrap()
});

/// `Outer::Inner::name(` → `name(`
static QUALIFIED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\b\w+::)+(~?\w+\s*\()").unwrap());

static OPERATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\boperator\b").unwrap());

pub struct CppAdapter {
    extensions: Vec<String>,
    comments: CommentSyntax,
    vocabulary: TagVocabulary,
    grammar: Grammar,
}

impl CppAdapter {
    pub fn new() -> Self {
        let mut comments = CommentSyntax::c_family();
        comments.line_prefixes = words(&["///", "//"]);

        let grammar = Grammar {
            type_keywords: words(&["class", "struct", "union", "enum"]),
            modifier_keywords: words(&[
                "public", "private", "protected", "virtual", "inline", "explicit", "constexpr",
                "consteval", "const", "extern", "mutable", "friend", "typename",
            ]),
            static_keywords: words(&["static"]),
            container_scopes: words(&["namespace", "extern \"C\""]),
            reserved_words: words(&[
                "return", "if", "else", "for", "while", "do", "switch", "case", "using", "typedef",
                "delete", "new", "throw", "goto", "break", "continue", "co_return",
            ]),
            parameter_style: ParameterStyle::TypeFirst,
            ..Grammar::default()
        };

        Self {
            extensions: words(&["h", "hh", "hpp", "hxx", "cc", "cpp", "cxx"]),
            comments,
            vocabulary: TagVocabulary::block_tags(),
            grammar,
        }
    }

    /// Destructors and operators, whose names are not plain identifiers
    fn special_member(&self, text: &str) -> Option<DeclarationSkeleton> {
        if let Some(found) = OPERATOR.find(text) {
            let after = text[found.end()..].trim_start();
            let symbol_len = if after.starts_with("()") { 2 } else { after.find('(')? };
            let symbol = after[..symbol_len].trim();
            let name = if symbol.starts_with(is_identifier_char) {
                format!("operator {}", symbol)
            } else {
                format!("operator{}", symbol)
            };
            let before = &text[..found.start()];
            return Some(self.callable(&name, before, &after[symbol_len..], true));
        }

        let paren = text.find('(')?;
        let tilde = text[..paren].find('~')?;
        let ident = text[tilde + 1..paren].trim();
        if ident.is_empty() || !ident.chars().all(is_identifier_char) {
            return None;
        }
        Some(self.callable(&format!("~{}", ident), &text[..tilde], &text[paren..], false))
    }

    fn callable(&self, name: &str, before: &str, params: &str, may_return: bool) -> DeclarationSkeleton {
        let mut modifiers: Vec<String> = Vec::new();
        let mut return_type: Vec<&str> = Vec::new();
        for word in before.split_whitespace() {
            let modifier = if self.grammar.static_keywords.iter().any(|k| k == word) {
                Some("static")
            } else if self.grammar.modifier_keywords.iter().any(|k| k == word) {
                Some(word)
            } else {
                None
            };
            match modifier {
                Some(m) if !modifiers.iter().any(|existing| existing == m) => modifiers.push(m.to_string()),
                Some(_) => {}
                None => return_type.push(word),
            }
        }

        let mut skeleton = DeclarationSkeleton::new(SkeletonKind::Function, name, modifiers);
        if let Some((inner, _)) = parenthesized(params) {
            skeleton.parameters = recognizer::parse_parameters(&self.grammar, inner);
            skeleton.has_parameter_list = true;
        }
        // Conversion operators have no written return type but still return
        let returns = may_return && return_type.last().map_or(true, |t| *t != "void");
        skeleton.returns_value = Some(returns);
        skeleton
    }
}

impl Default for CppAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop `template <...>` prefixes, `[[attributes]]` and name qualifiers
fn prepare(text: &str) -> String {
    let mut rest = text.trim();
    loop {
        if let Some(after) = rest.strip_prefix("template") {
            if after.trim_start().starts_with('<') {
                rest = skip_generics(after).trim_start();
                continue;
            }
        }
        if let Some(after) = rest.strip_prefix("[[") {
            match after.find("]]") {
                Some(end) => {
                    rest = after[end + 2..].trim_start();
                    continue;
                }
                None => return String::new(),
            }
        }
        break;
    }
    QUALIFIED.replace_all(rest, "$1").into_owned()
}

impl LanguageAdapter for CppAdapter {
    fn language_id(&self) -> &str {
        "cpp"
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

    fn classify_line(&self, line: &str) -> LineClass {
        let text = prepare(line);
        if text.is_empty() {
            return LineClass::Attribute;
        }
        if ACCESS_LABEL.is_match(&text) {
            return LineClass::Noise;
        }
        match recognizer::classify(&self.grammar, &text) {
            LineClass::Declaration(_) | LineClass::Code => match self.recognize_declaration(&text) {
                Some(skeleton) => LineClass::Declaration(skeleton.kind.role()),
                None => LineClass::Code,
            },
            other => other,
        }
    }

    fn recognize_declaration(&self, signature: &str) -> Option<DeclarationSkeleton> {
        let text = prepare(&normalize(signature));
        if let Some(skeleton) = self.special_member(&text) {
            return Some(skeleton);
        }
        recognizer::recognize(&self.grammar, &text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_members() {
        let adapter = CppAdapter::new();

        let setter = adapter.recognize_declaration("void set_values(int width, int height);").unwrap();
        assert_eq!(setter.name, "set_values");
        assert_eq!(setter.returns_value, Some(false));
        let names: Vec<_> = setter.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["width", "height"]);

        let area = adapter.recognize_declaration("int area() {return width*height;}").unwrap();
        assert_eq!(area.name, "area");
        assert_eq!(area.returns_value, Some(true));

        let fields = adapter.recognize_declaration("int width, height;").unwrap();
        assert_eq!(fields.kind, SkeletonKind::Property);
        assert_eq!(fields.name, "width");
        assert_eq!(fields.declarators, vec!["height".to_string()]);
    }

    #[test]
    fn test_qualified_names_and_templates() {
        let adapter = CppAdapter::new();

        let ctor = adapter.recognize_declaration("Rectangle::Rectangle(int w, int h) : width(w) {").unwrap();
        assert_eq!(ctor.kind, SkeletonKind::Constructor);
        assert_eq!(ctor.name, "Rectangle");

        let method = adapter.recognize_declaration("std::string shapes::Rectangle::describe() const").unwrap();
        assert_eq!(method.name, "describe");

        let generic = adapter
            .recognize_declaration("template <typename T>\n[[nodiscard]] static T clamp(T value, T lo, T hi);")
            .unwrap();
        assert_eq!(generic.name, "clamp");
        assert!(generic.is_static());
        assert_eq!(generic.parameters.len(), 3);
    }

    #[test]
    fn test_destructors_and_operators() {
        let adapter = CppAdapter::new();

        let dtor = adapter.recognize_declaration("virtual ~Rectangle();").unwrap();
        assert_eq!(dtor.name, "~Rectangle");
        assert_eq!(dtor.modifiers, vec!["virtual".to_string()]);
        assert_eq!(dtor.returns_value, Some(false));

        let eq = adapter.recognize_declaration("bool operator==(const Rectangle& other) const;").unwrap();
        assert_eq!(eq.name, "operator==");
        assert_eq!(eq.parameters[0].name, "other");
        assert_eq!(eq.returns_value, Some(true));

        let call = adapter.recognize_declaration("int operator()(int x) const").unwrap();
        assert_eq!(call.name, "operator()");

        let conversion = adapter.recognize_declaration("explicit operator bool() const").unwrap();
        assert_eq!(conversion.name, "operator bool");
        assert_eq!(conversion.returns_value, Some(true));
    }

    #[test]
    fn test_line_classes() {
        let adapter = CppAdapter::new();

        assert_eq!(adapter.classify_line("  public:"), LineClass::Noise);
        assert_eq!(adapter.classify_line("template <typename T>"), LineClass::Attribute);
        assert_eq!(adapter.classify_line("namespace shapes {"), LineClass::ContainerScope);
        assert_eq!(adapter.classify_line("#include <string>"), LineClass::Code);
        assert_eq!(adapter.classify_line("return width * height;"), LineClass::Code);
        assert_eq!(
            adapter.classify_line("~Rectangle();"),
            LineClass::Declaration(crate::core::recognizer::DeclarationRole::Callable)
        );
    }
}
