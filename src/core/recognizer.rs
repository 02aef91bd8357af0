// src/core/recognizer.rs
//! Table-driven declaration recognition.
//!
//! A [`Grammar`] lists the keywords of a language; [`recognize`] reads the
//! signature text that follows a comment and extracts kind, name, modifiers
//! and parameter names. Types and default values are skipped, never modelled.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParameterStyle {
    /// `name: Type` (Kotlin, Swift)
    #[default]
    NameFirst,
    /// `Type name` (Java, C++)
    TypeFirst,
}

/// Keyword tables describing one language's declaration headers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Grammar {
    pub type_keywords: Vec<String>,
    pub function_keywords: Vec<String>,
    pub constructor_keywords: Vec<String>,
    pub property_keywords: Vec<String>,
    pub modifier_keywords: Vec<String>,
    /// Spellings that mark a static member; normalised to `static`
    pub static_keywords: Vec<String>,
    /// Parameter keywords that turn a primary-constructor parameter into a property
    pub promoting_keywords: Vec<String>,
    /// Headers opening a scope whose members are static (`companion object`)
    pub static_scopes: Vec<String>,
    /// Headers opening a scope that only groups declarations (`namespace`)
    pub container_scopes: Vec<String>,
    /// Statement keywords that never start a declaration
    pub reserved_words: Vec<String>,
    pub parameter_style: ParameterStyle,
    pub attribute_prefix: Option<String>,
}

fn has(list: &[String], word: &str) -> bool {
    list.iter().any(|w| w == word)
}

impl Grammar {
    fn is_modifier(&self, word: &str) -> bool {
        has(&self.modifier_keywords, word) || has(&self.static_keywords, word)
    }

    fn is_member_keyword(&self, word: &str) -> bool {
        has(&self.function_keywords, word) || has(&self.property_keywords, word)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationRole {
    Type,
    Callable,
    Property,
}

/// What the scanner should do with a line of code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass {
    Declaration(DeclarationRole),
    /// Attributes or modifiers on their own line, part of the next signature
    Attribute,
    /// Opens a scope of static members without declaring anything
    StaticScope,
    /// Opens a grouping scope without declaring anything
    ContainerScope,
    /// Skipped without ending a pending comment's lookahead
    Noise,
    Code,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkeletonKind {
    Type,
    Function,
    Constructor,
    Property,
}

impl SkeletonKind {
    pub fn role(self) -> DeclarationRole {
        match self {
            SkeletonKind::Type => DeclarationRole::Type,
            SkeletonKind::Function | SkeletonKind::Constructor => DeclarationRole::Callable,
            SkeletonKind::Property => DeclarationRole::Property,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParameter {
    pub name: String,
    pub modifiers: Vec<String>,
    /// Declared as a property in a primary constructor (`val`/`var`)
    pub promoted: bool,
}

/// A declaration as read from its signature, before documentation is attached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationSkeleton {
    pub kind: SkeletonKind,
    pub name: String,
    pub modifiers: Vec<String>,
    pub parameters: Vec<SignatureParameter>,
    /// Whether a parameter list was written (primary constructors)
    pub has_parameter_list: bool,
    /// `Some(false)` when the signature visibly returns nothing
    pub returns_value: Option<bool>,
    /// Further names declared by the same statement (`int width, height;`)
    pub declarators: Vec<String>,
}

impl DeclarationSkeleton {
    pub fn new(kind: SkeletonKind, name: &str, modifiers: Vec<String>) -> Self {
        Self {
            kind,
            name: name.to_string(),
            modifiers,
            parameters: Vec::new(),
            has_parameter_list: false,
            returns_value: None,
            declarators: Vec::new(),
        }
    }

    pub fn is_static(&self) -> bool {
        has(&self.modifiers, "static")
    }
}

pub fn classify(grammar: &Grammar, line: &str) -> LineClass {
    let text = strip_attributes(line.trim(), grammar.attribute_prefix.as_deref());
    if text.is_empty() {
        return LineClass::Attribute;
    }

    let mut rest = text;
    loop {
        if starts_with_words(rest, &grammar.static_scopes) {
            return LineClass::StaticScope;
        }
        if starts_with_words(rest, &grammar.container_scopes) {
            return LineClass::ContainerScope;
        }
        match next_word(rest) {
            Some((word, after)) if grammar.is_modifier(word) => rest = after,
            _ => break,
        }
    }
    if rest.trim().is_empty() {
        return LineClass::Attribute;
    }

    match recognize(grammar, text) {
        Some(skeleton) => LineClass::Declaration(skeleton.kind.role()),
        None => LineClass::Code,
    }
}

pub fn recognize(grammar: &Grammar, signature: &str) -> Option<DeclarationSkeleton> {
    let text = normalize(signature);
    let mut rest = strip_attributes(&text, grammar.attribute_prefix.as_deref());
    let mut modifiers: Vec<String> = Vec::new();

    while let Some((word, after)) = next_word(rest) {
        if has(&grammar.reserved_words, word) {
            return None;
        }
        if has(&grammar.type_keywords, word) {
            match next_word(after) {
                // `enum class`, `data class`
                Some((next, _)) if has(&grammar.type_keywords, next) => {
                    push_modifier(&mut modifiers, word);
                    rest = after;
                    continue;
                }
                // Swift `class func` / `class var` are type-level members
                Some((next, _)) if grammar.is_member_keyword(next) => {
                    push_modifier(&mut modifiers, "static");
                    rest = after;
                    continue;
                }
                _ => return recognize_type(grammar, after, modifiers),
            }
        }
        if has(&grammar.function_keywords, word) {
            return recognize_function(grammar, after, modifiers);
        }
        if has(&grammar.constructor_keywords, word) {
            return recognize_constructor(grammar, word, after, modifiers);
        }
        if has(&grammar.property_keywords, word) {
            return recognize_property(after, modifiers);
        }
        if has(&grammar.static_keywords, word) {
            push_modifier(&mut modifiers, "static");
        } else if has(&grammar.modifier_keywords, word) {
            push_modifier(&mut modifiers, word);
        } else {
            break;
        }
        rest = after;
    }

    match grammar.parameter_style {
        ParameterStyle::TypeFirst => recognize_type_first(grammar, rest, modifiers),
        ParameterStyle::NameFirst => None,
    }
}

fn push_modifier(modifiers: &mut Vec<String>, word: &str) {
    if !has(modifiers, word) {
        modifiers.push(word.to_string());
    }
}

fn recognize_type(grammar: &Grammar, text: &str, modifiers: Vec<String>) -> Option<DeclarationSkeleton> {
    let (name, mut rest) = next_word(text)?;
    rest = skip_generics(rest);

    // Kotlin `class Foo private constructor(...)`
    while let Some((word, after)) = next_word(rest) {
        if grammar.is_modifier(word) || has(&grammar.constructor_keywords, word) {
            rest = after;
        } else {
            break;
        }
    }

    let mut skeleton = DeclarationSkeleton::new(SkeletonKind::Type, name, modifiers);
    if let Some((inner, _)) = parenthesized(rest) {
        skeleton.parameters = parse_parameters(grammar, inner);
        skeleton.has_parameter_list = true;
    }
    Some(skeleton)
}

fn recognize_function(grammar: &Grammar, text: &str, modifiers: Vec<String>) -> Option<DeclarationSkeleton> {
    let (mut name, mut rest) = next_word(skip_generics(text))?;

    // Extension receivers: `fun String.shout()`, `fun List<T>.second()`
    loop {
        let after = skip_generics(rest);
        match after.strip_prefix('.').and_then(next_word) {
            Some((word, tail)) => {
                name = word;
                rest = tail;
            }
            None => {
                rest = after;
                break;
            }
        }
    }

    let (inner, tail) = parenthesized(rest)?;
    let mut skeleton = DeclarationSkeleton::new(SkeletonKind::Function, name, modifiers);
    skeleton.parameters = parse_parameters(grammar, inner);
    skeleton.has_parameter_list = true;
    skeleton.returns_value = Some(return_clause_has_value(tail));
    Some(skeleton)
}

fn recognize_constructor(
    grammar: &Grammar,
    keyword: &str,
    text: &str,
    modifiers: Vec<String>,
) -> Option<DeclarationSkeleton> {
    let rest = text.trim_start().trim_start_matches(|c| c == '?' || c == '!');
    let mut skeleton = DeclarationSkeleton::new(SkeletonKind::Constructor, keyword, modifiers);
    if let Some((inner, _)) = parenthesized(skip_generics(rest)) {
        skeleton.parameters = parse_parameters(grammar, inner);
        skeleton.has_parameter_list = true;
    }
    skeleton.returns_value = Some(false);
    Some(skeleton)
}

fn recognize_property(text: &str, modifiers: Vec<String>) -> Option<DeclarationSkeleton> {
    let (mut name, mut rest) = next_word(skip_generics(text))?;
    // Extension properties: `val String.size`
    while let Some((word, tail)) = skip_generics(rest).strip_prefix('.').and_then(next_word) {
        name = word;
        rest = tail;
    }
    Some(DeclarationSkeleton::new(SkeletonKind::Property, name, modifiers))
}

/// Java/C++ style headers without a declaring keyword
fn recognize_type_first(grammar: &Grammar, text: &str, modifiers: Vec<String>) -> Option<DeclarationSkeleton> {
    let text = skip_generics(text.trim_start()).trim_start();
    if !text.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        return None;
    }

    let paren = find_top_level(text, '(');
    let assign = find_top_level(text, '=');
    let is_call = match (paren, assign) {
        (Some(p), Some(a)) => p < a,
        (Some(_), None) => true,
        _ => false,
    };

    if is_call {
        let paren = paren?;
        let (head, tail) = text.split_at(paren);
        let (name, before) = last_identifier(head)?;
        if has(&grammar.reserved_words, name) {
            return None;
        }
        let return_type = before.trim();
        let (inner, _) = parenthesized(tail)?;

        let kind = if return_type.is_empty() {
            SkeletonKind::Constructor
        } else {
            SkeletonKind::Function
        };
        let mut skeleton = DeclarationSkeleton::new(kind, name, modifiers);
        skeleton.parameters = parse_parameters(grammar, inner);
        skeleton.has_parameter_list = true;
        skeleton.returns_value = Some(kind == SkeletonKind::Function && !is_void(return_type));
        return Some(skeleton);
    }

    let end = [find_top_level(text, ';'), find_top_level(text, '{')]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(text.len());
    let mut declarators = split_top_level(&text[..end], ',')
        .into_iter()
        .map(|d| cut_top_level(d, '=').trim());
    let (name, before) = last_identifier(declarators.next()?)?;
    if before.trim().is_empty() {
        return None;
    }
    let mut skeleton = DeclarationSkeleton::new(SkeletonKind::Property, name, modifiers);
    skeleton.declarators = declarators
        .filter_map(|d| last_identifier(d).map(|(name, _)| name.to_string()))
        .collect();
    Some(skeleton)
}

fn is_void(return_type: &str) -> bool {
    return_type
        .split_whitespace()
        .last()
        .map_or(false, |t| t == "void")
}

/// `: T`, `-> T` or `= expr` after the parameter list
fn return_clause_has_value(tail: &str) -> bool {
    let mut rest = tail.trim_start();
    while let Some((word, after)) = next_word(rest) {
        if matches!(word, "throws" | "rethrows" | "async") {
            rest = after.trim_start();
        } else {
            break;
        }
    }

    let return_type = if let Some(t) = rest.strip_prefix("->") {
        t
    } else if let Some(t) = rest.strip_prefix(':') {
        t
    } else {
        return rest.starts_with('=') && !rest.starts_with("==");
    };

    let return_type = return_type.trim_start();
    if return_type.starts_with("()") {
        return false;
    }
    match next_word(return_type) {
        Some((word, _)) => !matches!(word, "Unit" | "Void"),
        None => !return_type.is_empty(),
    }
}

pub fn parse_parameters(grammar: &Grammar, inner: &str) -> Vec<SignatureParameter> {
    split_top_level(inner, ',')
        .into_iter()
        .filter_map(|p| parse_parameter(grammar, p))
        .collect()
}

fn parse_parameter(grammar: &Grammar, text: &str) -> Option<SignatureParameter> {
    let text = strip_attributes(text.trim(), grammar.attribute_prefix.as_deref());
    let text = cut_top_level(text, '=').trim();
    if text.is_empty() {
        return None;
    }

    match grammar.parameter_style {
        ParameterStyle::NameFirst => {
            let head = cut_top_level(text, ':');
            let words: Vec<&str> = head
                .split_whitespace()
                .filter(|w| w.chars().all(is_identifier_char))
                .collect();
            let (name, modifiers) = words.split_last()?;
            Some(SignatureParameter {
                name: name.to_string(),
                modifiers: modifiers.iter().map(|m| m.to_string()).collect(),
                promoted: modifiers.iter().any(|m| has(&grammar.promoting_keywords, m)),
            })
        }
        ParameterStyle::TypeFirst => {
            if text == "void" || text == "..." {
                return None;
            }
            let (name, before) = last_identifier(text)?;
            let before = before.trim();
            if before.is_empty() || before.ends_with("::") {
                return None;
            }
            let modifiers = before
                .split_whitespace()
                .filter(|w| has(&grammar.modifier_keywords, w))
                .map(|w| w.to_string())
                .collect();
            Some(SignatureParameter {
                name: name.to_string(),
                modifiers,
                promoted: false,
            })
        }
    }
}

// ---- lexical helpers shared with adapters and the scanner ----

pub fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

/// Collapse a multi-line signature into one line
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Leading identifier and the text after it
pub fn next_word(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    let end = text.find(|c: char| !is_identifier_char(c)).unwrap_or(text.len());
    if end == 0 {
        return None;
    }
    Some((&text[..end], &text[end..]))
}

/// Trailing identifier (ignoring `[]` suffixes) and the text before it
pub fn last_identifier(text: &str) -> Option<(&str, &str)> {
    let mut text = text.trim_end();
    while let Some(stripped) = text.strip_suffix("[]") {
        text = stripped.trim_end();
    }
    let start = text
        .char_indices()
        .rev()
        .take_while(|(_, c)| is_identifier_char(*c))
        .last()
        .map(|(i, _)| i)?;
    let name = &text[start..];
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }
    Some((name, &text[..start]))
}

fn starts_with_words(text: &str, prefixes: &[String]) -> bool {
    let text = normalize(text);
    prefixes.iter().any(|p| {
        text.strip_prefix(p.as_str())
            .map_or(false, |rest| !rest.starts_with(is_identifier_char))
    })
}

/// Remove leading `@Attr` / `@Attr(...)` annotations
pub fn strip_attributes<'a>(text: &'a str, prefix: Option<&str>) -> &'a str {
    let Some(prefix) = prefix.filter(|p| !p.is_empty()) else {
        return text.trim();
    };
    let mut rest = text.trim_start();
    while let Some(after) = rest.strip_prefix(prefix) {
        let name_len = after
            .find(|c: char| !(is_identifier_char(c) || c == '.'))
            .unwrap_or(after.len());
        if name_len == 0 {
            break;
        }
        rest = &after[name_len..];
        if rest.starts_with('(') {
            rest = match parenthesized(rest) {
                Some((_, tail)) => tail,
                None => "",
            };
        }
        rest = rest.trim_start();
    }
    rest.trim_end()
}

/// Skip a `<...>` generic clause at the start of `text`
pub fn skip_generics(text: &str) -> &str {
    let trimmed = text.trim_start();
    if !trimmed.starts_with('<') {
        return text;
    }
    let mut depth = 0usize;
    for (i, c) in trimmed.char_indices() {
        match c {
            '<' => depth += 1,
            '>' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return &trimmed[i + 1..];
                }
            }
            _ => {}
        }
    }
    ""
}

/// Contents of a leading `( ... )` and the text after it. An unclosed list
/// runs to the end of the text so single header lines still recognize.
pub fn parenthesized(text: &str) -> Option<(&str, &str)> {
    let trimmed = text.trim_start();
    let body = trimmed.strip_prefix('(')?;
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    let mut prev = '\0';
    for (i, c) in body.char_indices() {
        if let Some(q) = quote {
            if c == q && prev != '\\' {
                quote = None;
            }
        } else {
            match c {
                '"' | '\'' => quote = Some(c),
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some((&body[..i], &body[i + 1..]));
                    }
                }
                _ => {}
            }
        }
        prev = c;
    }
    Some((body, ""))
}

/// Split on `sep` outside brackets, generics and string literals
pub fn split_top_level(text: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut prev = '\0';
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q && prev != '\\' {
                quote = None;
            }
        } else {
            match c {
                '"' | '\'' => quote = Some(c),
                '(' | '[' | '{' | '<' => depth += 1,
                '>' if prev == '-' => {}
                ')' | ']' | '}' | '>' => depth = depth.saturating_sub(1),
                c if c == sep && depth == 0 => {
                    parts.push(text[start..i].trim());
                    start = i + c.len_utf8();
                }
                _ => {}
            }
        }
        prev = c;
    }
    let last = text[start..].trim();
    if !last.is_empty() || !parts.is_empty() {
        parts.push(last);
    }
    parts
}

fn find_top_level(text: &str, target: char) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut prev = '\0';
    for (i, c) in text.char_indices() {
        if let Some(q) = quote {
            if c == q && prev != '\\' {
                quote = None;
            }
        } else if c == target && depth == 0 {
            return Some(i);
        } else {
            match c {
                '"' | '\'' => quote = Some(c),
                '(' | '[' | '{' | '<' => depth += 1,
                '>' if prev == '-' => {}
                ')' | ']' | '}' | '>' => depth = depth.saturating_sub(1),
                _ => {}
            }
        }
        prev = c;
    }
    None
}

fn cut_top_level(text: &str, target: char) -> &str {
    match find_top_level(text, target) {
        Some(i) => &text[..i],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn name_first() -> Grammar {
        Grammar {
            type_keywords: words(&["class", "interface", "object", "struct"]),
            function_keywords: words(&["fun", "func"]),
            constructor_keywords: words(&["constructor", "init"]),
            property_keywords: words(&["val", "var", "let"]),
            modifier_keywords: words(&["public", "private", "data", "enum", "override", "companion"]),
            static_keywords: words(&["static"]),
            promoting_keywords: words(&["val", "var"]),
            static_scopes: words(&["companion object"]),
            attribute_prefix: Some("@".to_string()),
            ..Grammar::default()
        }
    }

    fn type_first() -> Grammar {
        Grammar {
            type_keywords: words(&["class", "interface", "enum", "record"]),
            modifier_keywords: words(&["public", "private", "protected", "final", "abstract"]),
            static_keywords: words(&["static"]),
            reserved_words: words(&["return", "package", "import", "if", "new"]),
            parameter_style: ParameterStyle::TypeFirst,
            attribute_prefix: Some("@".to_string()),
            ..Grammar::default()
        }
    }

    #[test]
    fn test_kotlin_class_with_primary_constructor() {
        let skeleton = recognize(&name_first(), "class Foo(private val prop: String, count: Int = 3) {").unwrap();

        assert_eq!(skeleton.kind, SkeletonKind::Type);
        assert_eq!(skeleton.name, "Foo");
        assert!(skeleton.has_parameter_list);
        assert_eq!(skeleton.parameters.len(), 2);
        assert_eq!(skeleton.parameters[0].name, "prop");
        assert!(skeleton.parameters[0].promoted);
        assert_eq!(skeleton.parameters[0].modifiers, words(&["private", "val"]));
        assert_eq!(skeleton.parameters[1].name, "count");
        assert!(!skeleton.parameters[1].promoted);
    }

    #[test]
    fn test_function_headers() {
        let kotlin = recognize(&name_first(), "fun method1(arg: String): Int {").unwrap();
        assert_eq!(kotlin.kind, SkeletonKind::Function);
        assert_eq!(kotlin.name, "method1");
        assert_eq!(kotlin.parameters[0].name, "arg");
        assert_eq!(kotlin.returns_value, Some(true));

        let swift = recognize(&name_first(), "public static func staticMethod(_ value: String) -> Bar {").unwrap();
        assert_eq!(swift.name, "staticMethod");
        assert_eq!(swift.modifiers, words(&["public", "static"]));
        assert_eq!(swift.parameters[0].name, "value");
        assert_eq!(swift.returns_value, Some(true));

        let unit = recognize(&name_first(), "fun method1A() {").unwrap();
        assert_eq!(unit.returns_value, Some(false));
        assert!(unit.parameters.is_empty());
    }

    #[test]
    fn test_multi_line_signature_and_generics() {
        let skeleton = recognize(
            &name_first(),
            "fun <T> List<T>.chunk(\n    size: Int,\n    transform: (List<T>) -> Unit = {},\n): List<List<T>>",
        )
        .unwrap();

        assert_eq!(skeleton.name, "chunk");
        let names: Vec<_> = skeleton.parameters.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["size", "transform"]);
        assert_eq!(skeleton.returns_value, Some(true));
    }

    #[test]
    fn test_swift_class_func_is_static() {
        let skeleton = recognize(&name_first(), "class func make() -> Self").unwrap();
        assert_eq!(skeleton.kind, SkeletonKind::Function);
        assert!(skeleton.is_static());
    }

    #[test]
    fn test_properties_and_attributes() {
        let skeleton = recognize(&name_first(), "@JvmStatic public static let STATIC_PROP = \"x\"").unwrap();
        assert_eq!(skeleton.kind, SkeletonKind::Property);
        assert_eq!(skeleton.name, "STATIC_PROP");
        assert!(skeleton.is_static());
    }

    #[test]
    fn test_type_first_headers() {
        let grammar = type_first();

        let method = recognize(&grammar, "public static int area(int width, final int height) {").unwrap();
        assert_eq!(method.kind, SkeletonKind::Function);
        assert_eq!(method.name, "area");
        assert!(method.is_static());
        assert_eq!(method.returns_value, Some(true));
        assert_eq!(method.parameters[1].name, "height");

        let void = recognize(&grammar, "void set_values(int width, int height);").unwrap();
        assert_eq!(void.returns_value, Some(false));

        let ctor = recognize(&grammar, "public Rectangle(int w) {").unwrap();
        assert_eq!(ctor.kind, SkeletonKind::Constructor);
        assert_eq!(ctor.name, "Rectangle");

        let field = recognize(&grammar, "private Map<String, Integer> counts = new HashMap<>();").unwrap();
        assert_eq!(field.kind, SkeletonKind::Property);
        assert_eq!(field.name, "counts");
        assert!(field.declarators.is_empty());

        let several = recognize(&grammar, "private int low = 1, high = clamp(a, b), step;").unwrap();
        assert_eq!(several.name, "low");
        assert_eq!(several.declarators, vec!["high".to_string(), "step".to_string()]);

        let generic = recognize(&grammar, "public <T> List<T> wrap(T item, String... rest)").unwrap();
        assert_eq!(generic.name, "wrap");
        assert_eq!(generic.parameters[1].name, "rest");
    }

    #[test]
    fn test_statements_are_not_declarations() {
        let grammar = type_first();
        assert!(recognize(&grammar, "return width * height;").is_none());
        assert!(recognize(&grammar, "package com.example;").is_none());
        assert!(recognize(&grammar, "width = 3;").is_none());
        assert!(recognize(&name_first(), "println(value)").is_none());
    }

    #[test]
    fn test_classify_lines() {
        let grammar = name_first();
        assert_eq!(classify(&grammar, "@Deprecated(\"old\")"), LineClass::Attribute);
        assert_eq!(classify(&grammar, "public"), LineClass::Attribute);
        assert_eq!(classify(&grammar, "companion object {"), LineClass::StaticScope);
        assert_eq!(classify(&grammar, "class Foo {"), LineClass::Declaration(DeclarationRole::Type));
        assert_eq!(classify(&grammar, "fun go(a: Int,"), LineClass::Declaration(DeclarationRole::Callable));
        assert_eq!(classify(&grammar, "val x = 1"), LineClass::Declaration(DeclarationRole::Property));
        assert_eq!(classify(&grammar, "x = 1"), LineClass::Code);
    }

    #[test]
    fn test_split_top_level_respects_nesting() {
        assert_eq!(
            split_top_level("a: Map<K, V>, b: (Int, Int) -> Unit, c: String = \"x,y\"", ','),
            vec!["a: Map<K, V>", "b: (Int, Int) -> Unit", "c: String = \"x,y\""]
        );
        assert!(split_top_level("", ',').is_empty());
    }
}
