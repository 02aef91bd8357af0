// src/core/scanner.rs
//! Single-pass lexical scanner.
//!
//! Walks a file line by line, collecting documentation comments and the
//! signature text of the declaration that follows each one. Brace scopes are
//! tracked so that function bodies are skipped and nesting depth is known.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::diagnostics::{DiagnosticKind, DiagnosticSink, Position};
use super::languages::{LanguageAdapter, Nesting};
use super::recognizer::{DeclarationRole, LineClass};
use super::tags::{detect_style, TagStyle};

/// Longest signature, in lines, the scanner follows past its first line
const MAX_SIGNATURE_LINES: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentForm {
    Block,
    Line,
}

/// One documentation comment, delimiters removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    pub text: String,
    pub start: Position,
    pub end: Position,
    pub style: TagStyle,
    pub form: CommentForm,
}

/// Raw declaration header text and where it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub text: String,
    pub start: Position,
    pub role: DeclarationRole,
}

/// A comment, a declaration, or a comment followed by its declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub comment: Option<CommentBlock>,
    pub signature: Option<Signature>,
    /// Number of enclosing type scopes
    pub depth: usize,
    /// Inside a scope whose members are static
    pub in_static_scope: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Type,
    Static,
    Container,
    Body,
}

#[derive(Debug, Default)]
struct LexState {
    in_plain_comment: bool,
    in_raw_string: bool,
}

pub struct Scanner<'a> {
    adapter: &'a dyn LanguageAdapter,
    lookahead: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(adapter: &'a dyn LanguageAdapter, lookahead: usize) -> Self {
        Self { adapter, lookahead }
    }

    pub fn scan(&self, text: &str, sink: &mut DiagnosticSink) -> Vec<Candidate> {
        let mut scan = Scan {
            adapter: self.adapter,
            lookahead: self.lookahead,
            lines: text.lines().collect(),
            scopes: Vec::new(),
            next_open: None,
            lex: LexState::default(),
            pending: None,
            attributes: Vec::new(),
            candidates: Vec::new(),
        };

        let mut i = 0;
        while i < scan.lines.len() {
            i = scan.step(i, sink);
        }
        scan.orphan_pending();

        debug!(
            "Scanned {} lines into {} candidates",
            scan.lines.len(),
            scan.candidates.len()
        );
        scan.candidates
    }
}

struct Scan<'a, 't> {
    adapter: &'a dyn LanguageAdapter,
    lookahead: usize,
    lines: Vec<&'t str>,
    scopes: Vec<Scope>,
    /// Scope kind the next `{` opens
    next_open: Option<Scope>,
    lex: LexState,
    pending: Option<CommentBlock>,
    attributes: Vec<&'t str>,
    candidates: Vec<Candidate>,
}

impl<'a, 't> Scan<'a, 't> {
    /// Process the line at `i`, returning the index of the next unread line
    fn step(&mut self, i: usize, sink: &mut DiagnosticSink) -> usize {
        let line = self.lines[i];
        if self.lex.in_plain_comment || self.lex.in_raw_string {
            self.apply_structure(line);
            return i + 1;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            return i + 1;
        }

        let syntax = self.adapter.comment_syntax();
        if let Some(block) = &syntax.block {
            // `/**/` is an empty ordinary comment, not documentation
            let empty_plain = block
                .open
                .strip_suffix('*')
                .map(|open| format!("{}{}", open, block.close));
            let is_empty_plain = empty_plain.map_or(false, |e| trimmed.starts_with(e.as_str()));
            if trimmed.starts_with(block.open.as_str()) && !is_empty_plain {
                return self.block_comment(i, sink);
            }
        }
        if self.doc_line_prefix(trimmed).is_some() {
            return self.line_comments(i);
        }
        if let Some(prefix) = &syntax.plain_line {
            if trimmed.starts_with(prefix.as_str()) {
                return i + 1;
            }
        }
        if let Some((open, _)) = &syntax.plain_block {
            if trimmed.starts_with(open.as_str()) {
                self.apply_structure(trimmed);
                return i + 1;
            }
        }

        self.code_line(i, trimmed)
    }

    fn block_comment(&mut self, i: usize, sink: &mut DiagnosticSink) -> usize {
        let adapter = self.adapter;
        let Some(block) = adapter.comment_syntax().block.as_ref() else {
            return i + 1;
        };

        let line = self.lines[i];
        let open_at = line.find(block.open.as_str()).unwrap_or(0);
        let start = Position::new(i + 1, column_of(line, open_at));
        let mut body: Vec<&str> = Vec::new();
        let mut segment: &'t str = &line[open_at + block.open.len()..];
        let mut j = i;

        loop {
            if let Some(close_at) = segment.find(block.close.as_str()) {
                let content = &segment[..close_at];
                self.check_nesting(content, j, sink);
                body.push(content);

                let rest: &'t str = &segment[close_at + block.close.len()..];
                let end = Position::new(j + 1, column_of(self.lines[j], self.lines[j].len() - rest.len()));
                let text = body.join("\n");
                let comment = CommentBlock {
                    style: detect_style(&text),
                    text,
                    start,
                    end,
                    form: CommentForm::Block,
                };
                self.accept_comment(comment);

                let rest = rest.trim();
                if rest.is_empty() {
                    return j + 1;
                }
                return self.code_line(j, rest);
            }

            self.check_nesting(segment, j, sink);
            body.push(segment);
            j += 1;
            if j >= self.lines.len() {
                sink.report(
                    DiagnosticKind::MalformedComment,
                    start,
                    format!("unterminated comment: missing `{}`", block.close),
                );
                return i + 1;
            }
            segment = self.lines[j];
        }
    }

    fn check_nesting(&self, content: &str, j: usize, sink: &mut DiagnosticSink) {
        let syntax = self.adapter.comment_syntax();
        if syntax.nesting != Nesting::Forbidden {
            return;
        }
        let opener = syntax
            .plain_block
            .as_ref()
            .map(|(open, _)| open.as_str())
            .or_else(|| syntax.block.as_ref().map(|b| b.open.as_str()));
        if let Some(at) = opener.and_then(|open| content.find(open)) {
            sink.report(
                DiagnosticKind::UnsupportedSyntax,
                Position::new(j + 1, column_of(self.lines[j], at)),
                "nested comments are not supported; the first close delimiter ends the comment",
            );
        }
    }

    fn doc_line_prefix(&self, trimmed: &str) -> Option<&'a str> {
        self.adapter
            .comment_syntax()
            .line_prefixes
            .iter()
            .filter(|p| trimmed.starts_with(p.as_str()))
            .max_by_key(|p| p.len())
            .map(|p| p.as_str())
    }

    fn line_comments(&mut self, i: usize) -> usize {
        let mut body = Vec::new();
        let mut j = i;
        while j < self.lines.len() {
            let trimmed = self.lines[j].trim();
            match self.doc_line_prefix(trimmed) {
                Some(prefix) => body.push(&trimmed[prefix.len()..]),
                None => break,
            }
            j += 1;
        }

        let first = self.lines[i];
        let last = self.lines[j - 1];
        let text = body.join("\n");
        let comment = CommentBlock {
            style: detect_style(&text),
            text,
            start: Position::new(i + 1, column_of(first, first.len() - first.trim_start().len())),
            end: Position::new(j, column_of(last, last.trim_end().len())),
            form: CommentForm::Line,
        };
        self.accept_comment(comment);
        j
    }

    fn accept_comment(&mut self, comment: CommentBlock) {
        if self.in_body() {
            return;
        }
        self.orphan_pending();
        self.attributes.clear();
        self.pending = Some(comment);
    }

    fn code_line(&mut self, i: usize, trimmed: &'t str) -> usize {
        if !trimmed.starts_with('{') {
            self.next_open = None;
        }
        if self.in_body() {
            self.apply_structure(trimmed);
            return i + 1;
        }

        match self.adapter.classify_line(trimmed) {
            LineClass::Declaration(role) => return self.declaration(i, trimmed, role),
            LineClass::Attribute => {
                self.attributes.push(trimmed);
                if self.attributes.len() > self.lookahead {
                    self.orphan_pending();
                    self.attributes.remove(0);
                }
            }
            LineClass::Noise => {}
            LineClass::StaticScope => {
                self.orphan_pending();
                self.attributes.clear();
                self.next_open = Some(Scope::Static);
            }
            LineClass::ContainerScope => {
                self.orphan_pending();
                self.attributes.clear();
                self.next_open = Some(Scope::Container);
            }
            LineClass::Code => {
                self.orphan_pending();
                self.attributes.clear();
            }
        }
        self.apply_structure(trimmed);
        i + 1
    }

    fn declaration(&mut self, i: usize, first: &'t str, role: DeclarationRole) -> usize {
        let mut text = String::new();
        for attribute in self.attributes.drain(..) {
            text.push_str(attribute);
            text.push('\n');
        }
        text.push_str(first);

        let mut consumed = vec![first];
        let mut j = i;
        while paren_balance(&text) > 0 && j + 1 < self.lines.len() && j - i < MAX_SIGNATURE_LINES {
            let last = consumed.last().map_or("", |l| l.trim_end());
            let next = self.lines[j + 1].trim();
            if last.ends_with(';') || last.ends_with('{') || self.starts_comment(next) {
                break;
            }
            j += 1;
            text.push('\n');
            text.push_str(next);
            consumed.push(next);
        }

        let line = self.lines[i];
        let candidate = Candidate {
            comment: self.pending.take(),
            signature: Some(Signature {
                text,
                start: Position::new(i + 1, column_of(line, line.len() - line.trim_start().len())),
                role,
            }),
            depth: self.depth(),
            in_static_scope: self.in_static_scope(),
        };
        self.candidates.push(candidate);

        self.next_open = Some(match role {
            DeclarationRole::Type => Scope::Type,
            DeclarationRole::Callable | DeclarationRole::Property => Scope::Body,
        });
        for part in consumed {
            self.apply_structure(part);
        }
        j + 1
    }

    /// Any comment form, documentation or not
    fn starts_comment(&self, trimmed: &str) -> bool {
        let syntax = self.adapter.comment_syntax();
        syntax.block.as_ref().map_or(false, |b| trimmed.starts_with(b.open.as_str()))
            || self.doc_line_prefix(trimmed).is_some()
            || syntax.plain_line.as_ref().map_or(false, |p| trimmed.starts_with(p.as_str()))
            || syntax.plain_block.as_ref().map_or(false, |(open, _)| trimmed.starts_with(open.as_str()))
    }

    fn orphan_pending(&mut self) {
        if let Some(comment) = self.pending.take() {
            let candidate = Candidate {
                comment: Some(comment),
                signature: None,
                depth: self.depth(),
                in_static_scope: self.in_static_scope(),
            };
            self.candidates.push(candidate);
        }
    }

    fn in_body(&self) -> bool {
        self.scopes.contains(&Scope::Body)
    }

    fn in_static_scope(&self) -> bool {
        self.scopes.contains(&Scope::Static)
    }

    fn depth(&self) -> usize {
        self.scopes.iter().filter(|s| **s == Scope::Type).count()
    }

    /// Track braces outside strings and comments, updating the scope stack
    fn apply_structure(&mut self, line: &str) {
        let syntax = self.adapter.comment_syntax();
        let (open, close) = match (&syntax.plain_block, &syntax.block) {
            (Some((open, close)), _) => (open.as_str(), close.as_str()),
            (None, Some(block)) => (block.open.as_str(), block.close.as_str()),
            (None, None) => ("", ""),
        };
        let line_prefix = syntax.plain_line.as_deref().unwrap_or("");

        let chars: Vec<char> = line.chars().collect();
        let mut k = 0;
        while k < chars.len() {
            if self.lex.in_plain_comment {
                if starts_at(&chars, k, close) {
                    self.lex.in_plain_comment = false;
                    k += close.chars().count();
                } else {
                    k += 1;
                }
                continue;
            }
            if self.lex.in_raw_string {
                if starts_at(&chars, k, "\"\"\"") {
                    self.lex.in_raw_string = false;
                    k += 3;
                } else {
                    k += 1;
                }
                continue;
            }
            if starts_at(&chars, k, "\"\"\"") {
                self.lex.in_raw_string = true;
                k += 3;
                continue;
            }
            if starts_at(&chars, k, line_prefix) {
                break;
            }
            if starts_at(&chars, k, open) {
                self.lex.in_plain_comment = true;
                k += open.chars().count();
                continue;
            }

            match chars[k] {
                '"' => {
                    k += 1;
                    while k < chars.len() && chars[k] != '"' {
                        if chars[k] == '\\' {
                            k += 1;
                        }
                        k += 1;
                    }
                    k += 1;
                }
                '\'' => {
                    if k + 3 < chars.len() && chars[k + 1] == '\\' && chars[k + 3] == '\'' {
                        k += 4;
                    } else if k + 2 < chars.len() && chars[k + 2] == '\'' {
                        k += 3;
                    } else {
                        k += 1;
                    }
                }
                '{' => {
                    let scope = self.next_open.take().unwrap_or(Scope::Body);
                    self.scopes.push(scope);
                    k += 1;
                }
                '}' => {
                    self.scopes.pop();
                    k += 1;
                }
                _ => k += 1,
            }
        }
    }
}

fn starts_at(chars: &[char], k: usize, pattern: &str) -> bool {
    if pattern.is_empty() {
        return false;
    }
    let mut idx = k;
    for p in pattern.chars() {
        if idx >= chars.len() || chars[idx] != p {
            return false;
        }
        idx += 1;
    }
    true
}

/// 1-based column of a byte offset
fn column_of(line: &str, byte_offset: usize) -> usize {
    line.get(..byte_offset).map_or(byte_offset, |s| s.chars().count()) + 1
}

/// Open parentheses minus closed ones, outside string and char literals
fn paren_balance(text: &str) -> i32 {
    let chars: Vec<char> = text.chars().collect();
    let mut balance = 0;
    let mut k = 0;
    while k < chars.len() {
        match chars[k] {
            '"' => {
                k += 1;
                while k < chars.len() && chars[k] != '"' {
                    if chars[k] == '\\' {
                        k += 1;
                    }
                    k += 1;
                }
            }
            '\'' => {
                if k + 3 < chars.len() && chars[k + 1] == '\\' && chars[k + 3] == '\'' {
                    k += 3;
                } else if k + 2 < chars.len() && chars[k + 2] == '\'' {
                    k += 2;
                }
            }
            '(' => balance += 1,
            ')' => balance -= 1,
            _ => {}
        }
        k += 1;
    }
    balance
}
