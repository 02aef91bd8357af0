// src/core/tags.rs
//! Comment tag parsing
//!
//! Turns the text inside one comment block into an ordered list of
//! [`TagEntry`] values. Two surface dialects map onto the same [`TagKind`]s:
//! block tags (`@param name desc`) and inline dashes (`- Parameter name: desc`).
//! The spelling tables come from the language adapter, so nothing here knows
//! about a particular language.

use std::collections::HashMap;
use std::sync::LazyLock;
use regex::Regex;
use serde::{Deserialize, Serialize};

static BLOCK_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^@(\w+)(?:\s+(.*))?$").unwrap());

static INLINE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s+(\w+)(?:\s+([\w$]+))?\s*:\s*(.*)$").unwrap());

static INLINE_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s+([\w$]+)\s*:\s*(.*)$").unwrap());

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^((?:[A-Z][a-z]+\s+)?[A-Z][a-z]+):\s*([\w$.:~<>]+)\s*$").unwrap());

/// Semantic kind of a tag, independent of how it was spelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagKind {
    Summary,
    Description,
    Param,
    Return,
    Property,
    ConstructorNote,
    /// Declaration marker such as `Class: Foo` heading the comment
    Marker,
    Unknown,
}

impl TagKind {
    /// Tags whose first word is the name of the documented item
    pub fn takes_name(self) -> bool {
        matches!(self, TagKind::Param | TagKind::Property)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    pub kind: TagKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: String,
}

impl TagEntry {
    fn new(kind: TagKind, name: Option<String>, value: String) -> Self {
        Self { kind, name, value }
    }
}

/// Which tag dialect decorates a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagStyle {
    BlockTag,
    InlineDash,
    Plain,
}

/// Spelling → kind tables supplied by a language adapter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagVocabulary {
    /// `@word` spellings; `None` disables the block-tag dialect
    #[serde(default)]
    pub block_tags: Option<HashMap<String, TagKind>>,

    /// `- Word:` spellings; `None` disables the inline-dash dialect
    #[serde(default)]
    pub inline_tags: Option<HashMap<String, TagKind>>,

    /// Inline keyword that opens a list of `- name: desc` parameter items
    #[serde(default)]
    pub inline_param_group: Option<String>,

    /// Marker headings recognised at the top of a comment (`Class`, `Static Method`, ...)
    #[serde(default)]
    pub markers: Vec<String>,
}

impl TagVocabulary {
    /// KDoc / Javadoc style `@tag` vocabulary
    pub fn block_tags() -> Self {
        let tags = [
            ("param", TagKind::Param),
            ("return", TagKind::Return),
            ("returns", TagKind::Return),
            ("property", TagKind::Property),
            ("constructor", TagKind::ConstructorNote),
        ];
        Self {
            block_tags: Some(tags.iter().map(|(s, k)| (s.to_string(), *k)).collect()),
            inline_tags: None,
            inline_param_group: None,
            markers: default_markers(),
        }
    }

    /// Swift-markup style `- Keyword:` vocabulary
    pub fn inline_dashes() -> Self {
        let tags = [
            ("Parameter", TagKind::Param),
            ("Returns", TagKind::Return),
            ("Return", TagKind::Return),
            ("Property", TagKind::Property),
        ];
        Self {
            block_tags: None,
            inline_tags: Some(tags.iter().map(|(s, k)| (s.to_string(), *k)).collect()),
            inline_param_group: Some("Parameters".to_string()),
            markers: default_markers(),
        }
    }

    fn block_kind(&self, spelling: &str) -> Option<Option<TagKind>> {
        self.block_tags.as_ref().map(|tags| tags.get(spelling).copied())
    }

    fn inline_kind(&self, spelling: &str) -> Option<Option<TagKind>> {
        self.inline_tags.as_ref().map(|tags| tags.get(spelling).copied())
    }
}

fn default_markers() -> Vec<String> {
    ["Class", "Method", "Function", "Property", "Constructor", "Static Method", "Static Property"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Guess the dialect of a raw comment body without a vocabulary
pub fn detect_style(text: &str) -> TagStyle {
    let mut style = TagStyle::Plain;
    for line in text.lines() {
        let line = line.trim().trim_start_matches('*').trim();
        if BLOCK_TAG.is_match(line) {
            return TagStyle::BlockTag;
        }
        if INLINE_TAG.is_match(line) {
            style = TagStyle::InlineDash;
        }
    }
    style
}

struct PendingTag {
    kind: TagKind,
    name: Option<String>,
    lines: Vec<String>,
}

enum Phase {
    Head,
    Prose,
    Tags,
}

/// Parses comment text against one adapter's vocabulary
pub struct TagParser<'a> {
    vocabulary: &'a TagVocabulary,
    decoration: Option<&'a str>,
}

impl<'a> TagParser<'a> {
    pub fn new(vocabulary: &'a TagVocabulary, decoration: Option<&'a str>) -> Self {
        Self { vocabulary, decoration }
    }

    pub fn parse(&self, text: &str) -> Vec<TagEntry> {
        let mut entries = Vec::new();
        let mut prose: Vec<String> = Vec::new();
        let mut prose_flushed = false;
        let mut pending: Option<PendingTag> = None;
        let mut in_group = false;
        let mut phase = Phase::Head;

        for raw in text.lines() {
            let line = self.strip_decoration(raw);
            let trimmed = line.trim();

            if let Phase::Head = phase {
                if trimmed.is_empty() {
                    continue;
                }
                if let Some(marker) = self.match_marker(trimmed) {
                    entries.push(marker);
                    continue;
                }
            }

            if let Some(start) = self.match_tag(trimmed, &mut in_group) {
                if !prose_flushed {
                    flush_prose(&prose, &mut entries);
                    prose_flushed = true;
                }
                if let Some(done) = pending.take() {
                    entries.push(finish(done));
                }
                pending = start;
                phase = Phase::Tags;
                continue;
            }

            match phase {
                Phase::Tags => match pending.as_mut() {
                    Some(tag) => tag.lines.push(trimmed.to_string()),
                    // Prose under a group opener, before its first item
                    None if !trimmed.is_empty() => {
                        let group = self.vocabulary.inline_param_group.clone();
                        pending = Some(self::pending(TagKind::Unknown, group, trimmed));
                    }
                    None => {}
                },
                Phase::Head | Phase::Prose => {
                    phase = Phase::Prose;
                    prose.push(trimmed.to_string());
                }
            }
        }

        if let Some(done) = pending.take() {
            entries.push(finish(done));
        }
        if !prose_flushed {
            flush_prose(&prose, &mut entries);
        }
        entries
    }

    fn strip_decoration<'l>(&self, line: &'l str) -> &'l str {
        let line = line.trim();
        match self.decoration {
            Some(decoration) if !decoration.is_empty() => line
                .strip_prefix(decoration)
                .map(|rest| rest.strip_prefix(' ').unwrap_or(rest))
                .unwrap_or(line),
            _ => line,
        }
    }

    fn match_marker(&self, line: &str) -> Option<TagEntry> {
        let caps = MARKER.captures(line)?;
        let keyword = caps[1].split_whitespace().collect::<Vec<_>>().join(" ");
        if !self.vocabulary.markers.iter().any(|m| *m == keyword) {
            return None;
        }
        Some(TagEntry::new(TagKind::Marker, Some(caps[2].to_string()), keyword))
    }

    /// `Some(pending)` when `line` starts a tag. The inner option is `None`
    /// for a group opener that carries no text of its own.
    fn match_tag(&self, line: &str, in_group: &mut bool) -> Option<Option<PendingTag>> {
        if let Some(caps) = BLOCK_TAG.captures(line) {
            if let Some(kind) = self.vocabulary.block_kind(&caps[1]) {
                *in_group = false;
                let rest = caps.get(2).map_or("", |m| m.as_str()).trim();
                return Some(Some(match kind {
                    Some(kind) if kind.takes_name() => {
                        let (name, value) = split_name(rest);
                        pending(kind, name, value)
                    }
                    Some(kind) => pending(kind, None, rest),
                    None => pending(TagKind::Unknown, Some(caps[1].to_string()), line),
                }));
            }
        }

        if self.vocabulary.inline_tags.is_none() {
            return None;
        }

        if let Some(caps) = INLINE_TAG.captures(line) {
            let keyword = &caps[1];
            let name = caps.get(2).map(|m| m.as_str());
            let rest = caps[3].trim();

            if name.is_none() && self.vocabulary.inline_param_group.as_deref() == Some(keyword) {
                *in_group = true;
                return Some(None);
            }
            if let Some(Some(kind)) = self.vocabulary.inline_kind(keyword) {
                *in_group = false;
                return Some(Some(match (kind.takes_name(), name) {
                    (true, Some(name)) => pending(kind, Some(name.to_string()), rest),
                    (true, None) => pending(TagKind::Unknown, Some(keyword.to_string()), line),
                    (false, Some(extra)) => pending(kind, None, &format!("{} {}", extra, rest)),
                    (false, None) => pending(kind, None, rest),
                }));
            }
            if !*in_group {
                return Some(Some(pending(TagKind::Unknown, Some(keyword.to_string()), line)));
            }
        }

        if *in_group {
            if let Some(caps) = INLINE_ITEM.captures(line) {
                return Some(Some(pending(TagKind::Param, Some(caps[1].to_string()), caps[2].trim())));
            }
        }

        None
    }
}

fn pending(kind: TagKind, name: Option<String>, first: &str) -> PendingTag {
    PendingTag {
        kind,
        name,
        lines: vec![first.to_string()],
    }
}

fn split_name(text: &str) -> (Option<String>, &str) {
    let mut parts = text.splitn(2, char::is_whitespace);
    let name = parts
        .next()
        .map(|n| n.trim_start_matches('[').trim_end_matches(']'))
        .filter(|n| !n.is_empty())
        .map(|n| n.to_string());
    (name, parts.next().unwrap_or("").trim())
}

fn finish(tag: PendingTag) -> TagEntry {
    TagEntry::new(tag.kind, tag.name, join_paragraphs(&tag.lines).join("\n\n"))
}

fn flush_prose(lines: &[String], entries: &mut Vec<TagEntry>) {
    let mut paragraphs = join_paragraphs(lines).into_iter();
    if let Some(summary) = paragraphs.next() {
        entries.push(TagEntry::new(TagKind::Summary, None, summary));
    }
    for paragraph in paragraphs {
        entries.push(TagEntry::new(TagKind::Description, None, paragraph));
    }
}

/// Group lines into paragraphs separated by blank lines; lines inside a
/// paragraph keep their breaks.
fn join_paragraphs(lines: &[String]) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in lines {
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_block(text: &str) -> Vec<TagEntry> {
        let vocabulary = TagVocabulary::block_tags();
        TagParser::new(&vocabulary, Some("*")).parse(text)
    }

    fn parse_inline(text: &str) -> Vec<TagEntry> {
        let vocabulary = TagVocabulary::inline_dashes();
        TagParser::new(&vocabulary, Some("*")).parse(text)
    }

    #[test]
    fn test_block_tags_with_marker() {
        let entries = parse_block(
            " * Method: method1\n * The sample method.\n *\n * @param arg The sample argument.\n * @return The sample return.\n",
        );

        assert_eq!(entries[0].kind, TagKind::Marker);
        assert_eq!(entries[0].name.as_deref(), Some("method1"));
        assert_eq!(entries[0].value, "Method");
        assert_eq!(entries[1], TagEntry::new(TagKind::Summary, None, "The sample method.".to_string()));
        assert_eq!(entries[2].kind, TagKind::Param);
        assert_eq!(entries[2].name.as_deref(), Some("arg"));
        assert_eq!(entries[2].value, "The sample argument.");
        assert_eq!(entries[3].kind, TagKind::Return);
        assert_eq!(entries[3].value, "The sample return.");
        assert_eq!(entries.len(), 4);
    }

    #[test]
    fn test_inline_dash_tags() {
        let entries = parse_inline(
            " * Static Method: staticMethod\n * Static method.\n *\n * - Parameter value: The value.\n * - Returns: A Bar instance.\n",
        );

        assert_eq!(entries[0].value, "Static Method");
        assert_eq!(entries[0].name.as_deref(), Some("staticMethod"));
        assert_eq!(entries[2].kind, TagKind::Param);
        assert_eq!(entries[2].name.as_deref(), Some("value"));
        assert_eq!(entries[2].value, "The value.");
        assert_eq!(entries[3].kind, TagKind::Return);
        assert_eq!(entries[3].value, "A Bar instance.");
    }

    #[test]
    fn test_inline_parameter_group() {
        let entries = parse_inline(
            "Moves a point.\n\n- Parameters:\n  - x: Horizontal offset.\n  - y: Vertical offset.\n- Returns: The moved point.",
        );
        let params: Vec<_> = entries.iter().filter(|e| e.kind == TagKind::Param).collect();

        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name.as_deref(), Some("x"));
        assert_eq!(params[1].value, "Vertical offset.");
        assert!(entries.iter().any(|e| e.kind == TagKind::Return));
    }

    #[test]
    fn test_prose_under_parameter_group_is_kept() {
        let entries = parse_inline(
            "Moves a point.\n\n- Parameters:\n  Offsets are in points.\n  - x: Horizontal.\n  - y: Vertical.",
        );

        let note: Vec<_> = entries.iter().filter(|e| e.kind == TagKind::Unknown).collect();
        assert_eq!(note.len(), 1);
        assert_eq!(note[0].name.as_deref(), Some("Parameters"));
        assert_eq!(note[0].value, "Offsets are in points.");

        let params: Vec<_> = entries.iter().filter(|e| e.kind == TagKind::Param).collect();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].value, "Horizontal.");
    }

    #[test]
    fn test_multi_line_prose_and_paragraphs() {
        let entries = parse_block(
            " * The sample method with the\n * two-line description.\n *\n * Second paragraph\n * continues here.\n *\n *\n * Third.\n",
        );

        assert_eq!(entries[0].kind, TagKind::Summary);
        assert_eq!(entries[0].value, "The sample method with the\ntwo-line description.");
        assert_eq!(entries[1].kind, TagKind::Description);
        assert_eq!(entries[1].value, "Second paragraph\ncontinues here.");
        assert_eq!(entries[2].value, "Third.");
    }

    #[test]
    fn test_multi_line_tag_value_keeps_paragraphs() {
        let entries = parse_block(
            "@param width The width,\n  measured in pixels.\n\n  Never negative.\n@return nothing\n",
        );

        assert_eq!(entries[0].kind, TagKind::Param);
        assert_eq!(entries[0].value, "The width,\nmeasured in pixels.\n\nNever negative.");
        assert_eq!(entries[1].value, "nothing");
    }

    #[test]
    fn test_unknown_tags_are_kept() {
        let entries = parse_block("Reads a file.\n@throws IOException when the file is gone\n@since 1.2");

        assert_eq!(entries[1].kind, TagKind::Unknown);
        assert_eq!(entries[1].name.as_deref(), Some("throws"));
        assert_eq!(entries[1].value, "@throws IOException when the file is gone");
        assert_eq!(entries[2].name.as_deref(), Some("since"));

        let inline = parse_inline("Reads a file.\n- Throws: An error.");
        assert_eq!(inline[1].kind, TagKind::Unknown);
        assert_eq!(inline[1].value, "- Throws: An error.");
    }

    #[test]
    fn test_dialect_not_supported_is_prose() {
        let entries = parse_inline("Uses @param literally.\n@param x not a tag here");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].kind, TagKind::Summary);
        assert!(entries[0].value.contains("@param x"));
    }

    #[test]
    fn test_bracketed_param_name() {
        let entries = parse_block("@param [count] How many.");
        assert_eq!(entries[0].name.as_deref(), Some("count"));
        assert_eq!(entries[0].value, "How many.");
    }

    #[test]
    fn test_marker_only_at_head() {
        let entries = parse_block("Summary line.\nClass: Foo");

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].value, "Summary line.\nClass: Foo");
    }

    #[test]
    fn test_prose_round_trip() {
        let text = "First line\nstill first.\n\nSecond paragraph.\n\nThird paragraph.";
        let entries = parse_block(text);
        let rebuilt: Vec<&str> = entries.iter().map(|e| e.value.as_str()).collect();

        assert_eq!(rebuilt.join("\n\n"), text);
    }

    #[test]
    fn test_detect_style() {
        assert_eq!(detect_style(" * @param x y"), TagStyle::BlockTag);
        assert_eq!(detect_style(" * - Returns: y"), TagStyle::InlineDash);
        assert_eq!(detect_style(" * just words"), TagStyle::Plain);
    }
}
