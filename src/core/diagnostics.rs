// src/core/diagnostics.rs
use std::fmt;
use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

/// 1-based line/column position in a source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

/// The four non-fatal problems a file can have
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum DiagnosticKind {
    MalformedComment,
    UnsupportedSyntax,
    OrphanedComment,
    DocMismatch,
}

impl DiagnosticKind {
    pub fn severity(self) -> Severity {
        match self {
            DiagnosticKind::MalformedComment | DiagnosticKind::UnsupportedSyntax => Severity::Error,
            DiagnosticKind::OrphanedComment | DiagnosticKind::DocMismatch => Severity::Warning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileLocation {
    pub path: PathBuf,
    pub line: usize,
    pub column: usize,
}

/// A single record on the diagnostics channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub file_location: FileLocation,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };
        write!(
            f,
            "{}:{}:{}: {} [{:?}]: {}",
            self.file_location.path.display(),
            self.file_location.line,
            self.file_location.column,
            severity,
            self.kind,
            self.message
        )
    }
}

/// Collects diagnostics for one file while its pipeline runs
#[derive(Debug)]
pub struct DiagnosticSink {
    path: PathBuf,
    items: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            items: Vec::new(),
        }
    }

    pub fn report(&mut self, kind: DiagnosticKind, at: Position, message: impl Into<String>) {
        self.items.push(Diagnostic {
            severity: kind.severity(),
            kind,
            file_location: FileLocation {
                path: self.path.clone(),
                line: at.line,
                column: at.column,
            },
            message: message.into(),
        });
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_follows_kind() {
        let mut sink = DiagnosticSink::new(Path::new("Foo.kt"));
        sink.report(DiagnosticKind::MalformedComment, Position::new(3, 1), "unterminated");
        sink.report(DiagnosticKind::DocMismatch, Position::new(9, 5), "unknown parameter");

        let items = sink.into_vec();
        assert_eq!(items[0].severity, Severity::Error);
        assert_eq!(items[1].severity, Severity::Warning);
        assert_eq!(items[1].file_location.line, 9);
    }

    #[test]
    fn test_diagnostic_json_shape() {
        let mut sink = DiagnosticSink::new(Path::new("Bar.swift"));
        sink.report(DiagnosticKind::OrphanedComment, Position::new(12, 5), "no declaration follows");
        let json = serde_json::to_value(&sink.into_vec()[0]).unwrap();

        assert_eq!(json["severity"], "warning");
        assert_eq!(json["kind"], "OrphanedComment");
        assert_eq!(json["fileLocation"]["line"], 12);
        assert_eq!(json["fileLocation"]["path"], "Bar.swift");
    }
}
