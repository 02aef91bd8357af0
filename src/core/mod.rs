// Extraction pipeline: scanner -> association -> builder
mod diagnostics;
mod tags;
mod model;
mod recognizer;
mod scanner;
mod association;
mod builder;

// Orchestration
mod engine;
mod parser;

// Language adapters
mod languages;

pub use diagnostics::{Diagnostic, Severity};
pub use parser::{CodeParser, ParsedFile};
pub use languages::{AdapterRegistry, AdapterSpec, TableAdapter};

// Export the main engine
pub use engine::Engine;
