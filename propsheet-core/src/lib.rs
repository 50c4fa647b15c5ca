//! Propsheet Core Library
//!
//! Compiler for props entries: selectors made of exact and fuzzy (regex)
//! clauses, where fuzzy clauses may embed `(?v ...)` version checks.

pub mod ast;
pub mod document;
pub mod entry;
pub mod error;
pub mod groups;
pub mod lexer;
pub mod materialize;
pub mod parser;
pub mod version;

pub use ast::{Bound, Expr};
pub use document::{Document, Entry, Matcher, Value};
pub use entry::{Clause, Condition, EntryNode, EntryParser, PropItem, PropsBlock};
pub use error::{Error, Result, Span, SyntaxError, SyntaxErrorKind};
pub use groups::{CaptureKind, GroupInfo, GroupRegistry};
pub use lexer::Lexer;
pub use materialize::{
    Rewrite, VERSION_PATTERN, materialize, materialize_entry, rewrite, rewrite_pattern,
};
pub use parser::{MAX_NESTING, Parser, parse};
pub use version::{
    Comparator, VersionAssertion, VersionAssertionSet, parse_assertions, parse_version_check,
};

/// Compile props text into a document
///
/// This is the main entry point: parse every entry, then materialize them.
pub fn compile(input: &str) -> Result<Document> {
    let entries = entry::parse(input)?;
    materialize(&entries)
}
