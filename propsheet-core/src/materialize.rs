//! Materializer turning parsed entries into a [`Document`]
//!
//! Fuzzy clauses are rewritten in a single left-to-right walk. Every version
//! group becomes the plain capturing group [`VERSION_PATTERN`], and its
//! assertions are recorded under the number that group receives.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::ast::Expr;
use crate::document::{Document, Entry, Matcher, Value};
use crate::entry::{Clause, Condition, EntryNode, PropItem, PropsBlock};
use crate::error::{Error, Result};
use crate::groups::{CaptureKind, GroupRegistry};
use crate::parser::parse;
use crate::version::VersionAssertionSet;

/// Capturing group substituted for every `(?v ...)` group
pub const VERSION_PATTERN: &str = r"(\d+(?:[.]\d+)*)";

/// A rewritten fuzzy pattern together with its numbering
#[derive(Debug, Clone)]
pub struct Rewrite {
    /// The pattern with version groups replaced
    pub pattern: String,
    /// Assertions keyed by capture group number
    pub assertions: BTreeMap<u32, VersionAssertionSet>,
    /// Every capture group in the rewritten pattern
    pub groups: GroupRegistry,
}

impl Rewrite {
    /// The fuzzy matcher carrying this pattern and its assertions
    pub fn into_matcher(self) -> Matcher {
        Matcher::Fuzzy {
            pattern: self.pattern,
            assertions: self.assertions,
        }
    }
}

/// Walk state threaded through the rewrite
struct Rewriter {
    pattern: String,
    assertions: BTreeMap<u32, VersionAssertionSet>,
    groups: GroupRegistry,
}

impl Rewriter {
    fn new() -> Self {
        Rewriter {
            pattern: String::new(),
            assertions: BTreeMap::new(),
            groups: GroupRegistry::new(),
        }
    }

    fn emit(&mut self, expr: &Expr) -> Result<()> {
        match expr {
            Expr::Empty => {}
            Expr::Literal(c) => self.pattern.push(*c),
            Expr::Any => self.pattern.push('.'),
            Expr::Escape(escape) => self.pattern.push_str(&escape.to_string()),
            Expr::Assertion(assertion) => self.pattern.push_str(&assertion.to_string()),
            Expr::CharacterClass(cc) => self.pattern.push_str(&cc.to_string()),
            Expr::Group { kind, body } => {
                self.pattern.push_str(kind.opener());
                if kind.is_capturing() {
                    self.groups.register_group(CaptureKind::Plain);
                }
                self.emit(body)?;
                self.pattern.push(')');
            }
            Expr::VersionGroup(group) => {
                if group.assertions.is_empty() {
                    return Err(Error::InternalConsistency(format!(
                        "version group `{}` carries no assertions",
                        group
                    )));
                }
                let index = self.groups.register_group(CaptureKind::Version);
                if self
                    .assertions
                    .insert(index, group.assertions.clone())
                    .is_some()
                {
                    return Err(Error::InternalConsistency(format!(
                        "capture group {} assigned to two version groups",
                        index
                    )));
                }
                self.pattern.push_str(VERSION_PATTERN);
            }
            Expr::Quantified { expr, quantifier } => {
                self.emit(expr)?;
                self.pattern.push_str(&quantifier.to_string());
            }
            Expr::Sequence(exprs) => {
                for expr in exprs {
                    self.emit(expr)?;
                }
            }
            Expr::Alternation(exprs) => {
                for (i, expr) in exprs.iter().enumerate() {
                    if i > 0 {
                        self.pattern.push('|');
                    }
                    self.emit(expr)?;
                }
            }
        }
        Ok(())
    }
}

/// Rewrite a parsed fuzzy pattern
pub fn rewrite(expr: &Expr) -> Result<Rewrite> {
    let mut rewriter = Rewriter::new();
    rewriter.emit(expr)?;
    debug!(
        pattern = %rewriter.pattern,
        groups = rewriter.groups.group_count(),
        version_groups = rewriter.assertions.len(),
        "rewrote fuzzy pattern"
    );
    Ok(Rewrite {
        pattern: rewriter.pattern,
        assertions: rewriter.assertions,
        groups: rewriter.groups,
    })
}

/// Parse and rewrite a standalone fuzzy pattern
pub fn rewrite_pattern(input: &str) -> Result<Rewrite> {
    let expr = parse(input)?;
    rewrite(&expr)
}

fn materialize_clause(clause: &Clause) -> Result<Matcher> {
    match &clause.condition {
        Condition::Exact(value) => Ok(Matcher::Exact {
            value: value.clone(),
        }),
        Condition::Fuzzy(expr) => rewrite(expr).map(Rewrite::into_matcher),
    }
}

/// Flatten a props block, nested blocks contributing their pairs in order
fn collect_props(block: &PropsBlock, props: &mut BTreeMap<String, Value>) {
    for item in &block.items {
        match item {
            PropItem::Pair { name, value } => {
                if props.insert(name.clone(), value.clone()).is_some() {
                    warn!(property = %name, "duplicate property in props block, last value wins");
                }
            }
            PropItem::Nested(nested) => collect_props(nested, props),
        }
    }
}

/// Materialize one parsed entry
pub fn materialize_entry(node: &EntryNode) -> Result<Entry> {
    let mut entry = Entry::default();
    for clause in &node.selector {
        let matcher = materialize_clause(clause)?;
        if entry
            .selector
            .insert(clause.property.clone(), matcher)
            .is_some()
        {
            warn!(property = %clause.property, "duplicate property in selector, last clause wins");
        }
    }
    collect_props(&node.props, &mut entry.props);
    Ok(entry)
}

/// Materialize parsed entries into a document, failing as a whole
pub fn materialize(entries: &[EntryNode]) -> Result<Document> {
    let entries = entries
        .iter()
        .map(materialize_entry)
        .collect::<Result<Vec<_>>>()?;
    debug!(entries = entries.len(), "materialized document");
    Ok(Document { entries })
}
