//! Version assertions carried by `(?v ...)` groups
//!
//! A version check is one or more `<comparator><version>` pairs, e.g.
//! `>= 1.2 < 2`. Comparators are matched longest first, so `>=` is never
//! read as `>` followed by `=`. Versions are dot-separated runs of digits.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::error::{Result, SyntaxError};
use crate::lexer::Lexer;

/// A version comparator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// `>=`
    GreaterEq,
    /// `>`
    Greater,
    /// `<=`
    LessEq,
    /// `<`
    Less,
    /// `=`
    Equal,
}

impl Comparator {
    /// Longest-match-first order used when lexing
    const LEXING_ORDER: [Comparator; 5] = [
        Comparator::GreaterEq,
        Comparator::Greater,
        Comparator::LessEq,
        Comparator::Less,
        Comparator::Equal,
    ];

    /// The comparator as written in source and emitted in documents
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::GreaterEq => ">=",
            Comparator::Greater => ">",
            Comparator::LessEq => "<=",
            Comparator::Less => "<",
            Comparator::Equal => "=",
        }
    }

    fn lex(lexer: &mut Lexer<'_>) -> Option<Comparator> {
        Self::LEXING_ORDER
            .into_iter()
            .find(|cmp| lexer.eat_str(cmp.as_str()))
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single comparator/version pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionAssertion {
    pub comparator: Comparator,
    /// Dot-separated decimal integers, as written
    pub version: String,
}

impl VersionAssertion {
    pub fn new(comparator: Comparator, version: impl Into<String>) -> Self {
        VersionAssertion {
            comparator,
            version: version.into(),
        }
    }
}

/// Conjunction of version assertions applied to one capture group
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VersionAssertionSet(pub Vec<VersionAssertion>);

impl VersionAssertionSet {
    /// True when the set holds no assertions
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of assertions, duplicates included
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Assertions in source order
    pub fn iter(&self) -> impl Iterator<Item = &VersionAssertion> {
        self.0.iter()
    }

    /// One version per comparator, later assertions overriding earlier ones.
    /// Comparators keep the position of their first occurrence.
    pub fn by_comparator(&self) -> Vec<(Comparator, &str)> {
        let mut merged: Vec<(Comparator, &str)> = Vec::with_capacity(self.0.len());
        for assertion in &self.0 {
            match merged.iter_mut().find(|(cmp, _)| *cmp == assertion.comparator) {
                Some(slot) => slot.1 = assertion.version.as_str(),
                None => merged.push((assertion.comparator, assertion.version.as_str())),
            }
        }
        merged
    }
}

impl fmt::Display for VersionAssertionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, assertion) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{} {}", assertion.comparator, assertion.version)?;
        }
        Ok(())
    }
}

impl Serialize for VersionAssertionSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let merged = self.by_comparator();
        let mut map = serializer.serialize_map(Some(merged.len() + 1))?;
        map.serialize_entry("check", "version")?;
        for (comparator, version) in merged {
            map.serialize_entry(comparator.as_str(), version)?;
        }
        map.end()
    }
}

/// Read a version: one or more digit runs separated by single dots
fn parse_version(lexer: &mut Lexer<'_>) -> std::result::Result<String, SyntaxError> {
    let start = lexer.position();
    if lexer.read_digits().is_empty() {
        return Err(lexer.expected("version number"));
    }
    loop {
        let dot = lexer.position();
        if !lexer.eat('.') {
            break;
        }
        if lexer.read_digits().is_empty() {
            lexer.reset(dot);
            break;
        }
    }
    Ok(lexer.slice(start, lexer.position()).to_string())
}

/// Parse a sequence of version assertions at the lexer's position
///
/// Whitespace before each comparator and between a comparator and its
/// version is skipped. Stops at the first position that does not start a
/// comparator. At least one assertion is required.
pub fn parse_assertions(
    lexer: &mut Lexer<'_>,
) -> std::result::Result<VersionAssertionSet, SyntaxError> {
    let mut assertions = Vec::new();
    loop {
        lexer.skip_whitespace();
        let Some(comparator) = Comparator::lex(lexer) else {
            break;
        };
        lexer.skip_whitespace();
        let version = parse_version(lexer)?;
        assertions.push(VersionAssertion {
            comparator,
            version,
        });
    }
    if assertions.is_empty() {
        return Err(lexer.expected("version comparator"));
    }
    Ok(VersionAssertionSet(assertions))
}

/// Parse a standalone version check such as `>= 1.2 < 2`
pub fn parse_version_check(input: &str) -> Result<VersionAssertionSet> {
    let mut lexer = Lexer::new(input);
    let set = parse_assertions(&mut lexer)?;
    lexer.skip_whitespace();
    if !lexer.is_eof() {
        return Err(lexer.expected("version comparator or end of input").into());
    }
    Ok(set)
}
