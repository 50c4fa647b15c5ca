//! Abstract Syntax Tree (AST) for the fuzzy-match regex dialect
//!
//! The dialect is ECMAScript regex syntax extended with version groups
//! `(?v <assertions>)`. The set of node kinds is closed, so every walk over
//! the tree is total. Every node renders back to exactly the text it was
//! parsed from (see [`Expr::to_regex_string`]).

use std::cmp::Ordering;
use std::fmt;

use crate::version::VersionAssertionSet;

/// An expression in the AST
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Empty expression (matches empty string)
    Empty,

    /// A literal pattern character
    Literal(char),

    /// Any character (dot)
    Any,

    /// A backslash escape such as `\d`, `\x41` or `\1`
    Escape(Escape),

    /// Zero-width assertion `^`, `$`, `\b` or `\B`
    Assertion(Assertion),

    /// A character class `[abc]`, `[^a-z]`, `[[:alpha:]]`
    CharacterClass(CharacterClass),

    /// Capturing, non-capturing or lookaround group
    Group {
        /// The kind of group, which decides its opener
        kind: GroupKind,
        /// The disjunction inside the group
        body: Box<Expr>,
    },

    /// A version group `(?v >= 1.2)`
    VersionGroup(VersionGroup),

    /// Quantified atom (e.g., a*, a+?, a{3,5})
    Quantified {
        /// The atom being quantified
        expr: Box<Expr>,
        /// The quantifier
        quantifier: Quantifier,
    },

    /// A sequence of terms (concatenation)
    Sequence(Vec<Expr>),

    /// Alternation (e.g., a|b|c)
    Alternation(Vec<Expr>),
}

/// A backslash escape, preserving the digits as written
#[derive(Debug, Clone, PartialEq)]
pub enum Escape {
    /// `\xHH`
    Hex(String),
    /// `\uHHHH`
    Unicode(String),
    /// `\cX`
    Control(char),
    /// `\` followed by any other printable character
    Char(char),
}

/// Zero-width assertions that may not be quantified
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assertion {
    /// `^`
    Start,
    /// `$`
    End,
    /// `\b`
    WordBoundary,
    /// `\B`
    NonWordBoundary,
}

/// The kinds of parenthesized groups other than version groups
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// `(...)`
    Capturing,
    /// `(?:...)`
    NonCapturing,
    /// `(?=...)`
    Lookahead,
    /// `(?!...)`
    NegativeLookahead,
    /// `(?<=...)`
    Lookbehind,
    /// `(?<!...)`
    NegativeLookbehind,
}

/// A version group and the source text between `(?v` and `)`
#[derive(Debug, Clone, PartialEq)]
pub struct VersionGroup {
    pub assertions: VersionAssertionSet,
    pub source: String,
}

/// A character class `[abc]`, `[^abc]`, or `[a-z]`
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterClass {
    /// Whether the class is negated [^...]
    pub negated: bool,
    /// The items in the class
    pub items: Vec<ClassItem>,
}

/// An item in a character class
#[derive(Debug, Clone, PartialEq)]
pub enum ClassItem {
    /// A single class atom
    Atom(ClassAtom),
    /// A range between two atoms (e.g., a-z)
    Range(ClassAtom, ClassAtom),
}

/// A single member of a character class
#[derive(Debug, Clone, PartialEq)]
pub enum ClassAtom {
    /// A plain character, including a literal `-`
    Char(char),
    /// A backslash escape
    Escape(Escape),
    /// A POSIX bracket expression `[:name:]`, `[.name.]` or `[=name=]`
    Posix {
        /// Which bracket form
        kind: PosixKind,
        /// The name between the delimiters
        name: String,
    },
}

/// The three POSIX bracket forms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosixKind {
    /// `[:name:]`
    CharClass,
    /// `[.name.]`
    Collating,
    /// `[=name=]`
    Equivalence,
}

/// A quantifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantifier {
    pub kind: QuantifierKind,
    /// Suffixed with `?`
    pub lazy: bool,
}

/// The repetition counts of a quantifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantifierKind {
    /// Zero or more (*)
    ZeroOrMore,
    /// One or more (+)
    OneOrMore,
    /// Zero or one (?)
    ZeroOrOne,
    /// Exactly n times ({n})
    Exactly(Bound),
    /// At least n times ({n,})
    AtLeast(Bound),
    /// Between n and m times ({n,m})
    Between(Bound, Bound),
}

/// A repetition count, kept as the digits it was written with
///
/// Leading zeros survive and no upper limit applies, so `{007}` and
/// `{4294967296}` both print back unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bound(String);

impl Expr {
    /// Create a literal expression
    pub fn literal(c: char) -> Self {
        Expr::Literal(c)
    }

    /// Create a sequence from a vector of expressions
    pub fn sequence(exprs: Vec<Expr>) -> Self {
        match exprs.len() {
            0 => Expr::Empty,
            1 => exprs.into_iter().next().unwrap_or(Expr::Empty),
            _ => Expr::Sequence(exprs),
        }
    }

    /// Create an alternation from a vector of expressions
    pub fn alternation(exprs: Vec<Expr>) -> Self {
        match exprs.len() {
            0 => Expr::Empty,
            1 => exprs.into_iter().next().unwrap_or(Expr::Empty),
            _ => Expr::Alternation(exprs),
        }
    }

    /// Create a group of the given kind
    pub fn group(kind: GroupKind, body: Expr) -> Self {
        Expr::Group {
            kind,
            body: Box::new(body),
        }
    }

    /// Create a quantified expression
    pub fn quantified(expr: Expr, quantifier: Quantifier) -> Self {
        Expr::Quantified {
            expr: Box::new(expr),
            quantifier,
        }
    }

    /// Convert the AST back to the exact source text it was parsed from
    pub fn to_regex_string(&self) -> String {
        match self {
            Expr::Empty => String::new(),
            Expr::Literal(c) => c.to_string(),
            Expr::Any => ".".to_string(),
            Expr::Escape(escape) => escape.to_string(),
            Expr::Assertion(assertion) => assertion.to_string(),
            Expr::CharacterClass(cc) => cc.to_string(),
            Expr::Group { kind, body } => {
                format!("{}{})", kind.opener(), body.to_regex_string())
            }
            Expr::VersionGroup(group) => group.to_string(),
            Expr::Quantified { expr, quantifier } => {
                format!("{}{}", expr.to_regex_string(), quantifier)
            }
            Expr::Sequence(exprs) => exprs.iter().map(|e| e.to_regex_string()).collect(),
            Expr::Alternation(exprs) => {
                let parts: Vec<_> = exprs.iter().map(|e| e.to_regex_string()).collect();
                parts.join("|")
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_regex_string())
    }
}

impl Escape {
    /// `\d`, `\D`, `\w`, `\W`, `\s`, `\S`
    pub fn is_class_escape(&self) -> bool {
        matches!(self, Escape::Char('d' | 'D' | 'w' | 'W' | 's' | 'S'))
    }

    /// The single code point this escape stands for inside a class, if known
    pub fn code_point(&self) -> Option<u32> {
        match self {
            Escape::Hex(digits) | Escape::Unicode(digits) => u32::from_str_radix(digits, 16).ok(),
            Escape::Control(c) => Some(*c as u32 % 32),
            Escape::Char('t') => Some(0x09),
            Escape::Char('n') => Some(0x0A),
            Escape::Char('v') => Some(0x0B),
            Escape::Char('f') => Some(0x0C),
            Escape::Char('r') => Some(0x0D),
            Escape::Char('b') => Some(0x08),
            Escape::Char('0') => Some(0x00),
            Escape::Char(c) if c.is_ascii_alphanumeric() => None,
            Escape::Char(c) => Some(*c as u32),
        }
    }
}

impl fmt::Display for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Escape::Hex(digits) => write!(f, "\\x{}", digits),
            Escape::Unicode(digits) => write!(f, "\\u{}", digits),
            Escape::Control(c) => write!(f, "\\c{}", c),
            Escape::Char(c) => write!(f, "\\{}", c),
        }
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Assertion::Start => "^",
            Assertion::End => "$",
            Assertion::WordBoundary => "\\b",
            Assertion::NonWordBoundary => "\\B",
        })
    }
}

impl GroupKind {
    /// The text that opens a group of this kind
    pub fn opener(&self) -> &'static str {
        match self {
            GroupKind::Capturing => "(",
            GroupKind::NonCapturing => "(?:",
            GroupKind::Lookahead => "(?=",
            GroupKind::NegativeLookahead => "(?!",
            GroupKind::Lookbehind => "(?<=",
            GroupKind::NegativeLookbehind => "(?<!",
        }
    }

    /// Whether a group of this kind is numbered
    pub fn is_capturing(&self) -> bool {
        matches!(self, GroupKind::Capturing)
    }

    /// Lookaround groups are assertions and may not be quantified
    pub fn is_lookaround(&self) -> bool {
        matches!(
            self,
            GroupKind::Lookahead
                | GroupKind::NegativeLookahead
                | GroupKind::Lookbehind
                | GroupKind::NegativeLookbehind
        )
    }
}

impl fmt::Display for VersionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(?v{})", self.source)
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        if self.negated {
            f.write_str("^")?;
        }
        for item in &self.items {
            match item {
                ClassItem::Atom(atom) => write!(f, "{}", atom)?,
                ClassItem::Range(start, end) => write!(f, "{}-{}", start, end)?,
            }
        }
        f.write_str("]")
    }
}

impl fmt::Display for ClassAtom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassAtom::Char(c) => write!(f, "{}", c),
            ClassAtom::Escape(escape) => write!(f, "{}", escape),
            ClassAtom::Posix { kind, name } => {
                let d = kind.delimiter();
                write!(f, "[{}{}{}]", d, name, d)
            }
        }
    }
}

impl PosixKind {
    /// The character that follows `[` and precedes `]`
    pub fn delimiter(&self) -> char {
        match self {
            PosixKind::CharClass => ':',
            PosixKind::Collating => '.',
            PosixKind::Equivalence => '=',
        }
    }

    /// The form introduced by `d`, if any
    pub fn from_delimiter(d: char) -> Option<Self> {
        match d {
            ':' => Some(PosixKind::CharClass),
            '.' => Some(PosixKind::Collating),
            '=' => Some(PosixKind::Equivalence),
            _ => None,
        }
    }
}

impl Quantifier {
    /// A quantifier matching as many repetitions as possible
    pub fn greedy(kind: QuantifierKind) -> Self {
        Quantifier { kind, lazy: false }
    }

    /// A quantifier matching as few repetitions as possible (`?` suffix)
    pub fn lazy(kind: QuantifierKind) -> Self {
        Quantifier { kind, lazy: true }
    }
}

impl Bound {
    /// Wrap a run of ASCII digits
    pub fn new(digits: impl Into<String>) -> Self {
        Bound(digits.into())
    }

    /// The digits as written
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn significant(&self) -> &str {
        match self.0.trim_start_matches('0') {
            "" => "0",
            digits => digits,
        }
    }

    /// Compare by numeric value, whatever the number of digits
    pub fn cmp_value(&self, other: &Bound) -> Ordering {
        let (a, b) = (self.significant(), other.significant());
        a.len().cmp(&b.len()).then_with(|| a.cmp(b))
    }
}

impl From<u32> for Bound {
    fn from(n: u32) -> Self {
        Bound(n.to_string())
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            QuantifierKind::ZeroOrMore => f.write_str("*")?,
            QuantifierKind::OneOrMore => f.write_str("+")?,
            QuantifierKind::ZeroOrOne => f.write_str("?")?,
            QuantifierKind::Exactly(n) => write!(f, "{{{}}}", n)?,
            QuantifierKind::AtLeast(n) => write!(f, "{{{},}}", n)?,
            QuantifierKind::Between(n, m) => write!(f, "{{{},{}}}", n, m)?,
        }
        if self.lazy {
            f.write_str("?")?;
        }
        Ok(())
    }
}
