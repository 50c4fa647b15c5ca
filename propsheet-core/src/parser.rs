//! Parser for the fuzzy-match regex dialect
//!
//! A recursive descent parser working directly on characters. Regex syntax
//! is whitespace-significant, so nothing here skips whitespace except the
//! inside of a version group.
//!
//! Grammar (in order of precedence, lowest to highest):
//!   disjunction := alternative ( '|' alternative )*
//!   alternative := term*
//!   term        := assertion | atom quantifier?
//!   assertion   := '^' | '$' | '\b' | '\B' | lookaround
//!   lookaround  := ( '(?=' | '(?!' | '(?<=' | '(?<!' ) disjunction ')'
//!   quantifier  := ( '*' | '+' | '?' | '{' n ( ',' n? )? '}' ) '?'?
//!   atom        := pattern_char | escape | char_class | '.' | group
//!   group       := '(?:' disjunction ')' | '(?v' version_check ')' | '(' disjunction ')'
//!   char_class  := '[' '^'? ( class_atom ( '-' class_atom )? )* ']'
//!   class_atom  := posix | escape | any char except '\' and ']'
//!   posix       := '[:' name ':]' | '[.' name '.]' | '[=' name '=]'
//!   escape      := '\' ( 'x' hex{2} | 'u' hex{4} | 'c' alpha | printable )
//!
//! `pattern_char` is any character except `/^$\.*+?()[]{}|`. The `/` is
//! excluded so that a regex embedded in an entry ends at the first
//! unescaped `/` outside a class.

use std::cmp::Ordering;

use crate::ast::{
    Assertion, Bound, CharacterClass, ClassAtom, ClassItem, Escape, Expr, GroupKind, PosixKind,
    Quantifier, QuantifierKind, VersionGroup,
};
use crate::error::{Result, Span, SyntaxError, SyntaxErrorKind};
use crate::lexer::Lexer;
use crate::version;

type ParseResult<T> = std::result::Result<T, SyntaxError>;

/// Characters that never stand for themselves at sequence level
const SYNTAX_CHARS: &str = "/^$\\.*+?()[]{}|";

/// Deepest nesting of groups, or of props blocks, a parser accepts
pub const MAX_NESTING: usize = 128;

/// Group openers other than plain `(`, longest first
const GROUP_OPENERS: [(&str, GroupKind); 5] = [
    ("(?<=", GroupKind::Lookbehind),
    ("(?<!", GroupKind::NegativeLookbehind),
    ("(?:", GroupKind::NonCapturing),
    ("(?=", GroupKind::Lookahead),
    ("(?!", GroupKind::NegativeLookahead),
];

/// Parser for regex patterns
pub struct Parser<'l, 'a> {
    lexer: &'l mut Lexer<'a>,
    depth: usize,
}

impl<'l, 'a> Parser<'l, 'a> {
    /// Create a parser reading from the lexer's current position
    pub fn new(lexer: &'l mut Lexer<'a>) -> Self {
        Parser { lexer, depth: 0 }
    }

    /// Parse a whole pattern, requiring all input to be consumed
    pub fn parse(&mut self) -> ParseResult<Expr> {
        let expr = self.parse_disjunction()?;
        if !self.lexer.is_eof() {
            return Err(self.trailing_error("end of pattern"));
        }
        Ok(expr)
    }

    /// Parse a pattern that ends at an unescaped `delimiter`
    ///
    /// The delimiter itself is consumed.
    pub fn parse_delimited(&mut self, delimiter: char) -> ParseResult<Expr> {
        let expr = self.parse_disjunction()?;
        if !self.lexer.eat(delimiter) {
            return Err(self.trailing_error(&format!("closing `{}`", delimiter)));
        }
        Ok(expr)
    }

    fn trailing_error(&self, expected: &str) -> SyntaxError {
        if self.lexer.peek() == Some(')') {
            SyntaxError::at(SyntaxErrorKind::UnbalancedParen, self.lexer.position())
        } else {
            self.lexer.expected(expected)
        }
    }

    /// disjunction := alternative ( '|' alternative )*
    fn parse_disjunction(&mut self) -> ParseResult<Expr> {
        let mut alternatives = vec![self.parse_alternative()?];
        while self.lexer.eat('|') {
            alternatives.push(self.parse_alternative()?);
        }
        Ok(Expr::alternation(alternatives))
    }

    /// alternative := term*
    fn parse_alternative(&mut self) -> ParseResult<Expr> {
        let mut terms = Vec::new();
        while !self.is_alternative_end() {
            terms.push(self.parse_term()?);
        }
        Ok(Expr::sequence(terms))
    }

    fn is_alternative_end(&self) -> bool {
        matches!(self.lexer.peek(), None | Some('|') | Some(')') | Some('/'))
    }

    /// term := assertion | atom quantifier?
    fn parse_term(&mut self) -> ParseResult<Expr> {
        if let Some(assertion) = self.parse_assertion()? {
            return Ok(assertion);
        }
        let start = self.lexer.position();
        if self.parse_quantifier()?.is_some() {
            let text = self.lexer.slice(start, self.lexer.position()).to_string();
            return Err(SyntaxError::new(
                SyntaxErrorKind::NothingToRepeat(text),
                Span::new(start, self.lexer.position()),
            ));
        }
        let atom = self.parse_atom()?;
        match self.parse_quantifier()? {
            Some(quantifier) => Ok(Expr::quantified(atom, quantifier)),
            None => Ok(atom),
        }
    }

    /// assertion := '^' | '$' | '\b' | '\B' | lookaround
    fn parse_assertion(&mut self) -> ParseResult<Option<Expr>> {
        let assertion = if self.lexer.eat('^') {
            Assertion::Start
        } else if self.lexer.eat('$') {
            Assertion::End
        } else if self.lexer.eat_str("\\b") {
            Assertion::WordBoundary
        } else if self.lexer.eat_str("\\B") {
            Assertion::NonWordBoundary
        } else {
            for (opener, kind) in GROUP_OPENERS {
                if kind.is_lookaround() && self.lexer.starts_with(opener) {
                    return self.parse_group_body(opener, kind).map(Some);
                }
            }
            return Ok(None);
        };
        Ok(Some(Expr::Assertion(assertion)))
    }

    /// quantifier := ( '*' | '+' | '?' | '{' n ( ',' n? )? '}' ) '?'?
    fn parse_quantifier(&mut self) -> ParseResult<Option<Quantifier>> {
        let start = self.lexer.position();
        let kind = match self.lexer.peek() {
            Some('*') => {
                self.lexer.advance();
                QuantifierKind::ZeroOrMore
            }
            Some('+') => {
                self.lexer.advance();
                QuantifierKind::OneOrMore
            }
            Some('?') => {
                self.lexer.advance();
                QuantifierKind::ZeroOrOne
            }
            Some('{') => {
                self.lexer.advance();
                let min = self.parse_bound()?;
                let kind = if self.lexer.eat(',') {
                    if self.lexer.peek() == Some('}') {
                        QuantifierKind::AtLeast(min)
                    } else {
                        let max = self.parse_bound()?;
                        if min.cmp_value(&max) == Ordering::Greater {
                            return Err(SyntaxError::new(
                                SyntaxErrorKind::QuantifierOutOfOrder {
                                    min: min.to_string(),
                                    max: max.to_string(),
                                },
                                Span::new(start, self.lexer.position() + 1),
                            ));
                        }
                        QuantifierKind::Between(min, max)
                    }
                } else {
                    QuantifierKind::Exactly(min)
                };
                self.lexer.expect('}')?;
                kind
            }
            _ => return Ok(None),
        };
        let lazy = self.lexer.eat('?');
        Ok(Some(Quantifier { kind, lazy }))
    }

    /// A decimal repetition count
    fn parse_bound(&mut self) -> ParseResult<Bound> {
        let digits = self.lexer.read_digits();
        if digits.is_empty() {
            return Err(self.lexer.expected("repetition count"));
        }
        Ok(Bound::new(digits))
    }

    /// atom := pattern_char | escape | char_class | '.' | group
    fn parse_atom(&mut self) -> ParseResult<Expr> {
        match self.lexer.peek() {
            Some('.') => {
                self.lexer.advance();
                Ok(Expr::Any)
            }
            Some('[') => self.parse_char_class().map(Expr::CharacterClass),
            Some('\\') => self.parse_escape().map(Expr::Escape),
            Some('(') => self.parse_group(),
            Some(c) if !SYNTAX_CHARS.contains(c) => {
                self.lexer.advance();
                Ok(Expr::Literal(c))
            }
            _ => Err(self.lexer.expected("pattern character")),
        }
    }

    /// group := '(?:' disjunction ')' | '(?v' version_check ')' | '(' disjunction ')'
    fn parse_group(&mut self) -> ParseResult<Expr> {
        if self.lexer.starts_with("(?:") {
            return self.parse_group_body("(?:", GroupKind::NonCapturing);
        }
        if self.lexer.starts_with("(?v") {
            return self.parse_version_group();
        }
        if self.lexer.starts_with("(?") {
            let mut ahead = *self.lexer;
            ahead.eat_str("(?");
            return Err(ahead.expected("group modifier `:`, `=`, `!`, `<=`, `<!` or `v`"));
        }
        self.parse_group_body("(", GroupKind::Capturing)
    }

    /// Parse `opener disjunction ')'`
    fn parse_group_body(&mut self, opener: &str, kind: GroupKind) -> ParseResult<Expr> {
        let start = self.lexer.position();
        if self.depth >= MAX_NESTING {
            return Err(SyntaxError::new(
                SyntaxErrorKind::NestingTooDeep(MAX_NESTING),
                Span::new(start, start + opener.len()),
            ));
        }
        self.lexer.eat_str(opener);
        self.depth += 1;
        let body = self.parse_disjunction();
        self.depth -= 1;
        let body = body?;
        self.close_group(start)?;
        Ok(Expr::group(kind, body))
    }

    /// '(?v' version_check ')'
    fn parse_version_group(&mut self) -> ParseResult<Expr> {
        let start = self.lexer.position();
        self.lexer.eat_str("(?v");
        let source_start = self.lexer.position();
        let assertions = version::parse_assertions(self.lexer)?;
        self.lexer.skip_whitespace();
        let source = self
            .lexer
            .slice(source_start, self.lexer.position())
            .to_string();
        self.close_group(start)?;
        Ok(Expr::VersionGroup(VersionGroup { assertions, source }))
    }

    fn close_group(&mut self, start: usize) -> ParseResult<()> {
        if self.lexer.eat(')') {
            return Ok(());
        }
        if self.lexer.is_eof() {
            return Err(SyntaxError::new(
                SyntaxErrorKind::UnterminatedGroup,
                Span::new(start, self.lexer.position()),
            ));
        }
        Err(self.lexer.expected("`)`"))
    }

    /// escape := '\' ( 'x' hex{2} | 'u' hex{4} | 'c' alpha | printable )
    fn parse_escape(&mut self) -> ParseResult<Escape> {
        let start = self.lexer.position();
        self.lexer.expect('\\')?;
        if self.lexer.eat('x')
            && let Some(digits) = self.read_hex(2)
        {
            return Ok(Escape::Hex(digits));
        }
        self.lexer.reset(start + 1);
        if self.lexer.eat('u')
            && let Some(digits) = self.read_hex(4)
        {
            return Ok(Escape::Unicode(digits));
        }
        self.lexer.reset(start + 1);
        if self.lexer.eat('c')
            && let Some(c) = self.lexer.peek().filter(|c| c.is_ascii_alphabetic())
        {
            self.lexer.advance();
            return Ok(Escape::Control(c));
        }
        self.lexer.reset(start + 1);
        match self.lexer.peek() {
            Some(c) if c.is_ascii_graphic() => {
                self.lexer.advance();
                Ok(Escape::Char(c))
            }
            Some(c) => Err(SyntaxError::new(
                SyntaxErrorKind::InvalidEscape,
                Span::new(start, start + 1 + c.len_utf8()),
            )),
            None => Err(self.lexer.expected("escaped character")),
        }
    }

    /// Read exactly `n` hex digits, or nothing
    fn read_hex(&mut self, n: usize) -> Option<String> {
        let start = self.lexer.position();
        let mut digits = String::with_capacity(n);
        for _ in 0..n {
            match self.lexer.peek() {
                Some(c) if c.is_ascii_hexdigit() => {
                    self.lexer.advance();
                    digits.push(c);
                }
                _ => {
                    self.lexer.reset(start);
                    return None;
                }
            }
        }
        Some(digits)
    }

    /// char_class := '[' '^'? ( class_atom ( '-' class_atom )? )* ']'
    ///
    /// A `-` forms a range only between two atoms; at either edge of the
    /// class it is literal.
    fn parse_char_class(&mut self) -> ParseResult<CharacterClass> {
        let start = self.lexer.position();
        self.lexer.expect('[')?;
        let negated = self.lexer.eat('^');
        let mut items = Vec::new();
        loop {
            match self.lexer.peek() {
                None => {
                    return Err(SyntaxError::new(
                        SyntaxErrorKind::UnterminatedClass,
                        Span::new(start, self.lexer.position()),
                    ));
                }
                Some(']') => {
                    self.lexer.advance();
                    break;
                }
                Some(_) => {}
            }
            let atom_start = self.lexer.position();
            let first = self.parse_class_atom()?;
            let is_range = self.lexer.peek() == Some('-')
                && self.lexer.peek_nth(1).is_some_and(|c| c != ']');
            if is_range {
                self.lexer.advance();
                let last = self.parse_class_atom()?;
                check_range(&first, &last, Span::new(atom_start, self.lexer.position()))?;
                items.push(ClassItem::Range(first, last));
            } else {
                items.push(ClassItem::Atom(first));
            }
        }
        Ok(CharacterClass { negated, items })
    }

    /// class_atom := posix | escape | any char except '\' and ']'
    fn parse_class_atom(&mut self) -> ParseResult<ClassAtom> {
        if let Some(posix) = self.parse_posix() {
            return Ok(posix);
        }
        match self.lexer.peek() {
            Some('\\') => self.parse_escape().map(ClassAtom::Escape),
            Some(c) if c != ']' => {
                self.lexer.advance();
                Ok(ClassAtom::Char(c))
            }
            _ => Err(self.lexer.expected("class character")),
        }
    }

    /// posix := '[' d name d ']' for d in ':', '.', '='
    ///
    /// Leaves the lexer untouched when the bracket expression is incomplete,
    /// in which case the `[` is an ordinary class character.
    fn parse_posix(&mut self) -> Option<ClassAtom> {
        let start = self.lexer.position();
        if self.lexer.peek() != Some('[') {
            return None;
        }
        let kind = self.lexer.peek_nth(1).and_then(PosixKind::from_delimiter)?;
        let d = kind.delimiter();
        self.lexer.advance();
        self.lexer.advance();
        let name = self.lexer.read_while(|c| !matches!(c, '.' | '=' | ':'));
        if !name.is_empty() && self.lexer.eat(d) && self.lexer.eat(']') {
            return Some(ClassAtom::Posix {
                kind,
                name: name.to_string(),
            });
        }
        self.lexer.reset(start);
        None
    }
}

/// Reject ranges that a standard ECMAScript engine refuses
fn check_range(first: &ClassAtom, last: &ClassAtom, span: Span) -> ParseResult<()> {
    for atom in [first, last] {
        if let ClassAtom::Escape(escape) = atom
            && escape.is_class_escape()
        {
            return Err(SyntaxError::new(
                SyntaxErrorKind::ClassEscapeInRange(escape.to_string()),
                span,
            ));
        }
    }
    if let (Some(lo), Some(hi)) = (class_code_point(first), class_code_point(last))
        && lo > hi
    {
        return Err(SyntaxError::new(
            SyntaxErrorKind::RangeOutOfOrder {
                start: first.to_string(),
                end: last.to_string(),
            },
            span,
        ));
    }
    Ok(())
}

fn class_code_point(atom: &ClassAtom) -> Option<u32> {
    match atom {
        ClassAtom::Char(c) => Some(*c as u32),
        ClassAtom::Escape(escape) => escape.code_point(),
        ClassAtom::Posix { .. } => None,
    }
}

/// Parse a standalone regex pattern string into an AST
pub fn parse(input: &str) -> Result<Expr> {
    let mut lexer = Lexer::new(input);
    let expr = Parser::new(&mut lexer).parse()?;
    Ok(expr)
}
