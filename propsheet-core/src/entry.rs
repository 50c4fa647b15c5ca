//! Parser for props entries
//!
//! An entry binds a selector to a brace-delimited props block:
//!
//! ```text
//! manufacturer = "acme", swVersion ~ /fw-(?v >= 1.2)/ { timeout: 30, verbose: true }
//! ```
//!
//! Grammar:
//!   document := entry*
//!   entry    := selector props
//!   selector := ( clause ( ',' clause )* )?
//!   clause   := property '=' string | property '~' '/' regex '/'
//!   props    := '{' ( item ( ',' item )* )? '}'
//!   item     := name ':' value | props
//!   value    := string | integer | 'true' | 'false'
//!
//! Whitespace is skipped between lexemes but never inside the regex.

use tracing::debug;

use crate::ast::Expr;
use crate::document::Value;
use crate::error::{Result, Span, SyntaxError, SyntaxErrorKind};
use crate::lexer::Lexer;
use crate::parser::{MAX_NESTING, Parser};

type ParseResult<T> = std::result::Result<T, SyntaxError>;

/// A parsed entry, before materialization
#[derive(Debug, Clone, PartialEq)]
pub struct EntryNode {
    pub selector: Vec<Clause>,
    pub props: PropsBlock,
    pub span: Span,
}

/// One `property op value` condition of a selector
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub property: String,
    pub condition: Condition,
    pub span: Span,
}

/// The right-hand side of a selector clause
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `= "value"`
    Exact(String),
    /// `~ /regex/`
    Fuzzy(Expr),
}

/// A `{ ... }` props block
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropsBlock {
    pub items: Vec<PropItem>,
}

/// An item of a props block
#[derive(Debug, Clone, PartialEq)]
pub enum PropItem {
    /// `name: value`
    Pair { name: String, value: Value },
    /// A nested `{ ... }` block
    Nested(PropsBlock),
}

fn is_selector_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

fn is_prop_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// Parser for props entries
pub struct EntryParser<'a> {
    lexer: Lexer<'a>,
    depth: usize,
}

impl<'a> EntryParser<'a> {
    /// Create a new parser for the given input string
    pub fn new(input: &'a str) -> Self {
        EntryParser {
            lexer: Lexer::new(input),
            depth: 0,
        }
    }

    /// Parse entries until the end of input
    pub fn parse(&mut self) -> ParseResult<Vec<EntryNode>> {
        let mut entries = Vec::new();
        loop {
            self.lexer.skip_whitespace();
            if self.lexer.is_eof() {
                break;
            }
            entries.push(self.parse_entry()?);
        }
        debug!(entries = entries.len(), "parsed props entries");
        Ok(entries)
    }

    /// entry := selector props
    fn parse_entry(&mut self) -> ParseResult<EntryNode> {
        let start = self.lexer.position();
        let selector = self.parse_selector()?;
        self.lexer.skip_whitespace();
        if self.lexer.peek() != Some('{') {
            let expected = if selector.is_empty() {
                "selector or `{`"
            } else {
                "`,` or `{`"
            };
            return Err(self.lexer.expected(expected));
        }
        let props = self.parse_props()?;
        Ok(EntryNode {
            selector,
            props,
            span: Span::new(start, self.lexer.position()),
        })
    }

    /// selector := ( clause ( ',' clause )* )?
    fn parse_selector(&mut self) -> ParseResult<Vec<Clause>> {
        let mut clauses = Vec::new();
        self.lexer.skip_whitespace();
        if !self.lexer.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            return Ok(clauses);
        }
        clauses.push(self.parse_clause()?);
        loop {
            self.lexer.skip_whitespace();
            if !self.lexer.eat(',') {
                break;
            }
            self.lexer.skip_whitespace();
            clauses.push(self.parse_clause()?);
        }
        Ok(clauses)
    }

    /// clause := property '=' string | property '~' '/' regex '/'
    fn parse_clause(&mut self) -> ParseResult<Clause> {
        let start = self.lexer.position();
        let property = self
            .lexer
            .read_identifier(is_selector_char)
            .ok_or_else(|| self.lexer.expected("property name"))?
            .to_string();
        self.lexer.skip_whitespace();
        let condition = if self.lexer.eat('=') {
            self.lexer.skip_whitespace();
            if self.lexer.peek() != Some('"') {
                return Err(self.lexer.expected("quoted string"));
            }
            Condition::Exact(self.lexer.read_quoted_string()?)
        } else if self.lexer.eat('~') {
            self.lexer.skip_whitespace();
            self.lexer.expect('/')?;
            Condition::Fuzzy(Parser::new(&mut self.lexer).parse_delimited('/')?)
        } else {
            return Err(self.lexer.expected("`=` or `~`"));
        };
        Ok(Clause {
            property,
            condition,
            span: Span::new(start, self.lexer.position()),
        })
    }

    /// props := '{' ( item ( ',' item )* )? '}'
    fn parse_props(&mut self) -> ParseResult<PropsBlock> {
        let start = self.lexer.position();
        if self.depth >= MAX_NESTING {
            return Err(SyntaxError::new(
                SyntaxErrorKind::NestingTooDeep(MAX_NESTING),
                Span::single(start),
            ));
        }
        self.depth += 1;
        let block = self.parse_props_items();
        self.depth -= 1;
        block
    }

    fn parse_props_items(&mut self) -> ParseResult<PropsBlock> {
        self.lexer.expect('{')?;
        let mut block = PropsBlock::default();
        self.lexer.skip_whitespace();
        if self.lexer.eat('}') {
            return Ok(block);
        }
        loop {
            self.lexer.skip_whitespace();
            block.items.push(self.parse_item()?);
            self.lexer.skip_whitespace();
            if self.lexer.eat(',') {
                continue;
            }
            if self.lexer.eat('}') {
                return Ok(block);
            }
            return Err(self.lexer.expected("`,` or `}`"));
        }
    }

    /// item := name ':' value | props
    fn parse_item(&mut self) -> ParseResult<PropItem> {
        if self.lexer.peek() == Some('{') {
            return self.parse_props().map(PropItem::Nested);
        }
        let name = self
            .lexer
            .read_identifier(is_prop_name_char)
            .ok_or_else(|| self.lexer.expected("property name or `{`"))?
            .to_string();
        self.lexer.skip_whitespace();
        self.lexer.expect(':')?;
        self.lexer.skip_whitespace();
        let value = self.parse_value()?;
        Ok(PropItem::Pair { name, value })
    }

    /// value := string | integer | 'true' | 'false'
    fn parse_value(&mut self) -> ParseResult<Value> {
        match self.lexer.peek() {
            Some('"') => self.lexer.read_quoted_string().map(Value::String),
            Some(c) if c.is_ascii_digit() || c == '-' || c == '+' => {
                self.lexer.read_integer().map(Value::Integer)
            }
            _ => {
                let start = self.lexer.position();
                match self.lexer.read_identifier(is_prop_name_char) {
                    Some("true") => Ok(Value::Boolean(true)),
                    Some("false") => Ok(Value::Boolean(false)),
                    _ => {
                        self.lexer.reset(start);
                        Err(self.lexer.expected("string, integer or boolean"))
                    }
                }
            }
        }
    }
}

/// Parse props text into entry nodes
pub fn parse(input: &str) -> Result<Vec<EntryNode>> {
    let entries = EntryParser::new(input).parse()?;
    Ok(entries)
}
