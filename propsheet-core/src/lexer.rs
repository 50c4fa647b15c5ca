//! Character-level lexer shared by the entry and regex grammars
//!
//! The entry grammar is whitespace-insensitive and calls
//! [`Lexer::skip_whitespace`] between lexemes. The regex grammar never does:
//! inside a regex literal every character is significant.

use crate::error::{Span, SyntaxError, SyntaxErrorKind};

/// Cursor over the source text, tracking a byte position
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given input string
    pub fn new(input: &'a str) -> Self {
        Lexer { input, position: 0 }
    }

    /// Current byte offset
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move back to a previously saved offset
    pub fn reset(&mut self, position: usize) {
        self.position = position;
    }

    /// Source text between two offsets
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    fn rest(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Whether all input has been consumed
    pub fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Peek at the current character without consuming it
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Peek `n` characters ahead of the current one
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Consume and return the current character
    pub fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    /// Consume `c` if it is the current character
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.position += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume `s` if the remaining input starts with it
    pub fn eat_str(&mut self, s: &str) -> bool {
        if self.rest().starts_with(s) {
            self.position += s.len();
            true
        } else {
            false
        }
    }

    /// Whether the remaining input starts with `s`
    pub fn starts_with(&self, s: &str) -> bool {
        self.rest().starts_with(s)
    }

    /// Consume characters while `pred` holds and return them
    pub fn read_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.position;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.position += c.len_utf8();
        }
        self.slice(start, self.position)
    }

    /// Skip spaces, tabs and line breaks
    pub fn skip_whitespace(&mut self) {
        self.read_while(|c| c.is_ascii_whitespace());
    }

    /// Build an error describing what was expected at the current position
    pub fn expected(&self, expected: &str) -> SyntaxError {
        let kind = match self.peek() {
            Some(found) => SyntaxErrorKind::UnexpectedChar {
                expected: expected.to_string(),
                found,
            },
            None => SyntaxErrorKind::UnexpectedEof {
                expected: expected.to_string(),
            },
        };
        SyntaxError::at(kind, self.position)
    }

    /// Consume `c` or fail with an error naming it
    pub fn expect(&mut self, c: char) -> Result<(), SyntaxError> {
        if self.eat(c) {
            Ok(())
        } else {
            Err(self.expected(&format!("`{}`", c)))
        }
    }

    /// Read an identifier: an ASCII letter followed by characters accepted by `body`
    pub fn read_identifier(&mut self, body: impl Fn(char) -> bool) -> Option<&'a str> {
        if !self.peek().is_some_and(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        let start = self.position;
        self.advance();
        self.read_while(body);
        Some(self.slice(start, self.position))
    }

    /// Read a `"`-delimited string and decode its backslash escapes
    ///
    /// `\t`, `\n`, `\r` and `\f` decode to control characters; any other
    /// escaped character stands for itself. Strings may not span lines.
    pub fn read_quoted_string(&mut self) -> Result<String, SyntaxError> {
        let start = self.position;
        self.expect('"')?;
        let mut value = String::new();
        loop {
            let unterminated = || {
                SyntaxError::new(
                    SyntaxErrorKind::UnterminatedString,
                    Span::new(start, start + 1),
                )
            };
            match self.advance() {
                Some('"') => return Ok(value),
                Some('\\') => match self.advance() {
                    Some('t') => value.push('\t'),
                    Some('n') => value.push('\n'),
                    Some('r') => value.push('\r'),
                    Some('f') => value.push('\u{0C}'),
                    Some('\n') | None => return Err(unterminated()),
                    Some(c) => value.push(c),
                },
                Some('\n') | None => return Err(unterminated()),
                Some(c) => value.push(c),
            }
        }
    }

    /// Read a run of ASCII digits as text
    pub fn read_digits(&mut self) -> &'a str {
        self.read_while(|c| c.is_ascii_digit())
    }

    /// Read a signed decimal integer literal
    pub fn read_integer(&mut self) -> Result<i64, SyntaxError> {
        let start = self.position;
        if !self.eat('-') {
            self.eat('+');
        }
        if self.read_digits().is_empty() {
            return Err(self.expected("digit"));
        }
        let text = self.slice(start, self.position);
        text.parse::<i64>().map_err(|_| {
            SyntaxError::new(
                SyntaxErrorKind::NumberOutOfRange(text.to_string()),
                Span::new(start, self.position),
            )
        })
    }
}
