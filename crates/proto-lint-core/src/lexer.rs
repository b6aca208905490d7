//! Tokenizer for schema source text.
//!
//! Shared by the parser and by rule fixes that need to locate an
//! identifier token inside a declaration. Comments and whitespace are
//! skipped; every token carries its byte span and 1-indexed line/column.

use crate::position::Position;

/// Kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword (`message`, `SearchRequest`, `int32`).
    Ident,
    /// Numeric literal, without sign (`1`, `0x1F`, `1.5e-3`, `inf`).
    Number,
    /// Quoted string literal, including quotes.
    Str,
    /// Single punctuation character (`{`, `=`, `;`, `.`).
    Symbol,
}

/// A token borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'s> {
    /// Token kind.
    pub kind: TokenKind,
    /// Source text of the token.
    pub text: &'s str,
    /// Byte offset of the first character.
    pub offset: usize,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in characters).
    pub column: usize,
}

impl Token<'_> {
    /// Byte offset one past the last character.
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    /// Returns true for an identifier token with exactly this text.
    #[must_use]
    pub fn is_ident(&self, text: &str) -> bool {
        self.kind == TokenKind::Ident && self.text == text
    }

    /// Returns true for a symbol token with exactly this character.
    #[must_use]
    pub fn is_symbol(&self, symbol: char) -> bool {
        self.kind == TokenKind::Symbol && self.text.starts_with(symbol)
    }

    /// Returns the position of this token within `filename`.
    #[must_use]
    pub fn position(&self, filename: &str) -> Position {
        Position::new(filename, self.offset, self.line, self.column)
    }

    /// Returns the string literal contents without quotes or escape processing.
    #[must_use]
    pub fn unquoted(&self) -> &str {
        if self.kind == TokenKind::Str && self.text.len() >= 2 {
            &self.text[1..self.text.len() - 1]
        } else {
            self.text
        }
    }
}

/// Error produced when the source cannot be tokenized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message} at {line}:{column}")]
pub struct LexError {
    /// Description of the problem.
    pub message: String,
    /// Byte offset where the problem starts.
    pub offset: usize,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

/// Streaming tokenizer over a source string.
#[derive(Debug, Clone)]
pub struct Lexer<'s> {
    source: &'s str,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'s> Lexer<'s> {
    /// Creates a lexer positioned at the start of `source`.
    #[must_use]
    pub fn new(source: &'s str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Creates a lexer that resumes at a known position.
    ///
    /// `offset` must be on a character boundary; `line` and `column` must
    /// describe that same offset.
    #[must_use]
    pub fn resume(source: &'s str, offset: usize, line: usize, column: usize) -> Self {
        Self {
            source,
            offset: offset.min(source.len()),
            line,
            column,
        }
    }

    /// Returns the current byte offset.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn peek_char(&self) -> Option<char> {
        self.source.get(self.offset..)?.chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.source.get(self.offset..)?.chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.offset += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> LexError {
        LexError {
            message: message.into(),
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    /// Skips whitespace and comments.
    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match (self.peek_char(), self.peek_second()) {
                (Some(c), _) if c.is_whitespace() => {
                    self.bump();
                }
                (Some('/'), Some('/')) => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                (Some('/'), Some('*')) => {
                    let start = self.error("unterminated block comment");
                    self.bump();
                    self.bump();
                    loop {
                        match (self.peek_char(), self.peek_second()) {
                            (Some('*'), Some('/')) => {
                                self.bump();
                                self.bump();
                                break;
                            }
                            (Some(_), _) => {
                                self.bump();
                            }
                            (None, _) => return Err(start),
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    /// Returns the next token, or `None` at end of input.
    ///
    /// # Errors
    ///
    /// Returns an error for unterminated strings or comments and for
    /// characters that cannot start a token.
    pub fn next_token(&mut self) -> Result<Option<Token<'s>>, LexError> {
        self.skip_trivia()?;

        let Some(c) = self.peek_char() else {
            return Ok(None);
        };
        let (offset, line, column) = (self.offset, self.line, self.column);

        let kind = if c.is_ascii_alphabetic() || c == '_' {
            while matches!(self.peek_char(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
                self.bump();
            }
            TokenKind::Ident
        } else if c.is_ascii_digit()
            || (c == '.' && matches!(self.peek_second(), Some(d) if d.is_ascii_digit()))
        {
            self.lex_number();
            TokenKind::Number
        } else if c == '"' || c == '\'' {
            self.lex_string(c)?;
            TokenKind::Str
        } else if c.is_ascii_punctuation() {
            self.bump();
            TokenKind::Symbol
        } else {
            return Err(self.error(format!("unexpected character {c:?}")));
        };

        Ok(Some(Token {
            kind,
            text: &self.source[offset..self.offset],
            offset,
            line,
            column,
        }))
    }

    fn lex_number(&mut self) {
        let start = self.offset;
        let mut prev = '\0';
        while let Some(c) = self.peek_char() {
            let is_hex = self.source[start..self.offset].starts_with("0x")
                || self.source[start..self.offset].starts_with("0X");
            let exponent_sign = (c == '+' || c == '-') && matches!(prev, 'e' | 'E') && !is_hex;
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || exponent_sign {
                prev = c;
                self.bump();
            } else {
                break;
            }
        }
    }

    fn lex_string(&mut self, quote: char) -> Result<(), LexError> {
        let start = self.error("unterminated string literal");
        self.bump();
        loop {
            match self.peek_char() {
                Some('\\') => {
                    self.bump();
                    if self.bump().is_none() {
                        return Err(start);
                    }
                }
                Some('\n') | None => return Err(start),
                Some(c) => {
                    self.bump();
                    if c == quote {
                        return Ok(());
                    }
                }
            }
        }
    }
}

impl<'s> Iterator for Lexer<'s> {
    type Item = Result<Token<'s>, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

/// Tokenizes the whole source.
///
/// # Errors
///
/// Returns the first lexical error encountered.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    Lexer::new(source).collect()
}
