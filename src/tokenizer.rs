//! Tokenizer for Scheme source text.
//!
//! Converts the character stream from a `Port` into tokens. The lexical
//! rules are strict about delimiters: a token is ended by whitespace, `(`,
//! `)`, `"`, `;`, or end of input, and character and number literals that
//! run into anything else are parse faults rather than being split.

use crate::error::SchemeError;
use crate::io::Port;

/// A lexical token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// An integer literal, still in textual form
    Number(String),
    /// A symbol (identifier)
    Symbol(String),
    /// A string literal, contents taken verbatim
    Str(String),
    /// #t or #f
    Boolean(bool),
    /// A character literal #\c
    Character(char),
    /// Left parenthesis
    LeftParen,
    /// Right parenthesis
    RightParen,
    /// Single quote
    Quote,
    /// A lone dot
    Dot,
    /// End of input
    Eof,
}

/// Tokenizer that reads characters from a port and produces tokens.
pub struct Tokenizer<'a> {
    port: &'a mut Port,
}

fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

fn is_delimiter(c: Option<char>) -> bool {
    match c {
        None => true,
        Some(c) => is_whitespace(c) || matches!(c, '(' | ')' | '"' | ';'),
    }
}

fn is_symbol_initial(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '*' | '/' | '+' | '-' | '>' | '<' | '=' | '?' | '!')
}

impl<'a> Tokenizer<'a> {
    pub fn new(port: &'a mut Port) -> Self {
        Self { port }
    }

    /// Skip whitespace and `;` line comments.
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.port.read_char() {
                Some(c) if is_whitespace(c) => {}
                Some(';') => {
                    // Comment runs to end of line
                    while let Some(c) = self.port.read_char() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                Some(_) => {
                    self.port.unread_char();
                    break;
                }
                None => break,
            }
        }
    }

    /// Read the next token from the input stream.
    ///
    /// Returns `Token::Eof` at end of input. Characters that begin no token
    /// also signal end-of-stream, matching the reader contract.
    pub fn next_token(&mut self) -> Result<Token, SchemeError> {
        self.skip_whitespace_and_comments();
        match self.port.read_char() {
            None => Ok(Token::Eof),
            Some('(') => Ok(Token::LeftParen),
            Some(')') => Ok(Token::RightParen),
            Some('\'') => Ok(Token::Quote),
            Some('.') => Ok(Token::Dot),
            Some('#') => self.read_boolean_or_char(),
            Some('"') => self.read_string(),
            Some(c) if c.is_ascii_digit() => self.read_number(c),
            Some('-') if self.port.peek_char().map_or(false, |c| c.is_ascii_digit()) => {
                self.read_number('-')
            }
            Some(c) if is_symbol_initial(c) => self.read_symbol(c),
            Some(_) => Ok(Token::Eof),
        }
    }

    /// Read #t, #f, or a #\c character literal.
    fn read_boolean_or_char(&mut self) -> Result<Token, SchemeError> {
        match self.port.read_char() {
            Some('t') => Ok(Token::Boolean(true)),
            Some('f') => Ok(Token::Boolean(false)),
            Some('\\') => {
                let c = self.port.read_char().ok_or_else(|| {
                    SchemeError::Parse("incomplete character literal".to_string())
                })?;
                // The character must be immediately followed by a delimiter
                if !is_delimiter(self.port.peek_char()) {
                    return Err(SchemeError::Parse(
                        "character not followed by delimiter".to_string(),
                    ));
                }
                Ok(Token::Character(c))
            }
            _ => Err(SchemeError::Parse(
                "malformed boolean or character literal".to_string(),
            )),
        }
    }

    /// Read a decimal integer literal (possibly negated).
    fn read_number(&mut self, first_char: char) -> Result<Token, SchemeError> {
        let mut number = first_char.to_string();
        loop {
            match self.port.read_char() {
                Some(c) if c.is_ascii_digit() => number.push(c),
                Some(_) => {
                    self.port.unread_char();
                    break;
                }
                None => break,
            }
        }
        if !is_delimiter(self.port.peek_char()) {
            return Err(SchemeError::Parse(
                "number not followed by delimiter".to_string(),
            ));
        }
        Ok(Token::Number(number))
    }

    /// Read a string literal: raw characters until the closing quote,
    /// with no escape processing.
    fn read_string(&mut self) -> Result<Token, SchemeError> {
        let mut string = String::new();
        loop {
            match self.port.read_char() {
                Some('"') => break,
                Some(c) => string.push(c),
                None => {
                    return Err(SchemeError::Parse("unterminated string literal".to_string()))
                }
            }
        }
        Ok(Token::Str(string))
    }

    /// Read a symbol: the initial class continues, digits may follow.
    fn read_symbol(&mut self, first_char: char) -> Result<Token, SchemeError> {
        let mut symbol = first_char.to_string();
        loop {
            match self.port.read_char() {
                Some(c) if is_symbol_initial(c) || c.is_ascii_digit() => symbol.push(c),
                Some(_) => {
                    self.port.unread_char();
                    break;
                }
                None => break,
            }
        }
        if !is_delimiter(self.port.peek_char()) {
            return Err(SchemeError::Parse(
                "symbol not followed by delimiter".to_string(),
            ));
        }
        Ok(Token::Symbol(symbol))
    }
}
