//! Parser for Scheme s-expressions.
//!
//! Consumes tokens from the `Tokenizer` and produces unevaluated, interned
//! s-expressions on the heap. One call reads one top-level expression;
//! `Ok(None)` distinguishes end-of-stream from a parse fault, so the caller
//! can keep reading successive forms from the same port.

use crate::error::SchemeError;
use crate::gc::{new_char, new_int, new_list, new_pair, new_string, new_symbol, GcHeap, GcRef};
use crate::io::Port;
use crate::tokenizer::{Token, Tokenizer};

/// Parser for Scheme s-expressions.
pub struct Parser;

impl Parser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse one s-expression from the port.
    ///
    /// Returns `Ok(Some(expr))` for a complete expression, `Ok(None)` at end
    /// of input, and a fault for malformed input. A fault aborts only the
    /// current read; the caller decides whether to retry on further input.
    pub fn parse(&mut self, heap: &mut GcHeap, port: &mut Port) -> Result<Option<GcRef>, SchemeError> {
        let mut tokenizer = Tokenizer::new(port);
        match tokenizer.next_token()? {
            Token::Eof => Ok(None),
            token => Ok(Some(Self::parse_from_token(heap, token, &mut tokenizer)?)),
        }
    }

    /// Parse an s-expression starting from an already-read token.
    fn parse_from_token(
        heap: &mut GcHeap,
        token: Token,
        tokenizer: &mut Tokenizer,
    ) -> Result<GcRef, SchemeError> {
        match token {
            Token::Number(s) => Self::parse_number_token(heap, &s),
            Token::Str(s) => Ok(new_string(heap, &s)),
            Token::Boolean(b) => Ok(crate::gc::new_bool(heap, b)),
            Token::Character(c) => Ok(new_char(heap, c)),
            Token::Symbol(s) => Ok(Self::parse_symbol_token(heap, &s)),
            Token::LeftParen => Self::parse_list(heap, tokenizer),
            Token::RightParen => Err(SchemeError::Parse("unexpected ')'".to_string())),
            Token::Quote => Self::parse_quoted_expression(heap, tokenizer),
            Token::Dot => Err(SchemeError::Parse(
                "dotted tails are not supported".to_string(),
            )),
            Token::Eof => Err(SchemeError::Parse("unexpected end of input".to_string())),
        }
    }

    fn parse_number_token(heap: &mut GcHeap, s: &str) -> Result<GcRef, SchemeError> {
        let n: i64 = s
            .parse()
            .map_err(|_| SchemeError::Parse(format!("integer literal out of range: {}", s)))?;
        Ok(new_int(heap, n))
    }

    /// Interns a word as a symbol; `else` alone maps to the cond marker.
    fn parse_symbol_token(heap: &mut GcHeap, s: &str) -> GcRef {
        if s == "else" {
            heap.else_marker()
        } else {
            new_symbol(heap, s)
        }
    }

    /// Parse `'expr` as `(quote expr)`.
    fn parse_quoted_expression(
        heap: &mut GcHeap,
        tokenizer: &mut Tokenizer,
    ) -> Result<GcRef, SchemeError> {
        let token = tokenizer.next_token()?;
        let quoted = Self::parse_from_token(heap, token, tokenizer)?;
        let quote_sym = new_symbol(heap, "quote");
        Ok(new_list(heap, &[quote_sym, quoted]))
    }

    /// Parse a list after the opening '('. `()` is the empty list.
    fn parse_list(heap: &mut GcHeap, tokenizer: &mut Tokenizer) -> Result<GcRef, SchemeError> {
        let mut elements = Vec::new();
        loop {
            match tokenizer.next_token()? {
                Token::RightParen => {
                    let mut list = heap.nil();
                    for elem in elements.into_iter().rev() {
                        list = new_pair(heap, elem, list);
                    }
                    return Ok(list);
                }
                Token::Eof => {
                    return Err(SchemeError::Parse("unterminated list".to_string()));
                }
                Token::Dot => {
                    // The original reader consumed a dot and then dropped the
                    // pending list on the floor; dotted tails stay out of the
                    // grammar and fault instead of silently losing the value.
                    return Err(SchemeError::Parse(
                        "dotted tails are not supported".to_string(),
                    ));
                }
                token => {
                    elements.push(Self::parse_from_token(heap, token, tokenizer)?);
                }
            }
        }
    }
}
