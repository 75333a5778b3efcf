//! Forward-only cursor over a token list
//!
//! The parser never looks more than three tokens ahead, so the cursor only
//! offers the current token, a bounded `peek`, and `advance`. Past the end,
//! `current` yields the empty string, which matches no real token value.

use super::tokens::{Token, TokenKind};
use super::tokenize;

/// Errors raised by [`TokenCursor::peek`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    #[error("count out of range: requested {requested}, {remaining} remaining")]
    OutOfRange { requested: usize, remaining: usize },
}

/// Read-only positional view over a token sequence
#[derive(Debug, Clone)]
pub struct TokenCursor {
    tokens: Vec<Token>,
    index: usize,
}

impl TokenCursor {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, index: 0 }
    }

    /// Tokenize `source` and wrap the result
    pub fn from_source(source: &str) -> Self {
        Self::new(tokenize(source))
    }

    /// Value of the current token, or `""` once the stream is exhausted
    pub fn current(&self) -> &str {
        self.tokens
            .get(self.index)
            .map_or("", |token| token.value.as_str())
    }

    /// Kind of the current token, `None` at end of stream
    pub fn current_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.index).map(|token| token.kind)
    }

    /// Character offset of the current token in the source
    pub fn position(&self) -> Option<usize> {
        self.tokens.get(self.index).map(|token| token.position)
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.tokens.len()
    }

    pub fn remaining(&self) -> usize {
        self.tokens.len().saturating_sub(self.index)
    }

    /// Move to the next token. No-op at end of stream.
    pub fn advance(&mut self) {
        if self.index < self.tokens.len() {
            self.index += 1;
        }
    }

    /// Values of the next `count` tokens, starting with the current one
    pub fn peek(&self, count: usize) -> Result<Vec<&str>, CursorError> {
        let remaining = self.remaining();
        if count > remaining {
            return Err(CursorError::OutOfRange {
                requested: count,
                remaining,
            });
        }

        Ok(self.tokens[self.index..self.index + count]
            .iter()
            .map(|token| token.value.as_str())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_walk() {
        let mut cursor = TokenCursor::from_source("(abc:1.5)");

        assert_eq!(cursor.current(), "(");
        assert_eq!(cursor.current_kind(), Some(TokenKind::OpenParen));
        cursor.advance();
        assert_eq!(cursor.current(), "abc");
        assert_eq!(cursor.position(), Some(1));

        assert_eq!(cursor.peek(3), Ok(vec!["abc", ":", "1.5"]));
        // peeking does not consume
        assert_eq!(cursor.current(), "abc");

        assert_eq!(
            cursor.peek(10),
            Err(CursorError::OutOfRange {
                requested: 10,
                remaining: 4
            })
        );
    }

    #[test]
    fn test_end_of_stream_sentinel() {
        let mut cursor = TokenCursor::from_source("abc");
        cursor.advance();
        assert!(cursor.is_at_end());
        assert_eq!(cursor.current(), "");
        assert_eq!(cursor.current_kind(), None);
        assert_eq!(cursor.position(), None);

        cursor.advance();
        assert_eq!(cursor.current(), "");
        assert_eq!(cursor.peek(0), Ok(vec![]));
        assert!(cursor.peek(1).is_err());
    }

    #[test]
    fn test_error_message() {
        let err = TokenCursor::from_source("a").peek(2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "count out of range: requested 2, 1 remaining"
        );
    }
}
