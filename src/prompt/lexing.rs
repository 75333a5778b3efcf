//! Lexer module for the prompt notation
//!
//! Tokenization is a single logos pass over the input after the full-width
//! punctuation commonly typed with CJK input methods has been folded to ASCII.
//! The result is a flat token list; all structure is recovered by the parser.

pub mod reader;
pub mod tokens;

use logos::Logos;

pub use reader::{CursorError, TokenCursor};
pub use tokens::{Token, TokenKind};

/// Full-width characters folded to their ASCII equivalents before scanning
const FULL_WIDTH_PUNCTUATION: [(char, char); 4] =
    [('，', ','), ('：', ':'), ('（', '('), ('）', ')')];

/// Fold full-width comma, colon and parentheses to ASCII.
///
/// Every replacement is one character for one character, so character offsets
/// into the folded text are also offsets into the original.
pub fn normalize_punctuation(source: &str) -> String {
    source
        .chars()
        .map(|c| {
            FULL_WIDTH_PUNCTUATION
                .iter()
                .find(|(wide, _)| *wide == c)
                .map_or(c, |(_, ascii)| *ascii)
        })
        .collect()
}

/// Tokenize a prompt into its ordered token list. Never fails.
pub fn tokenize(source: &str) -> Vec<Token> {
    let normalized = normalize_punctuation(source);
    let mut lexer = TokenKind::lexer(&normalized);
    let mut tokens = Vec::new();

    // logos reports byte spans; positions are kept in characters
    let mut byte_offset = 0;
    let mut char_offset = 0;

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        char_offset += normalized[byte_offset..span.start].chars().count();
        byte_offset = span.start;

        match result {
            Ok(kind) => tokens.push(Token::new(kind, lexer.slice(), char_offset)),
            Err(()) => {
                tracing::trace!(
                    position = char_offset,
                    slice = lexer.slice(),
                    "unlexable input skipped"
                );
            }
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(source: &str) -> Vec<String> {
        tokenize(source).into_iter().map(|t| t.value).collect()
    }

    #[test]
    fn test_simple_tokenization() {
        assert_eq!(tokenize("abc"), vec![Token::new(TokenKind::Word, "abc", 0)]);
    }

    #[test]
    fn test_positions() {
        assert_eq!(
            tokenize("abc, xyz"),
            vec![
                Token::new(TokenKind::Word, "abc", 0),
                Token::new(TokenKind::Comma, ",", 3),
                Token::new(TokenKind::Word, "xyz", 5),
            ]
        );
        assert_eq!(
            tokenize("[abc:0.5]"),
            vec![
                Token::new(TokenKind::OpenBracket, "[", 0),
                Token::new(TokenKind::Word, "abc", 1),
                Token::new(TokenKind::Colon, ":", 4),
                Token::new(TokenKind::Word, "0.5", 5),
                Token::new(TokenKind::CloseBracket, "]", 8),
            ]
        );
    }

    #[test]
    fn test_pipe_is_its_own_token() {
        assert_eq!(values("(abc|xyz)"), vec!["(", "abc", "|", "xyz", ")"]);
    }

    #[test]
    fn test_full_width_punctuation() {
        assert_eq!(values("（abc：1，5）"), vec!["(", "abc", ":", "1", ",", "5", ")"]);
    }

    #[test]
    fn test_positions_count_characters() {
        let tokens = tokenize("猫，犬");
        assert_eq!(tokens[1], Token::new(TokenKind::Comma, ",", 1));
        assert_eq!(tokens[2], Token::new(TokenKind::Word, "犬", 2));
    }

    #[test]
    fn test_escapes_are_not_resolved() {
        assert_eq!(values(r"\(abc\) x"), vec![r"\(abc\)", "x"]);
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("    ").is_empty());
    }
}
