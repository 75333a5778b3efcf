//! Token definitions for the prompt notation
//!
//! The notation has nine single-character structural tokens and one catch-all
//! `Word` token covering every maximal run of other non-space characters.
//! A backslash escapes whatever follows it, so `\(` stays inside a word.
//! Escapes are kept verbatim here and resolved by the parser.
use logos::Logos;
use serde::Serialize;
use std::fmt;

/// All possible token kinds in a prompt
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[logos(skip r" +")]
pub enum TokenKind {
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token("<")]
    OpenAngle,
    #[token(">")]
    CloseAngle,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token("|")]
    Pipe,

    // Anything else, with `\x` escapes kept inside the run. A lone trailing
    // backslash is still a word.
    #[regex(r"([^()\[\]<>:,| \\]|\\[\s\S])+\\?|\\")]
    Word,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::OpenParen => "open-paren",
            TokenKind::CloseParen => "close-paren",
            TokenKind::OpenBracket => "open-bracket",
            TokenKind::CloseBracket => "close-bracket",
            TokenKind::OpenAngle => "open-angle",
            TokenKind::CloseAngle => "close-angle",
            TokenKind::Colon => "colon",
            TokenKind::Comma => "comma",
            TokenKind::Pipe => "pipe",
            TokenKind::Word => "word",
        };
        write!(f, "{}", name)
    }
}

/// A lexed token: its kind, its raw text, and the character offset it started at
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}\t{}", self.position, self.kind, self.value)
    }
}
