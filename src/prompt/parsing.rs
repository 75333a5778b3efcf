//! Parsing module for the prompt notation
//!
//! Turns prompt text into a [`Prompt`] tree. The parser is deliberately
//! forgiving; see [`parser`] for the recovery rules and [`ParseError`] for the
//! few shapes it rejects.

pub mod error;
pub mod number;
pub mod parser;

pub use error::ParseError;
pub use number::{NumberRole, DEFAULT_MULTIPLIER, DEFAULT_WEIGHT};
pub use parser::{unescape, PromptParser, MAX_DEPTH};

use crate::prompt::ast::Prompt;

/// Parse prompt text into its tree
pub fn parse(source: &str) -> Result<Prompt, ParseError> {
    PromptParser::new(source).parse()
}
