//! # sdprompt
//!
//! A parser for Stable Diffusion style prompts: plain tags, `(emphasis)` and
//! `[de-emphasis]` groups, explicit `(tag:1.3)` weights and
//! `<lora:file:0.8>` / `<hypernet:file>` model references.
//!
//! The parser repairs most malformed input instead of rejecting it, so
//! `parse_and_evaluate` yields the final attention weight of every tag and
//! `parse_and_beautify` yields a canonical, whitespace-normalized rendering.

pub mod prompt;

pub use prompt::ast::{ModelKind, ModelRef, Node, Prompt, Tag};
pub use prompt::evaluation::{
    evaluate, evaluate_with, EvaluatedModel, EvaluatedTag, EvaluationResult,
};
pub use prompt::formats::{beautify, clean};
pub use prompt::lexing::{tokenize, Token, TokenKind};
pub use prompt::parsing::{parse, ParseError};
pub use prompt::processor::{
    parse_and_beautify, parse_and_clean, parse_and_evaluate, parse_and_evaluate_with,
};
