//! Text renderings of a parsed prompt

pub mod beautify;

pub use beautify::{beautify, clean, escape_word, format_number};
