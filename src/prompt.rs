//! Main module for prompt parsing functionality
//!
//! Data flows text → [`lexing`] → [`parsing`] → [`ast::Prompt`], and the tree
//! is then consumed independently by [`evaluation`] and [`formats`].

pub mod ast;
pub mod config;
pub mod evaluation;
pub mod formats;
pub mod lexing;
pub mod logging;
pub mod parsing;
pub mod processor;
