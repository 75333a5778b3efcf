//! Parse errors
//!
//! Only shapes the parser cannot repair surface here. Everything else
//! (unbalanced brackets, odd decimal separators, non-numeric weights) is
//! normalized silently.

use thiserror::Error;

/// Unrecoverable prompt syntax errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A tag was required but the next token is structural or missing
    #[error("tag expected")]
    TagExpected,
    /// `<lora` or `<hypernet` not followed by `:`
    #[error(": expected")]
    ColonExpected,
    #[error("filename expected")]
    FilenameExpected,
    #[error("multiplier expected")]
    MultiplierExpected,
    /// A model reference ended on something other than `>`
    #[error("> expected")]
    CloseAngleExpected,
}
