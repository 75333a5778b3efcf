//! Recursive-descent prompt parser
//!
//! Grammar, one method per rule:
//!
//! ```text
//!     prompt    := (stray-closer | contents)*
//!     contents  := (',' | content)*            stops at : ) ] > | or end
//!     content   := emphasis | deemphasis | reference | tag [':' number]
//!     emphasis  := '(' contents (':' contents)* [':' number [',']] ')'
//!     deemphasis:= '[' contents ']'
//!     reference := '<' ('lora' | 'hypernet') ':' word [':' number] '>'
//!     tag       := word+
//! ```
//!
//! The `tag ':' number` shorthand is only recognized at top level. Closers are
//! tolerant: a `}` or the end of input also closes a group, and stray closers
//! at top level are skipped. Groups nest at most [`MAX_DEPTH`] deep; openers
//! past that are dropped and their contents join the innermost group. Each
//! such repair is logged at debug level.

use tracing::debug;

use super::error::ParseError;
use super::number::{self, NumberRole};
use crate::prompt::ast::{ModelKind, ModelRef, Node, Prompt, Tag};
use crate::prompt::lexing::{TokenCursor, TokenKind};

use once_cell::sync::Lazy;
use regex::Regex;

static ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)\\(.)").expect("escape pattern is valid"));

/// Resolve `\x` escapes: the backslash is dropped and `x` kept verbatim
pub fn unescape(token: &str) -> String {
    ESCAPE.replace_all(token, "$1").into_owned()
}

/// Deepest group nesting the parser builds. Keeps the recursive walks over
/// the tree (evaluation, printing, drop) within a small stack.
pub const MAX_DEPTH: usize = 128;

/// Tokens that may directly follow a `:` with the number left out
fn ends_number(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::CloseParen | TokenKind::CloseAngle | TokenKind::Colon
    )
}

/// Multiplier stored on a reference written without one
const UNSET_MULTIPLIER: f64 = 0.0;

/// Parser state for a single invocation
pub struct PromptParser {
    cursor: TokenCursor,
    depth: usize,
}

impl PromptParser {
    /// Prepare a parser for `source`.
    ///
    /// `|` carries no alternation meaning and is rewritten to `,` before
    /// tokenizing, so pipe-separated segments parse as one sequence.
    pub fn new(source: &str) -> Self {
        Self::from_cursor(TokenCursor::from_source(&source.replace('|', ",")))
    }

    pub fn from_cursor(cursor: TokenCursor) -> Self {
        Self { cursor, depth: 0 }
    }

    /// Parse the whole input into a [`Prompt`]
    pub fn parse(mut self) -> Result<Prompt, ParseError> {
        let mut contents = Vec::new();

        loop {
            match self.cursor.current_kind() {
                None => return Ok(Prompt::new(contents)),
                Some(
                    TokenKind::CloseParen
                    | TokenKind::CloseBracket
                    | TokenKind::CloseAngle
                    | TokenKind::Colon
                    | TokenKind::Pipe,
                ) => {
                    debug!(
                        position = ?self.cursor.position(),
                        token = self.cursor.current(),
                        "skipping stray token at top level"
                    );
                    self.cursor.advance();
                }
                Some(_) => contents.extend(self.parse_contents(true)?),
            }
        }
    }

    /// A comma-separated run of content items
    pub fn parse_contents(&mut self, top_level: bool) -> Result<Vec<Node>, ParseError> {
        let mut contents = Vec::new();

        loop {
            match self.cursor.current_kind() {
                Some(TokenKind::Comma) => self.cursor.advance(),
                None
                | Some(
                    TokenKind::Colon
                    | TokenKind::CloseParen
                    | TokenKind::CloseBracket
                    | TokenKind::CloseAngle
                    | TokenKind::Pipe,
                ) => return Ok(contents),
                Some(_) => {
                    if let Some(node) = self.parse_content(top_level)? {
                        contents.push(node);
                    }
                }
            }
        }
    }

    /// One content item. `None` means the item was dropped during recovery.
    pub fn parse_content(&mut self, top_level: bool) -> Result<Option<Node>, ParseError> {
        match self.cursor.current_kind() {
            Some(TokenKind::OpenParen | TokenKind::OpenBracket) if self.depth >= MAX_DEPTH => {
                debug!(
                    position = ?self.cursor.position(),
                    depth = self.depth,
                    "nesting too deep, opener dropped"
                );
                self.cursor.advance();
                Ok(None)
            }
            Some(TokenKind::OpenParen) => self.nested(Self::parse_emphasis).map(Some),
            Some(TokenKind::OpenBracket) => self.nested(Self::parse_deemphasis).map(Some),
            Some(TokenKind::OpenAngle) => self.parse_reference(),
            _ => self.parse_weighted_tag(top_level).map(Some),
        }
    }

    /// Run a group rule one nesting level down
    fn nested<F>(&mut self, rule: F) -> Result<Node, ParseError>
    where
        F: FnOnce(&mut Self) -> Result<Node, ParseError>,
    {
        self.depth += 1;
        let node = rule(self);
        self.depth -= 1;
        node
    }

    /// A maximal run of words
    pub fn parse_tag(&mut self) -> Result<Tag, ParseError> {
        let mut words = Vec::new();
        while self.cursor.current_kind() == Some(TokenKind::Word) {
            words.push(unescape(self.cursor.current()));
            self.cursor.advance();
        }

        if words.is_empty() {
            return Err(ParseError::TagExpected);
        }
        Ok(Tag::from_words(words))
    }

    fn parse_weighted_tag(&mut self, top_level: bool) -> Result<Node, ParseError> {
        let tag = self.parse_tag()?;

        if top_level && self.cursor.current_kind() == Some(TokenKind::Colon) {
            let weighted = self
                .cursor
                .peek(2)
                .map_or(false, |next| number::is_number(next[1]));
            if weighted {
                self.cursor.advance();
                let weight = self.parse_number(NumberRole::Weight)?;
                return Ok(Node::CustomWeight {
                    weight,
                    contents: vec![Node::Tag(tag)],
                });
            }
        }

        Ok(Node::Tag(tag))
    }

    /// `(...)` or `(...:weight)`
    pub fn parse_emphasis(&mut self) -> Result<Node, ParseError> {
        self.cursor.advance();
        let mut contents = self.parse_contents(false)?;

        // `(a:b)` with a non-numeric `b`: the colon is only a separator,
        // unless `b` still yields a number once cleaned up
        loop {
            let separator = self
                .cursor
                .peek(2)
                .map_or(false, |next| next[0] == ":" && !number::is_number(next[1]));
            if !separator {
                break;
            }

            self.cursor.advance();
            if let Some(weight) = number::recover_literal(self.cursor.current()) {
                debug!(
                    position = ?self.cursor.position(),
                    literal = self.cursor.current(),
                    weight,
                    "recovered malformed weight"
                );
                self.cursor.advance();
                self.close_group(TokenKind::CloseParen);
                return Ok(Node::CustomWeight { weight, contents });
            }

            debug!(
                position = ?self.cursor.position(),
                "colon inside group read as a separator"
            );
            contents.extend(self.parse_contents(false)?);
        }

        if self.cursor.current_kind() == Some(TokenKind::Colon) {
            self.cursor.advance();
            let weight = self.parse_number(NumberRole::Weight)?;

            if self.cursor.current_kind() == Some(TokenKind::Comma) {
                debug!(
                    position = ?self.cursor.position(),
                    "skipping comma after weight"
                );
                self.cursor.advance();
            }

            self.close_group(TokenKind::CloseParen);
            return Ok(Node::CustomWeight { weight, contents });
        }

        self.close_group(TokenKind::CloseParen);
        Ok(Node::Emphasize { contents })
    }

    /// `[...]`
    pub fn parse_deemphasis(&mut self) -> Result<Node, ParseError> {
        self.cursor.advance();
        let contents = self.parse_contents(false)?;
        self.close_group(TokenKind::CloseBracket);
        Ok(Node::Deemphasize { contents })
    }

    /// Consume the closer of a group, also accepting `}` and the end of input.
    /// Anything else is left for the enclosing rule.
    fn close_group(&mut self, closer: TokenKind) {
        match self.cursor.current_kind() {
            Some(kind) if kind == closer => self.cursor.advance(),
            None => debug!("group closed by end of input"),
            Some(TokenKind::Word) if self.cursor.current() == "}" => {
                debug!(
                    position = ?self.cursor.position(),
                    "group closed by brace"
                );
                self.cursor.advance();
            }
            Some(_) => {
                debug!(
                    position = ?self.cursor.position(),
                    token = self.cursor.current(),
                    expected = %closer,
                    "group left unclosed"
                );
            }
        }
    }

    /// `<kind:...>`. Unknown kinds are skipped and produce no node.
    pub fn parse_reference(&mut self) -> Result<Option<Node>, ParseError> {
        let keyword = self
            .cursor
            .peek(2)
            .ok()
            .map(|next| ModelKind::from_keyword(next[1]));

        match keyword {
            Some(Some(kind)) => self.parse_model_ref(kind).map(Some),
            Some(None) => {
                self.skip_unknown_reference();
                Ok(None)
            }
            None => {
                debug!(
                    position = ?self.cursor.position(),
                    "dangling `<` dropped"
                );
                self.cursor.advance();
                Ok(None)
            }
        }
    }

    /// Drop `<`, then the reference body (words and colons) and its `>`
    fn skip_unknown_reference(&mut self) {
        debug!(
            position = ?self.cursor.position(),
            "unknown reference kind dropped"
        );
        self.cursor.advance();
        while matches!(
            self.cursor.current_kind(),
            Some(TokenKind::Word | TokenKind::Colon)
        ) {
            self.cursor.advance();
        }
        if self.cursor.current_kind() == Some(TokenKind::CloseAngle) {
            self.cursor.advance();
        }
    }

    fn parse_model_ref(&mut self, kind: ModelKind) -> Result<Node, ParseError> {
        // `<` and the keyword
        self.cursor.advance();
        self.cursor.advance();

        if self.cursor.current_kind() != Some(TokenKind::Colon) {
            return Err(ParseError::ColonExpected);
        }
        self.cursor.advance();

        let filename = match self.cursor.current_kind() {
            Some(TokenKind::Word) => unescape(self.cursor.current()),
            _ => return Err(ParseError::FilenameExpected),
        };
        self.cursor.advance();

        let mut multiplier = UNSET_MULTIPLIER;
        if self.cursor.current_kind() == Some(TokenKind::Colon) {
            self.cursor.advance();
            multiplier = self.parse_number(NumberRole::Multiplier)?;
        }

        match self.cursor.current_kind() {
            Some(TokenKind::CloseAngle) => self.cursor.advance(),
            None => debug!("reference closed by end of input"),
            Some(_) => return Err(ParseError::CloseAngleExpected),
        }

        Ok(Node::ModelRef(ModelRef::new(kind, filename, multiplier)))
    }

    /// A weight or multiplier literal, with recovery for split and
    /// locale-style decimals. Unusable literals fall back to the role default.
    pub fn parse_number(&mut self, role: NumberRole) -> Result<f64, ParseError> {
        let comma_decimal = self
            .cursor
            .peek(3)
            .ok()
            .and_then(|next| number::comma_decimal(next[0], next[1], next[2]));
        if let Some(value) = comma_decimal {
            debug!(
                position = ?self.cursor.position(),
                value,
                "read comma as decimal point"
            );
            for _ in 0..3 {
                self.cursor.advance();
            }
            return Ok(value);
        }

        let split_decimal = self
            .cursor
            .peek(2)
            .ok()
            .and_then(|next| number::split_decimal(next[0], next[1]));
        if let Some(value) = split_decimal {
            debug!(
                position = ?self.cursor.position(),
                value,
                "joined decimal split by a space"
            );
            self.cursor.advance();
            self.cursor.advance();
            return Ok(value);
        }

        match self.cursor.current_kind() {
            Some(TokenKind::Word) => {}
            // only a reference multiplier can be cut off by an opener or comma
            Some(kind) if role == NumberRole::Multiplier && !ends_number(kind) => {
                return Err(ParseError::MultiplierExpected);
            }
            _ => {
                debug!(
                    position = ?self.cursor.position(),
                    ?role,
                    "missing number, using default"
                );
                return Ok(role.default_value());
            }
        }

        let literal = unescape(self.cursor.current());
        let value = number::recover_literal(&literal).unwrap_or_else(|| {
            debug!(
                position = ?self.cursor.position(),
                literal = %literal,
                ?role,
                "unparsable number, using default"
            );
            role.default_value()
        });
        self.cursor.advance();

        Ok(value)
    }
}
