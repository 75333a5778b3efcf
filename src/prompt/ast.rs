//! Prompt tree
//!
//! The parser builds a [`Prompt`] bottom-up and never touches it again; the
//! evaluator and the printers walk it read-only. The root is its own type so a
//! root can never appear nested inside another node.
//!
//! Sibling order is significant: it decides both the rendered text and the
//! order of entries in an evaluation result.

use serde::Serialize;
use std::fmt;

/// The two kinds of auxiliary model a prompt can reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Lora,
    Hypernet,
}

impl ModelKind {
    /// Keyword used between `<` and the first `:`
    pub fn keyword(&self) -> &'static str {
        match self {
            ModelKind::Lora => "lora",
            ModelKind::Hypernet => "hypernet",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "lora" => Some(ModelKind::Lora),
            "hypernet" => Some(ModelKind::Hypernet),
            _ => None,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// A leaf prompt term. `name` is `words` joined by single spaces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tag {
    pub name: String,
    pub words: Vec<String>,
}

impl Tag {
    pub fn from_words(words: Vec<String>) -> Self {
        Self {
            name: words.join(" "),
            words,
        }
    }
}

/// `<kind:filename[:multiplier]>`
///
/// A `multiplier` of zero means the source gave no multiplier at all; see
/// [`ModelRef::effective_multiplier`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelRef {
    pub kind: ModelKind,
    pub filename: String,
    pub multiplier: f64,
}

impl ModelRef {
    /// Multiplier used when the reference carries none
    pub const DEFAULT_MULTIPLIER: f64 = 1.0;

    pub fn new(kind: ModelKind, filename: impl Into<String>, multiplier: f64) -> Self {
        Self {
            kind,
            filename: filename.into(),
            multiplier,
        }
    }

    pub fn effective_multiplier(&self) -> f64 {
        if self.multiplier == 0.0 {
            Self::DEFAULT_MULTIPLIER
        } else {
            self.multiplier
        }
    }
}

/// A node below the root
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Node {
    Tag(Tag),
    /// `(...)`
    Emphasize { contents: Vec<Node> },
    /// `[...]`
    Deemphasize { contents: Vec<Node> },
    /// `(...:weight)`, or the shorthand `tag:weight` at top level
    CustomWeight { weight: f64, contents: Vec<Node> },
    ModelRef(ModelRef),
}

impl Node {
    pub fn tag(words: &[&str]) -> Self {
        Node::Tag(Tag::from_words(
            words.iter().map(|word| word.to_string()).collect(),
        ))
    }

    pub fn is_tag(&self) -> bool {
        matches!(self, Node::Tag(_))
    }

    /// Children of a group node; empty for leaves
    pub fn contents(&self) -> &[Node] {
        match self {
            Node::Emphasize { contents }
            | Node::Deemphasize { contents }
            | Node::CustomWeight { contents, .. } => contents,
            Node::Tag(_) | Node::ModelRef(_) => &[],
        }
    }
}

/// Top-level container of a parsed prompt
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Prompt {
    pub contents: Vec<Node>,
}

impl Prompt {
    pub fn new(contents: Vec<Node>) -> Self {
        Self { contents }
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_name_joins_words() {
        let tag = Tag::from_words(vec!["abc".into(), "xyz".into()]);
        assert_eq!(tag.name, "abc xyz");
        assert_eq!(tag.words, vec!["abc", "xyz"]);
    }

    #[test]
    fn test_model_keywords() {
        assert_eq!(ModelKind::from_keyword("lora"), Some(ModelKind::Lora));
        assert_eq!(ModelKind::from_keyword("hypernet"), Some(ModelKind::Hypernet));
        assert_eq!(ModelKind::from_keyword("LORA"), None);
        assert_eq!(ModelKind::Hypernet.to_string(), "hypernet");
    }

    #[test]
    fn test_effective_multiplier() {
        assert_eq!(ModelRef::new(ModelKind::Lora, "f", 0.0).effective_multiplier(), 1.0);
        assert_eq!(ModelRef::new(ModelKind::Lora, "f", 0.5).effective_multiplier(), 0.5);
    }

    #[test]
    fn test_contents() {
        let node = Node::Deemphasize {
            contents: vec![Node::tag(&["abc"])],
        };
        assert_eq!(node.contents(), &[Node::tag(&["abc"])]);
        assert!(Node::tag(&["abc"]).contents().is_empty());
        assert!(!node.is_tag());
    }

    #[test]
    fn test_serialize_node() {
        let node = Node::CustomWeight {
            weight: 1.5,
            contents: vec![Node::ModelRef(ModelRef::new(ModelKind::Lora, "file", 0.5))],
        };
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "custom-weight");
        assert_eq!(json["weight"], 1.5);
        assert_eq!(json["contents"][0]["type"], "model-ref");
        assert_eq!(json["contents"][0]["kind"], "lora");
    }
}
