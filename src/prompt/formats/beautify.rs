//! Canonical prompt printer
//!
//! Renders a [`Prompt`] back to text with normalized spacing: no padding inside
//! brackets, and siblings separated by `, `. Bare tags next to each other are
//! comma-joined, and every bracketed sibling gets a comma on both sides, so in
//! practice every sibling pair ends up joined by `, `.
//!
//! Numbers use the shortest round-tripping form with a leading `0` dropped
//! (`0.5` prints as `.5`). A zero weight or multiplier is omitted.

use crate::prompt::ast::{ModelRef, Node, Prompt, Tag};

const SEPARATOR: &str = ", ";

/// Characters that would be read as structure (or split a word) if printed bare
const ESCAPED: &[char] = &['(', ')', '[', ']', '<', '>', ':', ',', '|', '\\', ' '];

/// Render `prompt` in canonical form
pub fn beautify(prompt: &Prompt) -> String {
    Printer::canonical().print(prompt)
}

/// Render `prompt` in canonical form with every model reference removed
pub fn clean(prompt: &Prompt) -> String {
    Printer::without_references().print(prompt)
}

/// Format a weight or multiplier
pub fn format_number(value: f64) -> String {
    let text = value.to_string();
    match text.strip_prefix("0.") {
        Some(fraction) => format!(".{}", fraction),
        None => text,
    }
}

/// Backslash-escape structural characters so the text re-parses as one word
pub fn escape_word(word: &str) -> String {
    let mut escaped = String::with_capacity(word.len());
    for c in word.chars() {
        if ESCAPED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

struct Printer {
    include_references: bool,
}

impl Printer {
    fn canonical() -> Self {
        Self {
            include_references: true,
        }
    }

    fn without_references() -> Self {
        Self {
            include_references: false,
        }
    }

    fn print(&self, prompt: &Prompt) -> String {
        self.print_contents(&prompt.contents)
    }

    fn print_contents(&self, contents: &[Node]) -> String {
        contents
            .iter()
            .filter(|node| self.include_references || !matches!(node, Node::ModelRef(_)))
            .map(|node| self.print_node(node))
            .collect::<Vec<_>>()
            .join(SEPARATOR)
    }

    fn print_node(&self, node: &Node) -> String {
        match node {
            Node::Tag(tag) => print_tag(tag),
            Node::Emphasize { contents } => format!("({})", self.print_contents(contents)),
            Node::Deemphasize { contents } => format!("[{}]", self.print_contents(contents)),
            Node::CustomWeight { weight, contents } => {
                let mut printed = format!("({}", self.print_contents(contents));
                if *weight != 0.0 {
                    printed.push(':');
                    printed.push_str(&format_number(*weight));
                }
                printed.push(')');
                printed
            }
            Node::ModelRef(model) => print_model_ref(model),
        }
    }
}

fn print_tag(tag: &Tag) -> String {
    tag.words
        .iter()
        .map(|word| escape_word(word))
        .collect::<Vec<_>>()
        .join(" ")
}

fn print_model_ref(model: &ModelRef) -> String {
    let mut printed = format!("<{}:{}", model.kind, escape_word(&model.filename));
    if model.multiplier != 0.0 {
        printed.push(':');
        printed.push_str(&format_number(model.multiplier));
    }
    printed.push('>');
    printed
}
