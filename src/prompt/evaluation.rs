//! Weight evaluation
//!
//! A single depth-first walk that carries the running attention weight down the
//! tree and flattens it into three lists: tags with their final weight, and the
//! LoRA and hypernetwork references with their multipliers. Entries appear in
//! source order and duplicates are kept.

use serde::{Deserialize, Serialize};

use crate::prompt::ast::{ModelKind, Node, Prompt};

/// Factor applied per `(...)` level, divided per `[...]` level
pub const DEFAULT_WEIGHT_MULTIPLIER: f64 = 1.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedTag {
    pub tag: String,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatedModel {
    pub filename: String,
    pub multiplier: f64,
}

/// Flattened result of evaluating a prompt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub tags: Vec<EvaluatedTag>,
    pub loras: Vec<EvaluatedModel>,
    pub hypernets: Vec<EvaluatedModel>,
}

/// Evaluate with the default multiplier
pub fn evaluate(prompt: &Prompt) -> EvaluationResult {
    evaluate_with(prompt, DEFAULT_WEIGHT_MULTIPLIER)
}

/// Evaluate with a custom emphasis multiplier; `0` selects the default
pub fn evaluate_with(prompt: &Prompt, weight_multiplier: f64) -> EvaluationResult {
    let weight_multiplier = if weight_multiplier == 0.0 {
        DEFAULT_WEIGHT_MULTIPLIER
    } else {
        weight_multiplier
    };

    let mut evaluator = Evaluator {
        weight_multiplier,
        result: EvaluationResult::default(),
    };
    evaluator.visit_contents(&prompt.contents, 1.0);
    evaluator.result
}

struct Evaluator {
    weight_multiplier: f64,
    result: EvaluationResult,
}

impl Evaluator {
    fn visit_contents(&mut self, contents: &[Node], current_weight: f64) {
        for node in contents {
            self.visit(node, current_weight);
        }
    }

    fn visit(&mut self, node: &Node, current_weight: f64) {
        match node {
            Node::Emphasize { contents } => {
                self.visit_contents(contents, current_weight * self.weight_multiplier)
            }
            Node::Deemphasize { contents } => {
                self.visit_contents(contents, current_weight / self.weight_multiplier)
            }
            Node::CustomWeight { weight, contents } => {
                self.visit_contents(contents, current_weight * weight)
            }
            Node::ModelRef(model) => {
                let evaluated = EvaluatedModel {
                    filename: model.filename.clone(),
                    multiplier: model.effective_multiplier(),
                };
                match model.kind {
                    ModelKind::Lora => self.result.loras.push(evaluated),
                    ModelKind::Hypernet => self.result.hypernets.push(evaluated),
                }
            }
            Node::Tag(tag) => self.result.tags.push(EvaluatedTag {
                tag: tag.name.clone(),
                weight: current_weight,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::ast::ModelRef;

    fn tag(name: &str) -> Node {
        Node::tag(&[name])
    }

    #[test]
    fn test_nested_weights_compound() {
        let prompt = Prompt::new(vec![Node::CustomWeight {
            weight: 2.0,
            contents: vec![
                Node::Emphasize {
                    contents: vec![tag("a")],
                },
                Node::CustomWeight {
                    weight: 0.5,
                    contents: vec![tag("b")],
                },
                Node::Deemphasize {
                    contents: vec![tag("c")],
                },
            ],
        }]);

        let result = evaluate(&prompt);
        let weights: Vec<f64> = result.tags.iter().map(|t| t.weight).collect();
        assert_eq!(weights, vec![2.0 * 1.1, 1.0, 2.0 / 1.1]);
    }

    #[test]
    fn test_custom_multiplier() {
        let prompt = Prompt::new(vec![Node::Emphasize {
            contents: vec![tag("a")],
        }]);
        assert_eq!(evaluate_with(&prompt, 1.5).tags[0].weight, 1.5);
        assert_eq!(evaluate_with(&prompt, 0.0).tags[0].weight, 1.1);
    }

    #[test]
    fn test_references_are_split_by_kind() {
        let prompt = Prompt::new(vec![
            Node::ModelRef(ModelRef::new(ModelKind::Hypernet, "h", 0.0)),
            tag("a"),
            Node::ModelRef(ModelRef::new(ModelKind::Lora, "l", 0.25)),
            tag("a"),
        ]);

        let result = evaluate(&prompt);
        assert_eq!(
            result,
            EvaluationResult {
                tags: vec![
                    EvaluatedTag {
                        tag: "a".into(),
                        weight: 1.0
                    },
                    EvaluatedTag {
                        tag: "a".into(),
                        weight: 1.0
                    },
                ],
                loras: vec![EvaluatedModel {
                    filename: "l".into(),
                    multiplier: 0.25
                }],
                hypernets: vec![EvaluatedModel {
                    filename: "h".into(),
                    multiplier: 1.0
                }],
            }
        );
    }

    #[test]
    fn test_empty_lists_serialize_as_arrays() {
        let json = serde_json::to_string(&evaluate(&Prompt::default())).unwrap();
        assert_eq!(json, r#"{"tags":[],"loras":[],"hypernets":[]}"#);
    }
}
