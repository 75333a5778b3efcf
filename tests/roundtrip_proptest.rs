//! Property-based tests for the parser and printer
//!
//! Inputs are stitched together from fragments that exercise the recovery
//! paths: unbalanced brackets, split and comma decimals, escapes, full-width
//! punctuation and model references.

use proptest::prelude::*;
use sdprompt::{beautify, parse, parse_and_beautify, parse_and_evaluate, tokenize};

fn fragment() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "(", ")", "[", "]", "<", ">", ":", ",", "|", " ", "}", "abc", "xyz", "a b", "1", "1.5",
        "0.5", ".5", "1.", "5", "0", "-2", "inf", "nan", "lora", "hypernet", "<lora:", "\\(",
        "\\ ", "\\", "，", "：", "（", "）",
    ])
}

fn prompt_source() -> impl Strategy<Value = String> {
    prop::collection::vec(fragment(), 0..16).prop_map(|parts| parts.concat())
}

proptest! {
    #[test]
    fn test_beautify_reaches_a_fixed_point(source in prompt_source()) {
        if let Ok(prompt) = parse(&source) {
            let once = beautify(&prompt);
            let twice = parse_and_beautify(&once);
            prop_assert_eq!(twice.as_deref(), Ok(once.as_str()), "source: {:?}", source);
        }
    }

    #[test]
    fn test_arbitrary_text_never_panics(source in "\\PC{0,64}") {
        let _ = tokenize(&source);
        let _ = parse_and_evaluate(&source);
        let _ = parse_and_beautify(&source);
    }

    #[test]
    fn test_token_positions_increase(source in prompt_source()) {
        let tokens = tokenize(&source);
        for pair in tokens.windows(2) {
            prop_assert!(pair[0].position < pair[1].position);
        }
    }

    #[test]
    fn test_plain_words_evaluate_to_unit_weight(words in prop::collection::vec("[a-z]{1,8}", 1..6)) {
        let source = words.join(", ");
        let result = parse_and_evaluate(&source).unwrap();
        prop_assert_eq!(result.tags.len(), words.len());
        prop_assert!(result.tags.iter().all(|t| t.weight == 1.0));
    }
}
