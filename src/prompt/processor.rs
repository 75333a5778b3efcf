//! Processing API for prompts
//!
//! The `parse_and_*` functions are the entry points used by callers that just
//! want a result. [`process`] adds named output formats on top, addressed by a
//! `<stage>-<format>` string such as `evaluated-json` or `beautified-text`.

use serde::Serialize;
use thiserror::Error;

use crate::prompt::config::PromptConfig;
use crate::prompt::evaluation::{evaluate, evaluate_with, EvaluationResult};
use crate::prompt::formats::{beautify, clean};
use crate::prompt::lexing::{tokenize, Token};
use crate::prompt::parsing::{parse, ParseError};

/// Parse `source` and evaluate it with the default multiplier
pub fn parse_and_evaluate(source: &str) -> Result<EvaluationResult, ParseError> {
    parse(source).map(|prompt| evaluate(&prompt))
}

/// Parse `source` and evaluate it with the configured multiplier
pub fn parse_and_evaluate_with(
    source: &str,
    config: &PromptConfig,
) -> Result<EvaluationResult, ParseError> {
    parse(source).map(|prompt| evaluate_with(&prompt, config.weight_multiplier))
}

/// Parse `source` and render it in canonical form
pub fn parse_and_beautify(source: &str) -> Result<String, ParseError> {
    parse(source).map(|prompt| beautify(&prompt))
}

/// Parse `source` and render it without model references
pub fn parse_and_clean(source: &str) -> Result<String, ParseError> {
    parse(source).map(|prompt| clean(&prompt))
}

/// Everything the command-line tool reports for one prompt
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromptReport {
    pub evaluated: EvaluationResult,
    pub beautified: String,
    pub cleaned: String,
}

/// Parse once and build the full report
pub fn parse_and_report(source: &str, config: &PromptConfig) -> Result<PromptReport, ParseError> {
    let prompt = parse(source)?;
    Ok(PromptReport {
        evaluated: evaluate_with(&prompt, config.weight_multiplier),
        beautified: beautify(&prompt),
        cleaned: clean(&prompt),
    })
}

/// Represents the processing stage (what data to produce)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessingStage {
    Token,
    Ast,
    Evaluated,
    Beautified,
    Cleaned,
    Report,
}

impl ProcessingStage {
    fn name(&self) -> &'static str {
        match self {
            ProcessingStage::Token => "token",
            ProcessingStage::Ast => "ast",
            ProcessingStage::Evaluated => "evaluated",
            ProcessingStage::Beautified => "beautified",
            ProcessingStage::Cleaned => "cleaned",
            ProcessingStage::Report => "report",
        }
    }
}

/// Represents the output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Simple,
    Json,
    Yaml,
    Text,
}

impl OutputFormat {
    fn name(&self) -> &'static str {
        match self {
            OutputFormat::Simple => "simple",
            OutputFormat::Json => "json",
            OutputFormat::Yaml => "yaml",
            OutputFormat::Text => "text",
        }
    }
}

/// Represents a complete processing specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingSpec {
    pub stage: ProcessingStage,
    pub format: OutputFormat,
}

impl ProcessingSpec {
    /// Parse a format string like "evaluated-json" or "token-simple"
    pub fn from_string(format_str: &str) -> Result<Self, ProcessingError> {
        let (stage, format) = format_str
            .split_once('-')
            .ok_or_else(|| ProcessingError::InvalidFormat(format_str.to_string()))?;

        let stage = match stage {
            "token" => ProcessingStage::Token,
            "ast" => ProcessingStage::Ast,
            "evaluated" => ProcessingStage::Evaluated,
            "beautified" => ProcessingStage::Beautified,
            "cleaned" => ProcessingStage::Cleaned,
            "report" => ProcessingStage::Report,
            _ => return Err(ProcessingError::InvalidStage(stage.to_string())),
        };

        let format = match format {
            "simple" => OutputFormat::Simple,
            "json" => OutputFormat::Json,
            "yaml" => OutputFormat::Yaml,
            "text" => OutputFormat::Text,
            _ => return Err(ProcessingError::InvalidFormatType(format.to_string())),
        };

        let spec = ProcessingSpec { stage, format };
        if !Self::available_specs().contains(&spec) {
            return Err(ProcessingError::InvalidFormatType(format!(
                "format '{}' is not supported for the {} stage",
                format.name(),
                stage.name()
            )));
        }

        Ok(spec)
    }

    /// Get all available processing specifications
    pub fn available_specs() -> Vec<ProcessingSpec> {
        [
            (ProcessingStage::Token, OutputFormat::Simple),
            (ProcessingStage::Token, OutputFormat::Json),
            (ProcessingStage::Ast, OutputFormat::Json),
            (ProcessingStage::Ast, OutputFormat::Yaml),
            (ProcessingStage::Evaluated, OutputFormat::Json),
            (ProcessingStage::Evaluated, OutputFormat::Yaml),
            (ProcessingStage::Beautified, OutputFormat::Text),
            (ProcessingStage::Cleaned, OutputFormat::Text),
            (ProcessingStage::Report, OutputFormat::Json),
            (ProcessingStage::Report, OutputFormat::Yaml),
        ]
        .into_iter()
        .map(|(stage, format)| ProcessingSpec { stage, format })
        .collect()
    }

    pub fn name(&self) -> String {
        format!("{}-{}", self.stage.name(), self.format.name())
    }
}

/// Errors that can occur during processing
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Invalid stage: {0}")]
    InvalidStage(String),
    #[error("Invalid format type: {0}")]
    InvalidFormatType(String),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Process a prompt according to the given specification
pub fn process(
    source: &str,
    spec: &ProcessingSpec,
    config: &PromptConfig,
) -> Result<String, ProcessingError> {
    match spec.stage {
        ProcessingStage::Token => format_tokens(&tokenize(source), spec.format),
        ProcessingStage::Ast => serialize(&parse(source)?, spec.format),
        ProcessingStage::Evaluated => {
            serialize(&parse_and_evaluate_with(source, config)?, spec.format)
        }
        ProcessingStage::Beautified => Ok(parse_and_beautify(source)?),
        ProcessingStage::Cleaned => Ok(parse_and_clean(source)?),
        ProcessingStage::Report => serialize(&parse_and_report(source, config)?, spec.format),
    }
}

fn serialize<T: Serialize>(value: &T, format: OutputFormat) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
        _ => Ok(serde_json::to_string_pretty(value)?),
    }
}

/// Format tokens according to the specified format
fn format_tokens(tokens: &[Token], format: OutputFormat) -> Result<String, ProcessingError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(tokens)?),
        _ => Ok(tokens
            .iter()
            .map(|token| format!("{}\n", token))
            .collect()),
    }
}

/// Get all available format strings
pub fn available_formats() -> Vec<String> {
    ProcessingSpec::available_specs()
        .iter()
        .map(ProcessingSpec::name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_from_string() {
        assert_eq!(
            ProcessingSpec::from_string("evaluated-json").unwrap(),
            ProcessingSpec {
                stage: ProcessingStage::Evaluated,
                format: OutputFormat::Json
            }
        );
        assert_eq!(
            ProcessingSpec::from_string("beautified-text").unwrap().stage,
            ProcessingStage::Beautified
        );
    }

    #[test]
    fn test_spec_from_string_errors() {
        assert!(matches!(
            ProcessingSpec::from_string("json"),
            Err(ProcessingError::InvalidFormat(_))
        ));
        assert!(matches!(
            ProcessingSpec::from_string("weights-json"),
            Err(ProcessingError::InvalidStage(_))
        ));
        assert!(matches!(
            ProcessingSpec::from_string("evaluated-xml"),
            Err(ProcessingError::InvalidFormatType(_))
        ));
        assert!(matches!(
            ProcessingSpec::from_string("beautified-json"),
            Err(ProcessingError::InvalidFormatType(_))
        ));
    }

    #[test]
    fn test_available_formats_round_trip() {
        for name in available_formats() {
            assert_eq!(ProcessingSpec::from_string(&name).unwrap().name(), name);
        }
    }

    #[test]
    fn test_token_simple() {
        let spec = ProcessingSpec::from_string("token-simple").unwrap();
        let output = process("(abc)", &spec, &PromptConfig::default()).unwrap();
        assert_eq!(output, "0\topen-paren\t(\n1\tword\tabc\n4\tclose-paren\t)\n");
    }

    #[test]
    fn test_parse_error_surfaces() {
        let spec = ProcessingSpec::from_string("beautified-text").unwrap();
        let err = process("<lora:file x>", &spec, &PromptConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ProcessingError::Parse(ParseError::CloseAngleExpected)
        ));
        assert_eq!(err.to_string(), "> expected");
    }
}
