//! Command-line interface for sdprompt
//! This binary evaluates, beautifies or converts a single prompt. The prompt is
//! taken from the command line or, when omitted, read from stdin.
//!
//! Usage:
//!   sdprompt evaluate [`<prompt>`]                     - Print tag weights and model references as JSON
//!   sdprompt beautify [`<prompt>`]                     - Print the canonical form
//!   sdprompt clean [`<prompt>`]                        - Print the canonical form without model references
//!   sdprompt process [--format `<format>`] [`<prompt>`]  - Run a named output format
//!   sdprompt list-formats                            - List all available output formats

use std::io::{self, BufRead};
use std::process;

use clap::{Arg, ArgMatches, Command};

use sdprompt::prompt::config::{parse_weight_multiplier, ConfigError, LogLevel, PromptConfig};
use sdprompt::prompt::logging::init_logging;
use sdprompt::prompt::processor::{
    available_formats, parse_and_beautify, parse_and_clean, parse_and_evaluate_with, process,
    ProcessingError, ProcessingSpec,
};

fn prompt_arg() -> Arg {
    Arg::new("prompt")
        .help("Prompt text; read from stdin when omitted")
        .index(1)
}

fn cli() -> Command {
    Command::new("sdprompt")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for evaluating and normalizing image-generation prompts")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .global(true)
                .help("Log level (trace, debug, info, warn, error)")
                .value_parser(|s: &str| s.parse::<LogLevel>()),
        )
        .arg(
            Arg::new("weight-multiplier")
                .long("weight-multiplier")
                .global(true)
                .help("Weight factor per emphasis level (default 1.1)")
                .value_parser(parse_weight_multiplier),
        )
        .subcommand(
            Command::new("evaluate")
                .about("Print tag weights and model references as JSON")
                .arg(prompt_arg()),
        )
        .subcommand(
            Command::new("beautify")
                .about("Print the canonical form of the prompt")
                .arg(prompt_arg()),
        )
        .subcommand(
            Command::new("clean")
                .about("Print the canonical form without model references")
                .arg(prompt_arg()),
        )
        .subcommand(
            Command::new("process")
                .about("Process the prompt into a named output format")
                .arg(prompt_arg())
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'evaluated-json', 'report-yaml')")
                        .default_value("report-json"),
                ),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
}

fn main() {
    let matches = cli().get_matches();

    let config = match build_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&PromptConfig::default());
            tracing::error!(error = %e, "invalid configuration");
            eprintln!("error: {}", e);
            process::exit(2);
        }
    };
    init_logging(&config);

    // Handle subcommands
    let result = match matches.subcommand() {
        Some(("evaluate", sub)) => read_prompt(sub).and_then(|source| {
            let evaluated = parse_and_evaluate_with(&source, &config)?;
            Ok(serde_json::to_string_pretty(&evaluated)?)
        }),
        Some(("beautify", sub)) => {
            read_prompt(sub).and_then(|source| Ok(parse_and_beautify(&source)?))
        }
        Some(("clean", sub)) => read_prompt(sub).and_then(|source| Ok(parse_and_clean(&source)?)),
        Some(("process", sub)) => handle_process_command(sub, &config),
        Some(("list-formats", _)) => Ok(handle_list_formats_command()),
        _ => unreachable!(),
    };

    match result {
        Ok(output) => println!("{}", output.trim_end_matches('\n')),
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {}", e);
            process::exit(1);
        }
    }
}

/// Environment first, then command-line flags
fn build_config(matches: &ArgMatches) -> Result<PromptConfig, ConfigError> {
    let config = PromptConfig::from_env()?;
    Ok(config.apply_overrides(
        matches.get_one::<f64>("weight-multiplier").copied(),
        matches.get_one::<LogLevel>("log-level").copied(),
    ))
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read stdin: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

impl From<sdprompt::ParseError> for CliError {
    fn from(err: sdprompt::ParseError) -> Self {
        CliError::Processing(err.into())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::Processing(err.into())
    }
}

/// The prompt argument, or stdin with its lines concatenated
fn read_prompt(matches: &ArgMatches) -> Result<String, CliError> {
    if let Some(prompt) = matches.get_one::<String>("prompt") {
        return Ok(prompt.clone());
    }

    let mut source = String::new();
    for line in io::stdin().lock().lines() {
        source.push_str(&line?);
    }
    Ok(source)
}

/// Handle the process command
fn handle_process_command(matches: &ArgMatches, config: &PromptConfig) -> Result<String, CliError> {
    let format = matches
        .get_one::<String>("format")
        .map(String::as_str)
        .unwrap_or("report-json");
    let spec = ProcessingSpec::from_string(format)?;
    let source = read_prompt(matches)?;
    Ok(process(&source, &spec, config)?)
}

/// Handle the list-formats command
fn handle_list_formats_command() -> String {
    let mut listing = String::from("Available output formats:\n\n");
    for name in available_formats() {
        listing.push_str("  ");
        listing.push_str(&name);
        listing.push('\n');
    }
    listing
}
