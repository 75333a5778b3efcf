//! Numeric literal recovery
//!
//! Weights and multipliers are typed by hand, often with a locale decimal
//! comma (`1,5`), a stray space (`1. 5`) or a doubled dot (`1.5.1`). These
//! helpers turn such text into a finite, non-negative `f64` or report that
//! nothing usable is there.

use once_cell::sync::Lazy;
use regex::Regex;

/// Default weight for a `(...:N)` group whose `N` is unusable
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Default multiplier for a `<kind:file:N>` reference whose `N` is unusable
pub const DEFAULT_MULTIPLIER: f64 = 1.0;

static SPLIT_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)[., ]+([0-9]+)").expect("split literal pattern is valid"));

/// What a number is being read for; decides its fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberRole {
    Weight,
    Multiplier,
}

impl NumberRole {
    pub fn default_value(&self) -> f64 {
        match self {
            NumberRole::Weight => DEFAULT_WEIGHT,
            NumberRole::Multiplier => DEFAULT_MULTIPLIER,
        }
    }
}

/// Plain base-10 integer in canonical form (`5`, not `05` or `+5`)
pub fn is_int(text: &str) -> bool {
    text.parse::<i64>()
        .map_or(false, |value| value.to_string() == text)
}

/// Whether `text` reads as a float as-is, without any recovery
pub fn is_number(text: &str) -> bool {
    text.parse::<f64>().map_or(false, |value| !value.is_nan())
}

/// Parse `text` and keep it only if it is a usable weight
pub fn parse_finite(text: &str) -> Option<f64> {
    text.parse::<f64>()
        .ok()
        .filter(|value| value.is_finite() && *value >= 0.0)
}

/// `1 , 5` as three tokens means `1.5`
pub fn comma_decimal(integral: &str, separator: &str, fractional: &str) -> Option<f64> {
    if separator == "," && is_int(integral) && is_int(fractional) {
        parse_finite(&format!("{}.{}", integral, fractional))
    } else {
        None
    }
}

/// `1.` followed by `5` as two tokens means `1.5`
pub fn split_decimal(first: &str, second: &str) -> Option<f64> {
    let integral = first.strip_suffix('.')?;
    if is_int(integral) && is_int(second) {
        parse_finite(&format!("{}{}", first, second))
    } else {
        None
    }
}

/// Best-effort reading of a single literal token.
///
/// Spaces are dropped and commas become dots. If a `digits<sep>digits` run
/// remains anywhere in the text, only that run is kept, so `1.5.1` and `.1.5`
/// both read as `1.5`.
pub fn recover_literal(token: &str) -> Option<f64> {
    let compact = token.trim().replace(' ', "").replace(',', ".");
    let normalized = match SPLIT_LITERAL.captures(&compact) {
        Some(captures) => format!("{}.{}", &captures[1], &captures[2]),
        None => compact,
    };
    parse_finite(&normalized)
}
