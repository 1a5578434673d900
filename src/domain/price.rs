// src/domain/price.rs

use regex::Regex;
use std::sync::OnceLock;

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Optional integer part, optional ".digits"; at least one digit overall.
    PATTERN.get_or_init(|| Regex::new(r"\d*\.?\d+").expect("static price pattern"))
}

/// Pulls the first number out of free-form price text such as `"$1,234.56 shipping"`.
///
/// Thousands separators are dropped first. Returns `0.0` when nothing numeric
/// is found. Signs and currencies are ignored, so this is a heuristic and not a
/// currency parser.
pub fn normalize_price(text: &str) -> f64 {
    let cleaned = text.replace(',', "");
    number_pattern()
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .unwrap_or(0.0)
}
