//! Tokenizer for free-form number lists
//!
//! Accepts input such as `8, 3 10,1 6`: tokens are separated by any run of
//! commas and whitespace. Tokens that are not finite numbers are dropped.

use std::sync::LazyLock;

use itertools::Itertools;
use regex::Regex;

use crate::domain::Value;

static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\s,]+").expect("separator regex is valid"));

/// Parse a comma/whitespace separated list of numbers.
///
/// Non-numeric and non-finite tokens are silently discarded.
pub fn parse_numbers(input: &str) -> Vec<Value> {
    SEPARATOR
        .split(input)
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .filter_map(parse_token)
        .collect()
}

/// Parse a single token into a finite value.
///
/// Supports decimal notation with optional sign and exponent, plus
/// unsigned `0x`, `0o` and `0b` integer literals.
pub fn parse_token(token: &str) -> Option<Value> {
    let lower = token.to_ascii_lowercase();
    let radix = match lower.get(..2) {
        Some("0x") => Some(16),
        Some("0o") => Some(8),
        Some("0b") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        let digits = &lower[2..];
        if digits.is_empty() || digits.starts_with(['+', '-']) {
            return None;
        }
        return u64::from_str_radix(digits, radix)
            .ok()
            .and_then(|n| Value::new(n as f64));
    }

    // f64::from_str also accepts "inf" and "nan"; those fail Value::new
    if !lower.bytes().any(|b| b.is_ascii_digit()) {
        return None;
    }
    lower.parse::<f64>().ok().and_then(Value::new)
}

/// Render values the way the input form normalizes them: `8, 3, 10`.
pub fn normalize(values: &[Value]) -> String {
    values.iter().join(", ")
}

/// Render values without spaces: `8,3,10`.
pub fn join_compact(values: &[Value]) -> String {
    values.iter().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn vals(ns: &[f64]) -> Vec<Value> {
        ns.iter().filter_map(|&n| Value::new(n)).collect()
    }

    #[test]
    fn given_mixed_separators_when_parsing_then_returns_numbers_in_order() {
        assert_eq!(
            parse_numbers("8, 3 10,1 6"),
            vals(&[8.0, 3.0, 10.0, 1.0, 6.0])
        );
    }

    #[test]
    fn given_non_numeric_token_when_parsing_then_drops_it() {
        assert_eq!(parse_numbers("1, x, 2"), vals(&[1.0, 2.0]));
    }

    #[test]
    fn given_blank_input_when_parsing_then_returns_empty() {
        assert!(parse_numbers("").is_empty());
        assert!(parse_numbers("  ,, \n\t ").is_empty());
    }

    #[rstest]
    #[case("-4", Some(-4.0))]
    #[case("+7", Some(7.0))]
    #[case("2.5", Some(2.5))]
    #[case("1e3", Some(1000.0))]
    #[case(".5", Some(0.5))]
    #[case("0x10", Some(16.0))]
    #[case("0b101", Some(5.0))]
    #[case("0o17", Some(15.0))]
    #[case("-0x10", None)]
    #[case("0x", None)]
    #[case("NaN", None)]
    #[case("Infinity", None)]
    #[case("inf", None)]
    #[case("1_000", None)]
    #[case("1e999", None)]
    #[case("abc", None)]
    fn given_token_when_parsing_then_matches_expected(
        #[case] token: &str,
        #[case] expected: Option<f64>,
    ) {
        assert_eq!(parse_token(token).map(Value::get), expected);
    }

    #[test]
    fn given_values_when_normalizing_then_joins_with_comma_space() {
        let values = parse_numbers("8 3  10,1,,6 2.5");
        assert_eq!(normalize(&values), "8, 3, 10, 1, 6, 2.5");
        assert_eq!(join_compact(&values), "8,3,10,1,6,2.5");
    }
}
