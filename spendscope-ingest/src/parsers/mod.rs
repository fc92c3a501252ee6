//! Statement line parsers.
//!
//! Each parser recognises one row shape and turns a matching line into a
//! [`RawTransaction`]. Tokens that have the right shape but do not parse
//! (e.g. `31/02/2024`) are kept as [`Field::Malformed`] rather than dropped.

pub mod dated_line;
pub mod phonepe;
pub mod raw_csv;

use chrono::NaiveDate;
use spendscope_core::{Field, RawTransaction, parse_statement_date};

pub use dated_line::DatedLineParser;
pub use phonepe::PhonePeParser;
pub use raw_csv::{parse_raw_csv, parse_raw_csv_path};

/// One statement row shape
pub trait LineParser {
    fn name(&self) -> &'static str;

    /// `None` means "not my shape"; the extractor moves on to the next parser.
    fn parse_line(&self, line: &str) -> Option<RawTransaction>;
}

pub(crate) fn date_field(token: &str) -> Field<NaiveDate> {
    match parse_statement_date(token) {
        Some(date) => Field::Parsed(date),
        None => Field::Malformed(token.trim().to_string()),
    }
}

/// Parse an amount token such as `1,250.00`, `₹250` or `Rs. 99`.
/// The result is a non-negative magnitude.
pub(crate) fn amount_field(token: &str) -> Field<f64> {
    let cleaned: String = token
        .trim()
        .trim_start_matches('₹')
        .trim_start_matches("INR")
        .trim_start_matches("Rs.")
        .trim_start_matches("Rs")
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    let cleaned = cleaned.trim_start_matches(['+', '-']);

    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Field::Parsed(v),
        _ => Field::Malformed(token.trim().to_string()),
    }
}

/// Collapse runs of whitespace inside a description.
pub(crate) fn clean_description(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_field() {
        assert_eq!(amount_field("1,250.00"), Field::Parsed(1250.0));
        assert_eq!(amount_field("₹250"), Field::Parsed(250.0));
        assert_eq!(amount_field("Rs. 99.5"), Field::Parsed(99.5));
        assert_eq!(amount_field("-15.00"), Field::Parsed(15.0));
        assert_eq!(amount_field("1.2.3"), Field::Malformed("1.2.3".to_string()));
        assert_eq!(amount_field("abc"), Field::Malformed("abc".to_string()));
        assert_eq!(amount_field(""), Field::Malformed(String::new()));
    }

    #[test]
    fn test_date_field() {
        assert!(date_field("01/03/2024").is_parsed());
        assert_eq!(
            date_field(" 31/02/2024 "),
            Field::Malformed("31/02/2024".to_string())
        );
    }

    #[test]
    fn test_clean_description() {
        assert_eq!(clean_description("  Swiggy   Order \t"), "Swiggy Order");
    }
}
