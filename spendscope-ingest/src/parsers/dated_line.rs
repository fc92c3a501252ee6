//! Generic dated statement line parser (text tables)
//!
//! Expected rows after PDF-to-text, columns separated by runs of spaces:
//!   DATE        DESCRIPTION            TYPE      AMOUNT
//!   01/03/2024  Swiggy Order           DEBIT     250.00
//!   03/03/2024  Salary Credit          CREDIT    50000.00
//!   05/03/2024  Uber Trip                        -312.40
//!   2024-03-06  Amazon Refund                    1,099.00 CR
//!
//! Numeric dates are read day-first.

use regex::Regex;
use spendscope_core::{Direction, RawTransaction};

use super::{LineParser, amount_field, clean_description, date_field};
use crate::error::Result;

pub struct DatedLineParser {
    row_re: Regex,
}

impl DatedLineParser {
    pub fn new() -> Result<Self> {
        let row_re = Regex::new(concat!(
            r"^\s*(?P<date>\d{1,2}[/.-]\d{1,2}[/.-]\d{4}|\d{4}-\d{1,2}-\d{1,2})\s+",
            r"(?P<desc>.+?)\s+",
            r"(?:(?P<pre>(?i:DEBIT|CREDIT|DR|CR))\.?\s+)?",
            r"(?P<sign>[+-])?\s*",
            r"(?P<amount>(?:₹|Rs\.?|INR)?\s*\d[\d,.]*)",
            r"(?:\s*(?P<post>(?i:DEBIT|CREDIT|DR|CR))\.?)?\s*$"
        ))?;
        Ok(Self { row_re })
    }
}

/// Marker token wins; otherwise `+` means credit and `-` or no sign means debit.
fn resolve_direction(marker: Option<&str>, sign: Option<&str>) -> Direction {
    if let Some(direction) = marker.and_then(Direction::from_marker) {
        return direction;
    }
    match sign {
        Some("+") => Direction::Credit,
        _ => Direction::Debit,
    }
}

impl LineParser for DatedLineParser {
    fn name(&self) -> &'static str {
        "dated-line"
    }

    fn parse_line(&self, line: &str) -> Option<RawTransaction> {
        let caps = self.row_re.captures(line)?;
        let description = clean_description(&caps["desc"]);
        if description.is_empty() {
            return None;
        }

        let marker = caps.name("pre").or(caps.name("post")).map(|m| m.as_str());
        let sign = caps.name("sign").map(|m| m.as_str());

        Some(RawTransaction {
            date: date_field(&caps["date"]),
            description,
            amount: amount_field(&caps["amount"]),
            direction: resolve_direction(marker, sign),
            page: 1,
        })
    }
}
