//! PhonePe transaction statement parser (text)
//!
//! Expected rows after PDF-to-text:
//!   Mar 01, 2024 Paid to Swiggy DEBIT ₹250
//!   Mar 03, 2024 Received from Rahul Sharma CREDIT ₹1,500
//!   Sept 12, 2024 Paid to Indian Oil Petrol Pump DEBIT ₹2,000.50
//!
//! The time, transaction id, UTR and "Paid by" lines that follow each row
//! are noise and handled by the extractor.

use regex::Regex;
use spendscope_core::{Direction, RawTransaction};

use super::{LineParser, amount_field, clean_description, date_field};
use crate::error::Result;

pub struct PhonePeParser {
    row_re: Regex,
}

impl PhonePeParser {
    pub fn new() -> Result<Self> {
        let row_re = Regex::new(concat!(
            r"^\s*(?P<date>[A-Za-z]{3,9}\s+\d{1,2},?\s+\d{4})\s+",
            r"(?:(?i:paid\s+to|received\s+from|transfer(?:red)?\s+to|payment\s+to)\s+)?",
            r"(?P<desc>.+?)\s+",
            r"(?P<marker>DEBIT|CREDIT)\s*",
            r"(?P<amount>(?:₹|Rs\.?|INR)?\s*\d[\d,.]*)",
            r"(?:\s.*)?$"
        ))?;
        Ok(Self { row_re })
    }
}

impl LineParser for PhonePeParser {
    fn name(&self) -> &'static str {
        "phonepe"
    }

    fn parse_line(&self, line: &str) -> Option<RawTransaction> {
        let caps = self.row_re.captures(line)?;
        let description = clean_description(&caps["desc"]);
        if description.is_empty() {
            return None;
        }
        let direction = Direction::from_marker(&caps["marker"]).unwrap_or(Direction::Debit);

        Some(RawTransaction {
            date: date_field(&caps["date"]),
            description,
            amount: amount_field(&caps["amount"]),
            direction,
            page: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use spendscope_core::Field;

    #[test]
    fn test_parses_paid_and_received_rows() {
        let p = PhonePeParser::new().unwrap();

        let paid = p.parse_line("Mar 01, 2024 Paid to Swiggy DEBIT ₹250").unwrap();
        assert_eq!(paid.date, Field::Parsed(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
        assert_eq!(paid.description, "Swiggy");
        assert_eq!(paid.amount, Field::Parsed(250.0));
        assert_eq!(paid.direction, Direction::Debit);

        let received = p
            .parse_line("Mar 03, 2024 Received from Rahul Sharma CREDIT ₹1,500")
            .unwrap();
        assert_eq!(received.description, "Rahul Sharma");
        assert_eq!(received.amount, Field::Parsed(1500.0));
        assert_eq!(received.direction, Direction::Credit);
    }

    #[test]
    fn test_four_letter_month_and_decimals() {
        let p = PhonePeParser::new().unwrap();
        let t = p
            .parse_line("Sept 12, 2024 Paid to Indian Oil Petrol Pump DEBIT ₹2,000.50")
            .unwrap();
        assert_eq!(t.date, Field::Parsed(NaiveDate::from_ymd_opt(2024, 9, 12).unwrap()));
        assert_eq!(t.description, "Indian Oil Petrol Pump");
        assert_eq!(t.amount, Field::Parsed(2000.5));
    }

    #[test]
    fn test_rejects_other_lines() {
        let p = PhonePeParser::new().unwrap();
        assert!(p.parse_line("Page 1 of 3").is_none());
        assert!(p.parse_line("Transaction ID T2403011234567890").is_none());
        assert!(p.parse_line("Date Transaction Details Type Amount").is_none());
        assert!(p.parse_line("01/03/2024  Swiggy Order  DEBIT  250.00").is_none());
    }

    #[test]
    fn test_bad_calendar_date_is_kept_as_malformed() {
        let p = PhonePeParser::new().unwrap();
        let t = p.parse_line("Feb 30, 2024 Paid to Zomato DEBIT ₹120").unwrap();
        assert_eq!(t.date, Field::Malformed("Feb 30, 2024".to_string()));
        assert_eq!(t.amount, Field::Parsed(120.0));
    }
}
