//! Parse a raw (un-enriched) transaction CSV into RawTransaction rows.
//!
//! This is the intermediate table a statement is flattened into before
//! enrichment:
//! Date,Merchant,Type,Amount
//! "Mar 01, 2024",Swiggy,DEBIT,250.0
//!
//! Leading junk rows are skipped until the header row is found. Columns are
//! located by header name, so extra or reordered columns are fine.

use spendscope_core::{Direction, RawTransaction};
use std::io::Read;
use std::path::Path;

use super::{amount_field, clean_description, date_field};
use crate::error::Result;

#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    description: usize,
    direction: Option<usize>,
    amount: usize,
}

impl Columns {
    fn from_header(record: &csv::StringRecord) -> Option<Self> {
        let find = |names: &[&str]| {
            record
                .iter()
                .position(|cell| names.iter().any(|n| cell.trim().eq_ignore_ascii_case(n)))
        };
        Some(Self {
            date: find(&["date"])?,
            description: find(&["merchant", "description", "narration", "details"])?,
            direction: find(&["type", "direction"]),
            amount: find(&["amount"])?,
        })
    }
}

/// Parse raw transaction CSV from any reader.
///
/// A file with no recognisable header yields no transactions.
pub fn parse_raw_csv<R: Read>(reader: R) -> Result<Vec<RawTransaction>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(reader);

    let mut columns: Option<Columns> = None;
    let mut txns = Vec::new();

    for result in rdr.records() {
        let record = result?;

        let Some(cols) = columns else {
            columns = Columns::from_header(&record);
            continue;
        };

        let cell = |i: usize| record.get(i).unwrap_or("").trim();
        if record.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let amount_raw = cell(cols.amount);
        let marker = cols.direction.map(cell).and_then(Direction::from_marker);
        let direction = match marker {
            Some(d) => d,
            None if amount_raw.starts_with('+') => Direction::Credit,
            None => Direction::Debit,
        };

        txns.push(RawTransaction {
            date: date_field(cell(cols.date)),
            description: clean_description(cell(cols.description)),
            amount: amount_field(amount_raw),
            direction,
            page: 1,
        });
    }

    Ok(txns)
}

pub fn parse_raw_csv_path(path: impl AsRef<Path>) -> Result<Vec<RawTransaction>> {
    let file = std::fs::File::open(path.as_ref())?;
    parse_raw_csv(file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use spendscope_core::Field;

    #[test]
    fn test_parse_raw_csv() {
        let data = "\
Date,Merchant,Type,Amount
\"Mar 01, 2024\",Swiggy,DEBIT,250.0
\"Mar 03, 2024\",  Acme   Payroll ,CREDIT,\"50,000\"
";
        let txns = parse_raw_csv(data.as_bytes()).unwrap();
        assert_eq!(txns.len(), 2);
        assert_eq!(
            txns[0].date,
            Field::Parsed(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
        );
        assert_eq!(txns[0].description, "Swiggy");
        assert_eq!(txns[0].direction, Direction::Debit);
        assert_eq!(txns[1].description, "Acme Payroll");
        assert_eq!(txns[1].amount, Field::Parsed(50000.0));
        assert_eq!(txns[1].direction, Direction::Credit);
    }

    #[test]
    fn test_skips_preamble_and_blank_rows() {
        let data = "\
PhonePe export
,,,
Amount,Date,Description
99,01/03/2024,Chai Point
,,
";
        let txns = parse_raw_csv(data.as_bytes()).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].description, "Chai Point");
        assert_eq!(txns[0].amount, Field::Parsed(99.0));
        // no type column: default debit
        assert_eq!(txns[0].direction, Direction::Debit);
    }

    #[test]
    fn test_malformed_cells_are_kept() {
        let data = "Date,Merchant,Type,Amount\nnot a date,Zomato,DEBIT,abc\n";
        let txns = parse_raw_csv(data.as_bytes()).unwrap();
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].date, Field::Malformed("not a date".to_string()));
        assert_eq!(txns[0].amount, Field::Malformed("abc".to_string()));
    }

    #[test]
    fn test_no_header_yields_nothing() {
        let txns = parse_raw_csv("a,b,c\n1,2,3\n".as_bytes()).unwrap();
        assert!(txns.is_empty());
    }
}
