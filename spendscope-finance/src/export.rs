//! CSV export of an enriched statement.
//!
//! One row per record, invalid ones included so they stay inspectable.
//! Derived cells that could not be computed are left empty, and the date
//! and amount cells of a malformed record carry the original token text.

use serde::{Deserialize, Serialize};
use spendscope_core::{EnrichedDataset, EnrichedTransaction, Field};
use std::io::{Read, Write};

pub const CSV_HEADER: [&str; 15] = [
    "date",
    "description",
    "direction",
    "amount",
    "year",
    "month",
    "day",
    "weekday_name",
    "week_number",
    "is_weekend",
    "day_type",
    "category",
    "spend_bucket",
    "valid",
    "invalid_reason",
];

/// One exported CSV row; field order matches [`CSV_HEADER`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub date: String,
    pub description: String,
    pub direction: String,
    pub amount: String,
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
    pub weekday_name: Option<String>,
    pub week_number: Option<u32>,
    pub is_weekend: Option<bool>,
    pub day_type: Option<String>,
    pub category: String,
    pub spend_bucket: Option<String>,
    pub valid: bool,
    pub invalid_reason: Option<String>,
}

impl From<&EnrichedTransaction> for ExportRow {
    fn from(t: &EnrichedTransaction) -> Self {
        let date = match &t.raw.date {
            Field::Parsed(d) => d.format("%Y-%m-%d").to_string(),
            Field::Malformed(raw) => raw.clone(),
        };
        let amount = match &t.raw.amount {
            Field::Parsed(a) => format!("{a:.2}"),
            Field::Malformed(raw) => raw.clone(),
        };
        let cal = t.calendar.as_ref();

        Self {
            date,
            description: t.raw.description.clone(),
            direction: t.raw.direction.as_str().to_string(),
            amount,
            year: cal.map(|c| c.year),
            month: cal.map(|c| c.month),
            day: cal.map(|c| c.day),
            weekday_name: cal.map(|c| c.weekday_name().to_string()),
            week_number: cal.map(|c| c.week_number),
            is_weekend: cal.map(|c| c.is_weekend),
            day_type: cal.map(|c| c.day_type().to_string()),
            category: t.category.clone(),
            spend_bucket: t.spend_bucket.clone(),
            valid: t.is_valid(),
            invalid_reason: t.invalid.clone(),
        }
    }
}

/// Write the dataset as UTF-8 CSV. The header row is always written, even
/// for an empty dataset.
pub fn write_csv<W: Write>(dataset: &EnrichedDataset, writer: W) -> csv::Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(CSV_HEADER)?;
    for record in dataset.iter() {
        wtr.serialize(ExportRow::from(record))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn to_csv_string(dataset: &EnrichedDataset) -> csv::Result<String> {
    let mut buf = Vec::new();
    write_csv(dataset, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Read an exported CSV back into rows.
pub fn read_csv<R: Read>(reader: R) -> csv::Result<Vec<ExportRow>> {
    csv::Reader::from_reader(reader).deserialize().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::Enricher;
    use chrono::NaiveDate;
    use spendscope_core::{Direction, RawTransaction};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_header_and_rows() {
        let ds = Enricher::default().enrich_all(&[RawTransaction::new(
            ymd(2024, 3, 1),
            "Swiggy Order",
            250.0,
            Direction::Debit,
        )]);
        let csv = to_csv_string(&ds).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next().unwrap(), CSV_HEADER.join(","));
        assert_eq!(
            lines.next().unwrap(),
            "2024-03-01,Swiggy Order,debit,250.00,2024,3,1,Friday,9,false,Weekday,Food,medium,true,"
        );
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_empty_dataset_still_has_header() {
        let csv = to_csv_string(&EnrichedDataset::default()).unwrap();
        assert_eq!(csv.trim_end(), CSV_HEADER.join(","));
        assert!(read_csv(csv.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_row_is_exported_with_blank_derived_cells() {
        let mut raw = RawTransaction::new(ymd(2024, 3, 1), "Odd, \"quoted\" shop", 10.0, Direction::Credit);
        raw.date = Field::Malformed("31/02/2024".to_string());
        let ds = Enricher::default().enrich_all(&[raw]);

        let rows = read_csv(to_csv_string(&ds).unwrap().as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.date, "31/02/2024");
        assert_eq!(row.description, "Odd, \"quoted\" shop");
        assert_eq!(row.direction, "credit");
        assert_eq!(row.year, None);
        assert_eq!(row.weekday_name, None);
        assert_eq!(row.is_weekend, None);
        assert!(!row.valid);
        assert_eq!(row.invalid_reason.as_deref(), Some("unparseable date '31/02/2024'"));
        assert_eq!(row.spend_bucket.as_deref(), Some("small"));
    }
}
