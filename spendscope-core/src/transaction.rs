//! Transaction record types shared by the extractor and the enrichment engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calendar::CalendarParts;

/// Money direction of a statement line
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Direction {
    #[serde(rename = "debit")]
    Debit,
    #[serde(rename = "credit")]
    Credit,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Debit => "debit",
            Direction::Credit => "credit",
        }
    }

    /// Interpret an explicit statement marker (`DEBIT`, `DR`, `CREDIT`, `CR`).
    pub fn from_marker(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "DEBIT" | "DR" => Some(Direction::Debit),
            "CREDIT" | "CR" => Some(Direction::Credit),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Direction::from_marker(s).ok_or_else(|| format!("unknown direction: {s}"))
    }
}

/// A value lifted out of statement text: either parsed, or the original token
/// kept verbatim so the record can be flagged later instead of dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field<T> {
    Parsed(T),
    Malformed(String),
}

impl<T> Field<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Parsed(v) => Some(v),
            Field::Malformed(_) => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Field::Parsed(_))
    }

    /// Original token text when the value failed to parse
    pub fn malformed(&self) -> Option<&str> {
        match self {
            Field::Parsed(_) => None,
            Field::Malformed(raw) => Some(raw),
        }
    }
}

/// A single extracted debit/credit line before enrichment.
///
/// `amount` is always a non-negative magnitude; the sign lives in `direction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub date: Field<NaiveDate>,
    pub description: String,
    pub amount: Field<f64>,
    pub direction: Direction,
    /// 1-based page the line was read from
    pub page: usize,
}

impl RawTransaction {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: f64,
        direction: Direction,
    ) -> Self {
        Self {
            date: Field::Parsed(date),
            description: description.into(),
            amount: Field::Parsed(amount.abs()),
            direction,
            page: 1,
        }
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    pub fn is_well_formed(&self) -> bool {
        self.date.is_parsed() && self.amount.is_parsed()
    }

    pub fn is_debit(&self) -> bool {
        self.direction == Direction::Debit
    }
}

/// RawTransaction plus derived analytical attributes.
///
/// `invalid` is the invalid marker: when set, the record stays in the dataset
/// for inspection but is skipped by every aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedTransaction {
    pub raw: RawTransaction,
    /// Absent when the date is malformed
    pub calendar: Option<CalendarParts>,
    pub category: String,
    /// Absent when the amount is malformed
    pub spend_bucket: Option<String>,
    pub invalid: Option<String>,
}

impl EnrichedTransaction {
    pub fn is_valid(&self) -> bool {
        self.invalid.is_none()
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.raw.date.value().copied()
    }

    pub fn amount(&self) -> Option<f64> {
        self.raw.amount.value().copied()
    }

    pub fn description(&self) -> &str {
        &self.raw.description
    }

    /// Typed view used by aggregates; `None` for invalid records.
    pub fn valid(&self) -> Option<ValidTransaction<'_>> {
        if self.invalid.is_some() {
            return None;
        }
        Some(ValidTransaction {
            date: self.date()?,
            amount: self.amount()?,
            direction: self.raw.direction,
            description: &self.raw.description,
            category: &self.category,
            spend_bucket: self.spend_bucket.as_deref()?,
            calendar: self.calendar.as_ref()?,
        })
    }
}

/// Borrowed view of a fully valid enriched record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidTransaction<'a> {
    pub date: NaiveDate,
    pub amount: f64,
    pub direction: Direction,
    pub description: &'a str,
    pub category: &'a str,
    pub spend_bucket: &'a str,
    pub calendar: &'a CalendarParts,
}

impl ValidTransaction<'_> {
    pub fn is_debit(&self) -> bool {
        self.direction == Direction::Debit
    }
}

/// Ordered enriched records for one statement, in document order.
///
/// A new statement produces a new dataset; nothing is merged into an existing one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichedDataset {
    records: Vec<EnrichedTransaction>,
}

impl EnrichedDataset {
    pub fn new(records: Vec<EnrichedTransaction>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[EnrichedTransaction] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnrichedTransaction> {
        self.records.iter()
    }

    pub fn valid(&self) -> impl Iterator<Item = ValidTransaction<'_>> {
        self.records.iter().filter_map(EnrichedTransaction::valid)
    }

    pub fn invalid(&self) -> impl Iterator<Item = &EnrichedTransaction> {
        self.records.iter().filter(|r| !r.is_valid())
    }

    pub fn invalid_count(&self) -> usize {
        self.invalid().count()
    }

    pub fn into_records(self) -> Vec<EnrichedTransaction> {
        self.records
    }
}
