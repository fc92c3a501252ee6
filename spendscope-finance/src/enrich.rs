//! Enrichment engine: RawTransaction → EnrichedTransaction.
//!
//! Every derived field depends only on the record's own date, amount and
//! description. A malformed date or amount never fails the run; the record
//! gets an invalid marker and is kept.

use spendscope_core::{
    CalendarParts, EnrichedDataset, EnrichedTransaction, RawTransaction, SpendBuckets,
};
use tracing::{debug, info, warn};

use crate::category_rules::CategoryRules;

#[derive(Debug, Clone, Default)]
pub struct Enricher {
    rules: CategoryRules,
    buckets: SpendBuckets,
}

impl Enricher {
    pub fn new(rules: CategoryRules, buckets: SpendBuckets) -> Self {
        Self { rules, buckets }
    }

    pub fn rules(&self) -> &CategoryRules {
        &self.rules
    }

    pub fn buckets(&self) -> &SpendBuckets {
        &self.buckets
    }

    pub fn enrich(&self, raw: &RawTransaction) -> EnrichedTransaction {
        let mut raw = raw.clone();
        raw.description = raw.description.split_whitespace().collect::<Vec<_>>().join(" ");

        let calendar = raw.date.value().copied().map(CalendarParts::from_date);
        let spend_bucket = raw
            .amount
            .value()
            .map(|amount| self.buckets.label_for(*amount).to_string());
        let category = self.rules.categorize(&raw.description).to_string();

        let mut problems = Vec::new();
        if let Some(token) = raw.date.malformed() {
            problems.push(format!("unparseable date '{token}'"));
        }
        if let Some(token) = raw.amount.malformed() {
            problems.push(format!("non-numeric amount '{token}'"));
        }
        let invalid = (!problems.is_empty()).then(|| problems.join("; "));
        if let Some(reason) = &invalid {
            debug!(description = %raw.description, reason = %reason, "flagged invalid record");
        }

        EnrichedTransaction {
            raw,
            calendar,
            category,
            spend_bucket,
            invalid,
        }
    }

    /// Enrich a whole statement, keeping document order.
    pub fn enrich_all(&self, raws: &[RawTransaction]) -> EnrichedDataset {
        let dataset = EnrichedDataset::new(raws.iter().map(|r| self.enrich(r)).collect());

        let invalid = dataset.invalid_count();
        if invalid > 0 {
            warn!(
                invalid,
                total = dataset.len(),
                "some records could not be fully parsed; they are excluded from insights"
            );
        }
        info!(records = dataset.len(), "enriched statement");
        dataset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};
    use spendscope_core::{Direction, Field};

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_swiggy_and_salary_scenario() {
        let enricher = Enricher::default();
        let swiggy = enricher.enrich(&RawTransaction::new(
            ymd(2024, 3, 1),
            "Swiggy Order",
            250.0,
            Direction::Debit,
        ));
        let salary = enricher.enrich(&RawTransaction::new(
            ymd(2024, 3, 3),
            "Salary Credit",
            50000.0,
            Direction::Credit,
        ));

        let cal = swiggy.calendar.unwrap();
        assert_eq!(cal.weekday, Weekday::Fri);
        assert_eq!(cal.weekday_name(), "Friday");
        assert!(!cal.is_weekend);
        assert_eq!(cal.month, 3);
        assert_eq!(cal.day, 1);
        assert_eq!(swiggy.spend_bucket.as_deref(), Some("medium"));
        assert_eq!(swiggy.category, "Food");
        assert!(swiggy.is_valid());

        let cal = salary.calendar.unwrap();
        assert_eq!(cal.weekday_name(), "Sunday");
        assert!(cal.is_weekend);
        assert_eq!(salary.spend_bucket.as_deref(), Some("large"));
        assert_eq!(salary.category, "Income");
    }

    #[test]
    fn test_enrichment_is_deterministic() {
        let enricher = Enricher::default();
        let raw = RawTransaction::new(ymd(2024, 12, 29), "Zomato   Ltd", 1999.99, Direction::Debit);
        let a = enricher.enrich(&raw);
        let b = enricher.enrich(&raw);
        assert_eq!(a, b);
        assert_eq!(a.raw.description, "Zomato Ltd");
        // 2024-12-29 is a Sunday in ISO week 52
        assert_eq!(a.calendar.unwrap().week_number, 52);
    }

    #[test]
    fn test_malformed_date_is_flagged_not_dropped() {
        let enricher = Enricher::default();
        let mut raw = RawTransaction::new(ymd(2024, 3, 1), "Uber", 120.0, Direction::Debit);
        raw.date = Field::Malformed("31/02/2024".to_string());

        let e = enricher.enrich(&raw);
        assert!(!e.is_valid());
        assert_eq!(e.invalid.as_deref(), Some("unparseable date '31/02/2024'"));
        assert!(e.calendar.is_none());
        assert_eq!(e.category, "Transport");
        assert_eq!(e.spend_bucket.as_deref(), Some("medium"));
    }

    #[test]
    fn test_malformed_amount_is_flagged() {
        let enricher = Enricher::default();
        let mut raw = RawTransaction::new(ymd(2024, 3, 1), "Uber", 0.0, Direction::Debit);
        raw.amount = Field::Malformed("1.2.3".to_string());
        raw.date = Field::Malformed("??".to_string());

        let e = enricher.enrich(&raw);
        assert!(e.spend_bucket.is_none());
        assert_eq!(
            e.invalid.as_deref(),
            Some("unparseable date '??'; non-numeric amount '1.2.3'")
        );
    }

    #[test]
    fn test_enrich_all_keeps_order_and_invalid_rows() {
        let enricher = Enricher::default();
        let mut bad = RawTransaction::new(ymd(2024, 3, 2), "Mystery", 10.0, Direction::Debit);
        bad.date = Field::Malformed("99/99/2024".to_string());
        let raws = vec![
            RawTransaction::new(ymd(2024, 3, 1), "Swiggy", 250.0, Direction::Debit),
            bad,
            RawTransaction::new(ymd(2024, 3, 3), "Swiggy", 250.0, Direction::Debit),
        ];

        let dataset = enricher.enrich_all(&raws);
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.invalid_count(), 1);
        assert_eq!(dataset.records()[1].description(), "Mystery");
        assert_eq!(dataset.valid().count(), 2);
    }

    #[test]
    fn test_empty_input_gives_empty_dataset() {
        assert!(Enricher::default().enrich_all(&[]).is_empty());
    }
}
