//! Conjunctive transaction filters for insight queries.
//!
//! Every supplied criterion must hold (AND). Unset criteria match
//! everything. A malformed range (start after end, min above max, NaN)
//! makes the filter match nothing instead of raising an error.

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use spendscope_core::{Direction, EnrichedDataset, ValidTransaction, YearMonth};
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// Inclusive lower date bound
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date bound
    pub date_to: Option<NaiveDate>,
    /// Calendar months 1-12, any year
    pub months: Vec<u32>,
    pub periods: Vec<YearMonth>,
    /// Case-insensitive category labels
    pub categories: Vec<String>,
    pub amount_min: Option<f64>,
    pub amount_max: Option<f64>,
    pub weekdays: Vec<Weekday>,
    pub direction: Option<Direction>,
    /// Case-insensitive substring of the description
    pub merchant: Option<String>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn between(mut self, from: NaiveDate, to: NaiveDate) -> Self {
        self.date_from = Some(from);
        self.date_to = Some(to);
        self
    }

    pub fn month(mut self, month: u32) -> Self {
        self.months.push(month);
        self
    }

    pub fn period(mut self, period: YearMonth) -> Self {
        self.periods.push(period);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.categories.push(category.into());
        self
    }

    pub fn amount_between(mut self, min: f64, max: f64) -> Self {
        self.amount_min = Some(min);
        self.amount_max = Some(max);
        self
    }

    pub fn weekday(mut self, weekday: Weekday) -> Self {
        self.weekdays.push(weekday);
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn merchant(mut self, merchant: impl Into<String>) -> Self {
        self.merchant = Some(merchant.into());
        self
    }

    /// Reasons this filter can never match anything
    pub fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                out.push(format!("date range starts after it ends ({from} > {to})"));
            }
        }
        if self.amount_min.is_some_and(f64::is_nan) || self.amount_max.is_some_and(f64::is_nan) {
            out.push("amount bound is not a number".to_string());
        }
        if let (Some(min), Some(max)) = (self.amount_min, self.amount_max) {
            if min > max {
                out.push(format!("amount range is inverted ({min} > {max})"));
            }
        }
        if let Some(m) = self.months.iter().find(|m| !(1..=12).contains(*m)) {
            out.push(format!("month {m} is outside 1-12"));
        }
        out
    }

    pub fn is_satisfiable(&self) -> bool {
        self.problems().is_empty()
    }

    pub fn matches(&self, t: &ValidTransaction<'_>) -> bool {
        self.date_from.is_none_or(|from| t.date >= from)
            && self.date_to.is_none_or(|to| t.date <= to)
            && (self.months.is_empty() || self.months.contains(&t.calendar.month))
            && (self.periods.is_empty() || self.periods.iter().any(|p| p.contains(t.date)))
            && (self.categories.is_empty()
                || self
                    .categories
                    .iter()
                    .any(|c| c.trim().eq_ignore_ascii_case(t.category)))
            && self.amount_min.is_none_or(|min| t.amount >= min)
            && self.amount_max.is_none_or(|max| t.amount <= max)
            && (self.weekdays.is_empty() || self.weekdays.contains(&t.calendar.weekday))
            && self.direction.is_none_or(|d| t.direction == d)
            && self.merchant.as_deref().is_none_or(|m| {
                t.description.to_lowercase().contains(&m.trim().to_lowercase())
            })
    }

    /// Valid records that pass the filter, in document order.
    /// Invalid records never pass.
    pub fn apply<'a>(&self, dataset: &'a EnrichedDataset) -> Vec<ValidTransaction<'a>> {
        let problems = self.problems();
        if !problems.is_empty() {
            warn!(problems = ?problems, "filter can never match; returning an empty result");
            return Vec::new();
        }
        dataset.valid().filter(|t| self.matches(t)).collect()
    }
}
