//! Insight aggregator: totals, grouped series and per-month answers over an
//! enriched statement.
//!
//! Invalid records are never counted. "Spend" means debit amounts; a filter
//! with an explicit direction overrides that (e.g. to total credits). Empty
//! selections produce zero totals and `None` for "top" answers.

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use spendscope_core::{Direction, EnrichedDataset, ValidTransaction, YearMonth};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::filter::Filter;

/// Dimension to group by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKey {
    Month,
    Week,
    Weekday,
    Category,
    Merchant,
    SpendBucket,
    DayType,
}

impl GroupKey {
    /// Time keys are listed in calendar order rather than by value.
    pub fn is_chronological(&self) -> bool {
        matches!(self, GroupKey::Month | GroupKey::Week | GroupKey::Weekday)
    }

    /// (sort order, label) for one transaction
    fn key_of(&self, t: &ValidTransaction<'_>) -> (i64, String) {
        match self {
            GroupKey::Month => {
                let ym = YearMonth::of(t.date);
                (ym.year as i64 * 12 + ym.month as i64, ym.to_string())
            }
            GroupKey::Week => {
                let iso = t.date.iso_week();
                (
                    iso.year() as i64 * 100 + iso.week() as i64,
                    format!("{}-W{:02}", iso.year(), iso.week()),
                )
            }
            GroupKey::Weekday => (
                t.calendar.weekday.num_days_from_monday() as i64,
                t.calendar.weekday_name().to_string(),
            ),
            GroupKey::Category => (0, t.category.to_string()),
            GroupKey::Merchant => (0, t.description.to_string()),
            GroupKey::SpendBucket => (0, t.spend_bucket.to_string()),
            GroupKey::DayType => (0, t.calendar.day_type().to_string()),
        }
    }
}

impl FromStr for GroupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "month" => Ok(GroupKey::Month),
            "week" | "week_number" => Ok(GroupKey::Week),
            "weekday" | "day_of_week" => Ok(GroupKey::Weekday),
            "category" => Ok(GroupKey::Category),
            "merchant" | "description" => Ok(GroupKey::Merchant),
            "spend_bucket" | "spendbucket" | "bucket" => Ok(GroupKey::SpendBucket),
            "day_type" => Ok(GroupKey::DayType),
            other => Err(format!("unknown group key: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Total,
    Count,
    Average,
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "total" | "sum" => Ok(Metric::Total),
            "count" => Ok(Metric::Count),
            "average" | "avg" | "mean" => Ok(Metric::Average),
            other => Err(format!("unknown metric: {other}")),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Metric::Total => "total",
            Metric::Count => "count",
            Metric::Average => "average",
        })
    }
}

/// One group of a grouped series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRow {
    pub key: String,
    /// Value of the requested metric
    pub value: f64,
    pub total: f64,
    pub count: usize,
}

/// A name with the amount that made it "top"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedTotal {
    pub name: String,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekTotal {
    pub week: u32,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekendSplit {
    pub weekend: f64,
    pub weekday: f64,
    /// "Weekend" only when weekend spend is strictly larger
    pub dominant: String,
}

/// Headline numbers for the whole statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub records: usize,
    pub invalid_records: usize,
    pub transactions: usize,
    pub total_spend: f64,
    pub average_spend: f64,
    pub total_credit: f64,
    pub first_date: Option<chrono::NaiveDate>,
    pub last_date: Option<chrono::NaiveDate>,
}

/// Quick answers for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthInsights {
    pub month: YearMonth,
    pub total_spend: f64,
    pub transactions: usize,
    pub average_transaction: f64,
    pub unique_merchants: usize,
    pub top_merchant: Option<NamedTotal>,
    pub top_category: Option<NamedTotal>,
    pub weekend_vs_weekday: WeekendSplit,
    pub highest_spending_week: Option<WeekTotal>,
}

/// Records a spend query looks at: the filter, restricted to debits unless
/// the filter names a direction.
fn spend_rows<'a>(dataset: &'a EnrichedDataset, filter: &Filter) -> Vec<ValidTransaction<'a>> {
    let mut filter = filter.clone();
    filter.direction.get_or_insert(Direction::Debit);
    filter.apply(dataset)
}

/// Total spend of the matching records; 0.0 when nothing matches.
pub fn total_spend(dataset: &EnrichedDataset, filter: &Filter) -> f64 {
    spend_rows(dataset, filter).iter().map(|t| t.amount).sum()
}

/// Number of valid records matching the filter, either direction.
pub fn count(dataset: &EnrichedDataset, filter: &Filter) -> usize {
    filter.apply(dataset).len()
}

/// Spend grouped by `key`, reduced with `metric`.
pub fn group(
    dataset: &EnrichedDataset,
    filter: &Filter,
    key: GroupKey,
    metric: Metric,
) -> Vec<GroupRow> {
    group_rows(&spend_rows(dataset, filter), key, metric)
}

fn group_rows(rows: &[ValidTransaction<'_>], key: GroupKey, metric: Metric) -> Vec<GroupRow> {
    let mut groups: HashMap<String, (i64, f64, usize)> = HashMap::new();
    for t in rows {
        let (order, label) = key.key_of(t);
        let entry = groups.entry(label).or_insert((order, 0.0, 0));
        entry.1 += t.amount;
        entry.2 += 1;
    }

    let mut out: Vec<(i64, GroupRow)> = groups
        .into_iter()
        .map(|(label, (order, total, count))| {
            let value = match metric {
                Metric::Total => total,
                Metric::Count => count as f64,
                Metric::Average => total / count as f64,
            };
            (
                order,
                GroupRow {
                    key: label,
                    value,
                    total,
                    count,
                },
            )
        })
        .collect();

    if key.is_chronological() {
        out.sort_by(|a, b| a.0.cmp(&b.0));
    } else {
        out.sort_by(|a, b| {
            b.1.value
                .total_cmp(&a.1.value)
                .then_with(|| a.1.key.cmp(&b.1.key))
        });
    }
    out.into_iter().map(|(_, row)| row).collect()
}

/// Top `n` merchants by total spend
pub fn top_merchants(dataset: &EnrichedDataset, filter: &Filter, n: usize) -> Vec<GroupRow> {
    let mut rows = group(dataset, filter, GroupKey::Merchant, Metric::Total);
    rows.truncate(n);
    rows
}

fn top_of(rows: &[ValidTransaction<'_>], key: GroupKey) -> Option<NamedTotal> {
    group_rows(rows, key, Metric::Total)
        .into_iter()
        .next()
        .map(|r| NamedTotal {
            name: r.key,
            amount: r.total,
        })
}

pub fn summary(dataset: &EnrichedDataset) -> Summary {
    let valid: Vec<_> = dataset.valid().collect();
    let debits: Vec<f64> = valid.iter().filter(|t| t.is_debit()).map(|t| t.amount).collect();
    let total_spend: f64 = debits.iter().sum();

    Summary {
        records: dataset.len(),
        invalid_records: dataset.invalid_count(),
        transactions: valid.len(),
        total_spend,
        average_spend: mean(total_spend, debits.len()),
        total_credit: valid
            .iter()
            .filter(|t| t.direction == Direction::Credit)
            .map(|t| t.amount)
            .sum(),
        first_date: valid.iter().map(|t| t.date).min(),
        last_date: valid.iter().map(|t| t.date).max(),
    }
}

/// Months that hold at least one valid record, ascending
pub fn available_months(dataset: &EnrichedDataset) -> Vec<YearMonth> {
    dataset
        .valid()
        .map(|t| YearMonth::of(t.date))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn month_insights(dataset: &EnrichedDataset, month: YearMonth) -> MonthInsights {
    let rows = spend_rows(dataset, &Filter::new().period(month));
    let total: f64 = rows.iter().map(|t| t.amount).sum();

    let weekend: f64 = rows.iter().filter(|t| t.calendar.is_weekend).map(|t| t.amount).sum();
    let weekday = total - weekend;

    let highest_spending_week = group_rows(&rows, GroupKey::Week, Metric::Total)
        .into_iter()
        .fold(None::<GroupRow>, |best, row| match best {
            Some(b) if b.total >= row.total => Some(b),
            _ => Some(row),
        })
        .and_then(|row| {
            let week = row.key.rsplit_once("-W")?.1.parse().ok()?;
            Some(WeekTotal {
                week,
                amount: row.total,
            })
        });

    MonthInsights {
        month,
        total_spend: total,
        transactions: rows.len(),
        average_transaction: mean(total, rows.len()),
        unique_merchants: rows.iter().map(|t| t.description).collect::<BTreeSet<_>>().len(),
        top_merchant: top_of(&rows, GroupKey::Merchant),
        top_category: top_of(&rows, GroupKey::Category),
        weekend_vs_weekday: WeekendSplit {
            weekend,
            weekday,
            dominant: if weekend > weekday { "Weekend" } else { "Weekday" }.to_string(),
        },
        highest_spending_week,
    }
}

fn mean(total: f64, n: usize) -> f64 {
    if n == 0 { 0.0 } else { total / n as f64 }
}
