//! Plain-text rendering of datasets and insight results.

use spendscope_core::{EnrichedDataset, Field};
use spendscope_finance::insights::{self, GroupKey, GroupRow, Metric, MonthInsights, Summary};
use spendscope_finance::Filter;

pub fn print_summary(s: &Summary) {
    println!("## Summary\n");
    match (s.first_date, s.last_date) {
        (Some(first), Some(last)) => println!("Period:        {first} to {last}"),
        _ => println!("Period:        -"),
    }
    println!("Transactions:  {}", s.transactions);
    println!("Total spend:   {:.2}", s.total_spend);
    println!("Avg spend:     {:.2}", s.average_spend);
    println!("Total credit:  {:.2}", s.total_credit);
    if s.invalid_records > 0 {
        println!("Invalid rows:  {} (excluded from insights)", s.invalid_records);
    }
    println!();
}

pub fn print_group(title: &str, rows: &[GroupRow], metric: Metric) {
    println!("## {title}\n");
    if rows.is_empty() {
        println!("(no matching transactions)\n");
        return;
    }
    let width = rows.iter().map(|r| r.key.chars().count()).max().unwrap_or(0);
    for r in rows {
        match metric {
            Metric::Count => println!("{:<width$}  {:>6}", r.key, r.count),
            _ => println!("{:<width$}  {:>12.2}  ({} txns)", r.key, r.value, r.count),
        }
    }
    println!();
}

pub fn print_invalid(dataset: &EnrichedDataset) {
    let invalid: Vec<_> = dataset.invalid().collect();
    if invalid.is_empty() {
        return;
    }
    println!("## Rows that could not be parsed\n");
    for t in invalid {
        let date = match &t.raw.date {
            Field::Parsed(d) => d.to_string(),
            Field::Malformed(raw) => raw.clone(),
        };
        println!(
            "- page {} | {} | {} | {}",
            t.raw.page,
            date,
            t.raw.description,
            t.invalid.as_deref().unwrap_or("")
        );
    }
    println!();
}

/// The dashboard view: headline numbers plus the standard breakdowns.
pub fn print_overview(dataset: &EnrichedDataset, top: usize) {
    print_summary(&insights::summary(dataset));

    let all = Filter::new();
    print_group(
        "Monthly spend",
        &insights::group(dataset, &all, GroupKey::Month, Metric::Total),
        Metric::Total,
    );
    print_group(
        "Spend by category",
        &insights::group(dataset, &all, GroupKey::Category, Metric::Total),
        Metric::Total,
    );
    print_group(
        &format!("Top {top} merchants"),
        &insights::top_merchants(dataset, &all, top),
        Metric::Total,
    );
    print_group(
        "Spend by day of week",
        &insights::group(dataset, &all, GroupKey::Weekday, Metric::Total),
        Metric::Total,
    );
    print_group(
        "Transactions by spend bucket",
        &insights::group(dataset, &all, GroupKey::SpendBucket, Metric::Count),
        Metric::Count,
    );
    print_invalid(dataset);
}

pub fn print_month(m: &MonthInsights) {
    println!("## {}\n", m.month);
    println!("Total spend:        {:.2}", m.total_spend);
    println!("Transactions:       {}", m.transactions);
    println!("Avg transaction:    {:.2}", m.average_transaction);
    println!("Unique merchants:   {}", m.unique_merchants);
    match &m.top_merchant {
        Some(t) => println!("Top merchant:       {} ({:.2})", t.name, t.amount),
        None => println!("Top merchant:       -"),
    }
    match &m.top_category {
        Some(t) => println!("Top category:       {} ({:.2})", t.name, t.amount),
        None => println!("Top category:       -"),
    }
    let split = &m.weekend_vs_weekday;
    println!(
        "Weekend / weekday:  {:.2} / {:.2} ({} heavier)",
        split.weekend, split.weekday, split.dominant
    );
    match &m.highest_spending_week {
        Some(w) => println!("Busiest week:       W{:02} ({:.2})", w.week, w.amount),
        None => println!("Busiest week:       -"),
    }
    println!();
}
