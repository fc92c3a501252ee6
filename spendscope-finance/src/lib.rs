//! spendscope-finance: category rules, enrichment, insight queries and CSV export

pub mod category_rules;
pub mod enrich;
pub mod export;
pub mod filter;
pub mod insights;

pub use category_rules::{CategoryRule, CategoryRules, UNCATEGORIZED};
pub use enrich::Enricher;
pub use export::{ExportRow, read_csv, to_csv_string, write_csv};
pub use filter::Filter;
pub use insights::{GroupKey, GroupRow, Metric, MonthInsights, Summary};
