//! spendscope-core: statement transaction model, calendar decomposition and spend buckets

pub mod buckets;
pub mod calendar;
pub mod error;
pub mod transaction;

pub use buckets::SpendBuckets;
pub use calendar::{CalendarParts, YearMonth, parse_statement_date, parse_weekday, weekday_name};
pub use error::ConfigError;
pub use transaction::{
    Direction, EnrichedDataset, EnrichedTransaction, Field, RawTransaction, ValidTransaction,
};
