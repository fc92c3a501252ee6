//! spendscope-ingest: statement loading (PDF/text/CSV) and transaction extraction.

pub mod error;
pub mod extractor;
pub mod layout;
pub mod loader;
pub mod parsers;
pub mod types;

pub use error::IngestError;
pub use extractor::Extractor;
pub use loader::{load_pdf, load_pdf_path};
pub use parsers::{parse_raw_csv, parse_raw_csv_path};
pub use types::{PageText, StatementDocument};
