//! Record extractor: statement text to an ordered list of RawTransaction.
//!
//! Every line is offered to the line parsers in order; the first parser that
//! accepts it wins. Known noise (headers, footers, transaction ids, times) is
//! skipped. Any other unmatched text is treated as the continuation of the
//! previous record's description, which covers descriptions wrapped onto the
//! next line or the next page. Nothing is deduplicated.

use regex::Regex;
use spendscope_core::RawTransaction;
use tracing::{debug, info};

use crate::error::Result;
use crate::parsers::{DatedLineParser, LineParser, PhonePeParser};
use crate::types::StatementDocument;

/// Wrapped description lines appended to a single record, at most.
pub const MAX_CONTINUATION_LINES: usize = 2;

pub struct Extractor {
    parsers: Vec<Box<dyn LineParser>>,
    noise_re: Regex,
}

impl Extractor {
    /// Extractor with the built-in PhonePe and dated-line parsers.
    pub fn new() -> Result<Self> {
        Self::with_parsers(vec![
            Box::new(PhonePeParser::new()?),
            Box::new(DatedLineParser::new()?),
        ])
    }

    pub fn with_parsers(parsers: Vec<Box<dyn LineParser>>) -> Result<Self> {
        let noise_re = Regex::new(concat!(
            r"(?i)^\s*(?:",
            r"page\s+\d+(?:\s+of\s+\d+)?",
            r"|date\s+(?:transaction|description|particulars|narration|details)\b.*",
            r"|transaction\s+(?:id|statement)\b.*",
            r"|utr\s+(?:no|number)\b.*",
            r"|(?:paid|debited)\s+(?:by|from)\b.*",
            r"|credited\s+to\b.*",
            r"|\d{1,2}:\d{2}(?:\s*[ap]\.?m\.?)?",
            r"|statement\s+period\b.*",
            r"|this\s+is\s+a\s+(?:system|computer)[\s-]+generated\b.*",
            r"|(?:opening|closing)\s+balance\b.*",
            r")\s*$"
        ))?;
        Ok(Self { parsers, noise_re })
    }

    /// Extract transactions from every page, in document order.
    pub fn extract(&self, document: &StatementDocument) -> Vec<RawTransaction> {
        let txns = self.scan(document.lines());
        if txns.is_empty() {
            info!(pages = document.page_count(), "no transactions found");
        } else {
            info!(
                pages = document.page_count(),
                transactions = txns.len(),
                "extracted transactions"
            );
        }
        txns
    }

    /// Extract from a single block of text attributed to `page`.
    pub fn extract_text(&self, text: &str, page: usize) -> Vec<RawTransaction> {
        self.scan(text.lines().map(|line| (page, line)))
    }

    fn parse_line(&self, line: &str) -> Option<RawTransaction> {
        self.parsers.iter().find_map(|p| {
            let txn = p.parse_line(line)?;
            debug!(parser = p.name(), line, "matched statement row");
            Some(txn)
        })
    }

    fn is_noise(&self, line: &str) -> bool {
        line.is_empty() || self.noise_re.is_match(line)
    }

    fn scan<'a>(&self, lines: impl Iterator<Item = (usize, &'a str)>) -> Vec<RawTransaction> {
        let mut out: Vec<RawTransaction> = Vec::new();
        let mut continuation_lines = 0;

        for (page, line) in lines {
            let line = normalize_line(line);

            if let Some(txn) = self.parse_line(&line) {
                out.push(txn.with_page(page));
                continuation_lines = 0;
                continue;
            }

            if self.is_noise(&line) {
                continue;
            }

            // Text before the first record is statement preamble.
            let Some(last) = out.last_mut() else {
                continue;
            };
            if continuation_lines < MAX_CONTINUATION_LINES {
                last.description.push(' ');
                last.description.push_str(&line);
                continuation_lines += 1;
            }
        }

        out
    }
}

/// Trim, turn tabs and non-breaking spaces into plain spaces, and drop table
/// rules so cell boundaries read like column gaps.
fn normalize_line(line: &str) -> String {
    line.chars()
        .map(|c| match c {
            '\t' | '\u{a0}' | '|' => ' ',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}
