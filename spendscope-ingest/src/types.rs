use serde::{Deserialize, Serialize};

/// Text extracted from one statement page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageText {
    /// 1-based page number
    pub number: usize,
    pub text: String,
}

/// Page-level text of a loaded statement, in page order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementDocument {
    pub pages: Vec<PageText>,
}

impl StatementDocument {
    /// Build from already-extracted text. Form feeds (as emitted by
    /// `pdftotext`) separate pages.
    pub fn from_text(text: &str) -> Self {
        let pages = text
            .split('\x0c')
            .enumerate()
            .map(|(i, page)| PageText {
                number: i + 1,
                text: page.to_string(),
            })
            .collect();
        Self { pages }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn has_text(&self) -> bool {
        self.pages.iter().any(|p| !p.text.trim().is_empty())
    }

    /// All lines tagged with their page number
    pub fn lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.pages
            .iter()
            .flat_map(|p| p.text.lines().map(move |line| (p.number, line)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_splits_on_form_feed() {
        let doc = StatementDocument::from_text("a\nb\x0cc\n");
        assert_eq!(doc.page_count(), 2);
        let lines: Vec<_> = doc.lines().collect();
        assert_eq!(lines, vec![(1, "a"), (1, "b"), (2, "c")]);
    }

    #[test]
    fn test_has_text() {
        assert!(!StatementDocument::from_text("  \n\x0c\n").has_text());
        assert!(StatementDocument::from_text("\x0cx").has_text());
    }
}
