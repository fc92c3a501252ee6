use thiserror::Error;

/// Rejected enrichment configuration (bucket edges, category rules)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("bucket edge is not a finite number: {0}")]
    NonFiniteEdge(f64),

    #[error("bucket edges must be strictly ascending, got {0} before {1}")]
    UnsortedEdges(f64, f64),

    #[error("{edges} bucket edges need {expected} labels, got {got}")]
    LabelCount {
        edges: usize,
        expected: usize,
        got: usize,
    },

    #[error("bucket label #{0} is empty")]
    EmptyLabel(usize),

    #[error("category rule for '{0}' has an empty keyword")]
    EmptyKeyword(String),
}
