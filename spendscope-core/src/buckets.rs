//! Spend buckets: labeled, ordered, non-overlapping amount ranges.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// `edges` split the amount line into `edges.len() + 1` buckets. Bucket `i`
/// holds amounts below `edges[i]` (and at or above `edges[i - 1]`); anything
/// at or above the last edge falls into the last bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BucketTable")]
pub struct SpendBuckets {
    edges: Vec<f64>,
    labels: Vec<String>,
}

/// Unchecked wire form; deserialization goes through [`SpendBuckets::new`].
#[derive(Deserialize)]
struct BucketTable {
    edges: Vec<f64>,
    labels: Vec<String>,
}

impl TryFrom<BucketTable> for SpendBuckets {
    type Error = ConfigError;

    fn try_from(table: BucketTable) -> Result<Self, Self::Error> {
        SpendBuckets::new(table.edges, table.labels)
    }
}

impl SpendBuckets {
    pub fn new(edges: Vec<f64>, labels: Vec<String>) -> Result<Self, ConfigError> {
        if let Some(bad) = edges.iter().find(|e| !e.is_finite()) {
            return Err(ConfigError::NonFiniteEdge(*bad));
        }
        if let Some(w) = edges.windows(2).find(|w| w[0] >= w[1]) {
            return Err(ConfigError::UnsortedEdges(w[0], w[1]));
        }
        if labels.len() != edges.len() + 1 {
            return Err(ConfigError::LabelCount {
                edges: edges.len(),
                expected: edges.len() + 1,
                got: labels.len(),
            });
        }
        if let Some(i) = labels.iter().position(|l| l.trim().is_empty()) {
            return Err(ConfigError::EmptyLabel(i));
        }
        Ok(Self { edges, labels })
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn index_for(&self, amount: f64) -> usize {
        self.edges
            .iter()
            .position(|edge| amount < *edge)
            .unwrap_or(self.edges.len())
    }

    pub fn label_for(&self, amount: f64) -> &str {
        &self.labels[self.index_for(amount)]
    }
}

impl Default for SpendBuckets {
    fn default() -> Self {
        Self {
            edges: vec![100.0, 2000.0],
            labels: vec!["small".into(), "medium".into(), "large".into()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: SpendBuckets =
            serde_json::from_str(r#"{"edges":[50.0],"labels":["low","high"]}"#).unwrap();
        assert_eq!(ok.label_for(75.0), "high");

        let short = serde_json::from_str::<SpendBuckets>(r#"{"edges":[50.0,90.0],"labels":["low"]}"#);
        assert!(short.unwrap_err().to_string().contains("label"));
        assert!(serde_json::from_str::<SpendBuckets>(r#"{"edges":[9.0,3.0],"labels":["a","b","c"]}"#).is_err());
    }

    #[test]
    fn test_default_buckets() {
        let b = SpendBuckets::default();
        assert_eq!(b.label_for(0.0), "small");
        assert_eq!(b.label_for(99.99), "small");
        assert_eq!(b.label_for(100.0), "medium");
        assert_eq!(b.label_for(250.0), "medium");
        assert_eq!(b.label_for(2000.0), "large");
        assert_eq!(b.label_for(50000.0), "large");
    }

    #[test]
    fn test_partition_is_total_and_monotonic() {
        let b = SpendBuckets::new(
            vec![100.0, 500.0, 2000.0],
            labels(&["small", "medium", "large", "huge"]),
        )
        .unwrap();

        let mut last = 0;
        for cents in (0..500_000).step_by(7) {
            let amount = cents as f64 / 100.0;
            let idx = b.index_for(amount);
            assert!(idx < b.labels().len());
            // ranges are ordered: a larger amount never lands in an earlier bucket
            assert!(idx >= last, "amount {amount} went back to bucket {idx}");
            last = idx;
            // exactly one range holds the amount
            let holding = (0..b.labels().len())
                .filter(|&i| {
                    let lo = if i == 0 { f64::NEG_INFINITY } else { b.edges()[i - 1] };
                    let hi = b.edges().get(i).copied().unwrap_or(f64::INFINITY);
                    amount >= lo && amount < hi
                })
                .count();
            assert_eq!(holding, 1);
        }
    }

    #[test]
    fn test_no_edges_is_single_bucket() {
        let b = SpendBuckets::new(vec![], labels(&["all"])).unwrap();
        assert_eq!(b.label_for(1e9), "all");
    }

    #[test]
    fn test_rejects_bad_config() {
        assert_eq!(
            SpendBuckets::new(vec![500.0, 100.0], labels(&["a", "b", "c"])),
            Err(ConfigError::UnsortedEdges(500.0, 100.0))
        );
        assert_eq!(
            SpendBuckets::new(vec![100.0, 100.0], labels(&["a", "b", "c"])),
            Err(ConfigError::UnsortedEdges(100.0, 100.0))
        );
        assert!(matches!(
            SpendBuckets::new(vec![100.0], labels(&["a"])),
            Err(ConfigError::LabelCount { expected: 2, got: 1, .. })
        ));
        assert!(matches!(
            SpendBuckets::new(vec![f64::NAN], labels(&["a", "b"])),
            Err(ConfigError::NonFiniteEdge(_))
        ));
        assert_eq!(
            SpendBuckets::new(vec![10.0], labels(&["a", " "])),
            Err(ConfigError::EmptyLabel(1))
        );
    }
}
