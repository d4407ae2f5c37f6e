//! Case catalogue
//!
//! A case names the dataset shape a run targets. The dataset itself belongs
//! to the benchmark driver; the harness only needs its dimension, size,
//! metric and whether queries carry a filter.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::index::MetricType;

/// Dataset shape selected by `--case-type`.
///
/// The `1P` / `99P` variants filter out 1% / 99% of the data at query time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CaseType {
    /// 1M Cohere vectors, 768 dimensions
    #[default]
    Performance768D1M,
    /// 10M Cohere vectors, 768 dimensions
    Performance768D10M,
    /// 500K OpenAI vectors, 1536 dimensions
    Performance1536D500K,
    /// 5M OpenAI vectors, 1536 dimensions
    Performance1536D5M,
    /// 1M vectors, 768 dimensions, 1% filtered
    Performance768D1M1P,
    /// 1M vectors, 768 dimensions, 99% filtered
    Performance768D1M99P,
    /// 500K vectors, 1536 dimensions, 1% filtered
    Performance1536D500K1P,
    /// 500K vectors, 1536 dimensions, 99% filtered
    Performance1536D500K99P,
}

impl CaseType {
    /// Every case in the catalogue.
    pub const ALL: [CaseType; 8] = [
        CaseType::Performance768D1M,
        CaseType::Performance768D10M,
        CaseType::Performance1536D500K,
        CaseType::Performance1536D5M,
        CaseType::Performance768D1M1P,
        CaseType::Performance768D1M99P,
        CaseType::Performance1536D500K1P,
        CaseType::Performance1536D500K99P,
    ];

    /// Name as accepted by `--case-type`
    pub fn name(&self) -> &'static str {
        match self {
            CaseType::Performance768D1M => "Performance768D1M",
            CaseType::Performance768D10M => "Performance768D10M",
            CaseType::Performance1536D500K => "Performance1536D500K",
            CaseType::Performance1536D5M => "Performance1536D5M",
            CaseType::Performance768D1M1P => "Performance768D1M1P",
            CaseType::Performance768D1M99P => "Performance768D1M99P",
            CaseType::Performance1536D500K1P => "Performance1536D500K1P",
            CaseType::Performance1536D500K99P => "Performance1536D500K99P",
        }
    }

    /// Parse from a case name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        CaseType::ALL
            .into_iter()
            .find(|case| case.name().eq_ignore_ascii_case(s))
    }

    /// Vector dimension
    pub fn dim(&self) -> usize {
        match self {
            CaseType::Performance768D1M
            | CaseType::Performance768D10M
            | CaseType::Performance768D1M1P
            | CaseType::Performance768D1M99P => 768,
            CaseType::Performance1536D500K
            | CaseType::Performance1536D5M
            | CaseType::Performance1536D500K1P
            | CaseType::Performance1536D500K99P => 1536,
        }
    }

    /// Number of vectors in the dataset
    pub fn size(&self) -> usize {
        match self {
            CaseType::Performance768D1M
            | CaseType::Performance768D1M1P
            | CaseType::Performance768D1M99P => 1_000_000,
            CaseType::Performance768D10M => 10_000_000,
            CaseType::Performance1536D500K
            | CaseType::Performance1536D500K1P
            | CaseType::Performance1536D500K99P => 500_000,
            CaseType::Performance1536D5M => 5_000_000,
        }
    }

    /// Similarity metric of the dataset
    pub fn metric(&self) -> MetricType {
        // Both source corpora ship normalized embeddings scored by cosine.
        MetricType::Cosine
    }

    /// Fraction of the data excluded by the query filter, if any
    pub fn filter_rate(&self) -> Option<f64> {
        match self {
            CaseType::Performance768D1M1P | CaseType::Performance1536D500K1P => Some(0.01),
            CaseType::Performance768D1M99P | CaseType::Performance1536D500K99P => Some(0.99),
            _ => None,
        }
    }

    /// Whether queries in this case carry a filter
    pub fn is_filtered(&self) -> bool {
        self.filter_rate().is_some()
    }
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
