//! Backend identities.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A vector database the harness can benchmark.
///
/// The serialized form is the display label used in reports and command
/// names, e.g. `LanceDBServer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Db {
    /// LanceDB behind a remote search endpoint
    #[serde(rename = "LanceDBServer")]
    LanceDbServer,

    /// Qdrant reached over its REST API
    #[serde(rename = "QdrantLocal")]
    QdrantLocal,
}

impl Db {
    /// Every supported backend.
    pub const ALL: [Db; 2] = [Db::LanceDbServer, Db::QdrantLocal];

    /// Display label
    pub fn name(&self) -> &'static str {
        match self {
            Db::LanceDbServer => "LanceDBServer",
            Db::QdrantLocal => "QdrantLocal",
        }
    }

    /// Parse from a display label (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        Db::ALL
            .into_iter()
            .find(|db| db.name().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_matches_name() {
        for db in Db::ALL {
            assert_eq!(Db::parse(db.name()), Some(db));
        }
        assert_eq!(Db::parse("lancedbserver"), Some(Db::LanceDbServer));
        assert_eq!(Db::parse("milvus"), None);
    }

    #[test]
    fn test_serializes_as_label() {
        let json = serde_json::to_string(&Db::LanceDbServer).unwrap();
        assert_eq!(json, r#""LanceDBServer""#);
    }
}
