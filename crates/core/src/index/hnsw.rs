//! HNSW (graph family) parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{from_map, non_sentinel, to_map};
use crate::error::ConfigError;

/// Wire name of the search-breadth parameter.
pub const EF: &str = "ef";

/// HNSW configuration. Zero in any field means "use the backend default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HnswConfig {
    m: u32,
    ef_construction: u32,
    ef: u32,
}

impl HnswConfig {
    /// Build a config from graph degree, construction breadth and search breadth.
    pub fn new(m: u32, ef_construction: u32, ef: u32) -> Self {
        Self {
            m,
            ef_construction,
            ef,
        }
    }

    /// Rebuild a config from rendered request shapes.
    pub fn from_params(build: &HnswBuildParams, search: &HnswSearchParams) -> Self {
        Self::new(
            build.m.unwrap_or(0),
            build.ef_construction.unwrap_or(0),
            search.ef.unwrap_or(0),
        )
    }

    /// Graph degree
    pub fn m(&self) -> u32 {
        self.m
    }

    /// Candidate list size while building
    pub fn ef_construction(&self) -> u32 {
        self.ef_construction
    }

    /// Candidate list size while searching
    pub fn ef(&self) -> u32 {
        self.ef
    }

    /// Build-time request shape
    pub fn build_params(&self) -> HnswBuildParams {
        HnswBuildParams {
            m: non_sentinel(self.m),
            ef_construction: non_sentinel(self.ef_construction),
        }
    }

    /// Search-time request shape
    pub fn search_params(&self) -> HnswSearchParams {
        HnswSearchParams {
            ef: non_sentinel(self.ef),
        }
    }
}

/// HNSW fields of an index-build request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HnswBuildParams {
    /// Graph degree, absent for the backend default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub m: Option<u32>,
    /// Construction breadth, absent for the backend default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ef_construction: Option<u32>,
}

impl HnswBuildParams {
    /// Wire form
    pub fn to_map(&self) -> Map<String, Value> {
        to_map(self)
    }

    /// Parse the wire form
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ConfigError> {
        from_map("index_param", map)
    }
}

/// HNSW fields of a search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HnswSearchParams {
    /// Search breadth, absent for the backend default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ef: Option<u32>,
}

impl HnswSearchParams {
    /// Wire form
    pub fn to_map(&self) -> Map<String, Value> {
        to_map(self)
    }

    /// Parse the wire form
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ConfigError> {
        from_map("search_param", map)
    }
}
