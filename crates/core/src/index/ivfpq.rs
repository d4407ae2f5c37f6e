//! IVF-PQ (partition family) parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{from_map, non_sentinel, to_map};
use crate::error::ConfigError;

/// Wire name of the probe-count search parameter.
pub const NPROBES: &str = "nprobes";

/// Accepted product-quantization bit widths.
pub const VALID_NBITS: [u32; 2] = [4, 8];

/// Validated IVF-PQ configuration.
///
/// Zero for `num_partitions`, `num_sub_vectors` or `nprobes` means "use the
/// backend default". `nbits` has no sentinel and must be 4 or 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IvfPqConfig {
    num_partitions: u32,
    num_sub_vectors: u32,
    nbits: u32,
    nprobes: u32,
}

impl IvfPqConfig {
    /// Build a config, range-checking the bit width.
    pub fn new(
        num_partitions: u32,
        num_sub_vectors: u32,
        nbits: u32,
        nprobes: u32,
    ) -> Result<Self, ConfigError> {
        if !VALID_NBITS.contains(&nbits) {
            return Err(ConfigError::InvalidBitWidth { value: nbits });
        }
        Ok(Self {
            num_partitions,
            num_sub_vectors,
            nbits,
            nprobes,
        })
    }

    /// Rebuild a config from rendered request shapes.
    pub fn from_params(
        build: &IvfPqBuildParams,
        search: &IvfPqSearchParams,
    ) -> Result<Self, ConfigError> {
        Self::new(
            build.num_partitions.unwrap_or(0),
            build.num_sub_vectors.unwrap_or(0),
            build.num_bits,
            search.nprobes.unwrap_or(0),
        )
    }

    /// Number of IVF partitions (0 = backend default)
    pub fn num_partitions(&self) -> u32 {
        self.num_partitions
    }

    /// Number of PQ sub-vectors (0 = backend default)
    pub fn num_sub_vectors(&self) -> u32 {
        self.num_sub_vectors
    }

    /// PQ code width in bits
    pub fn nbits(&self) -> u32 {
        self.nbits
    }

    /// Partitions probed per query (0 = backend default)
    pub fn nprobes(&self) -> u32 {
        self.nprobes
    }

    /// Build-time request shape
    pub fn build_params(&self) -> IvfPqBuildParams {
        IvfPqBuildParams {
            num_partitions: non_sentinel(self.num_partitions),
            num_sub_vectors: non_sentinel(self.num_sub_vectors),
            num_bits: self.nbits,
        }
    }

    /// Search-time request shape
    pub fn search_params(&self) -> IvfPqSearchParams {
        IvfPqSearchParams {
            nprobes: non_sentinel(self.nprobes),
        }
    }
}

/// IVF-PQ fields of an index-build request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IvfPqBuildParams {
    /// Number of partitions, absent for the backend default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_partitions: Option<u32>,
    /// Number of sub-vectors, absent for the backend default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_sub_vectors: Option<u32>,
    /// Bits per PQ code
    pub num_bits: u32,
}

impl IvfPqBuildParams {
    /// Wire form
    pub fn to_map(&self) -> Map<String, Value> {
        to_map(self)
    }

    /// Parse the wire form
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ConfigError> {
        from_map("index_param", map)
    }
}

/// IVF-PQ fields of a search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IvfPqSearchParams {
    /// Partitions to probe, absent for the backend default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nprobes: Option<u32>,
}

impl IvfPqSearchParams {
    /// Wire form
    pub fn to_map(&self) -> Map<String, Value> {
        to_map(self)
    }

    /// Parse the wire form
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ConfigError> {
        from_map("search_param", map)
    }
}
