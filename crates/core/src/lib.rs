//! Core types for the vdbbench harness.
//!
//! This crate holds everything a backend adapter and the command surface
//! agree on, without any I/O:
//!
//! - **Db**: identity of each supported backend
//! - **IndexType / MetricType**: what index a run targets and how it scores
//! - **IvfPqConfig / HnswConfig**: build-time and search-time parameter models
//! - **CaseType**: the dataset shapes a run can select
//! - **ParamSpec / ParamGroup / ParamSet**: declarative option composition
//! - **Secret**: credentials that never render in plaintext
//! - **ConfigError / DeclarationError**: eager validation failures

#![warn(missing_docs)]

pub mod case;
pub mod db;
pub mod error;
pub mod index;
pub mod params;
pub mod secret;

pub use case::CaseType;
pub use db::Db;
pub use error::{ConfigError, DeclarationError};
pub use index::{
    hnsw::{HnswBuildParams, HnswConfig, HnswSearchParams},
    ivfpq::{IvfPqBuildParams, IvfPqConfig, IvfPqSearchParams, VALID_NBITS},
    required_search_param, validate_search_params, DbCaseConfig, IndexType, MetricType,
    SearchParams,
};
pub use params::{
    common::{CommonParams, COMMON_PARAMS},
    FromParams, ParamBag, ParamDefault, ParamGroup, ParamKind, ParamSet, ParamSpec, ParamValue,
    RawParams,
};
pub use secret::Secret;
