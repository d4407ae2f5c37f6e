//! Qdrant options and command.

use vdbbench_core::{
    CommonParams, ConfigError, Db, DeclarationError, FromParams, ParamBag, ParamGroup, ParamSpec,
    COMMON_PARAMS,
};

use super::config::{QdrantLocalConfig, QdrantLocalIndexConfig};
use super::QdrantLocal;
use crate::command::CommandSpec;
use crate::task::TaskConfig;

/// Connection and HNSW options.
pub const QDRANT_LOCAL_PARAMS: ParamGroup = ParamGroup {
    name: "QdrantLocal",
    params: &[
        ParamSpec::secret("url", "Qdrant url").required(),
        ParamSpec::int("grpc_port", "Qdrant gRPC port").default_int(3334),
        ParamSpec::bool("on_disk", "Store the vectors and the HNSW index on disk")
            .default_bool(false),
        ParamSpec::int("m", "HNSW index parameter m, set 0 to disable the index").default_int(16),
        ParamSpec::int("ef_construct", "HNSW index parameter ef_construct").default_int(200),
        ParamSpec::int(
            "hnsw_ef",
            "HNSW index parameter hnsw_ef, set 0 to use ef_construct for search",
        )
        .default_int(0),
    ],
};

/// Input of the Qdrant command.
#[derive(Debug, Clone)]
pub struct QdrantLocalInput {
    /// Shared run options
    pub common: CommonParams,
    /// Connection
    pub config: QdrantLocalConfig,
    /// Collection settings
    pub index: QdrantLocalIndexConfig,
}

impl FromParams for QdrantLocalInput {
    fn groups() -> Vec<&'static ParamGroup> {
        vec![&COMMON_PARAMS, &QDRANT_LOCAL_PARAMS]
    }

    fn from_params(bag: &ParamBag) -> Result<Self, ConfigError> {
        Ok(Self {
            common: CommonParams::from_params(bag)?,
            config: QdrantLocalConfig {
                url: bag.required_secret("url")?,
                grpc_port: bag.u16("grpc_port")?,
            },
            index: QdrantLocalIndexConfig {
                on_disk: bag.bool("on_disk")?,
                m: bag.u32("m")?,
                ef_construct: bag.u32("ef_construct")?,
                hnsw_ef: bag.u32("hnsw_ef")?,
            },
        })
    }
}

/// The Qdrant command.
pub fn commands() -> Result<Vec<CommandSpec>, DeclarationError> {
    Ok(vec![CommandSpec::new::<QdrantLocalInput>(
        Db::QdrantLocal,
        "QdrantLocal",
        "Qdrant over its REST API with an HNSW index",
        |input| TaskConfig::new::<QdrantLocal>(input.config, input.index, input.common),
    )?])
}
