//! LanceDB server options and commands.

use vdbbench_core::{
    CommonParams, ConfigError, Db, DeclarationError, FromParams, HnswConfig, IvfPqConfig,
    ParamBag, ParamGroup, ParamSpec, COMMON_PARAMS,
};

use super::config::{LanceDbServerConfig, LanceDbServerIndexConfig};
use super::LanceDbServer;
use crate::command::CommandSpec;
use crate::task::TaskConfig;

/// Connection options.
pub const LANCEDB_SERVER_PARAMS: ParamGroup = ParamGroup {
    name: "LanceDBServer",
    params: &[
        ParamSpec::str("uri", "URI connection string").required(),
        ParamSpec::secret("token", "Authentication token"),
    ],
};

/// IVF-PQ tuning options.
pub const LANCEDB_IVFPQ_PARAMS: ParamGroup = ParamGroup {
    name: "LanceDBServerIVFPQ",
    params: &[
        ParamSpec::int(
            "num_partitions",
            "Number of partitions for IVFPQ index, unset = use LanceDB default",
        )
        .default_int(0),
        ParamSpec::int(
            "num_sub_vectors",
            "Number of sub-vectors for IVFPQ index, unset = use LanceDB default",
        )
        .default_int(0),
        ParamSpec::int("nbits", "Number of bits for IVFPQ index (must be 4 or 8)").default_int(8),
        ParamSpec::int(
            "nprobes",
            "Number of probes for IVFPQ search, unset = use LanceDB default",
        )
        .default_int(0),
    ],
};

/// HNSW tuning options.
pub const LANCEDB_HNSW_PARAMS: ParamGroup = ParamGroup {
    name: "LanceDBServerHNSW",
    params: &[
        ParamSpec::int("m", "HNSW parameter m").default_int(0),
        ParamSpec::int("ef_construction", "HNSW parameter ef_construction").default_int(0),
        ParamSpec::int("ef", "HNSW search parameter ef").default_int(0),
    ],
};

/// Input of the untuned commands.
#[derive(Debug, Clone)]
pub struct LanceDbServerInput {
    /// Shared run options
    pub common: CommonParams,
    /// Connection
    pub config: LanceDbServerConfig,
}

impl FromParams for LanceDbServerInput {
    fn groups() -> Vec<&'static ParamGroup> {
        vec![&COMMON_PARAMS, &LANCEDB_SERVER_PARAMS]
    }

    fn from_params(bag: &ParamBag) -> Result<Self, ConfigError> {
        let common = CommonParams::from_params(bag)?;
        let config = LanceDbServerConfig {
            db_label: common.db_label.clone(),
            uri: bag.str("uri")?.to_string(),
            token: bag.secret("token")?,
        };
        Ok(Self { common, config })
    }
}

/// Input of the IVF-PQ command.
#[derive(Debug, Clone)]
pub struct LanceDbServerIvfPqInput {
    /// Shared options and connection
    pub base: LanceDbServerInput,
    /// Validated index config
    pub index: IvfPqConfig,
}

impl FromParams for LanceDbServerIvfPqInput {
    fn groups() -> Vec<&'static ParamGroup> {
        let mut groups = LanceDbServerInput::groups();
        groups.push(&LANCEDB_IVFPQ_PARAMS);
        groups
    }

    fn from_params(bag: &ParamBag) -> Result<Self, ConfigError> {
        let index = IvfPqConfig::new(
            bag.u32("num_partitions")?,
            bag.u32("num_sub_vectors")?,
            bag.u32("nbits")?,
            bag.u32("nprobes")?,
        )?;
        Ok(Self {
            base: LanceDbServerInput::from_params(bag)?,
            index,
        })
    }
}

/// Input of the HNSW command.
#[derive(Debug, Clone)]
pub struct LanceDbServerHnswInput {
    /// Shared options and connection
    pub base: LanceDbServerInput,
    /// Index config
    pub index: HnswConfig,
}

impl FromParams for LanceDbServerHnswInput {
    fn groups() -> Vec<&'static ParamGroup> {
        let mut groups = LanceDbServerInput::groups();
        groups.push(&LANCEDB_HNSW_PARAMS);
        groups
    }

    fn from_params(bag: &ParamBag) -> Result<Self, ConfigError> {
        let index = HnswConfig::new(bag.u32("m")?, bag.u32("ef_construction")?, bag.u32("ef")?);
        Ok(Self {
            base: LanceDbServerInput::from_params(bag)?,
            index,
        })
    }
}

fn untuned(input: LanceDbServerInput, index: LanceDbServerIndexConfig) -> TaskConfig {
    TaskConfig::new::<LanceDbServer>(input.config, index, input.common)
}

/// The four LanceDB server commands.
pub fn commands() -> Result<Vec<CommandSpec>, DeclarationError> {
    Ok(vec![
        CommandSpec::new::<LanceDbServerInput>(
            Db::LanceDbServer,
            "LanceDBServer",
            "LanceDB server with brute-force search",
            |input| untuned(input, LanceDbServerIndexConfig::None),
        )?,
        CommandSpec::new::<LanceDbServerInput>(
            Db::LanceDbServer,
            "LanceDBServerAutoIndex",
            "LanceDB server with its automatically chosen index",
            |input| untuned(input, LanceDbServerIndexConfig::AutoIndex),
        )?,
        CommandSpec::new::<LanceDbServerIvfPqInput>(
            Db::LanceDbServer,
            "LanceDBServerIVFPQ",
            "LanceDB server with an IVF-PQ index",
            |input| untuned(input.base, LanceDbServerIndexConfig::IvfPq(input.index)),
        )?,
        CommandSpec::new::<LanceDbServerHnswInput>(
            Db::LanceDbServer,
            "LanceDBServerHNSW",
            "LanceDB server with an HNSW index",
            |input| untuned(input.base, LanceDbServerIndexConfig::Hnsw(input.index)),
        )?,
    ])
}
