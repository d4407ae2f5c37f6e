//! Command declarations.
//!
//! A command pairs a composed option set with the typed input it resolves
//! into. The options are exactly the groups the [`FromParams`] type reads.

use std::fmt;

use vdbbench_core::{ConfigError, Db, DeclarationError, FromParams, ParamBag, ParamSet, RawParams};

use crate::task::TaskConfig;

type BuildFn = Box<dyn Fn(&ParamBag) -> Result<TaskConfig, ConfigError> + Send + Sync>;

/// One command of the command surface.
pub struct CommandSpec {
    name: &'static str,
    about: &'static str,
    db: Db,
    params: ParamSet,
    build: BuildFn,
}

impl CommandSpec {
    /// Declare a command reading the typed input `I`.
    ///
    /// Fails when two of the input's groups declare the same option.
    pub fn new<I: FromParams + 'static>(
        db: Db,
        name: &'static str,
        about: &'static str,
        build: fn(I) -> TaskConfig,
    ) -> Result<Self, DeclarationError> {
        let params = ParamSet::compose(&I::groups())?;
        Ok(Self {
            name,
            about,
            db,
            params,
            build: Box::new(move |bag| I::from_params(bag).map(build)),
        })
    }

    /// Command name
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// One-line description
    pub fn about(&self) -> &'static str {
        self.about
    }

    /// Backend the command drives
    pub fn db(&self) -> Db {
        self.db
    }

    /// Composed options
    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    /// Resolve raw values into a task. No backend is contacted.
    pub fn resolve(&self, raw: &RawParams) -> Result<TaskConfig, ConfigError> {
        let bag = self.params.resolve(raw)?;
        (self.build)(&bag)
    }
}

impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("name", &self.name)
            .field("db", &self.db)
            .field("params", &self.params.len())
            .finish_non_exhaustive()
    }
}
