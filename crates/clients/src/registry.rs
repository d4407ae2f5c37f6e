//! Every command of every backend.

use vdbbench_core::DeclarationError;

use crate::command::CommandSpec;
use crate::{lancedb_server, qdrant_local};

/// All declared commands, grouped by backend.
pub fn commands() -> Result<Vec<CommandSpec>, DeclarationError> {
    let mut commands = lancedb_server::commands()?;
    commands.extend(qdrant_local::commands()?);
    Ok(commands)
}
