//! `edgemgmt env`: environments.

use crate::cli::EnvCommand;
use crate::error::EdgeError;
use crate::resources::Org;

use super::print_json;

pub async fn execute(org: &Org, cmd: EnvCommand) -> Result<(), EdgeError> {
    let environments = org.environments();
    match cmd {
        EnvCommand::List => print_json(&environments.list().await?),
        EnvCommand::Get { name } => print_json(&environments.get(&name).await?),
    }
}
