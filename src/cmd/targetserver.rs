//! `edgemgmt targetserver`: target servers.

use crate::cli::TargetServerCommand;
use crate::error::EdgeError;
use crate::resources::{Org, SslInfo, TargetServer};

use super::print_json;

pub async fn execute(org: &Org, cmd: TargetServerCommand) -> Result<(), EdgeError> {
    let targets = org.targetservers();
    match cmd {
        TargetServerCommand::List { env } => print_json(&targets.list(&env).await?),
        TargetServerCommand::Get { env, name } => print_json(&targets.get(&env, &name).await?),
        TargetServerCommand::Create {
            env,
            name,
            host,
            port,
            ssl,
            disabled,
        } => {
            let mut target = TargetServer::new(name, host, port).with_ssl(SslInfo {
                enabled: ssl,
                ..SslInfo::default()
            });
            target.is_enabled = !disabled;
            print_json(&targets.create(&env, &target).await?)
        }
        TargetServerCommand::Enable { env, name } => {
            print_json(&targets.enable(&env, &name).await?)
        }
        TargetServerCommand::Disable { env, name } => {
            print_json(&targets.disable(&env, &name).await?)
        }
        TargetServerCommand::Delete { env, name } => {
            print_json(&targets.delete(&env, &name).await?)
        }
    }
}
