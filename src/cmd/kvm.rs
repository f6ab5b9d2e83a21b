//! `edgemgmt kvm`: key-value maps.

use crate::cli::{KvmCommand, ScopeArgs};
use crate::error::EdgeError;
use crate::resources::{CreateKvm, KvmWrite, Org, Scope};

use super::print_json;

fn scope(args: ScopeArgs) -> Scope {
    match (args.env, args.proxy) {
        (Some(env), _) => Scope::Environment(env),
        (None, Some(proxy)) => Scope::Proxy(proxy),
        (None, None) => Scope::Organization,
    }
}

pub async fn execute(org: &Org, cmd: KvmCommand) -> Result<(), EdgeError> {
    let kvms = org.kvms();
    match cmd {
        KvmCommand::List(args) => print_json(&kvms.list(&scope(args)).await?),
        KvmCommand::Get { scope: args, name } => print_json(&kvms.get(&scope(args), &name).await?),
        KvmCommand::Create {
            scope: args,
            name,
            entries,
            encrypted,
        } => {
            let request = CreateKvm {
                name,
                encrypted,
                entries: entries.into_iter().collect(),
            };
            print_json(&kvms.create(&scope(args), &request).await?)
        }
        KvmCommand::Put {
            scope: args,
            map,
            entries,
        } => {
            let write = match <[(String, String); 1]>::try_from(entries) {
                Ok([(key, value)]) => KvmWrite::Entry { key, value },
                Err(entries) => KvmWrite::Entries(entries.into_iter().collect()),
            };
            print_json(&kvms.put(&scope(args), &map, &write).await?)
        }
        KvmCommand::Delete { scope: args, name } => {
            print_json(&kvms.delete(&scope(args), &name).await?)
        }
    }
}
