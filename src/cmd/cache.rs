//! `edgemgmt cache`: caches.

use crate::cli::CacheCommand;
use crate::error::EdgeError;
use crate::resources::{CreateCache, Org};

use super::print_json;

pub async fn execute(org: &Org, cmd: CacheCommand) -> Result<(), EdgeError> {
    let caches = org.caches();
    match cmd {
        CacheCommand::List { env } => print_json(&caches.list(&env).await?),
        CacheCommand::Get { env, name } => print_json(&caches.get(&env, &name).await?),
        CacheCommand::Create {
            env,
            name,
            description,
            timeout_secs,
        } => {
            let cache = CreateCache {
                name,
                description,
                timeout_secs,
            };
            print_json(&caches.create(&env, &cache).await?)
        }
        CacheCommand::Delete { env, name } => print_json(&caches.delete(&env, &name).await?),
    }
}
