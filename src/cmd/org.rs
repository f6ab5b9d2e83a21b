//! `edgemgmt org`: the organization record and its properties.

use std::collections::BTreeMap;

use crate::cli::OrgCommand;
use crate::error::EdgeError;
use crate::resources::Org;

use super::print_json;

pub async fn execute(org: &Org, cmd: OrgCommand) -> Result<(), EdgeError> {
    let organization = org.organization();
    match cmd {
        OrgCommand::Get => print_json(&organization.get().await?),
        OrgCommand::Properties => {
            let properties: BTreeMap<&str, &str> = organization.properties().await?.iter().collect();
            print_json(&properties)
        }
    }
}
