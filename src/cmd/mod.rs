//! Subcommand dispatch and execution.
//!
//! The [`dispatch`] function initializes logging, resolves the connection
//! profile, and routes the parsed CLI to the handler for each resource
//! group. Each handler lives in its own submodule and prints its result
//! as JSON on stdout.

pub mod cache;
pub mod env;
pub mod kvm;
pub mod org;
pub mod targetserver;
pub mod validate;

use serde::Serialize;

use crate::cli::{Cli, Commands, ConnectionArgs};
use crate::config::{self, ProfileOverrides};
use crate::connection::Connection;
use crate::error::EdgeError;
use crate::logging;
use crate::resources::Org;

pub async fn dispatch(cli: Cli) -> Result<(), EdgeError> {
    let format = logging::resolve_format(cli.logging.pretty, cli.logging.json);
    logging::init(
        logging::effective_level(&cli.logging.log_level, cli.connection.verbose),
        format,
    );

    let Some(command) = cli.command else {
        print_welcome();
        return Ok(());
    };

    if let Commands::Validate(ref args) = command {
        return validate::execute(args).await;
    }

    let org = connect(cli.connection).await?;
    match command {
        Commands::Kvm(cmd) => kvm::execute(&org, cmd).await,
        Commands::TargetServer(cmd) => targetserver::execute(&org, cmd).await,
        Commands::Env(cmd) => env::execute(&org, cmd).await,
        Commands::Cache(cmd) => cache::execute(&org, cmd).await,
        Commands::Org(cmd) => org::execute(&org, cmd).await,
        Commands::Validate(_) => Ok(()),
    }
}

async fn connect(args: ConnectionArgs) -> Result<Org, EdgeError> {
    let overrides = ProfileOverrides {
        mgmt_server: args.mgmt_server,
        org: args.org,
        username: args.username,
        password: args.password,
        token: args.token,
        verbosity: (args.verbose > 0).then_some(args.verbose),
        timeout: args.timeout,
    };
    let profile = config::resolve_profile(args.profile.as_deref(), overrides).await?;
    let conn = Connection::from_profile(&profile)?;
    tracing::debug!(org = %conn.org(), url = %conn.url_base(), "connection ready");
    Ok(Org::new(conn))
}

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), EdgeError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_welcome() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        "\n  edgemgmt v{version} \u{2014} gateway management API client\n\n  \
         No command provided. To get started:\n\n    \
         edgemgmt -o my-org -u me@example.com env list     List environments\n    \
         edgemgmt -P profile.yaml kvm list --env test       List KVMs in an environment\n    \
         edgemgmt validate profile.yaml                     Check a profile file\n    \
         edgemgmt --help                                    See all commands and options\n"
    );
}
