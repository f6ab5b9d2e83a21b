//! edgemgmt is a client for a gateway platform's management API.
//!
//! It exposes create, read, update, enable/disable, and delete operations
//! on configuration objects (key-value maps, target servers, environments,
//! caches, and the organization record). Every operation is one HTTP round
//! trip, or two when a write first checks whether its target exists.
//!
//! ```no_run
//! # async fn demo() -> Result<(), edgemgmt::error::EdgeError> {
//! use edgemgmt::connection::{Connection, Credentials};
//! use edgemgmt::resources::{KvmWrite, Org, Scope};
//!
//! let conn = Connection::builder("https://api.enterprise.apigee.com", "my-org")
//!     .credentials(Credentials::Bearer("token".into()))
//!     .build()?;
//! let org = Org::new(conn);
//!
//! for env in org.environments().list().await? {
//!     org.kvms()
//!         .put(&Scope::environment(env), "settings", &KvmWrite::entry("mode", "blue"))
//!         .await?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`cli`] -- Command-line argument parsing with clap derive macros.
//! - [`cmd`] -- Subcommand dispatch and execution.
//! - [`config`] -- Connection profile loading, overrides, and validation.
//! - [`connection`] -- Base URL, credentials, transport, and the
//!   fetch-once organization properties.
//! - [`error`] -- Unified error types using `thiserror`.
//! - [`logging`] -- Structured tracing setup for the CLI.
//! - [`resources`] -- One client per REST resource type.
//! - [`transport`] -- Transport trait, request-options builder, and response
//!   normalization.
//!
//! # Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `yaml` | YAML profile support _(enabled by default)_ |
//! | `json` | JSON profile support |
//! | `toml` | TOML profile support |
//! | `file-backends` | All profile formats |
//! | `full` | All features |

#![allow(clippy::missing_errors_doc)]

pub mod cli;
pub mod cmd;
pub mod config;
pub mod connection;
pub mod error;
pub mod logging;
pub mod resources;
pub mod transport;
