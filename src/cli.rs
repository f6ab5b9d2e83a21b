//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, global connection and logging
//! flags, and one subcommand group per resource type. Every connection
//! flag has an environment variable equivalent.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "edgemgmt",
    version,
    about = "Manage gateway configuration objects through the management API",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        edgemgmt -o my-org -u me@example.com env list\n  \
        edgemgmt -P profile.yaml kvm list --env test\n  \
        edgemgmt -P profile.yaml targetserver disable --env prod backend-1"
)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(flatten)]
    pub logging: LoggingArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Default)]
pub struct ConnectionArgs {
    /// Connection profile (.yaml, .json, .toml)
    #[arg(short = 'P', long, env = "EDGE_PROFILE", global = true)]
    pub profile: Option<PathBuf>,

    /// Management server base URL
    #[arg(long, env = "EDGE_MGMT_SERVER", global = true)]
    pub mgmt_server: Option<String>,

    /// Organization name
    #[arg(short, long, env = "EDGE_ORG", global = true)]
    pub org: Option<String>,

    /// Username for basic authentication
    #[arg(short, long, env = "EDGE_USERNAME", global = true)]
    pub username: Option<String>,

    /// Password for basic authentication
    #[arg(long, env = "EDGE_PASSWORD", hide_env_values = true, global = true)]
    pub password: Option<String>,

    /// Bearer token (instead of username/password)
    #[arg(long, env = "EDGE_TOKEN", hide_env_values = true, global = true)]
    pub token: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, env = "EDGE_TIMEOUT_MS", global = true)]
    pub timeout: Option<u64>,

    /// Log each management request (repeat for response bodies on errors)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Args, Debug)]
pub struct LoggingArgs {
    /// Log level
    #[arg(
        short,
        long,
        env = "LOG_LEVEL",
        default_value = "warn",
        global = true,
        help_heading = "Logging"
    )]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long, global = true, help_heading = "Logging")]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty", global = true, help_heading = "Logging")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Key-value maps
    #[command(subcommand)]
    Kvm(KvmCommand),

    /// Target servers
    #[command(subcommand, name = "targetserver", alias = "ts")]
    TargetServer(TargetServerCommand),

    /// Environments
    #[command(subcommand)]
    Env(EnvCommand),

    /// Caches
    #[command(subcommand)]
    Cache(CacheCommand),

    /// The organization record
    #[command(subcommand)]
    Org(OrgCommand),

    /// Validate a profile file without connecting
    Validate(ValidateArgs),
}

#[derive(Args, Debug, Default)]
pub struct ScopeArgs {
    /// Environment scope
    #[arg(short, long, conflicts_with = "proxy")]
    pub env: Option<String>,

    /// API proxy scope
    #[arg(long)]
    pub proxy: Option<String>,
}

#[derive(Subcommand)]
pub enum KvmCommand {
    /// List map names
    List(ScopeArgs),

    /// Show one map
    Get {
        #[command(flatten)]
        scope: ScopeArgs,
        name: String,
    },

    /// Create a map
    Create {
        #[command(flatten)]
        scope: ScopeArgs,
        name: String,
        /// Initial entry as key=value (repeatable)
        #[arg(long = "entry", value_parser = parse_key_value)]
        entries: Vec<(String, String)>,
        /// Store values encrypted
        #[arg(long)]
        encrypted: bool,
    },

    /// Add or update entries
    Put {
        #[command(flatten)]
        scope: ScopeArgs,
        map: String,
        /// Entry as key=value (repeatable)
        #[arg(long = "entry", value_parser = parse_key_value, required = true)]
        entries: Vec<(String, String)>,
    },

    /// Delete a map
    Delete {
        #[command(flatten)]
        scope: ScopeArgs,
        name: String,
    },
}

#[derive(Subcommand)]
pub enum TargetServerCommand {
    /// List target server names
    List {
        #[arg(short, long)]
        env: String,
    },

    /// Show one target server
    Get {
        #[arg(short, long)]
        env: String,
        name: String,
    },

    /// Create a target server
    Create {
        #[arg(short, long)]
        env: String,
        name: String,
        #[arg(long)]
        host: String,
        #[arg(long)]
        port: u16,
        /// Connect to the target over TLS
        #[arg(long)]
        ssl: bool,
        /// Create it disabled
        #[arg(long)]
        disabled: bool,
    },

    /// Enable a target server
    Enable {
        #[arg(short, long)]
        env: String,
        name: String,
    },

    /// Disable a target server
    Disable {
        #[arg(short, long)]
        env: String,
        name: String,
    },

    /// Delete a target server
    Delete {
        #[arg(short, long)]
        env: String,
        name: String,
    },
}

#[derive(Subcommand)]
pub enum EnvCommand {
    /// List environment names
    List,

    /// Show one environment
    Get { name: String },
}

#[derive(Subcommand)]
pub enum CacheCommand {
    /// List cache names
    List {
        #[arg(short, long)]
        env: String,
    },

    /// Show one cache
    Get {
        #[arg(short, long)]
        env: String,
        name: String,
    },

    /// Create a cache
    Create {
        #[arg(short, long)]
        env: String,
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Entry expiry in seconds
        #[arg(long, default_value_t = crate::resources::cache::DEFAULT_TIMEOUT_SECS)]
        timeout_secs: u64,
    },

    /// Delete a cache
    Delete {
        #[arg(short, long)]
        env: String,
        name: String,
    },
}

#[derive(Subcommand)]
pub enum OrgCommand {
    /// Show the organization record
    Get,

    /// Show the organization's feature properties
    Properties,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// Profile file to validate
    pub profile: PathBuf,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: ValidateFormat,
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum ValidateFormat {
    Text,
    Json,
}

/// Parse `key=value`. The value may contain further `=` characters.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}
