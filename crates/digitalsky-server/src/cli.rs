use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::auth::DEFAULT_TOKEN_TTL_MINUTES;

/// Default request body limit for document uploads (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Parser)]
#[command(
    name = "digitalsky-server",
    version,
    about = "DigitalSky drone import application server"
)]
pub struct Cli {
    /// Secret used to sign and verify bearer tokens
    #[arg(long, env = "DIGITALSKY_JWT_SECRET", hide_env_values = true)]
    pub jwt_secret: String,

    /// Lifetime of issued tokens, in minutes
    #[arg(long, env = "DIGITALSKY_TOKEN_TTL_MINUTES", default_value_t = DEFAULT_TOKEN_TTL_MINUTES)]
    pub token_ttl_minutes: i64,

    #[command(flatten)]
    pub serve: ServeArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Interface to bind
    #[arg(long, env = "DIGITALSKY_HOST", default_value = "0.0.0.0")]
    pub host: String,

    #[arg(long, env = "DIGITALSKY_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Directory holding uploaded documents
    #[arg(long, env = "DIGITALSKY_STORAGE_DIR", default_value = "./uploads")]
    pub storage_dir: PathBuf,

    /// Maximum request body size in bytes
    #[arg(long, env = "DIGITALSKY_MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Run the HTTP server (the default)
    Serve,

    /// Mint a bearer token and print it to stdout
    IssueToken {
        /// User id placed in the `sub` claim
        #[arg(long)]
        user_id: i64,

        #[arg(long)]
        username: String,

        /// Role to grant; repeat for several (e.g. --role ADMIN)
        #[arg(long = "role")]
        roles: Vec<String>,
    },
}
