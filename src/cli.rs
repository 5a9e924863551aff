use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "tnmanage",
    author,
    version,
    about = "Manage datasets and NFS shares on TrueNAS",
    long_about = "A command line tool to manage datasets and NFS shares on TrueNAS systems."
)]
pub struct Cli {
    /// Path to the settings file (defaults to ~/.tnmanage)
    #[arg(long, global = true, env = "TNMANAGE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new dataset, optionally shared over NFS
    Add(AddArgs),
    /// List all datasets in a pool
    List(ListArgs),
    /// Remove a dataset
    Remove(DestructiveArgs),
    /// Wipe all data from a dataset. This cannot be undone!
    Clear(DestructiveArgs),
    /// Configure TrueNAS connection settings
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Explicit connection settings; each one overrides the environment and the settings file
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// TrueNAS server URL (e.g., https://192.168.1.100)
    #[arg(long)]
    pub server: Option<String>,

    /// TrueNAS API token
    #[arg(long)]
    pub token: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct AddArgs {
    /// Pool to create the dataset in
    pub pool: String,

    /// Name of the new dataset
    pub dataset: String,

    /// Quota in GiB (0 for none)
    #[arg(value_name = "MAX_SIZE_GB", allow_hyphen_values = true)]
    pub max_size_gb: String,

    /// Authorized hosts for an NFS share (creates the share if given)
    #[arg(long = "nfs", value_name = "HOSTS", value_delimiter = ',')]
    pub nfs_hosts: Vec<String>,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    pub pool: String,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

/// Arguments shared by `remove` and `clear`
#[derive(Args, Debug, Clone)]
pub struct DestructiveArgs {
    /// Full dataset ID, e.g. tank/media
    pub dataset: String,

    /// Skip confirmation prompt
    #[arg(short, long)]
    pub force: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// Set the TrueNAS server URL
    Server {
        #[arg(value_name = "SERVER_URL")]
        url: String,
    },
    /// Set the TrueNAS API token
    Token { token: String },
}
